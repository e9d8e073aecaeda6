//! Pipeline command handlers
//!
//! Handles all pipeline-related CLI commands: listing, viewing, the
//! deletion-safety report and the create, update and delete mutations.

use anyhow::{Context, Result};
use clap::Subcommand;
use colored::*;
use gantry_config::service::OperationResult;
use gantry_core::domain::fingerprint::Fingerprint;
use gantry_core::domain::name::PipelineName;
use gantry_core::domain::pipeline::{Pipeline, Task};
use gantry_core::dto::pipeline::{
    CanDeleteResult, CreatePipeline, DeletePipeline, PipelineWithFingerprint, UpdatePipeline,
};

use crate::config::Config;
use crate::workspace::Workspace;

/// Pipeline subcommands
#[derive(Subcommand)]
pub enum PipelineCommands {
    /// List the groups and pipelines you can see
    List,
    /// Show a pipeline with its current fingerprint
    Show {
        /// Pipeline name
        name: String,
    },
    /// Report whether pipelines can be deleted
    CanDelete {
        /// Only check this pipeline
        name: Option<String>,
    },
    /// Create a pipeline from a JSON definition
    Create {
        /// Group to add the pipeline to
        #[arg(short, long)]
        group: String,

        /// Path to the pipeline JSON file
        #[arg(short, long)]
        file: String,
    },
    /// Replace a pipeline definition
    Update {
        /// Path to the pipeline JSON file
        #[arg(short, long)]
        file: String,

        /// Fingerprint from `pipeline show`
        #[arg(long)]
        fingerprint: String,
    },
    /// Delete a pipeline
    Delete {
        /// Pipeline name
        name: String,

        /// Fingerprint from `pipeline show`
        #[arg(long)]
        fingerprint: String,
    },
    /// Print the number of pipelines
    Count,
}

/// Handle pipeline commands
///
/// Routes pipeline subcommands to their respective handlers.
pub fn handle_pipeline_command(command: PipelineCommands, config: &Config) -> Result<()> {
    let workspace = Workspace::open(&config.config_file)?;

    match command {
        PipelineCommands::List => list_pipelines(&workspace, config),
        PipelineCommands::Show { name } => show_pipeline(&workspace, &name),
        PipelineCommands::CanDelete { name } => can_delete(&workspace, name.as_deref()),
        PipelineCommands::Create { group, file } => {
            let pipeline = read_pipeline(&file)?;
            let result = workspace
                .service()
                .create_pipeline_config(config.principal(), CreatePipeline { group, pipeline });
            finish(&workspace, result)
        }
        PipelineCommands::Update { file, fingerprint } => {
            let pipeline = read_pipeline(&file)?;
            let result = workspace.service().update_pipeline_config(
                config.principal(),
                UpdatePipeline {
                    pipeline,
                    fingerprint: Fingerprint::new(fingerprint),
                },
            );
            finish(&workspace, result)
        }
        PipelineCommands::Delete { name, fingerprint } => {
            let result = workspace.service().delete_pipeline_config(
                config.principal(),
                DeletePipeline {
                    name: PipelineName::new(name),
                    fingerprint: Fingerprint::new(fingerprint),
                },
            );
            finish(&workspace, result)
        }
        PipelineCommands::Count => {
            println!("{}", workspace.service().total_pipelines_count());
            Ok(())
        }
    }
}

/// Read a pipeline definition from a JSON file
fn read_pipeline(path: &str) -> Result<Pipeline> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read pipeline file: {}", path))?;
    serde_json::from_str(&contents)
        .with_context(|| format!("Failed to parse pipeline definition: {}", path))
}

/// Report the outcome of a mutation, saving the document on success
fn finish(workspace: &Workspace, result: OperationResult) -> Result<()> {
    let message = result.message().unwrap_or_default().to_string();

    if !result.is_successful() {
        anyhow::bail!("{} (status {})", message, result.status_code());
    }

    workspace.save()?;
    println!("{}", format!("✓ {}", message).green().bold());
    Ok(())
}

/// List viewable groups and their pipelines
fn list_pipelines(workspace: &Workspace, config: &Config) -> Result<()> {
    let groups = workspace
        .service()
        .viewable_or_operatable_groups_for(&config.principal());

    if groups.is_empty() {
        println!("{}", "No pipeline groups visible.".yellow());
        return Ok(());
    }

    for group in groups {
        println!("{} {}", "▸".cyan(), group.name.bold());
        if group.pipelines.is_empty() {
            println!("    {}", "(empty)".dimmed());
        }
        for pipeline in &group.pipelines {
            let origin = if pipeline.origin.is_local() {
                String::new()
            } else {
                format!(" [{}]", pipeline.origin.display_name())
            };
            println!("    {}{}", pipeline.name, origin.dimmed());
        }
    }

    Ok(())
}

/// Show a single pipeline
fn show_pipeline(workspace: &Workspace, name: &str) -> Result<()> {
    let found = workspace
        .service()
        .pipeline_with_fingerprint(name)
        .ok_or_else(|| anyhow::anyhow!("Pipeline '{}' not found.", name))?;

    print_pipeline_details(&found);
    Ok(())
}

/// Print deletion verdicts
fn can_delete(workspace: &Workspace, name: Option<&str>) -> Result<()> {
    match name {
        Some(name) => {
            let verdict = workspace
                .service()
                .can_delete(name)
                .ok_or_else(|| anyhow::anyhow!("Pipeline '{}' not found.", name))?;
            print_verdict(name, &verdict);
        }
        None => {
            for (name, verdict) in workspace.service().can_delete_pipelines() {
                print_verdict(name.as_str(), &verdict);
            }
        }
    }
    Ok(())
}

fn print_verdict(name: &str, verdict: &CanDeleteResult) {
    let mark = if verdict.can_delete {
        "✓".green()
    } else {
        "✗".red()
    };
    println!("  {} {:<30} {}", mark, name.bold(), verdict.message.dimmed());
}

/// Print detailed pipeline information
fn print_pipeline_details(found: &PipelineWithFingerprint) {
    let pipeline = &found.pipeline;

    println!("{}", "Pipeline Details:".bold());
    println!("  Name:        {}", pipeline.name.to_string().bold());
    println!("  Group:       {}", found.group);
    println!("  Origin:      {}", pipeline.origin.display_name());
    println!("  Fingerprint: {}", found.fingerprint.to_string().cyan());
    if !pipeline.upstream.is_empty() {
        let upstream: Vec<&str> = pipeline.upstream.iter().map(|n| n.as_str()).collect();
        println!("  Depends on:  {}", upstream.join(", "));
    }

    println!("\n{}", "Stages:".bold());
    for stage in &pipeline.stages {
        println!("  {} {}", "▸".cyan(), stage.name);
        for job in &stage.jobs {
            println!("    {}", job.name);
            for task in &job.tasks {
                let description = match task {
                    Task::Exec { command, args } => format!("exec {} {}", command, args.join(" ")),
                    Task::Pluggable(task) => format!("plugin {} v{}", task.plugin_id, task.version),
                };
                println!("      - {}", description.trim_end().dimmed());
            }
        }
    }
}
