//! Document validation command
//!
//! Runs the commit-time invariants and every structural validator over the
//! document as it is on disk, without changing anything.

use anyhow::Result;
use colored::*;
use gantry_config::repository::check_document;
use gantry_config::service::validation::default_validators;
use std::sync::Arc;

use crate::config::Config;
use crate::workspace::Workspace;

pub fn validate_document(config: &Config) -> Result<()> {
    let workspace = Workspace::open(&config.config_file)?;
    let document = workspace.document();
    let mut problems = 0;

    if let Err(err) = check_document(&document.config, workspace.settings()) {
        println!("  {} {}", "✗".red(), err);
        problems += 1;
    }

    let validators = default_validators(workspace.settings(), Arc::new(document.task_plugins()));
    for pipeline in document.config.pipelines() {
        for err in validators.iter().flat_map(|v| v.validate(pipeline)) {
            println!("  {} {}: {}", "✗".red(), pipeline.name.to_string().bold(), err);
            problems += 1;
        }
    }

    if problems > 0 {
        anyhow::bail!("Found {} problem(s) in {}", problems, config.config_file.display());
    }

    println!(
        "{}",
        format!(
            "✓ {} pipeline(s) valid",
            document.config.pipeline_count()
        )
        .green()
        .bold()
    );
    Ok(())
}
