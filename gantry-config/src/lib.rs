//! Gantry Config
//!
//! Mutation and dependency-integrity engine for the pipeline configuration
//! graph.
//!
//! - `repository`: the configuration store contract and an in-memory store
//! - `service`: deletion-safety analysis, validation, authorization and the
//!   mutation executor that ties them together
//! - `command`: the proposed changes the executor applies
//! - `document`: loading and saving the configuration document as JSON

pub mod command;
pub mod document;
pub mod error;
pub mod repository;
pub mod service;
pub mod settings;

pub use command::MutationCommand;
pub use error::{DocumentError, SettingsError, StoreError};
