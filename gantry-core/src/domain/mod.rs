//! Core domain types
//!
//! This module contains the structures that make up a pipeline configuration
//! document. They are shared between the engine (which validates and commits
//! changes) and any front-end that loads or renders the document.

pub mod environment;
pub mod fingerprint;
pub mod group;
pub mod name;
pub mod pipeline;
pub mod principal;
pub mod snapshot;
