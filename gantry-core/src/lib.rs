//! Gantry Core
//!
//! Core types for the Gantry pipeline configuration engine.
//!
//! This crate contains:
//! - Domain types: the configuration graph (pipelines, groups, environments)
//!   and the frozen snapshot view of it
//! - DTOs: request and response shapes for mutating pipeline definitions

pub mod domain;
pub mod dto;
