//! Pipeline group domain types

use serde::{Deserialize, Serialize};

use super::pipeline::Pipeline;
use super::principal::Principal;

/// Named collection of pipelines sharing one authorization block
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineGroup {
    pub name: String,
    #[serde(default)]
    pub authorization: GroupAuthorization,
    #[serde(default)]
    pub pipelines: Vec<Pipeline>,
}

impl PipelineGroup {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            authorization: GroupAuthorization::default(),
            pipelines: Vec::new(),
        }
    }

    pub fn with_pipeline(mut self, pipeline: Pipeline) -> Self {
        self.pipelines.push(pipeline);
        self
    }

    pub fn with_authorization(mut self, authorization: GroupAuthorization) -> Self {
        self.authorization = authorization;
        self
    }

    /// Whether the group name matches, ignoring case
    pub fn is_named(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name)
    }
}

/// Users allowed to act on a group, by role
///
/// Admins may edit pipeline definitions, operators may trigger them and
/// viewers may only read them. Higher roles imply the lower ones.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GroupAuthorization {
    #[serde(default)]
    pub admins: Vec<Principal>,
    #[serde(default)]
    pub operators: Vec<Principal>,
    #[serde(default)]
    pub viewers: Vec<Principal>,
}

impl GroupAuthorization {
    pub fn is_admin(&self, principal: &Principal) -> bool {
        self.admins.contains(principal)
    }

    pub fn is_operator(&self, principal: &Principal) -> bool {
        self.is_admin(principal) || self.operators.contains(principal)
    }

    pub fn is_viewer(&self, principal: &Principal) -> bool {
        self.is_operator(principal) || self.viewers.contains(principal)
    }
}
