//! Authorization
//!
//! The engine never decides on its own who may change what; it asks an
//! `AuthorizationService` and only consumes the yes/no answer.

use gantry_core::domain::principal::Principal;
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use crate::repository::ConfigurationStore;

/// What a mutation touches, for permission purposes
///
/// Pipeline mutations only ever touch a group; environment membership is
/// read by the engine but never changed through it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthorizationScope {
    Group(String),
}

impl fmt::Display for AuthorizationScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthorizationScope::Group(name) => write!(f, "group '{}'", name),
        }
    }
}

pub trait AuthorizationService: Send + Sync {
    /// Whether the principal may change definitions within the scope
    fn can_mutate(&self, principal: &Principal, scope: &AuthorizationScope) -> bool;

    /// Whether the principal may see the group's pipelines
    fn can_view_group(&self, principal: &Principal, group: &str) -> bool;

    /// Whether the principal may trigger the group's pipelines
    fn can_operate_group(&self, principal: &Principal, group: &str) -> bool;
}

/// Authorization driven by super admins and the group authorization blocks
/// of the live document
///
/// With no super admins configured, security is considered disabled and
/// every principal is allowed everything.
pub struct GroupAuthorizationService {
    store: Arc<dyn ConfigurationStore>,
    super_admins: HashSet<Principal>,
}

impl GroupAuthorizationService {
    pub fn new(store: Arc<dyn ConfigurationStore>, super_admins: Vec<Principal>) -> Self {
        Self {
            store,
            super_admins: super_admins.into_iter().collect(),
        }
    }

    fn security_disabled(&self) -> bool {
        self.super_admins.is_empty()
    }

    fn is_super_admin(&self, principal: &Principal) -> bool {
        self.security_disabled() || self.super_admins.contains(principal)
    }

    fn check_group(&self, principal: &Principal, group: &str, check: GroupCheck) -> bool {
        if self.is_super_admin(principal) {
            return true;
        }

        let snapshot = self.store.current_snapshot();
        let Some(group) = snapshot.find_group(group) else {
            // Only super admins may act on groups that do not exist yet
            return false;
        };

        let authorization = &group.authorization;
        match check {
            GroupCheck::Admin => authorization.is_admin(principal),
            GroupCheck::Operate => authorization.is_operator(principal),
            GroupCheck::View => authorization.is_viewer(principal),
        }
    }
}

#[derive(Clone, Copy)]
enum GroupCheck {
    Admin,
    Operate,
    View,
}

impl AuthorizationService for GroupAuthorizationService {
    fn can_mutate(&self, principal: &Principal, scope: &AuthorizationScope) -> bool {
        match scope {
            AuthorizationScope::Group(group) => self.check_group(principal, group, GroupCheck::Admin),
        }
    }

    fn can_view_group(&self, principal: &Principal, group: &str) -> bool {
        self.check_group(principal, group, GroupCheck::View)
    }

    fn can_operate_group(&self, principal: &Principal, group: &str) -> bool {
        self.check_group(principal, group, GroupCheck::Operate)
    }
}
