//! Request principals and the permission check applied to every mutation.

use std::collections::BTreeSet;

use crate::errors::{CoreError, CoreResult};

pub const LOGIN_REQUIRED: &str = "Login required";
pub const PERMISSION_REQUIRED: &str = "Permission required";

const OWNER_ROLE: &str = "owner";

/// Permission action names checked by the mutations and queries.
pub mod actions {
    pub const CUSTOMERS_ADD: &str = "customersAdd";
    pub const CUSTOMERS_EDIT: &str = "customersEdit";
    pub const CUSTOMERS_EDIT_COMPANIES: &str = "customersEditCompanies";
    pub const CUSTOMERS_MERGE: &str = "customersMerge";
    pub const CUSTOMERS_REMOVE: &str = "customersRemove";
    pub const SHOW_CUSTOMERS: &str = "showCustomers";

    pub const MANAGE_PRODUCTS: &str = "manageProducts";
    pub const SHOW_PRODUCTS: &str = "showProducts";

    pub const DEALS_ADD: &str = "dealsAdd";
    pub const DEALS_EDIT: &str = "dealsEdit";
    pub const DEALS_REMOVE: &str = "dealsRemove";
    pub const SHOW_DEALS: &str = "showDeals";

    pub const MANAGE_MESSENGER_APPS: &str = "manageMessengerApps";
    pub const SHOW_MESSENGER_APPS: &str = "showMessengerApps";

    pub const MANAGE_USERS: &str = "manageUsers";
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Actor {
    pub user_id: Option<String>,
    roles: BTreeSet<String>,
    actions: BTreeSet<String>,
    is_system: bool,
}

impl Actor {
    pub fn user(user_id: impl Into<String>) -> Self {
        Self {
            user_id: Some(user_id.into()),
            roles: BTreeSet::new(),
            actions: BTreeSet::new(),
            is_system: false,
        }
    }

    pub fn anonymous() -> Self {
        Self {
            user_id: None,
            roles: BTreeSet::new(),
            actions: BTreeSet::new(),
            is_system: false,
        }
    }

    pub fn system() -> Self {
        Self {
            user_id: None,
            roles: BTreeSet::new(),
            actions: BTreeSet::new(),
            is_system: true,
        }
    }

    pub fn owner(user_id: impl Into<String>) -> Self {
        Self::user(user_id).with_role(OWNER_ROLE)
    }

    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.roles.insert(role.into());
        self
    }

    pub fn with_action(mut self, action: impl Into<String>) -> Self {
        self.actions.insert(action.into());
        self
    }

    pub fn with_actions<I, S>(mut self, actions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.actions.extend(actions.into_iter().map(Into::into));
        self
    }

    pub fn has_role(&self, role: &str) -> bool {
        self.roles.contains(role)
    }

    pub fn can(&self, action: &str) -> bool {
        self.actions.contains(action)
    }

    pub fn is_owner(&self) -> bool {
        self.has_role(OWNER_ROLE)
    }

    pub fn is_system(&self) -> bool {
        self.is_system
    }

    pub fn is_authenticated(&self) -> bool {
        self.is_system || self.user_id.is_some()
    }
}

pub trait Authorizer: Send + Sync {
    fn authorize(&self, actor: &Actor, action: &str) -> CoreResult<()>;
}

/// Login first, then owner/system, then the actor's granted actions.
#[derive(Clone, Debug, Default)]
pub struct PermissionAuthorizer {
    bypass: bool,
}

impl PermissionAuthorizer {
    pub fn new() -> Self {
        Self { bypass: false }
    }

    /// Honours `CRM_LOCAL_AUTH_BYPASS` for local development.
    pub fn from_env() -> Self {
        Self {
            bypass: local_auth_bypass_enabled(),
        }
    }

    pub fn allow_all() -> Self {
        Self { bypass: true }
    }
}

impl Authorizer for PermissionAuthorizer {
    fn authorize(&self, actor: &Actor, action: &str) -> CoreResult<()> {
        if self.bypass || actor.is_system() {
            return Ok(());
        }

        if !actor.is_authenticated() {
            return Err(CoreError::unauthorized(LOGIN_REQUIRED));
        }

        if actor.is_owner() || actor.can(action) {
            return Ok(());
        }

        tracing::debug!(
            user_id = actor.user_id.as_deref().unwrap_or_default(),
            action,
            "permission denied"
        );
        Err(CoreError::forbidden(PERMISSION_REQUIRED).with_field("action", action))
    }
}

fn local_auth_bypass_enabled() -> bool {
    std::env::var("CRM_LOCAL_AUTH_BYPASS")
        .ok()
        .map(|value| {
            let normalized = value.trim().to_ascii_lowercase();
            matches!(normalized.as_str(), "1" | "true" | "yes" | "on")
        })
        .unwrap_or(false)
}
