//! crates/lms_seed_core/src/directory.rs
//!
//! User directory helpers: role statistics and verified role changes.

use std::collections::BTreeMap;

use tracing::info;

use crate::domain::{AuthToken, Role, UserId, UserSummary};
use crate::ports::{LmsApi, PortResult};

/// Counts users per role. Users without a role are counted as `unknown`.
pub fn role_counts(users: &[UserSummary]) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();
    for user in users {
        let role = user.role.map_or("unknown", |r| r.as_str());
        *counts.entry(role.to_string()).or_insert(0) += 1;
    }
    counts
}

/// The state of a user before and after a role change, as read back from the server.
#[derive(Debug, Clone, PartialEq)]
pub struct RoleChange {
    pub before: UserSummary,
    pub after: UserSummary,
}

impl RoleChange {
    pub fn applied(&self, role: Role) -> bool {
        self.after.role == Some(role)
    }
}

/// Fetches the user, updates the role and reads the user back for verification.
pub async fn change_role(
    api: &dyn LmsApi,
    token: Option<&AuthToken>,
    user_id: &UserId,
    role: Role,
) -> PortResult<RoleChange> {
    let before = api.get_user(token, user_id).await?;
    info!(
        "Updating {} from '{}' to '{}'",
        before.name.as_deref().unwrap_or("N/A"),
        before.role.map_or("N/A", |r| r.as_str()),
        role
    );

    let updated = api.update_user_role(token, user_id, role).await?;
    info!(
        "User role updated: {} ({})",
        updated.name.as_deref().unwrap_or("N/A"),
        updated.email.as_deref().unwrap_or("N/A")
    );

    let after = api.get_user(token, user_id).await?;
    Ok(RoleChange { before, after })
}
