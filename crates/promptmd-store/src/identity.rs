//! Static identity provider for tests and single-user hosts.

use promptmd_core::{IdentityProvider, User};

/// An [`IdentityProvider`] that always answers with the same viewer (or
/// none). The real identity collaborator lives outside this workspace.
#[derive(Debug, Clone, Default)]
pub struct StaticIdentity {
    user: Option<User>,
}

impl StaticIdentity {
    /// A provider with no signed-in viewer.
    pub fn anonymous() -> Self {
        Self { user: None }
    }

    /// A provider pinned to `user`.
    pub fn of(user: User) -> Self {
        Self { user: Some(user) }
    }
}

impl IdentityProvider for StaticIdentity {
    fn current_viewer(&self) -> Option<User> {
        self.user.clone()
    }
}
