//! Identity provider seam.
//!
//! Authentication itself is a collaborator concern; the core only needs a
//! current-user handle. Every ledger operation fails with
//! [`TrackerError::Unauthenticated`](crate::tracker::TrackerError) when no
//! user is present.

/// The authenticated user as reported by the identity provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentUser {
    pub id: String,
    pub email: String,
}

pub trait IdentityProvider: Send + Sync {
    /// Returns the currently signed-in user, if any.
    fn current_user(&self) -> Option<CurrentUser>;
}

/// Identity provider with a fixed user, used by the CLI (one configured
/// account) and by tests.
#[derive(Debug, Clone)]
pub struct StaticIdentity {
    user: CurrentUser,
}

impl StaticIdentity {
    pub fn new(id: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            user: CurrentUser {
                id: id.into(),
                email: email.into(),
            },
        }
    }
}

impl IdentityProvider for StaticIdentity {
    fn current_user(&self) -> Option<CurrentUser> {
        Some(self.user.clone())
    }
}
