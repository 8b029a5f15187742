//! Per-request rendering context.

/// Role that unlocks gated content.
pub const ADMIN_ROLE: &str = "admin";

/// Authenticated user.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Identity {
    /// Login name, passed to collaborators as the user key.
    pub username: String,
    /// Role name, compared against [`ADMIN_ROLE`] by the second stage.
    pub role: String,
}

impl Identity {
    /// Create an identity.
    #[must_use]
    pub fn new(username: impl Into<String>, role: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            role: role.into(),
        }
    }
}

/// Who is viewing the page and how it is displayed.
///
/// Passed by reference into every render; never stored by handlers.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RenderContext {
    /// Current user, `None` when anonymous.
    pub identity: Option<Identity>,
    /// Static print rendering instead of interactive widgets.
    pub print_mode: bool,
}

impl RenderContext {
    /// Interactive rendering for `identity`.
    #[must_use]
    pub fn online(identity: Option<Identity>) -> Self {
        Self {
            identity,
            print_mode: false,
        }
    }

    /// Print rendering for `identity`.
    #[must_use]
    pub fn print(identity: Option<Identity>) -> Self {
        Self {
            identity,
            print_mode: true,
        }
    }

    /// Username of the current user, if any.
    #[must_use]
    pub fn username(&self) -> Option<&str> {
        self.identity.as_ref().map(|i| i.username.as_str())
    }
}
