//! LTI 1.1 launch parameters for embedded exercises.
//!
//! Exercises served through an LMS-integration tool are embedded as an
//! iframe whose content is obtained by POSTing a signed launch form. This
//! crate defines the launch data ([`LtiLaunch`]), the collaborator seam the
//! renderer calls ([`LaunchParamsProvider`]), and a signer that builds and
//! signs launches locally ([`LtiSigner`]).

mod signature;
mod signer;

use std::collections::BTreeMap;

pub use signer::LtiSigner;

/// Signed launch form for one user and one task.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LtiLaunch {
    /// Tool endpoint the form is posted to.
    pub launch_url: String,
    /// Form fields, including the OAuth signature.
    pub params: BTreeMap<String, String>,
}

impl LtiLaunch {
    /// Check that the launch can be posted.
    ///
    /// # Errors
    ///
    /// Returns [`LtiError::MalformedLaunch`] if the URL is not http(s) or the
    /// parameters are unsigned.
    pub fn validate(&self) -> Result<(), LtiError> {
        if !self.launch_url.starts_with("http://") && !self.launch_url.starts_with("https://") {
            return Err(LtiError::MalformedLaunch(format!(
                "launch URL '{}' is not an http(s) URL",
                self.launch_url
            )));
        }
        if !self.params.contains_key("oauth_signature") {
            return Err(LtiError::MalformedLaunch(
                "missing oauth_signature".to_owned(),
            ));
        }
        Ok(())
    }
}

/// Source of signed launch parameters.
///
/// Implementations may sign locally ([`LtiSigner`]) or ask a remote service.
/// They are shared between concurrent renders.
pub trait LaunchParamsProvider: Send + Sync {
    /// Launch form for `username` working on `task_id`.
    ///
    /// # Errors
    ///
    /// Returns an error if the launch cannot be prepared. Callers treat this
    /// like a missing launch and never retry.
    fn launch_params(&self, username: &str, task_id: &str) -> Result<LtiLaunch, LtiError>;
}

/// LTI launch error.
#[derive(Debug, thiserror::Error)]
pub enum LtiError {
    /// Signature could not be computed.
    #[error("Failed to sign launch: {0}")]
    Signing(String),
    /// Launch data is unusable.
    #[error("Malformed launch: {0}")]
    MalformedLaunch(String),
    /// Remote provider failed.
    #[error("Launch provider unavailable: {0}")]
    Unavailable(String),
}
