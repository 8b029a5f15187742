//! Local LTI 1.1 launch signing.

use std::collections::BTreeMap;

use crate::signature::{
    build_signature_base_string, generate_nonce, generate_timestamp, sign_hmac_sha1,
};
use crate::{LaunchParamsProvider, LtiError, LtiLaunch};

/// Signs basic LTI launch requests with the consumer credentials.
#[derive(Clone, Debug)]
pub struct LtiSigner {
    launch_url: String,
    consumer_key: String,
    consumer_secret: String,
    context_id: String,
}

impl LtiSigner {
    /// Create a signer for the tool at `launch_url`.
    #[must_use]
    pub fn new(
        launch_url: impl Into<String>,
        consumer_key: impl Into<String>,
        consumer_secret: impl Into<String>,
        context_id: impl Into<String>,
    ) -> Self {
        Self {
            launch_url: launch_url.into(),
            consumer_key: consumer_key.into(),
            consumer_secret: consumer_secret.into(),
            context_id: context_id.into(),
        }
    }

    /// Build and sign a launch with a fixed nonce and timestamp.
    ///
    /// # Errors
    ///
    /// Returns [`LtiError::Signing`] if the HMAC cannot be computed.
    pub fn sign_with(
        &self,
        username: &str,
        task_id: &str,
        nonce: &str,
        timestamp: &str,
    ) -> Result<LtiLaunch, LtiError> {
        let mut params = BTreeMap::new();
        let mut set = |k: &str, v: &str| {
            params.insert(k.to_owned(), v.to_owned());
        };
        set("lti_message_type", "basic-lti-launch-request");
        set("lti_version", "LTI-1p0");
        set("resource_link_id", task_id);
        set("context_id", &self.context_id);
        set("user_id", username);
        set("lis_person_name_full", username);
        set("roles", "Learner");
        set("oauth_callback", "about:blank");
        set("oauth_consumer_key", &self.consumer_key);
        set("oauth_nonce", nonce);
        set("oauth_signature_method", "HMAC-SHA1");
        set("oauth_timestamp", timestamp);
        set("oauth_version", "1.0");

        let base_string = build_signature_base_string("POST", &self.launch_url, &params);
        let signature = sign_hmac_sha1(&self.consumer_secret, &base_string)?;
        params.insert("oauth_signature".to_owned(), signature);

        tracing::debug!(task_id, username, "Signed LTI launch");

        Ok(LtiLaunch {
            launch_url: self.launch_url.clone(),
            params,
        })
    }
}

impl LaunchParamsProvider for LtiSigner {
    fn launch_params(&self, username: &str, task_id: &str) -> Result<LtiLaunch, LtiError> {
        self.sign_with(username, task_id, &generate_nonce(), &generate_timestamp())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn signer() -> LtiSigner {
        LtiSigner::new(
            "https://grader.example.org/lti/launch",
            "syllabus",
            "secret",
            "algo",
        )
    }

    #[test]
    fn test_sign_with_known_signature() {
        let launch = signer()
            .sign_with("alice", "ex1", "abc123", "1700000000")
            .unwrap();

        assert_eq!(launch.launch_url, "https://grader.example.org/lti/launch");
        assert_eq!(launch.params["oauth_signature"], "hd2+IMAHkvyf/6wFKG8m7E2sh9k=");
        assert_eq!(launch.params["resource_link_id"], "ex1");
        assert_eq!(launch.params["user_id"], "alice");
        assert_eq!(launch.params["context_id"], "algo");
    }

    #[test]
    fn test_base_string_for_launch() {
        let launch = signer()
            .sign_with("alice", "ex1", "abc123", "1700000000")
            .unwrap();
        let mut params = launch.params.clone();
        params.remove("oauth_signature");

        let base = build_signature_base_string("POST", &launch.launch_url, &params);

        assert_eq!(
            base,
            "POST&https%3A%2F%2Fgrader.example.org%2Flti%2Flaunch&context_id%3Dalgo%26\
             lis_person_name_full%3Dalice%26lti_message_type%3Dbasic-lti-launch-request%26\
             lti_version%3DLTI-1p0%26oauth_callback%3Dabout%253Ablank%26\
             oauth_consumer_key%3Dsyllabus%26oauth_nonce%3Dabc123%26\
             oauth_signature_method%3DHMAC-SHA1%26oauth_timestamp%3D1700000000%26\
             oauth_version%3D1.0%26resource_link_id%3Dex1%26roles%3DLearner%26user_id%3Dalice"
        );
    }

    #[test]
    fn test_launch_params_is_valid() {
        let launch = signer().launch_params("bob", "ex2").unwrap();

        assert!(launch.validate().is_ok());
        assert_eq!(launch.params["oauth_nonce"].len(), 32);
    }

    #[test]
    fn test_launch_params_fresh_nonce() {
        let a = signer().launch_params("bob", "ex2").unwrap();
        let b = signer().launch_params("bob", "ex2").unwrap();

        assert_ne!(a.params["oauth_nonce"], b.params["oauth_nonce"]);
    }
}
