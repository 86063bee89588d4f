use crate::domain::{CommitIdentity, SHORT_HASH_LEN, TriggerTarget};
use serde::{Deserialize, Serialize};

/// Shapes the message and environment override sent with every request.
#[derive(Debug, Clone, Deserialize)]
pub struct RequestTemplate {
    /// Project name shown before `@<short hash>` in the build message.
    pub message_prefix: String,
    /// Environment variable the downstream build reads the full hash from.
    pub commit_env_var: String,
}

impl Default for RequestTemplate {
    fn default() -> Self {
        Self {
            message_prefix: "onyx-http".to_string(),
            commit_env_var: "ONYX_HTTP_COMMIT".to_string(),
        }
    }
}

/// One build request for one downstream target, built fresh for each call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildRequest {
    owner: String,
    repo: String,
    branch: String,
    commit_hash: String,
    commit_subject: String,
}

impl BuildRequest {
    pub fn new(target: &TriggerTarget, identity: &CommitIdentity) -> Self {
        Self {
            owner: target.owner().to_string(),
            repo: target.repo().to_string(),
            branch: target.branch().to_string(),
            commit_hash: identity.hash().to_string(),
            commit_subject: identity.subject().to_string(),
        }
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub fn repo(&self) -> &str {
        &self.repo
    }

    pub fn branch(&self) -> &str {
        &self.branch
    }

    /// Travis repository slug, `owner/repo`.
    pub fn slug(&self) -> String {
        format!("{}/{}", self.owner, self.repo)
    }

    /// Human readable build message, e.g. `onyx-http@abc1234 Fix bug`.
    pub fn message(&self, template: &RequestTemplate) -> String {
        format!(
            "{}@{} {}",
            template.message_prefix,
            &self.commit_hash[..SHORT_HASH_LEN],
            self.commit_subject
        )
    }

    pub fn payload(&self, template: &RequestTemplate) -> RequestPayload {
        RequestPayload {
            request: RequestDetails {
                message: self.message(template),
                branch: self.branch.clone(),
                config: RequestConfig {
                    env: format!("{}={}", template.commit_env_var, self.commit_hash),
                },
            },
        }
    }
}

/// JSON body of `POST /repo/{slug}/requests`.
#[derive(Debug, Serialize)]
pub struct RequestPayload {
    request: RequestDetails,
}

#[derive(Debug, Serialize)]
struct RequestDetails {
    message: String,
    branch: String,
    config: RequestConfig,
}

#[derive(Debug, Serialize)]
struct RequestConfig {
    env: String,
}
