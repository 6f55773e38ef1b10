//! Plugin contract with the release host
//!
//! These are the data types exchanged with the host runtime and the trait a
//! plugin implements. They serialize to plain JSON so a host can drive the
//! plugin over any transport.

use async_trait::async_trait;
use dockpost_core::RawConfig;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Release lifecycle hooks a plugin can subscribe to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Hook {
    PreInit,
    PostInit,
    PrePlan,
    PostPlan,
    PreVersion,
    PostVersion,
    PreNotes,
    PostNotes,
    PreApprove,
    PostApprove,
    PrePublish,
    PostPublish,
    OnSuccess,
    OnError,
}

impl Hook {
    pub const ALL: [Hook; 14] = [
        Hook::PreInit,
        Hook::PostInit,
        Hook::PrePlan,
        Hook::PostPlan,
        Hook::PreVersion,
        Hook::PostVersion,
        Hook::PreNotes,
        Hook::PostNotes,
        Hook::PreApprove,
        Hook::PostApprove,
        Hook::PrePublish,
        Hook::PostPublish,
        Hook::OnSuccess,
        Hook::OnError,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Hook::PreInit => "pre-init",
            Hook::PostInit => "post-init",
            Hook::PrePlan => "pre-plan",
            Hook::PostPlan => "post-plan",
            Hook::PreVersion => "pre-version",
            Hook::PostVersion => "post-version",
            Hook::PreNotes => "pre-notes",
            Hook::PostNotes => "post-notes",
            Hook::PreApprove => "pre-approve",
            Hook::PostApprove => "post-approve",
            Hook::PrePublish => "pre-publish",
            Hook::PostPublish => "post-publish",
            Hook::OnSuccess => "on-success",
            Hook::OnError => "on-error",
        }
    }
}

impl fmt::Display for Hook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Hook {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Hook::ALL
            .into_iter()
            .find(|hook| hook.as_str() == s)
            .ok_or_else(|| format!("unknown hook: {}", s))
    }
}

/// Release metadata supplied by the host
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReleaseContext {
    /// Version being released, e.g. `v1.2.3`
    pub version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous_version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branch: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub commit_sha: Option<String>,
}

impl ReleaseContext {
    pub fn new(version: impl Into<String>) -> Self {
        Self {
            version: version.into(),
            ..Default::default()
        }
    }
}

/// One hook invocation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecuteRequest {
    pub hook: Hook,
    #[serde(default)]
    pub config: RawConfig,
    pub context: ReleaseContext,
    #[serde(default)]
    pub dry_run: bool,
}

/// Outcome of a hook invocation
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExecuteResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Stable error kind, e.g. `InvalidTag` or `PushFailed`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_kind: Option<String>,
    #[serde(default, skip_serializing_if = "serde_json::Map::is_empty")]
    pub outputs: serde_json::Map<String, serde_json::Value>,
}

impl ExecuteResponse {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            ..Default::default()
        }
    }

    pub fn failed(kind: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(error.into()),
            error_kind: Some(kind.into()),
            ..Default::default()
        }
    }

    pub fn with_output(mut self, key: &str, value: impl Into<serde_json::Value>) -> Self {
        self.outputs.insert(key.to_string(), value.into());
        self
    }
}

/// A validation problem tied to a configuration field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldMessage {
    pub field: String,
    pub message: String,
}

/// Result of validating a configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidateResponse {
    pub valid: bool,
    #[serde(default)]
    pub errors: Vec<FieldMessage>,
}

impl ValidateResponse {
    /// Messages recorded for `field`.
    pub fn errors_for<'a>(&'a self, field: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.errors
            .iter()
            .filter(move |e| e.field == field)
            .map(|e| e.message.as_str())
    }
}

/// Collects field errors into a [`ValidateResponse`]
#[derive(Debug, Default)]
pub struct ValidationBuilder {
    errors: Vec<FieldMessage>,
}

impl ValidationBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_error(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.push(FieldMessage {
            field: field.into(),
            message: message.into(),
        });
    }

    pub fn build(self) -> ValidateResponse {
        ValidateResponse {
            valid: self.errors.is_empty(),
            errors: self.errors,
        }
    }
}

/// Plugin metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PluginInfo {
    pub name: String,
    pub version: String,
    pub description: String,
    pub author: String,
    pub hooks: Vec<Hook>,
    /// JSON Schema of the configuration mapping
    pub config_schema: serde_json::Value,
}

/// A release plugin as seen by the host
#[async_trait]
pub trait Plugin: Send + Sync {
    fn info(&self) -> PluginInfo;

    /// Check a raw configuration without running anything.
    fn validate(&self, config: &RawConfig) -> ValidateResponse;

    /// Run the plugin for one hook.
    ///
    /// Failures are reported in the response, never as a panic.
    async fn execute(&self, request: ExecuteRequest) -> ExecuteResponse;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_hook_round_trips_as_kebab_case() {
        assert_eq!(
            serde_json::to_value(Hook::PostPublish).unwrap(),
            json!("post-publish")
        );
        assert_eq!("on-error".parse::<Hook>().unwrap(), Hook::OnError);
        for hook in Hook::ALL {
            let value = serde_json::to_value(hook).unwrap();
            assert_eq!(value, json!(hook.to_string()));
        }
    }

    #[test]
    fn test_hook_unknown() {
        assert!("post_publish".parse::<Hook>().is_err());
    }

    #[test]
    fn test_execute_request_from_json() {
        let request: ExecuteRequest = serde_json::from_value(json!({
            "hook": "post-publish",
            "config": { "image": "myorg/myapp" },
            "context": { "version": "v1.2.3", "branch": "main" },
        }))
        .unwrap();

        assert_eq!(request.hook, Hook::PostPublish);
        assert_eq!(request.config["image"], "myorg/myapp");
        assert_eq!(request.context.version, "v1.2.3");
        assert_eq!(request.context.branch.as_deref(), Some("main"));
        assert!(!request.dry_run);
    }

    #[test]
    fn test_execute_response_serialization_skips_empty() {
        let value = serde_json::to_value(ExecuteResponse::ok("done")).unwrap();
        assert_eq!(value, json!({ "success": true, "message": "done" }));

        let value =
            serde_json::to_value(ExecuteResponse::failed("BuildFailed", "boom")).unwrap();
        assert_eq!(
            value,
            json!({ "success": false, "error": "boom", "error_kind": "BuildFailed" })
        );
    }

    #[test]
    fn test_validation_builder() {
        assert!(ValidationBuilder::new().build().valid);

        let mut builder = ValidationBuilder::new();
        builder.add_error("image", "Docker image name is required");
        builder.add_error("tags", "invalid tag");
        let response = builder.build();

        assert!(!response.valid);
        assert_eq!(
            response.errors_for("image").collect::<Vec<_>>(),
            vec!["Docker image name is required"]
        );
        assert_eq!(response.errors_for("registry").count(), 0);
    }
}
