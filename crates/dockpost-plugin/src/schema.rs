//! JSON Schema of the plugin configuration, handed to the host for config-file
//! validation and autocompletion

use dockpost_core::config::{DEFAULT_CONTEXT, DEFAULT_DOCKERFILE};
use dockpost_core::{DEFAULT_REGISTRY, DEFAULT_TAGS};
use schemars::JsonSchema;
use std::collections::BTreeMap;

// Shape only. Parsing goes through `PublishConfig::from_raw`.
/// Docker plugin configuration
///
/// Build and push settings for the post-publish hook.
#[derive(JsonSchema)]
#[allow(dead_code)]
struct DockerConfig {
    /// Container registry host
    #[serde(default = "default_registry")]
    registry: String,

    /// Image name (e.g. user/image)
    image: String,

    /// Tags to apply; supports {{version}}, {{major}}, {{minor}} and {{patch}}
    #[serde(default = "default_tags")]
    tags: Vec<String>,

    /// Dockerfile path, relative to the working directory
    #[serde(default = "default_dockerfile")]
    dockerfile: String,

    /// Build context, relative to the working directory
    #[serde(default = "default_context")]
    context: String,

    /// Build arguments
    #[serde(default)]
    build_args: BTreeMap<String, String>,

    /// Target platforms (e.g. linux/amd64)
    #[serde(default)]
    platforms: Vec<String>,

    /// Registry username (or use DOCKER_USERNAME env)
    #[serde(default)]
    username: String,

    /// Registry password (or use DOCKER_PASSWORD env)
    #[serde(default)]
    password: String,

    /// Push after building
    #[serde(default = "default_push")]
    push: bool,

    /// Image labels
    #[serde(default)]
    labels: BTreeMap<String, String>,

    /// Cache source images
    #[serde(default)]
    cache_from: Vec<String>,

    /// Disable build cache
    #[serde(default)]
    no_cache: bool,

    /// Target build stage
    #[serde(default)]
    target: String,
}

fn default_registry() -> String {
    DEFAULT_REGISTRY.to_string()
}

fn default_tags() -> Vec<String> {
    DEFAULT_TAGS.iter().map(|t| t.to_string()).collect()
}

fn default_dockerfile() -> String {
    DEFAULT_DOCKERFILE.to_string()
}

fn default_context() -> String {
    DEFAULT_CONTEXT.to_string()
}

fn default_push() -> bool {
    true
}

/// The configuration schema as a JSON value.
pub fn config_schema() -> serde_json::Value {
    let schema = schemars::schema_for!(DockerConfig);
    schema.to_value()
}
