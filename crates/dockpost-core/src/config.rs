//! Image publishing configuration
//!
//! The host hands the plugin an untyped mapping. Parsing is lenient: values of
//! the wrong type are treated as absent and fall back to their defaults, and
//! validation happens separately in [`crate::validate`].

use crate::validate::DEFAULT_REGISTRY;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;

/// Raw configuration mapping as received from the host
pub type RawConfig = Map<String, Value>;

pub const DEFAULT_DOCKERFILE: &str = "Dockerfile";
pub const DEFAULT_CONTEXT: &str = ".";
pub const USERNAME_ENV: &str = "DOCKER_USERNAME";
pub const PASSWORD_ENV: &str = "DOCKER_PASSWORD";

/// Registry credentials
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Configuration for one build-and-push run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishConfig {
    pub registry: String,
    pub image: String,
    /// Tag templates; empty means the default tag list
    pub tags: Vec<String>,
    pub dockerfile: String,
    pub context: String,
    pub build_args: BTreeMap<String, String>,
    pub platforms: Vec<String>,
    pub credentials: Credentials,
    pub push: bool,
    pub labels: BTreeMap<String, String>,
    pub cache_from: Vec<String>,
    pub no_cache: bool,
    pub target: Option<String>,
}

impl Default for PublishConfig {
    fn default() -> Self {
        Self {
            registry: DEFAULT_REGISTRY.to_string(),
            image: String::new(),
            tags: Vec::new(),
            dockerfile: DEFAULT_DOCKERFILE.to_string(),
            context: DEFAULT_CONTEXT.to_string(),
            build_args: BTreeMap::new(),
            platforms: Vec::new(),
            credentials: Credentials::default(),
            push: true,
            labels: BTreeMap::new(),
            cache_from: Vec::new(),
            no_cache: false,
            target: None,
        }
    }
}

impl PublishConfig {
    /// Build a configuration from the raw host mapping.
    ///
    /// Credentials fall back to `DOCKER_USERNAME` / `DOCKER_PASSWORD`.
    pub fn from_raw(raw: &RawConfig) -> Self {
        let parser = ConfigParser::new(raw);
        let target = parser.get_string("target", None, "");

        Self {
            registry: parser.get_string("registry", None, DEFAULT_REGISTRY),
            image: parser.get_string("image", None, ""),
            tags: parser.get_string_slice("tags"),
            dockerfile: parser.get_string("dockerfile", None, DEFAULT_DOCKERFILE),
            context: parser.get_string("context", None, DEFAULT_CONTEXT),
            build_args: parser.get_string_map("build_args"),
            platforms: parser.get_string_slice("platforms"),
            credentials: Credentials {
                username: parser.get_string("username", Some(USERNAME_ENV), ""),
                password: parser.get_string("password", Some(PASSWORD_ENV), ""),
            },
            push: parser.get_bool("push", true),
            labels: parser.get_string_map("labels"),
            cache_from: parser.get_string_slice("cache_from"),
            no_cache: parser.get_bool("no_cache", false),
            target: (!target.is_empty()).then_some(target),
        }
    }

    /// Credentials to log in with, if both username and password are set.
    pub fn login_credentials(&self) -> Option<&Credentials> {
        let creds = &self.credentials;
        (!creds.username.is_empty() && !creds.password.is_empty()).then_some(creds)
    }
}

/// Typed, lenient accessors over a raw configuration mapping
pub struct ConfigParser<'a> {
    raw: &'a RawConfig,
}

impl<'a> ConfigParser<'a> {
    pub fn new(raw: &'a RawConfig) -> Self {
        Self { raw }
    }

    /// A non-empty string value, else the non-empty environment variable, else `default`.
    pub fn get_string(&self, key: &str, env_key: Option<&str>, default: &str) -> String {
        if let Some(Value::String(value)) = self.raw.get(key)
            && !value.is_empty()
        {
            return value.clone();
        }

        if let Some(env_key) = env_key
            && let Ok(value) = std::env::var(env_key)
            && !value.is_empty()
        {
            tracing::debug!("Using {} from environment", env_key);
            return value;
        }

        default.to_string()
    }

    /// String elements of an array value. Non-string elements are skipped.
    pub fn get_string_slice(&self, key: &str) -> Vec<String> {
        match self.raw.get(key) {
            Some(Value::Array(items)) => items
                .iter()
                .filter_map(|item| item.as_str().map(str::to_string))
                .collect(),
            _ => Vec::new(),
        }
    }

    pub fn get_bool(&self, key: &str, default: bool) -> bool {
        self.raw.get(key).and_then(Value::as_bool).unwrap_or(default)
    }

    /// String entries of an object value. Entries with non-string values are skipped.
    pub fn get_string_map(&self, key: &str) -> BTreeMap<String, String> {
        match self.raw.get(key) {
            Some(Value::Object(entries)) => entries
                .iter()
                .filter_map(|(k, v)| v.as_str().map(|s| (k.clone(), s.to_string())))
                .collect(),
            _ => BTreeMap::new(),
        }
    }

    /// Every key of an object value, whatever the value types.
    pub fn get_object_keys(&self, key: &str) -> Vec<String> {
        match self.raw.get(key) {
            Some(Value::Object(entries)) => entries.keys().cloned().collect(),
            _ => Vec::new(),
        }
    }
}
