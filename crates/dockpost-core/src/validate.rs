//! Validation rules for values that end up on a docker command line
//!
//! Every check here runs before any external command is issued. The rules are
//! pure and independent of each other, so callers decide the order.

use crate::error::{Result, ValidationError};
use regex::Regex;
use std::path::Path;
use std::sync::LazyLock;

/// Registry host that is never written in front of image names.
pub const DEFAULT_REGISTRY: &str = "docker.io";

const MAX_IMAGE_LEN: usize = 256;
const MAX_TAG_LEN: usize = 128;
const MAX_REGISTRY_LEN: usize = 256;
const MAX_LABEL_KEY_LEN: usize = 256;

/// `[registry/]name`: alphanumerics, dots, dashes, underscores and slashes.
static IMAGE_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9][A-Za-z0-9._/-]*[A-Za-z0-9]$").unwrap());

static TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[A-Za-z0-9][A-Za-z0-9._-]*$").unwrap());

/// Hostname with an optional port.
static REGISTRY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9][A-Za-z0-9.-]*(:[0-9]+)?$").unwrap());

/// Environment-variable style.
static BUILD_ARG_KEY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").unwrap());

/// Reverse-DNS style, e.g. `org.opencontainers.image.source`.
static LABEL_KEY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z][A-Za-z0-9._-]*[A-Za-z0-9]$").unwrap());

/// Validate an image name (without tag).
pub fn validate_image_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(ValidationError::InvalidImage(
            "image name cannot be empty".to_string(),
        ));
    }
    if name.len() > MAX_IMAGE_LEN {
        return Err(ValidationError::InvalidImage(format!(
            "image name too long (max {} characters)",
            MAX_IMAGE_LEN
        )));
    }
    if !IMAGE_NAME.is_match(name) {
        return Err(ValidationError::InvalidImage(
            "contains disallowed characters".to_string(),
        ));
    }
    if name.contains("..") {
        return Err(ValidationError::InvalidImage(
            "image name cannot contain '..'".to_string(),
        ));
    }
    Ok(())
}

/// Validate a single, already resolved image tag.
pub fn validate_tag(tag: &str) -> Result<()> {
    let reason = if tag.is_empty() {
        "tag cannot be empty".to_string()
    } else if tag.len() > MAX_TAG_LEN {
        format!("tag too long (max {} characters)", MAX_TAG_LEN)
    } else if !TAG.is_match(tag) {
        "contains disallowed characters".to_string()
    } else {
        return Ok(());
    };

    Err(ValidationError::InvalidTag {
        tag: tag.to_string(),
        reason,
    })
}

/// Validate a registry host. Empty and the default registry are always accepted.
pub fn validate_registry(registry: &str) -> Result<()> {
    if registry.is_empty() || registry == DEFAULT_REGISTRY {
        return Ok(());
    }
    if registry.len() > MAX_REGISTRY_LEN {
        return Err(ValidationError::InvalidRegistry(format!(
            "registry URL too long (max {} characters)",
            MAX_REGISTRY_LEN
        )));
    }
    if !REGISTRY.is_match(registry) {
        return Err(ValidationError::InvalidRegistry(
            "invalid registry URL format".to_string(),
        ));
    }
    Ok(())
}

pub fn validate_build_arg_key(key: &str) -> Result<()> {
    if BUILD_ARG_KEY.is_match(key) {
        return Ok(());
    }
    Err(ValidationError::InvalidKey {
        key: key.to_string(),
        reason: "build arg keys must be alphanumeric with underscores".to_string(),
    })
}

pub fn validate_label_key(key: &str) -> Result<()> {
    let reason = if key.is_empty() {
        "label key cannot be empty".to_string()
    } else if key.len() > MAX_LABEL_KEY_LEN {
        format!("label key too long (max {} characters)", MAX_LABEL_KEY_LEN)
    } else if !LABEL_KEY.is_match(key) {
        "label keys must be alphanumeric with dots, dashes, or underscores".to_string()
    } else {
        return Ok(());
    };

    Err(ValidationError::InvalidKey {
        key: key.to_string(),
        reason,
    })
}

/// Validate a path that must stay inside the working directory.
///
/// The path is normalized lexically first, so `app/../Dockerfile` is fine while
/// `app/../../Dockerfile` is not.
pub fn validate_path(path: &str) -> Result<()> {
    if path.is_empty() {
        return Ok(());
    }

    let cleaned = clean_path(path);

    if cleaned.starts_with('/') || Path::new(&cleaned).is_absolute() {
        return Err(ValidationError::PathTraversal {
            path: path.to_string(),
            reason: "absolute paths are not allowed".to_string(),
        });
    }

    if cleaned.starts_with("..") || cleaned.contains("/..") {
        return Err(ValidationError::PathTraversal {
            path: path.to_string(),
            reason: "path traversal detected: cannot use '..' to escape working directory"
                .to_string(),
        });
    }

    Ok(())
}

/// Lexical path normalization.
///
/// Drops empty and `.` segments and folds `name/..` pairs. Leading `..` segments
/// of a relative path are kept; on a rooted path they are discarded.
/// Returns `.` for a path that normalizes to nothing.
pub fn clean_path(path: &str) -> String {
    let rooted = path.starts_with('/');
    let mut segments: Vec<&str> = Vec::new();

    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => match segments.last().copied() {
                Some(last) if last != ".." => {
                    segments.pop();
                }
                _ if rooted => {}
                _ => segments.push(".."),
            },
            other => segments.push(other),
        }
    }

    let joined = segments.join("/");
    match (rooted, joined.is_empty()) {
        (true, _) => format!("/{}", joined),
        (false, true) => ".".to_string(),
        (false, false) => joined,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_name_valid() {
        for name in ["myorg/myapp", "nginx", "ghcr.io/org/app", "my_app-2.0/x1"] {
            assert!(validate_image_name(name).is_ok(), "{name} should be valid");
        }
    }

    #[test]
    fn test_image_name_invalid() {
        assert!(matches!(
            validate_image_name(""),
            Err(ValidationError::InvalidImage(_))
        ));
        assert!(validate_image_name(&"a".repeat(257)).is_err());
        assert!(validate_image_name("myorg/myapp;rm -rf /").is_err());
        assert!(validate_image_name("myorg/myapp/").is_err());
        assert!(validate_image_name("-myapp").is_err());
        assert!(validate_image_name("$(whoami)").is_err());
    }

    #[test]
    fn test_image_name_rejects_dot_dot() {
        let err = validate_image_name("myorg/../etc").unwrap_err();
        assert_eq!(
            err,
            ValidationError::InvalidImage("image name cannot contain '..'".to_string())
        );
    }

    #[test]
    fn test_image_name_length_boundary() {
        assert!(validate_image_name(&"a".repeat(256)).is_ok());
    }

    #[test]
    fn test_tag_valid() {
        for tag in ["latest", "1.2.3", "v1.0.0-rc_1", "A", "1"] {
            assert!(validate_tag(tag).is_ok(), "{tag} should be valid");
        }
        assert!(validate_tag(&"a".repeat(128)).is_ok());
    }

    #[test]
    fn test_tag_invalid() {
        let err = validate_tag("").unwrap_err();
        assert_eq!(err.kind(), "InvalidTag");
        assert!(err.to_string().contains("tag cannot be empty"));

        assert!(validate_tag(&"a".repeat(129)).is_err());
        assert!(validate_tag(".hidden").is_err());
        assert!(validate_tag("-rc").is_err());
        assert!(validate_tag("1.0;ls").is_err());
        assert!(validate_tag("a/b").is_err());
    }

    #[test]
    fn test_registry_defaults_accepted() {
        assert!(validate_registry("").is_ok());
        assert!(validate_registry("docker.io").is_ok());
    }

    #[test]
    fn test_registry_hosts() {
        assert!(validate_registry("ghcr.io").is_ok());
        assert!(validate_registry("localhost:5000").is_ok());
        assert!(validate_registry("123456789.dkr.ecr.ap-northeast-1.amazonaws.com").is_ok());

        assert!(validate_registry("https://ghcr.io").is_err());
        assert!(validate_registry("ghcr.io/org").is_err());
        assert!(validate_registry("localhost:port").is_err());
        assert!(validate_registry("-ghcr.io").is_err());
    }

    #[test]
    fn test_registry_too_long() {
        let registry = "a".repeat(257);
        let err = validate_registry(&registry).unwrap_err();
        assert_eq!(err.kind(), "InvalidRegistry");
    }

    #[test]
    fn test_build_arg_key() {
        assert!(validate_build_arg_key("GO_VERSION").is_ok());
        assert!(validate_build_arg_key("_private").is_ok());

        let err = validate_build_arg_key("NODE-ENV").unwrap_err();
        assert_eq!(err.kind(), "InvalidKey");
        assert!(validate_build_arg_key("1ARG").is_err());
        assert!(validate_build_arg_key("").is_err());
        assert!(validate_build_arg_key("A=B").is_err());
    }

    #[test]
    fn test_label_key() {
        assert!(validate_label_key("org.opencontainers.image.source").is_ok());
        assert!(validate_label_key("com.example.my-label").is_ok());
        assert!(validate_label_key("version").is_ok());

        assert!(validate_label_key("").is_err());
        assert!(validate_label_key("_label").is_err());
        assert!(validate_label_key("label.").is_err());
        assert!(validate_label_key("a").is_err());
        assert!(validate_label_key(&format!("a{}", "b".repeat(256))).is_err());
    }

    #[test]
    fn test_path_accepts_relative() {
        for path in ["", ".", "Dockerfile", "./app", "docker/Dockerfile.prod", "app/../Dockerfile"] {
            assert!(validate_path(path).is_ok(), "{path} should be accepted");
        }
    }

    #[test]
    fn test_path_rejects_absolute() {
        let err = validate_path("/etc/passwd").unwrap_err();
        assert_eq!(err.kind(), "PathTraversal");
        assert!(err.to_string().contains("absolute paths are not allowed"));
    }

    #[test]
    fn test_path_rejects_traversal() {
        for path in ["..", "../Dockerfile", "app/../../secret", "./../x"] {
            let err = validate_path(path).unwrap_err();
            assert!(
                err.to_string().contains("path traversal detected"),
                "{path} should be rejected"
            );
        }
    }

    #[test]
    fn test_clean_path() {
        assert_eq!(clean_path("./app/"), "app");
        assert_eq!(clean_path("a//b/./c"), "a/b/c");
        assert_eq!(clean_path("a/b/../c"), "a/c");
        assert_eq!(clean_path("a/../.."), "..");
        assert_eq!(clean_path("/../etc"), "/etc");
        assert_eq!(clean_path("./"), ".");
        assert_eq!(clean_path("/"), "/");
    }
}
