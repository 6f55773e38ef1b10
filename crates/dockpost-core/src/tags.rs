//! Tag templating
//!
//! Expands `{{version}}`, `{{major}}`, `{{minor}}` and `{{patch}}` in tag
//! templates against a release version, and builds the final image references.

use crate::error::{Result, ValidationError};
use crate::validate::{DEFAULT_REGISTRY, validate_tag};

/// Tags applied when the configuration does not list any.
pub const DEFAULT_TAGS: [&str; 2] = ["{{version}}", "latest"];

/// Version components available to tag templates.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VersionParts {
    /// Version with the leading `v` stripped
    pub version: String,
    pub major: String,
    pub minor: String,
    pub patch: String,
}

impl VersionParts {
    /// Split a release version such as `v1.2.3`.
    ///
    /// Missing components are empty: `v1.2` has an empty patch.
    pub fn parse(raw: &str) -> Self {
        let version = raw.strip_prefix('v').unwrap_or(raw);
        let mut parts = version.split('.');
        let mut next = || parts.next().unwrap_or_default().to_string();

        let major = next();
        let minor = next();
        let patch = next();

        Self {
            version: version.to_string(),
            major,
            minor,
            patch,
        }
    }

    fn lookup(&self, placeholder: &str) -> Option<&str> {
        match placeholder {
            "version" => Some(&self.version),
            "major" => Some(&self.major),
            "minor" => Some(&self.minor),
            "patch" => Some(&self.patch),
            _ => None,
        }
    }

    /// Substitute every known placeholder in `template`.
    ///
    /// Single left-to-right pass: substituted text is never scanned again, and
    /// unknown `{{...}}` sequences are copied as-is.
    pub fn render(&self, template: &str) -> String {
        let mut result = String::with_capacity(template.len());
        let mut rest = template;

        while let Some(start) = rest.find("{{") {
            result.push_str(&rest[..start]);
            let after = &rest[start + 2..];

            let replaced = after.find("}}").and_then(|end| {
                self.lookup(&after[..end])
                    .map(|value| (value, &after[end + 2..]))
            });

            match replaced {
                Some((value, remainder)) => {
                    result.push_str(value);
                    rest = remainder;
                }
                None => {
                    result.push('{');
                    rest = &rest[start + 1..];
                }
            }
        }

        result.push_str(rest);
        result
    }
}

/// Resolve the configured tag templates for a release version.
///
/// An empty template list means [`DEFAULT_TAGS`]. Templates that render to an
/// empty string are dropped; every other result must be a valid tag, and at
/// least one tag must remain.
pub fn resolve_tags(templates: &[String], version: &str) -> Result<Vec<String>> {
    let parts = VersionParts::parse(version);

    let defaults: Vec<String>;
    let templates = if templates.is_empty() {
        defaults = DEFAULT_TAGS.iter().map(|t| t.to_string()).collect();
        &defaults
    } else {
        templates
    };

    let mut resolved = Vec::with_capacity(templates.len());
    for template in templates {
        let tag = parts.render(template);
        if tag.is_empty() {
            tracing::debug!("Dropping tag template '{}': resolved to empty", template);
            continue;
        }
        validate_tag(&tag)?;
        resolved.push(tag);
    }

    if resolved.is_empty() {
        return Err(ValidationError::InvalidTag {
            tag: templates.join(","),
            reason: format!("no tags resolved for version {}", version),
        });
    }

    Ok(resolved)
}

/// Image name as it is addressed on the registry.
///
/// The registry is prepended unless it is empty or the default registry.
pub fn qualified_image_name(image: &str, registry: &str) -> String {
    if registry.is_empty() || registry == DEFAULT_REGISTRY {
        image.to_string()
    } else {
        format!("{}/{}", registry, image)
    }
}

/// Full `name:tag` references, in tag order.
pub fn image_references(image: &str, registry: &str, tags: &[String]) -> Vec<String> {
    let name = qualified_image_name(image, registry);
    tags.iter().map(|tag| format!("{}:{}", name, tag)).collect()
}
