//! Validated, fully resolved publish plan

use crate::config::PublishConfig;
use crate::error::FieldError;
use crate::tags::{image_references, resolve_tags};
use crate::validate::{
    validate_build_arg_key, validate_image_name, validate_label_key, validate_path,
    validate_registry,
};

/// What a run will build and push
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishPlan {
    /// Resolved tags, in template order
    pub tags: Vec<String>,
    /// `name:tag` references, one per tag
    pub images: Vec<String>,
}

impl PublishPlan {
    /// Validate `config` and resolve its tags against `version`.
    ///
    /// Checks run in a fixed order and the first failure wins: image, registry,
    /// dockerfile, context, build-arg keys, label keys, then each resolved tag.
    pub fn prepare(config: &PublishConfig, version: &str) -> Result<Self, FieldError> {
        validate_config(config)?;

        let tags =
            resolve_tags(&config.tags, version).map_err(|e| FieldError::new("tags", e))?;
        let images = image_references(&config.image, &config.registry, &tags);

        Ok(Self { tags, images })
    }
}

/// Run every configuration check except tag validation.
pub fn validate_config(config: &PublishConfig) -> Result<(), FieldError> {
    validate_image_name(&config.image).map_err(|e| FieldError::new("image", e))?;
    validate_registry(&config.registry).map_err(|e| FieldError::new("registry", e))?;
    validate_path(&config.dockerfile).map_err(|e| FieldError::new("dockerfile", e))?;
    validate_path(&config.context).map_err(|e| FieldError::new("context", e))?;

    for key in config.build_args.keys() {
        validate_build_arg_key(key).map_err(|e| FieldError::new("build_args", e))?;
    }
    for key in config.labels.keys() {
        validate_label_key(key).map_err(|e| FieldError::new("labels", e))?;
    }

    Ok(())
}
