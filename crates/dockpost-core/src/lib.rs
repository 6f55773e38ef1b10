//! dockpost core
//!
//! Configuration model, validation rules and tag templating for publishing a
//! container image after a release. Nothing in this crate runs external
//! commands; see `dockpost-plugin` for that.

pub mod config;
pub mod error;
pub mod plan;
pub mod tags;
pub mod validate;

pub use config::{ConfigParser, Credentials, PublishConfig, RawConfig};
pub use error::{FieldError, Result, ValidationError};
pub use plan::{PublishPlan, validate_config};
pub use tags::{
    DEFAULT_TAGS, VersionParts, image_references, qualified_image_name, resolve_tags,
};
pub use validate::{
    DEFAULT_REGISTRY, validate_build_arg_key, validate_image_name, validate_label_key,
    validate_path, validate_registry, validate_tag,
};
