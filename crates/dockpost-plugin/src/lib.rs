//! dockpost plugin
//!
//! Release hook plugin that builds a Docker image and pushes it to a registry
//! once a release has been published.
//!
//! ```no_run
//! use dockpost_plugin::{DockerPlugin, ExecuteRequest, Hook, Plugin, ProcessExecutor, ReleaseContext};
//! use std::sync::Arc;
//!
//! # async fn run(config: dockpost_core::RawConfig) {
//! let plugin = DockerPlugin::new(Arc::new(ProcessExecutor::new()));
//! let response = plugin
//!     .execute(ExecuteRequest {
//!         hook: Hook::PostPublish,
//!         config,
//!         context: ReleaseContext::new("v1.2.3"),
//!         dry_run: false,
//!     })
//!     .await;
//! assert!(response.success, "{:?}", response.error);
//! # }
//! ```

pub mod contract;
pub mod docker;
pub mod error;
pub mod executor;
pub mod plugin;
pub mod schema;

pub use contract::{
    ExecuteRequest, ExecuteResponse, FieldMessage, Hook, Plugin, PluginInfo, ReleaseContext,
    ValidateResponse, ValidationBuilder,
};
pub use docker::DockerCli;
pub use error::{ExecError, PublishError, Result};
pub use executor::{CommandExecutor, ProcessExecutor, RecordedCall, RecordingExecutor};
pub use plugin::{DockerPlugin, PLUGIN_NAME};
pub use schema::config_schema;
