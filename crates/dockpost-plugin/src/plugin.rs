//! Docker image plugin
//!
//! On `post-publish` it validates the configuration, resolves tags for the
//! released version, then runs login → build → push. The first failing step
//! ends the run; earlier steps are not undone.

use crate::contract::{
    ExecuteRequest, ExecuteResponse, Hook, Plugin, PluginInfo, ReleaseContext, ValidateResponse,
    ValidationBuilder,
};
use crate::docker::DockerCli;
use crate::error::{PublishError, Result};
use crate::executor::CommandExecutor;
use crate::schema::config_schema;
use async_trait::async_trait;
use dockpost_core::config::{DEFAULT_CONTEXT, DEFAULT_DOCKERFILE};
use dockpost_core::{
    ConfigParser, DEFAULT_REGISTRY, PublishConfig, PublishPlan, RawConfig, validate_build_arg_key,
    validate_image_name, validate_label_key, validate_path, validate_registry, validate_tag,
};
use std::sync::Arc;

pub const PLUGIN_NAME: &str = "docker";

/// Builds and pushes Docker images after a release is published
pub struct DockerPlugin {
    docker: DockerCli,
}

impl DockerPlugin {
    pub fn new(executor: Arc<dyn CommandExecutor>) -> Self {
        Self {
            docker: DockerCli::new(executor),
        }
    }

    /// Validate, resolve and (unless `dry_run`) build and push.
    pub async fn publish(
        &self,
        config: &PublishConfig,
        release: &ReleaseContext,
        dry_run: bool,
    ) -> Result<ExecuteResponse> {
        let plan = PublishPlan::prepare(config, &release.version)?;
        tracing::debug!("Resolved tags: {:?}", plan.tags);

        if dry_run {
            tracing::info!("Dry run: would build {}", plan.images.join(", "));
            return Ok(ExecuteResponse::ok("Would build and push Docker image")
                .with_output("image", config.image.as_str())
                .with_output("tags", plan.tags.clone())
                .with_output("images", plan.images.clone())
                .with_output("registry", config.registry.as_str()));
        }

        if let Some(credentials) = config.login_credentials() {
            tracing::info!("Logging in to {} as {}", registry_label(&config.registry), credentials.username);
            self.docker
                .login(&config.registry, credentials)
                .await
                .map_err(PublishError::LoginFailed)?;
        }

        tracing::info!("Building {}", plan.images.join(", "));
        self.docker
            .build(config, &plan.images, &release.version)
            .await
            .map_err(PublishError::BuildFailed)?;

        if config.push {
            for image in &plan.images {
                tracing::info!("Pushing {}", image);
                self.docker
                    .push(image)
                    .await
                    .map_err(|source| PublishError::PushFailed {
                        image: image.clone(),
                        source,
                    })?;
            }
        }

        let message = if config.push {
            format!("Built and pushed Docker image with {} tags", plan.tags.len())
        } else {
            format!("Built Docker image with {} tags", plan.tags.len())
        };

        Ok(ExecuteResponse::ok(message)
            .with_output("image", config.image.as_str())
            .with_output("tags", plan.tags)
            .with_output("images", plan.images)
            .with_output("pushed", config.push))
    }
}

fn registry_label(registry: &str) -> &str {
    if registry.is_empty() { DEFAULT_REGISTRY } else { registry }
}

#[async_trait]
impl Plugin for DockerPlugin {
    fn info(&self) -> PluginInfo {
        PluginInfo {
            name: PLUGIN_NAME.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            description: "Build and push Docker images to container registries".to_string(),
            author: env!("CARGO_PKG_AUTHORS").to_string(),
            hooks: vec![Hook::PostPublish],
            config_schema: config_schema(),
        }
    }

    /// Report every problem at once, one entry per field.
    ///
    /// Tags containing `{{` depend on the release version and are only checked
    /// at execution time.
    fn validate(&self, config: &RawConfig) -> ValidateResponse {
        let mut vb = ValidationBuilder::new();
        let parser = ConfigParser::new(config);

        let image = parser.get_string("image", None, "");
        if image.is_empty() {
            vb.add_error("image", "Docker image name is required");
        } else if let Err(e) = validate_image_name(&image) {
            vb.add_error("image", e.reason());
        }

        let registry = parser.get_string("registry", None, DEFAULT_REGISTRY);
        if let Err(e) = validate_registry(&registry) {
            vb.add_error("registry", e.reason());
        }

        let dockerfile = parser.get_string("dockerfile", None, DEFAULT_DOCKERFILE);
        if let Err(e) = validate_path(&dockerfile) {
            vb.add_error("dockerfile", e.reason());
        }

        let context = parser.get_string("context", None, DEFAULT_CONTEXT);
        if let Err(e) = validate_path(&context) {
            vb.add_error("context", e.reason());
        }

        for key in parser.get_object_keys("build_args") {
            if let Err(e) = validate_build_arg_key(&key) {
                vb.add_error("build_args", format!("invalid key '{}': {}", key, e.reason()));
            }
        }

        for key in parser.get_object_keys("labels") {
            if let Err(e) = validate_label_key(&key) {
                vb.add_error("labels", format!("invalid key '{}': {}", key, e.reason()));
            }
        }

        for tag in parser.get_string_slice("tags") {
            if tag.contains("{{") {
                continue;
            }
            if let Err(e) = validate_tag(&tag) {
                vb.add_error("tags", format!("invalid tag '{}': {}", tag, e.reason()));
            }
        }

        vb.build()
    }

    async fn execute(&self, request: ExecuteRequest) -> ExecuteResponse {
        match request.hook {
            Hook::PostPublish => {
                let config = PublishConfig::from_raw(&request.config);
                match self.publish(&config, &request.context, request.dry_run).await {
                    Ok(response) => response,
                    Err(e) => {
                        tracing::error!("{}", e);
                        ExecuteResponse::failed(e.kind(), e.to_string())
                    }
                }
            }
            other => ExecuteResponse::ok(format!("Hook {} not handled", other)),
        }
    }
}
