//! docker CLI wrapper
//!
//! Builds the argument lists for `docker login`, `docker build` and
//! `docker push` and runs them through a [`CommandExecutor`]. Arguments are
//! passed as a list, never through a shell.

use crate::error::ExecError;
use crate::executor::CommandExecutor;
use dockpost_core::config::{DEFAULT_CONTEXT, DEFAULT_DOCKERFILE};
use dockpost_core::{Credentials, DEFAULT_REGISTRY, PublishConfig};
use std::sync::Arc;

pub const DOCKER_PROGRAM: &str = "docker";

/// docker CLI wrapper
#[derive(Clone)]
pub struct DockerCli {
    executor: Arc<dyn CommandExecutor>,
}

impl DockerCli {
    pub fn new(executor: Arc<dyn CommandExecutor>) -> Self {
        Self { executor }
    }

    async fn run(&self, args: Vec<String>, stdin: Option<&str>) -> Result<(), ExecError> {
        tracing::debug!("Running: {} {}", DOCKER_PROGRAM, args.join(" "));
        self.executor.run(DOCKER_PROGRAM, &args, stdin).await
    }

    /// Log in to `registry`, passing the password on stdin.
    pub async fn login(&self, registry: &str, credentials: &Credentials) -> Result<(), ExecError> {
        let args = login_args(registry, &credentials.username);
        self.run(args, Some(&credentials.password)).await
    }

    /// Build once, tagging the image with every reference in `images`.
    pub async fn build(
        &self,
        config: &PublishConfig,
        images: &[String],
        version: &str,
    ) -> Result<(), ExecError> {
        self.run(build_args(config, images, version), None).await
    }

    pub async fn push(&self, image: &str) -> Result<(), ExecError> {
        self.run(push_args(image), None).await
    }
}

/// `login [<registry>] -u <username> --password-stdin`
///
/// The registry is left out for Docker Hub.
pub fn login_args(registry: &str, username: &str) -> Vec<String> {
    let mut args = vec!["login".to_string()];
    if !registry.is_empty() && registry != DEFAULT_REGISTRY {
        args.push(registry.to_string());
    }
    args.extend([
        "-u".to_string(),
        username.to_string(),
        "--password-stdin".to_string(),
    ]);
    args
}

/// `build` arguments for `config`.
///
/// Build args and labels come out in key order, so the same configuration always
/// produces the same command line. `VERSION` is always passed with the raw
/// release version.
pub fn build_args(config: &PublishConfig, images: &[String], version: &str) -> Vec<String> {
    let mut args = vec!["build".to_string()];

    for image in images {
        args.push("-t".to_string());
        args.push(image.clone());
    }

    let dockerfile = non_empty_or(&config.dockerfile, DEFAULT_DOCKERFILE);
    args.push("-f".to_string());
    args.push(dockerfile.to_string());

    for (key, value) in &config.build_args {
        args.push("--build-arg".to_string());
        args.push(format!("{}={}", key, value));
    }
    args.push("--build-arg".to_string());
    args.push(format!("VERSION={}", version));

    if !config.platforms.is_empty() {
        args.push("--platform".to_string());
        args.push(config.platforms.join(","));
    }

    for (key, value) in &config.labels {
        args.push("--label".to_string());
        args.push(format!("{}={}", key, value));
    }

    for source in &config.cache_from {
        args.push("--cache-from".to_string());
        args.push(source.clone());
    }

    if config.no_cache {
        args.push("--no-cache".to_string());
    }

    if let Some(target) = config.target.as_deref().filter(|t| !t.is_empty()) {
        args.push("--target".to_string());
        args.push(target.to_string());
    }

    args.push(non_empty_or(&config.context, DEFAULT_CONTEXT).to_string());
    args
}

pub fn push_args(image: &str) -> Vec<String> {
    vec!["push".to_string(), image.to_string()]
}

fn non_empty_or<'a>(value: &'a str, default: &'a str) -> &'a str {
    if value.is_empty() { default } else { value }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::executor::RecordingExecutor;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    /// True if `flag` is immediately followed by `value` somewhere in `args`
    fn contains_arg(args: &[String], flag: &str, value: &str) -> bool {
        args.windows(2).any(|w| w[0] == flag && w[1] == value)
    }

    #[test]
    fn test_login_args_default_registry() {
        let expected = strings(&["login", "-u", "user", "--password-stdin"]);
        assert_eq!(login_args("docker.io", "user"), expected);
        assert_eq!(login_args("", "user"), expected);
    }

    #[test]
    fn test_login_args_custom_registry() {
        assert_eq!(
            login_args("ghcr.io", "user"),
            strings(&["login", "ghcr.io", "-u", "user", "--password-stdin"])
        );
    }

    #[test]
    fn test_build_args_basic() {
        let config = PublishConfig::default();
        let args = build_args(&config, &strings(&["myapp:v1.0.0"]), "v1.0.0");

        assert_eq!(
            args,
            strings(&[
                "build",
                "-t",
                "myapp:v1.0.0",
                "-f",
                "Dockerfile",
                "--build-arg",
                "VERSION=v1.0.0",
                "."
            ])
        );
    }

    #[test]
    fn test_build_args_empty_paths_use_defaults() {
        let config = PublishConfig {
            dockerfile: String::new(),
            context: String::new(),
            ..Default::default()
        };
        let args = build_args(&config, &strings(&["myapp:latest"]), "v1.0.0");
        assert!(contains_arg(&args, "-f", "Dockerfile"));
        assert_eq!(args.last().unwrap(), ".");
    }

    #[test]
    fn test_build_args_all_options_in_order() {
        let mut config = PublishConfig {
            dockerfile: "Dockerfile.prod".to_string(),
            context: "./app".to_string(),
            platforms: strings(&["linux/amd64", "linux/arm64"]),
            cache_from: strings(&["myapp:cache"]),
            no_cache: true,
            target: Some("production".to_string()),
            ..Default::default()
        };
        config.build_args.insert("NODE_ENV".to_string(), "production".to_string());
        config.build_args.insert("GO_VERSION".to_string(), "1.22".to_string());
        config.labels.insert("version".to_string(), "1.0.0".to_string());
        config.labels.insert("org.opencontainers.image.source".to_string(), "https://example.com/repo".to_string());

        let args = build_args(&config, &strings(&["myapp:1.0.0", "myapp:latest"]), "v1.0.0");

        assert_eq!(
            args,
            strings(&[
                "build",
                "-t",
                "myapp:1.0.0",
                "-t",
                "myapp:latest",
                "-f",
                "Dockerfile.prod",
                "--build-arg",
                "GO_VERSION=1.22",
                "--build-arg",
                "NODE_ENV=production",
                "--build-arg",
                "VERSION=v1.0.0",
                "--platform",
                "linux/amd64,linux/arm64",
                "--label",
                "org.opencontainers.image.source=https://example.com/repo",
                "--label",
                "version=1.0.0",
                "--cache-from",
                "myapp:cache",
                "--no-cache",
                "--target",
                "production",
                "./app",
            ])
        );
    }

    #[test]
    fn test_push_args() {
        assert_eq!(push_args("myapp:v1.0.0"), strings(&["push", "myapp:v1.0.0"]));
    }

    #[tokio::test]
    async fn test_login_sends_password_on_stdin() {
        let executor = Arc::new(RecordingExecutor::new());
        let docker = DockerCli::new(executor.clone());
        let credentials = Credentials {
            username: "user".to_string(),
            password: "pass".to_string(),
        };

        docker.login("ghcr.io", &credentials).await.unwrap();

        let calls = executor.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].program, "docker");
        assert_eq!(calls[0].stdin.as_deref(), Some("pass"));
        assert!(!calls[0].args.contains(&"pass".to_string()));
    }

    #[tokio::test]
    async fn test_push_error_is_returned() {
        let executor = Arc::new(RecordingExecutor::failing_on(1, "denied: requested access"));
        let docker = DockerCli::new(executor.clone());

        let err = docker.push("myapp:v1.0.0").await.unwrap_err();
        assert_eq!(err.to_string(), "denied: requested access");
        assert_eq!(executor.calls()[0].args, strings(&["push", "myapp:v1.0.0"]));
    }
}
