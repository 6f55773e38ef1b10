use anyhow::Context;
use dockpost_plugin::{ExecuteRequest, Plugin};
use std::io::Read;

/// Read an `ExecuteRequest` from `input` (a path, or `-` for stdin), run it
/// and print the response as JSON on stdout.
pub async fn handle(plugin: &impl Plugin, input: &str) -> anyhow::Result<()> {
    let body = if input == "-" {
        let mut body = String::new();
        std::io::stdin()
            .read_to_string(&mut body)
            .context("failed to read request from stdin")?;
        body
    } else {
        std::fs::read_to_string(input)
            .with_context(|| format!("failed to read request file {}", input))?
    };

    let request: ExecuteRequest =
        serde_json::from_str(&body).context("invalid execute request")?;
    tracing::debug!("Request for hook {}", request.hook);

    let response = plugin.execute(request).await;
    println!("{}", serde_json::to_string_pretty(&response)?);

    if !response.success {
        std::process::exit(1);
    }

    Ok(())
}
