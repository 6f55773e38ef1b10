use colored::Colorize;
use dockpost_plugin::{ExecuteRequest, ExecuteResponse, Hook, Plugin, ReleaseContext};
use std::path::PathBuf;

pub async fn handle(
    plugin: &impl Plugin,
    config_path: Option<PathBuf>,
    version: String,
    hook: Hook,
    dry_run: bool,
) -> anyhow::Result<()> {
    let config = super::load_config(config_path)?;

    if dry_run {
        println!("{}", "Dry run: no docker commands will be executed".yellow());
    }
    println!("Running {} for {}", hook.to_string().cyan(), version.cyan());

    let request = ExecuteRequest {
        hook,
        config,
        context: ReleaseContext::new(version),
        dry_run,
    };

    // Dropping the execute future kills the running docker process
    let response = tokio::select! {
        response = plugin.execute(request) => response,
        _ = tokio::signal::ctrl_c() => {
            eprintln!();
            eprintln!("{}", "✗ Cancelled".red().bold());
            std::process::exit(130);
        }
    };

    report(&response);
    if !response.success {
        std::process::exit(1);
    }

    Ok(())
}

fn report(response: &ExecuteResponse) {
    if !response.success {
        eprintln!();
        eprintln!(
            "{} {}",
            "✗".red().bold(),
            response.error_kind.as_deref().unwrap_or("Error").red().bold()
        );
        if let Some(error) = &response.error {
            eprintln!("  {}", error);
        }
        return;
    }

    println!("{} {}", "✓".green().bold(), response.message.green());
    if let Some(images) = response.outputs.get("images").and_then(|v| v.as_array()) {
        for image in images.iter().filter_map(|v| v.as_str()) {
            println!("  - {}", image.cyan());
        }
    }
}
