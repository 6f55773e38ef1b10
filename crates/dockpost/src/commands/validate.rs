use colored::Colorize;
use dockpost_core::PublishConfig;
use dockpost_plugin::Plugin;
use std::path::PathBuf;

pub fn handle(plugin: &impl Plugin, config_path: Option<PathBuf>) -> anyhow::Result<()> {
    println!("{}", "Validating configuration...".blue());
    let raw = super::load_config(config_path)?;

    let response = plugin.validate(&raw);
    if !response.valid {
        eprintln!();
        eprintln!("{}", "✗ Configuration errors".red().bold());
        for error in &response.errors {
            eprintln!("  {}: {}", error.field.yellow(), error.message);
        }
        std::process::exit(1);
    }

    let config = PublishConfig::from_raw(&raw);
    println!("{}", "✓ Configuration is valid".green().bold());
    println!();
    println!("Summary:");
    println!("  image: {}", config.image.cyan());
    println!("  registry: {}", config.registry);
    if config.tags.is_empty() {
        println!("  tags: (default)");
    } else {
        println!("  tags: {}", config.tags.join(", "));
    }
    println!("  push: {}", config.push);

    Ok(())
}
