use colored::Colorize;
use dockpost_plugin::Plugin;

pub fn handle(plugin: &impl Plugin, json: bool) -> anyhow::Result<()> {
    let info = plugin.info();

    if json {
        println!("{}", serde_json::to_string_pretty(&info)?);
        return Ok(());
    }

    println!("{} {}", info.name.cyan().bold(), info.version);
    println!("{}", info.description);
    println!("Author: {}", info.author);

    let hooks: Vec<String> = info.hooks.iter().map(|h| h.to_string()).collect();
    println!("Hooks: {}", hooks.join(", "));

    let required: Vec<&str> = info.config_schema["required"]
        .as_array()
        .map(|items| items.iter().filter_map(|v| v.as_str()).collect())
        .unwrap_or_default();

    if let Some(properties) = info.config_schema["properties"].as_object() {
        println!();
        println!("Options:");
        for (name, property) in properties {
            let description = property["description"].as_str().unwrap_or("");
            let marker = if required.contains(&name.as_str()) {
                " (required)".yellow().to_string()
            } else {
                String::new()
            };
            println!("  {}{}  {}", name.cyan(), marker, description);
        }
    }

    Ok(())
}
