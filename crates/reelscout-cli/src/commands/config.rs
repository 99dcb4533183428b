use crate::output::{Output, OutputFormat};
use crate::ConfigCommands;
use color_eyre::eyre::eyre;
use color_eyre::Result;
use comfy_table::{Cell, Table};
use movie_browser_config::{Config, PathManager};
use owo_colors::OwoColorize;
use serde_json::json;
use std::path::Path;

pub fn run_config(cmd: ConfigCommands, output: &Output) -> Result<()> {
    let path_manager = PathManager::default();
    match cmd {
        ConfigCommands::Show => show_config(&path_manager, output),
        ConfigCommands::Init { force } => {
            let config_file = path_manager.config_file();
            if init_config(&config_file, force)? {
                path_manager
                    .ensure_directories()
                    .map_err(|e| eyre!("Failed to create directories: {}", e))?;
                output.success(format!("Wrote default configuration to {}", config_file.display()));
            } else {
                output.warn(format!(
                    "Configuration already exists at {} (use --force to overwrite)",
                    config_file.display()
                ));
            }
            Ok(())
        }
    }
}

/// Write defaults to `path`. Returns false when a file exists and `force` is off.
fn init_config(path: &Path, force: bool) -> Result<bool> {
    if path.exists() && !force {
        return Ok(false);
    }
    Config::default()
        .save_to_file(path)
        .map_err(|e| eyre!("Failed to write config to {}: {}", path.display(), e))?;
    Ok(true)
}

fn show_config(path_manager: &PathManager, output: &Output) -> Result<()> {
    let config_file = path_manager.config_file();
    let exists = config_file.exists();
    let config = Config::load_or_default(&config_file)
        .map_err(|e| eyre!("Failed to load config from {}: {}", config_file.display(), e))?;
    let validation = config.validate().err().map(|e| e.to_string());

    match output.format() {
        OutputFormat::Human => {
            if output.is_quiet() {
                return Ok(());
            }

            let mut table = Table::new();
            table.set_header(vec![
                Cell::new("Setting").add_attribute(comfy_table::Attribute::Bold),
                Cell::new("Value").add_attribute(comfy_table::Attribute::Bold),
            ]);
            let source = if exists {
                config_file.display().to_string()
            } else {
                format!("{} (not found, using defaults)", config_file.display())
            };
            let rows = [
                ("Config file", source),
                ("Storage dir", path_manager.storage_dir().display().to_string()),
                ("catalog.base_url", config.catalog.base_url.clone()),
                ("catalog.image_cdn", config.catalog.image_cdn.clone()),
                ("catalog.timeout_secs", config.catalog.timeout_secs.to_string()),
                ("search.debounce_ms", config.search.debounce_ms.to_string()),
                ("search.min_query_chars", config.search.min_query_chars.to_string()),
                ("search.max_results", config.search.max_results.to_string()),
                ("watchlist.storage_key", config.watchlist.storage_key.clone()),
            ];
            for (name, value) in rows {
                table.add_row(vec![Cell::new(name), Cell::new(value)]);
            }
            table.load_preset(comfy_table::presets::UTF8_FULL);
            table.apply_modifier(comfy_table::modifiers::UTF8_ROUND_CORNERS);
            println!("{}", table);

            match validation {
                Some(problem) => println!("{} {}", "✗".red(), problem),
                None => println!("{} {}", "✓".green(), "Configuration is valid"),
            }
        }
        OutputFormat::Json | OutputFormat::JsonPretty => {
            output.json(&json!({
                "config_file": config_file.display().to_string(),
                "exists": exists,
                "storage_dir": path_manager.storage_dir().display().to_string(),
                "config": config,
                "valid": validation.is_none(),
                "error": validation,
            }));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_config_respects_force() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        assert!(init_config(&path, false).unwrap());
        assert_eq!(Config::load_from_file(&path).unwrap(), Config::default());

        std::fs::write(&path, "[search]\nmax_results = 3\n").unwrap();
        assert!(!init_config(&path, false).unwrap());
        assert_eq!(Config::load_from_file(&path).unwrap().search.max_results, 3);

        assert!(init_config(&path, true).unwrap());
        assert_eq!(Config::load_from_file(&path).unwrap().search.max_results, 8);
    }
}
