//! `appstage config`: read and write configuration values.

use std::path::Path;

use toml::{Table, Value};

use crate::{
    cli::{ConfigCommands, OutputFormat},
    config::{AppConfig, BOOL_KEYS, KEYS},
    error::{CliError, CliResult, IntoCli},
    output::OutputManager,
};

/// Dispatch to the correct config subcommand.
pub fn execute(
    cmd: ConfigCommands,
    config: AppConfig,
    config_file: Option<&Path>,
    output: OutputManager,
) -> CliResult<()> {
    match cmd {
        ConfigCommands::Get { key } => {
            let value = config.get(&key).ok_or_else(|| unknown_key(&key))?;
            output.print(&value)?;
        }

        ConfigCommands::Set { key, value } => {
            let path = AppConfig::target_path(config_file);
            set_value(&path, &key, &value)?;
            output.success(&format!("Set {key} = {value} in {}", path.display()))?;
        }

        ConfigCommands::List => {
            if output.format() == OutputFormat::Json {
                let value = serde_json::to_value(&config).map_err(|e| CliError::ConfigError {
                    message: format!("Failed to serialise config: {e}"),
                    source: Some(Box::new(e)),
                })?;
                output.print_json(&value)?;
            } else {
                output.header("Current Configuration:")?;
                let serialised =
                    toml::to_string_pretty(&config).map_err(|e| CliError::ConfigError {
                        message: format!("Failed to serialise config: {e}"),
                        source: Some(Box::new(e)),
                    })?;
                output.print(serialised.trim_end())?;
            }
        }

        ConfigCommands::Path => {
            output.print(&AppConfig::target_path(config_file).display().to_string())?;
        }
    }

    Ok(())
}

// ── helpers ───────────────────────────────────────────────────────────────────

fn unknown_key(key: &str) -> CliError {
    CliError::ConfigError {
        message: format!("Unknown config key: '{key}' (known: {})", KEYS.join(", ")),
        source: None,
    }
}

/// Typed TOML value for `key`.
fn parse_value(key: &str, raw: &str) -> CliResult<Value> {
    if !KEYS.contains(&key) {
        return Err(unknown_key(key));
    }
    if BOOL_KEYS.contains(&key) {
        return raw
            .parse::<bool>()
            .map(Value::Boolean)
            .map_err(|e| CliError::InvalidInput {
                message: format!("'{key}' expects true or false, got '{raw}'"),
                source: Some(Box::new(e)),
            });
    }
    if raw.trim().is_empty() {
        return Err(CliError::InvalidInput {
            message: format!("'{key}' cannot be empty"),
            source: None,
        });
    }
    Ok(Value::String(raw.to_owned()))
}

/// Update one dotted key in the TOML file at `path`, creating it if needed.
fn set_value(path: &Path, key: &str, raw: &str) -> CliResult<()> {
    let value = parse_value(key, raw)?;
    let (section, field) = key.split_once('.').ok_or_else(|| unknown_key(key))?;

    let mut document = if path.exists() {
        let content = std::fs::read_to_string(path)
            .with_cli_context(|| format!("Failed to read '{}'", path.display()))?;
        toml::from_str::<Table>(&content).map_err(|e| CliError::ConfigError {
            message: format!("Failed to parse '{}'", path.display()),
            source: Some(Box::new(e)),
        })?
    } else {
        Table::new()
    };

    let table = document
        .entry(section)
        .or_insert_with(|| Value::Table(Table::new()))
        .as_table_mut()
        .ok_or_else(|| CliError::ConfigError {
            message: format!("'{section}' in '{}' is not a table", path.display()),
            source: None,
        })?;
    table.insert(field.to_owned(), value);

    let serialised = toml::to_string_pretty(&document).map_err(|e| CliError::ConfigError {
        message: format!("Failed to serialise config: {e}"),
        source: Some(Box::new(e)),
    })?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_cli_context(|| format!("Failed to create '{}'", parent.display()))?;
    }
    std::fs::write(path, serialised)
        .with_cli_context(|| format!("Failed to write '{}'", path.display()))?;
    Ok(())
}

// ── tests ─────────────────────────────────────────────────────────────────────
