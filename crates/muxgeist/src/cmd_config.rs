//! `muxgeist config`: show resolved settings, optionally write defaults.

use std::path::Path;

use muxgeist_core::ConfigResolver;
use muxgeist_core::config::{default_config_path, write_default_config};

pub fn cmd_config(config: &ConfigResolver, init: bool) -> anyhow::Result<()> {
    let path = match config.source() {
        Some(path) => path.to_path_buf(),
        None => default_config_path()
            .ok_or_else(|| anyhow::anyhow!("cannot locate home directory"))?,
    };

    if init {
        if path.exists() {
            println!("config already exists at {}", path.display());
        } else {
            write_default_config(&path)?;
            println!("wrote default config to {}", path.display());
        }
        return Ok(());
    }

    print!("{}", format_config_report(config, &path, path.exists()));
    Ok(())
}

/// Pure formatting logic for the config report, separated for testability.
pub(crate) fn format_config_report(config: &ConfigResolver, path: &Path, exists: bool) -> String {
    let mut out = format!(
        "config:   {} ({})\n",
        path.display(),
        if exists { "found" } else { "not found, using defaults" }
    );
    out.push_str(&format!("socket:   {}\n", config.socket_path()));
    for status in config.provider_status() {
        let key = if status.key_configured { "key configured" } else { "no key" };
        out.push_str(&format!(
            "{:<9} {key}, model {}\n",
            format!("{}:", status.provider),
            status.model
        ));
    }
    let provider = config.detect_provider();
    out.push_str(&format!("provider: {provider} ({})\n", config.model(provider)));
    out
}
