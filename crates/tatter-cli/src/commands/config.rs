//! Print or validate destruction tuning

use anyhow::{Context, Result};
use tatter_core::DestroyConfig;

pub fn run(check: Option<&str>) -> Result<()> {
    match check {
        Some(path) => {
            let config = DestroyConfig::load(path)
                .with_context(|| format!("Invalid configuration file: {}", path))?;
            println!(
                "{} is valid (burn {} ms + {} ms fade, {} crush steps)",
                path,
                config.burn.max_duration_ms,
                config.burn.fade_out_ms,
                config.crush.max_taps()
            );
        }
        None => {
            let text = DestroyConfig::default()
                .to_toml_string()
                .context("Failed to serialize default configuration")?;
            print!("{}", text);
        }
    }
    Ok(())
}
