use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Context, Result};

use zerotrust_core::clock::{Clock, FixedClock, SystemClock};
use zerotrust_core::config::{Config, ConfigPaths};

/// Writes the default policy set, refusing to clobber an existing file unless forced.
pub fn init(path: Option<PathBuf>, force: bool) -> Result<()> {
    let target = match path {
        Some(path) => path,
        None => ConfigPaths::resolve()?.config_path,
    };
    if target.exists() && !force {
        bail!("{} already exists; pass --force to replace it", target.display());
    }
    let config = Config::default_config();
    config.save(&target)?;
    println!(
        "Wrote {} policies and {} applications to {}",
        config.policies.len(),
        config.applications.len(),
        target.display()
    );
    Ok(())
}

pub fn print_path(config_path: Option<PathBuf>) -> Result<()> {
    let path = match config_path {
        Some(path) => path,
        None => ConfigPaths::resolve()?.config_path,
    };
    let state = if path.exists() { "present" } else { "missing, using built-in defaults" };
    println!("{} ({state})", path.display());
    Ok(())
}

pub fn print_effective(config_path: Option<PathBuf>) -> Result<()> {
    let config = load_config(config_path.as_deref())?;
    print!("{}", config.to_toml_string()?);
    Ok(())
}

/// An explicit path must load; the default path is optional but must parse if present.
pub fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => Config::load(path),
        None => {
            let paths = ConfigPaths::resolve()?;
            if paths.config_path.exists() {
                Config::load(&paths.config_path)
            } else {
                Ok(Config::default_config())
            }
        }
    }
}

pub fn build_clock(config: &Config, at_hour: Option<u8>) -> Result<Arc<dyn Clock>> {
    let system = SystemClock::with_offset_hours(config.broker.utc_offset_hours)?;
    match at_hour {
        Some(hour) => {
            let pinned = system
                .now()
                .replace_hour(hour)
                .with_context(|| format!("pin clock to hour {hour}"))?;
            Ok(Arc::new(FixedClock(pinned)))
        }
        None => Ok(Arc::new(system)),
    }
}
