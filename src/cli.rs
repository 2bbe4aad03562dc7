use std::{env, path::PathBuf};

use anyhow::{Result, anyhow};

pub const DEFAULT_CONFIG_PATH: &str = "./gazette.jsonc";

/// Returns the configured path only when `--config` was given. The caller
/// decides how to treat the default path, which may legitimately not exist.
pub fn config_path_from_args() -> Result<Option<PathBuf>> {
    let mut args = env::args().skip(1);
    let mut config_path = None;

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--config" => {
                let value = args
                    .next()
                    .ok_or_else(|| anyhow!("missing value for --config"))?;
                config_path = Some(PathBuf::from(value));
            }
            other => {
                return Err(anyhow!(
                    "unknown argument: {other}. usage: gazette [--config <path>]"
                ));
            }
        }
    }

    Ok(config_path)
}
