use std::fs;
use std::path::PathBuf;

use anyhow::Context;
use chrono::Local;
use serde::Deserialize;

use crate::Args;

/// Output directory name used when the config file does not set one.
const DEFAULT_OUTPUT_DIR_NAME: &str = "output";

/// Final config created from CLI arguments and user config file.
#[derive(Debug)]
pub struct Config {
    pub(crate) data_dir: PathBuf,
    pub(crate) dryrun: bool,
    pub(crate) log_file: Option<PathBuf>,
    pub(crate) output_dir_name: String,
    pub(crate) verbose: bool,
}

/// Config from a config file
#[derive(Debug, Default, Deserialize)]
struct CardSortConfig {
    #[serde(default)]
    data_dir: Option<PathBuf>,
    #[serde(default)]
    dryrun: bool,
    #[serde(default)]
    log: bool,
    #[serde(default)]
    log_dir: Option<PathBuf>,
    #[serde(default)]
    output_dir_name: Option<String>,
    #[serde(default)]
    verbose: bool,
}

/// Wrapper needed for parsing the config file section.
#[derive(Debug, Default, Deserialize)]
struct UserConfig {
    #[serde(default)]
    cardsort: CardSortConfig,
}

impl CardSortConfig {
    /// Try to read user config from the file if it exists.
    /// Otherwise, fall back to default config.
    ///
    /// # Errors
    /// Returns an error if config file exists but cannot be read or parsed.
    fn get_user_config() -> anyhow::Result<Self> {
        let Some(path) = card_sort::config::CONFIG_PATH.as_deref() else {
            return Ok(Self::default());
        };

        match fs::read_to_string(path) {
            Ok(content) => Self::from_toml_str(&content)
                .map_err(|e| anyhow::anyhow!("Failed to parse config file {}:\n{e}", path.display())),
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(error) => Err(anyhow::anyhow!(
                "Failed to read config file {}: {error}",
                path.display()
            )),
        }
    }

    /// Parse config from a TOML string.
    ///
    /// # Errors
    /// Returns an error if the TOML string is invalid.
    fn from_toml_str(toml_str: &str) -> anyhow::Result<Self> {
        toml::from_str::<UserConfig>(toml_str)
            .map(|config| config.cardsort)
            .context("Failed to parse cardsort config TOML")
    }
}

impl Config {
    /// Create config from given command line args and user config file.
    ///
    /// # Errors
    /// Returns an error if the config file cannot be read or parsed,
    /// or if a default directory cannot be determined.
    pub fn from_args(args: &Args) -> anyhow::Result<Self> {
        let user_config = CardSortConfig::get_user_config()?;
        Self::from_user_config(args, user_config)
    }

    fn from_user_config(args: &Args, user_config: CardSortConfig) -> anyhow::Result<Self> {
        let data_dir = match args.data_dir.clone().or(user_config.data_dir) {
            Some(dir) => dir,
            None => card_sort::config::DATA_DIR
                .clone()
                .context("Failed to get data directory")?,
        };

        let output_dir_name = user_config
            .output_dir_name
            .map(|name| name.trim().to_string())
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| DEFAULT_OUTPUT_DIR_NAME.to_string());

        if output_dir_name.contains(['/', '\\']) || output_dir_name == "." || output_dir_name == ".." {
            anyhow::bail!("Output directory name must be a single folder name: '{output_dir_name}'");
        }

        let log_file = if args.log.is_some() || user_config.log {
            match args.log.clone().flatten() {
                Some(file) => Some(file),
                None => {
                    let log_dir = match user_config.log_dir {
                        Some(dir) => dir,
                        None => card_sort::config::LOG_DIR
                            .clone()
                            .context("Failed to get log directory")?,
                    };
                    Some(log_dir.join(format!(
                        "{}_{}.log",
                        env!("CARGO_BIN_NAME"),
                        Local::now().format("%Y-%m-%d_%H-%M-%S")
                    )))
                }
            }
        } else {
            None
        };

        Ok(Self {
            data_dir,
            dryrun: args.print || user_config.dryrun,
            log_file,
            output_dir_name,
            verbose: args.verbose || user_config.verbose,
        })
    }
}
