use std::path::PathBuf;
use std::sync::LazyLock;

const PROJECT_NAME: &str = env!("CARGO_PKG_NAME");

/// Path to the user config file: `$HOME/.config/card-sort.toml`
///
/// Returns `None` if the home directory cannot be determined.
pub static CONFIG_PATH: LazyLock<Option<PathBuf>> = LazyLock::new(|| {
    let home_dir = dirs::home_dir()?;
    Some(home_dir.join(".config").join(format!("{PROJECT_NAME}.toml")))
});

/// Default directory for the label and template data files,
/// for example `$HOME/.local/share/card-sort` on Linux.
pub static DATA_DIR: LazyLock<Option<PathBuf>> = LazyLock::new(|| Some(dirs::data_dir()?.join(PROJECT_NAME)));

/// Default directory for run log files: `$HOME/logs/card-sort`
pub static LOG_DIR: LazyLock<Option<PathBuf>> =
    LazyLock::new(|| Some(dirs::home_dir()?.join("logs").join(PROJECT_NAME)));
