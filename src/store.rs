//! Plain text data files shared with the desktop version of the tool.
//!
//! All files are UTF-8 with one entry per line.
//! Labels use `\n` line endings and naming templates use `\r\n`.
//! Reading trims lines and skips blank ones, so either line ending works.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::distribute::{DEFAULT_TEMPLATE, PLACEHOLDER, validate_template};
use crate::print_warning;

/// Document label list file.
pub const LABELS_FILE: &str = "card.txt";

/// Last used destination root file.
pub const DESTINATION_FILE: &str = "path.txt";

/// Naming template list file.
pub const TEMPLATES_FILE: &str = "name.txt";

/// Default naming template file.
pub const DEFAULT_TEMPLATE_FILE: &str = "name_default.txt";

/// Labels written when the label file does not exist yet.
pub const DEFAULT_LABELS: [&str; 22] = [
    "身份证正面",
    "身份证背面",
    "学历-中专",
    "学历-大专",
    "学历-本科",
    "保安员证",
    "退伍证",
    "消防设施操作员",
    "本科证",
    "学士学位证",
    "三级保安员证",
    "驾驶证",
    "建筑物消防员",
    "计算机操作员",
    "安检培训合格证正面",
    "安检培训合格证背面",
    "计算机调试员四级1",
    "计算机调试员四级2",
    "助理工程师1",
    "助理工程师2",
    "保安员证",
    "护照",
];

/// Naming templates written when the template file does not exist yet.
pub const DEFAULT_TEMPLATES: [&str; 6] = ["图片 {n}", "图片-{n}", "IMG_{n}", "{n}号照片", "photo_{n}", "image_{n}"];

/// Data files in one directory.
#[derive(Debug, Clone)]
pub struct DataStore {
    dir: PathBuf,
}

impl DataStore {
    #[must_use]
    pub const fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Create the data directory and write default files that do not exist yet.
    ///
    /// A default file that cannot be written only prints a warning.
    ///
    /// # Errors
    /// Returns an error if the data directory cannot be created.
    pub fn init(&self) -> Result<()> {
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("Failed to create data directory: {}", self.dir.display()))?;

        let defaults = [
            (LABELS_FILE, DEFAULT_LABELS.join("\n")),
            (DESTINATION_FILE, crate::path_to_string(&default_destination())),
            (TEMPLATES_FILE, DEFAULT_TEMPLATES.join("\r\n")),
            (DEFAULT_TEMPLATE_FILE, DEFAULT_TEMPLATE.to_string()),
        ];
        for (name, content) in defaults {
            let path = self.dir.join(name);
            if !path.exists()
                && let Err(error) = fs::write(&path, content)
            {
                print_warning!("Failed to create {}: {error}", path.display());
            }
        }
        Ok(())
    }

    /// Read the label list, falling back to the default labels if the file cannot be read.
    #[must_use]
    pub fn load_labels(&self) -> Vec<String> {
        self.read_lines(LABELS_FILE)
            .unwrap_or_else(|| DEFAULT_LABELS.iter().map(std::string::ToString::to_string).collect())
    }

    /// Write the label list with `\n` line endings.
    ///
    /// # Errors
    /// Returns an error if the file cannot be written.
    pub fn save_labels(&self, labels: &[String]) -> Result<()> {
        self.write(LABELS_FILE, &labels.join("\n"))
    }

    /// Read the naming template list, falling back to the default templates if the file cannot be read.
    #[must_use]
    pub fn load_templates(&self) -> Vec<String> {
        self.read_lines(TEMPLATES_FILE)
            .unwrap_or_else(|| DEFAULT_TEMPLATES.iter().map(std::string::ToString::to_string).collect())
    }

    /// Write the naming template list with `\r\n` line endings.
    ///
    /// # Errors
    /// Returns an error if the file cannot be written.
    pub fn save_templates(&self, templates: &[String]) -> Result<()> {
        self.write(TEMPLATES_FILE, &templates.join("\r\n"))
    }

    /// Read the default naming template.
    ///
    /// Falls back to the built-in default if the file is missing, empty,
    /// or does not contain the placeholder.
    #[must_use]
    pub fn load_default_template(&self) -> String {
        self.read_lines(DEFAULT_TEMPLATE_FILE)
            .and_then(|lines| lines.into_iter().next())
            .filter(|template| template.contains(PLACEHOLDER))
            .unwrap_or_else(|| DEFAULT_TEMPLATE.to_string())
    }

    /// Store the default naming template.
    ///
    /// # Errors
    /// Returns an error if the template does not contain the placeholder exactly once,
    /// or if the file cannot be written.
    pub fn save_default_template(&self, template: &str) -> Result<()> {
        validate_template(template)?;
        self.write(DEFAULT_TEMPLATE_FILE, template.trim())
    }

    /// Read the last used destination root if it still exists.
    #[must_use]
    pub fn load_destination(&self) -> Option<PathBuf> {
        self.read_lines(DESTINATION_FILE)?
            .into_iter()
            .next()
            .map(PathBuf::from)
            .filter(|path| path.exists())
    }

    /// Store the destination root.
    ///
    /// # Errors
    /// Returns an error if the file cannot be written.
    pub fn save_destination(&self, path: &Path) -> Result<()> {
        self.write(DESTINATION_FILE, crate::path_to_string(path).trim())
    }

    /// Read non-blank trimmed lines from a data file.
    /// Returns `None` and prints a warning if the file exists but cannot be read.
    fn read_lines(&self, name: &str) -> Option<Vec<String>> {
        let path = self.dir.join(name);
        match fs::read_to_string(&path) {
            Ok(content) => Some(
                content
                    .trim_start_matches('\u{feff}')
                    .lines()
                    .map(str::trim)
                    .filter(|line| !line.is_empty())
                    .map(std::string::ToString::to_string)
                    .collect(),
            ),
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => None,
            Err(error) => {
                print_warning!("Failed to read {}: {error}", path.display());
                None
            }
        }
    }

    fn write(&self, name: &str, content: &str) -> Result<()> {
        let path = self.dir.join(name);
        fs::write(&path, content).with_context(|| format!("Failed to write {}", path.display()))
    }
}

/// Desktop directory if it exists, otherwise the home directory.
#[must_use]
pub fn default_destination() -> PathBuf {
    dirs::desktop_dir()
        .filter(|path| path.is_dir())
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Find an item by 1-based position or by exact text.
///
/// ```rust
/// use card_sort::store::find_item;
///
/// let items = vec!["a".to_string(), "b".to_string(), "3".to_string()];
/// assert_eq!(find_item(&items, "2"), Some(1));
/// assert_eq!(find_item(&items, "b"), Some(1));
/// assert_eq!(find_item(&items, "3"), Some(2));
/// assert_eq!(find_item(&items, "c"), None);
/// ```
#[must_use]
pub fn find_item(items: &[String], key: &str) -> Option<usize> {
    let key = key.trim();
    key.parse::<usize>()
        .ok()
        .filter(|&position| position >= 1 && position <= items.len())
        .map(|position| position - 1)
        .or_else(|| items.iter().position(|item| item == key))
}

/// Insert a label after the given 0-based position, or append it.
/// Returns the position of the inserted label.
///
/// # Errors
/// Returns an error if the label is empty.
pub fn insert_label(labels: &mut Vec<String>, label: &str, after: Option<usize>) -> Result<usize> {
    let label = label.trim();
    if label.is_empty() {
        anyhow::bail!("Label cannot be empty");
    }
    let position = after.map_or(labels.len(), |index| (index + 1).min(labels.len()));
    labels.insert(position, label.to_string());
    Ok(position)
}

/// Remove items at the given 0-based positions and return the removed items in list order.
/// Out of range and repeated positions are ignored.
pub fn remove_items(items: &mut Vec<String>, positions: &[usize]) -> Vec<String> {
    let mut positions: Vec<usize> = positions.iter().copied().filter(|&p| p < items.len()).collect();
    positions.sort_unstable();
    positions.dedup();
    let mut removed: Vec<String> = positions.iter().rev().map(|&p| items.remove(p)).collect();
    removed.reverse();
    removed
}

/// Move an item from one 0-based position to another.
/// Returns false and leaves the list unchanged if the move is a no-op or out of range.
pub fn move_item(items: &mut Vec<String>, from: usize, to: usize) -> bool {
    if from == to || from >= items.len() || to >= items.len() {
        return false;
    }
    let item = items.remove(from);
    items.insert(to, item);
    true
}

/// Items containing the query, ignoring case, with their 0-based positions.
/// An empty query matches everything.
#[must_use]
pub fn filter_items<'a>(items: &'a [String], query: &str) -> Vec<(usize, &'a String)> {
    let query = query.trim().to_lowercase();
    items
        .iter()
        .enumerate()
        .filter(|(_, item)| query.is_empty() || item.to_lowercase().contains(&query))
        .collect()
}

/// Append a naming template to the list.
///
/// # Errors
/// Returns an error if the template does not contain the placeholder exactly once
/// or is already in the list.
pub fn add_template(templates: &mut Vec<String>, template: &str) -> Result<()> {
    validate_template(template)?;
    let template = template.trim();
    if templates.iter().any(|existing| existing == template) {
        anyhow::bail!("Naming template already exists: '{template}'");
    }
    templates.push(template.to_string());
    Ok(())
}
