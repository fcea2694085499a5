use std::io;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::distribute::template::TemplateMatcher;
use crate::{path_to_file_extension_string, path_to_file_stem_string};

/// Supported image file extensions in lowercase.
pub const IMAGE_EXTENSIONS: [&str; 18] = [
    "jpg", "jpeg", "png", "bmp", "gif", "tiff", "tif", "webp", "heic", "heif", "raw", "cr2", "nef", "arw", "ico",
    "jfif", "pjpeg", "pjp",
];

/// Source image whose stem matched the naming template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchedFile {
    pub path: PathBuf,
    /// Sequence index captured from the placeholder position.
    pub index: u64,
}

impl MatchedFile {
    #[must_use]
    pub const fn new(path: PathBuf, index: u64) -> Self {
        Self { path, index }
    }

    /// Original extension including the leading dot, or an empty string.
    #[must_use]
    pub fn extension_suffix(&self) -> String {
        self.path
            .extension()
            .map(|ext| format!(".{}", crate::os_str_to_string(ext)))
            .unwrap_or_default()
    }

    /// File name of the source image.
    #[must_use]
    pub fn file_name(&self) -> String {
        crate::path_to_filename_string(&self.path)
    }
}

/// Check if a file has one of the supported image extensions, ignoring case.
#[must_use]
pub fn is_image_file(path: &Path) -> bool {
    let extension = path_to_file_extension_string(path);
    !extension.is_empty() && IMAGE_EXTENSIONS.contains(&extension.as_str())
}

/// Collect matching images directly under `dir`, sorted by sequence index.
///
/// Subdirectories are not entered.
/// Entries are scanned in file name order and the sort is stable,
/// so images with the same index keep their file name order.
///
/// # Errors
/// Returns an error if the directory does not exist or cannot be read.
pub fn collect_and_sort(dir: &Path, matcher: &TemplateMatcher) -> io::Result<Vec<MatchedFile>> {
    if !dir.is_dir() {
        return Err(io::Error::new(
            io::ErrorKind::NotFound,
            format!("Source directory does not exist: '{}'", dir.display()),
        ));
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(dir).min_depth(1).max_depth(1).sort_by_file_name() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(error) if error.depth() == 0 => return Err(io::Error::other(error)),
            Err(_) => continue,
        };
        let path = entry.path();
        if !path.is_file() || !is_image_file(path) {
            continue;
        }
        let stem = path_to_file_stem_string(path);
        if let Some(index) = matcher.extract_index(&stem) {
            files.push(MatchedFile::new(entry.into_path(), index));
        }
    }

    files.sort_by_key(|file| file.index);
    Ok(files)
}
