use std::fmt;
use std::fs::{self, File, FileTimes};
use std::io;
use std::path::{Path, PathBuf};

use crate::distribute::plan::CopyPlan;

/// Something that happened while executing a copy plan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CopyEvent {
    Copied {
        directory: String,
        source: PathBuf,
        file_name: String,
        processed: usize,
        total: usize,
    },
    FileFailed {
        source: PathBuf,
        error: String,
    },
    RecordFailed {
        directory: String,
        error: String,
    },
    Cancelled {
        processed: usize,
        total: usize,
    },
}

/// Final tally of an executed plan.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Summary {
    /// Number of files copied successfully.
    pub processed: usize,
    /// Number of files in the plan.
    pub total: usize,
    /// Number of person folders in the plan.
    pub records: usize,
    pub cancelled: bool,
    /// One human-readable line per event.
    pub log: Vec<String>,
}

impl Summary {
    /// True when every planned file was copied.
    #[must_use]
    pub const fn is_complete(&self) -> bool {
        self.processed == self.total
    }

    /// Number of files that were not copied.
    #[must_use]
    pub const fn missing(&self) -> usize {
        self.total.saturating_sub(self.processed)
    }
}

/// Copy every planned file into its person folder under `output_root`.
///
/// Folders are created as needed and existing files are overwritten.
/// A file that fails to copy is logged and skipped,
/// and a folder that cannot be created skips that person.
/// `is_cancelled` is polled before each person and each file;
/// files copied before cancellation are left in place.
pub fn execute<P, C>(plan: &CopyPlan, output_root: &Path, mut on_progress: P, is_cancelled: C) -> Summary
where
    P: FnMut(&CopyEvent),
    C: Fn() -> bool,
{
    let mut summary = Summary {
        total: plan.total_files(),
        records: plan.record_count(),
        ..Summary::default()
    };

    let mut emit = |summary: &mut Summary, event: CopyEvent| {
        summary.log.push(event.to_string());
        on_progress(&event);
    };

    'records: for block in &plan.blocks {
        if is_cancelled() {
            summary.cancelled = true;
            break;
        }

        let person_dir = output_root.join(&block.directory);
        if let Err(error) = fs::create_dir_all(&person_dir) {
            emit(
                &mut summary,
                CopyEvent::RecordFailed {
                    directory: block.directory.clone(),
                    error: error.to_string(),
                },
            );
            continue;
        }

        for copy in &block.copies {
            if is_cancelled() {
                summary.cancelled = true;
                break 'records;
            }

            let destination = person_dir.join(&copy.file_name);
            match copy_file(&copy.source, &destination) {
                Ok(()) => {
                    summary.processed += 1;
                    let event = CopyEvent::Copied {
                        directory: block.directory.clone(),
                        source: copy.source.clone(),
                        file_name: copy.file_name.clone(),
                        processed: summary.processed,
                        total: summary.total,
                    };
                    emit(&mut summary, event);
                }
                Err(error) => emit(
                    &mut summary,
                    CopyEvent::FileFailed {
                        source: copy.source.clone(),
                        error: error.to_string(),
                    },
                ),
            }
        }
    }

    if summary.cancelled {
        let event = CopyEvent::Cancelled {
            processed: summary.processed,
            total: summary.total,
        };
        emit(&mut summary, event);
    }

    summary
}

/// Copy file contents, access and modification times, and permissions.
///
/// Times are set through the handle used for writing and permissions are applied last,
/// so a read-only source still produces a complete copy.
pub fn copy_file(source: &Path, destination: &Path) -> io::Result<()> {
    let metadata = fs::metadata(source)?;
    let mut reader = File::open(source)?;
    let mut writer = File::create(destination)?;
    io::copy(&mut reader, &mut writer)?;

    let mut times = FileTimes::new();
    if let Ok(modified) = metadata.modified() {
        times = times.set_modified(modified);
    }
    if let Ok(accessed) = metadata.accessed() {
        times = times.set_accessed(accessed);
    }
    writer.set_times(times)?;
    drop(writer);

    fs::set_permissions(destination, metadata.permissions())
}

/// First free output directory path: `<root>/<name>`, then `<root>/<name>1`, `<root>/<name>2`...
#[must_use]
pub fn next_output_dir(root: &Path, name: &str) -> PathBuf {
    let mut candidate = root.join(name);
    let mut index: usize = 1;
    while candidate.exists() {
        candidate = root.join(format!("{name}{index}"));
        index += 1;
    }
    candidate
}

impl fmt::Display for CopyEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Copied {
                directory,
                source,
                file_name,
                ..
            } => write!(
                f,
                "Copied to {directory}: {} -> {file_name}",
                crate::path_to_filename_string(source)
            ),
            Self::FileFailed { source, error } => {
                write!(f, "Failed to copy {}: {error}", source.display())
            }
            Self::RecordFailed { directory, error } => {
                write!(f, "Failed to create folder for {directory}: {error}")
            }
            Self::Cancelled { processed, total } => {
                write!(f, "Cancelled after {processed}/{total} files")
            }
        }
    }
}
