use std::path::PathBuf;

use crate::distribute::collect::MatchedFile;
use crate::distribute::error::PlanError;
use crate::distribute::record::PersonRecord;

/// A single copy from a source image to its new name in a person's folder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedCopy {
    pub source: PathBuf,
    /// Destination file name: `<folder>-<label><extension>`.
    pub file_name: String,
    pub label: String,
}

/// All copies going into one person's folder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordBlock {
    /// Folder name relative to the output root.
    pub directory: String,
    pub copies: Vec<PlannedCopy>,
}

/// Ordered copy instructions for one run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CopyPlan {
    pub blocks: Vec<RecordBlock>,
    pub per_record: usize,
}

impl CopyPlan {
    /// Total number of files to copy.
    #[must_use]
    pub fn total_files(&self) -> usize {
        self.blocks.iter().map(|block| block.copies.len()).sum()
    }

    /// Number of person folders.
    #[must_use]
    pub const fn record_count(&self) -> usize {
        self.blocks.len()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }
}

/// Split sorted images into contiguous per-person blocks and pair each block with the labels.
///
/// Person `i` receives `files[i * labels.len()..(i + 1) * labels.len()]`,
/// and image `j` of the block is named after `labels[j]`.
///
/// # Errors
/// Returns an error if there are no labels or records,
/// or if the number of images is not exactly `records * labels`.
pub fn plan_distribution(
    files: &[MatchedFile],
    labels: &[String],
    records: &[PersonRecord],
) -> Result<CopyPlan, PlanError> {
    if labels.is_empty() {
        return Err(PlanError::NoLabels);
    }
    if records.is_empty() {
        return Err(PlanError::NoRecords);
    }

    let per_record = labels.len();
    let needed = records.len() * per_record;
    if files.len() != needed {
        return Err(PlanError::CountMismatch {
            per_record,
            records: records.len(),
            needed,
            found: files.len(),
        });
    }

    let blocks = records
        .iter()
        .zip(files.chunks_exact(per_record))
        .map(|(record, block)| {
            let directory = record.directory_name().to_string();
            let copies = block
                .iter()
                .zip(labels)
                .map(|(file, label)| PlannedCopy {
                    source: file.path.clone(),
                    file_name: format!("{directory}-{label}{}", file.extension_suffix()),
                    label: label.clone(),
                })
                .collect();
            RecordBlock { directory, copies }
        })
        .collect();

    Ok(CopyPlan { blocks, per_record })
}
