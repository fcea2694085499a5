//! Distribute numbered images into per-person folders.
//!
//! The pipeline compiles a naming template into a matcher,
//! collects matching images sorted by their sequence index,
//! validates the `name+ID` records,
//! splits the images into one contiguous block per person,
//! and copies each block into a folder named after the record.

mod collect;
mod copy;
mod error;
mod plan;
mod record;
mod template;

pub use collect::{IMAGE_EXTENSIONS, MatchedFile, collect_and_sort, is_image_file};
pub use copy::{CopyEvent, Summary, copy_file, execute, next_output_dir};
pub use error::{LineIssue, PlanError, RecordError, TemplateError};
pub use plan::{CopyPlan, PlannedCopy, RecordBlock, plan_distribution};
pub use record::{PersonRecord, SEPARATOR, is_valid_id_number, validate_records};
pub use template::{
    DEFAULT_TEMPLATE, PLACEHOLDER, TemplateMatcher, compile_template, resolve_template, validate_template,
};
