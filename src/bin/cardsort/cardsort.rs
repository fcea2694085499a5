use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

use anyhow::{Context, Result};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use card_sort::distribute::{
    CopyEvent, CopyPlan, PlanError, Summary, collect_and_sort, compile_template, execute, next_output_dir,
    plan_distribution, resolve_template, validate_records,
};
use card_sort::store::{DataStore, default_destination, find_item};
use card_sort::{print_bold, print_error, print_warning};

use crate::Args;
use crate::config::Config;
use crate::logger::FileLogger;

const PROGRESS_BAR_CHARS: &str = "=> ";
const PROGRESS_BAR_TEMPLATE: &str = "[{elapsed_precise}] {bar:80.cyan/blue} {pos}/{len} {percent}%";

/// Copies numbered ID card images into one folder per person.
pub struct CardSort {
    config: Config,
    source: PathBuf,
    destination: PathBuf,
    labels: Vec<String>,
    records: String,
    template: String,
}

impl CardSort {
    /// Resolve paths, labels, template and records from command line args and the data files.
    pub fn new(args: &Args, config: Config) -> Result<Self> {
        let store = DataStore::new(config.data_dir.clone());
        store.init()?;

        let source = card_sort::resolve_input_path(args.source.as_deref())?;
        if !source.is_dir() {
            anyhow::bail!("Source is not a directory: {}", source.display());
        }

        let destination = Self::resolve_destination(&store, args.output.as_deref(), config.dryrun)?;
        let labels = select_labels(&store.load_labels(), &args.select, args.all)?;
        let template = choose_template(&store, args.use_template.as_deref(), args.template.as_deref())?;
        let records = read_records(args.input.as_deref(), &args.records)?;

        Ok(Self {
            config,
            source,
            destination,
            labels,
            records,
            template,
        })
    }

    /// Validate input, then copy every image to its person folder.
    pub fn run(&self) -> Result<()> {
        let start = Instant::now();
        let mut logger = self.config.log_file.as_deref().map(FileLogger::new).transpose()?;
        if let Some(logger) = logger.as_mut() {
            logger.log_init(&self.config, &self.source, &self.destination, &self.template, &self.labels);
        }

        let plan = match self.build_plan() {
            Ok(plan) => plan,
            Err(error) => {
                if let Some(logger) = logger.as_mut() {
                    logger.log_failure(&format!("{error:#}"));
                }
                return Err(error);
            }
        };

        if self.config.dryrun {
            self.print_plan(&plan);
            return Ok(());
        }

        let output_root = next_output_dir(&self.destination, &self.config.output_dir_name);
        fs::create_dir_all(&output_root)
            .with_context(|| format!("Failed to create output directory: {}", output_root.display()))?;

        if let Some(logger) = logger.as_mut() {
            logger.log_start(&plan);
        }

        // Set up Ctrl+C handler for graceful abort
        let abort_flag = Arc::new(AtomicBool::new(false));
        let abort_flag_handler = Arc::clone(&abort_flag);

        ctrlc::set_handler(move || {
            if abort_flag_handler.load(Ordering::SeqCst) {
                // Second Ctrl+C - force exit
                std::process::exit(130);
            }
            println!("\n{}", "Received Ctrl+C, finishing current file...".yellow().bold());
            abort_flag_handler.store(true, Ordering::SeqCst);
        })
        .context("Failed to set Ctrl+C handler")?;

        let summary = self.copy_files(&plan, &output_root, &abort_flag, logger.as_mut());

        if let Some(logger) = logger.as_mut() {
            logger.log_stats(&summary, start.elapsed());
        }

        Self::print_summary(&summary, &output_root);
        Ok(())
    }

    /// Check labels and records, then compile the template and match the source images to them.
    fn build_plan(&self) -> Result<CopyPlan> {
        if self.labels.is_empty() {
            return Err(PlanError::NoLabels.into());
        }
        let records = validate_records(&self.records)?;
        if records.is_empty() {
            return Err(PlanError::NoRecords.into());
        }
        let matcher = compile_template(&self.template)?;
        let files = collect_and_sort(&self.source, &matcher)
            .with_context(|| format!("Failed to read source directory: {}", self.source.display()))?;

        if self.config.verbose {
            println!(
                "Found {} images matching '{}' in {}",
                files.len(),
                matcher.template(),
                self.source.display()
            );
            for record in &records {
                match record.birth_date() {
                    Some(date) => println!("  {record} ({})", date.dash_format()),
                    None => println!("  {record}"),
                }
            }
        }

        Ok(plan_distribution(&files, &self.labels, &records)?)
    }

    fn copy_files(
        &self,
        plan: &CopyPlan,
        output_root: &Path,
        abort_flag: &AtomicBool,
        mut logger: Option<&mut FileLogger>,
    ) -> Summary {
        let progress_bar = Self::create_progress_bar(plan.total_files() as u64);
        let verbose = self.config.verbose;

        let summary = execute(
            plan,
            output_root,
            |event| {
                if let Some(logger) = logger.as_mut() {
                    logger.log_event(event);
                }
                match event {
                    CopyEvent::Copied { .. } => {
                        if verbose {
                            progress_bar.println(event.to_string());
                        }
                        progress_bar.inc(1);
                    }
                    CopyEvent::FileFailed { .. } => {
                        progress_bar.suspend(|| print_error!("{event}"));
                        progress_bar.inc(1);
                    }
                    CopyEvent::RecordFailed { .. } => {
                        progress_bar.suspend(|| print_error!("{event}"));
                        progress_bar.inc(plan.per_record as u64);
                    }
                    CopyEvent::Cancelled { .. } => {}
                }
            },
            || abort_flag.load(Ordering::SeqCst),
        );

        progress_bar.finish_and_clear();
        summary
    }

    /// Show where each image would be copied without touching any files.
    fn print_plan(&self, plan: &CopyPlan) {
        let output_root = next_output_dir(&self.destination, &self.config.output_dir_name);
        print_bold!(
            "{} people, {} images each, into {}",
            plan.record_count(),
            plan.per_record,
            output_root.display()
        );
        for block in &plan.blocks {
            println!("{}", block.directory.cyan().bold());
            for copy in &block.copies {
                card_sort::show_rename(&card_sort::path_to_filename_string(&copy.source), &copy.file_name);
            }
        }
    }

    fn print_summary(summary: &Summary, output_root: &Path) {
        if summary.cancelled {
            println!("\n{}", "Aborted by user".bold().red());
        }
        if summary.is_complete() {
            println!(
                "{}",
                format!(
                    "Copied {} images for {} people to {}",
                    summary.processed,
                    summary.records,
                    output_root.display()
                )
                .green()
                .bold()
            );
        } else {
            print_warning!(
                "Copied {}/{} images, {} not copied. Output directory: {}",
                summary.processed,
                summary.total,
                summary.missing(),
                output_root.display()
            );
        }
    }

    /// Use the given destination and remember it, or fall back to the last used one.
    fn resolve_destination(store: &DataStore, output: Option<&Path>, dryrun: bool) -> Result<PathBuf> {
        let Some(output) = output else {
            return Ok(store.load_destination().unwrap_or_else(default_destination));
        };
        let destination = card_sort::resolve_input_path(Some(output))?;
        if !destination.is_dir() {
            anyhow::bail!("Destination is not a directory: {}", destination.display());
        }
        if !dryrun && let Err(error) = store.save_destination(&destination) {
            print_warning!("{error:#}");
        }
        Ok(destination)
    }

    /// Create a progress bar that is hidden during tests.
    fn create_progress_bar(len: u64) -> ProgressBar {
        #[cfg(test)]
        {
            let _ = len;
            ProgressBar::hidden()
        }
        #[cfg(not(test))]
        {
            let progress_bar = ProgressBar::new(len);
            if let Ok(style) = ProgressStyle::default_bar().template(PROGRESS_BAR_TEMPLATE) {
                progress_bar.set_style(style.progress_chars(PROGRESS_BAR_CHARS));
            }
            progress_bar
        }
    }
}

/// Pick labels by 1-based position or name, keeping the given order.
fn select_labels(labels: &[String], keys: &[String], all: bool) -> Result<Vec<String>> {
    if all {
        return Ok(labels.to_vec());
    }
    keys.iter()
        .map(|key| {
            find_item(labels, key)
                .map(|index| labels[index].clone())
                .with_context(|| format!("Label not found: '{key}'"))
        })
        .collect()
}

/// Template selected from the saved list, or free text, or the saved default.
fn choose_template(store: &DataStore, selection: Option<&str>, free_text: Option<&str>) -> Result<String> {
    let selected = match selection {
        Some(key) => {
            let templates = store.load_templates();
            let index = find_item(&templates, key).with_context(|| format!("Naming template not found: '{key}'"))?;
            Some(templates[index].clone())
        }
        None => None,
    };
    if selected.is_none()
        && let Some(text) = free_text
        && !text.contains(card_sort::distribute::PLACEHOLDER)
    {
        print_warning!("Naming template must contain {{n}}, using the default template instead: '{text}'");
    }
    Ok(resolve_template(
        selected.as_deref(),
        free_text,
        &store.load_default_template(),
    ))
}

/// Combine record lines from the input file or stdin with lines given as arguments.
fn read_records(input: Option<&Path>, lines: &[String]) -> Result<String> {
    let mut text = match input {
        Some(path) if path.as_os_str() == "-" => {
            io::read_to_string(io::stdin()).context("Failed to read records from stdin")?
        }
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("Failed to read records file: {}", path.display()))?,
        None => String::new(),
    };
    for line in lines {
        text.push('\n');
        text.push_str(line);
    }
    Ok(text)
}
