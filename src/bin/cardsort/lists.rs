use anyhow::{Context, Result};
use colored::Colorize;

use card_sort::print_warning;
use card_sort::store::{DataStore, add_template, filter_items, find_item, insert_label, move_item, remove_items};

use crate::config::Config;
use crate::{LabelCommand, TemplateCommand};

/// Run a `labels` subcommand against the label list file.
pub fn run_labels(config: &Config, command: LabelCommand) -> Result<()> {
    let store = open_store(config)?;
    let mut labels = store.load_labels();

    match command {
        LabelCommand::List { filter } => print_items(&labels, filter.as_deref().unwrap_or_default(), None),
        LabelCommand::Add { name, after } => {
            let after = after.map(|key| find_required(&labels, &key, "Label")).transpose()?;
            let position = insert_label(&mut labels, &name, after)?;
            store.save_labels(&labels)?;
            println!("Added label {}: {}", position + 1, labels[position].green());
        }
        LabelCommand::Remove { labels: keys } => {
            let positions = keys
                .iter()
                .map(|key| find_required(&labels, key, "Label"))
                .collect::<Result<Vec<_>>>()?;
            let removed = remove_items(&mut labels, &positions);
            store.save_labels(&labels)?;
            for label in removed {
                println!("Removed label: {}", label.red());
            }
        }
        LabelCommand::Move { label, position } => {
            let from = find_required(&labels, &label, "Label")?;
            if position == 0 || position > labels.len() {
                anyhow::bail!("Position must be between 1 and {}", labels.len());
            }
            if move_item(&mut labels, from, position - 1) {
                store.save_labels(&labels)?;
                println!("Moved {} to position {position}", labels[position - 1].green());
            } else {
                println!("{} is already at position {position}", labels[from]);
            }
        }
        LabelCommand::Clear => {
            labels.clear();
            store.save_labels(&labels)?;
            println!("{}", "Removed all labels".yellow());
        }
    }
    Ok(())
}

/// Run a `templates` subcommand against the naming template files.
pub fn run_templates(config: &Config, command: TemplateCommand) -> Result<()> {
    let store = open_store(config)?;
    let mut templates = store.load_templates();
    let default = store.load_default_template();

    match command {
        TemplateCommand::List { filter } => {
            print_items(&templates, filter.as_deref().unwrap_or_default(), Some(&default));
        }
        TemplateCommand::Add { template } => {
            add_template(&mut templates, &template)?;
            store.save_templates(&templates)?;
            println!("Added naming template {}: {}", templates.len(), template.trim().green());
        }
        TemplateCommand::Remove { template } => {
            let index = find_required(&templates, &template, "Naming template")?;
            let removed = templates.remove(index);
            store.save_templates(&templates)?;
            println!("Removed naming template: {}", removed.red());
        }
        TemplateCommand::Default { template: None } => println!("{default}"),
        TemplateCommand::Default {
            template: Some(template),
        } => {
            let template = find_item(&templates, &template).map_or(template, |index| templates[index].clone());
            store.save_default_template(&template)?;
            println!("Default naming template: {}", template.trim().green());
        }
    }
    Ok(())
}

fn open_store(config: &Config) -> Result<DataStore> {
    let store = DataStore::new(config.data_dir.clone());
    store.init()?;
    if config.verbose {
        println!("Data directory: {}", store.dir().display());
    }
    Ok(store)
}

fn find_required(items: &[String], key: &str, kind: &str) -> Result<usize> {
    find_item(items, key).with_context(|| format!("{kind} not found: '{key}'"))
}

/// Print a numbered list of the items matching the filter.
fn print_items(items: &[String], filter: &str, default: Option<&str>) {
    if items.is_empty() {
        print_warning!("List is empty");
        return;
    }
    let matches = filter_items(items, filter);
    if matches.is_empty() {
        print_warning!("No items matching '{filter}'");
        return;
    }
    let width = items.len().to_string().len();
    for (index, item) in matches {
        if default == Some(item.as_str()) {
            println!("{:>width$}: {} {}", index + 1, item.bold(), "(default)".green());
        } else {
            println!("{:>width$}: {item}", index + 1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::fs;
    use std::path::Path;

    use card_sort::store::{DEFAULT_LABELS, DEFAULT_TEMPLATE_FILE, LABELS_FILE, TEMPLATES_FILE};

    fn test_config(data_dir: &Path) -> Config {
        Config {
            data_dir: data_dir.to_path_buf(),
            dryrun: false,
            log_file: None,
            output_dir_name: "output".to_string(),
            verbose: false,
        }
    }

    fn write_labels(dir: &Path, labels: &str) {
        fs::create_dir_all(dir).unwrap();
        fs::write(dir.join(LABELS_FILE), labels).unwrap();
    }

    fn read(dir: &Path, name: &str) -> String {
        fs::read_to_string(dir.join(name)).unwrap()
    }

    #[test]
    fn list_creates_default_files() {
        let dir = tempfile::tempdir().unwrap();
        let config = test_config(dir.path());
        run_labels(&config, LabelCommand::List { filter: None }).unwrap();
        assert_eq!(read(dir.path(), LABELS_FILE).lines().count(), DEFAULT_LABELS.len());
    }

    #[test]
    fn add_label_after_position() {
        let dir = tempfile::tempdir().unwrap();
        write_labels(dir.path(), "a\nb");
        let config = test_config(dir.path());
        run_labels(
            &config,
            LabelCommand::Add {
                name: "x".to_string(),
                after: Some("a".to_string()),
            },
        )
        .unwrap();
        assert_eq!(read(dir.path(), LABELS_FILE), "a\nx\nb");
    }

    #[test]
    fn remove_labels_by_position_and_name() {
        let dir = tempfile::tempdir().unwrap();
        write_labels(dir.path(), "a\nb\nc\nd");
        let config = test_config(dir.path());
        run_labels(
            &config,
            LabelCommand::Remove {
                labels: vec!["1".to_string(), "c".to_string()],
            },
        )
        .unwrap();
        assert_eq!(read(dir.path(), LABELS_FILE), "b\nd");
    }

    #[test]
    fn remove_unknown_label_changes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        write_labels(dir.path(), "a\nb");
        let config = test_config(dir.path());
        let result = run_labels(
            &config,
            LabelCommand::Remove {
                labels: vec!["a".to_string(), "missing".to_string()],
            },
        );
        assert!(result.is_err());
        assert_eq!(read(dir.path(), LABELS_FILE), "a\nb");
    }

    #[test]
    fn move_label() {
        let dir = tempfile::tempdir().unwrap();
        write_labels(dir.path(), "a\nb\nc");
        let config = test_config(dir.path());
        run_labels(
            &config,
            LabelCommand::Move {
                label: "c".to_string(),
                position: 1,
            },
        )
        .unwrap();
        assert_eq!(read(dir.path(), LABELS_FILE), "c\na\nb");

        let result = run_labels(
            &config,
            LabelCommand::Move {
                label: "a".to_string(),
                position: 4,
            },
        );
        assert!(result.is_err());
    }

    #[test]
    fn clear_keeps_empty_label_file() {
        let dir = tempfile::tempdir().unwrap();
        write_labels(dir.path(), "a\nb");
        let config = test_config(dir.path());
        run_labels(&config, LabelCommand::Clear).unwrap();
        assert_eq!(read(dir.path(), LABELS_FILE), "");
        assert!(DataStore::new(dir.path().to_path_buf()).load_labels().is_empty());
    }

    #[test]
    fn add_and_remove_template() {
        let dir = tempfile::tempdir().unwrap();
        let config = test_config(dir.path());
        run_templates(
            &config,
            TemplateCommand::Add {
                template: "scan_{n}".to_string(),
            },
        )
        .unwrap();
        assert!(read(dir.path(), TEMPLATES_FILE).ends_with("\r\nscan_{n}"));

        let result = run_templates(
            &config,
            TemplateCommand::Add {
                template: "scan".to_string(),
            },
        );
        assert!(result.is_err());

        run_templates(
            &config,
            TemplateCommand::Remove {
                template: "scan_{n}".to_string(),
            },
        )
        .unwrap();
        assert!(!read(dir.path(), TEMPLATES_FILE).contains("scan_{n}"));
    }

    #[test]
    fn set_default_template_by_position() {
        let dir = tempfile::tempdir().unwrap();
        let config = test_config(dir.path());
        run_templates(
            &config,
            TemplateCommand::Default {
                template: Some("3".to_string()),
            },
        )
        .unwrap();
        assert_eq!(read(dir.path(), DEFAULT_TEMPLATE_FILE), "IMG_{n}");

        let result = run_templates(
            &config,
            TemplateCommand::Default {
                template: Some("no placeholder".to_string()),
            },
        );
        assert!(result.is_err());
        assert_eq!(read(dir.path(), DEFAULT_TEMPLATE_FILE), "IMG_{n}");
    }
}
