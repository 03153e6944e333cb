//! File handling and validation for devtunnel-tui configuration.
//!
//! This module reads and validates catalog files and persists the last
//! dispatched argument vector so it can be rerun in a later session.

use std::collections::HashSet;
use std::fs::{self, File};
use std::path::Path;

use log::debug;

use crate::command_definitions::{Category, LastCommand};
use crate::error::Error::{EmptyCategory, EmptyName, NonUniqueCommandName, RawEntryWithArguments};
use crate::error::{Error, Result};

fn get_reader(file_description: &str, path: &str) -> Result<File> {
    File::open(path).map_err(|e| Error::io_error(file_description.to_string(), path.to_string(), e))
}

/// Reads the last dispatched command from disk.
///
/// Returns `None` if the file doesn't exist.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be read, or does not
/// contain a valid last command document.
pub fn get_last_command(last_command_path: &str) -> Result<Option<LastCommand>> {
    if !Path::new(last_command_path).exists() {
        return Ok(None);
    }

    let reader = get_reader("last command", last_command_path)?;

    let last_command: LastCommand = serde_yaml::from_reader(reader).map_err(|e| {
        Error::yaml_error(
            "reading".to_string(),
            "last command".to_string(),
            last_command_path.to_string(),
            e,
        )
    })?;

    // An empty vector cannot be rerun, treat it like no file at all
    if last_command.argv.is_empty() {
        return Ok(None);
    }

    Ok(Some(last_command))
}

/// Writes the last dispatched command to disk, creating the parent directory
/// if needed.
///
/// # Errors
///
/// Returns an error if the directory or file cannot be created, or
/// serialization fails.
pub fn write_last_command(path: &str, last_command: &LastCommand) -> Result<()> {
    if let Some(parent) = Path::new(path).parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent).map_err(|e| {
                Error::io_error("last command".to_string(), path.to_string(), e)
            })?;
        }
    }

    let f = File::create(path)
        .map_err(|e| Error::io_error("last command".to_string(), path.to_string(), e))?;

    serde_yaml::to_writer(f, last_command).map_err(|e| {
        Error::yaml_error(
            "writing".to_string(),
            "last command".to_string(),
            path.to_string(),
            e,
        )
    })
}

fn validate_name(name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(EmptyName);
    }

    Ok(())
}

fn validate_category(category: &Category) -> Result<()> {
    validate_name(&category.name)?;

    if category.commands.is_empty() {
        return Err(EmptyCategory(category.name.clone()));
    }

    let mut names = HashSet::new();
    for command in &category.commands {
        validate_name(&command.name)?;

        if !names.insert(command.name.as_str()) {
            return Err(NonUniqueCommandName(
                category.name.clone(),
                command.name.clone(),
            ));
        }

        if command.raw && command.takes_arguments() {
            return Err(RawEntryWithArguments(command.name.clone()));
        }
    }

    Ok(())
}

/// Checks every category of a catalog.
///
/// # Errors
///
/// Returns the first validation failure: an empty category, a blank name,
/// a duplicated command name within a category, or a raw entry that also
/// declares argument slots.
pub fn validate_catalog(catalog: &[Category]) -> Result<()> {
    catalog.iter().try_for_each(validate_category)
}

/// Loads and validates a catalog from a YAML file.
///
/// # Errors
///
/// Returns an error if:
/// - The catalog file cannot be read
/// - The YAML is malformed or doesn't match the expected structure
/// - The catalog has no categories
/// - Any category fails validation (see [`validate_catalog`])
pub fn get_catalog(catalog_path: &str) -> Result<Vec<Category>> {
    let reader = get_reader("catalog", catalog_path)?;

    let catalog: Vec<Category> = serde_yaml::from_reader(reader).map_err(|e| {
        Error::yaml_error(
            "reading".to_string(),
            "catalog".to_string(),
            catalog_path.to_string(),
            e,
        )
    })?;

    if catalog.is_empty() {
        return Err(Error::empty_catalog(catalog_path.to_string()));
    }

    validate_catalog(&catalog)?;

    debug!(
        "Loaded {} categories from catalog `{}`",
        catalog.len(),
        catalog_path
    );

    Ok(catalog)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command_definitions::CommandSpec;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_temp(content: &str) -> NamedTempFile {
        let mut temp_file = NamedTempFile::new().unwrap();
        write!(temp_file, "{content}").unwrap();
        temp_file
    }

    #[test]
    fn test_validate_name() {
        assert!(validate_name("list").is_ok());
        assert!(validate_name("user login").is_ok());
        assert!(matches!(validate_name(""), Err(EmptyName)));
        assert!(matches!(validate_name("   "), Err(EmptyName)));
    }

    #[test]
    fn test_validate_category_duplicate_command() {
        let category = Category::new(
            "Tunnels",
            vec![
                CommandSpec::new("list", "", &["list"]),
                CommandSpec::new("list", "", &["list", "--all"]),
            ],
        );
        assert!(matches!(
            validate_category(&category),
            Err(NonUniqueCommandName(_, _))
        ));
    }

    #[test]
    fn test_validate_category_empty() {
        let category = Category::new("Empty", vec![]);
        assert!(matches!(validate_category(&category), Err(EmptyCategory(_))));
    }

    #[test]
    fn test_validate_raw_entry_with_slots() {
        let category = Category::new(
            "Custom",
            vec![CommandSpec::new("raw", "", &[])
                .with_required(&["x"])
                .as_raw_entry()],
        );
        assert!(matches!(
            validate_category(&category),
            Err(RawEntryWithArguments(_))
        ));
    }

    #[test]
    fn test_write_and_read_last_command() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("last_command.yml");
        let path = path.to_str().unwrap();

        let last = LastCommand {
            argv: vec!["devtunnel".to_string(), "show".to_string(), "abc".to_string()],
        };

        assert!(write_last_command(path, &last).is_ok());

        let read_back = get_last_command(path).unwrap();
        assert_eq!(read_back, Some(last));
    }

    #[test]
    fn test_get_last_command_file_not_exists() {
        let result = get_last_command("/this/path/does/not/exist.yml").unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn test_get_last_command_empty_argv() {
        let temp_file = write_temp("argv: []\n");
        let result = get_last_command(temp_file.path().to_str().unwrap()).unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn test_get_last_command_invalid_yaml() {
        let temp_file = write_temp("argv: [unterminated");
        let result = get_last_command(temp_file.path().to_str().unwrap());
        assert!(matches!(result, Err(Error::Yaml { .. })));
    }

    #[test]
    fn test_get_catalog_valid_yaml() {
        let temp_file = write_temp(
            r#"
- name: "Tunnels"
  commands:
    - name: "show"
      description: "Show tunnel details"
      base_args: ["show"]
      required: ["tunnel-id"]
    - name: "list"
      base_args: ["list"]
      optional: "flags"
"#,
        );

        let catalog = get_catalog(temp_file.path().to_str().unwrap()).unwrap();
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog[0].commands.len(), 2);
        assert_eq!(catalog[0].commands[0].required, vec!["tunnel-id"]);
        assert_eq!(catalog[0].commands[1].optional.as_deref(), Some("flags"));
    }

    #[test]
    fn test_get_catalog_empty_file() {
        let temp_file = write_temp("[]");
        let result = get_catalog(temp_file.path().to_str().unwrap());
        assert!(matches!(result, Err(Error::EmptyCatalog { .. })));
    }

    #[test]
    fn test_get_catalog_invalid_yaml() {
        let temp_file = write_temp("invalid: yaml: content: [");
        let result = get_catalog(temp_file.path().to_str().unwrap());
        assert!(matches!(result, Err(Error::Yaml { .. })));
    }

    #[test]
    fn test_get_catalog_file_not_found() {
        let result = get_catalog("/this/path/does/not/exist.yml");
        assert!(matches!(result, Err(Error::Io { .. })));
    }
}
