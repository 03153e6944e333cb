//! Assembly of argument vectors from catalog entries and operator input.

use crate::command_definitions::CommandSpec;
use crate::error::{Error, Result};

/// `[tool, ...base_args]` for a command that needs no further input.
pub fn base_argv(tool: &str, spec: &CommandSpec) -> Vec<String> {
    let mut argv = Vec::with_capacity(spec.base_args.len() + 1);
    argv.push(tool.to_string());
    argv.extend(spec.base_args.iter().cloned());
    argv
}

/// Builds the argument vector from submitted form values.
///
/// `values` holds one entry per field of [`CommandSpec::field_labels`]. Required
/// values are trimmed and appended in order; the optional value, if present, is
/// split on whitespace into trailing tokens.
///
/// # Errors
///
/// Returns [`Error::MissingRequiredArgument`] naming the first required label
/// whose trimmed value is empty.
pub fn interpolate_command(tool: &str, spec: &CommandSpec, values: &[String]) -> Result<Vec<String>> {
    let mut argv = base_argv(tool, spec);

    for (index, label) in spec.required.iter().enumerate() {
        let value = values.get(index).map_or("", |v| v.trim());
        if value.is_empty() {
            return Err(Error::MissingRequiredArgument(label.clone()));
        }
        argv.push(value.to_string());
    }

    // The optional slot always sits directly after the required ones
    if spec.optional_label().is_some() {
        if let Some(extra) = values.get(spec.required.len()) {
            argv.extend(extra.split_whitespace().map(ToString::to_string));
        }
    }

    Ok(argv)
}

/// Tokenizes raw operator input after the tool name.
///
/// Returns `None` when the input holds no tokens.
pub fn raw_argv(tool: &str, raw: &str) -> Option<Vec<String>> {
    let mut tokens = raw.split_whitespace().peekable();
    tokens.peek()?;

    let mut argv = vec![tool.to_string()];
    argv.extend(tokens.map(ToString::to_string));
    Some(argv)
}

/// Human readable form of an argument vector.
pub fn command_text(argv: &[String]) -> String {
    argv.join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec_with_optional() -> CommandSpec {
        CommandSpec::new("connect", "Connect to tunnel", &["connect"])
            .with_required(&["a", "b"])
            .with_optional("c")
    }

    fn values(values: &[&str]) -> Vec<String> {
        values.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn test_required_then_split_optional() {
        let argv =
            interpolate_command("devtunnel", &spec_with_optional(), &values(&["X", "Y", "--flag val"]))
                .unwrap();
        assert_eq!(argv, vec!["devtunnel", "connect", "X", "Y", "--flag", "val"]);
    }

    #[test]
    fn test_required_values_are_trimmed() {
        let argv =
            interpolate_command("devtunnel", &spec_with_optional(), &values(&["  X ", "Y", ""]))
                .unwrap();
        assert_eq!(argv, vec!["devtunnel", "connect", "X", "Y"]);
    }

    #[test]
    fn test_first_missing_required_is_named() {
        let result = interpolate_command("devtunnel", &spec_with_optional(), &values(&["", "", "x"]));
        match result {
            Err(Error::MissingRequiredArgument(label)) => assert_eq!(label, "a"),
            other => panic!("expected missing required, got {other:?}"),
        }

        let result = interpolate_command("devtunnel", &spec_with_optional(), &values(&["X", " ", ""]));
        assert!(matches!(result, Err(Error::MissingRequiredArgument(label)) if label == "b"));
    }

    #[test]
    fn test_only_required_last_field_is_not_split() {
        // No optional slot: the last field is required and taken verbatim after trimming
        let spec = CommandSpec::new("show", "", &["show"]).with_required(&["tunnel-id"]);
        let argv = interpolate_command("devtunnel", &spec, &values(&["my tunnel"])).unwrap();
        assert_eq!(argv, vec!["devtunnel", "show", "my tunnel"]);
    }

    #[test]
    fn test_only_optional_field() {
        let spec = CommandSpec::new("list", "", &["list"]).with_optional("flags");
        let argv = interpolate_command("devtunnel", &spec, &values(&["--all   --json"])).unwrap();
        assert_eq!(argv, vec!["devtunnel", "list", "--all", "--json"]);

        let argv = interpolate_command("devtunnel", &spec, &values(&[""])).unwrap();
        assert_eq!(argv, vec!["devtunnel", "list"]);
    }

    #[test]
    fn test_raw_argv_tokenization() {
        assert_eq!(
            raw_argv("devtunnel", "user show --verbose"),
            Some(values(&["devtunnel", "user", "show", "--verbose"]))
        );
        assert_eq!(raw_argv("devtunnel", "   "), None);
        assert_eq!(raw_argv("devtunnel", ""), None);
    }

    #[test]
    fn test_base_argv_and_command_text() {
        let spec = CommandSpec::new("user login", "", &["user", "login"]);
        let argv = base_argv("devtunnel", &spec);
        assert_eq!(command_text(&argv), "devtunnel user login");
    }
}
