//! The built-in command catalog.
//!
//! Built once at startup and handed to the application by value; nothing
//! mutates it afterwards.

use crate::command_definitions::{Category, CommandSpec};

/// Display name of the built-in raw command entry.
pub const RAW_ENTRY_NAME: &str = ": command mode";

/// Returns the curated `devtunnel` subcommands grouped by category.
pub fn builtin_catalog() -> Vec<Category> {
    vec![
        Category::new(
            "Tunnels",
            vec![
                CommandSpec::new("list", "List tunnels", &["list"])
                    .with_optional("flags")
                    .with_example("list --all"),
                CommandSpec::new("show", "Show tunnel details", &["show"])
                    .with_required(&["tunnel-id"]),
                CommandSpec::new("create", "Create a tunnel", &["create"])
                    .with_required(&["tunnel-id"])
                    .with_optional("flags"),
                CommandSpec::new("update", "Update tunnel properties", &["update"])
                    .with_required(&["tunnel-id"])
                    .with_optional("flags"),
                CommandSpec::new("delete", "Delete a tunnel", &["delete"])
                    .with_required(&["tunnel-id"]),
                CommandSpec::new("delete-all", "Delete all tunnels", &["delete-all"]),
                CommandSpec::new("set", "Set default tunnel", &["set"])
                    .with_required(&["tunnel-id"]),
                CommandSpec::new("unset", "Clear default tunnel", &["unset"]),
                CommandSpec::new("token", "Issue tunnel access token", &["token"])
                    .with_required(&["tunnel-id"])
                    .with_optional("flags"),
            ],
        ),
        Category::new(
            "Ports & Access",
            vec![
                CommandSpec::new("port", "Manage tunnel ports", &["port"])
                    .with_optional("subcommand and args")
                    .with_example("port list <tunnel-id>"),
                CommandSpec::new("access", "Manage access control", &["access"])
                    .with_optional("subcommand and args")
                    .with_example("access list <tunnel-id>"),
            ],
        ),
        Category::new(
            "Connections",
            vec![
                CommandSpec::new("host", "Host a tunnel", &["host"])
                    .with_optional("tunnel-id and flags"),
                CommandSpec::new("connect", "Connect to tunnel", &["connect"])
                    .with_required(&["tunnel-id"])
                    .with_optional("flags"),
            ],
        ),
        Category::new(
            "User",
            vec![
                CommandSpec::new(
                    "user login",
                    "Authenticate user credentials",
                    &["user", "login"],
                ),
                CommandSpec::new("user logout", "Remove local credentials", &["user", "logout"]),
                CommandSpec::new("user", "Run user subcommand", &["user"])
                    .with_optional("subcommand and args")
                    .with_example("user show"),
            ],
        ),
        Category::new(
            "Diagnostics",
            vec![
                CommandSpec::new("limits", "List user limits", &["limits"]),
                CommandSpec::new("clusters", "List clusters", &["clusters"]),
                CommandSpec::new("echo", "Run echo server", &["echo"])
                    .with_required(&["protocol"]),
                CommandSpec::new("ping", "Ping remote echo server", &["ping"])
                    .with_required(&["uri"]),
            ],
        ),
        Category::new(
            "Custom",
            vec![
                CommandSpec::new(RAW_ENTRY_NAME, "Type arguments for the configured tool", &[])
                    .as_raw_entry(),
            ],
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::file_handling::validate_catalog;

    #[test]
    fn test_builtin_catalog_is_valid() {
        let catalog = builtin_catalog();
        assert!(validate_catalog(&catalog).is_ok());
        assert_eq!(catalog.len(), 6);
    }

    #[test]
    fn test_builtin_catalog_has_one_raw_entry() {
        let catalog = builtin_catalog();
        let raw_entries: Vec<&CommandSpec> = catalog
            .iter()
            .flat_map(|category| category.commands.iter())
            .filter(|command| command.raw)
            .collect();
        assert_eq!(raw_entries.len(), 1);
        assert_eq!(raw_entries[0].name, RAW_ENTRY_NAME);
    }

    #[test]
    fn test_descriptions_do_not_name_an_executable() {
        for command in builtin_catalog()
            .iter()
            .flat_map(|category| category.commands.iter())
        {
            assert!(
                !command.description.contains("devtunnel"),
                "{} names the executable",
                command.name
            );
        }
    }
}
