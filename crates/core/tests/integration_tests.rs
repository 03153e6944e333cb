//! Integration tests for devtunnel-tui-core
//!
//! These tests verify that the core functionality works together correctly
//! by testing complete workflows end-to-end.

use devtunnel_tui_core::{
    catalog::builtin_catalog,
    command_definitions::LastCommand,
    config::get_last_command_path,
    error::Error,
    file_handling::{get_catalog, get_last_command, validate_catalog, write_last_command},
    interpolation::{command_text, interpolate_command, raw_argv},
};
use std::io::Write;
use tempfile::NamedTempFile;

fn write_temp(content: &str) -> NamedTempFile {
    let mut temp_file = NamedTempFile::new().unwrap();
    write!(temp_file, "{content}").unwrap();
    temp_file
}

/// Test loading a catalog file and building argument vectors from it
#[test]
fn test_catalog_file_to_argument_vector_workflow() {
    let yaml_content = r#"
- name: "Tunnels"
  commands:
    - name: "list"
      description: "List tunnels"
      base_args: ["list"]
      optional: "flags"
      example: "list --all"
    - name: "port create"
      description: "Add a port"
      base_args: ["port", "create"]
      required: ["tunnel-id", "port-number"]
      optional: "flags"

- name: "Custom"
  commands:
    - name: ": command mode"
      raw: true
"#;

    let temp_file = write_temp(yaml_content);
    let catalog = get_catalog(temp_file.path().to_str().unwrap()).unwrap();

    assert_eq!(catalog.len(), 2);
    assert_eq!(catalog[0].commands.len(), 2);
    assert!(catalog[1].commands[0].raw);
    assert!(catalog[1].commands[0].base_args.is_empty());

    let port_create = &catalog[0].commands[1];
    assert_eq!(port_create.field_labels(), vec!["tunnel-id", "port-number", "flags"]);

    let values = vec![
        "my-tunnel".to_string(),
        "8080".to_string(),
        "--protocol https".to_string(),
    ];
    let argv = interpolate_command("devtunnel", port_create, &values).unwrap();
    assert_eq!(
        argv,
        vec!["devtunnel", "port", "create", "my-tunnel", "8080", "--protocol", "https"]
    );
    assert_eq!(
        command_text(&argv),
        "devtunnel port create my-tunnel 8080 --protocol https"
    );

    let missing = vec![String::new(), "8080".to_string(), String::new()];
    let error = interpolate_command("devtunnel", port_create, &missing).unwrap_err();
    assert_eq!(error.to_string(), "missing required: tunnel-id");
}

#[test]
fn test_invalid_catalog_files_are_rejected() {
    let empty = write_temp("[]");
    assert!(matches!(
        get_catalog(empty.path().to_str().unwrap()),
        Err(Error::EmptyCatalog { .. })
    ));

    let raw_with_slots = write_temp(
        r#"
- name: "Custom"
  commands:
    - name: "raw"
      raw: true
      required: ["tunnel-id"]
"#,
    );
    assert!(matches!(
        get_catalog(raw_with_slots.path().to_str().unwrap()),
        Err(Error::RawEntryWithArguments(_))
    ));

    let malformed = write_temp("- name: [unclosed");
    assert!(matches!(
        get_catalog(malformed.path().to_str().unwrap()),
        Err(Error::Yaml { .. })
    ));

    assert!(matches!(
        get_catalog("/definitely/not/a/catalog.yml"),
        Err(Error::Io { .. })
    ));
}

/// Test persisting and reloading the last command
#[test]
fn test_last_command_roundtrip_workflow() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("last_command.yml");
    let path = get_last_command_path(&Some(path.to_str().unwrap().to_string()));

    assert!(get_last_command(&path).unwrap().is_none());

    let argv = raw_argv("devtunnel", "user show --verbose").unwrap();
    write_last_command(&path, &LastCommand { argv: argv.clone() }).unwrap();

    let loaded = get_last_command(&path).unwrap().unwrap();
    assert_eq!(loaded.argv, argv);
    assert_eq!(loaded.to_string(), "devtunnel user show --verbose");
}

#[test]
fn test_invalid_last_command_file_is_an_error() {
    let temp_file = write_temp("argv: {not: a list}");
    assert!(get_last_command(temp_file.path().to_str().unwrap()).is_err());
}

#[test]
fn test_builtin_catalog_commands_without_slots_build_directly() {
    let catalog = builtin_catalog();
    validate_catalog(&catalog).unwrap();

    for command in catalog.iter().flat_map(|category| category.commands.iter()) {
        if command.raw || command.takes_arguments() {
            continue;
        }
        let argv = interpolate_command("devtunnel", command, &[]).unwrap();
        assert_eq!(argv[0], "devtunnel");
        assert_eq!(&argv[1..], command.base_args.as_slice());
    }
}

#[cfg(unix)]
mod runner {
    use devtunnel_tui_core::execution::{Executor, Origin, Outcome, RunMessage, TaskRunner};
    use std::time::Duration;
    use tokio::runtime::Runtime;
    use tokio::sync::mpsc;

    /// Every dispatch yields exactly one started and one finished message, in order
    #[test]
    fn test_runner_message_pairs_from_plain_thread() {
        let runtime = Runtime::new().unwrap();
        let (sender, mut receiver) = mpsc::unbounded_channel();
        let mut runner = TaskRunner::new(runtime.handle().clone(), sender, Duration::from_secs(10));

        runner.execute(vec!["/bin/sh".to_string(), "-c".to_string(), "exit 1".to_string()]);

        let started = receiver.blocking_recv().unwrap();
        assert!(matches!(
            started,
            RunMessage::Started {
                origin: Origin::User,
                ..
            }
        ));

        match receiver.blocking_recv().unwrap() {
            RunMessage::Finished { origin, result } => {
                assert_eq!(origin, Origin::User);
                assert!(matches!(result.outcome, Outcome::Failure(_)));
                assert!(!result.output.is_empty());
            }
            other => panic!("expected finished, got {other:?}"),
        }

        assert!(receiver.try_recv().is_err());
    }
}
