//! Type definitions for the interactive state machine.
//!
//! This module defines the interaction modes, the transient argument form,
//! status reporting and the events the state machine consumes.

use crossterm::event::KeyEvent;
use devtunnel_tui_core::command_definitions::CommandSpec;
use devtunnel_tui_core::execution::RunMessage;

use super::input::TextInput;

/// Character limit of a single form field
const FIELD_CHAR_LIMIT: usize = 300;

/// Everything the state machine reacts to.
#[derive(Debug, Clone)]
pub enum AppEvent {
    Key(KeyEvent),
    Resize(u16, u16),
    Tick,
    Run(RunMessage),
}

/// What the event loop should do after an event was applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Continue,
    Quit,
}

/// Exactly one of these is active at a time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    /// Browsing categories and commands
    Normal,
    /// Editing the filter text, which lives on the app so it outlives the mode
    Filtering,
    /// Typing a command line that follows the tool name
    RawCommand(TextInput),
    /// Filling in the argument slots of a command
    Form(ArgumentForm),
    /// A child process is in flight
    Running,
}

impl Mode {
    pub fn label(&self) -> &'static str {
        match self {
            Mode::Normal => "NORMAL",
            Mode::Filtering => "FILTER",
            Mode::RawCommand(_) => "COMMAND",
            Mode::Form(_) => "FORM",
            Mode::Running => "RUNNING",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormField {
    pub label: String,
    pub input: TextInput,
}

/// Argument entry for one command: required labels first, then the optional one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArgumentForm {
    pub command: CommandSpec,
    pub fields: Vec<FormField>,
    pub focus: usize,
}

impl ArgumentForm {
    /// Returns `None` for commands without argument slots.
    pub fn new(command: CommandSpec) -> Option<Self> {
        let fields: Vec<FormField> = command
            .field_labels()
            .into_iter()
            .map(|label| FormField {
                input: TextInput::new("> ", &label, FIELD_CHAR_LIMIT),
                label,
            })
            .collect();

        if fields.is_empty() {
            return None;
        }

        Some(Self {
            command,
            fields,
            focus: 0,
        })
    }

    pub fn focused(&self) -> &FormField {
        &self.fields[self.focus]
    }

    pub fn focused_mut(&mut self) -> &mut FormField {
        &mut self.fields[self.focus]
    }

    pub fn is_last_field_focused(&self) -> bool {
        self.focus + 1 >= self.fields.len()
    }

    pub fn focus_next(&mut self) {
        if !self.is_last_field_focused() {
            self.focus += 1;
        }
    }

    pub fn focus_previous(&mut self) {
        self.focus = self.focus.saturating_sub(1);
    }

    pub fn is_optional_field(&self, index: usize) -> bool {
        index >= self.command.required.len()
    }

    pub fn values(&self) -> Vec<String> {
        self.fields
            .iter()
            .map(|field| field.input.value().to_string())
            .collect()
    }
}

/// Whether the wrapped tool was found on the search path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolStatus {
    Checking,
    Available,
    Missing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusLevel {
    Ok,
    Warn,
    Error,
}

/// The status line shown in the header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Status {
    pub text: String,
    pub level: StatusLevel,
}

impl Status {
    pub fn ok(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            level: StatusLevel::Ok,
        }
    }

    pub fn warn(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            level: StatusLevel::Warn,
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            level: StatusLevel::Error,
        }
    }
}

/// Direction to move a cursor.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CycleDirection {
    Up,
    Down,
}
