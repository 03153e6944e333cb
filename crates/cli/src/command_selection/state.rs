//! The interactive state machine.
//!
//! All mutation happens here, on the event loop thread. Child processes are
//! handed to an [`Executor`] and their results come back as [`AppEvent::Run`].

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use devtunnel_tui_core::command_definitions::{Category, CommandSpec, LastCommand};
use devtunnel_tui_core::error::Error;
use devtunnel_tui_core::execution::{Executor, Origin, Outcome, RunMessage, RunOutcome};
use devtunnel_tui_core::file_handling::write_last_command;
use devtunnel_tui_core::interpolation::{base_argv, command_text, interpolate_command, raw_argv};
use log::{debug, info, warn};

use super::input::TextInput;
use super::layout::Layout;
use super::text::sanitize_line;
use super::types::{
    Action, AppEvent, ArgumentForm, CycleDirection, Mode, Status, ToolStatus,
};
use super::{FILTER_KEY, HELP_KEY, RAW_COMMAND_KEY, RERUN_KEY};

const FILTER_CHAR_LIMIT: usize = 120;
const RAW_CHAR_LIMIT: usize = 500;

/// Start-up settings for [`App`].
pub struct AppConfig {
    pub tool: String,
    pub catalog: Vec<Category>,
    pub last_command: Option<LastCommand>,
    /// Where to persist each dispatch; `None` disables saving
    pub last_command_path: Option<String>,
}

/// What the output pane currently shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputContent {
    Placeholder,
    Running(String),
    Finished(RunOutcome),
}

/// Drops a persisted command that would run something other than `tool`.
fn usable_last_command(last_command: Option<LastCommand>, tool: &str) -> Option<Vec<String>> {
    let last_command = last_command?;
    if last_command.argv.first().map(String::as_str) != Some(tool) {
        warn!("Ignoring last command `{last_command}`, it does not run {tool}");
        return None;
    }

    Some(last_command.argv)
}

pub struct App<E: Executor> {
    tool: String,
    catalog: Vec<Category>,
    executor: E,
    mode: Mode,
    filter: TextInput,
    category_index: usize,
    command_index: usize,
    tool_status: ToolStatus,
    status: Status,
    last_command: Option<Vec<String>>,
    last_command_path: Option<String>,
    output: OutputContent,
    output_scroll: usize,
    layout: Layout,
    show_help: bool,
    spinner_frame: usize,
}

impl<E: Executor> App<E> {
    pub fn new(config: AppConfig, executor: E) -> Self {
        let status = Status::warn(format!("checking {} binary", config.tool));
        Self {
            filter: TextInput::new("/ ", "filter commands", FILTER_CHAR_LIMIT),
            last_command: usable_last_command(config.last_command, &config.tool),
            last_command_path: config.last_command_path,
            tool: config.tool,
            catalog: config.catalog,
            executor,
            mode: Mode::Normal,
            category_index: 0,
            command_index: 0,
            tool_status: ToolStatus::Checking,
            status,
            output: OutputContent::Placeholder,
            output_scroll: 0,
            layout: Layout::new(80, 24),
            show_help: false,
            spinner_frame: 0,
        }
    }

    pub fn tool(&self) -> &str {
        &self.tool
    }

    pub fn catalog(&self) -> &[Category] {
        &self.catalog
    }

    pub fn mode(&self) -> &Mode {
        &self.mode
    }

    pub fn filter(&self) -> &TextInput {
        &self.filter
    }

    pub fn category_index(&self) -> usize {
        self.category_index
    }

    pub fn command_index(&self) -> usize {
        self.command_index
    }

    pub fn tool_status(&self) -> ToolStatus {
        self.tool_status
    }

    pub fn status(&self) -> &Status {
        &self.status
    }

    pub fn last_command(&self) -> Option<&[String]> {
        self.last_command.as_deref()
    }

    pub fn output(&self) -> &OutputContent {
        &self.output
    }

    pub fn output_scroll(&self) -> usize {
        self.output_scroll
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn show_help(&self) -> bool {
        self.show_help
    }

    pub fn spinner_frame(&self) -> usize {
        self.spinner_frame
    }

    pub fn is_running(&self) -> bool {
        self.mode == Mode::Running
    }

    pub fn executor(&self) -> &E {
        &self.executor
    }

    /// Commands of the current category that match the filter text.
    pub fn visible_commands(&self) -> Vec<&CommandSpec> {
        let Some(category) = self.catalog.get(self.category_index) else {
            return Vec::new();
        };

        let needle = self.filter.value().trim().to_lowercase();
        if needle.is_empty() {
            return category.commands.iter().collect();
        }

        category
            .commands
            .iter()
            .filter(|command| command.search_text().contains(&needle))
            .collect()
    }

    pub fn selected_command(&self) -> Option<&CommandSpec> {
        let visible = self.visible_commands();
        let index = self.command_index.min(visible.len().saturating_sub(1));
        visible.get(index).copied()
    }

    /// Text of the output pane, one display-safe entry per line.
    pub fn output_lines(&self) -> Vec<String> {
        let text = match &self.output {
            OutputContent::Placeholder => "Output will appear here".to_string(),
            OutputContent::Running(command) => format!("$ {command}\n\nRunning..."),
            OutputContent::Finished(result) => {
                format!("$ {}\n\n{}", result.command_text, result.output)
            }
        };
        text.lines().map(sanitize_line).collect()
    }

    /// Applies one event. This is the only way state changes.
    pub fn update(&mut self, event: AppEvent) -> Action {
        match event {
            AppEvent::Key(key) => return self.handle_key(key),
            AppEvent::Resize(width, height) => {
                self.layout = Layout::new(width, height);
                self.clamp_output_scroll();
            }
            AppEvent::Tick => {
                if self.is_running() {
                    self.spinner_frame = self.spinner_frame.wrapping_add(1);
                }
            }
            AppEvent::Run(message) => self.handle_run_message(message),
        }

        Action::Continue
    }

    fn handle_key(&mut self, key: KeyEvent) -> Action {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            return Action::Quit;
        }

        match self.mode {
            Mode::Normal => self.handle_normal_key(key),
            Mode::Filtering => {
                self.handle_filter_key(key);
                Action::Continue
            }
            Mode::RawCommand(_) => {
                self.handle_raw_key(key);
                Action::Continue
            }
            Mode::Form(_) => {
                self.handle_form_key(key);
                Action::Continue
            }
            Mode::Running => {
                // Only quitting is possible while a command is in flight
                if key.code == KeyCode::Char('q') {
                    Action::Quit
                } else {
                    Action::Continue
                }
            }
        }
    }

    fn handle_normal_key(&mut self, key: KeyEvent) -> Action {
        if self.show_help {
            self.show_help = false;
            return if key.code == KeyCode::Char('q') {
                Action::Quit
            } else {
                Action::Continue
            };
        }

        match key.code {
            KeyCode::Char('q') => return Action::Quit,
            KeyCode::Left | KeyCode::Char('h') => self.move_category(CycleDirection::Up),
            KeyCode::Right | KeyCode::Char('l') => self.move_category(CycleDirection::Down),
            KeyCode::Up | KeyCode::Char('k') => self.move_command(CycleDirection::Up),
            KeyCode::Down | KeyCode::Char('j') => self.move_command(CycleDirection::Down),
            KeyCode::Char('g') => self.command_index = 0,
            KeyCode::Char('G') => {
                self.command_index = self.visible_commands().len().saturating_sub(1);
            }
            KeyCode::Char(c @ '1'..='9') => {
                let index = (c as usize) - ('1' as usize);
                if index < self.catalog.len() {
                    self.category_index = index;
                    self.command_index = 0;
                }
            }
            KeyCode::Char(FILTER_KEY) => self.mode = Mode::Filtering,
            KeyCode::Char(RAW_COMMAND_KEY) => self.open_raw_command(),
            KeyCode::Char(RERUN_KEY) => self.rerun(),
            KeyCode::Char(HELP_KEY) => self.show_help = true,
            KeyCode::Char('u') | KeyCode::PageUp => self.scroll_output(CycleDirection::Up),
            KeyCode::Char('d') | KeyCode::PageDown => self.scroll_output(CycleDirection::Down),
            KeyCode::Enter => self.run_selected(),
            _ => {}
        }

        Action::Continue
    }

    fn move_category(&mut self, direction: CycleDirection) {
        let new_index = match direction {
            CycleDirection::Up => self.category_index.saturating_sub(1),
            CycleDirection::Down => {
                (self.category_index + 1).min(self.catalog.len().saturating_sub(1))
            }
        };

        if new_index != self.category_index {
            self.category_index = new_index;
            self.command_index = 0;
        }
    }

    fn move_command(&mut self, direction: CycleDirection) {
        let visible_count = self.visible_commands().len();
        if visible_count == 0 {
            self.command_index = 0;
            return;
        }

        self.command_index = match direction {
            CycleDirection::Up => self.command_index.saturating_sub(1),
            CycleDirection::Down => (self.command_index + 1).min(visible_count - 1),
        };
    }

    fn scroll_output(&mut self, direction: CycleDirection) {
        let step = (self.layout.output_rows() / 2).max(1);
        self.output_scroll = match direction {
            CycleDirection::Up => self.output_scroll.saturating_sub(step),
            CycleDirection::Down => self.output_scroll.saturating_add(step),
        };
        self.clamp_output_scroll();
    }

    fn clamp_output_scroll(&mut self) {
        let max_scroll = self
            .output_lines()
            .len()
            .saturating_sub(self.layout.output_rows());
        self.output_scroll = self.output_scroll.min(max_scroll);
    }

    fn handle_filter_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => self.mode = Mode::Normal,
            KeyCode::Enter => {
                self.mode = Mode::Normal;
                self.command_index = 0;
            }
            _ => {
                if self.filter.handle_key(key) {
                    self.command_index = 0;
                }
            }
        }
    }

    fn open_raw_command(&mut self) {
        let input = TextInput::new(
            ": ",
            &format!("type command after '{}'", self.tool),
            RAW_CHAR_LIMIT,
        );
        self.mode = Mode::RawCommand(input);
    }

    fn handle_raw_key(&mut self, key: KeyEvent) {
        let Mode::RawCommand(input) = &mut self.mode else {
            return;
        };

        match key.code {
            KeyCode::Esc => self.mode = Mode::Normal,
            KeyCode::Enter => {
                let argv = raw_argv(&self.tool, input.value());
                self.mode = Mode::Normal;
                // Blank input is a silent no-op
                if let Some(argv) = argv {
                    self.dispatch(argv);
                }
            }
            _ => {
                input.handle_key(key);
            }
        }
    }

    fn handle_form_key(&mut self, key: KeyEvent) {
        let Mode::Form(form) = &mut self.mode else {
            return;
        };

        match key.code {
            KeyCode::Esc => self.mode = Mode::Normal,
            KeyCode::Tab => form.focus_next(),
            KeyCode::BackTab => form.focus_previous(),
            KeyCode::Enter if !form.is_last_field_focused() => form.focus_next(),
            KeyCode::Enter => {
                let Mode::Form(form) = std::mem::replace(&mut self.mode, Mode::Normal) else {
                    return;
                };
                self.submit_form(&form);
            }
            _ => {
                form.focused_mut().input.handle_key(key);
            }
        }
    }

    fn submit_form(&mut self, form: &ArgumentForm) {
        match interpolate_command(&self.tool, &form.command, &form.values()) {
            Ok(argv) => self.dispatch(argv),
            Err(Error::MissingRequiredArgument(label)) => {
                debug!("Form for `{}` is missing `{label}`", form.command.name);
                self.status = Status::error(format!("missing required: {label}"));
            }
            Err(e) => self.status = Status::error(e.to_string()),
        }
    }

    /// Refuses with a status message unless the tool was detected.
    /// A probe that has not reported yet counts as not detected.
    fn ensure_tool_available(&mut self) -> bool {
        if self.tool_status == ToolStatus::Available {
            return true;
        }

        self.status = Status::error(format!("install {} CLI first", self.tool));
        false
    }

    fn run_selected(&mut self) {
        if !self.ensure_tool_available() {
            return;
        }

        let Some(command) = self.selected_command().cloned() else {
            return;
        };

        if command.raw {
            self.open_raw_command();
            return;
        }

        let argv = base_argv(&self.tool, &command);
        match ArgumentForm::new(command) {
            Some(form) => self.mode = Mode::Form(form),
            None => self.dispatch(argv),
        }
    }

    fn rerun(&mut self) {
        if let Some(argv) = self.last_command.clone() {
            self.dispatch(argv);
        }
    }

    /// The single path to the executor.
    fn dispatch(&mut self, argv: Vec<String>) {
        if !self.ensure_tool_available() {
            return;
        }

        let text = command_text(&argv);
        info!("Dispatching `{text}`");

        let saved = self.save_last_command(&argv);
        self.last_command = Some(argv.clone());
        self.mode = Mode::Running;
        self.status = if saved {
            Status::warn(format!("running {text}"))
        } else {
            Status::warn(format!("running {text} (last command not saved)"))
        };
        self.output = OutputContent::Running(text);
        self.output_scroll = 0;
        self.executor.execute(argv);
    }

    /// Returns false only when a save was attempted and failed.
    fn save_last_command(&self, argv: &[String]) -> bool {
        let Some(path) = &self.last_command_path else {
            return true;
        };

        let last = LastCommand {
            argv: argv.to_vec(),
        };
        match write_last_command(path, &last) {
            Ok(()) => true,
            Err(e) => {
                warn!("Could not save last command: {e}");
                false
            }
        }
    }

    fn handle_run_message(&mut self, message: RunMessage) {
        match message {
            RunMessage::Started {
                origin: Origin::Probe,
                ..
            } => {}
            RunMessage::Finished {
                origin: Origin::Probe,
                result,
            } => {
                if result.is_success() {
                    self.tool_status = ToolStatus::Available;
                    self.status = Status::ok("ready");
                } else {
                    self.tool_status = ToolStatus::Missing;
                    self.status = Status::error(format!("{} not found in PATH", self.tool));
                }
            }
            RunMessage::Started {
                origin: Origin::User,
                command_text,
            } => {
                self.status = Status::warn(format!("running {command_text}"));
                self.output = OutputContent::Running(command_text);
                self.output_scroll = 0;
            }
            RunMessage::Finished {
                origin: Origin::User,
                result,
            } => {
                self.status = match result.outcome {
                    Outcome::Success => Status::ok("command completed"),
                    Outcome::Failure(_) => Status::error("command failed"),
                    Outcome::TimedOut => Status::error("command timed out"),
                };
                self.output = OutputContent::Finished(result);
                self.output_scroll = 0;
                if self.mode == Mode::Running {
                    self.mode = Mode::Normal;
                }
            }
        }
    }
}
