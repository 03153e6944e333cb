use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

/// One invocable subcommand of the wrapped tool and the shape of its arguments.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq, Default)]
pub struct CommandSpec {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub base_args: Vec<String>,
    /// Labels of the obligatory positional values, in the order they are appended.
    #[serde(default)]
    pub required: Vec<String>,
    /// Label of a single free-text slot that may expand to zero or more tokens.
    #[serde(default)]
    pub optional: Option<String>,
    #[serde(default)]
    pub example: Option<String>,
    /// Selecting this entry opens raw command entry instead of running anything.
    #[serde(default)]
    pub raw: bool,
}

impl CommandSpec {
    pub fn new(name: &str, description: &str, base_args: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            description: description.to_string(),
            base_args: base_args.iter().map(ToString::to_string).collect(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_required(mut self, labels: &[&str]) -> Self {
        self.required = labels.iter().map(ToString::to_string).collect();
        self
    }

    #[must_use]
    pub fn with_optional(mut self, label: &str) -> Self {
        self.optional = Some(label.to_string());
        self
    }

    #[must_use]
    pub fn with_example(mut self, example: &str) -> Self {
        self.example = Some(example.to_string());
        self
    }

    #[must_use]
    pub fn as_raw_entry(mut self) -> Self {
        self.raw = true;
        self
    }

    /// The optional label, if it names a real slot.
    pub fn optional_label(&self) -> Option<&str> {
        self.optional
            .as_deref()
            .filter(|label| !label.trim().is_empty())
    }

    /// Form field labels: required labels in order, then the optional label.
    pub fn field_labels(&self) -> Vec<String> {
        let mut labels = self.required.clone();
        if let Some(optional) = self.optional_label() {
            labels.push(optional.to_string());
        }
        labels
    }

    pub fn takes_arguments(&self) -> bool {
        !self.required.is_empty() || self.optional_label().is_some()
    }

    /// Text the filter is matched against.
    pub fn search_text(&self) -> String {
        format!(
            "{} {} {}",
            self.name,
            self.description,
            self.base_args.join(" ")
        )
        .to_lowercase()
    }
}

impl Display for CommandSpec {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        if self.description.is_empty() {
            formatter.write_str(&self.name)
        } else {
            write!(formatter, "{:<14} {}", self.name, self.description)
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct Category {
    pub name: String,
    pub commands: Vec<CommandSpec>,
}

impl Category {
    pub fn new(name: &str, commands: Vec<CommandSpec>) -> Self {
        Self {
            name: name.to_string(),
            commands,
        }
    }
}

/// The argument vector of the most recent dispatch, persisted for rerun.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct LastCommand {
    pub argv: Vec<String>,
}

impl Display for LastCommand {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.argv.join(" ").as_str())
    }
}
