use log::error;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Error {} {} file at `{}`: {}", .action, .file_description, .path, .original)]
    Yaml {
        action: String,
        file_description: String,
        path: String,
        original: serde_yaml::Error,
    },

    #[error("IO error with {} file at path `{}`: {}", .file_description, .path, .original)]
    Io {
        file_description: String,
        path: String,
        original: std::io::Error,
    },

    #[error("No categories were found in the catalog. Is `{}` empty?", .path)]
    EmptyCatalog { path: String },

    #[error("Category `{}` has no commands.", .0)]
    EmptyCategory(String),

    #[error("Found a non-unique command name in category {}: `{}`", .0, .1)]
    NonUniqueCommandName(String, String),

    #[error("Raw command entry `{}` may not declare argument slots", .0)]
    RawEntryWithArguments(String),

    #[error("Invalid name: command and category names may not be empty")]
    EmptyName,

    #[error("missing required: {}", .0)]
    MissingRequiredArgument(String),

    #[error("Cannot run an empty argument vector")]
    EmptyArgumentVector,

    #[error("{} not found in PATH", .0)]
    ToolNotFound(String),

    #[error("Failed to launch `{}`: {}", .program, .original)]
    Launch {
        program: String,
        original: std::io::Error,
    },

    #[error("Terminal error: {}", .0)]
    Terminal(#[from] std::io::Error),

    #[error("Failed to start the async runtime: {}", .0)]
    Runtime(std::io::Error),

    #[error("Invalid configuration: {}", .0)]
    Config(String),
}

impl Error {
    pub fn empty_catalog(path: String) -> Self {
        Self::EmptyCatalog { path }
    }

    pub fn yaml_error(
        action: String,
        file_description: String,
        path: String,
        original: serde_yaml::Error,
    ) -> Self {
        error!("YAML {action} failed for {file_description} file `{path}`");
        Self::Yaml {
            action,
            file_description,
            path,
            original,
        }
    }

    pub fn io_error(file_description: String, path: String, original: std::io::Error) -> Self {
        Self::Io {
            file_description,
            path,
            original,
        }
    }

    pub fn launch_error(program: &str, original: std::io::Error) -> Self {
        Self::Launch {
            program: program.to_string(),
            original,
        }
    }
}
