use std::path::PathBuf;

use reqwest::StatusCode;
use thiserror::Error;

use crate::Mode;

/// Everything that can end an invocation early.
#[derive(Debug, Error)]
pub enum TaskError {
    #[error(
        "{env_var} not found. Set it in environment, pass --api-key, or create {}.",
        .key_file.display()
    )]
    MissingCredential {
        env_var: &'static str,
        key_file: PathBuf,
    },

    #[error("{} required for {mode} mode.", with_verb(.flags))]
    MissingArgument { mode: Mode, flags: &'static str },

    #[error("Input audio file not found: {}", .0.display())]
    InputNotFound(PathBuf),

    #[error("Model {model} is not supported in {mode} mode (supported: {supported}).")]
    UnsupportedModel {
        mode: Mode,
        model: String,
        supported: String,
    },

    #[error("API returned {code}: {message}")]
    VendorApi { code: String, message: String },

    #[error("Unexpected response format, {missing}: {body}")]
    UnexpectedResponseShape { missing: &'static str, body: String },

    #[error("HTTP {status} from {url}: {body}")]
    HttpStatus {
        url: String,
        status: StatusCode,
        body: String,
    },

    #[error("request failed")]
    Transport(#[from] reqwest::Error),

    #[error("couldn't parse response")]
    Parse(#[from] serde_json::Error),

    #[error("i/o failure")]
    Io(#[from] std::io::Error),
}

fn with_verb(flags: &str) -> String {
    if flags.contains(" and ") {
        format!("{flags} are")
    } else {
        format!("{flags} is")
    }
}

impl TaskError {
    /// Transport, status, parse and i/o failures; these are reported with their full cause chain.
    pub fn is_transport_or_parse(&self) -> bool {
        matches!(
            self,
            Self::HttpStatus { .. } | Self::Transport(_) | Self::Parse(_) | Self::Io(_)
        )
    }

    pub(crate) fn unexpected_shape(missing: &'static str, body: &str) -> Self {
        let body = serde_json::from_str::<serde_json::Value>(body)
            .and_then(|v| serde_json::to_string_pretty(&v))
            .unwrap_or_else(|_| body.to_string());
        Self::UnexpectedResponseShape { missing, body }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn missing_argument_message() {
        let err = TaskError::MissingArgument {
            mode: Mode::Image,
            flags: "--prompt and --output",
        };
        assert_eq!(
            err.to_string(),
            "--prompt and --output are required for image mode."
        );

        let err = TaskError::MissingArgument {
            mode: Mode::Asr,
            flags: "--input-audio",
        };
        assert_eq!(err.to_string(), "--input-audio is required for asr mode.");
    }

    #[test]
    fn unexpected_shape_pretty_prints_json() {
        let err = TaskError::unexpected_shape("no image found", r#"{"output":{}}"#);
        let TaskError::UnexpectedResponseShape { body, .. } = err else {
            panic!("wrong variant");
        };
        assert_eq!(body, "{\n  \"output\": {}\n}");

        let err = TaskError::unexpected_shape("no image found", "not json");
        assert!(err.to_string().ends_with("not json"));
    }
}
