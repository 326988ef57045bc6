use strum::{Display, IntoEnumIterator};

pub mod asr;
pub mod client;
pub mod config;
pub mod credential;
pub mod dispatch;
pub mod error;
pub mod image_model;
pub mod media;
pub mod tts;

pub use client::DashScope;
pub use config::Config;
pub use error::TaskError;

pub type TaskResult<T> = std::result::Result<T, TaskError>;

#[derive(Debug, Clone, Copy, Display, clap::ValueEnum, Hash, PartialEq, Eq)]
#[strum(serialize_all = "lowercase")]
pub enum Mode {
    /// Text-to-image generation
    Image,
    /// Speech-to-text transcription
    Asr,
    /// Text-to-speech synthesis
    Tts,
}

/// Comma separated ids of every model variant, for error messages.
pub(crate) fn supported_ids<T: IntoEnumIterator + std::fmt::Display>() -> String {
    T::iter().map(|m| m.to_string()).collect::<Vec<_>>().join(", ")
}
