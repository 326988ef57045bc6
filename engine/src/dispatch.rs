use std::{io::Write, path::PathBuf};

use crate::{
    DashScope, Mode, TaskError, TaskResult,
    asr::{AsrTask, AudioSource},
    image_model::{ImageModel, ImageTask},
    tts::{DEFAULT_VOICE, TtsModel, TtsTask},
};

/// Raw per-invocation arguments, before any mode specific checks.
#[derive(Debug, Clone, Default)]
pub struct Request {
    pub model: String,
    pub prompt: Option<String>,
    pub size: Option<String>,
    pub input_audio: Option<String>,
    pub text: Option<String>,
    pub voice: Option<String>,
    pub output: Option<PathBuf>,
}

/// A validated unit of work for exactly one mode.
#[derive(Debug, Clone)]
pub enum Task {
    Image(ImageTask),
    Asr(AsrTask),
    Tts(TtsTask),
}

/// What a successful task produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Saved(PathBuf),
    Transcript(String),
}

fn present(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

impl Task {
    /// Checks the arguments `mode` needs and the model id. Never touches the network.
    pub fn validate(mode: Mode, req: Request) -> TaskResult<Self> {
        let Request {
            model,
            prompt,
            size,
            input_audio,
            text,
            voice,
            output,
        } = req;
        let output = output.filter(|p| !p.as_os_str().is_empty());

        match mode {
            Mode::Image => {
                let (Some(prompt), Some(output)) = (present(prompt), output) else {
                    return Err(TaskError::MissingArgument {
                        mode,
                        flags: "--prompt and --output",
                    });
                };
                Ok(Task::Image(ImageTask {
                    model: ImageModel::from_id(&model)?,
                    prompt,
                    size: present(size),
                    output,
                }))
            }
            Mode::Asr => {
                let Some(locator) = present(input_audio) else {
                    return Err(TaskError::MissingArgument {
                        mode,
                        flags: "--input-audio",
                    });
                };
                Ok(Task::Asr(AsrTask {
                    model,
                    source: AudioSource::classify(&locator),
                }))
            }
            Mode::Tts => {
                let (Some(text), Some(output)) = (present(text), output) else {
                    return Err(TaskError::MissingArgument {
                        mode,
                        flags: "--text and --output",
                    });
                };
                Ok(Task::Tts(TtsTask {
                    model: TtsModel::from_id(&model)?,
                    text,
                    voice: present(voice).unwrap_or_else(|| DEFAULT_VOICE.to_string()),
                    output,
                }))
            }
        }
    }

    pub async fn run(&self, client: &DashScope, out: &mut impl Write) -> TaskResult<Outcome> {
        match self {
            Task::Image(task) => task.run(client, out).await.map(Outcome::Saved),
            Task::Asr(task) => task.run(client, out).await.map(Outcome::Transcript),
            Task::Tts(task) => task.run(client, out).await.map(Outcome::Saved),
        }
    }
}
