use std::{io::Write, path::PathBuf};

use log::info;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoStaticStr};

use crate::{DashScope, Mode, TaskError, TaskResult, media, supported_ids};

pub const DEFAULT_VOICE: &str = "Cherry";
pub const LANGUAGE_TYPE: &str = "Chinese";

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, EnumString, IntoStaticStr,
)]
pub enum TtsModel {
    #[strum(serialize = "qwen3-tts-flash")]
    Qwen3TtsFlash,
}

impl TtsModel {
    pub fn from_id(id: &str) -> TaskResult<Self> {
        id.parse().map_err(|_| TaskError::UnsupportedModel {
            mode: Mode::Tts,
            model: id.to_string(),
            supported: supported_ids::<Self>(),
        })
    }

    pub fn id(&self) -> &'static str {
        self.into()
    }
}

#[derive(Debug, Clone)]
pub struct TtsTask {
    pub model: TtsModel,
    pub text: String,
    pub voice: String,
    pub output: PathBuf,
}

impl TtsTask {
    pub fn payload(&self) -> SpeechRequest<'_> {
        SpeechRequest {
            model: self.model.id(),
            input: SpeechInput {
                text: &self.text,
                voice: &self.voice,
                language_type: LANGUAGE_TYPE,
            },
        }
    }

    /// Synthesizes speech, downloads the audio and writes it to the output path.
    pub async fn run(&self, client: &DashScope, out: &mut impl Write) -> TaskResult<PathBuf> {
        info!("Running TTS with {}...", self.model);
        let url = &client.config().generation_url;
        let resp = client.post_json(url, &self.payload()).await?;
        resp.ensure_success(url)?;

        let parsed: SpeechResponse = serde_json::from_str(&resp.body)?;
        let audio_url = parsed
            .audio_url()
            .ok_or_else(|| TaskError::unexpected_shape("no audio URL in response", &resp.body))?;

        info!("Downloading audio from {audio_url}...");
        let data = client.download(audio_url).await?;
        media::save_media(out, "Audio", &self.output, &data)
    }
}

#[derive(Debug, Serialize)]
pub struct SpeechRequest<'a> {
    pub model: &'a str,
    pub input: SpeechInput<'a>,
}

#[derive(Debug, Serialize)]
pub struct SpeechInput<'a> {
    pub text: &'a str,
    pub voice: &'a str,
    pub language_type: &'a str,
}

#[derive(Debug, Deserialize)]
struct SpeechResponse {
    #[serde(default)]
    output: Option<SpeechOutput>,
}

#[derive(Debug, Deserialize)]
struct SpeechOutput {
    #[serde(default)]
    audio: Option<Audio>,
}

#[derive(Debug, Deserialize)]
struct Audio {
    #[serde(default)]
    url: Option<String>,
}

impl SpeechResponse {
    fn audio_url(&self) -> Option<&str> {
        self.output
            .as_ref()?
            .audio
            .as_ref()?
            .url
            .as_deref()
            .filter(|u| !u.is_empty())
    }
}
