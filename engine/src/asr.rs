use std::{fs, io::Write, path::PathBuf};

use base64::{Engine as _, engine::general_purpose::STANDARD};
use log::info;
use serde::{Deserialize, Serialize};

use crate::{DashScope, TaskError, TaskResult};

const FALLBACK_AUDIO_MIME: &str = "audio/mp3";

/// Where the audio to transcribe lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AudioSource {
    Remote(String),
    Local(PathBuf),
}

impl AudioSource {
    pub fn classify(locator: &str) -> Self {
        if locator.starts_with("http://") || locator.starts_with("https://") {
            Self::Remote(locator.to_string())
        } else {
            Self::Local(PathBuf::from(locator))
        }
    }

    /// The value for `input_audio.data`: a URL as given, or the file as a base64 data URI.
    pub fn to_data(&self) -> TaskResult<String> {
        match self {
            Self::Remote(url) => Ok(url.clone()),
            Self::Local(path) => {
                if !path.exists() {
                    return Err(TaskError::InputNotFound(path.clone()));
                }
                let bytes = fs::read(path)?;
                let mime = mime_guess::from_path(path)
                    .first()
                    .filter(|m| m.type_() == mime_guess::mime::AUDIO)
                    .map(|m| m.essence_str().to_string())
                    .unwrap_or_else(|| FALLBACK_AUDIO_MIME.to_string());
                Ok(format!("data:{mime};base64,{}", STANDARD.encode(bytes)))
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct AsrTask {
    pub model: String,
    pub source: AudioSource,
}

impl AsrTask {
    pub fn payload(&self) -> TaskResult<ChatRequest> {
        Ok(ChatRequest {
            model: self.model.clone(),
            messages: vec![ChatMessage {
                role: "user",
                content: vec![ContentPart::InputAudio {
                    input_audio: InputAudio {
                        data: self.source.to_data()?,
                    },
                }],
            }],
            asr_options: AsrOptions { enable_itn: false },
        })
    }

    /// Transcribes the audio and prints the transcript verbatim.
    pub async fn run(&self, client: &DashScope, out: &mut impl Write) -> TaskResult<String> {
        let payload = self.payload()?;

        info!("Running ASR with {}...", self.model);
        let url = client.config().chat_completions_url();
        let resp = client.post_json(&url, &payload).await?;
        resp.ensure_success(&url)?;

        let completion: ChatResponse = serde_json::from_str(&resp.body)?;
        let text = completion
            .into_text()
            .ok_or_else(|| TaskError::unexpected_shape("no transcript", &resp.body))?;

        writeln!(out, "{text}")?;
        Ok(text)
    }
}

//
// ===== OpenAI-compatible wire types =====
//

#[derive(Debug, Serialize)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub asr_options: AsrOptions,
}

#[derive(Debug, Serialize)]
pub struct ChatMessage {
    pub role: &'static str,
    pub content: Vec<ContentPart>,
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentPart {
    InputAudio { input_audio: InputAudio },
}

#[derive(Debug, Serialize)]
pub struct InputAudio {
    pub data: String,
}

#[derive(Debug, Serialize)]
pub struct AsrOptions {
    /// Inverse text normalization
    pub enable_itn: bool,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    #[serde(default)]
    message: Option<ChatResponseMessage>,
}

#[derive(Debug, Deserialize)]
struct ChatResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

impl ChatResponse {
    fn into_text(self) -> Option<String> {
        self.choices.into_iter().next()?.message?.content
    }
}

#[cfg(test)]
mod test {
    use base64::Engine as _;
    use expect_test::expect;

    use super::*;

    #[test]
    fn classify_locators() {
        assert_eq!(
            AudioSource::classify("https://example.com/a.mp3"),
            AudioSource::Remote("https://example.com/a.mp3".into())
        );
        assert_eq!(
            AudioSource::classify("http://example.com/a.mp3"),
            AudioSource::Remote("http://example.com/a.mp3".into())
        );
        assert_eq!(
            AudioSource::classify("recordings/https.mp3"),
            AudioSource::Local("recordings/https.mp3".into())
        );
    }

    #[test]
    fn remote_payload_embeds_url_unchanged() {
        let task = AsrTask {
            model: "qwen3-asr-flash".into(),
            source: AudioSource::classify("https://example.com/voice.mp3?sig=a%2Fb"),
        };
        let body = serde_json::to_string(&task.payload().unwrap()).unwrap();
        let expect = expect![[r#"{"model":"qwen3-asr-flash","messages":[{"role":"user","content":[{"type":"input_audio","input_audio":{"data":"https://example.com/voice.mp3?sig=a%2Fb"}}]}],"asr_options":{"enable_itn":false}}"#]];
        expect.assert_eq(&body);
    }

    #[test]
    fn local_file_is_base64_data_uri() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("clip.wav");
        let bytes = [0u8, 1, 2, 250, 251, 255, b'R', b'I', b'F', b'F'];
        fs::write(&path, bytes).unwrap();

        let data = AudioSource::Local(path).to_data().unwrap();
        let (prefix, encoded) = data.split_once(',').unwrap();
        assert!(prefix.starts_with("data:audio/"));
        assert!(prefix.ends_with(";base64"));
        assert_eq!(STANDARD.decode(encoded).unwrap(), bytes);
    }

    #[test]
    fn unknown_extension_falls_back_to_mp3() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("clip.bin");
        fs::write(&path, b"abc").unwrap();

        let data = AudioSource::Local(path).to_data().unwrap();
        assert_eq!(data, "data:audio/mp3;base64,YWJj");
    }

    #[test]
    fn missing_local_file() {
        let task = AsrTask {
            model: "qwen3-asr-flash".into(),
            source: AudioSource::classify("/definitely/not/here.mp3"),
        };
        let err = task.payload().unwrap_err();
        assert!(matches!(err, TaskError::InputNotFound(_)));
        assert_eq!(
            err.to_string(),
            "Input audio file not found: /definitely/not/here.mp3"
        );
    }

    #[test]
    fn transcript_extraction() {
        let resp: ChatResponse = serde_json::from_str(
            r#"{"choices":[{"message":{"role":"assistant","content":"欢迎使用阿里云。"}}]}"#,
        )
        .unwrap();
        assert_eq!(resp.into_text().as_deref(), Some("欢迎使用阿里云。"));

        let resp: ChatResponse = serde_json::from_str(r#"{"choices":[]}"#).unwrap();
        assert_eq!(resp.into_text(), None);
    }
}
