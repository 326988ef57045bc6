use std::path::PathBuf;

use bailian_engine::{Mode, dispatch::Request, tts::DEFAULT_VOICE};

/// Run Bailian (DashScope) multimodal models: image generation, speech recognition, speech synthesis
#[derive(Debug, clap::Parser)]
#[command(name = "bailian-multimodal", version)]
pub struct Cli {
    /// Task mode
    #[arg(long, value_enum)]
    pub mode: Mode,

    /// Model name (e.g. z-image-turbo, qwen3-asr-flash, qwen3-tts-flash)
    #[arg(long)]
    pub model: String,

    /// DashScope API key
    #[arg(long)]
    pub api_key: Option<String>,

    /// Text prompt for image generation
    #[arg(long)]
    pub prompt: Option<String>,

    /// Image size (e.g. 1024*1024)
    #[arg(long)]
    pub size: Option<String>,

    /// Input audio URL or file path
    #[arg(long)]
    pub input_audio: Option<String>,

    /// Text to synthesize
    #[arg(long)]
    pub text: Option<String>,

    /// Voice for TTS
    #[arg(long, default_value = DEFAULT_VOICE)]
    pub voice: String,

    /// Output file path
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Config file, defaults to ~/.config/bailian-multimodal/config.ron
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Overrides the OpenAI-compatible base URL
    #[arg(long)]
    pub base_url: Option<String>,

    /// Overrides the multimodal-generation endpoint
    #[arg(long)]
    pub generation_url: Option<String>,

    /// Overrides the per-request timeout
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    pub timeout_secs: Option<u64>,
}

impl Cli {
    pub fn request(&self) -> Request {
        Request {
            model: self.model.clone(),
            prompt: self.prompt.clone(),
            size: self.size.clone(),
            input_audio: self.input_audio.clone(),
            text: self.text.clone(),
            voice: Some(self.voice.clone()),
            output: self.output.clone(),
        }
    }
}

#[cfg(test)]
mod test {
    use clap::Parser;

    use super::*;

    #[test]
    fn short_output_flag_and_default_voice() {
        let cli = Cli::try_parse_from([
            "bailian-multimodal",
            "--mode",
            "tts",
            "--model",
            "qwen3-tts-flash",
            "--text",
            "hi",
            "-o",
            "hi.wav",
        ])
        .unwrap();
        assert_eq!(cli.mode, Mode::Tts);
        assert_eq!(cli.voice, "Cherry");
        assert_eq!(cli.output, Some(PathBuf::from("hi.wav")));
    }

    #[test]
    fn unknown_mode_rejected_by_parser() {
        let res = Cli::try_parse_from(["bailian-multimodal", "--mode", "video", "--model", "x"]);
        assert!(res.is_err());
    }

    #[test]
    fn zero_timeout_rejected() {
        let args = |secs: &'static str| {
            Cli::try_parse_from([
                "bailian-multimodal",
                "--mode",
                "asr",
                "--model",
                "x",
                "--timeout-secs",
                secs,
            ])
        };
        assert!(args("0").is_err());
        assert_eq!(args("5").unwrap().timeout_secs, Some(5));
    }

    #[test]
    fn mode_and_model_required() {
        assert!(Cli::try_parse_from(["bailian-multimodal", "--mode", "asr"]).is_err());
        assert!(Cli::try_parse_from(["bailian-multimodal", "--model", "x"]).is_err());
    }
}
