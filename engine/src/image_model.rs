use std::{io::Write, path::PathBuf};

use log::info;
use strum::{Display, EnumIter, EnumString, IntoStaticStr};

use crate::{DashScope, Mode, TaskError, TaskResult, media, supported_ids};

pub mod generation_api;
use generation_api::{GenerationRequest, GenerationResponse, Parameters};

/// Text-to-image models the generation endpoint is known to accept.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, EnumString, IntoStaticStr,
)]
pub enum ImageModel {
    #[strum(serialize = "z-image-turbo")]
    ZImageTurbo,
    #[strum(serialize = "wan2.6-t2i")]
    Wan26T2i,
}

/// Per-model request knobs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Profile {
    pub default_size: &'static str,
    pub prompt_extend: bool,
    pub watermark: Option<bool>,
    pub n: Option<u32>,
}

impl ImageModel {
    pub fn from_id(id: &str) -> TaskResult<Self> {
        id.parse().map_err(|_| TaskError::UnsupportedModel {
            mode: Mode::Image,
            model: id.to_string(),
            supported: supported_ids::<Self>(),
        })
    }

    pub fn id(&self) -> &'static str {
        self.into()
    }

    pub fn profile(&self) -> Profile {
        match self {
            ImageModel::ZImageTurbo => Profile {
                default_size: "1024*1024",
                prompt_extend: false,
                watermark: None,
                n: None,
            },
            ImageModel::Wan26T2i => Profile {
                default_size: "1280*1280",
                prompt_extend: true,
                watermark: Some(false),
                n: Some(1),
            },
        }
    }

    /// `size` falls back to the model default when absent or empty.
    pub fn parameters(&self, size: Option<&str>) -> Parameters {
        let profile = self.profile();
        Parameters {
            prompt_extend: profile.prompt_extend,
            watermark: profile.watermark,
            n: profile.n,
            size: size
                .filter(|s| !s.is_empty())
                .unwrap_or(profile.default_size)
                .to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ImageTask {
    pub model: ImageModel,
    pub prompt: String,
    pub size: Option<String>,
    pub output: PathBuf,
}

impl ImageTask {
    pub fn payload(&self) -> GenerationRequest<'_> {
        GenerationRequest::text_prompt(
            self.model.id(),
            &self.prompt,
            self.model.parameters(self.size.as_deref()),
        )
    }

    /// Generates the image, downloads it and writes it to the output path.
    pub async fn run(&self, client: &DashScope, out: &mut impl Write) -> TaskResult<PathBuf> {
        info!("Generating image with {}...", self.model);
        let url = &client.config().generation_url;
        let resp = client.post_json(url, &self.payload()).await?;
        resp.ensure_success(url)?;

        let parsed: GenerationResponse = serde_json::from_str(&resp.body)?;
        let image_url = parsed
            .first_image_url()
            .ok_or_else(|| TaskError::unexpected_shape("no image found", &resp.body))?;

        info!("Downloading image from {image_url}...");
        let data = client.download(image_url).await?;
        media::save_media(out, "Image", &self.output, &data)
    }
}
