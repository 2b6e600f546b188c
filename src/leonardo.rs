use std::path::Path;

use color_eyre::{
    Result,
    eyre::{bail, eyre},
};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use strum::Display;
use tokio::time::sleep;

use crate::config::Config;

pub mod api;
pub mod error;

pub use api::{GenerationJob, GenerationParams, UploadTicket};
pub use error::ApiError;

#[derive(
    Debug, Clone, Copy, Display, clap::ValueEnum, Serialize, Deserialize, PartialEq, Eq, Default,
)]
pub enum Model {
    #[default]
    #[strum(to_string = "Leonardo Diffusion XL")]
    DiffusionXl,
    #[strum(to_string = "Leonardo Creative")]
    Creative,
    #[strum(to_string = "Leonardo Select")]
    Select,
    #[strum(to_string = "Leonardo Signature")]
    Signature,
}

impl Model {
    /// The provider-side id of this model
    pub fn id(&self) -> &'static str {
        match self {
            Model::DiffusionXl => "1e60896f-3c26-4296-8ecc-53e2afecc132",
            Model::Creative => "6bef9f1b-29cb-40c4-80a1-50db333bf2d7",
            Model::Select => "cd2b2a15-9760-4174-a5ff-4d2925057376",
            Model::Signature => "291be633-cb24-434f-898f-e662799936ad",
        }
    }
}

/// Caller-facing parameters for [`Leonardo::image_to_image`]. The init image
/// id is filled in by the flow once the upload went through.
#[derive(Debug, Clone)]
pub struct ImageRequest {
    pub model_id: String,
    pub prompt: String,
    pub width: u32,
    pub height: u32,
    pub init_strength: f64,
}

impl ImageRequest {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            model_id: Model::default().id().into(),
            prompt: prompt.into(),
            width: 512,
            height: 512,
            init_strength: 0.5,
        }
    }
}

#[derive(Clone)]
pub struct Leonardo {
    config: Config,
    client: reqwest::Client,
}

impl Leonardo {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            client: reqwest::Client::new(),
        }
    }

    /// Requests a presigned target and uploads the file to it. Returns the
    /// ticket only after the storage upload succeeded, so the contained id
    /// is safe to reference in a generation.
    pub async fn upload_init_image(&self, path: &Path) -> Result<UploadTicket> {
        let extension = path
            .extension()
            .ok_or_else(|| eyre!("Image path {} has no extension", path.display()))?
            .to_string_lossy()
            .to_lowercase();

        let ticket = api::request_upload_target(
            &extension,
            &self.config.base_url,
            &self.config.api_key,
            &self.client,
        )
        .await?;
        api::upload_file(&ticket, path, &self.client).await?;
        info!("Uploaded {} as init image {}", path.display(), ticket.id);
        Ok(ticket)
    }

    pub async fn start_generation(&self, params: &GenerationParams) -> Result<GenerationJob> {
        let job = api::start_generation(
            params,
            &self.config.base_url,
            &self.config.api_key,
            &self.client,
        )
        .await?;
        info!("Started generation {}", job.generation_id);
        Ok(job)
    }

    /// Waits the configured initial delay, then polls the job with doubling
    /// intervals until it is COMPLETE, FAILED, or the poll budget runs out.
    pub async fn await_generation(&self, generation_id: &str) -> Result<Value> {
        sleep(self.config.initial_wait).await;

        let mut interval = self.config.poll_interval;
        let interval_cap = self.config.poll_interval * 8;

        for attempt in 1..=self.config.max_polls {
            let payload = api::fetch_generation(
                generation_id,
                &self.config.base_url,
                &self.config.api_key,
                &self.client,
            )
            .await?;

            match payload["generations_by_pk"]["status"].as_str() {
                Some("COMPLETE") => return Ok(payload),
                Some("FAILED") => bail!("Generation {generation_id} failed:\n{payload:#}"),
                Some(status) => {
                    debug!("Generation {generation_id} is {status} (poll {attempt})");
                }
                None => bail!("Missing generation status:\n{payload:#}"),
            }

            if attempt < self.config.max_polls {
                sleep(interval).await;
                interval = (interval * 2).min(interval_cap);
            }
        }

        bail!(
            "Generation {generation_id} didn't complete within {} polls",
            self.config.max_polls
        )
    }

    /// The full image-to-image flow: upload the init image, submit the
    /// generation referencing it, and wait for the result payload.
    pub async fn image_to_image(&self, path: &Path, request: &ImageRequest) -> Result<Value> {
        let ticket = self.upload_init_image(path).await?;

        let job = self
            .start_generation(&GenerationParams {
                model_id: request.model_id.clone(),
                prompt: request.prompt.clone(),
                width: request.width,
                height: request.height,
                init_image_id: ticket.id,
                init_strength: request.init_strength,
            })
            .await?;

        self.await_generation(&job.generation_id).await
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn default_model_matches_diffusion_xl() {
        assert_eq!(Model::default().id(), "1e60896f-3c26-4296-8ecc-53e2afecc132");
        assert_eq!(Model::DiffusionXl.to_string(), "Leonardo Diffusion XL");
    }

    #[test]
    fn image_request_defaults() {
        let req = ImageRequest::new("a cat");
        assert_eq!(req.model_id, Model::DiffusionXl.id());
        assert_eq!((req.width, req.height), (512, 512));
        assert_eq!(req.init_strength, 0.5);
    }
}
