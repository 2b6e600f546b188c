use std::{collections::HashMap, path::Path};

use color_eyre::{
    Result,
    eyre::{WrapErr as _, eyre},
};
use log::debug;
use reqwest::{Client, multipart};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use super::error::ApiError;

/// Presigned upload target issued by the init-image endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct UploadTicket {
    pub id: String,
    pub url: String,
    /// JSON-encoded string of storage form fields, see [`Self::form_fields`].
    pub fields: String,
    #[serde(default)]
    pub key: Option<String>,
}

#[derive(Debug, Deserialize)]
struct InitImageResponse {
    #[serde(rename = "uploadInitImage")]
    upload_init_image: UploadTicket,
}

impl UploadTicket {
    /// The API returns the presigned form fields as a JSON string, not an
    /// object, so they need a second decoding pass.
    pub fn form_fields(&self) -> Result<HashMap<String, String>> {
        serde_json::from_str(&self.fields)
            .wrap_err_with(|| format!("Malformed presigned form fields: {}", self.fields))
    }
}

/// Parameters for an image-to-image generation job.
///
/// `init_strength` is documented by the provider as a float in (0.1, 0.9);
/// it is forwarded as given and validated server-side.
#[derive(Debug, Clone, Serialize)]
pub struct GenerationParams {
    #[serde(rename = "modelId")]
    pub model_id: String,
    pub prompt: String,
    pub width: u32,
    pub height: u32,
    pub init_image_id: String,
    pub init_strength: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GenerationJob {
    #[serde(rename = "generationId")]
    pub generation_id: String,
    #[serde(rename = "apiCreditCost", default)]
    pub api_credit_cost: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct StartGenerationResponse {
    #[serde(rename = "sdGenerationJob")]
    sd_generation_job: GenerationJob,
}

/// Requests a presigned upload target for an image with the given extension
pub async fn request_upload_target(
    extension: &str,
    base_url: &str,
    api_key: &str,
    client: &Client,
) -> Result<UploadTicket> {
    let resp = client
        .post(format!("{base_url}/api/rest/v1/init-image"))
        .bearer_auth(api_key)
        .json(&json!({ "extension": extension }))
        .send()
        .await?;

    let status = resp.status();
    let text = resp.text().await?;
    debug!("init-image: {status}");

    if !status.is_success() {
        return Err(ApiError::from_status(status, text).into());
    }

    let parsed: InitImageResponse = serde_json::from_str(&text)
        .wrap_err_with(|| format!("Unexpected init-image response: {text}"))?;
    Ok(parsed.upload_init_image)
}

/// Uploads the file at `path` to the presigned target. The presigned form
/// fields carry the authorization, so no API header is sent here.
pub async fn upload_file(ticket: &UploadTicket, path: &Path, client: &Client) -> Result<()> {
    let bytes = tokio::fs::read(path)
        .await
        .wrap_err_with(|| format!("Couldn't read image file {}", path.display()))?;

    let file_name = path
        .file_name()
        .ok_or_else(|| eyre!("No file name in path {}", path.display()))?
        .to_string_lossy()
        .into_owned();

    let mut form = multipart::Form::new();
    for (name, value) in ticket.form_fields()? {
        form = form.text(name, value);
    }
    form = form.part("file", multipart::Part::bytes(bytes).file_name(file_name));

    let resp = client.post(&ticket.url).multipart(form).send().await?;

    let status = resp.status();
    debug!("presigned upload: {status}");

    if !status.is_success() {
        let body = resp.text().await.unwrap_or_default();
        return Err(ApiError::from_status(status, body).into());
    }
    Ok(())
}

/// Submits a generation job and returns its handle
pub async fn start_generation(
    params: &GenerationParams,
    base_url: &str,
    api_key: &str,
    client: &Client,
) -> Result<GenerationJob> {
    let resp = client
        .post(format!("{base_url}/api/rest/v1/generations"))
        .bearer_auth(api_key)
        .json(params)
        .send()
        .await?;

    let status = resp.status();
    let text = resp.text().await?;
    debug!("generations: {status}");

    if !status.is_success() {
        return Err(ApiError::from_status(status, text).into());
    }

    let parsed: StartGenerationResponse = serde_json::from_str(&text)
        .wrap_err_with(|| format!("Unexpected generation response: {text}"))?;
    Ok(parsed.sd_generation_job)
}

/// Fetches the current state of a generation job as raw JSON
pub async fn fetch_generation(
    generation_id: &str,
    base_url: &str,
    api_key: &str,
    client: &Client,
) -> Result<Value> {
    let resp = client
        .get(format!("{base_url}/api/rest/v1/generations/{generation_id}"))
        .bearer_auth(api_key)
        .send()
        .await?;

    let status = resp.status();
    let text = resp.text().await?;
    debug!("generation {generation_id}: {status}");

    if !status.is_success() {
        return Err(ApiError::from_status(status, text).into());
    }

    Ok(serde_json::from_str(&text)
        .wrap_err_with(|| format!("Generation response is not JSON: {text}"))?)
}
