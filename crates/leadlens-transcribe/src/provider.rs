//! Speech-to-text gateway provider

use reqwest::multipart::{Form, Part};
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use tracing::{debug, info};
use uuid::Uuid;

use leadlens_core::{Transcript, TranscriptSegment};

use crate::error::TranscribeError;

/// Speech-to-text capability provider.
///
/// Takes raw audio bytes and returns a timestamped transcript. Failures
/// propagate: without a transcript nothing downstream is computable.
#[trait_variant::make(TranscribeProvider: Send)]
pub trait LocalTranscribeProvider {
    /// Transcribe one recording; `extension` names the audio container
    /// format (e.g. "wav", "mp3")
    async fn transcribe(&self, audio: &[u8], extension: &str)
        -> Result<Transcript, TranscribeError>;

    /// Check if provider is reachable
    async fn is_available(&self) -> bool;

    /// Get provider name
    fn name(&self) -> &'static str;
}

/// HTTP speech-to-text gateway: uploads the audio to the provider's storage
/// endpoint under a random filename, then requests a transcription of the
/// uploaded object.
pub struct SpeechGatewayProvider {
    client: Client,
    base_url: String,
    api_key: SecretString,
}

impl SpeechGatewayProvider {
    /// Create a provider against a gateway endpoint
    pub fn new(base_url: &str, api_key: SecretString) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
        }
    }

    /// Upload audio bytes, returning the stored object's URL
    async fn upload(&self, audio: &[u8], extension: &str) -> Result<String, TranscribeError> {
        let filename = upload_filename(extension);
        let url = format!("{}/uploads", self.base_url);

        debug!(%filename, size = audio.len(), "Uploading audio");

        let form = Form::new().part(
            "file",
            Part::bytes(audio.to_vec()).file_name(filename),
        );

        let response = self
            .client
            .post(&url)
            .bearer_auth(self.api_key.expose_secret())
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(TranscribeError::UploadFailed(format!("{}: {}", status, error_text)));
        }

        let upload: UploadResponse = response
            .json()
            .await
            .map_err(|e| TranscribeError::InvalidResponse(e.to_string()))?;

        Ok(upload.url)
    }

    /// Request speech-to-text for an uploaded object
    async fn request_transcription(&self, audio_url: &str) -> Result<Transcript, TranscribeError> {
        let url = format!("{}/transcriptions", self.base_url);

        let response = self
            .client
            .post(&url)
            .bearer_auth(self.api_key.expose_secret())
            .json(&serde_json::json!({ "audio_url": audio_url }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(TranscribeError::TranscriptionFailed(format!(
                "{}: {}",
                status, error_text
            )));
        }

        let transcription: TranscriptionResponse = response
            .json()
            .await
            .map_err(|e| TranscribeError::InvalidResponse(e.to_string()))?;

        transcript_from_chunks(transcription.chunks)
    }
}

impl TranscribeProvider for SpeechGatewayProvider {
    async fn transcribe(
        &self,
        audio: &[u8],
        extension: &str,
    ) -> Result<Transcript, TranscribeError> {
        let audio_url = self.upload(audio, extension).await?;
        let transcript = self.request_transcription(&audio_url).await?;
        info!(segments = transcript.segments.len(), "Transcription complete");
        Ok(transcript)
    }

    async fn is_available(&self) -> bool {
        let url = format!("{}/health", self.base_url);
        self.client
            .get(&url)
            .send()
            .await
            .map(|r| r.status().is_success())
            .unwrap_or(false)
    }

    fn name(&self) -> &'static str {
        "speech-gateway"
    }
}

/// Random 32-hex-char filename for the uploaded object
fn upload_filename(extension: &str) -> String {
    format!("{}.{}", Uuid::new_v4().simple(), extension.trim_start_matches('.'))
}

/// Assemble a transcript from provider chunks
fn transcript_from_chunks(chunks: Vec<TranscriptionChunk>) -> Result<Transcript, TranscribeError> {
    if chunks.is_empty() {
        return Err(TranscribeError::EmptyTranscript);
    }

    let segments = chunks
        .into_iter()
        .map(|c| TranscriptSegment {
            speaker: c.speaker,
            start: c.start,
            end: c.end,
            text: c.text,
        })
        .collect();

    Ok(Transcript::new(segments))
}

#[derive(Deserialize)]
struct UploadResponse {
    url: String,
}

#[derive(Deserialize)]
struct TranscriptionResponse {
    chunks: Vec<TranscriptionChunk>,
}

#[derive(Deserialize)]
struct TranscriptionChunk {
    start: f64,
    end: f64,
    text: String,
    #[serde(default)]
    speaker: Option<String>,
}
