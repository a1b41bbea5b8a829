//! Multipart parsing and the scoped temporary file that holds uploaded audio.

use std::collections::HashMap;
use std::io::Write;
use std::path::Path;

use anyhow::Context;
use axum::extract::Multipart;
use bytes::Bytes;
use tempfile::NamedTempFile;
use tracing::debug;

use crate::errors::AppError;

const DEFAULT_AUDIO_CONTENT_TYPE: &str = "audio/wav";

/// An uploaded audio clip on disk for the duration of one request.
///
/// The file is removed when the value is dropped, so every exit path of a
/// handler (success, upstream failure, early validation return) cleans up.
#[derive(Debug)]
pub struct AudioUpload {
    file: NamedTempFile,
    content_type: String,
}

impl AudioUpload {
    /// Writes the clip to a fresh temp file on the blocking pool.
    pub async fn persist(data: Bytes, content_type: Option<&str>) -> Result<Self, AppError> {
        let content_type = content_type
            .filter(|ct| ct.starts_with("audio/"))
            .unwrap_or(DEFAULT_AUDIO_CONTENT_TYPE)
            .to_string();
        let len = data.len();
        let file = tokio::task::spawn_blocking(move || write_temp_audio(&data))
            .await
            .context("temp audio task failed")??;

        debug!("Stored {len} bytes of audio at {}", file.path().display());

        Ok(Self { file, content_type })
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }

    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    pub async fn read(&self) -> std::io::Result<Bytes> {
        tokio::fs::read(self.path()).await.map(Bytes::from)
    }
}

fn write_temp_audio(data: &[u8]) -> anyhow::Result<NamedTempFile> {
    let mut file = tempfile::Builder::new()
        .prefix("serenity-audio-")
        .suffix(".wav")
        .tempfile()
        .context("failed to create temp audio file")?;
    file.write_all(data)
        .and_then(|_| file.flush())
        .context("failed to write temp audio file")?;
    Ok(file)
}

/// Text fields plus the optional `audio` file of a multipart form.
#[derive(Debug, Default)]
pub struct MultipartForm {
    pub fields: HashMap<String, String>,
    pub audio: Option<AudioUpload>,
}

impl MultipartForm {
    /// Value of a text field, unless it is missing or whitespace-only.
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .get(name)
            .map(String::as_str)
            .filter(|v| !v.trim().is_empty())
    }
}

/// Reads every part. The `audio` part goes to a temp file; everything else is
/// kept as text. An empty `audio` part counts as missing.
pub async fn read_multipart(mut multipart: Multipart) -> Result<MultipartForm, AppError> {
    let mut form = MultipartForm::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(e.body_text()))?
    {
        let name = field.name().unwrap_or_default().to_string();
        if name == "audio" {
            let content_type = field.content_type().map(str::to_owned);
            let data = field
                .bytes()
                .await
                .map_err(|e| AppError::Validation(e.body_text()))?;
            if !data.is_empty() {
                form.audio = Some(AudioUpload::persist(data, content_type.as_deref()).await?);
            }
        } else {
            let value = field
                .text()
                .await
                .map_err(|e| AppError::Validation(e.body_text()))?;
            form.fields.insert(name, value);
        }
    }

    Ok(form)
}
