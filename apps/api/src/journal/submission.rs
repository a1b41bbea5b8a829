//! Extractor for `POST /save-journal-entry`, which accepts the same two fields
//! as JSON, a urlencoded form, or a multipart form with an `audio` part.

use axum::{
    async_trait,
    extract::{FromRequest, Multipart, Request},
    http::header::CONTENT_TYPE,
    Form, Json,
};
use serde::Deserialize;

use crate::errors::AppError;
use crate::upload::{read_multipart, AudioUpload};

#[derive(Debug, Default, Deserialize)]
struct SubmissionFields {
    user_id: Option<String>,
    journal_entry: Option<String>,
}

#[derive(Debug, Default)]
pub struct JournalSubmission {
    pub user_id: Option<String>,
    pub journal_entry: Option<String>,
    pub audio: Option<AudioUpload>,
}

/// Where an entry's content comes from. Audio wins when both are sent.
#[derive(Debug)]
pub enum JournalSource {
    Audio(AudioUpload),
    Text(String),
}

/// Drops whitespace-only values; anything else is kept exactly as sent.
fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

impl JournalSubmission {
    fn from_fields(fields: SubmissionFields) -> Self {
        Self {
            user_id: non_blank(fields.user_id),
            journal_entry: non_blank(fields.journal_entry),
            audio: None,
        }
    }

    /// Splits into the user id and a content source, rejecting incomplete
    /// submissions.
    pub fn into_parts(self) -> Result<(String, JournalSource), AppError> {
        let user_id = self
            .user_id
            .ok_or_else(|| AppError::Validation("Missing user_id".to_string()))?;

        let source = match (self.audio, self.journal_entry) {
            (Some(audio), _) => JournalSource::Audio(audio),
            (None, Some(text)) => JournalSource::Text(text),
            (None, None) => {
                return Err(AppError::Validation(
                    "No journal entry or audio provided".to_string(),
                ))
            }
        };
        Ok((user_id, source))
    }
}

#[async_trait]
impl<S> FromRequest<S> for JournalSubmission
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let content_type = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_ascii_lowercase();

        if content_type.starts_with("multipart/form-data") {
            let multipart = Multipart::from_request(req, state)
                .await
                .map_err(|e| AppError::Validation(e.body_text()))?;
            let mut form = read_multipart(multipart).await?;
            return Ok(Self {
                user_id: form.field("user_id").map(str::to_string),
                journal_entry: form.field("journal_entry").map(str::to_string),
                audio: form.audio.take(),
            });
        }

        if content_type.starts_with("application/x-www-form-urlencoded") {
            let Form(fields) = Form::<SubmissionFields>::from_request(req, state)
                .await
                .map_err(|e| AppError::Validation(e.body_text()))?;
            return Ok(Self::from_fields(fields));
        }

        let Json(fields) = Json::<SubmissionFields>::from_request(req, state)
            .await
            .map_err(|e| AppError::Validation(e.body_text()))?;
        Ok(Self::from_fields(fields))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;

    const BOUNDARY: &str = "serenity-test-boundary";

    fn request(content_type: &str, body: impl Into<Body>) -> Request {
        Request::builder()
            .method("POST")
            .uri("/save-journal-entry")
            .header(CONTENT_TYPE, content_type)
            .body(body.into())
            .unwrap()
    }

    fn multipart_body(user_id: &str, audio: &[u8]) -> Vec<u8> {
        let mut body = Vec::new();
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"user_id\"\r\n\r\n{user_id}\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"audio\"; filename=\"clip.wav\"\r\nContent-Type: audio/wav\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(audio);
        body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());
        body
    }

    #[tokio::test]
    async fn test_json_submission() {
        let req = request(
            "application/json",
            r#"{"user_id": "12345", "journal_entry": "I went hiking today."}"#,
        );
        let submission = JournalSubmission::from_request(req, &()).await.unwrap();
        let (user_id, source) = submission.into_parts().unwrap();
        assert_eq!(user_id, "12345");
        assert!(matches!(source, JournalSource::Text(t) if t == "I went hiking today."));
    }

    #[tokio::test]
    async fn test_urlencoded_submission() {
        let req = request(
            "application/x-www-form-urlencoded",
            "user_id=12345&journal_entry=Quiet+evening+reading.",
        );
        let submission = JournalSubmission::from_request(req, &()).await.unwrap();
        assert_eq!(submission.journal_entry.as_deref(), Some("Quiet evening reading."));
    }

    #[tokio::test]
    async fn test_multipart_audio_submission() {
        let req = request(
            &format!("multipart/form-data; boundary={BOUNDARY}"),
            multipart_body("12345", b"RIFFdata"),
        );
        let submission = JournalSubmission::from_request(req, &()).await.unwrap();
        let (_, source) = submission.into_parts().unwrap();
        match source {
            JournalSource::Audio(clip) => {
                assert_eq!(clip.read().await.unwrap().as_ref(), b"RIFFdata");
            }
            JournalSource::Text(_) => panic!("expected audio source"),
        }
    }

    #[tokio::test]
    async fn test_missing_user_id_is_rejected() {
        let req = request("application/json", r#"{"journal_entry": "hello"}"#);
        let submission = JournalSubmission::from_request(req, &()).await.unwrap();
        assert!(matches!(
            submission.into_parts(),
            Err(AppError::Validation(msg)) if msg.contains("user_id")
        ));
    }

    #[tokio::test]
    async fn test_blank_entry_without_audio_is_rejected() {
        let req = request("application/json", r#"{"user_id": "1", "journal_entry": "   "}"#);
        let submission = JournalSubmission::from_request(req, &()).await.unwrap();
        assert!(matches!(submission.into_parts(), Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_entry_text_is_kept_verbatim() {
        let req = request(
            "application/json",
            r#"{"user_id": "12345", "journal_entry": "  Went hiking.\n\n"}"#,
        );
        let submission = JournalSubmission::from_request(req, &()).await.unwrap();
        let (_, source) = submission.into_parts().unwrap();
        assert!(matches!(source, JournalSource::Text(t) if t == "  Went hiking.\n\n"));
    }

    #[tokio::test]
    async fn test_invalid_json_is_validation_error() {
        let req = request("application/json", "{not json");
        let result = JournalSubmission::from_request(req, &()).await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }
}
