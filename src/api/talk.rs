//! Voice conversation endpoint

use std::convert::Infallible;
use std::sync::Arc;

use axum::{
    body::{Body, Bytes},
    extract::{Multipart, State},
    http::header,
    response::{IntoResponse, Response},
    routing::post,
    Router,
};

use super::{ApiError, ApiState};
use crate::config::SynthesisFailurePolicy;
use crate::turn::Speech;
use crate::voice::AudioClip;

/// Multipart field carrying the recording
const FILE_FIELD: &str = "file";

/// Build talk router
pub fn router(state: Arc<ApiState>) -> Router {
    Router::new()
        .route("/talk", post(talk))
        .with_state(state)
}

/// Run one conversational round for an uploaded recording
///
/// Returns the spoken reply as `audio/mpeg`.
async fn talk(
    State(state): State<Arc<ApiState>>,
    mut multipart: Multipart,
) -> Result<Response, ApiError> {
    let clip = read_clip(&mut multipart).await?;
    tracing::info!(
        audio_bytes = clip.len(),
        file_name = %clip.file_name,
        "received recording"
    );

    let outcome = state.orchestrator.run(&clip).await?;

    match outcome.speech {
        Speech::Audio(audio) => Ok(audio_response(audio)),
        Speech::Failed(reason) => match state.on_synthesis_failure {
            SynthesisFailurePolicy::Empty => Ok(audio_response(Vec::new())),
            SynthesisFailurePolicy::Error => Err(ApiError::SynthesisFailed(reason)),
        },
    }
}

/// Pull the `file` field out of the upload
async fn read_clip(multipart: &mut Multipart) -> Result<AudioClip, ApiError> {
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        let file_name = field.file_name().unwrap_or_default().to_string();
        let content_type = field.content_type().map(ToString::to_string);
        let data = field.bytes().await?;

        if data.is_empty() {
            return Err(ApiError::BadRequest("Empty audio data".to_string()));
        }

        return Ok(AudioClip::new(data.to_vec(), file_name, content_type));
    }

    Err(ApiError::BadRequest(format!(
        "missing multipart field `{FILE_FIELD}`"
    )))
}

/// Stream audio back as `audio/mpeg`
fn audio_response(audio: Vec<u8>) -> Response {
    let stream = futures::stream::once(async move { Ok::<_, Infallible>(Bytes::from(audio)) });
    (
        [(header::CONTENT_TYPE, "audio/mpeg")],
        Body::from_stream(stream),
    )
        .into_response()
}
