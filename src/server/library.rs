use axum::Json;
use axum::body::Body;
use axum::extract::{Path, Request, State};
use axum::http::{HeaderValue, header};
use axum::response::{IntoResponse, Response};
use tower::ServiceExt;
use tower_http::services::ServeFile;
use tracing::{debug, warn};

use super::state::MusicDir;
use crate::error::{Error, Result};
use crate::library::{self, MusicFile, TrackMetadata, TrackPath};

pub async fn list_music(State(MusicDir(root)): State<MusicDir>) -> Result<Json<Vec<MusicFile>>> {
    let files = tokio::task::spawn_blocking(move || library::scan::scan(&root))
        .await
        .map_err(std::io::Error::other)??;
    Ok(Json(files))
}

/// Validates the path and checks the file exists, in that order.
async fn existing_file(root: &std::path::Path, raw: &str) -> Result<std::path::PathBuf> {
    let track = TrackPath::parse(raw)?;
    let full = track.resolve(root);
    match tokio::fs::metadata(&full).await {
        Ok(meta) if meta.is_file() => Ok(full),
        _ => {
            debug!("file does not exist: {}", full.display());
            Err(Error::NotFound)
        }
    }
}

/// Serves the audio file, honouring `Range` requests.
pub async fn stream_track(
    State(MusicDir(root)): State<MusicDir>,
    Path(raw): Path<String>,
    request: Request,
) -> Result<Response> {
    let full = existing_file(&root, &raw).await?;
    debug!("streaming {}", full.display());

    let content_type = library::content_type(&full);
    let mut response = match ServeFile::new(&full).oneshot(request).await {
        Ok(response) => response.map(Body::new),
        Err(never) => match never {},
    };
    if response.status().is_success() {
        response
            .headers_mut()
            .insert(header::CONTENT_TYPE, HeaderValue::from_static(content_type));
    }
    Ok(response)
}

pub async fn get_metadata(
    State(MusicDir(root)): State<MusicDir>,
    Path(raw): Path<String>,
) -> Result<impl IntoResponse> {
    let full = existing_file(&root, &raw).await?;

    let metadata = tokio::task::spawn_blocking(move || {
        library::metadata::read(&full).unwrap_or_else(|e| {
            warn!("falling back to default metadata: {e:#}");
            TrackMetadata::fallback(&full)
        })
    })
    .await
    .map_err(std::io::Error::other)?;

    Ok(Json(metadata))
}
