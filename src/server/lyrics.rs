use axum::Json;
use axum::extract::{Multipart, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde::Deserialize;
use tracing::{info, warn};

use super::state::GuardedResolver;
use crate::error::{Error, Result};
use crate::library::TrackPath;
use crate::lyrics::{LyricResult, TrackRef};

#[derive(Debug, Deserialize)]
pub struct LyricQuery {
    pub path: Option<String>,
    pub title: Option<String>,
    pub artist: Option<String>,
}

pub async fn get_lyric(
    State(resolver): State<GuardedResolver>,
    Query(query): Query<LyricQuery>,
) -> Result<Json<LyricResult>> {
    let path = TrackPath::parse(query.path.as_deref().unwrap_or_default())?;
    let track = TrackRef::new(path, query.title, query.artist);
    Ok(Json(resolver.resolve(&track).await?))
}

/// Multipart upload: `path` names the track, `lyric` (or `file`) carries the raw bytes.
pub async fn upload_lyric(
    State(resolver): State<GuardedResolver>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse> {
    let mut path: Option<String> = None;
    let mut content: Option<Vec<u8>> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| Error::MalformedUpload(e.to_string()))?
    {
        let name = field.name().unwrap_or("").to_string();
        match name.as_str() {
            "path" => {
                path = Some(field.text().await.map_err(|e| Error::MalformedUpload(e.to_string()))?);
            }
            "lyric" | "file" => {
                let bytes = field.bytes().await.map_err(|e| {
                    warn!("failed to read uploaded lyric: {e}");
                    Error::MalformedUpload(e.to_string())
                })?;
                content = Some(bytes.to_vec());
            }
            _ => {}
        }
    }

    let path = TrackPath::parse(path.as_deref().unwrap_or_default())?;
    let content = content.ok_or(Error::MissingUpload)?;

    let saved = resolver.store().put(&path, content).await?;
    info!("uploaded lyrics saved to {}", saved.display());
    Ok((StatusCode::OK, "Lyrics uploaded successfully"))
}
