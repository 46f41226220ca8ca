use std::path::Path;

use anyhow::Context;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use lofty::picture::PictureType;
use lofty::prelude::*;
use lofty::tag::Tag;
use serde::Serialize;

const COVER_SIZE: u32 = 300;
const COVER_QUALITY: u8 = 85;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackMetadata {
    pub title: String,
    pub artist: String,
    pub album: String,
    pub year: u32,
    pub genre: String,
    /// `data:image/jpeg;base64,...` of the resized front cover, empty when absent.
    pub album_art: String,
}

impl TrackMetadata {
    /// Used when the file has no readable tags.
    pub fn fallback(path: &Path) -> Self {
        Self {
            title: path
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_default(),
            artist: "Unknown Artist".to_string(),
            album: "Unknown Album".to_string(),
            ..Self::default()
        }
    }
}

pub fn read(path: &Path) -> anyhow::Result<TrackMetadata> {
    let tagged = lofty::read_from_path(path).with_context(|| format!("read tags {}", path.display()))?;
    let tag = tagged
        .primary_tag()
        .or_else(|| tagged.first_tag())
        .context("no tags")?;

    Ok(TrackMetadata {
        title: tag.title().map(|s| s.into_owned()).unwrap_or_default(),
        artist: tag.artist().map(|s| s.into_owned()).unwrap_or_default(),
        album: tag.album().map(|s| s.into_owned()).unwrap_or_default(),
        year: read_year(tag).unwrap_or(0),
        genre: tag.genre().map(|s| s.into_owned()).unwrap_or_default(),
        album_art: cover_data_url(tag).unwrap_or_default(),
    })
}

fn read_year(tag: &Tag) -> Option<u32> {
    let raw = tag
        .items()
        .find(|item| matches!(item.key(), ItemKey::RecordingDate))
        .and_then(|item| item.value().text())?;
    // Dates come as "2004", "2004-05-01", ...
    let digits: String = raw.trim().chars().take_while(|c| c.is_ascii_digit()).collect();
    digits.parse().ok()
}

fn cover_data_url(tag: &Tag) -> Option<String> {
    let pictures = tag.pictures();
    let picture = pictures
        .iter()
        .find(|p| p.pic_type() == PictureType::CoverFront)
        .or_else(|| pictures.first())?;
    let jpeg = resize_cover(picture.data())?;
    Some(format!("data:image/jpeg;base64,{}", STANDARD.encode(jpeg)))
}

fn resize_cover(data: &[u8]) -> Option<Vec<u8>> {
    let img = image::load_from_memory(data).ok()?;
    let resized = img
        .resize_exact(COVER_SIZE, COVER_SIZE, FilterType::Lanczos3)
        .to_rgb8();

    let mut out = Vec::new();
    JpegEncoder::new_with_quality(&mut out, COVER_QUALITY)
        .encode_image(&resized)
        .ok()?;
    Some(out)
}
