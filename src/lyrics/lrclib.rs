//! LRCLIB API client
//!
//! LRCLIB is a free lyrics API that provides synchronized (LRC format) lyrics.
//! API Documentation: https://lrclib.net/docs

use std::time::Duration;

use serde::{Deserialize, Deserializer};
use tracing::debug;

use crate::config::LyricsConfig;
use crate::error::{Error, Result};

/// LRCLIB record id. The API sends it as a JSON number, some mirrors as a string;
/// both normalize to the same text form.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LyricId(String);

impl LyricId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for LyricId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for LyricId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Number(serde_json::Number),
            Text(String),
        }

        Ok(match Raw::deserialize(deserializer)? {
            Raw::Number(n) => LyricId(n.to_string()),
            Raw::Text(s) => LyricId(s),
        })
    }
}

/// LRCLIB sends `null` for missing lyrics and albums.
fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// One search hit
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchCandidate {
    pub id: LyricId,
    #[serde(default, deserialize_with = "null_as_default")]
    pub track_name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub artist_name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub album_name: String,
    #[serde(default, rename = "duration", deserialize_with = "null_as_default")]
    pub duration_seconds: f64,
    #[allow(dead_code)]
    #[serde(default, deserialize_with = "null_as_default")]
    pub instrumental: bool,
    #[allow(dead_code)]
    #[serde(default, deserialize_with = "null_as_default")]
    pub plain_lyrics: String,
    #[allow(dead_code)]
    #[serde(default, deserialize_with = "null_as_default")]
    pub synced_lyrics: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GetResponse {
    id: Option<LyricId>,
    #[serde(default, deserialize_with = "null_as_default")]
    synced_lyrics: String,
}

/// LRCLIB API client
#[derive(Debug, Clone)]
pub struct LrclibClient {
    client: reqwest::Client,
    base_url: String,
}

impl LrclibClient {
    pub fn new(cfg: &LyricsConfig) -> anyhow::Result<Self> {
        let mut builder = reqwest::Client::builder().user_agent(cfg.user_agent.as_str());
        if cfg.timeout_secs > 0 {
            builder = builder.timeout(Duration::from_secs(cfg.timeout_secs));
        }

        Ok(Self {
            client: builder.build()?,
            base_url: cfg.api_base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Query string for `/api/search`. Title and artist together are sent as
    /// exact-match fields, a single one as free text.
    pub fn search_query(title: Option<&str>, artist: Option<&str>) -> Result<String> {
        match (title, artist) {
            (Some(title), Some(artist)) => Ok(format!(
                "track_name={}&artist_name={}",
                urlencoding::encode(title),
                urlencoding::encode(artist)
            )),
            (Some(text), None) | (None, Some(text)) => Ok(format!("q={}", urlencoding::encode(text))),
            (None, None) => Err(Error::InvalidQuery),
        }
    }

    /// Search for lyrics; results are in the order LRCLIB ranks them.
    pub async fn search(
        &self,
        title: Option<&str>,
        artist: Option<&str>,
    ) -> Result<Vec<SearchCandidate>> {
        let url = format!("{}/api/search?{}", self.base_url, Self::search_query(title, artist)?);
        debug!("lrclib search {url}");

        let response = self.client.get(&url).send().await?;
        if !response.status().is_success() {
            return Err(Error::Upstream(format!("search returned {}", response.status())));
        }

        Ok(response.json().await?)
    }

    /// Synced lyrics of one record. A record without synced lyrics yields empty text.
    pub async fn fetch_by_id(&self, id: &LyricId) -> Result<String> {
        let url = format!("{}/api/get/{}", self.base_url, urlencoding::encode(id.as_str()));

        let response = self.client.get(&url).send().await?;
        if !response.status().is_success() {
            return Err(Error::Upstream(format!("get {id} returned {}", response.status())));
        }

        let body: GetResponse = response.json().await?;
        if body.id.as_ref().is_some_and(|got| got != id) {
            debug!("lrclib answered get {id} with record {:?}", body.id);
        }
        Ok(body.synced_lyrics)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lyrics::stub::StubApi;
    use serde_json::json;

    fn client_for(base_url: &str) -> LrclibClient {
        LrclibClient::new(&LyricsConfig {
            api_base_url: base_url.to_string(),
            ..LyricsConfig::default()
        })
        .unwrap()
    }

    #[test]
    fn id_accepts_numbers_and_strings() {
        let a: LyricId = serde_json::from_value(json!(12345)).unwrap();
        let b: LyricId = serde_json::from_value(json!("12345")).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.as_str(), "12345");
    }

    #[test]
    fn candidate_tolerates_nulls() {
        let c: SearchCandidate = serde_json::from_value(json!({
            "id": 7,
            "trackName": "Song",
            "artistName": "Band",
            "albumName": null,
            "duration": 201.0,
            "instrumental": true,
            "plainLyrics": null,
            "syncedLyrics": null
        }))
        .unwrap();
        assert_eq!(c.id.as_str(), "7");
        assert_eq!(c.album_name, "");
        assert_eq!(c.duration_seconds, 201.0);
        assert!(c.instrumental);
        assert!(c.synced_lyrics.is_empty());
    }

    #[test]
    fn search_query_shapes() {
        assert_eq!(
            LrclibClient::search_query(Some("Hey Jude"), Some("The Beatles")).unwrap(),
            "track_name=Hey%20Jude&artist_name=The%20Beatles"
        );
        assert_eq!(LrclibClient::search_query(Some("Hey Jude"), None).unwrap(), "q=Hey%20Jude");
        assert_eq!(LrclibClient::search_query(None, Some("Beatles")).unwrap(), "q=Beatles");
        assert!(matches!(
            LrclibClient::search_query(None, None),
            Err(Error::InvalidQuery)
        ));
    }

    #[tokio::test]
    async fn search_sends_exact_fields_and_keeps_order() {
        let stub = StubApi::new(json!([
            {"id": 2, "trackName": "B", "artistName": "X", "syncedLyrics": "[00:01.00]b"},
            {"id": "1", "trackName": "A", "artistName": "X", "syncedLyrics": "[00:01.00]a"}
        ]))
        .spawn()
        .await;
        let client = client_for(&stub.base_url);

        let results = client.search(Some("Song"), Some("Band")).await.unwrap();
        let ids: Vec<&str> = results.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, ["2", "1"]);

        let query = stub.api.last_search().unwrap();
        assert_eq!(query.get("track_name").map(String::as_str), Some("Song"));
        assert_eq!(query.get("artist_name").map(String::as_str), Some("Band"));
        assert!(!query.contains_key("q"));
    }

    #[tokio::test]
    async fn search_single_term_uses_free_text() {
        let stub = StubApi::new(json!([])).spawn().await;
        let client = client_for(&stub.base_url);

        assert!(client.search(None, Some("Band")).await.unwrap().is_empty());
        let query = stub.api.last_search().unwrap();
        assert_eq!(query.get("q").map(String::as_str), Some("Band"));
    }

    #[tokio::test]
    async fn search_failure_status_is_upstream_error() {
        let stub = StubApi::new(json!([])).with_search_failure().spawn().await;
        let client = client_for(&stub.base_url);

        let err = client.search(Some("a"), Some("b")).await.unwrap_err();
        assert!(matches!(err, Error::Upstream(_)));
    }

    #[tokio::test]
    async fn fetch_by_id_returns_synced_text() {
        let stub = StubApi::new(json!([]))
            .with_record("42", json!({"id": 42, "syncedLyrics": "[00:02.00]hello"}))
            .with_record("43", json!({"id": "43"}))
            .spawn()
            .await;
        let client = client_for(&stub.base_url);

        let id: LyricId = serde_json::from_value(json!(42)).unwrap();
        assert_eq!(client.fetch_by_id(&id).await.unwrap(), "[00:02.00]hello");

        let id: LyricId = serde_json::from_value(json!("43")).unwrap();
        assert_eq!(client.fetch_by_id(&id).await.unwrap(), "");

        let id: LyricId = serde_json::from_value(json!(99)).unwrap();
        assert!(matches!(client.fetch_by_id(&id).await, Err(Error::Upstream(_))));
    }

    #[tokio::test]
    async fn undecodable_bodies_are_upstream_errors() {
        let stub = StubApi::new(json!([]))
            .with_record("1", json!({"id": 1}))
            .with_malformed_bodies()
            .spawn()
            .await;
        let client = client_for(&stub.base_url);

        let err = client.search(Some("a"), Some("b")).await.unwrap_err();
        assert!(matches!(err, Error::Upstream(_)));

        let id: LyricId = serde_json::from_value(json!(1)).unwrap();
        assert!(matches!(client.fetch_by_id(&id).await, Err(Error::Upstream(_))));
    }

    #[tokio::test]
    async fn search_object_instead_of_array_is_upstream_error() {
        let stub = StubApi::new(json!({"message": "rate limited"})).spawn().await;
        let client = client_for(&stub.base_url);

        let err = client.search(Some("a"), None).await.unwrap_err();
        assert!(matches!(err, Error::Upstream(_)));
    }

    #[tokio::test]
    async fn unreachable_service_is_upstream_error() {
        let client = client_for("http://127.0.0.1:9");
        let err = client.search(Some("a"), None).await.unwrap_err();
        assert!(matches!(err, Error::Upstream(_)));
    }
}
