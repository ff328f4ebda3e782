use std::fmt;

use log::{debug, error};
use reqwest::Client;
use serde::Deserialize;
use thiserror::Error;

use crate::genre::normalize_genre;

const MUSICBRAINZ_API_URL: &str = "https://musicbrainz.org/ws/2/recording";

// MusicBrainz rejects requests without a contact in the User-Agent.
const USER_AGENT: &str = concat!(
    "retag/",
    env!("CARGO_PKG_VERSION"),
    " (your-email@example.com)"
);

/// The fields this tool writes back into a file, each present only when a
/// value was found by the lookup or supplied on the command line.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct TrackInfo {
    pub date: Option<String>,
    pub genre: Option<String>,
    pub comment: Option<String>,
}

impl fmt::Display for TrackInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut fields = Vec::new();
        if let Some(date) = &self.date {
            fields.push(format!("date: {date}"));
        }
        if let Some(genre) = &self.genre {
            fields.push(format!("genre: {genre}"));
        }
        if let Some(comment) = &self.comment {
            fields.push(format!("comment: {comment}"));
        }
        write!(f, "{{{}}}", fields.join(", "))
    }
}

/// A failure pulling one field out of a search candidate. Consumed at the
/// log site; the other field is still extracted.
#[derive(Debug, Error)]
enum ExtractError {
    #[error("release list is empty")]
    EmptyReleaseList,

    #[error("first release has no date")]
    MissingDate,

    #[error("release date {0:?} does not start with a year")]
    BadYear(String),
}

#[derive(Deserialize)]
struct SearchResponse {
    #[serde(default)]
    recordings: Vec<Recording>,
}

#[derive(Deserialize)]
struct Recording {
    releases: Option<Vec<Release>>,
    tags: Option<Vec<RecordingTag>>,
}

#[derive(Deserialize)]
struct Release {
    date: Option<String>,
}

#[derive(Deserialize)]
struct RecordingTag {
    name: String,
}

pub struct MusicBrainzClient {
    client: Client,
}

impl MusicBrainzClient {
    pub fn new() -> Result<Self, reqwest::Error> {
        let client = Client::builder().user_agent(USER_AGENT).build()?;
        Ok(Self { client })
    }

    /// Search for the closest recording match and pull out its release year
    /// and genre tags. The two fields fail independently: a bad date is
    /// logged and left unset while the genres still come through, and vice
    /// versa. Zero candidates yields an empty [`TrackInfo`].
    pub async fn find_track_info(
        &self,
        artist: &str,
        title: &str,
    ) -> Result<TrackInfo, reqwest::Error> {
        let query = format!(
            "artist:\"{}\" AND recording:\"{}\"",
            escape_lucene(artist),
            escape_lucene(title)
        );
        debug!("Searching recordings: {}", query);

        let response = self
            .client
            .get(MUSICBRAINZ_API_URL)
            .query(&[("query", query.as_str()), ("limit", "1"), ("fmt", "json")])
            .send()
            .await?;
        let search: SearchResponse = response.json().await?;

        let mut info = TrackInfo::default();
        for recording in &search.recordings {
            match extract_release_year(recording) {
                Ok(date) => info.date = date,
                Err(e) => {
                    error!("Error finding music date for {} - {}: {}", artist, title, e);
                }
            }
            info.genre = extract_genres(recording);
        }
        Ok(info)
    }
}

/// The 4-character year prefix of the first release's date, re-rendered
/// through an integer so leading zeros are stripped and garbage is caught.
fn extract_release_year(recording: &Recording) -> Result<Option<String>, ExtractError> {
    let releases = match &recording.releases {
        Some(releases) => releases,
        None => return Ok(None),
    };
    let first = releases.first().ok_or(ExtractError::EmptyReleaseList)?;
    let date = first.date.as_deref().ok_or(ExtractError::MissingDate)?;
    let prefix: String = date.chars().take(4).collect();
    let year: u32 = prefix
        .parse()
        .map_err(|_| ExtractError::BadYear(date.to_string()))?;
    Ok(Some(year.to_string()))
}

/// All non-empty tag names, each normalized, joined in service order.
fn extract_genres(recording: &Recording) -> Option<String> {
    let tags = recording.tags.as_ref()?;
    let genres: Vec<String> = tags
        .iter()
        .filter(|tag| !tag.name.is_empty())
        .map(|tag| normalize_genre(&tag.name))
        .collect();
    if genres.is_empty() {
        None
    } else {
        Some(genres.join(", "))
    }
}

fn escape_lucene(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> SearchResponse {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn full_candidate_extracts_both_fields() {
        let search = parse(
            r#"{"recordings": [{
                "releases": [{"date": "1999-06-08"}, {"date": "2001-01-01"}],
                "tags": [{"name": "Top 40"}, {"name": "contemporary r&b"}]
            }]}"#,
        );
        let recording = &search.recordings[0];
        assert_eq!(
            extract_release_year(recording).unwrap(),
            Some("1999".to_string())
        );
        assert_eq!(extract_genres(recording), Some("Pop, RnB".to_string()));
    }

    #[test]
    fn year_strips_leading_zeros() {
        let search = parse(r#"{"recordings": [{"releases": [{"date": "0999-01-01"}]}]}"#);
        assert_eq!(
            extract_release_year(&search.recordings[0]).unwrap(),
            Some("999".to_string())
        );
    }

    #[test]
    fn missing_release_list_is_not_an_error() {
        let search = parse(r#"{"recordings": [{"tags": [{"name": "pop"}]}]}"#);
        assert_eq!(extract_release_year(&search.recordings[0]).unwrap(), None);
    }

    #[test]
    fn empty_release_list_fails_date_only() {
        let search = parse(r#"{"recordings": [{"releases": [], "tags": [{"name": "pop"}]}]}"#);
        let recording = &search.recordings[0];
        assert!(extract_release_year(recording).is_err());
        assert_eq!(extract_genres(recording), Some("Pop".to_string()));
    }

    #[test]
    fn dateless_release_fails() {
        let search = parse(r#"{"recordings": [{"releases": [{}]}]}"#);
        assert!(extract_release_year(&search.recordings[0]).is_err());
    }

    #[test]
    fn non_numeric_year_fails() {
        let search = parse(r#"{"recordings": [{"releases": [{"date": "19xx"}]}]}"#);
        assert!(extract_release_year(&search.recordings[0]).is_err());
    }

    #[test]
    fn empty_tag_names_are_dropped() {
        let search = parse(
            r#"{"recordings": [{"tags": [{"name": ""}, {"name": "house"}, {"name": ""}]}]}"#,
        );
        assert_eq!(
            extract_genres(&search.recordings[0]),
            Some("House".to_string())
        );
    }

    #[test]
    fn all_empty_tag_names_leave_genre_unset() {
        let search = parse(r#"{"recordings": [{"tags": [{"name": ""}]}]}"#);
        assert_eq!(extract_genres(&search.recordings[0]), None);
    }

    #[test]
    fn zero_candidates_deserializes_empty() {
        let search = parse(r#"{"recordings": []}"#);
        assert!(search.recordings.is_empty());
    }

    #[test]
    fn lucene_escaping() {
        assert_eq!(escape_lucene(r#"Guns N" Roses"#), r#"Guns N\" Roses"#);
        assert_eq!(escape_lucene(r"AC\DC"), r"AC\\DC");
    }

    #[test]
    fn info_display_lists_only_set_fields() {
        let info = TrackInfo {
            date: Some("1999".into()),
            genre: None,
            comment: Some("ripped".into()),
        };
        assert_eq!(info.to_string(), "{date: 1999, comment: ripped}");
    }
}
