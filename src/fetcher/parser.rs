//! Parsers for yt-dlp output

use super::command::BEST_QUALITY;
use crate::error::LookupError;
use crate::types::VideoDetails;
use serde::Deserialize;
use std::collections::BTreeSet;

/// Heights offered in the quality ladder, highest first
pub const LADDER_HEIGHTS: [u32; 6] = [1440, 1080, 720, 480, 360, 240];

const UNKNOWN_TITLE: &str = "Title unavailable";
const UNKNOWN_ARTIST: &str = "Unknown artist";

/// The subset of the `--dump-json` document the lookup needs
#[derive(Debug, Default, Deserialize)]
struct RawInfo {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    track: Option<String>,
    #[serde(default)]
    artist: Option<String>,
    #[serde(default)]
    uploader: Option<String>,
    #[serde(default)]
    thumbnail: Option<String>,
    #[serde(default)]
    formats: Option<Vec<RawFormat>>,
}

#[derive(Debug, Default, Deserialize)]
struct RawFormat {
    #[serde(default)]
    vcodec: Option<String>,
    #[serde(default)]
    height: Option<u32>,
}

impl RawFormat {
    /// Video height, if this entry carries a video stream
    fn video_height(&self) -> Option<u32> {
        if self.vcodec.as_deref() == Some("none") {
            return None;
        }
        self.height.filter(|h| *h > 0)
    }
}

/// First non-empty value among `candidates`
fn first_present(candidates: [Option<String>; 2], default: &str) -> String {
    candidates
        .into_iter()
        .flatten()
        .map(|s| s.trim().to_string())
        .find(|s| !s.is_empty())
        .unwrap_or_else(|| default.to_string())
}

/// Build the quality ladder from the heights of available video streams
///
/// Always starts with "best". Each stream contributes the highest threshold
/// it reaches, so a source with 1080/720/360 streams offers exactly those
/// three labels.
pub fn quality_ladder(heights: impl IntoIterator<Item = u32>) -> Vec<String> {
    let reached: BTreeSet<u32> = heights
        .into_iter()
        .filter_map(|h| LADDER_HEIGHTS.iter().copied().find(|t| h >= *t))
        .collect();

    let mut ladder = vec![BEST_QUALITY.to_string()];
    ladder.extend(
        LADDER_HEIGHTS
            .iter()
            .filter(|t| reached.contains(t))
            .map(|t| format!("{t}p")),
    );
    ladder
}

/// Parse the `--dump-json` output of a lookup into [`VideoDetails`]
///
/// Music fields (`track`, `artist`) win over the generic `title`/`uploader`.
pub fn parse_video_details(stdout: &str) -> Result<VideoDetails, LookupError> {
    let raw: RawInfo = serde_json::from_str(stdout.trim())
        .map_err(|e| LookupError::Malformed(e.to_string()))?;

    let formats = raw.formats.unwrap_or_default();

    Ok(VideoDetails {
        title: first_present([raw.track, raw.title], UNKNOWN_TITLE),
        uploader: first_present([raw.artist, raw.uploader], UNKNOWN_ARTIST),
        thumbnail: raw.thumbnail.unwrap_or_default(),
        formats: quality_ladder(formats.iter().filter_map(RawFormat::video_height)),
    })
}

/// Last non-empty line of a tool's diagnostic output
///
/// Used as the client-facing reason when the tool exits unsuccessfully.
pub fn last_diagnostic_line(stderr: &str) -> Option<String> {
    stderr
        .lines()
        .map(str::trim)
        .rfind(|line| !line.is_empty())
        .map(str::to_string)
}
