//! Command-line construction for yt-dlp

use crate::types::FormatKind;
use std::path::Path;

/// Video selector without a height ceiling
const DEFAULT_VIDEO_SELECTOR: &str = "bestvideo[ext=mp4]+bestaudio[ext=m4a]/best[ext=mp4]/best";

/// Sentinel quality label meaning "no ceiling"
pub const BEST_QUALITY: &str = "best";

/// Everything needed to produce one output file
#[derive(Debug, Clone)]
pub struct FetchPlan<'a> {
    /// Source URL
    pub url: &'a str,
    /// Requested output kind
    pub format: FormatKind,
    /// Quality label such as "720p"
    pub quality: Option<&'a str>,
    /// Where the tool must write the file
    pub output_path: &'a Path,
}

/// Height ceiling encoded in a quality label ("720p" -> 720)
///
/// `None` for "best", an absent label, or anything without a usable number.
pub fn parse_height(quality: Option<&str>) -> Option<u32> {
    let quality = quality?.trim();
    if quality.is_empty() || quality.eq_ignore_ascii_case(BEST_QUALITY) {
        return None;
    }
    let digits = quality
        .strip_suffix('p')
        .or_else(|| quality.strip_suffix('P'))
        .unwrap_or(quality);
    digits.parse::<u32>().ok().filter(|h| *h > 0)
}

/// Video format selector honoring an optional height ceiling
///
/// Falls back through constrained mp4 pair, constrained single mp4 and then
/// the unconstrained best stream.
pub fn video_selector(max_height: Option<u32>) -> String {
    match max_height {
        Some(h) => format!(
            "bestvideo[height<=?{h}][ext=mp4]+bestaudio[ext=m4a]/best[ext=mp4][height<=?{h}]/best"
        ),
        None => DEFAULT_VIDEO_SELECTOR.to_string(),
    }
}

/// Flags shared by every fetch
fn base_args(user_agent: &str) -> Vec<String> {
    [
        "--no-playlist",
        "--add-metadata",
        "--embed-thumbnail",
        "--parse-metadata",
        "%(uploader)s:%(artist)s",
        "--parse-metadata",
        "%(uploader)s:%(album)s",
        "--user-agent",
        user_agent,
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

/// Full argument list for producing the file described by `plan`
pub fn fetch_args(plan: &FetchPlan<'_>, user_agent: &str) -> Vec<String> {
    let mut args = base_args(user_agent);

    match plan.format {
        FormatKind::Video => {
            let max_height = parse_height(plan.quality);
            if max_height.is_none()
                && let Some(label) = plan.quality
                && !label.trim().is_empty()
                && !label.trim().eq_ignore_ascii_case(BEST_QUALITY)
            {
                tracing::warn!(quality = label, "unrecognized quality label, using best");
            }
            args.extend([
                "-f".to_string(),
                video_selector(max_height),
                "--merge-output-format".to_string(),
                "mp4".to_string(),
            ]);
        }
        FormatKind::Audio => {
            args.extend(
                [
                    "-f",
                    "bestaudio",
                    "--extract-audio",
                    "--audio-format",
                    "mp3",
                    "--audio-quality",
                    "0",
                ]
                .into_iter()
                .map(String::from),
            );
        }
    }

    args.push("-o".to_string());
    args.push(plan.output_path.to_string_lossy().into_owned());
    args.push(plan.url.to_string());
    args
}

/// Argument list for a metadata-only lookup
pub fn lookup_args(url: &str, user_agent: &str) -> Vec<String> {
    [
        "--no-playlist",
        "--dump-json",
        "--skip-download",
        "--user-agent",
        user_agent,
        url,
    ]
    .into_iter()
    .map(String::from)
    .collect()
}
