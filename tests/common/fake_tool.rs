//! A stand-in yt-dlp written as a shell script

use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use tempfile::TempDir;

/// Metadata printed for `--dump-json`
pub const INFO_JSON: &str = r#"{"title":"One More Time (Official Video)","track":"One More Time","uploader":"DaftPunkVEVO","artist":"Daft Punk","thumbnail":"https://img.example/1.jpg","formats":[{"vcodec":"none","height":null},{"vcodec":"avc1","height":1080},{"vcodec":"avc1","height":720},{"vcodec":"vp9","height":360}]}"#;

/// Contents written to the `-o` path on success
pub const MEDIA_BYTES: &[u8] = b"fake media payload";

/// Behaviour by URL:
/// - contains `private`: exits 1 with an ERROR line on stderr
/// - contains `slow`: sleeps 5 seconds first
/// - `--dump-json`: prints [`INFO_JSON`]
/// - otherwise writes [`MEDIA_BYTES`] to the path after `-o`
const SCRIPT: &str = r#"#!/bin/sh
out=""
prev=""
url=""
json=0
for arg in "$@"; do
  if [ "$prev" = "-o" ]; then out="$arg"; fi
  if [ "$arg" = "--dump-json" ]; then json=1; fi
  prev="$arg"
  url="$arg"
done
case "$url" in
  *slow*) sleep 5 ;;
esac
case "$url" in
  *private*)
    echo "[youtube] abc: Downloading webpage" >&2
    echo "ERROR: [youtube] abc: Private video. Sign in if you've been granted access to this video" >&2
    exit 1 ;;
esac
if [ "$json" = "1" ]; then
  cat <<'EOF'
__INFO_JSON__
EOF
  exit 0
fi
if [ -n "$out" ]; then
  printf '%s' "__MEDIA__" > "$out"
  exit 0
fi
echo "ERROR: no output path" >&2
exit 2
"#;

static FAKE_YTDLP: OnceLock<(TempDir, PathBuf)> = OnceLock::new();

/// Path of the fake tool, written once per test binary
///
/// Every test resolves this before spawning anything, so no child process can
/// inherit the script's write handle ("text file busy").
pub fn fake_ytdlp() -> &'static Path {
    let (_, path) = FAKE_YTDLP.get_or_init(|| {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("yt-dlp");
        let script = SCRIPT
            .replace("__INFO_JSON__", INFO_JSON)
            .replace("__MEDIA__", std::str::from_utf8(MEDIA_BYTES).unwrap());
        std::fs::write(&path, script).unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
        (dir, path)
    });
    path
}
