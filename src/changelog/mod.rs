//! Changelog section extraction for keepachangelog-style files.
//!
//! Sections start at a `## [<version>]` heading and run up to the next
//! `## [` heading or the end of the document.

use crate::error::ChangelogError;
use regex::Regex;
use std::path::Path;
use std::sync::LazyLock;

const HEADING_PREFIX: &str = "## [";

static SEMVER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?P<core>[0-9]+\.[0-9]+\.[0-9]+)(?:-(?P<pre>[0-9A-Za-z-]+(?:\.[0-9A-Za-z-]+)*))?(?:\+(?P<build>[0-9A-Za-z-]+(?:\.[0-9A-Za-z-]+)*))?",
    )
    .expect("semver regex is valid")
});

/// Find the first semantic version embedded anywhere in `tag`.
///
/// `release/1.2.3-rc.1` yields `1.2.3-rc.1`, `v0.5.0+build.7` yields
/// `0.5.0+build.7`.
pub fn tag_version(tag: &str) -> Result<&str, ChangelogError> {
    SEMVER_RE
        .find(tag)
        .map(|m| m.as_str())
        .ok_or_else(|| ChangelogError::InvalidTag {
            tag: tag.to_string(),
        })
}

/// Extract the changelog section belonging to the version in `tag`.
///
/// Headings only count at the start of a line. The returned slice includes
/// the heading line and stops right before the next `## [` heading. The
/// heading is matched on its bracketed literal, so `1.0.0` never matches
/// `## [1.0.0-rc1]`.
///
/// # Errors
/// - `InvalidTag` if `tag` holds no semantic version
/// - `SectionNotFound` if the document has no heading for that version
pub fn extract_section<'a>(content: &'a str, tag: &str) -> Result<&'a str, ChangelogError> {
    let version = tag_version(tag)?;
    let marker = format!("{HEADING_PREFIX}{version}]");

    let start = find_line_start(content, 0, &marker).ok_or_else(|| {
        ChangelogError::SectionNotFound {
            version: version.to_string(),
        }
    })?;

    let end = find_line_start(content, start + marker.len(), HEADING_PREFIX)
        .unwrap_or(content.len());

    Ok(&content[start..end])
}

/// Offset of the first `needle` at or after `from` that begins a line.
fn find_line_start(content: &str, from: usize, needle: &str) -> Option<usize> {
    content[from..]
        .match_indices(needle)
        .map(|(offset, _)| from + offset)
        .find(|&idx| idx == 0 || content.as_bytes()[idx - 1] == b'\n')
}

/// Read the changelog at `path` and extract the section for `tag`.
///
/// The tag is validated before the file is touched.
pub async fn read_section(path: &Path, tag: &str) -> Result<String, ChangelogError> {
    tag_version(tag)?;

    let content = tokio::fs::read_to_string(path).await.map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            ChangelogError::FileNotFound {
                path: path.to_path_buf(),
            }
        } else {
            ChangelogError::FileAccess {
                path: path.to_path_buf(),
                source: e,
            }
        }
    })?;

    log::debug!("Read {} bytes from {}", content.len(), path.display());
    extract_section(&content, tag).map(str::to_string)
}
