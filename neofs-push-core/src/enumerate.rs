//! Directory traversal into publishable file entries.

use std::fs::File;
use std::io::Read;
use std::path::{Component, Path, PathBuf};

use tracing::{debug, info};
use walkdir::WalkDir;

use crate::error::PublishError;

const SNIFF_LEN: usize = 8 * 1024;
const FALLBACK_BINARY: &str = "application/octet-stream";
const FALLBACK_TEXT: &str = "text/plain";
const EMPTY: &str = "application/x-empty";

/// A file found under the publish root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    /// Absolute path of the local file.
    pub source: PathBuf,
    pub mime_type: String,
    /// Value of the `FilePath` attribute, `/`-separated.
    pub publish_path: String,
}

/// Walk `root` and compute the publish path and MIME type of every file, in lexical order.
///
/// With `strip_prefix` the publish path is relative to `root`; otherwise the name of `root`
/// itself is the leading segment. A non-empty `url_prefix` is prepended.
pub fn enumerate(
    root: &Path,
    url_prefix: Option<&str>,
    strip_prefix: bool,
) -> Result<Vec<FileEntry>, PublishError> {
    let base = std::fs::canonicalize(root).map_err(|e| PublishError::io(root, e))?;
    // Named as given: a symlinked root publishes under the link name, not its target.
    let root_name = root
        .file_name()
        .or_else(|| base.file_name())
        .map(|n| n.to_string_lossy().into_owned())
        .filter(|_| !strip_prefix);
    let prefix = url_prefix
        .map(|p| p.trim_end_matches('/'))
        .filter(|p| !p.is_empty());

    let mut entries = Vec::new();
    for entry in WalkDir::new(&base).follow_links(false).sort_by_file_name() {
        let entry = entry?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let relative = path
            .strip_prefix(&base)
            .map_err(|_| PublishError::invalid_input(format!("{} escapes {}", path.display(), base.display())))?;

        let mut segments: Vec<String> = Vec::new();
        if let Some(p) = prefix {
            segments.push(p.to_owned());
        }
        if let Some(name) = &root_name {
            segments.push(name.clone());
        }
        segments.extend(to_segments(relative));
        let publish_path = segments.join("/");

        let mime_type = detect_mime(path)?;
        debug!(file = %path.display(), publish_path = %publish_path, mime_type = %mime_type, "Enumerated file");
        entries.push(FileEntry {
            source: path.to_path_buf(),
            mime_type,
            publish_path,
        });
    }

    info!(root = %base.display(), count = entries.len(), "Enumerated files for publishing");
    Ok(entries)
}

fn to_segments(relative: &Path) -> impl Iterator<Item = String> + '_ {
    relative.components().filter_map(|c| match c {
        Component::Normal(s) => Some(s.to_string_lossy().into_owned()),
        _ => None,
    })
}

/// Extension lookup first, then magic-byte sniffing, then a text/binary guess.
pub fn detect_mime(path: &Path) -> Result<String, PublishError> {
    if let Some(mime) = mime_guess::from_path(path).first_raw() {
        return Ok(mime.to_owned());
    }

    let mut head = Vec::with_capacity(SNIFF_LEN);
    File::open(path)
        .and_then(|f| f.take(SNIFF_LEN as u64).read_to_end(&mut head))
        .map_err(|e| PublishError::io(path, e))?;

    if head.is_empty() {
        return Ok(EMPTY.to_owned());
    }
    if let Some(kind) = infer::get(&head) {
        return Ok(kind.mime_type().to_owned());
    }
    if looks_like_text(&head) {
        Ok(FALLBACK_TEXT.to_owned())
    } else {
        Ok(FALLBACK_BINARY.to_owned())
    }
}

fn looks_like_text(head: &[u8]) -> bool {
    if head.contains(&0) {
        return false;
    }
    match std::str::from_utf8(head) {
        Ok(_) => true,
        // The sniff window may cut a multi-byte character in half.
        Err(e) => e.error_len().is_none(),
    }
}
