//! Accept Drive URLs wherever a drive, folder or file id is configured.

use regex::Regex;
use std::sync::LazyLock;

use crate::error::{Error, Result};

/// URL shapes the Drive web UI hands out, each capturing the id.
///
/// A shared drive's root opens as `/drive/folders/<drive id>`, so the folder
/// pattern covers drive ids too.
static URL_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"^https?://drive\.google\.com/drive/(?:u/\d+/)?folders/([a-zA-Z0-9_-]+)",
        r"^https?://drive\.google\.com/file/d/([a-zA-Z0-9_-]+)",
        r"^https?://drive\.google\.com/open\?id=([a-zA-Z0-9_-]+)",
    ]
    .iter()
    .map(|pattern| Regex::new(pattern).expect("Invalid Drive URL regex"))
    .collect()
});

/// Valid Google Drive ID pattern (alphanumeric, underscore, hyphen).
static ID_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9_-]+$").expect("Invalid ID regex"));

/// Extract a Google Drive ID from a URL or validate a raw ID.
///
/// ```
/// use drive_archive::url_parser::extract_id;
///
/// let id = extract_id("https://drive.google.com/drive/folders/16DyU1zZSrxu").unwrap();
/// assert_eq!(id, "16DyU1zZSrxu");
///
/// let id = extract_id("0AO5ageEAi854Uk9PVA").unwrap();
/// assert_eq!(id, "0AO5ageEAi854Uk9PVA");
/// ```
pub fn extract_id(url_or_id: &str) -> Result<String> {
    let trimmed = url_or_id.trim();

    let from_url = URL_PATTERNS
        .iter()
        .find_map(|re| re.captures(trimmed).and_then(|c| c.get(1)));
    if let Some(id) = from_url {
        return Ok(id.as_str().to_string());
    }

    if ID_REGEX.is_match(trimmed) {
        return Ok(trimmed.to_string());
    }

    Err(Error::InvalidUrlOrId(url_or_id.to_string()))
}
