//! Manifest-domain helpers.
//!
//! These cover the data exchanged with the Bungie manifest endpoint: API
//! response envelopes, remote manifest paths, and installed manifest files
//! whose names embed an MD5 checksum.

use regex::Regex;
use schemas_core::{ComputationError, ComputationResult};
use std::path::Path;
use std::sync::LazyLock;

/// Lower-case MD5 checksum.
pub const LC_CHECKSUM_PATTERN: &str = "^[a-f0-9]{32}$";

/// Prefix of manifest file names.
pub const DEFAULT_MANIFEST_PREFIX: &str = "world_sql_content_";

/// Extension of manifest files.
pub const DEFAULT_MANIFEST_EXTENSION: &str = ".content";

/// Directory every remote manifest path lives under.
pub const EXPECTED_REMOTE_MANIFEST_DIR: &str = "/common/destiny_content/sqlite/";

const CHECKSUM_LEN: usize = 32;

static LC_CHECKSUM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(LC_CHECKSUM_PATTERN).expect("checksum pattern is valid"));

static DEFAULT_MANIFEST_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&manifest_name_regex(
        DEFAULT_MANIFEST_PREFIX,
        DEFAULT_MANIFEST_EXTENSION,
    ))
    .expect("manifest name pattern is valid")
});

/// Outcome class of a Bungie API `ErrorCode`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BungieErrorClass {
    /// Request succeeded
    Success,
    /// Missing, invalid or revoked API key
    ApiKey,
    /// Any other error
    Unknown,
}

/// Classifies a Bungie API `ErrorCode`.
pub fn classify_error_code(code: i64) -> BungieErrorClass {
    match code {
        1 => BungieErrorClass::Success,
        2101 | 2102 => BungieErrorClass::ApiKey,
        _ => BungieErrorClass::Unknown,
    }
}

/// Whether text is a lower-case MD5 checksum.
pub fn is_lc_checksum(text: &str) -> bool {
    LC_CHECKSUM.is_match(text)
}

/// Normalises an MD5 checksum to lower case.
pub fn lc_checksum(text: &str) -> ComputationResult<String> {
    let lowered = text.trim().to_ascii_lowercase();
    if is_lc_checksum(&lowered) {
        Ok(lowered)
    } else {
        Err(ComputationError::invalid_input(
            "mf.lc_checksum",
            format!("'{}' is not a 32 character hex checksum", text),
        ))
    }
}

/// Builds the pattern manifest file names must match.
pub fn manifest_name_regex(starts_with: &str, extension: &str) -> String {
    format!(
        "^{}[a-fA-F0-9]{{32}}{}$",
        regex::escape(starts_with),
        regex::escape(extension)
    )
}

/// Whether `name` is a manifest file name with the given prefix and extension.
pub fn manifest_file_name(name: &str, starts_with: &str, extension: &str) -> bool {
    if starts_with == DEFAULT_MANIFEST_PREFIX && extension == DEFAULT_MANIFEST_EXTENSION {
        return DEFAULT_MANIFEST_NAME.is_match(name);
    }
    // Both parts are escaped, so the pattern always compiles.
    Regex::new(&manifest_name_regex(starts_with, extension)).is_ok_and(|re| re.is_match(name))
}

/// Checksum embedded in a manifest file name.
///
/// Well-formed names carry it after the last underscore of the stem;
/// otherwise the last 32 characters of the stem are taken.
pub fn checksum_from_manifest_name(
    name: &str,
    starts_with: &str,
    extension: &str,
) -> ComputationResult<String> {
    let stem = Path::new(name)
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or_default();

    let candidate = if manifest_file_name(name, starts_with, extension) {
        stem.rsplit('_').next().unwrap_or(stem)
    } else {
        let skip = stem.chars().count().saturating_sub(CHECKSUM_LEN);
        match stem.char_indices().nth(skip) {
            Some((idx, _)) => &stem[idx..],
            None => stem,
        }
    };

    lc_checksum(candidate).map_err(|_| {
        ComputationError::invalid_input(
            "mf.checksum_from_manifest_name",
            format!("no checksum can be derived from manifest name '{}'", name),
        )
    })
}

/// File name at the end of a remote manifest path.
pub fn remote_manifest_name(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

/// Whether a remote manifest path lives under the expected directory.
pub fn check_remote_manifest_dir(path: &str, expected_dir: &str) -> bool {
    path.starts_with(expected_dir)
}

/// Picks the available language closest to the desired one.
///
/// An exact tag match wins; otherwise the first available tag sharing the
/// primary language subtag is chosen. Tags compare case-insensitively and
/// `_` is treated as `-`.
pub fn closest_language<S: AsRef<str>>(desired: &str, available: &[S]) -> Option<String> {
    let desired = normalize_tag(desired);
    if desired.is_empty() {
        return None;
    }

    if let Some(exact) = available
        .iter()
        .find(|tag| normalize_tag(tag.as_ref()) == desired)
    {
        return Some(exact.as_ref().to_string());
    }

    let primary = primary_subtag(&desired);
    available
        .iter()
        .find(|tag| primary_subtag(&normalize_tag(tag.as_ref())) == primary)
        .map(|tag| tag.as_ref().to_string())
}

fn normalize_tag(tag: &str) -> String {
    tag.trim().replace('_', "-").to_ascii_lowercase()
}

fn primary_subtag(tag: &str) -> &str {
    tag.split('-').next().unwrap_or(tag)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const CHECKSUM: &str = "0123456789abcdef0123456789abcdef";

    #[test]
    fn test_classify_error_code() {
        assert_eq!(classify_error_code(1), BungieErrorClass::Success);
        assert_eq!(classify_error_code(2101), BungieErrorClass::ApiKey);
        assert_eq!(classify_error_code(2102), BungieErrorClass::ApiKey);
        assert_eq!(classify_error_code(5), BungieErrorClass::Unknown);
    }

    #[test]
    fn test_lc_checksum() {
        assert!(is_lc_checksum(CHECKSUM));
        assert!(!is_lc_checksum(&CHECKSUM.to_uppercase()));
        assert_eq!(lc_checksum(&CHECKSUM.to_uppercase()).unwrap(), CHECKSUM);
        assert!(lc_checksum("abc").is_err());
        assert!(lc_checksum("g123456789abcdef0123456789abcdef").is_err());
    }

    #[test]
    fn test_manifest_name_regex() {
        assert_eq!(
            manifest_name_regex("world_sql_content_", ".content"),
            r"^world_sql_content_[a-fA-F0-9]{32}\.content$"
        );
    }

    #[test]
    fn test_manifest_file_name() {
        let name = format!("world_sql_content_{}.content", CHECKSUM);
        assert!(manifest_file_name(&name, DEFAULT_MANIFEST_PREFIX, DEFAULT_MANIFEST_EXTENSION));
        assert!(!manifest_file_name("world_sql_content_abc.content", DEFAULT_MANIFEST_PREFIX, DEFAULT_MANIFEST_EXTENSION));
        assert!(!manifest_file_name(
            &format!("world_sql_content_{}xcontent", CHECKSUM),
            DEFAULT_MANIFEST_PREFIX,
            DEFAULT_MANIFEST_EXTENSION
        ));

        let custom = format!("mf_{}.sqlite", CHECKSUM);
        assert!(manifest_file_name(&custom, "mf_", ".sqlite"));
    }

    #[test]
    fn test_checksum_from_manifest_name() {
        let name = format!("world_sql_content_{}.content", CHECKSUM);
        assert_eq!(
            checksum_from_manifest_name(&name, DEFAULT_MANIFEST_PREFIX, DEFAULT_MANIFEST_EXTENSION).unwrap(),
            CHECKSUM
        );

        let renamed = format!("manifest-{}.content", CHECKSUM.to_uppercase());
        assert_eq!(
            checksum_from_manifest_name(&renamed, DEFAULT_MANIFEST_PREFIX, DEFAULT_MANIFEST_EXTENSION).unwrap(),
            CHECKSUM
        );

        let err = checksum_from_manifest_name("short.content", DEFAULT_MANIFEST_PREFIX, DEFAULT_MANIFEST_EXTENSION)
            .unwrap_err();
        assert!(!err.is_defect());
    }

    #[test]
    fn test_remote_manifest_path() {
        let path = format!(
            "/common/destiny_content/sqlite/en/world_sql_content_{}.content",
            CHECKSUM
        );
        assert_eq!(
            remote_manifest_name(&path),
            format!("world_sql_content_{}.content", CHECKSUM)
        );
        assert!(check_remote_manifest_dir(&path, EXPECTED_REMOTE_MANIFEST_DIR));
        assert!(!check_remote_manifest_dir("/other/en/x.content", EXPECTED_REMOTE_MANIFEST_DIR));
        assert_eq!(remote_manifest_name("plain.content"), "plain.content");
    }

    #[test]
    fn test_closest_language() {
        let available = ["en", "fr", "pt-br", "zh-chs", "zh-cht"];
        assert_eq!(closest_language("en", &available).as_deref(), Some("en"));
        assert_eq!(closest_language("EN_gb", &available).as_deref(), Some("en"));
        assert_eq!(closest_language("pt", &available).as_deref(), Some("pt-br"));
        assert_eq!(closest_language("zh-CHT", &available).as_deref(), Some("zh-cht"));
        assert_eq!(closest_language("de", &available), None);
        assert_eq!(closest_language("", &available), None);
    }
}
