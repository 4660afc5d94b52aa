//! Shared key generation for storage backends.
//!
//! Key format: `{category}/{millis}-{sanitized filename}`. Public paths are keys with a
//! leading `/`.

use folio_core::validation::sanitize_filename;
use folio_core::UploadCategory;
use url::Url;

/// Generate a storage key for an upload.
///
/// Two uploads of the same name in the same millisecond share a key; the later one wins.
pub fn build_storage_key(category: UploadCategory, filename: &str, millis: i64) -> String {
    format!("{}/{}-{}", category, millis, sanitize_filename(filename))
}

/// Public path an object is served under.
pub fn path_for_key(key: &str) -> String {
    format!("/{}", key)
}

/// Storage key for a public path. Only one leading `/` is removed.
pub fn key_for_path(path: &str) -> &str {
    path.strip_prefix('/').unwrap_or(path)
}

/// Storage keys for a list of object URLs, taken from each URL's path.
///
/// Entries that do not parse as URLs are skipped.
pub fn keys_from_urls<S: AsRef<str>>(urls: &[S]) -> Vec<String> {
    urls.iter()
        .filter_map(|raw| match Url::parse(raw.as_ref()) {
            Ok(url) => Some(key_for_path(url.path()).to_string()),
            Err(e) => {
                tracing::warn!(url = %raw.as_ref(), error = %e, "Skipping unparseable object URL");
                None
            }
        })
        .filter(|key| !key.is_empty())
        .collect()
}
