//! Playback URL helpers
//!
//! Which URLs count as playable, and which ones are debrid/addon redirect
//! endpoints a player must follow before it gets real media bytes.

use url::Url;

/// Hosts and path fragments of redirecting resolver endpoints
const REDIRECT_MARKERS: &[&str] = &[
    "stremthru",
    "comet.elfhosted",
    "mediafusion.elfhosted",
    "jackettio.elfhosted",
    "torrentio.strem",
    "/playback/",
    "/stream/",
];

/// A URL is playable when it parses and uses http(s) or magnet
pub fn is_playable_url(raw: &str) -> bool {
    let raw = raw.trim();
    if raw.is_empty() {
        return false;
    }

    match Url::parse(raw) {
        Ok(url) => matches!(url.scheme(), "http" | "https" | "magnet"),
        Err(_) => false,
    }
}

/// Whether the URL points at a resolver that redirects to the actual media
pub fn needs_redirect_resolution(raw: &str) -> bool {
    if raw.starts_with("magnet:") {
        return false;
    }
    let lower = raw.to_lowercase();
    REDIRECT_MARKERS.iter().any(|marker| lower.contains(marker))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_playable_schemes() {
        assert!(is_playable_url("https://cdn.example.com/file.mkv"));
        assert!(is_playable_url("http://10.0.0.2:8080/play"));
        assert!(is_playable_url("magnet:?xt=urn:btih:abcdef0123456789"));
        assert!(!is_playable_url("ftp://example.com/file.mkv"));
        assert!(!is_playable_url("not a url"));
        assert!(!is_playable_url(""));
    }

    #[test]
    fn test_redirect_detection() {
        assert!(needs_redirect_resolution(
            "https://torrentio.strem.fun/resolve/premiumize/KEY/abc/null/0/file.mkv"
        ));
        assert!(needs_redirect_resolution("https://stremthru.example.com/v0/store/link"));
        assert!(needs_redirect_resolution("https://aio.example.com/api/v1/playback/xyz"));
        assert!(!needs_redirect_resolution("https://cdn.example.com/media/file.mkv"));
        assert!(!needs_redirect_resolution("magnet:?xt=urn:btih:abc&dn=/stream/"));
    }
}
