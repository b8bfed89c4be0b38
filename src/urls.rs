//! Canonicalization and filtering of image URLs scraped from Bing.
//!
//! Every URL that survives [`normalize_urls`] has the form
//! `https://www.bing.com/th/id/<id>?pid=<value>`.

use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;

/// Scheme and host every image URL is rewritten to.
pub const CANONICAL_ORIGIN: &str = "https://www.bing.com";

/// Path prefix of Bing's thumbnail/image endpoint.
pub const THUMBNAIL_PATH: &str = "/th/id/";

/// `pid` used when Bing's URL doesn't carry one.
pub const DEFAULT_PID: &str = "ImgGn";

// Numbered edge hosts sometimes answer 403 to direct fetches.
static CDN_HOST: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^https?://tse\d+\.mm\.bing\.net/th/id/").expect("valid CDN host pattern")
});

/// Canonicalize one raw URL (already HTML-entity decoded).
///
/// Relative `/th/id/` paths become absolute, numbered `tse*.mm.bing.net`
/// hosts become `www.bing.com`, and the query string is reduced to a single
/// `pid` parameter, defaulting to `ImgGn`. The `pid` value is re-encoded, so an
/// escaped `&` or `=` inside it can't turn into a second parameter. Fragments
/// are dropped. Applying it
/// twice gives the same result as applying it once.
pub fn normalize_url(raw: &str) -> String {
    let mut url = if raw.starts_with(THUMBNAIL_PATH) {
        format!("{}{}", CANONICAL_ORIGIN, raw)
    } else {
        raw.to_string()
    };

    if CDN_HOST.is_match(&url) {
        url = CDN_HOST
            .replace(&url, format!("{}{}", CANONICAL_ORIGIN, THUMBNAIL_PATH).as_str())
            .into_owned();
    }

    let without_fragment = url.split('#').next().unwrap_or_default();
    let (base, query) = match without_fragment.split_once('?') {
        Some((base, query)) => (base, Some(query)),
        None => (without_fragment, None),
    };

    let pid = query
        .and_then(|q| {
            url::form_urlencoded::parse(q.as_bytes())
                .find(|(key, _)| key == "pid")
                .map(|(_, value)| value.into_owned())
        })
        .filter(|value| !value.is_empty())
        .unwrap_or_else(|| DEFAULT_PID.to_string());

    let query = url::form_urlencoded::Serializer::new(String::new())
        .append_pair("pid", &pid)
        .finish();
    format!("{}?{}", base, query)
}

/// Whether a normalized URL points at a generated image.
///
/// Rejects scripts (`.js`, `.br.js`), SVG icons, and anything that isn't a
/// `bing.com` host serving the `/th/id/` path.
pub fn is_image_url(url: &str) -> bool {
    let lower = url.to_lowercase();
    let path = lower.split('?').next().unwrap_or_default();

    if path.ends_with(".js") || lower.contains(".br.js") || path.ends_with(".svg") {
        return false;
    }

    let Ok(parsed) = url::Url::parse(&lower) else {
        return false;
    };
    let on_bing = parsed
        .host_str()
        .is_some_and(|host| host == "bing.com" || host.ends_with(".bing.com"));

    on_bing && parsed.path().starts_with(THUMBNAIL_PATH)
}

/// Normalize, filter and deduplicate raw URLs, keeping first-seen order.
pub fn normalize_urls<I, S>(raw: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut seen = HashSet::new();
    let mut urls: Vec<String> = Vec::new();
    for candidate in raw {
        let normalized = normalize_url(candidate.as_ref());
        if is_image_url(&normalized) && seen.insert(normalized.clone()) {
            urls.push(normalized);
        }
    }
    urls
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cdn_hosts_rewritten() {
        let normalized = normalize_urls([
            "https://tse3.mm.bing.net/th/id/OIG4.test?pid=ImgGn",
            "https://tse1.mm.bing.net/th/id/OIG4.test2?pid=ImgGn",
        ]);
        assert_eq!(normalized.len(), 2);
        for url in &normalized {
            assert!(url.starts_with("https://www.bing.com/th/id/"));
            assert!(!url.contains("tse"));
        }
    }

    #[test]
    fn test_query_pruned_to_pid() {
        assert_eq!(
            normalize_url("https://tse3.mm.bing.net/th/id/OIG4.test?w=270&h=270&c=6&r=0&o=5&pid=ImgGn"),
            "https://www.bing.com/th/id/OIG4.test?pid=ImgGn"
        );
    }

    #[test]
    fn test_observed_pid_kept() {
        assert_eq!(
            normalize_url("https://www.bing.com/th/id/OIG4.x?pid=ImgDetMain&w=10"),
            "https://www.bing.com/th/id/OIG4.x?pid=ImgDetMain"
        );
    }

    #[test]
    fn test_relative_made_absolute() {
        assert_eq!(
            normalize_url("/th/id/OIG4.relative?pid=ImgGn"),
            "https://www.bing.com/th/id/OIG4.relative?pid=ImgGn"
        );
    }

    #[test]
    fn test_default_pid_added() {
        assert_eq!(
            normalize_url("https://www.bing.com/th/id/OIG4.nopid"),
            "https://www.bing.com/th/id/OIG4.nopid?pid=ImgGn"
        );
        assert_eq!(
            normalize_url("https://www.bing.com/th/id/OIG4.nopid?w=270&h=270"),
            "https://www.bing.com/th/id/OIG4.nopid?pid=ImgGn"
        );
    }

    #[test]
    fn test_idempotent() {
        let inputs = [
            "https://tse3.mm.bing.net/th/id/OIG4.a?w=270&pid=ImgGn",
            "/th/id/OIG4.b",
            "https://www.bing.com/th/id/OIG4.c?pid=Custom",
            "https://www.bing.com/th/id/OIG4.d?pid=a%26w%3D1",
            "https://www.bing.com/th/id/OIG4.e?pid=x%23y+z",
        ];
        for raw in inputs {
            let once = normalize_url(raw);
            assert_eq!(normalize_url(&once), once);
        }
    }

    #[test]
    fn test_encoded_pid_stays_one_param() {
        let normalized = normalize_url("https://www.bing.com/th/id/OIG4.x?pid=a%26w%3D1");
        assert_eq!(normalized, "https://www.bing.com/th/id/OIG4.x?pid=a%26w%3D1");

        let parsed = url::Url::parse(&normalized).unwrap();
        let pairs: Vec<_> = parsed.query_pairs().collect();
        assert_eq!(pairs.len(), 1);
        assert_eq!(pairs[0].0, "pid");
        assert_eq!(pairs[0].1, "a&w=1");
        assert_eq!(parsed.fragment(), None);
    }

    #[test]
    fn test_dedup_many_repeats() {
        let raw: Vec<String> = (0..500)
            .map(|i| format!("https://tse{}.mm.bing.net/th/id/OIG4.{}?w=270&pid=ImgGn", i % 4, i % 3))
            .collect();
        assert_eq!(
            normalize_urls(&raw),
            vec![
                "https://www.bing.com/th/id/OIG4.0?pid=ImgGn",
                "https://www.bing.com/th/id/OIG4.1?pid=ImgGn",
                "https://www.bing.com/th/id/OIG4.2?pid=ImgGn",
            ]
        );
    }

    #[test]
    fn test_scripts_and_svgs_filtered() {
        let normalized = normalize_urls([
            "https://r.bing.com/script.js",
            "https://r.bing.com/rp/script.br.js",
            "https://www.bing.com/icon.svg",
            "https://tse1.mm.bing.net/th/id/OIG4.real?pid=ImgGn",
        ]);
        assert_eq!(normalized, vec!["https://www.bing.com/th/id/OIG4.real?pid=ImgGn"]);
    }

    #[test]
    fn test_non_thumbnail_filtered() {
        assert!(!is_image_url("https://www.bing.com/images/create?pid=ImgGn"));
        assert!(!is_image_url("https://example.com/th/id/OIG4.x?pid=ImgGn"));
        assert!(is_image_url("https://www.bing.com/th/id/OIG4.x?pid=ImgGn"));
    }

    #[test]
    fn test_dedup_keeps_first_seen_order() {
        let normalized = normalize_urls([
            "https://tse1.mm.bing.net/th/id/OIG4.b?pid=ImgGn",
            "https://tse2.mm.bing.net/th/id/OIG4.a?w=1&pid=ImgGn",
            "https://www.bing.com/th/id/OIG4.b?pid=ImgGn",
            "/th/id/OIG4.a?pid=ImgGn",
            "https://tse4.mm.bing.net/th/id/OIG4.c",
        ]);
        assert_eq!(
            normalized,
            vec![
                "https://www.bing.com/th/id/OIG4.b?pid=ImgGn",
                "https://www.bing.com/th/id/OIG4.a?pid=ImgGn",
                "https://www.bing.com/th/id/OIG4.c?pid=ImgGn",
            ]
        );
    }
}
