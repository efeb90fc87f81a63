use crate::UrlError;
use url::Url;

/// Resolves `href` against `base` using standard URL-join semantics
///
/// Returns `None` for empty references and for references the URL parser
/// rejects. `data:` URIs are returned verbatim so their payload is never
/// re-encoded.
///
/// # Examples
///
/// ```
/// use image_sweep::url::absolute_url;
/// use url::Url;
///
/// let base = Url::parse("https://a.com/b/").unwrap();
/// assert_eq!(absolute_url("c.png", &base).as_deref(), Some("https://a.com/b/c.png"));
/// assert_eq!(absolute_url("/c.png", &base).as_deref(), Some("https://a.com/c.png"));
/// ```
pub fn absolute_url(href: &str, base: &Url) -> Option<String> {
    let href = href.trim();

    if href.is_empty() {
        return None;
    }

    if is_data_uri(href) {
        return Some(href.to_string());
    }

    base.join(href).ok().map(String::from)
}

/// Removes the fragment (everything after `#`) from a URL string
///
/// Unparsable input is cut at the first `#` instead.
pub fn strip_fragment(url: &str) -> String {
    match Url::parse(url) {
        Ok(mut parsed) => {
            parsed.set_fragment(None);
            parsed.into()
        }
        Err(_) => url.split('#').next().unwrap_or_default().to_string(),
    }
}

/// Parses a user-supplied start URL
///
/// # Normalization Steps
///
/// 1. Trim surrounding whitespace
/// 2. Prefix `https://` when no scheme is given
/// 3. Reject anything that is not http(s) or has no host
/// 4. Remove the fragment
///
/// # Examples
///
/// ```
/// use image_sweep::url::parse_start_url;
///
/// let url = parse_start_url("example.com/gallery#top").unwrap();
/// assert_eq!(url.as_str(), "https://example.com/gallery");
/// ```
pub fn parse_start_url(input: &str) -> Result<Url, UrlError> {
    let input = input.trim();
    if input.is_empty() {
        return Err(UrlError::Parse("empty URL".to_string()));
    }

    let candidate = if input.contains("://") {
        input.to_string()
    } else {
        format!("https://{}", input)
    };

    let mut url = Url::parse(&candidate).map_err(|e| UrlError::Parse(e.to_string()))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(format!(
            "Only HTTP and HTTPS schemes are supported, got: {}",
            url.scheme()
        )));
    }

    if url.host_str().map_or(true, str::is_empty) {
        return Err(UrlError::MissingHost(candidate));
    }

    url.set_fragment(None);
    Ok(url)
}

/// Returns true for any `data:` URI (scheme compared case-insensitively)
pub fn is_data_uri(url: &str) -> bool {
    url.get(..5)
        .map_or(false, |scheme| scheme.eq_ignore_ascii_case("data:"))
}

/// Returns true for inline `data:image/...` payloads
pub fn is_data_image(url: &str) -> bool {
    url.get(..11)
        .map_or(false, |prefix| prefix.eq_ignore_ascii_case("data:image/"))
}
