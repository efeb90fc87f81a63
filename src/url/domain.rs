use url::Url;

/// Returns the network location (`host[:port]`) of a URL
///
/// The port is only present when it differs from the scheme default.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use image_sweep::url::netloc;
///
/// let url = Url::parse("https://example.com:8443/path").unwrap();
/// assert_eq!(netloc(&url), Some("example.com:8443".to_string()));
///
/// let url = Url::parse("https://example.com/path").unwrap();
/// assert_eq!(netloc(&url), Some("example.com".to_string()));
/// ```
pub fn netloc(url: &Url) -> Option<String> {
    let host = url.host_str()?;
    Some(match url.port() {
        Some(port) => format!("{}:{}", host, port),
        None => host.to_string(),
    })
}

/// Checks whether `url` belongs to the same site as `origin`
///
/// True only when `url` is http or https and its network location equals
/// the origin's. Unparsable input is never same-site.
pub fn same_site(url: &str, origin: &str) -> bool {
    let (Ok(url), Ok(origin)) = (Url::parse(url), Url::parse(origin)) else {
        return false;
    };

    if url.scheme() != "http" && url.scheme() != "https" {
        return false;
    }

    match (netloc(&url), netloc(&origin)) {
        (Some(a), Some(b)) => a == b,
        _ => false,
    }
}
