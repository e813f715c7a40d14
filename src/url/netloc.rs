use url::Url;

/// Extracts the network location (host plus explicit port) from a URL
///
/// The host is lowercased. A port is appended only when the URL carries a
/// non-default port, so `https://example.com:443/` and `https://example.com/`
/// share the network location `example.com`.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use job_scout::url::extract_netloc;
///
/// let url = Url::parse("https://Example.com/jobs").unwrap();
/// assert_eq!(extract_netloc(&url), Some("example.com".to_string()));
///
/// let url = Url::parse("http://127.0.0.1:8080/jobs").unwrap();
/// assert_eq!(extract_netloc(&url), Some("127.0.0.1:8080".to_string()));
/// ```
pub fn extract_netloc(url: &Url) -> Option<String> {
    let host = url.host_str()?.to_lowercase();
    match url.port() {
        Some(port) => Some(format!("{}:{}", host, port)),
        None => Some(host),
    }
}

/// Returns the origin (`scheme://netloc`) of a URL, used to locate
/// `robots.txt` and `sitemap.xml`
pub fn origin_of(url: &Url) -> Option<String> {
    extract_netloc(url).map(|netloc| format!("{}://{}", url.scheme(), netloc))
}
