use crate::{UrlError, UrlResult};
use url::Url;

/// Normalizes a URL into the form used as the crawl's dedup key
///
/// # Normalization Steps
///
/// 1. Parse the URL; reject if malformed
/// 2. Require an HTTP or HTTPS scheme
/// 3. Require a host
/// 4. Remove fragment (everything after #)
///
/// Parsing already lowercases the scheme and host, drops default ports,
/// resolves dot segments and turns an empty path into `/`. Paths, query
/// strings and trailing slashes are otherwise kept as-is, so `/a` and `/a/`
/// remain distinct pages.
///
/// # Arguments
///
/// * `url_str` - The URL string to normalize
///
/// # Returns
///
/// * `Ok(Url)` - Normalized URL
/// * `Err(UrlError)` - Failed to parse or normalize the URL
///
/// # Examples
///
/// ```
/// use site_crawler::url::normalize_url;
///
/// let url = normalize_url("HTTP://Example.COM:80/a/./b#top").unwrap();
/// assert_eq!(url.as_str(), "http://example.com/a/b");
/// ```
pub fn normalize_url(url_str: &str) -> UrlResult<Url> {
    let url = Url::parse(url_str.trim()).map_err(|e| UrlError::Parse(format!("{}: {}", url_str, e)))?;
    normalize_parsed(url)
}

/// Applies the normalization rules to an already parsed URL
///
/// Used for links resolved with [`Url::join`], which are parsed already.
pub fn normalize_parsed(mut url: Url) -> UrlResult<Url> {
    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(format!(
            "Only HTTP and HTTPS schemes are supported, got: {}",
            url.scheme()
        )));
    }

    if url.host_str().map_or(true, str::is_empty) {
        return Err(UrlError::MissingHost);
    }

    url.set_fragment(None);

    Ok(url)
}

/// Computes the site root of a seed URL
///
/// The root is the seed string cut just after the last `/` that follows the
/// `//` authority marker, i.e. the directory containing the seed page. A
/// seed with no path separator after the authority is returned unchanged.
///
/// # Examples
///
/// ```
/// use site_crawler::url::site_root;
///
/// assert_eq!(site_root("http://example.com/docs/index.html"), "http://example.com/docs/");
/// assert_eq!(site_root("http://example.com"), "http://example.com");
/// ```
pub fn site_root(seed: &str) -> String {
    let seed = seed.trim();

    let Some(authority_start) = seed.find("//") else {
        return seed.to_string();
    };

    let rest = &seed[authority_start + 2..];
    match rest.rfind('/') {
        Some(slash) => seed[..authority_start + 2 + slash + 1].to_string(),
        None => seed.to_string(),
    }
}
