//! HTTP access for recipe pages and images.
//!
//! Every outgoing request goes through [`HttpClient`], so commands can be
//! exercised against [`MockClient`] in tests.

mod charset;
mod client;
mod rate_limiter;

pub use charset::decode_html;
pub use client::{HttpClient, MockClient, MockResponse, WebClient, WebClientBuilder};
pub use rate_limiter::RateLimiter;

/// Host part of a URL, used as the rate limiting key.
pub fn host_of(url: &str) -> Option<String> {
    url::Url::parse(url)
        .ok()
        .and_then(|u| u.host_str().map(|h| h.trim_start_matches("www.").to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_host_of() {
        assert_eq!(
            host_of("https://www.seriouseats.com/best-chili-recipe-123"),
            Some("seriouseats.com".to_string())
        );
        assert_eq!(host_of("not a url"), None);
    }
}
