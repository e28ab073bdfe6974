//! Turning response bytes into text.
//!
//! The charset comes from the `Content-Type` header, then from a `<meta>`
//! declaration near the top of the page. Undeclared pages are UTF-8 when they
//! decode as UTF-8 and Windows-1252 otherwise, which is what browsers assume
//! for legacy Western European sites.

use std::sync::LazyLock;

use encoding_rs::{Encoding, UTF_8, WINDOWS_1252};
use regex::bytes::Regex;

use crate::error::FetchError;

/// How far into the page a `<meta charset>` declaration is looked for.
const META_SCAN_BYTES: usize = 2048;

/// `<meta charset="x">` and `<meta http-equiv=... content="...; charset=x">`.
static META_CHARSET_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)<meta\b[^>]*?charset\s*=\s*["']?\s*([a-z0-9_:.\-]+)"#)
        .expect("Invalid meta charset regex")
});

/// Decode a page body to a `String`.
///
/// A declared charset must decode cleanly; a page that claims UTF-8 but is
/// not is an error rather than a page full of replacement characters.
pub fn decode_html(bytes: &[u8], content_type: Option<&str>) -> Result<String, FetchError> {
    let declared = content_type
        .and_then(charset_from_content_type)
        .or_else(|| charset_from_meta(bytes));

    if let Some(encoding) = declared {
        let (text, _, had_errors) = encoding.decode(bytes);
        if had_errors {
            return Err(FetchError::InvalidEncoding(format!(
                "page is declared as {} but does not decode as it",
                encoding.name()
            )));
        }
        return Ok(text.into_owned());
    }

    match std::str::from_utf8(bytes) {
        Ok(text) => Ok(text.to_string()),
        Err(_) => {
            tracing::debug!("undeclared charset and invalid UTF-8, decoding as windows-1252");
            let (text, _, _) = WINDOWS_1252.decode(bytes);
            Ok(text.into_owned())
        }
    }
}

fn charset_from_content_type(content_type: &str) -> Option<&'static Encoding> {
    content_type.split(';').skip(1).find_map(|param| {
        let (key, value) = param.split_once('=')?;
        if !key.trim().eq_ignore_ascii_case("charset") {
            return None;
        }
        Encoding::for_label(value.trim().trim_matches(['"', '\'']).as_bytes())
    })
}

fn charset_from_meta(bytes: &[u8]) -> Option<&'static Encoding> {
    let head = &bytes[..bytes.len().min(META_SCAN_BYTES)];
    let label = META_CHARSET_REGEX.captures(head)?.get(1)?;
    let encoding = Encoding::for_label(label.as_bytes())?;
    // A page cannot declare itself UTF-16 from inside its own bytes.
    if encoding.name().starts_with("UTF-16") {
        return Some(UTF_8);
    }
    Some(encoding)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_utf8() {
        let html = "<p>Crème brûlée</p>".as_bytes();
        assert_eq!(decode_html(html, None).unwrap(), "<p>Crème brûlée</p>");
    }

    #[test]
    fn test_latin1_from_header() {
        let html = b"<p>Cr\xe8me br\xfbl\xe9e</p>";
        let text = decode_html(html, Some("text/html; charset=ISO-8859-1")).unwrap();
        assert_eq!(text, "<p>Crème brûlée</p>");
    }

    #[test]
    fn test_charset_from_meta_tag() {
        let html = b"<html><head><meta charset=\"windows-1252\"></head><p>Gr\xfcner Salat \x96 frisch</p>";
        let text = decode_html(html, Some("text/html")).unwrap();
        assert!(text.contains("Grüner Salat – frisch"));

        let html = b"<meta http-equiv=\"Content-Type\" content=\"text/html; charset=iso-8859-1\"><p>Pur\xe9e</p>";
        assert!(decode_html(html, None).unwrap().contains("Purée"));
    }

    #[test]
    fn test_undeclared_legacy_page_falls_back_to_windows_1252() {
        let html = b"<p>Sp\xe4tzle</p>";
        assert_eq!(decode_html(html, None).unwrap(), "<p>Spätzle</p>");
    }

    #[test]
    fn test_false_utf8_declaration_is_an_error() {
        let html = b"<p>Sp\xe4tzle</p>";
        let err = decode_html(html, Some("text/html; charset=utf-8")).unwrap_err();
        assert!(matches!(err, FetchError::InvalidEncoding(_)));
    }

    #[test]
    fn test_header_wins_over_meta() {
        let html = b"<meta charset=\"utf-8\"><p>Pur\xe9e</p>";
        let text = decode_html(html, Some("text/html; charset=\"latin1\"")).unwrap();
        assert!(text.contains("Purée"));
    }
}
