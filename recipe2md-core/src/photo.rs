//! Recipe photos.
//!
//! A photo is saved byte for byte as the server sent it. The only things
//! refused are empty or oversized bodies and HTML error pages served with a
//! 200 status, which would otherwise end up on disk named `something.jpg`.

use image::ImageFormat;

use crate::error::PhotoError;
use crate::http::HttpClient;

/// Largest photo that will be saved (10 MiB).
pub const MAX_PHOTO_BYTES: usize = 10 * 1024 * 1024;

/// Markup prefixes that mean the server answered with a page, not a photo.
const MARKUP_PREFIXES: &[&[u8]] = &[b"<!doctype html", b"<html", b"<head", b"<body"];

#[derive(Debug, Clone)]
pub struct Photo {
    pub data: Vec<u8>,
    /// None when the bytes are not a format the `image` crate can sniff.
    pub format: Option<ImageFormat>,
}

impl Photo {
    pub fn content_type(&self) -> &'static str {
        self.format
            .map(|f| f.to_mime_type())
            .unwrap_or("application/octet-stream")
    }
}

/// Decide whether downloaded bytes can be saved as the recipe photo.
pub fn inspect_photo(data: Vec<u8>) -> Result<Photo, PhotoError> {
    if data.is_empty() {
        return Err(PhotoError::Empty);
    }
    if data.len() > MAX_PHOTO_BYTES {
        return Err(PhotoError::TooLarge {
            bytes: data.len(),
            max: MAX_PHOTO_BYTES,
        });
    }
    if looks_like_markup(&data) {
        return Err(PhotoError::NotAnImage);
    }

    let format = image::guess_format(&data).ok();
    Ok(Photo { data, format })
}

fn looks_like_markup(data: &[u8]) -> bool {
    let start = data
        .iter()
        .position(|b| !b.is_ascii_whitespace())
        .unwrap_or(data.len());
    let head = &data[start..data.len().min(start + 32)];
    MARKUP_PREFIXES.iter().any(|prefix| {
        head.len() >= prefix.len() && head[..prefix.len()].eq_ignore_ascii_case(prefix)
    })
}

/// Download the photo at `url` and inspect it.
pub async fn fetch_photo<C: HttpClient + ?Sized>(client: &C, url: &str) -> Result<Photo, PhotoError> {
    let data = client.fetch_bytes(url).await?;
    let photo = inspect_photo(data)?;
    tracing::debug!(url, bytes = photo.data.len(), content_type = photo.content_type(), "fetched photo");
    Ok(photo)
}

#[cfg(test)]
pub(crate) fn tiny_png() -> Vec<u8> {
    let img = image::RgbImage::from_pixel(2, 2, image::Rgb([200, 120, 40]));
    let mut out = std::io::Cursor::new(Vec::new());
    img.write_to(&mut out, ImageFormat::Png)
        .expect("encode test png");
    out.into_inner()
}
