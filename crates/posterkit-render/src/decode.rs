//! Bitmap decoding for image sources.
//!
//! Only `data:` URLs are decoded here. Network sources are fetched by the host,
//! which hands the bytes to [`decode_bytes`] and resolves the cache itself.

use crate::renderer::{RenderError, RenderResult};
use base64::{Engine, engine::general_purpose::STANDARD};
use posterkit_core::resources::{Bitmap, ResourceCache};

/// Decode encoded image bytes (PNG, JPEG, WebP) into RGBA pixels.
pub fn decode_bytes(bytes: &[u8]) -> RenderResult<Bitmap> {
    let decoded = image::load_from_memory(bytes).map_err(|e| RenderError::Decode(e.to_string()))?;
    let rgba = decoded.to_rgba8();
    let (width, height) = rgba.dimensions();
    Bitmap::new(width, height, rgba.into_raw())
        .ok_or_else(|| RenderError::Decode(format!("empty {width}x{height} image")))
}

/// Decode a base64 `data:` URL.
pub fn decode_data_url(src: &str) -> RenderResult<Bitmap> {
    let Some(rest) = src.strip_prefix("data:") else {
        return Err(RenderError::UnsupportedSource(src.chars().take(32).collect()));
    };
    let Some((header, payload)) = rest.split_once(',') else {
        return Err(RenderError::Decode("data URL without payload".to_string()));
    };
    if !header.split(';').any(|part| part == "base64") {
        return Err(RenderError::UnsupportedSource(format!("data:{header}")));
    }
    let bytes = STANDARD
        .decode(payload.trim())
        .map_err(|e| RenderError::Decode(e.to_string()))?;
    decode_bytes(&bytes)
}

/// Resolve every pending data URL in the cache. Returns how many decoded.
///
/// Sources that are not data URLs stay pending for the host to load.
pub fn load_pending(cache: &mut ResourceCache) -> usize {
    let mut loaded = 0;
    for src in cache.pending() {
        if !src.starts_with("data:") {
            continue;
        }
        let result = decode_data_url(&src).map_err(|e| e.to_string());
        if result.is_ok() {
            loaded += 1;
        }
        cache.resolve(&src, result);
    }
    loaded
}
