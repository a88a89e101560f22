//! External bitmap resources referenced by image elements.
//!
//! Loading is request, placeholder, then resolved bitmap. A failed load keeps
//! its placeholder for the rest of the session and is never retried.

use std::collections::HashMap;
use std::sync::Arc;

/// Decoded RGBA8 pixels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bitmap {
    pub width: u32,
    pub height: u32,
    /// Row-major, non-premultiplied RGBA.
    pub rgba: Vec<u8>,
}

impl Bitmap {
    /// Returns `None` when the buffer length does not match the dimensions.
    pub fn new(width: u32, height: u32, rgba: Vec<u8>) -> Option<Self> {
        let expected = (width as usize)
            .checked_mul(height as usize)?
            .checked_mul(4)?;
        (rgba.len() == expected && width > 0 && height > 0).then_some(Self {
            width,
            height,
            rgba,
        })
    }

    /// RGBA at integer pixel coordinates, clamped to the edges.
    pub fn pixel(&self, x: i64, y: i64) -> [u8; 4] {
        let x = x.clamp(0, self.width as i64 - 1) as usize;
        let y = y.clamp(0, self.height as i64 - 1) as usize;
        let i = (y * self.width as usize + x) * 4;
        [
            self.rgba[i],
            self.rgba[i + 1],
            self.rgba[i + 2],
            self.rgba[i + 3],
        ]
    }
}

/// Load state of one resource.
#[derive(Debug, Clone, PartialEq)]
pub enum ResourceState {
    /// Requested; render a placeholder.
    Pending,
    Ready(Arc<Bitmap>),
    /// Load failed; the placeholder stays.
    Failed(String),
}

/// Resource states keyed by source string (URL or data URL).
#[derive(Debug, Clone, Default)]
pub struct ResourceCache {
    entries: HashMap<String, ResourceState>,
}

impl ResourceCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register interest in `src`.
    ///
    /// Returns true only the first time, when the caller should start a load.
    /// Empty sources are ignored.
    pub fn request(&mut self, src: &str) -> bool {
        if src.is_empty() || self.entries.contains_key(src) {
            return false;
        }
        self.entries.insert(src.to_string(), ResourceState::Pending);
        true
    }

    /// Record the outcome of a load.
    pub fn resolve(&mut self, src: &str, result: Result<Bitmap, String>) {
        let state = match result {
            Ok(bitmap) => {
                log::debug!(
                    "Resource loaded: {}x{} ({} bytes of source)",
                    bitmap.width,
                    bitmap.height,
                    src.len()
                );
                ResourceState::Ready(Arc::new(bitmap))
            }
            Err(reason) => {
                log::warn!("Resource failed to load, keeping placeholder: {reason}");
                ResourceState::Failed(reason)
            }
        };
        self.entries.insert(src.to_string(), state);
    }

    pub fn get(&self, src: &str) -> Option<&ResourceState> {
        self.entries.get(src)
    }

    /// The decoded bitmap, if the resource is ready.
    pub fn bitmap(&self, src: &str) -> Option<Arc<Bitmap>> {
        match self.entries.get(src) {
            Some(ResourceState::Ready(bitmap)) => Some(Arc::clone(bitmap)),
            _ => None,
        }
    }

    /// Sources still waiting for a load result.
    pub fn pending(&self) -> Vec<String> {
        let mut pending: Vec<String> = self
            .entries
            .iter()
            .filter(|(_, state)| matches!(state, ResourceState::Pending))
            .map(|(src, _)| src.clone())
            .collect();
        pending.sort();
        pending
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pixel() -> Bitmap {
        Bitmap::new(1, 1, vec![255, 0, 0, 255]).unwrap()
    }

    #[test]
    fn test_bitmap_rejects_bad_length() {
        assert!(Bitmap::new(2, 2, vec![0; 15]).is_none());
        assert!(Bitmap::new(0, 0, Vec::new()).is_none());
        assert!(Bitmap::new(2, 2, vec![0; 16]).is_some());
    }

    #[test]
    fn test_request_once() {
        let mut cache = ResourceCache::new();
        assert!(cache.request("a.png"));
        assert!(!cache.request("a.png"));
        assert!(!cache.request(""));
        assert_eq!(cache.get("a.png"), Some(&ResourceState::Pending));
        assert_eq!(cache.pending(), vec!["a.png".to_string()]);
    }

    #[test]
    fn test_resolve_ready() {
        let mut cache = ResourceCache::new();
        cache.request("a.png");
        cache.resolve("a.png", Ok(pixel()));
        assert!(cache.bitmap("a.png").is_some());
        assert!(cache.pending().is_empty());
    }

    #[test]
    fn test_failure_is_never_retried() {
        let mut cache = ResourceCache::new();
        cache.request("broken.png");
        cache.resolve("broken.png", Err("404".to_string()));
        assert!(!cache.request("broken.png"));
        assert!(cache.bitmap("broken.png").is_none());
        assert!(matches!(
            cache.get("broken.png"),
            Some(ResourceState::Failed(_))
        ));
    }

    #[test]
    fn test_pixel_clamps() {
        let bitmap = Bitmap::new(2, 1, vec![1, 2, 3, 4, 5, 6, 7, 8]).unwrap();
        assert_eq!(bitmap.pixel(-3, 0), [1, 2, 3, 4]);
        assert_eq!(bitmap.pixel(9, 9), [5, 6, 7, 8]);
    }
}
