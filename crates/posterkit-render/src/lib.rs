//! PosterKit Render Library
//!
//! Turns a scene into a paint list and rasterizes it with tiny-skia for export.
//! Image sources given as data URLs are decoded here as well.

mod decode;
mod encode;
mod raster;
mod renderer;

pub use decode::{decode_bytes, decode_data_url, load_pending};
pub use encode::{encode, encode_png};
pub use raster::{Pixmap, RasterSurface, Rasterizer, blend_mode, brush_shader};
pub use renderer::{
    PaintContent, PaintItem, PaintList, RenderContext, RenderError, RenderResult, ShadowPaint,
    StrokePaint,
};
