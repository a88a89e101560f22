//! PosterKit Core Library
//!
//! Platform-agnostic scene model and interaction logic for the PosterKit
//! card editor: elements, selection, dragging, layering and export plumbing.

pub mod canvas;
pub mod clipboard;
pub mod config;
pub mod drag;
pub mod editor;
pub mod elements;
pub mod export;
pub mod fill;
pub mod geometry;
pub mod input;
pub mod marquee;
pub mod presets;
pub mod resources;
pub mod selection;
pub mod shortcuts;
pub mod store;
pub mod template;
pub mod tools;
pub mod viewport;

pub use canvas::{CanvasSettings, DIMENSION_PRESETS, DimensionPreset};
pub use clipboard::Clipboard;
pub use config::{ConfigError, ConfigResult, EditorConfig};
pub use drag::DragSession;
pub use editor::{Editor, EditorMode, EditorSnapshot};
pub use elements::{Element, ElementId, ElementKind, ElementPatch, Fill, Gradient, PatchError};
pub use export::{
    ExportError, ExportFormat, ExportOptions, ExportResult, ExportedImage, RenderSurface,
    SampleRequest,
};
pub use fill::{ResolvedFill, resolve_fill};
pub use geometry::{GeometryError, GeometryResult, TransformNode};
pub use input::{KeyPress, Modifiers, MouseButton, PointerEvent};
pub use marquee::Marquee;
pub use presets::{ELEMENT_PRESETS, ElementPreset, PresetCategory};
pub use resources::{Bitmap, ResourceCache, ResourceState};
pub use selection::Selection;
pub use shortcuts::{Command, Platform, ShortcutTable};
pub use store::ElementStore;
pub use template::{ModuleVisibility, Template};
pub use tools::{BrushSettings, ToolKind, ToolManager};
pub use viewport::Viewport;
