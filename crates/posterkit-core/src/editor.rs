//! Editor session: owns every piece of scene state and routes input to it.
//!
//! Effects that span several stores (a template load resizing the canvas and
//! clearing the selection, a removal pruning the selection) happen here as
//! explicit calls rather than through store-to-store coupling.

use crate::canvas::CanvasSettings;
use crate::clipboard::{Clipboard, offset_copies};
use crate::config::{ConfigResult, EditorConfig};
use crate::drag::{DragSession, node_position};
use crate::elements::{Element, ElementId, ElementKind, ElementPatch};
use crate::export::{ExportOptions, ExportResult, ExportedImage, RenderSurface, export_image};
use crate::geometry::{GeometryResult, TransformNode, commit_resize, topmost_at};
use crate::input::{KeyPress, Modifiers, MouseButton, PointerEvent};
use crate::marquee::Marquee;
use crate::presets::find_preset;
use crate::resources::ResourceCache;
use crate::selection::Selection;
use crate::shortcuts::{Command, ShortcutTable};
use crate::store::ElementStore;
use crate::template::{ModuleVisibility, Template};
use crate::tools::{ToolKind, ToolManager};
use crate::viewport::Viewport;
use kurbo::{Point, Size, Vec2};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Whether the stage shows a catalogue template or free-form elements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EditorMode {
    Template,
    #[default]
    Custom,
}

/// Pointer interaction in progress. Coordinates are logical.
#[derive(Debug, Clone, Default, PartialEq)]
enum Interaction {
    #[default]
    Idle,
    /// Pressed on an element, not moved yet.
    Pressed {
        target: ElementId,
        origin: Point,
        node_start: Point,
        modifiers: Modifiers,
    },
    Dragging {
        session: DragSession,
        origin: Point,
        node_start: Point,
    },
    Selecting,
    Drawing,
    Erasing,
}

/// Read-only view handed to observers.
#[derive(Debug, Clone)]
pub struct EditorSnapshot {
    /// Elements in insertion order.
    pub elements: Arc<Vec<Element>>,
    pub selection: Vec<ElementId>,
    pub clipboard: Vec<Element>,
    pub tool: ToolKind,
}

/// One editing session over a single canvas.
#[derive(Debug, Clone)]
pub struct Editor {
    pub store: ElementStore,
    pub selection: Selection,
    pub canvas: CanvasSettings,
    pub clipboard: Clipboard,
    pub tools: ToolManager,
    pub viewport: Viewport,
    pub marquee: Marquee,
    pub resources: ResourceCache,
    pub shortcuts: ShortcutTable,
    pub modules: ModuleVisibility,
    config: EditorConfig,
    mode: EditorMode,
    template: Option<Template>,
    viewport_size: Option<Size>,
    interaction: Interaction,
    last_pointer: Option<Point>,
}

impl Default for Editor {
    fn default() -> Self {
        Self::build(EditorConfig::default())
    }
}

impl Editor {
    /// Create an editor. The configuration is validated first.
    pub fn new(config: EditorConfig) -> ConfigResult<Self> {
        config.validate()?;
        Ok(Self::build(config))
    }

    fn build(config: EditorConfig) -> Self {
        let mut tools = ToolManager::new();
        tools.brush = config.brush.clone();
        Self {
            store: ElementStore::new(),
            selection: Selection::new(),
            canvas: config.canvas.clone(),
            clipboard: Clipboard::new(),
            tools,
            viewport: Viewport::new()
                .with_limits(config.min_scale, config.max_scale)
                .with_padding(config.viewport_padding),
            marquee: Marquee::new(config.marquee_threshold),
            resources: ResourceCache::new(),
            shortcuts: ShortcutTable::default_table(
                config.platform(),
                config.nudge_step,
                config.nudge_step_fast,
            ),
            modules: ModuleVisibility::default(),
            config,
            mode: EditorMode::default(),
            template: None,
            viewport_size: None,
            interaction: Interaction::Idle,
            last_pointer: None,
        }
    }

    /// Start from an existing set of elements.
    pub fn with_elements(mut self, elements: Vec<Element>) -> Self {
        self.store = ElementStore::from_elements(elements);
        self
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn mode(&self) -> EditorMode {
        self.mode
    }

    pub fn template(&self) -> Option<&Template> {
        self.template.as_ref()
    }

    pub fn current_tool(&self) -> ToolKind {
        self.tools.current_tool
    }

    pub fn snapshot(&self) -> EditorSnapshot {
        EditorSnapshot {
            elements: self.store.snapshot(),
            selection: self.selection.ids().to_vec(),
            clipboard: self.clipboard.items().to_vec(),
            tool: self.tools.current_tool,
        }
    }

    // --- Elements ---

    /// Add an element and return its id. Duplicate ids are refused.
    pub fn add_element(&mut self, element: Element) -> Option<ElementId> {
        let id = element.id();
        self.store.add(element).then_some(id)
    }

    pub fn update_element(&mut self, id: ElementId, patch: &ElementPatch) -> bool {
        self.store.update(id, patch)
    }

    /// Remove an element and drop it from the selection.
    pub fn remove_element(&mut self, id: ElementId) -> Option<Element> {
        let removed = self.store.remove(id)?;
        self.selection.remove(id);
        Some(removed)
    }

    /// Add a preset at the canvas center and select it.
    pub fn add_preset(&mut self, preset_id: &str) -> Option<ElementId> {
        let preset = find_preset(preset_id)?;
        let element = preset
            .create_centered(self.canvas.size())
            .with_z_index(self.store.next_z_index());
        self.insert_selected(element)
    }

    /// Add a preset centered on a screen-space drop point, kept inside the canvas.
    pub fn drop_preset(&mut self, preset_id: &str, screen_point: Point) -> Option<ElementId> {
        let Some(preset) = find_preset(preset_id) else {
            log::warn!("Dropped unknown preset '{preset_id}'");
            return None;
        };
        let logical = self.viewport.screen_to_logical(screen_point);
        let element = preset
            .create_at_drop(logical, self.canvas.size())
            .with_z_index(self.store.next_z_index());
        self.insert_selected(element)
    }

    fn insert_selected(&mut self, element: Element) -> Option<ElementId> {
        let id = self.add_element(element)?;
        self.selection.select_one(Some(id));
        Some(id)
    }

    /// Fold an interactive resize or rotation into the element.
    ///
    /// Returns whether the element changed. A resize below the minimum size is
    /// an error and leaves the element as it was.
    pub fn commit_transform(
        &mut self,
        id: ElementId,
        node: &TransformNode,
    ) -> GeometryResult<bool> {
        let Some(element) = self.store.get(id) else {
            return Ok(false);
        };
        if element.is_locked() {
            return Ok(false);
        }
        let patch = commit_resize(element, node, self.config.min_resize)
            .inspect_err(|err| log::debug!("Resize of {id} rejected: {err}"))?;
        Ok(self.store.update(id, &patch))
    }

    // --- Selection ---

    pub fn click(&mut self, target: Option<ElementId>, modifiers: Modifiers) {
        match target {
            Some(id) if !self.store.contains(id) => {}
            _ => self.selection.apply_click(target, modifiers),
        }
    }

    pub fn select_all(&mut self) {
        let ids: Vec<ElementId> = self.store.elements().iter().map(|e| e.id()).collect();
        self.selection.select_many(ids);
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    pub fn delete_selected(&mut self) -> usize {
        let removed = self.store.remove_many(self.selection.ids());
        let store = &self.store;
        self.selection.retain(|id| store.contains(id));
        removed.len()
    }

    /// Move every selected, unlocked element by `delta`.
    pub fn move_selection(&mut self, delta: Vec2) -> usize {
        let patches: Vec<(ElementId, ElementPatch)> = self
            .selection
            .ids()
            .iter()
            .filter_map(|&id| self.store.get(id))
            .filter(|e| !e.is_locked())
            .map(|e| {
                let p = e.position() + delta;
                (e.id(), ElementPatch::position(p.x, p.y))
            })
            .collect();
        self.store
            .update_many(patches.iter().map(|(id, patch)| (*id, patch)))
    }

    // --- Clipboard ---

    pub fn copy(&mut self) -> usize {
        self.clipboard.copy_selection(&self.store, &self.selection)
    }

    pub fn cut(&mut self) -> usize {
        let copied = self.copy();
        if copied > 0 {
            self.delete_selected();
            self.selection.clear();
        }
        copied
    }

    /// Paste the clipboard as fresh copies and select them.
    pub fn paste(&mut self) -> Vec<ElementId> {
        let sources = self.clipboard.items().to_vec();
        self.insert_copies(&sources)
    }

    /// Copy the selection in place, offset, and select the copies.
    pub fn duplicate(&mut self) -> Vec<ElementId> {
        let sources: Vec<Element> = self
            .selection
            .ids()
            .iter()
            .filter_map(|&id| self.store.get(id).cloned())
            .collect();
        self.insert_copies(&sources)
    }

    fn insert_copies(&mut self, sources: &[Element]) -> Vec<ElementId> {
        if sources.is_empty() {
            return Vec::new();
        }
        let (dx, dy) = self.config.duplicate_offset;
        let max_z = self.store.max_z_index().unwrap_or(0).max(0);
        let copies = offset_copies(sources, max_z, Vec2::new(dx, dy));
        let ids: Vec<ElementId> = copies.iter().map(|e| e.id()).collect();
        self.store.add_many(copies);
        self.selection.select_many(ids.iter().copied());
        ids
    }

    // --- Layering ---

    /// Apply a layering operation to each selected element in selection order.
    fn for_each_selected(&mut self, op: fn(&mut ElementStore, ElementId) -> bool) -> usize {
        let ids = self.selection.ids().to_vec();
        ids.into_iter().filter(|&id| op(&mut self.store, id)).count()
    }

    pub fn bring_to_front(&mut self) -> usize {
        self.for_each_selected(ElementStore::bring_to_front)
    }

    pub fn send_to_back(&mut self) -> usize {
        self.for_each_selected(ElementStore::send_to_back)
    }

    pub fn bring_forward(&mut self) -> usize {
        self.for_each_selected(ElementStore::bring_forward)
    }

    pub fn send_backward(&mut self) -> usize {
        self.for_each_selected(ElementStore::send_backward)
    }

    pub fn toggle_lock(&mut self) -> usize {
        self.for_each_selected(ElementStore::toggle_lock)
    }

    // --- Tools, modes, templates ---

    /// Switch tools. Clears the selection and any interaction in progress.
    pub fn set_tool(&mut self, tool: ToolKind) {
        self.cancel();
        self.tools.set_tool(tool);
        self.selection.clear();
    }

    pub fn set_mode(&mut self, mode: EditorMode) {
        self.set_tool(ToolKind::Select);
        if mode == EditorMode::Custom {
            self.canvas.background = self.config.canvas.background.clone();
        }
        if self.mode != mode {
            log::info!("Editor mode: {:?} -> {:?}", self.mode, mode);
        }
        self.mode = mode;
    }

    /// Show a template: resize the canvas, take its background and module
    /// visibility, and drop the selection.
    pub fn load_template(&mut self, template: Template) {
        self.cancel();
        template.apply_to(&mut self.canvas);
        self.modules = ModuleVisibility::from_template(&template);
        self.mode = EditorMode::Template;
        self.selection.clear();
        log::info!(
            "Loaded template '{}' ({}x{})",
            template.id,
            self.canvas.width,
            self.canvas.height
        );
        self.template = Some(template);
        self.refit();
    }

    pub fn set_canvas_dimensions(&mut self, width: f64, height: f64) -> bool {
        let changed = self.canvas.set_dimensions(width, height);
        if changed {
            self.refit();
        }
        changed
    }

    // --- Viewport ---

    /// Refit the canvas to a new viewport size and return the scale.
    pub fn resize_viewport(&mut self, size: Size) -> f64 {
        self.viewport_size = Some(size);
        self.viewport.fit(self.canvas.size(), size)
    }

    fn refit(&mut self) {
        if let Some(size) = self.viewport_size {
            self.viewport.fit(self.canvas.size(), size);
        }
    }

    // --- Keyboard ---

    /// Run the command bound to a key press, if any, and return it.
    pub fn handle_key(&mut self, press: &KeyPress, text_input_focused: bool) -> Option<Command> {
        if self.mode != EditorMode::Custom {
            return None;
        }
        let command = self.shortcuts.lookup(press, text_input_focused)?;
        self.execute(command);
        Some(command)
    }

    pub fn execute(&mut self, command: Command) {
        log::debug!("Executing {command:?}");
        match command {
            Command::DeleteSelected => {
                self.delete_selected();
            }
            Command::Copy => {
                self.copy();
            }
            Command::Cut => {
                self.cut();
            }
            Command::Paste => {
                self.paste();
            }
            Command::Duplicate => {
                self.duplicate();
            }
            Command::Escape => self.set_tool(ToolKind::Select),
            Command::SelectAll => self.select_all(),
            Command::Nudge { dx, dy } => {
                self.move_selection(Vec2::new(dx, dy));
            }
            Command::BringForward => {
                self.bring_forward();
            }
            Command::SendBackward => {
                self.send_backward();
            }
            Command::BringToFront => {
                self.bring_to_front();
            }
            Command::SendToBack => {
                self.send_to_back();
            }
            Command::ToggleLock => {
                self.toggle_lock();
            }
            Command::SetTool(tool) => self.set_tool(tool),
        }
    }

    // --- Pointer ---

    /// Feed a stage pointer event in screen coordinates.
    pub fn pointer(&mut self, event: PointerEvent) {
        if self.mode != EditorMode::Custom {
            return;
        }
        match event {
            PointerEvent::Down {
                position,
                button: MouseButton::Left,
                modifiers,
            } => {
                let point = self.viewport.screen_to_logical(position);
                self.last_pointer = Some(point);
                self.press(point, modifiers);
            }
            PointerEvent::Down { .. } => {}
            PointerEvent::Move { position } => {
                let point = self.viewport.screen_to_logical(position);
                self.last_pointer = Some(point);
                self.drag_to(point);
            }
            PointerEvent::Up {
                position,
                button: MouseButton::Left,
            } => {
                let point = self.viewport.screen_to_logical(position);
                self.last_pointer = Some(point);
                self.release(point);
            }
            PointerEvent::Up { .. } => {}
            PointerEvent::Leave => self.leave(),
        }
    }

    /// Drop any interaction in progress without applying it further.
    pub fn cancel(&mut self) {
        self.interaction = Interaction::Idle;
        self.marquee.cancel();
        self.tools.cancel();
    }

    pub fn is_interacting(&self) -> bool {
        self.interaction != Interaction::Idle
    }

    fn press(&mut self, point: Point, modifiers: Modifiers) {
        self.cancel();
        match self.tools.current_tool {
            ToolKind::Select => {
                let paint_order = self.store.paint_order();
                let hit = topmost_at(&paint_order, point, self.config.hit_tolerance);
                match hit.and_then(|id| self.store.get(id)) {
                    Some(element) => {
                        self.interaction = Interaction::Pressed {
                            target: element.id(),
                            origin: point,
                            node_start: node_position(element),
                            modifiers,
                        };
                    }
                    None => {
                        self.marquee
                            .begin(point, modifiers.extends_marquee(), self.selection.ids());
                        self.interaction = Interaction::Selecting;
                    }
                }
            }
            ToolKind::Brush => {
                if self.tools.begin(point) {
                    self.interaction = Interaction::Drawing;
                }
            }
            ToolKind::Eraser => {
                self.erase_at(point);
                self.interaction = Interaction::Erasing;
            }
        }
    }

    fn drag_to(&mut self, point: Point) {
        match std::mem::take(&mut self.interaction) {
            Interaction::Idle => {}
            Interaction::Pressed {
                target,
                origin,
                node_start,
                modifiers,
            } => {
                if point == origin {
                    self.interaction = Interaction::Pressed {
                        target,
                        origin,
                        node_start,
                        modifiers,
                    };
                    return;
                }
                match DragSession::begin(&self.store, &self.selection, target, node_start) {
                    Some(mut session) => {
                        let patches = session.update(node_start + (point - origin));
                        self.apply_patches(&patches);
                        self.interaction = Interaction::Dragging {
                            session,
                            origin,
                            node_start,
                        };
                    }
                    // Locked: the press can still end as a click.
                    None => {
                        self.interaction = Interaction::Pressed {
                            target,
                            origin,
                            node_start,
                            modifiers,
                        };
                    }
                }
            }
            Interaction::Dragging {
                mut session,
                origin,
                node_start,
            } => {
                let patches = session.update(node_start + (point - origin));
                self.apply_patches(&patches);
                self.interaction = Interaction::Dragging {
                    session,
                    origin,
                    node_start,
                };
            }
            Interaction::Selecting => {
                self.marquee.update(point);
                self.interaction = Interaction::Selecting;
            }
            Interaction::Drawing => {
                self.tools.update(point);
                self.interaction = Interaction::Drawing;
            }
            Interaction::Erasing => {
                self.erase_at(point);
                self.interaction = Interaction::Erasing;
            }
        }
    }

    fn release(&mut self, point: Point) {
        match std::mem::take(&mut self.interaction) {
            Interaction::Idle => {}
            Interaction::Pressed {
                target, modifiers, ..
            } => self.click(Some(target), modifiers),
            Interaction::Dragging {
                session,
                origin,
                node_start,
            } => {
                let patches = session.finish(node_start + (point - origin));
                self.apply_patches(&patches);
            }
            Interaction::Selecting => {
                self.marquee.update(point);
                match self.marquee.finish(self.store.elements()) {
                    Some(ids) => self.selection.select_many(ids),
                    None => self.selection.clear(),
                }
            }
            Interaction::Drawing => {
                self.tools.update(point);
                self.finish_stroke();
            }
            Interaction::Erasing => {}
        }
    }

    /// Leaving the stage ends the interaction at the last known pointer
    /// position. A press that never moved is dropped rather than clicked.
    fn leave(&mut self) {
        let pressed = matches!(self.interaction, Interaction::Pressed { .. });
        match self.last_pointer {
            Some(point) if !pressed => self.release(point),
            _ => self.cancel(),
        }
    }

    fn finish_stroke(&mut self) {
        if let Some(path) = self.tools.end() {
            let element = Element::from(path).with_z_index(self.store.next_z_index());
            let id = element.id();
            if self.store.add(element) {
                log::debug!("Added brush stroke {id}");
            }
        }
    }

    /// Remove the topmost unlocked path under the point.
    fn erase_at(&mut self, point: Point) {
        let paint_order = self.store.paint_order();
        let paths: Vec<&Element> = paint_order
            .into_iter()
            .filter(|e| e.kind() == ElementKind::Path && !e.is_locked())
            .collect();
        if let Some(id) = topmost_at(&paths, point, self.config.hit_tolerance) {
            self.remove_element(id);
        }
    }

    fn apply_patches(&mut self, patches: &[(ElementId, ElementPatch)]) {
        self.store
            .update_many(patches.iter().map(|(id, patch)| (*id, patch)));
    }

    // --- Resources and export ---

    /// Register every image source in the scene with the resource cache and
    /// return the ones requested for the first time.
    pub fn request_images(&mut self) -> Vec<String> {
        let sources: Vec<String> = self
            .store
            .elements()
            .iter()
            .filter_map(|e| match e {
                Element::Image(image) => Some(image.src.clone()),
                _ => None,
            })
            .collect();
        sources
            .into_iter()
            .filter(|src| self.resources.request(src))
            .collect()
    }

    /// Export the canvas through `surface`, whose view scale is restored afterwards.
    pub fn export<S: RenderSurface + ?Sized>(
        &self,
        surface: &mut S,
        options: &ExportOptions,
    ) -> ExportResult<ExportedImage> {
        export_image(
            surface,
            &self.canvas,
            self.store.elements(),
            &self.resources,
            options,
            self.config.min_export_pixel_ratio,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::elements::{CircleElement, Fill, PathElement, RectElement, SerializableColor, Stroke};
    use crate::input::KeyPress;

    fn rect(x: f64, y: f64, w: f64, h: f64) -> Element {
        RectElement::new(Point::new(x, y), w, h)
            .with_fill(Fill::hex("#FFE566"))
            .into()
    }

    fn editor_with(elements: Vec<Element>) -> Editor {
        Editor::default().with_elements(elements)
    }

    fn position(editor: &Editor, id: ElementId) -> Point {
        editor.store.get(id).map(|e| e.position()).unwrap()
    }

    #[test]
    fn test_bring_to_front_scenario() {
        let r = rect(0.0, 0.0, 100.0, 100.0);
        let c: Element = CircleElement::new(Point::new(200.0, 200.0), 50.0).into();
        let c = c.with_z_index(1);
        let (rid, cid) = (r.id(), c.id());
        let mut editor = editor_with(vec![r, c]);

        editor.selection.select_one(Some(rid));
        assert_eq!(editor.bring_to_front(), 1);

        assert_eq!(editor.store.get(rid).map(|e| e.z_index()), Some(2));
        let order: Vec<ElementId> = editor.store.paint_order().iter().map(|e| e.id()).collect();
        assert_eq!(order, vec![cid, rid]);
    }

    #[test]
    fn test_reverse_marquee_selects_circle() {
        let c: Element = CircleElement::new(Point::new(40.0, 40.0), 60.0).into();
        let cid = c.id();
        let mut editor = editor_with(vec![c]);

        editor.pointer(PointerEvent::down(Point::new(300.0, 300.0)));
        editor.pointer(PointerEvent::moved(Point::new(120.0, 120.0)));
        editor.pointer(PointerEvent::up(Point::new(50.0, 50.0)));

        assert_eq!(editor.selection.ids(), &[cid]);
        assert!(!editor.is_interacting());
    }

    #[test]
    fn test_group_drag_is_exact_across_moves() {
        let a = rect(100.0, 100.0, 100.0, 100.0);
        let b = rect(400.0, 400.0, 50.0, 50.0);
        let (aid, bid) = (a.id(), b.id());
        let mut editor = editor_with(vec![a, b]);
        editor.selection.select_many([aid, bid]);

        editor.pointer(PointerEvent::down(Point::new(150.0, 150.0)));
        for k in 1..=10 {
            let k = k as f64;
            editor.pointer(PointerEvent::moved(Point::new(150.0 + 1.5 * k, 150.0 - 3.0 * k)));
        }
        editor.pointer(PointerEvent::up(Point::new(165.0, 120.0)));

        let a_pos = position(&editor, aid);
        let b_pos = position(&editor, bid);
        assert!((a_pos.x - 115.0).abs() < f64::EPSILON);
        assert!((a_pos.y - 70.0).abs() < f64::EPSILON);
        assert!((b_pos.x - 415.0).abs() < f64::EPSILON);
        assert!((b_pos.y - 370.0).abs() < f64::EPSILON);
        // A drag is not a click: the multi-selection survives.
        assert_eq!(editor.selection.ids(), &[aid, bid]);
    }

    #[test]
    fn test_drag_respects_viewport_scale() {
        let a = rect(100.0, 100.0, 100.0, 100.0);
        let aid = a.id();
        let mut editor = editor_with(vec![a]);
        editor.viewport.set_scale(0.5);

        editor.pointer(PointerEvent::down(Point::new(75.0, 75.0)));
        editor.pointer(PointerEvent::moved(Point::new(80.0, 75.0)));
        editor.pointer(PointerEvent::up(Point::new(85.0, 75.0)));

        let pos = position(&editor, aid);
        assert!((pos.x - 120.0).abs() < f64::EPSILON);
        assert!((pos.y - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_locked_elements_ignore_drag() {
        let mut locked = rect(100.0, 100.0, 100.0, 100.0);
        locked.base_mut().locked = true;
        let b = rect(400.0, 400.0, 50.0, 50.0);
        let (lid, bid) = (locked.id(), b.id());
        let mut editor = editor_with(vec![locked, b]);
        editor.selection.select_many([lid, bid]);

        // Dragging the locked element moves nothing.
        editor.pointer(PointerEvent::down(Point::new(150.0, 150.0)));
        editor.pointer(PointerEvent::moved(Point::new(200.0, 200.0)));
        editor.pointer(PointerEvent::up(Point::new(200.0, 200.0)));
        assert_eq!(position(&editor, lid), Point::new(100.0, 100.0));
        assert_eq!(position(&editor, bid), Point::new(400.0, 400.0));

        // Dragging the other one leaves the locked follower in place.
        editor.selection.select_many([lid, bid]);
        editor.pointer(PointerEvent::down(Point::new(425.0, 425.0)));
        editor.pointer(PointerEvent::moved(Point::new(435.0, 445.0)));
        editor.pointer(PointerEvent::up(Point::new(435.0, 445.0)));
        assert_eq!(position(&editor, lid), Point::new(100.0, 100.0));
        assert_eq!(position(&editor, bid), Point::new(410.0, 420.0));
    }

    #[test]
    fn test_click_rules() {
        let a = rect(0.0, 0.0, 100.0, 100.0);
        let b = rect(200.0, 0.0, 100.0, 100.0);
        let (aid, bid) = (a.id(), b.id());
        let mut editor = editor_with(vec![a, b]);

        editor.pointer(PointerEvent::down(Point::new(50.0, 50.0)));
        editor.pointer(PointerEvent::up(Point::new(50.0, 50.0)));
        assert_eq!(editor.selection.ids(), &[aid]);

        editor.pointer(PointerEvent::down_with(Point::new(250.0, 50.0), Modifiers::CTRL));
        editor.pointer(PointerEvent::up(Point::new(250.0, 50.0)));
        assert_eq!(editor.selection.ids(), &[aid, bid]);

        editor.pointer(PointerEvent::down_with(Point::new(50.0, 50.0), Modifiers::META));
        editor.pointer(PointerEvent::up(Point::new(50.0, 50.0)));
        assert_eq!(editor.selection.ids(), &[bid]);

        // Background click below the marquee threshold clears.
        editor.pointer(PointerEvent::down(Point::new(600.0, 600.0)));
        editor.pointer(PointerEvent::up(Point::new(602.0, 601.0)));
        assert!(editor.selection.is_empty());
    }

    #[test]
    fn test_additive_marquee_keeps_prior_selection() {
        let a = rect(0.0, 0.0, 100.0, 100.0);
        let b = rect(500.0, 500.0, 100.0, 100.0);
        let (aid, bid) = (a.id(), b.id());
        let mut editor = editor_with(vec![a, b]);
        editor.selection.select_one(Some(aid));

        editor.pointer(PointerEvent::down_with(Point::new(450.0, 450.0), Modifiers::SHIFT));
        editor.pointer(PointerEvent::up(Point::new(700.0, 700.0)));

        assert_eq!(editor.selection.ids(), &[aid, bid]);
    }

    #[test]
    fn test_duplicate_offsets_and_selects_copies() {
        let a = rect(10.0, 10.0, 100.0, 100.0).with_z_index(3);
        let b = rect(200.0, 10.0, 100.0, 100.0).with_z_index(7);
        let (aid, bid) = (a.id(), b.id());
        let mut editor = editor_with(vec![a, b]);
        editor.selection.select_many([aid, bid]);

        let copies = editor.duplicate();

        assert_eq!(copies.len(), 2);
        assert_eq!(editor.store.len(), 4);
        assert_eq!(editor.selection.ids(), copies.as_slice());
        let first = editor.store.get(copies[0]).unwrap();
        let second = editor.store.get(copies[1]).unwrap();
        assert_eq!(first.position(), Point::new(30.0, 30.0));
        assert_eq!(second.position(), Point::new(220.0, 30.0));
        assert_eq!((first.z_index(), second.z_index()), (8, 9));
        assert!(!copies.contains(&aid) && !copies.contains(&bid));
    }

    #[test]
    fn test_cut_then_paste() {
        let a = rect(10.0, 10.0, 100.0, 100.0);
        let aid = a.id();
        let mut editor = editor_with(vec![a]);
        editor.selection.select_one(Some(aid));

        assert_eq!(editor.cut(), 1);
        assert!(editor.store.is_empty());
        assert!(editor.selection.is_empty());

        let pasted = editor.paste();
        assert_eq!(pasted.len(), 1);
        assert_ne!(pasted[0], aid);
        assert_eq!(position(&editor, pasted[0]), Point::new(30.0, 30.0));
        assert_eq!(editor.store.get(pasted[0]).map(|e| e.z_index()), Some(1));
    }

    #[test]
    fn test_delete_prunes_selection() {
        let a = rect(0.0, 0.0, 10.0, 10.0);
        let b = rect(20.0, 0.0, 10.0, 10.0);
        let (aid, bid) = (a.id(), b.id());
        let mut editor = editor_with(vec![a, b]);
        editor.selection.select_many([aid]);

        assert_eq!(editor.delete_selected(), 1);
        assert!(editor.selection.is_empty());
        assert!(editor.store.contains(bid));

        editor.selection.select_one(Some(bid));
        editor.remove_element(bid);
        assert!(editor.selection.is_empty());
    }

    #[test]
    fn test_shortcuts_dispatch() {
        let mut locked = rect(0.0, 0.0, 10.0, 10.0);
        locked.base_mut().locked = true;
        let b = rect(100.0, 100.0, 10.0, 10.0);
        let (lid, bid) = (locked.id(), b.id());
        let mut editor = editor_with(vec![locked, b]);

        let select_all = KeyPress::new("a", Modifiers::CTRL);
        assert_eq!(editor.handle_key(&select_all, false), Some(Command::SelectAll));
        assert_eq!(editor.selection.ids(), &[lid, bid]);

        let nudge = KeyPress::new("ArrowRight", Modifiers::SHIFT);
        editor.handle_key(&nudge, false);
        assert_eq!(position(&editor, bid), Point::new(110.0, 100.0));
        assert_eq!(position(&editor, lid), Point::new(0.0, 0.0));

        // Typing in a text field never reaches the canvas.
        assert_eq!(editor.handle_key(&KeyPress::plain("Delete"), true), None);
        assert_eq!(editor.store.len(), 2);

        editor.handle_key(&KeyPress::plain("b"), false);
        assert_eq!(editor.current_tool(), ToolKind::Brush);
        assert!(editor.selection.is_empty());

        editor.handle_key(&KeyPress::plain("Escape"), false);
        assert_eq!(editor.current_tool(), ToolKind::Select);
    }

    #[test]
    fn test_shortcuts_inactive_in_template_mode() {
        let mut editor = Editor::default();
        editor.set_mode(EditorMode::Template);
        assert_eq!(editor.handle_key(&KeyPress::new("a", Modifiers::CTRL), false), None);
    }

    #[test]
    fn test_load_template_resets_canvas_and_selection() {
        let a = rect(0.0, 0.0, 10.0, 10.0);
        let aid = a.id();
        let mut editor = editor_with(vec![a]);
        editor.selection.select_one(Some(aid));
        editor.resize_viewport(Size::new(1280.0, 800.0));

        let template = Template::from_json(
            r##"{
                "id": "event-poster",
                "name": "Event",
                "width": 900,
                "height": 1200,
                "backgroundColor": {"Solid": {"r": 17, "g": 17, "b": 17, "a": 255}},
                "visibleModuleIds": ["title"],
                "renderer": "event"
            }"##,
        )
        .unwrap();
        editor.load_template(template);

        assert!(editor.selection.is_empty());
        assert_eq!(editor.mode(), EditorMode::Template);
        assert_eq!(editor.canvas.size(), Size::new(900.0, 1200.0));
        assert!(editor.modules.is_visible("title"));
        assert!((editor.viewport.scale - 720.0 / 1200.0).abs() < 1e-12);

        editor.set_mode(EditorMode::Custom);
        assert_eq!(editor.canvas.background, Fill::hex("#ffffff"));
    }

    #[test]
    fn test_brush_stroke_becomes_path() {
        let a = rect(0.0, 0.0, 10.0, 10.0).with_z_index(4);
        let mut editor = editor_with(vec![a]);
        editor.set_tool(ToolKind::Brush);

        editor.pointer(PointerEvent::down(Point::new(100.0, 100.0)));
        editor.pointer(PointerEvent::moved(Point::new(150.0, 120.0)));
        editor.pointer(PointerEvent::up(Point::new(200.0, 180.0)));

        assert_eq!(editor.store.len(), 2);
        let path = editor.store.elements().last().unwrap();
        assert_eq!(path.kind(), ElementKind::Path);
        assert_eq!(path.z_index(), 5);
        assert_eq!(path.position(), Point::new(100.0, 100.0));
    }

    #[test]
    fn test_eraser_removes_unlocked_paths_only() {
        let stroke = Stroke::new(SerializableColor::black(), 8.0);
        let points = [Point::new(0.0, 50.0), Point::new(100.0, 50.0)];
        let path: Element = PathElement::from_points(&points, stroke).unwrap().into();
        let under = rect(0.0, 0.0, 100.0, 100.0);
        let (pid, rid) = (path.id(), under.id());
        let mut editor = editor_with(vec![under, path.with_z_index(1)]);
        editor.set_tool(ToolKind::Eraser);

        editor.pointer(PointerEvent::down(Point::new(50.0, 20.0)));
        editor.pointer(PointerEvent::up(Point::new(50.0, 20.0)));
        assert_eq!(editor.store.len(), 2);

        editor.pointer(PointerEvent::down(Point::new(50.0, 50.0)));
        editor.pointer(PointerEvent::up(Point::new(50.0, 50.0)));
        assert!(!editor.store.contains(pid));
        assert!(editor.store.contains(rid));
    }

    #[test]
    fn test_leave_finishes_drag() {
        let a = rect(100.0, 100.0, 100.0, 100.0);
        let aid = a.id();
        let mut editor = editor_with(vec![a]);

        editor.pointer(PointerEvent::down(Point::new(150.0, 150.0)));
        editor.pointer(PointerEvent::moved(Point::new(170.0, 150.0)));
        editor.pointer(PointerEvent::Leave);

        assert!(!editor.is_interacting());
        assert_eq!(position(&editor, aid), Point::new(120.0, 100.0));
    }

    #[test]
    fn test_drop_preset_centers_on_pointer() {
        let mut editor = Editor::default();
        editor.viewport.set_scale(0.5);

        let id = editor.drop_preset("rect", Point::new(200.0, 300.0)).unwrap();

        let element = editor.store.get(id).unwrap();
        assert_eq!(element.center(), Point::new(400.0, 600.0));
        assert_eq!(editor.selection.ids(), &[id]);
        assert!(editor.drop_preset("no-such-preset", Point::ZERO).is_none());
    }

    #[test]
    fn test_commit_transform_rejects_tiny_resize() {
        let a = rect(100.0, 100.0, 100.0, 100.0);
        let aid = a.id();
        let mut editor = editor_with(vec![a]);

        let mut node = TransformNode::for_element(editor.store.get(aid).unwrap());
        node.scale_x = 0.1;
        assert!(editor.commit_transform(aid, &node).is_err());
        assert_eq!(editor.store.get(aid).map(|e| e.size()), Some(Size::new(100.0, 100.0)));

        node.scale_x = 2.0;
        assert_eq!(editor.commit_transform(aid, &node).ok(), Some(true));
        let element = editor.store.get(aid).unwrap();
        assert_eq!(element.size(), Size::new(200.0, 100.0));
        assert_eq!(element.center(), Point::new(150.0, 150.0));
    }

    #[test]
    fn test_request_images_once() {
        let image: Element = crate::elements::ImageElement::new(
            Point::ZERO,
            100.0,
            100.0,
            "data:image/png;base64,AAAA",
        )
        .into();
        let mut editor = editor_with(vec![image]);

        assert_eq!(editor.request_images(), vec!["data:image/png;base64,AAAA".to_string()]);
        assert!(editor.request_images().is_empty());
    }

    #[test]
    fn test_new_rejects_invalid_config() {
        let inverted = EditorConfig {
            min_scale: 2.0,
            max_scale: 1.0,
            ..Default::default()
        };
        assert!(matches!(
            Editor::new(inverted),
            Err(crate::config::ConfigError::Invalid { field: "min_scale", .. })
        ));

        let nan_padding = EditorConfig {
            viewport_padding: f64::NAN,
            ..Default::default()
        };
        assert!(Editor::new(nan_padding).is_err());
    }

    #[test]
    fn test_new_applies_scale_limits() {
        let config = EditorConfig {
            min_scale: 0.2,
            max_scale: 0.25,
            ..Default::default()
        };
        let mut editor = Editor::new(config).unwrap();
        let scale = editor.resize_viewport(Size::new(800.0, 600.0));
        assert!((0.2..=0.25).contains(&scale));
        let scale = editor.resize_viewport(Size::new(8000.0, 8000.0));
        assert!((scale - 0.25).abs() < f64::EPSILON);
    }
}
