//! Built-in element presets for click-to-add and drag-and-drop.

use crate::elements::{
    CircleElement, Element, Fill, FontStyle, Gradient, GradientStop, ImageElement, RectElement,
    SerializableColor, Shadow, Stroke, TextAlign, TextElement,
};
use kurbo::{Point, Size};

/// Factory signature: `(x, y, canvas_width, canvas_height)`.
pub type ElementFactory = fn(f64, f64, f64, f64) -> Element;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PresetCategory {
    Shape,
    Text,
    Decoration,
    Card,
}

impl PresetCategory {
    pub const ALL: [PresetCategory; 4] = [
        PresetCategory::Shape,
        PresetCategory::Text,
        PresetCategory::Decoration,
        PresetCategory::Card,
    ];

    pub fn label(self) -> &'static str {
        match self {
            PresetCategory::Shape => "Shapes",
            PresetCategory::Text => "Text",
            PresetCategory::Decoration => "Decorations",
            PresetCategory::Card => "Cards",
        }
    }
}

/// A named element factory.
#[derive(Clone, Copy)]
pub struct ElementPreset {
    pub id: &'static str,
    pub name: &'static str,
    pub category: PresetCategory,
    pub create: ElementFactory,
}

impl std::fmt::Debug for ElementPreset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ElementPreset")
            .field("id", &self.id)
            .field("category", &self.category)
            .finish()
    }
}

impl ElementPreset {
    /// Element placed at the click-to-add position near the canvas center.
    pub fn create_centered(&self, canvas: Size) -> Element {
        (self.create)(
            canvas.width / 2.0 - 150.0,
            canvas.height / 2.0 - 100.0,
            canvas.width,
            canvas.height,
        )
    }

    /// Element centered on `drop` (logical units), clamped so its box
    /// stays inside the canvas.
    pub fn create_at_drop(&self, drop: Point, canvas: Size) -> Element {
        let mut element = (self.create)(drop.x, drop.y, canvas.width, canvas.height);
        let size = element.size();
        let centered = drop - element.center_offset();
        let x = centered.x.min(canvas.width - size.width).max(0.0);
        let y = centered.y.min(canvas.height - size.height).max(0.0);
        element.set_position(Point::new(x, y));
        element
    }
}

pub fn find_preset(id: &str) -> Option<&'static ElementPreset> {
    ELEMENT_PRESETS.iter().find(|p| p.id == id)
}

pub fn presets_in(category: PresetCategory) -> impl Iterator<Item = &'static ElementPreset> {
    ELEMENT_PRESETS.iter().filter(move |p| p.category == category)
}

const YELLOW: &str = "#FFE566";
const PINK: &str = "#FF90E8";
const BLUE: &str = "#90D5FF";
const MINT: &str = "#A7F3D0";
const ORANGE: &str = "#FFAB5C";
const PURPLE: &str = "#C4B5FD";
const TITLE_FONT: &str = "\"PingFang SC\", \"Microsoft YaHei\", sans-serif";

fn neo_shadow(offset: f64) -> Shadow {
    Shadow::hard(SerializableColor::black(), offset, offset)
}

fn outline(width: f64) -> Stroke {
    Stroke::new(SerializableColor::black(), width)
}

fn transparent() -> Fill {
    Fill::Solid(SerializableColor::transparent())
}

fn stops(colors: &[(f64, &str)]) -> Vec<GradientStop> {
    colors
        .iter()
        .map(|&(offset, color)| GradientStop::new(offset, SerializableColor::parse_or_black(color)))
        .collect()
}

/// Outlined rectangle with a hard drop shadow.
fn neo_rect(x: f64, y: f64, width: f64, height: f64, fill: Fill, shadow: f64) -> RectElement {
    let mut rect = RectElement::new(Point::new(x, y), width, height)
        .with_fill(fill)
        .with_stroke(outline(3.0));
    rect.base.shadows.push(neo_shadow(shadow));
    rect
}

fn neo_circle(x: f64, y: f64, radius: f64, fill: Fill, stroke_width: f64) -> CircleElement {
    let mut circle = CircleElement::new(Point::new(x, y), radius)
        .with_fill(fill)
        .with_stroke(outline(stroke_width));
    circle.base.shadows.push(neo_shadow(5.0));
    circle
}

fn text(
    x: f64,
    y: f64,
    content: &str,
    size: (f64, f64),
    font: (f64, &str),
    line_height: f64,
) -> TextElement {
    let mut text = TextElement::new(Point::new(x, y), content)
        .with_size(size.0, size.1)
        .with_font(TITLE_FONT, font.0, font.1);
    text.line_height = line_height;
    text
}

fn rect(x: f64, y: f64, _: f64, _: f64) -> Element {
    neo_rect(x, y, 300.0, 200.0, Fill::hex(YELLOW), 5.0).into()
}

fn circle(x: f64, y: f64, _: f64, _: f64) -> Element {
    neo_circle(x, y, 100.0, Fill::hex(MINT), 3.0).into()
}

fn line(x: f64, y: f64, _: f64, _: f64) -> Element {
    RectElement::new(Point::new(x, y), 300.0, 5.0)
        .with_fill(Fill::hex("#000000"))
        .into()
}

fn image(x: f64, y: f64, _: f64, _: f64) -> Element {
    let mut image = ImageElement::new(Point::new(x, y), 200.0, 200.0, "");
    image.base.shadows.push(neo_shadow(5.0));
    image.into()
}

fn rect_rounded(x: f64, y: f64, _: f64, _: f64) -> Element {
    neo_rect(x, y, 300.0, 200.0, Fill::hex(BLUE), 5.0)
        .with_corner_radius(16.0)
        .into()
}

fn square(x: f64, y: f64, _: f64, _: f64) -> Element {
    neo_rect(x, y, 200.0, 200.0, Fill::hex(PINK), 5.0).into()
}

fn rect_outline(x: f64, y: f64, _: f64, _: f64) -> Element {
    RectElement::new(Point::new(x, y), 300.0, 200.0)
        .with_fill(transparent())
        .with_stroke(outline(4.0))
        .into()
}

fn circle_outline(x: f64, y: f64, _: f64, _: f64) -> Element {
    CircleElement::new(Point::new(x, y), 100.0)
        .with_fill(transparent())
        .with_stroke(outline(4.0))
        .into()
}

fn title(x: f64, y: f64, _: f64, _: f64) -> Element {
    text(x, y, "Title", (500.0, 100.0), (72.0, "900"), 1.2).into()
}

fn subtitle(x: f64, y: f64, _: f64, _: f64) -> Element {
    text(x, y, "Subtitle", (400.0, 60.0), (36.0, "700"), 1.3).into()
}

fn body(x: f64, y: f64, _: f64, _: f64) -> Element {
    text(x, y, "Body text", (500.0, 100.0), (32.0, "700"), 1.5).into()
}

fn caption(x: f64, y: f64, _: f64, _: f64) -> Element {
    text(x, y, "Caption", (300.0, 40.0), (24.0, "500"), 1.4)
        .with_fill(Fill::hex("#666666"))
        .into()
}

fn number(x: f64, y: f64, _: f64, _: f64) -> Element {
    let mut number = text(x, y, "01", (150.0, 120.0), (96.0, "900"), 1.0);
    number.font_family = "\"SF Mono\", \"JetBrains Mono\", monospace".to_string();
    number.align = TextAlign::Center;
    number.stroke = Some(outline(2.0));
    number.into()
}

fn quote(x: f64, y: f64, _: f64, _: f64) -> Element {
    let mut quote = text(x, y, "\"A quote worth repeating.\"", (500.0, 150.0), (28.0, "600"), 1.6);
    quote.font_style = FontStyle::Italic;
    quote.into()
}

fn color_block(x: f64, y: f64, _: f64, _: f64) -> Element {
    neo_rect(x, y, 400.0, 200.0, Fill::hex(YELLOW), 5.0).into()
}

fn gradient_block(x: f64, y: f64, _: f64, _: f64) -> Element {
    let fill = Fill::Gradient(Gradient::Linear {
        angle: 135.0,
        stops: stops(&[(0.0, PINK), (1.0, PURPLE)]),
    });
    neo_rect(x, y, 400.0, 250.0, fill, 5.0).into()
}

fn stripe(x: f64, y: f64, _: f64, _: f64) -> Element {
    let fill = Fill::Gradient(Gradient::RepeatingLinear {
        angle: 45.0,
        stops: stops(&[(0.0, "#000000"), (0.1, "#000000"), (0.1, YELLOW), (0.2, YELLOW)]),
    });
    neo_rect(x, y, 400.0, 120.0, fill, 5.0).into()
}

fn checker(x: f64, y: f64, _: f64, _: f64) -> Element {
    let fill = Fill::Gradient(Gradient::Conic {
        angle: 45.0,
        stops: stops(&[
            (0.0, "#000000"),
            (0.25, "#000000"),
            (0.25, "#FFFFFF"),
            (0.5, "#FFFFFF"),
            (0.5, "#000000"),
            (0.75, "#000000"),
            (0.75, "#FFFFFF"),
            (1.0, "#FFFFFF"),
        ]),
    });
    neo_rect(x, y, 200.0, 200.0, fill, 5.0).into()
}

fn ring(x: f64, y: f64, _: f64, _: f64) -> Element {
    neo_circle(x, y, 80.0, transparent(), 5.0).into()
}

fn dot(x: f64, y: f64, _: f64, _: f64) -> Element {
    neo_circle(x, y, 40.0, Fill::hex(ORANGE), 3.0).into()
}

fn divider(x: f64, y: f64, _: f64, _: f64) -> Element {
    RectElement::new(Point::new(x, y), 400.0, 4.0)
        .with_fill(Fill::hex("#000000"))
        .into()
}

fn divider_dashed(x: f64, y: f64, _: f64, _: f64) -> Element {
    let mut stroke = outline(4.0);
    stroke.dash = Some(vec![16.0, 8.0]);
    RectElement::new(Point::new(x, y), 400.0, 4.0)
        .with_fill(transparent())
        .with_stroke(stroke)
        .into()
}

fn corner(x: f64, y: f64, _: f64, _: f64) -> Element {
    let mut corner = neo_rect(x, y, 80.0, 80.0, Fill::hex(ORANGE), 5.0);
    corner.base.rotation = 45.0;
    corner.into()
}

fn card(x: f64, y: f64, _: f64, _: f64) -> Element {
    neo_rect(x, y, 400.0, 280.0, Fill::hex("#FFFFFF"), 8.0).into()
}

fn card_colored(x: f64, y: f64, _: f64, _: f64) -> Element {
    neo_rect(x, y, 400.0, 280.0, Fill::hex(BLUE), 8.0).into()
}

fn tag(x: f64, y: f64, _: f64, _: f64) -> Element {
    RectElement::new(Point::new(x, y), 140.0, 48.0)
        .with_fill(Fill::hex("#000000"))
        .into()
}

fn button(x: f64, y: f64, _: f64, _: f64) -> Element {
    neo_rect(x, y, 180.0, 56.0, Fill::hex(YELLOW), 5.0).into()
}

fn pill(x: f64, y: f64, _: f64, _: f64) -> Element {
    neo_rect(x, y, 160.0, 48.0, Fill::hex(PINK), 5.0)
        .with_corner_radius(24.0)
        .into()
}

fn banner(x: f64, y: f64, _: f64, _: f64) -> Element {
    neo_rect(x, y, 500.0, 100.0, Fill::hex(MINT), 5.0).into()
}

macro_rules! preset {
    ($id:literal, $name:literal, $category:ident, $create:ident) => {
        ElementPreset {
            id: $id,
            name: $name,
            category: PresetCategory::$category,
            create: $create,
        }
    };
}

pub static ELEMENT_PRESETS: &[ElementPreset] = &[
    preset!("rect", "Rectangle", Shape, rect),
    preset!("circle", "Circle", Shape, circle),
    preset!("line", "Line", Shape, line),
    preset!("image", "Image / QR code", Shape, image),
    preset!("rect-rounded", "Rounded rectangle", Shape, rect_rounded),
    preset!("square", "Square", Shape, square),
    preset!("rect-outline", "Outlined rectangle", Shape, rect_outline),
    preset!("circle-outline", "Outlined circle", Shape, circle_outline),
    preset!("title", "Title", Text, title),
    preset!("subtitle", "Subtitle", Text, subtitle),
    preset!("body", "Body", Text, body),
    preset!("caption", "Caption", Text, caption),
    preset!("number", "Number", Text, number),
    preset!("quote", "Quote", Text, quote),
    preset!("color-block", "Color block", Decoration, color_block),
    preset!("gradient-block", "Gradient block", Decoration, gradient_block),
    preset!("stripe", "Stripes", Decoration, stripe),
    preset!("checker", "Checker", Decoration, checker),
    preset!("ring", "Ring", Decoration, ring),
    preset!("dot", "Dot", Decoration, dot),
    preset!("divider", "Divider", Decoration, divider),
    preset!("divider-dashed", "Dashed divider", Decoration, divider_dashed),
    preset!("corner", "Corner", Decoration, corner),
    preset!("card", "Card", Card, card),
    preset!("card-colored", "Colored card", Card, card_colored),
    preset!("tag", "Tag", Card, tag),
    preset!("button", "Button", Card, button),
    preset!("pill", "Pill", Card, pill),
    preset!("banner", "Banner", Card, banner),
];
