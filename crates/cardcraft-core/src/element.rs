//! Elements placed on the card: text, photos and stickers.

use crate::color::SerializableColor;
use crate::gesture::{GestureInput, GesturePhase};
use crate::transform::{ElementTransform, RenderStyle, TransformState};
use kurbo::Size;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for placed elements.
pub type ElementId = Uuid;

/// Photos are shown at this fraction of their pixel size before scaling.
pub const IMAGE_DOWNSCALE: f64 = 12.0;
/// Sticker box edge before scaling.
pub const STICKER_BASE_SIZE: f64 = 100.0;
/// Text font size at scale 1.
pub const TEXT_BASE_FONT_SIZE: f64 = 42.0;
/// Line height relative to font size.
pub const TEXT_LINE_HEIGHT: f64 = 1.2;
/// Default text font family.
pub const DEFAULT_FONT_FAMILY: &str = "Rubik_300Light";

/// Horizontal text alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextAlign {
    Left,
    #[default]
    Center,
    Right,
}

impl TextAlign {
    /// Cycle to the next alignment.
    pub fn next(self) -> Self {
        match self {
            TextAlign::Left => TextAlign::Center,
            TextAlign::Center => TextAlign::Right,
            TextAlign::Right => TextAlign::Left,
        }
    }
}

/// Text payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextContent {
    pub text: String,
    #[serde(default = "default_font_family")]
    pub font_family: String,
    #[serde(default)]
    pub text_align: TextAlign,
    #[serde(default = "SerializableColor::white")]
    pub color: SerializableColor,
}

fn default_font_family() -> String {
    DEFAULT_FONT_FAMILY.to_string()
}

impl TextContent {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            font_family: default_font_family(),
            text_align: TextAlign::default(),
            color: SerializableColor::white(),
        }
    }
}

/// A captured or selected photo.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageDescriptor {
    pub uri: String,
    pub width: f64,
    pub height: f64,
    /// Flip horizontally when rendering (front camera captures).
    #[serde(default)]
    pub mirrored: bool,
}

impl ImageDescriptor {
    pub fn new(uri: impl Into<String>, width: f64, height: f64) -> Self {
        Self {
            uri: uri.into(),
            width,
            height,
            mirrored: false,
        }
    }
}

/// A sticker from the tray.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sticker {
    pub key: String,
    pub name: String,
    #[serde(default)]
    pub tags: Vec<String>,
    /// SVG markup.
    pub svg: String,
}

impl Sticker {
    /// Whether the sticker matches a tray search query (name or tag).
    pub fn matches(&self, query: &str) -> bool {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return true;
        }
        self.name.to_lowercase().contains(&query) || self.tags.iter().any(|tag| tag.to_lowercase().contains(&query))
    }
}

/// Element payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ElementContent {
    Text(TextContent),
    Image(ImageDescriptor),
    Sticker(Sticker),
}

impl ElementContent {
    /// Unscaled box size. Text boxes span the canvas width.
    pub fn base_size(&self, canvas_width: f64) -> Size {
        match self {
            ElementContent::Text(_) => Size::new(canvas_width, TEXT_BASE_FONT_SIZE * TEXT_LINE_HEIGHT),
            ElementContent::Image(image) => Size::new(image.width / IMAGE_DOWNSCALE, image.height / IMAGE_DOWNSCALE),
            ElementContent::Sticker(_) => Size::new(STICKER_BASE_SIZE, STICKER_BASE_SIZE),
        }
    }

    /// Whether dragging onto the delete target removes the element.
    pub fn supports_drag_removal(&self) -> bool {
        matches!(self, ElementContent::Image(_) | ElementContent::Sticker(_))
    }
}

/// An element on the card with its transform.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedElement {
    id: ElementId,
    pub content: ElementContent,
    pub transform: ElementTransform,
}

impl PlacedElement {
    /// Create an element at the identity transform.
    pub fn new(content: ElementContent, canvas_width: f64) -> Self {
        let transform = ElementTransform::new(content.base_size(canvas_width));
        Self {
            id: Uuid::new_v4(),
            content,
            transform,
        }
    }

    pub fn id(&self) -> ElementId {
        self.id
    }

    pub fn supports_drag_removal(&self) -> bool {
        self.content.supports_drag_removal()
    }

    /// Forward a recognizer callback to the transform.
    pub fn handle_gesture(&mut self, phase: GesturePhase, input: GestureInput) {
        self.transform.handle(phase, input);
    }

    /// Replace the payload. The transform is kept; the base size follows the new content.
    pub fn set_content(&mut self, content: ElementContent, canvas_width: f64) {
        let state = self.transform.state();
        self.transform = ElementTransform::with_state(state, content.base_size(canvas_width));
        self.content = content;
    }

    pub fn state(&self) -> TransformState {
        self.transform.state()
    }

    /// Style for the rendering layer, including kind-specific fields.
    pub fn render_style(&self) -> RenderStyle {
        let mut style = self.transform.render_style();
        match &self.content {
            ElementContent::Text(_) => style.font_size = Some(TEXT_BASE_FONT_SIZE * style.scale),
            ElementContent::Image(image) => style.mirrored = image.mirrored,
            ElementContent::Sticker(_) => {}
        }
        style
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sticker() -> Sticker {
        Sticker {
            key: "balloon".to_string(),
            name: "Red Balloon".to_string(),
            tags: vec!["party".to_string(), "birthday".to_string()],
            svg: "<svg/>".to_string(),
        }
    }

    #[test]
    fn test_base_sizes() {
        let image = ElementContent::Image(ImageDescriptor::new("file://a.jpg", 1200.0, 600.0));
        assert_eq!(image.base_size(400.0), Size::new(100.0, 50.0));

        let sticker = ElementContent::Sticker(sticker());
        assert_eq!(sticker.base_size(400.0), Size::new(100.0, 100.0));

        let text = ElementContent::Text(TextContent::new("Hi"));
        assert!((text.base_size(400.0).width - 400.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_drag_removal_support() {
        assert!(ElementContent::Image(ImageDescriptor::new("a", 1.0, 1.0)).supports_drag_removal());
        assert!(ElementContent::Sticker(sticker()).supports_drag_removal());
        assert!(!ElementContent::Text(TextContent::new("a")).supports_drag_removal());
    }

    #[test]
    fn test_text_font_size_follows_scale() {
        let mut element = PlacedElement::new(ElementContent::Text(TextContent::new("Happy birthday")), 400.0);
        element.handle_gesture(GesturePhase::Began, GestureInput::Pinch { scale: 1.0 });
        element.handle_gesture(GesturePhase::Active, GestureInput::Pinch { scale: 0.5 });

        let style = element.render_style();
        assert_eq!(style.font_size, Some(21.0));
    }

    #[test]
    fn test_mirrored_image_style() {
        let mut photo = ImageDescriptor::new("file://selfie.jpg", 120.0, 240.0);
        photo.mirrored = true;
        let element = PlacedElement::new(ElementContent::Image(photo), 400.0);
        assert!(element.render_style().mirrored);
        assert!(element.render_style().font_size.is_none());
    }

    #[test]
    fn test_set_content_keeps_transform() {
        let mut element = PlacedElement::new(ElementContent::Text(TextContent::new("a")), 400.0);
        element.handle_gesture(GesturePhase::Began, GestureInput::Rotation { rotation: 0.0 });
        element.handle_gesture(GesturePhase::Active, GestureInput::Rotation { rotation: 1.0 });
        element.handle_gesture(GesturePhase::Ended, GestureInput::Rotation { rotation: 1.0 });

        element.set_content(ElementContent::Text(TextContent::new("b")), 400.0);
        assert!((element.state().rotation - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_sticker_search() {
        let s = sticker();
        assert!(s.matches("balloon"));
        assert!(s.matches("BIRTH"));
        assert!(s.matches(""));
        assert!(!s.matches("wedding"));
    }

    #[test]
    fn test_text_align_cycles() {
        assert_eq!(TextAlign::default(), TextAlign::Center);
        assert_eq!(TextAlign::Center.next(), TextAlign::Right);
        assert_eq!(TextAlign::Right.next().next(), TextAlign::Center);
    }

    #[test]
    fn test_text_defaults_from_json() {
        let text: TextContent = serde_json::from_str(r#"{"text":"Hello"}"#).unwrap();
        assert_eq!(text, TextContent::new("Hello"));
    }
}
