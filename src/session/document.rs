//! The editor document: everything describing the composition in progress.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("failed to read source image {path}: {source}")]
    SourceImageUnreadable {
        path: String,
        #[source]
        source: image::ImageError,
    },
}

pub type SessionResult<T> = std::result::Result<T, SessionError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub const fn rgb(self) -> (u8, u8, u8) {
        (self.r, self.g, self.b)
    }
}

/// One stop along a gradient axis. `position` runs from 0.0 to 1.0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ColorStop {
    pub color: Color,
    pub position: f32,
}

impl ColorStop {
    pub const fn new(color: Color, position: f32) -> Self {
        Self { color, position }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GradientDirection {
    ToTop,
    ToTopRight,
    ToRight,
    ToBottomRight,
    ToBottom,
    ToBottomLeft,
    ToLeft,
    ToTopLeft,
}

/// Backdrop behind the composition. Exactly one variant is active at a time;
/// callers replace the whole descriptor, never patch it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Background {
    Solid {
        color: Color,
    },
    Gradient {
        stops: Vec<ColorStop>,
        direction: GradientDirection,
    },
    Image {
        source: String,
    },
}

/// Reference to the image being composed, with its pixel dimensions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceImage {
    pub reference: String,
    pub width: u32,
    pub height: u32,
}

impl SourceImage {
    pub const fn new(reference: String, width: u32, height: u32) -> Self {
        Self {
            reference,
            width,
            height,
        }
    }

    /// Probe the pixel dimensions from the file header without decoding it.
    pub fn from_path(path: &Path) -> SessionResult<Self> {
        let (width, height) = image::image_dimensions(path).map_err(|source| {
            SessionError::SourceImageUnreadable {
                path: path.display().to_string(),
                source,
            }
        })?;
        Ok(Self::new(path.display().to_string(), width, height))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Shadow {
    pub color: Color,
    /// Percent, 0 disables the shadow.
    pub opacity: u8,
    pub blur: u16,
    pub offset_x: i16,
    pub offset_y: i16,
}

impl Default for Shadow {
    fn default() -> Self {
        Self {
            color: Color::new(0, 0, 0),
            opacity: 35,
            blur: 24,
            offset_x: 0,
            offset_y: 12,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FrameStyle {
    None,
    Window,
    Browser,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Frame {
    pub style: FrameStyle,
    /// Shown in the title bar for `Window` and `Browser` frames.
    pub title: Option<String>,
}

impl Default for Frame {
    fn default() -> Self {
        Self {
            style: FrameStyle::None,
            title: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WatermarkPosition {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
    Center,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Watermark {
    pub enabled: bool,
    pub text: String,
    pub position: WatermarkPosition,
    /// Percent.
    pub opacity: u8,
}

impl Default for Watermark {
    fn default() -> Self {
        Self {
            enabled: false,
            text: String::new(),
            position: WatermarkPosition::BottomRight,
            opacity: 60,
        }
    }
}

/// One drawing-engine element in the annotation overlay. The payload belongs
/// to the external engine and is never interpreted here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnotationElement {
    pub id: u64,
    pub kind: String,
    pub payload: serde_json::Value,
}

impl AnnotationElement {
    pub fn new(id: u64, kind: impl Into<String>, payload: serde_json::Value) -> Self {
        Self {
            id,
            kind: kind.into(),
            payload,
        }
    }
}

/// The single mutable aggregate behind an editing session.
///
/// The document itself performs no validation on its numeric knobs; interface
/// layers clamp against [`crate::session::limits`]. Annotation order is render
/// order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EditorDocument {
    pub background: Background,
    pub source_image: Option<SourceImage>,
    pub scale: f32,
    pub padding: u32,
    pub rotation: f32,
    pub border_radius: u16,
    pub shadow: Shadow,
    pub frame: Frame,
    pub watermark: Watermark,
    pub annotations: Vec<AnnotationElement>,
    pub tool_extras: BTreeMap<String, serde_json::Value>,
}

const DEFAULT_SCALE: f32 = 1.0;
const DEFAULT_PADDING: u32 = 64;
const DEFAULT_BORDER_RADIUS: u16 = 12;

impl EditorDocument {
    /// The built-in default composition every session starts from.
    pub fn baseline() -> Self {
        Self {
            background: Background::Gradient {
                stops: vec![
                    ColorStop::new(Color::new(99, 102, 241), 0.0),
                    ColorStop::new(Color::new(168, 85, 247), 1.0),
                ],
                direction: GradientDirection::ToBottomRight,
            },
            source_image: None,
            scale: DEFAULT_SCALE,
            padding: DEFAULT_PADDING,
            rotation: 0.0,
            border_radius: DEFAULT_BORDER_RADIUS,
            shadow: Shadow::default(),
            frame: Frame::default(),
            watermark: Watermark::default(),
            annotations: Vec::new(),
            tool_extras: BTreeMap::new(),
        }
    }
}

impl Default for EditorDocument {
    fn default() -> Self {
        Self::baseline()
    }
}
