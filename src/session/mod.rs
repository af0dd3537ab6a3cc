//! Editor session store: the live document and every way to mutate it.

pub mod document;
pub mod preset;

use std::path::Path;

pub use document::{
    AnnotationElement, Background, Color, ColorStop, EditorDocument, Frame, FrameStyle,
    GradientDirection, SessionError, SessionResult, Shadow, SourceImage, Watermark,
    WatermarkPosition,
};
pub use preset::{PresetError, PresetPatch, PresetRecord, PresetResult};

/// Recommended clamp ranges for the document's numeric knobs.
///
/// The store accepts any value; interface layers are expected to clamp
/// against these before submitting an update.
pub mod limits {
    pub const SCALE_MIN: f32 = 0.25;
    pub const SCALE_MAX: f32 = 3.0;
    pub const PADDING_MAX: u32 = 512;
    pub const ROTATION_MIN_DEGREES: f32 = -45.0;
    pub const ROTATION_MAX_DEGREES: f32 = 45.0;
    pub const BORDER_RADIUS_MAX: u16 = 96;
}

/// One field replacement. Every recognized document field has a variant;
/// satellite tools use `ToolExtra` for their own keys.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionUpdate {
    Background(Background),
    SourceImage(Option<SourceImage>),
    Scale(f32),
    Padding(u32),
    Rotation(f32),
    BorderRadius(u16),
    Shadow(Shadow),
    Frame(Frame),
    Watermark(Watermark),
    /// Replaces the whole annotation overlay; order is render order.
    Annotations(Vec<AnnotationElement>),
    ToolExtra {
        key: String,
        value: serde_json::Value,
    },
}

type Observer = Box<dyn Fn(&EditorDocument)>;

/// Owns the live [`EditorDocument`] for one editing session and mediates all
/// reads and writes. Single-threaded by design; hosts pass the session handle
/// to whichever controls need it.
pub struct EditorSession {
    document: EditorDocument,
    observers: Vec<Observer>,
    revision: u64,
    next_annotation_id: u64,
}

impl EditorSession {
    pub fn new() -> Self {
        Self {
            document: EditorDocument::baseline(),
            observers: Vec::new(),
            revision: 0,
            next_annotation_id: 1,
        }
    }

    /// Current document value. Callers own the clone; mutating it never
    /// touches the session.
    pub fn snapshot(&self) -> EditorDocument {
        self.document.clone()
    }

    /// Monotonically increasing change counter, usable by render caches.
    pub const fn revision(&self) -> u64 {
        self.revision
    }

    /// Register a change observer. Observers run after every mutation with
    /// the already-updated document, so they never see a partial write.
    pub fn subscribe(&mut self, observer: impl Fn(&EditorDocument) + 'static) {
        self.observers.push(Box::new(observer));
    }

    /// Replace one field. Always succeeds; the store performs no validation.
    pub fn apply(&mut self, update: SessionUpdate) {
        tracing::debug!(update = ?discriminant_name(&update), "session update");
        match update {
            SessionUpdate::Background(background) => self.document.background = background,
            SessionUpdate::SourceImage(source_image) => self.document.source_image = source_image,
            SessionUpdate::Scale(scale) => self.document.scale = scale,
            SessionUpdate::Padding(padding) => self.document.padding = padding,
            SessionUpdate::Rotation(rotation) => self.document.rotation = rotation,
            SessionUpdate::BorderRadius(border_radius) => {
                self.document.border_radius = border_radius
            }
            SessionUpdate::Shadow(shadow) => self.document.shadow = shadow,
            SessionUpdate::Frame(frame) => self.document.frame = frame,
            SessionUpdate::Watermark(watermark) => self.document.watermark = watermark,
            SessionUpdate::Annotations(annotations) => self.replace_annotations(annotations),
            SessionUpdate::ToolExtra { key, value } => {
                self.document.tool_extras.insert(key, value);
            }
        }
        self.notify();
    }

    /// Convenience form of [`apply`](Self::apply) restricted to the
    /// background. The whole descriptor is replaced.
    pub fn set_background(&mut self, background: Background) {
        self.apply(SessionUpdate::Background(background));
    }

    /// Probe `path` for its pixel dimensions and select it as the source.
    pub fn select_source_image(&mut self, path: &Path) -> SessionResult<()> {
        let source = SourceImage::from_path(path)?;
        self.apply(SessionUpdate::SourceImage(Some(source)));
        Ok(())
    }

    /// Shallow-merge `patch` over the current document. Unlisted fields stay
    /// untouched; successive patches accumulate.
    pub fn apply_preset(&mut self, patch: &PresetPatch) {
        patch.apply_to(&mut self.document);
        self.notify();
    }

    /// Append one element to the annotation overlay, allocating its id.
    pub fn push_annotation(&mut self, kind: impl Into<String>, payload: serde_json::Value) -> u64 {
        let id = self.allocate_annotation_id();
        self.document
            .annotations
            .push(AnnotationElement::new(id, kind, payload));
        self.notify();
        id
    }

    pub fn clear_annotations(&mut self) {
        self.document.annotations.clear();
        self.notify();
    }

    /// Restore the built-in default document, discarding all session edits.
    /// Unconditional; confirmation and undo are the caller's responsibility.
    pub fn reset(&mut self) {
        self.document = EditorDocument::baseline();
        self.next_annotation_id = 1;
        self.notify();
    }

    fn replace_annotations(&mut self, annotations: Vec<AnnotationElement>) {
        let max_id = annotations.iter().map(|element| element.id).max();
        if let Some(max_id) = max_id {
            self.next_annotation_id = self.next_annotation_id.max(max_id.saturating_add(1));
        }
        self.document.annotations = annotations;
    }

    fn allocate_annotation_id(&mut self) -> u64 {
        let id = self.next_annotation_id;
        self.next_annotation_id = self.next_annotation_id.saturating_add(1);
        id
    }

    fn notify(&mut self) {
        self.revision = self.revision.saturating_add(1);
        for observer in &self.observers {
            observer(&self.document);
        }
    }
}

impl Default for EditorSession {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for EditorSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EditorSession")
            .field("revision", &self.revision)
            .field("observers", &self.observers.len())
            .field("document", &self.document)
            .finish()
    }
}

fn discriminant_name(update: &SessionUpdate) -> &'static str {
    match update {
        SessionUpdate::Background(_) => "background",
        SessionUpdate::SourceImage(_) => "source_image",
        SessionUpdate::Scale(_) => "scale",
        SessionUpdate::Padding(_) => "padding",
        SessionUpdate::Rotation(_) => "rotation",
        SessionUpdate::BorderRadius(_) => "border_radius",
        SessionUpdate::Shadow(_) => "shadow",
        SessionUpdate::Frame(_) => "frame",
        SessionUpdate::Watermark(_) => "watermark",
        SessionUpdate::Annotations(_) => "annotations",
        SessionUpdate::ToolExtra { .. } => "tool_extra",
    }
}
