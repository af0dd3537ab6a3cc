//! Named, persisted snapshots of the document's styling fields.
//!
//! A preset captures styling only; the selected source image and the
//! annotation overlay stay with the session they were made in.

use std::io;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::document::{Background, EditorDocument, Frame, Shadow, Watermark};

#[derive(Debug, Error)]
pub enum PresetError {
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error("invalid preset file: {0}")]
    Parse(#[from] serde_json::Error),
}

pub type PresetResult<T> = std::result::Result<T, PresetError>;

/// A partial document. Fields left as `None` are untouched when the patch is
/// applied, so successive patches accumulate.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PresetPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background: Option<Background>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scale: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub padding: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rotation: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border_radius: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shadow: Option<Shadow>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frame: Option<Frame>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub watermark: Option<Watermark>,
}

impl PresetPatch {
    /// Capture the current styling of `document` as a full patch.
    pub fn capture(document: &EditorDocument) -> Self {
        Self {
            background: Some(document.background.clone()),
            scale: Some(document.scale),
            padding: Some(document.padding),
            rotation: Some(document.rotation),
            border_radius: Some(document.border_radius),
            shadow: Some(document.shadow),
            frame: Some(document.frame.clone()),
            watermark: Some(document.watermark.clone()),
        }
    }

    /// Shallow-merge the present fields over `document`.
    pub fn apply_to(&self, document: &mut EditorDocument) {
        if let Some(background) = &self.background {
            document.background = background.clone();
        }
        if let Some(scale) = self.scale {
            document.scale = scale;
        }
        if let Some(padding) = self.padding {
            document.padding = padding;
        }
        if let Some(rotation) = self.rotation {
            document.rotation = rotation;
        }
        if let Some(border_radius) = self.border_radius {
            document.border_radius = border_radius;
        }
        if let Some(shadow) = self.shadow {
            document.shadow = shadow;
        }
        if let Some(frame) = &self.frame {
            document.frame = frame.clone();
        }
        if let Some(watermark) = &self.watermark {
            document.watermark = watermark.clone();
        }
    }

    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

/// A named patch as stored on disk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PresetRecord {
    pub name: String,
    pub saved_at: DateTime<Utc>,
    pub settings: PresetPatch,
}

impl PresetRecord {
    pub fn from_document(name: impl Into<String>, document: &EditorDocument) -> Self {
        Self {
            name: name.into(),
            saved_at: Utc::now(),
            settings: PresetPatch::capture(document),
        }
    }

    pub fn load(path: &Path) -> PresetResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&contents)?)
    }

    pub fn save(&self, path: &Path) -> PresetResult<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        tracing::debug!(name = %self.name, path = %path.display(), "preset saved");
        Ok(())
    }

    /// Save under `dir` as `<name>.json`, returning the path written. `dir`
    /// is typically the app config's `preset_dir`.
    pub fn save_in(&self, dir: &Path) -> PresetResult<std::path::PathBuf> {
        let path = dir.join(format!("{}.json", self.name));
        self.save(&path)?;
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::document::{Color, FrameStyle};

    #[test]
    fn empty_patch_leaves_the_document_unchanged() {
        let mut document = EditorDocument::baseline();
        PresetPatch::default().apply_to(&mut document);
        assert_eq!(document, EditorDocument::baseline());
    }

    #[test]
    fn patch_touches_only_its_present_fields() {
        let mut document = EditorDocument::baseline();
        let patch = PresetPatch {
            padding: Some(128),
            background: Some(Background::Solid {
                color: Color::new(17, 17, 17),
            }),
            ..PresetPatch::default()
        };
        patch.apply_to(&mut document);

        assert_eq!(document.padding, 128);
        assert!(matches!(document.background, Background::Solid { .. }));
        assert_eq!(document.scale, EditorDocument::baseline().scale);
        assert_eq!(document.shadow, EditorDocument::baseline().shadow);
    }

    #[test]
    fn capture_then_apply_reproduces_the_styling() {
        let mut styled = EditorDocument::baseline();
        styled.padding = 96;
        styled.rotation = -3.0;
        styled.frame = Frame {
            style: FrameStyle::Browser,
            title: Some("snapstudio".into()),
        };

        let patch = PresetPatch::capture(&styled);
        let mut fresh = EditorDocument::baseline();
        patch.apply_to(&mut fresh);

        assert_eq!(fresh.padding, 96);
        assert_eq!(fresh.rotation, -3.0);
        assert_eq!(fresh.frame, styled.frame);
    }

    #[test]
    fn record_round_trips_through_a_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("presets").join("midnight.json");

        let mut document = EditorDocument::baseline();
        document.border_radius = 24;
        let record = PresetRecord::from_document("midnight", &document);
        record.save(&path).unwrap();

        let loaded = PresetRecord::load(&path).unwrap();
        assert_eq!(loaded, record);
        assert_eq!(loaded.settings.border_radius, Some(24));
    }

    #[test]
    fn save_in_names_the_file_after_the_preset() {
        let dir = tempfile::tempdir().unwrap();
        let record = PresetRecord::from_document("clean", &EditorDocument::baseline());

        let path = record.save_in(dir.path()).unwrap();
        assert_eq!(path, dir.path().join("clean.json"));
        assert_eq!(PresetRecord::load(&path).unwrap(), record);
    }

    #[test]
    fn unlisted_fields_are_absent_from_the_serialized_patch() {
        let patch = PresetPatch {
            padding: Some(32),
            ..PresetPatch::default()
        };
        let value = serde_json::to_value(&patch).unwrap();
        let object = value.as_object().unwrap();
        assert_eq!(object.len(), 1);
        assert_eq!(object["padding"], 32);
    }
}
