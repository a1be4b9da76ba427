//! What the calendar renderer is told about a day (or a week)

use bitflags::bitflags;
use serde::{Serialize, Serializer};

use crate::dots::Dot;

bitflags! {
    /// CSS classes added to a calendar cell
    #[derive(Default)]
    pub struct ClassTags: u8 {
        /// There is a note for this period
        const HAS_NOTE = 1;
        /// The note of this period has a photo
        const HAS_PHOTO = 2;
    }
}

impl ClassTags {
    /// The CSS class names of these tags
    pub fn names(&self) -> Vec<&'static str> {
        let mut names = Vec::new();
        if self.contains(Self::HAS_NOTE) {
            names.push("has-note");
        }
        if self.contains(Self::HAS_PHOTO) {
            names.push("has-photo");
        }
        names
    }
}

impl Serialize for ClassTags {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.names().serialize(serializer)
    }
}

/// The metadata of a calendar cell. This is computed for every render, and never stored.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct DayMetadata {
    classes: ClassTags,
    dots: Vec<Dot>,
    /// Not part of what is displayed, but handy for the renderer to draw the photo
    #[serde(skip_serializing_if = "Option::is_none")]
    photo: Option<String>,
}

impl DayMetadata {
    /// Metadata of a period without any note
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn new(classes: ClassTags, dots: Vec<Dot>, photo: Option<String>) -> Self {
        Self { classes, dots, photo }
    }

    pub fn classes(&self) -> ClassTags { self.classes }
    pub fn class_names(&self) -> Vec<&'static str> { self.classes.names() }
    pub fn dots(&self) -> &[Dot] { &self.dots }
    pub fn photo(&self) -> Option<&str> { self.photo.as_deref() }

    pub fn has_note(&self) -> bool {
        self.classes.contains(ClassTags::HAS_NOTE)
    }

    pub fn has_photo(&self) -> bool {
        self.classes.contains(ClassTags::HAS_PHOTO)
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn class_names() {
        assert!(ClassTags::default().names().is_empty());
        assert_eq!((ClassTags::HAS_NOTE | ClassTags::HAS_PHOTO).names(), vec!["has-note", "has-photo"]);
    }

    #[test]
    fn serialized_for_the_renderer() {
        let metadata = DayMetadata::new(ClassTags::HAS_NOTE, vec![Dot::default()], None);
        let json = serde_json::to_value(&metadata).unwrap();
        assert_eq!(json, serde_json::json!({
            "classes": ["has-note"],
            "dots": [{"filled": true, "colorTag": "default"}],
        }));
    }
}
