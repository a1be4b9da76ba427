//! User-facing settings, as persisted by the host

use std::error::Error;

use serde::{Deserialize, Serialize};

/// The view type this calendar registers in the host
pub const VIEW_TYPE_CALENDAR: &str = "photo-calendar";
/// The icon of the ribbon button that opens the calendar
pub const RIBBON_ICON: &str = "calendar-with-checkmark";

/// The first day of a week
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeekStart {
    /// Whatever the locale says. Without locale data, this behaves like `Sunday`
    Locale,
    Sunday,
    Monday,
}

impl Default for WeekStart {
    fn default() -> Self {
        WeekStart::Locale
    }
}

/// How a photo fills a calendar cell
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PhotoFillMode {
    /// Crop the photo so that it covers the whole cell
    Cover,
    /// Fit the whole photo inside the cell
    Contain,
}

impl Default for PhotoFillMode {
    fn default() -> Self {
        PhotoFillMode::Cover
    }
}

/// A snapshot of the calendar settings.
///
/// Components never mutate settings: they are handed a fresh snapshot every time the user changes something.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    pub week_start: WeekStart,
    pub should_confirm_before_create: bool,
    pub show_weekly_note: bool,
    /// Front matter fields that may hold a photo, tried in this order
    pub photo_field_names: Vec<String>,
    pub show_photos: bool,
    pub photo_fill_mode: PhotoFillMode,
    /// How many words make up one dot. Zero or less disables dots.
    pub words_per_dot: i64,
    pub show_week_nums: bool,
    /// Background of days that have a note but no photo (in photo mode)
    pub note_background_color: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            week_start: WeekStart::default(),
            should_confirm_before_create: true,
            show_weekly_note: false,
            photo_field_names: vec!["image".to_string(), "cover".to_string(), "banner".to_string()],
            show_photos: true,
            photo_fill_mode: PhotoFillMode::default(),
            words_per_dot: 250,
            show_week_nums: false,
            note_background_color: DEFAULT_NOTE_BACKGROUND_COLOR.to_string(),
        }
    }
}

const DEFAULT_NOTE_BACKGROUND_COLOR: &str = "#E2DCED";

impl Settings {
    /// Load settings from their persisted JSON form.
    ///
    /// Keys that are missing take their default values, so that data saved by an older version is still usable.
    pub fn from_json(json: &str) -> Result<Self, Box<dyn Error>> {
        if json.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String, Box<dyn Error>> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Replace the photo field names with a comma-separated list typed by the user
    pub fn set_photo_field_names_from_str(&mut self, value: &str) {
        self.photo_field_names = parse_photo_field_names(value);
    }

    /// Update `words_per_dot` from user input.
    ///
    /// Only strictly positive integers are accepted. Returns whether the value was applied.
    pub fn set_words_per_dot_from_str(&mut self, value: &str) -> bool {
        match value.trim().parse::<i64>() {
            Ok(n) if n > 0 => {
                self.words_per_dot = n;
                true
            },
            _ => {
                log::warn!("Ignoring invalid words-per-dot value {:?}", value);
                false
            }
        }
    }

    /// Update the note background from any CSS color. Returns whether the value was applied.
    pub fn set_note_background_color(&mut self, value: &str) -> bool {
        match csscolorparser::parse(value) {
            Ok(_) => {
                self.note_background_color = value.trim().to_string();
                true
            },
            Err(err) => {
                log::warn!("Ignoring invalid note background color {:?}: {}", value, err);
                false
            }
        }
    }

    pub fn reset_note_background_color(&mut self) {
        self.note_background_color = DEFAULT_NOTE_BACKGROUND_COLOR.to_string();
    }
}

/// Split a comma-separated list of field names, dropping blank entries
pub fn parse_photo_field_names(value: &str) -> Vec<String> {
    value.split(',')
        .map(|s| s.trim())
        .filter(|s| s.is_empty() == false)
        .map(|s| s.to_string())
        .collect()
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_takes_defaults() {
        let settings = Settings::from_json(r#"{"showPhotos": false, "wordsPerDot": 100, "weekStart": "monday"}"#).unwrap();
        assert_eq!(settings.show_photos, false);
        assert_eq!(settings.words_per_dot, 100);
        assert_eq!(settings.week_start, WeekStart::Monday);
        assert_eq!(settings.photo_field_names, vec!["image", "cover", "banner"]);
        assert_eq!(settings.note_background_color, "#E2DCED");

        assert_eq!(Settings::from_json("").unwrap(), Settings::default());
        assert!(Settings::from_json("{not json").is_err());
    }

    #[test]
    fn serde_settings() {
        let mut settings = Settings::default();
        settings.photo_fill_mode = PhotoFillMode::Contain;
        let json = settings.to_json().unwrap();
        assert!(json.contains("\"photoFillMode\": \"contain\""));
        assert_eq!(Settings::from_json(&json).unwrap(), settings);
    }

    #[test]
    fn field_names_from_user_input() {
        assert_eq!(parse_photo_field_names(" image, cover,, banner ,"), vec!["image", "cover", "banner"]);
        assert!(parse_photo_field_names(" , ").is_empty());
    }

    #[test]
    fn words_per_dot_validation() {
        let mut settings = Settings::default();
        assert!(settings.set_words_per_dot_from_str(" 120 "));
        assert_eq!(settings.words_per_dot, 120);

        assert_eq!(settings.set_words_per_dot_from_str("0"), false);
        assert_eq!(settings.set_words_per_dot_from_str("-4"), false);
        assert_eq!(settings.set_words_per_dot_from_str("many"), false);
        assert_eq!(settings.words_per_dot, 120);
    }

    #[test]
    fn background_color_validation() {
        let mut settings = Settings::default();
        assert!(settings.set_note_background_color("rgb(10, 20, 30)"));
        assert_eq!(settings.note_background_color, "rgb(10, 20, 30)");
        assert_eq!(settings.set_note_background_color("not-a-color"), false);
        assert_eq!(settings.note_background_color, "rgb(10, 20, 30)");
        settings.reset_note_background_color();
        assert_eq!(settings.note_background_color, "#E2DCED");
    }
}
