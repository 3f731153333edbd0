use crate::core::error::StorageError;
use crate::core::store::{JsonSlot, KeyValueStore, keys};
use serde::{Deserialize, Serialize};

pub const MIN_FONT_SIZE: u32 = 12;
pub const MAX_FONT_SIZE: u32 = 24;
pub const MIN_TEXT_SPACING: f64 = 1.0;
pub const MAX_TEXT_SPACING: f64 = 2.0;

const SLOT: JsonSlot<AccessibilitySettings> = JsonSlot::new(keys::ACCESSIBILITY);

/// Accessibility preferences
///
/// Stored values are merged over the defaults, so a partial or older record
/// still loads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AccessibilitySettings {
    pub high_contrast: bool,
    pub large_text: bool,
    pub reduced_motion: bool,
    pub screen_reader: bool,
    pub keyboard_nav: bool,
    pub focus_indicator: bool,
    pub color_blind_friendly: bool,
    /// Line spacing multiplier in [1, 2]
    pub text_spacing: f64,
    /// Base font size in px, in [12, 24]
    pub font_size: u32,
    pub sound_enabled: bool,
    pub dark_mode: bool,
}

impl Default for AccessibilitySettings {
    fn default() -> Self {
        Self {
            high_contrast: false,
            large_text: false,
            reduced_motion: false,
            screen_reader: false,
            keyboard_nav: true,
            focus_indicator: true,
            color_blind_friendly: false,
            text_spacing: 1.0,
            font_size: 16,
            sound_enabled: true,
            dark_mode: false,
        }
    }
}

impl AccessibilitySettings {
    pub fn load(store: &dyn KeyValueStore) -> Result<Self, StorageError> {
        Ok(SLOT.load(store)?.clamped())
    }

    pub fn save(&self, store: &dyn KeyValueStore) -> Result<(), StorageError> {
        SLOT.save(store, &self.clone().clamped())
    }

    /// Restore the defaults and persist them
    pub fn reset(&mut self, store: &dyn KeyValueStore) -> Result<(), StorageError> {
        *self = Self::default();
        self.save(store)
    }

    /// Bring the numeric settings back into their ranges
    pub fn clamped(mut self) -> Self {
        self.font_size = self.font_size.clamp(MIN_FONT_SIZE, MAX_FONT_SIZE);
        self.text_spacing = if self.text_spacing.is_finite() {
            self.text_spacing.clamp(MIN_TEXT_SPACING, MAX_TEXT_SPACING)
        } else {
            MIN_TEXT_SPACING
        };
        self
    }

    /// Classes the document root carries for these settings
    pub fn root_classes(&self) -> Vec<&'static str> {
        [
            (self.high_contrast, "high-contrast"),
            (self.large_text, "large-text"),
            (self.reduced_motion, "reduced-motion"),
            (self.color_blind_friendly, "color-blind-friendly"),
            (self.focus_indicator, "enhanced-focus"),
            (self.dark_mode, "dark"),
        ]
        .into_iter()
        .filter_map(|(on, class)| on.then_some(class))
        .collect()
    }

    /// CSS custom properties set on the document root
    pub fn css_variables(&self) -> Vec<(&'static str, String)> {
        vec![
            ("--base-font-size", format!("{}px", self.font_size)),
            ("--text-spacing", format!("{}", self.text_spacing)),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::InMemoryKeyValueStore;

    #[test]
    fn test_defaults() {
        let settings = AccessibilitySettings::default();
        assert!(settings.keyboard_nav);
        assert!(settings.sound_enabled);
        assert_eq!(settings.font_size, 16);
        assert_eq!(settings.root_classes(), vec!["enhanced-focus"]);
    }

    #[test]
    fn test_partial_record_merges_over_defaults() {
        let store = InMemoryKeyValueStore::new();
        store
            .set(keys::ACCESSIBILITY, r#"{"highContrast":true,"fontSize":40}"#)
            .unwrap();

        let settings = AccessibilitySettings::load(&store).unwrap();
        assert!(settings.high_contrast);
        assert!(settings.focus_indicator);
        assert_eq!(settings.font_size, MAX_FONT_SIZE);
    }

    #[test]
    fn test_css_variables() {
        let settings = AccessibilitySettings {
            font_size: 20,
            text_spacing: 1.5,
            ..Default::default()
        };
        assert_eq!(
            settings.css_variables(),
            vec![
                ("--base-font-size", "20px".to_string()),
                ("--text-spacing", "1.5".to_string()),
            ]
        );
    }

    #[test]
    fn test_reset_persists_defaults() {
        let store = InMemoryKeyValueStore::new();
        let mut settings = AccessibilitySettings {
            dark_mode: true,
            ..Default::default()
        };
        settings.save(&store).unwrap();
        assert!(AccessibilitySettings::load(&store).unwrap().dark_mode);

        settings.reset(&store).unwrap();
        assert_eq!(
            AccessibilitySettings::load(&store).unwrap(),
            AccessibilitySettings::default()
        );
    }
}
