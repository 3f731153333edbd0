//! Theme and interface language
//!
//! Both are stored as bare strings rather than JSON.

use crate::core::error::{PreferenceError, StorageError};
use crate::core::store::{KeyValueStore, keys};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    /// Read the stored theme; a missing value is written back as `light`
    pub fn load(store: &dyn KeyValueStore) -> Result<Self, StorageError> {
        match store.get(keys::THEME)? {
            Some(raw) => Ok(raw.parse().unwrap_or_default()),
            None => {
                let theme = Theme::default();
                theme.save(store)?;
                Ok(theme)
            }
        }
    }

    pub fn save(&self, store: &dyn KeyValueStore) -> Result<(), StorageError> {
        store.set(keys::THEME, self.as_str())
    }

    pub fn toggled(&self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Theme {
    type Err = PreferenceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            other => Err(PreferenceError::UnknownTheme {
                value: other.to_string(),
            }),
        }
    }
}

/// Interface languages
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    Es,
    Fr,
    De,
    Pt,
    It,
}

impl Language {
    pub const ALL: [Language; 6] = [
        Language::En,
        Language::Es,
        Language::Fr,
        Language::De,
        Language::Pt,
        Language::It,
    ];

    pub fn code(&self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Es => "es",
            Language::Fr => "fr",
            Language::De => "de",
            Language::Pt => "pt",
            Language::It => "it",
        }
    }

    /// Endonym shown in the language picker
    pub fn native_name(&self) -> &'static str {
        match self {
            Language::En => "English",
            Language::Es => "Español",
            Language::Fr => "Français",
            Language::De => "Deutsch",
            Language::Pt => "Português",
            Language::It => "Italiano",
        }
    }

    /// Read the stored language; unknown or missing values give the default
    pub fn load(store: &dyn KeyValueStore) -> Result<Self, StorageError> {
        Ok(store
            .get(keys::LANGUAGE)?
            .and_then(|raw| raw.parse().ok())
            .unwrap_or_default())
    }

    pub fn save(&self, store: &dyn KeyValueStore) -> Result<(), StorageError> {
        store.set(keys::LANGUAGE, self.code())
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Language {
    type Err = PreferenceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Language::ALL
            .into_iter()
            .find(|lang| lang.code() == s)
            .ok_or_else(|| PreferenceError::UnknownLanguage {
                value: s.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::InMemoryKeyValueStore;

    #[test]
    fn test_missing_theme_is_written_as_light() {
        let store = InMemoryKeyValueStore::new();
        assert_eq!(Theme::load(&store).unwrap(), Theme::Light);
        assert_eq!(store.get(keys::THEME).unwrap().as_deref(), Some("light"));
    }

    #[test]
    fn test_theme_stored_raw() {
        let store = InMemoryKeyValueStore::new();
        Theme::Dark.save(&store).unwrap();
        assert_eq!(store.get(keys::THEME).unwrap().as_deref(), Some("dark"));
        assert_eq!(Theme::load(&store).unwrap(), Theme::Dark);
        assert_eq!(Theme::Dark.toggled(), Theme::Light);
    }

    #[test]
    fn test_language_round_trip_and_fallback() {
        let store = InMemoryKeyValueStore::new();
        assert_eq!(Language::load(&store).unwrap(), Language::En);

        Language::Pt.save(&store).unwrap();
        assert_eq!(store.get(keys::LANGUAGE).unwrap().as_deref(), Some("pt"));
        assert_eq!(Language::load(&store).unwrap(), Language::Pt);

        store.set(keys::LANGUAGE, "klingon").unwrap();
        assert_eq!(Language::load(&store).unwrap(), Language::En);
    }
}
