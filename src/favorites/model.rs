use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Id of the collection every new favorite lands in
pub const DEFAULT_COLLECTION_ID: &str = "default";

/// Pseudo collection id selecting every favorite
pub const ALL_COLLECTIONS: &str = "all";

/// Palette offered when creating a collection
pub const COLLECTION_COLORS: [&str; 10] = [
    "#3B82F6", "#EF4444", "#10B981", "#F59E0B", "#8B5CF6", "#EC4899", "#06B6D4", "#84CC16",
    "#F97316", "#6366F1",
];

/// A favorited product
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FavoriteItem {
    pub id: String,
    pub product_id: String,
    pub date_added: DateTime<Utc>,
    #[serde(default)]
    pub collections: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl FavoriteItem {
    pub fn in_collection(&self, collection_id: &str) -> bool {
        self.collections.iter().any(|c| c == collection_id)
    }
}

/// A named group of favorites
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FavoriteCollection {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub color: String,
    pub date_created: DateTime<Utc>,
    #[serde(default)]
    pub product_ids: Vec<String>,
}

impl FavoriteCollection {
    /// The built-in "My Favorites" collection
    pub fn default_collection(now: DateTime<Utc>) -> Self {
        Self {
            id: DEFAULT_COLLECTION_ID.to_string(),
            name: "My Favorites".to_string(),
            description: Some("All your favorite software".to_string()),
            color: COLLECTION_COLORS[0].to_string(),
            date_created: now,
            product_ids: Vec::new(),
        }
    }

    pub fn is_default(&self) -> bool {
        self.id == DEFAULT_COLLECTION_ID
    }

    pub(crate) fn insert_product(&mut self, product_id: &str) {
        if !self.product_ids.iter().any(|id| id == product_id) {
            self.product_ids.push(product_id.to_string());
        }
    }

    pub(crate) fn remove_product(&mut self, product_id: &str) {
        self.product_ids.retain(|id| id != product_id);
    }
}

/// Input for creating a collection
#[derive(Debug, Clone, Default)]
pub struct NewCollection {
    pub name: String,
    pub description: Option<String>,
    /// Palette color; defaults to the first palette entry
    pub color: Option<String>,
}

impl NewCollection {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }
}

/// Ordering of the favorites list
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FavoritesSort {
    /// Newest first
    #[default]
    DateAdded,
    /// Locale order, A to Z
    Name,
    /// Highest first
    Rating,
    /// Most downloaded first
    Downloads,
}

impl FavoritesSort {
    pub fn as_str(&self) -> &'static str {
        match self {
            FavoritesSort::DateAdded => "dateAdded",
            FavoritesSort::Name => "name",
            FavoritesSort::Rating => "rating",
            FavoritesSort::Downloads => "downloads",
        }
    }
}

impl fmt::Display for FavoritesSort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FavoritesSort {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "dateAdded" => Ok(FavoritesSort::DateAdded),
            "name" => Ok(FavoritesSort::Name),
            "rating" => Ok(FavoritesSort::Rating),
            "downloads" => Ok(FavoritesSort::Downloads),
            other => Err(format!("unknown favorites sort '{}'", other)),
        }
    }
}

/// Snapshot written by the export action
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FavoritesExport {
    pub favorites: Vec<FavoriteItem>,
    pub collections: Vec<FavoriteCollection>,
    pub export_date: DateTime<Utc>,
}

impl FavoritesExport {
    /// Suggested download file name, e.g. `opensoftware-favorites-2024-10-15.json`
    pub fn file_name(&self) -> String {
        format!(
            "opensoftware-favorites-{}.json",
            self.export_date.format("%Y-%m-%d")
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_item_uses_camel_case() {
        let item = FavoriteItem {
            id: "winrar_1".to_string(),
            product_id: "winrar".to_string(),
            date_added: Utc.with_ymd_and_hms(2024, 10, 15, 8, 0, 0).unwrap(),
            collections: vec!["default".to_string()],
            notes: None,
        };

        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["productId"], "winrar");
        assert_eq!(json["dateAdded"], "2024-10-15T08:00:00Z");
        assert!(json.get("notes").is_none());
    }

    #[test]
    fn test_sort_parse() {
        assert_eq!("dateAdded".parse::<FavoritesSort>().unwrap(), FavoritesSort::DateAdded);
        assert!("price".parse::<FavoritesSort>().is_err());
    }

    #[test]
    fn test_export_file_name() {
        let export = FavoritesExport {
            favorites: Vec::new(),
            collections: Vec::new(),
            export_date: Utc.with_ymd_and_hms(2024, 10, 15, 23, 59, 0).unwrap(),
        };
        assert_eq!(export.file_name(), "opensoftware-favorites-2024-10-15.json");
    }
}
