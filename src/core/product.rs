//! Product records as shipped in the catalog data file

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// A software listing
///
/// Products are loaded once and never mutated. Only the identity, text,
/// classification, rating, downloads and release date fields take part in
/// searching; the rest is carried through for presentation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Stable slug, unique across the catalog (e.g. "adobe-photoshop")
    pub id: String,
    pub name: String,
    pub description: String,
    pub full_description: String,
    pub category: String,
    pub version: String,
    pub company: String,

    /// Average rating in [0, 5]
    pub rating: f64,

    /// Download counter snapshot
    pub downloads: u64,

    pub image: String,

    #[serde(default)]
    pub tags: Vec<String>,

    /// Highlight labels such as "Top" or "Nuevo"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub badges: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub security_badges: Option<Vec<SecurityBadge>>,

    pub system_requirements: SystemRequirements,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub requirements: Option<Requirements>,

    #[serde(default)]
    pub features: Vec<String>,

    pub release_date: NaiveDate,

    /// Human readable download size ("2.8 GB")
    pub size: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub platforms: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price_type: Option<PriceType>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub download_url: Option<String>,
}

impl Product {
    /// Calendar year of the release date
    pub fn release_year(&self) -> i32 {
        self.release_date.year()
    }

    /// Path of the product detail page
    pub fn detail_path(&self) -> String {
        format!("/software/{}", self.id)
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemRequirements {
    pub os: Vec<String>,
    pub processor: String,
    pub memory: String,
    pub storage: String,
}

/// Minimum / recommended hardware, when the vendor publishes both
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Requirements {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minimum: Option<RequirementLevel>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recommended: Option<RequirementLevel>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequirementLevel {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub os: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cpu: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ram: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SecurityBadge {
    Verified,
    VirusFree,
    Secure,
    Trusted,
    Certified,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PriceType {
    Free,
    OpenSource,
    Freemium,
    Trial,
}
