//! Configuration loading and management
//!
//! A [`SiteConfig`] describes the public site (base URL, blog metadata), the
//! search surface limits, and the fixed content of the two XML feeds. Any
//! section left out of a YAML file keeps its default.

use crate::core::error::ConfigError;
use crate::search::session::{DEFAULT_RECENT_LIMIT, DEFAULT_SUGGESTION_LIMIT};
use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use validator::{Validate, ValidationError};

/// Site-wide metadata used by the feeds
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct SiteInfo {
    /// Absolute URL without trailing slash
    #[validate(url)]
    pub base_url: String,

    #[validate(length(min = 1))]
    pub title: String,

    pub description: String,

    /// RFC 5646 tag written into the RSS channel
    pub language: String,

    #[validate(email)]
    pub contact_email: String,

    pub contact_name: String,

    pub generator: String,

    /// Channel categories
    pub categories: Vec<String>,

    /// Minutes a feed reader may cache the channel
    #[validate(range(min = 1))]
    pub ttl_minutes: u32,

    /// Path of the channel image, relative to `base_url`
    pub logo_path: String,
}

impl Default for SiteInfo {
    fn default() -> Self {
        Self {
            base_url: "https://opensoftware.com".to_string(),
            title: "Opensoftware Blog".to_string(),
            description: "Articles, guides and tutorials about free software, open source \
                          alternatives and digital productivity."
                .to_string(),
            language: "en-US".to_string(),
            contact_email: "info@opensoftware.com".to_string(),
            contact_name: "Opensoftware Team".to_string(),
            generator: "Opensoftware RSS Generator".to_string(),
            categories: vec![
                "Technology".to_string(),
                "Software".to_string(),
                "Open Source".to_string(),
            ],
            ttl_minutes: 60,
            logo_path: "/logo.png".to_string(),
        }
    }
}

impl SiteInfo {
    /// Join a site-relative path onto the base URL
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }
}

/// Limits of the search box, listing and HTTP pagination
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
#[validate(schema(function = "validate_page_limits"))]
pub struct SearchSettings {
    #[validate(range(min = 1, max = 50))]
    pub suggestion_limit: usize,

    #[validate(range(min = 1, max = 50))]
    pub recent_search_limit: usize,

    /// Products shown before the first "load more"
    #[validate(range(min = 1))]
    pub initial_page_size: usize,

    /// Products added by each "load more"
    #[validate(range(min = 1))]
    pub load_more_step: usize,

    #[validate(range(min = 1))]
    pub default_page_limit: usize,

    #[validate(range(min = 1, max = 1000))]
    pub max_page_limit: usize,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            suggestion_limit: DEFAULT_SUGGESTION_LIMIT,
            recent_search_limit: DEFAULT_RECENT_LIMIT,
            initial_page_size: 6,
            load_more_step: 12,
            default_page_limit: 20,
            max_page_limit: 100,
        }
    }
}

fn validate_page_limits(settings: &SearchSettings) -> Result<(), ValidationError> {
    if settings.default_page_limit > settings.max_page_limit {
        let mut error = ValidationError::new("page_limits");
        error.message = Some("default_page_limit exceeds max_page_limit".into());
        return Err(error);
    }
    Ok(())
}

/// A blog article listed in the RSS feed
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct BlogPost {
    #[validate(length(min = 1))]
    pub title: String,

    pub description: String,

    /// Site-relative path, e.g. `/blog/some-article`
    #[validate(custom(function = "validate_site_path"))]
    pub path: String,

    pub author: String,

    pub published_at: DateTime<Utc>,

    pub category: String,

    /// HTML body, emitted as `content:encoded`
    #[serde(default)]
    pub content: String,
}

/// Sitemap change frequency
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeFrequency {
    Always,
    Hourly,
    Daily,
    Weekly,
    Monthly,
    Yearly,
    Never,
}

impl ChangeFrequency {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChangeFrequency::Always => "always",
            ChangeFrequency::Hourly => "hourly",
            ChangeFrequency::Daily => "daily",
            ChangeFrequency::Weekly => "weekly",
            ChangeFrequency::Monthly => "monthly",
            ChangeFrequency::Yearly => "yearly",
            ChangeFrequency::Never => "never",
        }
    }
}

impl fmt::Display for ChangeFrequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A fixed page listed in the sitemap
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SitemapPage {
    /// Site-relative path; empty for the home page
    #[validate(custom(function = "validate_site_path"))]
    pub path: String,

    pub changefreq: ChangeFrequency,

    #[validate(range(min = 0.0, max = 1.0))]
    pub priority: f32,

    /// Defaults to the render date when absent
    #[serde(default)]
    pub lastmod: Option<NaiveDate>,
}

impl SitemapPage {
    fn new(path: &str, changefreq: ChangeFrequency, priority: f32, lastmod: Option<NaiveDate>) -> Self {
        Self {
            path: path.to_string(),
            changefreq,
            priority,
            lastmod,
        }
    }
}

fn validate_site_path(path: &str) -> Result<(), ValidationError> {
    if path.is_empty() || path.starts_with('/') {
        Ok(())
    } else {
        Err(ValidationError::new("site_path"))
    }
}

/// Complete configuration of the site
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct SiteConfig {
    #[validate(nested)]
    pub site: SiteInfo,

    #[validate(nested)]
    pub search: SearchSettings,

    #[validate(nested)]
    pub blog_posts: Vec<BlogPost>,

    #[validate(nested)]
    pub sitemap_pages: Vec<SitemapPage>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self::default_config()
    }
}

impl SiteConfig {
    /// Load configuration from a YAML file
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let file = path.display().to_string();
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            file: file.clone(),
            message: e.to_string(),
        })?;

        let config: Self = serde_yaml::from_str(&content).map_err(|e| ConfigError::ParseError {
            file: Some(file),
            message: e.to_string(),
        })?;
        config.validated()
    }

    /// Load configuration from a YAML string
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(yaml).map_err(|e| ConfigError::ParseError {
            file: None,
            message: e.to_string(),
        })?;
        config.validated()
    }

    fn validated(self) -> Result<Self, ConfigError> {
        self.validate().map_err(|e| ConfigError::ValidationFailed {
            message: e.to_string(),
        })?;
        Ok(self)
    }

    /// The live site's settings, posts and pages
    pub fn default_config() -> Self {
        Self {
            site: SiteInfo::default(),
            search: SearchSettings::default(),
            blog_posts: default_blog_posts(),
            sitemap_pages: default_sitemap_pages(),
        }
    }
}

fn at_ten(year: i32, month: u32, day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, 10, 0, 0)
        .single()
        .unwrap_or_default()
}

fn default_blog_posts() -> Vec<BlogPost> {
    vec![
        BlogPost {
            title: "Best Free Alternatives to Adobe Creative Suite".to_string(),
            description: "Discover professional tools that can completely replace Adobe's suite \
                          at no cost. From GIMP to Blender, we show you the best options."
                .to_string(),
            path: "/blog/alternativas-gratuitas-adobe-creative-suite".to_string(),
            author: "Opensoftware Team".to_string(),
            published_at: at_ten(2024, 1, 15),
            category: "Design".to_string(),
            content: "<p>Adobe Creative Suite is the industry standard for creative professionals, \
                      but it comes with a hefty price tag. Fortunately, there are excellent free \
                      alternatives that can provide similar functionality.</p>\n\
                      <h2>Image Editing: GIMP vs Photoshop</h2>\n\
                      <h2>Vector Graphics: Inkscape vs Illustrator</h2>\n\
                      <h2>Video Editing: DaVinci Resolve vs Premiere Pro</h2>"
                .to_string(),
        },
        BlogPost {
            title: "Free Web Development Tools: Build Professional Sites at No Cost".to_string(),
            description: "Discover the best free tools for web development, from code editors to \
                          frameworks, databases, and deployment platforms."
                .to_string(),
            path: "/blog/free-web-development-tools".to_string(),
            author: "Ana García".to_string(),
            published_at: at_ten(2024, 12, 20),
            category: "Web Development".to_string(),
            content: "<p>Web development has never been more accessible than it is today.</p>\n\
                      <h2>Code Editors &amp; IDEs</h2>\n\
                      <h2>Frontend Frameworks</h2>\n\
                      <h2>Backend Technologies</h2>"
                .to_string(),
        },
        BlogPost {
            title: "Best Free Alternatives to Microsoft Office".to_string(),
            description: "Explore the best free office suites that can perfectly replace \
                          Microsoft Office for all your productivity needs."
                .to_string(),
            path: "/blog/mejores-alternativas-microsoft-office".to_string(),
            author: "Carlos Mendoza".to_string(),
            published_at: at_ten(2024, 12, 15),
            category: "Productivity".to_string(),
            content: "<p>Microsoft Office is the gold standard for office productivity, but there \
                      are excellent free alternatives that offer similar functionality.</p>\n\
                      <h2>LibreOffice: The Complete Suite</h2>\n\
                      <h2>Google Workspace: Cloud-Based Productivity</h2>\n\
                      <h2>OnlyOffice: Enterprise Features</h2>"
                .to_string(),
        },
        BlogPost {
            title: "Complete Guide: Migrating from AutoCAD to FreeCAD".to_string(),
            description: "Everything you need to know to transition from AutoCAD to FreeCAD \
                          without losing productivity."
                .to_string(),
            path: "/blog/guia-migrar-autocad-freecad".to_string(),
            author: "Opensoftware Team".to_string(),
            published_at: at_ten(2024, 1, 10),
            category: "CAD".to_string(),
            content: "<p>Migrating from AutoCAD to FreeCAD can seem daunting, but with the right \
                      approach, you can maintain your productivity while saving on licensing \
                      costs.</p>\n\
                      <h2>Understanding FreeCAD's Interface</h2>\n\
                      <h2>File Format Compatibility</h2>\n\
                      <h2>Key Feature Mapping</h2>"
                .to_string(),
        },
    ]
}

fn default_sitemap_pages() -> Vec<SitemapPage> {
    use ChangeFrequency::*;

    let date = |y, m, d| NaiveDate::from_ymd_opt(y, m, d);

    vec![
        SitemapPage::new("", Daily, 1.0, None),
        SitemapPage::new("/sobre-nosotros", Monthly, 0.8, None),
        SitemapPage::new("/contacto", Monthly, 0.8, None),
        SitemapPage::new("/blog", Weekly, 0.9, None),
        SitemapPage::new("/software", Weekly, 0.9, None),
        SitemapPage::new("/software/productividad", Weekly, 0.8, None),
        SitemapPage::new("/herramientas", Weekly, 0.8, None),
        SitemapPage::new("/terminos", Yearly, 0.5, None),
        SitemapPage::new("/privacidad", Yearly, 0.5, None),
        SitemapPage::new(
            "/blog/alternativas-gratuitas-adobe-creative-suite",
            Monthly,
            0.8,
            date(2024, 1, 15),
        ),
        SitemapPage::new(
            "/blog/herramientas-desarrollo-web-gratuitas",
            Monthly,
            0.8,
            date(2024, 12, 20),
        ),
        SitemapPage::new(
            "/blog/mejores-alternativas-microsoft-office",
            Monthly,
            0.8,
            date(2024, 12, 15),
        ),
        SitemapPage::new("/blog/guia-migrar-autocad-freecad", Monthly, 0.8, date(2024, 1, 10)),
        SitemapPage::new(
            "/blog/top-editores-video-gratuitos-profesionales",
            Monthly,
            0.8,
            date(2024, 1, 5),
        ),
        SitemapPage::new(
            "/blog/configurar-entorno-desarrollo-completo-gratuito",
            Monthly,
            0.8,
            date(2024, 1, 1),
        ),
    ]
}
