//! RSS and sitemap generation
//!
//! Both documents are rendered from tera templates on every request. The clock
//! is injected so that `lastBuildDate`, the copyright year and default
//! `lastmod` values are reproducible.

pub mod rss;
pub mod sitemap;

use crate::config::SiteConfig;
use crate::core::catalog::Catalog;
use crate::core::clock::{Clock, SystemClock};
use crate::core::error::FeedError;
use std::collections::HashMap;
use std::error::Error as _;
use std::sync::Arc;
use tera::{Context, Tera, Value};

pub const RSS_CONTENT_TYPE: &str = "application/rss+xml; charset=utf-8";
pub const RSS_CACHE_CONTROL: &str = "max-age=3600, s-maxage=3600";
pub const SITEMAP_CONTENT_TYPE: &str = "application/xml";
pub const SITEMAP_CACHE_CONTROL: &str = "public, max-age=3600, s-maxage=86400";

const RSS_TEMPLATE_NAME: &str = "rss.xml";
const SITEMAP_TEMPLATE_NAME: &str = "sitemap.xml";

/// Renders the site feeds
pub struct FeedRenderer {
    tera: Tera,
    config: Arc<SiteConfig>,
    clock: Arc<dyn Clock>,
}

impl FeedRenderer {
    pub fn new(config: Arc<SiteConfig>) -> Result<Self, FeedError> {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    pub fn with_clock(config: Arc<SiteConfig>, clock: Arc<dyn Clock>) -> Result<Self, FeedError> {
        let mut tera = Tera::default();
        // Values are escaped explicitly with the filters below
        tera.autoescape_on(vec![]);
        tera.register_filter("xml", xml_filter);
        tera.register_filter("cdata", cdata_filter);

        tera.add_raw_templates(vec![
            (RSS_TEMPLATE_NAME, rss::TEMPLATE),
            (SITEMAP_TEMPLATE_NAME, sitemap::TEMPLATE),
        ])
        .map_err(|e| FeedError::RenderFailed {
            feed: "templates".to_string(),
            message: e.to_string(),
        })?;

        Ok(Self {
            tera,
            config,
            clock,
        })
    }

    pub fn config(&self) -> &SiteConfig {
        &self.config
    }

    /// The blog RSS 2.0 document
    pub fn render_rss(&self) -> Result<String, FeedError> {
        let channel = rss::Channel::build(&self.config, self.clock.now());
        self.render(RSS_TEMPLATE_NAME, &channel)
    }

    /// The sitemap: configured pages, then one entry per product
    pub fn render_sitemap(&self, catalog: &Catalog) -> Result<String, FeedError> {
        let urlset = sitemap::UrlSet::build(&self.config, catalog, self.clock.now().date_naive());
        self.render(SITEMAP_TEMPLATE_NAME, &urlset)
    }

    fn render<T: serde::Serialize>(&self, template: &str, data: &T) -> Result<String, FeedError> {
        let failed = |message: String| FeedError::RenderFailed {
            feed: template.to_string(),
            message,
        };

        let context = Context::from_serialize(data).map_err(|e| failed(e.to_string()))?;
        let body = self
            .tera
            .render(template, &context)
            .map_err(|e| failed(render_error_chain(&e)))?;

        tracing::debug!(feed = template, bytes = body.len(), "rendered feed");
        Ok(body)
    }
}

fn render_error_chain(error: &tera::Error) -> String {
    let mut message = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

/// Escape the five XML special characters
pub fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

/// Wrap text in a CDATA section, splitting any embedded terminator
pub fn cdata(text: &str) -> String {
    format!("<![CDATA[{}]]>", text.replace("]]>", "]]]]><![CDATA[>"))
}

fn xml_filter(value: &Value, _: &HashMap<String, Value>) -> tera::Result<Value> {
    Ok(Value::String(escape_xml(&value_text(value))))
}

fn cdata_filter(value: &Value, _: &HashMap<String, Value>) -> tera::Result<Value> {
    Ok(Value::String(cdata(&value_text(value))))
}

fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
