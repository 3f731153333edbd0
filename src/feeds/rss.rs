use crate::config::{BlogPost, SiteConfig};
use chrono::{DateTime, Datelike, Utc};
use serde::Serialize;

/// RFC 822 date as written in `pubDate` / `lastBuildDate`
pub fn rfc822(date: &DateTime<Utc>) -> String {
    date.format("%a, %d %b %Y %H:%M:%S GMT").to_string()
}

pub(super) const TEMPLATE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0"
     xmlns:content="http://purl.org/rss/1.0/modules/content/"
     xmlns:wfw="http://wellformedweb.org/CommentAPI/"
     xmlns:dc="http://purl.org/dc/elements/1.1/"
     xmlns:atom="http://www.w3.org/2005/Atom"
     xmlns:sy="http://purl.org/rss/1.0/modules/syndication/"
     xmlns:slash="http://purl.org/rss/1.0/modules/slash/">
  <channel>
    <title>{{ title | xml }}</title>
    <atom:link href="{{ self_link | xml }}" rel="self" type="application/rss+xml" />
    <link>{{ link | xml }}</link>
    <description>{{ description | xml }}</description>
    <lastBuildDate>{{ last_build_date }}</lastBuildDate>
    <language>{{ language | xml }}</language>
    <sy:updatePeriod>daily</sy:updatePeriod>
    <sy:updateFrequency>1</sy:updateFrequency>
    <generator>{{ generator | xml }}</generator>
    <managingEditor>{{ editor | xml }}</managingEditor>
    <webMaster>{{ editor | xml }}</webMaster>
    <copyright>Copyright © {{ year }} Opensoftware. All rights reserved.</copyright>
{%- for category in categories %}
    <category>{{ category | xml }}</category>
{%- endfor %}
    <ttl>{{ ttl }}</ttl>
    <image>
      <url>{{ image_url | xml }}</url>
      <title>{{ title | xml }}</title>
      <link>{{ link | xml }}</link>
      <width>144</width>
      <height>144</height>
      <description>{{ description | xml }}</description>
    </image>
{%- for item in items %}
    <item>
      <title>{{ item.title | cdata }}</title>
      <link>{{ item.link | xml }}</link>
      <description>{{ item.description | cdata }}</description>
      <content:encoded>{{ item.content | cdata }}</content:encoded>
      <pubDate>{{ item.pub_date }}</pubDate>
      <guid isPermaLink="true">{{ item.link | xml }}</guid>
      <dc:creator>{{ item.author | cdata }}</dc:creator>
      <category>{{ item.category | cdata }}</category>
      <comments>{{ item.link | xml }}#comments</comments>
      <slash:comments>0</slash:comments>
    </item>
{%- endfor %}
  </channel>
</rss>
"#;

#[derive(Debug, Serialize)]
pub(super) struct Channel {
    title: String,
    self_link: String,
    link: String,
    description: String,
    last_build_date: String,
    language: String,
    generator: String,
    editor: String,
    year: i32,
    categories: Vec<String>,
    ttl: u32,
    image_url: String,
    items: Vec<Item>,
}

#[derive(Debug, Serialize)]
struct Item {
    title: String,
    link: String,
    description: String,
    content: String,
    pub_date: String,
    author: String,
    category: String,
}

impl Channel {
    pub(super) fn build(config: &SiteConfig, now: DateTime<Utc>) -> Self {
        let site = &config.site;
        Self {
            title: site.title.clone(),
            self_link: site.url("/rss.xml"),
            link: site.url("/blog"),
            description: site.description.clone(),
            last_build_date: rfc822(&now),
            language: site.language.clone(),
            generator: site.generator.clone(),
            editor: format!("{} ({})", site.contact_email, site.contact_name),
            year: now.year(),
            categories: site.categories.clone(),
            ttl: site.ttl_minutes,
            image_url: site.url(&site.logo_path),
            items: config
                .blog_posts
                .iter()
                .map(|post| Item::build(config, post))
                .collect(),
        }
    }
}

impl Item {
    fn build(config: &SiteConfig, post: &BlogPost) -> Self {
        Self {
            title: post.title.clone(),
            link: config.site.url(&post.path),
            description: post.description.clone(),
            content: post.content.clone(),
            pub_date: rfc822(&post.published_at),
            author: post.author.clone(),
            category: post.category.clone(),
        }
    }
}
