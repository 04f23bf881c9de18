use serde::{Deserialize, Serialize};
use serenity::all::{CreateEmbed, CreateEmbedFooter};
use serenity::model::Timestamp;

pub const DEFAULT_COLOR: u32 = 0x3498db;
pub const ERROR_COLOR: u32 = 0xe74c3c;
pub const SUCCESS_COLOR: u32 = 0x2ecc71;
pub const UNKNOWN_FEED_COLOR: u32 = 0x95a5a6;

const SUMMARY_LIMIT: usize = 250;
const RSS_FOOTER: &str = "Bot RSS • Powered by Discord Bots Ecosystem";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmbedField {
    pub name: String,
    pub value: String,
    pub inline: bool,
}

/// Embed content before it is handed to serenity.
#[derive(Debug, Clone, PartialEq)]
pub struct EmbedTemplate {
    pub title: String,
    pub description: String,
    pub url: Option<String>,
    pub color: u32,
    pub timestamp: Timestamp,
    pub fields: Vec<EmbedField>,
    pub footer: Option<String>,
}

impl EmbedTemplate {
    pub fn new(title: impl Into<String>, description: impl Into<String>, color: u32) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            url: None,
            color,
            timestamp: Timestamp::now(),
            fields: Vec::new(),
            footer: None,
        }
    }

    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    pub fn field(mut self, name: impl Into<String>, value: impl Into<String>, inline: bool) -> Self {
        self.fields.push(EmbedField {
            name: name.into(),
            value: value.into(),
            inline,
        });
        self
    }

    pub fn footer(mut self, text: impl Into<String>) -> Self {
        self.footer = Some(text.into());
        self
    }
}

impl From<EmbedTemplate> for CreateEmbed {
    fn from(template: EmbedTemplate) -> Self {
        let mut embed = CreateEmbed::default()
            .title(template.title)
            .description(template.description)
            .color(template.color)
            .timestamp(template.timestamp)
            .fields(
                template
                    .fields
                    .into_iter()
                    .map(|field| (field.name, field.value, field.inline)),
            );

        if let Some(url) = template.url {
            embed = embed.url(url);
        }
        if let Some(text) = template.footer {
            embed = embed.footer(CreateEmbedFooter::new(text));
        }
        embed
    }
}

/// An RSS/Atom entry as handed over by a feed reader.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RssArticle {
    pub title: Option<String>,
    pub link: Option<String>,
    pub summary: Option<String>,
    pub published: Option<String>,
}

/// `color` defaults to [`DEFAULT_COLOR`] when `None`.
pub fn info_embed(
    title: impl Into<String>,
    description: impl Into<String>,
    color: impl Into<Option<u32>>,
) -> EmbedTemplate {
    EmbedTemplate::new(title, description, color.into().unwrap_or(DEFAULT_COLOR))
}

pub fn error_embed(title: impl Into<String>, description: impl Into<String>) -> EmbedTemplate {
    info_embed(title, description, ERROR_COLOR)
}

pub fn succes_embed(title: impl Into<String>, description: impl Into<String>) -> EmbedTemplate {
    info_embed(title, description, SUCCESS_COLOR)
}

pub fn feed_color(feed_name: &str) -> u32 {
    match feed_name.to_lowercase().as_str() {
        "tech" => 0x00ff00,
        "webdev" => 0x3498db,
        "ai" => 0x9b59b6,
        "crypto" => 0xf39c12,
        _ => UNKNOWN_FEED_COLOR,
    }
}

pub fn rss_article_embed(article: &RssArticle, feed_name: &str) -> EmbedTemplate {
    let title = article.title.as_deref().unwrap_or("Sans titre");
    let summary = article.summary.as_deref().unwrap_or("Pas de description");
    // The ellipsis is appended even when nothing was cut.
    let description: String = summary.chars().take(SUMMARY_LIMIT).chain("...".chars()).collect();

    let mut embed = EmbedTemplate::new(title, description, feed_color(feed_name));
    if let Some(link) = &article.link {
        embed = embed.url(link.as_str());
    }

    embed = embed.field("📂 Source", feed_name.to_uppercase(), true);
    if let Some(published) = &article.published {
        embed = embed.field("📅 Publié", published.as_str(), true);
    }
    embed.footer(RSS_FOOTER)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn without_timestamp(mut embed: EmbedTemplate) -> EmbedTemplate {
        embed.timestamp = Timestamp::from_unix_timestamp(0).unwrap();
        embed
    }

    #[test]
    fn test_info_embed_default_color() {
        let embed = info_embed("Title", "Body", None);
        assert_eq!(embed.title, "Title");
        assert_eq!(embed.description, "Body");
        assert_eq!(embed.color, DEFAULT_COLOR);
        assert!(embed.fields.is_empty());
        assert!(embed.footer.is_none());

        assert_eq!(info_embed("Title", "Body", 0x123456).color, 0x123456);
    }

    #[test]
    fn test_error_and_success_wrap_info() {
        assert_eq!(
            without_timestamp(error_embed("T", "D")),
            without_timestamp(info_embed("T", "D", 0xe74c3c))
        );
        assert_eq!(
            without_timestamp(succes_embed("T", "D")),
            without_timestamp(info_embed("T", "D", 0x2ecc71))
        );
    }

    #[test]
    fn test_feed_color_lookup() {
        assert_eq!(feed_color("tech"), 0x00ff00);
        assert_eq!(feed_color("WebDev"), 0x3498db);
        assert_eq!(feed_color("AI"), 0x9b59b6);
        assert_eq!(feed_color("crypto"), 0xf39c12);
        assert_eq!(feed_color("gardening"), 0x95a5a6);
    }

    #[test]
    fn test_rss_article_truncates_summary() {
        let article = RssArticle {
            title: Some("T".to_string()),
            summary: Some("S".repeat(300)),
            ..Default::default()
        };

        let embed = rss_article_embed(&article, "tech");

        assert_eq!(embed.title, "T");
        assert_eq!(embed.description, format!("{}...", "S".repeat(250)));
        assert_eq!(embed.color, 0x00ff00);
        assert_eq!(
            embed.fields,
            vec![EmbedField {
                name: "📂 Source".to_string(),
                value: "TECH".to_string(),
                inline: true,
            }]
        );
        assert_eq!(embed.footer.as_deref(), Some(RSS_FOOTER));
    }

    #[test]
    fn test_rss_article_truncates_on_chars() {
        let article = RssArticle {
            summary: Some("é".repeat(260)),
            ..Default::default()
        };
        let embed = rss_article_embed(&article, "ai");
        assert_eq!(embed.description.chars().count(), 253);
    }

    #[test]
    fn test_rss_article_fallbacks() {
        let embed = rss_article_embed(&RssArticle::default(), "unknown");

        assert_eq!(embed.title, "Sans titre");
        assert_eq!(embed.description, "Pas de description...");
        assert_eq!(embed.color, 0x95a5a6);
        assert_eq!(embed.url, None);
        assert_eq!(embed.fields.len(), 1);
        assert_eq!(embed.fields[0].value, "UNKNOWN");
    }

    #[test]
    fn test_rss_article_short_summary_still_gets_ellipsis() {
        let article = RssArticle {
            summary: Some("Short".to_string()),
            ..Default::default()
        };
        assert_eq!(rss_article_embed(&article, "tech").description, "Short...");
    }

    #[test]
    fn test_rss_article_link_and_published() {
        let article: RssArticle = serde_json::from_value(serde_json::json!({
            "title": "Rust 2024",
            "link": "https://blog.rust-lang.org/",
            "published": "2025-02-20",
        }))
        .unwrap();

        let embed = rss_article_embed(&article, "WebDev");

        assert_eq!(embed.url.as_deref(), Some("https://blog.rust-lang.org/"));
        assert_eq!(embed.color, 0x3498db);
        assert_eq!(embed.fields.len(), 2);
        assert_eq!(embed.fields[0].value, "WEBDEV");
        assert_eq!(embed.fields[1].name, "📅 Publié");
        assert_eq!(embed.fields[1].value, "2025-02-20");
        assert!(embed.fields[1].inline);
    }

    #[test]
    fn test_into_create_embed() {
        let article = RssArticle {
            title: Some("T".to_string()),
            link: Some("https://example.com/t".to_string()),
            summary: Some("S".to_string()),
            published: Some("today".to_string()),
        };
        let embed = CreateEmbed::from(rss_article_embed(&article, "crypto"));
        let json = serde_json::to_value(&embed).unwrap();

        assert_eq!(json["title"], "T");
        assert_eq!(json["description"], "S...");
        assert_eq!(json["url"], "https://example.com/t");
        assert_eq!(json["color"], 0xf39c12);
        assert_eq!(json["fields"][0]["name"], "📂 Source");
        assert_eq!(json["fields"][0]["value"], "CRYPTO");
        assert_eq!(json["fields"][0]["inline"], true);
        assert_eq!(json["fields"][1]["value"], "today");
        assert_eq!(json["footer"]["text"], RSS_FOOTER);
        assert!(json["timestamp"].is_string());
    }
}
