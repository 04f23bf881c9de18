mod error;

pub mod config;
pub mod embeds;
pub mod logger;

pub use config::{BaseConfig, Settings, project_root};
pub use embeds::{EmbedField, EmbedTemplate, RssArticle};
pub use error::Error;
pub use logger::{Logger, Logging, LoggingConfig, logging, setup_logger, setup_logger_in};
