//! Named loggers on top of a single process-wide tracing subscriber.
//!
//! A [`Logging`] value owns the parsed configuration and a registry of
//! `bot.{name}` loggers. Installing it sets the global subscriber once; every
//! [`Logger`] handed out afterwards tags its events with its own name and
//! applies its own level.

use std::{
    collections::{BTreeMap, HashMap},
    env,
    fmt::{self, Write as _},
    path::{Path, PathBuf},
    str::FromStr,
    sync::{Arc, Mutex, OnceLock, PoisonError},
};

use chrono::Local;
use serde::Deserialize;
use serde_yaml::{Mapping, Value};
use tracing::{
    Event, Level, Subscriber,
    field::{Field, Visit},
    level_filters::LevelFilter,
};
use tracing_subscriber::{
    EnvFilter,
    fmt::{FmtContext, FormatEvent, FormatFields, format::Writer},
    registry::LookupSpan,
};

use crate::{Error, config::project_root, config::read_yaml};

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S,%3f";
/// Target of every event emitted through a [`Logger`].
const LOGGER_TARGET: &str = module_path!();

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// `timestamp - logger LEVEL - message`
    #[default]
    Plain,
    Compact,
    Json,
}

/// On-disk shape of `configs/logging.yaml`.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct LoggingFile {
    level: Option<String>,
    format: LogFormat,
    loggers: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LoggingConfig {
    pub level: LevelFilter,
    pub format: LogFormat,
    /// Dotted logger name prefix -> level.
    pub loggers: BTreeMap<String, LevelFilter>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: LevelFilter::INFO,
            format: LogFormat::Plain,
            loggers: BTreeMap::new(),
        }
    }
}

impl LoggingConfig {
    fn from_file(file: LoggingFile) -> Result<Self, Error> {
        let level = match file.level.as_deref() {
            Some(raw) => parse_level(raw)?,
            None => LevelFilter::INFO,
        };

        let loggers = file
            .loggers
            .iter()
            .map(|(name, raw)| Ok((name.clone(), parse_level(raw)?)))
            .collect::<Result<BTreeMap<_, _>, Error>>()?;

        Ok(Self {
            level,
            format: file.format,
            loggers,
        })
    }

    pub fn path(root: &Path) -> PathBuf {
        root.join("configs").join("logging.yaml")
    }

    /// Parse `{root}/configs/logging.yaml`, `Ok(None)` if it is absent.
    pub fn load(root: &Path) -> Result<Option<Self>, Error> {
        let path = Self::path(root);
        let Some(value) = read_yaml(&path)? else {
            return Ok(None);
        };

        let value = match value {
            Value::Null => Value::Mapping(Mapping::new()),
            other => other,
        };
        let file: LoggingFile =
            serde_yaml::from_value(value).map_err(|source| Error::Yaml { path, source })?;

        Self::from_file(file).map(Some)
    }

    /// Level for a dotted logger name: the longest matching prefix in
    /// `loggers`, else the root level.
    pub fn level_for(&self, name: &str) -> LevelFilter {
        self.loggers
            .iter()
            .filter(|(prefix, _)| {
                name == prefix.as_str()
                    || name
                        .strip_prefix(prefix.as_str())
                        .is_some_and(|rest| rest.starts_with('.'))
            })
            .max_by_key(|(prefix, _)| prefix.len())
            .map(|(_, level)| *level)
            .unwrap_or(self.level)
    }

    /// Most verbose level any logger may need; the subscriber filters at this.
    pub fn max_level(&self) -> LevelFilter {
        self.loggers.values().copied().fold(self.level, Ord::max)
    }
}

fn parse_level(raw: &str) -> Result<LevelFilter, Error> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "warning" => Ok(LevelFilter::WARN),
        "critical" | "fatal" => Ok(LevelFilter::ERROR),
        other => LevelFilter::from_str(other).map_err(|_| Error::InvalidLevel(raw.to_string())),
    }
}

pub struct Logging {
    config: LoggingConfig,
    /// `RUST_LOG` directives, when set. They replace the configured levels.
    env_filter: Option<String>,
    registry: Mutex<HashMap<String, Logger>>,
}

impl Logging {
    pub fn new(config: LoggingConfig) -> Self {
        let env_filter = env::var(EnvFilter::DEFAULT_ENV)
            .ok()
            .filter(|directives| !directives.trim().is_empty());
        Self::with_env_filter(config, env_filter)
    }

    pub fn with_env_filter(config: LoggingConfig, env_filter: Option<String>) -> Self {
        Self {
            config,
            env_filter,
            registry: Mutex::new(HashMap::new()),
        }
    }

    pub fn config(&self) -> &LoggingConfig {
        &self.config
    }

    /// Filter directives for the subscriber. Without `RUST_LOG`, other crates
    /// stay at the root level and only `Logger` events may go as low as the
    /// most verbose configured logger.
    pub fn filter_directives(&self) -> String {
        if let Some(directives) = &self.env_filter {
            return directives.clone();
        }

        let root = self.config.level.to_string().to_ascii_lowercase();
        let loggers = self.config.max_level().to_string().to_ascii_lowercase();
        format!("{root},{LOGGER_TARGET}={loggers}")
    }

    pub fn env_filter(&self) -> EnvFilter {
        EnvFilter::new(self.filter_directives())
    }

    /// Install the global subscriber. `RUST_LOG` takes precedence over the
    /// configured levels. Returns false if a subscriber was already set.
    pub fn install(&self) -> bool {
        let builder = tracing_subscriber::fmt().with_env_filter(self.env_filter());

        let installed = match self.config.format {
            LogFormat::Plain => builder.event_format(LineFormat).try_init(),
            LogFormat::Compact => builder.compact().try_init(),
            LogFormat::Json => builder.json().try_init(),
        };

        installed.is_ok()
    }

    /// The `bot.{bot_name}` logger, created on first use. Under `RUST_LOG`
    /// handles do not filter on their own; the subscriber decides.
    pub fn logger(&self, bot_name: &str) -> Logger {
        let name = format!("bot.{bot_name}");
        let level = match self.env_filter {
            Some(_) => LevelFilter::TRACE,
            None => self.config.level_for(&name),
        };

        let mut registry = self.registry.lock().unwrap_or_else(PoisonError::into_inner);
        registry
            .entry(name.clone())
            .or_insert_with(|| Logger::new(&name, level))
            .clone()
    }

    /// Registered logger names, sorted.
    pub fn names(&self) -> Vec<String> {
        let registry = self.registry.lock().unwrap_or_else(PoisonError::into_inner);
        let mut names: Vec<String> = registry.keys().cloned().collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.registry
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

static LOGGING: OnceLock<Logging> = OnceLock::new();

/// The process-wide [`Logging`], once [`setup_logger`] has run.
pub fn logging() -> Option<&'static Logging> {
    LOGGING.get()
}

/// Configure logging from `configs/logging.yaml` under the project root, or
/// the INFO console default, and return the `bot.{bot_name}` logger.
pub fn setup_logger(bot_name: &str) -> Result<Logger, Error> {
    setup_logger_in(&project_root(), bot_name)
}

/// The first call loads the configuration and installs the subscriber; later
/// calls reuse the same registry.
pub fn setup_logger_in(root: &Path, bot_name: &str) -> Result<Logger, Error> {
    let logging = match LOGGING.get() {
        Some(logging) => logging,
        None => {
            let config = LoggingConfig::load(root)?.unwrap_or_default();
            let logging = LOGGING.get_or_init(|| Logging::new(config));
            if !logging.install() {
                tracing::debug!("tracing subscriber already installed, keeping it");
            }
            logging
        }
    };

    Ok(logging.logger(bot_name))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Logger {
    name: Arc<str>,
    level: LevelFilter,
}

macro_rules! emit {
    ($self:ident, $level:expr, $event:ident, $message:ident) => {
        if $self.is_enabled($level) {
            tracing::$event!(target: LOGGER_TARGET, logger = %$self.name, "{}", $message);
        }
    };
}

impl Logger {
    fn new(name: &str, level: LevelFilter) -> Self {
        Self {
            name: Arc::from(name),
            level,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn level(&self) -> LevelFilter {
        self.level
    }

    pub fn is_enabled(&self, level: Level) -> bool {
        self.level >= level
    }

    pub fn error(&self, message: impl fmt::Display) {
        emit!(self, Level::ERROR, error, message);
    }

    pub fn warn(&self, message: impl fmt::Display) {
        emit!(self, Level::WARN, warn, message);
    }

    pub fn info(&self, message: impl fmt::Display) {
        emit!(self, Level::INFO, info, message);
    }

    pub fn debug(&self, message: impl fmt::Display) {
        emit!(self, Level::DEBUG, debug, message);
    }

    pub fn trace(&self, message: impl fmt::Display) {
        emit!(self, Level::TRACE, trace, message);
    }
}

/// Renders `timestamp - logger LEVEL - message key=value...`. The logger name
/// comes from the event's `logger` field, falling back to its target.
pub struct LineFormat;

#[derive(Default)]
struct LineVisitor {
    logger: Option<String>,
    message: String,
    fields: Vec<(&'static str, String)>,
}

impl LineVisitor {
    fn record(&mut self, field: &Field, value: String) {
        match field.name() {
            "logger" => self.logger = Some(value),
            "message" => self.message = value,
            name => self.fields.push((name, value)),
        }
    }
}

impl Visit for LineVisitor {
    fn record_str(&mut self, field: &Field, value: &str) {
        self.record(field, value.to_owned());
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        self.record(field, format!("{value:?}"));
    }
}

impl<S, N> FormatEvent<S, N> for LineFormat
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        _ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        let mut visitor = LineVisitor::default();
        event.record(&mut visitor);

        let metadata = event.metadata();
        let name = visitor.logger.as_deref().unwrap_or(metadata.target());

        write!(
            writer,
            "{} - {} {} - {}",
            Local::now().format(TIMESTAMP_FORMAT),
            name,
            metadata.level(),
            visitor.message
        )?;
        for (key, value) in &visitor.fields {
            write!(writer, " {key}={value}")?;
        }
        writeln!(writer)
    }
}
