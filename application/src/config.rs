//! [`Config`]-related definitions.

use std::{env, time};

use config::{builder::DefaultState, ConfigBuilder, ConfigError};
use derive_more::{Display, Error as StdError};
use secrecy::{ExposeSecret as _, SecretString};
use serde::Deserialize;
use smart_default::SmartDefault;

/// Application configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Server configuration.
    pub server: Server,

    /// Authentication configuration.
    pub auth: Auth,

    /// Postgres configuration.
    pub postgres: Postgres,

    /// Log configuration.
    pub log: Log,
}

impl Config {
    /// Process environment variables overriding [`Config`] fields, mapped to
    /// the overridden keys.
    const ENV_OVERRIDES: [(&'static str, &'static str); 4] = [
        ("ACCESS_TOKEN_SECRET", "auth.secret"),
        ("PORT", "server.port"),
        ("DB_USER", "postgres.user"),
        ("DB_PASS", "postgres.password"),
    ];

    /// Creates a new [`Config`] by:
    /// - loading it from the provided `path` (if any);
    /// - merging it with the `CONF_`-prefixed environment variables (if any);
    /// - overriding it with the `ACCESS_TOKEN_SECRET`, `PORT`, `DB_USER` and
    ///   `DB_PASS` environment variables (if any);
    /// - using default values for missing fields.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn new(path: impl AsRef<str>) -> Result<Self, ConfigError> {
        Self::with_env(path, |name| env::var(name).ok())
    }

    /// Same as [`Config::new()`], but reads the overriding variables with the
    /// provided `var` function.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn with_env(
        path: impl AsRef<str>,
        var: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let mut builder = ConfigBuilder::<DefaultState>::default()
            .add_source(config::File::with_name(path.as_ref()).required(false))
            .add_source(config::Environment::with_prefix("CONF").separator("."));
        for (name, key) in Self::ENV_OVERRIDES {
            builder = builder.set_override_option(key, var(name))?;
        }
        builder.build()?.try_deserialize()
    }
}

/// Server configuration.
#[derive(Clone, Debug, Deserialize, SmartDefault)]
#[serde(default)]
pub struct Server {
    /// Host to bind the server to.
    #[default("0.0.0.0".to_owned())]
    pub host: String,

    /// Port to bind the server to.
    #[default(5000)]
    pub port: u16,

    /// [CORS] configuration.
    ///
    /// [CORS]: https://developer.mozilla.org/en-US/docs/Web/HTTP/CORS
    pub cors: Cors,
}

/// [CORS] configuration.
///
/// Credentials are always allowed, so the origins must be listed explicitly.
///
/// [CORS]: https://developer.mozilla.org/en-US/docs/Web/HTTP/CORS
#[derive(Clone, Debug, Deserialize, SmartDefault)]
#[serde(default)]
pub struct Cors {
    /// List of allowed origins.
    #[default(vec![
        "http://localhost:5173".to_owned(),
        "http://localhost:5174".to_owned(),
    ])]
    pub origins: Vec<String>,
}

/// Authentication configuration.
#[derive(Debug, Deserialize, SmartDefault)]
#[serde(default)]
pub struct Auth {
    /// [JWT] secret.
    ///
    /// [JWT]: https://wikipedia.org/wiki/JSON_Web_Token
    pub secret: Option<SecretString>,

    /// Time a session stays valid for.
    #[default(service::Config::DEFAULT_SESSION_TTL)]
    #[serde(with = "humantime_serde")]
    pub ttl: time::Duration,
}

impl TryFrom<Auth> for service::Config {
    type Error = AuthError;

    fn try_from(value: Auth) -> Result<Self, Self::Error> {
        let Auth { secret, ttl } = value;

        let secret = secret
            .filter(|s| !s.expose_secret().is_empty())
            .ok_or(AuthError::MissingSecret)?;
        if ttl > Self::MAX_SESSION_TTL {
            return Err(AuthError::TtlTooLong(ttl));
        }

        Ok(Self {
            session_ttl: ttl,
            ..Self::with_secret(secret.expose_secret())
        })
    }
}

/// Error of converting [`Auth`] into a [`service::Config`].
#[derive(Clone, Copy, Debug, Display, StdError)]
pub enum AuthError {
    /// [`Auth::secret`] is not set or empty.
    #[display(
        "`auth.secret` is not set or empty \
         (provide it via `ACCESS_TOKEN_SECRET`)"
    )]
    MissingSecret,

    /// [`Auth::ttl`] exceeds [`service::Config::MAX_SESSION_TTL`].
    #[display(
        "`auth.ttl` of {}s exceeds the maximum of {}s",
        _0.as_secs(),
        service::Config::MAX_SESSION_TTL.as_secs()
    )]
    TtlTooLong(#[error(not(source))] time::Duration),
}

/// Postgres configuration.
#[derive(Clone, Debug, Deserialize, SmartDefault)]
#[serde(default)]
pub struct Postgres {
    /// Host to connect to.
    #[default("127.0.0.1".to_owned())]
    pub host: String,

    /// Port to connect to.
    #[default(5432)]
    pub port: u16,

    /// User to connect as.
    #[default("postgres".to_owned())]
    pub user: String,

    /// Password to connect with.
    #[default("postgres".to_owned())]
    pub password: String,

    /// Database name to connect to.
    #[default("postgres".to_owned())]
    pub dbname: String,
}

impl From<Postgres> for service::infra::postgres::Config {
    fn from(value: Postgres) -> Self {
        let Postgres {
            host,
            port,
            user,
            password,
            dbname,
        } = value;

        Self {
            host: Some(host),
            port: Some(port),
            user: Some(user),
            password: Some(password),
            dbname: Some(dbname),
            ..Self::default()
        }
    }
}

/// Log configuration.
#[derive(Clone, Copy, Debug, Default, Deserialize)]
#[serde(default)]
pub struct Log {
    /// Log level.
    pub level: LogLevel,
}

/// Log level.
#[derive(Clone, Copy, Debug, Default, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LogLevel {
    /// Designates very low priority, often extremely verbose, information.
    Trace,

    /// Designates lower priority information.
    Debug,

    /// Designates useful information.
    #[default]
    Info,

    /// Designates hazardous situations.
    Warn,

    /// Designates very serious errors.
    Error,
}

impl From<LogLevel> for tracing::Level {
    fn from(value: LogLevel) -> Self {
        match value {
            LogLevel::Trace => Self::TRACE,
            LogLevel::Debug => Self::DEBUG,
            LogLevel::Info => Self::INFO,
            LogLevel::Warn => Self::WARN,
            LogLevel::Error => Self::ERROR,
        }
    }
}
