use std::fmt;
use std::str::FromStr;

use sqlx::postgres::PgConnectOptions;
use werkleitung_core::validation::envelope::{LV95_X_MAX, LV95_X_MIN, LV95_Y_MAX, LV95_Y_MIN};
use werkleitung_core::validation::{CoordinateEnvelope, ValidationSettings, DEFAULT_MIN_LENGTH};

use crate::error::ImportError;

/// Database connection settings.
///
/// A full `DATABASE_URL` takes precedence over the discrete parts.
#[derive(Clone)]
pub struct DbConfig {
    pub url: Option<String>,
    pub host: String,
    pub port: u16,
    pub name: String,
    pub user: String,
    pub password: String,
}

impl fmt::Debug for DbConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DbConfig")
            .field("url", &self.url.as_ref().map(|_| "<redacted>"))
            .field("host", &self.host)
            .field("port", &self.port)
            .field("name", &self.name)
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .finish()
    }
}

impl DbConfig {
    /// Connection options for sqlx.
    pub fn connect_options(&self) -> Result<PgConnectOptions, ImportError> {
        match &self.url {
            Some(url) => PgConnectOptions::from_str(url)
                .map_err(|e| ImportError::Config(format!("DATABASE_URL is not a valid Postgres URL: {e}"))),
            None => Ok(PgConnectOptions::new()
                .host(&self.host)
                .port(self.port)
                .database(&self.name)
                .username(&self.user)
                .password(&self.password)),
        }
    }

    /// `host:port/name`, safe to log.
    pub fn target(&self) -> String {
        match &self.url {
            Some(_) => "DATABASE_URL".to_string(),
            None => format!("{}:{}/{}", self.host, self.port, self.name),
        }
    }
}

/// Importer configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct ImporterConfig {
    pub db: DbConfig,
    pub validation: ValidationSettings,
}

impl ImporterConfig {
    /// Load configuration from the process environment.
    ///
    /// | Env Var              | Default          |
    /// |----------------------|------------------|
    /// | `DATABASE_URL`       | unset            |
    /// | `DB_HOST`            | `localhost`      |
    /// | `DB_PORT`            | `5432`           |
    /// | `DB_NAME`            | `basler_hofmann` |
    /// | `DB_USER`            | `tomo`           |
    /// | `DB_PASSWORD`        | `tomo`           |
    /// | `MIN_SEGMENT_LENGTH` | `0.5`            |
    /// | `LV95_X_MIN`         | `2480000`        |
    /// | `LV95_X_MAX`         | `2840000`        |
    /// | `LV95_Y_MIN`         | `1070000`        |
    /// | `LV95_Y_MAX`         | `1300000`        |
    pub fn from_env() -> Result<Self, ImportError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ImportError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let db = DbConfig {
            url: lookup("DATABASE_URL").filter(|u| !u.trim().is_empty()),
            host: var("DB_HOST", "localhost"),
            port: parse_var(&lookup, "DB_PORT", 5432)?,
            name: var("DB_NAME", "basler_hofmann"),
            user: var("DB_USER", "tomo"),
            password: var("DB_PASSWORD", "tomo"),
        };

        let min_length: f64 = parse_var(&lookup, "MIN_SEGMENT_LENGTH", DEFAULT_MIN_LENGTH)?;
        if !min_length.is_finite() || min_length < 0.0 {
            return Err(ImportError::Config(format!(
                "MIN_SEGMENT_LENGTH must be a non-negative number, got {min_length}"
            )));
        }

        let envelope = CoordinateEnvelope::new(
            parse_var(&lookup, "LV95_X_MIN", LV95_X_MIN)?,
            parse_var(&lookup, "LV95_X_MAX", LV95_X_MAX)?,
            parse_var(&lookup, "LV95_Y_MIN", LV95_Y_MIN)?,
            parse_var(&lookup, "LV95_Y_MAX", LV95_Y_MAX)?,
        )
        .map_err(|e| ImportError::Config(e.to_string()))?;

        Ok(Self {
            db,
            validation: ValidationSettings {
                envelope,
                min_length,
            },
        })
    }
}

fn parse_var<F, T>(lookup: &F, key: &str, default: T) -> Result<T, ImportError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ImportError::Config(format!("{key} must be a valid number, got {raw:?}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use std::collections::HashMap;

    fn load(pairs: &[(&str, &str)]) -> Result<ImporterConfig, ImportError> {
        let env: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ImporterConfig::from_lookup(|key| env.get(key).cloned())
    }

    #[test]
    fn defaults_apply_when_unset() {
        let config = load(&[]).unwrap();
        assert_eq!(config.db.host, "localhost");
        assert_eq!(config.db.port, 5432);
        assert_eq!(config.db.name, "basler_hofmann");
        assert!(config.db.url.is_none());
        assert_eq!(config.validation, ValidationSettings::default());
    }

    #[test]
    fn overrides_are_read() {
        let config = load(&[("DB_HOST", "db.internal"), ("DB_PORT", "6543"), ("MIN_SEGMENT_LENGTH", "1.5")])
            .unwrap();
        assert_eq!(config.db.target(), "db.internal:6543/basler_hofmann");
        assert_eq!(config.validation.min_length, 1.5);
    }

    #[test]
    fn invalid_port_is_a_config_error() {
        assert_matches!(load(&[("DB_PORT", "abc")]), Err(ImportError::Config(msg)) if msg.contains("DB_PORT"));
    }

    #[test]
    fn inverted_envelope_is_rejected() {
        assert_matches!(
            load(&[("LV95_X_MIN", "2900000")]),
            Err(ImportError::Config(_))
        );
    }

    #[test]
    fn negative_min_length_is_rejected() {
        assert_matches!(load(&[("MIN_SEGMENT_LENGTH", "-1")]), Err(ImportError::Config(_)));
    }

    #[test]
    fn debug_output_redacts_password() {
        let config = load(&[("DB_PASSWORD", "geheim"), ("DATABASE_URL", "postgres://u:geheim@h/db")]).unwrap();
        let debug = format!("{:?}", config.db);
        assert!(!debug.contains("geheim"));
    }

    #[test]
    fn database_url_wins() {
        let config = load(&[("DATABASE_URL", "postgres://u:p@dbhost:5433/werk")]).unwrap();
        let options = config.db.connect_options().unwrap();
        assert_eq!(options.get_host(), "dbhost");
        assert_eq!(options.get_port(), 5433);
        assert_eq!(options.get_database(), Some("werk"));
    }

    #[test]
    fn malformed_url_is_a_config_error() {
        let config = load(&[("DATABASE_URL", "not a url")]).unwrap();
        assert_matches!(config.db.connect_options(), Err(ImportError::Config(_)));
    }
}
