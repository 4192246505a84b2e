use anyhow::Context;
use camino::{
    Utf8Path,
    Utf8PathBuf,
};
use serde::Deserialize;
use serenity::utils::validate_token;
use std::{
    borrow::Cow,
    collections::HashMap,
};

fn default_data_dir() -> Utf8PathBuf {
    Utf8PathBuf::from("./data")
}

/// The name of the chart file in the data dir
const CHART_FILE_NAME: &str = "map_stats.png";

#[derive(Deserialize, Debug)]
pub struct Config {
    /// The discord bot token
    #[serde(default)]
    pub token: Option<String>,

    /// The discord application id
    #[serde(default)]
    pub application_id: Option<u64>,

    /// Register commands in this guild only, instead of globally
    #[serde(default)]
    pub guild_id: Option<u64>,

    /// Where logs and the chart live
    #[serde(default = "default_data_dir")]
    pub data_dir: Utf8PathBuf,

    /// The ubisoft account used to query stats
    #[serde(default)]
    pub ubisoft: Option<UbisoftConfig>,

    #[serde(flatten)]
    pub extra: HashMap<String, toml::Value>,
}

/// A ubisoft login
#[derive(Deserialize, Clone)]
pub struct UbisoftConfig {
    pub email: String,
    pub password: String,
}

impl std::fmt::Debug for UbisoftConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UbisoftConfig")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            token: None,
            application_id: None,
            guild_id: None,
            data_dir: default_data_dir(),
            ubisoft: None,
            extra: HashMap::new(),
        }
    }
}

impl Config {
    /// Get the token, or an empty string if there is none
    pub fn token(&self) -> &str {
        self.token.as_deref().unwrap_or("")
    }

    /// The dir logs are written to
    pub fn log_file_dir(&self) -> Utf8PathBuf {
        self.data_dir.join("logs")
    }

    /// The path the chart is written to.
    ///
    /// This is the same for every request.
    pub fn chart_path(&self) -> Utf8PathBuf {
        self.data_dir.join(CHART_FILE_NAME)
    }

    /// Load a config from a path
    pub fn load_from_path(path: &Utf8Path) -> anyhow::Result<Self> {
        std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config from \"{path}\""))
            .and_then(|s| Self::load_from_str(&s))
    }

    /// Load a config from a str
    pub fn load_from_str(s: &str) -> anyhow::Result<Self> {
        toml::from_str(s).context("failed to parse config")
    }

    /// Override fields with environment variables.
    ///
    /// `lookup` returns the value of a variable, if set.
    pub fn apply_env<F>(&mut self, lookup: F) -> anyhow::Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(token) = lookup("DISCORD_TOKEN") {
            self.token = Some(token);
        }

        if let Some(application_id) = lookup("APP_ID") {
            self.application_id = Some(
                application_id
                    .parse()
                    .context("APP_ID is not a valid id")?,
            );
        }

        if let Some(guild_id) = lookup("GUILD_ID") {
            self.guild_id = Some(guild_id.parse().context("GUILD_ID is not a valid id")?);
        }

        match (lookup("EMAIL"), lookup("PASSWORD")) {
            (Some(email), Some(password)) => {
                self.ubisoft = Some(UbisoftConfig { email, password });
            }
            (Some(email), None) => {
                if let Some(ubisoft) = self.ubisoft.as_mut() {
                    ubisoft.email = email;
                }
            }
            (None, Some(password)) => {
                if let Some(ubisoft) = self.ubisoft.as_mut() {
                    ubisoft.password = password;
                }
            }
            (None, None) => {}
        }

        Ok(())
    }

    /// Validate a config
    pub fn validate(&self) -> Vec<ValidationMessage> {
        let mut errors = Vec::new();

        match self.token.as_deref() {
            None => {
                errors.push(ValidationMessage {
                    severity: Severity::Error,
                    error: ValidationError::MissingToken,
                });
            }
            Some(token) => {
                if validate_token(token).is_err() {
                    errors.push(ValidationMessage {
                        severity: Severity::Error,
                        error: ValidationError::InvalidToken,
                    });
                }
            }
        }

        match self.ubisoft.as_ref() {
            None => {
                errors.push(ValidationMessage {
                    severity: Severity::Warn,
                    error: ValidationError::MissingUbisoftCredentials,
                });
            }
            Some(ubisoft) if ubisoft.email.is_empty() || ubisoft.password.is_empty() => {
                errors.push(ValidationMessage {
                    severity: Severity::Warn,
                    error: ValidationError::EmptyUbisoftCredentials,
                });
            }
            Some(_) => {}
        }

        for key in self.extra.keys() {
            errors.push(ValidationMessage {
                severity: Severity::Warn,
                error: ValidationError::Generic(format!("unknown key \"{key}\"").into()),
            });
        }

        errors
    }
}

#[derive(Debug)]
pub struct ValidationMessage {
    severity: Severity,
    error: ValidationError,
}

impl ValidationMessage {
    pub fn severity(&self) -> Severity {
        self.severity
    }

    pub fn error(&self) -> &ValidationError {
        &self.error
    }
}

#[derive(Debug)]
pub enum ValidationError {
    MissingToken,
    InvalidToken,
    MissingUbisoftCredentials,
    EmptyUbisoftCredentials,

    Generic(Cow<'static, str>),
}

impl ValidationError {
    /// Whether this only matters when connecting to discord
    pub fn is_discord_only(&self) -> bool {
        matches!(self, Self::MissingToken | Self::InvalidToken)
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::MissingToken => write!(f, "Missing Token"),
            ValidationError::InvalidToken => write!(f, "Invalid Token"),
            ValidationError::MissingUbisoftCredentials => {
                write!(f, "Missing Ubisoft Credentials, /map will not work")
            }
            ValidationError::EmptyUbisoftCredentials => {
                write!(f, "Empty Ubisoft Email or Password")
            }
            ValidationError::Generic(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for ValidationError {}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Severity {
    Warn,
    Error,
}

#[cfg(test)]
mod test {
    use super::*;

    const CONFIG: &str = r#"
token = "file-token"
application_id = 1000
guild_id = 2000
data_dir = "/var/lib/jackal"

[ubisoft]
email = "bot@example.com"
password = "hunter2"
"#;

    fn env<'a>(vars: &'a [(&'a str, &'a str)]) -> impl Fn(&str) -> Option<String> + 'a {
        move |key| {
            vars.iter()
                .find(|(k, _)| *k == key)
                .map(|(_, v)| v.to_string())
        }
    }

    #[test]
    fn parse() {
        let config = Config::load_from_str(CONFIG).expect("failed to parse");
        assert_eq!(config.token(), "file-token");
        assert_eq!(config.application_id, Some(1000));
        assert_eq!(config.guild_id, Some(2000));
        assert_eq!(config.chart_path(), "/var/lib/jackal/map_stats.png");
        assert_eq!(config.log_file_dir(), "/var/lib/jackal/logs");

        let ubisoft = config.ubisoft.as_ref().expect("missing ubisoft");
        assert_eq!(ubisoft.email, "bot@example.com");
        assert!(!format!("{ubisoft:?}").contains("hunter2"));
    }

    #[test]
    fn env_overrides_file() {
        let mut config = Config::load_from_str(CONFIG).expect("failed to parse");
        config
            .apply_env(env(&[
                ("DISCORD_TOKEN", "env-token"),
                ("GUILD_ID", "3000"),
                ("PASSWORD", "correct horse"),
            ]))
            .expect("failed to apply env");

        assert_eq!(config.token(), "env-token");
        assert_eq!(config.application_id, Some(1000));
        assert_eq!(config.guild_id, Some(3000));

        let ubisoft = config.ubisoft.as_ref().expect("missing ubisoft");
        assert_eq!(ubisoft.email, "bot@example.com");
        assert_eq!(ubisoft.password, "correct horse");
    }

    #[test]
    fn env_only() {
        let mut config = Config::default();
        config
            .apply_env(env(&[("EMAIL", "a@example.com"), ("PASSWORD", "b")]))
            .expect("failed to apply env");

        assert_eq!(config.data_dir, "./data");
        assert!(config.ubisoft.is_some());

        let errors = config.validate();
        assert!(errors
            .iter()
            .any(|e| matches!(e.error(), ValidationError::MissingToken)));
        assert!(errors.iter().all(|e| e.error().is_discord_only()));
    }

    #[test]
    fn bad_env_id() {
        let mut config = Config::default();
        let result = config.apply_env(env(&[("APP_ID", "jackal")]));
        assert!(result.is_err());
    }

    #[test]
    fn token_format() {
        let config = Config::load_from_str(CONFIG).expect("failed to parse");
        assert!(config
            .validate()
            .iter()
            .any(|e| matches!(e.error(), ValidationError::InvalidToken)));

        let config = Config {
            token: Some("MTA0NTI5NDc2ODIzOTc5MDIyNQ.GqVb3x.Wc9xY2kq1lZsT0bJd8fHnQe4uRpVmA7sKcE3oI".into()),
            ..Config::default()
        };
        assert!(config
            .validate()
            .iter()
            .all(|e| !e.error().is_discord_only()));
    }

    #[test]
    fn missing_credentials_warn() {
        let config = Config::default();
        let errors = config.validate();
        let warning = errors
            .iter()
            .find(|e| matches!(e.error(), ValidationError::MissingUbisoftCredentials))
            .expect("missing warning");
        assert_eq!(warning.severity(), Severity::Warn);
    }
}
