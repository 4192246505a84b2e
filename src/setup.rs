use crate::config::{
    Config,
    Severity,
};
use anyhow::{
    ensure,
    Context,
};
use camino::Utf8Path;

/// Load a config.
///
/// A missing file is not an error, as everything can come from the environment.
/// Environment variables, including those in a `.env` file, override the file.
///
/// This prints to the stderr directly.
/// It is intended to be called BEFORE the loggers are set up.
pub(crate) fn load_config(path: &Utf8Path, needs_discord: bool) -> anyhow::Result<Config> {
    match dotenvy::dotenv() {
        Ok(path) => eprintln!("loaded `{}`", path.display()),
        Err(error) if error.not_found() => {}
        Err(error) => return Err(error).context("failed to load .env"),
    }

    let mut config = if path.exists() {
        eprintln!("loading `{}`...", path);
        Config::load_from_path(path).with_context(|| format!("failed to load `{}`", path))?
    } else {
        eprintln!("`{}` does not exist, using the environment only", path);
        Config::default()
    };

    config
        .apply_env(|key| std::env::var(key).ok())
        .context("failed to read config from the environment")?;

    eprintln!("validating config...");
    let errors = config.validate();
    let mut error_count = 0;
    for e in errors {
        if !needs_discord && e.error().is_discord_only() {
            continue;
        }

        match e.severity() {
            Severity::Warn => {
                eprintln!("validation warning: {}", e.error());
            }
            Severity::Error => {
                eprintln!("validation error: {}", e.error());
                error_count += 1;
            }
        }
    }

    ensure!(
        error_count == 0,
        "validation failed with {error_count} errors."
    );

    Ok(config)
}
