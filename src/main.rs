#![deny(
    unused_import_braces,
    unused_lifetimes,
    trivial_numeric_casts,
    missing_debug_implementations,
    missing_copy_implementations,
    deprecated_in_future,
    meta_variable_misuse,
    non_ascii_idents,
    rust_2018_compatibility,
    rust_2018_idioms,
    future_incompatible,
    nonstandard_style,
    clippy::all
)]
#![warn(variant_size_differences, let_underscore_drop)]

//! # Jackal

pub mod cli_options;
pub mod client_data;
pub mod commands;
pub mod config;
pub mod logger;
pub mod map_stats;
pub mod report;
pub mod season;
pub mod setup;
pub mod stats_provider;
pub mod util;

use crate::{
    cli_options::{
        CliOptions,
        Subcommand,
    },
    client_data::ClientData,
    config::Config,
};
use anyhow::{
    bail,
    Context as _,
};
use serenity::{
    gateway::ShardManager,
    model::prelude::*,
    prelude::*,
};
use std::{
    sync::Arc,
    time::{
        Duration,
        Instant,
    },
};
use tokio::runtime::Builder as RuntimeBuilder;
use tracing::{
    error,
    info,
    warn,
};
use tracing_appender::non_blocking::WorkerGuard;

const TOKIO_RT_SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(10);

pub type PoiseContext<'a> = poise::Context<'a, ClientData, PoiseError>;
pub type PoiseError = anyhow::Error;

async fn handle_ctrl_c(shard_manager: Arc<ShardManager>) {
    match tokio::signal::ctrl_c()
        .await
        .context("failed to set ctrl-c handler")
    {
        Ok(_) => {
            info!("shutting down...");
            info!("stopping client...");
            shard_manager.shutdown_all().await;
        }
        Err(error) => {
            warn!("{error}");
        }
    };
}

async fn on_error(error: poise::FrameworkError<'_, ClientData, PoiseError>) {
    match error {
        poise::FrameworkError::Command { error, ctx, .. } => {
            error!("failed to process command \"{}\": {error:?}", ctx.command().name);
        }
        error => {
            if let Err(error) = poise::builtins::on_error(error).await {
                error!("failed to handle framework error: {error}");
            }
        }
    }
}

/// Set up a serenity client
async fn setup_client(config: Arc<Config>) -> anyhow::Result<Client> {
    let setup_config = config.clone();
    let framework = poise::Framework::builder()
        .options(poise::FrameworkOptions {
            commands: vec![commands::help(), commands::map()],
            on_error: |error| Box::pin(on_error(error)),
            pre_command: |ctx| {
                Box::pin(async move {
                    info!(
                        author = %ctx.author().id,
                        guild = ?ctx.guild_id(),
                        "processing command \"{}\"",
                        ctx.command().name
                    );
                })
            },
            ..Default::default()
        })
        .setup(move |ctx, ready, framework| {
            Box::pin(async move {
                info!("logged in as \"{}\"", ready.user.name);

                let commands = &framework.options().commands;
                match setup_config.guild_id {
                    Some(guild_id) => {
                        poise::builtins::register_in_guild(ctx, commands, GuildId::new(guild_id))
                            .await
                            .context("failed to register slash commands in guild")?;
                    }
                    None => {
                        poise::builtins::register_globally(ctx, commands)
                            .await
                            .context("failed to register slash commands")?;
                    }
                }
                info!("registered slash commands");

                ClientData::init(setup_config).context("client data initialization failed")
            })
        })
        .build();

    let mut client_builder = Client::builder(config.token(), GatewayIntents::non_privileged())
        .framework(framework);
    if let Some(application_id) = config.application_id {
        client_builder = client_builder.application_id(ApplicationId::new(application_id));
    }
    let client = client_builder.await.context("failed to create client")?;

    tokio::spawn(handle_ctrl_c(client.shard_manager.clone()));

    Ok(client)
}

/// Data from the setup function
struct SetupData {
    tokio_rt: tokio::runtime::Runtime,
    config: Arc<Config>,
    subcommand: Option<Subcommand>,
    worker_guard: WorkerGuard,
}

/// Pre-main setup
fn setup(cli_options: CliOptions) -> anyhow::Result<SetupData> {
    eprintln!("starting tokio runtime...");
    let tokio_rt = RuntimeBuilder::new_multi_thread()
        .enable_all()
        .thread_name("jackal-tokio-worker")
        .build()
        .context("failed to start tokio runtime")?;

    let needs_discord = cli_options.subcommand.is_none();
    let config = setup::load_config(&cli_options.config, needs_discord)
        .map(Arc::new)
        .context("failed to load config")?;

    eprintln!("opening data directory...");
    match std::fs::metadata(&config.data_dir) {
        Ok(metadata) if metadata.is_dir() => {
            eprintln!("data directory already exists.");
        }
        Ok(_) => {
            bail!("failed to create or open data directory, the path is not a directory");
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            eprintln!("data directory does not exist. creating...");
            std::fs::create_dir_all(&config.data_dir).context("failed to create data directory")?;
        }
        Err(e) => {
            return Err(e).context("failed to get metadata for the data dir");
        }
    }

    std::fs::create_dir_all(config.log_file_dir()).context("failed to create log file dir")?;

    // Everything past here is assumed to need tokio
    let _enter_guard = tokio_rt.handle().enter();

    eprintln!("setting up logger...");
    let worker_guard = logger::setup(&config).context("failed to initialize logger")?;

    eprintln!();
    Ok(SetupData {
        tokio_rt,
        config,
        subcommand: cli_options.subcommand,
        worker_guard,
    })
}

/// The main entry.
///
/// Sets up the program and calls `real_main`.
/// This allows more things to drop correctly.
/// Setup errors go to the stderr, as the loggers are not initialized yet.
fn main() -> anyhow::Result<()> {
    // This line MUST run first.
    // It exits early if the options are invalid, and will NOT run destructors if it does so.
    let cli_options = argh::from_env();

    let setup_data = setup(cli_options)?;
    real_main(setup_data)?;
    Ok(())
}

/// The actual entry point
fn real_main(setup_data: SetupData) -> anyhow::Result<()> {
    let SetupData {
        tokio_rt,
        config,
        subcommand,
        worker_guard,
    } = setup_data;

    let ret = tokio_rt
        .block_on(tokio::spawn(async move {
            match subcommand {
                Some(Subcommand::MapStats(options)) => report::run(&config, &options).await,
                None => async_main(config).await,
            }
        }))
        .context("main task panicked");

    let shutdown_start = Instant::now();
    info!(
        "shutting down tokio runtime (shutdown timeout is {:?})...",
        TOKIO_RT_SHUTDOWN_TIMEOUT
    );
    tokio_rt.shutdown_timeout(TOKIO_RT_SHUTDOWN_TIMEOUT);
    info!("shutdown tokio runtime in {:?}", shutdown_start.elapsed());

    info!("successful shutdown");

    // Logging no longer reliable past this point
    drop(worker_guard);

    ret?
}

/// The async entry
async fn async_main(config: Arc<Config>) -> anyhow::Result<()> {
    info!("setting up client...");
    let mut client = setup_client(config)
        .await
        .context("failed to set up client")?;

    info!("logging in...");
    client.start().await.context("failed to run client")?;

    Ok(())
}
