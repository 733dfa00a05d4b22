mod cli;
mod input;
mod onboarding;
mod repl;
mod settings;

use std::path::Path;
use std::process::ExitCode;

use parley_ai::ChatClient;
use parley_common::{ConfigError, ParleyError, UserCredential};
use parley_config::schema::LogLevel;
use parley_config::{toml_loader, validation, ParleyConfig};
use parley_store::{resolve_credential, CredentialMirror, CredentialStore, SqliteCredentialStore};
use tracing_subscriber::EnvFilter;

use crate::cli::{Args, Command};

/// A config problem, held until logging is up.
#[derive(Debug)]
enum ConfigIssue {
    /// The file could not be read or parsed; defaults are in use.
    Unreadable(ConfigError),
    /// Some values are out of range; the parsed values are kept.
    Invalid(ConfigError),
}

/// Load config from the override path or the platform default.
///
/// Only an unreadable file falls back to defaults. Out-of-range values are
/// reported but kept, so user storage paths are never swapped for defaults.
fn load_config(path: Option<&str>) -> (ParleyConfig, Option<ConfigIssue>) {
    let loaded = match path {
        Some(path) => toml_loader::load_from_path(Path::new(path)),
        None => toml_loader::load_default(),
    };
    match loaded {
        Ok(config) => {
            let issue = validation::validate(&config).err().map(ConfigIssue::Invalid);
            (config, issue)
        }
        Err(e) => (ParleyConfig::default(), Some(ConfigIssue::Unreadable(e))),
    }
}

/// `--log-level` wins, then `RUST_LOG`, then the config's level.
fn init_logging(cli_level: Option<&str>, config_level: LogLevel) {
    let fallback = || EnvFilter::new(config_level.as_directive());
    let filter = match cli_level {
        Some(level) => EnvFilter::try_new(level).unwrap_or_else(|_| fallback()),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| fallback()),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

struct Credentials {
    store: SqliteCredentialStore,
    mirror: Option<CredentialMirror>,
}

impl Credentials {
    async fn open(config: &ParleyConfig) -> Result<Self, ParleyError> {
        let store = SqliteCredentialStore::new(config.storage.database_path()?);
        store.init().await.map_err(onboarding::store_error)?;
        let mirror = config.storage.mirror_path()?.map(CredentialMirror::new);
        tracing::debug!(database = %store.path().display(), "credential store opened");
        Ok(Self { store, mirror })
    }

    async fn resolve(&self) -> Option<UserCredential> {
        resolve_credential(&self.store, self.mirror.as_ref(), |key| {
            std::env::var(key).ok()
        })
        .await
    }
}

async fn run(args: Args, config: ParleyConfig) -> Result<(), ParleyError> {
    let mut stdout = std::io::stdout();

    match args.command() {
        Command::Config => {
            println!("{}", parley_config::config_to_json(&config));
            Ok(())
        }
        Command::Register { name, token } => {
            let credentials = Credentials::open(&config).await?;
            let credential = parley_store::register(
                &credentials.store,
                credentials.mirror.as_ref(),
                &name,
                &token,
            )
            .await
            .map_err(onboarding::registration_error)?;
            println!("Registered {}.", credential.name());
            Ok(())
        }
        Command::Whoami => {
            let credentials = Credentials::open(&config).await?;
            match credentials.resolve().await {
                Some(credential) => println!("{}", credential.name()),
                None => println!("No credential registered."),
            }
            Ok(())
        }
        Command::Chat => {
            let credentials = Credentials::open(&config).await?;
            let mut editor = input::editor()?;

            let credential = match credentials.resolve().await {
                Some(credential) => credential,
                None => {
                    match onboarding::prompt_registration(
                        &mut editor,
                        &mut stdout,
                        &credentials.store,
                        credentials.mirror.as_ref(),
                    )
                    .await?
                    {
                        Some(credential) => credential,
                        None => return Ok(()),
                    }
                }
            };
            tracing::info!(name = %credential.name(), "starting chat");

            let mut client = ChatClient::initialize(Some(&credential), settings::chat_settings(&config))?;
            let mut session = settings::new_session(&config);
            repl::run_chat(
                &mut editor,
                &mut stdout,
                &mut session,
                &mut client,
                credential.name(),
            )
            .await
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    // Load .env before anything reads the environment
    let _ = dotenvy::dotenv();

    let args = cli::parse();
    let (config, config_issue) = load_config(args.config.as_deref());
    init_logging(args.log_level.as_deref(), config.logging.level);

    tracing::info!("parley v{} starting...", env!("CARGO_PKG_VERSION"));
    match config_issue {
        Some(ConfigIssue::Unreadable(e)) => {
            tracing::warn!("Config load failed, using defaults: {e}")
        }
        Some(ConfigIssue::Invalid(e)) => {
            tracing::warn!("Config has invalid values, keeping them as parsed: {e}")
        }
        None => {}
    }

    match run(args, config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e}");
            eprintln!("parley: {e}");
            ExitCode::FAILURE
        }
    }
}
