// SPDX-FileCopyrightText: 2026 SecurePass Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SecurePass - an offline encrypted credential vault.
//!
//! This is the command-line front end. Every command opens the vault,
//! unlocks it if needed, does one thing and locks it again.

mod commands;
mod prompt;

use std::io::Write;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use secrecy::SecretString;
use securepass_config::SecurePassConfig;
use securepass_core::{EntryId, SecurePassError};
use securepass_vault::VaultSession;

/// SecurePass - an offline encrypted credential vault.
#[derive(Parser, Debug)]
#[command(name = "securepass", version, about, long_about = None)]
#[command(after_help = "EXAMPLES:
  securepass init                         Create a vault and set the master passphrase
  securepass add GitHub -u octocat        Add an entry (prompts for the password)
  securepass search git                   Find entries by service or username
  securepass export backup                Write an encrypted backup.spx

The master passphrase is read from SECUREPASS_VAULT_KEY when set.")]
struct Cli {
    /// Read configuration from this file instead of the standard locations.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Vault file to open (overrides storage.database_path).
    #[arg(long, global = true)]
    vault: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Create the vault and set the master passphrase.
    Init,
    /// Add a credential.
    Add {
        /// Service name, e.g. "GitHub".
        service: String,
        #[arg(short, long, default_value = "")]
        username: String,
        /// Password (prompted without echo when omitted).
        #[arg(short, long)]
        password: Option<String>,
        #[arg(short, long, default_value = "")]
        notes: String,
    },
    /// List all credentials.
    List {
        /// Print passwords in clear text.
        #[arg(long)]
        reveal: bool,
    },
    /// Search by service or username (case-insensitive substring).
    Search {
        query: String,
        #[arg(long)]
        reveal: bool,
    },
    /// Show one credential in full.
    Show {
        id: EntryId,
        #[arg(long)]
        reveal: bool,
    },
    /// Change fields of a credential. Omitted fields keep their value.
    Update {
        id: EntryId,
        #[arg(long)]
        service: Option<String>,
        #[arg(short, long)]
        username: Option<String>,
        #[arg(short, long)]
        password: Option<String>,
        /// Prompt for a new password without echo.
        #[arg(long, conflicts_with = "password")]
        prompt_password: bool,
        #[arg(short, long)]
        notes: Option<String>,
    },
    /// Permanently delete a credential.
    Delete { id: EntryId },
    /// Show the activity log, most recent first.
    Log {
        /// Number of events (defaults to audit.default_limit).
        #[arg(short = 'n', long)]
        limit: Option<usize>,
    },
    /// Write an encrypted export file.
    Export { path: PathBuf },
    /// Add every entry from an export file.
    Import { path: PathBuf },
    /// Change the master passphrase and re-encrypt every entry.
    Passwd,
    /// Read or change vault settings (no passphrase needed).
    Settings {
        #[command(subcommand)]
        action: SettingsCommands,
    },
}

#[derive(Subcommand, Debug)]
enum SettingsCommands {
    /// Print one setting.
    Get { key: String },
    /// Set one setting.
    Set { key: String, value: String },
    /// Print all settings.
    List,
}

fn main() {
    let cli = Cli::parse();

    let loaded = match &cli.config {
        Some(path) => securepass_config::load_and_validate_path(path),
        None => securepass_config::load_and_validate(),
    };
    let mut config = match loaded {
        Ok(config) => config,
        Err(errors) => {
            securepass_config::render_errors(&errors);
            std::process::exit(2);
        }
    };
    if let Some(path) = &cli.vault {
        config.storage.database_path = path.to_string_lossy().into_owned();
    }

    init_tracing(&config.logging.level);

    if let Err(e) = run(cli.command, &config) {
        eprintln!("securepass: {e}");
        std::process::exit(1);
    }
}

/// Initializes the tracing subscriber. `RUST_LOG` takes precedence.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("securepass={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}

fn run(command: Commands, config: &SecurePassConfig) -> Result<(), SecurePassError> {
    let mut session = VaultSession::open(config)?;
    let mut out = std::io::stdout().lock();

    let result = match command {
        Commands::Init => init(&mut session, &mut out),
        Commands::Settings { action } => match action {
            SettingsCommands::Get { key } => commands::settings_get(&session, &key, &mut out),
            SettingsCommands::Set { key, value } => {
                commands::settings_set(&session, &key, &value, &mut out)
            }
            SettingsCommands::List => commands::settings_list(&session, &mut out),
        },
        command => {
            unlock(&mut session)?;
            let result = dispatch(&mut session, command, config, &mut out);
            session.lock();
            result
        }
    };
    session.close()?;
    result
}

fn init(session: &mut VaultSession, out: &mut impl Write) -> Result<(), SecurePassError> {
    if session.has_master_auth()? {
        return Err(SecurePassError::AlreadyInitialized);
    }
    let passphrase = prompt::get_new_passphrase(prompt::VAULT_KEY_ENV_VAR)?;
    session.setup(&passphrase)?;
    writeln!(out, "Vault created at {}.", session.path().display())
        .map_err(|e| SecurePassError::Internal(format!("failed to write output: {e}")))
}

fn unlock(session: &mut VaultSession) -> Result<(), SecurePassError> {
    if !session.has_master_auth()? {
        return Err(SecurePassError::NotInitialized);
    }
    let passphrase: SecretString = prompt::get_vault_passphrase()?;
    if session.unlock(&passphrase)? {
        Ok(())
    } else {
        Err(SecurePassError::AuthenticationFailed)
    }
}

fn dispatch(
    session: &mut VaultSession,
    command: Commands,
    config: &SecurePassConfig,
    out: &mut impl Write,
) -> Result<(), SecurePassError> {
    match command {
        Commands::Add {
            service,
            username,
            password,
            notes,
        } => {
            let password = match password {
                Some(p) => p,
                None => prompt::get_entry_password()?,
            };
            commands::add(session, &service, &username, &password, &notes, out)
        }
        Commands::List { reveal } => commands::list(session, reveal, out),
        Commands::Search { query, reveal } => commands::search(session, &query, reveal, out),
        Commands::Show { id, reveal } => commands::show(session, id, reveal, out),
        Commands::Update {
            id,
            service,
            username,
            password,
            prompt_password,
            notes,
        } => {
            let password = if prompt_password {
                Some(prompt::get_entry_password()?)
            } else {
                password
            };
            commands::update(
                session,
                commands::UpdateArgs {
                    id,
                    service,
                    username,
                    password,
                    notes,
                },
                out,
            )
        }
        Commands::Delete { id } => commands::delete(session, id, out),
        Commands::Log { limit } => {
            commands::log(session, limit.unwrap_or(config.audit.default_limit), out)
        }
        Commands::Export { path } => commands::export(session, &path, out),
        Commands::Import { path } => commands::import(session, &path, out),
        Commands::Passwd => {
            let current = prompt::get_vault_passphrase()?;
            let new = prompt::get_new_passphrase(prompt::NEW_VAULT_KEY_ENV_VAR)?;
            if session.change_passphrase(&current, &new)? {
                writeln!(out, "Master passphrase changed.")
                    .map_err(|e| SecurePassError::Internal(format!("failed to write output: {e}")))
            } else {
                Err(SecurePassError::AuthenticationFailed)
            }
        }
        Commands::Init | Commands::Settings { .. } => Ok(()),
    }
}
