//! `atlas-admin`: provision and manage admin accounts out of band.
//!
//! Passwords are read from stdin (first line) so they never appear in shell
//! history or the process list.

use std::io::{self, BufRead};

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};

use atlas_api::auth::password::{
    validate_password_strength, PasswordHasher, MIN_PASSWORD_LENGTH,
};
use atlas_api::config::DatabaseConfig;
use atlas_api::telemetry::init_tracing;
use atlas_core::roles::ROLE_ADMIN;
use atlas_db::models::account::CreateAccount;
use atlas_db::store::constraints;
use atlas_db::{AccountStore, PgStore};

#[derive(Debug, Parser)]
#[command(name = "atlas-admin", version, about = "Manage Atlas admin accounts")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Create an account. Reads the password from stdin.
    CreateAccount {
        username: String,
        /// Role to grant; repeat for several.
        #[arg(long = "role", default_value = ROLE_ADMIN)]
        roles: Vec<String>,
    },
    /// Replace an account's password. Reads the new password from stdin.
    SetPassword { username: String },
    /// Block an account from logging in. Existing sessions are not revoked.
    Disable { username: String },
    /// Allow a disabled account to log in again.
    Enable { username: String },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing("atlas_admin=info,atlas_api=info");

    let cli = Cli::parse();

    let db = DatabaseConfig::from_env().context("Invalid database configuration")?;
    let pool = atlas_db::create_pool(&db.url, &db.name, 1)
        .await
        .context("Failed to connect to database")?;
    atlas_db::run_migrations(&pool)
        .await
        .context("Failed to run database migrations")?;

    let store = PgStore::new(pool);
    let result = run(cli.command, &store).await;
    store.pool().close().await;
    result
}

async fn run(command: Command, store: &PgStore) -> anyhow::Result<()> {
    match command {
        Command::CreateAccount { username, roles } => {
            if username.trim().is_empty() {
                bail!("username must not be empty");
            }
            let password_hash = hash_password_from_stdin().await?;
            let input = CreateAccount {
                username: username.clone(),
                password_hash,
                roles,
            };
            match store.create_account(&input).await {
                Ok(account) => {
                    tracing::info!(account_id = account.id, %username, roles = ?account.roles, "Account created");
                }
                Err(e) if e.is_duplicate_on(constraints::ACCOUNTS_USERNAME) => {
                    bail!("account {username} already exists");
                }
                Err(e) => return Err(e).context("Failed to create account"),
            }
        }
        Command::SetPassword { username } => {
            let password_hash = hash_password_from_stdin().await?;
            if !store.update_password(&username, &password_hash).await? {
                bail!("no account named {username}");
            }
            tracing::info!(%username, "Password updated");
        }
        Command::Disable { username } => set_disabled(store, &username, true).await?,
        Command::Enable { username } => set_disabled(store, &username, false).await?,
    }
    Ok(())
}

async fn set_disabled(store: &PgStore, username: &str, disabled: bool) -> anyhow::Result<()> {
    if !store.set_disabled(username, disabled).await? {
        bail!("no account named {username}");
    }
    tracing::info!(username, disabled, "Account updated");
    Ok(())
}

/// Read one line from stdin, check its strength, and hash it off the runtime.
async fn hash_password_from_stdin() -> anyhow::Result<String> {
    let mut line = String::new();
    io::stdin()
        .lock()
        .read_line(&mut line)
        .context("Failed to read password from stdin")?;
    let password = line.trim_end_matches(['\r', '\n']).to_string();

    validate_password_strength(&password, MIN_PASSWORD_LENGTH).map_err(anyhow::Error::msg)?;

    tokio::task::spawn_blocking(move || PasswordHasher::default().hash(&password))
        .await
        .context("Password hashing task failed")?
        .map_err(|e| anyhow::anyhow!("Failed to hash password: {e}"))
}
