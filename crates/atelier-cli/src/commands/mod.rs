//! Command dispatch. Each command builds on one `UserSession` whose
//! navigator reflects where the command "is": login and register act from
//! the login page, everything else from the admin area.

mod auth;
mod content;

use std::sync::Arc;

use anyhow::Result;
use atelier_core::{Navigator, TrackingNavigator, UserSession};
use serde::Serialize;
use tracing::debug;

use crate::cli::{Cli, Commands};
use crate::config::Config;

pub struct Context {
    pub config: Config,
    pub user: UserSession,
    pub navigator: Arc<TrackingNavigator>,
}

impl Context {
    pub fn open(mut config: Config, api_base: Option<String>, path: &str) -> Result<Self> {
        if api_base.is_some() {
            config.api_base = api_base;
        }
        let (persistent, session) = config.storage_areas()?;
        let navigator = Arc::new(TrackingNavigator::new(path));
        let user = UserSession::new(config.client_config(), persistent, session, navigator.clone())?;
        Ok(Self {
            config,
            user,
            navigator,
        })
    }

    /// Fail early for commands that need a session.
    pub fn require_login(&self) -> Result<()> {
        if !self.user.is_logged_in() {
            anyhow::bail!("Not logged in. Run `atelier login` first.");
        }
        Ok(())
    }
}

pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub async fn run(cli: Cli, config: Config) -> Result<()> {
    let path = match cli.command {
        Commands::Login { .. } => "/login",
        Commands::Register { .. } => "/register",
        _ => "/admin",
    };
    let ctx = Context::open(config, cli.api_base, path)?;

    if let Some(message) = ctx.user.take_login_message()? {
        eprintln!("{}", message);
    }

    let result = match cli.command {
        Commands::Login { username, remember } => auth::login(&ctx, username, remember).await,
        Commands::Register {
            username,
            email,
            remember,
        } => auth::register(&ctx, username, email, remember).await,
        Commands::Logout => auth::logout(&ctx),
        Commands::Whoami => auth::whoami(&ctx),
        Commands::Verify => auth::verify(&ctx).await,
        Commands::Permissions => auth::permissions(&ctx).await,
        Commands::Clothing { command } => content::clothing(&ctx, command).await,
        Commands::Media { command } => content::media(&ctx, command).await,
        Commands::Upload { files, target } => content::upload(&ctx, files, target).await,
        Commands::Settings { section } => content::settings(&ctx, section).await,
    };

    let location = ctx.navigator.location();
    if location != path {
        debug!(location = %location, "Session ended during command");
        if ctx.navigator.current_path() == ctx.user.client().config().login_path {
            eprintln!("Run `atelier login` to sign in again.");
        }
    }
    result
}
