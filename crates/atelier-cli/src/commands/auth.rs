use anyhow::{bail, Context as _, Result};
use atelier_core::auth::token;
use atelier_core::models::{LoginRequest, RegisterRequest};
use atelier_core::utils::format_expiry;
use chrono::Utc;
use serde_json::json;
use tracing::warn;

use super::{print_json, Context};

fn prompt_password(prompt: &str) -> Result<String> {
    let password = rpassword::prompt_password(prompt).context("Failed to read password")?;
    if password.is_empty() {
        bail!("Password must not be empty");
    }
    Ok(password)
}

pub async fn login(ctx: &Context, username: Option<String>, remember: bool) -> Result<()> {
    let username = match username.or_else(|| ctx.config.last_username.clone()) {
        Some(name) => name,
        None => bail!("No username given. Use `atelier login -u <name>`."),
    };
    let password = prompt_password(&format!("Password for {}: ", username))?;

    let request = LoginRequest {
        username: username.clone(),
        password,
    };
    ctx.user.login(&request, remember).await?;

    let mut config = ctx.config.clone();
    config.last_username = Some(username);
    if let Err(e) = config.save() {
        warn!(error = %e, "Failed to save config");
    }

    let store = ctx.user.credentials();
    println!(
        "Logged in as {} ({})",
        store.user_name(),
        store.role().label(Some(store.vip_level()))
    );
    Ok(())
}

pub async fn register(ctx: &Context, username: String, email: String, remember: bool) -> Result<()> {
    let password = prompt_password("Password: ")?;
    if prompt_password("Confirm password: ")? != password {
        bail!("Passwords do not match");
    }

    let request = RegisterRequest {
        username,
        email,
        password,
        role: None,
    };
    let envelope = ctx.user.register(&request, remember).await?;

    if ctx.user.is_logged_in() {
        println!("Registered and logged in as {}", ctx.user.credentials().user_name());
    } else {
        print_json(&envelope)?;
    }
    Ok(())
}

pub fn logout(ctx: &Context) -> Result<()> {
    ctx.user.logout()?;
    println!("Logged out");
    Ok(())
}

pub fn whoami(ctx: &Context) -> Result<()> {
    ctx.require_login()?;
    let store = ctx.user.credentials();
    let expires = store
        .token()
        .and_then(|t| token::expiry(&t))
        .map(|exp| format_expiry(exp, Utc::now()));

    print_json(&json!({
        "user": store.user_info(),
        "role": store.role().label(Some(store.vip_level())),
        "remembered": store.remember_me(),
        "tokenExpires": expires,
    }))
}

pub async fn verify(ctx: &Context) -> Result<()> {
    ctx.require_login()?;
    let envelope = ctx.user.client().verify_token().await?;
    print_json(&envelope)
}

pub async fn permissions(ctx: &Context) -> Result<()> {
    ctx.require_login()?;
    let keys = ctx.user.load_menu_permissions().await;
    print_json(&keys)
}
