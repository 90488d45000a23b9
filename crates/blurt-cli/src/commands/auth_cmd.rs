use blurt_core::auth::SessionPersistence;
use blurt_core::services::SignUpOutcome;

use crate::auth::KeyringSessionStore;
use crate::cli::AuthCommands;
use crate::commands::common::build_backend;
use crate::config_profiles::{CliProfile, CliProfilesConfig};
use crate::error::CliError;

pub async fn run_auth(command: AuthCommands, global_profile: Option<&str>) -> Result<(), CliError> {
    match command {
        AuthCommands::Signup {
            profile,
            email,
            password,
        } => run_signup(profile.as_deref().or(global_profile), &email, &password).await,
        AuthCommands::Login {
            profile,
            email,
            password,
        } => run_login(profile.as_deref().or(global_profile), &email, &password).await,
        AuthCommands::Status { profile } => run_status(profile.as_deref().or(global_profile)),
        AuthCommands::Logout { profile } => run_logout(profile.as_deref().or(global_profile)).await,
    }
}

fn resolve_profile(requested: Option<&str>) -> Result<(String, CliProfile), CliError> {
    let config = CliProfilesConfig::load().map_err(CliError::Config)?;
    let profile_name = config.resolve_profile_name(requested);
    let profile = config.profile(&profile_name).cloned().unwrap_or_default();
    Ok((profile_name, profile))
}

fn unconfigured(profile_name: &str) -> CliError {
    CliError::Config(format!(
        "Profile '{profile_name}' has no backend configured. Run `blurt config init --profile {profile_name}` first."
    ))
}

async fn run_signup(
    requested: Option<&str>,
    email: &str,
    password: &str,
) -> Result<(), CliError> {
    let (profile_name, profile) = resolve_profile(requested)?;
    let Some(backend) = build_backend(&profile_name, &profile)? else {
        return Err(unconfigured(&profile_name));
    };

    match backend.accounts.sign_up(email, password).await? {
        SignUpOutcome::SignedIn(user) => {
            println!("Signed up profile '{profile_name}' as {}", user.email);
        }
        SignUpOutcome::ConfirmationRequired => {
            println!(
                "Account created. Check your inbox to confirm the address, then run `blurt auth login`."
            );
        }
    }
    Ok(())
}

async fn run_login(requested: Option<&str>, email: &str, password: &str) -> Result<(), CliError> {
    let (profile_name, profile) = resolve_profile(requested)?;
    let Some(backend) = build_backend(&profile_name, &profile)? else {
        return Err(unconfigured(&profile_name));
    };

    let user = backend.accounts.sign_in(email, password).await?;
    println!("Signed in profile '{profile_name}' as {}", user.email);
    Ok(())
}

fn run_status(requested: Option<&str>) -> Result<(), CliError> {
    let (profile_name, profile) = resolve_profile(requested)?;
    let Some(backend) = build_backend(&profile_name, &profile)? else {
        println!("Profile '{profile_name}' is not configured.");
        return Ok(());
    };

    match backend.accounts.current_session() {
        Some(session) => {
            let email = session.email.as_deref().unwrap_or("(no email)");
            println!(
                "Profile '{profile_name}' is signed in as {email} (expires_at={})",
                session.expires_at
            );
        }
        None => println!("Profile '{profile_name}' is not signed in."),
    }
    Ok(())
}

async fn run_logout(requested: Option<&str>) -> Result<(), CliError> {
    let (profile_name, profile) = resolve_profile(requested)?;
    match build_backend(&profile_name, &profile)? {
        Some(backend) => backend.accounts.sign_out().await?,
        None => {
            // No backend to revoke against; still drop any stored session.
            KeyringSessionStore::new(&profile_name)
                .clear_session()
                .map_err(|error| CliError::Auth(error.to_string()))?;
        }
    }
    println!("Signed out profile '{profile_name}'");
    Ok(())
}
