use std::env;

use crate::cli::ConfigCommands;
use crate::config_profiles::{
    default_config_path, is_http_url, normalize_text_option, CliProfilesConfig,
};
use crate::error::CliError;

pub fn run_config(command: ConfigCommands, global_profile: Option<&str>) -> Result<(), CliError> {
    match command {
        ConfigCommands::Init {
            profile,
            backend_url,
            api_key,
            no_activate,
        } => run_config_init(global_profile, profile, backend_url, api_key, no_activate),
    }
}

fn run_config_init(
    global_profile: Option<&str>,
    profile: Option<String>,
    backend_url: Option<String>,
    api_key: Option<String>,
    no_activate: bool,
) -> Result<(), CliError> {
    let path = default_config_path();
    let mut config = CliProfilesConfig::load_from_path(&path).map_err(CliError::Config)?;
    let profile_name = config.resolve_profile_name(profile.as_deref().or(global_profile));
    let existing = config.profile(&profile_name).cloned().unwrap_or_default();

    let backend_url = merge_setting(
        backend_url,
        env::var("BLURT_BACKEND_URL").ok(),
        existing.backend_url(),
    );
    let api_key = merge_setting(api_key, env::var("BLURT_API_KEY").ok(), existing.api_key());

    if let Some(url) = backend_url.as_deref() {
        if !is_http_url(url) {
            return Err(CliError::Config(format!(
                "Backend URL must start with http:// or https://, got: {url}"
            )));
        }
    }

    let entry = config.profile_mut_or_default(&profile_name);
    entry.backend_url = backend_url.clone();
    entry.api_key = api_key.clone();

    if !no_activate {
        config.active_profile = Some(profile_name.clone());
    }
    config.save_to_path(&path).map_err(CliError::Config)?;

    println!("Profile '{profile_name}' initialized at {}", path.display());
    if backend_url.is_some() && api_key.is_some() {
        println!("Backend is configured. Run `blurt auth login` to sign in.");
    } else {
        let mut missing = Vec::new();
        if backend_url.is_none() {
            missing.push("--backend-url");
        }
        if api_key.is_none() {
            missing.push("--api-key");
        }
        println!(
            "Still missing: {}. Re-run `blurt config init` with the flags above.",
            missing.join(", ")
        );
    }
    Ok(())
}

/// Explicit flag wins, then environment, then whatever the profile
/// already has.
fn merge_setting(
    explicit: Option<String>,
    env_value: Option<String>,
    existing: Option<String>,
) -> Option<String> {
    normalize_text_option(explicit)
        .or_else(|| normalize_text_option(env_value))
        .or(existing)
}
