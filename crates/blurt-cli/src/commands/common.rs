use std::env;
use std::io::{self, IsTerminal, Read};
use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use blurt_core::auth::{resolve_optional_backend_config, AuthClient};
use blurt_core::services::{AccountService, PostService};
use blurt_core::store::{DocumentStore, RestDocumentStore};
use blurt_core::{Post, SessionHandle};
use chrono::Utc;
use serde::Serialize;

use crate::auth::KeyringSessionStore;
use crate::config_profiles::{CliProfile, CliProfilesConfig};
use crate::error::CliError;

/// Services wired up for one profile's backend.
pub struct Backend {
    pub accounts: AccountService,
    pub posts: PostService,
    pub profile_name: String,
}

/// Connects to the backend of the resolved profile.
///
/// Restores any keychain session along the way, so commands that follow
/// act as the signed-in user.
pub fn connect(global_profile: Option<&str>) -> Result<Backend, CliError> {
    let config = CliProfilesConfig::load().map_err(CliError::Config)?;
    let profile_name = config.resolve_profile_name(global_profile);
    let profile = config.profile(&profile_name).cloned().unwrap_or_default();
    build_backend(&profile_name, &profile)?.ok_or(CliError::BackendNotConfigured)
}

/// Builds services for `profile`, or `None` when it has no backend
/// configured.
pub fn build_backend(
    profile_name: &str,
    profile: &CliProfile,
) -> Result<Option<Backend>, CliError> {
    let Some((url, api_key)) =
        resolve_optional_backend_config(profile.backend_url(), profile.api_key())
            .map_err(|error| CliError::Config(error.to_string()))?
    else {
        return Ok(None);
    };
    tracing::debug!("Profile '{profile_name}' uses backend {url}");

    let provider =
        AuthClient::new(&url, &api_key).map_err(|error| CliError::Config(error.to_string()))?;
    let store: Arc<dyn DocumentStore> = Arc::new(
        RestDocumentStore::new(&url, &api_key)
            .map_err(|error| CliError::Config(error.to_string()))?,
    );
    let sessions =
        SessionHandle::with_persistence(Arc::new(KeyringSessionStore::new(profile_name)));

    let accounts = AccountService::new(Arc::new(provider), Arc::clone(&store), sessions.clone());
    let posts = PostService::new(store, sessions);
    Ok(Some(Backend {
        accounts,
        posts,
        profile_name: profile_name.to_string(),
    }))
}

#[derive(Debug, Serialize)]
pub struct PostListItem {
    pub id: String,
    pub title: String,
    pub preview: String,
    pub content: String,
    pub timestamp: i64,
    pub relative_time: String,
}

pub fn post_to_list_item(post: &Post) -> PostListItem {
    let now_ms = Utc::now().timestamp_millis();
    PostListItem {
        id: post.id.clone().unwrap_or_default(),
        title: post.title.clone(),
        preview: content_preview(post, 80),
        content: post.content.clone(),
        timestamp: post.timestamp,
        relative_time: format_relative_time(post.timestamp, now_ms),
    }
}

/// One aligned row per post: full id, title preview, relative age.
///
/// Ids are printed whole because edit/delete take the exact id.
pub fn format_post_lines(posts: &[Post]) -> Vec<String> {
    let now_ms = Utc::now().timestamp_millis();
    posts
        .iter()
        .map(|post| {
            let id = post.id.clone().unwrap_or_default();
            let title = post.title_preview(32);
            let relative_time = format_relative_time(post.timestamp, now_ms);
            format!("{id:<36}  {title:<32}  {relative_time}")
        })
        .collect()
}

/// First line of the content, collapsed and truncated to `max_chars`.
pub fn content_preview(post: &Post, max_chars: usize) -> String {
    let first_line = post.content.lines().next().unwrap_or("").trim();
    let collapsed = first_line.split_whitespace().collect::<Vec<_>>().join(" ");

    if collapsed.chars().count() <= max_chars {
        collapsed
    } else {
        let take_len = max_chars.saturating_sub(3);
        let mut truncated = collapsed.chars().take(take_len).collect::<String>();
        truncated.push_str("...");
        truncated
    }
}

pub fn format_relative_time(timestamp_ms: i64, now_ms: i64) -> String {
    let diff = now_ms.saturating_sub(timestamp_ms);
    let minute = 60_000;
    let hour = 60 * minute;
    let day = 24 * hour;
    let week = 7 * day;
    let month = 30 * day;
    let year = 365 * day;

    if diff < minute {
        "just now".to_string()
    } else if diff < hour {
        format!("{}m ago", diff / minute)
    } else if diff < day {
        format!("{}h ago", diff / hour)
    } else if diff < week {
        format!("{}d ago", diff / day)
    } else if diff < month {
        format!("{}w ago", diff / week)
    } else if diff < year {
        format!("{}mo ago", diff / month)
    } else {
        format!("{}y ago", diff / year)
    }
}

/// Resolves post content from args, then piped stdin, then the editor.
pub fn resolve_post_content(content_parts: &[String]) -> Result<String, CliError> {
    if let Some(content) = normalize_content(&content_parts.join(" ")) {
        return Ok(content);
    }

    if let Some(content) = read_piped_stdin()? {
        return Ok(content);
    }

    if let Some(content) = capture_editor_input()? {
        return Ok(content);
    }

    Err(CliError::EmptyContent)
}

pub fn normalize_content(content: &str) -> Option<String> {
    let trimmed = content.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

pub fn read_piped_stdin() -> Result<Option<String>, CliError> {
    let stdin = io::stdin();
    if stdin.is_terminal() {
        return Ok(None);
    }

    let mut buffer = String::new();
    stdin.lock().read_to_string(&mut buffer)?;
    Ok(normalize_content(&buffer))
}

pub fn capture_editor_input() -> Result<Option<String>, CliError> {
    capture_editor_input_with_initial("")
}

pub fn capture_editor_input_with_initial(
    initial_content: &str,
) -> Result<Option<String>, CliError> {
    let editor = preferred_editor();
    let temp_file = create_temp_post_file_path();
    std::fs::write(&temp_file, initial_content)?;

    let launch_result = launch_editor(&editor, &temp_file);
    let post_content = std::fs::read_to_string(&temp_file)?;
    let _ = std::fs::remove_file(&temp_file);

    launch_result?;
    Ok(normalize_content(&post_content))
}

pub fn launch_editor(editor: &str, file_path: &Path) -> Result<(), CliError> {
    match Command::new(editor).arg(file_path).status() {
        Ok(status) => {
            if status.success() {
                Ok(())
            } else {
                Err(CliError::EditorFailed(format!(
                    "`{editor}` exited with status {status}"
                )))
            }
        }
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            // EDITOR may be a command with flags, e.g. "code --wait".
            let mut parts = editor.split_whitespace();
            let Some(program) = parts.next() else {
                return Err(CliError::EditorFailed("empty EDITOR command".into()));
            };

            let mut command = Command::new(program);
            command.args(parts).arg(file_path);

            let status = command.status()?;
            if status.success() {
                Ok(())
            } else {
                Err(CliError::EditorFailed(format!(
                    "`{editor}` exited with status {status}"
                )))
            }
        }
        Err(err) => Err(CliError::Io(err)),
    }
}

pub fn preferred_editor() -> String {
    env::var("VISUAL")
        .or_else(|_| env::var("EDITOR"))
        .unwrap_or_else(|_| default_editor().to_string())
}

pub const fn default_editor() -> &'static str {
    if cfg!(windows) {
        "notepad"
    } else {
        "vi"
    }
}

pub fn create_temp_post_file_path() -> PathBuf {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |duration| duration.as_nanos());
    env::temp_dir().join(format!("blurt-post-{}-{now}.md", std::process::id()))
}
