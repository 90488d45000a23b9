use clap::CommandFactory;

use blurt_core::Post;

use crate::cli::{Cli, CompletionShell};
use crate::commands::common::{
    build_backend, content_preview, create_temp_post_file_path, default_editor,
    format_post_lines, format_relative_time, normalize_content, post_to_list_item,
};
use crate::commands::completions::generate_for_shell;
use crate::config_profiles::CliProfile;
use crate::error::CliError;

fn post(id: &str, title: &str, content: &str, timestamp: i64) -> Post {
    Post {
        id: Some(id.to_string()),
        title: title.to_string(),
        content: content.to_string(),
        timestamp,
        user_id: "user-1".to_string(),
    }
}

#[test]
fn cli_definition_is_consistent() {
    Cli::command().debug_assert();
}

#[test]
fn normalize_content_trims_and_rejects_blank() {
    assert_eq!(normalize_content(""), None);
    assert_eq!(normalize_content("   \n\t  "), None);
    assert_eq!(
        normalize_content("  hello world \n"),
        Some("hello world".to_string())
    );
}

#[test]
fn default_editor_is_defined() {
    assert!(!default_editor().is_empty());
}

#[test]
fn temp_post_files_are_markdown_and_unique() {
    let first = create_temp_post_file_path();
    let second = create_temp_post_file_path();

    let name = first.file_name().unwrap().to_string_lossy().into_owned();
    assert!(name.starts_with("blurt-post-"));
    assert!(name.ends_with(".md"));
    assert_ne!(first, second);
}

#[test]
fn relative_time_picks_the_largest_sensible_unit() {
    let now = 1_700_000_000_000_i64;
    let minute = 60_000_i64;
    let hour = 60 * minute;
    let day = 24 * hour;

    assert_eq!(format_relative_time(now - 30_000, now), "just now");
    assert_eq!(format_relative_time(now - 5 * minute, now), "5m ago");
    assert_eq!(format_relative_time(now - 3 * hour, now), "3h ago");
    assert_eq!(format_relative_time(now - 2 * day, now), "2d ago");
    assert_eq!(format_relative_time(now - 10 * day, now), "1w ago");
    assert_eq!(format_relative_time(now - 45 * day, now), "1mo ago");
    assert_eq!(format_relative_time(now - 400 * day, now), "1y ago");
}

#[test]
fn relative_time_never_goes_negative() {
    let now = 1_700_000_000_000_i64;
    assert_eq!(format_relative_time(now + 5_000, now), "just now");
}

#[test]
fn content_preview_uses_the_first_line_only() {
    let post = post("id", "t", "first line here\nsecond line", 0);
    assert_eq!(content_preview(&post, 80), "first line here");
}

#[test]
fn content_preview_collapses_whitespace_and_truncates() {
    let post = post("id", "t", "one   two\tthree four five six", 0);
    assert_eq!(content_preview(&post, 80), "one two three four five six");
    assert_eq!(content_preview(&post, 14), "one two thr...");
}

#[test]
fn list_items_carry_full_post_fields() {
    let post = post(
        "0192aaaa-bbbb-cccc-dddd-eeeeffff0000",
        "Morning thought",
        "coffee first\nthen everything else",
        1_700_000_000_000,
    );

    let item = post_to_list_item(&post);
    assert_eq!(item.id, "0192aaaa-bbbb-cccc-dddd-eeeeffff0000");
    assert_eq!(item.title, "Morning thought");
    assert_eq!(item.preview, "coffee first");
    assert_eq!(item.content, "coffee first\nthen everything else");
    assert_eq!(item.timestamp, 1_700_000_000_000);
    assert!(!item.relative_time.is_empty());
}

#[test]
fn post_lines_show_whole_ids() {
    let posts = vec![
        post(
            "0192aaaa-bbbb-cccc-dddd-eeeeffff0000",
            "First",
            "body",
            1_700_000_000_000,
        ),
        post(
            "0192aaaa-bbbb-cccc-dddd-eeeeffff0001",
            "Second",
            "body",
            1_700_000_100_000,
        ),
    ];

    let lines = format_post_lines(&posts);
    assert_eq!(lines.len(), 2);
    assert!(lines[0].contains("0192aaaa-bbbb-cccc-dddd-eeeeffff0000"));
    assert!(lines[0].contains("First"));
    assert!(lines[1].contains("0192aaaa-bbbb-cccc-dddd-eeeeffff0001"));
}

#[test]
fn long_titles_are_previewed_in_post_lines() {
    let posts = vec![post(
        "id-1",
        "a title that is clearly longer than thirty-two characters",
        "body",
        0,
    )];

    let lines = format_post_lines(&posts);
    assert!(lines[0].contains("..."));
    assert!(!lines[0].contains("thirty-two characters"));
}

#[test]
fn bash_completions_define_the_blurt_function() {
    let script = generate_for_shell(CompletionShell::Bash);
    assert!(script.contains("_blurt()"));
    assert!(script.contains("complete -F _blurt"));
}

#[test]
fn zsh_and_fish_completions_target_blurt() {
    assert!(generate_for_shell(CompletionShell::Zsh).starts_with("#compdef blurt"));
    assert!(generate_for_shell(CompletionShell::Fish).contains("-c blurt"));
}

#[test]
fn unconfigured_profile_builds_no_backend() {
    let backend = build_backend("tests-unconfigured", &CliProfile::default()).unwrap();
    assert!(backend.is_none());
}

#[test]
fn half_configured_profile_is_a_config_error() {
    let profile = CliProfile {
        backend_url: Some("https://backend.example.com".to_string()),
        api_key: None,
    };
    let result = build_backend("tests-half", &profile);
    assert!(matches!(result, Err(CliError::Config(_))));
}

#[test]
fn configured_profile_builds_a_signed_out_backend() {
    let profile = CliProfile {
        backend_url: Some("https://backend.example.com".to_string()),
        api_key: Some("public-key".to_string()),
    };

    let backend = build_backend("tests-configured", &profile).unwrap().unwrap();
    assert_eq!(backend.profile_name, "tests-configured");
    assert!(backend.accounts.current_session().is_none());
}
