use crate::commands::common::{connect, format_post_lines, post_to_list_item};
use crate::error::CliError;

pub async fn run_list(limit: usize, json: bool, global_profile: Option<&str>) -> Result<(), CliError> {
    let backend = connect(global_profile)?;
    let mut posts = backend.posts.fetch_posts().await?;
    posts.truncate(limit);

    if json {
        let items: Vec<_> = posts.iter().map(post_to_list_item).collect();
        println!("{}", serde_json::to_string_pretty(&items)?);
        return Ok(());
    }

    if posts.is_empty() {
        println!("No posts yet. Create one with `blurt add <title>`.");
        return Ok(());
    }

    for line in format_post_lines(&posts) {
        println!("{line}");
    }
    Ok(())
}
