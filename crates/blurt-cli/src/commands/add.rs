use crate::commands::common::{connect, resolve_post_content};
use crate::error::CliError;

pub async fn run_add(
    title: &str,
    content_parts: &[String],
    global_profile: Option<&str>,
) -> Result<(), CliError> {
    let content = resolve_post_content(content_parts)?;
    let backend = connect(global_profile)?;
    let post = backend.posts.create_post(title, &content).await?;
    if let Some(id) = &post.id {
        println!("{id}");
    }
    Ok(())
}
