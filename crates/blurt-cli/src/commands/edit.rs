use crate::commands::common::{capture_editor_input_with_initial, connect};
use crate::error::CliError;

pub async fn run_edit(
    id: &str,
    title_override: Option<&str>,
    global_profile: Option<&str>,
) -> Result<(), CliError> {
    let backend = connect(global_profile)?;
    let post = backend.posts.get_post(id).await?;

    let edited = capture_editor_input_with_initial(&post.content)?
        .ok_or(CliError::EmptyEditedContent)?;
    let title = title_override.unwrap_or(&post.title);

    if title == post.title && edited == post.content {
        println!("No changes.");
        return Ok(());
    }

    let updated = backend.posts.update_post(id, title, &edited).await?;
    if let Some(id) = &updated.id {
        println!("{id}");
    }
    Ok(())
}
