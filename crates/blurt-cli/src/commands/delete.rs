use crate::commands::common::connect;
use crate::error::CliError;

pub async fn run_delete(id: &str, global_profile: Option<&str>) -> Result<(), CliError> {
    let backend = connect(global_profile)?;
    backend.posts.delete_post(id).await?;
    println!("Deleted {}", id.trim());
    Ok(())
}
