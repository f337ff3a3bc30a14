use anyhow::Result;
use storefront_auth::cli::start;

// Main function
#[tokio::main]
async fn main() -> Result<()> {
    // Parse args and set up logging
    let action = start()?;

    // Run the workflow
    action.execute().await?;

    Ok(())
}
