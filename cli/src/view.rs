use anyhow::{Context, Result};
use dialoguer::Select;
use recipe2md_core::{console_width, render, RecipeMetadata};

use crate::recipe::Session;
use crate::save;

const SAVE: usize = 0;

/// Render a recipe to stdout, then optionally offer to save it.
pub async fn view(
    session: &Session,
    url: &str,
    metadata: &RecipeMetadata,
    prompt_save: bool,
) -> Result<()> {
    let document = session.document(url, metadata).await?;

    let width = console_width(session.config.max_width);
    println!("{}", render(&document.content, width));

    if !prompt_save {
        return Ok(());
    }

    let choice = Select::new()
        .with_prompt("What next?")
        .items(&["Save this recipe", "Quit"])
        .default(SAVE)
        .interact()
        .context("Failed to read selection")?;

    if choice == SAVE {
        save::store(session, &document, metadata).await?;
    }
    Ok(())
}
