use anyhow::{Context, Result};
use recipe2md_core::{ensure_target_dir, persist, PersistedRecipe, RecipeMetadata, RenderedDocument};

use crate::recipe::Session;

/// Fetch a recipe and write it to the recipe directory.
pub async fn save(session: &Session, url: &str, metadata: &RecipeMetadata) -> Result<()> {
    let document = session.document(url, metadata).await?;
    store(session, &document, metadata).await?;
    Ok(())
}

/// Write an already rendered document, creating the recipe directory if needed.
pub async fn store(
    session: &Session,
    document: &RenderedDocument,
    metadata: &RecipeMetadata,
) -> Result<PersistedRecipe> {
    let dir = ensure_target_dir(&session.config.target_dir).with_context(|| {
        format!(
            "Failed to create recipe directory {}",
            session.config.target_dir.display()
        )
    })?;

    let saved = persist(document, metadata, &session.client, &dir)
        .await
        .with_context(|| format!("Failed to save {}", document.title))?;

    tracing::info!(
        document = %saved.document_path.display(),
        image = saved.image_path.as_ref().map(|p| p.display().to_string()).unwrap_or_default(),
        "saved recipe"
    );
    Ok(saved)
}
