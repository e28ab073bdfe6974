//! Writing a rendered recipe and its photo into the recipe directory.
//!
//! The directory is flat: `<slug>.md` next to `<slug>.<ext>`. Saving the same
//! recipe again overwrites both files. Two processes saving the same slug at
//! once race, and the last write wins.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::PersistError;
use crate::http::HttpClient;
use crate::photo::fetch_photo;
use crate::text::{format_title, slugify};
use crate::types::{PersistedRecipe, RecipeMetadata, RenderedDocument};

/// Save a rendered recipe and its image into `target_dir`.
///
/// The image is fetched before anything is written, so a failed download
/// leaves the directory untouched. The directory itself must already exist.
pub async fn persist<C: HttpClient + ?Sized>(
    document: &RenderedDocument,
    metadata: &RecipeMetadata,
    client: &C,
    target_dir: &Path,
) -> Result<PersistedRecipe, PersistError> {
    if document.is_empty() {
        return Err(PersistError::EmptyDocument);
    }
    if !target_dir.is_dir() {
        return Err(PersistError::MissingDirectory(target_dir.to_path_buf()));
    }

    let stem = document_stem(document, metadata);
    check_file_name(&stem)?;
    let document_path = target_dir.join(format!("{}.md", stem));

    let image_url = document
        .image_url
        .as_deref()
        .filter(|_| !document.image_filename.is_empty());
    if image_url.is_some() {
        check_file_name(&document.image_filename)?;
        if let Some((image_stem, _)) = document.image_filename.rsplit_once('.') {
            check_file_name(image_stem)?;
        }
    }

    let image = match image_url {
        Some(url) => {
            let photo = fetch_photo(client, url)
                .await
                .map_err(|source| PersistError::ImageFetch {
                    url: url.to_string(),
                    source,
                })?;
            Some((target_dir.join(&document.image_filename), photo.data))
        }
        None => None,
    };

    fs::write(&document_path, &document.content).map_err(|source| {
        PersistError::DocumentWrite {
            path: document_path.clone(),
            source,
        }
    })?;
    tracing::debug!(path = %document_path.display(), "wrote recipe document");

    let image_path = match image {
        Some((path, data)) => {
            fs::write(&path, &data).map_err(|source| PersistError::ImageWrite {
                path: path.clone(),
                source,
            })?;
            tracing::debug!(path = %path.display(), bytes = data.len(), "wrote recipe image");
            Some(path)
        }
        None => None,
    };

    Ok(PersistedRecipe {
        document_path,
        image_path,
    })
}

/// File stem for the document: the name override if set, else the scraped title.
pub fn document_stem(document: &RenderedDocument, metadata: &RecipeMetadata) -> String {
    let title = metadata.name_override().unwrap_or(&document.title);
    slugify(&format_title(title))
}

/// A name must be a single plain path component so files land directly in
/// the recipe directory.
fn check_file_name(name: &str) -> Result<(), PersistError> {
    let unsafe_name = name.is_empty()
        || name == "."
        || name == ".."
        || name.contains(['/', '\\', '\0']);
    if unsafe_name {
        return Err(PersistError::UnsafeFileName {
            name: name.to_string(),
        });
    }
    Ok(())
}

/// Create the recipe directory if needed. Safe to call repeatedly.
pub fn ensure_target_dir(dir: &Path) -> std::io::Result<PathBuf> {
    fs::create_dir_all(dir)?;
    Ok(dir.to_path_buf())
}
