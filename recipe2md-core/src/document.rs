//! Markdown document synthesis.
//!
//! Turns a [`RecipeRecord`] plus caller metadata into the canonical recipe
//! document: a front-matter block, a bulleted ingredient list, and one quote
//! block per instruction step separated by rules.

use crate::error::DocumentError;
use crate::text::{capitalize, file_extension_of, format_title, nutrient_label, slugify};
use crate::translate::{transform_all, TextTransform};
use crate::types::{RecipeMetadata, RecipeRecord, RenderedDocument};

/// Separator placed between instruction blocks.
const STEP_SEPARATOR: &str = "\n\n---\n\n";

/// Build the markdown document and image file name for a recipe.
///
/// An empty record (failed extraction upstream) yields an empty document
/// rather than an error; callers should check [`RenderedDocument::is_empty`].
/// When `metadata.translate` is set, the title, ingredients and instructions
/// go through `transform` first, and any failure aborts the whole document.
pub async fn synthesize<T: TextTransform + ?Sized>(
    record: &RecipeRecord,
    metadata: &RecipeMetadata,
    transform: &T,
) -> Result<RenderedDocument, DocumentError> {
    if record.is_empty() {
        tracing::warn!(url = %record.source_url, "empty recipe record, nothing to render");
        return Ok(RenderedDocument::default());
    }

    let title = effective_title(record, metadata)?;
    let image_filename = image_filename(title, record.image_url.as_deref())?;

    let mut source = record.clone();
    source.title = title.to_string();
    if metadata.translate {
        tracing::debug!(
            lines = 1 + record.ingredients.len() + record.instructions.len(),
            "translating recipe text"
        );
        source.title = transform.transform(title).await?;
        source.ingredients = transform_all(transform, &record.ingredients).await?;
        source.instructions = transform_all(transform, &record.instructions).await?;
    }

    Ok(RenderedDocument {
        content: render_document(&source, metadata, &image_filename),
        image_filename,
        title: record.title.clone(),
        image_url: record.image_url.clone(),
    })
}

/// The metadata name override if present, else the scraped title.
pub fn effective_title<'a>(
    record: &'a RecipeRecord,
    metadata: &'a RecipeMetadata,
) -> Result<&'a str, DocumentError> {
    let title = metadata.name_override().unwrap_or(record.title.as_str());
    if title.trim().is_empty() {
        return Err(DocumentError::MalformedInput(
            "recipe has no title".to_string(),
        ));
    }
    Ok(title)
}

/// `<slug>.<ext>` for the recipe image, or an empty string without an image.
pub fn image_filename(title: &str, image_url: Option<&str>) -> Result<String, DocumentError> {
    let Some(url) = image_url else {
        return Ok(String::new());
    };
    let ext = file_extension_of(url).ok_or_else(|| {
        DocumentError::MalformedInput(format!("image URL has no file extension: {}", url))
    })?;
    Ok(format!("{}.{}", slugify(&format_title(title)), ext))
}

/// Render the document text. Pure: the record's fields are used as given.
pub fn render_document(
    record: &RecipeRecord,
    metadata: &RecipeMetadata,
    image_filename: &str,
) -> String {
    let mut doc = String::new();

    doc.push_str("---\n");
    doc.push_str(&format!("title: {}\n", capitalize(&record.title)));
    doc.push_str(&format!("category: {}\n", capitalize(&metadata.category)));
    doc.push_str(&format!("source: {}\n", record.source_url));
    doc.push_str(&format!("image: {}\n", image_filename));
    doc.push_str(&format!("size: {}\n", record.yields));
    doc.push_str(&format!(
        "time: {} mins\n",
        record.total_time_minutes.unwrap_or(0)
    ));

    if !record.nutrients.is_empty() {
        doc.push_str("nutrition:\n");
        for (name, value) in &record.nutrients {
            doc.push_str(&format!("\t- {} {}\n", nutrient_label(name), value));
        }
    }
    for extra in metadata.extras() {
        doc.push_str(&format!("{}: x\n", extra));
    }
    doc.push_str("---\n\n");

    for ingredient in &record.ingredients {
        doc.push_str(&format!("* {}\n", ingredient));
    }
    doc.push('\n');

    let steps: Vec<String> = record
        .instructions
        .iter()
        .map(|step| format!("> {}", step))
        .collect();
    doc.push_str(&steps.join(STEP_SEPARATOR));

    doc
}
