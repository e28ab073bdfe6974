use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use recipe2md_core::RecipeMetadata;

use crate::recipe::Session;
use crate::save;

/// Save every recipe URL listed in `file`.
///
/// A failing URL is logged and skipped; the command only fails when the file
/// cannot be read.
pub async fn list(session: &Session, file: &Path, metadata: &RecipeMetadata) -> Result<()> {
    let content = fs::read_to_string(file)
        .with_context(|| format!("Failed to read URL list: {}", file.display()))?;
    let urls = parse_urls(&content);
    tracing::info!(count = urls.len(), file = %file.display(), "saving recipes");

    let mut saved = 0;
    let mut failed = 0;
    for url in &urls {
        match save::save(session, url, metadata).await {
            Ok(()) => saved += 1,
            Err(e) => {
                failed += 1;
                tracing::warn!(url, "{:#}", e);
            }
        }
    }

    tracing::info!(saved, failed, "done");
    Ok(())
}

/// One URL per line; blank lines and `#` comments are ignored.
fn parse_urls(content: &str) -> Vec<&str> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_urls() {
        let content = "# weeknight dinners\nhttps://example.com/tacos\n\n  https://example.com/soup  \n#https://example.com/skip\n";
        assert_eq!(
            parse_urls(content),
            vec!["https://example.com/tacos", "https://example.com/soup"]
        );
    }

    #[test]
    fn test_parse_urls_empty_file() {
        assert!(parse_urls("").is_empty());
        assert!(parse_urls("\n# nothing yet\n").is_empty());
    }
}
