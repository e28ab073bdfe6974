//! Browsing recipes already saved in the recipe directory.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedRecipe {
    pub path: PathBuf,
    /// `title:` from the front matter, or the file stem when absent
    pub title: String,
}

/// All `.md` files directly inside `dir`, sorted by file name.
pub fn list_saved(dir: &Path) -> io::Result<Vec<SavedRecipe>> {
    let mut recipes = Vec::new();

    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if !path.is_file() || path.extension().map_or(true, |ext| ext != "md") {
            continue;
        }
        let title = match fs::read_to_string(&path) {
            Ok(content) => front_matter_title(&content),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "unreadable recipe file");
                None
            }
        };
        let title = title.unwrap_or_else(|| {
            path.file_stem()
                .map(|stem| stem.to_string_lossy().into_owned())
                .unwrap_or_default()
        });
        recipes.push(SavedRecipe { path, title });
    }

    recipes.sort_by(|a, b| a.path.file_name().cmp(&b.path.file_name()));
    Ok(recipes)
}

pub fn read_saved(recipe: &SavedRecipe) -> io::Result<String> {
    fs::read_to_string(&recipe.path)
}

/// `title:` value inside a leading `---` block.
fn front_matter_title(content: &str) -> Option<String> {
    let mut lines = content.lines();
    if lines.next()?.trim() != "---" {
        return None;
    }
    lines
        .take_while(|line| line.trim() != "---")
        .find_map(|line| line.strip_prefix("title:"))
        .map(|title| title.trim().to_string())
        .filter(|title| !title.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_saved_reads_titles_and_sorts() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("tacos.md"), "---\ntitle: Tacos\n---\n\n* tortillas\n").unwrap();
        fs::write(dir.path().join("apple-pie.md"), "---\ntitle: Apple pie\n---\n").unwrap();
        fs::write(dir.path().join("notes.md"), "just some notes").unwrap();
        fs::write(dir.path().join("tacos.jpg"), [0xFF, 0xD8]).unwrap();

        let saved = list_saved(dir.path()).unwrap();
        let titles: Vec<&str> = saved.iter().map(|r| r.title.as_str()).collect();

        assert_eq!(titles, vec!["Apple pie", "notes", "Tacos"]);
        assert_eq!(
            read_saved(&saved[2]).unwrap(),
            "---\ntitle: Tacos\n---\n\n* tortillas\n"
        );
    }

    #[test]
    fn test_list_saved_missing_dir_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(list_saved(&dir.path().join("missing")).is_err());
    }

    #[test]
    fn test_title_must_be_inside_front_matter() {
        assert_eq!(front_matter_title("# Heading\ntitle: nope\n"), None);
        assert_eq!(
            front_matter_title("---\nsource: x\n---\ntitle: nope\n"),
            None
        );
    }
}
