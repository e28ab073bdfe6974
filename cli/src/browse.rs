use anyhow::{Context, Result};
use dialoguer::Select;
use recipe2md_core::{console_width, list_saved, read_saved, render, Config};

/// Pick one of the saved recipes and render it.
pub fn browse(config: &Config) -> Result<()> {
    let dir = &config.target_dir;
    let recipes = list_saved(dir)
        .with_context(|| format!("Failed to read recipe directory {}", dir.display()))?;

    if recipes.is_empty() {
        tracing::info!(dir = %dir.display(), "no saved recipes");
        return Ok(());
    }

    let titles: Vec<&str> = recipes.iter().map(|r| r.title.as_str()).collect();
    let choice = Select::new()
        .with_prompt("Saved recipes")
        .items(&titles)
        .default(0)
        .interact()
        .context("Failed to read selection")?;

    let recipe = &recipes[choice];
    let content = read_saved(recipe)
        .with_context(|| format!("Failed to read {}", recipe.path.display()))?;

    let width = console_width(config.max_width);
    println!("{}", render(&content, width));
    Ok(())
}
