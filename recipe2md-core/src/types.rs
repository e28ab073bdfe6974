use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Recipe fields pulled out of a page, ready to be rendered.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipeRecord {
    pub title: String,
    /// Ingredient lines in preparation order
    pub ingredients: Vec<String>,
    /// Instruction steps in order
    pub instructions: Vec<String>,
    /// schema.org nutrient names (e.g. `proteinContent`) with display values,
    /// in the order the page listed them
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub nutrients: Vec<(String, String)>,
    pub yields: String,
    pub total_time_minutes: Option<u32>,
    pub image_url: Option<String>,
    pub source_url: String,
}

impl RecipeRecord {
    /// Placeholder for a page that could not be extracted.
    pub fn empty(source_url: &str) -> Self {
        Self {
            source_url: source_url.to_string(),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.title.is_empty() && self.ingredients.is_empty() && self.instructions.is_empty()
    }
}

/// Flavour and diet tags that can be attached to a recipe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Extra {
    Veggie,
    Spicy,
    Sweet,
    Salty,
    Sour,
    Bitter,
    Umami,
}

impl Extra {
    pub const ALL: &'static [Extra] = &[
        Extra::Veggie,
        Extra::Spicy,
        Extra::Sweet,
        Extra::Salty,
        Extra::Sour,
        Extra::Bitter,
        Extra::Umami,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Extra::Veggie => "veggie",
            Extra::Spicy => "spicy",
            Extra::Sweet => "sweet",
            Extra::Salty => "salty",
            Extra::Sour => "sour",
            Extra::Bitter => "bitter",
            Extra::Umami => "umami",
        }
    }
}

impl fmt::Display for Extra {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Extra {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Extra::ALL
            .iter()
            .copied()
            .find(|extra| extra.as_str() == wanted)
            .ok_or_else(|| {
                let names: Vec<&str> = Extra::ALL.iter().map(|e| e.as_str()).collect();
                format!("unknown extra '{}', expected one of: {}", s, names.join(", "))
            })
    }
}

/// Caller-supplied overrides applied when rendering a recipe.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecipeMetadata {
    pub name: Option<String>,
    pub category: String,
    extras: Vec<Extra>,
    pub translate: bool,
}

impl RecipeMetadata {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_name(mut self, name: Option<String>) -> Self {
        self.name = name;
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    /// Set the extras, dropping repeats but keeping first-seen order.
    pub fn with_extras(mut self, extras: impl IntoIterator<Item = Extra>) -> Self {
        self.extras.clear();
        for extra in extras {
            if !self.extras.contains(&extra) {
                self.extras.push(extra);
            }
        }
        self
    }

    pub fn with_translate(mut self, translate: bool) -> Self {
        self.translate = translate;
        self
    }

    pub fn extras(&self) -> &[Extra] {
        &self.extras
    }

    /// The name override if it is set and non-blank.
    pub fn name_override(&self) -> Option<&str> {
        self.name.as_deref().filter(|name| !name.trim().is_empty())
    }
}

/// A synthesized markdown document and the file name of its image.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderedDocument {
    pub content: String,
    /// `<slug>.<ext>`, empty when the recipe has no image
    pub image_filename: String,
    /// Scraped title at synthesis time, before any translation
    pub title: String,
    pub image_url: Option<String>,
}

impl RenderedDocument {
    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }
}

/// Where a recipe ended up on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedRecipe {
    pub document_path: PathBuf,
    pub image_path: Option<PathBuf>,
}
