pub mod config;
pub mod document;
pub mod error;
pub mod extract;
pub mod http;
pub mod library;
pub mod persist;
pub mod photo;
pub mod present;
pub mod text;
pub mod translate;
pub mod types;

pub use config::Config;
pub use document::{render_document, synthesize};
pub use error::{DocumentError, ExtractError, FetchError, PersistError, PhotoError};
pub use extract::{extract_recipe, fetch_recipe};
pub use http::{HttpClient, MockClient, MockResponse, WebClient, WebClientBuilder};
pub use library::{list_saved, read_saved, SavedRecipe};
pub use persist::{ensure_target_dir, persist};
pub use photo::{fetch_photo, inspect_photo, Photo, MAX_PHOTO_BYTES};
pub use present::{console_width, render};
pub use text::{format_title, slugify, split_camel_case};
pub use translate::{FakeTranslator, GoogleTranslator, Identity, TextTransform, TranslateError};
pub use types::{Extra, PersistedRecipe, RecipeMetadata, RecipeRecord, RenderedDocument};
