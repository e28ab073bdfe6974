use std::path::PathBuf;

use thiserror::Error;

use crate::translate::TranslateError;

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    #[error("HTTP {status} from {url}")]
    HttpStatus { url: String, status: u16 },

    #[error("Invalid response encoding: {0}")]
    InvalidEncoding(String),
}

#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("Could not fetch recipe page: {0}")]
    Fetch(#[from] FetchError),

    #[error("No Recipe found in JSON-LD or microdata")]
    NoRecipe,

    #[error("Invalid JSON-LD: {0}")]
    InvalidJson(String),

    #[error("Missing required field: {0}")]
    MissingField(String),
}

#[derive(Error, Debug)]
pub enum DocumentError {
    #[error("Translation failed: {0}")]
    Translation(#[from] TranslateError),

    #[error("Malformed recipe: {0}")]
    MalformedInput(String),
}

/// Why a recipe photo was not accepted.
#[derive(Error, Debug)]
pub enum PhotoError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("server returned no data")]
    Empty,

    #[error("photo is {bytes} bytes, more than the {max} byte limit")]
    TooLarge { bytes: usize, max: usize },

    #[error("server returned a web page instead of a photo")]
    NotAnImage,
}

#[derive(Error, Debug)]
pub enum PersistError {
    #[error("Nothing to save: the recipe document is empty")]
    EmptyDocument,

    #[error("Target directory does not exist: {}", .0.display())]
    MissingDirectory(PathBuf),

    #[error("Refusing to save as {name:?}: file names must stay inside the recipe directory")]
    UnsafeFileName { name: String },

    #[error("Could not fetch image {url}: {source} (no files were written)")]
    ImageFetch {
        url: String,
        #[source]
        source: PhotoError,
    },

    #[error("Could not write recipe file {}: {source}", .path.display())]
    DocumentWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Could not write image file {} (recipe file was written): {source}", .path.display())]
    ImageWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
