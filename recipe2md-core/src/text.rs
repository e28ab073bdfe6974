//! String normalization for labels, titles and file names.

use std::sync::LazyLock;

use regex::Regex;

/// Runs of uppercase letters (acronyms, or the first letter of a camel-case word).
static UPPERCASE_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([A-Z]+)").expect("Invalid uppercase run regex"));

/// An uppercase letter followed by lowercase letters.
static CAPITALIZED_WORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([A-Z][a-z]+)").expect("Invalid capitalized word regex"));

/// Turn a camelCase identifier into a sentence.
///
/// `proteinContent` becomes `Protein content`, `fatContentFDA` becomes
/// `Fat content FDA`. Acronyms keep their casing; every other word is
/// lower-cased and only the first character of the result is capitalized.
pub fn split_camel_case(word: &str) -> String {
    let spaced = UPPERCASE_RUN.replace_all(word, " ${1}");
    let spaced = CAPITALIZED_WORD.replace_all(&spaced, " ${1}");

    let sentence = spaced
        .split_whitespace()
        .map(|part| {
            if is_acronym(part) {
                part.to_string()
            } else {
                part.to_lowercase()
            }
        })
        .collect::<Vec<_>>()
        .join(" ");

    upper_first(&sentence)
}

fn is_acronym(word: &str) -> bool {
    word.chars().any(char::is_uppercase) && !word.chars().any(char::is_lowercase)
}

fn upper_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        None => String::new(),
        Some(first) => first.to_uppercase().chain(chars).collect(),
    }
}

/// Label used for a nutrient line: `saturatedFatContent` -> `Saturated fat`.
pub fn nutrient_label(name: &str) -> String {
    split_camel_case(name).replace(" content", "")
}

/// File-name stem for a title: lower-cased, whitespace replaced by `-`.
///
/// Nothing else is touched, so punctuation and non-ASCII letters pass through.
pub fn slugify(title: &str) -> String {
    title
        .to_lowercase()
        .chars()
        .map(|c| if c.is_whitespace() { '-' } else { c })
        .collect()
}

/// Title with spaces replaced by `-`, case preserved.
pub fn format_title(title: &str) -> String {
    title.replace(' ', "-")
}

/// First character upper-cased, the rest lower-cased.
pub fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        None => String::new(),
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
    }
}

/// Everything after the last `.` of a URL.
///
/// Returns None when there is no dot, or when the dot belongs to the host
/// or a directory rather than the file name.
pub fn file_extension_of(url: &str) -> Option<&str> {
    let (_, ext) = url.rsplit_once('.')?;
    if ext.is_empty() || ext.contains('/') {
        return None;
    }
    Some(ext)
}
