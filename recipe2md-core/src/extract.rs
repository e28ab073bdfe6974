//! Recipe extraction from schema.org structured data.
//!
//! JSON-LD is tried first through a regex fast path that skips DOM parsing,
//! then through the DOM for pages the regex misses, then microdata.

use std::sync::LazyLock;

use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use serde_json::Value;

use crate::error::ExtractError;
use crate::http::HttpClient;
use crate::types::RecipeRecord;

/// Regex to find JSON-LD script tags (case-insensitive for type attribute)
static JSONLD_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?is)<script[^>]*type\s*=\s*["']application/ld\+json["'][^>]*>(.*?)</script>"#)
        .expect("Invalid JSON-LD regex")
});

/// og:image meta tag, property before content
static OG_IMAGE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)<meta[^>]*property\s*=\s*["']og:image["'][^>]*content\s*=\s*["']([^"']+)["'][^>]*/?\s*>"#)
        .expect("Invalid og:image regex")
});

/// og:image meta tag, content before property
static OG_IMAGE_REGEX_ALT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)<meta[^>]*content\s*=\s*["']([^"']+)["'][^>]*property\s*=\s*["']og:image["'][^>]*/?\s*>"#)
        .expect("Invalid og:image alt regex")
});

/// ISO-8601 durations as used by schema.org, e.g. `PT1H30M` or `P0DT45M`
static ISO_DURATION_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^P(?:(\d+)D)?(?:T(?:(\d+)H)?(?:(\d+)M)?(?:(\d+(?:\.\d+)?)S)?)?$")
        .expect("Invalid ISO duration regex")
});

static HTML_TAG_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^>]+>").expect("Invalid HTML tag regex"));

/// Fetch a recipe page and extract it.
pub async fn fetch_recipe<C: HttpClient + ?Sized>(
    client: &C,
    url: &str,
) -> Result<RecipeRecord, ExtractError> {
    let html = client.fetch_html(url).await?;
    let record = extract_recipe(&html, url)?;
    tracing::debug!(
        url,
        title = %record.title,
        ingredients = record.ingredients.len(),
        instructions = record.instructions.len(),
        "extracted recipe"
    );
    Ok(record)
}

/// Extract a recipe from a page's HTML.
pub fn extract_recipe(html: &str, source_url: &str) -> Result<RecipeRecord, ExtractError> {
    if let Some(record) = extract_jsonld_fast(html, source_url) {
        return Ok(record);
    }

    let document = Html::parse_document(html);

    let jsonld = extract_recipe_from_jsonld(&document, source_url);
    if jsonld.is_ok() {
        return jsonld;
    }

    match extract_recipe_from_microdata(&document, source_url) {
        Ok(record) => Ok(record),
        // A JSON-LD recipe with missing fields explains more than "no microdata".
        Err(ExtractError::NoRecipe) => jsonld,
        Err(e) => Err(e),
    }
}

fn extract_jsonld_fast(html: &str, source_url: &str) -> Option<RecipeRecord> {
    for cap in JSONLD_REGEX.captures_iter(html) {
        let Some(json_text) = cap.get(1).map(|m| m.as_str()) else {
            continue;
        };
        let Ok(json) = serde_json::from_str::<Value>(&sanitize_json(json_text)) else {
            continue;
        };
        if let Some(recipe) = find_recipe_in_json(&json) {
            if let Ok(mut record) = record_from_json(recipe, source_url) {
                if record.image_url.is_none() {
                    record.image_url = extract_og_image_fast(html);
                }
                return Some(record);
            }
        }
    }
    None
}

fn extract_og_image_fast(html: &str) -> Option<String> {
    OG_IMAGE_REGEX
        .captures(html)
        .or_else(|| OG_IMAGE_REGEX_ALT.captures(html))
        .and_then(|cap| cap.get(1))
        .map(|m| m.as_str().to_string())
}

fn extract_recipe_from_jsonld(
    document: &Html,
    source_url: &str,
) -> Result<RecipeRecord, ExtractError> {
    let selector = Selector::parse("script[type='application/ld+json']").expect("Invalid selector");
    let mut last_error = ExtractError::NoRecipe;

    for element in document.select(&selector) {
        let json_text = element.inner_html();
        let json: Value = match serde_json::from_str(&sanitize_json(&json_text)) {
            Ok(v) => v,
            Err(e) => {
                last_error = ExtractError::InvalidJson(e.to_string());
                continue;
            }
        };

        if let Some(recipe) = find_recipe_in_json(&json) {
            let mut record = record_from_json(recipe, source_url)?;
            if record.image_url.is_none() {
                record.image_url = extract_og_image(document);
            }
            return Ok(record);
        }
    }

    Err(last_error)
}

/// Escape raw control characters inside JSON strings.
/// Some sites put literal newlines and tabs in their JSON-LD.
fn sanitize_json(json: &str) -> String {
    let mut result = String::with_capacity(json.len());
    let mut in_string = false;
    let mut escaped = false;

    for c in json.chars() {
        if in_string {
            match c {
                '\n' => result.push_str("\\n"),
                '\r' => result.push_str("\\r"),
                '\t' => result.push_str("\\t"),
                c if c.is_control() => {}
                _ => result.push(c),
            }
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
        } else {
            if c == '"' {
                in_string = true;
            }
            result.push(c);
        }
    }

    result
}

/// Find the first object whose `@type` is (or includes) `Recipe`,
/// looking through `@graph` and nested values.
fn find_recipe_in_json(json: &Value) -> Option<&Value> {
    match json {
        Value::Object(obj) => {
            let is_recipe = match obj.get("@type") {
                Some(Value::String(s)) => s == "Recipe",
                Some(Value::Array(types)) => types.iter().any(|v| v == "Recipe"),
                _ => false,
            };
            if is_recipe {
                return Some(json);
            }
            obj.values().find_map(find_recipe_in_json)
        }
        Value::Array(items) => items.iter().find_map(find_recipe_in_json),
        _ => None,
    }
}

fn record_from_json(recipe: &Value, source_url: &str) -> Result<RecipeRecord, ExtractError> {
    let title = recipe
        .get("name")
        .and_then(Value::as_str)
        .map(clean_text)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| ExtractError::MissingField("name".to_string()))?;

    let ingredients: Vec<String> = recipe
        .get("recipeIngredient")
        .or_else(|| recipe.get("ingredients"))
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(clean_text)
                .filter(|s| !s.is_empty())
                .collect()
        })
        .unwrap_or_default();
    if ingredients.is_empty() {
        return Err(ExtractError::MissingField("recipeIngredient".to_string()));
    }

    let mut instructions = Vec::new();
    if let Some(raw) = recipe.get("recipeInstructions") {
        collect_steps(raw, &mut instructions);
    }
    if instructions.is_empty() {
        return Err(ExtractError::MissingField("recipeInstructions".to_string()));
    }

    Ok(RecipeRecord {
        title,
        ingredients,
        instructions,
        nutrients: recipe.get("nutrition").map(nutrients_from_json).unwrap_or_default(),
        yields: recipe.get("recipeYield").map(yields_from_json).unwrap_or_default(),
        total_time_minutes: total_time_from_json(recipe),
        image_url: recipe.get("image").and_then(image_from_json),
        source_url: source_url.to_string(),
    })
}

/// Flatten `recipeInstructions`: a plain string (one step per line), an array of
/// strings, `HowToStep` objects, or `HowToSection`s wrapping more steps.
fn collect_steps(value: &Value, steps: &mut Vec<String>) {
    match value {
        Value::String(s) => steps.extend(
            s.lines()
                .map(clean_text)
                .filter(|line| !line.is_empty()),
        ),
        Value::Array(items) => {
            for item in items {
                collect_steps(item, steps);
            }
        }
        Value::Object(obj) => {
            if let Some(section) = obj.get("itemListElement") {
                collect_steps(section, steps);
            } else if let Some(text) = obj.get("text").and_then(Value::as_str) {
                let text = clean_text(text);
                if !text.is_empty() {
                    steps.push(text);
                }
            }
        }
        _ => {}
    }
}

fn nutrients_from_json(nutrition: &Value) -> Vec<(String, String)> {
    let Some(obj) = nutrition.as_object() else {
        return Vec::new();
    };
    obj.iter()
        .filter(|(key, _)| !key.starts_with('@'))
        .filter_map(|(key, value)| {
            let display = match value {
                Value::String(s) => clean_text(s),
                Value::Number(n) => n.to_string(),
                _ => return None,
            };
            (!display.is_empty()).then(|| (key.clone(), display))
        })
        .collect()
}

fn yields_from_json(value: &Value) -> String {
    match value {
        Value::String(s) => clean_text(s),
        Value::Number(n) => n.to_string(),
        Value::Array(items) => items.first().map(yields_from_json).unwrap_or_default(),
        _ => String::new(),
    }
}

/// `totalTime`, or `prepTime + cookTime` when the total is missing.
fn total_time_from_json(recipe: &Value) -> Option<u32> {
    let minutes = |field: &str| {
        recipe
            .get(field)
            .and_then(Value::as_str)
            .and_then(parse_iso_duration_minutes)
    };

    minutes("totalTime").or_else(|| match (minutes("prepTime"), minutes("cookTime")) {
        (None, None) => None,
        (prep, cook) => Some(prep.unwrap_or(0).saturating_add(cook.unwrap_or(0))),
    })
}

/// Minutes in an ISO-8601 duration, rounding seconds to the nearest minute.
pub fn parse_iso_duration_minutes(duration: &str) -> Option<u32> {
    let caps = ISO_DURATION_REGEX.captures(duration.trim())?;
    let part = |i: usize| -> f64 {
        caps.get(i)
            .and_then(|m| m.as_str().parse::<f64>().ok())
            .unwrap_or(0.0)
    };
    let minutes = part(1) * 24.0 * 60.0 + part(2) * 60.0 + part(3) + part(4) / 60.0;
    Some(minutes.round() as u32)
}

fn image_from_json(image: &Value) -> Option<String> {
    match image {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Array(items) => items.iter().find_map(image_from_json),
        Value::Object(obj) => obj
            .get("url")
            .or_else(|| obj.get("contentUrl"))
            .and_then(image_from_json),
        _ => None,
    }
}

/// Strip tags, decode the common entities, collapse whitespace.
fn clean_text(raw: &str) -> String {
    let stripped = HTML_TAG_REGEX.replace_all(raw, " ");
    let decoded = stripped
        .replace("&nbsp;", " ")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&#039;", "'")
        .replace("&apos;", "'")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&amp;", "&");
    decoded.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Extract recipe from schema.org microdata markup.
fn extract_recipe_from_microdata(
    document: &Html,
    source_url: &str,
) -> Result<RecipeRecord, ExtractError> {
    let recipe_selector = Selector::parse(
        r#"[itemtype="http://schema.org/Recipe"], [itemtype="https://schema.org/Recipe"]"#,
    )
    .expect("Invalid selector");

    let recipe_element = document
        .select(&recipe_selector)
        .next()
        .ok_or(ExtractError::NoRecipe)?;

    let title = microdata_text(&recipe_element, "name")
        .filter(|s| !s.is_empty())
        .ok_or_else(|| ExtractError::MissingField("name".to_string()))?;

    let ingredient_selector =
        Selector::parse(r#"[itemprop="recipeIngredient"], [itemprop="ingredients"]"#)
            .expect("Invalid selector");
    let ingredients: Vec<String> = recipe_element
        .select(&ingredient_selector)
        .map(|el| clean_text(&el.text().collect::<String>()))
        .filter(|s| !s.is_empty())
        .collect();
    if ingredients.is_empty() {
        return Err(ExtractError::MissingField("recipeIngredient".to_string()));
    }

    let instructions = microdata_instructions(&recipe_element);
    if instructions.is_empty() {
        return Err(ExtractError::MissingField("recipeInstructions".to_string()));
    }

    let image_url = microdata_image(&recipe_element).or_else(|| extract_og_image(document));
    let total_time_minutes = microdata_text(&recipe_element, "totalTime")
        .as_deref()
        .and_then(parse_iso_duration_minutes);

    Ok(RecipeRecord {
        title,
        ingredients,
        instructions,
        nutrients: Vec::new(),
        yields: microdata_text(&recipe_element, "recipeYield").unwrap_or_default(),
        total_time_minutes,
        image_url,
        source_url: source_url.to_string(),
    })
}

/// Text of the first element with the given itemprop. `content` and
/// `datetime` attributes win over element text (meta and time tags).
fn microdata_text(element: &ElementRef, prop: &str) -> Option<String> {
    let selector = Selector::parse(&format!(r#"[itemprop="{}"]"#, prop)).ok()?;
    element.select(&selector).next().map(|el| {
        let value = el.value();
        match value.attr("content").or_else(|| value.attr("datetime")) {
            Some(attr) => clean_text(attr),
            None => clean_text(&el.text().collect::<String>()),
        }
    })
}

fn microdata_instructions(recipe_element: &ElementRef) -> Vec<String> {
    let step_selector = Selector::parse(
        r#"[itemprop="recipeInstructions"], [itemprop="instructions"], [itemtype*="HowToStep"]"#,
    )
    .expect("Invalid selector");
    let text_selector = Selector::parse(r#"[itemprop="text"]"#).expect("Invalid selector");

    let mut steps: Vec<String> = Vec::new();
    for el in recipe_element.select(&step_selector) {
        let text = match el.select(&text_selector).next() {
            Some(text_el) => clean_text(&text_el.text().collect::<String>()),
            None => clean_text(&el.text().collect::<String>()),
        };
        // HowToStep elements often also carry itemprop="recipeInstructions".
        if !text.is_empty() && !steps.contains(&text) {
            steps.push(text);
        }
    }
    steps
}

fn microdata_image(recipe_element: &ElementRef) -> Option<String> {
    let image_selector = Selector::parse(r#"[itemprop="image"]"#).expect("Invalid selector");
    recipe_element.select(&image_selector).find_map(|el| {
        let value = el.value();
        value
            .attr("src")
            .or_else(|| value.attr("href"))
            .or_else(|| value.attr("content"))
            .map(|s| s.to_string())
    })
}

fn extract_og_image(document: &Html) -> Option<String> {
    let selector = Selector::parse(r#"meta[property="og:image"]"#).ok()?;
    document
        .select(&selector)
        .next()?
        .value()
        .attr("content")
        .map(|s| s.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::MockClient;

    const JSONLD_PAGE: &str = r#"
        <!DOCTYPE html>
        <html>
        <head>
            <script type="application/ld+json">
            {
                "@context": "https://schema.org",
                "@graph": [
                    {"@type": "WebPage", "name": "Not a recipe"},
                    {
                        "@type": ["Recipe", "NewsArticle"],
                        "name": "Banana Bread",
                        "image": [{"@type": "ImageObject", "url": "https://cdn.example.com/bread.webp"}],
                        "recipeYield": ["8", "8 slices"],
                        "prepTime": "PT15M",
                        "cookTime": "PT1H",
                        "recipeIngredient": ["3 ripe bananas", " 2 cups flour ", ""],
                        "recipeInstructions": [
                            {"@type": "HowToSection", "name": "Batter", "itemListElement": [
                                {"@type": "HowToStep", "text": "Mash the bananas."},
                                {"@type": "HowToStep", "text": "Fold in flour &amp; soda."}
                            ]},
                            {"@type": "HowToStep", "text": "Bake."}
                        ],
                        "nutrition": {
                            "@type": "NutritionInformation",
                            "calories": "240 kcal",
                            "proteinContent": "4 g",
                            "fatContent": 9
                        }
                    }
                ]
            }
            </script>
        </head>
        <body></body>
        </html>
    "#;

    #[test]
    fn test_jsonld_graph_recipe() {
        let record = extract_recipe(JSONLD_PAGE, "https://example.com/bread").unwrap();

        assert_eq!(record.title, "Banana Bread");
        assert_eq!(record.ingredients, vec!["3 ripe bananas", "2 cups flour"]);
        assert_eq!(
            record.instructions,
            vec!["Mash the bananas.", "Fold in flour & soda.", "Bake."]
        );
        assert_eq!(record.yields, "8");
        assert_eq!(record.total_time_minutes, Some(75));
        assert_eq!(
            record.image_url.as_deref(),
            Some("https://cdn.example.com/bread.webp")
        );
        assert_eq!(
            record.nutrients,
            vec![
                ("calories".to_string(), "240 kcal".to_string()),
                ("proteinContent".to_string(), "4 g".to_string()),
                ("fatContent".to_string(), "9".to_string()),
            ]
        );
        assert_eq!(record.source_url, "https://example.com/bread");
    }

    #[test]
    fn test_jsonld_string_instructions_and_og_image() {
        let html = r#"
            <html><head>
            <meta property="og:image" content="https://example.com/og.jpg">
            <script type="application/ld+json">
            {"@type": "Recipe", "name": "Toast", "totalTime": "PT5M",
             "recipeYield": 2,
             "recipeIngredient": ["1 slice bread"],
             "recipeInstructions": "Toast the bread.
Butter it."}
            </script></head><body></body></html>
        "#;

        let record = extract_recipe(html, "https://example.com/toast").unwrap();

        assert_eq!(record.instructions, vec!["Toast the bread.", "Butter it."]);
        assert_eq!(record.image_url.as_deref(), Some("https://example.com/og.jpg"));
        assert_eq!(record.yields, "2");
        assert_eq!(record.total_time_minutes, Some(5));
        assert!(record.nutrients.is_empty());
    }

    #[test]
    fn test_microdata_fallback() {
        let html = r#"
            <html><head>
                <meta property="og:image" content="https://example.com/og.jpg">
            </head><body>
            <div itemscope itemtype="https://schema.org/Recipe">
                <h1 itemprop="name">Test Recipe</h1>
                <meta itemprop="totalTime" content="PT1H10M">
                <span itemprop="recipeYield">4 servings</span>
                <img itemprop="image" src="https://example.com/micro.png">
                <ul>
                    <li itemprop="recipeIngredient">1 cup flour</li>
                    <li itemprop="recipeIngredient">2 eggs</li>
                </ul>
                <div itemprop="recipeInstructions">Mix and bake.</div>
            </div>
            </body></html>
        "#;

        let record = extract_recipe(html, "https://example.com/recipe").unwrap();

        assert_eq!(record.title, "Test Recipe");
        assert_eq!(record.ingredients, vec!["1 cup flour", "2 eggs"]);
        assert_eq!(record.instructions, vec!["Mix and bake."]);
        assert_eq!(record.yields, "4 servings");
        assert_eq!(record.total_time_minutes, Some(70));
        assert_eq!(record.image_url.as_deref(), Some("https://example.com/micro.png"));
    }

    #[test]
    fn test_page_without_recipe() {
        let html = "<html><head><title>Blog</title></head><body><p>Hi</p></body></html>";
        assert!(matches!(
            extract_recipe(html, "https://example.com/"),
            Err(ExtractError::NoRecipe)
        ));
    }

    #[test]
    fn test_jsonld_recipe_missing_ingredients_reports_field() {
        let html = r#"<script type="application/ld+json">
            {"@type": "Recipe", "name": "Air", "recipeInstructions": "Breathe."}
        </script>"#;
        assert!(matches!(
            extract_recipe(html, "https://example.com/air"),
            Err(ExtractError::MissingField(field)) if field == "recipeIngredient"
        ));
    }

    #[test]
    fn test_parse_iso_duration_minutes() {
        assert_eq!(parse_iso_duration_minutes("PT1H30M"), Some(90));
        assert_eq!(parse_iso_duration_minutes("PT45M"), Some(45));
        assert_eq!(parse_iso_duration_minutes("P0DT2H"), Some(120));
        assert_eq!(parse_iso_duration_minutes("PT90S"), Some(2));
        assert_eq!(parse_iso_duration_minutes("P1D"), Some(1440));
        assert_eq!(parse_iso_duration_minutes("30 minutes"), None);
        assert_eq!(parse_iso_duration_minutes("P9999999D"), Some(u32::MAX));
    }

    #[test]
    fn test_huge_prep_and_cook_times_saturate() {
        let html = r#"<script type="application/ld+json">
            {"@type": "Recipe", "name": "Forever Stew",
             "prepTime": "P9999999D", "cookTime": "P9999999D",
             "recipeIngredient": ["water"], "recipeInstructions": "Wait."}
            </script>"#;

        let record = extract_recipe(html, "https://example.com/stew").unwrap();
        assert_eq!(record.total_time_minutes, Some(u32::MAX));
    }

    #[test]
    fn test_sanitize_json_escapes_raw_newlines() {
        let raw = "{\"a\": \"line one\nline \\\"two\\\"\"}";
        let value: Value = serde_json::from_str(&sanitize_json(raw)).unwrap();
        assert_eq!(value["a"], "line one\nline \"two\"");
    }

    #[tokio::test]
    async fn test_fetch_recipe_uses_client() {
        let client = MockClient::new().with_html("https://example.com/bread", JSONLD_PAGE);
        let record = fetch_recipe(&client, "https://example.com/bread")
            .await
            .unwrap();
        assert_eq!(record.title, "Banana Bread");

        let err = fetch_recipe(&client, "https://example.com/other")
            .await
            .unwrap_err();
        assert!(matches!(err, ExtractError::Fetch(_)));
    }
}
