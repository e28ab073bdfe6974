use anyhow::{bail, Context, Result};
use recipe2md_core::{
    fetch_recipe, synthesize, Config, GoogleTranslator, Identity, RecipeMetadata,
    RenderedDocument, TextTransform, WebClient,
};

/// Configuration and HTTP client shared by every command in one run.
pub struct Session {
    pub config: Config,
    pub client: WebClient,
}

impl Session {
    pub fn new(config: Config) -> Result<Self> {
        let client = WebClient::builder()
            .rate_limit_ms(config.rate_limit_ms)
            .timeout(config.timeout)
            .user_agent(config.user_agent.clone())
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self { config, client })
    }

    fn transform(&self, translate: bool) -> Result<Box<dyn TextTransform>> {
        if !translate {
            return Ok(Box::new(Identity));
        }
        let translator = GoogleTranslator::to_english(self.config.timeout)
            .context("Failed to set up translation")?;
        Ok(Box::new(translator))
    }

    /// Fetch `url` and synthesize its markdown document.
    pub async fn document(&self, url: &str, metadata: &RecipeMetadata) -> Result<RenderedDocument> {
        let record = fetch_recipe(&self.client, url)
            .await
            .with_context(|| format!("Failed to extract a recipe from {}", url))?;

        let transform = self.transform(metadata.translate)?;
        let document = synthesize(&record, metadata, transform.as_ref())
            .await
            .with_context(|| format!("Failed to build the document for {}", url))?;

        if document.is_empty() {
            bail!("No recipe content found at {}", url);
        }
        Ok(document)
    }
}
