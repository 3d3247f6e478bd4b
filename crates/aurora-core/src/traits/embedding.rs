use crate::errors::AuroraResult;

/// Injected source of query and chunk vectors.
pub trait IEmbeddingSource: Send + Sync {
    /// Embed a single text.
    fn embed(&self, text: &str) -> AuroraResult<Vec<f32>>;

    /// Embed a batch of texts.
    fn embed_batch(&self, texts: &[String]) -> AuroraResult<Vec<Vec<f32>>> {
        texts.iter().map(|t| self.embed(t)).collect()
    }

    /// The dimensionality of produced vectors.
    fn dimensions(&self) -> usize;

    /// Human-readable source name.
    fn name(&self) -> &str;

    /// Whether this source can currently produce vectors. Must be cheap.
    fn is_available(&self) -> bool;
}
