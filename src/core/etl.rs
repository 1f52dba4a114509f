use crate::core::{Pipeline, TransformResult};
use crate::utils::error::Result;

pub struct EtlEngine<P: Pipeline> {
    pipeline: P,
}

impl<P: Pipeline> EtlEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self { pipeline }
    }

    /// Extract and transform only; nothing is written.
    pub async fn preview(&self) -> Result<TransformResult> {
        tracing::info!("Extracting QSOs...");
        let contacts = self.pipeline.extract().await?;
        tracing::info!("Extracted {} QSOs", contacts.len());

        tracing::info!("Building labels...");
        let result = self.pipeline.transform(contacts).await?;
        tracing::info!(
            "Built {} labels, {} selected for output, {} skipped by the manager filter",
            result.label_count,
            result.emitted_count,
            result.filtered_count
        );

        Ok(result)
    }

    pub async fn run(&self) -> Result<String> {
        let result = self.preview().await?;

        tracing::info!("Writing labels...");
        let output_path = self.pipeline.load(result).await?;
        tracing::info!("Output saved to: {}", output_path);

        Ok(output_path)
    }
}
