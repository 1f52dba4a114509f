use crate::core::extractor::RecordExtractor;
use crate::core::{grouper, renderer};
use crate::domain::model::{Contact, TransformResult};
use crate::domain::ports::{ConfigProvider, Pipeline, Storage};
use crate::utils::error::Result;

/// ADIF log in, label table out.
pub struct LabelPipeline<S: Storage, C: ConfigProvider> {
    storage: S,
    config: C,
    extractor: RecordExtractor,
}

impl<S: Storage, C: ConfigProvider> LabelPipeline<S, C> {
    pub fn new(storage: S, config: C) -> Result<Self> {
        let extractor = RecordExtractor::new(config.manager_field())?;
        Ok(Self {
            storage,
            config,
            extractor,
        })
    }
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider> Pipeline for LabelPipeline<S, C> {
    async fn extract(&self) -> Result<Vec<Contact>> {
        tracing::debug!("Reading ADIF log from: {}", self.config.input_path());
        let raw = self.storage.read_file(self.config.input_path()).await?;

        let text = match String::from_utf8(raw) {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!("Input is not valid UTF-8, replacing undecodable bytes");
                String::from_utf8_lossy(e.as_bytes()).into_owned()
            }
        };

        self.extractor.extract_contacts(&text)
    }

    async fn transform(&self, mut contacts: Vec<Contact>) -> Result<TransformResult> {
        let contact_count = contacts.len();
        if contacts.is_empty() {
            tracing::warn!("No QSOs found in {}", self.config.input_path());
        }

        grouper::sort_by_destination(&mut contacts);
        let labels = grouper::group_contacts(contacts, self.config.capacity());
        tracing::debug!(
            "Grouped {} QSOs into {} labels of at most {} QSOs",
            contact_count,
            labels.len(),
            self.config.capacity()
        );

        let outcome =
            renderer::render_table(&labels, self.config.capacity(), self.config.via_manager())?;

        Ok(TransformResult {
            table: outcome.table,
            contact_count,
            label_count: labels.len(),
            emitted_count: outcome.emitted,
            filtered_count: outcome.filtered,
        })
    }

    async fn load(&self, result: TransformResult) -> Result<String> {
        let mut buffer = Vec::new();
        renderer::write_table(&result.table, &mut buffer)?;

        tracing::debug!(
            "Writing {} label rows ({} bytes) to {}",
            result.table.rows.len(),
            buffer.len(),
            self.config.output_path()
        );
        self.storage
            .write_file(self.config.output_path(), &buffer)
            .await?;

        Ok(self.config.output_path().to_string())
    }
}
