use crate::domain::model::{Contact, LabelCapacity, TransformResult};
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn input_path(&self) -> &str;
    fn output_path(&self) -> &str;
    fn capacity(&self) -> LabelCapacity;
    fn via_manager(&self) -> bool;
    fn manager_field(&self) -> &str;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<Vec<Contact>>;
    async fn transform(&self, contacts: Vec<Contact>) -> Result<TransformResult>;
    async fn load(&self, result: TransformResult) -> Result<String>;
}
