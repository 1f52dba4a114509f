pub mod etl;
pub mod extractor;
pub mod grouper;
pub mod pipeline;
pub mod renderer;

pub use crate::domain::model::{Contact, LabelTable, LabelUnit, TransformResult};
pub use crate::domain::ports::{ConfigProvider, Pipeline, Storage};
pub use crate::utils::error::Result;
