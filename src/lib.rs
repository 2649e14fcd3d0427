//! Multi-channel image loading for detection data pipelines.
//!
//! [`transform::ImageLoader`] decodes the file named by a record's `img_path`
//! and writes the buffer and its shape back into the record. Channel layout
//! and sample depth are kept exactly as the file stores them.

pub mod cli;
pub mod config;
pub mod data;
pub mod error;
pub mod summary;
pub mod transform;

pub use config::LoaderConfig;
pub use data::image::{ElementType, PixelArray, PixelData};
pub use data::model::{RecordValue, SampleRecord};
pub use error::{LoadError, LoadResult};
pub use transform::{ImageLoader, LoadOutcome, Transform};
