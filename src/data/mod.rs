/// Data layer: record types, decoded buffers and sample manifests.
///
/// Architecture:
/// ```text
///  .json / .csv / .parquet manifest
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse manifest → Vec<SampleRecord>
///   └──────────┘
///        │
///        ▼
///   ┌──────────────┐
///   │ SampleRecord │  img_path + metadata
///   └──────────────┘
///        │  ImageLoader::apply
///        ▼
///   ┌──────────┐
///   │  image    │  PixelArray (rows × cols × channels)
///   └──────────┘
/// ```

pub mod image;
pub mod loader;
pub mod model;
