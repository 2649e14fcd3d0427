use std::fmt;
use std::path::Path;

use image::{DynamicImage, ImageReader};

use crate::config::{LOADER_TYPE, LoaderConfig};
use crate::data::image::PixelArray;
use crate::data::model::{IMG, IMG_SHAPE, ORI_SHAPE, RecordValue, SampleRecord};
use crate::error::LoadResult;

// ---------------------------------------------------------------------------
// Transform seam
// ---------------------------------------------------------------------------

/// What a transform hands back to the pipeline driver.
#[derive(Debug, PartialEq)]
pub enum LoadOutcome<'a> {
    /// The record was updated in place.
    Loaded(&'a mut SampleRecord),
    /// Drop this sample; the record was left as it was.
    Skipped,
}

impl LoadOutcome<'_> {
    pub fn is_skipped(&self) -> bool {
        matches!(self, LoadOutcome::Skipped)
    }
}

/// A per-sample step that a host pipeline can chain.
pub trait Transform {
    /// Name used in pipeline configs.
    fn name(&self) -> &'static str;

    fn apply<'a>(&self, record: &'a mut SampleRecord) -> LoadResult<LoadOutcome<'a>>;
}

// ---------------------------------------------------------------------------
// ImageLoader
// ---------------------------------------------------------------------------

/// Loads `img_path` into `img`, recording `img_shape` and `ori_shape`.
///
/// The file's channel layout and sample depth are kept as stored; with
/// `to_float32` the samples are widened to `f32` without rescaling.
/// The loader holds no state besides its config and may be shared between
/// threads.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImageLoader {
    config: LoaderConfig,
}

impl ImageLoader {
    pub fn new(config: LoaderConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> LoaderConfig {
        self.config
    }

    /// Decode the record's image and write `img`, `img_shape` and `ori_shape`.
    ///
    /// Either all three keys are written or none are. A decode failure is
    /// returned unchanged, or reported as [`LoadOutcome::Skipped`] when
    /// `ignore_empty` is set. A missing `img_path`, or one that is not a path, is
    /// always an error.
    pub fn apply<'a>(&self, record: &'a mut SampleRecord) -> LoadResult<LoadOutcome<'a>> {
        let path = record.require_img_path()?;

        let mut img = match decode(&path).and_then(PixelArray::from_dynamic) {
            Ok(img) => img,
            Err(_) if self.config.ignore_empty => return Ok(LoadOutcome::Skipped),
            Err(e) => return Err(e.into()),
        };
        if self.config.to_float32 {
            img = img.to_float32();
        }

        let (rows, cols) = img.hw();
        record.insert(IMG, RecordValue::Image(img));
        record.insert(IMG_SHAPE, RecordValue::Shape(rows, cols));
        record.insert(ORI_SHAPE, RecordValue::Shape(rows, cols));
        Ok(LoadOutcome::Loaded(record))
    }
}

impl Transform for ImageLoader {
    fn name(&self) -> &'static str {
        LOADER_TYPE
    }

    fn apply<'a>(&self, record: &'a mut SampleRecord) -> LoadResult<LoadOutcome<'a>> {
        ImageLoader::apply(self, record)
    }
}

impl fmt::Display for ImageLoader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{LOADER_TYPE}(ignore_empty={}, to_float32={})",
            self.config.ignore_empty, self.config.to_float32
        )
    }
}

/// Sniff the container format from the file contents, falling back to the
/// extension, then decode.
fn decode(path: &Path) -> image::ImageResult<DynamicImage> {
    ImageReader::open(path)?.with_guessed_format()?.decode()
}
