use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::Serialize;

use crate::data::image::ElementType;
use crate::data::model::SampleRecord;

// ---------------------------------------------------------------------------
// Run summary
// ---------------------------------------------------------------------------

/// Tally of one pass of the loader over a manifest.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LoadSummary {
    /// Samples that decoded and were kept.
    pub loaded: usize,

    /// Samples dropped because their image could not be decoded.
    pub skipped: usize,

    /// Paths of the skipped samples, in manifest order.
    pub skipped_paths: Vec<String>,

    /// Distinct `(rows, cols)` seen, with how many samples had each.
    pub shapes: BTreeMap<String, usize>,

    /// Sample count per element type.
    pub element_types: BTreeMap<ElementType, usize>,

    /// Distinct channel counts seen.
    pub channel_counts: BTreeSet<usize>,
}

impl LoadSummary {
    /// Account for a successfully loaded record.
    pub fn record_loaded(&mut self, record: &SampleRecord) {
        self.loaded += 1;
        if let Some((rows, cols)) = record.img_shape() {
            *self.shapes.entry(format!("{rows}x{cols}")).or_default() += 1;
        }
        if let Some(img) = record.img() {
            *self.element_types.entry(img.element_type()).or_default() += 1;
            self.channel_counts.insert(img.channels());
        }
    }

    /// Account for a sample the loader asked to drop.
    pub fn record_skipped(&mut self, record: &SampleRecord) {
        self.skipped += 1;
        let path = record
            .img_path()
            .map_or_else(|| "<unknown>".to_string(), |p| p.display().to_string());
        self.skipped_paths.push(path);
    }

    pub fn total(&self) -> usize {
        self.loaded + self.skipped
    }
}

impl fmt::Display for LoadSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{} of {} samples loaded, {} skipped",
            self.loaded,
            self.total(),
            self.skipped
        )?;
        for (shape, count) in &self.shapes {
            writeln!(f, "  shape {shape}: {count}")?;
        }
        for (dtype, count) in &self.element_types {
            writeln!(f, "  dtype {dtype}: {count}")?;
        }
        let channels: Vec<String> = self.channel_counts.iter().map(|c| c.to_string()).collect();
        if !channels.is_empty() {
            writeln!(f, "  channels: {}", channels.join(", "))?;
        }
        for path in &self.skipped_paths {
            writeln!(f, "  skipped: {path}")?;
        }
        Ok(())
    }
}
