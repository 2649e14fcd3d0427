use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use arrow::array::{
    Array, AsArray, BooleanArray, Float32Array, Float64Array, Int32Array, Int64Array,
};
use arrow::datatypes::DataType;
use log::{debug, info};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use super::model::{IMG_PATH, RecordValue, SampleRecord};

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Read sample records from a manifest file.  Dispatch by extension.
///
/// Every row must carry an `img_path`; the remaining columns become record
/// entries. When `data_root` is given, relative image paths are joined onto it.
///
/// Supported formats:
/// * `.json`    – `[{ "img_path": "a.png", ...meta }, ...]`
/// * `.csv`     – header row with an `img_path` column
/// * `.parquet` – `img_path` Utf8 column plus scalar metadata columns
pub fn load_manifest(path: &Path, data_root: Option<&Path>) -> Result<Vec<SampleRecord>> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let mut records = match ext.as_str() {
        "json" => load_json(path)?,
        "csv" => load_csv(path)?,
        "parquet" | "pq" => load_parquet(path)?,
        other => bail!("Unsupported manifest extension: .{other}"),
    };

    if let Some(root) = data_root {
        for record in &mut records {
            resolve_img_path(record, root);
        }
    }

    info!("loaded {} sample records from {}", records.len(), path.display());
    Ok(records)
}

fn resolve_img_path(record: &mut SampleRecord, root: &Path) {
    let Some(rel) = record.img_path() else {
        return;
    };
    if rel.is_relative() {
        let joined = root.join(rel);
        debug!("resolved {} -> {}", rel.display(), joined.display());
        record.insert(IMG_PATH, RecordValue::Path(joined));
    }
}

fn require_img_path(record: &SampleRecord, row: usize) -> Result<()> {
    match record.get(IMG_PATH) {
        Some(RecordValue::String(s)) if !s.is_empty() => Ok(()),
        Some(RecordValue::Path(p)) if !p.as_os_str().is_empty() => Ok(()),
        Some(RecordValue::String(_) | RecordValue::Path(_) | RecordValue::Null) | None => {
            bail!("Row {row}: missing '{IMG_PATH}'")
        }
        Some(other) => bail!("Row {row}: '{IMG_PATH}' must be a string, got {}", other.kind()),
    }
}

// ---------------------------------------------------------------------------
// JSON manifest
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented):
///
/// ```json
/// [
///   { "img_path": "images/0001.png", "split": "train", "instances": 3 },
///   ...
/// ]
/// ```
fn load_json(path: &Path) -> Result<Vec<SampleRecord>> {
    let text = std::fs::read_to_string(path).context("reading JSON manifest")?;
    let root: JsonValue = serde_json::from_str(&text).context("parsing JSON manifest")?;

    let rows = root
        .as_array()
        .context("Expected top-level JSON array")?;

    let mut records = Vec::with_capacity(rows.len());

    for (i, row) in rows.iter().enumerate() {
        let obj = row
            .as_object()
            .with_context(|| format!("Row {i} is not a JSON object"))?;

        let record: SampleRecord = obj
            .iter()
            .map(|(key, val)| (key.clone(), json_to_value(val)))
            .collect();
        require_img_path(&record, i)?;
        records.push(record);
    }

    Ok(records)
}

fn json_to_value(val: &JsonValue) -> RecordValue {
    match val {
        JsonValue::String(s) => RecordValue::String(s.clone()),
        JsonValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                RecordValue::Integer(i)
            } else if let Some(f) = n.as_f64() {
                RecordValue::Float(f)
            } else {
                RecordValue::String(n.to_string())
            }
        }
        JsonValue::Bool(b) => RecordValue::Bool(*b),
        JsonValue::Null => RecordValue::Null,
        other => RecordValue::String(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// CSV manifest
// ---------------------------------------------------------------------------

/// CSV layout: header row with column names, one of which is `img_path`.
/// Other columns are typed by content (integer, float, bool, else string).
fn load_csv(path: &Path) -> Result<Vec<SampleRecord>> {
    let mut reader = csv::Reader::from_path(path).context("opening CSV manifest")?;
    let headers: Vec<String> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .map(|h| h.to_string())
        .collect();

    if !headers.iter().any(|h| h == IMG_PATH) {
        bail!("CSV manifest missing '{IMG_PATH}' column");
    }

    let mut records = Vec::new();

    for (row_no, result) in reader.records().enumerate() {
        let row = result.with_context(|| format!("CSV row {row_no}"))?;

        let record: SampleRecord = headers
            .iter()
            .zip(row.iter())
            .map(|(col, value)| {
                let value = if col == IMG_PATH {
                    RecordValue::String(value.to_string())
                } else {
                    guess_value_type(value)
                };
                (col.clone(), value)
            })
            .collect();
        require_img_path(&record, row_no)?;
        records.push(record);
    }

    Ok(records)
}

fn guess_value_type(s: &str) -> RecordValue {
    if s.is_empty() {
        return RecordValue::Null;
    }
    if let Ok(i) = s.parse::<i64>() {
        return RecordValue::Integer(i);
    }
    if let Ok(f) = s.parse::<f64>() {
        return RecordValue::Float(f);
    }
    if s == "true" || s == "false" {
        return RecordValue::Bool(s == "true");
    }
    RecordValue::String(s.to_string())
}

// ---------------------------------------------------------------------------
// Parquet manifest
// ---------------------------------------------------------------------------

/// Load a Parquet manifest.
///
/// Expected schema:
/// - `img_path`: Utf8 / LargeUtf8
/// - Any other scalar columns are carried as record entries
///   (strings, ints, floats, bools)
fn load_parquet(path: &Path) -> Result<Vec<SampleRecord>> {
    let file = std::fs::File::open(path).context("opening parquet manifest")?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)
        .context("reading parquet metadata")?;
    let reader = builder.build().context("building parquet reader")?;

    let mut records = Vec::new();

    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        let schema = batch.schema();

        schema
            .index_of(IMG_PATH)
            .map_err(|_| anyhow::anyhow!("Parquet manifest missing '{IMG_PATH}' column"))?;

        let columns: Vec<(&Arc<dyn Array>, &String)> = batch
            .columns()
            .iter()
            .zip(schema.fields().iter().map(|f| f.name()))
            .collect();

        for row in 0..batch.num_rows() {
            let row_no = records.len();
            let record: SampleRecord = columns
                .iter()
                .map(|(col, name)| ((*name).clone(), extract_value(col, row)))
                .collect();
            require_img_path(&record, row_no)?;
            records.push(record);
        }
    }

    Ok(records)
}

/// Extract a single scalar value from an Arrow column at a given row.
fn extract_value(col: &Arc<dyn Array>, row: usize) -> RecordValue {
    if col.is_null(row) {
        return RecordValue::Null;
    }
    match col.data_type() {
        DataType::Utf8 => RecordValue::String(col.as_string::<i32>().value(row).to_string()),
        DataType::LargeUtf8 => RecordValue::String(col.as_string::<i64>().value(row).to_string()),
        DataType::Int32 => col
            .as_any()
            .downcast_ref::<Int32Array>()
            .map_or(RecordValue::Null, |a| RecordValue::Integer(a.value(row) as i64)),
        DataType::Int64 => col
            .as_any()
            .downcast_ref::<Int64Array>()
            .map_or(RecordValue::Null, |a| RecordValue::Integer(a.value(row))),
        DataType::Float32 => col
            .as_any()
            .downcast_ref::<Float32Array>()
            .map_or(RecordValue::Null, |a| RecordValue::Float(a.value(row) as f64)),
        DataType::Float64 => col
            .as_any()
            .downcast_ref::<Float64Array>()
            .map_or(RecordValue::Null, |a| RecordValue::Float(a.value(row))),
        DataType::Boolean => col
            .as_any()
            .downcast_ref::<BooleanArray>()
            .map_or(RecordValue::Null, |a| RecordValue::Bool(a.value(row))),
        other => RecordValue::String(format!("{other:?}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    use arrow::array::StringArray;
    use arrow::datatypes::{Field, Schema};
    use arrow::record_batch::RecordBatch;
    use parquet::arrow::ArrowWriter;

    #[test]
    fn json_manifest_keeps_metadata_types() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("train.json");
        fs::write(
            &path,
            r#"[{"img_path": "a.png", "split": "train", "instances": 3, "score": 0.5, "crowd": false}]"#,
        )?;

        let records = load_manifest(&path, None)?;
        assert_eq!(records.len(), 1);
        let r = &records[0];
        assert_eq!(r.img_path(), Some(Path::new("a.png")));
        assert_eq!(r.get("split"), Some(&RecordValue::String("train".into())));
        assert_eq!(r.get("instances"), Some(&RecordValue::Integer(3)));
        assert_eq!(r.get("score"), Some(&RecordValue::Float(0.5)));
        assert_eq!(r.get("crowd"), Some(&RecordValue::Bool(false)));
        Ok(())
    }

    #[test]
    fn json_row_without_img_path_is_rejected() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("bad.json");
        fs::write(&path, r#"[{"img_path": "a.png"}, {"split": "val"}]"#)?;

        let err = load_manifest(&path, None).unwrap_err();
        assert!(err.to_string().contains("Row 1"));
        Ok(())
    }

    #[test]
    fn csv_manifest_with_data_root() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("val.csv");
        fs::write(&path, "img_path,instances\nimgs/a.png,2\n/abs/b.png,\n")?;

        let root = Path::new("/data/set");
        let records = load_manifest(&path, Some(root))?;
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].img_path(), Some(root.join("imgs/a.png").as_path()));
        assert_eq!(records[0].get("instances"), Some(&RecordValue::Integer(2)));
        assert_eq!(records[1].img_path(), Some(Path::new("/abs/b.png")));
        assert_eq!(records[1].get("instances"), Some(&RecordValue::Null));
        Ok(())
    }

    #[test]
    fn csv_without_img_path_column_is_rejected() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("val.csv");
        fs::write(&path, "file,instances\na.png,2\n")?;
        assert!(load_manifest(&path, None).is_err());
        Ok(())
    }

    #[test]
    fn parquet_manifest_reads_scalar_columns() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("train.parquet");

        let schema = Arc::new(Schema::new(vec![
            Field::new(IMG_PATH, DataType::Utf8, false),
            Field::new("instances", DataType::Int64, true),
        ]));
        let batch = RecordBatch::try_new(
            schema.clone(),
            vec![
                Arc::new(StringArray::from(vec!["a.png", "b.png"])),
                Arc::new(Int64Array::from(vec![Some(1), None])),
            ],
        )?;
        let mut writer = ArrowWriter::try_new(fs::File::create(&path)?, schema, None)?;
        writer.write(&batch)?;
        writer.close()?;

        let records = load_manifest(&path, None)?;
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].img_path(), Some(Path::new("b.png")));
        assert_eq!(records[0].get("instances"), Some(&RecordValue::Integer(1)));
        assert_eq!(records[1].get("instances"), Some(&RecordValue::Null));
        Ok(())
    }

    #[test]
    fn unknown_extension_is_rejected() {
        let err = load_manifest(Path::new("samples.yaml"), None).unwrap_err();
        assert!(err.to_string().contains(".yaml"));
    }
}
