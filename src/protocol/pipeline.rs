//! Configuration pipeline: JSON value files in, populated register images out.
//!
//! Bad records are skipped with a warning. A file that cannot be read or
//! placed fails its own category only; the driver carries on with the others.
use anyhow::{anyhow, Context, Result};
use serde_json::Value;
use std::{fs::File, io::BufReader, io::Read, path::Path};

use super::{
    encoding::{EncodedEntry, ValueDescriptor},
    register::{RegisterBank, RegisterCategory},
};

/// Outcome of configuring one category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CategoryReport {
    pub category: RegisterCategory,
    pub placed: usize,
    pub skipped: usize,
}

/// Decode a JSON array of raw records.
pub fn load_records<R: Read>(reader: R) -> Result<Vec<Value>> {
    let value: Value = serde_json::from_reader(reader)?;
    match value {
        Value::Array(records) => Ok(records),
        other => Err(anyhow!(
            "expected a JSON array of value records, got {}",
            json_type_name(&other)
        )),
    }
}

/// Turn raw records into encoded entries, keeping their order.
///
/// Returns the entries and the number of skipped records.
pub fn encode_records(
    category: RegisterCategory,
    records: &[Value],
) -> (Vec<EncodedEntry>, usize) {
    let mut entries = Vec::with_capacity(records.len());
    let mut skipped = 0;
    for (index, record) in records.iter().enumerate() {
        match ValueDescriptor::from_record(record) {
            Ok(descriptor) => entries.push(descriptor.encode()),
            Err(err) => {
                log::warn!("Skipping {category} record #{index}: {err}");
                skipped += 1;
            }
        }
    }
    (entries, skipped)
}

/// Configure one category from already decoded records.
pub fn configure_records(
    bank: &mut RegisterBank,
    category: RegisterCategory,
    records: &[Value],
    address_offset: i64,
) -> Result<CategoryReport> {
    let (entries, skipped) = encode_records(category, records);
    bank.build_image(category, &entries, address_offset)?;

    let report = CategoryReport {
        category,
        placed: entries.len(),
        skipped,
    };
    log::info!(
        "Configured {category} registers: {} placed, {} skipped",
        report.placed,
        report.skipped
    );
    Ok(report)
}

/// Configure one category from the JSON file at `path`.
pub fn configure_category(
    bank: &mut RegisterBank,
    category: RegisterCategory,
    path: &Path,
    address_offset: i64,
) -> Result<CategoryReport> {
    let file = File::open(path).with_context(|| {
        format!(
            "failed to open config file for {category}: {}",
            path.display()
        )
    })?;
    let records = load_records(BufReader::new(file))
        .with_context(|| format!("failed to decode {}", path.display()))?;
    configure_records(bank, category, &records, address_offset)
        .with_context(|| format!("failed to set {category} registers from {}", path.display()))
}

/// Configure every given category in order, reporting failures and going on.
///
/// Returns the reports of the categories that succeeded.
pub fn configure_bank<'a, I>(
    bank: &mut RegisterBank,
    files: I,
    address_offset: i64,
) -> Vec<CategoryReport>
where
    I: IntoIterator<Item = (RegisterCategory, &'a Path)>,
{
    let mut reports = Vec::new();
    for (category, path) in files {
        match configure_category(bank, category, path, address_offset) {
            Ok(report) => reports.push(report),
            Err(err) => log::error!("error: {category} registers not configured: {err:#}"),
        }
    }
    reports
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
