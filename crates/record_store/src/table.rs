//! Whole-file CSV table encoding.
//!
//! Every table is a header row followed by one row per record, UTF-8 and
//! comma-separated. Columns are matched by header name on read.

use std::{io::ErrorKind, path::Path};

use serde::{de::DeserializeOwned, Serialize};
use tokio::fs;

use crate::{StoreError, StoreResult};

/// Parses a full table, header row included.
pub fn parse_rows<T: DeserializeOwned>(bytes: &[u8]) -> StoreResult<Vec<T>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(bytes);

    reader
        .deserialize()
        .map(|row| row.map_err(StoreError::from))
        .collect()
}

/// Encodes a full table. The header row is written even when `rows` is empty.
pub fn encode_rows<T: Serialize>(columns: &[&str], rows: &[T]) -> StoreResult<Vec<u8>> {
    let mut writer = header_writer(columns)?;
    for row in rows {
        writer.serialize(row)?;
    }

    finish(writer)
}

fn finish(writer: csv::Writer<Vec<u8>>) -> StoreResult<Vec<u8>> {
    writer
        .into_inner()
        .map_err(|e| StoreError::Io(std::io::Error::new(e.error().kind(), e.to_string())))
}

fn header_writer(columns: &[&str]) -> StoreResult<csv::Writer<Vec<u8>>> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::new());
    writer.write_record(columns)?;
    Ok(writer)
}

/// Loads every row of the table at `path`.
///
/// A missing file is created holding only the header row, and an empty
/// collection is returned.
pub async fn load<T: DeserializeOwned>(path: &Path, columns: &[&str]) -> StoreResult<Vec<T>> {
    match fs::read(path).await {
        Ok(bytes) => parse_rows(&bytes).map_err(|e| match e {
            StoreError::Csv(source) => StoreError::malformed(path, source),
            other => other,
        }),
        Err(e) if e.kind() == ErrorKind::NotFound => {
            write_file(path, finish(header_writer(columns)?)?).await?;
            tracing::info!(path = %path.display(), "Created empty table");
            Ok(Vec::new())
        }
        Err(e) => Err(e.into()),
    }
}

/// Rewrites the table at `path` with exactly `rows`.
pub async fn save<T: Serialize>(path: &Path, columns: &[&str], rows: &[T]) -> StoreResult<()> {
    write_file(path, encode_rows(columns, rows)?).await
}

async fn write_file(path: &Path, bytes: Vec<u8>) -> StoreResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).await?;
    }
    fs::write(path, bytes).await?;
    Ok(())
}
