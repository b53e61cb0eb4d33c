use csv::{ReaderBuilder, Trim};

use crate::errors::SourceError;
use crate::model::{RawRecord, RawTable, SourceSchema};

const UTF8_BOM: char = '\u{feff}';

/// Decodes CSV text into a raw table. The first row is the header; rows whose
/// width differs from the header make the whole source malformed.
pub fn decode_table(source_id: &str, content: &str, delimiter: u8) -> Result<RawTable, SourceError> {
    let content = content.strip_prefix(UTF8_BOM).unwrap_or(content);

    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(false)
        .delimiter(delimiter)
        .trim(Trim::Headers)
        .from_reader(content.as_bytes());

    let headers = reader.headers().map_err(|source| SourceError::Csv {
        source_id: source_id.to_string(),
        source,
    })?;

    if headers.is_empty() || headers.iter().all(|h| h.trim().is_empty()) {
        return Err(SourceError::MissingHeader {
            source_id: source_id.to_string(),
        });
    }

    let schema = SourceSchema::from_headers(headers.iter());

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result.map_err(|source| SourceError::Csv {
            source_id: source_id.to_string(),
            source,
        })?;
        rows.push(RawRecord::new(record.iter().map(str::to_string).collect()));
    }

    Ok(RawTable { schema, rows })
}
