use crate::data::format::{ReadOptions, RecordCodec};
use crate::data::model::{CellValue, Record, RecordSet};
use crate::error::CodecError;

/// Comma-delimited text with a header row. Every cell is read as a string.
pub struct CsvCodec;

impl RecordCodec for CsvCodec {
    fn name(&self) -> &'static str {
        "CSV"
    }

    fn extensions(&self) -> &'static [&'static str] {
        &["csv"]
    }

    /// Header row defines the field names. Short rows are padded with `Null`,
    /// cells beyond the header are dropped.
    fn decode(&self, bytes: &[u8], _options: &ReadOptions) -> Result<RecordSet, CodecError> {
        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .from_reader(bytes);

        let headers: Vec<String> = reader.headers()?.iter().map(|h| h.to_string()).collect();

        let mut records = Vec::new();
        for result in reader.records() {
            let row = result?;
            let record: Record = headers
                .iter()
                .enumerate()
                .map(|(idx, name)| {
                    let value = match row.get(idx) {
                        Some(cell) => CellValue::String(cell.to_string()),
                        None => CellValue::Null,
                    };
                    (name.as_str(), value)
                })
                .collect();
            records.push(record);
        }

        Ok(RecordSet::new(records))
    }

    /// Header from the first record. Later records missing a header field get
    /// an empty cell; fields not in the header are not written.
    fn encode(&self, records: &RecordSet) -> Result<Vec<u8>, CodecError> {
        let header = records.header();
        let mut writer = csv::Writer::from_writer(Vec::new());
        writer.write_record(&header)?;

        for record in records {
            let row: Vec<String> = header
                .iter()
                .map(|name| record.get(name).map(CellValue::to_text).unwrap_or_default())
                .collect();
            writer.write_record(&row)?;
        }

        writer.into_inner().map_err(|e| CodecError::Io(e.into_error()))
    }
}
