use std::io::Cursor;

use calamine::{open_workbook_auto_from_rs, Data, Reader};
use rust_xlsxwriter::Workbook;

use crate::data::format::{ReadOptions, RecordCodec};
use crate::data::model::{CellValue, Record, RecordSet};
use crate::error::CodecError;

/// Excel workbooks. Reads the first worksheet of `.xls`/`.xlsx` (format is
/// sniffed from the bytes), writes a single-sheet `.xlsx` workbook.
pub struct SpreadsheetCodec;

impl RecordCodec for SpreadsheetCodec {
    fn name(&self) -> &'static str {
        "spreadsheet"
    }

    fn extensions(&self) -> &'static [&'static str] {
        &["xlsx", "xls"]
    }

    fn decode(&self, bytes: &[u8], options: &ReadOptions) -> Result<RecordSet, CodecError> {
        let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes))?;
        let range = match workbook.worksheet_range_at(0) {
            Some(range) => range?,
            None => return Err(CodecError::Shape("workbook has no worksheets".into())),
        };

        let mut rows = range.rows();
        let Some(header_row) = rows.next() else {
            return Ok(RecordSet::default());
        };
        let headers: Vec<String> = header_row
            .iter()
            .enumerate()
            .map(|(col, cell)| match cell {
                Data::Empty => format!("Unnamed: {col}"),
                other => cell_to_value(other, true).to_text(),
            })
            .collect();

        let records: RecordSet = rows
            .map(|row| {
                headers
                    .iter()
                    .enumerate()
                    .map(|(col, name)| {
                        let value = row
                            .get(col)
                            .map(|cell| cell_to_value(cell, options.spreadsheet_as_text))
                            .unwrap_or(CellValue::Null);
                        (name.as_str(), value)
                    })
                    .collect::<Record>()
            })
            .collect();

        Ok(records)
    }

    /// Header row, then one row per record. Every cell is a string cell so the
    /// spreadsheet application does not reformat numbers; `Null` stays blank.
    fn encode(&self, records: &RecordSet) -> Result<Vec<u8>, CodecError> {
        let header = records.header();
        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();

        for (col, name) in header.iter().enumerate() {
            worksheet.write_string(0, column_index(col)?, name)?;
        }

        for (idx, record) in records.iter().enumerate() {
            let row = u32::try_from(idx + 1)
                .map_err(|_| CodecError::Shape(format!("row {idx} exceeds worksheet limits")))?;
            for (col, name) in header.iter().enumerate() {
                match record.get(name) {
                    None | Some(CellValue::Null) => {}
                    Some(value) => {
                        worksheet.write_string(row, column_index(col)?, value.to_text())?;
                    }
                }
            }
        }

        Ok(workbook.save_to_buffer()?)
    }
}

fn column_index(col: usize) -> Result<u16, CodecError> {
    u16::try_from(col).map_err(|_| CodecError::Shape(format!("column {col} exceeds worksheet limits")))
}

fn cell_to_value(cell: &Data, as_text: bool) -> CellValue {
    match cell {
        Data::Empty | Data::Error(_) => CellValue::Null,
        Data::String(s) => CellValue::String(s.clone()),
        _ if as_text => CellValue::String(cell.to_string()),
        Data::Int(i) => CellValue::Integer(*i),
        Data::Float(f) => CellValue::Float(*f),
        Data::Bool(b) => CellValue::Bool(*b),
        other => CellValue::String(other.to_string()),
    }
}
