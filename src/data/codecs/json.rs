use indexmap::IndexMap;
use serde_json::{Map, Value as JsonValue};

use crate::data::format::{ReadOptions, RecordCodec};
use crate::data::model::{CellValue, Record, RecordSet};
use crate::error::CodecError;

/// JSON records. Accepted layouts (pandas `orient` names in brackets):
///
/// ```json
/// [{"id": "1", "value": "5"}, {"id": "2", "value": "15"}]        // records
/// {"id": ["1", "2"], "value": ["5", "15"]}                       // column arrays
/// {"id": {"0": "1", "1": "2"}, "value": {"0": "5", "1": "15"}}   // columns
/// ```
///
/// Output is always the records layout.
pub struct JsonCodec;

impl RecordCodec for JsonCodec {
    fn name(&self) -> &'static str {
        "JSON"
    }

    fn extensions(&self) -> &'static [&'static str] {
        &["json"]
    }

    fn decode(&self, bytes: &[u8], _options: &ReadOptions) -> Result<RecordSet, CodecError> {
        let root: JsonValue = serde_json::from_slice(bytes)?;
        match root {
            JsonValue::Array(rows) => from_rows(rows),
            JsonValue::Object(columns) => from_columns(columns),
            other => Err(CodecError::Shape(format!(
                "expected a JSON array of objects or an object of columns, found {}",
                kind_of(&other)
            ))),
        }
    }

    fn encode(&self, records: &RecordSet) -> Result<Vec<u8>, CodecError> {
        let mut bytes = serde_json::to_vec_pretty(records)?;
        bytes.push(b'\n');
        Ok(bytes)
    }
}

fn from_rows(rows: Vec<JsonValue>) -> Result<RecordSet, CodecError> {
    rows.into_iter()
        .enumerate()
        .map(|(i, row)| match row {
            JsonValue::Object(obj) => Ok(obj
                .into_iter()
                .map(|(k, v)| (k, json_to_cell(v)))
                .collect::<Record>()),
            other => Err(CodecError::Shape(format!(
                "row {i} is not a JSON object (found {})",
                kind_of(&other)
            ))),
        })
        .collect()
}

/// Column-oriented input. Each column is either an array (row = position) or
/// an object keyed by row label. Row labels keep first-seen order; a column
/// with no entry for a row contributes `Null`.
fn from_columns(columns: Map<String, JsonValue>) -> Result<RecordSet, CodecError> {
    let mut rows: IndexMap<String, Record> = IndexMap::new();
    let names: Vec<String> = columns.keys().cloned().collect();

    for (name, column) in columns {
        let cells: Vec<(String, JsonValue)> = match column {
            JsonValue::Array(values) => values
                .into_iter()
                .enumerate()
                .map(|(i, v)| (i.to_string(), v))
                .collect(),
            JsonValue::Object(by_label) => by_label.into_iter().collect(),
            other => {
                return Err(CodecError::Shape(format!(
                    "column '{name}' must be an array or an object, found {}",
                    kind_of(&other)
                )))
            }
        };
        for (label, value) in cells {
            rows.entry(label)
                .or_default()
                .insert(name.clone(), json_to_cell(value));
        }
    }

    // Every row carries every column, in column order.
    Ok(rows
        .into_values()
        .map(|row| {
            names
                .iter()
                .map(|n| (n.as_str(), row.get(n).cloned().unwrap_or(CellValue::Null)))
                .collect::<Record>()
        })
        .collect())
}

fn json_to_cell(val: JsonValue) -> CellValue {
    match val {
        JsonValue::String(s) => CellValue::String(s),
        JsonValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                CellValue::Integer(i)
            } else if let Some(f) = n.as_f64() {
                CellValue::Float(f)
            } else {
                CellValue::String(n.to_string())
            }
        }
        JsonValue::Bool(b) => CellValue::Bool(b),
        JsonValue::Null => CellValue::Null,
        nested => CellValue::String(nested.to_string()),
    }
}

fn kind_of(val: &JsonValue) -> &'static str {
    match val {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "a boolean",
        JsonValue::Number(_) => "a number",
        JsonValue::String(_) => "a string",
        JsonValue::Array(_) => "an array",
        JsonValue::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode(text: &str) -> Result<RecordSet, CodecError> {
        JsonCodec.decode(text.as_bytes(), &ReadOptions::default())
    }

    #[test]
    fn decodes_records_layout_in_order() {
        let set = decode(r#"[{"value": "5", "id": "1"}, {"value": 15, "id": "2"}]"#).unwrap();
        assert_eq!(set.len(), 2);
        let names: Vec<&str> = set.records()[0].field_names().collect();
        assert_eq!(names, vec!["value", "id"]);
        assert_eq!(set.records()[1].get("value"), Some(&CellValue::Integer(15)));
    }

    #[test]
    fn decodes_column_arrays() {
        let set = decode(r#"{"id": ["1", "2"], "value": ["5", "15"]}"#).unwrap();
        assert_eq!(
            set,
            RecordSet::new(vec![
                Record::new().with("id", "1").with("value", "5"),
                Record::new().with("id", "2").with("value", "15"),
            ])
        );
    }

    #[test]
    fn decodes_labelled_columns_with_gaps() {
        let set = decode(r#"{"id": {"a": "1", "b": "2"}, "value": {"b": "15"}}"#).unwrap();
        assert_eq!(set.len(), 2);
        assert_eq!(set.records()[0].get("value"), Some(&CellValue::Null));
        assert_eq!(set.records()[1].get("value"), Some(&CellValue::from("15")));
    }

    #[test]
    fn nested_values_become_json_text() {
        let set = decode(r#"[{"tags": ["x", "y"], "flag": true}]"#).unwrap();
        let rec = &set.records()[0];
        assert_eq!(rec.get("tags"), Some(&CellValue::from(r#"["x","y"]"#)));
        assert_eq!(rec.get("flag"), Some(&CellValue::Bool(true)));
    }

    #[test]
    fn rejects_non_tabular_shapes() {
        assert!(matches!(decode("42"), Err(CodecError::Shape(_))));
        assert!(matches!(decode(r#"[{"a": 1}, 3]"#), Err(CodecError::Shape(_))));
        assert!(matches!(decode(r#"{"a": 1}"#), Err(CodecError::Shape(_))));
        assert!(matches!(decode("{not json"), Err(CodecError::Json(_))));
    }

    #[test]
    fn encodes_pretty_records_array() {
        let set = RecordSet::new(vec![Record::new().with("id", "1").with("value", "100")]);
        let text = String::from_utf8(JsonCodec.encode(&set).unwrap()).unwrap();
        assert_eq!(text, "[\n  {\n    \"id\": \"1\",\n    \"value\": \"100\"\n  }\n]\n");
    }

    #[test]
    fn keeps_non_ascii_unescaped() {
        let set = RecordSet::new(vec![Record::new().with("name", "Привет")]);
        let text = String::from_utf8(JsonCodec.encode(&set).unwrap()).unwrap();
        assert!(text.contains("Привет"));
    }
}
