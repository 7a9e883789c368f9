use super::model::{CellValue, Record, RecordSet};

/// Name of the field compared against the threshold.
pub const VALUE_FIELD: &str = "value";
/// Name of the identifier field kept by [`Projection::Normalized`].
pub const ID_FIELD: &str = "id";

// ---------------------------------------------------------------------------
// Options
// ---------------------------------------------------------------------------

/// Shape of the records that pass the filter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Projection {
    /// Keep the original record unchanged.
    #[default]
    Passthrough,
    /// Reduce to `{id, value}` with `value` as the parsed integer.
    Normalized,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterOptions {
    pub threshold: i64,
    pub projection: Projection,
}

/// Counters describing one filter pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FilterStats {
    pub kept: usize,
    pub below_threshold: usize,
    pub malformed: usize,
}

/// Why a record could not be compared. Always recovered by skipping the row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Malformed {
    MissingValue,
    NotInteger,
}

// ---------------------------------------------------------------------------
// Filter predicate
// ---------------------------------------------------------------------------

/// Keep records whose `value` is an integer strictly greater than `threshold`.
///
/// Records unchanged, order preserved. Rows with a missing or non-integer
/// `value` are skipped.
pub fn process_data(records: &RecordSet, threshold: i64) -> RecordSet {
    let options = FilterOptions {
        threshold,
        projection: Projection::Passthrough,
    };
    filter_records(records, &options).0
}

/// Filter with an explicit projection, returning pass statistics as well.
pub fn filter_records(records: &RecordSet, options: &FilterOptions) -> (RecordSet, FilterStats) {
    let mut stats = FilterStats::default();

    let kept: RecordSet = records
        .iter()
        .enumerate()
        .filter_map(|(row, record)| match parse_value(record) {
            Ok(value) if value > options.threshold => {
                stats.kept += 1;
                Some(project(record, value, options.projection))
            }
            Ok(_) => {
                stats.below_threshold += 1;
                None
            }
            Err(reason) => {
                log::debug!("Skipping row {row}: {reason:?} in '{VALUE_FIELD}' field");
                stats.malformed += 1;
                None
            }
        })
        .collect();

    log::info!(
        "Filter (> {}): kept {}, below threshold {}, skipped malformed {}",
        options.threshold,
        stats.kept,
        stats.below_threshold,
        stats.malformed
    );
    (kept, stats)
}

fn parse_value(record: &Record) -> Result<i64, Malformed> {
    let value = record.get(VALUE_FIELD).ok_or(Malformed::MissingValue)?;
    value.as_integer().ok_or(Malformed::NotInteger)
}

fn project(record: &Record, value: i64, projection: Projection) -> Record {
    match projection {
        Projection::Passthrough => record.clone(),
        Projection::Normalized => {
            let id = record
                .get(ID_FIELD)
                .cloned()
                .unwrap_or_else(|| CellValue::String(String::new()));
            Record::new().with(ID_FIELD, id).with(VALUE_FIELD, value)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(id: &str, value: &str) -> Record {
        Record::new().with("id", id).with("value", value)
    }

    #[test]
    fn keeps_values_strictly_above_threshold() {
        let data = RecordSet::new(vec![row("1", "5"), row("2", "15")]);
        assert_eq!(process_data(&data, 10), RecordSet::new(vec![row("2", "15")]));
    }

    #[test]
    fn custom_threshold_is_exclusive() {
        let data = RecordSet::new(vec![row("1", "5"), row("2", "15"), row("3", "20")]);
        assert_eq!(process_data(&data, 15), RecordSet::new(vec![row("3", "20")]));
    }

    #[test]
    fn non_numeric_values_are_skipped() {
        let data = RecordSet::new(vec![row("1", "abc"), row("2", "20")]);
        assert_eq!(process_data(&data, 10), RecordSet::new(vec![row("2", "20")]));
    }

    #[test]
    fn missing_value_field_is_skipped() {
        let data = RecordSet::new(vec![
            Record::new().with("id", "1"),
            Record::new().with("id", "2").with("value", CellValue::Null),
            row("3", "11"),
        ]);
        let options = FilterOptions {
            threshold: 10,
            projection: Projection::Passthrough,
        };
        let (kept, stats) = filter_records(&data, &options);
        assert_eq!(kept, RecordSet::new(vec![row("3", "11")]));
        assert_eq!(
            stats,
            FilterStats {
                kept: 1,
                below_threshold: 0,
                malformed: 2
            }
        );
    }

    #[test]
    fn preserves_input_order_and_extra_fields() {
        let data = RecordSet::new(vec![
            row("9", "90").with("note", "x"),
            row("1", "1"),
            row("5", "50"),
        ]);
        let kept = process_data(&data, 10);
        let ids: Vec<String> = kept.iter().map(|r| r.get("id").unwrap().to_text()).collect();
        assert_eq!(ids, vec!["9", "5"]);
        assert_eq!(kept.records()[0].get("note"), Some(&CellValue::from("x")));
    }

    #[test]
    fn typed_numbers_are_compared_too() {
        let data = RecordSet::new(vec![
            Record::new().with("value", 12_i64),
            Record::new().with("value", CellValue::Float(11.5)),
            Record::new().with("value", CellValue::Float(10.9)),
            Record::new().with("value", CellValue::Bool(true)),
        ]);
        assert_eq!(process_data(&data, 10).len(), 2);
    }

    #[test]
    fn fractional_numbers_are_truncated_before_comparing() {
        let data = RecordSet::new(vec![
            Record::new().with("id", "1").with("value", CellValue::Float(11.5)),
            Record::new().with("id", "2").with("value", CellValue::Float(30.9)),
            Record::new().with("id", "3").with("value", 12_i64),
        ]);
        let ids: Vec<String> = process_data(&data, 10)
            .iter()
            .map(|r| r.get("id").unwrap().to_text())
            .collect();
        assert_eq!(ids, vec!["1", "2", "3"]);
    }

    #[test]
    fn negative_threshold() {
        let data = RecordSet::new(vec![row("1", "-5"), row("2", "0")]);
        assert_eq!(process_data(&data, -5), RecordSet::new(vec![row("2", "0")]));
    }

    #[test]
    fn normalized_projection_emits_id_and_parsed_value() {
        let data = RecordSet::new(vec![
            row("7", " 42 ").with("extra", "dropped"),
            Record::new().with("value", "30"),
        ]);
        let options = FilterOptions {
            threshold: 10,
            projection: Projection::Normalized,
        };
        let (kept, _) = filter_records(&data, &options);
        assert_eq!(
            kept,
            RecordSet::new(vec![
                Record::new().with("id", "7").with("value", 42_i64),
                Record::new().with("id", "").with("value", 30_i64),
            ])
        );
    }

    #[test]
    fn empty_input_gives_empty_output() {
        assert!(process_data(&RecordSet::default(), 0).is_empty());
    }
}
