//! Writes a deterministic demo data set plus a config that points at it.
//!
//! Usage: `generate_sample [DIR]` (default: current directory)

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use rusty_sieve::{save_result, CellValue, Record, RecordSet};
use serde::Serialize;

const ROWS: u64 = 40;
const SAMPLE_THRESHOLD: i64 = 25;

/// Shape of the generated `sample_config.yaml`.
#[derive(Debug, Serialize)]
struct SampleConfig {
    input: PathBuf,
    output: PathBuf,
    threshold: i64,
}

/// Minimal deterministic PRNG (splitmix64).
struct SimpleRng {
    state: u64,
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        SimpleRng { state: seed }
    }

    fn next_u64(&mut self) -> u64 {
        self.state = self.state.wrapping_add(0x9E37_79B9_7F4A_7C15);
        let mut z = self.state;
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        z ^ (z >> 31)
    }

    fn below(&mut self, bound: u64) -> u64 {
        self.next_u64() % bound
    }
}

fn sample_records() -> RecordSet {
    let mut rng = SimpleRng::new(42);
    let sensors = ["north", "south", "east", "west"];

    (1..=ROWS)
        .map(|id| {
            // Every seventh row carries junk so the skip path gets exercised.
            let value = if id % 7 == 0 {
                CellValue::from("n/a")
            } else {
                CellValue::String(rng.below(50).to_string())
            };
            Record::new()
                .with("id", id.to_string())
                .with("value", value)
                .with("sensor", sensors[(id % 4) as usize])
        })
        .collect()
}

/// Paths with YAML metacharacters (`: `, `#`, leading quotes) come out quoted.
fn sample_config_yaml(dir: &Path) -> Result<String> {
    let config = SampleConfig {
        input: dir.join("sample_data.csv"),
        output: dir.join("filtered").join("sample_out.json"),
        threshold: SAMPLE_THRESHOLD,
    };
    serde_yaml::to_string(&config).context("serializing sample config")
}

fn main() -> Result<()> {
    let dir = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."));

    let records = sample_records();
    for name in ["sample_data.csv", "sample_data.json", "sample_data.xlsx"] {
        let path = dir.join(name);
        save_result(&records, &path, false)
            .with_context(|| format!("writing {}", path.display()))?;
    }

    let config = dir.join("sample_config.yaml");
    let body = sample_config_yaml(&dir)?;
    std::fs::write(&config, body).with_context(|| format!("writing {}", config.display()))?;

    println!(
        "Wrote {} records to {}/sample_data.{{csv,json,xlsx}} and config {}",
        records.len(),
        dir.display(),
        config.display()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rusty_sieve::{load_config, ThresholdPolicy};

    #[test]
    fn config_survives_awkward_directory_names() {
        let root = tempfile::tempdir().unwrap();
        let dir = root.path().join("runs: #1 'a'");
        std::fs::create_dir(&dir).unwrap();

        let path = dir.join("sample_config.yaml");
        std::fs::write(&path, sample_config_yaml(&dir).unwrap()).unwrap();

        let cfg = load_config(&path, ThresholdPolicy::Strict).unwrap();
        assert_eq!(cfg.input_path, dir.join("sample_data.csv"));
        assert_eq!(cfg.output_path, dir.join("filtered").join("sample_out.json"));
        assert_eq!(cfg.threshold, SAMPLE_THRESHOLD);
    }

    #[test]
    fn every_seventh_row_is_malformed() {
        let records = sample_records();
        assert_eq!(records.len(), ROWS as usize);
        let junk = records
            .iter()
            .filter(|r| r.get("value") == Some(&CellValue::from("n/a")))
            .count();
        assert_eq!(junk, (ROWS / 7) as usize);
    }
}
