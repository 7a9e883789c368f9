use std::fmt;
use std::path::Path;

use crate::config::{load_config, Config, ThresholdPolicy};
use crate::data::filter::{filter_records, FilterOptions, FilterStats, Projection};
use crate::data::format::{CodecRegistry, ReadOptions};
use crate::data::loader::load_data_with;
use crate::data::writer::{save_result_with, WriteOutcome};
use crate::error::Result;

// ---------------------------------------------------------------------------
// Run options and results
// ---------------------------------------------------------------------------

/// Everything that shapes one run besides the config file itself.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunOptions {
    pub dry_run: bool,
    pub threshold_policy: ThresholdPolicy,
    pub projection: Projection,
    pub read: ReadOptions,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub config: Config,
    pub records_read: usize,
    pub filter: FilterStats,
    pub outcome: WriteOutcome,
}

/// Progress of a [`Pipeline`]. Each step runs at most once.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Idle,
    ConfigLoaded,
    DataLoaded,
    Filtered,
    Done,
    Failed,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Idle => "idle",
            Stage::ConfigLoaded => "config loaded",
            Stage::DataLoaded => "data loaded",
            Stage::Filtered => "filtered",
            Stage::Done => "done",
            Stage::Failed => "failed",
        };
        f.write_str(name)
    }
}

// ---------------------------------------------------------------------------
// Entry points
// ---------------------------------------------------------------------------

/// Load config → read input → filter → write output, with canonical policies.
pub fn run(config_path: &Path, dry_run: bool) -> Result<RunSummary> {
    let options = RunOptions {
        dry_run,
        ..RunOptions::default()
    };
    run_with(config_path, &options)
}

/// Same as [`run`] with every policy spelled out.
pub fn run_with(config_path: &Path, options: &RunOptions) -> Result<RunSummary> {
    Pipeline::new(*options).run(config_path)
}

// ---------------------------------------------------------------------------
// Pipeline
// ---------------------------------------------------------------------------

/// Sequences the stages of a run and remembers how far it got.
///
/// Fail-fast: the first error moves the pipeline to [`Stage::Failed`] and is
/// returned as-is; later stages never run.
pub struct Pipeline {
    registry: CodecRegistry,
    options: RunOptions,
    stage: Stage,
}

impl Pipeline {
    pub fn new(options: RunOptions) -> Self {
        Self::with_registry(CodecRegistry::default(), options)
    }

    /// Use a custom set of formats.
    pub fn with_registry(registry: CodecRegistry, options: RunOptions) -> Self {
        Self {
            registry,
            options,
            stage: Stage::Idle,
        }
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn run(&mut self, config_path: &Path) -> Result<RunSummary> {
        match self.execute(config_path) {
            Ok(summary) => {
                self.advance(Stage::Done);
                Ok(summary)
            }
            Err(e) => {
                log::debug!("Pipeline failed after stage '{}': {e}", self.stage);
                self.stage = Stage::Failed;
                Err(e)
            }
        }
    }

    fn execute(&mut self, config_path: &Path) -> Result<RunSummary> {
        let config = load_config(config_path, self.options.threshold_policy)?;
        self.advance(Stage::ConfigLoaded);

        let records = load_data_with(&self.registry, &config.input_path, &self.options.read)?;
        self.advance(Stage::DataLoaded);

        let filter_options = FilterOptions {
            threshold: config.threshold,
            projection: self.options.projection,
        };
        let (kept, filter) = filter_records(&records, &filter_options);
        self.advance(Stage::Filtered);

        let outcome = save_result_with(
            &self.registry,
            &kept,
            &config.output_path,
            self.options.dry_run,
        )?;

        Ok(RunSummary {
            records_read: records.len(),
            config,
            filter,
            outcome,
        })
    }

    fn advance(&mut self, next: Stage) {
        log::debug!("Pipeline stage: {} -> {next}", self.stage);
        self.stage = next;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn missing_config_fails_in_idle() {
        let mut pipeline = Pipeline::new(RunOptions::default());
        let err = pipeline.run(Path::new("does/not/exist.yaml")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert_eq!(pipeline.stage(), Stage::Failed);
    }

    #[test]
    fn missing_input_fails_after_config() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("absent.csv");
        let output = dir.path().join("out.csv");
        let cfg = dir.path().join("cfg.json");
        let body = serde_json::json!({
            "input": input.to_str().unwrap(),
            "output": output.to_str().unwrap(),
        });
        std::fs::write(&cfg, body.to_string()).unwrap();

        let mut pipeline = Pipeline::new(RunOptions::default());
        let err = pipeline.run(&cfg).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert_eq!(pipeline.stage(), Stage::Failed);
        assert!(!output.exists());
    }

    #[test]
    fn successful_run_reaches_done() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("in.json");
        let output = dir.path().join("out.json");
        std::fs::write(&input, r#"[{"id": "1", "value": 5}, {"id": "2", "value": 50}]"#).unwrap();
        let cfg = dir.path().join("cfg.json");
        let body = serde_json::json!({
            "input": input.to_str().unwrap(),
            "output": output.to_str().unwrap(),
            "threshold": 10,
        });
        std::fs::write(&cfg, body.to_string()).unwrap();

        let mut pipeline = Pipeline::new(RunOptions::default());
        let summary = pipeline.run(&cfg).unwrap();
        assert_eq!(pipeline.stage(), Stage::Done);
        assert_eq!(summary.records_read, 2);
        assert_eq!(summary.filter.kept, 1);
        assert_eq!(
            summary.outcome,
            WriteOutcome::Written {
                path: output.clone(),
                records: 1
            }
        );
    }
}
