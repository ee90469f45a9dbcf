//! Plain-text circuit reports.
//!
//! A report is named `circuit_{n}_{generation}.txt` and holds:
//!
//! 1. the encoding, `", "`-separated
//! 2. mineral flow per unit, then concentrate and tailings collectors
//! 3. waste flow in the same layout
//! 4. the performance
//!
//! Lines 2 to 4 are present only when flows are known, i.e. the circuit
//! reached steady state.

use std::fmt::{Display, Write as _};
use std::fs;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::error::{CircuitError, Result};
use crate::fitness::Evaluation;
use crate::flow::Flows;

/// A circuit with its optional flows, ready to persist.
#[derive(Debug, Clone, PartialEq)]
pub struct CircuitReport {
    pub encoding: Vec<usize>,
    pub generation: usize,
    pub flows: Option<Flows>,
    pub performance: f64,
}

impl CircuitReport {
    pub fn new(encoding: Vec<usize>, generation: usize, evaluation: Evaluation) -> Self {
        Self {
            encoding,
            generation,
            flows: evaluation.flows,
            performance: evaluation.performance,
        }
    }

    /// Number of units in the reported circuit.
    pub fn num_units(&self) -> usize {
        self.encoding.len().saturating_sub(1) / 2
    }

    pub fn file_name(&self) -> String {
        format!("circuit_{}_{}.txt", self.num_units(), self.generation)
    }

    /// Renders the report body.
    pub fn render(&self) -> String {
        let mut out = join(&self.encoding);
        out.push('\n');
        if let Some(flows) = &self.flows {
            // Infallible for String.
            let _ = writeln!(out, "{}", join(&flows.mineral));
            let _ = writeln!(out, "{}", join(&flows.waste));
            let _ = writeln!(out, "{}", self.performance);
        }
        out
    }

    /// Writes the report into `dir`, creating it if needed.
    ///
    /// Returns the path of the written file.
    pub fn write_to(&self, dir: &Path) -> Result<PathBuf> {
        let io_err = |path: &Path| {
            let path = path.to_path_buf();
            move |source: std::io::Error| CircuitError::Io { path, source }
        };

        fs::create_dir_all(dir).map_err(io_err(dir))?;
        let path = dir.join(self.file_name());
        fs::write(&path, self.render()).map_err(io_err(&path))?;

        info!(path = %path.display(), "circuit report written");
        Ok(path)
    }
}

fn join<T: Display>(values: &[T]) -> String {
    values
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fitness::FitnessEvaluator;

    const FIVE_UNITS: [usize; 11] = [0, 4, 3, 2, 0, 5, 4, 4, 6, 2, 1];

    #[test]
    fn test_file_name() {
        let report = CircuitReport {
            encoding: FIVE_UNITS.to_vec(),
            generation: 42,
            flows: None,
            performance: -50_000.0,
        };
        assert_eq!(report.num_units(), 5);
        assert_eq!(report.file_name(), "circuit_5_42.txt");
    }

    #[test]
    fn test_render_without_flows() {
        let report = CircuitReport {
            encoding: vec![0, 1, 2],
            generation: 0,
            flows: None,
            performance: -50_000.0,
        };
        assert_eq!(report.render(), "0, 1, 2\n");
    }

    #[test]
    fn test_render_with_flows() {
        let report = CircuitReport {
            encoding: vec![0, 1, 2],
            generation: 3,
            flows: Some(Flows {
                mineral: vec![10.0, 2.0, 8.0],
                waste: vec![100.0, 5.0, 95.0],
                iterations: 2,
            }),
            performance: -2300.0,
        };
        assert_eq!(
            report.render(),
            "0, 1, 2\n10, 2, 8\n100, 5, 95\n-2300\n"
        );
    }

    #[test]
    fn test_write_to_creates_file() {
        let evaluator = FitnessEvaluator::default();
        let evaluation = evaluator.evaluate_detailed(&FIVE_UNITS).unwrap();
        let report = CircuitReport::new(FIVE_UNITS.to_vec(), 7, evaluation);

        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("data");
        let path = report.write_to(&dir).unwrap();
        assert_eq!(path, dir.join("circuit_5_7.txt"));

        let written = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = written.lines().collect();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], "0, 4, 3, 2, 0, 5, 4, 4, 6, 2, 1");
        assert_eq!(lines[1].split(", ").count(), 7);
        assert_eq!(lines[2].split(", ").count(), 7);
        let performance: f64 = lines[3].parse().unwrap();
        assert_eq!(performance, report.performance);
    }

    #[test]
    fn test_write_to_reports_io_error() {
        let tmp = tempfile::tempdir().unwrap();
        let blocker = tmp.path().join("file");
        fs::write(&blocker, "x").unwrap();

        let report = CircuitReport {
            encoding: vec![0, 1, 2],
            generation: 0,
            flows: None,
            performance: 0.0,
        };
        let err = report.write_to(&blocker.join("sub")).unwrap_err();
        assert!(matches!(err, CircuitError::Io { .. }));
    }
}
