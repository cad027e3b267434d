use crate::core::io::source::{StructureKey, StructureSource};
use crate::engine::config::AlignmentConfig;
use crate::engine::error::EngineError;
use crate::engine::kabsch::calculate_rmsd;
use crate::engine::progress::{Progress, ProgressReporter};
use std::io::Write;
use tracing::{info, instrument, warn};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

const LABEL_HEADER: &str = "geometry";

/// Symmetric pairwise RMSD table with a zero diagonal.
#[derive(Debug, Clone, PartialEq)]
pub struct RmsdMatrix {
    pub labels: Vec<String>,
    pub values: Vec<Vec<f64>>,
}

impl RmsdMatrix {
    fn zeros(labels: Vec<String>) -> Self {
        let n = labels.len();
        Self {
            labels,
            values: vec![vec![0.0; n]; n],
        }
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn get(&self, i: usize, j: usize) -> Option<f64> {
        self.values.get(i)?.get(j).copied()
    }

    /// Looks a value up by geometry labels.
    pub fn get_by_label(&self, first: &str, second: &str) -> Option<f64> {
        let i = self.labels.iter().position(|l| l == first)?;
        let j = self.labels.iter().position(|l| l == second)?;
        self.get(i, j)
    }

    /// Writes the matrix as CSV: a header row of labels, then one row per geometry.
    pub fn write_csv<W: Write>(&self, writer: W, precision: usize) -> Result<(), csv::Error> {
        let mut csv_writer = csv::Writer::from_writer(writer);

        let mut header = Vec::with_capacity(self.len() + 1);
        header.push(LABEL_HEADER.to_string());
        header.extend(self.labels.iter().cloned());
        csv_writer.write_record(&header)?;

        for (label, row) in self.labels.iter().zip(&self.values) {
            let mut record = Vec::with_capacity(row.len() + 1);
            record.push(label.clone());
            record.extend(row.iter().map(|v| format!("{:.*}", precision, v)));
            csv_writer.write_record(&record)?;
        }
        csv_writer.flush()?;
        Ok(())
    }
}

type PairResult = Result<((usize, usize), f64), EngineError>;

#[instrument(skip_all, name = "rmsd_matrix_workflow", fields(molecule_id = %molecule_id))]
pub fn run<S>(
    source: &S,
    molecule_id: &str,
    config: &AlignmentConfig,
    reporter: &ProgressReporter,
) -> Result<RmsdMatrix, EngineError>
where
    S: StructureSource + ?Sized,
{
    // === Phase 1: Load geometries ===
    reporter.report(Progress::PhaseStart {
        name: "Loading geometries",
    });
    let labels = source.geometry_ids(molecule_id)?;
    if labels.is_empty() {
        reporter.report(Progress::PhaseFinish);
        return Err(EngineError::NoGeometries {
            molecule_id: molecule_id.to_string(),
        });
    }
    let structures = labels
        .iter()
        .map(|id| source.fetch(&StructureKey::geometry(molecule_id, id.as_str())))
        .collect::<Result<Vec<_>, _>>()?;
    info!(geometries = structures.len(), "Loaded geometries.");
    reporter.report(Progress::PhaseFinish);

    // === Phase 2: Pairwise superposition ===
    let pairs: Vec<(usize, usize)> = (0..structures.len())
        .flat_map(|i| (i + 1..structures.len()).map(move |j| (i, j)))
        .collect();
    if pairs.is_empty() {
        warn!("Only one geometry is stored; the matrix is a single zero.");
    }

    reporter.report(Progress::PhaseStart {
        name: "Pairwise RMSD",
    });
    reporter.report(Progress::TaskStart {
        total_steps: pairs.len() as u64,
    });

    #[cfg(not(feature = "parallel"))]
    let iterator = pairs.iter();

    #[cfg(feature = "parallel")]
    let iterator = pairs.par_iter();

    let results: Vec<PairResult> = iterator
        .map(|&(i, j)| {
            let result = calculate_rmsd(&structures[i], &structures[j], config)
                .map(|rmsd| ((i, j), rmsd))
                .map_err(|source| EngineError::PairFailed {
                    first: labels[i].clone(),
                    second: labels[j].clone(),
                    source,
                });
            reporter.report(Progress::TaskIncrement);
            result
        })
        .collect();

    reporter.report(Progress::TaskFinish);

    let mut matrix = RmsdMatrix::zeros(labels);
    for result in results {
        let ((i, j), rmsd) = result?;
        matrix.values[i][j] = rmsd;
        matrix.values[j][i] = rmsd;
    }

    info!(pairs = pairs.len(), "Pairwise RMSD matrix complete.");
    reporter.report(Progress::PhaseFinish);
    Ok(matrix)
}
