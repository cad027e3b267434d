use crate::cli::MatrixArgs;
use crate::config::build_config;
use crate::error::{CliError, Result};
use crate::store::StoreManager;
use crate::ui::{CliProgressHandler, UiEvent};
use molalign::engine::error::EngineError;
use molalign::engine::progress::ProgressReporter;
use molalign::workflows::matrix;
use std::fs::File;
use std::io::BufWriter;
use tokio::sync::mpsc;
use tracing::info;

pub async fn run(args: MatrixArgs, ui_sender: mpsc::Sender<UiEvent>) -> Result<()> {
    let config = build_config(&args.alignment)?;
    let store = StoreManager::new(args.store.as_deref(), config.store_path.as_deref())?;
    let source = store.source()?;

    let progress_handler = CliProgressHandler::new(ui_sender);
    let reporter = ProgressReporter::with_callback(progress_handler.get_callback());

    info!("Invoking the pairwise RMSD workflow for molecule '{}'", &args.molecule);
    let result = tokio::task::block_in_place(|| {
        matrix::run(&source, &args.molecule, &config.alignment, &reporter)
    })?;

    match &args.output {
        Some(path) => {
            let file = File::create(path)?;
            result
                .write_csv(BufWriter::new(file), config.precision)
                .map_err(|e| CliError::FileParsing {
                    path: path.clone(),
                    source: e.into(),
                })?;
            println!(
                "✓ {}×{} RMSD matrix written to: {}",
                result.len(),
                result.len(),
                path.display()
            );
        }
        None => {
            result
                .write_csv(std::io::stdout().lock(), config.precision)
                .map_err(EngineError::from)?;
        }
    }
    Ok(())
}
