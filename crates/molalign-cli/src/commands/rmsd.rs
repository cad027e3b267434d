use crate::cli::RmsdArgs;
use crate::config::build_config;
use crate::error::Result;
use crate::store::StoreManager;
use molalign::workflows::rmsd::{self, RmsdReport, RmsdRequest};
use tracing::info;

pub async fn run(args: RmsdArgs) -> Result<()> {
    let config = build_config(&args.alignment)?;
    let store = StoreManager::new(args.store.as_deref(), config.store_path.as_deref())?;
    let source = store.source()?;

    let request = RmsdRequest::new(args.molecule)
        .with_geometries(args.geometry_a, args.geometry_b);
    info!("Invoking the RMSD workflow on store {:?}", store.store_path());

    let report =
        tokio::task::block_in_place(|| rmsd::run(&source, &request, &config.alignment))?;

    println!("{}", summary(&report, config.precision));
    Ok(())
}

fn summary(report: &RmsdReport, precision: usize) -> String {
    format!(
        "RMSD: {:.*} Å ({} atoms compared)\nMax deviation: {:.*} Å",
        precision, report.rmsd, report.atoms_compared, precision, report.max_deviation
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::AlignmentArgs;
    use crate::error::CliError;
    use molalign::engine::error::EngineError;
    use std::fs;
    use tempfile::tempdir;

    const METHANE_LIKE: &str =
        r#"{"atoms": {"coords": {"3d": [0, 0, 0, 1, 0, 0]}, "elements": {"number": [6, 1]}}}"#;

    fn args(store: std::path::PathBuf, geometry_a: Option<&str>) -> RmsdArgs {
        RmsdArgs {
            molecule: "m1".to_string(),
            geometry_a: geometry_a.map(str::to_string),
            geometry_b: None,
            store: Some(store),
            alignment: AlignmentArgs::default(),
        }
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn rmsd_runs_against_explicit_store() {
        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join("m1/geometries")).unwrap();
        fs::write(dir.path().join("m1/molecule.cjson"), METHANE_LIKE).unwrap();
        fs::write(dir.path().join("m1/geometries/g1.cjson"), METHANE_LIKE).unwrap();

        run(args(dir.path().to_path_buf(), Some("g1"))).await.unwrap();
    }

    #[test]
    fn summary_reports_rmsd_and_max_deviation() {
        let report = RmsdReport {
            rmsd: 0.5,
            max_deviation: 1.25,
            atoms_compared: 3,
        };

        assert_eq!(
            summary(&report, 2),
            "RMSD: 0.50 Å (3 atoms compared)\nMax deviation: 1.25 Å"
        );
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn missing_geometry_surfaces_core_error() {
        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join("m1")).unwrap();
        fs::write(dir.path().join("m1/molecule.cjson"), METHANE_LIKE).unwrap();

        let result = run(args(dir.path().to_path_buf(), Some("absent"))).await;

        assert!(matches!(
            result,
            Err(CliError::Core(EngineError::Source { .. }))
        ));
    }
}
