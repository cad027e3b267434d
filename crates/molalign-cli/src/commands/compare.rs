use crate::cli::CompareArgs;
use crate::config::build_config;
use crate::error::{CliError, Result};
use molalign::core::io::cjson::CjsonMetadata;
use molalign::core::io::format::{
    StructureFormat, StructureMetadata, read_structure, write_structure,
};
use molalign::core::io::xyz::XyzMetadata;
use molalign::core::models::point_set::PointSet;
use molalign::engine::error::EngineError;
use molalign::engine::kabsch::superpose;
use std::path::Path;
use tracing::info;

pub async fn run(args: CompareArgs) -> Result<()> {
    let config = build_config(&args.alignment)?;

    let (reference, _) = load(&args.reference)?;
    let (mobile, mobile_metadata) = load(&args.mobile)?;

    info!(
        "Superposing {:?} ({} atoms) onto {:?} ({} atoms)",
        &args.mobile,
        mobile.len(),
        &args.reference,
        reference.len()
    );
    let superposition = tokio::task::block_in_place(|| {
        superpose(&mobile, &reference, &config.alignment).map_err(EngineError::from)
    })?;

    println!(
        "RMSD: {:.*} Å ({} atoms compared)",
        config.precision, superposition.rmsd, superposition.atoms_compared
    );
    println!(
        "Max deviation: {:.*} Å",
        config.precision, superposition.max_deviation
    );

    if let Some(output) = &args.output {
        let metadata = output_metadata(output, mobile_metadata)?;
        let aligned = superposition.apply(&mobile);
        write_structure(output, &aligned, &metadata).map_err(|e| CliError::FileParsing {
            path: output.clone(),
            source: e.into(),
        })?;
        println!("✓ Aligned structure written to: {}", output.display());
    }

    Ok(())
}

fn load(path: &Path) -> Result<(PointSet, StructureMetadata)> {
    info!("Loading structure from {:?}", path);
    read_structure(path).map_err(|e| CliError::FileParsing {
        path: path.to_path_buf(),
        source: e.into(),
    })
}

/// Reuses the mobile file's metadata when the output has the same format so that
/// unrelated fields (names, bonds, comments) survive the round trip.
fn output_metadata(output: &Path, mobile: StructureMetadata) -> Result<StructureMetadata> {
    let format = StructureFormat::from_path(output).ok_or_else(|| {
        CliError::Argument(format!(
            "Cannot infer an output format from {:?}; use .cjson, .json or .xyz.",
            output
        ))
    })?;
    if format == mobile.format() {
        return Ok(mobile);
    }
    Ok(match format {
        StructureFormat::Cjson => StructureMetadata::Cjson(CjsonMetadata::default()),
        StructureFormat::Xyz => StructureMetadata::Xyz(XyzMetadata {
            comment: "Aligned by molalign".to_string(),
        }),
    })
}
