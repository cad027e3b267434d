use molalign::core::io::cjson::CjsonFile;
use molalign::core::io::source::DirectorySource;
use molalign::core::io::traits::StructureFile;
use molalign::core::models::point_set::PointSet;
use molalign::engine::config::AlignmentConfigBuilder;
use molalign::engine::progress::ProgressReporter;
use molalign::workflows::{matrix, rmsd};
use nalgebra::{Rotation3, Vector3};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

// Methanol-like fragment: C, O and four hydrogens.
const COORDS: [f64; 18] = [
    0.000, 0.000, 0.000, //
    1.430, 0.000, 0.000, //
    -0.360, 1.030, 0.000, //
    -0.360, -0.510, 0.890, //
    -0.360, -0.510, -0.890, //
    1.750, 0.900, 0.000, //
];
const NUMBERS: [u8; 6] = [6, 8, 1, 1, 1, 1];

fn reference() -> PointSet {
    PointSet::from_flat(&COORDS, Some(&NUMBERS)).unwrap()
}

fn write_cjson(path: &Path, set: &PointSet) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    CjsonFile::write_point_set_to_path(set, path).unwrap();
}

/// Store with a default structure, a rigidly moved copy, and a copy whose
/// hydroxyl hydrogen has been displaced.
fn store() -> (TempDir, DirectorySource) {
    let dir = tempfile::tempdir().unwrap();
    let mol = dir.path().join("methanol");
    let base = reference();

    let rotation = Rotation3::from_euler_angles(0.4, -1.1, 2.3);
    let moved = base.transformed(&rotation, &Vector3::new(3.0, -7.5, 1.25));

    let mut flexed = COORDS;
    flexed[16] += 1.0;
    let flexed = PointSet::from_flat(&flexed, Some(&NUMBERS)).unwrap();

    write_cjson(&mol.join("molecule.cjson"), &base);
    write_cjson(&mol.join("geometries/moved.cjson"), &moved);
    write_cjson(&mol.join("geometries/flexed.cjson"), &flexed);
    write_cjson(&mol.join("geometries/input.cjson"), &base);

    let source = DirectorySource::new(dir.path());
    (dir, source)
}

#[test]
fn rigidly_moved_geometry_has_zero_rmsd_against_default() {
    let (_dir, source) = store();
    let request = rmsd::RmsdRequest::new("methanol").with_geometries(Some("moved".into()), None);

    let report = rmsd::run(&source, &request, &Default::default()).unwrap();

    assert!(report.rmsd < 1e-6, "rmsd = {}", report.rmsd);
    assert_eq!(report.atoms_compared, 6);
}

#[test]
fn hydrogen_displacement_vanishes_with_heavy_atom_filter() {
    let (_dir, source) = store();
    let request = rmsd::RmsdRequest::new("methanol")
        .with_geometries(Some("flexed".into()), Some("moved".into()));

    let all_atoms = rmsd::run(&source, &request, &Default::default()).unwrap();
    let heavy_config = AlignmentConfigBuilder::new()
        .heavy_atoms_only(true)
        .build()
        .unwrap();
    let heavy = rmsd::run(&source, &request, &heavy_config).unwrap();

    assert!(all_atoms.rmsd > 0.1);
    assert!(heavy.rmsd < 1e-6);
    assert_eq!(heavy.atoms_compared, 2);
}

#[test]
fn matrix_over_directory_store_is_symmetric_and_consistent() {
    let (_dir, source) = store();

    let matrix = matrix::run(
        &source,
        "methanol",
        &Default::default(),
        &ProgressReporter::new(),
    )
    .unwrap();

    assert_eq!(matrix.labels, vec!["flexed", "input", "moved"]);
    let input_moved = matrix.get_by_label("input", "moved").unwrap();
    let flexed_input = matrix.get_by_label("flexed", "input").unwrap();
    let flexed_moved = matrix.get_by_label("flexed", "moved").unwrap();
    assert!(input_moved < 1e-6);
    assert!((flexed_input - flexed_moved).abs() < 1e-6);
    assert_eq!(
        matrix.get_by_label("moved", "flexed"),
        Some(flexed_moved)
    );

    let mut csv = Vec::new();
    matrix.write_csv(&mut csv, 4).unwrap();
    let csv = String::from_utf8(csv).unwrap();
    assert_eq!(csv.lines().count(), 4);
    assert!(csv.starts_with("geometry,flexed,input,moved\n"));
}
