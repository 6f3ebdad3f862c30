//! End-to-end pipeline tests.

use fieldcam::{
    hole, load_part, run_job, save_part, BoundingBox3, FeatureId, HoleOptions, JobConfig, Motion,
    Point3, SdfNode, Vec3,
};

const JOB: &str = r#"
[mesh]
resolution = { cells = 48 }

[tool]
diameter = 4.0
shape = { type = "Ball" }
feed_rate = 1200.0
plunge_rate = 400.0
spindle_rpm = 10000.0
number = 3

[toolpath]
stepover = 2.0

[gcode]
program_number = 42
program_name = "bracket"
line_numbers = true
"#;

fn bracket() -> SdfNode {
    let plate = SdfNode::cuboid(Vec3::new(40.0, 30.0, 10.0))
        .unwrap()
        .round(1.0)
        .unwrap();
    let boss = SdfNode::cylinder(6.0, 6.0)
        .unwrap()
        .translate(Vec3::new(8.0, 0.0, 7.0))
        .unwrap();
    let body = plate.smooth_union(boss, 1.5).unwrap();

    let drill = |id: u32, x: f64| {
        hole(HoleOptions {
            id,
            name: format!("hole-{id}"),
            position: Point3::new(x, 0.0, 5.0),
            diameter: 5.0,
            depth: 6.0,
            tip_angle: Some(118.0),
            ..Default::default()
        })
        .unwrap()
    };
    body.subtract(drill(1, -12.0)).subtract(drill(2, -4.0))
}

#[test]
fn test_job_produces_mesh_toolpath_and_program() {
    let config = JobConfig::from_toml_str(JOB).unwrap();
    let output = run_job(&bracket(), &config).unwrap();

    assert!(!output.mesh.is_empty());
    assert_eq!(output.mesh.features.len(), 2);
    assert!(output.mesh.feature_face_count(FeatureId(1)) > 0);
    assert!(output.mesh.feature_face_count(FeatureId(2)) > 0);

    let path = &output.toolpath;
    assert!(!path.is_empty());
    assert_eq!(path.points.first().map(|p| p.motion), Some(Motion::Rapid));
    assert_eq!(path.points.last().map(|p| p.motion), Some(Motion::Rapid));
    assert!(path.stats.cutting_length > 0.0);
    assert!(path.stats.estimated_time > 0.0);

    let program = &output.gcode;
    assert!(program.starts_with("%\nO0042 (BRACKET)\n"));
    assert!(program.contains(" T3 M06\n"));
    assert!(program.contains(" S10000 M03\n"));
    assert!(program.contains(" G01 "));
    assert!(program.ends_with(" M30\n%\n"));
    assert!(program.is_ascii());
}

#[test]
fn test_job_is_deterministic() {
    let config = JobConfig::from_toml_str(JOB).unwrap();
    let a = run_job(&bracket(), &config).unwrap();
    let b = run_job(&bracket(), &config).unwrap();
    assert_eq!(a.mesh.positions, b.mesh.positions);
    assert_eq!(a.mesh.faces, b.mesh.faces);
    assert_eq!(a.toolpath, b.toolpath);
    assert_eq!(a.gcode, b.gcode);
}

#[test]
fn test_unbounded_part_needs_stock() {
    let floor = SdfNode::plane(Vec3::z(), 0.0).unwrap();
    let err = run_job(&floor, &JobConfig::default()).unwrap_err();
    assert!(format!("{err:#}").contains("unbounded"));

    let mut config = JobConfig::default();
    config.toolpath.stock = Some(BoundingBox3::new(
        Point3::new(-10.0, -10.0, -3.0),
        Point3::new(10.0, 10.0, 1.0),
    ));
    let output = run_job(&floor, &config).unwrap();
    assert!(!output.mesh.is_empty());
    assert!(output
        .toolpath
        .points
        .iter()
        .filter(|p| p.motion == Motion::Feed)
        .all(|p| p.position.z.abs() < 1e-2));
}

#[test]
fn test_part_json_round_trip() {
    let part = bracket();
    let path = std::env::temp_dir().join(format!("fieldcam-part-{}.json", std::process::id()));
    save_part(&part, &path).unwrap();
    let loaded = load_part(&path).unwrap();
    let _ = std::fs::remove_file(&path);
    assert_eq!(loaded, part);
}
