use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use fieldcam_math::{Point3, Vec3};
use fieldcam_mesh::{mesh, Resolution};
use fieldcam_sdf::{hole, HoleOptions, SdfNode};

fn drilled_plate() -> SdfNode {
    let plate = SdfNode::cuboid(Vec3::new(40.0, 30.0, 10.0))
        .unwrap()
        .round(1.0)
        .unwrap();
    let mut part = plate;
    for (i, x) in [-12.0, 0.0, 12.0].into_iter().enumerate() {
        let drill = hole(HoleOptions {
            id: i as u32,
            position: Point3::new(x, 0.0, 6.0),
            diameter: 6.0,
            depth: 8.0,
            tip_angle: Some(118.0),
            ..Default::default()
        })
        .unwrap();
        part = part.subtract(drill);
    }
    part
}

fn bench_sphere(c: &mut Criterion) {
    let mut group = c.benchmark_group("sphere");
    let sphere = SdfNode::sphere(10.0).unwrap();
    for cells in [32usize, 64, 128] {
        group.bench_with_input(BenchmarkId::from_parameter(cells), &cells, |b, &cells| {
            b.iter(|| mesh(black_box(&sphere), Resolution::Cells(cells)));
        });
    }
    group.finish();
}

fn bench_tagged_part(c: &mut Criterion) {
    let part = drilled_plate();
    c.bench_function("drilled_plate_64", |b| {
        b.iter(|| mesh(black_box(&part), Resolution::Cells(64)));
    });
}

criterion_group!(benches, bench_sphere, bench_tagged_part);
criterion_main!(benches);
