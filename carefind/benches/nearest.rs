use std::io::Write;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use tempfile::NamedTempFile;

use carefind::distance::{find_nearest, haversine_distance, within_radius};
use carefind::{Facility, FacilityDirectory, GeoPoint};

/// Facilities spread over a grid roughly covering India.
fn synthetic_facilities(n: usize) -> Vec<Facility> {
    (0..n)
        .map(|i| {
            let lat = 8.0 + (i % 300) as f64 * 0.1;
            let lon = 68.0 + (i / 300 % 300) as f64 * 0.1;
            Facility::new(format!("Hospital {}", i), "Synthetic Rd", lat, lon)
        })
        .collect()
}

fn write_directory(n: usize) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "Hospital_Name,Address_Original_First_Line,Location_Coordinates").unwrap();
    for f in synthetic_facilities(n) {
        writeln!(
            file,
            "{},{},\"{}, {}\"",
            f.name, f.address, f.latitude, f.longitude
        )
        .unwrap();
    }
    file.flush().unwrap();
    file
}

fn bench_haversine(c: &mut Criterion) {
    c.bench_function("haversine_distance", |b| {
        b.iter(|| {
            black_box(haversine_distance(
                black_box(28.6139),
                black_box(77.2090),
                black_box(19.0760),
                black_box(72.8777),
            ))
        });
    });
}

fn bench_find_nearest(c: &mut Criterion) {
    let point = GeoPoint::new(21.0, 78.0).unwrap();
    let mut group = c.benchmark_group("find_nearest");

    for size in [1_000usize, 10_000, 30_000] {
        let facilities = synthetic_facilities(size);
        group.bench_with_input(BenchmarkId::from_parameter(size), &facilities, |b, f| {
            b.iter(|| black_box(find_nearest(&point, f, 5)));
        });
    }

    group.finish();
}

fn bench_within_radius(c: &mut Criterion) {
    let point = GeoPoint::new(21.0, 78.0).unwrap();
    let facilities = synthetic_facilities(30_000);

    c.bench_function("within_radius_50km", |b| {
        b.iter(|| black_box(within_radius(&point, &facilities, black_box(50.0))));
    });
}

fn bench_load(c: &mut Criterion) {
    let file = write_directory(10_000);

    c.bench_function("load_10k_rows", |b| {
        b.iter(|| black_box(FacilityDirectory::load(file.path()).unwrap()));
    });
}

criterion_group!(
    benches,
    bench_haversine,
    bench_find_nearest,
    bench_within_radius,
    bench_load
);
criterion_main!(benches);
