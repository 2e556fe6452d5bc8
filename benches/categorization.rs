use criterion::{black_box, criterion_group, criterion_main, Criterion};

use carelens::{categorize, ProviderProfile};

fn profile(qualifications: &str, specialty: &str, name: &str) -> ProviderProfile {
    ProviderProfile {
        qualifications: Some(qualifications.to_string()),
        specialty: Some(specialty.to_string()),
        name: Some(name.to_string()),
    }
}

fn bench_categorize(c: &mut Criterion) {
    let profiles = vec![
        profile("MD", "Cardiology", "Dr. Heart Surgeon"),
        profile("RN", "", "Jane Nurse"),
        profile("LCSW", "Behavioral Health", "Sam Ortiz"),
        profile("", "", "Rev. Ann Cole"),
        profile("MD", "General", "John Smith"),
    ];

    c.bench_function("categorize_mixed", |b| {
        b.iter(|| {
            for p in &profiles {
                black_box(categorize(black_box(p)));
            }
        })
    });

    // worst case: nothing matches, so every table is scanned
    let unmatched = profile("XYZ", "Unknown", "Nobody In Particular");
    c.bench_function("categorize_fallback", |b| b.iter(|| categorize(black_box(&unmatched))));
}

criterion_group!(benches, bench_categorize);
criterion_main!(benches);
