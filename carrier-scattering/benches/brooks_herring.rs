use carrier_bands::Spin;
use carrier_scattering::{
    BrooksHerringScattering, FixedScreening, MaterialProperties, MechanismBuilder,
};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::thread_rng;
use utilities::ParabolicStructure;

pub fn bench_brooks_herring(c: &mut Criterion) {
    let mut rng = thread_rng();
    let properties = MaterialProperties::new()
        .with("acceptor_charge", 1.)
        .with("donor_charge", 1.)
        .with("static_dielectric", 12.9);

    let mut group = c.benchmark_group("brooks_herring");

    for number_of_kpoints in [101, 1001, 10001].into_iter() {
        let structure = ParabolicStructure {
            number_of_kpoints,
            spins: vec![Spin::Up, Spin::Down],
            ..ParabolicStructure::random(&mut rng)
        }
        .build();
        let screening = FixedScreening::uniform(1e-4, structure.grid_shape());

        group.bench_with_input(
            BenchmarkId::new("dos_screening", number_of_kpoints),
            &number_of_kpoints,
            |b, _| {
                b.iter(|| {
                    MechanismBuilder::new()
                        .with_material_properties(black_box(&properties))
                        .with_electronic_structure(black_box(&structure))
                        .build::<BrooksHerringScattering>()
                })
            },
        );
        group.bench_with_input(
            BenchmarkId::new("fixed_screening", number_of_kpoints),
            &number_of_kpoints,
            |b, _| {
                b.iter(|| {
                    MechanismBuilder::new()
                        .with_material_properties(black_box(&properties))
                        .with_electronic_structure(black_box(&structure))
                        .with_screening(&screening)
                        .build::<BrooksHerringScattering>()
                })
            },
        );
    }
    group.finish();
}

criterion_group!(benches, bench_brooks_herring);
criterion_main!(benches);
