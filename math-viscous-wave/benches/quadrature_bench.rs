use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use math_audio_viscous_wave::{
    FieldSampler, Kernel, PhysicalParameters, QuadratureRule, Tolerances, fundamental_integrand,
    integrate, linspace, plan,
};

fn unit_medium() -> PhysicalParameters {
    PhysicalParameters::new(1.0, 1.0).unwrap()
}

fn bench_integrand(c: &mut Criterion) {
    let params = unit_medium();
    let ks = linspace(1e-4, 50.0, 10_000);

    c.bench_function("fundamental_integrand_10k", |b| {
        b.iter(|| {
            let mut sum = 0.0;
            for &k in &ks {
                sum += fundamental_integrand(black_box(k), 1.0, 1.0, &params);
            }
            black_box(sum)
        })
    });

    c.bench_function("pressure_integrand_10k", |b| {
        b.iter(|| {
            let mut sum = 0.0;
            for &k in &ks {
                sum += Kernel::Pressure.integrand(black_box(k), 1.0, 1.0, &params);
            }
            black_box(sum)
        })
    });
}

fn bench_rules(c: &mut Criterion) {
    let params = unit_medium();
    let tol = Tolerances::new(1e-2, 10.0);
    let outcome = plan(1.0, 1.0, &tol, &params).unwrap();
    let p = *outcome.plan().unwrap();

    let mut group = c.benchmark_group("simpson_reference_point");
    for rule in [QuadratureRule::Shared, QuadratureRule::Independent] {
        group.bench_with_input(BenchmarkId::from_parameter(rule.name()), &rule, |b, &rule| {
            b.iter(|| {
                integrate(
                    |k| fundamental_integrand(k, 1.0, 1.0, &params),
                    black_box(p.lower_bound),
                    black_box(p.upper_bound),
                    p.subintervals,
                    rule,
                )
            })
        });
    }
    group.finish();
}

fn bench_radial_sweep(c: &mut Criterion) {
    let params = unit_medium();
    let radii = linspace(0.0, 4.0, 64);

    let mut group = c.benchmark_group("radial_sweep_64");
    group.sample_size(10);
    for parallel in [false, true] {
        let sampler = FieldSampler::new(params, Tolerances::new(0.05, 4.0))
            .unwrap()
            .parallel(parallel);
        let name = if parallel { "parallel" } else { "sequential" };
        group.bench_function(name, |b| {
            b.iter(|| sampler.sample_radial(black_box(&radii), 1.0, None).unwrap())
        });
    }
    group.finish();
}

criterion_group!(benches, bench_integrand, bench_rules, bench_radial_sweep);
criterion_main!(benches);
