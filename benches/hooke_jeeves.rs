use criterion::{criterion_group, criterion_main, Criterion};
use hooke::{
    algo::{hooke_jeeves::HookeJeevesOptions, HookeJeeves},
    nalgebra as na,
    testing::*,
};

const MAX_ITERS: usize = 5000;
const TOLERANCE: f64 = 1e-6;

fn minimize<F>(f: &F, optimizer: HookeJeeves<F>, x: na::OVector<F::Field, na::Dyn>) -> bool
where
    F: TestFunction<Field = f64>,
{
    optimize(f, optimizer, x, 0.0, MAX_ITERS, TOLERANCE).is_ok()
}

fn rosenbrock(c: &mut Criterion) {
    let f = Rosenbrock::new();
    let x = &f.initials()[0];

    c.bench_function("Hooke-Jeeves rosenbrock", |b| {
        b.iter(|| assert!(minimize(&f, HookeJeeves::new(&f), x.clone_owned())))
    });
}

fn woods(c: &mut Criterion) {
    let f = Woods::new();
    let x = &f.initials()[0];

    c.bench_function("Hooke-Jeeves woods", |b| {
        b.iter(|| assert!(minimize(&f, HookeJeeves::new(&f), x.clone_owned())))
    });
}

fn sphere(c: &mut Criterion) {
    let f = Sphere::new(4);
    let x = &f.initials()[0];

    c.bench_function("Hooke-Jeeves sphere", |b| {
        b.iter(|| assert!(minimize(&f, HookeJeeves::new(&f), x.clone_owned())))
    });

    let mut options = HookeJeevesOptions::default();
    options.set_rho(0.8);

    c.bench_function("Hooke-Jeeves sphere slow shrink", |b| {
        b.iter(|| {
            assert!(minimize(
                &f,
                HookeJeeves::with_options(&f, options.clone()),
                x.clone_owned()
            ))
        })
    });
}

fn sphere_large(c: &mut Criterion) {
    let f = Sphere::new(100);
    let x = &f.initials()[0];

    c.bench_function("Hooke-Jeeves sphere large", |b| {
        b.iter(|| assert!(minimize(&f, HookeJeeves::new(&f), x.clone_owned())))
    });
}

criterion_group!(benches, rosenbrock, woods, sphere, sphere_large);
criterion_main!(benches);
