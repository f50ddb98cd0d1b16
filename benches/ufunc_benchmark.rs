use criterion::{Criterion, criterion_group, criterion_main};
use rand::{Rng, SeedableRng, rngs::StdRng};
use std::hint::black_box;

use posit8_dtype::{DType, HostArray, InMemoryRuntime, Posit8_2, register_default};

const LEN: usize = 4096;

fn random_posits(rng: &mut StdRng) -> Vec<Posit8_2> {
    (0..LEN)
        .map(|_| match rng.random::<u8>() {
            0x80 => Posit8_2::ZERO,
            bits => Posit8_2::from_bits(bits),
        })
        .collect()
}

macro_rules! create_benchmark_for_ufunc {
    ($c:expr, $runtime:expr, $group:literal, $name:literal, $($input:expr),+) => {
        let mut group = $c.benchmark_group($group);
        group.sample_size(50);

        group.bench_function("call", |b| {
            b.iter(|| {
                // arithmetic errors are part of the workload
                let outputs = $runtime.call($name, &[$(black_box(&$input)),+]);
                black_box(outputs.ok());
            })
        });
        group.finish();
    };
}

fn benchmark_ufuncs(c: &mut Criterion) {
    let mut runtime = InMemoryRuntime::new();
    let posit = match register_default(&mut runtime) {
        Ok(dtype) => dtype,
        Err(err) => panic!("registration failed: {err}"),
    };

    let mut rng = StdRng::seed_from_u64(42);
    let a = HostArray::from_elements(posit, &random_posits(&mut rng));
    let b = HostArray::from_elements(posit, &random_posits(&mut rng));
    let floats: Vec<f32> = (0..LEN).map(|_| rng.random_range(-100.0..100.0)).collect();
    let f = HostArray::from_elements(DType::Float32, &floats);

    create_benchmark_for_ufunc!(c, runtime, "add", "add", a, b);
    create_benchmark_for_ufunc!(c, runtime, "multiply", "multiply", a, b);
    create_benchmark_for_ufunc!(c, runtime, "true_divide", "true_divide", a, b);
    create_benchmark_for_ufunc!(c, runtime, "add_float32", "add", a, f);
    create_benchmark_for_ufunc!(c, runtime, "less", "less", a, b);
    create_benchmark_for_ufunc!(c, runtime, "sqrt", "sqrt", a);
    create_benchmark_for_ufunc!(c, runtime, "divmod", "divmod", a, b);
}

fn benchmark_casts(c: &mut Criterion) {
    let mut runtime = InMemoryRuntime::new();
    let posit = match register_default(&mut runtime) {
        Ok(dtype) => dtype,
        Err(err) => panic!("registration failed: {err}"),
    };
    let mut rng = StdRng::seed_from_u64(7);
    let floats: Vec<f32> = (0..LEN).map(|_| rng.random_range(-1.0e6..1.0e6)).collect();
    let f = HostArray::from_elements(DType::Float32, &floats);
    let p = runtime.cast(&f, posit).ok();

    let mut group = c.benchmark_group("cast");
    group.bench_function("float32_to_posit8_2", |b| {
        b.iter(|| black_box(runtime.cast(black_box(&f), posit).ok()))
    });
    if let Some(p) = p {
        group.bench_function("posit8_2_to_float64", |b| {
            b.iter(|| black_box(runtime.cast(black_box(&p), DType::Float64).ok()))
        });
    }
    group.finish();
}

criterion_group!(benches, benchmark_ufuncs, benchmark_casts);
criterion_main!(benches);
