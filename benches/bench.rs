use criterion::{criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion, Throughput};
use parfft::{Engine, SampleBuffer, Transform, TransformConfig};
use utilities::gen_random_complex;
use utilities::rustfft::FftPlanner;

const FFT_LENGTHS: &[usize] = &[6, 8, 10, 12, 14, 16, 18, 20];
const DFT_LENGTHS: &[usize] = &[6, 8, 10, 11, 12];
const WORKERS: &[usize] = &[1, 2, 4, 8];

fn benchmark_engine(c: &mut Criterion, engine: Engine, lengths: &[usize]) {
    let mut group = c.benchmark_group(format!("Forward {}", engine.name()));

    for n in lengths.iter() {
        let len = 1 << n;
        group.throughput(Throughput::Elements(len as u64));

        for &workers in WORKERS {
            let config = TransformConfig::new(len, workers, engine).unwrap();
            let transform = parfft::engine_for(config).unwrap();
            let id = format!("parfft {} x{workers}", engine.name());

            group.bench_function(BenchmarkId::new(id, len), |b| {
                b.iter_batched(
                    || SampleBuffer::new(gen_random_complex(len)),
                    |mut buffer| transform.process(&mut buffer).unwrap(),
                    BatchSize::LargeInput,
                );
            });
        }

        if engine == Engine::Recursive {
            let mut planner = FftPlanner::new();
            let fft = planner.plan_fft_forward(len);

            group.bench_function(BenchmarkId::new("RustFFT FFT Forward", len), |b| {
                b.iter_batched(
                    || gen_random_complex(len),
                    |mut signal| fft.process(&mut signal),
                    BatchSize::LargeInput,
                );
            });
        }
    }
    group.finish();
}

fn benchmark_naive(c: &mut Criterion) {
    benchmark_engine(c, Engine::Naive, DFT_LENGTHS);
}

fn benchmark_recursive(c: &mut Criterion) {
    benchmark_engine(c, Engine::Recursive, FFT_LENGTHS);
}

criterion_group!(benches, benchmark_naive, benchmark_recursive);
criterion_main!(benches);
