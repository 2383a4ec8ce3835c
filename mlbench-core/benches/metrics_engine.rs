//! Throughput of the metrics engine and timer parser

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use mlbench_core::{classification_report_numeric, ConfusionMatrix, TimerReport};
use std::hint::black_box;

/// Deterministic labels with roughly 80% agreement
fn synthetic_labels(len: usize, classes: u64) -> (Vec<f64>, Vec<f64>) {
    let mut state = 0x2545_f491_4f6c_dd1d_u64;
    let mut truth = Vec::with_capacity(len);
    let mut predicted = Vec::with_capacity(len);
    for _ in 0..len {
        state ^= state << 13;
        state ^= state >> 7;
        state ^= state << 17;
        let label = (state % classes) as f64;
        truth.push(label);
        predicted.push(if state % 5 == 0 {
            ((state >> 8) % classes) as f64
        } else {
            label
        });
    }
    (truth, predicted)
}

fn bench_classification_report(c: &mut Criterion) {
    let mut group = c.benchmark_group("classification_report");

    for &len in &[1_000usize, 10_000, 100_000] {
        let (truth, predicted) = synthetic_labels(len, 10);
        group.bench_with_input(BenchmarkId::new("instances", len), &len, |b, _| {
            b.iter(|| classification_report_numeric(black_box(&truth), black_box(&predicted)))
        });
    }

    group.finish();
}

fn bench_confusion_matrix(c: &mut Criterion) {
    let mut group = c.benchmark_group("confusion_matrix");
    let (truth, predicted) = synthetic_labels(50_000, 20);
    let truth: Vec<u64> = truth.iter().map(|&v| v as u64).collect();
    let predicted: Vec<u64> = predicted.iter().map(|&v| v as u64).collect();

    group.bench_function("build", |b| {
        b.iter(|| {
            ConfusionMatrix::from_truth_and_predictions(black_box(&truth), black_box(&predicted))
        })
    });

    if let Ok((matrix, _)) = ConfusionMatrix::from_truth_and_predictions(&truth, &predicted) {
        group.bench_function("mcc_multiclass", |b| {
            b.iter(|| black_box(&matrix).mcc_multiclass())
        });
        group.bench_function("lift_multiclass", |b| {
            b.iter(|| black_box(&matrix).lift_multiclass())
        });
    }

    group.finish();
}

fn bench_timer_parse(c: &mut Criterion) {
    let mut output = String::from("[INFO ] Loading 'train.csv' as CSV data.\n");
    for i in 0..500 {
        output.push_str(&format!("[DEBUG] iteration {i} objective 0.{i}\n"));
    }
    output.push_str("Program timers:\n");
    output.push_str("  loading_data: 0.120s\n  training: 4.500s\n  total_time: 4.750s\n");

    c.bench_function("timer_parse_program_timers", |b| {
        b.iter(|| TimerReport::parse(black_box(output.as_bytes())))
    });
}

criterion_group!(
    benches,
    bench_classification_report,
    bench_confusion_matrix,
    bench_timer_parse
);
criterion_main!(benches);
