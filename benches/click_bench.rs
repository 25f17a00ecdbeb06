//! Benchmarks for click synthesis.
//!
//! Run with: cargo bench
//!
//! Reference timing at 48kHz sample rate:
//!   - 64 samples  = 1.33ms deadline
//!   - 256 samples = 5.33ms deadline
//!   - 512 samples = 10.67ms deadline

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion};
use rtrb::RingBuffer;
use saavy_metronome::{
    dsp::envelope::Envelope,
    graph::node::RenderCtx,
    tone::{ClickMixer, ClickRequest, ClickRole, ClickVoice, MAX_LIVE_CLICKS},
};

const SAMPLE_RATE: f32 = 48_000.0;
const BLOCK_SIZES: &[usize] = &[64, 128, 256, 512];

fn bench_envelope(c: &mut Criterion) {
    let mut group = c.benchmark_group("click/envelope");
    let ctx = RenderCtx::from_freq(SAMPLE_RATE, 800.0, 1.0);

    for &size in BLOCK_SIZES {
        let mut buffer = vec![0.0f32; size];
        group.bench_with_input(BenchmarkId::new("release", size), &size, |b, _| {
            b.iter_batched(
                || {
                    let mut env = Envelope::click();
                    env.note_on(&ctx);
                    env
                },
                |mut env| env.render(black_box(&mut buffer), black_box(&ctx)),
                BatchSize::SmallInput,
            )
        });
    }
    group.finish();
}

fn bench_voice(c: &mut Criterion) {
    let mut group = c.benchmark_group("click/voice");
    let request = ClickRequest::new(ClickRole::Accent, 0.8);

    for &size in BLOCK_SIZES {
        let mut buffer = vec![0.0f32; size];
        group.bench_with_input(BenchmarkId::new("first_block", size), &size, |b, _| {
            b.iter_batched(
                || ClickVoice::new(request, SAMPLE_RATE),
                |mut voice| voice.render(black_box(&mut buffer)),
                BatchSize::SmallInput,
            )
        });
    }
    group.finish();
}

fn bench_mixer(c: &mut Criterion) {
    let mut group = c.benchmark_group("click/mixer");

    for &size in BLOCK_SIZES {
        let mut buffer = vec![0.0f32; size];

        // Every voice slot sounding: the worst case at very fast tempos
        group.bench_with_input(BenchmarkId::new("saturated", size), &size, |b, _| {
            b.iter_batched(
                || {
                    let (mut tx, rx) = RingBuffer::<ClickRequest>::new(MAX_LIVE_CLICKS);
                    for n in 0..MAX_LIVE_CLICKS {
                        let role = ClickRole::from_accent(n % 4 == 0);
                        let _ = tx.push(ClickRequest::new(role, 0.8));
                    }
                    (tx, ClickMixer::new(SAMPLE_RATE, rx))
                },
                |(_tx, mut mixer)| mixer.render_block(black_box(&mut buffer)),
                BatchSize::SmallInput,
            )
        });

        // No clicks pending, no voices sounding
        let (_tx, rx) = RingBuffer::<ClickRequest>::new(8);
        let mut mixer = ClickMixer::new(SAMPLE_RATE, rx);
        group.bench_with_input(BenchmarkId::new("idle", size), &size, |b, _| {
            b.iter(|| mixer.render_block(black_box(&mut buffer)))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_envelope, bench_voice, bench_mixer);
criterion_main!(benches);
