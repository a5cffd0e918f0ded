use criterion::{criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion, Throughput};
use mmap_stream::open_stream;
use std::fs;
use std::path::PathBuf;

// Simple helper to build a unique temp path per bench
fn tmp_path(name: &str) -> PathBuf {
    let mut p = std::env::temp_dir();
    p.push(format!("mmap_stream_bench_{}_{}", name, std::process::id()));
    p
}

fn bench_open_close(b: &mut Criterion) {
    let mut group = b.benchmark_group("open_close");
    group.bench_function("w_plus", |ben| {
        ben.iter_batched(
            || {
                let path = tmp_path("open_close");
                let _ = fs::remove_file(&path);
                path
            },
            |path| {
                let stream = open_stream(&path, "w+").expect("open");
                stream.close();
                let _ = fs::remove_file(&path);
            },
            BatchSize::SmallInput,
        )
    });
    group.finish();
}

fn bench_sequential_write(b: &mut Criterion) {
    let mut group = b.benchmark_group("sequential_write");
    for &size in &[4_usize * 1024, 64 * 1024, 1024 * 1024] {
        group.throughput(Throughput::Bytes(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |ben, &sz| {
            let path = tmp_path(&format!("seq_write_{}", sz));
            let _ = fs::remove_file(&path);
            let mut stream = open_stream(&path, "w+").expect("open");

            let payload = vec![0xAB_u8; sz];
            ben.iter(|| {
                // Rewind so the stream does not grow across iterations.
                stream.seek(0).expect("rewind");
                stream.write(&payload).expect("write");
                criterion::black_box(&payload);
            });

            drop(stream);
            let _ = fs::remove_file(&path);
        });
    }
    group.finish();
}

fn bench_sequential_read(b: &mut Criterion) {
    let mut group = b.benchmark_group("sequential_read");
    for &size in &[4_usize * 1024, 64 * 1024, 1024 * 1024] {
        group.throughput(Throughput::Bytes(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |ben, &sz| {
            let path = tmp_path(&format!("seq_read_{}", sz));
            let _ = fs::remove_file(&path);
            let mut stream = open_stream(&path, "w+").expect("open");
            let payload = vec![0xCD_u8; sz];
            stream.write(&payload).expect("fill");

            let mut buf = vec![0u8; sz];
            ben.iter(|| {
                stream.seek(0).expect("rewind");
                let n = stream.read(&mut buf).expect("read");
                assert_eq!(n, sz);
                criterion::black_box(&buf);
            });

            drop(stream);
            let _ = fs::remove_file(&path);
        });
    }
    group.finish();
}

fn bench_seek_then_small_read(b: &mut Criterion) {
    let mut group = b.benchmark_group("seek_then_small_read");
    let size = 1024 * 1024;
    group.throughput(Throughput::Bytes(64));
    group.bench_function("alternating_ends", |ben| {
        let path = tmp_path("seek_small_read");
        let _ = fs::remove_file(&path);
        let mut stream = open_stream(&path, "w+").expect("open");
        stream.write(&vec![0xEF_u8; size]).expect("fill");

        // Alternate between the two ends of the file so every read lands in
        // a different window and forces a remap.
        let mut front = true;
        let mut buf = [0u8; 64];
        ben.iter(|| {
            let pos = if front { 0 } else { -64 };
            front = !front;
            stream.seek(pos).expect("seek");
            stream.read(&mut buf).expect("read");
            criterion::black_box(&buf);
        });

        drop(stream);
        let _ = fs::remove_file(&path);
    });
    group.finish();
}

criterion_group!(
    benches,
    bench_open_close,
    bench_sequential_write,
    bench_sequential_read,
    bench_seek_then_small_read
);
criterion_main!(benches);
