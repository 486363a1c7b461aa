use bvh_motion::evaluate::{evaluate_accumulated, evaluate_rest_pose};
use bvh_motion::parse::load_bvh_from_string;
use bvh_motion::spline::fit_root_path;
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use std::fmt::Write;

/// A root with `num_chains` chains of `chain_length` joints each, `num_frames` frames of motion.
fn generate_bvh(num_chains: usize, chain_length: usize, num_frames: usize) -> String {
    let mut text = String::from("HIERARCHY\nROOT Hips\n{\n OFFSET 0 90 0\n CHANNELS 6 Xposition Yposition Zposition Zrotation Xrotation Yrotation\n");
    for chain in 0..num_chains {
        for link in 0..chain_length {
            writeln!(text, "JOINT Chain{}_{}\n{{\n OFFSET {} 5 0\n CHANNELS 3 Zrotation Xrotation Yrotation", chain, link, chain).unwrap();
        }
        text.push_str("End Site\n{\n OFFSET 0 5 0\n}\n");
        for _ in 0..chain_length {
            text.push_str("}\n");
        }
    }
    text.push_str("}\nMOTION\n");
    writeln!(text, "Frames: {}\nFrame Time: 0.0083333", num_frames).unwrap();

    let num_channels = 6 + 3 * num_chains * chain_length;
    for frame in 0..num_frames {
        let t = frame as f64 * 0.01;
        let values: Vec<String> = (0..num_channels)
            .map(|channel| format!("{:.4}", (t + channel as f64).sin() * 30.0))
            .collect();
        writeln!(text, "{}", values.join(" ")).unwrap();
    }
    text
}

pub fn criterion_benchmark(c: &mut Criterion) {
    let text = generate_bvh(5, 6, 600);
    let bvh = load_bvh_from_string(&text).unwrap();

    let mut group = c.benchmark_group("sample-size-example");
    group.sample_size(10);
    group.bench_function("parse", |b| b.iter(|| load_bvh_from_string(black_box(&text)).unwrap()));
    group.bench_function("evaluate accumulated", |b| b.iter(|| evaluate_accumulated(black_box(&bvh))));
    group.bench_function("evaluate rest pose", |b| b.iter(|| evaluate_rest_pose(black_box(&bvh))));
    group.bench_function("fit root path", |b| b.iter(|| fit_root_path(black_box(&bvh)).unwrap()));
    group.finish();
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
