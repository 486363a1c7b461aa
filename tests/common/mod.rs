#![allow(dead_code)]

use bvh_motion::types::Position;
use cgmath::InnerSpace;

pub const TWO_JOINT: &str = include_str!("../data/two_joint.bvh");
pub const WALK: &str = include_str!("../data/walk.bvh");

pub fn data_path(name: &str) -> String {
    format!("{}/tests/data/{}", env!("CARGO_MANIFEST_DIR"), name)
}

pub fn assert_close(actual: Position, expected: Position) {
    assert!(
        (actual - expected).magnitude() < 1e-9,
        "{:?} is not close to {:?}",
        actual,
        expected
    );
}

pub fn assert_close_tol(actual: Position, expected: Position, tolerance: f64) {
    assert!(
        (actual - expected).magnitude() < tolerance,
        "{:?} is not within {} of {:?}",
        actual,
        tolerance,
        expected
    );
}

/// A root-only file with 3 position channels, one motion line per point.
pub fn root_path_bvh(points: &[[f64; 3]]) -> String {
    let mut text = String::from(
        "HIERARCHY\nROOT Root\n{\n  OFFSET 0 0 0\n  CHANNELS 3 Xposition Yposition Zposition\n  End Site\n  {\n    OFFSET 0 1 0\n  }\n}\nMOTION\n",
    );
    text.push_str(&format!("Frames: {}\nFrame Time: 0.04\n", points.len()));
    for point in points {
        text.push_str(&format!("{} {} {}\n", point[0], point[1], point[2]));
    }
    text
}

/// A single chain of `depth + 1` joints, each with one Xrotation channel, and one frame of 1 degree everywhere.
pub fn chain_bvh(depth: usize) -> String {
    let mut text = String::from("HIERARCHY\nROOT J0\n{\nOFFSET 0 1 0\nCHANNELS 1 Xrotation\n");
    for i in 1..=depth {
        text.push_str(&format!("JOINT J{}\n{{\nOFFSET 0 1 0\nCHANNELS 1 Xrotation\n", i));
    }
    for _ in 0..=depth {
        text.push_str("}\n");
    }
    text.push_str("MOTION\nFrames: 1\nFrame Time: 0.04\n");
    text.push_str(&vec!["1"; depth + 1].join(" "));
    text.push('\n');
    text
}
