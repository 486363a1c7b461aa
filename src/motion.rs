use crate::error::{BvhError, Result};
use crate::options::ParseOptions;
use crate::parse::parse_number;
use crate::tokenize::{Line, TokenStream};
use crate::types::*;

/// Parse one motion line into its numeric fields. The line must have exactly `num_channels` values.
fn parse_motion_line(line: &Line, frame: usize, num_channels: usize) -> Result<Vec<f64>> {
    if line.len() != num_channels {
        return Err(BvhError::MotionFieldCount {
            frame,
            expected: num_channels,
            found: line.len(),
            line: line.number,
        });
    }
    line.fields
        .iter()
        .map(|&field| parse_number(field, "motion value", line.number))
        .collect()
}

/// Route a motion line's values to one joint's 6 slots. Rotations are converted to radians here.
fn sample_joint(joint: &Joint, values: &[f64]) -> MotionSample {
    let mut sample: MotionSample = [0.0; CHANNEL_SLOTS];
    for channel in &joint.channels {
        let slot = channel.slot();
        if let Some(column) = joint.channel_slots[slot] {
            sample[slot] = if channel.is_rotation() {
                values[column].to_radians()
            } else {
                values[column]
            };
        }
    }
    sample
}

/// Consume exactly `num_frames` motion lines and fill every joint's `motion`.
/// Values are assigned to joints in declaration order, each joint taking as many values as it has channels.
pub(crate) fn decode_motion(
    tokens: &mut TokenStream,
    joints: &mut [Joint],
    num_frames: usize,
    num_channels: usize,
    options: &ParseOptions,
) -> Result<()> {
    for joint in joints.iter_mut() {
        joint.motion = Vec::with_capacity(num_frames);
    }

    for frame in 0..num_frames {
        let line = tokens.next_line().ok_or(BvhError::MissingFrames {
            declared: num_frames,
            found: frame,
        })?;
        let values = parse_motion_line(&line, frame, num_channels)?;

        for joint in joints.iter_mut() {
            let sample = sample_joint(joint, &values);
            joint.motion.push(sample);
        }
    }

    if let Some(line) = tokens.peek() {
        let line_number = line.number;
        if !options.allow_trailing_data {
            return Err(BvhError::TrailingData { line: line_number });
        }
        tracing::warn!(
            line = line_number,
            ignored_lines = tokens.remaining(),
            "ignoring data after the last frame"
        );
    }

    Ok(())
}

/////////////////////////////////////////////////////////////////////////////////////////////////
