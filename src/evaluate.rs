//! The two ways of turning decoded channel data into per-joint transforms.
//!
//! They are NOT interchangeable:
//! * [`evaluate_accumulated`] treats every frame's channel values as deltas and keeps a running sum
//!   across frames, starting from the joint's offset. It gives a raw per-joint trajectory.
//! * [`evaluate_rest_pose`] anchors each joint at its world rest head and treats every frame's
//!   channel values as absolute, independent of other frames. It is what a display rig consumes.

use crate::types::*;
use crate::utils::{euler_to_quat, rest_rotation_from_direction};
use cgmath::Zero;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/////////////////////////////////////////////////////////////////////////////////////////////////

/// Running local position/rotation of every joint, indexed `[joint][frame]`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AccumulatedMotion {
    pub positions: Vec<Vec<Position>>,
    /// Radians, x/y/z components.
    pub rotations: Vec<Vec<Rotation>>,
}

fn accumulate_joint(joint: &Joint) -> (Vec<Position>, Vec<Rotation>) {
    let mut position = joint.offset;
    let mut rotation = Rotation::zero();
    let mut positions = Vec::with_capacity(joint.motion.len());
    let mut rotations = Vec::with_capacity(joint.motion.len());

    for sample in &joint.motion {
        for channel in &joint.channels {
            let value = sample[channel.slot()];
            match channel {
                Channel::Xposition => position.x += value,
                Channel::Yposition => position.y += value,
                Channel::Zposition => position.z += value,
                Channel::Xrotation => rotation.x += value,
                Channel::Yrotation => rotation.y += value,
                Channel::Zrotation => rotation.z += value,
            }
        }
        positions.push(position);
        rotations.push(rotation);
    }
    (positions, rotations)
}

/// Accumulation mode: for each joint, start at its offset with zero rotation and add every frame's
/// channel values to a running total. Frame `i` = frame `i - 1` + channel values of frame `i`.
pub fn evaluate_accumulated(bvh: &Bvh) -> AccumulatedMotion {
    // each joint only sums its own channels, so declaration order is enough
    let (positions, rotations) = bvh.joints.iter().map(accumulate_joint).unzip();
    AccumulatedMotion { positions, rotations }
}

/////////////////////////////////////////////////////////////////////////////////////////////////

/// Rest geometry of every joint plus its absolute per-frame channel values.
/// Per-joint vectors are indexed by joint, per-frame ones `[joint][frame]`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RestPose {
    pub rest_head_world: Vec<Position>,
    /// Same as the joint's offset (relative to the parent's head).
    pub rest_head_local: Vec<Position>,
    pub rest_tail_world: Vec<Position>,
    /// Tail expressed in the same frame as `rest_head_local`.
    pub rest_tail_local: Vec<Position>,
    /// Rotation taking +Y onto the head -> tail direction.
    pub rest_rotations: Vec<Quaternion>,

    /// Decoded location of each frame, zero for joints without position channels.
    pub pose_locations: Vec<Vec<Position>>,
    /// Decoded euler rotation (radians) of each frame.
    pub pose_rotations: Vec<Vec<Rotation>>,
    /// `pose_rotations` composed in the joint's rotation order.
    pub pose_local_rotations: Vec<Vec<Quaternion>>,
}

impl RestPose {
    /// Location of a frame relative to the joint's world rest head.
    /// `None` for joints without position channels.
    pub fn delta_location(&self, joint: &Joint, frame: usize) -> Option<Position> {
        if !joint.has_location() {
            return None;
        }
        let location = self.pose_locations.get(joint.index)?.get(frame)?;
        Some(*location - self.rest_head_world[joint.index])
    }
}

/// Tail of a joint that isn't an End Site: the explicit End Site if it has one, otherwise
/// its head (no children), its only child's head, or the average of its children's heads.
fn synthesize_tail(bvh: &Bvh, joint: &Joint, heads: &[Position]) -> Position {
    if let Some(&end_site) = joint
        .children
        .iter()
        .find(|&&child| bvh.joints[child].is_end_site())
    {
        return heads[end_site];
    }

    let num_children = joint.children.len();
    if num_children == 0 {
        heads[joint.index]
    } else if num_children == 1 {
        heads[joint.children[0]]
    } else {
        joint
            .children
            .iter()
            .map(|&child| heads[child])
            .sum::<Position>()
            / num_children as f64
    }
}

/// Rest + delta mode: world rest heads, synthesized tails, and the raw per-frame channel values.
pub fn evaluate_rest_pose(bvh: &Bvh) -> RestPose {
    let num_joints = bvh.joints.len();

    //// rest heads; parents are always declared before their children
    let mut rest_head_world: Vec<Position> = Vec::with_capacity(num_joints);
    for joint in &bvh.joints {
        let head = match joint.parent {
            Some(parent) => rest_head_world[parent] + joint.offset,
            None => joint.offset,
        };
        rest_head_world.push(head);
    }
    let rest_head_local: Vec<Position> = bvh.joints.iter().map(|joint| joint.offset).collect();

    //// rest tails
    let rest_tail_world: Vec<Position> = bvh
        .joints
        .iter()
        .map(|joint| synthesize_tail(bvh, joint, &rest_head_world))
        .collect();
    let rest_tail_local: Vec<Position> = (0..num_joints)
        .map(|i| rest_head_local[i] + (rest_tail_world[i] - rest_head_world[i]))
        .collect();
    let rest_rotations: Vec<Quaternion> = (0..num_joints)
        .map(|i| rest_rotation_from_direction(rest_tail_world[i] - rest_head_world[i]))
        .collect();

    //// per-frame values, each frame on its own
    let mut pose_locations = Vec::with_capacity(num_joints);
    let mut pose_rotations = Vec::with_capacity(num_joints);
    let mut pose_local_rotations = Vec::with_capacity(num_joints);
    for joint in &bvh.joints {
        let order = joint.rotation_order.unwrap_or(RotationOrder::XYZ);
        let locations: Vec<Position> = joint
            .motion
            .iter()
            .map(|sample| Position::new(sample[0], sample[1], sample[2]))
            .collect();
        let rotations: Vec<Rotation> = joint
            .motion
            .iter()
            .map(|sample| Rotation::new(sample[3], sample[4], sample[5]))
            .collect();
        let quaternions: Vec<Quaternion> = rotations
            .iter()
            .map(|&rotation| euler_to_quat(rotation, order))
            .collect();
        pose_locations.push(locations);
        pose_rotations.push(rotations);
        pose_local_rotations.push(quaternions);
    }

    RestPose {
        rest_head_world,
        rest_head_local,
        rest_tail_world,
        rest_tail_local,
        rest_rotations,
        pose_locations,
        pose_rotations,
        pose_local_rotations,
    }
}
