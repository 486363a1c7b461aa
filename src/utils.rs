use crate::types::{Axis, Position, Quaternion, Rotation, RotationOrder};
use cgmath::{InnerSpace, One, Rad, Rotation3, Zero};

/// Convert euler angles in RADIANS (stored x/y/z) to a quaternion.
/// Rotations are composed in `order`, i.e. for "ZXY" the result is Rz * Rx * Ry.
pub fn euler_to_quat(rotation: Rotation, order: RotationOrder) -> Quaternion {
    order
        .axes()
        .iter()
        .map(|&axis| match axis {
            Axis::X => Quaternion::from_angle_x(Rad(rotation.x)),
            Axis::Y => Quaternion::from_angle_y(Rad(rotation.y)),
            Axis::Z => Quaternion::from_angle_z(Rad(rotation.z)),
        })
        .fold(Quaternion::one(), |acc, q| acc * q)
}

/// Rotation taking +Y onto the direction `head -> tail`. Bones point along +Y in rest pose,
/// so this is the rest orientation of a bone; zero-length bones get the identity.
pub fn rest_rotation_from_direction(direction: Position) -> Quaternion {
    if direction == Position::zero() {
        return Quaternion::one();
    }
    let dir = direction.normalize();
    let up = Position::unit_y();
    let dot = dir.dot(up);

    // code source: https://github.com/Wasserwecken/bvhio/blob/c91641e3e41ab5e1281b200a754399ae082f95dd/bvhio/lib/bvh/BvhJoint.py#L48
    if dot < -0.9999 {
        // half turn around Z
        Quaternion::new(0.0, 0.0, 0.0, 1.0)
    } else if dot > 0.9999 {
        Quaternion::one()
    } else {
        let angle = dot.acos();
        let axis = up.cross(dir).normalize();
        Quaternion::from_axis_angle(axis, Rad(angle))
    }
}

/////////////////////////////////////////////////////////////////////////////////////////////////
