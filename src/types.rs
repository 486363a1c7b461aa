use cgmath::{Quaternion as CgQuaternion, Vector3};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/////////////////////////////////////////////////////////////////////////////////////////////////

pub type Index = usize;
pub type Depth = usize;
pub type Quaternion = CgQuaternion<f64>;
pub type Position = Vector3<f64>;
/// Euler angles in radians, always stored in x/y/z component order regardless of the joint's rotation order.
pub type Rotation = Vector3<f64>;

/// Number of channel slots a joint can have (3 location + 3 rotation).
pub const CHANNEL_SLOTS: usize = 6;

/// One decoded frame of a joint: (lx, ly, lz, rx, ry, rz).
/// Rotations are in radians; slots of unused channels are zero.
pub type MotionSample = [f64; CHANNEL_SLOTS];

/////////////////////////////////////////////////////////////////////////////////////////////////

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    pub fn index(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
        }
    }

    pub fn letter(self) -> char {
        match self {
            Axis::X => 'X',
            Axis::Y => 'Y',
            Axis::Z => 'Z',
        }
    }
}

/////////////////////////////////////////////////////////////////////////////////////////////////

/// A single animated degree of freedom of a joint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Channel {
    Xposition,
    Yposition,
    Zposition,
    Xrotation,
    Yrotation,
    Zrotation,
}

impl Channel {
    pub const ALL: [Channel; CHANNEL_SLOTS] = [
        Channel::Xposition,
        Channel::Yposition,
        Channel::Zposition,
        Channel::Xrotation,
        Channel::Yrotation,
        Channel::Zrotation,
    ];

    /// Match a channel name as it appears after `CHANNELS N`.
    pub fn from_name(name: &str, case_sensitive: bool) -> Option<Channel> {
        Channel::ALL.into_iter().find(|channel| {
            if case_sensitive {
                channel.name() == name
            } else {
                channel.name().eq_ignore_ascii_case(name)
            }
        })
    }

    pub fn name(self) -> &'static str {
        match self {
            Channel::Xposition => "Xposition",
            Channel::Yposition => "Yposition",
            Channel::Zposition => "Zposition",
            Channel::Xrotation => "Xrotation",
            Channel::Yrotation => "Yrotation",
            Channel::Zrotation => "Zrotation",
        }
    }

    /// Position of this channel inside a [`MotionSample`] and inside [`ChannelSlots`].
    pub fn slot(self) -> usize {
        match self {
            Channel::Xposition => 0,
            Channel::Yposition => 1,
            Channel::Zposition => 2,
            Channel::Xrotation => 3,
            Channel::Yrotation => 4,
            Channel::Zrotation => 5,
        }
    }

    pub fn axis(self) -> Axis {
        match self {
            Channel::Xposition | Channel::Xrotation => Axis::X,
            Channel::Yposition | Channel::Yrotation => Axis::Y,
            Channel::Zposition | Channel::Zrotation => Axis::Z,
        }
    }

    pub fn is_rotation(self) -> bool {
        matches!(
            self,
            Channel::Xrotation | Channel::Yrotation | Channel::Zrotation
        )
    }
}

/// For each of the 6 channel kinds, the column of that channel in a motion line (`None` if the joint doesn't have it).
pub type ChannelSlots = [Option<Index>; CHANNEL_SLOTS];

/////////////////////////////////////////////////////////////////////////////////////////////////

/// Order in which a joint's rotation channels are listed (and therefore applied).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum RotationOrder {
    XYZ,
    XZY,
    YXZ,
    YZX,
    ZXY,
    ZYX,
}

impl RotationOrder {
    /// Lookup over the 3! permutations of the rotation axes.
    pub fn from_axes(axes: [Axis; 3]) -> Option<RotationOrder> {
        use Axis::*;
        match axes {
            [X, Y, Z] => Some(RotationOrder::XYZ),
            [X, Z, Y] => Some(RotationOrder::XZY),
            [Y, X, Z] => Some(RotationOrder::YXZ),
            [Y, Z, X] => Some(RotationOrder::YZX),
            [Z, X, Y] => Some(RotationOrder::ZXY),
            [Z, Y, X] => Some(RotationOrder::ZYX),
            _ => None,
        }
    }

    /// Derive the order from the rotation axes in the order they were listed.
    /// Missing axes (joints with only one or two rotation channels) are appended in X, Y, Z order.
    /// Returns `None` when no rotation axis was listed or an axis repeats.
    pub fn from_listed(listed: &[Axis]) -> Option<RotationOrder> {
        if listed.is_empty() || listed.len() > 3 {
            return None;
        }
        let mut axes = listed.to_vec();
        for axis in [Axis::X, Axis::Y, Axis::Z] {
            if !axes.contains(&axis) {
                axes.push(axis);
            }
        }
        match axes.as_slice() {
            &[a, b, c] => RotationOrder::from_axes([a, b, c]),
            _ => None,
        }
    }

    pub fn axes(self) -> [Axis; 3] {
        use Axis::*;
        match self {
            RotationOrder::XYZ => [X, Y, Z],
            RotationOrder::XZY => [X, Z, Y],
            RotationOrder::YXZ => [Y, X, Z],
            RotationOrder::YZX => [Y, Z, X],
            RotationOrder::ZXY => [Z, X, Y],
            RotationOrder::ZYX => [Z, Y, X],
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RotationOrder::XYZ => "XYZ",
            RotationOrder::XZY => "XZY",
            RotationOrder::YXZ => "YXZ",
            RotationOrder::YZX => "YZX",
            RotationOrder::ZXY => "ZXY",
            RotationOrder::ZYX => "ZYX",
        }
    }
}

impl std::fmt::Display for RotationOrder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/////////////////////////////////////////////////////////////////////////////////////////////////

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum JointKind {
    Root,
    Joint,
    /// `End Site` pseudo-joint: no channels, no children, only an offset marking the tip of its parent.
    EndSite,
}

/// Name given to every `End Site` pseudo-joint. These are not unique, look them up by index.
pub const END_SITE_NAME: &str = "End Site";

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Joint {
    pub name: String,
    /// Declaration order in the hierarchy; also the index into [`Bvh::joints`].
    pub index: Index,
    pub kind: JointKind,
    pub parent: Option<Index>,
    pub children: Vec<Index>,
    pub depth: Depth,
    /// Rest-pose displacement from the parent's head.
    pub offset: Position,
    /// Channels in file order.
    pub channels: Vec<Channel>,
    pub channel_slots: ChannelSlots,
    pub rotation_order: Option<RotationOrder>,
    /// One entry per frame.
    pub motion: Vec<MotionSample>,
}

impl Joint {
    pub(crate) fn new(
        name: String,
        index: Index,
        kind: JointKind,
        parent: Option<Index>,
        depth: Depth,
    ) -> Self {
        Joint {
            name,
            index,
            kind,
            parent,
            children: Vec::new(),
            depth,
            offset: Position::new(0.0, 0.0, 0.0),
            channels: Vec::new(),
            channel_slots: [None; CHANNEL_SLOTS],
            rotation_order: None,
            motion: Vec::new(),
        }
    }

    pub fn num_channels(&self) -> usize {
        self.channels.len()
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    pub fn is_end_site(&self) -> bool {
        self.kind == JointKind::EndSite
    }

    pub fn has_location(&self) -> bool {
        self.channel_slots[..3].iter().any(Option::is_some)
    }

    pub fn has_rotation(&self) -> bool {
        self.channel_slots[3..].iter().any(Option::is_some)
    }

    /// Rotation order string, "XYZ" when the joint has no rotation channels.
    pub fn rotation_order_str(&self) -> &'static str {
        self.rotation_order.map_or("XYZ", RotationOrder::as_str)
    }

    /// Decoded location of a frame (zero for unused channels).
    pub fn location(&self, frame: usize) -> Option<Position> {
        self.motion
            .get(frame)
            .map(|sample| Position::new(sample[0], sample[1], sample[2]))
    }

    /// Decoded rotation of a frame in radians (zero for unused channels).
    pub fn rotation(&self, frame: usize) -> Option<Rotation> {
        self.motion
            .get(frame)
            .map(|sample| Rotation::new(sample[3], sample[4], sample[5]))
    }
}

/////////////////////////////////////////////////////////////////////////////////////////////////

/// A parsed .bvh file: the joint arena plus motion metadata.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Bvh {
    /// All joints (End Sites included) in declaration order. The root is always at index 0.
    pub joints: Vec<Joint>,
    pub num_frames: usize,
    /// Seconds per frame.
    pub frame_time: f64,
    /// Sum of all joints' channel counts, i.e. the width of every motion line.
    pub num_channels: usize,
}

impl Bvh {
    pub fn root(&self) -> &Joint {
        &self.joints[0]
    }

    pub fn joint(&self, index: Index) -> Option<&Joint> {
        self.joints.get(index)
    }

    /// First non End Site joint called `name`.
    pub fn joint_by_name(&self, name: &str) -> Option<&Joint> {
        self.joints
            .iter()
            .find(|joint| !joint.is_end_site() && joint.name == name)
    }

    pub fn end_sites(&self) -> impl Iterator<Item = &Joint> {
        self.joints.iter().filter(|joint| joint.is_end_site())
    }

    pub fn children(&self, index: Index) -> impl Iterator<Item = &Joint> {
        self.joints
            .get(index)
            .into_iter()
            .flat_map(move |joint| joint.children.iter().map(move |&child| &self.joints[child]))
    }

    /// Frames per second, rounded to the nearest integer (0 if frame time is not positive).
    pub fn fps(&self) -> u32 {
        if self.frame_time > 0.0 {
            (1.0 / self.frame_time).round() as u32
        } else {
            0
        }
    }

    /// Length of the animation in seconds.
    pub fn duration(&self) -> f64 {
        self.num_frames as f64 * self.frame_time
    }
}

/////////////////////////////////////////////////////////////////////////////////////////////////
