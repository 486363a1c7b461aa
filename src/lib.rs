//! A .bvh (Biovision Hierarchy) parser.
//!
//! ```no_run
//! use bvh_motion::parse::load_bvh_from_file;
//! use bvh_motion::evaluate::{evaluate_accumulated, evaluate_rest_pose};
//! use bvh_motion::spline::fit_root_path;
//!
//! let bvh = load_bvh_from_file("walk.bvh")?;
//! let trajectory = evaluate_accumulated(&bvh);
//! let rig = evaluate_rest_pose(&bvh);
//! let path = fit_root_path(&bvh)?;
//! # Ok::<(), bvh_motion::BvhError>(())
//! ```

pub mod error;
pub mod evaluate;
mod motion;
pub mod options;
pub mod parse;
pub mod spline;
pub mod tokenize;
pub mod types;
pub mod utils;

pub use error::{BvhError, Result};
pub use evaluate::{evaluate_accumulated, evaluate_rest_pose, AccumulatedMotion, RestPose};
pub use options::ParseOptions;
pub use parse::{
    load_bvh_from_file, load_bvh_from_file_with_options, load_bvh_from_string,
    load_bvh_from_string_with_options,
};
pub use spline::{fit_root_path, RootPathFit};
pub use types::{Bvh, Channel, Joint, JointKind, RotationOrder};
