//! Least-squares fit of a single uniform cubic B-spline segment (4 control points) through the root joint's path.

use crate::error::{BvhError, Result};
use crate::types::{Bvh, Position};
use cgmath::{InnerSpace, Zero};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

pub const NUM_CONTROL_POINTS: usize = 4;

/// Time parameters closer than this are treated as the same sample when checking the fit is well-posed.
const TIME_EPSILON: f64 = 1e-9;

/// Smallest pivot accepted by the solver, relative to the largest entry of the normal matrix.
const PIVOT_EPSILON: f64 = 1e-14;

/////////////////////////////////////////////////////////////////////////////////////////////////

/// The four uniform cubic B-spline basis functions at `t` in [0, 1]. They always sum to 1.
pub fn basis(t: f64) -> [f64; NUM_CONTROL_POINTS] {
    let t2 = t * t;
    let t3 = t2 * t;
    [
        (1.0 - t).powi(3) / 6.0,
        (3.0 * t3 - 6.0 * t2 + 4.0) / 6.0,
        (-3.0 * t3 + 3.0 * t2 + 3.0 * t + 1.0) / 6.0,
        t3 / 6.0,
    ]
}

/// Point of the spline defined by `control_points` at `t`.
pub fn evaluate_spline(control_points: &[Position; NUM_CONTROL_POINTS], t: f64) -> Position {
    basis(t)
        .iter()
        .zip(control_points.iter())
        .map(|(&b, &point)| point * b)
        .sum()
}

/// Cumulative arc length at every sample divided by the total length, so the first sample is at 0 and the last at 1.
pub fn time_parameters(points: &[Position]) -> Result<Vec<f64>> {
    let mut accumulated = Vec::with_capacity(points.len());
    let mut total = 0.0;
    for (i, point) in points.iter().enumerate() {
        if i > 0 {
            total += (*point - points[i - 1]).magnitude();
        }
        accumulated.push(total);
    }

    if !(total > 0.0) {
        return Err(BvhError::DegenerateFit {
            reason: "root path has zero length".to_string(),
        });
    }
    Ok(accumulated.into_iter().map(|d| d / total).collect())
}

/////////////////////////////////////////////////////////////////////////////////////////////////

/// Control points plus the fitted and original samples, one of each per frame.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RootPathFit {
    pub control_points: [Position; NUM_CONTROL_POINTS],
    /// Normalized arc-length parameter of every frame.
    pub times: Vec<f64>,
    /// The spline evaluated at `times`.
    pub fitted_points: Vec<Position>,
    pub original_points: Vec<Position>,
}

impl RootPathFit {
    /// Sum of squared distances between fitted and original points.
    pub fn residual(&self) -> f64 {
        self.fitted_points
            .iter()
            .zip(self.original_points.iter())
            .map(|(fitted, original)| (*fitted - *original).magnitude2())
            .sum()
    }
}

/// Gaussian elimination with partial pivoting, the three coordinates solved side by side.
/// Clustered time parameters make `a` nearly singular, so no explicit inverse is formed.
fn solve_normal_equations(
    mut a: [[f64; NUM_CONTROL_POINTS]; NUM_CONTROL_POINTS],
    mut b: [Position; NUM_CONTROL_POINTS],
) -> Result<[Position; NUM_CONTROL_POINTS]> {
    let scale = a.iter().flatten().fold(0.0_f64, |max, value| max.max(value.abs()));

    for col in 0..NUM_CONTROL_POINTS {
        let pivot = (col..NUM_CONTROL_POINTS)
            .max_by(|&i, &j| a[i][col].abs().total_cmp(&a[j][col].abs()))
            .unwrap_or(col);
        if !(a[pivot][col].abs() > scale * PIVOT_EPSILON) {
            return Err(BvhError::DegenerateFit {
                reason: "normal equations are singular".to_string(),
            });
        }
        a.swap(col, pivot);
        b.swap(col, pivot);

        for row in col + 1..NUM_CONTROL_POINTS {
            let factor = a[row][col] / a[col][col];
            for k in col..NUM_CONTROL_POINTS {
                let eliminated = factor * a[col][k];
                a[row][k] -= eliminated;
            }
            let eliminated = b[col] * factor;
            b[row] -= eliminated;
        }
    }

    //// back substitution
    let mut solution = [Position::zero(); NUM_CONTROL_POINTS];
    for row in (0..NUM_CONTROL_POINTS).rev() {
        let mut value = b[row];
        for k in row + 1..NUM_CONTROL_POINTS {
            value -= solution[k] * a[row][k];
        }
        solution[row] = value / a[row][row];
    }
    Ok(solution)
}

/// Fit 4 control points to `points` by solving the normal equations `A P = B` with
/// `A[r][c] = sum B_r(t) B_c(t)` and `B[r] = sum B_r(t) point`.
pub fn fit_spline(points: &[Position]) -> Result<RootPathFit> {
    if points.is_empty() {
        return Err(BvhError::DegenerateFit {
            reason: "no frames".to_string(),
        });
    }
    let times = time_parameters(points)?;

    // A is singular unless at least 4 distinct parameters were sampled
    let distinct = 1 + times
        .windows(2)
        .filter(|pair| pair[1] - pair[0] > TIME_EPSILON)
        .count();
    if distinct < NUM_CONTROL_POINTS {
        return Err(BvhError::DegenerateFit {
            reason: format!(
                "only {} distinct path samples, at least {} are needed",
                distinct, NUM_CONTROL_POINTS
            ),
        });
    }

    let mut a = [[0.0; NUM_CONTROL_POINTS]; NUM_CONTROL_POINTS];
    let mut b = [Position::zero(); NUM_CONTROL_POINTS];
    for (&t, &point) in times.iter().zip(points.iter()) {
        let weights = basis(t);
        for row in 0..NUM_CONTROL_POINTS {
            for col in 0..NUM_CONTROL_POINTS {
                a[row][col] += weights[row] * weights[col];
            }
            b[row] += point * weights[row];
        }
    }

    let control_points = solve_normal_equations(a, b)?;

    let fitted_points = times
        .iter()
        .map(|&t| evaluate_spline(&control_points, t))
        .collect();

    Ok(RootPathFit {
        control_points,
        times,
        fitted_points,
        original_points: points.to_vec(),
    })
}

/// Fit a spline through the root joint's decoded per-frame location.
#[tracing::instrument(skip_all, fields(num_frames = bvh.num_frames))]
pub fn fit_root_path(bvh: &Bvh) -> Result<RootPathFit> {
    let points: Vec<Position> = bvh
        .joints
        .first()
        .map(|root| {
            root.motion
                .iter()
                .map(|sample| Position::new(sample[0], sample[1], sample[2]))
                .collect()
        })
        .unwrap_or_default();

    fit_spline(&points).map_err(|err| {
        tracing::warn!(error = %err, "skipping root path fit");
        err
    })
}

/////////////////////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn basis_is_a_partition_of_unity() {
        for i in 0..=20 {
            let t = i as f64 / 20.0;
            let sum: f64 = basis(t).iter().sum();
            assert!((sum - 1.0).abs() < 1e-12);
        }
        assert_eq!(basis(0.0), [1.0 / 6.0, 4.0 / 6.0, 1.0 / 6.0, 0.0]);
        assert_eq!(basis(1.0), [0.0, 1.0 / 6.0, 4.0 / 6.0, 1.0 / 6.0]);
    }

    #[test]
    fn time_parameters_follow_arc_length() {
        let points = [
            Position::new(0.0, 0.0, 0.0),
            Position::new(1.0, 0.0, 0.0),
            Position::new(1.0, 3.0, 0.0),
        ];
        let times = time_parameters(&points).unwrap();
        assert_eq!(times, vec![0.0, 0.25, 1.0]);
    }

    #[test]
    fn zero_length_path_is_degenerate() {
        let points = vec![Position::new(2.0, 2.0, 2.0); 5];
        assert!(matches!(
            fit_spline(&points),
            Err(BvhError::DegenerateFit { .. })
        ));
    }

    #[test]
    fn too_few_distinct_samples_are_degenerate() {
        let points = [
            Position::new(0.0, 0.0, 0.0),
            Position::new(0.0, 0.0, 0.0),
            Position::new(1.0, 0.0, 0.0),
            Position::new(2.0, 0.0, 0.0),
        ];
        assert!(matches!(
            fit_spline(&points),
            Err(BvhError::DegenerateFit { .. })
        ));
    }

    #[test]
    fn singular_system_is_degenerate() {
        let a = [[1.0, 2.0, 0.0, 0.0], [2.0, 4.0, 0.0, 0.0], [0.0, 0.0, 1.0, 0.0], [0.0, 0.0, 0.0, 1.0]];
        let b = [Position::zero(); NUM_CONTROL_POINTS];
        assert!(matches!(
            solve_normal_equations(a, b),
            Err(BvhError::DegenerateFit { .. })
        ));
    }

    #[test]
    fn solver_pivots_past_a_zero_diagonal() {
        let a = [[0.0, 1.0, 0.0, 0.0], [1.0, 0.0, 0.0, 0.0], [0.0, 0.0, 2.0, 0.0], [0.0, 0.0, 0.0, 4.0]];
        let b = [
            Position::new(1.0, 0.0, 0.0),
            Position::new(2.0, 0.0, 0.0),
            Position::new(0.0, 2.0, 0.0),
            Position::new(0.0, 0.0, 8.0),
        ];
        let solution = solve_normal_equations(a, b).unwrap();
        assert_eq!(
            solution,
            [
                Position::new(2.0, 0.0, 0.0),
                Position::new(1.0, 0.0, 0.0),
                Position::new(0.0, 1.0, 0.0),
                Position::new(0.0, 0.0, 2.0),
            ]
        );
    }
}
