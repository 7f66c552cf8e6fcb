//! Turning a displacement in kilometres into a destination cell.
//!
//! A cohort displaced by `(lat_km, lon_km)` is treated as if the whole cell
//! had shifted by that vector. The part of the shifted cell lying across
//! each edge, as a proportion of the cell area, is the probability of
//! leaving through that edge:
//!
//! ```text
//!   diagonal  = |lat| * |lon|
//!   east/west = |lon| * height - diagonal
//!   north/south = |lat| * width - diagonal
//! ```
//!
//! Displacements longer than a cell are walked in sub-steps so that each
//! sub-step crosses at most one edge.

use madingley_core::grid::ModelGrid;
use madingley_core::types::{CellIndex, Direction};
use rand::Rng;
use std::f64::consts::TAU;

/// Upper bound on sub-steps for one displacement. Cells near the poles are
/// very narrow; past this bound the per-step distance is clamped instead.
const MAX_SUB_STEPS: usize = 64;

/// Where a displaced cohort ends up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Displacement {
    pub destination: CellIndex,
    /// Edge crossed when leaving the origin.
    pub exit: Direction,
    /// Edge crossed when entering the destination.
    pub entry: Direction,
}

/// Resolve a displacement from `origin`. `None` when the cohort stays put.
///
/// A crossing into a cell of a different realm, or off the grid, cancels
/// the whole move: the cohort stays in `origin`.
pub fn displace<R: Rng + ?Sized>(
    grid: &dyn ModelGrid,
    origin: CellIndex,
    lat_km: f64,
    lon_km: f64,
    rng: &mut R,
) -> Option<Displacement> {
    let source = grid.cell(origin)?;
    if !(lat_km.is_finite() && lon_km.is_finite()) || source.height_km <= 0.0 || source.width_km <= 0.0 {
        return None;
    }
    let realm = source.realm;

    let cells_crossed = (lat_km.abs() / source.height_km).max(lon_km.abs() / source.width_km);
    let sub_steps = ((cells_crossed - 1e-9).ceil() as usize).clamp(1, MAX_SUB_STEPS);
    let step_lat = lat_km / sub_steps as f64;
    let step_lon = lon_km / sub_steps as f64;

    let mut current = origin;
    let mut exit = None;
    let mut entry = None;

    for _ in 0..sub_steps {
        let cell = grid.cell(current)?;
        let Some((lat_step, lon_step)) =
            edge_crossing(cell.height_km, cell.width_km, step_lat, step_lon, rng)
        else {
            continue;
        };

        let next = grid
            .neighbour(current, lat_step, lon_step)
            .filter(|next| grid.cell(*next).is_some_and(|c| c.realm == realm))?;

        let direction = Direction::from_steps(lat_step, lon_step)?;
        if current == origin {
            exit = Some(direction);
        }
        entry = Some(direction.opposite());
        current = next;
    }

    if current == origin {
        return None;
    }
    Some(Displacement {
        destination: current,
        exit: exit?,
        entry: entry?,
    })
}

/// Draw which edge, if any, a single displacement crosses.
///
/// Returns the (lat, lon) step of the crossing.
pub fn edge_crossing<R: Rng + ?Sized>(
    height_km: f64,
    width_km: f64,
    lat_km: f64,
    lon_km: f64,
    rng: &mut R,
) -> Option<(i32, i32)> {
    let area = height_km * width_km;
    if area <= 0.0 {
        return None;
    }

    let lat_distance = lat_km.abs().min(height_km);
    let lon_distance = lon_km.abs().min(width_km);

    let diagonal = lat_distance * lon_distance / area;
    let lon_only = (lon_distance * height_km) / area - diagonal;
    let lat_only = (lat_distance * width_km) / area - diagonal;

    let lat_sign = if lat_km < 0.0 { -1 } else { 1 };
    let lon_sign = if lon_km < 0.0 { -1 } else { 1 };

    let draw: f64 = rng.gen();
    if draw < diagonal {
        Some((lat_sign, lon_sign))
    } else if draw < diagonal + lon_only {
        Some((0, lon_sign))
    } else if draw < diagonal + lon_only + lat_only {
        Some((lat_sign, 0))
    } else {
        None
    }
}

/// Uniform heading in radians, measured anticlockwise from east.
pub fn random_heading<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    rng.gen_range(0.0..TAU)
}

/// Standard normal draw (Box-Muller).
pub fn standard_normal<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    let u1: f64 = rng.gen_range(f64::EPSILON..1.0);
    let u2: f64 = rng.gen();
    (-2.0 * u1.ln()).sqrt() * (TAU * u2).cos()
}
