//! Heightfield terrain sampler
//!
//! Precomputed per-cell floor elevations and per-quad slopes, used for
//! height snapping and walkability checks. Built once from parsed terrain
//! data and immutable afterwards.
//!
//! Grid coordinates are world coordinates shifted by the field's offsets.
//! Continuously-varying player positions can wander outside the grid, so
//! every lookup clamps its indices to the allocated range rather than
//! trusting the caller.

use std::sync::Once;

use crate::error::HeightfieldError;

/// Fixed vertical clearance added to every height sample
///
/// Keeps the player's eye above the terrain surface rather than inside it.
pub const VERTICAL_CLEARANCE: f32 = 3.0;

static CLAMP_WARNING: Once = Once::new();

/// Immutable terrain elevation and slope grid
#[derive(Debug, Clone)]
pub struct Heightfield {
    width: usize,
    height: usize,
    offset_x: f32,
    offset_z: f32,
    /// Row-major, `width * height` samples
    heights: Vec<f32>,
    /// Per-quad steepest-edge delta, `(width - 1) * (height - 1)` samples
    slopes: Vec<f32>,
}

impl Heightfield {
    /// Build a field by merging a floor map with a raised boundary map
    ///
    /// Each cell takes the higher of the two layers, so boundary walls
    /// override the sand floor wherever they rise above it.
    pub fn from_layers(
        floor: &[f32],
        boundary: &[f32],
        width: usize,
        height: usize,
        offset_x: f32,
        offset_z: f32,
    ) -> Result<Self, HeightfieldError> {
        if floor.len() != boundary.len() {
            return Err(HeightfieldError::MismatchedLayers {
                floor: floor.len(),
                boundary: boundary.len(),
            });
        }
        let merged: Vec<f32> = floor
            .iter()
            .zip(boundary.iter())
            .map(|(&f, &b)| f.max(b))
            .collect();
        Self::from_heights(merged, width, height, offset_x, offset_z)
    }

    /// Build a field from a single elevation grid
    pub fn from_heights(
        heights: Vec<f32>,
        width: usize,
        height: usize,
        offset_x: f32,
        offset_z: f32,
    ) -> Result<Self, HeightfieldError> {
        if width < 2 || height < 2 {
            return Err(HeightfieldError::GridTooSmall { width, height });
        }
        let expected = width * height;
        if heights.len() != expected {
            return Err(HeightfieldError::DimensionMismatch {
                width,
                height,
                expected,
                actual: heights.len(),
            });
        }
        let slopes = compute_slopes(&heights, width, height);
        Ok(Self {
            width,
            height,
            offset_x,
            offset_z,
            heights,
            slopes,
        })
    }

    /// Grid width (cells along X)
    pub fn width(&self) -> usize {
        self.width
    }

    /// Grid height (cells along Z)
    pub fn height(&self) -> usize {
        self.height
    }

    /// World-to-grid X offset
    pub fn offset_x(&self) -> f32 {
        self.offset_x
    }

    /// World-to-grid Z offset
    pub fn offset_z(&self) -> f32 {
        self.offset_z
    }

    /// Elevation at integer cell coordinates, clamped to the grid
    pub fn height_at_cell(&self, x: i64, z: i64) -> f32 {
        let cx = x.clamp(0, self.width as i64 - 1) as usize;
        let cz = z.clamp(0, self.height as i64 - 1) as usize;
        self.heights[cx + self.width * cz]
    }

    /// Bilinearly interpolated terrain height at world (x, z), plus clearance
    pub fn sample(&self, x: f32, z: f32) -> f32 {
        let gx = x + self.offset_x;
        let gz = z + self.offset_z;
        if gx < 0.0 || gz < 0.0 || gx > (self.width - 1) as f32 || gz > (self.height - 1) as f32 {
            CLAMP_WARNING.call_once(|| {
                log::warn!("heightfield sample out of range at ({x}, {z}), clamping");
            });
        }

        let x0 = gx.floor() as i64;
        let x1 = gx.ceil() as i64;
        let z0 = gz.floor() as i64;
        let z1 = gz.ceil() as i64;

        let s = (gx - x0 as f32).clamp(0.0, 1.0);
        let t = (gz - z0 as f32).clamp(0.0, 1.0);

        let a = self.height_at_cell(x0, z0);
        let b = self.height_at_cell(x1, z0);
        let c = self.height_at_cell(x0, z1);
        let d = self.height_at_cell(x1, z1);

        let interpolated = (1.0 - t) * ((1.0 - s) * a + s * b) + t * ((1.0 - s) * c + s * d);
        interpolated + VERTICAL_CLEARANCE
    }

    /// Quad cell containing world (x, z), using nearest-corner rounding
    ///
    /// Slope is defined once per quad, a coarser table than the per-corner
    /// height grid, so this deliberately rounds to the nearest cell rather
    /// than reusing the bilinear corner indices.
    pub fn quad_cell(&self, x: f32, z: f32) -> (usize, usize) {
        let gx = x + self.offset_x;
        let gz = z + self.offset_z;

        let s = gx - gx.floor();
        let t = gz - gz.floor();
        let qx = gx.floor() as i64 - (1 - s.round() as i64);
        let qz = gz.floor() as i64 - (1 - t.round() as i64);

        let qx = qx.clamp(0, self.width as i64 - 2) as usize;
        let qz = qz.clamp(0, self.height as i64 - 2) as usize;
        (qx, qz)
    }

    /// Signed steepest-edge delta of the quad containing world (x, z)
    pub fn slope_at(&self, x: f32, z: f32) -> f32 {
        let (qx, qz) = self.quad_cell(x, z);
        self.slopes[qx + (self.width - 1) * qz]
    }

    /// Whether world (x, z) falls on the outer ring of quads
    ///
    /// The player is never allowed to walk onto the outermost ring, which
    /// keeps all of their height lookups strictly interior.
    pub fn on_boundary_ring(&self, x: f32, z: f32) -> bool {
        let (qx, qz) = self.quad_cell(x, z);
        qx == 0 || qx == self.width - 2 || qz == 0 || qz == self.height - 2
    }
}

/// Per-quad signed steepest-edge delta among AB, BD, CD, AC
///
/// Corners: a = (x, z), b = (x+1, z), c = (x, z+1), d = (x+1, z+1).
fn compute_slopes(heights: &[f32], width: usize, height: usize) -> Vec<f32> {
    let mut slopes = Vec::with_capacity((width - 1) * (height - 1));
    for z in 0..height - 1 {
        for x in 0..width - 1 {
            let a = heights[x + width * z];
            let b = heights[x + 1 + width * z];
            let c = heights[x + width * (z + 1)];
            let d = heights[x + 1 + width * (z + 1)];

            let edges = [b - a, d - b, d - c, c - a];
            let steepest = edges
                .into_iter()
                .fold(0.0_f32, |acc, e| if e.abs() > acc.abs() { e } else { acc });
            slopes.push(steepest);
        }
    }
    slopes
}
