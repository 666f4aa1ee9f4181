// grid.rs
// Regular 3D sampling lattice for field evaluation

use crate::config::MAX_GRID_POINTS;
use crate::error::{FieldError, Result};
use serde::{Deserialize, Serialize};
use ultraviolet::DVec3;

/// Evenly spaced samples along one axis, endpoints included.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct AxisRange {
    pub min: f64,
    pub max: f64,
    pub count: usize,
}

impl AxisRange {
    pub fn new(min: f64, max: f64, count: usize) -> Self {
        Self { min, max, count }
    }

    fn validate(&self, axis: char) -> Result<()> {
        if self.count == 0 {
            return Err(FieldError::EmptyAxis { axis });
        }
        if !self.min.is_finite() || !self.max.is_finite() || self.min > self.max {
            return Err(FieldError::InvalidAxisBounds {
                axis,
                min: self.min,
                max: self.max,
            });
        }
        Ok(())
    }

    /// Spacing between neighbouring samples, zero for a single-sample axis.
    pub fn step(&self) -> f64 {
        if self.count > 1 {
            (self.max - self.min) / (self.count - 1) as f64
        } else {
            0.0
        }
    }

    /// Value of sample `i`. The last sample lands exactly on `max`.
    pub fn value(&self, i: usize) -> f64 {
        if self.count > 1 && i + 1 == self.count {
            self.max
        } else {
            self.min + i as f64 * self.step()
        }
    }

    pub fn values(&self) -> Vec<f64> {
        (0..self.count).map(|i| self.value(i)).collect()
    }
}

/// Regular lattice of sample points. Points enumerate x-major, z fastest.
#[derive(Clone, Debug, PartialEq)]
pub struct SampleGrid {
    x: AxisRange,
    y: AxisRange,
    z: AxisRange,
}

impl SampleGrid {
    pub fn new(x: AxisRange, y: AxisRange, z: AxisRange) -> Result<Self> {
        x.validate('x')?;
        y.validate('y')?;
        z.validate('z')?;
        let total = x.count.checked_mul(y.count).and_then(|n| n.checked_mul(z.count));
        match total {
            Some(points) if points <= MAX_GRID_POINTS => Ok(Self { x, y, z }),
            _ => Err(FieldError::GridTooLarge {
                nx: x.count,
                ny: y.count,
                nz: z.count,
                max: MAX_GRID_POINTS,
            }),
        }
    }

    /// Same range on every axis.
    pub fn cube(min: f64, max: f64, count: usize) -> Result<Self> {
        let axis = AxisRange::new(min, max, count);
        Self::new(axis, axis, axis)
    }

    pub fn axes(&self) -> [AxisRange; 3] {
        [self.x, self.y, self.z]
    }

    pub fn dims(&self) -> (usize, usize, usize) {
        (self.x.count, self.y.count, self.z.count)
    }

    /// Bounded by `MAX_GRID_POINTS`, which `new` enforces.
    pub fn len(&self) -> usize {
        self.x.count * self.y.count * self.z.count
    }

    /// Always false for a validated grid; kept for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Flat index of lattice cell `(ix, iy, iz)`.
    #[inline]
    pub fn index(&self, ix: usize, iy: usize, iz: usize) -> usize {
        (ix * self.y.count + iy) * self.z.count + iz
    }

    /// Inverse of [`SampleGrid::index`].
    #[inline]
    pub fn cell(&self, index: usize) -> (usize, usize, usize) {
        let iz = index % self.z.count;
        let rest = index / self.z.count;
        (rest / self.y.count, rest % self.y.count, iz)
    }

    pub fn point(&self, index: usize) -> DVec3 {
        let (ix, iy, iz) = self.cell(index);
        DVec3::new(self.x.value(ix), self.y.value(iy), self.z.value(iz))
    }

    pub fn points(&self) -> Vec<DVec3> {
        let xs = self.x.values();
        let ys = self.y.values();
        let zs = self.z.values();
        let mut out = Vec::with_capacity(self.len());
        for &x in &xs {
            for &y in &ys {
                for &z in &zs {
                    out.push(DVec3::new(x, y, z));
                }
            }
        }
        out
    }
}
