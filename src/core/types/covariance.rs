//! Covariance and precision matrix types.

use serde::{Deserialize, Serialize};

/// 3x3 pose covariance over (x, y, theta).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PoseCovariance {
    /// Row-major 3x3 matrix data
    data: [f32; 9],
}

impl PoseCovariance {
    /// Create a zero covariance matrix.
    #[inline]
    pub fn zero() -> Self {
        Self { data: [0.0; 9] }
    }

    /// Create a diagonal covariance matrix.
    ///
    /// Parameters are variances: xx = σ²_x, yy = σ²_y, tt = σ²_θ.
    #[inline]
    pub fn diagonal(xx: f32, yy: f32, tt: f32) -> Self {
        Self {
            data: [xx, 0.0, 0.0, 0.0, yy, 0.0, 0.0, 0.0, tt],
        }
    }

    /// Create from row-major array.
    #[inline]
    pub fn from_array(data: [f32; 9]) -> Self {
        Self { data }
    }

    /// Element at (row, col).
    #[inline]
    pub fn at(&self, row: usize, col: usize) -> f32 {
        self.data[row * 3 + col]
    }

    /// Propagate through a 2x3 Jacobian: returns `J Σ Jᵀ`.
    ///
    /// The result is symmetric by construction; used to express pose
    /// uncertainty in a 2D measurement space.
    pub fn propagate(&self, j: &[[f32; 3]; 2]) -> SymMatrix2 {
        // tmp = J Σ (2x3)
        let mut tmp = [[0.0f32; 3]; 2];
        for (r, row) in j.iter().enumerate() {
            for c in 0..3 {
                tmp[r][c] =
                    row[0] * self.at(0, c) + row[1] * self.at(1, c) + row[2] * self.at(2, c);
            }
        }
        SymMatrix2 {
            xx: tmp[0][0] * j[0][0] + tmp[0][1] * j[0][1] + tmp[0][2] * j[0][2],
            xy: tmp[0][0] * j[1][0] + tmp[0][1] * j[1][1] + tmp[0][2] * j[1][2],
            yy: tmp[1][0] * j[1][0] + tmp[1][1] * j[1][1] + tmp[1][2] * j[1][2],
        }
    }
}

impl Default for PoseCovariance {
    fn default() -> Self {
        Self::zero()
    }
}

/// Symmetric 2x2 matrix.
///
/// Used both for measurement covariance in spherical-coordinate space and
/// for its inverse (the precision matrix injected by configuration).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SymMatrix2 {
    /// Element (0, 0)
    pub xx: f32,
    /// Element (0, 1) = (1, 0)
    pub xy: f32,
    /// Element (1, 1)
    pub yy: f32,
}

impl SymMatrix2 {
    /// Create a diagonal matrix.
    #[inline]
    pub fn diagonal(xx: f32, yy: f32) -> Self {
        Self { xx, xy: 0.0, yy }
    }

    /// Determinant.
    #[inline]
    pub fn det(&self) -> f32 {
        self.xx * self.yy - self.xy * self.xy
    }

    /// Inverse, or `None` if the matrix is (near-)singular.
    pub fn inverse(&self) -> Option<SymMatrix2> {
        let det = self.det();
        if det.abs() < 1e-12 {
            return None;
        }
        let inv_det = 1.0 / det;
        Some(SymMatrix2 {
            xx: self.yy * inv_det,
            xy: -self.xy * inv_det,
            yy: self.xx * inv_det,
        })
    }

    /// Sum with another symmetric matrix.
    #[inline]
    pub fn add(&self, other: &SymMatrix2) -> SymMatrix2 {
        SymMatrix2 {
            xx: self.xx + other.xx,
            xy: self.xy + other.xy,
            yy: self.yy + other.yy,
        }
    }

    /// Quadratic form `dᵀ M d` for `d = (dx, dy)`.
    #[inline]
    pub fn quadratic_form(&self, dx: f32, dy: f32) -> f32 {
        self.xx * dx * dx + 2.0 * self.xy * dx * dy + self.yy * dy * dy
    }
}
