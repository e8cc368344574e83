//! Along-line translation bounds for parallel-only correspondence sets.

/// Closed range of along-line shifts, in millimeters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct ShiftRange {
    pub min: f32,
    pub max: f32,
}

impl ShiftRange {
    /// Unbounded range, identity for intersection.
    pub fn unbounded() -> Self {
        Self {
            min: f32::NEG_INFINITY,
            max: f32::INFINITY,
        }
    }

    /// Shifts keeping an observed segment inside a map segment's extent.
    ///
    /// `map_lo..map_hi` and `obs_lo..obs_hi` are projections onto the
    /// shared line direction.
    pub fn containing(map_lo: f32, map_hi: f32, obs_lo: f32, obs_hi: f32) -> Self {
        Self {
            min: map_lo - obs_lo,
            max: map_hi - obs_hi,
        }
    }

    /// Intersect with another range.
    pub fn intersect(&self, other: &ShiftRange) -> ShiftRange {
        ShiftRange {
            min: self.min.max(other.min),
            max: self.max.min(other.max),
        }
    }

    /// Collapse an empty range to its midpoint.
    ///
    /// Happens when an observed segment is longer than the map segment it
    /// matched; the midpoint is the least-bad single shift.
    pub fn normalized(self) -> ShiftRange {
        if self.min > self.max {
            let mid = 0.5 * (self.min + self.max);
            ShiftRange { min: mid, max: mid }
        } else {
            self
        }
    }
}
