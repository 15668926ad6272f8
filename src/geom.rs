//! Axis-aligned geometry for hit tests and contacts
//!
//! Entities are described the way the scene graph places them: a center
//! point plus a size. Y grows upward.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle stored as center + size
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub center: Vec2,
    pub size: Vec2,
}

impl Rect {
    pub fn new(center: Vec2, size: Vec2) -> Self {
        Self { center, size }
    }

    #[inline]
    pub fn half_size(&self) -> Vec2 {
        self.size * 0.5
    }

    #[inline]
    pub fn min(&self) -> Vec2 {
        self.center - self.half_size()
    }

    #[inline]
    pub fn max(&self) -> Vec2 {
        self.center + self.half_size()
    }

    /// Inclusive point containment
    pub fn contains(&self, point: Vec2) -> bool {
        let (min, max) = (self.min(), self.max());
        point.x >= min.x && point.x <= max.x && point.y >= min.y && point.y <= max.y
    }

    /// Strict overlap test (touching edges do not count)
    pub fn overlaps(&self, other: &Rect) -> bool {
        let delta = (self.center - other.center).abs();
        let reach = self.half_size() + other.half_size();
        delta.x < reach.x && delta.y < reach.y
    }

    /// Smallest rectangle covering both
    pub fn union(&self, other: &Rect) -> Rect {
        let min = self.min().min(other.min());
        let max = self.max().max(other.max());
        Rect::new((min + max) * 0.5, max - min)
    }
}

/// Clamp `value` into `[lo, hi]`.
///
/// Unlike `f32::clamp` this never panics: when the range is empty (an
/// entity wider than the scene) the midpoint of the bounds is returned.
#[inline]
pub fn clamp_to_range(value: f32, lo: f32, hi: f32) -> f32 {
    if lo > hi {
        return (lo + hi) * 0.5;
    }
    if value.is_nan() {
        return lo;
    }
    value.max(lo).min(hi)
}
