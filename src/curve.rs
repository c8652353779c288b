//! Fixed-capacity trailing curves.
//!
//! Every particle owns a [`CurveBuffer`] holding exactly `K` recent
//! positions, oldest first. Two update disciplines are supported and the
//! caller picks one per frame:
//!
//! | Mode | Method | Effect |
//! |------|--------|--------|
//! | Slide | [`CurveBuffer::slide`] | Drop the oldest point, append the current position |
//! | Reshape | [`CurveBuffer::reshape`] | Recompute the tapered vertex list the renderer draws |
//!
//! Neither mode allocates once the buffer exists: sliding rotates the ring
//! in place and reshaping overwrites the cached vertices.
//!
//! # Example
//!
//! ```ignore
//! let mut curve = CurveBuffer::filled(25, DVec3::ZERO);
//! curve.slide(DVec3::X);
//! curve.reshape(&Parabola::new(1.0));
//! assert_eq!(curve.vertices().len(), 25);
//! ```

use bytemuck::{Pod, Zeroable};
use glam::DVec3;
use std::collections::VecDeque;

/// Per-point weighting applied when reshaping a curve.
///
/// `t` is the normalized index along the curve, `0.0` at the oldest point
/// and `1.0` at the newest. Closures `Fn(f64) -> f64` implement this trait.
pub trait Taper {
    /// Width weight at normalized position `t`.
    fn weight(&self, t: f64) -> f64;
}

impl<F> Taper for F
where
    F: Fn(f64) -> f64,
{
    fn weight(&self, t: f64) -> f64 {
        self(t)
    }
}

/// `(4t(1 - t))^k`: thin at both ends, full width in the middle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Parabola {
    /// Exponent. `1.0` gives a plain parabola, larger values pinch the ends harder.
    pub k: f64,
}

impl Parabola {
    pub fn new(k: f64) -> Self {
        Self { k }
    }
}

impl Default for Parabola {
    fn default() -> Self {
        Self { k: 1.0 }
    }
}

impl Taper for Parabola {
    fn weight(&self, t: f64) -> f64 {
        (4.0 * t * (1.0 - t)).powf(self.k)
    }
}

/// Constant weight of 1 along the whole curve.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Uniform;

impl Taper for Uniform {
    fn weight(&self, _t: f64) -> f64 {
        1.0
    }
}

/// One vertex of a reshaped curve, laid out for direct GPU upload.
#[repr(C)]
#[derive(Debug, Copy, Clone, Default, PartialEq, Pod, Zeroable)]
pub struct CurveVertex {
    pub position: [f32; 3],
    /// Normalized distance along the curve (0 = oldest point).
    pub u: f32,
    /// Taper weight; the renderer multiplies this by the line width.
    pub weight: f32,
}

/// Exactly `K` ordered points trailing one particle.
#[derive(Debug, Clone)]
pub struct CurveBuffer {
    points: VecDeque<DVec3>,
    vertices: Vec<CurveVertex>,
    capacity: usize,
}

impl CurveBuffer {
    /// Create a buffer with `len` copies of `position`.
    ///
    /// # Panics
    ///
    /// Panics if `len` is zero. The particle system rejects such
    /// configurations before any buffer is built.
    pub fn filled(len: usize, position: DVec3) -> Self {
        assert!(len > 0, "curve buffer needs at least one point");
        let mut points = VecDeque::with_capacity(len);
        points.extend(std::iter::repeat(position).take(len));
        Self {
            points,
            vertices: Vec::with_capacity(len),
            capacity: len,
        }
    }

    /// Overwrite every point with `position` and drop the shaped vertices.
    ///
    /// Used when a particle slot is re-seeded; storage is kept.
    pub fn refill(&mut self, position: DVec3) {
        for p in self.points.iter_mut() {
            *p = position;
        }
        self.vertices.clear();
    }

    /// Number of points, always equal to [`CurveBuffer::capacity`].
    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Always false; a curve buffer is never empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// The fixed length `K` this buffer was built with.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Points in order, oldest first.
    pub fn points(&self) -> impl ExactSizeIterator<Item = &DVec3> + '_ {
        self.points.iter()
    }

    /// Oldest point.
    pub fn oldest(&self) -> Option<DVec3> {
        self.points.front().copied()
    }

    /// Most recently pushed point.
    pub fn newest(&self) -> Option<DVec3> {
        self.points.back().copied()
    }

    /// Vertices produced by the last [`CurveBuffer::reshape`].
    ///
    /// Empty until the first reshape after creation or refill.
    pub fn vertices(&self) -> &[CurveVertex] {
        &self.vertices
    }

    /// Drop the oldest point and append `position`, reusing its slot.
    ///
    /// # Panics
    ///
    /// Panics if the buffer holds fewer than `K` points. That state can only
    /// come from a construction bug and is not recoverable.
    pub fn slide(&mut self, position: DVec3) {
        assert_eq!(
            self.points.len(),
            self.capacity,
            "curve buffer underflow: slide on a partially filled buffer"
        );
        self.points.rotate_left(1);
        if let Some(newest) = self.points.back_mut() {
            *newest = position;
        }
    }

    /// Recompute the tapered vertex list from the current points.
    pub fn reshape(&mut self, taper: &dyn Taper) {
        let last = self.points.len().saturating_sub(1);
        self.vertices.clear();
        self.vertices
            .extend(self.points.iter().enumerate().map(|(i, p)| {
                let u = if last == 0 { 0.0 } else { i as f64 / last as f64 };
                CurveVertex {
                    position: p.as_vec3().to_array(),
                    u: u as f32,
                    weight: taper.weight(u) as f32,
                }
            }));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn numbered(len: usize) -> CurveBuffer {
        let mut curve = CurveBuffer::filled(len, DVec3::ZERO);
        for i in 0..len {
            curve.slide(DVec3::splat(i as f64));
        }
        curve
    }

    #[test]
    fn test_filled_holds_spawn_position() {
        let p = DVec3::new(1.0, -2.0, 3.0);
        let curve = CurveBuffer::filled(8, p);
        assert_eq!(curve.len(), 8);
        assert!(curve.points().all(|q| *q == p));
        assert!(curve.vertices().is_empty());
    }

    #[test]
    fn test_slide_drops_oldest() {
        let mut curve = numbered(4);
        curve.slide(DVec3::splat(9.0));

        let xs: Vec<f64> = curve.points().map(|p| p.x).collect();
        assert_eq!(xs, vec![1.0, 2.0, 3.0, 9.0]);
        assert_eq!(curve.len(), 4);
    }

    #[test]
    fn test_slide_does_not_grow_storage() {
        let mut curve = CurveBuffer::filled(16, DVec3::ZERO);
        for i in 0..1000 {
            curve.slide(DVec3::splat(i as f64));
        }
        assert_eq!(curve.len(), 16);
        assert_eq!(curve.newest(), Some(DVec3::splat(999.0)));
        assert_eq!(curve.oldest(), Some(DVec3::splat(984.0)));
    }

    #[test]
    #[should_panic(expected = "at least one point")]
    fn test_zero_length_rejected() {
        let _ = CurveBuffer::filled(0, DVec3::ZERO);
    }

    #[test]
    fn test_parabola_taper() {
        let taper = Parabola::new(1.0);
        assert_eq!(taper.weight(0.0), 0.0);
        assert_eq!(taper.weight(1.0), 0.0);
        assert!((taper.weight(0.5) - 1.0).abs() < 1e-12);
        assert!(Parabola::new(2.0).weight(0.25) < taper.weight(0.25));
    }

    #[test]
    fn test_reshape_weights_and_u() {
        let mut curve = numbered(5);
        curve.reshape(&Parabola::default());

        let v = curve.vertices();
        assert_eq!(v.len(), 5);
        assert_eq!(v[0].u, 0.0);
        assert_eq!(v[4].u, 1.0);
        assert_eq!(v[2].weight, 1.0);
        assert_eq!(v[0].weight, 0.0);
        assert_eq!(v[3].position, [3.0, 3.0, 3.0]);
    }

    #[test]
    fn test_reshape_single_point() {
        let mut curve = CurveBuffer::filled(1, DVec3::ONE);
        curve.reshape(&Uniform);
        assert_eq!(curve.vertices().len(), 1);
        assert_eq!(curve.vertices()[0].u, 0.0);
        assert_eq!(curve.vertices()[0].weight, 1.0);
    }

    #[test]
    fn test_reshape_is_deterministic() {
        let mut curve = numbered(6);
        curve.reshape(&Parabola::new(1.5));
        let first = curve.vertices().to_vec();
        curve.reshape(&Parabola::new(1.5));
        assert_eq!(curve.vertices(), first.as_slice());
    }

    #[test]
    fn test_closure_taper() {
        let mut curve = numbered(3);
        curve.reshape(&|t: f64| 1.0 - t);
        let w: Vec<f32> = curve.vertices().iter().map(|v| v.weight).collect();
        assert_eq!(w, vec![1.0, 0.5, 0.0]);
    }

    #[test]
    fn test_refill_clears_vertices() {
        let mut curve = numbered(3);
        curve.reshape(&Uniform);
        curve.refill(DVec3::Y);
        assert!(curve.vertices().is_empty());
        assert!(curve.points().all(|p| *p == DVec3::Y));
    }
}
