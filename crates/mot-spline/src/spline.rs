//! The spline type and its evaluation routines.

use mot_core::Vec3;

/// Subdivision steps used to measure a span's arc length.
///
/// Transport spans are tens of world units long and gently curved; 64 linear
/// steps keep the measurement error well below the 100 ms node-timing
/// granularity of the motion controller.
const ARC_SAMPLES: usize = 64;

/// A Catmull-Rom spline over a padded control-point array, plus the
/// millisecond prefix table built by [`Spline::init_lengths`].
#[derive(Clone, Debug)]
pub struct Spline {
    /// Controls with the first and last repeated once.
    points: Vec<Vec3>,

    /// `lengths_ms[k]` = milliseconds from the curve start to knot `k`.
    /// Zero-filled until `init_lengths` runs.  Entries below `first()` are
    /// unused and stay 0.
    lengths_ms: Vec<i32>,
}

impl Spline {
    /// Build a spline through `controls`, padding both ends by repetition.
    ///
    /// # Panics
    /// Panics if fewer than 2 controls are supplied.  Producers validate
    /// their node lists before construction (the route compiler rejects such
    /// paths with `EmptyPath`).
    pub fn new(controls: &[Vec3]) -> Self {
        assert!(controls.len() >= 2, "spline needs at least 2 control points");

        let mut points = Vec::with_capacity(controls.len() + 2);
        points.push(controls[0]);
        points.extend_from_slice(controls);
        points.push(controls[controls.len() - 1]);

        let lengths_ms = vec![0; points.len()];
        Self { points, lengths_ms }
    }

    // ── Knot range ────────────────────────────────────────────────────────

    /// First interior knot index (the start of the curve).
    #[inline]
    pub fn first(&self) -> usize {
        1
    }

    /// Last interior knot index (the end of the curve).
    #[inline]
    pub fn last(&self) -> usize {
        self.points.len() - 2
    }

    /// Number of spans the curve consists of.
    #[inline]
    pub fn span_count(&self) -> usize {
        self.last() - self.first()
    }

    /// Position of knot `k`.  Valid for `first() ..= last()`.
    #[inline]
    pub fn knot(&self, k: usize) -> Vec3 {
        self.points[k]
    }

    // ── Evaluation ────────────────────────────────────────────────────────

    /// Position at fraction `u ∈ [0, 1]` of span `seg`.
    ///
    /// `seg` must satisfy `first() <= seg < last()`; `u` is clamped.
    pub fn evaluate_percent(&self, seg: usize, u: f32) -> Vec3 {
        let (p0, p1, p2, p3) = self.span_points(seg);
        catmull_rom(p0, p1, p2, p3, u.clamp(0.0, 1.0))
    }

    /// Unnormalised tangent at fraction `u` of span `seg`.
    ///
    /// Consumers derive yaw as `atan2(t.y, t.x)`.
    pub fn evaluate_derivative(&self, seg: usize, u: f32) -> Vec3 {
        let (p0, p1, p2, p3) = self.span_points(seg);
        catmull_rom_derivative(p0, p1, p2, p3, u.clamp(0.0, 1.0))
    }

    /// World-space arc length of span `seg`, measured by fine subdivision.
    pub fn segment_length(&self, seg: usize) -> f32 {
        let mut length = 0.0;
        let mut prev = self.evaluate_percent(seg, 0.0);
        for i in 1..=ARC_SAMPLES {
            let point = self.evaluate_percent(seg, i as f32 / ARC_SAMPLES as f32);
            length += prev.distance(point);
            prev = point;
        }
        length
    }

    /// Total world-space arc length of the curve.
    pub fn total_length(&self) -> f32 {
        (self.first()..self.last()).map(|seg| self.segment_length(seg)).sum()
    }

    // ── Timing table ──────────────────────────────────────────────────────

    /// Build the millisecond prefix table for a carrier moving at
    /// `move_speed` world units per second.
    ///
    /// # Panics
    /// Panics if `move_speed` is not strictly positive.
    pub fn init_lengths(&mut self, move_speed: f32) {
        assert!(move_speed > 0.0, "move_speed must be positive");

        let mut total_ms = 0i32;
        let first = self.first();
        self.lengths_ms[first] = 0;
        for seg in self.first()..self.last() {
            total_ms += (self.segment_length(seg) * 1000.0 / move_speed) as i32;
            self.lengths_ms[seg + 1] = total_ms;
        }
    }

    /// Milliseconds from the curve start to knot `k`.
    #[inline]
    pub fn length_ms(&self, k: usize) -> i32 {
        self.lengths_ms[k]
    }

    /// Milliseconds to traverse the whole curve.
    #[inline]
    pub fn total_length_ms(&self) -> i32 {
        self.lengths_ms[self.last()]
    }

    // ── Internals ─────────────────────────────────────────────────────────

    fn span_points(&self, seg: usize) -> (Vec3, Vec3, Vec3, Vec3) {
        debug_assert!(
            seg >= self.first() && seg < self.last(),
            "span {seg} outside {}..{}",
            self.first(),
            self.last()
        );
        (
            self.points[seg - 1],
            self.points[seg],
            self.points[seg + 1],
            self.points[seg + 2],
        )
    }
}

// ── Catmull-Rom basis ─────────────────────────────────────────────────────────

fn catmull_rom(p0: Vec3, p1: Vec3, p2: Vec3, p3: Vec3, t: f32) -> Vec3 {
    let t2 = t * t;
    let t3 = t2 * t;

    (p1 * 2.0
        + (p2 - p0) * t
        + (p0 * 2.0 - p1 * 5.0 + p2 * 4.0 - p3) * t2
        + (p1 * 3.0 - p0 - p2 * 3.0 + p3) * t3)
        * 0.5
}

fn catmull_rom_derivative(p0: Vec3, p1: Vec3, p2: Vec3, p3: Vec3, t: f32) -> Vec3 {
    let t2 = t * t;

    ((p2 - p0)
        + (p0 * 2.0 - p1 * 5.0 + p2 * 4.0 - p3) * (2.0 * t)
        + (p1 * 3.0 - p0 - p2 * 3.0 + p3) * (3.0 * t2))
        * 0.5
}
