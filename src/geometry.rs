//! Input geometry containers and the accessor seam consumed by the engines.

use glam::DVec2;

use crate::error::ContiguityError;

/// An axis-aligned bounding rectangle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub min: DVec2,
    pub max: DVec2,
}

impl Rect {
    #[inline]
    pub fn new(min: DVec2, max: DVec2) -> Self {
        Self { min, max }
    }

    /// Rectangle covering a single point.
    #[inline]
    pub fn at(p: DVec2) -> Self {
        Self { min: p, max: p }
    }

    /// Closed-interval overlap test on both axes.
    #[inline]
    pub fn intersects(&self, other: &Rect) -> bool {
        !(self.min.x > other.max.x
            || self.max.x < other.min.x
            || self.min.y > other.max.y
            || self.max.y < other.min.y)
    }

    /// Grow to cover `p`.
    #[inline]
    pub fn expand(&mut self, p: DVec2) {
        self.min = self.min.min(p);
        self.max = self.max.max(p);
    }
}

/// Read-only accessors over a collection of planar geometries.
///
/// The engines consume geometries exclusively through this trait, so callers
/// with their own storage can feed them without copying into a
/// [`GeometryCollection`]. Geometries are indexed `0..len()`; each geometry
/// is a sequence of rings (parts), each ring a sequence of points. A point
/// geometry is a single ring with one vertex.
///
/// Coordinates are assumed planar; whether they are projected or geographic
/// is opaque here. Callers wanting metric semantics should project first.
pub trait GeometrySource {
    /// Number of geometries.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of rings (parts) of geometry `i`.
    fn num_parts(&self, i: usize) -> usize;

    /// Number of points in ring `j` of geometry `i`.
    fn ring_len(&self, i: usize, j: usize) -> usize;

    /// Point `k` of ring `j` of geometry `i`.
    fn ring_point(&self, i: usize, j: usize, k: usize) -> DVec2;

    /// Total number of points of geometry `i`, across all rings.
    fn num_points(&self, i: usize) -> usize {
        (0..self.num_parts(i)).map(|j| self.ring_len(i, j)).sum()
    }

    /// Point `k` of geometry `i`, counting across rings in storage order.
    fn point(&self, i: usize, k: usize) -> DVec2 {
        let mut k = k;
        for j in 0..self.num_parts(i) {
            let len = self.ring_len(i, j);
            if k < len {
                return self.ring_point(i, j, k);
            }
            k -= len;
        }
        panic!("point index out of range");
    }

    /// Bounding box of geometry `i`. Empty geometries map to a zero rect.
    fn bbox(&self, i: usize) -> Rect {
        let n = self.num_points(i);
        if n == 0 {
            return Rect::at(DVec2::ZERO);
        }
        let mut bb = Rect::at(self.point(i, 0));
        for k in 1..n {
            bb.expand(self.point(i, k));
        }
        bb
    }

    /// Signed-area (shoelace) centroid of geometry `i`, accumulated over all
    /// rings. Zero-area geometries (point inputs, degenerate rings) fall
    /// back to the vertex mean; empty geometries map to the origin.
    fn centroid(&self, i: usize) -> DVec2 {
        let n = self.num_points(i);
        if n == 0 {
            return DVec2::ZERO;
        }
        let mut area = 0.0;
        let mut cx = 0.0;
        let mut cy = 0.0;
        for j in 0..self.num_parts(i) {
            let len = self.ring_len(i, j);
            for k in 0..len {
                let p = self.ring_point(i, j, k);
                let q = self.ring_point(i, j, (k + 1) % len);
                let cross = p.x * q.y - q.x * p.y;
                area += cross;
                cx += (p.x + q.x) * cross;
                cy += (p.y + q.y) * cross;
            }
        }
        if area.abs() > 1e-12 {
            DVec2::new(cx / (3.0 * area), cy / (3.0 * area))
        } else {
            let mut sum = DVec2::ZERO;
            for k in 0..n {
                sum += self.point(i, k);
            }
            sum / n as f64
        }
    }
}

/// The canonical geometry container: parallel coordinate arrays plus part
/// offsets, in shapefile-like layout.
///
/// `parts` holds the start offset of each ring into `x`/`y`; `sizes` holds
/// the number of rings per geometry. Rings of one geometry are stored
/// contiguously in insertion order. An empty geometry (size 0) still
/// occupies one `parts` slot and contributes zero points. `holes` flags
/// interior rings; the contiguity engines treat hole rings like any other
/// boundary.
#[derive(Debug, Clone)]
pub struct GeometryCollection {
    x: Vec<f64>,
    y: Vec<f64>,
    parts: Vec<u32>,
    sizes: Vec<u32>,
    holes: Vec<bool>,
    /// First `parts` slot per geometry.
    part_slot: Vec<u32>,
    /// First point index per geometry, length `len() + 1`.
    point_start: Vec<u32>,
    bboxes: Vec<Rect>,
}

impl GeometryCollection {
    /// Build a collection from raw parallel arrays, validating the layout.
    pub fn from_parts(
        x: Vec<f64>,
        y: Vec<f64>,
        parts: Vec<u32>,
        sizes: Vec<u32>,
        holes: Vec<bool>,
    ) -> Result<Self, ContiguityError> {
        if x.len() != y.len() {
            return Err(ContiguityError::MalformedGeometry(format!(
                "x has {} entries, y has {}",
                x.len(),
                y.len()
            )));
        }
        if holes.len() != parts.len() {
            return Err(ContiguityError::MalformedGeometry(format!(
                "holes has {} entries, parts has {}",
                holes.len(),
                parts.len()
            )));
        }
        let expected_slots: usize = sizes
            .iter()
            .map(|&s| if s == 0 { 1 } else { s as usize })
            .sum();
        if expected_slots != parts.len() {
            return Err(ContiguityError::MalformedGeometry(format!(
                "sizes imply {} part slots, parts has {}",
                expected_slots,
                parts.len()
            )));
        }
        let num_points = x.len() as u32;
        let mut prev = 0u32;
        for &p in &parts {
            if p < prev || p > num_points {
                return Err(ContiguityError::MalformedGeometry(format!(
                    "part offset {} out of order or past {} points",
                    p, num_points
                )));
            }
            prev = p;
        }
        Ok(Self::assemble(x, y, parts, sizes, holes))
    }

    /// One single-ring polygon per entry. Rings may be explicitly closed
    /// (first point repeated) or open; the engines treat both alike.
    pub fn from_rings(rings: &[Vec<DVec2>]) -> Self {
        let mut x = Vec::new();
        let mut y = Vec::new();
        let mut parts = Vec::with_capacity(rings.len());
        for ring in rings {
            parts.push(x.len() as u32);
            for p in ring {
                x.push(p.x);
                y.push(p.y);
            }
        }
        let sizes = vec![1u32; rings.len()];
        let holes = vec![false; rings.len()];
        Self::assemble(x, y, parts, sizes, holes)
    }

    /// One single-vertex geometry per point.
    pub fn from_points(points: &[DVec2]) -> Self {
        let x: Vec<f64> = points.iter().map(|p| p.x).collect();
        let y: Vec<f64> = points.iter().map(|p| p.y).collect();
        let parts: Vec<u32> = (0..points.len() as u32).collect();
        let sizes = vec![1u32; points.len()];
        let holes = vec![false; points.len()];
        Self::assemble(x, y, parts, sizes, holes)
    }

    fn assemble(
        x: Vec<f64>,
        y: Vec<f64>,
        parts: Vec<u32>,
        sizes: Vec<u32>,
        holes: Vec<bool>,
    ) -> Self {
        let num_points = x.len() as u32;
        let n = sizes.len();
        let mut part_slot = Vec::with_capacity(n);
        let mut point_start = Vec::with_capacity(n + 1);
        let mut slot = 0usize;
        for &sz in &sizes {
            part_slot.push(slot as u32);
            point_start.push(parts.get(slot).copied().unwrap_or(num_points));
            slot += if sz == 0 { 1 } else { sz as usize };
        }
        point_start.push(num_points);

        let mut bboxes = Vec::with_capacity(n);
        for i in 0..n {
            let start = point_start[i] as usize;
            let end = point_start[i + 1] as usize;
            if start == end {
                bboxes.push(Rect::at(DVec2::ZERO));
            } else {
                let mut bb = Rect::at(DVec2::new(x[start], y[start]));
                for k in start + 1..end {
                    bb.expand(DVec2::new(x[k], y[k]));
                }
                bboxes.push(bb);
            }
        }

        Self {
            x,
            y,
            parts,
            sizes,
            holes,
            part_slot,
            point_start,
            bboxes,
        }
    }

    /// Whether ring `j` of geometry `i` is flagged as a hole.
    #[inline]
    pub fn is_hole(&self, i: usize, j: usize) -> bool {
        self.holes[self.part_slot[i] as usize + j]
    }

    #[inline]
    fn ring_bounds(&self, i: usize, j: usize) -> (usize, usize) {
        debug_assert!(j < self.sizes[i] as usize);
        let slot = self.part_slot[i] as usize + j;
        let start = self.parts[slot] as usize;
        let end = if slot + 1 < self.parts.len() {
            self.parts[slot + 1] as usize
        } else {
            self.x.len()
        };
        (start, end)
    }
}

impl GeometrySource for GeometryCollection {
    #[inline]
    fn len(&self) -> usize {
        self.sizes.len()
    }

    #[inline]
    fn num_parts(&self, i: usize) -> usize {
        self.sizes[i] as usize
    }

    #[inline]
    fn ring_len(&self, i: usize, j: usize) -> usize {
        let (start, end) = self.ring_bounds(i, j);
        end - start
    }

    #[inline]
    fn ring_point(&self, i: usize, j: usize, k: usize) -> DVec2 {
        let (start, end) = self.ring_bounds(i, j);
        debug_assert!(start + k < end);
        DVec2::new(self.x[start + k], self.y[start + k])
    }

    #[inline]
    fn num_points(&self, i: usize) -> usize {
        (self.point_start[i + 1] - self.point_start[i]) as usize
    }

    #[inline]
    fn point(&self, i: usize, k: usize) -> DVec2 {
        let idx = self.point_start[i] as usize + k;
        debug_assert!(idx < self.point_start[i + 1] as usize);
        DVec2::new(self.x[idx], self.y[idx])
    }

    #[inline]
    fn bbox(&self, i: usize) -> Rect {
        self.bboxes[i]
    }
}
