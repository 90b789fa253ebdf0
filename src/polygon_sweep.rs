//! Tolerant polygon contiguity: x-bucket sweep over candidate pairs plus a
//! per-pair vertex/edge coincidence test under a precision threshold.
//!
//! Polygons are indexed twice on x (by left and right bbox edge) and once on
//! y (bucket spans). Sweeping the x buckets left to right, a polygon is
//! activated when its left edge enters and tested against the active set
//! when its right edge leaves, so every pair with overlapping x-extents is
//! considered exactly once.

use glam::DVec2;

use crate::adjacency::NeighborMap;
use crate::geometry::GeometrySource;
use crate::log_enabled;
use crate::partition::{BasePartition, PartitionM, EMPTY};

/// Max-norm coincidence under the precision threshold.
#[inline]
fn points_close(a: DVec2, b: DVec2, eps: f64) -> bool {
    (a.x - b.x).abs() <= eps && (a.y - b.y).abs() <= eps
}

/// One polygon's vertices with ring topology and an x-bucket index over its
/// own extent, built once per tested polygon.
struct PolygonPartition {
    points: Vec<DVec2>,
    succ: Vec<u32>,
    pred: Vec<u32>,
    min_x: f64,
    max_x: f64,
    buckets: Option<BasePartition>,
}

impl PolygonPartition {
    fn new<G: GeometrySource>(geoms: &G, i: usize) -> Self {
        let n = geoms.num_points(i);
        let mut points = Vec::with_capacity(n);
        let mut succ = Vec::with_capacity(n);
        let mut pred = Vec::with_capacity(n);
        let mut min_x = f64::MAX;
        let mut max_x = -f64::MAX;
        for j in 0..geoms.num_parts(i) {
            let len = geoms.ring_len(i, j);
            let base = points.len() as u32;
            for k in 0..len {
                let p = geoms.ring_point(i, j, k);
                min_x = min_x.min(p.x);
                max_x = max_x.max(p.x);
                points.push(p);
                succ.push(base + ((k + 1) % len) as u32);
                pred.push(base + ((k + len - 1) % len) as u32);
            }
        }
        if points.is_empty() {
            min_x = 0.0;
            max_x = 0.0;
        }
        Self {
            points,
            succ,
            pred,
            min_x,
            max_x,
            buckets: None,
        }
    }

    /// Bucket own vertices on x. Only the host side of a pair needs this.
    fn make_partition(&mut self) {
        let n = self.points.len();
        let mut buckets = BasePartition::new(n, n / 4 + 2, self.max_x - self.min_x);
        for (k, p) in self.points.iter().enumerate() {
            buckets.include(k as u32, p.x - self.min_x);
        }
        self.buckets = Some(buckets);
    }

    /// Shared-edge test: a ring neighbor of the matched host vertex must
    /// coincide with a ring neighbor of the matched guest vertex, in either
    /// orientation.
    fn shared_edge(&self, host: u32, guest: &PolygonPartition, dot: u32, eps: f64) -> bool {
        let host_succ = self.points[self.succ[host as usize] as usize];
        let host_pred = self.points[self.pred[host as usize] as usize];
        let guest_succ = guest.points[guest.succ[dot as usize] as usize];
        let guest_pred = guest.points[guest.pred[dot as usize] as usize];
        points_close(host_succ, guest_pred, eps)
            || points_close(host_succ, guest_succ, eps)
            || points_close(host_pred, guest_succ, eps)
            || points_close(host_pred, guest_pred, eps)
    }

    /// Decide contiguity against `guest` under `eps`.
    ///
    /// Each guest vertex inside the host's x-extent probes the host bucket
    /// it falls in plus both neighbors, so coincidence across a bucket
    /// boundary is not missed. Queen accepts on the first coincident vertex
    /// pair; rook additionally requires a coincident ring neighbor.
    fn sweep(&self, guest: &PolygonPartition, is_queen: bool, eps: f64) -> bool {
        let buckets = match &self.buckets {
            Some(b) => b,
            None => return false,
        };
        let cells = buckets.cells();
        for (dot, gp) in guest.points.iter().enumerate() {
            if gp.x < self.min_x - eps || gp.x > self.max_x + eps {
                continue;
            }
            let cell = buckets.bucket_of(gp.x - self.min_x);
            let lo = cell.saturating_sub(1);
            let hi = (cell + 1).min(cells - 1);
            for probe in lo..=hi {
                let mut host = buckets.first(probe);
                while host != EMPTY {
                    if points_close(self.points[host as usize], *gp, eps) {
                        if is_queen {
                            return true;
                        }
                        if self.shared_edge(host, guest, dot as u32, eps) {
                            return true;
                        }
                    }
                    host = buckets.tail(host);
                }
            }
        }
        false
    }
}

/// Build the neighbor sets for all polygons under a positive threshold.
pub(crate) fn threshold_contiguity<G: GeometrySource>(
    geoms: &G,
    is_queen: bool,
    eps: f64,
) -> NeighborMap {
    let n = geoms.len();
    let mut map = NeighborMap::new(n);
    if n == 0 {
        return map;
    }

    let mut global = geoms.bbox(0);
    for i in 1..n {
        let bb = geoms.bbox(i);
        global.expand(bb.min);
        global.expand(bb.max);
    }
    let x_len = global.max.x - global.min.x;
    let y_len = global.max.y - global.min.y;

    let gx = n / 8 + 2;
    let mut g_min_x = BasePartition::new(n, gx, x_len);
    let mut g_max_x = BasePartition::new(n, gx, x_len);
    for i in 0..n {
        let bb = geoms.bbox(i);
        g_min_x.include(i as u32, bb.min.x - global.min.x);
        g_max_x.include(i as u32, bb.max.x - global.min.x);
    }

    // Adapt the y bucket count until the total span weight is bounded by
    // 8N. The gy > 2 guard terminates the halving.
    let mut gy = (n as f64).sqrt() as usize + 2;
    let mut y_part = loop {
        let mut part = PartitionM::new(n, gy, y_len);
        for i in 0..n {
            let bb = geoms.bbox(i);
            part.init_span(i as u32, bb.min.y - global.min.y, bb.max.y - global.min.y);
        }
        let total = part.sum();
        if total <= 8 * n || gy <= 2 {
            break part;
        }
        gy = gy / 2 + 1;
        if log_enabled() {
            eprintln!("y partition too dense (sum={}), rebuilding with gy={}", total, gy);
        }
    };

    let mut candidates: Vec<u32> = Vec::new();
    for step in 0..gx {
        // activate polygons whose left edge enters this bucket
        let mut id = g_min_x.first(step);
        while id != EMPTY {
            y_part.include(id);
            id = g_min_x.tail(id);
        }

        // test polygons whose right edge leaves this bucket
        let mut curr = g_max_x.first(step);
        while curr != EMPTY {
            let mut host = PolygonPartition::new(geoms, curr as usize);
            host.make_partition();

            for cell in y_part.lowest(curr)..=y_part.upmost(curr) {
                let mut nbr = y_part.first(cell);
                while nbr != EMPTY {
                    if nbr != curr {
                        candidates.push(nbr);
                    }
                    nbr = y_part.tail(nbr, cell);
                }
            }

            let curr_bb = geoms.bbox(curr as usize);
            while let Some(nbr) = candidates.pop() {
                if !curr_bb.intersects(&geoms.bbox(nbr as usize)) {
                    continue;
                }
                let guest = PolygonPartition::new(geoms, nbr as usize);
                if host.sweep(&guest, is_queen, eps) {
                    map.link(curr, nbr);
                }
            }

            y_part.remove(curr);
            curr = g_max_x.tail(curr);
        }
    }
    map
}
