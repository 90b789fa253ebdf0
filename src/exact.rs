//! Exact hash adjacency for polygons at zero precision threshold.
//!
//! Queen contiguity hashes every boundary vertex; rook contiguity hashes
//! every ring edge with canonicalized endpoint order so rings wound in
//! opposite directions still produce the same key. Coordinates are compared
//! bit-exactly via `f64::to_bits`.

use glam::DVec2;
use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use crate::adjacency::NeighborMap;
use crate::geometry::GeometrySource;

type VertexKey = (u64, u64);
type EdgeKey = [u64; 4];

/// Polygon indices touching one hash bucket. Interior vertices of a clean
/// polygon cover touch at most a handful of polygons.
type Bucket = SmallVec<[u32; 4]>;

#[inline]
fn vertex_key(p: DVec2) -> VertexKey {
    (p.x.to_bits(), p.y.to_bits())
}

/// Lexicographically ordered endpoint pair, insensitive to ring direction.
#[inline]
fn edge_key(p: DVec2, q: DVec2) -> EdgeKey {
    let (a, b) = if (q.x, q.y) < (p.x, p.y) { (q, p) } else { (p, q) };
    [a.x.to_bits(), a.y.to_bits(), b.x.to_bits(), b.y.to_bits()]
}

#[inline]
fn push_once(bucket: &mut Bucket, id: u32) {
    if bucket.last() != Some(&id) {
        bucket.push(id);
    }
}

fn emit_pairs<K>(buckets: FxHashMap<K, Bucket>, map: &mut NeighborMap) {
    for bucket in buckets.into_values() {
        if bucket.len() < 2 {
            continue;
        }
        for a in 0..bucket.len() {
            for b in a + 1..bucket.len() {
                map.link(bucket[a], bucket[b]);
            }
        }
    }
}

/// Queen rule: two polygons are neighbors iff they share any vertex.
pub(crate) fn queen_vertex_hash<G: GeometrySource>(geoms: &G) -> NeighborMap {
    let mut buckets: FxHashMap<VertexKey, Bucket> = FxHashMap::default();
    for i in 0..geoms.len() {
        for k in 0..geoms.num_points(i) {
            let bucket = buckets.entry(vertex_key(geoms.point(i, k))).or_default();
            push_once(bucket, i as u32);
        }
    }
    let mut map = NeighborMap::new(geoms.len());
    emit_pairs(buckets, &mut map);
    map
}

/// Rook rule: two polygons are neighbors iff they share a ring edge.
///
/// Edges are walked per ring; the closing edge wraps within the ring, and
/// zero-length edges (explicitly closed rings) are skipped so polygons
/// touching at a single vertex do not register.
pub(crate) fn rook_edge_hash<G: GeometrySource>(geoms: &G) -> NeighborMap {
    let mut buckets: FxHashMap<EdgeKey, Bucket> = FxHashMap::default();
    for i in 0..geoms.len() {
        for j in 0..geoms.num_parts(i) {
            let len = geoms.ring_len(i, j);
            for k in 0..len {
                let p = geoms.ring_point(i, j, k);
                let q = geoms.ring_point(i, j, (k + 1) % len);
                if p == q {
                    continue;
                }
                let bucket = buckets.entry(edge_key(p, q)).or_default();
                push_once(bucket, i as u32);
            }
        }
    }
    let mut map = NeighborMap::new(geoms.len());
    emit_pairs(buckets, &mut map);
    map
}
