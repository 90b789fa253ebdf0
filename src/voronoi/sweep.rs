//! The sweep itself: beach line, event queue, and the rightOf predicate.
//!
//! The beach line is a doubly-linked sequence of half-edges stored in an
//! index arena with a freelist threaded through the `right` link, bounded by
//! two sentinel half-edges. Circle events live in a 1-based binary heap of
//! arena indices keyed by `(y, vertex.x)`; each half-edge carries its heap
//! position so a pending event can be revoked in O(log n). Site events are
//! not queued: sites are pre-sorted by `(y, x)` and merged with the heap
//! front at every step.

use glam::DVec2;

use super::{point_less, Diagram, Edge, LEFT, NONE, RIGHT};

/// Determinant threshold below which two bisectors are treated as parallel.
const EDGE_INTERSECT_THRESHOLD: f64 = 1.0e-10;

#[derive(Debug, Clone, Copy)]
pub(super) struct HalfEdge {
    pub edge: u32,
    pub left: u32,
    pub right: u32,
    /// Pending circle-event vertex.
    pub vertex: DVec2,
    /// Sweep-line position at which the pending event fires.
    pub y: f64,
    /// Which site of the parent edge faces this half-edge.
    pub dir: usize,
    /// 1-based heap slot, 0 when not queued.
    pub pq_pos: u32,
}

impl HalfEdge {
    fn new(edge: u32, dir: usize) -> Self {
        Self {
            edge,
            left: NONE,
            right: NONE,
            vertex: DVec2::ZERO,
            y: 0.0,
            dir,
            pq_pos: 0,
        }
    }
}

pub(super) struct Sweep<'a> {
    d: &'a mut Diagram,
    he: Vec<HalfEdge>,
    free: u32,
    /// Binary heap of half-edge indices; slot 0 is unused.
    queue: Vec<u32>,
    start: u32,
    end: u32,
    last_inserted: u32,
    current_site: usize,
}

impl<'a> Sweep<'a> {
    pub fn new(diagram: &'a mut Diagram) -> Self {
        let mut sweep = Self {
            d: diagram,
            he: Vec::new(),
            free: NONE,
            queue: vec![NONE],
            start: 0,
            end: 0,
            last_inserted: NONE,
            current_site: 0,
        };
        let start = sweep.alloc_halfedge(NONE, LEFT);
        let end = sweep.alloc_halfedge(NONE, LEFT);
        sweep.he[start as usize].right = end;
        sweep.he[end as usize].left = start;
        sweep.start = start;
        sweep.end = end;
        sweep
    }

    /// Run the event loop and finish every edge still on the beach line.
    /// The lowest site seeds the beach and is never queued itself.
    pub fn run(&mut self) {
        self.current_site = 1;
        let mut site = self.next_site();
        loop {
            match site {
                Some(s) if self.site_precedes_queue(s) => {
                    self.site_event(s);
                    site = self.next_site();
                }
                _ if !self.pq_empty() => self.circle_event(),
                _ => break,
            }
        }

        let mut he = self.he[self.start as usize].right;
        while he != self.end {
            let e = self.he[he as usize].edge;
            self.d.finish_line(e);
            he = self.he[he as usize].right;
        }
    }

    fn next_site(&mut self) -> Option<u32> {
        if self.current_site < self.d.sites.len() {
            let s = self.current_site as u32;
            self.current_site += 1;
            Some(s)
        } else {
            None
        }
    }

    fn site_precedes_queue(&self, s: u32) -> bool {
        if self.pq_empty() {
            return true;
        }
        let top = &self.he[self.queue[1] as usize];
        point_less(
            self.d.sites[s as usize].p,
            DVec2::new(top.vertex.x, top.y),
        )
    }

    // ---- beach line ----

    fn alloc_halfedge(&mut self, edge: u32, dir: usize) -> u32 {
        if self.free != NONE {
            let idx = self.free;
            self.free = self.he[idx as usize].right;
            self.he[idx as usize] = HalfEdge::new(edge, dir);
            idx
        } else {
            self.he.push(HalfEdge::new(edge, dir));
            (self.he.len() - 1) as u32
        }
    }

    fn free_halfedge(&mut self, idx: u32) {
        self.he[idx as usize].right = self.free;
        self.free = idx;
    }

    fn link(&mut self, at: u32, new: u32) {
        let after = self.he[at as usize].right;
        self.he[new as usize].left = at;
        self.he[new as usize].right = after;
        self.he[after as usize].left = new;
        self.he[at as usize].right = new;
    }

    fn unlink(&mut self, idx: u32) {
        let l = self.he[idx as usize].left;
        let r = self.he[idx as usize].right;
        self.he[l as usize].right = r;
        self.he[r as usize].left = l;
        self.he[idx as usize].left = NONE;
        self.he[idx as usize].right = NONE;
    }

    /// Site of the parent edge facing this half-edge.
    #[inline]
    fn left_site(&self, he: u32) -> u32 {
        let h = &self.he[he as usize];
        self.d.edges[h.edge as usize].sites[h.dir]
    }

    /// Site on the far side, `None` for sentinels.
    #[inline]
    fn right_site(&self, he: u32) -> Option<u32> {
        let h = &self.he[he as usize];
        if h.edge == NONE {
            None
        } else {
            Some(self.d.edges[h.edge as usize].sites[1 - h.dir])
        }
    }

    /// Whether `p` lies right of the arc represented by `he`.
    ///
    /// Fast monotone comparisons against the bisector coefficients settle
    /// most probes; the remainder falls through to the quadratic comparison
    /// of distances to the top and bottom sites. No epsilon here: ties are
    /// resolved by the `(y, x)` pre-sort and the degeneracy handling in the
    /// event loop.
    fn right_of(&self, he: u32, p: DVec2) -> bool {
        let h = &self.he[he as usize];
        let e = &self.d.edges[h.edge as usize];
        let topsite = self.d.sites[e.sites[1] as usize].p;

        let right_of_site = p.x > topsite.x;
        if right_of_site && h.dir == LEFT {
            return true;
        }
        if !right_of_site && h.dir == RIGHT {
            return false;
        }

        let above;
        if e.a == 1.0 {
            let dyp = p.y - topsite.y;
            let dxp = p.x - topsite.x;
            let mut fast = false;
            let mut result;
            if (!right_of_site && e.b < 0.0) || (right_of_site && e.b >= 0.0) {
                result = dyp >= e.b * dxp;
                fast = result;
            } else {
                result = p.x + p.y * e.b > e.c;
                if e.b < 0.0 {
                    result = !result;
                }
                if !result {
                    fast = true;
                }
            }
            if !fast {
                let dxs = topsite.x - self.d.sites[e.sites[0] as usize].p.x;
                result = e.b * (dxp * dxp - dyp * dyp)
                    < dxs * dyp * (1.0 + 2.0 * dxp / dxs + e.b * e.b);
                if e.b < 0.0 {
                    result = !result;
                }
            }
            above = result;
        } else {
            let yl = e.c - e.a * p.x;
            let t1 = p.y - yl;
            let t2 = p.x - topsite.x;
            let t3 = yl - topsite.y;
            above = t1 * t1 > t2 * t2 + t3 * t3;
        }
        if h.dir == LEFT {
            above
        } else {
            !above
        }
    }

    /// Locate the arc above `p.x`, walking from the last touched half-edge.
    fn edge_above_x(&self, p: DVec2) -> u32 {
        let mut he = self.last_inserted;
        if he == NONE {
            he = if p.x < (self.d.max.x - self.d.min.x) / 2.0 {
                self.start
            } else {
                self.end
            };
        }

        if he == self.start || (he != self.end && self.right_of(he, p)) {
            he = self.he[he as usize].right;
            while he != self.end && self.right_of(he, p) {
                he = self.he[he as usize].right;
            }
            self.he[he as usize].left
        } else {
            he = self.he[he as usize].left;
            while he != self.start && !self.right_of(he, p) {
                he = self.he[he as usize].left;
            }
            he
        }
    }

    // ---- events ----

    /// Bisector intersection, rejected when the meet point cannot squeeze
    /// the arc between the half-edges.
    fn intersect(&self, he1: u32, he2: u32) -> Option<DVec2> {
        let e1 = &self.d.edges[self.he[he1 as usize].edge as usize];
        let e2 = &self.d.edges[self.he[he2 as usize].edge as usize];

        let d = e1.a * e2.b - e1.b * e2.a;
        if -EDGE_INTERSECT_THRESHOLD < d && d < EDGE_INTERSECT_THRESHOLD {
            return None;
        }
        let out = DVec2::new(
            (e1.c * e2.b - e1.b * e2.c) / d,
            (e1.a * e2.c - e1.c * e2.a) / d,
        );

        let p1 = self.d.sites[e1.sites[1] as usize].p;
        let p2 = self.d.sites[e2.sites[1] as usize].p;
        let (he, e) = if point_less(p1, p2) {
            (&self.he[he1 as usize], e1)
        } else {
            (&self.he[he2 as usize], e2)
        };

        let right_of_site = out.x >= self.d.sites[e.sites[1] as usize].p.x;
        if (right_of_site && he.dir == LEFT) || (!right_of_site && he.dir == RIGHT) {
            return None;
        }
        Some(out)
    }

    fn check_circle(&self, he1: u32, he2: u32) -> Option<DVec2> {
        let e1 = self.he[he1 as usize].edge;
        let e2 = self.he[he2 as usize].edge;
        if e1 == NONE || e2 == NONE {
            return None;
        }
        if self.d.edges[e1 as usize].sites[1] == self.d.edges[e2 as usize].sites[1] {
            return None;
        }
        self.intersect(he1, he2)
    }

    fn new_edge(&mut self, s1: u32, s2: u32) -> u32 {
        let e = Edge::between(&self.d.sites, s1, s2);
        self.d.edges.push(e);
        (self.d.edges.len() - 1) as u32
    }

    /// Split the arc above the new site with a pair of half-edges around the
    /// bisector to the arc's site, then re-check circle events on both sides.
    fn site_event(&mut self, s: u32) {
        let p = self.d.sites[s as usize].p;
        let left = self.edge_above_x(p);
        let right = self.he[left as usize].right;
        let bottom = self.right_site(left).unwrap_or(0);

        let e = self.new_edge(bottom, s);
        let he1 = self.alloc_halfedge(e, LEFT);
        let he2 = self.alloc_halfedge(e, RIGHT);
        self.link(left, he1);
        self.link(he1, he2);

        self.last_inserted = right;

        if let Some(v) = self.check_circle(left, he1) {
            self.pq_remove(left);
            self.he[left as usize].vertex = v;
            self.he[left as usize].y = v.y + p.distance(v);
            self.pq_push(left);
        }
        if let Some(v) = self.check_circle(he2, right) {
            self.he[he2 as usize].vertex = v;
            self.he[he2 as usize].y = v.y + p.distance(v);
            self.pq_push(he2);
        }
    }

    /// Collapse the arc squeezed at the event vertex: terminate both
    /// flanking edges there, replace them with a single edge between the
    /// outer sites, and re-check circle events with the new neighbors.
    fn circle_event(&mut self) {
        let left = self.pq_pop();

        let leftleft = self.he[left as usize].left;
        let right = self.he[left as usize].right;
        let rightright = self.he[right as usize].right;
        let mut bottom = self.left_site(left);
        let mut top = {
            let h = &self.he[right as usize];
            self.d.edges[h.edge as usize].sites[1 - h.dir]
        };

        let vertex = self.he[left as usize].vertex;
        let (le, ld) = {
            let h = &self.he[left as usize];
            (h.edge, h.dir)
        };
        self.d.end_pos(le, vertex, ld);
        let (re, rd) = {
            let h = &self.he[right as usize];
            (h.edge, h.dir)
        };
        self.d.end_pos(re, vertex, rd);

        self.last_inserted = rightright;

        self.pq_remove(right);
        self.unlink(left);
        self.unlink(right);
        self.free_halfedge(left);
        self.free_halfedge(right);

        let mut dir = LEFT;
        if self.d.sites[bottom as usize].p.y > self.d.sites[top as usize].p.y {
            std::mem::swap(&mut bottom, &mut top);
            dir = RIGHT;
        }

        let e = self.new_edge(bottom, top);
        let he = self.alloc_halfedge(e, dir);
        self.link(leftleft, he);
        self.d.end_pos(e, vertex, RIGHT - dir);

        let bp = self.d.sites[bottom as usize].p;
        if let Some(v) = self.check_circle(leftleft, he) {
            self.pq_remove(leftleft);
            self.he[leftleft as usize].vertex = v;
            self.he[leftleft as usize].y = v.y + bp.distance(v);
            self.pq_push(leftleft);
        }
        if let Some(v) = self.check_circle(he, rightright) {
            self.he[he as usize].vertex = v;
            self.he[he as usize].y = v.y + bp.distance(v);
            self.pq_push(he);
        }
    }

    // ---- event queue ----

    #[inline]
    fn pq_empty(&self) -> bool {
        self.queue.len() == 1
    }

    /// True when `a` fires after `b`.
    #[inline]
    fn pq_compare(&self, a: u32, b: u32) -> bool {
        let ha = &self.he[a as usize];
        let hb = &self.he[b as usize];
        if ha.y == hb.y {
            ha.vertex.x > hb.vertex.x
        } else {
            ha.y > hb.y
        }
    }

    fn pq_push(&mut self, node: u32) {
        self.queue.push(node);
        self.pq_move_up(self.queue.len() - 1);
    }

    fn pq_pop(&mut self) -> u32 {
        debug_assert!(!self.pq_empty());
        let node = self.queue[1];
        if let Some(last) = self.queue.pop() {
            if self.queue.len() > 1 {
                self.queue[1] = last;
                self.he[last as usize].pq_pos = 1;
                self.pq_move_down(1);
            }
        }
        self.he[node as usize].pq_pos = 0;
        node
    }

    /// Revoke a pending event; no-op when the node is not queued.
    fn pq_remove(&mut self, node: u32) {
        let pos = self.he[node as usize].pq_pos as usize;
        if pos == 0 {
            return;
        }
        if let Some(last) = self.queue.pop() {
            if pos < self.queue.len() {
                self.queue[pos] = last;
                self.he[last as usize].pq_pos = pos as u32;
                if self.pq_compare(node, last) {
                    self.pq_move_up(pos);
                } else {
                    self.pq_move_down(pos);
                }
            }
        }
        self.he[node as usize].pq_pos = 0;
    }

    fn pq_move_up(&mut self, mut pos: usize) {
        let node = self.queue[pos];
        while pos > 1 {
            let parent = pos >> 1;
            if !self.pq_compare(self.queue[parent], node) {
                break;
            }
            self.queue[pos] = self.queue[parent];
            self.he[self.queue[pos] as usize].pq_pos = pos as u32;
            pos = parent;
        }
        self.queue[pos] = node;
        self.he[node as usize].pq_pos = pos as u32;
    }

    fn pq_max_child(&self, pos: usize) -> usize {
        let child = pos << 1;
        if child >= self.queue.len() {
            return 0;
        }
        if child + 1 < self.queue.len() && self.pq_compare(self.queue[child], self.queue[child + 1])
        {
            child + 1
        } else {
            child
        }
    }

    fn pq_move_down(&mut self, mut pos: usize) {
        let node = self.queue[pos];
        loop {
            let child = self.pq_max_child(pos);
            if child == 0 || !self.pq_compare(node, self.queue[child]) {
                break;
            }
            self.queue[pos] = self.queue[child];
            self.he[self.queue[pos] as usize].pq_pos = pos as u32;
            pos = child;
        }
        self.queue[pos] = node;
        self.he[node as usize].pq_pos = pos as u32;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Rect;

    fn build(points: &[(f64, f64)]) -> Diagram {
        let pts: Vec<DVec2> = points.iter().map(|&(x, y)| DVec2::new(x, y)).collect();
        Diagram::build(
            &pts,
            Some(Rect::new(DVec2::new(-50.0, -50.0), DVec2::new(50.0, 50.0))),
        )
    }

    #[test]
    fn test_beachline_freelist_recycles() {
        // enough sites to trigger circle events and half-edge recycling
        let d = build(&[
            (0.0, 0.0),
            (10.0, 1.0),
            (5.0, 8.0),
            (-6.0, 4.0),
            (3.0, -7.0),
        ]);
        assert_eq!(d.sites.len(), 5);
        // every site ends up with a bounded cell
        for s in 0..d.sites.len() {
            assert!(d.sites[s].edges != NONE);
        }
    }

    #[test]
    fn test_interior_vertices_meet_at_circumcenter() {
        // three sites produce a single Voronoi vertex at their circumcenter;
        // clipping may recompute one coordinate per edge, so agreement is
        // checked within tolerance rather than bitwise
        let d = build(&[(0.0, 0.0), (10.0, 0.0), (5.0, 9.0)]);
        let mut interior: Vec<DVec2> = Vec::new();
        for s in 0..d.sites.len() {
            for ge in d.chain(s) {
                for p in ge.pos {
                    if p.x.abs() != 50.0 && p.y.abs() != 50.0 {
                        interior.push(p);
                    }
                }
            }
        }
        // the circumcenter appears once per incident graph edge
        assert_eq!(interior.len(), 6);
        let expected = DVec2::new(5.0, 28.0 / 9.0);
        for p in &interior {
            assert!((*p - expected).length() < 1e-9, "vertex {:?} off center", p);
        }
    }

    #[test]
    fn test_shared_edge_positions_match_across_cells() {
        // the two cells flanking one Voronoi edge store the same clipped
        // endpoints, bit-exactly
        let d = build(&[(0.0, 0.0), (10.0, 0.0), (5.0, 9.0)]);
        let mut keyed: std::collections::HashMap<[u64; 4], usize> = std::collections::HashMap::new();
        let mut pairs = 0;
        for s in 0..d.sites.len() {
            for ge in d.chain(s) {
                if ge.neighbor == NONE {
                    continue;
                }
                let (p, q) = (ge.pos[0], ge.pos[1]);
                let (a, b) = if (q.x, q.y) < (p.x, p.y) { (q, p) } else { (p, q) };
                let key = [a.x.to_bits(), a.y.to_bits(), b.x.to_bits(), b.y.to_bits()];
                let count = keyed.entry(key).or_insert(0);
                *count += 1;
                if *count == 2 {
                    pairs += 1;
                }
            }
        }
        // three bisector edges, each seen from both cells
        assert_eq!(pairs, 3);
    }

    #[test]
    fn test_event_order_is_deterministic() {
        let pts = [(2.0, 3.0), (-4.0, 1.0), (7.0, -2.0), (0.0, 6.0), (-3.0, -5.0)];
        let a = build(&pts);
        let b = build(&pts);
        assert_eq!(a.sites.len(), b.sites.len());
        assert_eq!(a.graph.len(), b.graph.len());
        for (x, y) in a.graph.iter().zip(b.graph.iter()) {
            assert_eq!(x.pos, y.pos);
        }
    }
}
