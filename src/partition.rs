//! Bucketed spatial partitions driving the tolerant polygon sweep.
//!
//! `BasePartition` buckets items along one axis into head-linked chains;
//! `PartitionM` additionally keeps a bucket span per item and supports O(1)
//! activation/removal across the span, so the x-sweep can enumerate
//! candidate polygon pairs without quadratic scans.

/// Sentinel for "no item" in partition chains.
pub(crate) const EMPTY: u32 = u32::MAX;

/// Single-axis bucket index with one singly-linked chain per bucket.
#[derive(Debug)]
pub(crate) struct BasePartition {
    heads: Vec<u32>,
    next: Vec<u32>,
    axis_len: f64,
}

impl BasePartition {
    pub fn new(num_items: usize, num_buckets: usize, axis_len: f64) -> Self {
        debug_assert!(num_buckets > 0);
        Self {
            heads: vec![EMPTY; num_buckets],
            next: vec![EMPTY; num_items],
            axis_len,
        }
    }

    /// Bucket of a coordinate relative to the partition origin, clamped to
    /// the valid range. A zero-length axis maps everything to bucket 0.
    #[inline]
    pub fn bucket_of(&self, coord: f64) -> usize {
        if self.axis_len <= 0.0 {
            return 0;
        }
        let raw = (coord * self.heads.len() as f64 / self.axis_len).floor();
        (raw.max(0.0) as usize).min(self.heads.len() - 1)
    }

    /// Insert `id` at the head of its bucket's chain.
    pub fn include(&mut self, id: u32, coord: f64) {
        let bucket = self.bucket_of(coord);
        self.next[id as usize] = self.heads[bucket];
        self.heads[bucket] = id;
    }

    #[inline]
    pub fn cells(&self) -> usize {
        self.heads.len()
    }

    #[inline]
    pub fn first(&self, bucket: usize) -> u32 {
        self.heads[bucket]
    }

    #[inline]
    pub fn tail(&self, id: u32) -> u32 {
        self.next[id as usize]
    }
}

#[derive(Debug, Clone, Copy)]
struct Link {
    next: u32,
    prev: u32,
}

const UNLINKED: Link = Link {
    next: EMPTY,
    prev: EMPTY,
};

/// Multi-bucket partition: each item spans a contiguous range of buckets and
/// can be activated in (and removed from) every bucket of its span.
///
/// Chains are doubly linked per bucket so `remove` is O(span). `sum()`
/// reports the total span weight, which bounds the work of candidate
/// enumeration and drives the bucket-count adaptation in the sweep driver.
#[derive(Debug)]
pub(crate) struct PartitionM {
    heads: Vec<u32>,
    lowest: Vec<u32>,
    upmost: Vec<u32>,
    /// Per item, one link per bucket in its span.
    links: Vec<Vec<Link>>,
    axis_len: f64,
}

impl PartitionM {
    pub fn new(num_items: usize, num_buckets: usize, axis_len: f64) -> Self {
        debug_assert!(num_buckets > 0);
        Self {
            heads: vec![EMPTY; num_buckets],
            lowest: vec![0; num_items],
            upmost: vec![0; num_items],
            links: vec![Vec::new(); num_items],
            axis_len,
        }
    }

    #[inline]
    fn bucket_of(&self, coord: f64) -> usize {
        if self.axis_len <= 0.0 {
            return 0;
        }
        let raw = (coord * self.heads.len() as f64 / self.axis_len).floor();
        (raw.max(0.0) as usize).min(self.heads.len() - 1)
    }

    /// Record the bucket span `[lower, upper]` (axis coordinates) of `id`.
    pub fn init_span(&mut self, id: u32, lower: f64, upper: f64) {
        let lo = self.bucket_of(lower);
        let up = self.bucket_of(upper).max(lo);
        self.lowest[id as usize] = lo as u32;
        self.upmost[id as usize] = up as u32;
        self.links[id as usize] = vec![UNLINKED; up - lo + 1];
    }

    /// Activate `id` at the head of every bucket chain in its span.
    pub fn include(&mut self, id: u32) {
        let lo = self.lowest[id as usize] as usize;
        let up = self.upmost[id as usize] as usize;
        for bucket in lo..=up {
            let head = self.heads[bucket];
            self.links[id as usize][bucket - lo] = Link {
                next: head,
                prev: EMPTY,
            };
            if head != EMPTY {
                let head_lo = self.lowest[head as usize] as usize;
                self.links[head as usize][bucket - head_lo].prev = id;
            }
            self.heads[bucket] = id;
        }
    }

    /// Deactivate `id` from every bucket chain in its span.
    pub fn remove(&mut self, id: u32) {
        let lo = self.lowest[id as usize] as usize;
        let up = self.upmost[id as usize] as usize;
        for bucket in lo..=up {
            let link = self.links[id as usize][bucket - lo];
            if link.prev == EMPTY {
                if self.heads[bucket] == id {
                    self.heads[bucket] = link.next;
                }
            } else {
                let prev_lo = self.lowest[link.prev as usize] as usize;
                self.links[link.prev as usize][bucket - prev_lo].next = link.next;
            }
            if link.next != EMPTY {
                let next_lo = self.lowest[link.next as usize] as usize;
                self.links[link.next as usize][bucket - next_lo].prev = link.prev;
            }
            self.links[id as usize][bucket - lo] = UNLINKED;
        }
    }

    #[inline]
    pub fn lowest(&self, id: u32) -> usize {
        self.lowest[id as usize] as usize
    }

    #[inline]
    pub fn upmost(&self, id: u32) -> usize {
        self.upmost[id as usize] as usize
    }

    #[inline]
    pub fn first(&self, bucket: usize) -> u32 {
        self.heads[bucket]
    }

    /// Next active item after `id` in `bucket`'s chain.
    #[inline]
    pub fn tail(&self, id: u32, bucket: usize) -> u32 {
        let lo = self.lowest[id as usize] as usize;
        self.links[id as usize][bucket - lo].next
    }

    /// Total span weight: Σ (upmost − lowest + 1) over all items.
    pub fn sum(&self) -> usize {
        self.links.iter().map(|l| l.len()).sum()
    }
}
