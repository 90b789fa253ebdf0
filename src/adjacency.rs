//! Neighbor-set accumulation shared by all engines.

use rustc_hash::FxHashSet;

/// Symmetric neighbor sets under construction.
///
/// Engines insert pairs as they find them; duplicates collapse in the sets.
/// The final export sorts each row ascending.
#[derive(Debug)]
pub(crate) struct NeighborMap {
    sets: Vec<FxHashSet<u32>>,
}

impl NeighborMap {
    pub fn new(n: usize) -> Self {
        Self {
            sets: vec![FxHashSet::default(); n],
        }
    }

    /// Record `i` and `j` as mutual neighbors. Self-pairs are ignored.
    #[inline]
    pub fn link(&mut self, i: u32, j: u32) {
        if i == j {
            return;
        }
        self.sets[i as usize].insert(j);
        self.sets[j as usize].insert(i);
    }

    /// Export as ascending neighbor lists.
    pub fn into_lists(self) -> Vec<Vec<u32>> {
        self.sets
            .into_iter()
            .map(|set| {
                let mut row: Vec<u32> = set.into_iter().collect();
                row.sort_unstable();
                row
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_link_is_symmetric_and_deduped() {
        let mut map = NeighborMap::new(3);
        map.link(0, 2);
        map.link(2, 0);
        map.link(0, 2);
        map.link(1, 1);
        let lists = map.into_lists();
        assert_eq!(lists, vec![vec![2], vec![], vec![0]]);
    }
}
