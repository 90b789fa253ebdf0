//! Higher-order contiguity via layered breadth expansion.

use rustc_hash::FxHashSet;

/// Expand a first-order graph to order `k`, cumulative or frontier-only.
///
/// `layer[d]` holds the nodes first reached at BFS depth `d`, where a node
/// is admitted to a layer unless it already sits in the two preceding
/// layers. Subtracting only `layer[d-1] ∪ layer[d-2]` (rather than every
/// earlier layer) is the frontier definition used in the
/// spatial-econometrics tradition; the layers still come out pairwise
/// disjoint because re-admission would require an earlier double
/// membership. Output rows are sorted descending.
pub(crate) fn expand(w1: &[Vec<u32>], order: usize, cumulative: bool) -> Vec<Vec<u32>> {
    debug_assert!(order >= 1);
    if order <= 1 {
        return w1.to_vec();
    }
    let n = w1.len();
    let mut out = Vec::with_capacity(n);
    for i in 0..n {
        let mut layers: Vec<FxHashSet<u32>> = vec![FxHashSet::default(); order + 1];
        layers[0].insert(i as u32);
        layers[1].extend(w1[i].iter().copied());
        for d in 2..=order {
            let mut frontier = FxHashSet::default();
            for &u in &layers[d - 1] {
                for &nbr in &w1[u as usize] {
                    if !layers[d - 1].contains(&nbr) && !layers[d - 2].contains(&nbr) {
                        frontier.insert(nbr);
                    }
                }
            }
            layers[d] = frontier;
        }
        let start = if cumulative { 1 } else { order };
        let mut row: Vec<u32> = layers[start..=order].iter().flatten().copied().collect();
        row.sort_unstable_by(|a, b| b.cmp(a));
        out.push(row);
    }
    out
}
