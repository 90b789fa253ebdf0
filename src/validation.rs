//! Structural validation and summary statistics for adjacency output.
//!
//! Checks the invariants every contiguity result must satisfy: symmetry,
//! irreflexivity, uniqueness, and index bounds. The report also carries the
//! usual weights summary (neighbor count distribution, sparsity). Useful for
//! debugging, testing, and sanity-checking externally produced weights.

use rustc_hash::FxHashSet;

/// Detailed validation report for an adjacency structure.
#[derive(Debug, Clone)]
pub struct AdjacencyReport {
    /// Number of geometries (rows).
    pub num_geoms: usize,
    /// Total directed neighbor entries.
    pub num_links: usize,
    /// Entries whose reverse entry is missing.
    pub asymmetric_entries: usize,
    /// Entries where a geometry lists itself.
    pub self_loops: usize,
    /// Entries repeated within one row.
    pub duplicate_entries: usize,
    /// Entries referring past the end of the collection.
    pub out_of_range: usize,
    /// Rows with no neighbors.
    pub isolated: usize,

    /// Smallest neighbor count.
    pub min_nbrs: usize,
    /// Largest neighbor count.
    pub max_nbrs: usize,
    /// Mean neighbor count.
    pub mean_nbrs: f64,
    /// Median neighbor count.
    pub median_nbrs: f64,
    /// Fraction of possible directed links present: links / n².
    pub sparsity: f64,
}

impl AdjacencyReport {
    /// All structural invariants hold. Isolated rows are legal.
    pub fn is_valid(&self) -> bool {
        self.asymmetric_entries == 0
            && self.self_loops == 0
            && self.duplicate_entries == 0
            && self.out_of_range == 0
    }

    /// Format a summary of any issues found.
    pub fn summary(&self) -> String {
        if self.is_valid() {
            return "valid".to_string();
        }
        let mut issues = Vec::new();
        if self.asymmetric_entries > 0 {
            issues.push(format!("{} asymmetric entries", self.asymmetric_entries));
        }
        if self.self_loops > 0 {
            issues.push(format!("{} self loops", self.self_loops));
        }
        if self.duplicate_entries > 0 {
            issues.push(format!("{} duplicate entries", self.duplicate_entries));
        }
        if self.out_of_range > 0 {
            issues.push(format!("{} out-of-range entries", self.out_of_range));
        }
        issues.join(", ")
    }
}

impl std::fmt::Display for AdjacencyReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "AdjacencyReport {{ n={}, links={}, nbrs {}..{} (mean {:.2}), {} }}",
            self.num_geoms,
            self.num_links,
            self.min_nbrs,
            self.max_nbrs,
            self.mean_nbrs,
            self.summary()
        )
    }
}

/// Validate an adjacency structure and collect its summary statistics.
pub fn validate(adjacency: &[Vec<u32>]) -> AdjacencyReport {
    let n = adjacency.len();
    let mut num_links = 0usize;
    let mut self_loops = 0usize;
    let mut duplicate_entries = 0usize;
    let mut out_of_range = 0usize;
    let mut isolated = 0usize;

    let mut links: FxHashSet<(u32, u32)> = FxHashSet::default();
    let mut degrees: Vec<usize> = Vec::with_capacity(n);
    for (i, row) in adjacency.iter().enumerate() {
        if row.is_empty() {
            isolated += 1;
        }
        num_links += row.len();
        degrees.push(row.len());
        let mut seen: FxHashSet<u32> = FxHashSet::default();
        for &j in row {
            if j as usize == i {
                self_loops += 1;
            }
            if j as usize >= n {
                out_of_range += 1;
            }
            if !seen.insert(j) {
                duplicate_entries += 1;
            }
            links.insert((i as u32, j));
        }
    }

    let mut asymmetric_entries = 0usize;
    for &(i, j) in &links {
        if !links.contains(&(j, i)) {
            asymmetric_entries += 1;
        }
    }

    degrees.sort_unstable();
    let (min_nbrs, max_nbrs) = match (degrees.first(), degrees.last()) {
        (Some(&lo), Some(&hi)) => (lo, hi),
        _ => (0, 0),
    };
    let mean_nbrs = if n > 0 { num_links as f64 / n as f64 } else { 0.0 };
    let median_nbrs = match n {
        0 => 0.0,
        _ if n % 2 == 1 => degrees[n / 2] as f64,
        _ => (degrees[n / 2 - 1] + degrees[n / 2]) as f64 / 2.0,
    };
    let sparsity = if n > 0 {
        num_links as f64 / (n as f64 * n as f64)
    } else {
        0.0
    };

    AdjacencyReport {
        num_geoms: n,
        num_links,
        asymmetric_entries,
        self_loops,
        duplicate_entries,
        out_of_range,
        isolated,
        min_nbrs,
        max_nbrs,
        mean_nbrs,
        median_nbrs,
        sparsity,
    }
}

/// Whether the contiguity graph is a single connected component.
///
/// Breadth-first traversal from node 0; an empty graph is trivially
/// connected. Out-of-range entries are ignored here; run [`validate`] first
/// when the input is untrusted.
pub fn is_connected(adjacency: &[Vec<u32>]) -> bool {
    let n = adjacency.len();
    if n == 0 {
        return true;
    }
    let mut visited = vec![false; n];
    visited[0] = true;
    let mut frontier = vec![0usize];
    let mut count = 1usize;
    while let Some(i) = frontier.pop() {
        for &j in &adjacency[i] {
            let j = j as usize;
            if j < n && !visited[j] {
                visited[j] = true;
                count += 1;
                frontier.push(j);
            }
        }
    }
    count == n
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_adjacency() {
        let adj = vec![vec![1], vec![0, 2], vec![1], vec![]];
        let report = validate(&adj);
        assert!(report.is_valid());
        assert_eq!(report.num_geoms, 4);
        assert_eq!(report.num_links, 4);
        assert_eq!(report.isolated, 1);
        assert_eq!(report.min_nbrs, 0);
        assert_eq!(report.max_nbrs, 2);
        assert_eq!(report.mean_nbrs, 1.0);
        assert_eq!(report.median_nbrs, 1.0);
        assert_eq!(report.sparsity, 4.0 / 16.0);
    }

    #[test]
    fn test_detects_asymmetry() {
        let adj = vec![vec![1], vec![]];
        let report = validate(&adj);
        assert!(!report.is_valid());
        assert_eq!(report.asymmetric_entries, 1);
    }

    #[test]
    fn test_detects_self_loop_and_duplicates() {
        let adj = vec![vec![0, 1, 1], vec![0]];
        let report = validate(&adj);
        assert_eq!(report.self_loops, 1);
        assert_eq!(report.duplicate_entries, 1);
        assert!(!report.is_valid());
    }

    #[test]
    fn test_detects_out_of_range() {
        let adj = vec![vec![5]];
        let report = validate(&adj);
        assert_eq!(report.out_of_range, 1);
        assert!(!report.is_valid());
    }

    #[test]
    fn test_connectivity() {
        let chain = vec![vec![1], vec![0, 2], vec![1]];
        assert!(is_connected(&chain));

        let split = vec![vec![1], vec![0], vec![3], vec![2]];
        assert!(!is_connected(&split));

        let empty: Vec<Vec<u32>> = Vec::new();
        assert!(is_connected(&empty));

        let singleton = vec![Vec::<u32>::new()];
        assert!(is_connected(&singleton));
    }
}
