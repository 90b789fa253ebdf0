#![allow(dead_code)]

use glam::DVec2;
use planar_contiguity::GeometryCollection;
use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Closed square ring with side `s` and lower-left corner `(x0, y0)`.
pub fn square(x0: f64, y0: f64, s: f64) -> Vec<DVec2> {
    vec![
        DVec2::new(x0, y0),
        DVec2::new(x0 + s, y0),
        DVec2::new(x0 + s, y0 + s),
        DVec2::new(x0, y0 + s),
        DVec2::new(x0, y0),
    ]
}

/// A rows × cols tiling of unit squares, row-major.
pub fn square_grid(rows: usize, cols: usize) -> GeometryCollection {
    let mut rings = Vec::with_capacity(rows * cols);
    for row in 0..rows {
        for col in 0..cols {
            rings.push(square(col as f64, row as f64, 1.0));
        }
    }
    GeometryCollection::from_rings(&rings)
}

/// A random subset of a grid tiling, keeping each square with probability
/// `keep`. Always keeps at least one square.
pub fn sparse_grid(rows: usize, cols: usize, keep: f64, seed: u64) -> GeometryCollection {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut rings = Vec::new();
    for row in 0..rows {
        for col in 0..cols {
            if rng.gen::<f64>() < keep {
                rings.push(square(col as f64, row as f64, 1.0));
            }
        }
    }
    if rings.is_empty() {
        rings.push(square(0.0, 0.0, 1.0));
    }
    GeometryCollection::from_rings(&rings)
}

/// Expected grid adjacency for a full rows × cols tiling: queen joins all
/// squares within Chebyshev distance 1, rook within Manhattan distance 1.
pub fn grid_expected(rows: usize, cols: usize, queen: bool) -> Vec<Vec<u32>> {
    let mut out = Vec::with_capacity(rows * cols);
    for row in 0..rows as i64 {
        for col in 0..cols as i64 {
            let mut nbrs = Vec::new();
            for r in row - 1..=row + 1 {
                for c in col - 1..=col + 1 {
                    if r < 0 || r >= rows as i64 || c < 0 || c >= cols as i64 {
                        continue;
                    }
                    if r == row && c == col {
                        continue;
                    }
                    if !queen && (r - row).abs() + (c - col).abs() > 1 {
                        continue;
                    }
                    nbrs.push((r * cols as i64 + c) as u32);
                }
            }
            nbrs.sort_unstable();
            out.push(nbrs);
        }
    }
    out
}

/// Random points in `[0, extent)²`.
pub fn random_points(n: usize, extent: f64, seed: u64) -> Vec<DVec2> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    (0..n)
        .map(|_| DVec2::new(rng.gen_range(0.0..extent), rng.gen_range(0.0..extent)))
        .collect()
}

/// Assert that `small` is a per-row subset of `big`.
pub fn assert_subset(small: &[Vec<u32>], big: &[Vec<u32>]) {
    assert_eq!(small.len(), big.len());
    for (i, row) in small.iter().enumerate() {
        for j in row {
            assert!(
                big[i].contains(j),
                "entry {} of row {} missing from superset",
                j,
                i
            );
        }
    }
}
