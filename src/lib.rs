//! Spatial contiguity weights for planar geometries.
//!
//! Given a collection of polygons or point sites, this crate derives the
//! sparse adjacency graph of spatial neighbors under queen (shared vertex)
//! or rook (shared edge) contiguity, optionally expanded to higher orders.
//!
//! Polygons are matched either bit-exactly through vertex/edge hashing
//! (`precision_threshold == 0`) or under a tolerance through a bucketed
//! x-sweep over candidate pairs. Point sites are routed through a clipped
//! Voronoi diagram (Fortune's sweep) and adjacency is read off shared cell
//! boundaries.
//!
//! # Example
//!
//! ```
//! use glam::DVec2;
//! use planar_contiguity::{polygon_contiguity, ContiguityParams, GeometryCollection};
//!
//! // two unit squares sharing an edge
//! let squares = GeometryCollection::from_rings(&[
//!     vec![
//!         DVec2::new(0.0, 0.0),
//!         DVec2::new(1.0, 0.0),
//!         DVec2::new(1.0, 1.0),
//!         DVec2::new(0.0, 1.0),
//!         DVec2::new(0.0, 0.0),
//!     ],
//!     vec![
//!         DVec2::new(1.0, 0.0),
//!         DVec2::new(2.0, 0.0),
//!         DVec2::new(2.0, 1.0),
//!         DVec2::new(1.0, 1.0),
//!         DVec2::new(1.0, 0.0),
//!     ],
//! ]);
//!
//! let adjacency = polygon_contiguity(&squares, &ContiguityParams::default())
//!     .expect("valid parameters");
//! assert_eq!(adjacency, vec![vec![1], vec![0]]);
//! ```

mod adjacency;
mod error;
mod exact;
mod geometry;
mod higher_order;
pub mod validation;

// Internal engines
pub(crate) mod partition;
pub(crate) mod polygon_sweep;
pub(crate) mod voronoi;

use std::sync::OnceLock;

use glam::DVec2;

use adjacency::NeighborMap;

pub use error::ContiguityError;
pub use geometry::{GeometryCollection, GeometrySource, Rect};
pub use glam;

/// Adjacency output: one ascending neighbor list per geometry (descending
/// after a higher-order pass). An empty row is an isolated geometry.
pub type Adjacency = Vec<Vec<u32>>;

pub(crate) fn log_enabled() -> bool {
    static ENABLED: OnceLock<bool> = OnceLock::new();
    *ENABLED.get_or_init(|| {
        std::env::var("CONTIG_LOG")
            .ok()
            .map_or(false, |v| v == "1" || v.eq_ignore_ascii_case("true"))
    })
}

/// Contiguity rule: queen admits any shared vertex, rook requires a shared
/// edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    Queen,
    Rook,
}

impl Rule {
    #[inline]
    pub fn is_queen(self) -> bool {
        matches!(self, Rule::Queen)
    }
}

/// Parameters shared by both contiguity routes.
#[derive(Debug, Clone)]
pub struct ContiguityParams {
    /// Queen or rook neighbor rule.
    pub rule: Rule,
    /// Vertex coincidence tolerance for the polygon route. Zero selects the
    /// exact hash engine; positive values select the partition sweep. The
    /// point route accepts and ignores it.
    pub precision_threshold: f64,
    /// Contiguity order; 1 disables the higher-order pass.
    pub order: usize,
    /// With `order > 1`, include all layers `1..=order` instead of only the
    /// frontier.
    pub cumulative: bool,
}

impl Default for ContiguityParams {
    fn default() -> Self {
        Self {
            rule: Rule::Queen,
            precision_threshold: 0.0,
            order: 1,
            cumulative: false,
        }
    }
}

impl ContiguityParams {
    fn validate(&self) -> Result<(), ContiguityError> {
        if self.order < 1 {
            return Err(ContiguityError::InvalidOrder(self.order));
        }
        if self.precision_threshold < 0.0 {
            return Err(ContiguityError::NegativeThreshold(self.precision_threshold));
        }
        Ok(())
    }
}

/// Contiguity weights for a polygon collection.
///
/// With a zero threshold, two polygons are neighbors when they share a
/// vertex (queen) or an edge (rook) bit-exactly; with a positive threshold
/// the same relations hold up to max-norm tolerance. Returns one neighbor
/// row per geometry; empty input yields an empty result.
pub fn polygon_contiguity<G: GeometrySource>(
    geoms: &G,
    params: &ContiguityParams,
) -> Result<Adjacency, ContiguityError> {
    params.validate()?;
    if geoms.is_empty() {
        return Ok(Vec::new());
    }
    let map = if params.precision_threshold == 0.0 {
        match params.rule {
            Rule::Queen => exact::queen_vertex_hash(geoms),
            Rule::Rook => exact::rook_edge_hash(geoms),
        }
    } else {
        polygon_sweep::threshold_contiguity(
            geoms,
            params.rule.is_queen(),
            params.precision_threshold,
        )
    };
    finalize(map, params)
}

/// Contiguity weights for point sites, via a clipped Voronoi diagram of the
/// geometry centroids.
///
/// Queen joins sites whose cells share a vertex, rook those whose cells
/// share an edge. The clipping rectangle is the centroid bounding box
/// padded by 10 units plus 2% of each axis range, so degenerate ranges
/// (colinear sites) still yield a proper diagram. Duplicate sites keep an
/// empty neighbor row.
pub fn point_contiguity<G: GeometrySource>(
    geoms: &G,
    params: &ContiguityParams,
) -> Result<Adjacency, ContiguityError> {
    params.validate()?;
    let n = geoms.len();
    if n == 0 {
        return Ok(Vec::new());
    }
    let sites: Vec<DVec2> = (0..n).map(|i| geoms.centroid(i)).collect();
    let rect = padded_rect(&sites);
    let diagram = voronoi::Diagram::build(&sites, Some(rect));
    let mut map = NeighborMap::new(n);
    voronoi::cell_adjacency(&diagram, params.rule.is_queen(), &mut map);
    finalize(map, params)
}

/// Expand a first-order adjacency to order-`k` neighbors.
///
/// With `cumulative` the result unions all layers `1..=order`, otherwise
/// only the `order`-th frontier survives; rows come back sorted descending.
/// `order == 1` returns the input unchanged.
pub fn higher_order(
    w1: &[Vec<u32>],
    order: usize,
    cumulative: bool,
) -> Result<Adjacency, ContiguityError> {
    if order < 1 {
        return Err(ContiguityError::InvalidOrder(order));
    }
    let n = w1.len();
    for row in w1 {
        for &j in row {
            if j as usize >= n {
                return Err(ContiguityError::IndexOutOfRange {
                    index: j as usize,
                    len: n,
                });
            }
        }
    }
    Ok(higher_order::expand(w1, order, cumulative))
}

fn finalize(map: NeighborMap, params: &ContiguityParams) -> Result<Adjacency, ContiguityError> {
    let lists = map.into_lists();
    if params.order > 1 {
        Ok(higher_order::expand(&lists, params.order, params.cumulative))
    } else {
        Ok(lists)
    }
}

fn padded_rect(sites: &[DVec2]) -> Rect {
    let mut min = sites[0];
    let mut max = sites[0];
    for &p in &sites[1..] {
        min = min.min(p);
        max = max.max(p);
    }
    let pad = DVec2::new(
        10.0 + 0.02 * (max.x - min.x),
        10.0 + 0.02 * (max.y - min.y),
    );
    Rect::new(min - pad, max + pad)
}
