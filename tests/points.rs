//! Public-API tests for the Voronoi point-contiguity route.

mod support;

use glam::DVec2;
use planar_contiguity::{point_contiguity, ContiguityParams, GeometryCollection, Rule};
use support::geoms::square;

fn params(rule: Rule) -> ContiguityParams {
    ContiguityParams {
        rule,
        precision_threshold: 0.0,
        order: 1,
        cumulative: false,
    }
}

#[test]
fn test_three_colinear_points_queen() {
    let gc = GeometryCollection::from_points(&[
        DVec2::new(0.0, 0.0),
        DVec2::new(1.0, 0.0),
        DVec2::new(2.0, 0.0),
    ]);
    let adj = point_contiguity(&gc, &params(Rule::Queen)).unwrap();
    assert_eq!(adj, vec![vec![1], vec![0, 2], vec![1]]);
}

#[test]
fn test_three_colinear_points_rook() {
    let gc = GeometryCollection::from_points(&[
        DVec2::new(0.0, 0.0),
        DVec2::new(1.0, 0.0),
        DVec2::new(2.0, 0.0),
    ]);
    let adj = point_contiguity(&gc, &params(Rule::Rook)).unwrap();
    assert_eq!(adj, vec![vec![1], vec![0, 2], vec![1]]);
}

#[test]
fn test_two_points() {
    let gc = GeometryCollection::from_points(&[DVec2::new(0.0, 0.0), DVec2::new(5.0, 0.0)]);
    for rule in [Rule::Queen, Rule::Rook] {
        let adj = point_contiguity(&gc, &params(rule)).unwrap();
        assert_eq!(adj, vec![vec![1], vec![0]]);
    }
}

#[test]
fn test_single_point() {
    let gc = GeometryCollection::from_points(&[DVec2::new(3.0, 4.0)]);
    let adj = point_contiguity(&gc, &params(Rule::Queen)).unwrap();
    assert_eq!(adj, vec![Vec::<u32>::new()]);
}

#[test]
fn test_identical_points_degenerate_to_empty() {
    // after deduplication a single site remains; nobody gets neighbors
    let p = DVec2::new(1.0, 1.0);
    let gc = GeometryCollection::from_points(&[p, p, p]);
    for rule in [Rule::Queen, Rule::Rook] {
        let adj = point_contiguity(&gc, &params(rule)).unwrap();
        assert_eq!(adj, vec![Vec::<u32>::new(), Vec::new(), Vec::new()]);
    }
}

#[test]
fn test_chain_higher_order_through_point_route() {
    let gc = GeometryCollection::from_points(&[
        DVec2::new(0.0, 0.0),
        DVec2::new(1.0, 0.0),
        DVec2::new(2.0, 0.0),
        DVec2::new(3.0, 0.0),
    ]);

    let mut p = params(Rule::Queen);
    p.order = 2;
    let adj = point_contiguity(&gc, &p).unwrap();
    assert_eq!(adj, vec![vec![2], vec![3], vec![0], vec![1]]);

    p.cumulative = true;
    let adj = point_contiguity(&gc, &p).unwrap();
    assert_eq!(
        adj,
        vec![vec![2, 1], vec![3, 2, 0], vec![3, 1, 0], vec![2, 1]]
    );
}

#[test]
fn test_polygon_centroids_feed_the_point_route() {
    // three squares in a row; their centroids are colinear sites
    let gc = GeometryCollection::from_rings(&[
        square(0.0, 0.0, 1.0),
        square(1.0, 0.0, 1.0),
        square(2.0, 0.0, 1.0),
    ]);
    let adj = point_contiguity(&gc, &params(Rule::Rook)).unwrap();
    assert_eq!(adj, vec![vec![1], vec![0, 2], vec![1]]);
}

#[test]
fn test_threshold_is_ignored_on_point_route() {
    let gc = GeometryCollection::from_points(&[
        DVec2::new(0.0, 0.0),
        DVec2::new(1.0, 0.0),
        DVec2::new(2.0, 0.0),
    ]);
    let mut p = params(Rule::Queen);
    p.precision_threshold = 5.0;
    let adj = point_contiguity(&gc, &p).unwrap();
    assert_eq!(adj, vec![vec![1], vec![0, 2], vec![1]]);
}

#[test]
fn test_vertical_line_of_points() {
    let gc = GeometryCollection::from_points(&[
        DVec2::new(0.0, 0.0),
        DVec2::new(0.0, 2.0),
        DVec2::new(0.0, 4.0),
    ]);
    let adj = point_contiguity(&gc, &params(Rule::Rook)).unwrap();
    assert_eq!(adj, vec![vec![1], vec![0, 2], vec![1]]);
}
