//! Shared fixtures and the brute-force oracle for the integration tests.

#![allow(dead_code)]

use offrect::boundary::{Boundary, Point};
use offrect::candidate::CandidatePairs;
use offrect::edges::EdgeSet;
use offrect::intersect::intersects;

pub const SQUARE: [(u32, u32); 4] = [(0, 0), (0, 10), (10, 10), (10, 0)];

pub const L_SHAPE: [(u32, u32); 6] = [(0, 0), (0, 10), (5, 10), (5, 5), (10, 5), (10, 0)];

pub const PLAIN_RECTANGLE: [(u32, u32); 4] = [(0, 0), (0, 3), (7, 3), (7, 0)];

pub fn boundary(points: &[(u32, u32)]) -> Boundary {
    let points: Vec<Point> = points.iter().map(|&(x, y)| Point::new(x, y)).collect();
    Boundary::from_points(&points).expect("fixture fits the arena")
}

/// Histogram-shaped polygon: one column of width `width` per entry of
/// `heights`, standing on the x axis. Every height must be at least 1.
pub fn staircase(heights: &[u32], width: u32) -> Vec<(u32, u32)> {
    let mut points = vec![(0, 0), (0, heights[0]), (width, heights[0])];
    for (k, pair) in heights.windows(2).enumerate() {
        let x = (k as u32 + 1) * width;
        if pair[1] != pair[0] {
            points.push((x, pair[1]));
        }
        points.push((x + width, pair[1]));
    }
    points.push((heights.len() as u32 * width, 0));
    points
}

/// Largest area over every non-hit candidate, computed without pruning,
/// batching or the worker protocol.
pub fn oracle(boundary: &Boundary) -> u64 {
    let edges = EdgeSet::from_boundary(boundary).expect("valid fixture");
    CandidatePairs::new(boundary)
        .map(|(_, candidate)| candidate)
        .filter(|candidate| !intersects(&candidate.rect(), &edges))
        .map(|candidate| candidate.area)
        .max()
        .unwrap_or(0)
}
