//! Core types for the layout engine

use std::collections::BTreeMap;

use serde::Serialize;

use crate::graph::PersonId;

/// A 2D point in scene coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// The origin
    pub fn zero() -> Self {
        Self::new(0.0, 0.0)
    }
}

/// Computed positions for every person in the graph, plus the overall
/// canvas extent.
///
/// Positions are top-left corners of the person cards; the engine guarantees
/// none of them is negative. The mapping is keyed by id and iterates in id
/// order, so output is deterministic for a given graph state.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Layout {
    pub positions: BTreeMap<PersonId, Point>,
    pub width: f64,
    pub height: f64,
}

impl Layout {
    /// Position of a single person's card, if the id is known
    pub fn position(&self, id: PersonId) -> Option<Point> {
        self.positions.get(&id).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (PersonId, Point)> + '_ {
        self.positions.iter().map(|(id, p)| (*id, *p))
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}
