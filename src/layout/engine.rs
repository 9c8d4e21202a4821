//! Grid-to-scene position computation
//!
//! [`compute`] is a pure function of the current graph state: it holds no
//! state of its own and recomputes from scratch on every call, so callers
//! may invoke it after every change notification.

use std::collections::BTreeMap;

use crate::graph::FamilyGraph;

use super::config::LayoutConfig;
use super::types::{Layout, Point};

/// Compute scene positions for every person in the graph.
///
/// Base position is `(slot * (card_width + h_gap), level * (card_height +
/// v_gap))` plus the person's accumulated manual offset. If the minimum x or
/// y would fall below `config.padding`, every position is translated by the
/// deficit so the minimum lands exactly on the padding; no card ever renders
/// at a negative coordinate.
pub fn compute(graph: &FamilyGraph, config: &LayoutConfig) -> Layout {
    let step_x = config.card_width + config.h_gap;
    let step_y = config.card_height + config.v_gap;

    let mut positions: BTreeMap<_, _> = graph
        .people()
        .map(|p| {
            let base = Point::new(
                p.slot() * step_x + p.offset().x,
                f64::from(p.level()) * step_y + p.offset().y,
            );
            (p.id(), base)
        })
        .collect();

    if positions.is_empty() {
        return Layout {
            positions,
            width: 0.0,
            height: 0.0,
        };
    }

    let min_x = positions.values().map(|p| p.x).fold(f64::INFINITY, f64::min);
    let min_y = positions.values().map(|p| p.y).fold(f64::INFINITY, f64::min);
    let dx = (config.padding - min_x).max(0.0);
    let dy = (config.padding - min_y).max(0.0);
    if dx > 0.0 || dy > 0.0 {
        for p in positions.values_mut() {
            p.x += dx;
            p.y += dy;
        }
    }

    let max_x = positions
        .values()
        .map(|p| p.x)
        .fold(f64::NEG_INFINITY, f64::max);
    let max_y = positions
        .values()
        .map(|p| p.y)
        .fold(f64::NEG_INFINITY, f64::max);

    Layout {
        positions,
        width: max_x + config.card_width + config.padding,
        height: max_y + config.card_height + config.padding,
    }
}
