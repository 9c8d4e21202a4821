//! Layout engine for turning grid coordinates into scene positions
//!
//! The graph store assigns each person a discrete (level, slot) grid cell;
//! this module maps those cells to pixel positions, layers on manual drag
//! offsets, and translates everything away from the canvas origin so no
//! card renders at a negative coordinate.

pub mod config;
pub mod engine;
pub mod types;

pub use config::{ConfigError, LayoutConfig};
pub use engine::compute;
pub use types::{Layout, Point};
