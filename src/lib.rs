//! Kin Canvas - an interactive family tree editor core
//!
//! The crate keeps a bidirectional family graph consistent under editing
//! (add, link, delete, rename, drag) and assigns every person a stable grid
//! position (a generation level and a horizontal slot), repaired after each
//! change so existing cards never jump unexpectedly. A stateless layout
//! engine turns the grid into scene coordinates for whatever draws the
//! cards.
//!
//! # Example
//!
//! ```rust
//! use kin_canvas::{layout, run_script};
//!
//! let graph = run_script(
//!     r#"
//! root "Margaret" female born 1921-05-04
//! spouse "Margaret" "Harold"
//! child "Margaret" "Alice" female
//! "#,
//! )
//! .unwrap();
//!
//! let positions = layout::compute(&graph, &layout::LayoutConfig::default());
//! assert_eq!(positions.len(), 3);
//! ```

pub mod error;
pub mod graph;
pub mod layout;
pub mod script;

pub use error::ScriptError;
pub use graph::{FamilyGraph, Gender, ParentPair, Person, PersonId, SubscriptionToken};
pub use layout::{Layout, LayoutConfig, Point};
pub use script::{Command, Spanned};

/// Build a graph from scratch by running an editor script.
///
/// Convenience wrapper over [`script::parse`] and [`script::apply`] for
/// callers that don't need to hold on to the parsed commands.
pub fn run_script(source: &str) -> Result<FamilyGraph, ScriptError> {
    let commands = script::parse(source)?;
    let mut graph = FamilyGraph::new();
    script::apply(&mut graph, &commands)?;
    Ok(graph)
}
