//! The relationship graph store
//!
//! Owns every person node and their parent/child/spouse edges. All mutation
//! goes through [`FamilyGraph`], which enforces the structural rules (edges
//! symmetric, at most two parents with at most one per gender, at most one
//! opposite-gender spouse), re-stabilizes the slot grid after every change,
//! and notifies subscribed observers.

pub mod node;
pub mod observer;
pub mod store;

pub use node::{Gender, ParentPair, Person, PersonId};
pub use observer::{ChangeNotifier, SubscriptionToken};
pub use store::FamilyGraph;
