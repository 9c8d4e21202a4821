//! Person records and the small value types they are built from

use std::fmt;

use chrono::NaiveDate;
use serde::Serialize;

use crate::layout::Point;

/// Unique identifier for a person node.
///
/// Ids are assigned monotonically by the graph (starting at 1) and are never
/// reused within a graph lifetime; `clear_all` starts a new lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct PersonId(pub(crate) u32);

impl PersonId {
    /// Raw integer value, mainly for display and serialization
    pub fn value(self) -> u32 {
        self.0
    }
}

impl fmt::Display for PersonId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Gender of a person, fixed at creation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Gender {
    Female,
    Male,
}

impl Gender {
    /// The other gender; used for spouse creation and parent-slot checks
    pub fn opposite(self) -> Self {
        match self {
            Gender::Female => Gender::Male,
            Gender::Male => Gender::Female,
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Gender::Female => write!(f, "female"),
            Gender::Male => write!(f, "male"),
        }
    }
}

/// A person's parents broken out by gender.
///
/// Derived on demand from the parent id set; since a node carries at most two
/// parents, at most one of each gender, both fields are optional and never
/// refer to the same node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ParentPair {
    pub mother: Option<PersonId>,
    pub father: Option<PersonId>,
}

impl ParentPair {
    /// The parent slot for the given gender
    pub fn of(&self, gender: Gender) -> Option<PersonId> {
        match gender {
            Gender::Female => self.mother,
            Gender::Male => self.father,
        }
    }

    /// Whether both parent slots are taken
    pub fn is_full(&self) -> bool {
        self.mother.is_some() && self.father.is_some()
    }
}

/// A single person in the family graph.
///
/// Grid placement lives in `level` (generation, increasing downward) and
/// `slot` (horizontal column within the level); `offset` accumulates manual
/// drag nudges in pixel space on top of the grid position.
///
/// Fields are crate-private: relationship edges and grid coordinates may only
/// change through [`FamilyGraph`](super::FamilyGraph) operations, which keep
/// the two sides of every edge in sync and re-stabilize slots afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct Person {
    pub(crate) id: PersonId,
    pub(crate) name: String,
    pub(crate) gender: Gender,
    pub(crate) birthday: Option<NaiveDate>,
    pub(crate) level: i32,
    pub(crate) slot: f64,
    pub(crate) offset: Point,
    pub(crate) parents: Vec<PersonId>,
    pub(crate) children: Vec<PersonId>,
    pub(crate) spouse: Option<PersonId>,
}

impl Person {
    pub(crate) fn new(
        id: PersonId,
        name: String,
        gender: Gender,
        birthday: Option<NaiveDate>,
        level: i32,
        slot: f64,
    ) -> Self {
        Self {
            id,
            name,
            gender,
            birthday,
            level,
            slot,
            offset: Point::new(0.0, 0.0),
            parents: Vec::new(),
            children: Vec::new(),
            spouse: None,
        }
    }

    pub fn id(&self) -> PersonId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn gender(&self) -> Gender {
        self.gender
    }

    pub fn birthday(&self) -> Option<NaiveDate> {
        self.birthday
    }

    /// Generation index; 0 for the initial anchor, negative for ancestors
    pub fn level(&self) -> i32 {
        self.level
    }

    /// Horizontal column within the level; integer after stabilization
    pub fn slot(&self) -> f64 {
        self.slot
    }

    /// Accumulated manual drag offset in pixel space
    pub fn offset(&self) -> Point {
        self.offset
    }

    /// Parent ids, at most two, at most one per gender
    pub fn parents(&self) -> &[PersonId] {
        &self.parents
    }

    /// Child ids in insertion order
    pub fn children(&self) -> &[PersonId] {
        &self.children
    }

    pub fn spouse(&self) -> Option<PersonId> {
        self.spouse
    }
}
