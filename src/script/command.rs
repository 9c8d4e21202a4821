//! Command AST for the editor script
//!
//! Each command mirrors one operation of the graph store API; persons are
//! referenced by display name and resolved at apply time (first match in id
//! order).

use chrono::NaiveDate;

use crate::graph::Gender;

use super::lexer::Span;

/// A value paired with its source span
#[derive(Debug, Clone, PartialEq)]
pub struct Spanned<T> {
    pub node: T,
    pub span: Span,
}

impl<T> Spanned<T> {
    pub fn new(node: T, span: Span) -> Self {
        Self { node, span }
    }
}

/// One editor operation
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// `root "Name" female [born DATE]`
    AddRoot {
        name: String,
        gender: Gender,
        birthday: Option<NaiveDate>,
    },
    /// `standalone "Name" male [born DATE]`: start a disconnected branch
    AddStandalone {
        name: String,
        gender: Gender,
        birthday: Option<NaiveDate>,
    },
    /// `parent "Of" female "Name" [born DATE]`
    AddParent {
        of: String,
        gender: Gender,
        name: String,
        birthday: Option<NaiveDate>,
    },
    /// `child "Of" "Name" male [born DATE]`
    AddChild {
        of: String,
        name: String,
        gender: Gender,
        birthday: Option<NaiveDate>,
    },
    /// `spouse "Of" "Name" [born DATE]`: gender is the opposite of `Of`'s
    AddSpouse {
        of: String,
        name: String,
        birthday: Option<NaiveDate>,
    },
    /// `link-parent "Parent" "Child"`
    LinkParent { parent: String, child: String },
    /// `link-child "Parent" "Child"`: same edge, opposite drag direction
    LinkChild { parent: String, child: String },
    /// `link-spouses "A" "B"`
    LinkSpouses { a: String, b: String },
    /// `delete "Name"`
    Delete { name: String },
    /// `rename "Old" "New"`
    Rename { target: String, name: String },
    /// `birthday "Name" DATE`
    SetBirthday { target: String, date: NaiveDate },
    /// `move "Name" DX DY`: accumulate a manual drag offset
    Move { target: String, dx: f64, dy: f64 },
    /// `clear`: reset to an empty graph
    Clear,
}
