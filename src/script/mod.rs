//! Editor command script: the crate's textual driving surface
//!
//! One command per line, mirroring the graph store API:
//!
//! ```text
//! root "Margaret" female born 1921-05-04
//! spouse "Margaret" "Harold"
//! child "Margaret" "Alice" female
//! link-spouses "Alice" "Tom"
//! move "Alice" 12 -4
//! ```

pub mod command;
pub mod grammar;
pub mod lexer;

pub use command::{Command, Spanned};
pub use grammar::{apply, parse};
pub use lexer::{Span, Token};
