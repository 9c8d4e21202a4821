//! Error types for script parsing and execution
//!
//! Note the split from the graph store's own failure semantics: store
//! operations report business-rule rejections as `None`/`false` and never
//! error. These types exist one layer up, where a script line that was
//! rejected or referenced an unknown person has to be reported to a human.

use ariadne::{Color, Label, Report, ReportKind, Source};
use thiserror::Error;

/// Byte range in source text
pub type Span = std::ops::Range<usize>;

#[derive(Error, Debug)]
pub enum ScriptError {
    /// The script text itself is malformed
    #[error("Syntax error at {span:?}: {message}")]
    Syntax { span: Span, message: String },

    /// A command referenced a display name no one in the graph carries
    #[error("Unknown person '{name}'")]
    UnknownPerson { span: Span, name: String },

    /// The store refused the operation (duplicate parent slot, second
    /// spouse, conflicting co-parent, ...); the graph is unchanged
    #[error("Command rejected: {reason}")]
    Rejected { span: Span, reason: String },
}

impl ScriptError {
    /// The source span the error points at
    pub fn span(&self) -> &Span {
        match self {
            Self::Syntax { span, .. }
            | Self::UnknownPerson { span, .. }
            | Self::Rejected { span, .. } => span,
        }
    }

    /// Format the error with source context using ariadne
    pub fn format(&self, source: &str, filename: &str) -> String {
        let span = self.span().clone();
        let label = match self {
            Self::Syntax { message, .. } => message.clone(),
            Self::UnknownPerson { name, .. } => {
                format!("no person named '{name}' exists at this point")
            }
            Self::Rejected { reason, .. } => reason.clone(),
        };

        let mut buf = Vec::new();
        Report::build(ReportKind::Error, filename, span.start)
            .with_message(self.to_string())
            .with_label(
                Label::new((filename, span))
                    .with_message(label)
                    .with_color(Color::Red),
            )
            .finish()
            .write((filename, Source::from(source)), &mut buf)
            .unwrap();
        String::from_utf8(buf).unwrap()
    }
}
