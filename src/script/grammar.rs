//! Parser and interpreter for the editor command script
//!
//! The language is line-oriented and LL(1): the first token of a line
//! decides the command, so parsing is a direct walk over the token stream,
//! one line at a time.

use chrono::NaiveDate;
use logos::Logos;

use crate::error::ScriptError;
use crate::graph::{FamilyGraph, Gender, PersonId};
use crate::layout::Point;

use super::command::{Command, Spanned};
use super::lexer::{Span, Token};

/// Parse a script into spanned commands.
///
/// Blank lines and `#` comments are ignored; any lexical or structural
/// problem aborts the parse with a spanned error.
pub fn parse(source: &str) -> Result<Vec<Spanned<Command>>, ScriptError> {
    let mut tokens: Vec<(Token, Span)> = Vec::new();
    for (result, span) in Token::lexer(source).spanned() {
        match result {
            Ok(token) => tokens.push((token, span)),
            Err(()) => {
                return Err(ScriptError::Syntax {
                    span,
                    message: "unrecognized token".to_string(),
                })
            }
        }
    }

    let mut commands = Vec::new();
    for line in tokens.split(|(t, _)| *t == Token::Newline) {
        if line.is_empty() {
            continue;
        }
        commands.push(parse_line(line)?);
    }
    Ok(commands)
}

/// Run parsed commands against a graph.
///
/// Names are resolved when their command executes, so a `rename` affects how
/// later lines must refer to the person. Store-level rejections surface as
/// [`ScriptError::Rejected`] with the offending line's span.
pub fn apply(graph: &mut FamilyGraph, commands: &[Spanned<Command>]) -> Result<(), ScriptError> {
    for command in commands {
        apply_one(graph, command)?;
    }
    Ok(())
}

fn resolve(graph: &FamilyGraph, name: &str, span: &Span) -> Result<PersonId, ScriptError> {
    graph.find_by_name(name).ok_or_else(|| ScriptError::UnknownPerson {
        span: span.clone(),
        name: name.to_string(),
    })
}

fn rejected(span: &Span, reason: String) -> ScriptError {
    ScriptError::Rejected {
        span: span.clone(),
        reason,
    }
}

fn apply_one(graph: &mut FamilyGraph, command: &Spanned<Command>) -> Result<(), ScriptError> {
    let span = &command.span;
    match &command.node {
        Command::AddRoot {
            name,
            gender,
            birthday,
        } => {
            graph.add_root(name.clone(), *gender, *birthday);
        }
        Command::AddStandalone {
            name,
            gender,
            birthday,
        } => {
            graph.add_standalone(name.clone(), *gender, *birthday);
        }
        Command::AddParent {
            of,
            gender,
            name,
            birthday,
        } => {
            let id = resolve(graph, of, span)?;
            graph
                .add_parent(id, *gender, name.clone(), *birthday)
                .ok_or_else(|| {
                    rejected(span, format!("'{of}' cannot take another {gender} parent"))
                })?;
        }
        Command::AddChild {
            of,
            name,
            gender,
            birthday,
        } => {
            let id = resolve(graph, of, span)?;
            graph
                .add_child(id, name.clone(), *gender, *birthday)
                .ok_or_else(|| rejected(span, format!("cannot add a child to '{of}'")))?;
        }
        Command::AddSpouse { of, name, birthday } => {
            let id = resolve(graph, of, span)?;
            graph
                .add_spouse(id, name.clone(), *birthday)
                .ok_or_else(|| rejected(span, format!("'{of}' already has a spouse")))?;
        }
        Command::LinkParent { parent, child } | Command::LinkChild { parent, child } => {
            let parent_id = resolve(graph, parent, span)?;
            let child_id = resolve(graph, child, span)?;
            if !graph.link_existing_parent(parent_id, child_id) {
                return Err(rejected(
                    span,
                    format!("cannot link '{parent}' as a parent of '{child}'"),
                ));
            }
        }
        Command::LinkSpouses { a, b } => {
            let a_id = resolve(graph, a, span)?;
            let b_id = resolve(graph, b, span)?;
            if !graph.link_existing_spouses(a_id, b_id) {
                return Err(rejected(
                    span,
                    format!("cannot link '{a}' and '{b}' as spouses"),
                ));
            }
        }
        Command::Delete { name } => {
            let id = resolve(graph, name, span)?;
            graph.delete_node(id);
        }
        Command::Rename { target, name } => {
            let id = resolve(graph, target, span)?;
            graph.rename(id, name.clone());
        }
        Command::SetBirthday { target, date } => {
            let id = resolve(graph, target, span)?;
            graph.set_birthday(id, Some(*date));
        }
        Command::Move { target, dx, dy } => {
            let id = resolve(graph, target, span)?;
            graph.apply_manual_offset(&[id], Point::new(*dx, *dy));
        }
        Command::Clear => {
            graph.clear_all();
        }
    }
    Ok(())
}

// ---- line parsing ----

struct Cursor<'a> {
    tokens: &'a [(Token, Span)],
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn new(tokens: &'a [(Token, Span)]) -> Self {
        Self { tokens, pos: 0 }
    }

    fn line_span(&self) -> Span {
        let start = self.tokens.first().map_or(0, |(_, s)| s.start);
        let end = self.tokens.last().map_or(0, |(_, s)| s.end);
        start..end
    }

    /// Span to blame when a token is missing: the last token of the line
    fn end_span(&self) -> Span {
        self.tokens.last().map_or(0..0, |(_, s)| s.clone())
    }

    fn next(&mut self) -> Option<&'a (Token, Span)> {
        let token = self.tokens.get(self.pos);
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn expect_name(&mut self, what: &str) -> Result<String, ScriptError> {
        match self.next() {
            Some((Token::Str(s), _)) => Ok(s.clone()),
            Some((other, span)) => Err(ScriptError::Syntax {
                span: span.clone(),
                message: format!("expected quoted {what}, found {}", other.describe()),
            }),
            None => Err(ScriptError::Syntax {
                span: self.end_span(),
                message: format!("expected quoted {what}"),
            }),
        }
    }

    fn expect_gender(&mut self) -> Result<Gender, ScriptError> {
        match self.next() {
            Some((Token::Female, _)) => Ok(Gender::Female),
            Some((Token::Male, _)) => Ok(Gender::Male),
            Some((other, span)) => Err(ScriptError::Syntax {
                span: span.clone(),
                message: format!("expected 'female' or 'male', found {}", other.describe()),
            }),
            None => Err(ScriptError::Syntax {
                span: self.end_span(),
                message: "expected 'female' or 'male'".to_string(),
            }),
        }
    }

    fn expect_date(&mut self) -> Result<NaiveDate, ScriptError> {
        match self.next() {
            Some((Token::Date(d), _)) => Ok(*d),
            Some((other, span)) => Err(ScriptError::Syntax {
                span: span.clone(),
                message: format!("expected a date (YYYY-MM-DD), found {}", other.describe()),
            }),
            None => Err(ScriptError::Syntax {
                span: self.end_span(),
                message: "expected a date (YYYY-MM-DD)".to_string(),
            }),
        }
    }

    fn expect_number(&mut self, what: &str) -> Result<f64, ScriptError> {
        match self.next() {
            Some((Token::Number(n), _)) => Ok(*n),
            Some((other, span)) => Err(ScriptError::Syntax {
                span: span.clone(),
                message: format!("expected {what}, found {}", other.describe()),
            }),
            None => Err(ScriptError::Syntax {
                span: self.end_span(),
                message: format!("expected {what}"),
            }),
        }
    }

    /// Optional trailing `born DATE`
    fn optional_born(&mut self) -> Result<Option<NaiveDate>, ScriptError> {
        match self.tokens.get(self.pos) {
            Some((Token::Born, _)) => {
                self.pos += 1;
                Ok(Some(self.expect_date()?))
            }
            _ => Ok(None),
        }
    }

    fn finish(&self) -> Result<(), ScriptError> {
        match self.tokens.get(self.pos) {
            None => Ok(()),
            Some((token, span)) => Err(ScriptError::Syntax {
                span: span.clone(),
                message: format!("unexpected {} after command", token.describe()),
            }),
        }
    }
}

fn parse_line(tokens: &[(Token, Span)]) -> Result<Spanned<Command>, ScriptError> {
    let mut cursor = Cursor::new(tokens);
    let span = cursor.line_span();
    let (head, head_span) = cursor.next().expect("line is non-empty");
    let command = match head {
        Token::Root => {
            let name = cursor.expect_name("name")?;
            let gender = cursor.expect_gender()?;
            let birthday = cursor.optional_born()?;
            Command::AddRoot {
                name,
                gender,
                birthday,
            }
        }
        Token::Standalone => {
            let name = cursor.expect_name("name")?;
            let gender = cursor.expect_gender()?;
            let birthday = cursor.optional_born()?;
            Command::AddStandalone {
                name,
                gender,
                birthday,
            }
        }
        Token::Parent => {
            let of = cursor.expect_name("person")?;
            let gender = cursor.expect_gender()?;
            let name = cursor.expect_name("name")?;
            let birthday = cursor.optional_born()?;
            Command::AddParent {
                of,
                gender,
                name,
                birthday,
            }
        }
        Token::Child => {
            let of = cursor.expect_name("person")?;
            let name = cursor.expect_name("name")?;
            let gender = cursor.expect_gender()?;
            let birthday = cursor.optional_born()?;
            Command::AddChild {
                of,
                name,
                gender,
                birthday,
            }
        }
        Token::Spouse => {
            let of = cursor.expect_name("person")?;
            let name = cursor.expect_name("name")?;
            let birthday = cursor.optional_born()?;
            Command::AddSpouse { of, name, birthday }
        }
        Token::LinkParent => Command::LinkParent {
            parent: cursor.expect_name("parent")?,
            child: cursor.expect_name("child")?,
        },
        Token::LinkChild => Command::LinkChild {
            parent: cursor.expect_name("parent")?,
            child: cursor.expect_name("child")?,
        },
        Token::LinkSpouses => Command::LinkSpouses {
            a: cursor.expect_name("person")?,
            b: cursor.expect_name("person")?,
        },
        Token::Delete => Command::Delete {
            name: cursor.expect_name("person")?,
        },
        Token::Rename => Command::Rename {
            target: cursor.expect_name("person")?,
            name: cursor.expect_name("new name")?,
        },
        Token::Birthday => Command::SetBirthday {
            target: cursor.expect_name("person")?,
            date: cursor.expect_date()?,
        },
        Token::Move => Command::Move {
            target: cursor.expect_name("person")?,
            dx: cursor.expect_number("horizontal delta")?,
            dy: cursor.expect_number("vertical delta")?,
        },
        Token::Clear => Command::Clear,
        other => {
            return Err(ScriptError::Syntax {
                span: head_span.clone(),
                message: format!("expected a command, found {}", other.describe()),
            })
        }
    };
    cursor.finish()?;
    Ok(Spanned::new(command, span))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_add_root_with_birthday() {
        let commands = parse(r#"root "Margaret" female born 1921-05-04"#).unwrap();
        assert_eq!(commands.len(), 1);
        assert_eq!(
            commands[0].node,
            Command::AddRoot {
                name: "Margaret".to_string(),
                gender: Gender::Female,
                birthday: NaiveDate::from_ymd_opt(1921, 5, 4),
            }
        );
    }

    #[test]
    fn test_parse_multiple_lines_with_comments() {
        let source = r#"
# build a small family
root "A" female
spouse "A" "B"
child "A" "C" male
"#;
        let commands = parse(source).unwrap();
        assert_eq!(commands.len(), 3);
        assert_eq!(
            commands[2].node,
            Command::AddChild {
                of: "A".to_string(),
                name: "C".to_string(),
                gender: Gender::Male,
                birthday: None,
            }
        );
    }

    #[test]
    fn test_parse_rejects_trailing_tokens() {
        let err = parse(r#"clear "A""#).unwrap_err();
        assert!(matches!(err, ScriptError::Syntax { .. }));
        assert!(err.to_string().contains("unexpected"));
    }

    #[test]
    fn test_parse_rejects_missing_gender() {
        let err = parse(r#"root "A""#).unwrap_err();
        assert!(err.to_string().contains("female"));
    }

    #[test]
    fn test_apply_resolves_names_in_order() {
        let commands = parse(
            r#"
root "A" female
child "A" "C" male
rename "C" "Charlie"
birthday "Charlie" 1980-01-02
"#,
        )
        .unwrap();
        let mut graph = FamilyGraph::new();
        apply(&mut graph, &commands).unwrap();
        let c = graph.find_by_name("Charlie").unwrap();
        assert_eq!(
            graph.get(c).unwrap().birthday(),
            NaiveDate::from_ymd_opt(1980, 1, 2)
        );
    }

    #[test]
    fn test_apply_surfaces_unknown_person() {
        let commands = parse(r#"delete "Nobody""#).unwrap();
        let mut graph = FamilyGraph::new();
        let err = apply(&mut graph, &commands).unwrap_err();
        assert!(matches!(err, ScriptError::UnknownPerson { .. }));
    }

    #[test]
    fn test_apply_surfaces_store_rejection() {
        let commands = parse(
            r#"
root "A" female
spouse "A" "B"
spouse "A" "B2"
"#,
        )
        .unwrap();
        let mut graph = FamilyGraph::new();
        let err = apply(&mut graph, &commands).unwrap_err();
        assert!(matches!(err, ScriptError::Rejected { .. }));
        // the failed line left no partial state behind
        assert_eq!(graph.len(), 2);
    }
}
