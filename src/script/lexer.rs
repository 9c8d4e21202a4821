//! Lexer for the editor command script using logos

use chrono::NaiveDate;
use logos::Logos;

/// Byte range in source text
pub type Span = std::ops::Range<usize>;

fn unquote(slice: &str) -> String {
    let inner = &slice[1..slice.len() - 1];
    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            if let Some(escaped) = chars.next() {
                out.push(escaped);
            }
        } else {
            out.push(c);
        }
    }
    out
}

#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"[ \t\r]+")]
#[logos(skip r"#[^\n]*")]
pub enum Token {
    // Command keywords
    #[token("root")]
    Root,
    #[token("standalone")]
    Standalone,
    #[token("parent")]
    Parent,
    #[token("child")]
    Child,
    #[token("spouse")]
    Spouse,
    #[token("link-parent")]
    LinkParent,
    #[token("link-child")]
    LinkChild,
    #[token("link-spouses")]
    LinkSpouses,
    #[token("delete")]
    Delete,
    #[token("rename")]
    Rename,
    #[token("birthday")]
    Birthday,
    #[token("move")]
    Move,
    #[token("clear")]
    Clear,

    // Argument keywords
    #[token("female")]
    Female,
    #[token("male")]
    Male,
    #[token("born")]
    Born,

    // One command per line
    #[token("\n")]
    Newline,

    /// Quoted display name, supports \" and \\ escapes
    #[regex(r#""([^"\\\n]|\\.)*""#, |lex| unquote(lex.slice()))]
    Str(String),

    /// ISO calendar date, e.g. 1950-04-02
    #[regex(r"\d{4}-\d{2}-\d{2}", |lex| {
        NaiveDate::parse_from_str(lex.slice(), "%Y-%m-%d").ok()
    })]
    Date(NaiveDate),

    /// Signed decimal number (drag deltas)
    #[regex(r"-?\d+(\.\d+)?", |lex| lex.slice().parse::<f64>().ok())]
    Number(f64),
}

impl Token {
    /// Human-readable token description for error messages
    pub fn describe(&self) -> String {
        match self {
            Token::Str(s) => format!("\"{s}\""),
            Token::Date(d) => d.to_string(),
            Token::Number(n) => n.to_string(),
            Token::Newline => "end of line".to_string(),
            other => format!("{other:?}").to_lowercase(),
        }
    }
}
