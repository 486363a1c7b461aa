use regex::Regex;
use std::iter::Peekable;
use std::sync::OnceLock;
use std::vec;

/// A whitespace-delimited field together with its 1-based column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Field<'a> {
    pub text: &'a str,
    pub column: usize,
}

/// A non-empty line of the file split into fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line<'a> {
    /// 1-based line number in the source text.
    pub number: usize,
    pub(crate) fields: Vec<Field<'a>>,
}

impl<'a> Line<'a> {
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn fields(&self) -> &[Field<'a>] {
        &self.fields
    }

    pub fn first(&self) -> Field<'a> {
        // Lines are never empty, `tokenize` drops blank ones.
        self.fields[0]
    }

    /// The whole line as written (fields joined by single spaces), for diagnostics.
    pub fn text(&self) -> String {
        self.fields
            .iter()
            .map(|field| field.text)
            .collect::<Vec<_>>()
            .join(" ")
    }
}

fn line_break() -> &'static Regex {
    static LINE_BREAK: OnceLock<Regex> = OnceLock::new();
    LINE_BREAK.get_or_init(|| Regex::new(r"\r\n|\n|\r").expect("line break pattern is valid"))
}

fn field() -> &'static Regex {
    static FIELD: OnceLock<Regex> = OnceLock::new();
    FIELD.get_or_init(|| Regex::new(r"[^ \t\x0B\x0C]+").expect("field pattern is valid"))
}

/// Split `text` into lines (`\r\n`, `\n` or a lone `\r`) and each line into whitespace-delimited fields.
/// Blank lines are discarded, line numbers still count them.
pub fn tokenize(text: &str) -> Vec<Line<'_>> {
    line_break()
        .split(text)
        .enumerate()
        .filter_map(|(i, line)| {
            let fields: Vec<Field> = field()
                .find_iter(line)
                .map(|m| Field {
                    text: m.as_str(),
                    column: m.start() + 1,
                })
                .collect();
            if fields.is_empty() {
                None
            } else {
                Some(Line {
                    number: i + 1,
                    fields,
                })
            }
        })
        .collect()
}

/// Cursor over tokenized lines, consumed front to back by the parser.
#[derive(Debug)]
pub struct TokenStream<'a> {
    lines: Peekable<vec::IntoIter<Line<'a>>>,
}

impl<'a> TokenStream<'a> {
    pub fn new(text: &'a str) -> Self {
        TokenStream {
            lines: tokenize(text).into_iter().peekable(),
        }
    }

    pub fn peek(&mut self) -> Option<&Line<'a>> {
        self.lines.peek()
    }

    pub fn next_line(&mut self) -> Option<Line<'a>> {
        self.lines.next()
    }

    /// Number of lines not consumed yet.
    pub fn remaining(&self) -> usize {
        self.lines.len()
    }

    pub fn is_exhausted(&self) -> bool {
        self.remaining() == 0
    }
}

/////////////////////////////////////////////////////////////////////////////////////////////////
