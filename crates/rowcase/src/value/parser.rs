//! Cell evaluation: a small recursive-descent literal parser.
//!
//! Cells that are not a complete literal are not errors; they evaluate to
//! [`Value::Raw`] holding the trimmed text. Only a literal that parses but
//! cannot be represented (an integer outside `i64`, a float that overflows,
//! a map with a repeated key) is reported as [`RowcaseError::MalformedCell`].

use indexmap::IndexMap;
use tracing::trace;

use super::types::{Number, Value};
use crate::error::{Location, Result, RowcaseError};

/// Diagnostic context for the cell being evaluated.
#[derive(Debug, Clone, Copy)]
pub struct CellSite<'a> {
    /// Raw text of the row containing the cell.
    pub row: &'a str,
    /// File the row came from.
    pub file: Option<&'a std::path::Path>,
    /// Line of the row, if known.
    pub line: Option<u32>,
}

impl<'a> CellSite<'a> {
    /// A site with only row text.
    pub fn row(row: &'a str) -> Self {
        Self {
            row,
            file: None,
            line: None,
        }
    }

    fn location(&self) -> Location {
        Location::new(self.file.map(|p| p.to_path_buf()), self.line)
    }
}

/// Evaluate one cell into a typed value.
pub fn evaluate(cell: &str, site: &CellSite<'_>) -> Result<Value> {
    let text = cell.trim();
    if text.is_empty() {
        return Ok(Value::Nil);
    }

    match Parser::new(text).parse_complete() {
        Ok(value) => Ok(value),
        Err(ParseError::Syntax) => {
            trace!(cell = text, "cell is not a literal, keeping raw text");
            Ok(Value::Raw(text.to_string()))
        }
        Err(ParseError::Invalid(message)) => Err(RowcaseError::MalformedCell {
            cell: text.to_string(),
            row: site.row.to_string(),
            location: site.location(),
            message,
        }),
    }
}

#[derive(Debug)]
enum ParseError {
    /// Input is not a literal.
    Syntax,
    /// Input is a literal that cannot be materialised.
    Invalid(String),
}

type ParseResult<T> = std::result::Result<T, ParseError>;

/// Deepest list/map nesting accepted; anything deeper is kept as raw text.
pub const MAX_NESTING: usize = 128;

struct Parser<'a> {
    src: &'a str,
    pos: usize,
    depth: usize,
}

impl<'a> Parser<'a> {
    fn new(src: &'a str) -> Self {
        Self { src, pos: 0, depth: 0 }
    }

    fn parse_complete(mut self) -> ParseResult<Value> {
        let value = self.parse_value()?;
        self.skip_ws();
        if self.pos == self.src.len() {
            Ok(value)
        } else {
            Err(ParseError::Syntax)
        }
    }

    fn rest(&self) -> &'a str {
        &self.src[self.pos..]
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.pos += ch.len_utf8();
        Some(ch)
    }

    fn eat(&mut self, token: &str) -> bool {
        if self.rest().starts_with(token) {
            self.pos += token.len();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, token: &str) -> ParseResult<()> {
        if self.eat(token) {
            Ok(())
        } else {
            Err(ParseError::Syntax)
        }
    }

    fn skip_ws(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.bump();
        }
    }

    fn parse_value(&mut self) -> ParseResult<Value> {
        self.skip_ws();
        match self.peek() {
            Some('"') => self.parse_string().map(Value::String),
            Some(':') => self.parse_symbol().map(Value::Symbol),
            Some('[') => self.nested(Self::parse_list),
            Some('%') => self.nested(Self::parse_map),
            Some(c) if c.is_ascii_digit() || c == '-' || c == '+' => self.parse_number(),
            Some(c) if is_ident_start(c) => {
                let word = self.parse_ident();
                match word {
                    "true" => Ok(Value::Bool(true)),
                    "false" => Ok(Value::Bool(false)),
                    "nil" => Ok(Value::Nil),
                    _ => Err(ParseError::Syntax),
                }
            }
            _ => Err(ParseError::Syntax),
        }
    }

    fn nested(&mut self, parse: fn(&mut Self) -> ParseResult<Value>) -> ParseResult<Value> {
        if self.depth >= MAX_NESTING {
            return Err(ParseError::Syntax);
        }
        self.depth += 1;
        let value = parse(self);
        self.depth -= 1;
        value
    }

    fn parse_ident(&mut self) -> &'a str {
        let start = self.pos;
        if self.peek().is_some_and(is_ident_start) {
            self.bump();
            while self.peek().is_some_and(is_ident_continue) {
                self.bump();
            }
            // Trailing `?` or `!` as in `:valid?`
            if matches!(self.peek(), Some('?') | Some('!')) {
                self.bump();
            }
        }
        &self.src[start..self.pos]
    }

    fn parse_string(&mut self) -> ParseResult<String> {
        self.expect("\"")?;
        let mut out = String::new();
        loop {
            match self.bump().ok_or(ParseError::Syntax)? {
                '"' => return Ok(out),
                '\\' => match self.bump().ok_or(ParseError::Syntax)? {
                    '"' => out.push('"'),
                    '\\' => out.push('\\'),
                    'n' => out.push('\n'),
                    't' => out.push('\t'),
                    'r' => out.push('\r'),
                    _ => return Err(ParseError::Syntax),
                },
                c => out.push(c),
            }
        }
    }

    fn parse_symbol(&mut self) -> ParseResult<String> {
        self.expect(":")?;
        if self.peek() == Some('"') {
            return self.parse_string();
        }
        let name = self.parse_ident();
        if name.is_empty() {
            Err(ParseError::Syntax)
        } else {
            Ok(name.to_string())
        }
    }

    fn parse_list(&mut self) -> ParseResult<Value> {
        self.expect("[")?;
        let mut items = Vec::new();
        loop {
            self.skip_ws();
            if self.eat("]") {
                return Ok(Value::List(items));
            }
            items.push(self.parse_value()?);
            self.skip_ws();
            if !self.eat(",") {
                self.skip_ws();
                self.expect("]")?;
                return Ok(Value::List(items));
            }
        }
    }

    fn parse_map(&mut self) -> ParseResult<Value> {
        self.expect("%{")?;
        let mut entries = IndexMap::new();
        loop {
            self.skip_ws();
            if self.eat("}") {
                return Ok(Value::Map(entries));
            }
            let key = self.parse_map_key()?;
            let value = self.parse_value()?;
            if entries.contains_key(&key) {
                return Err(ParseError::Invalid(format!("duplicate map key `{}`", key)));
            }
            entries.insert(key, value);
            self.skip_ws();
            if !self.eat(",") {
                self.skip_ws();
                self.expect("}")?;
                return Ok(Value::Map(entries));
            }
        }
    }

    /// Either `key:` or `:key =>`.
    fn parse_map_key(&mut self) -> ParseResult<String> {
        if self.peek() == Some(':') {
            let key = self.parse_symbol()?;
            self.skip_ws();
            self.expect("=>")?;
            return Ok(key);
        }
        let key = self.parse_ident();
        if key.is_empty() {
            return Err(ParseError::Syntax);
        }
        self.expect(":")?;
        if !self.peek().is_some_and(char::is_whitespace) {
            return Err(ParseError::Syntax);
        }
        Ok(key.to_string())
    }

    fn parse_number(&mut self) -> ParseResult<Value> {
        let negative = if self.eat("-") {
            true
        } else {
            self.eat("+");
            false
        };

        for (prefix, radix) in [("0x", 16), ("0o", 8), ("0b", 2)] {
            if self.eat(prefix) {
                let digits = self.digit_run(radix)?;
                let signed = if negative { format!("-{}", digits) } else { digits };
                return i64::from_str_radix(&signed, radix)
                    .map(|n| Value::Number(Number::Int(n)))
                    .map_err(|_| {
                        ParseError::Invalid(format!("integer `{}` does not fit in 64 bits", signed))
                    });
            }
        }

        let mut literal = String::new();
        if negative {
            literal.push('-');
        }
        literal.push_str(&self.digit_run(10)?);

        let mut is_float = false;
        // A fraction needs a digit after the dot
        if self.rest().starts_with('.')
            && self.rest()[1..].starts_with(|c: char| c.is_ascii_digit())
        {
            self.bump();
            literal.push('.');
            literal.push_str(&self.digit_run(10)?);
            is_float = true;
        }
        if matches!(self.peek(), Some('e') | Some('E')) {
            self.bump();
            literal.push('e');
            if let Some(sign @ ('-' | '+')) = self.peek() {
                self.bump();
                literal.push(sign);
            }
            literal.push_str(&self.digit_run(10)?);
            is_float = true;
        }

        if is_float {
            let x: f64 = literal.parse().map_err(|_| ParseError::Syntax)?;
            if x.is_infinite() {
                return Err(ParseError::Invalid(format!(
                    "float `{}` is out of range",
                    literal
                )));
            }
            Ok(Value::Number(Number::Float(x)))
        } else {
            literal
                .parse::<i64>()
                .map(|n| Value::Number(Number::Int(n)))
                .map_err(|_| {
                    ParseError::Invalid(format!("integer `{}` does not fit in 64 bits", literal))
                })
        }
    }

    /// Digits in `radix`, with `_` allowed only between two digits.
    fn digit_run(&mut self, radix: u32) -> ParseResult<String> {
        let mut digits = String::new();
        loop {
            match self.peek() {
                Some(c) if c.is_digit(radix) => {
                    digits.push(c);
                    self.bump();
                }
                Some('_') if !digits.is_empty() => {
                    self.bump();
                    if !self.peek().is_some_and(|c| c.is_digit(radix)) {
                        return Err(ParseError::Syntax);
                    }
                }
                _ => break,
            }
        }
        if digits.is_empty() {
            Err(ParseError::Syntax)
        } else {
            Ok(digits)
        }
    }
}

fn is_ident_start(c: char) -> bool {
    c.is_alphabetic() || c == '_'
}

fn is_ident_continue(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

#[cfg(test)]
mod tests {
    use super::*;

    fn eval(cell: &str) -> Value {
        evaluate(cell, &CellSite::row(cell)).unwrap()
    }

    #[test]
    fn test_digit_groups() {
        assert_eq!(eval("1_2_3"), Value::from(123));
        assert_eq!(eval("1_000_000"), Value::from(1_000_000));
        assert_eq!(eval("-42"), Value::from(-42));
        assert_eq!(eval("1__2"), Value::Raw("1__2".into()));
        assert_eq!(eval("12_"), Value::Raw("12_".into()));
    }

    #[test]
    fn test_floats_and_radix() {
        assert_eq!(eval("3.5"), Value::from(3.5));
        assert_eq!(eval("1e3"), Value::from(1000.0));
        assert_eq!(eval("2.5E-1"), Value::from(0.25));
        assert_eq!(eval("0xff"), Value::from(255));
        assert_eq!(eval("0b1010"), Value::from(10));
        assert_eq!(eval("1."), Value::Raw("1.".into()));
    }

    #[test]
    fn test_strings_and_symbols() {
        assert_eq!(eval("\"abc\""), Value::from("abc"));
        assert_eq!(eval("\"a \\\"q\\\"\""), Value::from("a \"q\""));
        assert_eq!(eval(":ok"), Value::Symbol("ok".into()));
        assert_eq!(eval(":\"two words\""), Value::Symbol("two words".into()));
        assert_eq!(eval(":valid?"), Value::Symbol("valid?".into()));
    }

    #[test]
    fn test_keywords_and_empty() {
        assert_eq!(eval("true"), Value::Bool(true));
        assert_eq!(eval("false"), Value::Bool(false));
        assert_eq!(eval("nil"), Value::Nil);
        assert_eq!(eval("   "), Value::Nil);
    }

    #[test]
    fn test_nested_collections() {
        let value = eval("[1, [:a, \"b\"], %{x: nil}]");
        let Value::List(items) = value else {
            panic!("expected list");
        };
        assert_eq!(items.len(), 3);
        assert_eq!(items[1], Value::List(vec![Value::Symbol("a".into()), Value::from("b")]));

        let Value::Map(map) = &items[2] else {
            panic!("expected map");
        };
        assert_eq!(map.get("x"), Some(&Value::Nil));

        let arrow = eval("%{:a => 1, :b => 2,}");
        let short = eval("%{b: 2, a: 1}");
        assert_eq!(arrow, short);
        assert_eq!(eval("[]"), Value::List(vec![]));
    }

    #[test]
    fn test_fallback_to_raw() {
        assert_eq!(eval("not valid!!"), Value::Raw("not valid!!".into()));
        assert_eq!(eval("  Alice  "), Value::Raw("Alice".into()));
        assert_eq!(eval("\"unterminated"), Value::Raw("\"unterminated".into()));
        assert_eq!(eval("[1, 2"), Value::Raw("[1, 2".into()));
        assert_eq!(eval("1 + 2"), Value::Raw("1 + 2".into()));
    }

    #[test]
    fn test_deep_nesting_falls_back_to_raw() {
        let nested = |n: usize| format!("{}{}", "[".repeat(n), "]".repeat(n));

        assert!(matches!(eval(&nested(MAX_NESTING)), Value::List(_)));

        let too_deep = nested(MAX_NESTING + 1);
        assert_eq!(eval(&too_deep), Value::Raw(too_deep.clone()));

        let huge = nested(50_000);
        assert_eq!(eval(&huge), Value::Raw(huge.clone()));

        let maps = format!("{}1{}", "%{a: ".repeat(MAX_NESTING + 1), "}".repeat(MAX_NESTING + 1));
        assert_eq!(eval(&maps), Value::Raw(maps.clone()));
    }

    #[test]
    fn test_unrepresentable_literals_are_errors() {
        let site = CellSite {
            row: "| 99999999999999999999 |",
            file: None,
            line: Some(3),
        };
        let err = evaluate("99999999999999999999", &site).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("99999999999999999999"));
        assert!(msg.contains("line 3"));

        assert!(evaluate("1e999", &site).is_err());
        assert!(evaluate("%{a: 1, a: 2}", &site).is_err());
    }
}
