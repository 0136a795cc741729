//! Go type-expression parser.
//!
//! Handles the type syntax that appears in method signatures: pointers,
//! slices, arrays, maps, channels, function types, qualified and local named
//! types, and anonymous `interface{...}` / `struct{...}` literals (kept as
//! opaque predeclared text). Generic instantiations are not supported.

use std::collections::HashMap;

use thiserror::Error;

use crate::model::{ChanDir, FuncType, Parameter, Type};

/// Error while parsing a type expression or parameter list.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("unexpected end of type expression in `{0}`")]
    UnexpectedEnd(String),

    #[error("unexpected `{found}` at offset {pos} in `{src}`")]
    Unexpected { found: char, pos: usize, src: String },

    #[error("unsupported type expression `{0}`")]
    Unsupported(String),

    #[error("variadic parameter must be last in `{0}`")]
    MisplacedVariadic(String),
}

/// Builtin type names.
const PREDECLARED: &[&str] = &[
    "any", "bool", "byte", "comparable", "complex64", "complex128", "error", "float32",
    "float64", "int", "int8", "int16", "int32", "int64", "rune", "string", "uint", "uint8",
    "uint16", "uint32", "uint64", "uintptr",
];

/// Keywords that start a type rather than name a parameter.
const TYPE_KEYWORDS: &[&str] = &["chan", "func", "interface", "map", "struct"];

/// A parsed parameter list: fixed parameters plus an optional trailing variadic.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParamList {
    pub params: Vec<Parameter>,
    pub variadic: Option<Parameter>,
}

/// Parses type expressions, resolving package qualifiers through an import table.
pub struct TypeParser<'a> {
    /// Qualifier (alias or last path element) -> import path
    imports: &'a HashMap<String, String>,
}

impl<'a> TypeParser<'a> {
    pub fn new(imports: &'a HashMap<String, String>) -> Self {
        TypeParser { imports }
    }

    /// Parse a complete type expression.
    pub fn parse_type(&self, src: &str) -> Result<Type, ParseError> {
        let mut cursor = Cursor::new(src);
        let ty = self.parse_at(&mut cursor)?;
        cursor.skip_ws();
        if let Some(c) = cursor.peek() {
            return Err(cursor.unexpected(c));
        }
        Ok(ty)
    }

    /// Parse the inside of a parenthesised parameter list (without the parens).
    ///
    /// Accepts both the named form (`a, b int, c ...string`) and the
    /// unnamed form (`int, ...string`).
    pub fn parse_params(&self, src: &str) -> Result<ParamList, ParseError> {
        let pieces: Vec<&str> = split_top_level(src, ',')
            .into_iter()
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .collect();

        let named = pieces.iter().any(|p| split_name(p).is_some());

        let mut entries: Vec<(String, &str)> = Vec::new();
        if named {
            let mut pending: Vec<String> = Vec::new();
            for piece in &pieces {
                match split_name(piece) {
                    Some((name, ty)) => {
                        for n in pending.drain(..) {
                            entries.push((n, ty));
                        }
                        entries.push((name.to_string(), ty));
                    }
                    None => pending.push(piece.to_string()),
                }
            }
            if !pending.is_empty() {
                return Err(ParseError::Unsupported(src.trim().to_string()));
            }
        } else {
            entries.extend(pieces.iter().map(|p| (String::new(), *p)));
        }

        let mut list = ParamList::default();
        let count = entries.len();
        for (i, (name, ty_src)) in entries.into_iter().enumerate() {
            if let Some(elem) = ty_src.trim_start().strip_prefix("...") {
                if i + 1 != count {
                    return Err(ParseError::MisplacedVariadic(src.trim().to_string()));
                }
                list.variadic = Some(Parameter::new(name, self.parse_type(elem)?));
            } else {
                list.params.push(Parameter::new(name, self.parse_type(ty_src)?));
            }
        }
        Ok(list)
    }

    /// Parse a result clause: empty, a single type, or a parenthesised list.
    pub fn parse_results(&self, src: &str) -> Result<Vec<Parameter>, ParseError> {
        let src = src.trim();
        if src.is_empty() {
            return Ok(Vec::new());
        }
        if src.starts_with('(') {
            if let Some(close) = matching_close(src, 0) {
                if close == src.len() - 1 {
                    let list = self.parse_params(&src[1..close])?;
                    if list.variadic.is_some() {
                        return Err(ParseError::Unsupported(src.to_string()));
                    }
                    return Ok(list.params);
                }
            }
        }
        Ok(vec![Parameter::unnamed(self.parse_type(src)?)])
    }

    fn parse_at(&self, c: &mut Cursor<'_>) -> Result<Type, ParseError> {
        c.skip_ws();
        let Some(ch) = c.peek() else {
            return Err(ParseError::UnexpectedEnd(c.src.to_string()));
        };

        match ch {
            '*' => {
                c.bump(1);
                Ok(Type::pointer(self.parse_at(c)?))
            }
            '(' => {
                c.bump(1);
                let inner = self.parse_at(c)?;
                c.expect(')')?;
                Ok(inner)
            }
            '[' => {
                c.bump(1);
                c.skip_ws();
                if c.eat(']') {
                    return Ok(Type::slice(self.parse_at(c)?));
                }
                let len_src = c.take_until(']')?;
                let len: i64 = len_src
                    .trim()
                    .parse()
                    .map_err(|_| ParseError::Unsupported(format!("[{}]", len_src.trim())))?;
                Ok(Type::array(len, self.parse_at(c)?))
            }
            '<' => {
                if !c.eat_str("<-") {
                    return Err(c.unexpected(ch));
                }
                c.skip_ws();
                if !c.eat_keyword("chan") {
                    return Err(ParseError::Unsupported(c.src.to_string()));
                }
                Ok(Type::chan(ChanDir::Recv, self.parse_at(c)?))
            }
            _ if is_ident_start(ch) => self.parse_word(c),
            _ => Err(c.unexpected(ch)),
        }
    }

    fn parse_word(&self, c: &mut Cursor<'_>) -> Result<Type, ParseError> {
        if c.eat_keyword("chan") {
            c.skip_ws();
            let dir = if c.eat_str("<-") {
                ChanDir::Send
            } else {
                ChanDir::Both
            };
            return Ok(Type::chan(dir, self.parse_at(c)?));
        }
        if c.eat_keyword("map") {
            c.skip_ws();
            c.expect('[')?;
            let key = self.parse_at(c)?;
            c.expect(']')?;
            let value = self.parse_at(c)?;
            return Ok(Type::map(key, value));
        }
        if c.eat_keyword("func") {
            return self.parse_func(c);
        }
        for literal in ["interface", "struct"] {
            if c.eat_keyword(literal) {
                c.skip_ws();
                let body = c.take_balanced('{', '}')?;
                let inner: Vec<&str> = body.split_whitespace().collect();
                if inner.is_empty() {
                    return Ok(Type::predeclared(format!("{}{{}}", literal)));
                }
                return Ok(Type::predeclared(format!("{}{{ {} }}", literal, inner.join(" "))));
            }
        }

        let ident = c.take_ident();
        if c.peek() == Some('.') {
            c.bump(1);
            let name = c.take_ident();
            if name.is_empty() {
                return Err(ParseError::UnexpectedEnd(c.src.to_string()));
            }
            let package = self
                .imports
                .get(ident)
                .cloned()
                .unwrap_or_else(|| ident.to_string());
            self.reject_type_args(c)?;
            return Ok(Type::named(package, name));
        }

        self.reject_type_args(c)?;
        if PREDECLARED.contains(&ident) {
            Ok(Type::predeclared(ident))
        } else {
            Ok(Type::named("", ident))
        }
    }

    fn parse_func(&self, c: &mut Cursor<'_>) -> Result<Type, ParseError> {
        c.skip_ws();
        let params_src = c.take_balanced('(', ')')?;
        let params = self.parse_params(params_src)?;

        // Results follow on the same expression if something type-like does.
        let save = c.pos;
        c.skip_ws();
        let results = match c.peek() {
            Some('(') => {
                let results_src = c.take_balanced('(', ')')?;
                self.parse_params(results_src)?.params
            }
            Some(ch) if is_ident_start(ch) || matches!(ch, '*' | '[' | '<') => {
                vec![Parameter::unnamed(self.parse_at(c)?)]
            }
            _ => {
                c.pos = save;
                Vec::new()
            }
        };

        Ok(Type::func(FuncType {
            params: params.params.into_iter().map(|p| p.ty).collect(),
            results: results.into_iter().map(|p| p.ty).collect(),
            variadic: params.variadic.map(|p| p.ty),
        }))
    }

    fn reject_type_args(&self, c: &mut Cursor<'_>) -> Result<(), ParseError> {
        // `Name[T]` directly after a named type is an instantiation.
        if c.peek() == Some('[') {
            return Err(ParseError::Unsupported(c.src.to_string()));
        }
        Ok(())
    }
}

/// Split `name Type` into its parts; `None` when the piece is only a type
/// (or only a name).
fn split_name(piece: &str) -> Option<(&str, &str)> {
    let piece = piece.trim();
    let end = piece
        .char_indices()
        .find(|&(_, c)| !is_ident_char(c))
        .map(|(i, _)| i)
        .unwrap_or(piece.len());
    let head = &piece[..end];
    let rest = &piece[end..];

    if head.is_empty() || TYPE_KEYWORDS.contains(&head) {
        return None;
    }
    if !rest.starts_with(char::is_whitespace) {
        return None;
    }
    let rest = rest.trim_start();
    if rest.is_empty() {
        return None;
    }
    Some((head, rest))
}

/// Split on `sep` where it is not nested inside brackets.
pub fn split_top_level(src: &str, sep: char) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0i32;
    let mut start = 0;
    for (i, c) in src.char_indices() {
        match c {
            '(' | '[' | '{' => depth += 1,
            ')' | ']' | '}' => depth -= 1,
            c if c == sep && depth == 0 => {
                parts.push(&src[start..i]);
                start = i + c.len_utf8();
            }
            _ => {}
        }
    }
    parts.push(&src[start..]);
    parts
}

/// Index of the bracket closing the one at `open`.
pub fn matching_close(src: &str, open: usize) -> Option<usize> {
    let mut depth = 0i32;
    for (i, c) in src[open..].char_indices() {
        match c {
            '(' | '[' | '{' => depth += 1,
            ')' | ']' | '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(open + i);
                }
            }
            _ => {}
        }
    }
    None
}

fn is_ident_start(c: char) -> bool {
    c.is_alphabetic() || c == '_'
}

fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

struct Cursor<'s> {
    src: &'s str,
    pos: usize,
}

impl<'s> Cursor<'s> {
    fn new(src: &'s str) -> Self {
        Cursor { src, pos: 0 }
    }

    fn rest(&self) -> &'s str {
        &self.src[self.pos..]
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn bump(&mut self, bytes: usize) {
        self.pos += bytes;
    }

    fn skip_ws(&mut self) {
        let trimmed = self.rest().trim_start();
        self.pos = self.src.len() - trimmed.len();
    }

    fn eat(&mut self, c: char) -> bool {
        if self.peek() == Some(c) {
            self.bump(c.len_utf8());
            true
        } else {
            false
        }
    }

    fn eat_str(&mut self, s: &str) -> bool {
        if self.rest().starts_with(s) {
            self.bump(s.len());
            true
        } else {
            false
        }
    }

    /// Consume `word` only if it is not the prefix of a longer identifier.
    fn eat_keyword(&mut self, word: &str) -> bool {
        let rest = self.rest();
        if !rest.starts_with(word) {
            return false;
        }
        if rest[word.len()..].chars().next().is_some_and(is_ident_char) {
            return false;
        }
        self.bump(word.len());
        true
    }

    fn expect(&mut self, c: char) -> Result<(), ParseError> {
        self.skip_ws();
        match self.peek() {
            Some(found) if found == c => {
                self.bump(c.len_utf8());
                Ok(())
            }
            Some(found) => Err(self.unexpected(found)),
            None => Err(ParseError::UnexpectedEnd(self.src.to_string())),
        }
    }

    fn take_ident(&mut self) -> &'s str {
        let rest = self.rest();
        let end = rest
            .char_indices()
            .find(|&(_, c)| !is_ident_char(c))
            .map(|(i, _)| i)
            .unwrap_or(rest.len());
        self.bump(end);
        &rest[..end]
    }

    /// Take everything up to (not including) `close`, then consume `close`.
    fn take_until(&mut self, close: char) -> Result<&'s str, ParseError> {
        let rest = self.rest();
        match rest.find(close) {
            Some(i) => {
                self.bump(i + close.len_utf8());
                Ok(&rest[..i])
            }
            None => Err(ParseError::UnexpectedEnd(self.src.to_string())),
        }
    }

    /// Consume a bracketed group and return its inside.
    fn take_balanced(&mut self, open: char, close: char) -> Result<&'s str, ParseError> {
        match self.peek() {
            Some(c) if c == open => {}
            Some(c) => return Err(self.unexpected(c)),
            None => return Err(ParseError::UnexpectedEnd(self.src.to_string())),
        }
        let rest = self.rest();
        let end = matching_close(rest, 0)
            .ok_or_else(|| ParseError::UnexpectedEnd(self.src.to_string()))?;
        if !rest[end..].starts_with(close) {
            return Err(self.unexpected(rest[end..].chars().next().unwrap_or(close)));
        }
        self.bump(end + close.len_utf8());
        Ok(&rest[open.len_utf8()..end])
    }

    fn unexpected(&self, found: char) -> ParseError {
        ParseError::Unexpected {
            found,
            pos: self.pos,
            src: self.src.to_string(),
        }
    }
}
