//! Schema Parser: parses a `schema:` line into a `Type::Object` AST.
//!
//! A `Peekable<Chars>` walked by hand rather than a generated grammar, since
//! the structure here is small and fully recursive-descent by nature.

use std::collections::HashSet;
use std::iter::Peekable;
use std::str::Chars;

use crate::charset::{self, ARRAY_END, ARRAY_START, ENUM_PIPE, ESCAPE, FIELD_DELIM, OBJECT_END, OBJECT_START};
use crate::error::{ErrorKind, LineStructError};
use crate::schema::types::{Field, Primitive, Type};

const SCHEMA_PREFIX: &str = "schema:";

/// Parse a full `schema:` line into the root `Type::Object`.
pub fn parse_schema_line(line: &str) -> Result<Type, LineStructError> {
    let body = line.strip_prefix(SCHEMA_PREFIX).ok_or_else(|| {
        LineStructError::new(
            ErrorKind::HeaderMissing,
            "expected a line starting with 'schema:'",
        )
    })?;

    let mut p = SchemaParser::new(body);
    let fields = p.parse_field_list(&[])?;
    p.expect_exhausted()?;
    if fields.is_empty() {
        return Err(p.err_here("schema must declare at least one field"));
    }
    Ok(Type::Object(fields))
}

/// Parse a standalone field list (no `"schema:"` prefix) into a
/// `Type::Object`, accepting the external-schema-reader-only primitive
/// aliases: `integer`→`int`, `str`/`text`→`string`, `double`/`decimal`→
/// `float`, `boolean`→`bool`.
pub fn parse_external_schema(text: &str) -> Result<Type, LineStructError> {
    let mut p = SchemaParser::with_aliases(text);
    let fields = p.parse_field_list(&[])?;
    p.expect_exhausted()?;
    if fields.is_empty() {
        return Err(p.err_here("external schema must declare at least one field"));
    }
    Ok(Type::Object(fields))
}

struct SchemaParser<'a> {
    chars: Peekable<Chars<'a>>,
    pos: usize,
    allow_aliases: bool,
}

impl<'a> SchemaParser<'a> {
    fn new(s: &'a str) -> Self {
        Self {
            chars: s.chars().peekable(),
            pos: 0,
            allow_aliases: false,
        }
    }

    fn with_aliases(s: &'a str) -> Self {
        Self {
            chars: s.chars().peekable(),
            pos: 0,
            allow_aliases: true,
        }
    }

    fn err_here(&self, msg: impl Into<String>) -> LineStructError {
        LineStructError::new(ErrorKind::SchemaSyntax, msg).with_column(self.pos)
    }

    fn peek(&mut self) -> Option<char> {
        self.chars.peek().copied()
    }

    fn advance(&mut self) -> Option<char> {
        let c = self.chars.next();
        if c.is_some() {
            self.pos += 1;
        }
        c
    }

    fn expect(&mut self, expected: char) -> Result<(), LineStructError> {
        match self.advance() {
            Some(c) if c == expected => Ok(()),
            Some(c) => Err(self.err_here(format!("expected '{expected}', found '{c}'"))),
            None => Err(self.err_here(format!("expected '{expected}', found end of input"))),
        }
    }

    fn expect_exhausted(&mut self) -> Result<(), LineStructError> {
        match self.peek() {
            None => Ok(()),
            Some(c) => Err(self.err_here(format!("unexpected trailing input starting with '{c}'"))),
        }
    }

    /// `FieldList := Field ("¦" Field)*`, stopping at end-of-input or when
    /// the next char is one of `terminators` (used when parsing a nested
    /// Object's field list, which stops at `›`).
    fn parse_field_list(&mut self, terminators: &[char]) -> Result<Vec<Field>, LineStructError> {
        let mut fields = Vec::new();
        let mut names = HashSet::new();
        loop {
            let field = self.parse_field()?;
            if !names.insert(field.name.clone()) {
                return Err(self.err_here(format!("duplicate field name '{}'", field.name)));
            }
            fields.push(field);
            match self.peek() {
                Some(FIELD_DELIM) => {
                    self.advance();
                }
                Some(c) if terminators.contains(&c) => break,
                None => break,
                Some(c) => return Err(self.err_here(format!("unexpected '{c}' after field"))),
            }
        }
        Ok(fields)
    }

    /// `Field := Ident ":" Type ("@desc=\"" DescChars "\"")?`
    fn parse_field(&mut self) -> Result<Field, LineStructError> {
        let name = self.parse_ident()?;
        self.expect(':')?;
        let (type_, optional) = self.parse_field_type()?;
        let description = self.parse_optional_description()?;
        Ok(Field {
            name,
            type_,
            optional,
            description,
        })
    }

    fn parse_ident(&mut self) -> Result<String, LineStructError> {
        let mut s = String::new();
        match self.peek() {
            Some(c) if c.is_ascii_alphabetic() || c == '_' => {
                s.push(c);
                self.advance();
            }
            _ => return Err(self.err_here("expected an identifier")),
        }
        while let Some(c) = self.peek() {
            if c.is_ascii_alphanumeric() || c == '_' {
                s.push(c);
                self.advance();
            } else {
                break;
            }
        }
        Ok(s)
    }

    /// `Type := Optional | Array | Object | Enum | Primitive`
    ///
    /// `Optional := "<" InnerType ">?" | InnerType "?"`. Returns the inner
    /// type plus whether the field slot is optional. The `<...>` form is
    /// purely a rendering/spelling choice — both spellings are accepted on
    /// input and produce an identical AST.
    fn parse_field_type(&mut self) -> Result<(Type, bool), LineStructError> {
        if self.peek() == Some('<') {
            self.advance();
            let inner = self.parse_inner_type()?;
            self.expect('>')?;
            self.expect('?')?;
            Ok((inner, true))
        } else {
            let inner = self.parse_inner_type()?;
            if self.peek() == Some('?') {
                self.advance();
                Ok((inner, true))
            } else {
                Ok((inner, false))
            }
        }
    }

    /// `InnerType := Array | Object | Enum | Primitive`
    fn parse_inner_type(&mut self) -> Result<Type, LineStructError> {
        match self.peek() {
            Some(ARRAY_START) => self.parse_array(),
            Some(OBJECT_START) => self.parse_object(),
            Some('{') => self.parse_enum(),
            _ => self.parse_primitive(),
        }
    }

    /// `Array := "«" Type "»"`. The element position is an `InnerType`, not
    /// a full `Type` — array elements have no field-level optional marker,
    /// since optionality attaches to a field slot and an array element is
    /// not a field slot.
    fn parse_array(&mut self) -> Result<Type, LineStructError> {
        self.expect(ARRAY_START)?;
        let elem = self.parse_inner_type()?;
        self.expect(ARRAY_END)?;
        Ok(Type::Array(Box::new(elem)))
    }

    /// `Object := "‹" FieldList "›"`
    fn parse_object(&mut self) -> Result<Type, LineStructError> {
        self.expect(OBJECT_START)?;
        let fields = self.parse_field_list(&[OBJECT_END])?;
        self.expect(OBJECT_END)?;
        if fields.is_empty() {
            return Err(self.err_here("object type must declare at least one field"));
        }
        Ok(Type::Object(fields))
    }

    /// `Enum := "{" EnumVal ("|" EnumVal)* "}"`. Values are unescaped and
    /// stored that way; enum membership is compared post-unescape.
    fn parse_enum(&mut self) -> Result<Type, LineStructError> {
        self.expect('{')?;
        let mut values = Vec::new();
        loop {
            let raw = self.scan_enum_value()?;
            values.push(charset::unescape(&raw));
            match self.advance() {
                Some(ENUM_PIPE) => continue,
                Some('}') => break,
                Some(c) => return Err(self.err_here(format!("unexpected '{c}' in enum"))),
                None => return Err(self.err_here("unterminated enum (missing '}')")),
            }
        }
        if values.is_empty() {
            return Err(self.err_here("enum must declare at least one value"));
        }
        Ok(Type::Enum(values))
    }

    /// Raw (still-escaped) text of one enum alternative, up to the next
    /// unescaped `|` or `}`.
    fn scan_enum_value(&mut self) -> Result<String, LineStructError> {
        let mut s = String::new();
        loop {
            match self.peek() {
                Some(ESCAPE) => {
                    s.push(self.advance().unwrap());
                    if let Some(c) = self.advance() {
                        s.push(c);
                    }
                }
                Some(ENUM_PIPE) | Some('}') => break,
                Some(_) => s.push(self.advance().unwrap()),
                None => return Err(self.err_here("unterminated enum (missing '}')")),
            }
        }
        Ok(s)
    }

    fn parse_primitive(&mut self) -> Result<Type, LineStructError> {
        let mut s = String::new();
        while let Some(c) = self.peek() {
            if c.is_ascii_alphabetic() {
                s.push(c);
                self.advance();
            } else {
                break;
            }
        }
        let keyword = if self.allow_aliases { resolve_primitive_alias(&s) } else { s.as_str() };
        Primitive::from_keyword(keyword)
            .map(Type::Primitive)
            .ok_or_else(|| self.err_here(format!("unknown primitive type '{s}'")))
    }

    /// `("@desc=\"" DescChars "\"")?`
    fn parse_optional_description(&mut self) -> Result<Option<String>, LineStructError> {
        const MARKER: &str = "@desc=\"";
        if !self.remaining_starts_with(MARKER) {
            return Ok(None);
        }
        for _ in 0..MARKER.chars().count() {
            self.advance();
        }
        let mut raw = String::new();
        loop {
            match self.advance() {
                Some(ESCAPE) => {
                    raw.push(ESCAPE);
                    if let Some(c) = self.advance() {
                        raw.push(c);
                    }
                }
                Some('"') => break,
                Some(c) => raw.push(c),
                None => return Err(self.err_here("unterminated @desc (missing closing '\"')")),
            }
        }
        Ok(Some(charset::unescape(&raw)))
    }

    fn remaining_starts_with(&self, marker: &str) -> bool {
        let mut clone = self.chars.clone();
        for expected in marker.chars() {
            match clone.next() {
                Some(c) if c == expected => continue,
                _ => return false,
            }
        }
        true
    }
}

/// Aliases accepted only when reading an external schema's text.
fn resolve_primitive_alias(s: &str) -> &str {
    match s {
        "integer" => "int",
        "str" | "text" => "string",
        "double" | "decimal" => "float",
        "boolean" => "bool",
        other => other,
    }
}
