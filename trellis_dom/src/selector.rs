// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A small selector engine for element queries.
//!
//! Only compound selectors are supported: a type or universal selector followed
//! by any number of `#id`, `.class`, `[attr]`, `[attr="value"]` and
//! `:not(...)` parts, with comma-separated alternatives. Combinators
//! (descendant, child, sibling) are rejected at parse time; queries are always
//! scoped to a container, which covers what the primitives need.

use core::fmt;
use core::str::FromStr;

use smallvec::SmallVec;

use crate::document::Document;
use crate::error::ConfigError;
use crate::types::ElementId;

/// The query used to collect keyboard-focusable elements inside a container.
pub const FOCUSABLE_SELECTOR: &str = "a[href], area[href], button:not([disabled]), \
input:not([disabled]):not([type=\"hidden\"]), select:not([disabled]), \
textarea:not([disabled]), [tabindex]:not([tabindex=\"-1\"]), [contenteditable=\"true\"]";

/// A parsed selector list.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Selector {
    source: String,
    alternatives: SmallVec<[Compound; 2]>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
struct Compound {
    tag: Option<String>,
    parts: Vec<Part>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
enum Part {
    Id(String),
    Class(String),
    HasAttr(String),
    AttrEq(String, String),
    Not(Compound),
}

impl Selector {
    /// Parse a selector list.
    pub fn parse(source: &str) -> Result<Self, ConfigError> {
        let mut parser = Parser {
            source,
            bytes: source.as_bytes(),
            pos: 0,
        };
        let mut alternatives = SmallVec::new();
        loop {
            parser.skip_ws();
            alternatives.push(parser.compound()?);
            parser.skip_ws();
            match parser.peek() {
                None => break,
                Some(b',') => parser.pos += 1,
                Some(_) => return Err(parser.error("combinators are not supported")),
            }
        }
        Ok(Self {
            source: source.to_owned(),
            alternatives,
        })
    }

    /// The shared focusable-element query ([`FOCUSABLE_SELECTOR`]).
    pub fn focusable() -> Self {
        Self::parse(FOCUSABLE_SELECTOR).expect("focusable selector is well-formed")
    }

    /// The text this selector was parsed from.
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Returns true if the element matches any alternative.
    ///
    /// Stale ids never match.
    pub fn matches(&self, doc: &Document, id: ElementId) -> bool {
        doc.is_alive(id) && self.alternatives.iter().any(|c| c.matches(doc, id))
    }
}

impl FromStr for Selector {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

impl Compound {
    fn matches(&self, doc: &Document, id: ElementId) -> bool {
        if let Some(tag) = &self.tag
            && doc.tag(id) != Some(tag.as_str())
        {
            return false;
        }
        self.parts.iter().all(|part| match part {
            Part::Id(v) => doc.attribute(id, "id") == Some(v.as_str()),
            Part::Class(v) => doc
                .attribute(id, "class")
                .is_some_and(|c| c.split_ascii_whitespace().any(|c| c == v)),
            Part::HasAttr(name) => doc.attribute(id, name).is_some(),
            Part::AttrEq(name, v) => doc.attribute(id, name) == Some(v.as_str()),
            Part::Not(inner) => !inner.matches(doc, id),
        })
    }
}

struct Parser<'a> {
    source: &'a str,
    bytes: &'a [u8],
    pos: usize,
}

impl Parser<'_> {
    fn error(&self, reason: &'static str) -> ConfigError {
        ConfigError::InvalidSelector {
            selector: self.source.to_owned(),
            reason,
        }
    }

    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    fn eat(&mut self, b: u8) -> bool {
        if self.peek() == Some(b) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn skip_ws(&mut self) {
        while self.peek().is_some_and(|b| b.is_ascii_whitespace()) {
            self.pos += 1;
        }
    }

    fn ident(&mut self) -> Result<String, ConfigError> {
        let start = self.pos;
        while self
            .peek()
            .is_some_and(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_')
        {
            self.pos += 1;
        }
        if start == self.pos {
            return Err(self.error("expected an identifier"));
        }
        Ok(self.source[start..self.pos].to_ascii_lowercase())
    }

    fn value(&mut self) -> Result<String, ConfigError> {
        match self.peek() {
            Some(quote @ (b'"' | b'\'')) => {
                self.pos += 1;
                let start = self.pos;
                while self.peek().is_some_and(|b| b != quote) {
                    self.pos += 1;
                }
                if !self.eat(quote) {
                    return Err(self.error("unterminated string"));
                }
                Ok(self.source[start..self.pos - 1].to_owned())
            }
            _ => {
                let start = self.pos;
                while self
                    .peek()
                    .is_some_and(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_')
                {
                    self.pos += 1;
                }
                if start == self.pos {
                    return Err(self.error("expected an attribute value"));
                }
                Ok(self.source[start..self.pos].to_owned())
            }
        }
    }

    fn compound(&mut self) -> Result<Compound, ConfigError> {
        let mut compound = Compound {
            tag: None,
            parts: Vec::new(),
        };
        let mut saw_anything = false;
        if self.eat(b'*') {
            saw_anything = true;
        } else if self.peek().is_some_and(|b| b.is_ascii_alphabetic()) {
            compound.tag = Some(self.ident()?);
            saw_anything = true;
        }
        loop {
            match self.peek() {
                Some(b'#') => {
                    self.pos += 1;
                    compound.parts.push(Part::Id(self.ident()?));
                }
                Some(b'.') => {
                    self.pos += 1;
                    compound.parts.push(Part::Class(self.ident()?));
                }
                Some(b'[') => {
                    self.pos += 1;
                    self.skip_ws();
                    let name = self.ident()?;
                    self.skip_ws();
                    if self.eat(b'=') {
                        self.skip_ws();
                        let value = self.value()?;
                        self.skip_ws();
                        compound.parts.push(Part::AttrEq(name, value));
                    } else {
                        compound.parts.push(Part::HasAttr(name));
                    }
                    if !self.eat(b']') {
                        return Err(self.error("expected `]`"));
                    }
                }
                Some(b':') => {
                    if !self.source[self.pos..].starts_with(":not(") {
                        return Err(self.error("only the :not() pseudo-class is supported"));
                    }
                    self.pos += ":not(".len();
                    self.skip_ws();
                    let inner = self.compound()?;
                    self.skip_ws();
                    if !self.eat(b')') {
                        return Err(self.error("expected `)`"));
                    }
                    compound.parts.push(Part::Not(inner));
                }
                _ => break,
            }
            saw_anything = true;
        }
        if !saw_anything {
            return Err(self.error("empty selector"));
        }
        Ok(compound)
    }
}
