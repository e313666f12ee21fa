//! Scanner for CSS text with embedded expressions, e.g.
//!
//! ```css
//! color: ${color};
//! @media screen {
//!   :hover { color: red; }
//! }
//! ```

use crate::errors::CssPropError;
use crate::expression::{ExpressionNode, TemplatePart};
use crate::properties::kebab_case;
use crate::rule::{collapse_whitespace, Declaration, Rule, SelectorFragment};

#[derive(Clone, Copy)]
enum Piece<'a> {
  Char(char),
  Expr(&'a ExpressionNode),
}

enum Chunk<'a> {
  Text(String),
  Expr(&'a ExpressionNode),
}

#[derive(Debug, PartialEq)]
enum Terminator {
  OpenBlock,
  Semicolon,
  CloseBlock,
  End,
}

/// Text read up to the next top-level `{`, `;` or `}`.
#[derive(Default)]
struct Segment<'a> {
  chunks: Vec<Chunk<'a>>,
}

impl<'a> Segment<'a> {
  fn push_char(&mut self, ch: char) {
    if let Some(Chunk::Text(text)) = self.chunks.last_mut() {
      text.push(ch);
    } else {
      self.chunks.push(Chunk::Text(ch.to_string()));
    }
  }

  fn push_expr(&mut self, expr: &'a ExpressionNode) {
    self.chunks.push(Chunk::Expr(expr));
  }

  fn has_expr(&self) -> bool {
    self
      .chunks
      .iter()
      .any(|chunk| matches!(chunk, Chunk::Expr(_)))
  }

  fn is_blank(&self) -> bool {
    self.chunks.iter().all(|chunk| match chunk {
      Chunk::Text(text) => text.trim().is_empty(),
      Chunk::Expr(_) => false,
    })
  }

  fn text(&self) -> String {
    self
      .chunks
      .iter()
      .filter_map(|chunk| match chunk {
        Chunk::Text(text) => Some(text.as_str()),
        Chunk::Expr(_) => None,
      })
      .collect()
  }

  /// The segment as authored, used in diagnostics.
  fn context(&self) -> String {
    let mut context = String::new();
    for chunk in &self.chunks {
      match chunk {
        Chunk::Text(text) => context.push_str(text),
        Chunk::Expr(expr) => context.push_str(&format!("${{{}}}", expr)),
      }
    }
    collapse_whitespace(&context)
  }

  fn into_declaration(self) -> Result<Declaration, CssPropError> {
    let context = self.context();
    let mut property = String::new();
    let mut value: Vec<TemplatePart> = Vec::new();
    let mut in_value = false;

    for chunk in self.chunks {
      match (chunk, in_value) {
        (Chunk::Text(text), false) => match text.split_once(':') {
          Some((name, rest)) => {
            property.push_str(name);
            value.push(TemplatePart::Str(rest.to_string()));
            in_value = true;
          }
          None => property.push_str(&text),
        },
        (Chunk::Expr(_), false) => {
          return Err(CssPropError::malformed(
            "embedded expression outside of a declaration value",
            context,
          ));
        }
        (Chunk::Text(text), true) => value.push(TemplatePart::Str(text)),
        (Chunk::Expr(expr), true) => value.push(TemplatePart::Expr(expr.clone())),
      }
    }

    if !in_value {
      return Err(CssPropError::malformed(
        "declaration is missing a `:` between property and value",
        context,
      ));
    }

    let property = property.trim();
    if property.is_empty() {
      return Err(CssPropError::malformed(
        "declaration is missing its property",
        context,
      ));
    }

    let value = trim_template(value);
    let value = match value.as_slice() {
      [] => {
        return Err(CssPropError::malformed(
          format!("declaration `{}` has no value", property),
          context,
        ));
      }
      [TemplatePart::Str(text)] => ExpressionNode::string(text.clone()),
      _ => ExpressionNode::TemplateConcat(value),
    };

    Ok(Declaration::new(kebab_case(property), value))
  }
}

fn trim_template(mut parts: Vec<TemplatePart>) -> Vec<TemplatePart> {
  if let Some(TemplatePart::Str(text)) = parts.first_mut() {
    *text = text.trim_start().to_string();
  }
  if let Some(TemplatePart::Str(text)) = parts.last_mut() {
    *text = text.trim_end().to_string();
  }
  parts.retain(|part| !matches!(part, TemplatePart::Str(text) if text.is_empty()));
  parts
}

struct Scanner<'a> {
  pieces: Vec<Piece<'a>>,
  position: usize,
}

impl<'a> Scanner<'a> {
  fn new(parts: &'a [TemplatePart]) -> Self {
    let mut pieces = Vec::new();
    for part in parts {
      match part {
        TemplatePart::Str(text) => pieces.extend(text.chars().map(Piece::Char)),
        TemplatePart::Expr(expr) => pieces.push(Piece::Expr(expr)),
      }
    }
    Self {
      pieces,
      position: 0,
    }
  }

  fn peek(&self) -> Option<Piece<'a>> {
    self.pieces.get(self.position).copied()
  }

  fn peek_char_at(&self, offset: usize) -> Option<char> {
    match self.pieces.get(self.position + offset) {
      Some(Piece::Char(ch)) => Some(*ch),
      _ => None,
    }
  }

  fn skip_comment(&mut self) -> Result<(), CssPropError> {
    let start = self.position;
    self.position += 2;
    while self.position < self.pieces.len() {
      if self.peek_char_at(0) == Some('*') && self.peek_char_at(1) == Some('/') {
        self.position += 2;
        return Ok(());
      }
      self.position += 1;
    }
    Err(CssPropError::malformed(
      "unterminated comment",
      self.excerpt(start),
    ))
  }

  fn excerpt(&self, start: usize) -> String {
    let text: String = self.pieces[start..]
      .iter()
      .take(24)
      .map(|piece| match piece {
        Piece::Char(ch) => *ch,
        Piece::Expr(_) => '$',
      })
      .collect();
    collapse_whitespace(&text)
  }

  fn read_segment(&mut self) -> Result<(Segment<'a>, Terminator), CssPropError> {
    let start = self.position;
    let mut segment = Segment::default();
    let mut parens = 0usize;
    let mut quote: Option<char> = None;

    while let Some(piece) = self.peek() {
      let ch = match piece {
        Piece::Expr(expr) => {
          segment.push_expr(expr);
          self.position += 1;
          continue;
        }
        Piece::Char(ch) => ch,
      };

      if let Some(open) = quote {
        segment.push_char(ch);
        self.position += 1;
        if ch == '\\' {
          if let Some(escaped) = self.peek_char_at(0) {
            segment.push_char(escaped);
            self.position += 1;
          }
        } else if ch == open {
          quote = None;
        }
        continue;
      }

      match ch {
        '/' if self.peek_char_at(1) == Some('*') => {
          self.skip_comment()?;
          continue;
        }
        '{' if parens == 0 => {
          self.position += 1;
          return Ok((segment, Terminator::OpenBlock));
        }
        ';' if parens == 0 => {
          self.position += 1;
          return Ok((segment, Terminator::Semicolon));
        }
        '}' if parens == 0 => return Ok((segment, Terminator::CloseBlock)),
        '"' | '\'' => quote = Some(ch),
        '(' => parens += 1,
        ')' => parens = parens.saturating_sub(1),
        _ => {}
      }
      segment.push_char(ch);
      self.position += 1;
    }

    if quote.is_some() {
      return Err(CssPropError::malformed(
        "unterminated string",
        self.excerpt(start),
      ));
    }
    if parens > 0 {
      return Err(CssPropError::malformed(
        "unbalanced parentheses",
        self.excerpt(start),
      ));
    }
    Ok((segment, Terminator::End))
  }

  fn parse_block(&mut self, rule: &mut Rule, depth: usize) -> Result<(), CssPropError> {
    loop {
      match self.peek() {
        None if depth == 0 => return Ok(()),
        None => {
          let selector = rule.fragment().map(|fragment| fragment.text().to_string());
          return Err(CssPropError::malformed(
            "unterminated block, expected `}`",
            selector.unwrap_or_default(),
          ));
        }
        Some(Piece::Char('}')) if depth == 0 => {
          return Err(CssPropError::malformed(
            "unexpected `}` without a matching `{`",
            self.excerpt(self.position),
          ));
        }
        Some(Piece::Char('}')) => {
          self.position += 1;
          return Ok(());
        }
        _ => {}
      }

      let (segment, terminator) = self.read_segment()?;

      if terminator == Terminator::OpenBlock {
        if segment.has_expr() {
          return Err(CssPropError::malformed(
            "embedded expression in a selector",
            segment.context(),
          ));
        }
        let selector = segment.text();
        if selector.trim().is_empty() {
          return Err(CssPropError::malformed("block without a selector", "{"));
        }
        let mut child = rule.child(SelectorFragment::parse(&selector));
        self.parse_block(&mut child, depth + 1)?;
        rule.children.push(child);
        continue;
      }

      if segment.is_blank() {
        continue;
      }
      if segment.text().trim_start().starts_with('@') {
        return Err(CssPropError::malformed(
          "at-rules without a block are not supported",
          segment.context(),
        ));
      }
      rule.declarations.push(segment.into_declaration()?);
    }
  }
}

/// Parses CSS text with embedded expressions into `rule`.
pub fn parse_template(parts: &[TemplatePart], rule: &mut Rule) -> Result<(), CssPropError> {
  Scanner::new(parts).parse_block(rule, 0)
}

pub fn parse_css_text(text: &str, rule: &mut Rule) -> Result<(), CssPropError> {
  parse_template(&[TemplatePart::Str(text.to_string())], rule)
}
