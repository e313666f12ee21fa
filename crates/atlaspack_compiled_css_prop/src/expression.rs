use std::fmt;

/// A literal JavaScript value.
#[derive(Clone, Debug, PartialEq)]
pub enum Literal {
  Str(String),
  Num(f64),
  Bool(bool),
  Null,
}

/// One piece of a template literal / string concatenation.
#[derive(Clone, Debug, PartialEq)]
pub enum TemplatePart {
  Str(String),
  Expr(ExpressionNode),
}

/// One step of a member access chain, `.name` or `[expr]`.
#[derive(Clone, Debug, PartialEq)]
pub enum MemberSegment {
  Named(String),
  Computed(ExpressionNode),
}

#[derive(Clone, Debug, PartialEq)]
pub enum PropertyKey {
  Ident(String),
  Str(String),
  Num(f64),
  Computed(Box<ExpressionNode>),
}

impl PropertyKey {
  /// The statically known name of this key, if any.
  pub fn static_name(&self) -> Option<String> {
    match self {
      PropertyKey::Ident(name) | PropertyKey::Str(name) => Some(name.clone()),
      PropertyKey::Num(value) => Some(format_number(*value)),
      PropertyKey::Computed(_) => None,
    }
  }
}

#[derive(Clone, Debug, PartialEq)]
pub enum ObjectEntry {
  Property {
    key: PropertyKey,
    value: ExpressionNode,
  },
  Spread(ExpressionNode),
}

/// The expression tree the host hands to the compiler for each prop.
///
/// Consumers match on it exhaustively; shapes outside this set are rejected by
/// the host adapter.
#[derive(Clone, Debug, PartialEq)]
pub enum ExpressionNode {
  Literal(Literal),
  Identifier(String),
  MemberAccess {
    base: Box<ExpressionNode>,
    path: Vec<MemberSegment>,
  },
  Call {
    callee: Box<ExpressionNode>,
    args: Vec<ExpressionNode>,
  },
  Conditional {
    test: Box<ExpressionNode>,
    consequent: Box<ExpressionNode>,
    alternate: Box<ExpressionNode>,
  },
  TemplateConcat(Vec<TemplatePart>),
  ObjectLiteral(Vec<ObjectEntry>),
  ArrayLiteral(Vec<ExpressionNode>),
  Spread(Box<ExpressionNode>),
}

impl ExpressionNode {
  pub fn string(value: impl Into<String>) -> Self {
    ExpressionNode::Literal(Literal::Str(value.into()))
  }

  pub fn number(value: f64) -> Self {
    ExpressionNode::Literal(Literal::Num(value))
  }

  pub fn ident(name: impl Into<String>) -> Self {
    ExpressionNode::Identifier(name.into())
  }

  pub fn member(base: ExpressionNode, names: &[&str]) -> Self {
    ExpressionNode::MemberAccess {
      base: Box::new(base),
      path: names
        .iter()
        .map(|name| MemberSegment::Named(name.to_string()))
        .collect(),
    }
  }

  pub fn call(callee: ExpressionNode, args: Vec<ExpressionNode>) -> Self {
    ExpressionNode::Call {
      callee: Box::new(callee),
      args,
    }
  }

  pub fn conditional(
    test: ExpressionNode,
    consequent: ExpressionNode,
    alternate: ExpressionNode,
  ) -> Self {
    ExpressionNode::Conditional {
      test: Box::new(test),
      consequent: Box::new(consequent),
      alternate: Box::new(alternate),
    }
  }

  pub fn spread(inner: ExpressionNode) -> Self {
    ExpressionNode::Spread(Box::new(inner))
  }

  /// Builds an object literal from `(key, value)` pairs with identifier keys.
  pub fn object<K: Into<String>>(entries: impl IntoIterator<Item = (K, ExpressionNode)>) -> Self {
    ExpressionNode::ObjectLiteral(
      entries
        .into_iter()
        .map(|(key, value)| ObjectEntry::Property {
          key: PropertyKey::Ident(key.into()),
          value,
        })
        .collect(),
    )
  }

  pub fn as_str(&self) -> Option<&str> {
    match self {
      ExpressionNode::Literal(Literal::Str(value)) => Some(value),
      _ => None,
    }
  }

  fn needs_parens_as_operand(&self) -> bool {
    matches!(self, ExpressionNode::Conditional { .. })
  }
}

/// Formats a number the way JavaScript's `String(n)` does for the common cases.
pub fn format_number(value: f64) -> String {
  if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e15 {
    format!("{}", value as i64)
  } else {
    format!("{}", value)
  }
}

fn write_string(f: &mut fmt::Formatter<'_>, value: &str) -> fmt::Result {
  match serde_json::to_string(value) {
    Ok(quoted) => f.write_str(&quoted),
    Err(_) => Err(fmt::Error),
  }
}

fn write_operand(f: &mut fmt::Formatter<'_>, node: &ExpressionNode) -> fmt::Result {
  if node.needs_parens_as_operand() {
    write!(f, "({})", node)
  } else {
    write!(f, "{}", node)
  }
}

fn escape_template_text(text: &str) -> String {
  text
    .replace('\\', "\\\\")
    .replace('`', "\\`")
    .replace("${", "\\${")
}

impl fmt::Display for Literal {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Literal::Str(value) => write_string(f, value),
      Literal::Num(value) => f.write_str(&format_number(*value)),
      Literal::Bool(value) => write!(f, "{}", value),
      Literal::Null => f.write_str("null"),
    }
  }
}

impl fmt::Display for PropertyKey {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      PropertyKey::Ident(name) => f.write_str(name),
      PropertyKey::Str(name) => write_string(f, name),
      PropertyKey::Num(value) => f.write_str(&format_number(*value)),
      PropertyKey::Computed(expr) => write!(f, "[{}]", expr),
    }
  }
}

/// Compact JavaScript-like rendering, e.g. `{...style,"--var-1":color}`.
impl fmt::Display for ExpressionNode {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ExpressionNode::Literal(literal) => write!(f, "{}", literal),
      ExpressionNode::Identifier(name) => f.write_str(name),
      ExpressionNode::MemberAccess { base, path } => {
        write_operand(f, base)?;
        for segment in path {
          match segment {
            MemberSegment::Named(name) => write!(f, ".{}", name)?,
            MemberSegment::Computed(expr) => write!(f, "[{}]", expr)?,
          }
        }
        Ok(())
      }
      ExpressionNode::Call { callee, args } => {
        write_operand(f, callee)?;
        f.write_str("(")?;
        for (index, arg) in args.iter().enumerate() {
          if index > 0 {
            f.write_str(",")?;
          }
          write!(f, "{}", arg)?;
        }
        f.write_str(")")
      }
      ExpressionNode::Conditional {
        test,
        consequent,
        alternate,
      } => {
        write_operand(f, test)?;
        write!(f, "?{}:{}", consequent, alternate)
      }
      ExpressionNode::TemplateConcat(parts) => {
        f.write_str("`")?;
        for part in parts {
          match part {
            TemplatePart::Str(text) => f.write_str(&escape_template_text(text))?,
            TemplatePart::Expr(expr) => write!(f, "${{{}}}", expr)?,
          }
        }
        f.write_str("`")
      }
      ExpressionNode::ObjectLiteral(entries) => {
        f.write_str("{")?;
        for (index, entry) in entries.iter().enumerate() {
          if index > 0 {
            f.write_str(",")?;
          }
          match entry {
            ObjectEntry::Property {
              key: PropertyKey::Ident(name),
              value: ExpressionNode::Identifier(value),
            } if name == value => f.write_str(name)?,
            ObjectEntry::Property { key, value } => write!(f, "{}:{}", key, value)?,
            ObjectEntry::Spread(inner) => write!(f, "...{}", inner)?,
          }
        }
        f.write_str("}")
      }
      ExpressionNode::ArrayLiteral(elements) => {
        f.write_str("[")?;
        for (index, element) in elements.iter().enumerate() {
          if index > 0 {
            f.write_str(",")?;
          }
          write!(f, "{}", element)?;
        }
        f.write_str("]")
      }
      ExpressionNode::Spread(inner) => write!(f, "...{}", inner),
    }
  }
}
