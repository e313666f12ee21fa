use crate::expression::{format_number, ExpressionNode, Literal, TemplatePart};

/// A value known at compile time.
#[derive(Clone, Debug, PartialEq)]
pub enum StaticValue {
  Str(String),
  Num(f64),
  Bool(bool),
  Null,
  List(Vec<StaticValue>),
}

impl StaticValue {
  /// The value after JavaScript string coercion.
  pub fn to_js_string(&self) -> String {
    match self {
      StaticValue::Str(value) => value.clone(),
      StaticValue::Num(value) => format_number(*value),
      StaticValue::Bool(value) => value.to_string(),
      StaticValue::Null => "null".into(),
      StaticValue::List(values) => values
        .iter()
        .map(StaticValue::to_js_string)
        .collect::<Vec<_>>()
        .join(","),
    }
  }
}

impl From<&Literal> for StaticValue {
  fn from(literal: &Literal) -> Self {
    match literal {
      Literal::Str(value) => StaticValue::Str(value.clone()),
      Literal::Num(value) => StaticValue::Num(*value),
      Literal::Bool(value) => StaticValue::Bool(*value),
      Literal::Null => StaticValue::Null,
    }
  }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Classification {
  Static(StaticValue),
  Dynamic,
}

impl Classification {
  pub fn is_static(&self) -> bool {
    matches!(self, Classification::Static(_))
  }
}

/// Decides whether `node` is known at compile time.
///
/// Only literals and literal-only templates/arrays fold. Identifiers are always
/// dynamic, whatever they were initialised with.
pub fn classify(node: &ExpressionNode) -> Classification {
  match node {
    ExpressionNode::Literal(literal) => Classification::Static(literal.into()),
    ExpressionNode::TemplateConcat(parts) => {
      let mut folded = String::new();
      for part in parts {
        match part {
          TemplatePart::Str(text) => folded.push_str(text),
          TemplatePart::Expr(expr) => match classify(expr) {
            Classification::Static(value) => folded.push_str(&value.to_js_string()),
            Classification::Dynamic => return Classification::Dynamic,
          },
        }
      }
      Classification::Static(StaticValue::Str(folded))
    }
    ExpressionNode::ArrayLiteral(elements) => {
      let mut values = Vec::with_capacity(elements.len());
      for element in elements {
        match classify(element) {
          Classification::Static(value) => values.push(value),
          Classification::Dynamic => return Classification::Dynamic,
        }
      }
      Classification::Static(StaticValue::List(values))
    }
    ExpressionNode::Identifier(_)
    | ExpressionNode::MemberAccess { .. }
    | ExpressionNode::Call { .. }
    | ExpressionNode::Conditional { .. }
    | ExpressionNode::ObjectLiteral(_)
    | ExpressionNode::Spread(_) => Classification::Dynamic,
  }
}
