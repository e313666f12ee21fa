use crate::classify::{classify, Classification, StaticValue};
use crate::expression::{ExpressionNode, TemplatePart};
use crate::hash::StyleHasher;
use crate::properties::add_unit_if_needed;
use crate::rule::{Declaration, Rule};

/// A generated custom property standing in for a runtime value.
#[derive(Clone, Debug, PartialEq)]
pub struct Binding {
  /// Full custom property name, e.g. `--var-1x2y3z`.
  pub name: String,
  pub expression: ExpressionNode,
}

/// Replaces every dynamic declaration value with a `var(--<namespace>-<hash>)`
/// reference and folds static values to their CSS text.
///
/// Traversal is pre-order with declarations before children, so bindings come
/// out in authoring order. Names hash the printed expression: textually identical
/// expressions share a single binding.
pub fn extract_bindings<H: StyleHasher>(
  mut rule: Rule,
  namespace: &str,
  hasher: &H,
) -> (Rule, Vec<Binding>) {
  let mut extractor = Extractor {
    namespace,
    hasher,
    bindings: Vec::new(),
  };
  extractor.visit_rule(&mut rule);
  (rule, extractor.bindings)
}

struct Extractor<'a, H> {
  namespace: &'a str,
  hasher: &'a H,
  bindings: Vec<Binding>,
}

impl<H: StyleHasher> Extractor<'_, H> {
  fn visit_rule(&mut self, rule: &mut Rule) {
    rule
      .declarations
      .retain_mut(|declaration| self.visit_declaration(declaration));
    for child in &mut rule.children {
      self.visit_rule(child);
    }
  }

  /// Returns `false` when the declaration should be dropped.
  fn visit_declaration(&mut self, declaration: &mut Declaration) -> bool {
    let css = match classify(&declaration.value) {
      Classification::Static(StaticValue::Null | StaticValue::Bool(_)) => {
        tracing::trace!(property = %declaration.property, "dropping declaration without a css value");
        return false;
      }
      Classification::Static(StaticValue::Num(number)) => {
        add_unit_if_needed(&declaration.property, number)
      }
      Classification::Static(value) => value.to_js_string(),
      Classification::Dynamic => match &declaration.value {
        ExpressionNode::TemplateConcat(parts) => self.lift_parts(parts),
        other => self.lift(other),
      },
    };
    declaration.value = ExpressionNode::string(css);
    true
  }

  fn lift_parts(&mut self, parts: &[TemplatePart]) -> String {
    let mut css = String::new();
    for part in parts {
      match part {
        TemplatePart::Str(text) => css.push_str(text),
        TemplatePart::Expr(expr) => match classify(expr) {
          Classification::Static(value) => css.push_str(&value.to_js_string()),
          Classification::Dynamic => css.push_str(&self.lift(expr)),
        },
      }
    }
    css
  }

  fn lift(&mut self, expression: &ExpressionNode) -> String {
    let name = format!(
      "--{}-{}",
      self.namespace,
      self.hasher.hash(&expression.to_string())
    );
    if !self.bindings.iter().any(|binding| binding.name == name) {
      tracing::trace!(%name, %expression, "lifting dynamic value");
      self.bindings.push(Binding {
        name: name.clone(),
        expression: expression.clone(),
      });
    }
    format!("var({})", name)
  }
}
