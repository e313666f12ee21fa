use crate::classify::{classify, Classification, StaticValue};
use crate::expression::{ExpressionNode, ObjectEntry, PropertyKey, TemplatePart};
use crate::extract::Binding;

/// Replacement values for an element's `className` and `style` props.
#[derive(Clone, Debug, PartialEq)]
pub struct MergedAttributes {
  pub class_name: ExpressionNode,
  /// `None` when the element had no style prop and none is needed.
  pub style: Option<ExpressionNode>,
}

pub fn merge_attributes(
  existing_class_name: Option<&ExpressionNode>,
  existing_style: Option<&ExpressionNode>,
  generated_class_name: &str,
  bindings: &[Binding],
) -> MergedAttributes {
  MergedAttributes {
    class_name: merge_class_name(existing_class_name, generated_class_name),
    style: merge_style(existing_style, bindings),
  }
}

/// Prepends the generated class name.
///
/// Static strings and numbers fold at compile time, `null` and booleans add
/// nothing, and anything else becomes `` `cc-x${value ? ` ${value}` : ""}` `` so
/// a falsy value adds nothing at runtime either.
pub fn merge_class_name(
  existing: Option<&ExpressionNode>,
  generated_class_name: &str,
) -> ExpressionNode {
  let Some(existing) = existing else {
    return ExpressionNode::string(generated_class_name);
  };

  match classify(existing) {
    Classification::Static(StaticValue::Null | StaticValue::Bool(_)) => {
      ExpressionNode::string(generated_class_name)
    }
    Classification::Static(value) => {
      let value = value.to_js_string();
      if value.trim().is_empty() {
        ExpressionNode::string(generated_class_name)
      } else {
        ExpressionNode::string(format!("{} {}", generated_class_name, value))
      }
    }
    Classification::Dynamic => ExpressionNode::TemplateConcat(vec![
      TemplatePart::Str(generated_class_name.to_string()),
      TemplatePart::Expr(ExpressionNode::conditional(
        existing.clone(),
        ExpressionNode::TemplateConcat(vec![
          TemplatePart::Str(" ".into()),
          TemplatePart::Expr(existing.clone()),
        ]),
        ExpressionNode::string(""),
      )),
    ]),
  }
}

/// Adds one entry per binding to the style prop. Without bindings the existing
/// style passes through untouched.
pub fn merge_style(
  existing: Option<&ExpressionNode>,
  bindings: &[Binding],
) -> Option<ExpressionNode> {
  if bindings.is_empty() {
    return existing.cloned();
  }

  let mut entries = match existing {
    None => Vec::with_capacity(bindings.len()),
    Some(ExpressionNode::ObjectLiteral(entries)) => {
      let mut merged = Vec::with_capacity(entries.len() + bindings.len());
      merged.extend(entries.iter().cloned());
      merged
    }
    Some(other) => {
      let mut merged = Vec::with_capacity(bindings.len() + 1);
      merged.push(ObjectEntry::Spread(other.clone()));
      merged
    }
  };

  entries.extend(bindings.iter().map(|binding| ObjectEntry::Property {
    key: PropertyKey::Str(binding.name.clone()),
    value: binding.expression.clone(),
  }));

  Some(ExpressionNode::ObjectLiteral(entries))
}
