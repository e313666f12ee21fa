use crate::css::normalize_value;
use crate::errors::CssPropError;
use crate::expression::{ExpressionNode, Literal};
use crate::properties::add_unit_if_needed;
use crate::rule::{split_selector_list, Declaration, Rule, SelectorFragment};

/// Renders `rule` as a stylesheet scoped to `root_selector`.
///
/// Nested selectors are qualified against the accumulated parent selector: `&` is
/// substituted, a bare pseudo directly under a style rule attaches to it, and
/// anything else becomes a descendant. At-rules wrap the blocks of their subtree.
/// Empty blocks are omitted. String values are parsed as CSS and must stay inside
/// their declaration.
pub fn serialize(root_selector: &str, rule: &Rule) -> Result<String, CssPropError> {
  let mut css = String::new();
  write_rule(rule, root_selector, &mut css)?;
  Ok(css)
}

fn write_rule(rule: &Rule, selector: &str, css: &mut String) -> Result<(), CssPropError> {
  write_block(selector, &rule.declarations, css)?;

  let parent_is_style_rule = !rule.is_at_rule();
  for child in &rule.children {
    if let Some(fragment) = child.fragment() {
      check_fragment(fragment.text())?;
    }

    match child.fragment() {
      Some(SelectorFragment::AtRule(prelude)) => {
        let mut inner = String::new();
        write_rule(child, selector, &mut inner)?;
        if !inner.is_empty() {
          css.push_str(prelude);
          css.push('{');
          css.push_str(&inner);
          css.push('}');
        }
      }
      Some(SelectorFragment::Selector(fragment)) => {
        let qualified = qualify_selector(selector, fragment, parent_is_style_rule);
        write_rule(child, &qualified, css)?;
      }
      None => write_rule(child, selector, css)?,
    }
  }

  Ok(())
}

fn write_block(
  selector: &str,
  declarations: &[Declaration],
  css: &mut String,
) -> Result<(), CssPropError> {
  let mut body = Vec::with_capacity(declarations.len());
  for declaration in declarations {
    if let Some(value) = declaration_value(declaration)? {
      body.push(format!("{}:{}", declaration.property, value));
    }
  }

  if body.is_empty() {
    return Ok(());
  }

  css.push_str(selector);
  css.push('{');
  css.push_str(&body.join(";"));
  css.push('}');
  Ok(())
}

fn declaration_value(declaration: &Declaration) -> Result<Option<String>, CssPropError> {
  match &declaration.value {
    ExpressionNode::Literal(Literal::Str(value)) if value.trim().is_empty() => {
      tracing::trace!(property = %declaration.property, "dropping empty declaration");
      Ok(None)
    }
    ExpressionNode::Literal(Literal::Str(value)) => {
      normalize_value(&declaration.property, value).map(Some)
    }
    ExpressionNode::Literal(Literal::Num(value)) => {
      Ok(Some(add_unit_if_needed(&declaration.property, *value)))
    }
    other => {
      tracing::warn!(
        property = %declaration.property,
        value = %other,
        "skipping declaration that was not resolved to css text"
      );
      Ok(None)
    }
  }
}

/// Selectors and at-rule preludes may not open or close blocks themselves.
fn check_fragment(fragment: &str) -> Result<(), CssPropError> {
  let mut quote: Option<char> = None;
  for ch in fragment.chars() {
    match (quote, ch) {
      (Some(open), _) if ch == open => quote = None,
      (Some(_), _) => {}
      (None, '"' | '\'') => quote = Some(ch),
      (None, '{' | '}' | ';') => {
        return Err(CssPropError::malformed(
          "selector contains a block delimiter",
          fragment,
        ))
      }
      _ => {}
    }
  }
  Ok(())
}

/// Qualifies each member of `fragment`'s selector list against each member of
/// `parent`'s.
pub fn qualify_selector(parent: &str, fragment: &str, parent_is_style_rule: bool) -> String {
  let parents = split_selector_list(parent);
  let mut qualified = Vec::new();

  for part in split_selector_list(fragment) {
    for parent in &parents {
      qualified.push(if part.contains('&') {
        part.replace('&', parent)
      } else if parent_is_style_rule && part.starts_with(':') {
        format!("{}{}", parent, part)
      } else {
        format!("{} {}", parent, part)
      });
    }
  }

  qualified.join(",")
}
