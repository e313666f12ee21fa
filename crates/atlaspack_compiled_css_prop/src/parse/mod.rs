//! Normalizes a style specification (object, array, string or template literal)
//! into a [`Rule`] tree.

mod template;

pub use template::{parse_css_text, parse_template};

use crate::errors::CssPropError;
use crate::expression::{ExpressionNode, Literal, ObjectEntry};
use crate::properties::{add_unit_if_needed, kebab_case};
use crate::rule::{Declaration, Rule, SelectorFragment};

/// Parses a style specification into a root rule with an empty selector path.
pub fn parse_style(specification: &ExpressionNode) -> Result<Rule, CssPropError> {
  let mut root = Rule::root();
  parse_into(specification, &mut root)?;
  Ok(root)
}

fn parse_into(specification: &ExpressionNode, rule: &mut Rule) -> Result<(), CssPropError> {
  match specification {
    ExpressionNode::ObjectLiteral(entries) => parse_object(entries, rule),
    ExpressionNode::ArrayLiteral(elements) => parse_array(elements, rule),
    ExpressionNode::Literal(Literal::Str(text)) => parse_css_text(text, rule),
    ExpressionNode::TemplateConcat(parts) => parse_template(parts, rule),
    other => Err(CssPropError::unsupported(
      other,
      "styles must be an object, array, string or template literal",
    )),
  }
}

/// Each element is parsed as its own sibling scope and then concatenated, so later
/// elements win through the cascade.
fn parse_array(elements: &[ExpressionNode], rule: &mut Rule) -> Result<(), CssPropError> {
  for element in elements {
    match element {
      ExpressionNode::Literal(Literal::Null | Literal::Bool(false)) => continue,
      ExpressionNode::Spread(inner) if matches!(**inner, ExpressionNode::ArrayLiteral(_)) => {
        parse_into(inner, rule)?;
      }
      _ => {
        let mut sibling = Rule {
          selector_path: rule.selector_path.clone(),
          ..Default::default()
        };
        parse_into(element, &mut sibling)?;
        rule.absorb(sibling);
      }
    }
  }
  Ok(())
}

fn parse_object(entries: &[ObjectEntry], rule: &mut Rule) -> Result<(), CssPropError> {
  for entry in entries {
    match entry {
      ObjectEntry::Spread(ExpressionNode::ObjectLiteral(inner)) => parse_object(inner, rule)?,
      ObjectEntry::Spread(other) => {
        return Err(CssPropError::unsupported(
          ExpressionNode::spread(other.clone()),
          "only object literals can be spread into styles",
        ));
      }
      ObjectEntry::Property { key, value } => {
        let Some(name) = key.static_name() else {
          return Err(CssPropError::unsupported(
            key,
            "computed keys cannot be resolved at compile time",
          ));
        };

        let is_selector = looks_like_selector(&name) || is_element_name(&name);
        if let ExpressionNode::ObjectLiteral(nested) = value {
          if !is_selector {
            return Err(CssPropError::unsupported(
              value,
              format!("`{}` is not a selector, so it cannot hold nested styles", name),
            ));
          }
          let mut child = rule.child(SelectorFragment::parse(&name));
          parse_object(nested, &mut child)?;
          rule.children.push(child);
        } else if looks_like_selector(&name) {
          return Err(CssPropError::unsupported(
            value,
            format!("selector `{}` must map to an object of styles", name),
          ));
        } else {
          rule.declarations.push(declaration_from_entry(&name, value));
        }
      }
    }
  }
  Ok(())
}

fn declaration_from_entry(name: &str, value: &ExpressionNode) -> Declaration {
  let property = kebab_case(name);
  let value = match value {
    ExpressionNode::Literal(Literal::Num(number)) => {
      ExpressionNode::string(add_unit_if_needed(&property, *number))
    }
    other => other.clone(),
  };
  Declaration::new(property, value)
}

fn looks_like_selector(key: &str) -> bool {
  if key.starts_with("--") {
    return false;
  }
  key.starts_with(['&', ':', '@', '[', '.', '#', '>', '+', '~', '*'])
    || key.contains(|ch: char| ch.is_whitespace() || ch == ',')
}

/// Element names that may key a nested object of styles, e.g. `{ span: {...} }`.
fn is_element_name(key: &str) -> bool {
  matches!(
    key,
    "a"
      | "abbr"
      | "article"
      | "aside"
      | "b"
      | "blockquote"
      | "body"
      | "button"
      | "caption"
      | "code"
      | "dd"
      | "details"
      | "div"
      | "dl"
      | "dt"
      | "em"
      | "fieldset"
      | "figcaption"
      | "figure"
      | "footer"
      | "form"
      | "h1"
      | "h2"
      | "h3"
      | "h4"
      | "h5"
      | "h6"
      | "header"
      | "hr"
      | "html"
      | "i"
      | "iframe"
      | "img"
      | "input"
      | "label"
      | "legend"
      | "li"
      | "main"
      | "mark"
      | "nav"
      | "ol"
      | "option"
      | "p"
      | "path"
      | "pre"
      | "section"
      | "select"
      | "small"
      | "span"
      | "strong"
      | "sub"
      | "summary"
      | "sup"
      | "svg"
      | "table"
      | "tbody"
      | "td"
      | "textarea"
      | "tfoot"
      | "th"
      | "thead"
      | "tr"
      | "u"
      | "ul"
      | "video"
  )
}
