use std::sync::Arc;

use swc_core::common::{input::StringInput, FileName, SourceMap};
use swc_core::css::ast::{ComponentValue, Rule as CssRule, Stylesheet};
use swc_core::css::codegen::{writer::basic::BasicCssWriter, CodeGenerator, CodegenConfig, Emit};
use swc_core::css::parser::{parse_string_input, parser::ParserConfig};

use crate::errors::CssPropError;

fn parse_stylesheet(css: &str) -> Result<Stylesheet, CssPropError> {
  let cm: Arc<SourceMap> = Default::default();
  let fm = cm.new_source_file(FileName::Custom("inline.css".into()).into(), css.to_string());
  let mut errors = vec![];

  match parse_string_input::<Stylesheet>(
    StringInput::from(&*fm),
    None,
    ParserConfig::default(),
    &mut errors,
  ) {
    Ok(stylesheet) => match errors.into_iter().next() {
      Some(error) => Err(CssPropError::malformed(
        format!("invalid css: {error:?}"),
        css,
      )),
      None => Ok(stylesheet),
    },
    Err(error) => Err(CssPropError::malformed(
      format!("invalid css: {error:?}"),
      css,
    )),
  }
}

fn emit_rule(rule: &CssRule) -> Result<String, CssPropError> {
  let mut output = String::new();
  {
    let writer = BasicCssWriter::new(&mut output, None, Default::default());
    let mut generator = CodeGenerator::new(writer, CodegenConfig { minify: true });
    generator
      .emit(rule)
      .map_err(|err| CssPropError::malformed(format!("failed to print css: {err}"), ""))?;
  }
  Ok(output)
}

fn emit_component(component: &ComponentValue) -> Result<String, CssPropError> {
  let mut output = String::new();
  {
    let writer = BasicCssWriter::new(&mut output, None, Default::default());
    let mut generator = CodeGenerator::new(writer, CodegenConfig { minify: true });
    generator
      .emit(component)
      .map_err(|err| CssPropError::malformed(format!("failed to print css: {err}"), ""))?;
  }
  Ok(output)
}

/// Parses `property: value` as a lone declaration and returns the minified value.
///
/// Anything that closes the block or starts another declaration is rejected, so
/// a value can never write outside of the rule it belongs to.
pub fn normalize_value(property: &str, value: &str) -> Result<String, CssPropError> {
  let context = format!("{}: {}", property, value);
  let mut stylesheet = parse_stylesheet(&format!("a{{{}}}", context))
    .map_err(|_| CssPropError::malformed("value is not a single declaration value", &context))?;

  let declaration = match (stylesheet.rules.pop(), stylesheet.rules.is_empty()) {
    (Some(CssRule::QualifiedRule(mut rule)), true) if rule.block.value.len() == 1 => {
      rule.block.value.pop()
    }
    _ => None,
  };

  match declaration {
    Some(component @ ComponentValue::Declaration(_)) => {
      let printed = emit_component(&component)?;
      match printed.split_once(':') {
        Some((_, value)) => Ok(value.to_string()),
        None => Err(CssPropError::malformed(
          "value is not a single declaration value",
          context,
        )),
      }
    }
    _ => Err(CssPropError::malformed(
      "value is not a single declaration value",
      context,
    )),
  }
}

/// Parses a serialized stylesheet and prints it again with the minifying codegen.
pub fn minify_stylesheet(css: &str) -> Result<String, CssPropError> {
  if css.is_empty() {
    return Ok(String::new());
  }

  let stylesheet = parse_stylesheet(css)?;
  let mut minified = String::with_capacity(css.len());
  for rule in &stylesheet.rules {
    minified.push_str(&emit_rule(rule)?);
  }
  Ok(minified)
}

#[cfg(test)]
mod tests {
  use pretty_assertions::assert_eq;

  use super::*;

  #[test]
  fn test_normalize_value_collapses_whitespace() {
    assert_eq!(normalize_value("color", "  red ").unwrap(), "red");
    assert_eq!(
      normalize_value("border", "1px   solid  red").unwrap(),
      "1px solid red"
    );
    assert_eq!(
      normalize_value(
        "background-image",
        "linear-gradient(45deg, gray 25%, transparent 25%),\n   linear-gradient(-45deg, gray 25%)"
      )
      .unwrap(),
      "linear-gradient(45deg,gray 25%,transparent 25%),linear-gradient(-45deg,gray 25%)"
    );
    assert_eq!(
      normalize_value("font-size", "var(--var-hash-test)").unwrap(),
      "var(--var-hash-test)"
    );
  }

  #[test]
  fn test_normalize_value_rejects_values_leaving_the_declaration() {
    for value in ["red}body{display:none", "red; background: blue"] {
      assert!(
        matches!(
          normalize_value("color", value),
          Err(CssPropError::MalformedStyle { .. })
        ),
        "{value} should be rejected"
      );
    }
  }

  #[test]
  fn test_minify_stylesheet() {
    assert_eq!(
      minify_stylesheet(".cc-1{color:red}.cc-1[data-open] > span{display:none}").unwrap(),
      ".cc-1{color:red}.cc-1[data-open]>span{display:none}"
    );
    assert_eq!(minify_stylesheet("").unwrap(), "");
  }
}
