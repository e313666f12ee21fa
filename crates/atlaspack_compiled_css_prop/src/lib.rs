//! Compiles the `css` prop of a JSX element into a static, content-addressed
//! class, a set of custom properties for values only known at runtime, and the
//! merged `className` / `style` props to put back on the element.
//!
//! ```text
//! css expression -> parse -> extract bindings -> bubble -> serialize -> hash
//!                                                      \-> merge className/style
//! ```

pub mod bubble;
pub mod classify;
pub mod config;
pub mod css;
pub mod errors;
pub mod expression;
pub mod extract;
pub mod hash;
pub mod merge;
pub mod parse;
pub mod properties;
pub mod rule;
pub mod serialize;
pub mod swc;

#[cfg(test)]
mod test_utils;

pub use config::CssPropConfig;
pub use errors::{CssPropDiagnostic, CssPropError};
pub use expression::ExpressionNode;
pub use extract::Binding;
pub use hash::{MurmurHasher, StyleHasher};

use crate::bubble::bubble_pseudos;
use crate::css::minify_stylesheet;
use crate::extract::extract_bindings;
use crate::hash::name_class;
use crate::merge::merge_attributes;
use crate::parse::parse_style;
use crate::serialize::serialize;

/// Root selector used while hashing, before the class name exists.
const HASH_ROOT_SELECTOR: &str = "&";

/// The stylesheet produced for one element.
#[derive(Clone, Debug, PartialEq)]
pub struct CompiledStyle {
  pub class_name: String,
  pub css: String,
  pub bindings: Vec<Binding>,
}

/// A compiled element: its stylesheet plus replacement `className` and `style` values.
#[derive(Clone, Debug, PartialEq)]
pub struct CompiledElement {
  pub style: CompiledStyle,
  pub class_name: ExpressionNode,
  /// `None` when the element had no style prop and none is needed.
  pub style_prop: Option<ExpressionNode>,
}

/// Runs the css prop pipeline. Holds no per-element state, so one compiler can be
/// shared by every element of a module (or across threads when `H: Sync`).
#[derive(Clone, Debug)]
pub struct StyleCompiler<H = MurmurHasher> {
  config: CssPropConfig,
  hasher: H,
}

impl StyleCompiler<MurmurHasher> {
  pub fn new(config: CssPropConfig) -> Self {
    let hasher = MurmurHasher::new(config.hash_seed);
    Self { config, hasher }
  }
}

impl Default for StyleCompiler<MurmurHasher> {
  fn default() -> Self {
    Self::new(CssPropConfig::default())
  }
}

impl<H: StyleHasher> StyleCompiler<H> {
  pub fn with_hasher(config: CssPropConfig, hasher: H) -> Self {
    Self { config, hasher }
  }

  pub fn config(&self) -> &CssPropConfig {
    &self.config
  }

  /// Compiles a style specification into its class name, stylesheet and bindings.
  ///
  /// The class name hashes the final stylesheet serialized against a placeholder
  /// root selector; the stylesheet is then serialized again against `.<class name>`
  /// and printed through the css codegen.
  #[tracing::instrument(level = "debug", skip_all)]
  pub fn compile(&self, specification: &ExpressionNode) -> Result<CompiledStyle, CssPropError> {
    let rule = parse_style(specification)?;
    let (rule, bindings) = extract_bindings(rule, &self.config.variable_prefix, &self.hasher);
    let rule = bubble_pseudos(rule);

    let class_name = name_class(
      &self.config.class_name_prefix,
      &serialize(HASH_ROOT_SELECTOR, &rule)?,
      &self.hasher,
    );
    let css = minify_stylesheet(&serialize(&format!(".{}", class_name), &rule)?)?;

    tracing::debug!(%class_name, bindings = bindings.len(), "compiled css prop");

    Ok(CompiledStyle {
      class_name,
      css,
      bindings,
    })
  }

  /// Compiles an element's css prop and merges the result with its existing
  /// `className` and `style` props.
  pub fn compile_element(
    &self,
    specification: Option<&ExpressionNode>,
    class_name: Option<&ExpressionNode>,
    style: Option<&ExpressionNode>,
  ) -> Result<CompiledElement, CssPropError> {
    let specification = specification.ok_or(CssPropError::NoStyleSpecification)?;
    let compiled = self.compile(specification)?;
    let merged = merge_attributes(class_name, style, &compiled.class_name, &compiled.bindings);

    Ok(CompiledElement {
      style: compiled,
      class_name: merged.class_name,
      style_prop: merged.style,
    })
  }
}

#[cfg(test)]
mod tests {
  use pretty_assertions::assert_eq;
  use tracing_test::traced_test;

  use super::*;
  use crate::expression::{ObjectEntry, PropertyKey, TemplatePart};
  use crate::test_utils::FixedHasher;

  fn compiler() -> StyleCompiler<FixedHasher> {
    StyleCompiler::with_hasher(CssPropConfig::default(), FixedHasher::default())
  }

  fn entry(key: &str, value: ExpressionNode) -> ObjectEntry {
    ObjectEntry::Property {
      key: PropertyKey::Str(key.into()),
      value,
    }
  }

  #[test]
  fn test_compiles_static_object() {
    let compiled = compiler()
      .compile(&ExpressionNode::object([
        ("fontSize", ExpressionNode::number(12.0)),
        ("color", ExpressionNode::string("red")),
      ]))
      .unwrap();

    assert_eq!(
      compiled,
      CompiledStyle {
        class_name: "cc-hash-test".into(),
        css: ".cc-hash-test{font-size:12px;color:red}".into(),
        bindings: vec![],
      }
    );
  }

  #[test]
  fn test_extracts_dynamic_variable() {
    let compiled = compiler()
      .compile_element(
        Some(&ExpressionNode::object([
          ("fontSize", ExpressionNode::ident("x")),
          ("color", ExpressionNode::string("red")),
        ])),
        None,
        None,
      )
      .unwrap();

    assert_eq!(
      compiled.style.css,
      ".cc-hash-test{font-size:var(--var-hash-test);color:red}"
    );
    assert_eq!(compiled.style.bindings.len(), 1);
    assert_eq!(
      compiled.style_prop.map(|style| style.to_string()),
      Some(r#"{"--var-hash-test":x}"#.to_string())
    );
  }

  #[test]
  fn test_array_composition_keeps_cascade_order() {
    let compiled = compiler()
      .compile(&ExpressionNode::ArrayLiteral(vec![
        ExpressionNode::object([("color", ExpressionNode::string("black"))]),
        ExpressionNode::string("color: red;"),
      ]))
      .unwrap();

    assert_eq!(compiled.css, ".cc-hash-test{color:black;color:red}");
  }

  #[test]
  fn test_bubbles_pseudo_inside_media_query() {
    let compiled = compiler()
      .compile(&ExpressionNode::ObjectLiteral(vec![entry(
        "@media screen",
        ExpressionNode::ObjectLiteral(vec![entry(
          ":hover",
          ExpressionNode::object([("color", ExpressionNode::string("red"))]),
        )]),
      )]))
      .unwrap();

    assert_eq!(compiled.css, "@media screen{.cc-hash-test:hover{color:red}}");
  }

  #[test]
  fn test_static_input_leaves_style_untouched() {
    let style = ExpressionNode::ident("style");
    let compiled = compiler()
      .compile_element(
        Some(&ExpressionNode::object([(
          "fontSize",
          ExpressionNode::number(12.0),
        )])),
        None,
        Some(&style),
      )
      .unwrap();

    assert!(compiled.style.bindings.is_empty());
    assert_eq!(compiled.style_prop, Some(style));
  }

  #[test]
  fn test_missing_specification() {
    assert_eq!(
      compiler().compile_element(None, None, None),
      Err(CssPropError::NoStyleSpecification)
    );
  }

  #[test]
  fn test_unterminated_template_returns_no_output() {
    let result = compiler().compile_element(
      Some(&ExpressionNode::TemplateConcat(vec![
        TemplatePart::Str("@media screen { color: ".into()),
        TemplatePart::Expr(ExpressionNode::ident("color")),
        TemplatePart::Str(";".into()),
      ])),
      None,
      None,
    );

    assert!(matches!(result, Err(CssPropError::MalformedStyle { .. })));
  }

  #[test]
  fn test_value_breaking_out_of_its_rule_is_malformed() {
    let result = compiler().compile(&ExpressionNode::object([(
      "color",
      ExpressionNode::string("red}body{display:none"),
    )]));

    assert!(matches!(result, Err(CssPropError::MalformedStyle { .. })));
  }

  #[test]
  fn test_murmur_class_names_are_content_addressed() {
    let compiler = StyleCompiler::default();
    let red = ExpressionNode::object([("color", ExpressionNode::string("red"))]);
    let blue = ExpressionNode::object([("color", ExpressionNode::string("blue"))]);

    let first = compiler.compile(&red).unwrap();
    let second = compiler.compile(&red).unwrap();
    let other = compiler.compile(&blue).unwrap();

    assert_eq!(first, second);
    assert_ne!(first.class_name, other.class_name);
    assert_eq!(first.css, format!(".{}{{color:red}}", first.class_name));
  }

  #[test]
  fn test_binding_names_are_stable_across_runs() {
    let compiler = StyleCompiler::default();
    let specification = ExpressionNode::object([
      ("color", ExpressionNode::ident("color")),
      (
        "width",
        ExpressionNode::member(ExpressionNode::ident("props"), &["width"]),
      ),
    ]);

    let first = compiler.compile(&specification).unwrap();
    let second = compiler.compile(&specification).unwrap();

    assert_eq!(first.bindings, second.bindings);
    assert_eq!(first.bindings.len(), 2);
    assert!(first.bindings[0].name.starts_with("--var-"));
    assert_ne!(first.bindings[0].name, first.bindings[1].name);
  }

  #[traced_test]
  #[test]
  fn test_logs_compiled_class_name() {
    compiler()
      .compile(&ExpressionNode::object([("color", ExpressionNode::string("red"))]))
      .unwrap();

    assert!(logs_contain("compiled css prop"));
    assert!(logs_contain("cc-hash-test"));
  }
}
