use swc_core::common::sync::Lrc;
use swc_core::common::{FileName, SourceMap};
use swc_core::ecma::ast::{Expr, JSXAttrName, JSXAttrOrSpread, JSXAttrValue, JSXExpr, Lit};
use swc_core::ecma::parser::lexer::Lexer;
use swc_core::ecma::parser::{EsSyntax, Parser, StringInput, Syntax};

// Also mounted by the integration tests, so only paths re-exported from the
// crate root are used here.
use super::swc::{expression_from_swc, IdentifierScope};
use super::StyleHasher;

/// Hashes everything to `hash-test`, so class names and variables are predictable.
#[derive(Clone, Debug, Default)]
pub struct FixedHasher;

impl StyleHasher for FixedHasher {
  fn hash(&self, _input: &str) -> String {
    "hash-test".into()
  }
}

pub fn parse_expression(code: &str) -> Expr {
  let cm: Lrc<SourceMap> = Default::default();
  let fm = cm.new_source_file(FileName::Custom("expr.jsx".into()).into(), code.into());
  let lexer = Lexer::new(
    Syntax::Es(EsSyntax {
      jsx: true,
      ..Default::default()
    }),
    Default::default(),
    StringInput::from(&*fm),
    None,
  );

  let mut parser = Parser::new_from(lexer);
  *parser.parse_expr().expect("parse JSX expression")
}

/// Renders the attributes of a JSX element, e.g. `className="cc-1"` or `{...props}`.
pub fn attributes(expr: &Expr) -> Vec<String> {
  let Expr::JSXElement(element) = expr else {
    panic!("expected a JSX element, found {:?}", expr);
  };

  element
    .opening
    .attrs
    .iter()
    .map(|attr| match attr {
      JSXAttrOrSpread::SpreadElement(spread) => {
        format!("{{...{}}}", lower(&spread.expr))
      }
      JSXAttrOrSpread::JSXAttr(attr) => {
        let name = match &attr.name {
          JSXAttrName::Ident(ident) => ident.sym.to_string(),
          JSXAttrName::JSXNamespacedName(name) => format!("{}:{}", name.ns.sym, name.name.sym),
        };
        match &attr.value {
          None => name,
          Some(JSXAttrValue::Lit(Lit::Str(value))) => format!("{}=\"{}\"", name, value.value),
          Some(JSXAttrValue::JSXExprContainer(container)) => match &container.expr {
            JSXExpr::Expr(expr) => {
              format!("{}={{{}}}", name, lower(expr))
            }
            JSXExpr::JSXEmptyExpr(_) => format!("{}={{}}", name),
          },
          Some(other) => panic!("unexpected attribute value {:?}", other),
        }
      }
    })
    .collect()
}

fn lower(expr: &Expr) -> String {
  expression_from_swc(expr, &mut IdentifierScope::default())
    .unwrap()
    .to_string()
}
