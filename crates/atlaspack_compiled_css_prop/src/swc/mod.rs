//! Adapter between swc's JSX AST and the css prop compiler.

use swc_core::atoms::Atom;
use swc_core::common::DUMMY_SP;
use swc_core::ecma::ast::{
  IdentName, JSXAttr, JSXAttrName, JSXAttrOrSpread, JSXAttrValue, JSXExpr, JSXExprContainer,
  JSXOpeningElement, Lit, Str,
};
use swc_core::ecma::visit::{noop_visit_mut_type, VisitMut, VisitMutWith};

use crate::errors::{CssPropDiagnostic, CssPropError};
use crate::expression::{ExpressionNode, Literal};
use crate::hash::{MurmurHasher, StyleHasher};
use crate::StyleCompiler;

mod convert;

pub use convert::{expression_from_swc, expression_to_swc, IdentifierScope};

const CLASS_NAME_ATTRIBUTE: &str = "className";
const STYLE_ATTRIBUTE: &str = "style";

/// A stylesheet to hand to the runtime style element.
#[derive(Clone, Debug, PartialEq)]
pub struct StyleSheet {
  pub class_name: String,
  pub css: String,
  pub nonce: Option<String>,
}

/// Rewrites every JSX element carrying a css prop: the prop is removed, its
/// compiled class name is merged into `className` and its runtime bindings into
/// `style`. Elements that fail to compile are left exactly as they were and a
/// diagnostic is recorded instead.
pub struct CssPropVisitor<'a, H = MurmurHasher> {
  compiler: &'a StyleCompiler<H>,
  style_sheets: Vec<StyleSheet>,
  diagnostics: Vec<CssPropDiagnostic>,
}

impl<'a, H: StyleHasher> CssPropVisitor<'a, H> {
  pub fn new(compiler: &'a StyleCompiler<H>) -> Self {
    CssPropVisitor {
      compiler,
      style_sheets: Vec::new(),
      diagnostics: Vec::new(),
    }
  }

  /// Non-empty stylesheets in document order.
  pub fn style_sheets(&self) -> &[StyleSheet] {
    &self.style_sheets
  }

  pub fn diagnostics(&self) -> &[CssPropDiagnostic] {
    &self.diagnostics
  }

  pub fn into_parts(self) -> (Vec<StyleSheet>, Vec<CssPropDiagnostic>) {
    (self.style_sheets, self.diagnostics)
  }

  fn transform_element(
    &mut self,
    element: &mut JSXOpeningElement,
    css_index: usize,
  ) -> Result<(), CssPropError> {
    let class_index = find_attribute(&element.attrs, CLASS_NAME_ATTRIBUTE);
    let style_index = find_attribute(&element.attrs, STYLE_ATTRIBUTE);

    let mut scope = IdentifierScope::default();
    let specification = attribute_expression(&element.attrs, Some(css_index), &mut scope)?;
    let class_name = attribute_expression(&element.attrs, class_index, &mut scope)?;
    let style = attribute_expression(&element.attrs, style_index, &mut scope)?;

    let compiled = self.compiler.compile_element(
      specification.as_ref(),
      class_name.as_ref(),
      style.as_ref(),
    )?;

    // Nothing is touched until compilation succeeded. New attributes are appended
    // after the css prop, so its index stays valid until it is removed.
    set_attribute(
      &mut element.attrs,
      class_index,
      CLASS_NAME_ATTRIBUTE,
      attribute_value(&compiled.class_name, &scope),
    );
    if !compiled.style.bindings.is_empty() {
      if let Some(style) = &compiled.style_prop {
        set_attribute(
          &mut element.attrs,
          style_index,
          STYLE_ATTRIBUTE,
          attribute_value(style, &scope),
        );
      }
    }
    element.attrs.remove(css_index);

    if !compiled.style.css.is_empty() {
      self.style_sheets.push(StyleSheet {
        class_name: compiled.style.class_name,
        css: compiled.style.css,
        nonce: self.compiler.config().nonce.clone(),
      });
    }

    Ok(())
  }
}

impl<H: StyleHasher> VisitMut for CssPropVisitor<'_, H> {
  noop_visit_mut_type!();

  fn visit_mut_jsx_opening_element(&mut self, element: &mut JSXOpeningElement) {
    element.visit_mut_children_with(self);

    let Some(css_index) = find_attribute(&element.attrs, &self.compiler.config().css_attribute)
    else {
      return;
    };
    let span = match &element.attrs[css_index] {
      JSXAttrOrSpread::JSXAttr(attr) => attr.span,
      JSXAttrOrSpread::SpreadElement(_) => element.span,
    };

    if let Err(error) = self.transform_element(element, css_index) {
      tracing::debug!(%error, "leaving element with an uncompilable css prop untouched");
      self.diagnostics.push(CssPropDiagnostic { error, span });
    }
  }
}

/// Index of the last attribute called `name`; in JSX a later attribute wins.
fn find_attribute(attrs: &[JSXAttrOrSpread], name: &str) -> Option<usize> {
  attrs.iter().rposition(|attr| match attr {
    JSXAttrOrSpread::JSXAttr(JSXAttr {
      name: JSXAttrName::Ident(ident),
      ..
    }) => ident.sym.as_ref() == name,
    _ => false,
  })
}

/// The value of the attribute at `index`, `None` when absent or written without
/// a value.
fn attribute_expression(
  attrs: &[JSXAttrOrSpread],
  index: Option<usize>,
  scope: &mut IdentifierScope,
) -> Result<Option<ExpressionNode>, CssPropError> {
  let Some(JSXAttrOrSpread::JSXAttr(attr)) = index.and_then(|index| attrs.get(index)) else {
    return Ok(None);
  };

  match &attr.value {
    None => Ok(None),
    Some(JSXAttrValue::Lit(Lit::Str(value))) => {
      Ok(Some(ExpressionNode::string(value.value.to_string())))
    }
    Some(JSXAttrValue::JSXExprContainer(container)) => match &container.expr {
      JSXExpr::Expr(expr) => expression_from_swc(expr, scope).map(Some),
      JSXExpr::JSXEmptyExpr(_) => Ok(None),
    },
    Some(_) => Err(CssPropError::unsupported(
      "JSX element",
      "attribute values must be strings or expressions",
    )),
  }
}

fn set_attribute(
  attrs: &mut Vec<JSXAttrOrSpread>,
  index: Option<usize>,
  name: &str,
  value: JSXAttrValue,
) {
  match index.and_then(|index| attrs.get_mut(index)) {
    Some(JSXAttrOrSpread::JSXAttr(attr)) => attr.value = Some(value),
    _ => attrs.push(JSXAttrOrSpread::JSXAttr(JSXAttr {
      span: DUMMY_SP,
      name: JSXAttrName::Ident(IdentName::new(Atom::from(name), DUMMY_SP)),
      value: Some(value),
    })),
  }
}

fn attribute_value(value: &ExpressionNode, scope: &IdentifierScope) -> JSXAttrValue {
  match value {
    ExpressionNode::Literal(Literal::Str(text)) if !text.contains('"') => {
      JSXAttrValue::Lit(Lit::Str(Str {
        span: DUMMY_SP,
        value: Atom::from(text.as_str()),
        raw: None,
      }))
    }
    other => JSXAttrValue::JSXExprContainer(JSXExprContainer {
      span: DUMMY_SP,
      expr: JSXExpr::Expr(Box::new(expression_to_swc(other, scope))),
    }),
  }
}
