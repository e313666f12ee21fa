use std::collections::HashMap;

use swc_core::atoms::Atom;
use swc_core::common::{Span, SyntaxContext, DUMMY_SP};
use swc_core::ecma::ast::{
  ArrayLit, Bool, CallExpr, Callee, ComputedPropName, CondExpr, Expr, ExprOrSpread, Ident,
  IdentName, KeyValueProp, Lit, MemberExpr, MemberProp, Null, Number, ObjectLit, ParenExpr, Prop,
  PropName, PropOrSpread, SpreadElement, Str, Tpl, TplElement,
};

use crate::errors::CssPropError;
use crate::expression::{
  ExpressionNode, Literal, MemberSegment, ObjectEntry, PropertyKey, TemplatePart,
};

/// The hygiene of every identifier lowered from one element.
///
/// Raising replays the recorded syntax context and span, so rewritten props still
/// refer to the bindings the author wrote. Expressions of one element share a
/// scope, so each name maps to a single binding.
#[derive(Clone, Debug, Default)]
pub struct IdentifierScope {
  identifiers: HashMap<Atom, (SyntaxContext, Span)>,
}

impl IdentifierScope {
  fn record(&mut self, ident: &Ident) -> Result<(), CssPropError> {
    match self.identifiers.get(&ident.sym) {
      Some((ctxt, _)) if *ctxt != ident.ctxt => Err(CssPropError::unsupported(
        &ident.sym,
        "identifier refers to more than one binding",
      )),
      Some(_) => Ok(()),
      None => {
        self
          .identifiers
          .insert(ident.sym.clone(), (ident.ctxt, ident.span));
        Ok(())
      }
    }
  }

  fn ident(&self, name: &str) -> Ident {
    let sym = Atom::from(name);
    let (ctxt, span) = self
      .identifiers
      .get(&sym)
      .copied()
      .unwrap_or((SyntaxContext::empty(), DUMMY_SP));
    Ident::new(sym, span, ctxt)
  }
}

/// Lowers an swc expression into the compiler's expression tree, recording its
/// identifiers in `scope`.
///
/// Parentheses and TypeScript `as` / `satisfies` / `as const` wrappers are looked
/// through. Shapes outside the compiler's expression set are rejected with
/// [`CssPropError::UnsupportedExpression`].
pub fn expression_from_swc(
  expr: &Expr,
  scope: &mut IdentifierScope,
) -> Result<ExpressionNode, CssPropError> {
  match expr {
    Expr::Lit(lit) => literal_from_swc(lit).map(ExpressionNode::Literal),
    Expr::Ident(ident) => {
      scope.record(ident)?;
      Ok(ExpressionNode::Identifier(ident.sym.to_string()))
    }
    Expr::Member(member) => member_from_swc(member, scope),
    Expr::Call(call) => {
      let Callee::Expr(callee) = &call.callee else {
        return Err(CssPropError::unsupported(
          describe(expr),
          "only calls to plain functions can be compiled",
        ));
      };
      Ok(ExpressionNode::Call {
        callee: Box::new(expression_from_swc(callee, scope)?),
        args: call
          .args
          .iter()
          .map(|argument| argument_from_swc(argument, scope))
          .collect::<Result<_, _>>()?,
      })
    }
    Expr::Cond(cond) => Ok(ExpressionNode::conditional(
      expression_from_swc(&cond.test, scope)?,
      expression_from_swc(&cond.cons, scope)?,
      expression_from_swc(&cond.alt, scope)?,
    )),
    Expr::Tpl(tpl) => template_from_swc(tpl, scope),
    Expr::Object(object) => object_from_swc(object, scope),
    Expr::Array(array) => {
      let mut elements = Vec::with_capacity(array.elems.len());
      for element in &array.elems {
        let Some(element) = element else {
          return Err(CssPropError::unsupported(
            "[,]",
            "arrays with holes cannot be compiled",
          ));
        };
        elements.push(argument_from_swc(element, scope)?);
      }
      Ok(ExpressionNode::ArrayLiteral(elements))
    }
    Expr::Paren(paren) => expression_from_swc(&paren.expr, scope),
    Expr::TsAs(ts_as) => expression_from_swc(&ts_as.expr, scope),
    Expr::TsSatisfies(satisfies) => expression_from_swc(&satisfies.expr, scope),
    Expr::TsConstAssertion(assertion) => expression_from_swc(&assertion.expr, scope),
    other => Err(CssPropError::unsupported(
      describe(other),
      "expression cannot be compiled",
    )),
  }
}

fn literal_from_swc(lit: &Lit) -> Result<Literal, CssPropError> {
  match lit {
    Lit::Str(value) => Ok(Literal::Str(value.value.to_string())),
    Lit::Num(value) => Ok(Literal::Num(value.value)),
    Lit::Bool(value) => Ok(Literal::Bool(value.value)),
    Lit::Null(_) => Ok(Literal::Null),
    _ => Err(CssPropError::unsupported(
      "literal",
      "only string, number, boolean and null literals can be compiled",
    )),
  }
}

fn member_from_swc(
  member: &MemberExpr,
  scope: &mut IdentifierScope,
) -> Result<ExpressionNode, CssPropError> {
  let segment = match &member.prop {
    MemberProp::Ident(name) => MemberSegment::Named(name.sym.to_string()),
    MemberProp::Computed(computed) => {
      MemberSegment::Computed(expression_from_swc(&computed.expr, scope)?)
    }
    MemberProp::PrivateName(_) => {
      return Err(CssPropError::unsupported(
        "#private",
        "private fields cannot be compiled",
      ));
    }
  };

  match expression_from_swc(&member.obj, scope)? {
    ExpressionNode::MemberAccess { base, mut path } => {
      path.push(segment);
      Ok(ExpressionNode::MemberAccess { base, path })
    }
    base => Ok(ExpressionNode::MemberAccess {
      base: Box::new(base),
      path: vec![segment],
    }),
  }
}

fn argument_from_swc(
  argument: &ExprOrSpread,
  scope: &mut IdentifierScope,
) -> Result<ExpressionNode, CssPropError> {
  let expr = expression_from_swc(&argument.expr, scope)?;
  Ok(match argument.spread {
    Some(_) => ExpressionNode::spread(expr),
    None => expr,
  })
}

fn template_from_swc(tpl: &Tpl, scope: &mut IdentifierScope) -> Result<ExpressionNode, CssPropError> {
  let mut parts = Vec::with_capacity(tpl.quasis.len() + tpl.exprs.len());
  for (index, quasi) in tpl.quasis.iter().enumerate() {
    let text = match &quasi.cooked {
      Some(cooked) => cooked.to_string(),
      None => quasi.raw.to_string(),
    };
    if !text.is_empty() {
      parts.push(TemplatePart::Str(text));
    }
    if let Some(expr) = tpl.exprs.get(index) {
      parts.push(TemplatePart::Expr(expression_from_swc(expr, scope)?));
    }
  }
  Ok(ExpressionNode::TemplateConcat(parts))
}

fn object_from_swc(
  object: &ObjectLit,
  scope: &mut IdentifierScope,
) -> Result<ExpressionNode, CssPropError> {
  let mut entries = Vec::with_capacity(object.props.len());
  for prop in &object.props {
    let entry = match prop {
      PropOrSpread::Spread(spread) => {
        ObjectEntry::Spread(expression_from_swc(&spread.expr, scope)?)
      }
      PropOrSpread::Prop(prop) => match &**prop {
        Prop::KeyValue(key_value) => ObjectEntry::Property {
          key: property_key_from_swc(&key_value.key, scope)?,
          value: expression_from_swc(&key_value.value, scope)?,
        },
        Prop::Shorthand(ident) => {
          scope.record(ident)?;
          ObjectEntry::Property {
            key: PropertyKey::Ident(ident.sym.to_string()),
            value: ExpressionNode::Identifier(ident.sym.to_string()),
          }
        }
        _ => {
          return Err(CssPropError::unsupported(
            "{ method() {} }",
            "methods, getters and setters cannot be compiled",
          ));
        }
      },
    };
    entries.push(entry);
  }
  Ok(ExpressionNode::ObjectLiteral(entries))
}

fn property_key_from_swc(
  key: &PropName,
  scope: &mut IdentifierScope,
) -> Result<PropertyKey, CssPropError> {
  match key {
    PropName::Ident(name) => Ok(PropertyKey::Ident(name.sym.to_string())),
    PropName::Str(value) => Ok(PropertyKey::Str(value.value.to_string())),
    PropName::Num(value) => Ok(PropertyKey::Num(value.value)),
    PropName::Computed(computed) => Ok(PropertyKey::Computed(Box::new(expression_from_swc(
      &computed.expr,
      scope,
    )?))),
    PropName::BigInt(_) => Err(CssPropError::unsupported(
      "bigint key",
      "bigint keys cannot be compiled",
    )),
  }
}

/// Short human readable name of an expression kind, for diagnostics.
fn describe(expr: &Expr) -> &'static str {
  match expr {
    Expr::Arrow(_) | Expr::Fn(_) => "function",
    Expr::Bin(_) => "binary expression",
    Expr::Unary(_) => "unary expression",
    Expr::Update(_) => "update expression",
    Expr::Assign(_) => "assignment",
    Expr::Seq(_) => "sequence expression",
    Expr::New(_) => "new expression",
    Expr::Call(_) => "call expression",
    Expr::TaggedTpl(_) => "tagged template",
    Expr::JSXElement(_) | Expr::JSXFragment(_) => "JSX element",
    Expr::Await(_) => "await expression",
    Expr::Yield(_) => "yield expression",
    Expr::This(_) => "this",
    Expr::Class(_) => "class expression",
    Expr::OptChain(_) => "optional chain",
    _ => "expression",
  }
}

/// Raises a compiler expression back into an swc expression, restoring the
/// hygiene of identifiers recorded in `scope`.
pub fn expression_to_swc(node: &ExpressionNode, scope: &IdentifierScope) -> Expr {
  match node {
    ExpressionNode::Literal(literal) => Expr::Lit(literal_to_swc(literal)),
    ExpressionNode::Identifier(name) => Expr::Ident(scope.ident(name)),
    ExpressionNode::MemberAccess { base, path } => {
      path
        .iter()
        .fold(operand_to_swc(base, scope), |object, segment| {
          Expr::Member(MemberExpr {
            span: DUMMY_SP,
            obj: Box::new(object),
            prop: match segment {
              MemberSegment::Named(name) => {
                MemberProp::Ident(IdentName::new(Atom::from(name.as_str()), DUMMY_SP))
              }
              MemberSegment::Computed(expr) => MemberProp::Computed(ComputedPropName {
                span: DUMMY_SP,
                expr: Box::new(expression_to_swc(expr, scope)),
              }),
            },
          })
        })
    }
    ExpressionNode::Call { callee, args } => Expr::Call(CallExpr {
      span: DUMMY_SP,
      ctxt: SyntaxContext::empty(),
      callee: Callee::Expr(Box::new(operand_to_swc(callee, scope))),
      args: args.iter().map(|arg| argument_to_swc(arg, scope)).collect(),
      type_args: None,
    }),
    ExpressionNode::Conditional {
      test,
      consequent,
      alternate,
    } => Expr::Cond(CondExpr {
      span: DUMMY_SP,
      test: Box::new(operand_to_swc(test, scope)),
      cons: Box::new(expression_to_swc(consequent, scope)),
      alt: Box::new(expression_to_swc(alternate, scope)),
    }),
    ExpressionNode::TemplateConcat(parts) => Expr::Tpl(template_to_swc(parts, scope)),
    ExpressionNode::ObjectLiteral(entries) => Expr::Object(ObjectLit {
      span: DUMMY_SP,
      props: entries
        .iter()
        .map(|entry| entry_to_swc(entry, scope))
        .collect(),
    }),
    ExpressionNode::ArrayLiteral(elements) => Expr::Array(ArrayLit {
      span: DUMMY_SP,
      elems: elements
        .iter()
        .map(|element| Some(argument_to_swc(element, scope)))
        .collect(),
    }),
    // A spread only has meaning inside an array, call or object; standing alone it
    // is the value being spread.
    ExpressionNode::Spread(inner) => expression_to_swc(inner, scope),
  }
}

fn string_lit(value: &str) -> Str {
  Str {
    span: DUMMY_SP,
    value: Atom::from(value),
    raw: None,
  }
}

fn literal_to_swc(literal: &Literal) -> Lit {
  match literal {
    Literal::Str(value) => Lit::Str(string_lit(value)),
    Literal::Num(value) => Lit::Num(Number {
      span: DUMMY_SP,
      value: *value,
      raw: None,
    }),
    Literal::Bool(value) => Lit::Bool(Bool {
      span: DUMMY_SP,
      value: *value,
    }),
    Literal::Null => Lit::Null(Null { span: DUMMY_SP }),
  }
}

/// Conditionals need parentheses when used as the object, callee or test of
/// another expression.
fn operand_to_swc(node: &ExpressionNode, scope: &IdentifierScope) -> Expr {
  let expr = expression_to_swc(node, scope);
  match node {
    ExpressionNode::Conditional { .. } => Expr::Paren(ParenExpr {
      span: DUMMY_SP,
      expr: Box::new(expr),
    }),
    _ => expr,
  }
}

fn argument_to_swc(node: &ExpressionNode, scope: &IdentifierScope) -> ExprOrSpread {
  match node {
    ExpressionNode::Spread(inner) => ExprOrSpread {
      spread: Some(DUMMY_SP),
      expr: Box::new(expression_to_swc(inner, scope)),
    },
    other => ExprOrSpread {
      spread: None,
      expr: Box::new(expression_to_swc(other, scope)),
    },
  }
}

fn entry_to_swc(entry: &ObjectEntry, scope: &IdentifierScope) -> PropOrSpread {
  match entry {
    ObjectEntry::Spread(expr) => PropOrSpread::Spread(SpreadElement {
      dot3_token: DUMMY_SP,
      expr: Box::new(expression_to_swc(expr, scope)),
    }),
    ObjectEntry::Property {
      key: PropertyKey::Ident(name),
      value: ExpressionNode::Identifier(value),
    } if name == value => PropOrSpread::Prop(Box::new(Prop::Shorthand(scope.ident(name)))),
    ObjectEntry::Property { key, value } => {
      PropOrSpread::Prop(Box::new(Prop::KeyValue(KeyValueProp {
        key: property_key_to_swc(key, scope),
        value: Box::new(expression_to_swc(value, scope)),
      })))
    }
  }
}

fn property_key_to_swc(key: &PropertyKey, scope: &IdentifierScope) -> PropName {
  match key {
    PropertyKey::Ident(name) => PropName::Ident(IdentName::new(Atom::from(name.as_str()), DUMMY_SP)),
    PropertyKey::Str(name) => PropName::Str(string_lit(name)),
    PropertyKey::Num(value) => PropName::Num(Number {
      span: DUMMY_SP,
      value: *value,
      raw: None,
    }),
    PropertyKey::Computed(expr) => PropName::Computed(ComputedPropName {
      span: DUMMY_SP,
      expr: Box::new(expression_to_swc(expr, scope)),
    }),
  }
}

fn template_to_swc(parts: &[TemplatePart], scope: &IdentifierScope) -> Tpl {
  let mut quasis = Vec::new();
  let mut exprs = Vec::new();
  let mut text = String::new();

  for part in parts {
    match part {
      TemplatePart::Str(value) => text.push_str(value),
      TemplatePart::Expr(expr) => {
        quasis.push(template_element(&text, false));
        exprs.push(Box::new(expression_to_swc(expr, scope)));
        text.clear();
      }
    }
  }
  quasis.push(template_element(&text, true));

  Tpl {
    span: DUMMY_SP,
    exprs,
    quasis,
  }
}

fn template_element(cooked: &str, tail: bool) -> TplElement {
  let raw = cooked
    .replace('\\', "\\\\")
    .replace('`', "\\`")
    .replace("${", "\\${");
  TplElement {
    span: DUMMY_SP,
    tail,
    cooked: Some(Atom::from(cooked)),
    raw: Atom::from(raw),
  }
}

#[cfg(test)]
mod tests {
  use pretty_assertions::assert_eq;

  use swc_core::common::{Globals, Mark, GLOBALS};
  use swc_core::ecma::visit::{Visit, VisitWith};

  use super::*;
  use crate::merge::merge_class_name;
  use crate::test_utils::parse_expression;

  fn lower(code: &str) -> ExpressionNode {
    expression_from_swc(&parse_expression(code), &mut IdentifierScope::default()).unwrap()
  }

  fn round_trip(code: &str) -> String {
    let mut scope = IdentifierScope::default();
    let lowered = expression_from_swc(&parse_expression(code), &mut scope).unwrap();
    let raised = expression_to_swc(&lowered, &scope);
    expression_from_swc(&raised, &mut scope)
      .unwrap()
      .to_string()
  }

  #[derive(Default)]
  struct IdentContexts(Vec<(String, SyntaxContext)>);

  impl Visit for IdentContexts {
    fn visit_ident(&mut self, ident: &Ident) {
      self.0.push((ident.sym.to_string(), ident.ctxt));
    }
  }

  fn marked_ident(name: &str, ctxt: SyntaxContext) -> Expr {
    Expr::Ident(Ident::new(Atom::from(name), DUMMY_SP, ctxt))
  }

  #[test]
  fn test_lowers_literals_and_identifiers() {
    assert_eq!(lower("'red'"), ExpressionNode::string("red"));
    assert_eq!(lower("12"), ExpressionNode::number(12.0));
    assert_eq!(
      lower("true"),
      ExpressionNode::Literal(Literal::Bool(true))
    );
    assert_eq!(lower("null"), ExpressionNode::Literal(Literal::Null));
    assert_eq!(lower("fontSize"), ExpressionNode::ident("fontSize"));
  }

  #[test]
  fn test_member_chains_are_flattened() {
    assert_eq!(
      lower("props.theme.colors['primary']"),
      ExpressionNode::MemberAccess {
        base: Box::new(ExpressionNode::ident("props")),
        path: vec![
          MemberSegment::Named("theme".into()),
          MemberSegment::Named("colors".into()),
          MemberSegment::Computed(ExpressionNode::string("primary")),
        ],
      }
    );
  }

  #[test]
  fn test_lowers_templates() {
    assert_eq!(
      lower("`color: ${color}; margin: 0;`"),
      ExpressionNode::TemplateConcat(vec![
        TemplatePart::Str("color: ".into()),
        TemplatePart::Expr(ExpressionNode::ident("color")),
        TemplatePart::Str("; margin: 0;".into()),
      ])
    );
  }

  #[test]
  fn test_lowers_objects_with_spreads_and_shorthand() {
    assert_eq!(
      lower("({ ...base, color, 'font-size': 12, ':hover': { color: 'red' } })").to_string(),
      r#"{...base,color,"font-size":12,":hover":{color:"red"}}"#
    );
  }

  #[test]
  fn test_looks_through_parentheses_and_type_assertions() {
    assert_eq!(lower("(color)"), ExpressionNode::ident("color"));
  }

  #[test]
  fn test_rejects_other_expression_shapes() {
    let mut scope = IdentifierScope::default();
    let error = expression_from_swc(&parse_expression("a + b"), &mut scope).unwrap_err();

    assert_eq!(
      error,
      CssPropError::unsupported("binary expression", "expression cannot be compiled")
    );
    assert!(expression_from_swc(&parse_expression("() => 'red'"), &mut scope).is_err());
    assert!(expression_from_swc(&parse_expression("[a,,b]"), &mut scope).is_err());
  }

  #[test]
  fn test_raising_preserves_structure() {
    for code in [
      "props.color",
      "getColor(theme, ...rest)",
      "hello ? 'red' : 'blue'",
      "(a ? b : c).d",
      "`cc-1${className ? ` ${className}` : ''}`",
      "({ ...style, display: 'block', '--var-1': size })",
      "[{ color: 'black' }, `color: red;`]",
    ] {
      assert_eq!(round_trip(code), lower(code).to_string(), "{}", code);
    }
  }

  #[test]
  fn test_raised_templates_escape_backticks() {
    let raised = expression_to_swc(
      &ExpressionNode::TemplateConcat(vec![
        TemplatePart::Str("a`b".into()),
        TemplatePart::Expr(ExpressionNode::ident("x")),
      ]),
      &IdentifierScope::default(),
    );

    let Expr::Tpl(tpl) = raised else {
      panic!("expected a template literal");
    };
    assert_eq!(tpl.quasis.len(), 2);
    assert_eq!(tpl.quasis[0].raw.as_ref(), "a\\`b");
    assert!(tpl.quasis[1].tail);
  }

  #[test]
  fn test_raising_keeps_identifier_hygiene() {
    GLOBALS.set(&Globals::new(), || {
      let ctxt = SyntaxContext::empty().apply_mark(Mark::new());
      let mut scope = IdentifierScope::default();
      let lowered = expression_from_swc(&marked_ident("className", ctxt), &mut scope).unwrap();

      let raised = expression_to_swc(&merge_class_name(Some(&lowered), "cc-hash-test"), &scope);

      let mut contexts = IdentContexts::default();
      raised.visit_with(&mut contexts);
      assert_eq!(
        contexts.0,
        vec![("className".to_string(), ctxt), ("className".to_string(), ctxt)]
      );
    });
  }

  #[test]
  fn test_shorthand_properties_keep_identifier_hygiene() {
    GLOBALS.set(&Globals::new(), || {
      let ctxt = SyntaxContext::empty().apply_mark(Mark::new());
      let object = Expr::Object(ObjectLit {
        span: DUMMY_SP,
        props: vec![PropOrSpread::Prop(Box::new(Prop::Shorthand(Ident::new(
          Atom::from("color"),
          DUMMY_SP,
          ctxt,
        ))))],
      });
      let mut scope = IdentifierScope::default();
      let lowered = expression_from_swc(&object, &mut scope).unwrap();

      let mut contexts = IdentContexts::default();
      expression_to_swc(&lowered, &scope).visit_with(&mut contexts);
      assert_eq!(contexts.0, vec![("color".to_string(), ctxt)]);
    });
  }

  #[test]
  fn test_one_name_bound_twice_is_unsupported() {
    GLOBALS.set(&Globals::new(), || {
      let outer = SyntaxContext::empty().apply_mark(Mark::new());
      let inner = SyntaxContext::empty().apply_mark(Mark::new());
      let array = Expr::Array(ArrayLit {
        span: DUMMY_SP,
        elems: vec![
          Some(ExprOrSpread {
            spread: None,
            expr: Box::new(marked_ident("x", outer)),
          }),
          Some(ExprOrSpread {
            spread: None,
            expr: Box::new(marked_ident("x", inner)),
          }),
        ],
      });

      assert!(matches!(
        expression_from_swc(&array, &mut IdentifierScope::default()),
        Err(CssPropError::UnsupportedExpression { .. })
      ));
    });
  }
}
