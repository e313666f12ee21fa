use swc_core::common::Span;

/// Failure compiling one element's css prop.
///
/// Every variant is fatal for the element being compiled only; the host is
/// expected to report it and carry on with the rest of the module.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum CssPropError {
  /// The CSS text could not be tokenized as balanced CSS-like syntax, or an
  /// embedded expression appears outside of a declaration value.
  #[error("Malformed style: {reason} (near `{context}`)")]
  MalformedStyle { reason: String, context: String },

  /// The compiler was invoked on an element without a style specification.
  #[error("Element has no css prop to compile")]
  NoStyleSpecification,

  /// A style value, key or selector uses an expression shape that cannot be compiled.
  #[error("Unsupported expression `{expression}`: {reason}")]
  UnsupportedExpression { expression: String, reason: String },
}

impl CssPropError {
  pub fn malformed(reason: impl Into<String>, context: impl Into<String>) -> Self {
    CssPropError::MalformedStyle {
      reason: reason.into(),
      context: context.into(),
    }
  }

  pub fn unsupported(expression: impl ToString, reason: impl Into<String>) -> Self {
    CssPropError::UnsupportedExpression {
      expression: expression.to_string(),
      reason: reason.into(),
    }
  }
}

/// A [`CssPropError`] located in the source being transformed.
#[derive(Clone, Debug, PartialEq)]
pub struct CssPropDiagnostic {
  pub error: CssPropError,
  pub span: Span,
}
