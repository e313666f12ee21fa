use crate::expression::ExpressionNode;

/// One level of a nested selector path.
#[derive(Clone, Debug, PartialEq)]
pub enum SelectorFragment {
  /// An at-rule prelude such as `@media screen`.
  AtRule(String),
  /// A nested selector such as `&:hover`, `:focus` or `div > span`.
  Selector(String),
}

impl SelectorFragment {
  /// Classifies an authored selector key, collapsing its whitespace.
  pub fn parse(text: &str) -> Self {
    let normalized = collapse_whitespace(text);
    if normalized.starts_with('@') {
      SelectorFragment::AtRule(normalized)
    } else {
      SelectorFragment::Selector(normalized)
    }
  }

  pub fn text(&self) -> &str {
    match self {
      SelectorFragment::AtRule(text) | SelectorFragment::Selector(text) => text,
    }
  }

  pub fn is_at_rule(&self) -> bool {
    matches!(self, SelectorFragment::AtRule(_))
  }

  /// A bare pseudo selector without a nesting reference, e.g. `:hover`.
  pub fn is_bare_pseudo(&self) -> bool {
    matches!(self, SelectorFragment::Selector(text) if text.starts_with(':'))
  }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Declaration {
  /// Kebab-cased property name.
  pub property: String,
  pub value: ExpressionNode,
}

impl Declaration {
  pub fn new(property: impl Into<String>, value: ExpressionNode) -> Self {
    Self {
      property: property.into(),
      value,
    }
  }
}

/// A selector scope holding declarations and nested rules.
///
/// `selector_path` is the full path from the root rule, which has an empty path.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Rule {
  pub selector_path: Vec<SelectorFragment>,
  pub declarations: Vec<Declaration>,
  pub children: Vec<Rule>,
}

impl Rule {
  pub fn root() -> Self {
    Self::default()
  }

  /// Creates an empty child scope whose path extends this rule's path.
  pub fn child(&self, fragment: SelectorFragment) -> Self {
    let mut selector_path = self.selector_path.clone();
    selector_path.push(fragment);
    Self {
      selector_path,
      ..Default::default()
    }
  }

  /// The fragment this rule adds to its parent's path.
  pub fn fragment(&self) -> Option<&SelectorFragment> {
    self.selector_path.last()
  }

  pub fn is_at_rule(&self) -> bool {
    self.fragment().is_some_and(SelectorFragment::is_at_rule)
  }

  pub fn is_empty(&self) -> bool {
    self.declarations.is_empty() && self.children.iter().all(Rule::is_empty)
  }

  /// Appends a sibling rule of the same scope: its declarations after ours and its
  /// children after ours, preserving authoring order for the cascade.
  pub fn absorb(&mut self, other: Rule) {
    self.declarations.extend(other.declarations);
    for mut child in other.children {
      child.rebase(&self.selector_path, other.selector_path.len());
      self.children.push(child);
    }
  }

  fn rebase(&mut self, prefix: &[SelectorFragment], old_prefix_len: usize) {
    let mut selector_path = prefix.to_vec();
    selector_path.extend(self.selector_path.drain(old_prefix_len..));
    self.selector_path = selector_path;
    for child in &mut self.children {
      child.rebase(prefix, old_prefix_len);
    }
  }
}

pub(crate) fn collapse_whitespace(text: &str) -> String {
  text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Splits on top-level commas, leaving `:is(a, b)` and `[a=","]` intact.
pub(crate) fn split_selector_list(selector: &str) -> Vec<&str> {
  let mut parts = Vec::new();
  let mut depth = 0usize;
  let mut quote: Option<char> = None;
  let mut start = 0;

  for (index, ch) in selector.char_indices() {
    match (quote, ch) {
      (Some(open), _) if ch == open => quote = None,
      (Some(_), _) => {}
      (None, '"' | '\'') => quote = Some(ch),
      (None, '(' | '[') => depth += 1,
      (None, ')' | ']') => depth = depth.saturating_sub(1),
      (None, ',') if depth == 0 => {
        parts.push(selector[start..index].trim());
        start = index + 1;
      }
      _ => {}
    }
  }
  parts.push(selector[start..].trim());
  parts
}

#[cfg(test)]
mod tests {
  use pretty_assertions::assert_eq;

  use super::*;

  #[test]
  fn test_parse_selector_fragment() {
    assert_eq!(
      SelectorFragment::parse("@media   screen and (min-width: 10px)"),
      SelectorFragment::AtRule("@media screen and (min-width: 10px)".into())
    );
    assert!(SelectorFragment::parse(":hover").is_bare_pseudo());
    assert!(!SelectorFragment::parse("&:hover").is_bare_pseudo());
    assert!(!SelectorFragment::parse("@supports (display: grid)").is_bare_pseudo());
  }

  #[test]
  fn test_split_selector_list_keeps_nested_commas() {
    assert_eq!(
      split_selector_list(":not(.a, :hover), [data-x=\",\"] , p"),
      vec![":not(.a, :hover)", "[data-x=\",\"]", "p"]
    );
  }

  #[test]
  fn test_child_extends_selector_path() {
    let media = Rule::root().child(SelectorFragment::parse("@media screen"));
    let hover = media.child(SelectorFragment::parse(":hover"));

    assert_eq!(
      hover.selector_path,
      vec![
        SelectorFragment::AtRule("@media screen".into()),
        SelectorFragment::Selector(":hover".into()),
      ]
    );
    assert_eq!(hover.fragment(), Some(&SelectorFragment::Selector(":hover".into())));
    assert!(media.is_at_rule());
  }

  #[test]
  fn test_absorb_keeps_order_and_rebases_children() {
    let mut first = Rule::root();
    first
      .declarations
      .push(Declaration::new("color", ExpressionNode::string("black")));

    let mut second = Rule::root();
    second
      .declarations
      .push(Declaration::new("color", ExpressionNode::string("red")));
    let mut hover = second.child(SelectorFragment::parse(":hover"));
    hover
      .declarations
      .push(Declaration::new("color", ExpressionNode::string("blue")));
    second.children.push(hover);

    first.absorb(second);

    let colors: Vec<_> = first
      .declarations
      .iter()
      .map(|declaration| declaration.value.to_string())
      .collect();
    assert_eq!(colors, vec![r#""black""#, r#""red""#]);
    assert_eq!(first.children.len(), 1);
    assert_eq!(first.children[0].selector_path.len(), 1);
  }

  #[test]
  fn test_is_empty_ignores_empty_children() {
    let mut rule = Rule::root();
    let media = rule.child(SelectorFragment::parse("@media print"));
    rule.children.push(media);

    assert!(rule.is_empty());
  }
}
