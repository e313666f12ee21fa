use crate::rule::{split_selector_list, Rule, SelectorFragment};

/// Attaches bare pseudo selectors written directly inside an at-rule to the
/// enclosing selector, so
///
/// ```css
/// @media screen { :hover { color: red } }
/// ```
///
/// styles the element itself on hover under the media condition rather than its
/// hovered descendants. Only direct children of an at-rule are rewritten.
pub fn bubble_pseudos(mut rule: Rule) -> Rule {
  bubble_rule(&mut rule);
  rule
}

fn bubble_rule(rule: &mut Rule) {
  let is_at_rule = rule.is_at_rule();
  for child in &mut rule.children {
    if is_at_rule && child.fragment().is_some_and(SelectorFragment::is_bare_pseudo) {
      if let Some(SelectorFragment::Selector(selector)) = child.selector_path.last_mut() {
        *selector = nest_pseudos(selector);
      }
    }
    bubble_rule(child);
  }
}

/// `:hover, :focus` -> `&:hover,&:focus`
fn nest_pseudos(selector: &str) -> String {
  split_selector_list(selector)
    .into_iter()
    .map(|part| {
      if part.starts_with(':') {
        format!("&{}", part)
      } else {
        part.to_string()
      }
    })
    .collect::<Vec<_>>()
    .join(",")
}
