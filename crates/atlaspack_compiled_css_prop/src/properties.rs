use crate::expression::format_number;

const VENDOR_PREFIXES: [(&str, &str); 3] = [("Webkit", "-webkit-"), ("Moz", "-moz-"), ("ms", "-ms-")];

/// Normalizes a camel-cased property name (`fontSize`, `WebkitLineClamp`) to its
/// CSS form. Kebab-cased names and custom properties pass through unchanged.
pub fn kebab_case(property: &str) -> String {
  if property.starts_with("--") {
    return property.to_string();
  }

  let vendor = VENDOR_PREFIXES.iter().find(|(prefix, _)| {
    property
      .strip_prefix(prefix)
      .is_some_and(|rest| rest.starts_with(|ch: char| ch.is_ascii_uppercase()))
  });

  let (mut result, rest) = match vendor {
    Some((prefix, replacement)) => (replacement.to_string(), &property[prefix.len()..]),
    None => (String::with_capacity(property.len() + 4), property),
  };

  for (index, ch) in rest.chars().enumerate() {
    if ch.is_ascii_uppercase() {
      if index > 0 {
        result.push('-');
      }
      result.push(ch.to_ascii_lowercase());
    } else {
      result.push(ch);
    }
  }

  result
}

/// Properties whose numeric values must not receive a length unit.
pub fn is_unitless_property(property: &str) -> bool {
  matches!(
    property,
    "animation-iteration-count"
      | "aspect-ratio"
      | "border-image-outset"
      | "border-image-slice"
      | "border-image-width"
      | "box-flex"
      | "box-flex-group"
      | "box-ordinal-group"
      | "column-count"
      | "columns"
      | "fill-opacity"
      | "flex"
      | "flex-grow"
      | "flex-negative"
      | "flex-order"
      | "flex-positive"
      | "flex-shrink"
      | "flood-opacity"
      | "font-size-adjust"
      | "font-weight"
      | "grid-area"
      | "grid-column"
      | "grid-column-end"
      | "grid-column-span"
      | "grid-column-start"
      | "grid-row"
      | "grid-row-end"
      | "grid-row-span"
      | "grid-row-start"
      | "line-clamp"
      | "-webkit-line-clamp"
      | "line-height"
      | "opacity"
      | "order"
      | "orphans"
      | "stop-opacity"
      | "stroke-dasharray"
      | "stroke-dashoffset"
      | "stroke-miterlimit"
      | "stroke-opacity"
      | "stroke-width"
      | "tab-size"
      | "widows"
      | "z-index"
      | "zoom"
  ) || property.starts_with("--")
}

/// Renders a numeric value for `property`, appending `px` unless the value is
/// zero or the property is unitless.
pub fn add_unit_if_needed(property: &str, value: f64) -> String {
  let number = format_number(value);
  if value == 0.0 || is_unitless_property(property) {
    number
  } else {
    format!("{}px", number)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_kebab_case() {
    assert_eq!(kebab_case("fontSize"), "font-size");
    assert_eq!(kebab_case("backgroundImage"), "background-image");
    assert_eq!(kebab_case("font-size"), "font-size");
    assert_eq!(kebab_case("color"), "color");
    assert_eq!(kebab_case("--gapSize"), "--gapSize");
  }

  #[test]
  fn test_kebab_case_vendor_prefixes() {
    assert_eq!(kebab_case("WebkitLineClamp"), "-webkit-line-clamp");
    assert_eq!(kebab_case("MozAppearance"), "-moz-appearance");
    assert_eq!(kebab_case("msTransform"), "-ms-transform");
    assert_eq!(kebab_case("mask"), "mask");
  }

  #[test]
  fn test_add_unit_if_needed() {
    assert_eq!(add_unit_if_needed("font-size", 12.0), "12px");
    assert_eq!(add_unit_if_needed("margin", 0.0), "0");
    assert_eq!(add_unit_if_needed("line-height", 1.5), "1.5");
    assert_eq!(add_unit_if_needed("z-index", 10.0), "10");
    assert_eq!(add_unit_if_needed("--size", 4.0), "4");
  }
}
