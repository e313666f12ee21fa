use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CssPropConfig {
  ///
  /// Prefix of generated class names, `<prefix>-<hash>`.
  ///
  /// Defaults to `"cc"`
  ///
  pub class_name_prefix: String,
  ///
  /// Namespace of generated custom properties, `--<prefix>-<hash>`.
  ///
  /// Defaults to `"var"`
  ///
  pub variable_prefix: String,
  ///
  /// Seed fed to the content hash.
  ///
  /// Defaults to `0`
  ///
  pub hash_seed: u32,
  ///
  /// Name of the JSX attribute holding the style specification.
  ///
  /// Defaults to `"css"`
  ///
  pub css_attribute: String,
  ///
  /// Security nonce handed to the runtime style element, untouched.
  ///
  /// Defaults to `None`
  ///
  pub nonce: Option<String>,
}

impl Default for CssPropConfig {
  fn default() -> Self {
    Self {
      class_name_prefix: "cc".into(),
      variable_prefix: "var".into(),
      hash_seed: 0,
      css_attribute: "css".into(),
      nonce: None,
    }
  }
}

impl CssPropConfig {
  pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
    serde_json::from_str(json)
  }
}
