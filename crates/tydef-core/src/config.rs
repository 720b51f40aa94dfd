use std::fs;
use std::path::Path;

use serde::Deserialize;

/// Top-level project configuration loaded from `.tydef.yaml`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TydefConfig {
    pub input: String,
    pub output: String,
    /// Name for the ambient root declaration (JSON Schema input) or the
    /// declaration tree (OpenAPI input).
    pub root_name: Option<String>,
    /// File name for the emitted declarations, overriding the default
    /// derived from the tree name.
    pub file_name: Option<String>,
    pub openapi: OpenApiSection,
}

impl Default for TydefConfig {
    fn default() -> Self {
        Self {
            input: "schema.yaml".to_string(),
            output: "generated".to_string(),
            root_name: None,
            file_name: None,
            openapi: OpenApiSection::default(),
        }
    }
}

/// OpenAPI-specific switches.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct OpenApiSection {
    /// Response status codes to keep in synthesized `Output` unions.
    /// Empty means all.
    pub statuses: Vec<u16>,
    /// Declare every schema in the document, not only reachable ones.
    pub all_schemas: bool,
}

/// Default config file name.
pub const CONFIG_FILE_NAME: &str = ".tydef.yaml";

/// Load config from a YAML file. Returns `None` if the file doesn't exist.
pub fn load_config(path: &Path) -> Result<Option<TydefConfig>, String> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path)
        .map_err(|e| format!("failed to read config {}: {}", path.display(), e))?;
    let config: TydefConfig = serde_yaml_ng::from_str(&content)
        .map_err(|e| format!("failed to parse config {}: {}", path.display(), e))?;
    Ok(Some(config))
}

/// Generate the default config file content.
pub fn default_config_content() -> &'static str {
    r#"# tydef configuration — https://github.com/tydef/tydef
input: schema.yaml      # JSON Schema or OpenAPI 3.x document (YAML or JSON)
output: generated

# root_name: MyTypes    # ambient root / tree name (defaults to the title)
# file_name: types.d.ts

openapi:
  statuses: []          # keep only these response codes in Output unions
  all_schemas: false    # declare every component schema, reachable or not
"#
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = TydefConfig::default();
        assert_eq!(config.input, "schema.yaml");
        assert_eq!(config.output, "generated");
        assert!(config.root_name.is_none());
        assert!(config.openapi.statuses.is_empty());
        assert!(!config.openapi.all_schemas);
    }

    #[test]
    fn test_parse_config_yaml() {
        let yaml = r#"
input: api.yaml
output: out
root_name: Petstore
openapi:
  statuses: [200, 404]
  all_schemas: true
"#;
        let config: TydefConfig = serde_yaml_ng::from_str(yaml).unwrap();
        assert_eq!(config.input, "api.yaml");
        assert_eq!(config.output, "out");
        assert_eq!(config.root_name.as_deref(), Some("Petstore"));
        assert_eq!(config.openapi.statuses, vec![200, 404]);
        assert!(config.openapi.all_schemas);
    }

    #[test]
    fn test_parse_minimal_config() {
        let yaml = "input: api.json\n";
        let config: TydefConfig = serde_yaml_ng::from_str(yaml).unwrap();
        assert_eq!(config.input, "api.json");
        // Defaults applied
        assert_eq!(config.output, "generated");
        assert!(config.openapi.statuses.is_empty());
    }

    #[test]
    fn test_default_content_parses() {
        let config: TydefConfig = serde_yaml_ng::from_str(default_config_content()).unwrap();
        assert_eq!(config.input, "schema.yaml");
    }
}
