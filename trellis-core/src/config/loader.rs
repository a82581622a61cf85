use std::collections::HashMap;
use std::path::Path;

use super::value::ConfigValue;
use super::ConfigError;

/// Load a YAML file into `values` if it exists. A missing file is not an error.
pub(crate) fn load_yaml_file(
    path: &Path,
    values: &mut HashMap<String, ConfigValue>,
) -> Result<(), ConfigError> {
    if path.exists() {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Load(format!("{}: {e}", path.display())))?;
        load_yaml_str(&content, values)
            .map_err(|e| ConfigError::Load(format!("{}: {e}", path.display())))?;
    }
    Ok(())
}

/// Parse a YAML document and flatten it into `values`.
pub(crate) fn load_yaml_str(
    content: &str,
    values: &mut HashMap<String, ConfigValue>,
) -> Result<(), ConfigError> {
    let yaml: serde_yaml::Value =
        serde_yaml::from_str(content).map_err(|e| ConfigError::Load(e.to_string()))?;
    flatten_yaml("", &yaml, values);
    Ok(())
}

/// Flatten a YAML tree into dot-separated keys.
///
/// Sequences are stored whole under their key and element-wise under
/// `key.0`, `key.1`, ... so environment variables can override one entry.
pub(crate) fn flatten_yaml(
    prefix: &str,
    value: &serde_yaml::Value,
    out: &mut HashMap<String, ConfigValue>,
) {
    match value {
        serde_yaml::Value::Mapping(map) => {
            for (k, v) in map {
                let key = match k {
                    serde_yaml::Value::String(s) => s.clone(),
                    other => format!("{other:?}"),
                };
                let full_key = if prefix.is_empty() {
                    key
                } else {
                    format!("{prefix}.{key}")
                };
                flatten_yaml(&full_key, v, out);
            }
        }
        serde_yaml::Value::Sequence(seq) if !prefix.is_empty() => {
            out.insert(
                prefix.to_string(),
                ConfigValue::List(seq.iter().map(ConfigValue::from_yaml).collect()),
            );
            for (i, item) in seq.iter().enumerate() {
                flatten_yaml(&format!("{prefix}.{i}"), item, out);
            }
        }
        leaf if !prefix.is_empty() => {
            out.insert(prefix.to_string(), ConfigValue::from_yaml(leaf));
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nested_maps_become_dotted_keys() {
        let mut values = HashMap::new();
        load_yaml_str("trellis:\n  controllers:\n    root: app/http\n", &mut values).unwrap();
        assert!(matches!(
            values.get("trellis.controllers.root"),
            Some(ConfigValue::String(s)) if s == "app/http"
        ));
    }

    #[test]
    fn sequences_are_indexed() {
        let mut values = HashMap::new();
        load_yaml_str("skip:\n  - a\n  - b\n", &mut values).unwrap();
        assert!(matches!(values.get("skip"), Some(ConfigValue::List(items)) if items.len() == 2));
        assert!(matches!(values.get("skip.1"), Some(ConfigValue::String(s)) if s == "b"));
    }

    #[test]
    fn invalid_yaml_is_a_load_error() {
        let mut values = HashMap::new();
        let err = load_yaml_str("a: [unclosed", &mut values).unwrap_err();
        assert!(matches!(err, ConfigError::Load(_)));
    }
}
