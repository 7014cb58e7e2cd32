use crate::app::diagnostics::Diagnostics;
use crate::app::error::{PrepareError, Result};
use crate::app::models::{scalar_text, Configuration, OutputTarget, Rule};
use serde_yml::Value;
use std::fs;
use std::path::Path;

/// Loads and shape-checks the configuration file.
///
/// Files ending in `.toml` are read as TOML, everything else as YAML. Both
/// are reduced to the same document tree before validation.
pub fn load_config(path: &Path, diag: &dyn Diagnostics) -> Result<Configuration> {
    if !path.exists() {
        return Err(PrepareError::ConfigNotFound {
            path: path.to_path_buf(),
        });
    }

    let content = fs::read_to_string(path).map_err(|source| PrepareError::ConfigRead {
        path: path.to_path_buf(),
        source,
    })?;

    let document = parse_document(path, &content)?;
    build_configuration(&document, diag)
}

fn parse_document(path: &Path, content: &str) -> Result<Value> {
    if path.extension().is_some_and(|ext| ext == "toml") {
        return toml::from_str(content).map_err(|source| PrepareError::TomlParse {
            path: path.to_path_buf(),
            source,
        });
    }

    // An empty YAML document is an empty mapping, which then fails the `outputs` check.
    if content.trim().is_empty() {
        return Ok(Value::Null);
    }
    serde_yml::from_str(content).map_err(|source| PrepareError::YamlParse {
        path: path.to_path_buf(),
        source,
    })
}

fn build_configuration(document: &Value, diag: &dyn Diagnostics) -> Result<Configuration> {
    let Some(Value::Mapping(outputs)) = document.get("outputs") else {
        return Err(PrepareError::InvalidConfig(
            "'outputs' section is missing or incorrect.".to_string(),
        ));
    };

    let sort_paths = match document.get("sort_paths") {
        None | Some(Value::Null) => false,
        Some(Value::Bool(flag)) => *flag,
        Some(other) => {
            diag.warn(&format!(
                "Ignoring 'sort_paths': expected a boolean, found {:?}",
                other
            ));
            false
        }
    };

    let mut targets = Vec::with_capacity(outputs.len());
    for (key, value) in outputs {
        let Some(name) = scalar_text(key) else {
            diag.warn(&format!("Skipping output with non-scalar name {:?}", key));
            continue;
        };
        let rules = match value {
            Value::Sequence(entries) => Some(parse_rules(&name, entries, diag)),
            _ => None,
        };
        targets.push(OutputTarget { name, rules });
    }

    Ok(Configuration {
        outputs: targets,
        sort_paths,
    })
}

fn parse_rules(output: &str, entries: &[Value], diag: &dyn Diagnostics) -> Vec<Rule> {
    let mut rules = Vec::with_capacity(entries.len());
    for (index, entry) in entries.iter().enumerate() {
        if !entry.is_mapping() {
            diag.warn(&format!(
                "Skipping rule #{} of '{}': rules should be mappings",
                index + 1,
                output
            ));
            continue;
        }
        match serde_yml::from_value::<Rule>(entry.clone()) {
            Ok(rule) => rules.push(rule),
            Err(e) => diag.warn(&format!(
                "Skipping rule #{} of '{}': {}",
                index + 1,
                output,
                e
            )),
        }
    }
    rules
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::diagnostics::testing::RecordingDiagnostics;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn write_config(dir: &TempDir, name: &str, body: &str) -> PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, body).unwrap();
        path
    }

    #[test]
    fn parses_outputs_in_declared_order() {
        let dir = TempDir::new().unwrap();
        let path = write_config(
            &dir,
            "prepare_config.yaml",
            r#"
outputs:
  zeta.md:
    - base_dir: src
      include: ["*.py"]
      section_heading: Source
  alpha.md:
    - base_dir: docs
      exclude: ["*.tmp"]
      description: Reference docs
"#,
        );
        let diag = RecordingDiagnostics::default();
        let config = load_config(&path, &diag).unwrap();

        let names: Vec<_> = config.outputs.iter().map(|o| o.name.as_str()).collect();
        assert_eq!(names, vec!["zeta.md", "alpha.md"]);
        assert!(!config.sort_paths);

        let rules = config.outputs[0].rules.as_ref().unwrap();
        assert_eq!(rules.len(), 1);
        assert_eq!(rules[0].base_dir, Some(PathBuf::from("src")));
        assert_eq!(rules[0].include_patterns(), vec!["*.py".to_string()]);
        assert_eq!(rules[0].heading(), Some("Source"));

        let rules = config.outputs[1].rules.as_ref().unwrap();
        assert_eq!(rules[0].include_patterns(), vec!["*".to_string()]);
        assert_eq!(rules[0].exclude_patterns(), vec!["*.tmp".to_string()]);
        assert_eq!(rules[0].note(), Some("Reference docs"));
        assert!(diag.warnings().is_empty());
    }

    #[test]
    fn missing_file_is_fatal() {
        let dir = TempDir::new().unwrap();
        let diag = RecordingDiagnostics::default();
        let err = load_config(&dir.path().join("nope.yaml"), &diag).unwrap_err();
        assert!(matches!(err, PrepareError::ConfigNotFound { .. }));
    }

    #[test]
    fn unparseable_yaml_is_fatal() {
        let dir = TempDir::new().unwrap();
        let path = write_config(&dir, "bad.yaml", "outputs: [unclosed\n");
        let diag = RecordingDiagnostics::default();
        let err = load_config(&path, &diag).unwrap_err();
        assert!(matches!(err, PrepareError::YamlParse { .. }));
    }

    #[test]
    fn missing_or_malformed_outputs_is_fatal() {
        let dir = TempDir::new().unwrap();
        let diag = RecordingDiagnostics::default();

        for (name, body) in [
            ("empty.yaml", ""),
            ("other.yaml", "something: else\n"),
            ("list.yaml", "outputs:\n  - a.md\n"),
            ("scalar.yaml", "outputs: 3\n"),
            ("toplist.yaml", "- outputs\n"),
        ] {
            let path = write_config(&dir, name, body);
            let err = load_config(&path, &diag).unwrap_err();
            assert!(
                matches!(err, PrepareError::InvalidConfig(_)),
                "{} should be rejected, got {:?}",
                name,
                err
            );
        }
    }

    #[test]
    fn non_list_rules_are_marked_for_skipping() {
        let dir = TempDir::new().unwrap();
        let path = write_config(
            &dir,
            "c.yaml",
            "outputs:\n  broken.md: {base_dir: src}\n  fine.md: []\n",
        );
        let diag = RecordingDiagnostics::default();
        let config = load_config(&path, &diag).unwrap();

        assert_eq!(config.outputs.len(), 2);
        assert!(config.outputs[0].rules.is_none());
        assert_eq!(config.outputs[1].rules, Some(Vec::new()));
    }

    #[test]
    fn malformed_rule_entries_are_skipped_with_warning() {
        let dir = TempDir::new().unwrap();
        let path = write_config(
            &dir,
            "c.yaml",
            r#"
outputs:
  doc.md:
    - just a string
    - base_dir: src
      include: "*.py"
    - base_dir: src
"#,
        );
        let diag = RecordingDiagnostics::default();
        let config = load_config(&path, &diag).unwrap();

        let rules = config.outputs[0].rules.as_ref().unwrap();
        assert_eq!(rules.len(), 1);
        assert_eq!(rules[0].base_dir, Some(PathBuf::from("src")));

        let warnings = diag.warnings();
        assert_eq!(warnings.len(), 2);
        assert!(warnings[0].contains("rule #1"));
        assert!(warnings[1].contains("rule #2"));
    }

    #[test]
    fn scalar_headings_keep_the_rule() {
        let dir = TempDir::new().unwrap();
        let path = write_config(
            &dir,
            "c.yaml",
            r#"
outputs:
  2024:
    - base_dir: src
      section_heading: 2024
      description: true
"#,
        );
        let diag = RecordingDiagnostics::default();
        let config = load_config(&path, &diag).unwrap();

        assert_eq!(config.outputs[0].name, "2024");
        let rules = config.outputs[0].rules.as_ref().unwrap();
        assert_eq!(rules.len(), 1);
        assert_eq!(rules[0].heading(), Some("2024"));
        assert_eq!(rules[0].note(), Some("True"));
        assert!(diag.warnings().is_empty());
    }

    #[test]
    fn null_include_falls_back_to_default() {
        let dir = TempDir::new().unwrap();
        let path = write_config(
            &dir,
            "c.yaml",
            "outputs:\n  doc.md:\n    - base_dir: src\n      include: null\n",
        );
        let diag = RecordingDiagnostics::default();
        let config = load_config(&path, &diag).unwrap();
        let rules = config.outputs[0].rules.as_ref().unwrap();
        assert_eq!(rules[0].include_patterns(), vec!["*".to_string()]);
    }

    #[test]
    fn sort_paths_flag() {
        let dir = TempDir::new().unwrap();
        let diag = RecordingDiagnostics::default();

        let path = write_config(&dir, "a.yaml", "sort_paths: true\noutputs: {}\n");
        assert!(load_config(&path, &diag).unwrap().sort_paths);

        let path = write_config(&dir, "b.yaml", "sort_paths: yes please\noutputs: {}\n");
        assert!(!load_config(&path, &diag).unwrap().sort_paths);
        assert_eq!(diag.warnings().len(), 1);
    }

    #[test]
    fn toml_configs_share_the_same_shape() {
        let dir = TempDir::new().unwrap();
        let path = write_config(
            &dir,
            "prepare_config.toml",
            r#"
sort_paths = true

[[outputs."api.md"]]
base_dir = "src"
include = ["*.rs"]
section_heading = "API"

[[outputs."api.md"]]
base_dir = "tests"
"#,
        );
        let diag = RecordingDiagnostics::default();
        let config = load_config(&path, &diag).unwrap();

        assert!(config.sort_paths);
        assert_eq!(config.outputs.len(), 1);
        assert_eq!(config.outputs[0].name, "api.md");
        let rules = config.outputs[0].rules.as_ref().unwrap();
        assert_eq!(rules.len(), 2);
        assert_eq!(rules[0].heading(), Some("API"));
        assert_eq!(rules[1].base_dir, Some(PathBuf::from("tests")));
    }

    #[test]
    fn unparseable_toml_is_fatal() {
        let dir = TempDir::new().unwrap();
        let path = write_config(&dir, "bad.toml", "outputs = [\n");
        let diag = RecordingDiagnostics::default();
        let err = load_config(&path, &diag).unwrap_err();
        assert!(matches!(err, PrepareError::TomlParse { .. }));
    }
}
