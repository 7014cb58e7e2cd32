use serde::{de, Deserialize, Deserializer};
use serde_yml::Value;
use std::path::{Path, PathBuf};

/// The parsed configuration file.
#[derive(Debug, Clone, Default)]
pub struct Configuration {
    pub outputs: Vec<OutputTarget>,
    /// Visit siblings in file-name order instead of enumeration order.
    pub sort_paths: bool,
}

/// One named Markdown document and the rules that feed it.
#[derive(Debug, Clone)]
pub struct OutputTarget {
    pub name: String,
    /// `None` when the configured value was not a list of rules.
    pub rules: Option<Vec<Rule>>,
}

/// A single directory-scan instruction.
///
/// `base_dir`, `section_heading` and `description` take any scalar. Falsy
/// scalars (`false`, `0`, `null`) count as absent.
#[derive(Deserialize, Debug, Clone, Default, PartialEq)]
pub struct Rule {
    #[serde(default, deserialize_with = "optional_scalar_path")]
    pub base_dir: Option<PathBuf>,
    pub include: Option<Vec<String>>,
    pub exclude: Option<Vec<String>>,
    #[serde(default, deserialize_with = "optional_scalar")]
    pub section_heading: Option<String>,
    #[serde(default, deserialize_with = "optional_scalar")]
    pub description: Option<String>,
}

/// Text of a scalar config value. Booleans print as `True`/`False`.
pub fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(true) => Some(String::from("True")),
        Value::Bool(false) => Some(String::from("False")),
        Value::Tagged(tagged) => scalar_text(&tagged.value),
        _ => None,
    }
}

fn is_falsy(value: &Value) -> bool {
    match value {
        Value::Null | Value::Bool(false) => true,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::Tagged(tagged) => is_falsy(&tagged.value),
        _ => false,
    }
}

fn optional_scalar<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    if is_falsy(&value) {
        return Ok(None);
    }
    scalar_text(&value)
        .map(Some)
        .ok_or_else(|| de::Error::custom(format!("expected a scalar, found {:?}", value)))
}

fn optional_scalar_path<'de, D>(deserializer: D) -> Result<Option<PathBuf>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(optional_scalar(deserializer)?.map(PathBuf::from))
}

impl Rule {
    /// Base directory with a leading `~` expanded, or `None` when unset or empty.
    pub fn resolved_base_dir(&self) -> Option<PathBuf> {
        let base = self.base_dir.as_deref()?;
        if base.as_os_str().is_empty() {
            return None;
        }
        Some(expand_home(base))
    }

    pub fn include_patterns(&self) -> Vec<String> {
        self.include
            .clone()
            .unwrap_or_else(|| vec![String::from("*")])
    }

    pub fn exclude_patterns(&self) -> Vec<String> {
        self.exclude.clone().unwrap_or_default()
    }

    pub fn heading(&self) -> Option<&str> {
        self.section_heading.as_deref().filter(|s| !s.is_empty())
    }

    pub fn note(&self) -> Option<&str> {
        self.description.as_deref().filter(|s| !s.is_empty())
    }
}

fn expand_home(path: &Path) -> PathBuf {
    let Ok(rest) = path.strip_prefix("~") else {
        return path.to_path_buf();
    };
    match dirs::home_dir() {
        Some(home) if rest.as_os_str().is_empty() => home,
        Some(home) => home.join(rest),
        None => path.to_path_buf(),
    }
}

/// A file selected for rendering.
#[derive(Debug, Clone, PartialEq)]
pub struct FileEntry {
    pub path: PathBuf,
    pub relative_path: String,
}
