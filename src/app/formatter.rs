use crate::app::error::{PrepareError, Result};
use crate::app::language::detect_language;
use std::fs;
use std::path::Path;

pub struct FileRenderer;

impl FileRenderer {
    /// Reads `path` as UTF-8 and wraps it in a fence tagged with its language.
    pub fn render(path: &Path) -> Result<String> {
        let code = fs::read_to_string(path).map_err(|source| PrepareError::FileRead {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::code_block(&code, detect_language(path)))
    }

    pub fn code_block(code: &str, language: &str) -> String {
        format!("```{}\n{}\n```", language, code)
    }
}
