use crate::app::diagnostics::Diagnostics;
use crate::app::formatter::FileRenderer;
use crate::app::models::Rule;
use crate::app::scanner::{PatternFilter, Scanner};
use crate::app::toc::generate_table_of_contents;

/// Markdown fragments and section headings collected for one output.
#[derive(Debug, Default)]
pub struct DocumentBuffer {
    fragments: Vec<String>,
    sections: Vec<String>,
}

impl DocumentBuffer {
    pub fn push_heading(&mut self, heading: &str) {
        self.sections.push(heading.to_string());
        self.fragments.push(format!("## {}\n\n", heading));
    }

    pub fn push_note(&mut self, description: &str) {
        self.fragments.push(format!("> NOTE: {}\n\n", description));
    }

    pub fn push_file_header(&mut self, relative_path: &str) {
        self.fragments.push(format!("### File: `{}`\n", relative_path));
    }

    pub fn push_block(&mut self, block: String) {
        self.fragments.push(block + "\n\n");
    }

    /// Prepends the table of contents and joins everything into the final text.
    pub fn finish(self) -> String {
        let mut parts = Vec::with_capacity(self.fragments.len() + 1);
        parts.push(generate_table_of_contents(&self.sections));
        parts.extend(self.fragments);
        parts.join("\n")
    }
}

/// Builds the complete Markdown document for one output target.
pub fn assemble_document(
    output: &str,
    rules: &[Rule],
    sort_paths: bool,
    diag: &dyn Diagnostics,
) -> String {
    let mut buffer = DocumentBuffer::default();
    for rule in rules {
        append_rule(&mut buffer, output, rule, sort_paths, diag);
    }
    buffer.finish()
}

fn append_rule(
    buffer: &mut DocumentBuffer,
    output: &str,
    rule: &Rule,
    sort_paths: bool,
    diag: &dyn Diagnostics,
) {
    let base_dir = match rule.resolved_base_dir() {
        Some(dir) if dir.exists() => dir,
        Some(dir) => {
            diag.warn(&format!(
                "Skipping invalid or missing base_dir: '{}'",
                dir.display()
            ));
            return;
        }
        None => {
            diag.warn("Skipping invalid or missing base_dir: none given");
            return;
        }
    };

    let filter = match PatternFilter::new(&rule.include_patterns(), &rule.exclude_patterns()) {
        Ok(filter) => filter,
        Err(e) => {
            diag.warn(&format!(
                "Skipping rule for '{}' in '{}': {}",
                base_dir.display(),
                output,
                e
            ));
            return;
        }
    };

    if let Some(heading) = rule.heading() {
        buffer.push_heading(heading);
    }
    if let Some(description) = rule.note() {
        buffer.push_note(description);
    }

    let scanner = Scanner::new(base_dir, filter, sort_paths);
    for entry in scanner.scan(diag) {
        diag.info(&format!("Processing '{}'...", entry.path.display()));
        buffer.push_file_header(&entry.relative_path);
        match FileRenderer::render(&entry.path) {
            Ok(block) => buffer.push_block(block),
            Err(e) => diag.warn(&e.to_string()),
        }
    }
}
