use std::path::Path;

/// Tag used for files whose extension is unknown or missing.
pub const PLAINTEXT: &str = "plaintext";

/// Maps a file name to the language tag used on its fenced code block.
///
/// The lookup is case-sensitive: `main.RS` is plaintext.
pub fn detect_language(file_name: impl AsRef<Path>) -> &'static str {
    let Some(ext) = file_name.as_ref().extension().and_then(|e| e.to_str()) else {
        return PLAINTEXT;
    };

    match ext {
        "py" => "python",
        "js" | "jsx" => "javascript",
        "ts" | "tsx" => "typescript",
        "html" => "html",
        "css" => "css",
        "json" => "json",
        "yaml" | "yml" => "yaml",
        "java" => "java",
        "c" => "c",
        "cpp" => "cpp",
        "cs" => "csharp",
        "rb" => "ruby",
        "go" => "go",
        "php" => "php",
        "sh" => "bash",
        "bat" => "batch",
        "sql" => "sql",
        "swift" => "swift",
        "kt" => "kotlin",
        "rs" => "rust",
        "xml" => "xml",
        "ini" => "ini",
        "md" => "markdown",
        "svelte" => "svelte",
        "tf" | "tfvars" => "hcl",
        _ => PLAINTEXT,
    }
}
