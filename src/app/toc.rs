/// Derives the link anchor for a section heading.
///
/// Lowercases, turns spaces into hyphens and strips `*` and `#`. Nothing
/// else is normalized, so punctuation and repeated hyphens survive.
pub fn anchor(heading: &str) -> String {
    heading
        .to_lowercase()
        .replace(' ', "-")
        .replace(['*', '#'], "")
}

/// Renders the table of contents for the headings met during a build.
///
/// Entries keep their order and duplicates are listed verbatim.
pub fn generate_table_of_contents(sections: &[String]) -> String {
    let mut lines = vec![String::from("# Table of Contents\n")];
    for section in sections {
        lines.push(format!("- [{}](#{})", section, anchor(section)));
    }
    let mut toc = lines.join("\n");
    toc.push_str("\n\n");
    toc
}
