use crate::app::diagnostics::Diagnostics;
use crate::app::error::{PrepareError, Result};
use crate::app::models::FileEntry;
use globset::{escape, GlobBuilder, GlobSet, GlobSetBuilder};
use ignore::WalkBuilder;
use pathdiff::diff_paths;
use std::path::{Path, PathBuf};

/// Include/exclude decision for paths relative to a rule's base directory.
///
/// Patterns are shell-style (`*`, `?`, `[seq]`, `[!seq]`) and match the
/// whole relative path, so `*` also crosses `/`. Everything else is literal.
pub struct PatternFilter {
    include_set: GlobSet,
    exclude_set: GlobSet,
}

impl PatternFilter {
    pub fn new(include: &[String], exclude: &[String]) -> Result<Self> {
        Ok(Self {
            include_set: build_globset(include)?,
            exclude_set: build_globset(exclude)?,
        })
    }

    /// True iff some include pattern matches and no exclude pattern does.
    pub fn is_included(&self, relative: impl AsRef<Path>) -> bool {
        let relative = relative.as_ref();
        // Excludes override everything.
        if self.exclude_set.is_match(relative) {
            return false;
        }
        self.include_set.is_match(relative)
    }
}

/// Walks one rule's base directory and keeps the files its filter accepts.
pub struct Scanner {
    root: PathBuf,
    filter: PatternFilter,
    sort_paths: bool,
}

impl Scanner {
    pub fn new(root: PathBuf, filter: PatternFilter, sort_paths: bool) -> Self {
        Self {
            root,
            filter,
            sort_paths,
        }
    }

    /// Selected files in traversal order.
    ///
    /// Each directory lists its own files first, then descends into its
    /// subdirectories. Entries keep enumeration order unless `sort_paths`
    /// is set. Walk errors are reported and skipped.
    pub fn scan(&self, diag: &dyn Diagnostics) -> Vec<FileEntry> {
        let mut entries = Vec::new();
        if self.root.is_dir() {
            self.scan_dir(&self.root, &mut entries, diag);
        }
        entries
    }

    fn scan_dir(&self, dir: &Path, entries: &mut Vec<FileEntry>, diag: &dyn Diagnostics) {
        // One level only: no ignore files, hidden entries included.
        let mut builder = WalkBuilder::new(dir);
        builder
            .standard_filters(false)
            .follow_links(false)
            .max_depth(Some(1));
        if self.sort_paths {
            builder.sort_by_file_name(|a, b| a.cmp(b));
        }

        let mut subdirs = Vec::new();
        for result in builder.build() {
            match result {
                Ok(entry) => {
                    if entry.depth() == 0 {
                        continue;
                    }
                    match entry.file_type() {
                        Some(ft) if ft.is_dir() => subdirs.push(entry.into_path()),
                        // Linked directories are listed but never entered.
                        Some(ft) if ft.is_symlink() && entry.path().is_dir() => {}
                        // Dangling links count as files and fail at render time.
                        Some(ft) if ft.is_file() || ft.is_symlink() => {
                            if let Some(processed) = self.process_entry(entry.path()) {
                                entries.push(processed);
                            }
                        }
                        _ => {}
                    }
                }
                Err(err) => diag.warn(&format!("Error walking entry: {}", err)),
            }
        }

        for subdir in subdirs {
            self.scan_dir(&subdir, entries, diag);
        }
    }

    fn process_entry(&self, path: &Path) -> Option<FileEntry> {
        let relative = diff_paths(path, &self.root)?;
        if !self.filter.is_included(&relative) {
            return None;
        }

        Some(FileEntry {
            path: path.to_path_buf(),
            relative_path: relative.to_string_lossy().into_owned(),
        })
    }
}

fn build_globset(patterns: &[String]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pat in patterns {
        // A pattern with an empty character class can never match.
        let Some(translated) = translate_pattern(pat) else {
            continue;
        };
        let glob = GlobBuilder::new(&translated)
            .literal_separator(false)
            .backslash_escape(false)
            .build()
            .map_err(|source| PrepareError::Pattern {
                pattern: pat.clone(),
                source,
            })?;
        builder.add(glob);
    }
    builder.build().map_err(|source| PrepareError::Pattern {
        pattern: patterns.join(", "),
        source,
    })
}

/// Rewrites a shell-style pattern into globset syntax.
///
/// Braces, a `[` without a closing `]` and other globset-only syntax are
/// escaped so they match literally. Runs of `*` collapse to one, which keeps
/// `**` from taking globset's directory meaning. Returns `None` when the
/// pattern contains a class with nothing left in it.
fn translate_pattern(pattern: &str) -> Option<String> {
    let chars: Vec<char> = pattern.chars().collect();
    let mut out = String::with_capacity(pattern.len());
    let mut i = 0;
    while i < chars.len() {
        match chars[i] {
            '*' => {
                if !out.ends_with('*') {
                    out.push('*');
                }
            }
            '?' => out.push('?'),
            '[' => match class_end(&chars, i) {
                Some(end) => {
                    out.push_str(&translate_class(&chars[i + 1..end])?);
                    i = end;
                }
                None => out.push_str(&escape("[")),
            },
            c => out.push_str(&escape(c.encode_utf8(&mut [0; 4]))),
        }
        i += 1;
    }
    Some(out)
}

/// Index of the `]` closing the class opened at `start`, if any.
fn class_end(chars: &[char], start: usize) -> Option<usize> {
    let mut j = start + 1;
    if chars.get(j) == Some(&'!') {
        j += 1;
    }
    // A leading `]` is a member, not the terminator.
    if chars.get(j) == Some(&']') {
        j += 1;
    }
    while j < chars.len() && chars[j] != ']' {
        j += 1;
    }
    (j < chars.len()).then_some(j)
}

#[derive(Clone, Copy, PartialEq)]
enum ClassItem {
    Char(char),
    Range(char, char),
}

impl ClassItem {
    fn first(self) -> char {
        match self {
            ClassItem::Char(c) | ClassItem::Range(c, _) => c,
        }
    }

    fn render(self, out: &mut String) {
        match self {
            ClassItem::Char(c) => out.push(c),
            ClassItem::Range(a, b) => {
                out.push(a);
                out.push('-');
                out.push(b);
            }
        }
    }
}

fn is_negation_char(c: char) -> bool {
    c == '^' || c == '!'
}

/// Translates the body of a `[...]` class. Reversed ranges are dropped.
fn translate_class(body: &[char]) -> Option<String> {
    let (negated, body) = match body.split_first() {
        Some(('!', rest)) => (true, rest),
        _ => (false, body),
    };

    let mut items = Vec::new();
    let mut i = 0;
    while i < body.len() {
        if i + 2 < body.len() && body[i + 1] == '-' {
            if body[i] <= body[i + 2] {
                items.push(ClassItem::Range(body[i], body[i + 2]));
            }
            i += 3;
        } else {
            items.push(ClassItem::Char(body[i]));
            i += 1;
        }
    }

    if items.is_empty() {
        return if negated { Some("?".to_string()) } else { None };
    }

    // globset reads a leading `^` or `!` as negation and a stray `-` as a
    // range, so `]` goes first, those items after the rest and `-` last.
    let rank = |item: &ClassItem| match item {
        ClassItem::Char(']') => 0,
        ClassItem::Char('-') => 3,
        item if is_negation_char(item.first()) => 2,
        _ => 1,
    };
    items.sort_by_key(rank);

    if !negated && is_negation_char(items[0].first()) {
        if let Some(pos) = items.iter().position(|item| *item == ClassItem::Char('-')) {
            let dash = items.remove(pos);
            items.insert(0, dash);
        } else if let Some(end) = items.iter().find_map(|item| match item {
            ClassItem::Range(start, end) if is_negation_char(*start) => Some(*end),
            _ => None,
        }) {
            // The range end is already a member, so leading with it is harmless.
            items.insert(0, ClassItem::Char(end));
        } else {
            // Only `^`/`!` members left: spell them as literal alternatives.
            let literals: Vec<String> = items.iter().map(|item| item.first().to_string()).collect();
            return Some(match literals.as_slice() {
                [single] => escape(single),
                _ => format!("{{{}}}", literals.join(",")),
            });
        }
    }

    let mut out = String::from(if negated { "[!" } else { "[" });
    for item in items {
        item.render(&mut out);
    }
    out.push(']');
    Some(out)
}
