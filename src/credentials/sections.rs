use std::path::{Path, PathBuf};

/// Name given to keys that appear before the first section header.
pub const DEFAULT_SECTION: &str = "DEFAULT";

#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("error reading credentials file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("error parsing credentials file {}:{line}: unterminated section header", path.display())]
    UnterminatedSection { path: PathBuf, line: usize },

    #[error("error parsing credentials file {}:{line}: empty section name", path.display())]
    EmptySectionName { path: PathBuf, line: usize },

    #[error("error parsing credentials file {}:{line}: key-value delimiter not found: {content}", path.display())]
    MissingDelimiter {
        path: PathBuf,
        line: usize,
        content: String,
    },
}

/// Extract section names from INI-style text, in file order.
///
/// Keys and values are validated only far enough to reject corrupt input;
/// their contents are discarded. A repeated section keeps its first position.
pub fn section_names(path: &Path, content: &str) -> Result<Vec<String>, ParseError> {
    let mut names: Vec<String> = Vec::new();
    let mut in_value = false;

    for (idx, raw) in content.lines().enumerate() {
        let line_no = idx + 1;
        let line = raw.trim();

        if line.is_empty() || line.starts_with('#') || line.starts_with(';') {
            continue;
        }

        if let Some(rest) = line.strip_prefix('[') {
            let Some(end) = rest.find(']') else {
                return Err(ParseError::UnterminatedSection {
                    path: path.to_path_buf(),
                    line: line_no,
                });
            };
            let name = rest[..end].trim();
            if name.is_empty() {
                return Err(ParseError::EmptySectionName {
                    path: path.to_path_buf(),
                    line: line_no,
                });
            }
            push_unique(&mut names, name);
            in_value = false;
            continue;
        }

        // Nested values (e.g. `s3 =` followed by indented keys).
        let indented = raw.starts_with([' ', '\t']);
        if indented && in_value {
            continue;
        }

        if !line.contains(['=', ':']) {
            return Err(ParseError::MissingDelimiter {
                path: path.to_path_buf(),
                line: line_no,
                content: line.to_string(),
            });
        }

        if names.is_empty() {
            push_unique(&mut names, DEFAULT_SECTION);
        }
        in_value = true;
    }

    Ok(names)
}

fn push_unique(names: &mut Vec<String>, name: &str) {
    if !names.iter().any(|n| n == name) {
        names.push(name.to_string());
    }
}
