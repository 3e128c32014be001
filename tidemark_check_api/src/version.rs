//! Extraction of migration versions from file names, the schema snapshot and
//! the structure dump.
//!
//! Versions are kept as digit strings. They are fixed width, so comparing the
//! strings orders them numerically.

use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;

/// Width of a timestamp-based migration version.
pub const VERSION_WIDTH: usize = 14;

static MARKER_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*\('(?P<version>[0-9]{14})'\)").expect("valid structure marker pattern")
});

static SCHEMA_DECLARATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"ActiveRecord::Schema(?:\[[0-9.]+\])?\.define\(\s*version:\s*(?P<version>[0-9_]+)\s*\)",
    )
    .expect("valid schema declaration pattern")
});

/// One `('<version>')` entry of the structure dump.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructureMarker {
    /// 1-based line number inside the structure file.
    pub line_number: usize,
    /// Line text without its terminator.
    pub text: String,
    /// The version recorded on the line.
    pub version: String,
}

impl StructureMarker {
    /// Whether the entry is followed by another one.
    #[must_use]
    pub fn is_comma_terminated(&self) -> bool {
        self.text.ends_with("'),")
    }

    /// Whether the entry closes the `INSERT` statement.
    #[must_use]
    pub fn is_semicolon_terminated(&self) -> bool {
        self.text.ends_with("');")
    }
}

/// Version encoded in a migration file name: the first run of digits in the name.
///
/// Names without digits are returned unchanged so they still compare as strings.
#[must_use]
pub fn filename_version(path: &str) -> String {
    let name = Path::new(path)
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or(path);

    let digits: String = name
        .chars()
        .skip_while(|c| !c.is_ascii_digit())
        .take_while(char::is_ascii_digit)
        .collect();

    if digits.is_empty() {
        name.to_owned()
    } else {
        digits
    }
}

/// Whether `version` has the canonical 14-digit timestamp shape.
#[must_use]
pub fn is_canonical(version: &str) -> bool {
    version.len() == VERSION_WIDTH && version.bytes().all(|b| b.is_ascii_digit())
}

/// Version declared by the schema snapshot, with digit separators removed.
#[must_use]
pub fn schema_version(contents: &str) -> Option<String> {
    let captures = SCHEMA_DECLARATION.captures(contents)?;
    let version: String = captures["version"]
        .chars()
        .filter(char::is_ascii_digit)
        .collect();
    (!version.is_empty()).then_some(version)
}

/// Version recorded on a single structure line, if the line is a marker.
#[must_use]
pub fn marker_version(line: &str) -> Option<&str> {
    MARKER_LINE
        .captures(line)
        .and_then(|captures| captures.name("version"))
        .map(|version| version.as_str())
}

/// Every marker line of the structure dump, in file order.
#[must_use]
pub fn structure_markers(contents: &str) -> Vec<StructureMarker> {
    contents
        .lines()
        .enumerate()
        .filter_map(|(index, line)| {
            marker_version(line).map(|version| StructureMarker {
                line_number: index + 1,
                text: line.to_owned(),
                version: version.to_owned(),
            })
        })
        .collect()
}
