use serde::{Deserialize, Serialize};

/// Object id reported for the missing side of a diff (e.g., a brand-new file).
pub const NULL_OID: &str = "0000000000000000000000000000000000000000";

/// The diff for a single file within a changeset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Patch {
    /// Path on the head side, relative to the repository root. Absent for deletions.
    #[serde(default)]
    pub new_path: Option<String>,
    /// Path on the base side. Absent for newly created files.
    #[serde(default)]
    pub old_path: Option<String>,
    /// Status of the file change in the diff.
    pub status: FileStatus,
    /// Object id of the base-side blob, or [`NULL_OID`] when there is none.
    pub old_oid: String,
    /// High-level summary of insertions/deletions.
    #[serde(default)]
    pub stats: PatchStats,
    /// The hunks that make up this file diff.
    #[serde(default)]
    pub hunks: Vec<PatchHunk>,
}

impl Patch {
    /// Build a patch and derive its stats from the hunks.
    pub fn new(
        status: FileStatus,
        new_path: Option<String>,
        old_path: Option<String>,
        old_oid: impl Into<String>,
        hunks: Vec<PatchHunk>,
    ) -> Self {
        let stats = hunks
            .iter()
            .fold(PatchStats::ZERO, |acc, hunk| acc.add(hunk.stats()));
        Self {
            new_path,
            old_path,
            status,
            old_oid: old_oid.into(),
            stats,
            hunks,
        }
    }

    /// A file created by the changeset.
    pub fn added(path: impl Into<String>, hunks: Vec<PatchHunk>) -> Self {
        Self::new(FileStatus::Added, Some(path.into()), None, NULL_OID, hunks)
    }

    /// An existing file modified in place.
    pub fn modified(
        path: impl Into<String>,
        old_oid: impl Into<String>,
        hunks: Vec<PatchHunk>,
    ) -> Self {
        let path = path.into();
        Self::new(
            FileStatus::Modified,
            Some(path.clone()),
            Some(path),
            old_oid,
            hunks,
        )
    }

    /// The path checks should report against: the head path, or the base path for deletions.
    #[must_use]
    pub fn path(&self) -> &str {
        self.new_path
            .as_deref()
            .or(self.old_path.as_deref())
            .unwrap_or_default()
    }

    /// Whether the file is newly created in this changeset.
    #[must_use]
    pub fn is_added(&self) -> bool {
        self.status == FileStatus::Added
    }

    /// Whether the base side has no blob at all.
    #[must_use]
    pub fn is_new_file(&self) -> bool {
        self.old_oid == NULL_OID
    }

    /// Number of added lines.
    #[must_use]
    pub const fn additions(&self) -> u32 {
        self.stats.additions
    }

    /// Number of removed lines.
    #[must_use]
    pub const fn deletions(&self) -> u32 {
        self.stats.deletions
    }

    /// All lines in unified-diff order.
    pub fn lines(&self) -> impl Iterator<Item = &PatchLine> + '_ {
        self.hunks.iter().flat_map(|hunk| hunk.lines.iter())
    }

    /// Lines paired with their position inside [`Patch::lines`].
    pub fn positioned_lines(&self) -> impl Iterator<Item = (usize, &PatchLine)> + '_ {
        self.lines().enumerate()
    }

    /// Only the added lines, in diff order.
    pub fn added_lines(&self) -> impl Iterator<Item = &PatchLine> + '_ {
        self.lines().filter(|line| line.kind == LineKind::Addition)
    }

    /// Only the deleted lines, in diff order.
    pub fn deleted_lines(&self) -> impl Iterator<Item = &PatchLine> + '_ {
        self.lines().filter(|line| line.kind == LineKind::Deletion)
    }

    /// Added and deleted lines, in diff order.
    pub fn changed_lines(&self) -> impl Iterator<Item = &PatchLine> + '_ {
        self.lines().filter(|line| line.is_change())
    }
}

/// Summary information about the changes within a file diff.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct PatchStats {
    /// Number of added lines.
    pub additions: u32,
    /// Number of removed lines.
    pub deletions: u32,
}

impl PatchStats {
    /// A stats instance with zero additions and deletions.
    pub const ZERO: Self = Self {
        additions: 0,
        deletions: 0,
    };

    /// Convenience constructor for explicit values.
    pub const fn new(additions: u32, deletions: u32) -> Self {
        Self {
            additions,
            deletions,
        }
    }

    /// Combine two stats structs.
    #[must_use]
    pub const fn add(self, other: Self) -> Self {
        Self {
            additions: self.additions + other.additions,
            deletions: self.deletions + other.deletions,
        }
    }
}

/// A diff hunk containing a contiguous set of changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatchHunk {
    /// The range header describing the hunk offsets.
    pub header: HunkRange,
    /// Line-level changes inside the hunk.
    #[serde(default)]
    pub lines: Vec<PatchLine>,
}

impl PatchHunk {
    /// Build a hunk starting at the given 1-based line numbers, numbering each line.
    pub fn new(base_start: u32, head_start: u32, lines: Vec<(LineKind, String)>) -> Self {
        let mut base = base_start;
        let mut head = head_start;
        let lines: Vec<PatchLine> = lines
            .into_iter()
            .map(|(kind, content)| {
                let (base_line, head_line) = match kind {
                    LineKind::Context => (Some(base), Some(head)),
                    LineKind::Deletion => (Some(base), None),
                    LineKind::Addition => (None, Some(head)),
                };
                base += u32::from(base_line.is_some());
                head += u32::from(head_line.is_some());
                PatchLine {
                    kind,
                    content,
                    base_line,
                    head_line,
                }
            })
            .collect();

        Self {
            header: HunkRange {
                base_start,
                base_lines: base - base_start,
                head_start,
                head_lines: head - head_start,
            },
            lines,
        }
    }

    /// A hunk that adds every given line to an empty file.
    pub fn additions<I, S>(contents: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(
            0,
            1,
            contents
                .into_iter()
                .map(|content| (LineKind::Addition, content.into()))
                .collect(),
        )
    }

    /// Count of additions and deletions within the hunk.
    #[must_use]
    pub fn stats(&self) -> PatchStats {
        self.lines
            .iter()
            .fold(PatchStats::ZERO, |acc, line| match line.kind {
                LineKind::Addition => acc.add(PatchStats::new(1, 0)),
                LineKind::Deletion => acc.add(PatchStats::new(0, 1)),
                LineKind::Context => acc,
            })
    }
}

/// The line number ranges referenced by a hunk header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HunkRange {
    /// Starting line number for the base side.
    pub base_start: u32,
    /// Number of lines covered on the base side.
    pub base_lines: u32,
    /// Starting line number for the head side.
    pub head_start: u32,
    /// Number of lines covered on the head side.
    pub head_lines: u32,
}

/// A single line within a diff hunk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatchLine {
    /// The role the line plays in the diff (context, addition, deletion).
    pub kind: LineKind,
    /// Text of the line without its terminator.
    pub content: String,
    /// 1-based line number on the base side if applicable.
    #[serde(default)]
    pub base_line: Option<u32>,
    /// 1-based line number on the head side if applicable.
    #[serde(default)]
    pub head_line: Option<u32>,
}

impl PatchLine {
    /// Whether the line was added or deleted.
    #[must_use]
    pub fn is_change(&self) -> bool {
        self.kind != LineKind::Context
    }
}

/// Type of a line contained in a diff.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LineKind {
    /// Unchanged context line.
    Context,
    /// A newly added line.
    Addition,
    /// A deleted line.
    Deletion,
}

/// File status from the diff's perspective.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FileStatus {
    /// File only exists in the head side.
    Added,
    /// File only exists in the base side.
    Deleted,
    /// File exists on both sides with modifications.
    Modified,
    /// File path changed between base and head.
    Renamed,
    /// File content copied from another location.
    Copied,
    /// File type changed (e.g., text -> binary).
    TypeChange,
}
