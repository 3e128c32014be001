//! Repository access and changeset extraction built on top of libgit2.

use std::fmt;
use std::path::{Path, PathBuf};

use git2::{
    Delta, DiffFindOptions, DiffOptions, ErrorClass, ErrorCode, Repository as GitRepository,
};
use tidemark_api::{FileStatus, LineKind, Patch, PatchHunk};
use tracing::debug;

use crate::{Error, Result};

/// Lightweight handle to the repository under review.
pub struct Repository {
    inner: GitRepository,
    root: PathBuf,
}

impl Repository {
    /// Open a repository from the given filesystem path.
    ///
    /// # Errors
    ///
    /// Returns an error if the path cannot be canonicalized, does not resolve
    /// to a git repository, or if libgit2 reports an unsupported repository
    /// layout (such as a bare repository).
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let original = path.as_ref();
        let canonical = std::fs::canonicalize(original).map_err(|source| Error::Io {
            path: display_path(original),
            source,
        })?;

        let repo = match GitRepository::discover(&canonical) {
            Ok(repo) => repo,
            Err(err)
                if err.class() == ErrorClass::Repository && err.code() == ErrorCode::NotFound =>
            {
                return Err(Error::NotARepository {
                    path: display_path(&canonical),
                })
            }
            Err(err) => return Err(Error::from(err)),
        };

        let root = repo
            .workdir()
            .map(Path::to_path_buf)
            .ok_or_else(|| Error::BareRepository {
                path: display_path(&canonical),
            })?;

        Ok(Self { inner: repo, root })
    }

    /// Returns the absolute path to the repository root.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Patches introduced on `HEAD` since it forked from `base`.
    ///
    /// The merge base of `base` and `HEAD` is diffed against `HEAD`, so
    /// changes that landed on `base` afterwards are not part of the changeset.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingHeadRevision`] for an unborn `HEAD`,
    /// [`Error::UnknownRevision`] when `base` does not resolve to a commit, and
    /// propagates libgit2 diff failures.
    pub fn changeset(&self, base: &str) -> Result<Vec<Patch>> {
        let head = self.head_commit()?.ok_or(Error::MissingHeadRevision)?;
        let base_commit = self
            .inner
            .revparse_single(base)
            .and_then(|object| object.peel_to_commit())
            .map_err(|source| Error::UnknownRevision {
                revision: base.to_owned(),
                source,
            })?;

        let fork_point = self.inner.merge_base(base_commit.id(), head.id())?;
        let base_tree = self.inner.find_commit(fork_point)?.tree()?;
        let head_tree = head.tree()?;
        debug!(base, %fork_point, head = %head.id(), "computing changeset");

        let mut options = DiffOptions::new();
        options.context_lines(3);
        let mut diff =
            self.inner
                .diff_tree_to_tree(Some(&base_tree), Some(&head_tree), Some(&mut options))?;

        // Renames only, so copied files keep the `Added` status.
        let mut find = DiffFindOptions::new();
        find.renames(true);
        diff.find_similar(Some(&mut find))?;

        let mut patches = Vec::with_capacity(diff.deltas().len());
        for index in 0..diff.deltas().len() {
            let hunks = match git2::Patch::from_diff(&diff, index)? {
                Some(patch) => convert_hunks(&patch)?,
                None => Vec::new(),
            };
            let Some(delta) = diff.get_delta(index) else {
                continue;
            };
            patches.push(convert_delta(&delta, hunks));
        }

        Ok(patches)
    }

    /// Whether git's ignore rules exclude `path`.
    ///
    /// # Errors
    ///
    /// Propagates libgit2 failures while evaluating the ignore rules.
    pub fn is_ignored(&self, path: impl AsRef<Path>) -> Result<bool> {
        Ok(self.inner.is_path_ignored(path)?)
    }

    fn head_commit(&self) -> Result<Option<git2::Commit<'_>>> {
        let head = match self.inner.head() {
            Ok(head) => head,
            Err(err)
                if matches!(
                    (err.class(), err.code()),
                    (
                        ErrorClass::Reference,
                        ErrorCode::NotFound | ErrorCode::UnbornBranch
                    )
                ) =>
            {
                return Ok(None)
            }
            Err(err) => return Err(Error::from(err)),
        };

        Ok(Some(head.resolve()?.peel_to_commit()?))
    }
}

fn convert_delta(delta: &git2::DiffDelta<'_>, hunks: Vec<PatchHunk>) -> Patch {
    let status = match delta.status() {
        Delta::Added | Delta::Untracked => FileStatus::Added,
        Delta::Deleted => FileStatus::Deleted,
        Delta::Renamed => FileStatus::Renamed,
        Delta::Copied => FileStatus::Copied,
        Delta::Typechange => FileStatus::TypeChange,
        _ => FileStatus::Modified,
    };

    let path_of = |file: git2::DiffFile<'_>| file.path().map(display_path);
    let new_path = match status {
        FileStatus::Deleted => None,
        _ => path_of(delta.new_file()),
    };
    let old_path = match status {
        FileStatus::Added => None,
        _ => path_of(delta.old_file()),
    };

    Patch::new(
        status,
        new_path,
        old_path,
        delta.old_file().id().to_string(),
        hunks,
    )
}

fn convert_hunks(patch: &git2::Patch<'_>) -> Result<Vec<PatchHunk>> {
    let mut hunks = Vec::with_capacity(patch.num_hunks());
    for hunk_index in 0..patch.num_hunks() {
        let (hunk, line_count) = patch.hunk(hunk_index)?;
        let mut lines = Vec::with_capacity(line_count);
        for line_index in 0..line_count {
            let line = patch.line_in_hunk(hunk_index, line_index)?;
            let kind = match line.origin() {
                '+' => LineKind::Addition,
                '-' => LineKind::Deletion,
                ' ' => LineKind::Context,
                // "\ No newline at end of file" markers
                _ => continue,
            };
            let content = String::from_utf8_lossy(line.content())
                .trim_end_matches(['\n', '\r'])
                .to_owned();
            lines.push((kind, content));
        }
        hunks.push(PatchHunk::new(hunk.old_start(), hunk.new_start(), lines));
    }
    Ok(hunks)
}

fn display_path(path: &Path) -> String {
    path.to_path_buf()
        .into_os_string()
        .to_string_lossy()
        .into_owned()
}

impl fmt::Debug for Repository {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Repository")
            .field("root", &self.root)
            .finish_non_exhaustive()
    }
}
