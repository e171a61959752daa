//! Project classification from a working-directory listing.
//!
//! Looks at file names only, never file contents. Any listing failure yields
//! the default (`"unknown"`) context.

use std::fs;
use std::path::Path;

use crate::types::ProjectContext;

/// Only this many regular files are considered for `files_of_interest`.
pub const MAX_FILES_CONSIDERED: usize = 10;

const INTERESTING_EXTENSIONS: [&str; 6] = [".c", ".h", ".py", ".sh", ".md", ".txt"];

const C_PROJECT: &str = "c/c++ project";
const PYTHON_PROJECT: &str = "python project";
const GIT_SUFFIX: &str = " (git repository)";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    File,
    Dir,
    Other,
}

/// One directory entry, in listing order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntryInfo {
    pub name: String,
    pub kind: EntryKind,
}

impl DirEntryInfo {
    pub fn file(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: EntryKind::File,
        }
    }

    pub fn dir(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: EntryKind::Dir,
        }
    }
}

/// Directory listing primitive. Enables fake listings in tests.
pub trait DirLister {
    fn list(&self, path: &Path) -> std::io::Result<Vec<DirEntryInfo>>;
}

/// Lists the real filesystem. Symlinks are classified by their target.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsLister;

impl DirLister for FsLister {
    fn list(&self, path: &Path) -> std::io::Result<Vec<DirEntryInfo>> {
        let mut entries = Vec::new();
        for entry in fs::read_dir(path)? {
            let entry = entry?;
            let entry_path = entry.path();
            let kind = if entry_path.is_file() {
                EntryKind::File
            } else if entry_path.is_dir() {
                EntryKind::Dir
            } else {
                EntryKind::Other
            };
            entries.push(DirEntryInfo {
                name: entry.file_name().to_string_lossy().into_owned(),
                kind,
            });
        }
        Ok(entries)
    }
}

/// Classifies a working directory. Recomputed on every call.
#[derive(Debug, Clone, Default)]
pub struct ProjectProbe<L = FsLister> {
    lister: L,
}

impl ProjectProbe {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<L: DirLister> ProjectProbe<L> {
    pub fn with_lister(lister: L) -> Self {
        Self { lister }
    }

    pub fn probe(&self, path: impl AsRef<Path>) -> ProjectContext {
        let path = path.as_ref();
        match self.lister.list(path) {
            Ok(entries) => classify_entries(&entries),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "failed to analyze project context");
                ProjectContext::default()
            }
        }
    }
}

/// Probe `path` on the real filesystem.
pub fn probe_project(path: impl AsRef<Path>) -> ProjectContext {
    ProjectProbe::new().probe(path)
}

/// Classify a listing. Pure; the listing order decides `files_of_interest`.
pub fn classify_entries(entries: &[DirEntryInfo]) -> ProjectContext {
    let files: Vec<&str> = entries
        .iter()
        .filter(|e| e.kind == EntryKind::File)
        .map(|e| e.name.as_str())
        .collect();
    let has_git_dir = entries
        .iter()
        .any(|e| e.kind == EntryKind::Dir && e.name == ".git");

    let mut ctx = ProjectContext::default();

    if files.iter().any(|f| *f == "Makefile" || f.ends_with(".c")) {
        ctx.project_type = C_PROJECT.to_string();
        ctx.build_system = Some("make".to_string());
    } else if files
        .iter()
        .any(|f| *f == "requirements.txt" || *f == "setup.py")
    {
        ctx.project_type = PYTHON_PROJECT.to_string();
    }

    // Appends to whatever was chosen, including the bare "unknown" label.
    if has_git_dir {
        ctx.project_type.push_str(GIT_SUFFIX);
    }

    ctx.files_of_interest = files
        .iter()
        .take(MAX_FILES_CONSIDERED)
        .filter(|f| INTERESTING_EXTENSIONS.iter().any(|ext| f.ends_with(*ext)))
        .map(|f| f.to_string())
        .collect();

    tracing::debug!(
        project_type = %ctx.project_type,
        files = ctx.files_of_interest.len(),
        "project classified"
    );
    ctx
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;

    #[test]
    fn makefile_and_c_source() {
        let ctx = classify_entries(&[DirEntryInfo::file("Makefile"), DirEntryInfo::file("main.c")]);
        assert_eq!(ctx.project_type, "c/c++ project");
        assert_eq!(ctx.build_system.as_deref(), Some("make"));
        assert_eq!(ctx.files_of_interest, ["main.c"]);
    }

    #[test]
    fn c_source_without_makefile() {
        let ctx = classify_entries(&[DirEntryInfo::file("hello.c")]);
        assert_eq!(ctx.project_type, "c/c++ project");
        assert_eq!(ctx.build_system.as_deref(), Some("make"));
    }

    #[test]
    fn python_project() {
        let ctx = classify_entries(&[
            DirEntryInfo::file("setup.py"),
            DirEntryInfo::file("app.py"),
        ]);
        assert_eq!(ctx.project_type, "python project");
        assert!(ctx.build_system.is_none());
        assert_eq!(ctx.files_of_interest, ["setup.py", "app.py"]);
    }

    #[test]
    fn git_suffix_on_unknown() {
        let ctx = classify_entries(&[DirEntryInfo::dir(".git"), DirEntryInfo::file("LICENSE")]);
        assert_eq!(ctx.project_type, "unknown (git repository)");
        assert!(ctx.files_of_interest.is_empty());
    }

    #[test]
    fn git_suffix_on_classified_project() {
        let ctx = classify_entries(&[
            DirEntryInfo::dir(".git"),
            DirEntryInfo::file("requirements.txt"),
        ]);
        assert_eq!(ctx.project_type, "python project (git repository)");
    }

    #[test]
    fn git_file_is_not_a_repository() {
        // Worktrees use a `.git` file; only the directory counts.
        let ctx = classify_entries(&[DirEntryInfo::file(".git")]);
        assert_eq!(ctx.project_type, "unknown");
    }

    #[test]
    fn directories_named_like_sources_are_ignored() {
        let ctx = classify_entries(&[DirEntryInfo::dir("src.c"), DirEntryInfo::dir("docs.md")]);
        assert_eq!(ctx.project_type, "unknown");
        assert!(ctx.files_of_interest.is_empty());
    }

    #[test]
    fn only_first_ten_files_are_considered() {
        let mut entries: Vec<DirEntryInfo> = (0..10)
            .map(|i| DirEntryInfo::file(format!("blob{i}.bin")))
            .collect();
        entries.push(DirEntryInfo::file("late.md"));
        let ctx = classify_entries(&entries);
        assert!(ctx.files_of_interest.is_empty());

        let entries: Vec<DirEntryInfo> = (0..15)
            .map(|i| DirEntryInfo::file(format!("note{i}.md")))
            .collect();
        let ctx = classify_entries(&entries);
        assert_eq!(ctx.files_of_interest.len(), MAX_FILES_CONSIDERED);
        assert_eq!(ctx.files_of_interest[0], "note0.md");
    }

    #[test]
    fn missing_path_is_default() {
        let ctx = probe_project("/definitely/not/a/real/path/for/muxgeist");
        assert_eq!(ctx, ProjectContext::default());
    }

    #[test]
    fn probe_real_directory() {
        let dir = tempfile::tempdir().expect("tempdir");
        File::create(dir.path().join("Makefile")).expect("create");
        File::create(dir.path().join("main.c")).expect("create");
        let ctx = probe_project(dir.path());
        assert_eq!(ctx.project_type, "c/c++ project");
        assert_eq!(ctx.build_system.as_deref(), Some("make"));
        assert!(ctx.files_of_interest.contains(&"main.c".to_string()));
    }

    #[test]
    fn probe_real_git_directory() {
        let dir = tempfile::tempdir().expect("tempdir");
        std::fs::create_dir(dir.path().join(".git")).expect("mkdir");
        File::create(dir.path().join("notes.txt")).expect("create");
        let ctx = probe_project(dir.path());
        assert_eq!(ctx.project_type, "unknown (git repository)");
        assert_eq!(ctx.files_of_interest, ["notes.txt"]);
    }

    #[test]
    fn probe_with_failing_lister() {
        struct Denied;
        impl DirLister for Denied {
            fn list(&self, _path: &Path) -> std::io::Result<Vec<DirEntryInfo>> {
                Err(std::io::Error::from(std::io::ErrorKind::PermissionDenied))
            }
        }
        let ctx = ProjectProbe::with_lister(Denied).probe("/srv");
        assert_eq!(ctx, ProjectContext::default());
    }
}
