//! Script store maintenance: listing, search and editing

use super::{Access, ScriptError, ScriptIdentifier, ScriptResult};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use walkdir::{DirEntry, WalkDir};
use warden_config::ScriptsConfig;

/// Folder name that addresses the store root in [`ScriptStore::create`]
pub const ROOT_FOLDER: &str = "root";

const STARTER_BODY: &str = "-- New script\nSELECT 1 FROM dual;\n";

/// File-level access to the script tree
#[derive(Debug, Clone)]
pub struct ScriptStore {
    root: PathBuf,
    internal_namespace: String,
    extension: String,
}

impl ScriptStore {
    pub fn new(config: &ScriptsConfig) -> Self {
        Self {
            root: config.root.clone(),
            internal_namespace: config.internal_namespace.clone(),
            extension: config.extension.trim_start_matches('.').to_string(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Every script identifier in the store, sorted.
    ///
    /// The internal namespace is never listed. A missing root lists nothing,
    /// and unreadable directories are skipped.
    pub fn list(&self) -> ScriptResult<Vec<String>> {
        let mut found = Vec::new();
        if !self.root.is_dir() {
            return Ok(found);
        }

        let walker = WalkDir::new(&self.root)
            .follow_links(false)
            .into_iter()
            .filter_entry(|e| !self.is_internal_dir(e));

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!(error = %e, "Skipping unreadable store entry");
                    continue;
                }
            };
            if !entry.file_type().is_file() || !self.has_extension(entry.path()) {
                continue;
            }
            if let Ok(relative) = entry.path().strip_prefix(&self.root) {
                found.push(relative.to_string_lossy().replace('\\', "/"));
            }
        }

        found.sort();
        Ok(found)
    }

    /// Listed scripts whose text contains `needle`, ignoring case.
    ///
    /// An empty needle matches nothing. Unreadable files are skipped.
    pub fn search(&self, needle: &str) -> ScriptResult<Vec<String>> {
        let needle = needle.trim().to_lowercase();
        if needle.is_empty() {
            return Ok(Vec::new());
        }

        let mut matches = Vec::new();
        for id in self.list()? {
            let path = self.root.join(&id);
            match fs::read(&path) {
                Ok(bytes) => {
                    if String::from_utf8_lossy(&bytes).to_lowercase().contains(&needle) {
                        matches.push(id);
                    }
                }
                Err(e) => warn!(path = %path.display(), error = %e, "Skipping unreadable script"),
            }
        }
        Ok(matches)
    }

    /// Script text; invalid UTF-8 is replaced rather than rejected
    pub fn read(&self, identifier: &str, access: Access) -> ScriptResult<String> {
        let path = self.path_of(identifier, access)?;
        match fs::read(&path) {
            Ok(bytes) => Ok(String::from_utf8_lossy(&bytes).into_owned()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(ScriptError::ScriptNotFound {
                identifier: identifier.to_string(),
                searched: vec![path],
            }),
            Err(e) => Err(ScriptError::io(&path, e)),
        }
    }

    /// Overwrite an existing script or write a new one
    pub fn save(&self, identifier: &str, content: &str, access: Access) -> ScriptResult<()> {
        let path = self.path_of(identifier, access)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| ScriptError::io(parent, e))?;
        }
        fs::write(&path, content).map_err(|e| ScriptError::io(&path, e))?;
        info!(identifier, bytes = content.len(), "Saved script");
        Ok(())
    }

    /// Create a starter script named `name` in `folder`.
    ///
    /// The store extension is appended when `name` lacks it. `folder` may be
    /// [`ROOT_FOLDER`] for the store root. Returns the new identifier.
    pub fn create(&self, folder: &str, name: &str, access: Access) -> ScriptResult<String> {
        let suffix = format!(".{}", self.extension);
        let file_name = if name.to_lowercase().ends_with(&suffix) {
            name.to_string()
        } else {
            format!("{name}{suffix}")
        };

        let joined = if folder.trim().is_empty() || folder.trim() == ROOT_FOLDER {
            file_name
        } else {
            format!("{}/{}", folder.trim().trim_end_matches(['/', '\\']), file_name)
        };

        let id = self.checked(&joined, access)?;
        let path = self.root.join(id.to_path());
        if path.exists() {
            return Err(ScriptError::AlreadyExists(id.to_string()));
        }
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| ScriptError::io(parent, e))?;
        }
        fs::write(&path, STARTER_BODY).map_err(|e| ScriptError::io(&path, e))?;

        info!(identifier = %id, "Created script");
        Ok(id.to_string())
    }

    /// Remove a script; returns `false` if it did not exist
    pub fn delete(&self, identifier: &str, access: Access) -> ScriptResult<bool> {
        let path = self.path_of(identifier, access)?;
        match fs::remove_file(&path) {
            Ok(()) => {
                info!(identifier, "Deleted script");
                Ok(true)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(ScriptError::io(&path, e)),
        }
    }

    fn checked(&self, identifier: &str, access: Access) -> ScriptResult<ScriptIdentifier> {
        let id = ScriptIdentifier::parse(identifier)?;
        if access == Access::User && id.is_under(&self.internal_namespace) {
            return Err(ScriptError::AccessDenied(id.to_string()));
        }
        Ok(id)
    }

    fn path_of(&self, identifier: &str, access: Access) -> ScriptResult<PathBuf> {
        let id = self.checked(identifier, access)?;
        Ok(self.root.join(id.to_path()))
    }

    /// The internal namespace directory directly under the root
    fn is_internal_dir(&self, entry: &DirEntry) -> bool {
        let internal = entry.depth() == 1
            && entry.file_type().is_dir()
            && entry
                .file_name()
                .to_str()
                .is_some_and(|name| name.eq_ignore_ascii_case(&self.internal_namespace));
        if internal {
            debug!(path = %entry.path().display(), "Skipping internal namespace");
        }
        internal
    }

    fn has_extension(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case(&self.extension))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store_with(files: &[&str]) -> (TempDir, ScriptStore) {
        let dir = TempDir::new().unwrap();
        for file in files {
            let path = dir.path().join(file);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(&path, "SELECT 1 FROM dual;").unwrap();
        }
        let config = ScriptsConfig {
            root: dir.path().to_path_buf(),
            ..ScriptsConfig::default()
        };
        let store = ScriptStore::new(&config);
        (dir, store)
    }

    #[test]
    fn list_skips_internal_and_foreign_files() {
        let (_dir, store) = store_with(&[
            "oracle/v12c/sessions/active.sql",
            "oracle/common/locks/blocking.sql",
            "oracle/rman/full.rcv",
            "internal/common/health/ping.sql",
            "notes.txt",
        ]);

        assert_eq!(
            store.list().unwrap(),
            vec![
                "oracle/common/locks/blocking.sql",
                "oracle/v12c/sessions/active.sql"
            ]
        );
    }

    #[test]
    fn internal_namespace_is_skipped_in_any_case() {
        let (_dir, store) = store_with(&[
            "Internal/common/health/ping.sql",
            "oracle/common/internal/usage.sql",
        ]);
        assert_eq!(store.list().unwrap(), vec!["oracle/common/internal/usage.sql"]);
    }

    #[cfg(unix)]
    #[test]
    fn unreadable_directory_does_not_fail_listing() {
        use std::os::unix::fs::PermissionsExt;

        let (dir, store) = store_with(&[
            "oracle/common/locks/blocking.sql",
            "oracle/common/locked/hidden.sql",
        ]);
        let locked = dir.path().join("oracle/common/locked");
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

        // privileged users read through the permission bits
        if fs::read_dir(&locked).is_err() {
            assert_eq!(store.list().unwrap(), vec!["oracle/common/locks/blocking.sql"]);
        }
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
    }

    #[test]
    fn missing_root_lists_nothing() {
        let config = ScriptsConfig {
            root: PathBuf::from("/definitely/not/here"),
            ..ScriptsConfig::default()
        };
        assert!(ScriptStore::new(&config).list().unwrap().is_empty());
    }

    #[test]
    fn search_matches_content_ignoring_case() {
        let (_dir, store) = store_with(&[
            "oracle/common/locks/blocking.sql",
            "oracle/common/sessions/active.sql",
        ]);
        store
            .save(
                "oracle/common/locks/blocking.sql",
                "SELECT * FROM gv$lock WHERE block = 1;",
                Access::User,
            )
            .unwrap();

        assert_eq!(
            store.search("GV$LOCK").unwrap(),
            vec!["oracle/common/locks/blocking.sql"]
        );
        assert_eq!(store.search("dual").unwrap().len(), 1);
        assert!(store.search("  ").unwrap().is_empty());
    }

    #[test]
    fn read_replaces_invalid_utf8() {
        let (dir, store) = store_with(&[]);
        fs::write(dir.path().join("latin1.sql"), b"SELECT 'caf\xe9' FROM dual;").unwrap();
        let text = store.read("latin1.sql", Access::User).unwrap();
        assert!(text.starts_with("SELECT 'caf"));
        assert!(text.contains('\u{FFFD}'));
    }

    #[test]
    fn create_appends_extension_and_refuses_duplicates() {
        let (dir, store) = store_with(&[]);

        let id = store.create("oracle/common/custom", "report", Access::User).unwrap();
        assert_eq!(id, "oracle/common/custom/report.sql");
        let body = fs::read_to_string(dir.path().join("oracle/common/custom/report.sql")).unwrap();
        assert_eq!(body, STARTER_BODY);

        let err = store
            .create("oracle/common/custom", "report.sql", Access::User)
            .unwrap_err();
        assert!(matches!(err, ScriptError::AlreadyExists(_)));
    }

    #[test]
    fn create_in_root_folder() {
        let (dir, store) = store_with(&[]);
        let id = store.create(ROOT_FOLDER, "scratch", Access::User).unwrap();
        assert_eq!(id, "scratch.sql");
        assert!(dir.path().join("scratch.sql").is_file());
    }

    #[test]
    fn save_read_delete() {
        let (_dir, store) = store_with(&[]);
        let id = "oracle/common/custom/count.sql";

        store.save(id, "SELECT COUNT(*) FROM t;", Access::User).unwrap();
        assert_eq!(store.read(id, Access::User).unwrap(), "SELECT COUNT(*) FROM t;");

        assert!(store.delete(id, Access::User).unwrap());
        assert!(!store.delete(id, Access::User).unwrap());
        assert!(matches!(
            store.read(id, Access::User).unwrap_err(),
            ScriptError::ScriptNotFound { .. }
        ));
    }

    #[test]
    fn user_cannot_touch_internal_scripts() {
        let (_dir, store) = store_with(&["internal/common/health/ping.sql"]);
        let id = "internal/common/health/ping.sql";

        assert!(matches!(
            store.read(id, Access::User).unwrap_err(),
            ScriptError::AccessDenied(_)
        ));
        assert!(matches!(
            store.delete(id, Access::User).unwrap_err(),
            ScriptError::AccessDenied(_)
        ));
        assert!(store.read(id, Access::Internal).is_ok());
    }

    #[test]
    fn edits_cannot_escape_the_root() {
        let (_dir, store) = store_with(&[]);
        let err = store.save("../escape.sql", "x", Access::Internal).unwrap_err();
        assert!(matches!(err, ScriptError::InvalidIdentifier { .. }));
    }
}
