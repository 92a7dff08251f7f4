//! Shared test utilities for rulekit crates.
//!
//! This crate provides the temporary project fixture and environment guards
//! used across the rulekit workspace.

use std::path::{Path, PathBuf};
use std::sync::{LazyLock, Mutex, MutexGuard};

/// Serialize tests that mutate process-global state (env vars, cwd, etc).
///
/// Acquire this guard at the start of any test that modifies environment
/// variables to prevent race conditions between parallel tests.
pub fn env_guard() -> MutexGuard<'static, ()> {
    static TEST_SERIAL: LazyLock<Mutex<()>> = LazyLock::new(|| Mutex::new(()));
    TEST_SERIAL.lock().unwrap_or_else(|e| e.into_inner())
}

/// RAII guard for environment variables - restores original value on drop.
pub struct EnvVarGuard {
    key: &'static str,
    previous: Option<String>,
}

impl Drop for EnvVarGuard {
    fn drop(&mut self) {
        if let Some(v) = &self.previous {
            std::env::set_var(self.key, v);
        } else {
            std::env::remove_var(self.key);
        }
    }
}

/// Set an environment variable and return a guard that restores the original on drop.
///
/// # Example
/// ```
/// let _guard = rulekit_test_utils::set_env_var("MY_VAR", Some("value"));
/// // MY_VAR is set to "value"
/// // When _guard drops, MY_VAR is restored to its original value
/// ```
pub fn set_env_var(key: &'static str, value: Option<&str>) -> EnvVarGuard {
    let previous = std::env::var(key).ok();
    if let Some(val) = value {
        std::env::set_var(key, val);
    } else {
        std::env::remove_var(key);
    }
    EnvVarGuard { key, previous }
}

/// A temporary project with its own home directory.
///
/// Layout:
/// - `<tmp>/project/.rulekit/{rules,commands,subagents,skills}/`
/// - `<tmp>/home/`
///
/// The tempdir is removed when the fixture is dropped.
pub struct TestFixture {
    pub tempdir: tempfile::TempDir,
    /// Project directory (the base dir for generation)
    pub project: PathBuf,
    /// Stand-in home directory for global mode
    pub home: PathBuf,
}

impl TestFixture {
    /// Create a fixture with an empty canonical store.
    ///
    /// Does NOT set HOME env var - use `home_guard()` for that.
    pub fn new() -> std::io::Result<Self> {
        let tempdir = tempfile::tempdir()?;
        let project = tempdir.path().join("project");
        let home = tempdir.path().join("home");

        for kind in ["rules", "commands", "subagents", "skills"] {
            std::fs::create_dir_all(project.join(".rulekit").join(kind))?;
        }
        std::fs::create_dir_all(&home)?;

        Ok(Self {
            tempdir,
            project,
            home,
        })
    }

    pub fn home_path(&self) -> &Path {
        &self.home
    }

    /// Create an RAII guard that sets HOME to this fixture's home directory.
    pub fn home_guard(&self) -> EnvVarGuard {
        set_env_var("HOME", Some(&self.home.to_string_lossy()))
    }

    /// `.rulekit/<kind>` inside the project.
    pub fn canonical_dir(&self, kind: &str) -> PathBuf {
        self.project.join(".rulekit").join(kind)
    }

    fn write_document(&self, kind: &str, file: &str, content: &str) -> std::io::Result<PathBuf> {
        let path = self.canonical_dir(kind).join(file);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&path, content)?;
        Ok(path)
    }

    /// Write `.rulekit/rules/<file>`.
    pub fn write_rule(&self, file: &str, content: &str) -> std::io::Result<PathBuf> {
        self.write_document("rules", file, content)
    }

    pub fn write_command(&self, file: &str, content: &str) -> std::io::Result<PathBuf> {
        self.write_document("commands", file, content)
    }

    /// Create `.rulekit/skills/<name>/SKILL.md` with standard frontmatter.
    ///
    /// Returns the path to the skill directory.
    pub fn write_skill(&self, name: &str, description: &str, body: &str) -> std::io::Result<PathBuf> {
        let content = format!("---\nname: {name}\ndescription: {description}\n---\n{body}");
        let path = self.write_document("skills", &format!("{name}/SKILL.md"), &content)?;
        Ok(path.parent().map(Path::to_path_buf).unwrap_or_default())
    }

    /// Read a file relative to the project directory.
    pub fn read_project_file(&self, relative: &str) -> std::io::Result<String> {
        std::fs::read_to_string(self.project.join(relative))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_guard_serializes_tests() {
        let _g = env_guard();
    }

    #[test]
    fn test_set_env_var_sets_and_restores() {
        let _g = env_guard();

        const KEY: &str = "RULEKIT_TEST_UTILS_TEST_VAR";
        std::env::remove_var(KEY);

        {
            let _guard = set_env_var(KEY, Some("test_value"));
            assert_eq!(std::env::var(KEY).ok(), Some("test_value".to_string()));
        }
        assert!(std::env::var(KEY).is_err());
    }

    #[test]
    fn test_set_env_var_restores_previous_value() {
        let _g = env_guard();

        const KEY: &str = "RULEKIT_TEST_RESTORE_VAR";
        std::env::set_var(KEY, "original");

        {
            let _guard = set_env_var(KEY, Some("changed"));
            assert_eq!(std::env::var(KEY).ok(), Some("changed".to_string()));
        }
        assert_eq!(std::env::var(KEY).ok(), Some("original".to_string()));

        std::env::remove_var(KEY);
    }

    #[test]
    fn test_set_env_var_removes_when_none() {
        let _g = env_guard();

        const KEY: &str = "RULEKIT_TEST_REMOVE_VAR";
        std::env::set_var(KEY, "exists");

        {
            let _guard = set_env_var(KEY, None);
            assert!(std::env::var(KEY).is_err());
        }
        assert_eq!(std::env::var(KEY).ok(), Some("exists".to_string()));

        std::env::remove_var(KEY);
    }

    #[test]
    fn test_fixture_creates_canonical_store() {
        let fixture = TestFixture::new().expect("fixture creation");
        for kind in ["rules", "commands", "subagents", "skills"] {
            assert!(fixture.canonical_dir(kind).is_dir());
        }
        assert!(fixture.home_path().is_dir());
    }

    #[test]
    fn test_fixture_write_rule() {
        let fixture = TestFixture::new().expect("fixture creation");
        let path = fixture
            .write_rule("style.md", "---\ndescription: Style\n---\nUse tabs.")
            .expect("write rule");

        assert!(path.ends_with(".rulekit/rules/style.md"));
        let content = fixture.read_project_file(".rulekit/rules/style.md").unwrap();
        assert!(content.contains("Use tabs."));
    }

    #[test]
    fn test_fixture_write_skill() {
        let fixture = TestFixture::new().expect("fixture creation");
        let skill_dir = fixture
            .write_skill("fm-skill", "A test skill", "Body content")
            .expect("write skill");

        let content = std::fs::read_to_string(skill_dir.join("SKILL.md")).unwrap();
        assert!(content.contains("name: fm-skill"));
        assert!(content.contains("description: A test skill"));
        assert!(content.contains("Body content"));
    }

    #[test]
    fn test_fixture_home_guard() {
        let _g = env_guard();
        let fixture = TestFixture::new().expect("fixture creation");

        let original_home = std::env::var("HOME").ok();
        {
            let _home_guard = fixture.home_guard();
            let new_home = std::env::var("HOME").unwrap();
            assert_eq!(new_home, fixture.home_path().to_string_lossy());
        }
        assert_eq!(std::env::var("HOME").ok(), original_home);
    }
}
