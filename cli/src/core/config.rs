//! # devstack Configuration System
//!
//! File: cli/src/core/config.rs
//!
//! ## Overview
//!
//! This module loads `projects.yml` from the project root. The document has two
//! top-level sections:
//!
//! - `projects` (**required** for `dev setup` / `dev setup-symfony`): the project
//!   registry, keyed by project id. Each entry describes where the project's
//!   repository is cloned, which container runs it, which compose services to
//!   cycle around a re-clone, and the ordered list of setup steps.
//! - `stack` (optional): container names, access URLs and bootstrap projects for
//!   the lifecycle commands. Every field has a default, so lifecycle commands
//!   work even when `projects.yml` does not exist.
//!
//! ## Example
//!
//! ```yaml
//! projects:
//!   symfony:
//!     name: Symfony API
//!     repo_env_var: GITHUB_REPO
//!     mount_dir: projects/symfony-api
//!     repo_subdir: app
//!     container: symfony-php
//!     service: php
//!     related_services: [nginx]
//!     setup_steps:
//!       - composer install
//!       - php bin/console doctrine:migrations:migrate --no-interaction
//! stack:
//!   database_container: symfony-mysql
//! ```
//!
//! Both sections are read fresh at the start of each command; nothing is cached
//! or written back. Each section is deserialized on its own and unknown keys are
//! ignored, so a mistake under `stack:` never blocks `dev setup` and vice versa.
//!
use crate::common::ui::Reporter;
use crate::core::error::{DevstackError, Result};
use anyhow::Context;
use serde::Deserialize;
use serde_yaml::Value;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Component, Path, PathBuf};
use tracing::{debug, info};

/// File name of the registry document inside the project root.
pub const REGISTRY_FILENAME: &str = "projects.yml";

/// Files whose presence marks a directory as the stack root.
const ROOT_MARKERS: [&str; 5] = [
    "docker-compose.yml",
    "docker-compose.yaml",
    "compose.yaml",
    "compose.yml",
    REGISTRY_FILENAME,
];

/// One project entry under `projects:`.
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ProjectConfig {
    /// Display name used in messages.
    pub name: String,
    /// Name of the `.env` variable holding the repository URL.
    pub repo_env_var: String,
    /// Host directory bind-mounted into the container. Relative to the root; `~` allowed.
    pub mount_dir: String,
    /// Directory under `mount_dir` the repository is cloned into.
    #[serde(default = "default_repo_subdir")]
    pub repo_subdir: String,
    /// Name of the container the setup steps run in.
    pub container: String,
    /// Compose service name. Defaults to the project id.
    #[serde(default)]
    pub service: String,
    /// Other compose services stopped and started around a re-clone.
    #[serde(default)]
    pub related_services: Vec<String>,
    /// Shell command strings run in order inside `container`.
    #[serde(default)]
    pub setup_steps: Vec<String>,
}

impl ProjectConfig {
    /// Absolute host path of the mount directory.
    pub fn mount_path(&self, root: &Path) -> PathBuf {
        let expanded = PathBuf::from(shellexpand::tilde(&self.mount_dir).into_owned());
        if expanded.is_absolute() {
            expanded
        } else {
            root.join(expanded)
        }
    }

    /// Absolute host path of the cloned repository.
    pub fn repo_path(&self, root: &Path) -> PathBuf {
        self.mount_path(root).join(&self.repo_subdir)
    }

    /// Compose services in the order they are stopped and started.
    pub fn services(&self) -> Vec<&str> {
        std::iter::once(self.service.as_str())
            .chain(self.related_services.iter().map(String::as_str))
            .collect()
    }
}

/// The parsed registry: project id -> configuration.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    projects: BTreeMap<String, ProjectConfig>,
}

impl Registry {
    pub fn new(projects: BTreeMap<String, ProjectConfig>) -> Self {
        Self { projects }
    }

    /// Looks up `id`; an absent id is an error naming the known ids.
    pub fn get(&self, id: &str) -> Result<&ProjectConfig> {
        self.projects.get(id).ok_or_else(|| {
            anyhow::Error::new(DevstackError::UnknownProject {
                name: id.to_string(),
                known: self.ids(),
            })
        })
    }

    pub fn ids(&self) -> Vec<String> {
        self.projects.keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.projects.len()
    }
}

/// A service URL printed after `dev start` / `dev up` / `dev init`.
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct AccessUrl {
    pub label: String,
    pub url: String,
}

/// A project cloned by `dev init` if its directory is missing.
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct BootstrapProject {
    pub label: String,
    /// Directory relative to the root.
    pub dir: String,
    /// `.env` variable consulted before prompting for a URL.
    #[serde(default)]
    pub repo_env_var: Option<String>,
}

/// Settings under `stack:` used by the lifecycle commands.
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct StackSettings {
    /// `dev shell <service>` opens `<container_prefix>-<service>`.
    pub container_prefix: String,
    pub php_container: String,
    pub node_container: String,
    pub database_container: String,
    /// Services accepted by `dev shell`.
    pub shell_services: Vec<String>,
    /// Services whose images only ship `sh`.
    pub sh_services: Vec<String>,
    pub default_shell_service: String,
    /// Project id run by `dev setup-symfony`.
    pub symfony_project: String,
    /// Manifest that triggers `composer install` during `dev init`.
    pub dependency_manifest: String,
    /// Image used to delete root-owned files left behind by containers.
    pub cleanup_image: String,
    pub urls: Vec<AccessUrl>,
    pub bootstrap_projects: Vec<BootstrapProject>,
}

impl Default for StackSettings {
    fn default() -> Self {
        Self {
            container_prefix: "symfony".to_string(),
            php_container: "symfony-php".to_string(),
            node_container: "symfony-vue".to_string(),
            database_container: "symfony-mysql".to_string(),
            shell_services: ["php", "nginx", "mysql", "vue"].map(String::from).to_vec(),
            sh_services: ["nginx", "vue"].map(String::from).to_vec(),
            default_shell_service: "php".to_string(),
            symfony_project: "symfony".to_string(),
            dependency_manifest: "composer.json".to_string(),
            cleanup_image: "alpine:3".to_string(),
            urls: default_urls(),
            bootstrap_projects: default_bootstrap_projects(),
        }
    }
}

fn default_repo_subdir() -> String {
    "app".to_string()
}

fn default_urls() -> Vec<AccessUrl> {
    [
        ("Vue Frontend", "http://app.localhost"),
        ("Symfony API", "http://api.localhost"),
        ("phpMyAdmin", "http://phpmyadmin.localhost"),
        ("Dozzle (Logs)", "http://dozzle.localhost"),
        ("Traefik Dashboard", "http://traefik.localhost"),
    ]
    .into_iter()
    .map(|(label, url)| AccessUrl {
        label: label.to_string(),
        url: url.to_string(),
    })
    .collect()
}

fn default_bootstrap_projects() -> Vec<BootstrapProject> {
    vec![
        BootstrapProject {
            label: "Symfony".to_string(),
            dir: "projects/symfony-api".to_string(),
            repo_env_var: Some("GITHUB_REPO".to_string()),
        },
        BootstrapProject {
            label: "Vue".to_string(),
            dir: "projects/frontend".to_string(),
            repo_env_var: Some("VUE_REPO".to_string()),
        },
    ]
}

/// Resolves the project root for this invocation.
///
/// An explicit root (`--root` / `DEV_PROJECT_ROOT`) wins and is made absolute.
/// Otherwise the root is the nearest ancestor of the `dev` binary holding a
/// compose file or `projects.yml`, so the working directory does not matter.
/// The current directory is the last resort.
pub fn resolve_root(explicit: Option<PathBuf>) -> Result<PathBuf> {
    let cwd = std::env::current_dir().context("Could not determine the current directory")?;
    if let Some(root) = explicit {
        return Ok(cwd.join(root));
    }
    let from_binary = std::env::current_exe()
        .and_then(|exe| exe.canonicalize())
        .ok()
        .and_then(|exe| exe.parent().and_then(find_stack_root));
    match from_binary {
        Some(root) => {
            debug!("Project root located from binary: {}", root.display());
            Ok(root)
        }
        None => {
            debug!("No stack root above the binary, using {}", cwd.display());
            Ok(cwd)
        }
    }
}

/// Nearest directory at or above `start` containing one of the root markers.
pub fn find_stack_root(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .find(|dir| ROOT_MARKERS.iter().any(|marker| dir.join(marker).is_file()))
        .map(Path::to_path_buf)
}

/// Loads the project registry from `<root>/projects.yml`.
///
/// Errors when the file is missing, malformed, lacks the `projects` key, or an
/// entry fails validation. Callers treat any error as "cannot proceed".
pub fn load_registry(root: &Path) -> Result<Registry> {
    let path = root.join(REGISTRY_FILENAME);
    if !path.exists() {
        return Err(DevstackError::MissingFile { path })
            .context("Please ensure projects.yml exists with project configuration");
    }
    info!("Loading project registry from: {}", path.display());
    let document = read_document(&path)?;
    let projects_section = section(&document, "projects").ok_or_else(|| {
        DevstackError::Config(format!(
            "Invalid {} format - missing 'projects' key",
            REGISTRY_FILENAME
        ))
    })?;
    let mut projects: BTreeMap<String, ProjectConfig> =
        serde_yaml::from_value(projects_section.clone())
            .with_context(|| format!("Error parsing 'projects' in {}", path.display()))?;

    for (id, project) in projects.iter_mut() {
        if project.service.trim().is_empty() {
            project.service = id.clone();
        }
        validate_project(id, project)?;
    }
    let registry = Registry::new(projects);
    debug!("Registry contains {} project(s)", registry.len());
    Ok(registry)
}

/// Loads `stack:` settings, falling back to defaults.
///
/// A missing file or section silently yields defaults. A malformed file is
/// reported as a warning so lifecycle commands keep working.
pub fn load_stack_settings(root: &Path, reporter: &dyn Reporter) -> StackSettings {
    let path = root.join(REGISTRY_FILENAME);
    if !path.exists() {
        debug!("{} not found, using default stack settings", path.display());
        return StackSettings::default();
    }
    match read_stack_settings(&path) {
        Ok(settings) => settings,
        Err(e) => {
            reporter.warning(&format!("{:#}; using default stack settings", e));
            StackSettings::default()
        }
    }
}

fn read_stack_settings(path: &Path) -> Result<StackSettings> {
    let document = read_document(path)?;
    match section(&document, "stack") {
        Some(stack) => serde_yaml::from_value(stack.clone())
            .with_context(|| format!("Error parsing 'stack' in {}", path.display())),
        None => Ok(StackSettings::default()),
    }
}

/// Reads the whole document as untyped YAML; an empty file is `Null`.
fn read_document(path: &Path) -> Result<Value> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Error reading {}", path.display()))?;
    if content.trim().is_empty() {
        return Ok(Value::Null);
    }
    serde_yaml::from_str(&content).with_context(|| format!("Error parsing {}", path.display()))
}

/// A top-level section, treating an explicit `null` as absent.
fn section<'a>(document: &'a Value, key: &str) -> Option<&'a Value> {
    document.get(key).filter(|value| !value.is_null())
}

fn validate_project(id: &str, project: &ProjectConfig) -> Result<()> {
    let required = [
        ("name", &project.name),
        ("repo_env_var", &project.repo_env_var),
        ("mount_dir", &project.mount_dir),
        ("container", &project.container),
    ];
    for (field, value) in required {
        if value.trim().is_empty() {
            return Err(DevstackError::Config(format!(
                "Project '{}' has an empty '{}'",
                id, field
            ))
            .into());
        }
    }
    // The subdirectory is what gets deleted; it must never resolve to the mount
    // point or anything above it.
    let mut components = Path::new(&project.repo_subdir).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(_)), None) => Ok(()),
        _ => Err(DevstackError::Config(format!(
            "Project '{}' has an invalid 'repo_subdir' '{}': expected a single directory name",
            id, project.repo_subdir
        ))
        .into()),
    }
}

// --- Unit Tests ---
#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::ui::testing::RecordingReporter;
    use tempfile::tempdir;

    const SAMPLE: &str = r#"
projects:
  backend:
    name: Backend API
    repo_env_var: BACKEND_REPO
    mount_dir: projects/backend
    container: app-backend
    related_services: [nginx, worker]
    setup_steps:
      - migrate
      - seed
  frontend:
    name: Frontend
    repo_env_var: FRONTEND_REPO
    mount_dir: projects/frontend
    repo_subdir: web
    container: app-frontend
    service: vue
stack:
  database_container: app-db
"#;

    fn write_registry(root: &Path, content: &str) {
        fs::write(root.join(REGISTRY_FILENAME), content).unwrap();
    }

    #[test]
    fn test_load_registry_defaults() {
        let dir = tempdir().unwrap();
        write_registry(dir.path(), SAMPLE);

        let registry = load_registry(dir.path()).unwrap();
        assert_eq!(registry.len(), 2);

        let backend = registry.get("backend").unwrap();
        assert_eq!(backend.repo_subdir, "app");
        assert_eq!(backend.service, "backend"); // Defaults to the id
        assert_eq!(backend.services(), vec!["backend", "nginx", "worker"]);
        assert_eq!(backend.setup_steps, vec!["migrate", "seed"]);
        assert_eq!(
            backend.repo_path(dir.path()),
            dir.path().join("projects/backend/app")
        );

        let frontend = registry.get("frontend").unwrap();
        assert_eq!(frontend.service, "vue");
        assert_eq!(frontend.repo_subdir, "web");
        assert!(frontend.setup_steps.is_empty());
        assert!(frontend.related_services.is_empty());
    }

    #[test]
    fn test_unknown_project_lists_known_ids() {
        let dir = tempdir().unwrap();
        write_registry(dir.path(), SAMPLE);
        let registry = load_registry(dir.path()).unwrap();

        let err = registry.get("billing").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Unknown project 'billing'. Known projects: backend, frontend"
        );
    }

    #[test]
    fn test_missing_file_is_error() {
        let dir = tempdir().unwrap();
        let err = load_registry(dir.path()).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<DevstackError>(),
            Some(DevstackError::MissingFile { .. })
        ));
    }

    #[test]
    fn test_missing_projects_key_is_error() {
        let dir = tempdir().unwrap();
        write_registry(dir.path(), "stack:\n  php_container: x\n");
        let err = load_registry(dir.path()).unwrap_err();
        assert!(err.to_string().contains("missing 'projects' key"));

        write_registry(dir.path(), "");
        assert!(load_registry(dir.path()).is_err());
    }

    #[test]
    fn test_unknown_keys_are_ignored() {
        let dir = tempdir().unwrap();
        write_registry(
            dir.path(),
            "version: 1\nprojects:\n  p:\n    name: P\n    repo_env_var: R\n    mount_dir: m\n    container: c\n    owner: platform-team\n",
        );
        let registry = load_registry(dir.path()).unwrap();
        assert_eq!(registry.ids(), vec!["p"]);
        assert_eq!(registry.get("p").unwrap().container, "c");
    }

    #[test]
    fn test_bad_stack_section_does_not_block_registry() {
        let dir = tempdir().unwrap();
        write_registry(
            dir.path(),
            "projects:\n  p:\n    name: P\n    repo_env_var: R\n    mount_dir: m\n    container: c\nstack:\n  php_containr: x\n  urls: not-a-list\n",
        );
        assert_eq!(load_registry(dir.path()).unwrap().len(), 1);

        // The stack loader still reports its own section.
        let reporter = RecordingReporter::default();
        let settings = load_stack_settings(dir.path(), &reporter);
        assert_eq!(settings, StackSettings::default());
        assert!(reporter.contains("Error parsing 'stack'"));
    }

    #[test]
    fn test_stack_settings_ignore_unknown_keys_and_bad_projects() {
        let dir = tempdir().unwrap();
        write_registry(
            dir.path(),
            "projects: [not, a, map]\nstack:\n  php_containr: typo\n  php_container: api-php\n",
        );
        let reporter = RecordingReporter::default();
        let settings = load_stack_settings(dir.path(), &reporter);
        assert_eq!(settings.php_container, "api-php");
        assert!(reporter.lines().is_empty());

        let err = load_registry(dir.path()).unwrap_err();
        assert!(format!("{:#}", err).contains("Error parsing 'projects'"));
    }

    #[test]
    fn test_malformed_yaml_is_error() {
        let dir = tempdir().unwrap();
        write_registry(dir.path(), "projects: [unterminated\n");
        let err = load_registry(dir.path()).unwrap_err();
        assert!(format!("{:#}", err).contains("Error parsing"));
    }

    #[test]
    fn test_repo_subdir_must_be_single_component() {
        let dir = tempdir().unwrap();
        for bad in ["..", ".", "a/b", "/abs"] {
            write_registry(
                dir.path(),
                &format!(
                    "projects:\n  p:\n    name: P\n    repo_env_var: R\n    mount_dir: m\n    container: c\n    repo_subdir: \"{}\"\n",
                    bad
                ),
            );
            let err = load_registry(dir.path()).unwrap_err();
            assert!(
                err.to_string().contains("invalid 'repo_subdir'"),
                "{bad} should be rejected"
            );
        }
    }

    #[test]
    fn test_empty_required_field_is_error() {
        let dir = tempdir().unwrap();
        write_registry(
            dir.path(),
            "projects:\n  p:\n    name: P\n    repo_env_var: R\n    mount_dir: m\n    container: \"\"\n",
        );
        let err = load_registry(dir.path()).unwrap_err();
        assert!(err.to_string().contains("empty 'container'"));
    }

    #[test]
    fn test_stack_settings_partial_override() {
        let dir = tempdir().unwrap();
        write_registry(dir.path(), SAMPLE);
        let reporter = RecordingReporter::default();
        let settings = load_stack_settings(dir.path(), &reporter);
        assert_eq!(settings.database_container, "app-db");
        assert_eq!(settings.php_container, "symfony-php");
        assert_eq!(settings.bootstrap_projects.len(), 2);
        assert!(reporter.lines().is_empty());
    }

    #[test]
    fn test_stack_settings_missing_file_and_malformed() {
        let dir = tempdir().unwrap();
        let reporter = RecordingReporter::default();
        assert_eq!(
            load_stack_settings(dir.path(), &reporter),
            StackSettings::default()
        );

        write_registry(dir.path(), "stack: [oops\n");
        let settings = load_stack_settings(dir.path(), &reporter);
        assert_eq!(settings, StackSettings::default());
        assert!(reporter.contains("using default stack settings"));
    }

    #[test]
    fn test_find_stack_root_walks_up_from_binary_dir() {
        let dir = tempdir().unwrap();
        let stack = dir.path().join("stack");
        let bin_dir = stack.join("target/release");
        fs::create_dir_all(&bin_dir).unwrap();
        fs::write(stack.join("docker-compose.yml"), "services: {}\n").unwrap();

        assert_eq!(find_stack_root(&bin_dir), Some(stack.clone()));
        assert_eq!(find_stack_root(&stack), Some(stack));
        assert_eq!(find_stack_root(dir.path()), None);
    }

    #[test]
    fn test_find_stack_root_accepts_registry_marker() {
        let dir = tempdir().unwrap();
        let nested = dir.path().join("tools/bin");
        fs::create_dir_all(&nested).unwrap();
        write_registry(dir.path(), SAMPLE);
        assert_eq!(find_stack_root(&nested), Some(dir.path().to_path_buf()));
    }

    #[test]
    fn test_resolve_root_explicit_is_absolute() {
        let dir = tempdir().unwrap();
        assert_eq!(
            resolve_root(Some(dir.path().to_path_buf())).unwrap(),
            dir.path()
        );
        let relative = resolve_root(Some(PathBuf::from("stack"))).unwrap();
        assert!(relative.is_absolute());
        assert!(relative.ends_with("stack"));
    }

    #[test]
    fn test_mount_path_absolute_is_kept() {
        let project = ProjectConfig {
            name: "x".into(),
            repo_env_var: "X".into(),
            mount_dir: "/srv/x".into(),
            repo_subdir: "app".into(),
            container: "c".into(),
            service: "x".into(),
            related_services: vec![],
            setup_steps: vec![],
        };
        assert_eq!(project.mount_path(Path::new("/root")), PathBuf::from("/srv/x"));
        assert_eq!(project.repo_path(Path::new("/root")), PathBuf::from("/srv/x/app"));
    }
}
