use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Name of the per-repository configuration file
pub const CONFIG_FILE_NAME: &str = "release.toml";

/// Represents the complete configuration for a release run.
///
/// Every section falls back to the defaults of the tint2 release process, so a
/// partial file only needs the keys that differ.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
pub struct Config {
    #[serde(default)]
    pub project: ProjectConfig,

    #[serde(default)]
    pub files: FilesConfig,

    #[serde(default)]
    pub scripts: ScriptsConfig,

    #[serde(default)]
    pub build: BuildConfig,
}

fn default_project_name() -> String {
    "tint2".to_string()
}

fn default_branch() -> String {
    "master".to_string()
}

fn default_tag_glob() -> String {
    "v*".to_string()
}

/// Returns the default list of remotes a release is published to.
fn default_remotes() -> Vec<String> {
    vec![
        "origin-github".to_string(),
        "origin-gitlab".to_string(),
        "origin-opencode".to_string(),
    ]
}

/// Project identity and publishing targets.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ProjectConfig {
    #[serde(default = "default_project_name")]
    pub name: String,

    /// Branch pushed to every remote
    #[serde(default = "default_branch")]
    pub branch: String,

    /// Glob selecting the tags that carry versions
    #[serde(default = "default_tag_glob")]
    pub tag_glob: String,

    #[serde(default = "default_remotes")]
    pub remotes: Vec<String>,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        ProjectConfig {
            name: default_project_name(),
            branch: default_branch(),
            tag_glob: default_tag_glob(),
            remotes: default_remotes(),
        }
    }
}

fn default_readme() -> String {
    "README.md".to_string()
}

fn default_man_page() -> String {
    "doc/tint2.md".to_string()
}

fn default_changelog() -> String {
    "ChangeLog".to_string()
}

fn default_changelog_sentinel() -> String {
    "master".to_string()
}

/// Files whose version strings are rewritten, relative to the repository root.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct FilesConfig {
    #[serde(default = "default_readme")]
    pub readme: String,

    #[serde(default = "default_man_page")]
    pub man_page: String,

    #[serde(default = "default_changelog")]
    pub changelog: String,

    /// Marker the first changelog line must end with before release
    #[serde(default = "default_changelog_sentinel")]
    pub changelog_sentinel: String,
}

impl Default for FilesConfig {
    fn default() -> Self {
        FilesConfig {
            readme: default_readme(),
            man_page: default_man_page(),
            changelog: default_changelog(),
            changelog_sentinel: default_changelog_sentinel(),
        }
    }
}

fn default_generate_doc() -> String {
    "cd doc ; ./generate-doc.sh".to_string()
}

fn default_update_generated() -> String {
    "./update-generated.sh".to_string()
}

fn default_make_release() -> String {
    "./make_release.sh".to_string()
}

/// Project scripts invoked during the release.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ScriptsConfig {
    /// Regenerates derived docs after the man page header changes
    #[serde(default = "default_generate_doc")]
    pub generate_doc: String,

    #[serde(default = "default_update_generated")]
    pub update_generated: String,

    /// Produces `{project}-{version}.tar.gz`
    #[serde(default = "default_make_release")]
    pub make_release: String,
}

impl Default for ScriptsConfig {
    fn default() -> Self {
        ScriptsConfig {
            generate_doc: default_generate_doc(),
            update_generated: default_update_generated(),
            make_release: default_make_release(),
        }
    }
}

/// Returns the default tarball smoke-test steps.
fn default_build_steps() -> Vec<String> {
    vec![
        "tar -xzf {project}-{version}.tar.gz".to_string(),
        "cd {project}-{version} ; mkdir build ; cd build ; cmake .. ; make".to_string(),
        "cd {project}-{version} ; rm -r build".to_string(),
        "cd {project}-{version} ; mkdir build ; cd build ; cmake -GNinja .. ; ninja".to_string(),
    ]
}

fn default_clean_command() -> String {
    "rm -rf {project}-{version}* || true".to_string()
}

fn default_version_command() -> String {
    "./{project}-{version}/build/{project} -v".to_string()
}

fn default_expected_version() -> String {
    "{project} version {version}".to_string()
}

fn default_review_command() -> String {
    "git log -p -1 --word-diff".to_string()
}

/// Building and smoke-testing the release tarball.
///
/// Commands may use the `{project}` and `{version}` placeholders.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct BuildConfig {
    /// Removes leftovers of a previous attempt, run before `make_release`
    #[serde(default = "default_clean_command")]
    pub clean_command: String,

    /// Run in order after the tarball is produced
    #[serde(default = "default_build_steps")]
    pub steps: Vec<String>,

    /// Prints the version of the freshly built binary
    #[serde(default = "default_version_command")]
    pub version_command: String,

    #[serde(default = "default_expected_version")]
    pub expected_version: String,

    /// Shown to the maintainer before the first confirmation
    #[serde(default = "default_review_command")]
    pub review_command: String,
}

impl Default for BuildConfig {
    fn default() -> Self {
        BuildConfig {
            clean_command: default_clean_command(),
            steps: default_build_steps(),
            version_command: default_version_command(),
            expected_version: default_expected_version(),
            review_command: default_review_command(),
        }
    }
}

impl Config {
    /// Expand `{project}` and `{version}` in a configured command
    pub fn render(&self, template: &str, version: &str) -> String {
        template
            .replace("{project}", &self.project.name)
            .replace("{version}", version)
    }
}

/// Loads configuration from file or returns defaults.
///
/// Attempts to load configuration in the following order:
/// 1. Custom path provided as parameter
/// 2. `release.toml` in current directory
/// 3. `~/.config/.tint2-release.toml` in user config directory
/// 4. Default configuration if no file found
///
/// # Arguments
/// * `config_path` - Optional path to custom configuration file
///
/// # Returns
/// * `Ok(Config)` - Loaded or default configuration
/// * `Err` - If file exists but cannot be read or parsed
pub fn load_config(config_path: Option<&str>) -> Result<Config> {
    let config_str = if let Some(path) = config_path {
        fs::read_to_string(path)?
    } else if Path::new(CONFIG_FILE_NAME).exists() {
        fs::read_to_string(CONFIG_FILE_NAME)?
    } else if let Some(config_dir) = dirs::config_dir() {
        let config_path = config_dir.join(".tint2-release.toml");
        if config_path.exists() {
            fs::read_to_string(config_path)?
        } else {
            return Ok(Config::default());
        }
    } else {
        return Ok(Config::default());
    };

    parse_config(&config_str)
}

/// Parse configuration text, filling every missing key with its default.
pub fn parse_config(config_str: &str) -> Result<Config> {
    let config: Config = toml::from_str(config_str)?;
    if config.project.remotes.is_empty() {
        return Err(crate::error::ReleaseError::config(
            "at least one remote is required in [project].remotes",
        ));
    }
    Ok(config)
}
