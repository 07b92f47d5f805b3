use packguard_types::RenameMapping;

/// Translates between VCS paths and project-relative paths.
///
/// The linter runs in the project root, so tracking documents list files
/// relative to it; version control reports paths relative to the repository.
/// The two only differ when the project lives in a subdirectory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectRoot {
    prefix: String,
}

impl ProjectRoot {
    pub fn new(root_path: Option<&str>) -> Self {
        let prefix = root_path
            .unwrap_or_default()
            .trim()
            .trim_start_matches("./")
            .trim_matches('/')
            .to_string();
        let prefix = if prefix == "." { String::new() } else { prefix };
        Self { prefix }
    }

    pub fn is_vcs_root(&self) -> bool {
        self.prefix.is_empty()
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// `None` when `vcs_path` lies outside the project.
    pub fn to_project(&self, vcs_path: &str) -> Option<String> {
        if self.is_vcs_root() {
            return Some(vcs_path.to_string());
        }
        vcs_path
            .strip_prefix(self.prefix.as_str())
            .and_then(|rest| rest.strip_prefix('/'))
            .filter(|rest| !rest.is_empty())
            .map(str::to_string)
    }

    pub fn to_vcs(&self, project_path: &str) -> String {
        if self.is_vcs_root() {
            project_path.to_string()
        } else {
            format!("{}/{}", self.prefix, project_path)
        }
    }

    /// Renames with both sides inside the project, in project terms.
    pub fn project_renames(&self, renames: &[RenameMapping]) -> Vec<RenameMapping> {
        renames
            .iter()
            .filter_map(|r| {
                Some(RenameMapping::new(
                    self.to_project(&r.before)?,
                    self.to_project(&r.after)?,
                ))
            })
            .collect()
    }
}
