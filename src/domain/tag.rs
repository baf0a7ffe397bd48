use crate::domain::Version;

/// The pair of tags cut for one release, e.g. `v0.14.7` and `0.14.7`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseTags {
    pub prefixed: String,
    pub bare: String,
}

impl ReleaseTags {
    pub fn new(version: &Version) -> Self {
        ReleaseTags {
            prefixed: version.to_string(),
            bare: version.bare(),
        }
    }

    /// Annotation message shared by both tags
    pub fn message(&self) -> String {
        format!("version {}", self.bare)
    }

    /// Message of the release commit the tags point at
    pub fn commit_message(&self) -> String {
        format!("Release {}", self.bare)
    }

    /// Tag names in creation order
    pub fn names(&self) -> [&str; 2] {
        [self.prefixed.as_str(), self.bare.as_str()]
    }
}
