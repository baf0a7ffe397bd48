use crate::error::{ReleaseError, Result};
use std::fmt;
use std::str::FromStr;

/// Dotted release version with one to three numeric components.
///
/// Trailing components that were never written (`v15`, `v15.0`) stay absent
/// so that rendering reproduces exactly the components the value carries.
/// Arithmetic treats absent components as zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Version {
    major: u64,
    minor: Option<u64>,
    patch: Option<u64>,
}

/// Which part of the version a release bumps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bump {
    /// Patch-level bump, no API change implied
    Fix,
    /// Minor-level bump, backward-compatible addition
    Feature,
    /// Major-level bump, incompatible change
    Breakage,
}

impl Bump {
    /// Pick the policy for the two independent flags; breakage wins over feature,
    /// and fix is the fallback when neither is set.
    pub fn select(feature: bool, breakage: bool) -> Self {
        if breakage {
            Bump::Breakage
        } else if feature {
            Bump::Feature
        } else {
            Bump::Fix
        }
    }

    /// Like [`Bump::select`], but `None` when no flag was given at all.
    pub fn from_flags(fix: bool, feature: bool, breakage: bool) -> Option<Self> {
        if !(fix || feature || breakage) {
            return None;
        }
        Some(Bump::select(feature, breakage))
    }
}

impl fmt::Display for Bump {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Bump::Fix => write!(f, "fix"),
            Bump::Feature => write!(f, "feature"),
            Bump::Breakage => write!(f, "breakage"),
        }
    }
}

impl Version {
    /// Create a full three-component version
    pub fn new(major: u64, minor: u64, patch: u64) -> Self {
        Version {
            major,
            minor: Some(minor),
            patch: Some(patch),
        }
    }

    /// Parse a version from a tag string (e.g., "v16.1.3", "v15.0", "v15")
    pub fn parse(tag: &str) -> Result<Self> {
        let clean_tag = tag
            .strip_prefix('v')
            .or_else(|| tag.strip_prefix('V'))
            .unwrap_or(tag);

        let parts: Vec<&str> = clean_tag.split('.').collect();
        if parts.len() > 3 {
            return Err(ReleaseError::version(format!(
                "Invalid version format: '{}' - expected at most three components",
                tag
            )));
        }

        let mut numbers = Vec::with_capacity(parts.len());
        for part in &parts {
            let number = part.parse::<u64>().map_err(|_| {
                ReleaseError::version(format!(
                    "Invalid version component '{}' in '{}'",
                    part, tag
                ))
            })?;
            numbers.push(number);
        }

        Ok(Version {
            major: numbers[0],
            minor: numbers.get(1).copied(),
            patch: numbers.get(2).copied(),
        })
    }

    pub fn major(&self) -> u64 {
        self.major
    }

    /// Minor component, zero when absent
    pub fn minor(&self) -> u64 {
        self.minor.unwrap_or(0)
    }

    /// Patch component, zero when absent
    pub fn patch(&self) -> u64 {
        self.patch.unwrap_or(0)
    }

    /// Number of components this version renders with
    pub fn component_count(&self) -> usize {
        1 + usize::from(self.minor.is_some()) + usize::from(self.patch.is_some())
    }

    /// Next version under the given bump policy.
    ///
    /// - **Fix**: `vM.m.p` -> `vM.m.(p+1)`, always three components
    /// - **Feature**: `vM.m.p` -> `vM.(m+1)`, patch dropped
    /// - **Breakage**: `vM.m.p` -> `v(M+1).0`, patch dropped and minor reset
    pub fn increment(&self, bump: Bump) -> Result<Self> {
        let next = match bump {
            Bump::Breakage => Version {
                major: bump_component(self.major, "major")?,
                minor: Some(0),
                patch: None,
            },
            Bump::Feature => Version {
                major: self.major,
                minor: Some(bump_component(self.minor(), "minor")?),
                patch: None,
            },
            Bump::Fix => Version {
                major: self.major,
                minor: Some(self.minor()),
                patch: Some(bump_component(self.patch(), "patch")?),
            },
        };
        Ok(next)
    }

    /// Version without the `v` prefix, as used in file contents and bare tags
    pub fn bare(&self) -> String {
        let mut rendered = self.major.to_string();
        for component in [self.minor, self.patch].into_iter().flatten() {
            rendered.push('.');
            rendered.push_str(&component.to_string());
        }
        rendered
    }
}

fn bump_component(value: u64, name: &str) -> Result<u64> {
    value
        .checked_add(1)
        .ok_or_else(|| ReleaseError::version(format!("{} component overflows", name)))
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}", self.bare())
    }
}

impl FromStr for Version {
    type Err = ReleaseError;

    fn from_str(s: &str) -> Result<Self> {
        Version::parse(s)
    }
}

/// Parse `version`, apply the policy picked by the two flags, and render the result.
pub fn increment(version: &str, feature: bool, breakage: bool) -> Result<String> {
    let next = Version::parse(version)?.increment(Bump::select(feature, breakage))?;
    Ok(next.to_string())
}

/// Expected increments, checked at startup before anything is touched.
const SELF_CHECK: &[(&str, bool, bool, &str)] = &[
    // fix
    ("v0.14.6", false, false, "v0.14.7"),
    ("v15", false, false, "v15.0.1"),
    ("v15.0", false, false, "v15.0.1"),
    ("v15.0.0", false, false, "v15.0.1"),
    ("v16.1", false, false, "v16.1.1"),
    ("v16.1.3", false, false, "v16.1.4"),
    ("v16.10", false, false, "v16.10.1"),
    // feature
    ("v15", true, false, "v15.1"),
    ("v15.0", true, false, "v15.1"),
    ("v16.1", true, false, "v16.2"),
    ("v16.1.7", true, false, "v16.2"),
    ("v16.10", true, false, "v16.11"),
    // breakage
    ("v15", false, true, "v16.0"),
    ("v15.0", true, true, "v16.0"),
    ("v15.0.1", false, true, "v16.0"),
    ("v15.2", true, true, "v16.0"),
    ("v15.10", false, true, "v16.0"),
];

/// Run the fixed increment table and fail on the first mismatch.
pub fn self_check() -> Result<()> {
    for &(input, feature, breakage, expected) in SELF_CHECK {
        let actual = increment(input, feature, breakage)?;
        if actual != expected {
            tracing::info!(component = "version", input, %actual, expected, "self check mismatch");
            return Err(ReleaseError::assertion(expected, actual));
        }
    }
    tracing::debug!(component = "version", cases = SELF_CHECK.len(), "self check passed");
    Ok(())
}
