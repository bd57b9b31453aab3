use std::fmt;
use std::str::FromStr;

use semver::Version;
use serde::{Serialize, Serializer};
use thiserror::Error;

/// Why a coordinate string could not be parsed.
#[derive(Debug, Error)]
pub enum CoordinateError {
    #[error("expected `group:artifact:version`, found {found} segment(s)")]
    SegmentCount { found: usize },

    #[error("the {segment} segment is empty")]
    EmptySegment { segment: &'static str },

    #[error("version `{version}` is not a valid semantic version")]
    Version {
        version: String,
        #[source]
        source: semver::Error,
    },
}

/// A fully qualified Maven coordinate, `group:artifact:version`.
///
/// All three segments are mandatory. A coordinate without a version pin is
/// not resolvable at package-assembly time and is rejected at parse time.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Coordinate {
    group: String,
    artifact: String,
    version: Version,
}

impl Coordinate {
    pub fn new(group: impl Into<String>, artifact: impl Into<String>, version: Version) -> Self {
        Self {
            group: group.into(),
            artifact: artifact.into(),
            version,
        }
    }

    /// The group id, e.g. `com.android.tools`.
    pub fn group(&self) -> &str {
        &self.group
    }

    /// The artifact id, e.g. `desugar_jdk_libs`.
    pub fn artifact(&self) -> &str {
        &self.artifact
    }

    pub fn version(&self) -> &Version {
        &self.version
    }
}

impl FromStr for Coordinate {
    type Err = CoordinateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let segments: Vec<&str> = s.split(':').collect();
        let [group, artifact, version] = segments[..] else {
            return Err(CoordinateError::SegmentCount {
                found: segments.len(),
            });
        };
        for (name, value) in [("group", group), ("artifact", artifact), ("version", version)] {
            if value.trim().is_empty() {
                return Err(CoordinateError::EmptySegment { segment: name });
            }
        }
        let version = Version::parse(version).map_err(|source| CoordinateError::Version {
            version: version.to_string(),
            source,
        })?;
        Ok(Self {
            group: group.to_string(),
            artifact: artifact.to_string(),
            version,
        })
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.group, self.artifact, self.version)
    }
}

impl Serialize for Coordinate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
