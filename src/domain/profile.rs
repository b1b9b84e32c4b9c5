use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::api::profile_dto::ProfilesDto;
use crate::error::{ConfigurationError, Error, Result};
use crate::loader::parser::parse_json_file;

/// Degrees of parallelism for the benchmark stages.
///
/// Source and sink share the outer degree, the prime tester uses the inner one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParallelismProfile {
    pub outer_dop: u32,
    pub outer_dop_per_group: u32,
    pub inner_dop: u32,
    pub inner_dop_per_group: u32,
}

impl ParallelismProfile {
    pub const fn new(outer_dop: u32, outer_dop_per_group: u32, inner_dop: u32, inner_dop_per_group: u32) -> Self {
        ParallelismProfile { outer_dop, outer_dop_per_group, inner_dop, inner_dop_per_group }
    }

    /// Checks that every degree is positive and no per-group cap exceeds its total.
    pub fn validate(&self, profile_name: &str) -> std::result::Result<(), ConfigurationError> {
        let fields = [
            ("outerDop", self.outer_dop),
            ("outerDopPerGroup", self.outer_dop_per_group),
            ("innerDop", self.inner_dop),
            ("innerDopPerGroup", self.inner_dop_per_group),
        ];
        if let Some((field, _)) = fields.into_iter().find(|(_, value)| *value == 0) {
            return Err(ConfigurationError::ZeroDegree { profile: profile_name.to_string(), field });
        }

        if self.outer_dop_per_group > self.outer_dop {
            return Err(ConfigurationError::PerGroupExceedsDegree {
                profile: profile_name.to_string(),
                field: "outerDopPerGroup",
                per_group: self.outer_dop_per_group,
                degree: self.outer_dop,
            });
        }
        if self.inner_dop_per_group > self.inner_dop {
            return Err(ConfigurationError::PerGroupExceedsDegree {
                profile: profile_name.to_string(),
                field: "innerDopPerGroup",
                per_group: self.inner_dop_per_group,
                degree: self.inner_dop,
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamedProfile {
    pub name: String,
    pub profile: ParallelismProfile,
}

const BUILTIN_PROFILES: [(&str, ParallelismProfile); 4] = [
    ("local_dualcore", ParallelismProfile::new(1, 1, 2, 2)),
    ("local_quadcore", ParallelismProfile::new(2, 2, 4, 2)),
    ("cluster_small", ParallelismProfile::new(8, 2, 32, 8)),
    ("cluster_large", ParallelismProfile::new(40, 4, 200, 10)),
];

/// Immutable table of named parallelism profiles.
///
/// Built once at startup and only read afterwards, so it can be shared between
/// threads without locking.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileRegistry {
    profiles: BTreeMap<String, ParallelismProfile>,
}

impl ProfileRegistry {
    /// Builds a registry, rejecting invalid profiles and duplicate names.
    pub fn new(profiles: impl IntoIterator<Item = NamedProfile>) -> std::result::Result<Self, ConfigurationError> {
        let mut table = BTreeMap::new();

        for NamedProfile { name, profile } in profiles {
            profile.validate(&name)?;
            if table.contains_key(&name) {
                return Err(ConfigurationError::DuplicateProfile(name));
            }
            table.insert(name, profile);
        }

        Ok(ProfileRegistry { profiles: table })
    }

    /// The profiles shipped with the benchmark.
    pub fn builtin() -> Self {
        let profiles = BUILTIN_PROFILES.iter().map(|(name, profile)| (name.to_string(), *profile)).collect();
        ProfileRegistry { profiles }
    }

    /// Loads the profile table from a JSON file.
    pub fn from_json_file(file_path: &str) -> Result<Self> {
        let dto: ProfilesDto = parse_json_file(file_path)?;
        log::info!("Loaded {} profile definitions from '{}'.", dto.profiles.len(), file_path);

        let registry = Self::new(dto.profiles.into_iter().map(NamedProfile::from))?;
        Ok(registry)
    }

    /// Exact, case-sensitive lookup.
    pub fn lookup(&self, name: &str) -> Result<ParallelismProfile> {
        self.profiles
            .get(name)
            .copied()
            .ok_or_else(|| Error::ProfileNotFound { name: name.to_string(), available: self.names() })
    }

    /// All profile names in ascending order.
    pub fn names(&self) -> Vec<String> {
        self.profiles.keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_profiles_are_valid() {
        for (name, profile) in BUILTIN_PROFILES {
            assert_eq!(profile.validate(name), Ok(()), "builtin profile {} is invalid", name);
        }
        assert_eq!(ProfileRegistry::builtin().len(), BUILTIN_PROFILES.len());
    }

    #[test]
    fn test_validate_reports_first_zero_field() {
        let profile = ParallelismProfile::new(2, 2, 0, 0);

        assert_eq!(
            profile.validate("broken"),
            Err(ConfigurationError::ZeroDegree { profile: "broken".to_string(), field: "innerDop" })
        );
    }
}
