use std::fs;
use std::path::PathBuf;

use queue_behavior_bench::domain::profile::{NamedProfile, ParallelismProfile, ProfileRegistry};
use queue_behavior_bench::error::{ConfigurationError, Error};

fn write_temp_json(content: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!("profiles-{}.json", uuid::Uuid::new_v4()));
    fs::write(&path, content).expect("failed to write temporary profile file");
    path
}

#[test]
fn test_lookup_is_pure() {
    let registry = ProfileRegistry::builtin();

    let first = registry.lookup("local_quadcore").unwrap();
    let second = registry.lookup("local_quadcore").unwrap();

    assert_eq!(first, second);
    assert_eq!(first, ParallelismProfile::new(2, 2, 4, 2));
}

#[test]
fn test_unknown_profile_lists_available_names() {
    let registry = ProfileRegistry::builtin();

    let result = registry.lookup("huge");

    match result {
        Err(Error::ProfileNotFound { name, available }) => {
            assert_eq!(name, "huge");
            assert_eq!(available, registry.names());
        }
        other => panic!("Expected ProfileNotFound, got {:?}", other),
    }
    // Never falls back to a default.
    assert!(registry.lookup("huge").is_err());
}

#[test]
fn test_lookup_is_case_sensitive() {
    let registry = ProfileRegistry::builtin();

    assert!(registry.lookup("local_dualcore").is_ok());
    assert!(matches!(registry.lookup("LOCAL_DUALCORE"), Err(Error::ProfileNotFound { .. })));
    assert!(matches!(registry.lookup("local_dualcore "), Err(Error::ProfileNotFound { .. })));
}

#[test]
fn test_names_are_sorted() {
    let names = ProfileRegistry::builtin().names();

    assert_eq!(names, vec!["cluster_large", "cluster_small", "local_dualcore", "local_quadcore"]);
}

#[test]
fn test_registry_rejects_invalid_profiles() {
    let too_many_per_group = NamedProfile { name: "wide".to_string(), profile: ParallelismProfile::new(2, 3, 4, 2) };
    assert_eq!(
        ProfileRegistry::new([too_many_per_group]),
        Err(ConfigurationError::PerGroupExceedsDegree { profile: "wide".to_string(), field: "outerDopPerGroup", per_group: 3, degree: 2 })
    );

    let duplicate = || NamedProfile { name: "twice".to_string(), profile: ParallelismProfile::new(1, 1, 1, 1) };
    assert_eq!(ProfileRegistry::new([duplicate(), duplicate()]), Err(ConfigurationError::DuplicateProfile("twice".to_string())));
}

#[test]
fn test_load_profiles_from_json() {
    let path = write_temp_json(
        r#"{
            "profiles": [
                { "name": "tiny", "outerDop": 1, "outerDopPerGroup": 1, "innerDop": 1, "innerDopPerGroup": 1 },
                { "name": "medium", "outerDop": 4, "outerDopPerGroup": 2, "innerDop": 16, "innerDopPerGroup": 4 }
            ]
        }"#,
    );

    let registry = ProfileRegistry::from_json_file(path.to_str().unwrap()).unwrap();
    fs::remove_file(&path).ok();

    assert_eq!(registry.names(), vec!["medium", "tiny"]);
    assert_eq!(registry.lookup("medium").unwrap(), ParallelismProfile::new(4, 2, 16, 4));
    assert!(registry.lookup("local_dualcore").is_err());
}

#[test]
fn test_load_profiles_with_invalid_entry() {
    let path = write_temp_json(r#"{ "profiles": [ { "name": "broken", "outerDop": 0, "outerDopPerGroup": 0, "innerDop": 1, "innerDopPerGroup": 1 } ] }"#);

    let result = ProfileRegistry::from_json_file(path.to_str().unwrap());
    fs::remove_file(&path).ok();

    assert!(matches!(result, Err(Error::Configuration(ConfigurationError::ZeroDegree { field: "outerDop", .. }))), "got {:?}", result);
}

#[test]
fn test_load_profiles_malformed_json() {
    let path = write_temp_json(r#"{ "profiles": [ { "name": "negative", "outerDop": -1 } ] }"#);

    let result = ProfileRegistry::from_json_file(path.to_str().unwrap());
    fs::remove_file(&path).ok();

    assert!(matches!(result, Err(Error::DeserializationError(_))), "got {:?}", result);
}

#[test]
fn test_error_file_not_found() {
    let result = ProfileRegistry::from_json_file("non_existent_profiles.json");

    assert!(matches!(result, Err(Error::IoError(_))), "Expected IoError, got {:?}", result);
}
