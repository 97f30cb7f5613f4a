use proptest::prelude::*;
use zipdeploy_core::{DeploymentTarget, Error, archive_path_for_function};

#[test]
fn object_key_is_function_name_with_zip_suffix() {
    let target = DeploymentTarget::new("myfunc", "my-bucket").unwrap();

    assert_eq!(target.function_name(), "myfunc");
    assert_eq!(target.bucket(), "my-bucket");
    assert_eq!(target.object_key(), "myfunc.zip");
}

#[test]
fn archive_path_lives_in_system_temp_dir() {
    let target = DeploymentTarget::new("myfunc", "my-bucket").unwrap();

    assert_eq!(target.archive_path(), std::env::temp_dir().join("myfunc.zip"));
}

#[test]
fn empty_function_name_rejected() {
    let result = DeploymentTarget::new("  ", "my-bucket");
    assert!(matches!(result, Err(Error::MissingFunctionName)));
}

#[test]
fn empty_bucket_rejected() {
    let result = DeploymentTarget::new("myfunc", "");
    assert!(matches!(result, Err(Error::MissingBucketName)));
}

#[test]
fn function_name_with_separator_rejected() {
    let result = DeploymentTarget::new("../escape", "my-bucket");
    assert!(matches!(result, Err(Error::InvalidFunctionName { .. })));

    let result = archive_path_for_function("a\\b");
    assert!(matches!(result, Err(Error::InvalidFunctionName { .. })));
}

#[test]
fn dot_components_rejected() {
    assert!(matches!(
        archive_path_for_function(".."),
        Err(Error::InvalidFunctionName { .. })
    ));
}

proptest! {
    #[test]
    fn key_and_archive_file_name_agree(name in "[A-Za-z0-9_-]{1,64}") {
        let target = DeploymentTarget::new(name.clone(), "bucket").unwrap();
        let archive = target.archive_path();
        let object_key = target.object_key();

        prop_assert_eq!(
            archive.file_name().and_then(|n| n.to_str()),
            Some(object_key.as_str())
        );
        prop_assert_eq!(archive_path_for_function(&name).unwrap(), archive);
    }
}
