//! Limits loaded from plcontainer.toml drive both encode and decode

use plc_config::loader::PROJECT_CONFIG_FILE;
use plc_config::ConfigLoader;
use plc_message::{CallRequest, Limits, MessageError, Procedure};
use std::fs;
use tempfile::TempDir;

#[test]
fn test_project_limits_applied() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(
        temp_dir.path().join(PROJECT_CONFIG_FILE),
        "[limits]\nmax_arguments = 2\nmax_field_bytes = 32\n",
    )
    .unwrap();

    let mut loader = ConfigLoader::with_global_config_path(temp_dir.path().join("none.toml"));
    let config = loader.load_from_directory(temp_dir.path()).unwrap();
    let limits = Limits::from(&config);

    assert_eq!(limits, Limits::new(2, 32));

    let ok = CallRequest::from_triples(
        Procedure::new("", "f"),
        [("a", "1", "int"), ("b", "2", "int")],
    );
    let bytes = ok.encode(&limits).unwrap();
    assert_eq!(CallRequest::decode(&bytes, &limits).unwrap(), ok);

    let too_many = ok.clone().with_argument(("c", "3", "int"));
    assert!(matches!(
        too_many.encode(&limits),
        Err(MessageError::MalformedCount { count: 3, max: 2 })
    ));

    // A peer with looser limits can still be rejected on receipt
    let wide = too_many.encode(&Limits::default()).unwrap();
    assert!(matches!(
        CallRequest::decode(&wide, &limits),
        Err(MessageError::MalformedCount { count: 3, max: 2 })
    ));
}
