//! Integration tests for the storage components
//!
//! These tests verify that a file-backed store configured the way the
//! portal configures it keeps its slots across handles.

use common::{FileStore, KeyValueStore, MemoryStore, PortalConfig};
use std::sync::Arc;

/// Test that verifies a file store opened from the config path persists
/// and clears a group of slots together
#[test]
fn test_configured_file_store_round_trip() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    let config = PortalConfig {
        session_file: dir.path().join("session.json"),
        ..PortalConfig::default()
    };

    let store: Arc<dyn KeyValueStore> = Arc::new(FileStore::new(&config.session_file));
    store.set_many(&[("auth_token", "t-1"), ("user_role", "USER"), ("user_id", "12")])?;

    let reopened = FileStore::new(&config.session_file);
    assert_eq!(reopened.get("user_id")?, Some("12".to_string()));

    reopened.remove_many(&["auth_token", "user_role", "user_id"])?;
    assert_eq!(store.get("auth_token")?, None);
    assert_eq!(store.get("user_role")?, None);
    assert_eq!(store.get("user_id")?, None);

    Ok(())
}

/// Test that readers on other threads never see a half-applied group write
#[test]
fn test_memory_store_group_writes_are_not_torn() -> Result<(), Box<dyn std::error::Error>> {
    let store = MemoryStore::new();
    let writer = store.clone();

    let handle = std::thread::spawn(move || {
        for i in 0..500 {
            let value = i.to_string();
            writer
                .set_many(&[("left", value.as_str()), ("right", value.as_str())])
                .expect("write failed");
        }
    });

    for _ in 0..500 {
        let values = store.get_many(&["left", "right"])?;
        assert_eq!(values[0], values[1]);
    }

    handle.join().expect("writer panicked");
    Ok(())
}
