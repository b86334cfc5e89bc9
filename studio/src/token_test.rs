use super::*;

fn store_in(dir: &tempfile::TempDir) -> TokenStore {
    TokenStore::new(dir.path().join("nested").join("storage.json"))
}

#[test]
fn missing_file_means_no_token() {
    let dir = tempfile::tempdir().unwrap();
    let store = store_in(&dir);
    assert_eq!(store.load().unwrap(), None);
    assert!(!store.is_logged_in());
}

#[test]
fn save_then_load_round_trips() {
    let dir = tempfile::tempdir().unwrap();
    let store = store_in(&dir);
    store.save("tok-123").unwrap();
    assert_eq!(store.load().unwrap().as_deref(), Some("tok-123"));
    assert!(store.is_logged_in());
}

#[test]
fn clear_removes_only_the_token_key() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("storage.json");
    std::fs::write(&path, r#"{"access_token":"t","theme":"dark"}"#).unwrap();

    let store = TokenStore::new(&path);
    store.clear().unwrap();

    assert_eq!(store.load().unwrap(), None);
    let raw: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(raw["theme"], "dark");
}

#[test]
fn clear_without_file_is_noop() {
    let dir = tempfile::tempdir().unwrap();
    let store = store_in(&dir);
    store.clear().unwrap();
    assert!(!store.path().exists());
}

#[test]
fn empty_token_counts_as_absent() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("storage.json");
    std::fs::write(&path, r#"{"access_token":""}"#).unwrap();
    assert_eq!(TokenStore::new(&path).load().unwrap(), None);
}

#[test]
fn non_object_file_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("storage.json");
    std::fs::write(&path, "[1,2,3]").unwrap();
    let store = TokenStore::new(&path);
    assert!(matches!(store.load(), Err(StudioError::Config(_))));
    assert!(!store.is_logged_in());
}

#[cfg(unix)]
#[test]
fn saved_file_is_owner_only() {
    use std::os::unix::fs::PermissionsExt;

    let dir = tempfile::tempdir().unwrap();
    let store = store_in(&dir);
    store.save("secret").unwrap();
    let mode = std::fs::metadata(store.path()).unwrap().permissions().mode();
    assert_eq!(mode & 0o777, 0o600);
}
