use serial_test::serial;

use super::*;

const VARS: &[&str] = &[
    "MOLBERT_API_URL",
    "MOLBERT_TOKEN_PATH",
    "MOLBERT_REQUEST_TIMEOUT_SECS",
    "MOLBERT_CONNECT_TIMEOUT_SECS",
];

/// # Safety
/// Callers are `#[serial]`, so no other test touches the environment concurrently.
unsafe fn clear_studio_env() {
    for var in VARS {
        unsafe { std::env::remove_var(var) };
    }
}

#[test]
#[serial]
fn from_env_uses_defaults() {
    unsafe {
        clear_studio_env();
        std::env::set_var("MOLBERT_TOKEN_PATH", "/tmp/molbert-test/storage.json");
    }

    let cfg = StudioConfig::from_env().unwrap();
    assert_eq!(cfg.api_url, DEFAULT_API_URL);
    assert_eq!(cfg.token_path, PathBuf::from("/tmp/molbert-test/storage.json"));
    assert_eq!(cfg.timeouts, HttpTimeouts::default());

    unsafe { clear_studio_env() };
}

#[test]
#[serial]
fn from_env_trims_trailing_slashes_and_parses_timeouts() {
    unsafe {
        clear_studio_env();
        std::env::set_var("MOLBERT_API_URL", "https://api.molbert.test//");
        std::env::set_var("MOLBERT_TOKEN_PATH", "/tmp/t.json");
        std::env::set_var("MOLBERT_REQUEST_TIMEOUT_SECS", "30");
        std::env::set_var("MOLBERT_CONNECT_TIMEOUT_SECS", "3");
    }

    let cfg = StudioConfig::from_env().unwrap();
    assert_eq!(cfg.api_url, "https://api.molbert.test");
    assert_eq!(cfg.timeouts, HttpTimeouts { request_secs: 30, connect_secs: 3 });

    unsafe { clear_studio_env() };
}

#[test]
#[serial]
fn from_env_ignores_unparseable_timeouts() {
    unsafe {
        clear_studio_env();
        std::env::set_var("MOLBERT_TOKEN_PATH", "/tmp/t.json");
        std::env::set_var("MOLBERT_REQUEST_TIMEOUT_SECS", "soon");
    }

    let cfg = StudioConfig::from_env().unwrap();
    assert_eq!(cfg.timeouts.request_secs, DEFAULT_REQUEST_TIMEOUT_SECS);

    unsafe { clear_studio_env() };
}

#[test]
fn with_api_url_normalizes() {
    let cfg = StudioConfig {
        api_url: DEFAULT_API_URL.to_owned(),
        token_path: PathBuf::from("/tmp/t.json"),
        timeouts: HttpTimeouts::default(),
    }
    .with_api_url(" http://10.0.0.2:8000/ ");
    assert_eq!(cfg.api_url, "http://10.0.0.2:8000");
}
