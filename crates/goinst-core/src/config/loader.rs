//! Environment variable loading helpers.
//!
//! Values are trimmed, and a blank value counts as unset everywhere, so
//! `GOINST_BIN_DIR=` behaves the same as not exporting the key at all.

use std::env;

/// Trimmed value of `key`, or `None` when unset, blank or not valid unicode.
pub fn env_optional(key: &str) -> Option<String> {
    let value = env::var(key).ok()?;
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

/// Value of `key`, falling back to `default` when unset or blank.
pub fn env_or<F>(key: &str, default: F) -> String
where
    F: FnOnce() -> String,
{
    env_optional(key).unwrap_or_else(default)
}

/// Parse a boolean flag: 0/false/no/off are false, any other value is true.
/// Unset or blank yields `default`.
pub fn env_bool(key: &str, default: bool) -> bool {
    match env_optional(key) {
        Some(v) => !matches!(v.to_lowercase().as_str(), "0" | "false" | "no" | "off"),
        None => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Each test owns distinct keys; the test harness runs them in parallel.

    #[test]
    fn test_env_or_blank_falls_back_to_default() {
        let fallback = || "/usr/local/bin".to_string();

        env::remove_var("GOINST_TEST_OR_BIN");
        assert_eq!(env_or("GOINST_TEST_OR_BIN", fallback), "/usr/local/bin");

        env::set_var("GOINST_TEST_OR_BIN", "  ");
        assert_eq!(env_or("GOINST_TEST_OR_BIN", fallback), "/usr/local/bin");

        env::set_var("GOINST_TEST_OR_BIN", "/opt/bin");
        assert_eq!(env_or("GOINST_TEST_OR_BIN", fallback), "/opt/bin");
    }

    #[test]
    fn test_env_optional_blank_is_none() {
        env::set_var("GOINST_TEST_OPT_BLANK", "   ");
        assert_eq!(env_optional("GOINST_TEST_OPT_BLANK"), None);
        env::set_var("GOINST_TEST_OPT_BLANK", " /opt/gopath ");
        assert_eq!(
            env_optional("GOINST_TEST_OPT_BLANK").as_deref(),
            Some("/opt/gopath")
        );
    }

    #[test]
    fn test_env_bool_values() {
        env::remove_var("GOINST_TEST_BOOL");
        assert!(env_bool("GOINST_TEST_BOOL", true));
        assert!(!env_bool("GOINST_TEST_BOOL", false));

        env::set_var("GOINST_TEST_BOOL", "");
        assert!(env_bool("GOINST_TEST_BOOL", true));

        for off in ["0", "false", "No", " off "] {
            env::set_var("GOINST_TEST_BOOL", off);
            assert!(!env_bool("GOINST_TEST_BOOL", true), "{off:?}");
        }
        for on in ["1", "true", "yes"] {
            env::set_var("GOINST_TEST_BOOL", on);
            assert!(env_bool("GOINST_TEST_BOOL", false), "{on:?}");
        }
    }
}
