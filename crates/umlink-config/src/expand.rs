//! `${VAR}` expansion for string configuration values.

use crate::ConfigError;

/// Expand environment variable references in a configuration value.
///
/// `${VAR}` fails when `VAR` is unset, `${VAR:-default}` falls back to the
/// default. Values without `${` are returned as-is, so a bare `$` (common in
/// URLs and PlantUML sources) never triggers a lookup.
pub(crate) fn expand_env(value: &str, field: &str) -> Result<String, ConfigError> {
    if !value.contains("${") {
        return Ok(value.to_owned());
    }

    shellexpand::env_with_context(value, |var| -> Result<Option<String>, UnsetVar> {
        std::env::var(var).map(Some).map_err(|_| UnsetVar {
            name: var.to_owned(),
        })
    })
    .map(std::borrow::Cow::into_owned)
    .map_err(|e| ConfigError::EnvVar {
        field: field.to_owned(),
        message: format!("${{{}}} not set", e.cause.name),
    })
}

/// Lookup failure carrying the unset variable's name.
struct UnsetVar {
    name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expand_set_var() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::set_var("UMLINK_TEST_EXPAND_HOST", "plantuml.internal");
        }
        let result = expand_env("http://${UMLINK_TEST_EXPAND_HOST}:8080", "diagrams.server_url")
            .unwrap();
        assert_eq!(result, "http://plantuml.internal:8080");
        unsafe {
            std::env::remove_var("UMLINK_TEST_EXPAND_HOST");
        }
    }

    #[test]
    fn test_expand_default_when_unset() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::remove_var("UMLINK_TEST_EXPAND_UNSET");
        }
        let result = expand_env(
            "${UMLINK_TEST_EXPAND_UNSET:-http://localhost:8080}",
            "diagrams.server_url",
        )
        .unwrap();
        assert_eq!(result, "http://localhost:8080");
    }

    #[test]
    fn test_expand_missing_var_names_field() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::remove_var("UMLINK_TEST_EXPAND_MISSING");
        }
        let err = expand_env("${UMLINK_TEST_EXPAND_MISSING}", "attributes.imagesdir").unwrap_err();
        assert!(matches!(err, ConfigError::EnvVar { .. }));
        assert!(err.to_string().contains("UMLINK_TEST_EXPAND_MISSING"));
        assert!(err.to_string().contains("attributes.imagesdir"));
    }

    #[test]
    fn test_bare_dollar_untouched() {
        let result = expand_env("http://example.com/$path", "diagrams.server_url").unwrap();
        assert_eq!(result, "http://example.com/$path");
    }
}
