//! Environment helpers: centralized dotenv loading and ergonomic getters.
//! Call `init_env()` once early in each binary (or rely on lazy Once).
use std::str::FromStr;
use std::sync::Once;

static INIT: Once = Once::new();

/// Load .env exactly once. Safe to call many times.
pub fn init_env() {
    INIT.call_once(|| {
        crate::env_boot::ensure_dotenv();
    });
}

/// Get optional env var (None if unset or empty).
pub fn env_opt(key: &str) -> Option<String> {
    init_env();
    match std::env::var(key) {
        Ok(v) if !v.trim().is_empty() => Some(v),
        _ => None,
    }
}

/// Get parsed value with default fallback.
pub fn env_parse<T>(key: &str, default: T) -> T
where
    T: FromStr + Clone,
{
    init_env();
    match std::env::var(key) {
        Ok(raw) => raw.parse::<T>().unwrap_or(default),
        Err(_) => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_parse_falls_back_on_garbage() {
        std::env::set_var("ENV_PARSE_TEST_KEY", "not-a-number");
        assert_eq!(env_parse("ENV_PARSE_TEST_KEY", 42u64), 42);
        std::env::remove_var("ENV_PARSE_TEST_KEY");
    }

    #[test]
    fn env_opt_treats_blank_as_unset() {
        std::env::set_var("ENV_OPT_TEST_KEY", "   ");
        assert_eq!(env_opt("ENV_OPT_TEST_KEY"), None);
        std::env::set_var("ENV_OPT_TEST_KEY", "value");
        assert_eq!(env_opt("ENV_OPT_TEST_KEY").as_deref(), Some("value"));
        std::env::remove_var("ENV_OPT_TEST_KEY");
    }
}
