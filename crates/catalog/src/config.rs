//! Shop-level configuration port.

pub const SHOP_DEFAULT: &str = "SHOP_DEFAULT";
pub const LANG_DEFAULT: &str = "LANG_DEFAULT";
pub const MULTISHOP_FEATURE_ACTIVE: &str = "MULTISHOP_FEATURE_ACTIVE";
pub const IMG_BASE_URL: &str = "IMG_BASE_URL";

/// Key/value configuration. Implementors only provide [`Self::get`].
pub trait ConfigurationStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;

    fn get_str(&self, key: &str, default: &str) -> String {
        self.get(key).unwrap_or_else(|| default.to_string())
    }

    fn get_int(&self, key: &str) -> Option<i64> {
        self.get(key).and_then(|v| v.trim().parse().ok())
    }

    /// `1`, `true`, `yes` and `on` are true; anything else, or a missing key, is false.
    fn get_bool(&self, key: &str) -> bool {
        self.get(key)
            .map(|v| {
                matches!(
                    v.trim().to_ascii_lowercase().as_str(),
                    "1" | "true" | "yes" | "on"
                )
            })
            .unwrap_or(false)
    }
}
