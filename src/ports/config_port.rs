//! Configuration access port trait.

/// Sectioned key/value lookup. Missing or unparsable numbers fall back to
/// the supplied default; blank strings read as missing.
pub trait ConfigPort {
    fn get_string(&self, section: &str, key: &str) -> Option<String>;
    fn get_int(&self, section: &str, key: &str, default: i64) -> i64;
    fn get_double(&self, section: &str, key: &str, default: f64) -> f64;
}
