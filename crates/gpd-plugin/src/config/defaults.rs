//! Built-in default values for recognized config keys.

use serde_json::Value;

/// Key read by the banana modules.
pub const BANANAS_KEY: &str = "bananas";

/// Built-in value of [`BANANAS_KEY`].
pub const BANANAS_LYRIC: &str = "Yes there were thirty, thousand, pounds...\nOf...bananas.";

/// Every recognized key with its built-in default.
pub const BUILTIN: &[(&str, &str)] = &[(BANANAS_KEY, BANANAS_LYRIC)];

/// The built-in default for `key`, if the key is recognized.
pub fn builtin(key: &str) -> Option<Value> {
    BUILTIN
        .iter()
        .find(|(known, _)| *known == key)
        .map(|(_, value)| Value::from(*value))
}
