//! Flat key=value configuration map with permissive value parsing

use std::collections::HashMap;

use sdls_core::{SdlsError, SdlsResult};

/// Ordered view over the raw configuration entries.
///
/// Keys keep their first-seen position while a later duplicate entry
/// overrides the earlier value, so managed parameters register in the
/// order the deployment listed them.
#[derive(Debug, Clone, Default)]
pub(crate) struct ConfigMap {
    keys: Vec<String>,
    values: HashMap<String, String>,
}

impl ConfigMap {
    /// Split every entry at the first `=` into key and value.
    pub fn parse<I, S>(entries: I) -> SdlsResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut map = Self::default();
        for entry in entries {
            let entry = entry.as_ref();
            let Some((key, value)) = entry.split_once('=') else {
                return Err(SdlsError::InvalidConfiguration(format!(
                    "entry '{}' is not a key=value pair",
                    entry
                )));
            };
            if !map.values.contains_key(key) {
                map.keys.push(key.to_string());
            }
            map.values.insert(key.to_string(), value.to_string());
        }
        Ok(map)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// Keys in first-seen order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.keys.iter().map(String::as_str)
    }

    /// String value with a default for absent keys.
    pub fn get_string(&self, key: &str, default: &str) -> String {
        self.get(key).unwrap_or(default).to_string()
    }

    /// String value where the empty string means "not configured".
    pub fn get_optional(&self, key: &str) -> Option<String> {
        match self.get(key) {
            None | Some("") => None,
            Some(value) => Some(value.to_string()),
        }
    }

    pub fn get_bool(&self, key: &str, default: bool) -> SdlsResult<bool> {
        match self.get(key) {
            None => Ok(default),
            Some(value) => parse_bool(key, value),
        }
    }

    pub fn get_u16(&self, key: &str, default: u16) -> SdlsResult<u16> {
        match self.get(key) {
            None => Ok(default),
            Some(value) => value
                .parse::<u16>()
                .map_err(|_| invalid_value(key, value)),
        }
    }

    /// Hexadecimal value with an optional `0x` prefix.
    pub fn get_hex_u8(&self, key: &str, default: u8) -> SdlsResult<u8> {
        match self.get(key) {
            None => Ok(default),
            Some(value) => {
                let digits = value
                    .strip_prefix("0x")
                    .or_else(|| value.strip_prefix("0X"))
                    .unwrap_or(value);
                u8::from_str_radix(digits, 16).map_err(|_| invalid_value(key, value))
            }
        }
    }
}

/// Permissive boolean parsing: `1/y/yes/t/true/on` and `0/n/no/f/false/off`,
/// case-insensitively.
pub(crate) fn parse_bool(key: &str, value: &str) -> SdlsResult<bool> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "y" | "yes" | "t" | "true" | "on" => Ok(true),
        "0" | "n" | "no" | "f" | "false" | "off" => Ok(false),
        _ => Err(invalid_value(key, value)),
    }
}

pub(crate) fn invalid_value(key: &str, value: &str) -> SdlsError {
    SdlsError::InvalidConfigurationValue {
        key: key.to_string(),
        value: value.to_string(),
    }
}
