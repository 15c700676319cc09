//! 配置条目与配置目录

use crate::value::ConfigValue;
use std::collections::BTreeMap;
use thiserror::Error;

/// 配置错误
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Top-level key '{0}' must be a table")]
    NotATable(String),

    #[error("Unsupported value for '{entry}.{key}': {kind}")]
    UnsupportedValue {
        entry: String,
        key: String,
        kind: &'static str,
    },
}

/// 一个命名的配置字典
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigEntry {
    name: String,
    values: BTreeMap<String, ConfigValue>,
}

impl ConfigEntry {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            values: BTreeMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn has(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn get(&self, key: &str) -> Option<&ConfigValue> {
        self.values.get(key)
    }

    /// 写入一个值，返回被覆盖的旧值
    pub fn put(&mut self, key: impl Into<String>, value: impl Into<ConfigValue>) -> Option<ConfigValue> {
        self.values.insert(key.into(), value.into())
    }

    pub fn remove(&mut self, key: &str) -> Option<ConfigValue> {
        self.values.remove(key)
    }

    pub fn get_int(&self, key: &str, default: i64) -> i64 {
        self.get(key).map_or(default, |v| v.as_int(default))
    }

    pub fn get_real(&self, key: &str, default: f64) -> f64 {
        self.get(key).map_or(default, |v| v.as_real(default))
    }

    pub fn get_bool(&self, key: &str, default: bool) -> bool {
        self.get(key).map_or(default, |v| v.as_bool(default))
    }

    pub fn get_string(&self, key: &str, default: &str) -> String {
        self.get(key)
            .and_then(ConfigValue::as_str)
            .unwrap_or(default)
            .to_string()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ConfigValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// 配置目录
///
/// 由若干命名 [`ConfigEntry`] 组成。所有读取方法都接受一个默认值：
/// 条目不存在、键不存在、或类型不匹配时返回默认值，从不失败。
///
/// # Example
///
/// ```
/// use gantry_config::ConfigurationCatalogue;
///
/// let mut catalogue = ConfigurationCatalogue::new();
/// catalogue.entry_mut("core").put("roll_speed", 2000);
///
/// assert_eq!(catalogue.get_int("core", "roll_speed", 4000), 2000);
/// assert_eq!(catalogue.get_real("coords", "arc_tolerance", 1.0), 1.0);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigurationCatalogue {
    entries: BTreeMap<String, ConfigEntry>,
}

impl ConfigurationCatalogue {
    pub fn new() -> Self {
        Self::default()
    }

    /// 从 TOML 文本构造配置目录
    ///
    /// 每个顶层表对应一个条目；表内的整数、浮点、布尔和字符串成为配置值。
    /// 数组、日期和嵌套表不受支持。
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let table: toml::Table = toml::from_str(source)?;
        let mut catalogue = Self::new();

        for (entry_name, section) in table {
            let toml::Value::Table(section) = section else {
                return Err(ConfigError::NotATable(entry_name));
            };

            let entry = catalogue.entry_mut(&entry_name);
            for (key, value) in section {
                let value = match value {
                    toml::Value::Integer(v) => ConfigValue::Integer(v),
                    toml::Value::Float(v) => ConfigValue::Real(v),
                    toml::Value::Boolean(v) => ConfigValue::Boolean(v),
                    toml::Value::String(v) => ConfigValue::String(v),
                    other => {
                        return Err(ConfigError::UnsupportedValue {
                            entry: entry_name,
                            key,
                            kind: other.type_str(),
                        });
                    },
                };
                entry.put(key, value);
            }
        }

        Ok(catalogue)
    }

    pub fn has_entry(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn entry(&self, name: &str) -> Option<&ConfigEntry> {
        self.entries.get(name)
    }

    /// 获取条目，不存在时创建
    pub fn entry_mut(&mut self, name: &str) -> &mut ConfigEntry {
        self.entries
            .entry(name.to_string())
            .or_insert_with(|| ConfigEntry::new(name))
    }

    pub fn remove_entry(&mut self, name: &str) -> Option<ConfigEntry> {
        self.entries.remove(name)
    }

    pub fn entries(&self) -> impl Iterator<Item = &ConfigEntry> {
        self.entries.values()
    }

    pub fn get_int(&self, entry: &str, key: &str, default: i64) -> i64 {
        self.entry(entry).map_or(default, |e| e.get_int(key, default))
    }

    pub fn get_real(&self, entry: &str, key: &str, default: f64) -> f64 {
        self.entry(entry).map_or(default, |e| e.get_real(key, default))
    }

    pub fn get_bool(&self, entry: &str, key: &str, default: bool) -> bool {
        self.entry(entry).map_or(default, |e| e.get_bool(key, default))
    }

    pub fn get_string(&self, entry: &str, key: &str, default: &str) -> String {
        self.entry(entry)
            .map_or_else(|| default.to_string(), |e| e.get_string(key, default))
    }
}
