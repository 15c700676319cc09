//! 配置值类型

use serde::{Deserialize, Serialize};
use std::fmt;

/// 配置值的类型标签
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigValueType {
    Integer,
    Real,
    Boolean,
    String,
}

/// 单个配置值
///
/// TOML 中的整数、浮点、布尔和字符串分别映射到对应的变体。
/// 读取时允许 `Integer -> Real` 的隐式拓宽，其它跨类型读取都会回退到默认值。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ConfigValue {
    Boolean(bool),
    Integer(i64),
    Real(f64),
    String(String),
}

impl ConfigValue {
    /// 返回值的类型标签
    pub fn value_type(&self) -> ConfigValueType {
        match self {
            ConfigValue::Integer(_) => ConfigValueType::Integer,
            ConfigValue::Real(_) => ConfigValueType::Real,
            ConfigValue::Boolean(_) => ConfigValueType::Boolean,
            ConfigValue::String(_) => ConfigValueType::String,
        }
    }

    /// 读取整数；类型不匹配时返回 `default`
    pub fn as_int(&self, default: i64) -> i64 {
        match self {
            ConfigValue::Integer(v) => *v,
            _ => default,
        }
    }

    /// 读取实数；整数会被拓宽为实数
    pub fn as_real(&self, default: f64) -> f64 {
        match self {
            ConfigValue::Real(v) => *v,
            ConfigValue::Integer(v) => *v as f64,
            _ => default,
        }
    }

    /// 读取布尔值
    pub fn as_bool(&self, default: bool) -> bool {
        match self {
            ConfigValue::Boolean(v) => *v,
            _ => default,
        }
    }

    /// 读取字符串（借用）
    pub fn as_str(&self) -> Option<&str> {
        match self {
            ConfigValue::String(v) => Some(v.as_str()),
            _ => None,
        }
    }
}

impl fmt::Display for ConfigValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigValue::Integer(v) => write!(f, "{v}"),
            ConfigValue::Real(v) => write!(f, "{v}"),
            ConfigValue::Boolean(v) => write!(f, "{v}"),
            ConfigValue::String(v) => f.write_str(v),
        }
    }
}

impl From<i64> for ConfigValue {
    fn from(value: i64) -> Self {
        ConfigValue::Integer(value)
    }
}

impl From<f64> for ConfigValue {
    fn from(value: f64) -> Self {
        ConfigValue::Real(value)
    }
}

impl From<bool> for ConfigValue {
    fn from(value: bool) -> Self {
        ConfigValue::Boolean(value)
    }
}

impl From<&str> for ConfigValue {
    fn from(value: &str) -> Self {
        ConfigValue::String(value.to_string())
    }
}

impl From<String> for ConfigValue {
    fn from(value: String) -> Self {
        ConfigValue::String(value)
    }
}
