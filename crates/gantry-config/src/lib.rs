//! # Gantry Config - 配置目录
//!
//! 运动控制核心使用的配置字典。配置以"条目（entry）→ 键 → 值"的两级结构组织，
//! 所有读取都带有类型化的默认值回退，因此控制器在缺少配置时也能以文档化的默认值工作。
//!
//! ## 包含模块
//!
//! - `value` - 配置值（整数 / 实数 / 布尔 / 字符串）
//! - `catalogue` - 配置条目与配置目录
//! - `keys` - 核心模块使用的条目名和键名
//!
//! ## 使用示例
//!
//! ```rust
//! use gantry_config::{ConfigurationCatalogue, keys};
//!
//! let catalogue = ConfigurationCatalogue::from_toml_str(
//!     r#"
//!     [core]
//!     roll_step = 1000
//!     "#,
//! )
//! .unwrap();
//!
//! assert_eq!(catalogue.get_int(keys::CORE, keys::ROLL_STEP, 30000), 1000);
//! assert_eq!(catalogue.get_int(keys::CORE, keys::ROLL_SPEED, 4000), 4000);
//! ```
//!
//! ⚠️ 这里没有全局单例：配置目录由调用方构造，并显式传入各个控制器的构造函数。

mod catalogue;
pub mod keys;
mod value;

pub use catalogue::{ConfigEntry, ConfigError, ConfigurationCatalogue};
pub use value::{ConfigValue, ConfigValueType};
