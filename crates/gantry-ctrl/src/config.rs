//! 电机控制器配置

use gantry_config::{ConfigurationCatalogue, keys};
use std::time::Duration;

/// 电机控制器配置
///
/// 通过 [`from_catalogue`](Self::from_catalogue) 从配置目录的 `[core]` 条目读取，
/// 缺失项使用默认值。
#[derive(Debug, Clone, PartialEq)]
pub struct MotorControllerConfig {
    /// 回零时每次翻滚的步长（默认 30000）
    pub roll_step: i64,
    /// 回零速度（默认 4000）
    pub roll_speed: f32,
    /// 到达限位后的回退量（默认 800）
    pub trailer_comeback: i64,
    /// 等待循环的轮询间隔（默认 200µs）
    pub poll_interval: Duration,
}

impl Default for MotorControllerConfig {
    fn default() -> Self {
        Self {
            roll_step: 30_000,
            roll_speed: 4000.0,
            trailer_comeback: 800,
            poll_interval: Duration::from_micros(200),
        }
    }
}

impl MotorControllerConfig {
    pub fn from_catalogue(catalogue: &ConfigurationCatalogue) -> Self {
        let defaults = Self::default();
        Self {
            roll_step: catalogue.get_int(keys::CORE, keys::ROLL_STEP, defaults.roll_step),
            roll_speed: catalogue.get_real(keys::CORE, keys::ROLL_SPEED, defaults.roll_speed as f64)
                as f32,
            trailer_comeback: catalogue.get_int(
                keys::CORE,
                keys::TRAILER_COMEBACK,
                defaults.trailer_comeback,
            ),
            poll_interval: Duration::from_micros(
                catalogue
                    .get_int(
                        keys::CORE,
                        keys::POLL_INTERVAL_US,
                        defaults.poll_interval.as_micros() as i64,
                    )
                    .max(1) as u64,
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = MotorControllerConfig::from_catalogue(&ConfigurationCatalogue::new());
        assert_eq!(config, MotorControllerConfig::default());
        assert_eq!(config.roll_step, 30_000);
        assert_eq!(config.roll_speed, 4000.0);
        assert_eq!(config.trailer_comeback, 800);
        assert_eq!(config.poll_interval, Duration::from_micros(200));
    }

    #[test]
    fn test_overrides() {
        let catalogue = ConfigurationCatalogue::from_toml_str(
            r#"
            [core]
            roll_step = 500
            roll_speed = 120
            trailer_comeback = 25
            poll_interval_us = -3
            "#,
        )
        .unwrap();
        let config = MotorControllerConfig::from_catalogue(&catalogue);
        assert_eq!(config.roll_step, 500);
        assert_eq!(config.roll_speed, 120.0);
        assert_eq!(config.trailer_comeback, 25);
        assert_eq!(config.poll_interval, Duration::from_micros(1));
    }
}
