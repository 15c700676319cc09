//! 模拟后端配置

use gantry_config::{ConfigurationCatalogue, keys};

/// 模拟后端配置
#[derive(Debug, Clone, PartialEq)]
pub struct EmuConfig {
    /// 行程总长（步），限位位于 `±motor_size / 2`
    pub motor_size: i64,
    /// 时钟频率（Hz）
    pub tick_hz: u32,
    /// 速度放大系数：`speed * speed_factor` 为实际步/秒
    pub speed_factor: f32,
    /// 放大后的速度上限（步/秒）
    pub max_speed: f32,
}

impl Default for EmuConfig {
    fn default() -> Self {
        Self {
            motor_size: 300_000,
            tick_hz: 100,
            speed_factor: 10.0,
            max_speed: 4000.0 * 10.0,
        }
    }
}

impl EmuConfig {
    /// 从配置目录的 `[emu]` 条目读取，缺失项使用默认值
    pub fn from_catalogue(catalogue: &ConfigurationCatalogue) -> Self {
        let defaults = Self::default();
        Self {
            motor_size: catalogue.get_int(keys::EMU, keys::MOTOR_SIZE, defaults.motor_size),
            tick_hz: catalogue
                .get_int(keys::EMU, keys::TICK_HZ, defaults.tick_hz as i64)
                .clamp(1, 10_000) as u32,
            ..defaults
        }
    }

    pub fn with_motor_size(mut self, motor_size: i64) -> Self {
        self.motor_size = motor_size;
        self
    }

    pub fn with_tick_hz(mut self, tick_hz: u32) -> Self {
        self.tick_hz = tick_hz.max(1);
        self
    }

    /// 一个时钟周期内的最大步数
    ///
    /// `ceil(min(speed * speed_factor, max_speed) / tick_hz)`，至少为 1，
    /// 速度为零的运动也会以最低速度完成。
    pub fn step_per_tick(&self, speed: f32) -> i64 {
        let steps_per_sec = (speed.max(0.0) * self.speed_factor).min(self.max_speed);
        ((steps_per_sec / self.tick_hz as f32).ceil() as i64).max(1)
    }
}
