//! 运动层错误类型定义

use gantry_device::{DeviceError, TrailerId};
use thiserror::Error;

/// 运动层错误类型
///
/// 所有错误都不是致命的：控制器在返回任何错误后都回到空闲状态并保持可用。
#[derive(Error, Debug, Clone)]
pub enum MotionError {
    /// 控制器已有进行中的操作，或设备仍在运动
    #[error("Motor is running")]
    MotorRunning,

    /// 设备未上电
    #[error("Motor power is off")]
    PowerOff,

    /// 负方向限位触发
    #[error("Trailer #1 pressed")]
    Trailer1Pressed,

    /// 正方向限位触发
    #[error("Trailer #2 pressed")]
    Trailer2Pressed,

    /// 设备拒绝操作
    #[error("Low level error: {0}")]
    LowLevel(#[from] DeviceError),

    /// 目标点超出允许范围
    #[error("Invalid coordinates: ({x}, {y})")]
    InvalidCoordinates { x: i64, y: i64 },

    /// 速度超出允许范围
    #[error("Invalid speed: {speed} (allowed 0..={max})")]
    InvalidSpeed { speed: f32, max: f32 },

    /// 参数错误
    #[error("Wrong parameter: {0}")]
    WrongParameter(String),

    /// 圆弧几何错误（零半径、半径不一致、分段过多）
    #[error("Arc error: {0}")]
    ArcError(String),

    /// 操作被 `stop()` 取消
    #[error("Operation stopped")]
    Stopped,

    /// 平面尚未测量，尺寸未知
    #[error("Plane is not measured")]
    Unmeasured,
}

impl MotionError {
    /// 对应限位的触发错误
    pub fn trailer_pressed(trailer: TrailerId) -> Self {
        match trailer {
            TrailerId::Trailer1 => MotionError::Trailer1Pressed,
            TrailerId::Trailer2 => MotionError::Trailer2Pressed,
        }
    }

    /// 是否为限位互锁
    pub fn is_interlock(&self) -> bool {
        matches!(
            self,
            MotionError::Trailer1Pressed | MotionError::Trailer2Pressed
        )
    }

    /// 是否为前置条件拒绝（没有产生任何运动）
    pub fn is_refusal(&self) -> bool {
        matches!(self, MotionError::MotorRunning | MotionError::PowerOff)
    }
}

/// 运动层结果类型
pub type Result<T> = std::result::Result<T, MotionError>;
