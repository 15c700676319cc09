//! # Gantry Device Layer
//!
//! 设备抽象层：电机（轴）和仪器（辅助工具）的能力化句柄，以及负责设备生命周期的设备管理器。
//!
//! 设备本身不包含任何控制逻辑，只暴露原始操作（启动、停止、上电、会话）和一个
//! 按 FIFO 顺序消费的软错误队列。状态机、互锁和事件由上层的控制器负责。

mod device_core;
mod device;
mod error;
mod manager;
mod types;

pub use device_core::{DeviceCore, ErrorQueue};
pub use device::{Device, Instrument, Motor};
pub use error::{DeviceError, DeviceErrorKind};
pub use manager::{DeviceManager, DeviceRegistry};
pub use types::{
    DeviceConnectionParams, DeviceConnectionType, DeviceId, DeviceKind, InstrumentMode, Power,
    SerialPortParams, SerialPortParity, TrailerId,
};

/// 设备层结果类型
pub type Result<T> = std::result::Result<T, DeviceError>;
