//! # Gantry Control Layer
//!
//! 在设备之上实现带互锁的状态机：
//!
//! - [`MotorController`]: 单轴运动（阻塞 / 两阶段异步）、限位互锁、回零（move to trailer）
//! - [`InstrumentController`]: 仪器会话、开关、工作模式
//! - 事件系统：每个控制器可挂多个监听器，生命周期事件广播给所有监听器
//!
//! # 取消
//!
//! `stop()` 是唯一的取消原语：非阻塞、幂等、可在任意线程调用。
//! 正在进行的阻塞操作会在下一个轮询周期内返回 [`MotionError::Stopped`]。
//! 取消作废该操作的 [`WorkToken`]，之后开始的新操作不受它影响。

mod config;
mod error;
pub mod events;
mod instrument;
mod mode;
mod motor;
mod usage;

pub use config::MotorControllerConfig;
pub use error::{MotionError, Result};
pub use events::{
    EventSource, InstrumentEventListener, MotorErrorEvent, MotorEventListener, MotorMoveEvent,
    MotorRollEvent,
};
pub use instrument::InstrumentController;
pub use mode::{AtomicMoveType, MoveType};
pub use motor::{MotorController, WorkToken};
pub use usage::UsageCounter;
