//! Gantry SDK - CNC 运动控制核心
//!
//! # 架构设计
//!
//! 从底层到高层：
//!
//! - **配置层** (`config`): 按条目组织的类型化配置目录
//! - **设备层** (`device`): 电机 / 仪器能力化句柄、设备管理器、软错误队列
//! - **模拟层** (`emu`): 无硬件的模拟电机、仪器和设备管理器
//! - **控制层** (`ctrl`): 单轴状态机、限位互锁、回零、事件监听
//! - **平面层** (`plane`): 坐标转换器、装饰器式坐标平面管线、圆弧分段
//!
//! # 快速开始
//!
//! ```rust,no_run
//! use gantry_sdk::prelude::*;
//!
//! gantry_sdk::init_logger();
//!
//! let manager = EmuDeviceManager::default();
//! let catalogue = ConfigurationCatalogue::new();
//! let rig = Rig::connect(&manager, &DeviceConnectionParams::default(), true, &catalogue).unwrap();
//! rig.enable_power(true).unwrap();
//!
//! let stack = rig.stack(&catalogue);
//! stack.move_to(MotorPoint::new(600, 300), 1000.0, true).unwrap();
//! ```

mod logger;
pub mod prelude;
mod rig;

pub use gantry_config as config;
pub use gantry_ctrl as ctrl;
pub use gantry_device as device;
pub use gantry_emu as emu;
pub use gantry_plane as plane;

pub use gantry_config::ConfigurationCatalogue;
pub use gantry_ctrl::{InstrumentController, MotionError, MotorController};
pub use gantry_device::{DeviceError, DeviceManager};
pub use gantry_plane::CoordHandle;
pub use logger::init_logger;
pub use rig::Rig;
