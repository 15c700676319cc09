//! # Gantry Emulator
//!
//! 无硬件的模拟后端，用于在没有真实设备时验证控制循环。
//!
//! - [`EmuMotor`]: 每轴一个后台时钟线程，按固定频率（默认 100 Hz）推进位置
//! - [`EmuInstrument`]: 需要会话的仪器，命令记录到 channel 便于检查
//! - [`EmuDeviceManager`]: 按需创建上述设备的设备管理器
//!
//! # 使用示例
//!
//! ```rust,no_run
//! use gantry_device::{DeviceConnectionParams, DeviceManager, SerialPortParams};
//! use gantry_emu::{EmuConfig, EmuDeviceManager};
//!
//! let manager = EmuDeviceManager::new(EmuConfig::default());
//! let params = DeviceConnectionParams::SerialPort(SerialPortParams::default());
//! let motor = manager.connect_motor(&params).unwrap();
//!
//! motor.enable_power(true).unwrap();
//! motor.start(600, 100.0).unwrap();
//! ```

mod config;
mod instrument;
mod manager;
mod motor;

pub use config::EmuConfig;
pub use instrument::{EmuInstrument, InstrumentCommand};
pub use manager::EmuDeviceManager;
pub use motor::EmuMotor;
