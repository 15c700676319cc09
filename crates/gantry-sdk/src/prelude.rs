//! Prelude - 常用类型的便捷导入
//!
//! ```rust
//! use gantry_sdk::prelude::*;
//! ```

pub use crate::rig::Rig;

// 配置
pub use gantry_config::{ConfigValue, ConfigurationCatalogue};

// 设备层
pub use gantry_device::{
    DeviceConnectionParams, DeviceError, DeviceManager, Instrument, InstrumentMode, Motor, Power,
    SerialPortParams, TrailerId,
};

// 模拟后端
pub use gantry_emu::{EmuConfig, EmuDeviceManager};

// 控制层
pub use gantry_ctrl::{
    InstrumentController, InstrumentEventListener, MotionError, MotorController,
    MotorControllerConfig, MotorEventListener, MoveType, WorkToken,
};

// 平面层
pub use gantry_plane::plane::{
    ArcDirection, CoordController, CoordPlane, CoordPlaneLog, CoordPlaneStack,
    CoordPlaneTracker, CoordPlaneValidator, PlaneDecorator, ProxyCoordPlane, StopHandle,
    VirtualCoordPlane,
};
pub use gantry_plane::translator::{
    BasicCoordTranslator, ComplexCoordTranslator, CoordTranslator, LinearCoordTranslator,
};
pub use gantry_plane::{CoordHandle, CoordPoint, CoordScale, MotorPoint, MotorRect};
