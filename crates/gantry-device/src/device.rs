//! 设备 Trait：电机与仪器的原始操作

use crate::Result;
use crate::device_core::DeviceCore;
use crate::types::{DeviceId, DeviceKind, InstrumentMode, Power, TrailerId};
use gantry_config::ConfigurationCatalogue;
use parking_lot::RwLockReadGuard;

/// 所有设备的公共接口
///
/// 句柄由设备管理器持有并以 `Arc` 共享；控制器持有的句柄不决定设备寿命。
pub trait Device: Send + Sync {
    /// 公共状态（标识、错误队列、配置）
    fn core(&self) -> &DeviceCore;

    /// 设备信息（型号、序列号等），后端自由格式
    fn device_info(&self) -> String;

    /// 运行时信息（温度、电流等），后端自由格式
    fn runtime_info(&self) -> String {
        String::new()
    }

    /// 立即进入安全停止状态，之后的运动操作都应被拒绝或忽略
    fn terminate(&self);

    fn id(&self) -> DeviceId {
        self.core().id()
    }

    fn kind(&self) -> DeviceKind {
        self.core().kind()
    }

    fn has_errors(&self) -> bool {
        self.core().errors().has_errors()
    }

    /// 按 FIFO 顺序取出一条软错误
    fn poll_error(&self) -> Option<String> {
        self.core().errors().poll()
    }

    fn config(&self) -> RwLockReadGuard<'_, ConfigurationCatalogue> {
        self.core().config()
    }
}

/// 电机（单轴直线运动设备）
///
/// 所有状态（位置、供电、运行、限位）只由后端修改，控制器只读。
pub trait Motor: Device {
    /// 当前位置（步）
    fn position(&self) -> i64;

    fn is_trailer_pressed(&self, trailer: TrailerId) -> bool;

    fn is_running(&self) -> bool;

    fn power_state(&self) -> Power;

    fn enable_power(&self, enable: bool) -> Result<()>;

    /// 以 `speed`（步/秒）向 `dest` 启动运动，立即返回
    fn start(&self, dest: i64, speed: f32) -> Result<()>;

    fn stop(&self) -> Result<()>;
}

/// 仪器（辅助工具，例如激光器）
pub trait Instrument: Device {
    fn open_session(&self) -> Result<()>;

    fn close_session(&self) -> Result<()>;

    fn is_session_opened(&self) -> bool;

    /// 开关仪器；会话未打开时由设备按自身策略拒绝
    fn enable(&self, enable: bool) -> Result<()>;

    fn enabled(&self) -> bool;

    fn working_mode(&self) -> InstrumentMode;

    fn set_working_mode(&self, mode: InstrumentMode) -> Result<()>;
}
