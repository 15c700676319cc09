//! 设备管理器：枚举、连接、销毁设备

use crate::Result;
use crate::device::{Instrument, Motor};
use crate::device_core::ErrorQueue;
use crate::types::{DeviceConnectionParams, DeviceConnectionType, DeviceId};
use parking_lot::RwLock;
use std::sync::Arc;
use tracing::{debug, info};

/// 设备管理器接口
///
/// 管理器拥有设备：设备在管理器的注册表中存活，调用方拿到的是共享句柄。
/// 连接失败等硬错误作为返回值；枚举过程中的软异常写入管理器的错误队列。
pub trait DeviceManager: Send + Sync {
    /// 注册表（设备列表与管理器错误队列）
    fn registry(&self) -> &DeviceRegistry;

    /// 重新枚举设备
    fn refresh(&self);

    /// 电机支持的连接方式
    fn motor_connection_types(&self) -> Vec<DeviceConnectionType>;

    /// 仪器支持的连接方式
    fn instrument_connection_types(&self) -> Vec<DeviceConnectionType>;

    fn connect_motor(&self, params: &DeviceConnectionParams) -> Result<Arc<dyn Motor>>;

    fn connect_instrument(&self, params: &DeviceConnectionParams) -> Result<Arc<dyn Instrument>>;

    /// 两类设备各自支持的连接方式
    fn connection_types(&self) -> (Vec<DeviceConnectionType>, Vec<DeviceConnectionType>) {
        (
            self.motor_connection_types(),
            self.instrument_connection_types(),
        )
    }

    fn can_motor_connect(&self) -> bool {
        !self.motor_connection_types().is_empty()
    }

    fn can_instrument_connect(&self) -> bool {
        !self.instrument_connection_types().is_empty()
    }

    fn motor(&self, id: DeviceId) -> Option<Arc<dyn Motor>> {
        self.registry().motor(id)
    }

    fn instrument(&self, id: DeviceId) -> Option<Arc<dyn Instrument>> {
        self.registry().instrument(id)
    }

    fn motor_count(&self) -> usize {
        self.registry().motor_count()
    }

    fn instrument_count(&self) -> usize {
        self.registry().instrument_count()
    }

    fn has_errors(&self) -> bool {
        self.registry().errors().has_errors()
    }

    fn poll_error(&self) -> Option<String> {
        self.registry().errors().poll()
    }

    /// 紧急停机：所有设备立即进入安全停止
    fn terminate(&self) {
        self.registry().terminate_all();
    }
}

/// 设备注册表
///
/// 按连接顺序保存设备；设备 ID 由后端分配，查找按 ID 匹配。
#[derive(Default)]
pub struct DeviceRegistry {
    motors: RwLock<Vec<Arc<dyn Motor>>>,
    instruments: RwLock<Vec<Arc<dyn Instrument>>>,
    errors: ErrorQueue,
}

impl DeviceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_motor(&self, motor: Arc<dyn Motor>) {
        debug!(device = motor.id(), "Motor registered");
        self.motors.write().push(motor);
    }

    pub fn add_instrument(&self, instrument: Arc<dyn Instrument>) {
        debug!(device = instrument.id(), "Instrument registered");
        self.instruments.write().push(instrument);
    }

    pub fn motor(&self, id: DeviceId) -> Option<Arc<dyn Motor>> {
        self.motors.read().iter().find(|m| m.id() == id).cloned()
    }

    pub fn instrument(&self, id: DeviceId) -> Option<Arc<dyn Instrument>> {
        self.instruments
            .read()
            .iter()
            .find(|i| i.id() == id)
            .cloned()
    }

    pub fn motor_count(&self) -> usize {
        self.motors.read().len()
    }

    pub fn instrument_count(&self) -> usize {
        self.instruments.read().len()
    }

    pub fn motors(&self) -> Vec<Arc<dyn Motor>> {
        self.motors.read().clone()
    }

    pub fn instruments(&self) -> Vec<Arc<dyn Instrument>> {
        self.instruments.read().clone()
    }

    pub fn errors(&self) -> &ErrorQueue {
        &self.errors
    }

    pub fn terminate_all(&self) {
        info!(
            motors = self.motor_count(),
            instruments = self.instrument_count(),
            "Terminating all devices"
        );
        for motor in self.motors.read().iter() {
            motor.terminate();
        }
        for instrument in self.instruments.read().iter() {
            instrument.terminate();
        }
    }
}
