//! 模拟设备管理器

use crate::config::EmuConfig;
use crate::instrument::EmuInstrument;
use crate::motor::EmuMotor;
use gantry_config::ConfigurationCatalogue;
use gantry_device::{
    DeviceConnectionParams, DeviceConnectionType, DeviceError, DeviceManager, DeviceRegistry,
    Instrument, Motor, Result,
};
use parking_lot::Mutex;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, info};

/// 模拟设备管理器
///
/// 每次 `connect_*` 创建一个新的模拟设备并登记到注册表，ID 按连接顺序递增。
/// `terminate()` 之后不再接受新的连接。
pub struct EmuDeviceManager {
    registry: DeviceRegistry,
    config: EmuConfig,
    catalogue: ConfigurationCatalogue,
    terminated: AtomicBool,
    /// 串行化连接过程，保证 ID 与注册顺序一致
    connect_lock: Mutex<()>,
}

impl EmuDeviceManager {
    pub fn new(config: EmuConfig) -> Self {
        Self::with_catalogue(config, ConfigurationCatalogue::new())
    }

    /// 使用配置目录：`[emu]` 覆盖传入的电机参数，目录本身附加到每个新设备上
    pub fn with_catalogue(config: EmuConfig, catalogue: ConfigurationCatalogue) -> Self {
        let config = EmuConfig {
            motor_size: catalogue.get_int(
                gantry_config::keys::EMU,
                gantry_config::keys::MOTOR_SIZE,
                config.motor_size,
            ),
            ..config
        };
        Self {
            registry: DeviceRegistry::new(),
            config,
            catalogue,
            terminated: AtomicBool::new(false),
            connect_lock: Mutex::new(()),
        }
    }

    pub fn emu_config(&self) -> &EmuConfig {
        &self.config
    }

    fn check_terminated(&self) -> Result<()> {
        if self.terminated.load(Ordering::Acquire) {
            return Err(DeviceError::Terminated);
        }
        Ok(())
    }

    fn check_params(&self, params: &DeviceConnectionParams) -> Result<()> {
        match params.connection_type() {
            DeviceConnectionType::SerialPort => Ok(()),
        }
    }
}

impl Default for EmuDeviceManager {
    fn default() -> Self {
        Self::new(EmuConfig::default())
    }
}

impl DeviceManager for EmuDeviceManager {
    fn registry(&self) -> &DeviceRegistry {
        &self.registry
    }

    fn refresh(&self) {
        debug!(
            motors = self.registry.motor_count(),
            instruments = self.registry.instrument_count(),
            "Emu device manager refresh: nothing to enumerate"
        );
    }

    fn motor_connection_types(&self) -> Vec<DeviceConnectionType> {
        vec![DeviceConnectionType::SerialPort]
    }

    fn instrument_connection_types(&self) -> Vec<DeviceConnectionType> {
        vec![DeviceConnectionType::SerialPort]
    }

    fn connect_motor(&self, params: &DeviceConnectionParams) -> Result<Arc<dyn Motor>> {
        self.check_terminated()?;
        self.check_params(params)?;

        let _guard = self.connect_lock.lock();
        let id = self.registry.motor_count();
        let motor = EmuMotor::with_catalogue(id, self.config.clone(), self.catalogue.clone())
            .map_err(|e| {
                let message = format!("failed to spawn emulator clock for motor #{id}: {e}");
                self.registry.errors().push(message.clone());
                DeviceError::ConnectionFailed(message)
            })?;

        let motor: Arc<dyn Motor> = Arc::new(motor);
        self.registry.add_motor(motor.clone());
        info!(device = id, %params, "Emu motor connected");
        Ok(motor)
    }

    fn connect_instrument(&self, params: &DeviceConnectionParams) -> Result<Arc<dyn Instrument>> {
        self.check_terminated()?;
        self.check_params(params)?;

        let _guard = self.connect_lock.lock();
        let id = self.registry.instrument_count();
        let instrument: Arc<dyn Instrument> =
            Arc::new(EmuInstrument::with_catalogue(id, self.catalogue.clone()));
        self.registry.add_instrument(instrument.clone());
        info!(device = id, %params, "Emu instrument connected");
        Ok(instrument)
    }

    fn terminate(&self) {
        self.terminated.store(true, Ordering::Release);
        self.registry.terminate_all();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gantry_device::{Device, SerialPortParams};

    fn serial() -> DeviceConnectionParams {
        DeviceConnectionParams::SerialPort(SerialPortParams::default())
    }

    #[test]
    fn test_connect_assigns_sequential_ids() {
        let manager = EmuDeviceManager::default();
        let x = manager.connect_motor(&serial()).unwrap();
        let y = manager.connect_motor(&serial()).unwrap();
        let tool = manager.connect_instrument(&serial()).unwrap();

        assert_eq!(x.id(), 0);
        assert_eq!(y.id(), 1);
        assert_eq!(tool.id(), 0);
        assert_eq!(manager.motor_count(), 2);
        assert_eq!(manager.instrument_count(), 1);
        assert_eq!(manager.motor(1).unwrap().id(), 1);
        assert!(manager.motor(5).is_none());
    }

    #[test]
    fn test_capabilities() {
        let manager = EmuDeviceManager::default();
        assert!(manager.can_motor_connect());
        assert!(manager.can_instrument_connect());
        manager.refresh();
        assert!(!manager.has_errors());
        assert_eq!(manager.poll_error(), None);
    }

    #[test]
    fn test_catalogue_overrides_motor_size() {
        let catalogue =
            ConfigurationCatalogue::from_toml_str("[emu]\nmotor_size = 2000\n").unwrap();
        let manager = EmuDeviceManager::with_catalogue(EmuConfig::default(), catalogue);
        assert_eq!(manager.emu_config().motor_size, 2000);

        let motor = manager.connect_motor(&serial()).unwrap();
        assert_eq!(motor.config().get_int("emu", "motor_size", 0), 2000);
    }

    #[test]
    fn test_terminate_stops_devices_and_refuses_connections() {
        let manager = EmuDeviceManager::default();
        let motor = manager.connect_motor(&serial()).unwrap();
        motor.enable_power(true).unwrap();
        motor.start(100_000, 10.0).unwrap();

        manager.terminate();
        assert!(!motor.is_running());
        assert!(matches!(
            manager.connect_motor(&serial()),
            Err(DeviceError::Terminated)
        ));
    }
}
