//! 两轴机台：从设备管理器连接设备并组装控制器与平面

use gantry_config::ConfigurationCatalogue;
use gantry_ctrl::{InstrumentController, MotorController, MotorControllerConfig, Result};
use gantry_device::{Device, DeviceConnectionParams, DeviceManager};
use gantry_plane::plane::{
    CoordController, CoordControllerConfig, CoordPlaneLog, CoordPlaneStack, CoordPlaneValidator,
};
use gantry_plane::translator::CoordTranslator;
use gantry_plane::CoordHandle;
use std::sync::Arc;
use tracing::info;

/// X / Y 两个电机控制器和可选的仪器控制器
///
/// 控制器以 `Arc` 共享，可以同时被多个平面使用（使用计数由平面维护）。
pub struct Rig {
    x: Arc<MotorController>,
    y: Arc<MotorController>,
    instrument: Option<Arc<InstrumentController>>,
}

impl Rig {
    /// 连接两个电机（先 X 后 Y）和可选的一个仪器
    ///
    /// 电机控制器参数从 `catalogue` 的 `[core]` 条目读取。
    pub fn connect(
        manager: &dyn DeviceManager,
        params: &DeviceConnectionParams,
        with_instrument: bool,
        catalogue: &ConfigurationCatalogue,
    ) -> Result<Self> {
        let config = MotorControllerConfig::from_catalogue(catalogue);
        let x = manager.connect_motor(params)?;
        let y = manager.connect_motor(params)?;
        let instrument = if with_instrument {
            Some(Arc::new(InstrumentController::new(
                manager.connect_instrument(params)?,
            )))
        } else {
            None
        };

        info!(
            x = x.id(),
            y = y.id(),
            instrument = instrument.as_ref().map(|i| i.id()),
            %params,
            "Rig connected"
        );
        Ok(Self::from_controllers(
            Arc::new(MotorController::new(x, config.clone())),
            Arc::new(MotorController::new(y, config)),
            instrument,
        ))
    }

    pub fn from_controllers(
        x: Arc<MotorController>,
        y: Arc<MotorController>,
        instrument: Option<Arc<InstrumentController>>,
    ) -> Self {
        Self { x, y, instrument }
    }

    pub fn x(&self) -> &Arc<MotorController> {
        &self.x
    }

    pub fn y(&self) -> &Arc<MotorController> {
        &self.y
    }

    pub fn instrument(&self) -> Option<&Arc<InstrumentController>> {
        self.instrument.as_ref()
    }

    /// 两轴同时上电 / 断电
    pub fn enable_power(&self, enable: bool) -> Result<()> {
        self.x.enable_power(enable)?;
        self.y.enable_power(enable)
    }

    /// 基础平面
    pub fn coord_controller(&self, catalogue: &ConfigurationCatalogue) -> CoordController {
        CoordController::new(
            self.x.clone(),
            self.y.clone(),
            self.instrument.clone(),
            CoordControllerConfig::from_catalogue(catalogue),
        )
    }

    /// 常用平面栈：基础平面 -> 验证层（`[coords]` 边界）-> 日志层
    pub fn stack(&self, catalogue: &ConfigurationCatalogue) -> CoordPlaneStack {
        let mut stack = CoordPlaneStack::new(Box::new(self.coord_controller(catalogue)));
        stack.push(|base| Box::new(CoordPlaneValidator::from_catalogue(base, catalogue)));
        stack.push(|base| Box::new(CoordPlaneLog::new(base, "rig")));
        stack
    }

    pub fn handle(
        &self,
        id: usize,
        catalogue: &ConfigurationCatalogue,
        translator: Box<dyn CoordTranslator>,
    ) -> CoordHandle {
        CoordHandle::new(id, self.stack(catalogue), translator)
    }
}
