//! 基础平面：驱动 X / Y 两个电机控制器，可选一个仪器

use super::{ArcDirection, CoordPlane, StopHandle, arc_segments};
use crate::types::{MotorPoint, MotorRect};
use gantry_config::{ConfigurationCatalogue, keys};
use gantry_ctrl::{InstrumentController, MotionError, MotorController, Result, WorkToken};
use gantry_device::{Power, TrailerId};
use parking_lot::Mutex;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// 基础平面配置
#[derive(Debug, Clone, PartialEq)]
pub struct CoordControllerConfig {
    /// 圆弧弦高容差（步，默认 1.0）
    pub arc_tolerance: f64,
    /// 单个圆弧的最大分段数（默认 10000）
    pub arc_max_segments: usize,
}

impl Default for CoordControllerConfig {
    fn default() -> Self {
        Self {
            arc_tolerance: 1.0,
            arc_max_segments: 10_000,
        }
    }
}

impl CoordControllerConfig {
    pub fn from_catalogue(catalogue: &ConfigurationCatalogue) -> Self {
        let defaults = Self::default();
        Self {
            arc_tolerance: catalogue.get_real(
                keys::COORDS,
                keys::ARC_TOLERANCE,
                defaults.arc_tolerance,
            ),
            arc_max_segments: catalogue
                .get_int(
                    keys::COORDS,
                    keys::ARC_MAX_SEGMENTS,
                    defaults.arc_max_segments as i64,
                )
                .max(1) as usize,
        }
    }
}

/// 基础平面
///
/// - 构造时对两个轴（和仪器）调用 `use_resource`，Drop 时 `unuse_resource`
/// - 同步运动按位移比例分配两轴速度，使两轴同时到达；期间仪器保持打开
/// - 两轴并发启动，全部结束后才返回，报告第一个失败
pub struct CoordController {
    x: Arc<MotorController>,
    y: Arc<MotorController>,
    instrument: Option<Arc<InstrumentController>>,
    config: CoordControllerConfig,
    size: Mutex<Option<MotorRect>>,
}

impl CoordController {
    pub fn new(
        x: Arc<MotorController>,
        y: Arc<MotorController>,
        instrument: Option<Arc<InstrumentController>>,
        config: CoordControllerConfig,
    ) -> Self {
        x.use_resource();
        y.use_resource();
        if let Some(instrument) = &instrument {
            instrument.use_resource();
        }
        Self {
            x,
            y,
            instrument,
            config,
            size: Mutex::new(None),
        }
    }

    pub fn x_axis(&self) -> &Arc<MotorController> {
        &self.x
    }

    pub fn y_axis(&self) -> &Arc<MotorController> {
        &self.y
    }

    pub fn instrument(&self) -> Option<&Arc<InstrumentController>> {
        self.instrument.as_ref()
    }

    pub fn config(&self) -> &CoordControllerConfig {
        &self.config
    }

    fn check_power(&self) -> Result<()> {
        if self.x.power_state() == Power::NoPower || self.y.power_state() == Power::NoPower {
            return Err(MotionError::PowerOff);
        }
        Ok(())
    }

    /// 同步运动的每轴速度
    fn split_speed(&self, dest: MotorPoint, speed: f32, sync: bool) -> (f32, f32) {
        if !sync {
            return (speed, speed);
        }
        let dx = (dest.x - self.x.position()).abs() as f64;
        let dy = (dest.y - self.y.position()).abs() as f64;
        let length = dx.hypot(dy);
        if length == 0.0 {
            return (speed, speed);
        }
        let speed = f64::from(speed);
        ((speed * dx / length) as f32, (speed * dy / length) as f32)
    }

    /// 两轴都发出后轮询，直到都停下、限位触发或任一轴的凭证被作废
    fn wait_axes(&self, x_token: WorkToken, y_token: WorkToken) -> Result<()> {
        let poll_interval = self.x.config().poll_interval;
        loop {
            let x_moving = self.x.poll_claim(x_token)?;
            let y_moving = self.y.poll_claim(y_token)?;
            if !x_moving && !y_moving {
                return Ok(());
            }
            std::thread::sleep(poll_interval);
        }
    }

    fn set_instrument(&self, enable: bool) -> Result<()> {
        match &self.instrument {
            Some(instrument) => instrument.enable(enable),
            None => Ok(()),
        }
    }
}

impl CoordPlane for CoordController {
    fn move_to(&self, dest: MotorPoint, speed: f32, sync: bool) -> Result<()> {
        self.check_power()?;
        let (x_speed, y_speed) = self.split_speed(dest, speed, sync);

        if sync {
            self.set_instrument(true)?;
        }

        let x_token = match self.x.async_move(dest.x, x_speed, false) {
            Ok(token) => token,
            Err(e) => {
                if sync {
                    let _ = self.set_instrument(false);
                }
                return Err(e);
            },
        };
        let y_token = match self.y.async_move(dest.y, y_speed, false) {
            Ok(token) => token,
            Err(e) => {
                let _ = self
                    .x
                    .async_stop(x_token, Err(e.clone()), dest.x, x_speed, false);
                if sync {
                    let _ = self.set_instrument(false);
                }
                return Err(e);
            },
        };

        let result = self.wait_axes(x_token, y_token);
        if let Err(e) = &result {
            debug!(%dest, "Plane move interrupted: {}", e);
        }

        let x_result = self
            .x
            .async_stop(x_token, result.clone(), dest.x, x_speed, false);
        let y_result = self
            .y
            .async_stop(y_token, result.clone(), dest.y, y_speed, false);
        let instrument_result = if sync {
            self.set_instrument(false)
        } else {
            Ok(())
        };

        result.and(x_result).and(y_result).and(instrument_result)
    }

    fn arc(
        &self,
        dest: MotorPoint,
        center: MotorPoint,
        direction: ArcDirection,
        speed: f32,
        sync: bool,
        ratio: f64,
    ) -> Result<()> {
        let points = arc_segments(
            self.position(),
            dest,
            center,
            direction,
            ratio,
            self.config.arc_tolerance,
            self.config.arc_max_segments,
        )?;
        debug!(%dest, %center, ?direction, segments = points.len(), "Arc started");
        for point in points {
            self.move_to(point, speed, sync)?;
        }
        Ok(())
    }

    fn calibrate(&self, trailer: TrailerId) -> Result<()> {
        self.check_power()?;
        if self.x.is_working() || self.y.is_working() {
            return Err(MotionError::MotorRunning);
        }

        info!(%trailer, "Calibrating plane");
        let (x_result, y_result) = std::thread::scope(|s| {
            let x_roll = s.spawn(|| self.x.move_to_trailer(trailer));
            let y_result = self.y.move_to_trailer(trailer);
            let x_result = x_roll
                .join()
                .unwrap_or_else(|panic| std::panic::resume_unwind(panic));
            (x_result, y_result)
        });

        if let Err(e) = &x_result {
            warn!(axis = "x", %trailer, "Calibration failed: {}", e);
        }
        if let Err(e) = &y_result {
            warn!(axis = "y", %trailer, "Calibration failed: {}", e);
        }
        x_result.and(y_result)
    }

    fn measure(&self, trailer: TrailerId) -> Result<()> {
        self.calibrate(trailer.opposite())?;
        let far = self.position();
        self.calibrate(trailer)?;
        let near = self.position();

        let rect = MotorRect::from_corners(near, far);
        info!(?rect, "Plane measured");
        *self.size.lock() = Some(rect);
        Ok(())
    }

    fn position(&self) -> MotorPoint {
        MotorPoint::new(self.x.position(), self.y.position())
    }

    fn size(&self) -> Result<MotorRect> {
        (*self.size.lock()).ok_or(MotionError::Unmeasured)
    }

    fn is_measured(&self) -> bool {
        self.size.lock().is_some()
    }

    fn stop(&self) {
        self.x.stop();
        self.y.stop();
    }

    fn stop_handle(&self) -> StopHandle {
        let x = self.x.clone();
        let y = self.y.clone();
        StopHandle::new(move || {
            x.stop();
            y.stop();
        })
    }

    fn base(&self) -> Option<&dyn CoordPlane> {
        None
    }

    fn into_base(
        self: Box<Self>,
    ) -> std::result::Result<Box<dyn CoordPlane>, Box<dyn CoordPlane>> {
        Err(self)
    }

    fn clone_plane(&self, base: Box<dyn CoordPlane>) -> Box<dyn CoordPlane> {
        base
    }

    fn describe(&self) -> String {
        format!(
            "coord controller (x: motor #{}, y: motor #{}, instrument: {})",
            self.x.id(),
            self.y.id(),
            self.instrument
                .as_ref()
                .map_or_else(|| "none".to_string(), |i| format!("#{}", i.id()))
        )
    }
}

impl Drop for CoordController {
    fn drop(&mut self) {
        self.x.unuse_resource();
        self.y.unuse_resource();
        if let Some(instrument) = &self.instrument {
            instrument.unuse_resource();
        }
    }
}
