use super::{ArcDirection, CoordPlane, PlaneDecorator, ProxyCoordPlane};
use crate::types::MotorPoint;
use gantry_ctrl::Result;
use parking_lot::Mutex;

/// 轨迹记录层
///
/// 每次成功的 `move_to` 记录 `(目标点, sync)`；圆弧成功后只记录终点。
/// 用于预览渲染。
pub struct CoordPlaneTracker {
    proxy: ProxyCoordPlane,
    path: Mutex<Vec<(MotorPoint, bool)>>,
}

impl CoordPlaneTracker {
    pub fn new(base: Box<dyn CoordPlane>) -> Self {
        Self {
            proxy: ProxyCoordPlane::new(base),
            path: Mutex::new(Vec::new()),
        }
    }

    /// 当前记录的轨迹副本
    pub fn path(&self) -> Vec<(MotorPoint, bool)> {
        self.path.lock().clone()
    }

    pub fn reset(&self) {
        self.path.lock().clear();
    }
}

impl PlaneDecorator for CoordPlaneTracker {
    fn proxy(&self) -> &ProxyCoordPlane {
        &self.proxy
    }

    fn into_proxy(self: Box<Self>) -> ProxyCoordPlane {
        self.proxy
    }

    /// 新层从空轨迹开始
    fn rewrap(&self, base: Box<dyn CoordPlane>) -> Box<dyn CoordPlane> {
        Box::new(CoordPlaneTracker::new(base))
    }

    fn describe_layer(&self) -> String {
        format!("tracker ({} points)", self.path.lock().len())
    }

    fn intercept_move_to(&self, dest: MotorPoint, speed: f32, sync: bool) -> Result<()> {
        self.proxy.move_to(dest, speed, sync)?;
        self.path.lock().push((dest, sync));
        Ok(())
    }

    fn intercept_arc(
        &self,
        dest: MotorPoint,
        center: MotorPoint,
        direction: ArcDirection,
        speed: f32,
        sync: bool,
        ratio: f64,
    ) -> Result<()> {
        self.proxy
            .arc(dest, center, direction, speed, sync, ratio)?;
        self.path.lock().push((dest, sync));
        Ok(())
    }
}
