use super::{ArcDirection, CoordControllerConfig, CoordPlane, StopHandle, arc_segments};
use crate::types::{MotorPoint, MotorRect};
use gantry_ctrl::{MotionError, Result};
use gantry_device::TrailerId;
use parking_lot::Mutex;
use tracing::trace;

/// 仅用于模拟的终端平面
///
/// 运动瞬间完成；目标点超出 `rect` 时返回对应方向的限位错误且位置不变。
/// 尺寸已知，因此始终视为已测量。通常作为预览栈的底层。
pub struct VirtualCoordPlane {
    rect: MotorRect,
    position: Mutex<MotorPoint>,
    config: CoordControllerConfig,
}

impl VirtualCoordPlane {
    /// 起点为原点；原点不在 `rect` 内时为 `rect` 的最小角
    pub fn new(rect: MotorRect) -> Self {
        let origin = MotorPoint::default();
        let start = if rect.contains(origin) {
            origin
        } else {
            rect.min()
        };
        Self::with_position(rect, start)
    }

    pub fn with_position(rect: MotorRect, position: MotorPoint) -> Self {
        Self {
            rect,
            position: Mutex::new(position),
            config: CoordControllerConfig::default(),
        }
    }

    pub fn with_config(mut self, config: CoordControllerConfig) -> Self {
        self.config = config;
        self
    }

    pub fn rect(&self) -> MotorRect {
        self.rect
    }

    fn jump(&self, dest: MotorPoint) -> Result<()> {
        if !self.rect.contains(dest) {
            let trailer = if dest.x < self.rect.x || dest.y < self.rect.y {
                TrailerId::Trailer1
            } else {
                TrailerId::Trailer2
            };
            return Err(MotionError::trailer_pressed(trailer));
        }
        trace!(%dest, "Virtual plane jump");
        *self.position.lock() = dest;
        Ok(())
    }
}

impl CoordPlane for VirtualCoordPlane {
    fn move_to(&self, dest: MotorPoint, _speed: f32, _sync: bool) -> Result<()> {
        self.jump(dest)
    }

    fn arc(
        &self,
        dest: MotorPoint,
        center: MotorPoint,
        direction: ArcDirection,
        _speed: f32,
        _sync: bool,
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
        points.into_iter().try_for_each(|point| self.jump(point))
    }

    fn calibrate(&self, trailer: TrailerId) -> Result<()> {
        let corner = match trailer {
            TrailerId::Trailer1 => self.rect.min(),
            TrailerId::Trailer2 => self.rect.max(),
        };
        self.jump(corner)
    }

    fn measure(&self, trailer: TrailerId) -> Result<()> {
        self.calibrate(trailer.opposite())?;
        self.calibrate(trailer)
    }

    fn position(&self) -> MotorPoint {
        *self.position.lock()
    }

    fn size(&self) -> Result<MotorRect> {
        Ok(self.rect)
    }

    fn is_measured(&self) -> bool {
        true
    }

    fn stop(&self) {}

    fn stop_handle(&self) -> StopHandle {
        StopHandle::noop()
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
            "virtual plane (rect: {}..{})",
            self.rect.min(),
            self.rect.max()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_out_of_range_reports_trailer() {
        let plane = VirtualCoordPlane::new(MotorRect::new(-10, -10, 20, 20));
        assert!(matches!(
            plane.move_to(MotorPoint::new(-11, 0), 1.0, false),
            Err(MotionError::Trailer1Pressed)
        ));
        assert!(matches!(
            plane.move_to(MotorPoint::new(0, 11), 1.0, false),
            Err(MotionError::Trailer2Pressed)
        ));
        assert_eq!(plane.position(), MotorPoint::new(0, 0));
    }

    #[test]
    fn test_start_outside_origin() {
        let plane = VirtualCoordPlane::new(MotorRect::new(100, 100, 10, 10));
        assert_eq!(plane.position(), MotorPoint::new(100, 100));
    }

    #[test]
    fn test_calibrate_and_measure() {
        let plane = VirtualCoordPlane::new(MotorRect::new(-10, -20, 20, 40));
        plane.calibrate(TrailerId::Trailer2).unwrap();
        assert_eq!(plane.position(), MotorPoint::new(10, 20));
        plane.measure(TrailerId::Trailer1).unwrap();
        assert_eq!(plane.position(), MotorPoint::new(-10, -20));
        assert!(plane.is_measured());
        assert_eq!(plane.size().unwrap(), MotorRect::new(-10, -20, 20, 40));
    }

    #[test]
    fn test_arc_ends_at_destination() {
        let plane = VirtualCoordPlane::new(MotorRect::new(-2000, -2000, 4000, 4000));
        plane.move_to(MotorPoint::new(1000, 0), 1.0, true).unwrap();
        plane
            .arc(
                MotorPoint::new(-1000, 0),
                MotorPoint::new(0, 0),
                ArcDirection::CounterClockwise,
                1.0,
                true,
                1.0,
            )
            .unwrap();
        assert_eq!(plane.position(), MotorPoint::new(-1000, 0));
    }
}
