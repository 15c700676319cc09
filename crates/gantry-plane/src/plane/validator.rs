use super::{ArcDirection, CoordPlane, PlaneDecorator, ProxyCoordPlane};
use crate::types::MotorPoint;
use gantry_config::{ConfigurationCatalogue, keys};
use gantry_ctrl::{MotionError, Result};
use parking_lot::RwLock;
use tracing::debug;

const DEFAULT_BOUND: i64 = 150_000;
const DEFAULT_MAX_SPEED: f32 = 4000.0;

#[derive(Debug, Clone, Copy)]
struct Bounds {
    min: MotorPoint,
    max: MotorPoint,
    max_speed: f32,
}

/// 边界与速度验证层
///
/// `move_to` / `arc` 的目标点（以及圆心）必须落在闭区间 `[min, max]` 内，
/// 速度必须在 `[0, max_speed]` 内；否则直接返回 `InvalidCoordinates` /
/// `InvalidSpeed`，不会调用被包装的平面。边界可以在运行时修改。
pub struct CoordPlaneValidator {
    proxy: ProxyCoordPlane,
    bounds: RwLock<Bounds>,
}

impl CoordPlaneValidator {
    pub fn new(
        base: Box<dyn CoordPlane>,
        min: MotorPoint,
        max: MotorPoint,
        max_speed: f32,
    ) -> Self {
        Self {
            proxy: ProxyCoordPlane::new(base),
            bounds: RwLock::new(Bounds {
                min,
                max,
                max_speed,
            }),
        }
    }

    /// 从 `[coords]` 条目读取 `min_x/min_y/max_x/max_y/max_speed`
    ///
    /// 默认边界为 ±150000，最大速度 4000。
    pub fn from_catalogue(base: Box<dyn CoordPlane>, catalogue: &ConfigurationCatalogue) -> Self {
        let int = |key, default| catalogue.get_int(keys::COORDS, key, default);
        let min = MotorPoint::new(int(keys::MIN_X, -DEFAULT_BOUND), int(keys::MIN_Y, -DEFAULT_BOUND));
        let max = MotorPoint::new(int(keys::MAX_X, DEFAULT_BOUND), int(keys::MAX_Y, DEFAULT_BOUND));
        let max_speed =
            catalogue.get_real(keys::COORDS, keys::MAX_SPEED, f64::from(DEFAULT_MAX_SPEED)) as f32;
        Self::new(base, min, max, max_speed)
    }

    pub fn min(&self) -> MotorPoint {
        self.bounds.read().min
    }

    pub fn set_min(&self, min: MotorPoint) {
        self.bounds.write().min = min;
    }

    pub fn max(&self) -> MotorPoint {
        self.bounds.read().max
    }

    pub fn set_max(&self, max: MotorPoint) {
        self.bounds.write().max = max;
    }

    pub fn max_speed(&self) -> f32 {
        self.bounds.read().max_speed
    }

    pub fn set_max_speed(&self, max_speed: f32) {
        self.bounds.write().max_speed = max_speed;
    }

    fn check_point(&self, point: MotorPoint) -> Result<()> {
        let bounds = *self.bounds.read();
        let inside = point.x >= bounds.min.x
            && point.x <= bounds.max.x
            && point.y >= bounds.min.y
            && point.y <= bounds.max.y;
        if inside {
            Ok(())
        } else {
            debug!(%point, min = %bounds.min, max = %bounds.max, "Point rejected by validator");
            Err(MotionError::InvalidCoordinates {
                x: point.x,
                y: point.y,
            })
        }
    }

    fn check_speed(&self, speed: f32) -> Result<()> {
        let max = self.max_speed();
        // NaN 不满足任何比较
        if speed >= 0.0 && speed <= max {
            Ok(())
        } else {
            Err(MotionError::InvalidSpeed { speed, max })
        }
    }
}

impl PlaneDecorator for CoordPlaneValidator {
    fn proxy(&self) -> &ProxyCoordPlane {
        &self.proxy
    }

    fn into_proxy(self: Box<Self>) -> ProxyCoordPlane {
        self.proxy
    }

    fn rewrap(&self, base: Box<dyn CoordPlane>) -> Box<dyn CoordPlane> {
        let bounds = *self.bounds.read();
        Box::new(CoordPlaneValidator::new(
            base,
            bounds.min,
            bounds.max,
            bounds.max_speed,
        ))
    }

    fn describe_layer(&self) -> String {
        let bounds = *self.bounds.read();
        format!(
            "validator (min: {}, max: {}, max speed: {})",
            bounds.min, bounds.max, bounds.max_speed
        )
    }

    fn intercept_move_to(&self, dest: MotorPoint, speed: f32, sync: bool) -> Result<()> {
        self.check_point(dest)?;
        self.check_speed(speed)?;
        self.proxy.move_to(dest, speed, sync)
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
        self.check_point(dest)?;
        self.check_point(center)?;
        self.check_speed(speed)?;
        self.proxy.arc(dest, center, direction, speed, sync, ratio)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plane::VirtualCoordPlane;
    use crate::types::MotorRect;

    fn validator() -> CoordPlaneValidator {
        // 虚拟平面比验证边界大，被拒绝的点不会因为虚拟平面本身而失败
        let base = VirtualCoordPlane::new(MotorRect::new(-10_000, -10_000, 20_000, 20_000));
        CoordPlaneValidator::new(
            Box::new(base),
            MotorPoint::new(-100, -100),
            MotorPoint::new(100, 100),
            500.0,
        )
    }

    #[test]
    fn test_rejects_outside_without_forwarding() {
        let v = validator();
        let err = v.move_to(MotorPoint::new(101, 0), 100.0, false).unwrap_err();
        assert!(matches!(err, MotionError::InvalidCoordinates { x: 101, y: 0 }));
        assert_eq!(v.position(), MotorPoint::new(0, 0));

        v.move_to(MotorPoint::new(50, -50), 100.0, false).unwrap();
        assert_eq!(v.position(), MotorPoint::new(50, -50));
    }

    #[test]
    fn test_bounds_are_inclusive() {
        let v = validator();
        v.move_to(MotorPoint::new(100, 100), 100.0, false).unwrap();
        v.move_to(MotorPoint::new(-100, -100), 100.0, false).unwrap();
    }

    #[test]
    fn test_speed_range() {
        let v = validator();
        for speed in [-1.0, 501.0, f32::NAN] {
            let err = v.move_to(MotorPoint::new(0, 10), speed, false).unwrap_err();
            assert!(matches!(err, MotionError::InvalidSpeed { .. }), "{speed}");
        }
        v.move_to(MotorPoint::new(0, 10), 0.0, false).unwrap();
        v.move_to(MotorPoint::new(0, 20), 500.0, false).unwrap();
    }

    #[test]
    fn test_arc_center_is_checked() {
        let v = validator();
        v.move_to(MotorPoint::new(50, 0), 100.0, false).unwrap();
        let err = v
            .arc(
                MotorPoint::new(50, 0),
                MotorPoint::new(200, 0),
                ArcDirection::Clockwise,
                100.0,
                false,
                1.0,
            )
            .unwrap_err();
        assert!(matches!(err, MotionError::InvalidCoordinates { x: 200, .. }));
        assert_eq!(v.position(), MotorPoint::new(50, 0));
    }

    #[test]
    fn test_runtime_reconfiguration() {
        let v = validator();
        v.set_max(MotorPoint::new(1000, 1000));
        v.set_max_speed(2000.0);
        v.move_to(MotorPoint::new(900, 900), 1500.0, false).unwrap();
        assert_eq!(v.max(), MotorPoint::new(1000, 1000));

        v.set_min(MotorPoint::new(0, 0));
        assert!(v.move_to(MotorPoint::new(-1, 0), 10.0, false).is_err());
    }

    #[test]
    fn test_from_catalogue() {
        let catalogue = ConfigurationCatalogue::from_toml_str(
            r#"
            [coords]
            min_x = -10
            max_x = 10
            max_speed = 25.5
            "#,
        )
        .unwrap();
        let base = VirtualCoordPlane::new(MotorRect::new(-1000, -1000, 2000, 2000));
        let v = CoordPlaneValidator::from_catalogue(Box::new(base), &catalogue);
        assert_eq!(v.min(), MotorPoint::new(-10, -150_000));
        assert_eq!(v.max(), MotorPoint::new(10, 150_000));
        assert_eq!(v.max_speed(), 25.5);
    }
}
