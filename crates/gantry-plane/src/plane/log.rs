use super::{ArcDirection, CoordPlane, PlaneDecorator, ProxyCoordPlane};
use crate::types::MotorPoint;
use gantry_ctrl::Result;
use gantry_device::TrailerId;
use tracing::{info, warn};

/// 日志层：转发所有调用，用 `tracing` 记录运动、圆弧、回零和测量
///
/// `prefix` 出现在每条日志的 `plane` 字段中，便于区分多个平面。
pub struct CoordPlaneLog {
    proxy: ProxyCoordPlane,
    prefix: String,
    log_actions: bool,
    log_errors: bool,
}

impl CoordPlaneLog {
    pub fn new(base: Box<dyn CoordPlane>, prefix: impl Into<String>) -> Self {
        Self::with_flags(base, prefix, true, true)
    }

    pub fn with_flags(
        base: Box<dyn CoordPlane>,
        prefix: impl Into<String>,
        log_actions: bool,
        log_errors: bool,
    ) -> Self {
        Self {
            proxy: ProxyCoordPlane::new(base),
            prefix: prefix.into(),
            log_actions,
            log_errors,
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn is_logging_actions(&self) -> bool {
        self.log_actions
    }

    pub fn is_logging_errors(&self) -> bool {
        self.log_errors
    }

    fn report(&self, action: &str, result: Result<()>) -> Result<()> {
        if self.log_errors
            && let Err(e) = &result
        {
            warn!(plane = %self.prefix, action, "{}", e);
        }
        result
    }
}

impl PlaneDecorator for CoordPlaneLog {
    fn proxy(&self) -> &ProxyCoordPlane {
        &self.proxy
    }

    fn into_proxy(self: Box<Self>) -> ProxyCoordPlane {
        self.proxy
    }

    fn rewrap(&self, base: Box<dyn CoordPlane>) -> Box<dyn CoordPlane> {
        Box::new(CoordPlaneLog::with_flags(
            base,
            self.prefix.clone(),
            self.log_actions,
            self.log_errors,
        ))
    }

    fn describe_layer(&self) -> String {
        format!(
            "log (prefix: {}, actions: {}, errors: {})",
            self.prefix, self.log_actions, self.log_errors
        )
    }

    fn intercept_move_to(&self, dest: MotorPoint, speed: f32, sync: bool) -> Result<()> {
        if self.log_actions {
            info!(plane = %self.prefix, %dest, speed, sync, "Linear move");
        }
        self.report("move", self.proxy.move_to(dest, speed, sync))
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
        if self.log_actions {
            info!(
                plane = %self.prefix,
                %dest,
                %center,
                ?direction,
                speed,
                sync,
                ratio,
                "Arc move"
            );
        }
        self.report(
            "arc",
            self.proxy.arc(dest, center, direction, speed, sync, ratio),
        )
    }

    fn intercept_calibrate(&self, trailer: TrailerId) -> Result<()> {
        if self.log_actions {
            info!(plane = %self.prefix, %trailer, "Calibrate");
        }
        self.report("calibrate", self.proxy.calibrate(trailer))
    }

    fn intercept_measure(&self, trailer: TrailerId) -> Result<()> {
        if self.log_actions {
            info!(plane = %self.prefix, %trailer, "Measure");
        }
        self.report("measure", self.proxy.measure(trailer))
    }

    fn intercept_stop(&self) {
        if self.log_actions {
            info!(plane = %self.prefix, "Stop requested");
        }
        self.proxy.stop()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plane::VirtualCoordPlane;
    use crate::types::MotorRect;

    #[test]
    fn test_logging_is_transparent() {
        let base = VirtualCoordPlane::new(MotorRect::new(-100, -100, 200, 200));
        let log = CoordPlaneLog::new(Box::new(base), "preview");
        log.move_to(MotorPoint::new(10, 10), 50.0, true).unwrap();
        assert!(log.move_to(MotorPoint::new(500, 0), 50.0, true).is_err());
        assert_eq!(log.position(), MotorPoint::new(10, 10));
        assert_eq!(log.prefix(), "preview");

        let copy = log.clone_plane(Box::new(VirtualCoordPlane::new(MotorRect::new(
            0, 0, 10, 10,
        ))));
        assert_eq!(copy.describe(), log.describe());
    }
}
