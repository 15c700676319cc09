use super::{ArcDirection, CoordPlane, StopHandle};
use crate::types::{MotorPoint, MotorRect};
use gantry_ctrl::Result;
use gantry_device::TrailerId;

/// 透明转发层
///
/// 单独使用时什么也不改变；其它装饰器把它作为字段，通过 [`PlaneDecorator`]
/// 只重写自己拦截的调用。
pub struct ProxyCoordPlane {
    base: Box<dyn CoordPlane>,
}

impl ProxyCoordPlane {
    pub fn new(base: Box<dyn CoordPlane>) -> Self {
        Self { base }
    }

    /// 被包装的平面
    pub fn inner(&self) -> &dyn CoordPlane {
        self.base.as_ref()
    }

    pub fn into_inner(self) -> Box<dyn CoordPlane> {
        self.base
    }
}

impl PlaneDecorator for ProxyCoordPlane {
    fn proxy(&self) -> &ProxyCoordPlane {
        self
    }

    fn into_proxy(self: Box<Self>) -> ProxyCoordPlane {
        *self
    }

    fn rewrap(&self, base: Box<dyn CoordPlane>) -> Box<dyn CoordPlane> {
        Box::new(ProxyCoordPlane::new(base))
    }

    fn describe_layer(&self) -> String {
        "proxy".to_string()
    }
}

/// 装饰器的转发基础
///
/// 实现者提供自己的 [`ProxyCoordPlane`]、重建方式和描述；`intercept_*` 默认把调用原样交给
/// 被包装的平面，装饰器只重写自己拦截的那几个。实现本 trait 的类型自动实现 [`CoordPlane`]，
/// 位置、范围、停止句柄和拆层总是直接转发。
pub trait PlaneDecorator: Send + Sync {
    fn proxy(&self) -> &ProxyCoordPlane;

    fn into_proxy(self: Box<Self>) -> ProxyCoordPlane;

    /// 以相同配置在 `base` 之上重建这一层
    fn rewrap(&self, base: Box<dyn CoordPlane>) -> Box<dyn CoordPlane>;

    fn describe_layer(&self) -> String;

    fn intercept_move_to(&self, dest: MotorPoint, speed: f32, sync: bool) -> Result<()> {
        self.proxy().inner().move_to(dest, speed, sync)
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
        self.proxy()
            .inner()
            .arc(dest, center, direction, speed, sync, ratio)
    }

    fn intercept_calibrate(&self, trailer: TrailerId) -> Result<()> {
        self.proxy().inner().calibrate(trailer)
    }

    fn intercept_measure(&self, trailer: TrailerId) -> Result<()> {
        self.proxy().inner().measure(trailer)
    }

    fn intercept_stop(&self) {
        self.proxy().inner().stop()
    }
}

impl<T: PlaneDecorator> CoordPlane for T {
    fn move_to(&self, dest: MotorPoint, speed: f32, sync: bool) -> Result<()> {
        self.intercept_move_to(dest, speed, sync)
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
        self.intercept_arc(dest, center, direction, speed, sync, ratio)
    }

    fn calibrate(&self, trailer: TrailerId) -> Result<()> {
        self.intercept_calibrate(trailer)
    }

    fn measure(&self, trailer: TrailerId) -> Result<()> {
        self.intercept_measure(trailer)
    }

    fn position(&self) -> MotorPoint {
        self.proxy().inner().position()
    }

    fn size(&self) -> Result<MotorRect> {
        self.proxy().inner().size()
    }

    fn is_measured(&self) -> bool {
        self.proxy().inner().is_measured()
    }

    fn stop(&self) {
        self.intercept_stop()
    }

    fn stop_handle(&self) -> StopHandle {
        self.proxy().inner().stop_handle()
    }

    fn base(&self) -> Option<&dyn CoordPlane> {
        Some(self.proxy().inner())
    }

    fn into_base(
        self: Box<Self>,
    ) -> std::result::Result<Box<dyn CoordPlane>, Box<dyn CoordPlane>> {
        Ok(self.into_proxy().into_inner())
    }

    fn clone_plane(&self, base: Box<dyn CoordPlane>) -> Box<dyn CoordPlane> {
        self.rewrap(base)
    }

    fn describe(&self) -> String {
        self.describe_layer()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plane::VirtualCoordPlane;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_forwards_everything() {
        let proxy = ProxyCoordPlane::new(Box::new(VirtualCoordPlane::new(MotorRect::new(
            0, 0, 100, 100,
        ))));
        proxy.move_to(MotorPoint::new(10, 20), 100.0, true).unwrap();
        assert_eq!(proxy.position(), MotorPoint::new(10, 20));
        assert_eq!(proxy.inner().position(), MotorPoint::new(10, 20));
        assert_eq!(proxy.size().unwrap(), MotorRect::new(0, 0, 100, 100));
        assert!(proxy.base().is_some());

        let base = Box::new(proxy).into_base().ok().unwrap();
        assert_eq!(base.position(), MotorPoint::new(10, 20));
    }

    /// 只拦截 `stop` 的装饰器
    struct StopCounter {
        proxy: ProxyCoordPlane,
        stops: AtomicUsize,
    }

    impl PlaneDecorator for StopCounter {
        fn proxy(&self) -> &ProxyCoordPlane {
            &self.proxy
        }

        fn into_proxy(self: Box<Self>) -> ProxyCoordPlane {
            self.proxy
        }

        fn rewrap(&self, base: Box<dyn CoordPlane>) -> Box<dyn CoordPlane> {
            Box::new(StopCounter {
                proxy: ProxyCoordPlane::new(base),
                stops: AtomicUsize::new(0),
            })
        }

        fn describe_layer(&self) -> String {
            "stop counter".to_string()
        }

        fn intercept_stop(&self) {
            self.stops.fetch_add(1, Ordering::SeqCst);
            self.proxy.stop()
        }
    }

    #[test]
    fn test_decorator_overrides_only_what_it_intercepts() {
        let counter = StopCounter {
            proxy: ProxyCoordPlane::new(Box::new(VirtualCoordPlane::new(MotorRect::new(
                0, 0, 100, 100,
            )))),
            stops: AtomicUsize::new(0),
        };
        let plane: &dyn CoordPlane = &counter;

        plane.move_to(MotorPoint::new(30, 40), 10.0, false).unwrap();
        assert!(plane.move_to(MotorPoint::new(300, 40), 10.0, false).is_err());
        assert_eq!(plane.position(), MotorPoint::new(30, 40));
        plane.stop();
        plane.stop_handle().stop();
        // 停止句柄来自被包装的平面，不经过拦截
        assert_eq!(counter.stops.load(Ordering::SeqCst), 1);
        assert_eq!(plane.describe(), "stop counter");
        assert_eq!(plane.base().unwrap().position(), MotorPoint::new(30, 40));
    }
}
