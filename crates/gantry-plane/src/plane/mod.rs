//! 坐标平面管线
//!
//! 所有平面实现同一个运动契约 [`CoordPlane`]。终端平面（[`CoordController`]、
//! [`VirtualCoordPlane`]）直接驱动电机或模拟运动；装饰器（[`ProxyCoordPlane`]、
//! [`CoordPlaneValidator`]、[`CoordPlaneLog`]、[`CoordPlaneTracker`]）各自拥有一个被包装的平面，
//! 保持契约不变并附加一项横切关注点。装饰器实现 [`PlaneDecorator`]，只重写拦截的调用。
//! 装饰器链由所有权保证无环。
//!
//! 所有方法都只需要 `&self`：运动在调用方线程上阻塞时，另一个线程仍可调用
//! [`stop`](CoordPlane::stop)。
//!
//! # 示例
//!
//! ```rust
//! use gantry_plane::plane::{CoordPlane, CoordPlaneStack, CoordPlaneValidator, VirtualCoordPlane};
//! use gantry_plane::{MotorPoint, MotorRect};
//!
//! let preview = VirtualCoordPlane::new(MotorRect::new(-1000, -1000, 2000, 2000));
//! let mut stack = CoordPlaneStack::new(Box::new(preview));
//! stack.push(|base| {
//!     Box::new(CoordPlaneValidator::new(
//!         base,
//!         MotorPoint::new(-500, -500),
//!         MotorPoint::new(500, 500),
//!         4000.0,
//!     ))
//! });
//!
//! assert!(stack.move_to(MotorPoint::new(100, 200), 1000.0, false).is_ok());
//! assert!(stack.move_to(MotorPoint::new(900, 0), 1000.0, false).is_err());
//! assert_eq!(stack.position(), MotorPoint::new(100, 200));
//! ```

mod arc;
mod controller;
mod log;
mod proxy;
mod stack;
mod tracker;
mod validator;
mod virtual_plane;

pub use arc::{ArcDirection, arc_segments};
pub use controller::{CoordController, CoordControllerConfig};
pub use log::CoordPlaneLog;
pub use proxy::{PlaneDecorator, ProxyCoordPlane};
pub use stack::CoordPlaneStack;
pub use tracker::CoordPlaneTracker;
pub use validator::CoordPlaneValidator;
pub use virtual_plane::VirtualCoordPlane;

use crate::types::{MotorPoint, MotorRect};
use gantry_ctrl::Result;
use gantry_device::TrailerId;
use std::fmt;
use std::sync::Arc;

/// 坐标平面运动契约
pub trait CoordPlane: Send + Sync {
    /// 运动到 `dest`；`sync` 为 true 时两轴插补同时到达
    fn move_to(&self, dest: MotorPoint, speed: f32, sync: bool) -> Result<()>;

    /// 从当前位置沿圆弧运动到 `dest`
    ///
    /// `ratio` 是 Y 轴相对 X 轴的比例（1.0 为正圆），必须为正。
    fn arc(
        &self,
        dest: MotorPoint,
        center: MotorPoint,
        direction: ArcDirection,
        speed: f32,
        sync: bool,
        ratio: f64,
    ) -> Result<()>;

    /// 两轴回零到指定限位
    fn calibrate(&self, trailer: TrailerId) -> Result<()>;

    /// 测量可用范围（先到对侧限位，再回到 `trailer`）
    fn measure(&self, trailer: TrailerId) -> Result<()>;

    fn position(&self) -> MotorPoint;

    /// 测量得到的范围，未测量时返回 `Unmeasured`
    fn size(&self) -> Result<MotorRect>;

    fn is_measured(&self) -> bool;

    /// 取消进行中的运动，非阻塞、幂等
    fn stop(&self);

    /// 可跨线程持有的停止句柄
    fn stop_handle(&self) -> StopHandle;

    /// 被包装的平面；终端平面返回 `None`
    fn base(&self) -> Option<&dyn CoordPlane>;

    /// 拆下这一层，返回被包装的平面；终端平面原样返回 `Err(self)`
    fn into_base(self: Box<Self>) -> std::result::Result<Box<dyn CoordPlane>, Box<dyn CoordPlane>>;

    /// 以相同配置在 `base` 之上重建这一层；终端平面直接返回 `base`
    fn clone_plane(&self, base: Box<dyn CoordPlane>) -> Box<dyn CoordPlane>;

    /// 单行描述
    fn describe(&self) -> String;
}

/// 停止句柄
///
/// 从平面获取后可以移动到其它线程（例如 Ctrl-C 处理器）中调用。
#[derive(Clone)]
pub struct StopHandle {
    inner: Arc<dyn Fn() + Send + Sync>,
}

impl StopHandle {
    pub fn new(stop: impl Fn() + Send + Sync + 'static) -> Self {
        Self {
            inner: Arc::new(stop),
        }
    }

    /// 什么也不做的句柄（瞬时完成的平面）
    pub fn noop() -> Self {
        Self::new(|| {})
    }

    pub fn stop(&self) {
        (self.inner)();
    }
}

impl fmt::Debug for StopHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("StopHandle")
    }
}
