use super::{ArcDirection, CoordPlane, StopHandle, VirtualCoordPlane};
use crate::types::{MotorPoint, MotorRect};
use gantry_ctrl::Result;
use gantry_device::TrailerId;
use tracing::debug;

/// 平面栈：由外到内的装饰器链，底部是一个终端平面
///
/// 栈本身也实现 [`CoordPlane`]，所有调用交给最外层。
pub struct CoordPlaneStack {
    top: Box<dyn CoordPlane>,
    depth: usize,
}

impl CoordPlaneStack {
    pub fn new(base: Box<dyn CoordPlane>) -> Self {
        let depth = chain_len(base.as_ref());
        Self { top: base, depth }
    }

    /// 在最外层之上再包一层
    pub fn push(&mut self, wrap: impl FnOnce(Box<dyn CoordPlane>) -> Box<dyn CoordPlane>) {
        let top = std::mem::replace(&mut self.top, detached());
        self.top = wrap(top);
        self.depth += 1;
        debug!(depth = self.depth, layer = %self.top.describe(), "Plane pushed");
    }

    /// 拆下最外层；只剩终端平面时返回 false
    pub fn pop(&mut self) -> bool {
        let top = std::mem::replace(&mut self.top, detached());
        match top.into_base() {
            Ok(base) => {
                self.top = base;
                self.depth -= 1;
                true
            },
            Err(terminal) => {
                self.top = terminal;
                false
            },
        }
    }

    /// 最外层
    pub fn peek(&self) -> &dyn CoordPlane {
        self.top.as_ref()
    }

    /// 链底的终端平面
    pub fn root(&self) -> &dyn CoordPlane {
        let mut plane = self.top.as_ref();
        while let Some(base) = plane.base() {
            plane = base;
        }
        plane
    }

    /// 链上的平面数（含终端平面）
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// 由外到内的描述
    pub fn layers(&self) -> Vec<String> {
        let mut layers = Vec::with_capacity(self.depth);
        let mut plane = Some(self.top.as_ref());
        while let Some(current) = plane {
            layers.push(current.describe());
            plane = current.base();
        }
        layers
    }

    /// 以相同的装饰器配置在 `new_base` 之上重建整条链
    ///
    /// 原栈不受影响，常用于把真实平面的验证/日志配置复制到预览平面上。
    pub fn clone_onto(&self, new_base: Box<dyn CoordPlane>) -> CoordPlaneStack {
        let mut decorators = Vec::new();
        let mut plane = self.top.as_ref();
        while let Some(base) = plane.base() {
            decorators.push(plane);
            plane = base;
        }

        let mut stack = CoordPlaneStack::new(new_base);
        for layer in decorators.into_iter().rev() {
            stack.push(|base| layer.clone_plane(base));
        }
        stack
    }
}

fn chain_len(plane: &dyn CoordPlane) -> usize {
    let mut len = 1;
    let mut current = plane;
    while let Some(base) = current.base() {
        len += 1;
        current = base;
    }
    len
}

/// 替换最外层期间的占位
fn detached() -> Box<dyn CoordPlane> {
    Box::new(VirtualCoordPlane::new(MotorRect::default()))
}

impl CoordPlane for CoordPlaneStack {
    fn move_to(&self, dest: MotorPoint, speed: f32, sync: bool) -> Result<()> {
        self.top.move_to(dest, speed, sync)
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
        self.top.arc(dest, center, direction, speed, sync, ratio)
    }

    fn calibrate(&self, trailer: TrailerId) -> Result<()> {
        self.top.calibrate(trailer)
    }

    fn measure(&self, trailer: TrailerId) -> Result<()> {
        self.top.measure(trailer)
    }

    fn position(&self) -> MotorPoint {
        self.top.position()
    }

    fn size(&self) -> Result<MotorRect> {
        self.top.size()
    }

    fn is_measured(&self) -> bool {
        self.top.is_measured()
    }

    fn stop(&self) {
        self.top.stop()
    }

    fn stop_handle(&self) -> StopHandle {
        self.top.stop_handle()
    }

    fn base(&self) -> Option<&dyn CoordPlane> {
        Some(self.top.as_ref())
    }

    fn into_base(
        self: Box<Self>,
    ) -> std::result::Result<Box<dyn CoordPlane>, Box<dyn CoordPlane>> {
        Ok(self.top)
    }

    /// 嵌套时栈只是透明的一层；内部装饰器由外层沿链逐个复制
    fn clone_plane(&self, base: Box<dyn CoordPlane>) -> Box<dyn CoordPlane> {
        Box::new(CoordPlaneStack::new(base))
    }

    fn describe(&self) -> String {
        format!("stack (depth: {})", self.depth)
    }
}
