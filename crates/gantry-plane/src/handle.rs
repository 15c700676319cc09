//! 坐标句柄：平面栈 + 转换器

use crate::plane::{ArcDirection, CoordPlane, CoordPlaneStack, StopHandle};
use crate::translator::CoordTranslator;
use crate::types::{CoordPoint, MotorPoint, MotorRect};
use gantry_ctrl::Result;
use gantry_device::TrailerId;

/// 把一个平面栈和一个转换器绑定在一起，接受逻辑坐标
///
/// 速度不经过转换器，单位始终是步/秒。
pub struct CoordHandle {
    id: usize,
    stack: CoordPlaneStack,
    translator: Box<dyn CoordTranslator>,
}

impl CoordHandle {
    pub fn new(id: usize, stack: CoordPlaneStack, translator: Box<dyn CoordTranslator>) -> Self {
        Self {
            id,
            stack,
            translator,
        }
    }

    pub fn id(&self) -> usize {
        self.id
    }

    pub fn stack(&self) -> &CoordPlaneStack {
        &self.stack
    }

    pub fn stack_mut(&mut self) -> &mut CoordPlaneStack {
        &mut self.stack
    }

    pub fn translator(&self) -> &dyn CoordTranslator {
        self.translator.as_ref()
    }

    /// 替换转换器，返回旧的
    pub fn set_translator(
        &mut self,
        translator: Box<dyn CoordTranslator>,
    ) -> Box<dyn CoordTranslator> {
        std::mem::replace(&mut self.translator, translator)
    }

    /// 以逻辑坐标运动
    pub fn float_move(&self, dest: CoordPoint, speed: f32, sync: bool) -> Result<()> {
        self.stack.move_to(self.translator.get(dest), speed, sync)
    }

    /// 以逻辑坐标走圆弧；终点和圆心分别转换后在物理坐标中分段
    pub fn float_arc(
        &self,
        dest: CoordPoint,
        center: CoordPoint,
        direction: ArcDirection,
        speed: f32,
        sync: bool,
        ratio: f64,
    ) -> Result<()> {
        self.stack.arc(
            self.translator.get(dest),
            self.translator.get(center),
            direction,
            speed,
            sync,
            ratio,
        )
    }

    pub fn position(&self) -> MotorPoint {
        self.stack.position()
    }

    pub fn logical_position(&self) -> CoordPoint {
        self.translator.get_inverse(self.stack.position())
    }

    pub fn size(&self) -> Result<MotorRect> {
        self.stack.size()
    }

    pub fn calibrate(&self, trailer: TrailerId) -> Result<()> {
        self.stack.calibrate(trailer)
    }

    pub fn measure(&self, trailer: TrailerId) -> Result<()> {
        self.stack.measure(trailer)
    }

    pub fn stop(&self) {
        self.stack.stop()
    }

    pub fn stop_handle(&self) -> StopHandle {
        self.stack.stop_handle()
    }
}
