//! # Gantry Plane
//!
//! 坐标层：逻辑坐标到物理步的转换器、装饰器式坐标平面管线和圆弧分段。
//!
//! - [`translator`]：`Basic` / `Linear` / `Logarithmic` / `Polar` / `Complex` 转换器
//! - [`plane`]：`CoordPlane` 契约、基础平面、验证/日志/轨迹装饰器、虚拟平面和平面栈
//! - [`CoordHandle`]：把平面栈和转换器绑定，接受逻辑坐标

mod handle;
pub mod plane;
pub mod translator;
mod types;

pub use handle::CoordHandle;
pub use types::{CoordPoint, CoordScale, MotorPoint, MotorRect, MotorSize};
