//! 坐标转换器
//!
//! 转换器只包含配置，把逻辑坐标映射到物理坐标（`forward`）并提供逆映射（`inverse`）。
//! 多个转换器可以通过 [`ComplexCoordTranslator`] 级联组合。
//!
//! # 示例
//!
//! ```rust
//! use gantry_plane::translator::{
//!     BasicCoordTranslator, ComplexCoordTranslator, CoordTranslator, LinearCoordTranslator,
//! };
//! use gantry_plane::{CoordPoint, CoordScale, MotorPoint};
//!
//! // 毫米 -> 步：先做线性偏移，再以 (1000, 1000) 为中心、每毫米 100 步
//! let mut chain = ComplexCoordTranslator::new();
//! chain.add(Box::new(LinearCoordTranslator::new(
//!     CoordPoint::new(10.0, 0.0),
//!     CoordScale::uniform(1.0),
//! )));
//! chain.add(Box::new(BasicCoordTranslator::new(
//!     MotorPoint::new(1000, 1000),
//!     CoordScale::uniform(100.0),
//! )));
//!
//! assert_eq!(chain.get(CoordPoint::new(0.0, 2.0)), MotorPoint::new(2000, 1200));
//! ```

mod basic;
mod complex;
mod linear;
mod logarithmic;
mod polar;

pub use basic::BasicCoordTranslator;
pub use complex::ComplexCoordTranslator;
pub use linear::LinearCoordTranslator;
pub use logarithmic::LogarithmicCoordTranslator;
pub use polar::PolarCoordTranslator;

use crate::types::{CoordPoint, MotorPoint};
use std::fmt;

/// 转换器种类
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TranslatorKind {
    Basic,
    Linear,
    Logarithmic,
    Polar,
    Complex,
}

/// 坐标转换器
pub trait CoordTranslator: Send + Sync + fmt::Debug {
    fn kind(&self) -> TranslatorKind;

    /// 逻辑 -> 物理
    fn forward(&self, point: CoordPoint) -> CoordPoint;

    /// 物理 -> 逻辑
    fn inverse(&self, point: CoordPoint) -> CoordPoint;

    /// 深拷贝
    fn clone_translator(&self) -> Box<dyn CoordTranslator>;

    /// 正向转换并四舍五入到步
    fn get(&self, point: CoordPoint) -> MotorPoint {
        self.forward(point).round()
    }

    /// 物理步坐标 -> 逻辑坐标
    fn get_inverse(&self, point: MotorPoint) -> CoordPoint {
        self.inverse(point.into())
    }
}

impl Clone for Box<dyn CoordTranslator> {
    fn clone(&self) -> Self {
        self.clone_translator()
    }
}

/// 除数为零时返回 0，避免逆映射产生无穷大
pub(crate) fn checked_div(value: f64, divisor: f64) -> f64 {
    if divisor == 0.0 { 0.0 } else { value / divisor }
}
