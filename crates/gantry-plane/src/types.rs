//! 坐标类型
//!
//! - `Motor*`：物理坐标（步，整数）
//! - `Coord*`：逻辑坐标（浮点）

use std::fmt;
use std::ops::{Add, Sub};

/// 物理坐标点（步）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MotorPoint {
    pub x: i64,
    pub y: i64,
}

impl MotorPoint {
    pub const fn new(x: i64, y: i64) -> Self {
        Self { x, y }
    }
}

impl Add for MotorPoint {
    type Output = MotorPoint;

    fn add(self, rhs: Self) -> Self::Output {
        MotorPoint::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for MotorPoint {
    type Output = MotorPoint;

    fn sub(self, rhs: Self) -> Self::Output {
        MotorPoint::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl fmt::Display for MotorPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// 物理尺寸（步）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MotorSize {
    pub w: i64,
    pub h: i64,
}

impl MotorSize {
    pub const fn new(w: i64, h: i64) -> Self {
        Self { w, h }
    }
}

/// 物理矩形：左下角 `(x, y)`，宽高 `(w, h)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MotorRect {
    pub x: i64,
    pub y: i64,
    pub w: i64,
    pub h: i64,
}

impl MotorRect {
    pub const fn new(x: i64, y: i64, w: i64, h: i64) -> Self {
        Self { x, y, w, h }
    }

    /// 由两个对角点构造（顺序无关）
    pub fn from_corners(a: MotorPoint, b: MotorPoint) -> Self {
        Self {
            x: a.x.min(b.x),
            y: a.y.min(b.y),
            w: (a.x - b.x).abs(),
            h: (a.y - b.y).abs(),
        }
    }

    pub fn min(&self) -> MotorPoint {
        MotorPoint::new(self.x, self.y)
    }

    pub fn max(&self) -> MotorPoint {
        MotorPoint::new(self.x + self.w, self.y + self.h)
    }

    pub fn size(&self) -> MotorSize {
        MotorSize::new(self.w, self.h)
    }

    /// 闭区间包含
    pub fn contains(&self, point: MotorPoint) -> bool {
        let max = self.max();
        point.x >= self.x && point.x <= max.x && point.y >= self.y && point.y <= max.y
    }
}

/// 逻辑坐标点
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CoordPoint {
    pub x: f64,
    pub y: f64,
}

impl CoordPoint {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// 四舍五入到物理坐标
    pub fn round(self) -> MotorPoint {
        MotorPoint::new(self.x.round() as i64, self.y.round() as i64)
    }
}

impl From<MotorPoint> for CoordPoint {
    fn from(point: MotorPoint) -> Self {
        CoordPoint::new(point.x as f64, point.y as f64)
    }
}

impl fmt::Display for CoordPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// 每轴缩放系数
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CoordScale {
    pub x: f64,
    pub y: f64,
}

impl CoordScale {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub const fn uniform(value: f64) -> Self {
        Self { x: value, y: value }
    }
}

impl Default for CoordScale {
    fn default() -> Self {
        Self::uniform(1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_from_corners() {
        let rect = MotorRect::from_corners(MotorPoint::new(100, -20), MotorPoint::new(-50, 80));
        assert_eq!(rect, MotorRect::new(-50, -20, 150, 100));
        assert_eq!(rect.max(), MotorPoint::new(100, 80));
        assert_eq!(rect.size(), MotorSize::new(150, 100));
    }

    #[test]
    fn test_rect_contains_is_inclusive() {
        let rect = MotorRect::new(0, 0, 10, 10);
        assert!(rect.contains(MotorPoint::new(0, 0)));
        assert!(rect.contains(MotorPoint::new(10, 10)));
        assert!(!rect.contains(MotorPoint::new(11, 5)));
        assert!(!rect.contains(MotorPoint::new(5, -1)));
    }

    #[test]
    fn test_round() {
        assert_eq!(CoordPoint::new(1.5, -1.5).round(), MotorPoint::new(2, -2));
        assert_eq!(CoordPoint::new(0.49, 2.51).round(), MotorPoint::new(0, 3));
    }

    #[test]
    fn test_point_arithmetic() {
        let a = MotorPoint::new(3, 4);
        let b = MotorPoint::new(1, -1);
        assert_eq!(a + b, MotorPoint::new(4, 3));
        assert_eq!(a - b, MotorPoint::new(2, 5));
        assert_eq!(a.to_string(), "(3, 4)");
    }
}
