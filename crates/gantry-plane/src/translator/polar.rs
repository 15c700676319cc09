use super::{CoordTranslator, TranslatorKind};
use crate::types::CoordPoint;

/// 极坐标：逻辑 `(radius, angle)`（弧度）-> 笛卡尔 `(r cos a, r sin a)`
///
/// 逆映射使用 `hypot` / `atan2`，角度范围为 `(-π, π]`。
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PolarCoordTranslator;

impl PolarCoordTranslator {
    pub fn new() -> Self {
        Self
    }
}

impl CoordTranslator for PolarCoordTranslator {
    fn kind(&self) -> TranslatorKind {
        TranslatorKind::Polar
    }

    fn forward(&self, point: CoordPoint) -> CoordPoint {
        let (radius, angle) = (point.x, point.y);
        CoordPoint::new(radius * angle.cos(), radius * angle.sin())
    }

    fn inverse(&self, point: CoordPoint) -> CoordPoint {
        CoordPoint::new(point.x.hypot(point.y), point.y.atan2(point.x))
    }

    fn clone_translator(&self) -> Box<dyn CoordTranslator> {
        Box::new(*self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn test_quarter_turn() {
        let t = PolarCoordTranslator::new();
        let p = t.forward(CoordPoint::new(5.0, FRAC_PI_2));
        assert_relative_eq!(p.x, 0.0, epsilon = 1e-12);
        assert_relative_eq!(p.y, 5.0, epsilon = 1e-12);

        let back = t.inverse(CoordPoint::new(3.0, 4.0));
        assert_relative_eq!(back.x, 5.0);
        assert_relative_eq!(back.y, 4.0f64.atan2(3.0));
    }
}
