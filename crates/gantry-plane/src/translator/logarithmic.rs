use super::{CoordTranslator, TranslatorKind};
use crate::types::{CoordPoint, CoordScale};

/// 每轴以 `scale` 为底的对数映射
///
/// 底数 `b` 满足 `b > 0 && b != 1` 时：正向 `log_b(v)`（仅 `v > 0`，否则原样通过），
/// 逆向 `b^v`。底数不在该定义域内的轴原样通过。
#[derive(Debug, Clone, PartialEq)]
pub struct LogarithmicCoordTranslator {
    scale: CoordScale,
}

fn valid_base(base: f64) -> bool {
    base > 0.0 && base != 1.0 && base.is_finite()
}

fn log_axis(value: f64, base: f64) -> f64 {
    if valid_base(base) && value > 0.0 {
        value.ln() / base.ln()
    } else {
        value
    }
}

fn exp_axis(value: f64, base: f64) -> f64 {
    if valid_base(base) {
        base.powf(value)
    } else {
        value
    }
}

impl LogarithmicCoordTranslator {
    pub fn new(scale: CoordScale) -> Self {
        Self { scale }
    }

    pub fn scale(&self) -> CoordScale {
        self.scale
    }

    pub fn set_scale(&mut self, scale: CoordScale) {
        self.scale = scale;
    }
}

impl CoordTranslator for LogarithmicCoordTranslator {
    fn kind(&self) -> TranslatorKind {
        TranslatorKind::Logarithmic
    }

    fn forward(&self, point: CoordPoint) -> CoordPoint {
        CoordPoint::new(
            log_axis(point.x, self.scale.x),
            log_axis(point.y, self.scale.y),
        )
    }

    fn inverse(&self, point: CoordPoint) -> CoordPoint {
        CoordPoint::new(
            exp_axis(point.x, self.scale.x),
            exp_axis(point.y, self.scale.y),
        )
    }

    fn clone_translator(&self) -> Box<dyn CoordTranslator> {
        Box::new(self.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_log_base_10_and_2() {
        let t = LogarithmicCoordTranslator::new(CoordScale::new(10.0, 2.0));
        let p = t.forward(CoordPoint::new(1000.0, 8.0));
        assert_relative_eq!(p.x, 3.0, epsilon = 1e-12);
        assert_relative_eq!(p.y, 3.0, epsilon = 1e-12);

        let back = t.inverse(p);
        assert_relative_eq!(back.x, 1000.0, epsilon = 1e-9);
        assert_relative_eq!(back.y, 8.0, epsilon = 1e-12);
    }

    #[test]
    fn test_invalid_base_passes_through() {
        // x 轴底数为 1，y 轴底数为负
        let t = LogarithmicCoordTranslator::new(CoordScale::new(1.0, -3.0));
        let p = CoordPoint::new(42.0, 7.0);
        assert_eq!(t.forward(p), p);
        assert_eq!(t.inverse(p), p);
    }

    #[test]
    fn test_non_positive_value_passes_through() {
        let t = LogarithmicCoordTranslator::new(CoordScale::uniform(10.0));
        let p = t.forward(CoordPoint::new(0.0, -5.0));
        assert_eq!(p, CoordPoint::new(0.0, -5.0));
    }
}
