use super::{CoordTranslator, TranslatorKind, checked_div};
use crate::types::{CoordPoint, CoordScale, MotorPoint};

/// `physical = center + logical * scale`
#[derive(Debug, Clone, PartialEq)]
pub struct BasicCoordTranslator {
    center: MotorPoint,
    scale: CoordScale,
}

impl BasicCoordTranslator {
    pub fn new(center: MotorPoint, scale: CoordScale) -> Self {
        Self { center, scale }
    }

    pub fn center(&self) -> MotorPoint {
        self.center
    }

    pub fn scale(&self) -> CoordScale {
        self.scale
    }

    pub fn set_center(&mut self, center: MotorPoint) {
        self.center = center;
    }

    pub fn set_scale(&mut self, scale: CoordScale) {
        self.scale = scale;
    }
}

impl CoordTranslator for BasicCoordTranslator {
    fn kind(&self) -> TranslatorKind {
        TranslatorKind::Basic
    }

    fn forward(&self, point: CoordPoint) -> CoordPoint {
        CoordPoint::new(
            self.center.x as f64 + point.x * self.scale.x,
            self.center.y as f64 + point.y * self.scale.y,
        )
    }

    fn inverse(&self, point: CoordPoint) -> CoordPoint {
        CoordPoint::new(
            checked_div(point.x - self.center.x as f64, self.scale.x),
            checked_div(point.y - self.center.y as f64, self.scale.y),
        )
    }

    fn clone_translator(&self) -> Box<dyn CoordTranslator> {
        Box::new(self.clone())
    }
}
