use super::{CoordTranslator, TranslatorKind, checked_div};
use crate::types::{CoordPoint, CoordScale};

/// 每轴 `p * scale + offset`
#[derive(Debug, Clone, PartialEq)]
pub struct LinearCoordTranslator {
    offset: CoordPoint,
    scale: CoordScale,
}

impl LinearCoordTranslator {
    pub fn new(offset: CoordPoint, scale: CoordScale) -> Self {
        Self { offset, scale }
    }

    pub fn offset(&self) -> CoordPoint {
        self.offset
    }

    pub fn scale(&self) -> CoordScale {
        self.scale
    }

    pub fn set_offset(&mut self, offset: CoordPoint) {
        self.offset = offset;
    }

    pub fn set_scale(&mut self, scale: CoordScale) {
        self.scale = scale;
    }
}

impl CoordTranslator for LinearCoordTranslator {
    fn kind(&self) -> TranslatorKind {
        TranslatorKind::Linear
    }

    fn forward(&self, point: CoordPoint) -> CoordPoint {
        CoordPoint::new(
            point.x * self.scale.x + self.offset.x,
            point.y * self.scale.y + self.offset.y,
        )
    }

    fn inverse(&self, point: CoordPoint) -> CoordPoint {
        CoordPoint::new(
            checked_div(point.x - self.offset.x, self.scale.x),
            checked_div(point.y - self.offset.y, self.scale.y),
        )
    }

    fn clone_translator(&self) -> Box<dyn CoordTranslator> {
        Box::new(self.clone())
    }
}
