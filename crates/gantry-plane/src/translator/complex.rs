use super::{CoordTranslator, TranslatorKind};
use crate::types::CoordPoint;
use gantry_ctrl::{MotionError, Result};

/// 有序的转换器链
///
/// 正向按列表顺序依次应用（`[A, B]` 的正向为 `B(A(p))`），逆向按相反顺序。
/// 列表在运行时可增删，克隆时保持顺序并深拷贝每个子转换器。
#[derive(Debug, Clone, Default)]
pub struct ComplexCoordTranslator {
    children: Vec<Box<dyn CoordTranslator>>,
}

impl ComplexCoordTranslator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_children(children: Vec<Box<dyn CoordTranslator>>) -> Self {
        Self { children }
    }

    /// 追加到链尾（最靠近物理坐标的一端）
    pub fn add(&mut self, translator: Box<dyn CoordTranslator>) {
        self.children.push(translator);
    }

    /// 插入到 `index` 处，`index == len()` 等价于 `add`
    pub fn insert(&mut self, index: usize, translator: Box<dyn CoordTranslator>) -> Result<()> {
        if index > self.children.len() {
            return Err(MotionError::WrongParameter(format!(
                "translator index {} out of range (len {})",
                index,
                self.children.len()
            )));
        }
        self.children.insert(index, translator);
        Ok(())
    }

    pub fn remove(&mut self, index: usize) -> Option<Box<dyn CoordTranslator>> {
        (index < self.children.len()).then(|| self.children.remove(index))
    }

    pub fn child(&self, index: usize) -> Option<&dyn CoordTranslator> {
        self.children.get(index).map(|c| c.as_ref())
    }

    pub fn child_mut(&mut self, index: usize) -> Option<&mut Box<dyn CoordTranslator>> {
        self.children.get_mut(index)
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &dyn CoordTranslator> {
        self.children.iter().map(|c| c.as_ref())
    }
}

impl CoordTranslator for ComplexCoordTranslator {
    fn kind(&self) -> TranslatorKind {
        TranslatorKind::Complex
    }

    fn forward(&self, point: CoordPoint) -> CoordPoint {
        self.children.iter().fold(point, |p, t| t.forward(p))
    }

    fn inverse(&self, point: CoordPoint) -> CoordPoint {
        self.children.iter().rev().fold(point, |p, t| t.inverse(p))
    }

    fn clone_translator(&self) -> Box<dyn CoordTranslator> {
        Box::new(self.clone())
    }
}
