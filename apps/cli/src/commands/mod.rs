//! 命令定义和实现

pub mod arc;
pub mod calibrate;
pub mod r#move;

pub use arc::ArcCommand;
pub use calibrate::CalibrateCommand;
pub use r#move::MoveCommand;
