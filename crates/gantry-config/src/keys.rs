//! 配置条目名与键名
//!
//! 控制器、平面和模拟器从这些位置读取参数；缺失时使用各自文档化的默认值。

/// 运动核心参数（翻滚步长、速度、回退量、轮询间隔）
pub const CORE: &str = "core";
/// 坐标平面参数（验证器边界、圆弧容差）
pub const COORDS: &str = "coords";
/// 模拟后端参数
pub const EMU: &str = "emu";

// [core]
pub const ROLL_STEP: &str = "roll_step";
pub const ROLL_SPEED: &str = "roll_speed";
pub const TRAILER_COMEBACK: &str = "trailer_comeback";
pub const POLL_INTERVAL_US: &str = "poll_interval_us";

// [coords]
pub const MIN_X: &str = "min_x";
pub const MIN_Y: &str = "min_y";
pub const MAX_X: &str = "max_x";
pub const MAX_Y: &str = "max_y";
pub const MAX_SPEED: &str = "max_speed";
pub const ARC_TOLERANCE: &str = "arc_tolerance";
pub const ARC_MAX_SEGMENTS: &str = "arc_max_segments";

// [emu]
pub const MOTOR_SIZE: &str = "motor_size";
pub const TICK_HZ: &str = "tick_hz";
