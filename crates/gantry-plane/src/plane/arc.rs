//! 圆弧分段
//!
//! 把圆弧细分为直线段，使每段弦高（chord error）不超过给定容差。
//! Y 轴先除以 `ratio` 转换到等比空间再计算，因此 `ratio != 1` 时得到椭圆弧。
//! 步进角按物理长半轴计算，椭圆弧的弦高同样不超过容差。

use crate::types::MotorPoint;
use gantry_ctrl::{MotionError, Result};
use std::f64::consts::{FRAC_PI_2, TAU};

/// 圆弧方向（Y 轴向上的坐标系）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArcDirection {
    Clockwise,
    CounterClockwise,
}

/// 计算从 `start` 到 `dest`、绕 `center` 的圆弧分段点
///
/// 返回的点不含 `start`，最后一个点恰好是 `dest`，相邻重复点已去除。
/// `start == dest` 表示整圆。
///
/// # 错误
///
/// - `WrongParameter`: `ratio` 或 `tolerance` 非正
/// - `ArcError`: 零半径、起止半径不一致、所需分段数超过 `max_segments`
pub fn arc_segments(
    start: MotorPoint,
    dest: MotorPoint,
    center: MotorPoint,
    direction: ArcDirection,
    ratio: f64,
    tolerance: f64,
    max_segments: usize,
) -> Result<Vec<MotorPoint>> {
    if !(ratio > 0.0 && ratio.is_finite()) {
        return Err(MotionError::WrongParameter(format!(
            "arc axis ratio must be positive, got {ratio}"
        )));
    }
    if !(tolerance > 0.0 && tolerance.is_finite()) {
        return Err(MotionError::WrongParameter(format!(
            "arc tolerance must be positive, got {tolerance}"
        )));
    }

    let local = |p: MotorPoint| ((p.x - center.x) as f64, (p.y - center.y) as f64 / ratio);
    let (sx, sy) = local(start);
    let (dx, dy) = local(dest);

    let r_start = sx.hypot(sy);
    let r_dest = dx.hypot(dy);
    if r_start == 0.0 || r_dest == 0.0 {
        return Err(MotionError::ArcError(format!(
            "zero radius arc around {center}"
        )));
    }
    // 允许整数取整带来的误差
    let radius_slack = tolerance.max(1.0) * 2.0;
    if (r_start - r_dest).abs() > radius_slack {
        return Err(MotionError::ArcError(format!(
            "start radius {r_start:.3} and destination radius {r_dest:.3} differ around {center}"
        )));
    }

    let a_start = sy.atan2(sx);
    let a_dest = dy.atan2(dx);
    let raw_sweep = match direction {
        ArcDirection::CounterClockwise => a_dest - a_start,
        ArcDirection::Clockwise => a_start - a_dest,
    };
    let mut sweep = raw_sweep.rem_euclid(TAU);
    if sweep == 0.0 {
        sweep = TAU;
    }

    // Y 方向被拉伸 ratio 倍时，弦高最多同样放大 ratio 倍
    let semi_major = r_start.max(r_dest) * ratio.max(1.0);
    let step_angle = if tolerance >= semi_major {
        FRAC_PI_2
    } else {
        (2.0 * (1.0 - tolerance / semi_major).acos()).min(FRAC_PI_2)
    };
    let segments = (sweep / step_angle).ceil().max(1.0);
    if segments > max_segments as f64 {
        return Err(MotionError::ArcError(format!(
            "arc needs {segments} segments, limit is {max_segments}"
        )));
    }
    let segments = segments as usize;

    let sign = match direction {
        ArcDirection::CounterClockwise => 1.0,
        ArcDirection::Clockwise => -1.0,
    };

    let mut points = Vec::with_capacity(segments);
    let mut last = start;
    for i in 1..=segments {
        let point = if i == segments {
            dest
        } else {
            let t = i as f64 / segments as f64;
            let angle = a_start + sign * sweep * t;
            let radius = r_start + (r_dest - r_start) * t;
            MotorPoint::new(
                center.x + (radius * angle.cos()).round() as i64,
                center.y + (radius * angle.sin() * ratio).round() as i64,
            )
        };
        if point != last {
            points.push(point);
            last = point;
        }
    }

    Ok(points)
}
