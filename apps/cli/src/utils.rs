//! 参数解析工具

use gantry_sdk::device::TrailerId;
use gantry_sdk::plane::MotorPoint;

/// 解析 `x,y` 形式的点（步）
pub fn parse_point(input: &str) -> Result<MotorPoint, String> {
    let (x, y) = input
        .split_once(',')
        .ok_or_else(|| format!("expected `x,y`, got `{input}`"))?;
    let x = x
        .trim()
        .parse::<i64>()
        .map_err(|e| format!("invalid x `{}`: {e}", x.trim()))?;
    let y = y
        .trim()
        .parse::<i64>()
        .map_err(|e| format!("invalid y `{}`: {e}", y.trim()))?;
    Ok(MotorPoint::new(x, y))
}

/// 解析限位编号：`1` / `2`
pub fn parse_trailer(input: &str) -> Result<TrailerId, String> {
    match input.trim() {
        "1" => Ok(TrailerId::Trailer1),
        "2" => Ok(TrailerId::Trailer2),
        other => Err(format!("trailer must be 1 or 2, got `{other}`")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_point() {
        assert_eq!(parse_point("600,300").unwrap(), MotorPoint::new(600, 300));
        assert_eq!(parse_point(" -5 , 7 ").unwrap(), MotorPoint::new(-5, 7));
    }

    #[test]
    fn test_parse_point_errors() {
        assert!(parse_point("600").is_err());
        assert!(parse_point("a,1").is_err());
        assert!(parse_point("1,2,3").is_err());
    }

    #[test]
    fn test_parse_trailer() {
        assert_eq!(parse_trailer("1").unwrap(), TrailerId::Trailer1);
        assert_eq!(parse_trailer(" 2").unwrap(), TrailerId::Trailer2);
        assert!(parse_trailer("3").is_err());
    }
}
