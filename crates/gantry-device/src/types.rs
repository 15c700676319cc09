//! 设备层基础类型

use std::fmt;

/// 设备标识，在进程生命周期内稳定
pub type DeviceId = usize;

/// 设备种类
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DeviceKind {
    Motor,
    Instrument,
}

/// 电机供电等级
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum Power {
    #[default]
    NoPower = 0,
    HalfPower = 1,
    FullPower = 2,
}

impl Power {
    pub fn is_powered(self) -> bool {
        self != Power::NoPower
    }

    /// 从 u8 还原（用于原子存储），未知值视为 NoPower
    pub fn from_u8(value: u8) -> Self {
        match value {
            1 => Power::HalfPower,
            2 => Power::FullPower,
            _ => Power::NoPower,
        }
    }
}

/// 限位开关（Trailer1 = 负方向极限，Trailer2 = 正方向极限）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TrailerId {
    Trailer1,
    Trailer2,
}

impl TrailerId {
    pub fn opposite(self) -> Self {
        match self {
            TrailerId::Trailer1 => TrailerId::Trailer2,
            TrailerId::Trailer2 => TrailerId::Trailer1,
        }
    }
}

impl fmt::Display for TrailerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrailerId::Trailer1 => f.write_str("trailer #1"),
            TrailerId::Trailer2 => f.write_str("trailer #2"),
        }
    }
}

/// 仪器工作模式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum InstrumentMode {
    #[default]
    Off,
    Prepare,
    Full,
}

/// 连接方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DeviceConnectionType {
    SerialPort,
}

/// 串口校验位
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SerialPortParity {
    #[default]
    No,
    Odd,
    Even,
    Mark,
    Space,
}

/// 串口连接参数
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SerialPortParams {
    pub port: u8,
    pub baud_rate: u32,
    pub parity: SerialPortParity,
}

impl Default for SerialPortParams {
    fn default() -> Self {
        Self {
            port: 1,
            baud_rate: 9600,
            parity: SerialPortParity::No,
        }
    }
}

/// 连接参数
///
/// 设备层只做透传，具体含义由后端解释。
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DeviceConnectionParams {
    SerialPort(SerialPortParams),
}

impl DeviceConnectionParams {
    pub fn connection_type(&self) -> DeviceConnectionType {
        match self {
            DeviceConnectionParams::SerialPort(_) => DeviceConnectionType::SerialPort,
        }
    }
}

impl Default for DeviceConnectionParams {
    fn default() -> Self {
        DeviceConnectionParams::SerialPort(SerialPortParams::default())
    }
}

impl fmt::Display for DeviceConnectionParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeviceConnectionParams::SerialPort(prms) => write!(
                f,
                "COM{}:{}/{:?}",
                prms.port, prms.baud_rate, prms.parity
            ),
        }
    }
}
