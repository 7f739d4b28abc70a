// ==========================================
// 多仓库存分析系统 - 领域类型定义
// ==========================================

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

// ==========================================
// ABC 流速分级 (Classification)
// ==========================================
// 红线: 未识别的非空文字原样保留,不强制归入 "Sin Mov"
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Classification {
    A,             // 快速流转
    B,             // 次快流转
    C,             // 慢速流转
    SinMov,        // 无动销 ("Sin Mov")
    Other(String), // 其他文字原样透传
}

impl Classification {
    /// 从原始单元格文字解析分级
    ///
    /// 规则:
    /// - 去首尾空白; 空白 → SinMov
    /// - "A"/"B"/"C" 区分大小写,精确命中
    /// - "Sin Mov" 精确命中
    /// - 其余非空文字原样保留 (Other)
    pub fn parse(raw: &str) -> Self {
        match raw.trim() {
            "" => Classification::SinMov,
            "A" => Classification::A,
            "B" => Classification::B,
            "C" => Classification::C,
            "Sin Mov" => Classification::SinMov,
            other => Classification::Other(other.to_string()),
        }
    }

    /// 高流速分级 (A/B): 值得保供,是调拨的接收方资格
    pub fn is_fast_mover(&self) -> bool {
        matches!(self, Classification::A | Classification::B)
    }

    /// 低流速分级 (C/Sin Mov): 是调拨的捐出方资格
    pub fn is_slow_mover(&self) -> bool {
        matches!(self, Classification::C | Classification::SinMov)
    }

    pub fn as_str(&self) -> &str {
        match self {
            Classification::A => "A",
            Classification::B => "B",
            Classification::C => "C",
            Classification::SinMov => "Sin Mov",
            Classification::Other(s) => s,
        }
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// 序列化口径与表格文字一致 ("Sin Mov" 等字面量),故手写而非派生
impl Serialize for Classification {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Classification {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(Classification::parse(&s))
    }
}
