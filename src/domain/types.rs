// ==========================================
// SEFG 401(K) 季报生成系统 - 领域类型定义
// ==========================================

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 路径风格 (Path Style)
// ==========================================
// 决定输出路径的分隔符,不决定路径是否在当前系统合法
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum PathStyle {
    #[serde(alias = "Windows", alias = "WINDOWS")]
    Windows, // 反斜杠分隔
    #[serde(alias = "Mac", alias = "MAC")]
    Mac, // 正斜杠分隔
}

impl PathStyle {
    /// 该风格使用的路径分隔符
    pub fn separator(&self) -> char {
        match self {
            PathStyle::Windows => '\\',
            PathStyle::Mac => '/',
        }
    }
}

impl fmt::Display for PathStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathStyle::Windows => write!(f, "WINDOWS"),
            PathStyle::Mac => write!(f, "MAC"),
        }
    }
}

// ==========================================
// 报告期 (Report Period)
// ==========================================
// 年度 + 季度,展示格式固定为 "{year} Q{quarter}"
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ReportPeriod {
    pub year: u16,
    pub quarter: u8,
}

impl ReportPeriod {
    pub const MIN_YEAR: u16 = 2000;
    pub const MAX_YEAR: u16 = 2100;

    /// 构造报告期,越界返回 None
    pub fn new(year: u16, quarter: u8) -> Option<Self> {
        if !(Self::MIN_YEAR..=Self::MAX_YEAR).contains(&year) {
            return None;
        }
        if !(1..=4).contains(&quarter) {
            return None;
        }
        Some(ReportPeriod { year, quarter })
    }
}

impl fmt::Display for ReportPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} Q{}", self.year, self.quarter)
    }
}
