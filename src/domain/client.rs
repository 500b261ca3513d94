// ==========================================
// SEFG 401(K) 季报生成系统 - 客户身份
// ==========================================
// 职责: 客户名的规范化、展示与大小写不敏感匹配
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

/// 大小写折叠,用于名称比较
pub(crate) fn fold(s: &str) -> String {
    s.to_lowercase()
}

// ==========================================
// 客户身份 (Client Identity)
// ==========================================
// 以 (姓, 名) 唯一标识一位客户,字段在构造时去除首尾空白
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ClientIdentity {
    pub last: String,
    pub first: String,
}

impl ClientIdentity {
    pub fn new(first: &str, last: &str) -> Self {
        ClientIdentity {
            last: last.trim().to_string(),
            first: first.trim().to_string(),
        }
    }

    /// 名称匹配,大小写不敏感,空白已在构造时剥离
    pub fn matches_name(&self, first: &str, last: &str) -> bool {
        fold(&self.first) == fold(first.trim()) && fold(&self.last) == fold(last.trim())
    }

    /// 展示格式 "姓, 名",与输出目录命名一致
    pub fn last_first(&self) -> String {
        format!("{}, {}", self.last, self.first)
    }
}

impl fmt::Display for ClientIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.last_first())
    }
}
