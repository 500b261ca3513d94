// ==========================================
// SEFG 401(K) 季报生成系统 - 内容归属模型
// ==========================================
// 职责: 带归属标记的内容行/表,归属在装载时解析一次
// 红线: 行序必须保持源文件顺序,任何环节不得重排
// ==========================================

use crate::domain::client::{fold, ClientIdentity};
use serde::{Deserialize, Serialize};

// ==========================================
// 归属 (Owner)
// ==========================================
// 内容行要么面向全体客户,要么面向指定客户
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Owner {
    AllClients,
    Specific { first: String, last: String },
}

impl Owner {
    /// 从名/姓两个原始单元格解析归属
    ///
    /// 哨兵组合 (大小写不敏感,空白剥离后):
    /// - "all" / "all"
    /// - "all" / 空
    /// - 空 / "all"
    ///
    /// 两格均为空不构成哨兵,按具体客户处理
    pub fn parse(first: &str, last: &str) -> Self {
        let f = fold(first.trim());
        let l = fold(last.trim());
        let f_all = f == "all";
        let l_all = l == "all";
        if (f_all && l_all) || (f_all && l.is_empty()) || (f.is_empty() && l_all) {
            Owner::AllClients
        } else {
            Owner::Specific {
                first: first.trim().to_string(),
                last: last.trim().to_string(),
            }
        }
    }

    pub fn is_all_clients(&self) -> bool {
        matches!(self, Owner::AllClients)
    }

    /// 该行是否应出现在给定客户的报告中
    pub fn applies_to(&self, client: &ClientIdentity) -> bool {
        match self {
            Owner::AllClients => true,
            Owner::Specific { first, last } => client.matches_name(first, last),
        }
    }
}

// ==========================================
// 归属行 / 归属表 (Owned Row / Owned Table)
// ==========================================
// row_number 为源文件中的数据行号 (1 起),仅用于诊断信息
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OwnedRow {
    pub owner: Owner,
    pub cells: Vec<String>,
    pub row_number: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct OwnedTable {
    pub headers: Vec<String>,
    pub rows: Vec<OwnedRow>,
}

impl OwnedTable {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// 按表头精确查找列下标,表头在装载时已剥离空白
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }
}

// ==========================================
// 速览表 (At-A-Glance Table)
// ==========================================
// 展示用百分比表,数据单元格在装载时已追加 "%" 后缀
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GlanceTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl GlanceTable {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
