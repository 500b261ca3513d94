// ==========================================
// SEFG 401(K) 季报生成系统 - 领域模型层
// ==========================================
// 职责: 定义客户、内容归属、报告期等领域实体与值类型
// 红线: 不含文件解析逻辑,不含文档渲染逻辑
// ==========================================

pub mod client;
pub mod content;
pub mod types;

// 重导出核心类型
pub use client::ClientIdentity;
pub use content::{GlanceTable, OwnedRow, OwnedTable, Owner};
pub use types::{PathStyle, ReportPeriod};
