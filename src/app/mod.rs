// ==========================================
// SEFG 401(K) 季报生成系统 - 应用层
// ==========================================
// 职责: 配置定型后的批量运行入口与预检
// ==========================================

pub mod error;
pub mod runner;

// 重导出
pub use error::{RunError, RunResult};
pub use runner::{CheckReport, ReportRunner, RunReport};
