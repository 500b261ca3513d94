// ==========================================
// SEFG 401(K) 季报生成系统 - 核心库
// ==========================================
// 用途: 按季度为每位客户批量生成 401(K) 初步报告
// 流程: 配置校验 -> 素材装载 -> 逐阶段装配 -> 逐阶段落盘
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 导入层 - 表格与名单装载
pub mod importer;

// 文档层 - docx 读写
pub mod document;

// 引擎层 - 选行、路径、装配与编排
pub mod engine;

// 配置层 - 运行配置
pub mod config;

// 应用层 - 批量运行入口
pub mod app;

// 命令行界面
pub mod cli;

// 日志系统
pub mod logging;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::{ClientIdentity, GlanceTable, Owner, OwnedRow, OwnedTable, PathStyle, ReportPeriod};

// 配置
pub use config::{RunConfig, ValidatedConfig};

// 引擎
pub use engine::{BatchOrchestrator, ClientReport, ReportAssembler, ReportInputs, Stage};

// 应用入口
pub use app::{CheckReport, ReportRunner, RunError, RunReport, RunResult};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "SEFG 401(K) Report Writer";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
