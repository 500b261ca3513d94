// ==========================================
// SEFG 401(K) 季报生成系统 - 应用层错误类型
// ==========================================
// 职责: 聚合配置、导入、文档、装配各层错误
// ==========================================

use thiserror::Error;

use crate::config::ConfigError;
use crate::document::DocumentError;
use crate::engine::AssembleError;
use crate::importer::ImportError;

/// 应用层错误类型,一次运行只携带首个失败
#[derive(Error, Debug)]
pub enum RunError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("数据导入失败: {0}")]
    Import(#[from] ImportError),

    #[error("样板装载失败: {0}")]
    Document(#[from] DocumentError),

    #[error(transparent)]
    Assemble(#[from] AssembleError),
}

/// Result 类型别名
pub type RunResult<T> = Result<T, RunError>;
