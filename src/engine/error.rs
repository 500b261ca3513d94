// ==========================================
// SEFG 401(K) 季报生成系统 - 装配模块错误类型
// ==========================================
// 工具: thiserror 派生宏
// ==========================================

use crate::document::DocumentError;
use thiserror::Error;

/// 装配模块错误类型
#[derive(Error, Debug)]
pub enum AssembleError {
    #[error("准备输出文件失败 (客户 {client}): {source}")]
    Prepare {
        client: String,
        #[source]
        source: DocumentError,
    },

    #[error("阶段 {stage} 写出失败 (客户 {client}): {source}")]
    StageWrite {
        stage: &'static str,
        client: String,
        #[source]
        source: DocumentError,
    },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result 类型别名
pub type AssembleResult<T> = Result<T, AssembleError>;
