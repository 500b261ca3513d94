// ==========================================
// SEFG 401(K) 季报生成系统 - 配置层错误类型
// ==========================================
// 工具: thiserror 派生宏
// ==========================================

use thiserror::Error;

/// 配置层错误类型
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("配置文件不存在: {0}")]
    FileNotFound(String),

    #[error("配置文件读取失败: {0}")]
    FileReadError(#[from] std::io::Error),

    #[error("配置文件解析失败: {0}")]
    ParseError(#[from] serde_json::Error),

    /// 必填字段缺失,字段名沿用运行表单的展示名
    #[error("缺少必填字段: {}", .0.join(", "))]
    MissingFields(Vec<String>),

    #[error("字段取值非法: {field} = {value}")]
    InvalidValue { field: &'static str, value: String },
}

/// Result 类型别名
pub type ConfigResult<T> = Result<T, ConfigError>;
