// ==========================================
// SEFG 401(K) 季报生成系统 - 文档模块错误类型
// ==========================================
// 工具: thiserror 派生宏
// ==========================================

use thiserror::Error;

/// 文档模块错误类型
#[derive(Error, Debug)]
pub enum DocumentError {
    // ===== 文件相关错误 =====
    #[error("文件不存在: {0}")]
    FileNotFound(String),

    #[error("文档 IO 失败: {0}")]
    Io(String),

    #[error("文档包操作失败: {0}")]
    Package(String),

    #[error("文档包缺少部件 \"{part}\"（文件 {file}）")]
    MissingPart { file: String, part: String },

    // ===== 内容相关错误 =====
    #[error("文档 XML 解析失败: {0}")]
    Xml(String),

    #[error("图片格式不支持: {0}（仅支持 .png/.jpg/.jpeg）")]
    UnsupportedImage(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

// 实现 From<std::io::Error>
impl From<std::io::Error> for DocumentError {
    fn from(err: std::io::Error) -> Self {
        DocumentError::Io(err.to_string())
    }
}

// 实现 From<zip::result::ZipError>
impl From<zip::result::ZipError> for DocumentError {
    fn from(err: zip::result::ZipError) -> Self {
        DocumentError::Package(err.to_string())
    }
}

// 实现 From<quick_xml::Error>
impl From<quick_xml::Error> for DocumentError {
    fn from(err: quick_xml::Error) -> Self {
        DocumentError::Xml(err.to_string())
    }
}

/// Result 类型别名
pub type DocumentResult<T> = Result<T, DocumentError>;
