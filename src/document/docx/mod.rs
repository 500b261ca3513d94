// ==========================================
// SEFG 401(K) 季报生成系统 - OOXML 封装
// ==========================================
// 职责: 文档对象模型与 .docx 包之间的序列化/反序列化
// ==========================================

pub mod read;
pub mod write;
pub mod xml;

pub use read::read_paragraphs;
pub use write::{docx_bytes, write_docx};
