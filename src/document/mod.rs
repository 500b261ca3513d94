// ==========================================
// SEFG 401(K) 季报生成系统 - 文档层
// ==========================================
// 职责: 文档对象模型 + .docx 读写
// 红线: 不含业务规则,装配逻辑在 engine 层
// ==========================================

pub mod docx;
pub mod error;
pub mod model;

// 重导出核心类型
pub use docx::{docx_bytes, read_paragraphs, write_docx};
pub use error::{DocumentError, DocumentResult};
pub use model::{
    Block, Highlight, ImageContent, ImageFormat, ListKind, PageMargins, Paragraph,
    ReportDocument, RichRun, RunStyle, TableSpec, VertAlign, inches_to_emu, inches_to_twips,
};
