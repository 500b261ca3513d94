// ==========================================
// SEFG 401(K) 季报生成系统 - 导入层
// ==========================================
// 职责: 外部数据装载,生成领域模型
// 支持: Excel, CSV
// ==========================================

// 模块声明
pub mod content;
pub mod error;
pub mod file_parser;
pub mod roster;

// 重导出核心类型
pub use content::{load_general_items, load_glance_table, load_owned_table};
pub use error::{ImportError, ImportResult};
pub use file_parser::{CsvParser, ExcelParser, RawRow, RawTable, TableParser, UniversalFileParser};
pub use roster::load_roster;

// ===== 各输入文件的固定列名 =====
pub const FIRST_NAME_COLUMN: &str = "First Name";
pub const LAST_NAME_COLUMN: &str = "Last Name";
pub const GENERAL_ITEMS_COLUMN: &str = "General Items";
