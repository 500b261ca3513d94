// ==========================================
// SEFG 401(K) 季报生成系统 - 引擎层
// ==========================================
// 职责: 行选择、路径构造、文档装配与批量编排
// 红线: 引擎不读配置文件,素材由应用层装载后传入
// ==========================================

pub mod assembler;
pub mod error;
pub mod orchestrator;
pub mod path_builder;
pub mod selector;

// 重导出核心类型
pub use assembler::{ReportAssembler, ReportInputs, Stage};
pub use error::{AssembleError, AssembleResult};
pub use orchestrator::{BatchOrchestrator, ClientReport};
pub use path_builder::{build_report_path, client_folder, report_file_name, report_title};
pub use selector::{RowSelection, select_rows};
