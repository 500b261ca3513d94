// ==========================================
// SEFG 401(K) 季报生成系统 - 配置层
// ==========================================
// 职责: 运行配置的装载、叠加与校验
// 来源: JSON 配置文件 + 命令行旗标覆写
// ==========================================

pub mod error;
pub mod run_config;

// 重导出核心配置类型
pub use error::{ConfigError, ConfigResult};
pub use run_config::{RunConfig, ValidatedConfig};
