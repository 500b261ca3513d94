// ==========================================
// SEFG 401(K) 季报生成系统 - 运行配置
// ==========================================
// 职责: 收集一次批量运行的全部输入项并在装配前整体校验
// 叠加序: 配置文件在先,命令行旗标在后覆写
// ==========================================

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::config::error::{ConfigError, ConfigResult};
use crate::domain::{PathStyle, ReportPeriod};

/// 输出根目录默认名
pub const DEFAULT_OUTPUT_ROOT: &str = "401K_Report_Output_Files";

// ==========================================
// 运行配置 (Run Config)
// ==========================================
// 全字段可缺省,便于文件与旗标分别给出一部分再叠加
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    pub year: Option<u16>,

    pub quarter: Option<u8>,

    /// 输出根目录名,缺省时用 DEFAULT_OUTPUT_ROOT
    #[serde(alias = "outer_folder_name")]
    pub output_root: Option<String>,

    /// 输出路径风格,缺省时用 windows
    #[serde(alias = "os_selection")]
    pub path_style: Option<PathStyle>,

    /// 客户名单表 (xlsx/csv)
    pub clients_file: Option<PathBuf>,

    /// 摘要样板文档 (docx)
    pub in_brief_file: Option<PathBuf>,

    /// 要求表 (xlsx/csv)
    pub requirements_file: Option<PathBuf>,

    /// 一般事项表 (xlsx/csv)
    pub general_items_file: Option<PathBuf>,

    /// 概览表 (xlsx/csv)
    pub at_a_glance_file: Option<PathBuf>,

    /// 概览附注样板文档 (docx)
    pub fine_print_file: Option<PathBuf>,

    /// 页眉图片 (png/jpg)
    pub header_image: Option<PathBuf>,

    /// 页脚图片 (png/jpg)
    pub footer_image: Option<PathBuf>,
}

impl RunConfig {
    /// 从 JSON 文件装载
    pub fn from_json_file(path: &Path) -> ConfigResult<Self> {
        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.display().to_string()));
        }
        let text = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }

    /// 叠加另一份配置,other 中已给出的字段优先
    pub fn overlay(self, other: RunConfig) -> RunConfig {
        RunConfig {
            year: other.year.or(self.year),
            quarter: other.quarter.or(self.quarter),
            output_root: other.output_root.or(self.output_root),
            path_style: other.path_style.or(self.path_style),
            clients_file: other.clients_file.or(self.clients_file),
            in_brief_file: other.in_brief_file.or(self.in_brief_file),
            requirements_file: other.requirements_file.or(self.requirements_file),
            general_items_file: other.general_items_file.or(self.general_items_file),
            at_a_glance_file: other.at_a_glance_file.or(self.at_a_glance_file),
            fine_print_file: other.fine_print_file.or(self.fine_print_file),
            header_image: other.header_image.or(self.header_image),
            footer_image: other.footer_image.or(self.footer_image),
        }
    }

    /// 枚举缺失的必填字段,名称沿用运行表单的展示名
    ///
    /// 输出根与路径风格有默认值,只有显式给空的输出根才算缺失
    pub fn missing_fields(&self) -> Vec<String> {
        let mut missing = Vec::new();

        if self.year.is_none() {
            missing.push("Year".to_string());
        }
        if self.quarter.is_none() {
            missing.push("Quarter".to_string());
        }
        if matches!(&self.output_root, Some(root) if root.trim().is_empty()) {
            missing.push("Outer Folder Name".to_string());
        }

        let files = [
            (&self.clients_file, "Clients List File"),
            (&self.in_brief_file, "In Brief File"),
            (&self.requirements_file, "Requirements File"),
            (&self.general_items_file, "General Items File"),
            (&self.at_a_glance_file, "At A Glance Excel File"),
            (&self.fine_print_file, "At A Glance Fine Print"),
            (&self.header_image, "Header Image"),
            (&self.footer_image, "Footer Image"),
        ];
        for (value, display_name) in files {
            let absent = match value {
                None => true,
                Some(path) => path.as_os_str().is_empty(),
            };
            if absent {
                missing.push(display_name.to_string());
            }
        }

        missing
    }

    /// 整体校验,全部通过后补默认值并定型
    pub fn validate(self) -> ConfigResult<ValidatedConfig> {
        let missing = self.missing_fields();
        if !missing.is_empty() {
            return Err(ConfigError::MissingFields(missing));
        }

        // missing_fields 已确认 year/quarter 均在
        let year = self.year.ok_or(ConfigError::InvalidValue {
            field: "Year",
            value: String::new(),
        })?;
        let quarter = self.quarter.ok_or(ConfigError::InvalidValue {
            field: "Quarter",
            value: String::new(),
        })?;
        let period = match ReportPeriod::new(year, quarter) {
            Some(period) => period,
            None if !(ReportPeriod::MIN_YEAR..=ReportPeriod::MAX_YEAR).contains(&year) => {
                return Err(ConfigError::InvalidValue {
                    field: "Year",
                    value: year.to_string(),
                });
            }
            None => {
                return Err(ConfigError::InvalidValue {
                    field: "Quarter",
                    value: quarter.to_string(),
                });
            }
        };

        Ok(ValidatedConfig {
            period,
            output_root: self
                .output_root
                .unwrap_or_else(|| DEFAULT_OUTPUT_ROOT.to_string()),
            path_style: self.path_style.unwrap_or(PathStyle::Windows),
            clients_file: self.clients_file.unwrap_or_default(),
            in_brief_file: self.in_brief_file.unwrap_or_default(),
            requirements_file: self.requirements_file.unwrap_or_default(),
            general_items_file: self.general_items_file.unwrap_or_default(),
            at_a_glance_file: self.at_a_glance_file.unwrap_or_default(),
            fine_print_file: self.fine_print_file.unwrap_or_default(),
            header_image: self.header_image.unwrap_or_default(),
            footer_image: self.footer_image.unwrap_or_default(),
        })
    }
}

// ==========================================
// 定型配置 (Validated Config)
// ==========================================
// 校验通过后的不可缺省视图,供应用层直接使用
#[derive(Debug, Clone)]
pub struct ValidatedConfig {
    pub period: ReportPeriod,
    pub output_root: String,
    pub path_style: PathStyle,
    pub clients_file: PathBuf,
    pub in_brief_file: PathBuf,
    pub requirements_file: PathBuf,
    pub general_items_file: PathBuf,
    pub at_a_glance_file: PathBuf,
    pub fine_print_file: PathBuf,
    pub header_image: PathBuf,
    pub footer_image: PathBuf,
}
