// ==========================================
// SEFG 401(K) 季报生成系统 - 运行器
// ==========================================
// 职责: 装载素材与名单,构建客户报告集,交由编排器执行
// 红线: 任何素材装载失败都在写盘开始前终止
// ==========================================

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::app::error::RunResult;
use crate::config::ValidatedConfig;
use crate::document::{ImageContent, read_paragraphs};
use crate::domain::{PathStyle, ReportPeriod};
use crate::engine::{BatchOrchestrator, ClientReport, ReportInputs};
use crate::importer::{load_general_items, load_glance_table, load_owned_table, load_roster};

/// 页眉页脚图片的版面尺寸 (英寸)
const IMAGE_WIDTH_IN: f64 = 7.83;
const IMAGE_HEIGHT_IN: f64 = 1.06;

// ==========================================
// 运行结果 (Run Report)
// ==========================================
#[derive(Debug, Serialize)]
pub struct RunReport {
    pub run_id: Uuid,
    pub period: ReportPeriod,
    pub output_root: String,
    pub path_style: PathStyle,
    pub clients: usize,
    /// 本次写出的全部报告路径,按客户排序
    pub files: Vec<String>,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

// ==========================================
// 预检结果 (Check Report)
// ==========================================
// 只装载校验,不写任何文件
#[derive(Debug, Serialize)]
pub struct CheckReport {
    pub period: ReportPeriod,
    pub clients: usize,
    pub requirement_rows: usize,
    pub general_item_rows: usize,
    pub glance_rows: usize,
    pub in_brief_paragraphs: usize,
    pub fine_print_paragraphs: usize,
}

// ==========================================
// 运行器 (Report Runner)
// ==========================================
pub struct ReportRunner {
    config: ValidatedConfig,
}

impl ReportRunner {
    pub fn new(config: ValidatedConfig) -> Self {
        ReportRunner { config }
    }

    /// 执行一次完整批量运行
    pub fn run(&self) -> RunResult<RunReport> {
        let run_id = Uuid::new_v4();
        let started_at = Utc::now();
        info!(
            run_id = %run_id,
            period = %self.config.period,
            style = %self.config.path_style,
            root = %self.config.output_root,
            "批量生成开始"
        );

        let inputs = self.load_inputs()?;
        let clients = load_roster(&self.config.clients_file)?;
        if clients.is_empty() {
            warn!(
                file = %self.config.clients_file.display(),
                "客户名单为空,本次运行不产出文件"
            );
        }

        let mut reports: Vec<ClientReport> = clients
            .into_iter()
            .map(|client| {
                ClientReport::new(
                    client,
                    &self.config.output_root,
                    self.config.path_style,
                    self.config.period,
                )
            })
            .collect();

        let orchestrator = BatchOrchestrator::new(&inputs);
        orchestrator.run(&mut reports)?;

        let finished_at = Utc::now();
        info!(run_id = %run_id, files = reports.len(), "批量生成完成");

        Ok(RunReport {
            run_id,
            period: self.config.period,
            output_root: self.config.output_root.clone(),
            path_style: self.config.path_style,
            clients: reports.len(),
            files: reports.into_iter().map(|r| r.path).collect(),
            started_at,
            finished_at,
        })
    }

    /// 预检: 装载全部素材与名单但不写盘
    pub fn check(&self) -> RunResult<CheckReport> {
        let inputs = self.load_inputs()?;
        let clients = load_roster(&self.config.clients_file)?;
        info!(clients = clients.len(), "预检通过,素材齐备");

        Ok(CheckReport {
            period: self.config.period,
            clients: clients.len(),
            requirement_rows: inputs.requirements.len(),
            general_item_rows: inputs.general_items.len(),
            glance_rows: inputs.glance.rows.len(),
            in_brief_paragraphs: inputs.in_brief.len(),
            fine_print_paragraphs: inputs.fine_print.len(),
        })
    }

    /// 装载整批共享素材
    fn load_inputs(&self) -> RunResult<ReportInputs> {
        let in_brief = read_paragraphs(&self.config.in_brief_file)?;
        let fine_print = read_paragraphs(&self.config.fine_print_file)?;
        let requirements = load_owned_table(&self.config.requirements_file)?;
        let general_items = load_general_items(&self.config.general_items_file)?;
        let glance = load_glance_table(&self.config.at_a_glance_file)?;
        let header_image =
            ImageContent::from_file(&self.config.header_image, IMAGE_WIDTH_IN, IMAGE_HEIGHT_IN)?;
        let footer_image =
            ImageContent::from_file(&self.config.footer_image, IMAGE_WIDTH_IN, IMAGE_HEIGHT_IN)?;

        Ok(ReportInputs {
            period: self.config.period,
            in_brief,
            fine_print,
            requirements,
            general_items,
            glance,
            header_image,
            footer_image,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::error::RunError;
    use crate::document::{Paragraph, ReportDocument, write_docx};
    use crate::importer::ImportError;
    use std::fs;
    use std::path::{Path, PathBuf};

    fn write_boilerplate(path: &Path, text: &str) {
        let mut document = ReportDocument::new();
        document.push_paragraph(Paragraph::from_text(text));
        write_docx(&document, path).unwrap();
    }

    fn fixture_config(dir: &Path) -> ValidatedConfig {
        fs::write(
            dir.join("clients.csv"),
            "First Name,Last Name\nJohn,Smith\nAmy,Brown\nJohn,Smith\n",
        )
        .unwrap();
        fs::write(
            dir.join("requirements.csv"),
            "First Name,Last Name,Requirement,Due Date\n\
             All,All,Annual Notice,Oct 15\n\
             John,Smith,Rebalance,Nov 1\n",
        )
        .unwrap();
        fs::write(
            dir.join("general_items.csv"),
            "First Name,Last Name,General Items\nAll,All,Review beneficiaries\n",
        )
        .unwrap();
        fs::write(
            dir.join("at_a_glance.csv"),
            "Fund,Growth\nS&P 500,10.6\n",
        )
        .unwrap();
        write_boilerplate(&dir.join("in_brief.docx"), "Quarterly market overview.");
        write_boilerplate(&dir.join("fine_print.docx"), "Values are approximate.");
        fs::write(dir.join("header.png"), [0x89, 0x50, 0x4E, 0x47]).unwrap();
        fs::write(dir.join("footer.png"), [0x89, 0x50, 0x4E, 0x47]).unwrap();

        ValidatedConfig {
            period: ReportPeriod::new(2024, 2).unwrap(),
            output_root: dir.join("out").display().to_string(),
            path_style: PathStyle::Mac,
            clients_file: dir.join("clients.csv"),
            in_brief_file: dir.join("in_brief.docx"),
            requirements_file: dir.join("requirements.csv"),
            general_items_file: dir.join("general_items.csv"),
            at_a_glance_file: dir.join("at_a_glance.csv"),
            fine_print_file: dir.join("fine_print.docx"),
            header_image: dir.join("header.png"),
            footer_image: dir.join("footer.png"),
        }
    }

    #[test]
    fn test_run_produces_report_per_distinct_client() {
        let dir = tempfile::tempdir().unwrap();
        let config = fixture_config(dir.path());
        let runner = ReportRunner::new(config);

        let report = runner.run().unwrap();

        // 名单含重复行,去重后两位客户,按姓氏排序
        assert_eq!(report.clients, 2);
        assert_eq!(report.files.len(), 2);
        assert!(report.files[0].ends_with(
            "Brown, Amy/2024 Q2 Brown, Amy - 401(K) Preliminary Report.docx"
        ));
        assert!(report.files[1].ends_with(
            "Smith, John/2024 Q2 Smith, John - 401(K) Preliminary Report.docx"
        ));
        for file in &report.files {
            assert!(Path::new(file).exists(), "缺少输出文件: {file}");
        }
        assert!(report.finished_at >= report.started_at);
    }

    #[test]
    fn test_check_reports_material_counts() {
        let dir = tempfile::tempdir().unwrap();
        let config = fixture_config(dir.path());
        let runner = ReportRunner::new(config);

        let check = runner.check().unwrap();

        assert_eq!(check.clients, 2);
        assert_eq!(check.requirement_rows, 2);
        assert_eq!(check.general_item_rows, 1);
        assert_eq!(check.glance_rows, 1);
        assert_eq!(check.in_brief_paragraphs, 1);
        assert_eq!(check.fine_print_paragraphs, 1);
        assert!(!dir.path().join("out").exists());
    }

    #[test]
    fn test_missing_material_fails_before_any_write() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = fixture_config(dir.path());
        config.requirements_file = PathBuf::from(dir.path().join("absent.csv"));
        let runner = ReportRunner::new(config);

        let err = runner.run().unwrap_err();
        assert!(matches!(err, RunError::Import(ImportError::FileNotFound(_))));
        assert!(!dir.path().join("out").exists());
    }

    #[test]
    fn test_empty_roster_succeeds_with_no_files() {
        let dir = tempfile::tempdir().unwrap();
        let config = fixture_config(dir.path());
        fs::write(dir.path().join("clients.csv"), "First Name,Last Name\n").unwrap();
        let runner = ReportRunner::new(config);

        let report = runner.run().unwrap();
        assert_eq!(report.clients, 0);
        assert!(report.files.is_empty());
    }
}
