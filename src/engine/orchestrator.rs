// ==========================================
// SEFG 401(K) 季报生成系统 - 批量编排器
// ==========================================
// 职责: 先重建空文档,再按阶段优先顺序推进整批客户
// 红线: 每阶段每客户落盘一次,失败即停,不回滚已写文件
// ==========================================

use std::fs;
use std::path::Path;

use tracing::{debug, info};

use crate::document::{DocumentError, ReportDocument, write_docx};
use crate::domain::{ClientIdentity, PathStyle, ReportPeriod};
use crate::engine::assembler::{ReportAssembler, ReportInputs, Stage};
use crate::engine::error::{AssembleError, AssembleResult};
use crate::engine::path_builder::{build_report_path, client_folder, report_title};

// ==========================================
// 单客户报告 (Client Report)
// ==========================================
// document 在整批运行期间由编排器独占,逐阶段累积
#[derive(Debug)]
pub struct ClientReport {
    pub client: ClientIdentity,
    /// 客户子目录完整路径
    pub folder: String,
    /// 输出文件完整路径
    pub path: String,
    /// 文档标题,即文件名去扩展名
    pub title: String,
    pub document: ReportDocument,
}

impl ClientReport {
    pub fn new(
        client: ClientIdentity,
        output_root: &str,
        style: PathStyle,
        period: ReportPeriod,
    ) -> Self {
        let path = build_report_path(output_root, style, period, &client);
        let title = report_title(&path, style);
        let folder = format!(
            "{}{}{}",
            output_root,
            style.separator(),
            client_folder(&client)
        );
        ClientReport {
            client,
            folder,
            path,
            title,
            document: ReportDocument::new(),
        }
    }
}

// ==========================================
// 批量编排器 (Batch Orchestrator)
// ==========================================
pub struct BatchOrchestrator<'a> {
    assembler: ReportAssembler<'a>,
}

impl<'a> BatchOrchestrator<'a> {
    pub fn new(inputs: &'a ReportInputs) -> Self {
        BatchOrchestrator {
            assembler: ReportAssembler::new(inputs),
        }
    }

    /// 执行整批装配
    ///
    /// 阶段优先: 同一阶段先施加到全部客户,再进入下一阶段;
    /// 每次施加后立即落盘,任一写出失败立即终止整批
    pub fn run(&self, reports: &mut [ClientReport]) -> AssembleResult<()> {
        prepare_output_files(reports)?;

        for (step, stage) in Stage::PIPELINE.iter().enumerate() {
            info!(
                step = step + 1,
                stage = stage.name(),
                clients = reports.len(),
                "执行装配阶段"
            );
            for report in reports.iter_mut() {
                self.assembler
                    .apply_stage(*stage, &report.client, &report.title, &mut report.document);
                write_docx(&report.document, Path::new(&report.path)).map_err(|source| {
                    AssembleError::StageWrite {
                        stage: stage.name(),
                        client: report.client.last_first(),
                        source,
                    }
                })?;
            }
        }

        info!(clients = reports.len(), "整批装配完成");
        Ok(())
    }
}

/// 清空并重建每个客户的输出文件,目录不存在时一并创建
fn prepare_output_files(reports: &[ClientReport]) -> AssembleResult<()> {
    for report in reports {
        fs::create_dir_all(&report.folder)
            .map_err(DocumentError::from)
            .and_then(|_| write_docx(&ReportDocument::new(), Path::new(&report.path)))
            .map_err(|source| AssembleError::Prepare {
                client: report.client.last_first(),
                source,
            })?;
        debug!(file = %report.path, "输出文件已重建");
    }
    Ok(())
}
