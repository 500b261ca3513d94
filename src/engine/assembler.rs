// ==========================================
// SEFG 401(K) 季报生成系统 - 文档装配器
// ==========================================
// 职责: 按固定阶段序列向客户报告追加内容块
// 红线: 阶段顺序与文案固定,同一输入必须产出同一文档
// ==========================================

use crate::document::{
    Highlight, ImageContent, ListKind, PageMargins, Paragraph, ReportDocument, RunStyle,
    TableSpec, inches_to_twips,
};
use crate::domain::{ClientIdentity, GlanceTable, OwnedTable, ReportPeriod};
use crate::engine::selector::{RowSelection, select_rows};
use tracing::warn;

/// 正文字体,所有显式样式段落均使用
const BODY_FONT: &str = "Calibri";

/// 表头底色
const HEADER_FILL: &str = "4C61BB";

/// 隔行底色
const BAND_FILL: &str = "F0F0F0";

/// 版心边距 (英寸): 上 0.5 / 下 1.5 / 左 0.5 / 右 0.5
const PAGE_MARGIN_TOP_IN: f64 = 0.5;
const PAGE_MARGIN_BOTTOM_IN: f64 = 1.5;
const PAGE_MARGIN_LEFT_IN: f64 = 0.5;
const PAGE_MARGIN_RIGHT_IN: f64 = 0.5;

/// 页眉距页边 (英寸)
const HEADER_DISTANCE_IN: f64 = 0.1;

/// 要点章节标题
const POINTS_OF_INTEREST_HEADING: &str = "RELEVANT POINTS OF INTEREST";

/// 一般事项章节标题
const GENERAL_ITEMS_HEADING: &str = "GENERAL ITEMS";

/// 要求表缺全体行的警示文案
const NO_ALL_REQUIREMENTS_WARNING: &str = "No Requirement Found That Are To Be Assigned to All \
     Clients. Add Manually Or Rerun The System With an Updated Excel File With Primary \
     Requirements!!";

/// 一般事项缺全体行的警示文案
const NO_ALL_GENERAL_ITEMS_WARNING: &str = "No General Items Found For All Clients. Add Manually \
     Or Rerun The System With an Updated Excel File With Primary Requirements!!";

// ==========================================
// 装配阶段 (Stage)
// ==========================================
// PIPELINE 即执行顺序,编排器按此逐阶段推进并落盘
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// 空行 + 文件名标题
    Title,
    /// 摘要样板文档逐段复制
    InBrief,
    PageBreak,
    /// 要点章节标题
    PointsOfInterest,
    /// 警示 + 要求标题 + 末两列表格
    Requirements,
    RequirementsSpacer,
    /// 章节标题 + 警示 + 编号列表
    GeneralItems,
    /// 版心边距与页眉距
    Margins,
    GlanceSpacer,
    /// 章节标题 + 概览表 + 细字号间隔 + 附注样板
    AtAGlance,
    HeaderImage,
    FooterImage,
}

impl Stage {
    pub const PIPELINE: [Stage; 12] = [
        Stage::Title,
        Stage::InBrief,
        Stage::PageBreak,
        Stage::PointsOfInterest,
        Stage::Requirements,
        Stage::RequirementsSpacer,
        Stage::GeneralItems,
        Stage::Margins,
        Stage::GlanceSpacer,
        Stage::AtAGlance,
        Stage::HeaderImage,
        Stage::FooterImage,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Stage::Title => "title",
            Stage::InBrief => "in_brief",
            Stage::PageBreak => "page_break",
            Stage::PointsOfInterest => "points_of_interest",
            Stage::Requirements => "requirements",
            Stage::RequirementsSpacer => "requirements_spacer",
            Stage::GeneralItems => "general_items",
            Stage::Margins => "margins",
            Stage::GlanceSpacer => "glance_spacer",
            Stage::AtAGlance => "at_a_glance",
            Stage::HeaderImage => "header_image",
            Stage::FooterImage => "footer_image",
        }
    }
}

// ==========================================
// 装配输入 (Report Inputs)
// ==========================================
// 一次批量运行内全体客户共享的已装载素材
#[derive(Debug)]
pub struct ReportInputs {
    pub period: ReportPeriod,
    /// 摘要样板,保留字符样式
    pub in_brief: Vec<Paragraph>,
    /// 概览附注样板,保留字符样式
    pub fine_print: Vec<Paragraph>,
    pub requirements: OwnedTable,
    pub general_items: OwnedTable,
    /// 数据单元格已追加 "%"
    pub glance: GlanceTable,
    pub header_image: ImageContent,
    pub footer_image: ImageContent,
}

// ==========================================
// 文档装配器 (Report Assembler)
// ==========================================
pub struct ReportAssembler<'a> {
    inputs: &'a ReportInputs,
}

impl<'a> ReportAssembler<'a> {
    pub fn new(inputs: &'a ReportInputs) -> Self {
        ReportAssembler { inputs }
    }

    /// 对单客户文档施加一个阶段
    ///
    /// 纯内存追加,不触盘;失败语义只存在于落盘环节
    pub fn apply_stage(
        &self,
        stage: Stage,
        client: &ClientIdentity,
        title: &str,
        document: &mut ReportDocument,
    ) {
        match stage {
            Stage::Title => {
                document.push_blank_line();
                document.push_styled_text(title, title_style());
            }
            Stage::InBrief => {
                document.append_paragraphs(&self.inputs.in_brief);
            }
            Stage::PageBreak => {
                document.push_page_break();
            }
            Stage::PointsOfInterest => {
                document.push_styled_text(POINTS_OF_INTEREST_HEADING, section_heading_style());
            }
            Stage::Requirements => {
                let selection = select_rows(&self.inputs.requirements, client);
                push_selection_warnings(
                    document,
                    &selection,
                    format!(
                        "No Individual Requirements Found For {}. Add Manually!!",
                        client.last_first()
                    ),
                    NO_ALL_REQUIREMENTS_WARNING,
                );
                document.push_styled_text(
                    format!("{} REQUIREMENTS", self.inputs.period),
                    requirements_heading_style(),
                );
                document.push_table(requirements_table(&self.inputs.requirements, &selection));
            }
            Stage::RequirementsSpacer | Stage::GlanceSpacer => {
                document.push_blank_line();
            }
            Stage::GeneralItems => {
                document.push_styled_text(GENERAL_ITEMS_HEADING, section_heading_style());
                let selection = select_rows(&self.inputs.general_items, client);
                push_selection_warnings(
                    document,
                    &selection,
                    format!(
                        "No Individual General Items Found For {}",
                        client.last_first()
                    ),
                    NO_ALL_GENERAL_ITEMS_WARNING,
                );
                for row in &selection.rows {
                    let item = row.cells.first().map(String::as_str).unwrap_or_default();
                    document.push_paragraph(Paragraph {
                        list: Some(ListKind::Numbered),
                        ..Paragraph::from_text(item)
                    });
                }
            }
            Stage::Margins => {
                document.margins = Some(PageMargins::from_inches(
                    PAGE_MARGIN_TOP_IN,
                    PAGE_MARGIN_BOTTOM_IN,
                    PAGE_MARGIN_LEFT_IN,
                    PAGE_MARGIN_RIGHT_IN,
                ));
                document.header_distance = Some(inches_to_twips(HEADER_DISTANCE_IN));
            }
            Stage::AtAGlance => {
                document.push_styled_text(
                    format!("{} AT A GLANCE", self.inputs.period),
                    section_heading_style(),
                );
                document.push_table(TableSpec {
                    headers: self.inputs.glance.headers.clone(),
                    rows: self.inputs.glance.rows.clone(),
                    header_fill: HEADER_FILL.to_string(),
                    band_fill: BAND_FILL.to_string(),
                });
                document.push_styled_text(" ", spacer_style());
                document.append_paragraphs(&self.inputs.fine_print);
            }
            Stage::HeaderImage => {
                document.header_image = Some(self.inputs.header_image.clone());
            }
            Stage::FooterImage => {
                document.footer_image = Some(self.inputs.footer_image.clone());
            }
        }
    }

}

/// 缺项警示,命中全为全体行时提示个人缺项,全体行为零时提示全体缺项,两者可同时出现
fn push_selection_warnings(
    document: &mut ReportDocument,
    selection: &RowSelection<'_>,
    individual_warning: String,
    all_clients_warning: &str,
) {
    if selection.no_individual_rows() {
        warn!(passage = %individual_warning, "选择结果无个人行,文档内插入警示");
        document.push_styled_text(individual_warning, warning_style());
    }
    if selection.no_all_clients_rows() {
        warn!(passage = %all_clients_warning, "选择结果无全体行,文档内插入警示");
        document.push_styled_text(all_clients_warning, warning_style());
    }
}

/// 要求表只保留末两列
fn requirements_table(table: &OwnedTable, selection: &RowSelection<'_>) -> TableSpec {
    let start = table.headers.len().saturating_sub(2);
    TableSpec {
        headers: table.headers.iter().skip(start).cloned().collect(),
        rows: selection
            .rows
            .iter()
            .map(|row| row.cells.iter().skip(start).cloned().collect())
            .collect(),
        header_fill: HEADER_FILL.to_string(),
        band_fill: BAND_FILL.to_string(),
    }
}

/// 报告标题: 22pt 白字加粗,蓝色突显
fn title_style() -> RunStyle {
    RunStyle {
        bold: Some(true),
        font: Some(BODY_FONT.to_string()),
        size_half_points: Some(44),
        color: Some("FFFFFF".to_string()),
        highlight: Some(Highlight::Blue),
        ..RunStyle::default()
    }
}

/// 章节标题: 18pt 品牌蓝加粗
fn section_heading_style() -> RunStyle {
    RunStyle {
        bold: Some(true),
        font: Some(BODY_FONT.to_string()),
        size_half_points: Some(36),
        color: Some(HEADER_FILL.to_string()),
        ..RunStyle::default()
    }
}

/// 要求标题: 16pt 黑字加粗
fn requirements_heading_style() -> RunStyle {
    RunStyle {
        bold: Some(true),
        font: Some(BODY_FONT.to_string()),
        size_half_points: Some(32),
        color: Some("000000".to_string()),
        ..RunStyle::default()
    }
}

/// 缺项警示: 30pt 白字,红色突显,不加粗
fn warning_style() -> RunStyle {
    RunStyle {
        font: Some(BODY_FONT.to_string()),
        size_half_points: Some(60),
        color: Some("FFFFFF".to_string()),
        highlight: Some(Highlight::Red),
        ..RunStyle::default()
    }
}

/// 概览表与附注之间的细字号间隔段
fn spacer_style() -> RunStyle {
    RunStyle {
        font: Some(BODY_FONT.to_string()),
        size_half_points: Some(2),
        color: Some("000000".to_string()),
        ..RunStyle::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{Block, ImageFormat};
    use crate::domain::{OwnedRow, Owner};

    fn owned_row(first: &str, last: &str, cells: &[&str], number: usize) -> OwnedRow {
        OwnedRow {
            owner: Owner::parse(first, last),
            cells: cells.iter().map(|c| c.to_string()).collect(),
            row_number: number,
        }
    }

    fn test_image() -> ImageContent {
        ImageContent {
            bytes: vec![0x89, 0x50, 0x4E, 0x47],
            format: ImageFormat::Png,
            width_emu: 7_159_752,
            height_emu: 969_264,
        }
    }

    fn sample_inputs() -> ReportInputs {
        ReportInputs {
            period: ReportPeriod::new(2024, 3).unwrap(),
            in_brief: vec![Paragraph::from_text("Market recap paragraph.")],
            fine_print: vec![Paragraph::from_text("Values are approximate.")],
            requirements: OwnedTable {
                headers: vec![
                    "First Name".into(),
                    "Last Name".into(),
                    "Requirement".into(),
                    "Due Date".into(),
                ],
                rows: vec![
                    owned_row("all", "all", &["all", "all", "Annual Notice", "Oct 15"], 1),
                    owned_row(
                        "John",
                        "Smith",
                        &["John", "Smith", "Rebalance", "Nov 1"],
                        2,
                    ),
                ],
            },
            general_items: OwnedTable {
                headers: vec!["General Items".into()],
                rows: vec![
                    OwnedRow {
                        owner: Owner::parse("all", "all"),
                        cells: vec!["Review beneficiaries".into()],
                        row_number: 1,
                    },
                    OwnedRow {
                        owner: Owner::parse("John", "Smith"),
                        cells: vec!["Update deferral rate".into()],
                        row_number: 2,
                    },
                ],
            },
            glance: GlanceTable {
                headers: vec!["Fund".into(), "Growth".into()],
                rows: vec![vec!["Vanguard 500%".into(), "12.3%".into()]],
            },
            header_image: test_image(),
            footer_image: test_image(),
        }
    }

    fn assemble_full(inputs: &ReportInputs, client: &ClientIdentity) -> ReportDocument {
        let assembler = ReportAssembler::new(inputs);
        let mut document = ReportDocument::new();
        for stage in Stage::PIPELINE {
            assembler.apply_stage(stage, client, "2024 Q3 Smith, John - Report", &mut document);
        }
        document
    }

    fn paragraph_texts(document: &ReportDocument) -> Vec<String> {
        document.paragraphs().iter().map(|p| p.text()).collect()
    }

    #[test]
    fn test_pipeline_order() {
        let names: Vec<&str> = Stage::PIPELINE.iter().map(|s| s.name()).collect();
        assert_eq!(names.len(), 12);
        assert_eq!(names[0], "title");
        assert_eq!(names[2], "page_break");
        assert_eq!(names[7], "margins");
        assert_eq!(names[11], "footer_image");
    }

    #[test]
    fn test_title_stage_inserts_blank_then_title() {
        let inputs = sample_inputs();
        let assembler = ReportAssembler::new(&inputs);
        let client = ClientIdentity::new("John", "Smith");
        let mut document = ReportDocument::new();
        assembler.apply_stage(Stage::Title, &client, "2024 Q3 Smith, John", &mut document);

        let paragraphs = document.paragraphs();
        assert_eq!(paragraphs.len(), 2);
        assert!(paragraphs[0].runs.is_empty());
        assert_eq!(paragraphs[1].text(), "2024 Q3 Smith, John");
        let style = &paragraphs[1].runs[0].style;
        assert_eq!(style.bold, Some(true));
        assert_eq!(style.size_half_points, Some(44));
        assert_eq!(style.color.as_deref(), Some("FFFFFF"));
        assert_eq!(style.highlight, Some(Highlight::Blue));
    }

    #[test]
    fn test_requirements_stage_keeps_last_two_columns() {
        let inputs = sample_inputs();
        let assembler = ReportAssembler::new(&inputs);
        let client = ClientIdentity::new("John", "Smith");
        let mut document = ReportDocument::new();
        assembler.apply_stage(Stage::Requirements, &client, "", &mut document);

        let table = document
            .blocks
            .iter()
            .find_map(|b| match b {
                Block::Table(t) => Some(t),
                _ => None,
            })
            .unwrap();
        assert_eq!(table.headers, vec!["Requirement", "Due Date"]);
        assert_eq!(
            table.rows,
            vec![
                vec!["Annual Notice".to_string(), "Oct 15".to_string()],
                vec!["Rebalance".to_string(), "Nov 1".to_string()],
            ]
        );
        assert_eq!(table.header_fill, "4C61BB");
        assert_eq!(table.band_fill, "F0F0F0");
    }

    #[test]
    fn test_requirements_heading_without_warnings_for_known_client() {
        let inputs = sample_inputs();
        let assembler = ReportAssembler::new(&inputs);
        let client = ClientIdentity::new("John", "Smith");
        let mut document = ReportDocument::new();
        assembler.apply_stage(Stage::Requirements, &client, "", &mut document);

        let texts = paragraph_texts(&document);
        assert_eq!(texts, vec!["2024 Q3 REQUIREMENTS"]);
    }

    #[test]
    fn test_requirements_warning_precedes_heading() {
        let inputs = sample_inputs();
        let assembler = ReportAssembler::new(&inputs);
        let stranger = ClientIdentity::new("Amy", "Brown");
        let mut document = ReportDocument::new();
        assembler.apply_stage(Stage::Requirements, &stranger, "", &mut document);

        let texts = paragraph_texts(&document);
        assert_eq!(
            texts[0],
            "No Individual Requirements Found For Brown, Amy. Add Manually!!"
        );
        assert_eq!(texts[1], "2024 Q3 REQUIREMENTS");

        let warning = &document.paragraphs()[0].runs[0].style;
        assert_eq!(warning.bold, None);
        assert_eq!(warning.size_half_points, Some(60));
        assert_eq!(warning.highlight, Some(Highlight::Red));
    }

    #[test]
    fn test_requirements_missing_all_clients_rows() {
        let mut inputs = sample_inputs();
        inputs.requirements.rows.retain(|r| !r.owner.is_all_clients());
        let assembler = ReportAssembler::new(&inputs);
        let stranger = ClientIdentity::new("Amy", "Brown");
        let mut document = ReportDocument::new();
        assembler.apply_stage(Stage::Requirements, &stranger, "", &mut document);

        let texts = paragraph_texts(&document);
        assert_eq!(
            texts,
            vec![
                "No Individual Requirements Found For Brown, Amy. Add Manually!!".to_string(),
                NO_ALL_REQUIREMENTS_WARNING.to_string(),
                "2024 Q3 REQUIREMENTS".to_string(),
            ]
        );
    }

    #[test]
    fn test_general_items_heading_precedes_warning() {
        let inputs = sample_inputs();
        let assembler = ReportAssembler::new(&inputs);
        let stranger = ClientIdentity::new("Amy", "Brown");
        let mut document = ReportDocument::new();
        assembler.apply_stage(Stage::GeneralItems, &stranger, "", &mut document);

        let texts = paragraph_texts(&document);
        assert_eq!(texts[0], "GENERAL ITEMS");
        assert_eq!(texts[1], "No Individual General Items Found For Brown, Amy");
        assert_eq!(texts[2], "Review beneficiaries");
    }

    #[test]
    fn test_general_items_missing_all_clients_rows() {
        let mut inputs = sample_inputs();
        inputs.general_items.rows.retain(|r| !r.owner.is_all_clients());
        let assembler = ReportAssembler::new(&inputs);
        let stranger = ClientIdentity::new("Amy", "Brown");
        let mut document = ReportDocument::new();
        assembler.apply_stage(Stage::GeneralItems, &stranger, "", &mut document);

        let texts = paragraph_texts(&document);
        assert_eq!(
            texts,
            vec![
                "GENERAL ITEMS".to_string(),
                "No Individual General Items Found For Brown, Amy".to_string(),
                NO_ALL_GENERAL_ITEMS_WARNING.to_string(),
            ]
        );

        let warning = &document.paragraphs()[2].runs[0].style;
        assert_eq!(warning.bold, None);
        assert_eq!(warning.size_half_points, Some(60));
        assert_eq!(warning.color.as_deref(), Some("FFFFFF"));
        assert_eq!(warning.highlight, Some(Highlight::Red));
    }

    #[test]
    fn test_general_items_numbered_list() {
        let inputs = sample_inputs();
        let assembler = ReportAssembler::new(&inputs);
        let client = ClientIdentity::new("John", "Smith");
        let mut document = ReportDocument::new();
        assembler.apply_stage(Stage::GeneralItems, &client, "", &mut document);

        let items: Vec<&Paragraph> = document
            .paragraphs()
            .into_iter()
            .filter(|p| p.list == Some(ListKind::Numbered))
            .collect();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].text(), "Review beneficiaries");
        assert_eq!(items[1].text(), "Update deferral rate");
    }

    #[test]
    fn test_margins_stage() {
        let inputs = sample_inputs();
        let assembler = ReportAssembler::new(&inputs);
        let client = ClientIdentity::new("John", "Smith");
        let mut document = ReportDocument::new();
        assembler.apply_stage(Stage::Margins, &client, "", &mut document);

        let margins = document.margins.unwrap();
        assert_eq!(margins.top, 720);
        assert_eq!(margins.bottom, 2160);
        assert_eq!(margins.left, 720);
        assert_eq!(margins.right, 720);
        assert_eq!(document.header_distance, Some(144));
    }

    #[test]
    fn test_at_a_glance_stage_layout() {
        let inputs = sample_inputs();
        let assembler = ReportAssembler::new(&inputs);
        let client = ClientIdentity::new("John", "Smith");
        let mut document = ReportDocument::new();
        assembler.apply_stage(Stage::AtAGlance, &client, "", &mut document);

        assert_eq!(document.blocks.len(), 4);
        match &document.blocks[0] {
            Block::Paragraph(p) => assert_eq!(p.text(), "2024 Q3 AT A GLANCE"),
            other => panic!("意外块: {other:?}"),
        }
        match &document.blocks[1] {
            Block::Table(t) => assert_eq!(t.rows[0][1], "12.3%"),
            other => panic!("意外块: {other:?}"),
        }
        match &document.blocks[2] {
            Block::Paragraph(p) => {
                assert_eq!(p.text(), " ");
                assert_eq!(p.runs[0].style.size_half_points, Some(2));
            }
            other => panic!("意外块: {other:?}"),
        }
        match &document.blocks[3] {
            Block::Paragraph(p) => assert_eq!(p.text(), "Values are approximate."),
            other => panic!("意外块: {other:?}"),
        }
    }

    #[test]
    fn test_image_stages_attach_images() {
        let inputs = sample_inputs();
        let client = ClientIdentity::new("John", "Smith");
        let document = assemble_full(&inputs, &client);

        assert!(document.header_image.is_some());
        assert!(document.footer_image.is_some());
        assert_eq!(document.margins.unwrap().bottom, 2160);
    }

    #[test]
    fn test_full_pipeline_is_deterministic() {
        let inputs = sample_inputs();
        let client = ClientIdentity::new("John", "Smith");
        let first = assemble_full(&inputs, &client);
        let second = assemble_full(&inputs, &client);

        assert_eq!(first.blocks, second.blocks);
        assert_eq!(first.margins, second.margins);
        assert_eq!(first.header_distance, second.header_distance);
    }
}
