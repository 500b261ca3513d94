// ==========================================
// SEFG 401(K) 季报生成系统 - 文档对象模型
// ==========================================
// 职责: 渲染无关的报告文档结构,供写出器序列化为 .docx
// 红线: 块序即输出顺序,模型本身不做任何排版决策
// ==========================================

use crate::document::error::{DocumentError, DocumentResult};
use std::fmt;
use std::path::Path;

/// 每英寸缇数 (twip, 1/20 磅)
pub const TWIPS_PER_INCH: u32 = 1440;
/// 每英寸 EMU 数 (English Metric Unit)
pub const EMU_PER_INCH: u64 = 914_400;

/// 英寸换算为缇
pub fn inches_to_twips(inches: f64) -> u32 {
    (inches * TWIPS_PER_INCH as f64).round() as u32
}

/// 英寸换算为 EMU
pub fn inches_to_emu(inches: f64) -> u64 {
    (inches * EMU_PER_INCH as f64).round() as u64
}

// ==========================================
// 荧光笔颜色 (Highlight)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Highlight {
    Blue,
    Yellow,
    Green,
    Red,
}

impl Highlight {
    /// w:highlight 属性值
    pub fn docx_value(&self) -> &'static str {
        match self {
            Highlight::Blue => "blue",
            Highlight::Yellow => "yellow",
            Highlight::Green => "green",
            Highlight::Red => "red",
        }
    }

    pub fn from_docx_value(value: &str) -> Option<Self> {
        match value {
            "blue" => Some(Highlight::Blue),
            "yellow" => Some(Highlight::Yellow),
            "green" => Some(Highlight::Green),
            "red" => Some(Highlight::Red),
            _ => None,
        }
    }
}

// ==========================================
// 垂直对齐 (Vertical Alignment)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VertAlign {
    Superscript,
    Subscript,
}

impl VertAlign {
    pub fn docx_value(&self) -> &'static str {
        match self {
            VertAlign::Superscript => "superscript",
            VertAlign::Subscript => "subscript",
        }
    }

    pub fn from_docx_value(value: &str) -> Option<Self> {
        match value {
            "superscript" => Some(VertAlign::Superscript),
            "subscript" => Some(VertAlign::Subscript),
            _ => None,
        }
    }
}

// ==========================================
// 字符样式 (Run Style)
// ==========================================
// bold/italic/underline 为三态: None 表示继承样式表,不写入 XML
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RunStyle {
    pub bold: Option<bool>,
    pub italic: Option<bool>,
    /// w:u 的取值,如 "single";None 表示不下划线
    pub underline: Option<String>,
    pub strike: bool,
    pub vert_align: Option<VertAlign>,
    pub font: Option<String>,
    /// 字号,半磅单位 (22pt = 44)
    pub size_half_points: Option<u32>,
    /// RRGGBB 十六进制,无 # 前缀
    pub color: Option<String>,
    pub highlight: Option<Highlight>,
}

impl RunStyle {
    /// 全部属性为空时写出器省略 rPr
    pub fn is_plain(&self) -> bool {
        *self == RunStyle::default()
    }
}

// ==========================================
// 带样式文本段 (Rich Run)
// ==========================================
// 文本中的 '\n' / '\t' 由写出器转换为换行/制表符元素
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RichRun {
    pub text: String,
    pub style: RunStyle,
}

impl RichRun {
    pub fn plain(text: impl Into<String>) -> Self {
        RichRun {
            text: text.into(),
            style: RunStyle::default(),
        }
    }

    pub fn styled(text: impl Into<String>, style: RunStyle) -> Self {
        RichRun {
            text: text.into(),
            style,
        }
    }
}

/// 列表类型: 编号列表 (List Number) 或项目符号列表 (List Bullet)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListKind {
    Numbered,
    Bulleted,
}

// ==========================================
// 段落 (Paragraph)
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Paragraph {
    pub runs: Vec<RichRun>,
    pub list: Option<ListKind>,
}

impl Paragraph {
    /// 空段落,渲染为空行
    pub fn blank() -> Self {
        Paragraph::default()
    }

    pub fn from_text(text: impl Into<String>) -> Self {
        Paragraph {
            runs: vec![RichRun::plain(text)],
            ..Paragraph::default()
        }
    }

    pub fn styled(text: impl Into<String>, style: RunStyle) -> Self {
        Paragraph {
            runs: vec![RichRun::styled(text, style)],
            ..Paragraph::default()
        }
    }

    /// 各 run 文本拼接
    pub fn text(&self) -> String {
        self.runs.iter().map(|r| r.text.as_str()).collect()
    }
}

impl fmt::Display for Paragraph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.text())
    }
}

// ==========================================
// 表格 (Table Spec)
// ==========================================
// 表头行: header_fill 底色 + 白字 + 加粗
// 数据行: 表内行号 (0 为表头) 为偶数且 >= 2 时铺 band_fill 底色
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableSpec {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
    pub header_fill: String,
    pub band_fill: String,
}

impl TableSpec {
    pub fn column_count(&self) -> usize {
        self.rows
            .iter()
            .map(|r| r.len())
            .max()
            .unwrap_or(0)
            .max(self.headers.len())
    }
}

/// 文档块,顺序即输出顺序
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    Paragraph(Paragraph),
    Table(TableSpec),
    PageBreak,
}

// ==========================================
// 页边距 (Page Margins)
// ==========================================
// 单位: 缇
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageMargins {
    pub top: u32,
    pub right: u32,
    pub bottom: u32,
    pub left: u32,
}

impl PageMargins {
    /// 参数顺序: 上、下、左、右 (英寸)
    pub fn from_inches(top: f64, bottom: f64, left: f64, right: f64) -> Self {
        PageMargins {
            top: inches_to_twips(top),
            right: inches_to_twips(right),
            bottom: inches_to_twips(bottom),
            left: inches_to_twips(left),
        }
    }
}

// ==========================================
// 图片内容 (Image Content)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Png,
    Jpeg,
}

impl ImageFormat {
    pub fn content_type(&self) -> &'static str {
        match self {
            ImageFormat::Png => "image/png",
            ImageFormat::Jpeg => "image/jpeg",
        }
    }

    /// 包内媒体文件扩展名
    pub fn extension(&self) -> &'static str {
        match self {
            ImageFormat::Png => "png",
            ImageFormat::Jpeg => "jpeg",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageContent {
    pub bytes: Vec<u8>,
    pub format: ImageFormat,
    pub width_emu: u64,
    pub height_emu: u64,
}

impl ImageContent {
    /// 从文件装载图片,按扩展名识别格式,显示尺寸以英寸给定
    pub fn from_file(path: &Path, width_in: f64, height_in: f64) -> DocumentResult<Self> {
        if !path.exists() {
            return Err(DocumentError::FileNotFound(path.display().to_string()));
        }

        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();
        let format = match ext.as_str() {
            "png" => ImageFormat::Png,
            "jpg" | "jpeg" => ImageFormat::Jpeg,
            _ => return Err(DocumentError::UnsupportedImage(path.display().to_string())),
        };

        let bytes = std::fs::read(path)?;
        Ok(ImageContent {
            bytes,
            format,
            width_emu: inches_to_emu(width_in),
            height_emu: inches_to_emu(height_in),
        })
    }
}

// ==========================================
// 报告文档 (Report Document)
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ReportDocument {
    pub blocks: Vec<Block>,
    pub margins: Option<PageMargins>,
    /// 页眉距页面顶部的距离 (缇)
    pub header_distance: Option<u32>,
    pub header_image: Option<ImageContent>,
    pub footer_image: Option<ImageContent>,
}

impl ReportDocument {
    pub fn new() -> Self {
        ReportDocument::default()
    }

    pub fn push_paragraph(&mut self, paragraph: Paragraph) {
        self.blocks.push(Block::Paragraph(paragraph));
    }

    pub fn push_blank_line(&mut self) {
        self.push_paragraph(Paragraph::blank());
    }

    pub fn push_styled_text(&mut self, text: impl Into<String>, style: RunStyle) {
        self.push_paragraph(Paragraph::styled(text, style));
    }

    pub fn push_page_break(&mut self) {
        self.blocks.push(Block::PageBreak);
    }

    pub fn push_table(&mut self, table: TableSpec) {
        self.blocks.push(Block::Table(table));
    }

    pub fn append_paragraphs(&mut self, paragraphs: &[Paragraph]) {
        for paragraph in paragraphs {
            self.push_paragraph(paragraph.clone());
        }
    }

    /// 文档中的段落快照 (不含表格内文字)
    pub fn paragraphs(&self) -> Vec<&Paragraph> {
        self.blocks
            .iter()
            .filter_map(|b| match b {
                Block::Paragraph(p) => Some(p),
                _ => None,
            })
            .collect()
    }
}
