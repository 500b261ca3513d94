// ==========================================
// SEFG 401(K) 季报生成系统 - .docx 写出器
// ==========================================
// 职责: 文档对象模型 -> OOXML 包
// 红线: 同一模型必须写出字节级一致的包 (固定部件顺序与时间戳)
// ==========================================

use crate::document::docx::xml::{escape_attr, escape_text};
use crate::document::error::DocumentResult;
use crate::document::model::{
    Block, ImageContent, ListKind, Paragraph, ReportDocument, RichRun, RunStyle, TableSpec,
};
use std::io::{Cursor, Write};
use std::path::Path;
use tracing::debug;
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

const WORDPROCESSINGML_NS: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";
const RELATIONSHIPS_NS: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships";
const DRAWING_WP_NS: &str =
    "http://schemas.openxmlformats.org/drawingml/2006/wordprocessingDrawing";
const DRAWING_MAIN_NS: &str = "http://schemas.openxmlformats.org/drawingml/2006/main";
const DRAWING_PIC_NS: &str = "http://schemas.openxmlformats.org/drawingml/2006/picture";

const XML_DECL: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\r\n";

// Letter 纵向页面 (缇)
const PAGE_WIDTH: u32 = 12240;
const PAGE_HEIGHT: u32 = 15840;
const DEFAULT_MARGIN: u32 = 1440;
const DEFAULT_HEADER_FOOTER: u32 = 720;

// 表格栅格总宽 (缇),各列均分
const TABLE_GRID_WIDTH: u32 = 9360;

/// 将文档写出为 .docx 文件
pub fn write_docx(document: &ReportDocument, path: &Path) -> DocumentResult<()> {
    let bytes = docx_bytes(document)?;
    std::fs::write(path, &bytes)?;
    debug!(file = %path.display(), bytes = bytes.len(), "文档已写出");
    Ok(())
}

/// 将文档序列化为 .docx 字节流
///
/// 部件顺序固定,zip 条目时间戳固定,因此输出可逐字节复现
pub fn docx_bytes(document: &ReportDocument) -> DocumentResult<Vec<u8>> {
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let options: FileOptions =
        FileOptions::default().compression_method(CompressionMethod::Deflated);

    let add_part = |zip: &mut ZipWriter<Cursor<Vec<u8>>>,
                        name: &str,
                        content: &[u8]|
     -> DocumentResult<()> {
        zip.start_file(name, options)?;
        zip.write_all(content)?;
        Ok(())
    };

    add_part(&mut zip, "[Content_Types].xml", content_types_xml(document).as_bytes())?;
    add_part(&mut zip, "_rels/.rels", root_rels_xml().as_bytes())?;
    add_part(&mut zip, "word/document.xml", document_xml(document).as_bytes())?;
    add_part(&mut zip, "word/styles.xml", styles_xml().as_bytes())?;
    add_part(&mut zip, "word/numbering.xml", numbering_xml().as_bytes())?;
    add_part(
        &mut zip,
        "word/_rels/document.xml.rels",
        document_rels_xml(document).as_bytes(),
    )?;

    if let Some(image) = &document.header_image {
        let media = format!("media/image1.{}", image.format.extension());
        add_part(&mut zip, "word/header1.xml", part_with_image_xml("w:hdr", "Header Image", image).as_bytes())?;
        add_part(&mut zip, "word/_rels/header1.xml.rels", image_rels_xml(&media).as_bytes())?;
        add_part(&mut zip, &format!("word/{}", media), &image.bytes)?;
    }
    if let Some(image) = &document.footer_image {
        let media = format!("media/image2.{}", image.format.extension());
        add_part(&mut zip, "word/footer1.xml", part_with_image_xml("w:ftr", "Footer Image", image).as_bytes())?;
        add_part(&mut zip, "word/_rels/footer1.xml.rels", image_rels_xml(&media).as_bytes())?;
        add_part(&mut zip, &format!("word/{}", media), &image.bytes)?;
    }

    let cursor = zip.finish()?;
    Ok(cursor.into_inner())
}

// ==========================================
// 包级部件
// ==========================================

fn content_types_xml(document: &ReportDocument) -> String {
    let mut xml = String::from(XML_DECL);
    xml.push_str("<Types xmlns=\"http://schemas.openxmlformats.org/package/2006/content-types\">");
    xml.push_str("<Default Extension=\"rels\" ContentType=\"application/vnd.openxmlformats-package.relationships+xml\"/>");
    xml.push_str("<Default Extension=\"xml\" ContentType=\"application/xml\"/>");
    xml.push_str("<Default Extension=\"png\" ContentType=\"image/png\"/>");
    xml.push_str("<Default Extension=\"jpeg\" ContentType=\"image/jpeg\"/>");
    xml.push_str("<Override PartName=\"/word/document.xml\" ContentType=\"application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml\"/>");
    xml.push_str("<Override PartName=\"/word/styles.xml\" ContentType=\"application/vnd.openxmlformats-officedocument.wordprocessingml.styles+xml\"/>");
    xml.push_str("<Override PartName=\"/word/numbering.xml\" ContentType=\"application/vnd.openxmlformats-officedocument.wordprocessingml.numbering+xml\"/>");
    if document.header_image.is_some() {
        xml.push_str("<Override PartName=\"/word/header1.xml\" ContentType=\"application/vnd.openxmlformats-officedocument.wordprocessingml.header+xml\"/>");
    }
    if document.footer_image.is_some() {
        xml.push_str("<Override PartName=\"/word/footer1.xml\" ContentType=\"application/vnd.openxmlformats-officedocument.wordprocessingml.footer+xml\"/>");
    }
    xml.push_str("</Types>");
    xml
}

fn root_rels_xml() -> String {
    let mut xml = String::from(XML_DECL);
    xml.push_str("<Relationships xmlns=\"http://schemas.openxmlformats.org/package/2006/relationships\">");
    xml.push_str(&format!(
        "<Relationship Id=\"rId1\" Type=\"{}/officeDocument\" Target=\"word/document.xml\"/>",
        RELATIONSHIPS_NS
    ));
    xml.push_str("</Relationships>");
    xml
}

fn document_rels_xml(document: &ReportDocument) -> String {
    let mut xml = String::from(XML_DECL);
    xml.push_str("<Relationships xmlns=\"http://schemas.openxmlformats.org/package/2006/relationships\">");
    xml.push_str(&format!(
        "<Relationship Id=\"rId1\" Type=\"{}/styles\" Target=\"styles.xml\"/>",
        RELATIONSHIPS_NS
    ));
    xml.push_str(&format!(
        "<Relationship Id=\"rId2\" Type=\"{}/numbering\" Target=\"numbering.xml\"/>",
        RELATIONSHIPS_NS
    ));
    if document.header_image.is_some() {
        xml.push_str(&format!(
            "<Relationship Id=\"rId3\" Type=\"{}/header\" Target=\"header1.xml\"/>",
            RELATIONSHIPS_NS
        ));
    }
    if document.footer_image.is_some() {
        xml.push_str(&format!(
            "<Relationship Id=\"rId4\" Type=\"{}/footer\" Target=\"footer1.xml\"/>",
            RELATIONSHIPS_NS
        ));
    }
    xml.push_str("</Relationships>");
    xml
}

fn image_rels_xml(media_target: &str) -> String {
    let mut xml = String::from(XML_DECL);
    xml.push_str("<Relationships xmlns=\"http://schemas.openxmlformats.org/package/2006/relationships\">");
    xml.push_str(&format!(
        "<Relationship Id=\"rId1\" Type=\"{}/image\" Target=\"{}\"/>",
        RELATIONSHIPS_NS,
        escape_attr(media_target)
    ));
    xml.push_str("</Relationships>");
    xml
}

// ==========================================
// 样式表与编号定义
// ==========================================
// Normal 统一 Calibri 11pt;表格边框由 TableGrid 样式提供
fn styles_xml() -> String {
    let mut xml = String::from(XML_DECL);
    xml.push_str(&format!("<w:styles xmlns:w=\"{}\">", WORDPROCESSINGML_NS));
    xml.push_str("<w:docDefaults><w:rPrDefault><w:rPr>");
    xml.push_str("<w:rFonts w:ascii=\"Calibri\" w:hAnsi=\"Calibri\" w:eastAsia=\"Calibri\" w:cs=\"Calibri\"/>");
    xml.push_str("<w:sz w:val=\"22\"/><w:szCs w:val=\"22\"/>");
    xml.push_str("</w:rPr></w:rPrDefault><w:pPrDefault/></w:docDefaults>");

    xml.push_str("<w:style w:type=\"paragraph\" w:default=\"1\" w:styleId=\"Normal\">");
    xml.push_str("<w:name w:val=\"Normal\"/><w:qFormat/></w:style>");

    xml.push_str("<w:style w:type=\"paragraph\" w:styleId=\"ListNumber\">");
    xml.push_str("<w:name w:val=\"List Number\"/><w:basedOn w:val=\"Normal\"/>");
    xml.push_str("<w:pPr><w:numPr><w:numId w:val=\"1\"/></w:numPr></w:pPr></w:style>");

    xml.push_str("<w:style w:type=\"paragraph\" w:styleId=\"ListBullet\">");
    xml.push_str("<w:name w:val=\"List Bullet\"/><w:basedOn w:val=\"Normal\"/>");
    xml.push_str("<w:pPr><w:numPr><w:numId w:val=\"2\"/></w:numPr></w:pPr></w:style>");

    xml.push_str("<w:style w:type=\"table\" w:default=\"1\" w:styleId=\"TableNormal\">");
    xml.push_str("<w:name w:val=\"Normal Table\"/></w:style>");

    xml.push_str("<w:style w:type=\"table\" w:styleId=\"TableGrid\">");
    xml.push_str("<w:name w:val=\"Table Grid\"/><w:basedOn w:val=\"TableNormal\"/>");
    xml.push_str("<w:tblPr><w:tblBorders>");
    for edge in ["top", "left", "bottom", "right", "insideH", "insideV"] {
        xml.push_str(&format!(
            "<w:{} w:val=\"single\" w:sz=\"4\" w:space=\"0\" w:color=\"auto\"/>",
            edge
        ));
    }
    xml.push_str("</w:tblBorders></w:tblPr></w:style>");

    xml.push_str("</w:styles>");
    xml
}

fn numbering_xml() -> String {
    let mut xml = String::from(XML_DECL);
    xml.push_str(&format!("<w:numbering xmlns:w=\"{}\">", WORDPROCESSINGML_NS));

    // 十进制编号 "1." "2." ...
    xml.push_str("<w:abstractNum w:abstractNumId=\"1\">");
    xml.push_str("<w:multiLevelType w:val=\"singleLevel\"/>");
    xml.push_str("<w:lvl w:ilvl=\"0\"><w:start w:val=\"1\"/><w:numFmt w:val=\"decimal\"/>");
    xml.push_str("<w:lvlText w:val=\"%1.\"/><w:lvlJc w:val=\"left\"/>");
    xml.push_str("<w:pPr><w:ind w:left=\"720\" w:hanging=\"360\"/></w:pPr></w:lvl>");
    xml.push_str("</w:abstractNum>");

    // 实心圆点项目符号 (Symbol 字体)
    xml.push_str("<w:abstractNum w:abstractNumId=\"2\">");
    xml.push_str("<w:multiLevelType w:val=\"singleLevel\"/>");
    xml.push_str("<w:lvl w:ilvl=\"0\"><w:start w:val=\"1\"/><w:numFmt w:val=\"bullet\"/>");
    xml.push_str("<w:lvlText w:val=\"\u{F0B7}\"/><w:lvlJc w:val=\"left\"/>");
    xml.push_str("<w:pPr><w:ind w:left=\"720\" w:hanging=\"360\"/></w:pPr>");
    xml.push_str("<w:rPr><w:rFonts w:ascii=\"Symbol\" w:hAnsi=\"Symbol\" w:hint=\"default\"/></w:rPr></w:lvl>");
    xml.push_str("</w:abstractNum>");

    xml.push_str("<w:num w:numId=\"1\"><w:abstractNumId w:val=\"1\"/></w:num>");
    xml.push_str("<w:num w:numId=\"2\"><w:abstractNumId w:val=\"2\"/></w:num>");
    xml.push_str("</w:numbering>");
    xml
}

// ==========================================
// 主文档部件
// ==========================================

fn document_xml(document: &ReportDocument) -> String {
    let mut xml = String::from(XML_DECL);
    xml.push_str(&format!(
        "<w:document xmlns:w=\"{}\" xmlns:r=\"{}\">",
        WORDPROCESSINGML_NS, RELATIONSHIPS_NS
    ));
    xml.push_str("<w:body>");

    for block in &document.blocks {
        match block {
            Block::Paragraph(p) => write_paragraph(&mut xml, p),
            Block::Table(t) => write_table(&mut xml, t),
            Block::PageBreak => {
                xml.push_str("<w:p><w:r><w:br w:type=\"page\"/></w:r></w:p>");
            }
        }
    }

    write_sect_pr(&mut xml, document);
    xml.push_str("</w:body></w:document>");
    xml
}

fn write_sect_pr(xml: &mut String, document: &ReportDocument) {
    xml.push_str("<w:sectPr>");
    if document.header_image.is_some() {
        xml.push_str("<w:headerReference w:type=\"default\" r:id=\"rId3\"/>");
    }
    if document.footer_image.is_some() {
        xml.push_str("<w:footerReference w:type=\"default\" r:id=\"rId4\"/>");
    }
    xml.push_str(&format!(
        "<w:pgSz w:w=\"{}\" w:h=\"{}\"/>",
        PAGE_WIDTH, PAGE_HEIGHT
    ));

    let (top, right, bottom, left) = match &document.margins {
        Some(m) => (m.top, m.right, m.bottom, m.left),
        None => (DEFAULT_MARGIN, DEFAULT_MARGIN, DEFAULT_MARGIN, DEFAULT_MARGIN),
    };
    let header = document.header_distance.unwrap_or(DEFAULT_HEADER_FOOTER);
    xml.push_str(&format!(
        "<w:pgMar w:top=\"{}\" w:right=\"{}\" w:bottom=\"{}\" w:left=\"{}\" w:header=\"{}\" w:footer=\"{}\" w:gutter=\"0\"/>",
        top, right, bottom, left, header, DEFAULT_HEADER_FOOTER
    ));
    xml.push_str("</w:sectPr>");
}

fn write_paragraph(xml: &mut String, paragraph: &Paragraph) {
    if paragraph.runs.is_empty() && paragraph.list.is_none() {
        xml.push_str("<w:p/>");
        return;
    }

    xml.push_str("<w:p>");
    match paragraph.list {
        Some(ListKind::Numbered) => {
            xml.push_str("<w:pPr><w:pStyle w:val=\"ListNumber\"/>");
            xml.push_str("<w:numPr><w:ilvl w:val=\"0\"/><w:numId w:val=\"1\"/></w:numPr></w:pPr>");
        }
        Some(ListKind::Bulleted) => {
            xml.push_str("<w:pPr><w:pStyle w:val=\"ListBullet\"/>");
            xml.push_str("<w:numPr><w:ilvl w:val=\"0\"/><w:numId w:val=\"2\"/></w:numPr></w:pPr>");
        }
        None => {}
    }
    for run in &paragraph.runs {
        write_run(xml, run);
    }
    xml.push_str("</w:p>");
}

fn write_run(xml: &mut String, run: &RichRun) {
    xml.push_str("<w:r>");
    write_run_properties(xml, &run.style);
    write_run_content(xml, &run.text);
    xml.push_str("</w:r>");
}

// rPr 子元素顺序遵循 CT_RPr 模式
fn write_run_properties(xml: &mut String, style: &RunStyle) {
    if style.is_plain() {
        return;
    }
    xml.push_str("<w:rPr>");
    if let Some(font) = &style.font {
        xml.push_str(&format!(
            "<w:rFonts w:ascii=\"{0}\" w:hAnsi=\"{0}\"/>",
            escape_attr(font)
        ));
    }
    match style.bold {
        Some(true) => xml.push_str("<w:b/>"),
        Some(false) => xml.push_str("<w:b w:val=\"0\"/>"),
        None => {}
    }
    match style.italic {
        Some(true) => xml.push_str("<w:i/>"),
        Some(false) => xml.push_str("<w:i w:val=\"0\"/>"),
        None => {}
    }
    if style.strike {
        xml.push_str("<w:strike/>");
    }
    if let Some(color) = &style.color {
        xml.push_str(&format!("<w:color w:val=\"{}\"/>", escape_attr(color)));
    }
    if let Some(size) = style.size_half_points {
        xml.push_str(&format!("<w:sz w:val=\"{0}\"/><w:szCs w:val=\"{0}\"/>", size));
    }
    if let Some(highlight) = style.highlight {
        xml.push_str(&format!(
            "<w:highlight w:val=\"{}\"/>",
            highlight.docx_value()
        ));
    }
    if let Some(underline) = &style.underline {
        xml.push_str(&format!("<w:u w:val=\"{}\"/>", escape_attr(underline)));
    }
    if let Some(vert) = style.vert_align {
        xml.push_str(&format!(
            "<w:vertAlign w:val=\"{}\"/>",
            vert.docx_value()
        ));
    }
    xml.push_str("</w:rPr>");
}

// '\n' -> <w:br/>, '\t' -> <w:tab/>, '\r' 丢弃
fn write_run_content(xml: &mut String, text: &str) {
    if text.is_empty() {
        xml.push_str("<w:t xml:space=\"preserve\"></w:t>");
        return;
    }

    let mut segment = String::new();
    for ch in text.chars() {
        match ch {
            '\n' => {
                flush_text_segment(xml, &mut segment);
                xml.push_str("<w:br/>");
            }
            '\t' => {
                flush_text_segment(xml, &mut segment);
                xml.push_str("<w:tab/>");
            }
            '\r' => {}
            _ => segment.push(ch),
        }
    }
    flush_text_segment(xml, &mut segment);
}

fn flush_text_segment(xml: &mut String, segment: &mut String) {
    if segment.is_empty() {
        return;
    }
    xml.push_str("<w:t xml:space=\"preserve\">");
    xml.push_str(&escape_text(segment));
    xml.push_str("</w:t>");
    segment.clear();
}

// ==========================================
// 表格渲染
// ==========================================
// 表头: header_fill 底色 + 白字加粗
// 数据行: 表内行号为偶数 (跳过表头) 时铺 band_fill
fn write_table(xml: &mut String, table: &TableSpec) {
    let columns = table.column_count();
    if columns == 0 {
        return;
    }
    let col_width = TABLE_GRID_WIDTH / columns as u32;

    xml.push_str("<w:tbl><w:tblPr>");
    xml.push_str("<w:tblStyle w:val=\"TableGrid\"/>");
    xml.push_str("<w:tblW w:w=\"0\" w:type=\"auto\"/>");
    xml.push_str("</w:tblPr><w:tblGrid>");
    for _ in 0..columns {
        xml.push_str(&format!("<w:gridCol w:w=\"{}\"/>", col_width));
    }
    xml.push_str("</w:tblGrid>");

    // 表头行
    let header_style = RunStyle {
        bold: Some(true),
        color: Some("FFFFFF".to_string()),
        ..RunStyle::default()
    };
    xml.push_str("<w:tr>");
    for col in 0..columns {
        let text = table.headers.get(col).map(String::as_str).unwrap_or("");
        write_table_cell(xml, text, col_width, Some(&table.header_fill), Some(&header_style));
    }
    xml.push_str("</w:tr>");

    // 数据行
    for (row_idx, row) in table.rows.iter().enumerate() {
        let table_row_number = row_idx + 1;
        let banded = table_row_number >= 2 && table_row_number % 2 == 0;
        let fill = if banded {
            Some(table.band_fill.as_str())
        } else {
            None
        };

        xml.push_str("<w:tr>");
        for col in 0..columns {
            let text = row.get(col).map(String::as_str).unwrap_or("");
            write_table_cell(xml, text, col_width, fill, None);
        }
        xml.push_str("</w:tr>");
    }

    xml.push_str("</w:tbl>");
}

fn write_table_cell(
    xml: &mut String,
    text: &str,
    width: u32,
    fill: Option<&str>,
    run_style: Option<&RunStyle>,
) {
    xml.push_str("<w:tc><w:tcPr>");
    xml.push_str(&format!("<w:tcW w:w=\"{}\" w:type=\"dxa\"/>", width));
    if let Some(fill) = fill {
        xml.push_str(&format!(
            "<w:shd w:val=\"clear\" w:color=\"auto\" w:fill=\"{}\"/>",
            escape_attr(fill)
        ));
    }
    xml.push_str("</w:tcPr>");

    if text.is_empty() && run_style.is_none() {
        xml.push_str("<w:p/>");
    } else {
        let style = run_style.cloned().unwrap_or_default();
        let mut cell_xml = String::new();
        write_run(&mut cell_xml, &RichRun::styled(text, style));
        xml.push_str("<w:p>");
        xml.push_str(&cell_xml);
        xml.push_str("</w:p>");
    }

    xml.push_str("</w:tc>");
}

// ==========================================
// 页眉/页脚部件 (内嵌居中图片)
// ==========================================

fn part_with_image_xml(root: &str, name: &str, image: &ImageContent) -> String {
    let mut xml = String::from(XML_DECL);
    xml.push_str(&format!(
        "<{} xmlns:w=\"{}\" xmlns:r=\"{}\" xmlns:wp=\"{}\">",
        root, WORDPROCESSINGML_NS, RELATIONSHIPS_NS, DRAWING_WP_NS
    ));
    xml.push_str("<w:p><w:pPr><w:jc w:val=\"center\"/></w:pPr><w:r>");
    write_inline_drawing(&mut xml, name, image);
    xml.push_str("</w:r></w:p>");
    xml.push_str(&format!("</{}>", root));
    xml
}

fn write_inline_drawing(xml: &mut String, name: &str, image: &ImageContent) {
    let cx = image.width_emu;
    let cy = image.height_emu;
    xml.push_str("<w:drawing>");
    xml.push_str("<wp:inline distT=\"0\" distB=\"0\" distL=\"0\" distR=\"0\">");
    xml.push_str(&format!("<wp:extent cx=\"{}\" cy=\"{}\"/>", cx, cy));
    xml.push_str("<wp:effectExtent l=\"0\" t=\"0\" r=\"0\" b=\"0\"/>");
    xml.push_str(&format!(
        "<wp:docPr id=\"1\" name=\"{}\"/>",
        escape_attr(name)
    ));
    xml.push_str("<wp:cNvGraphicFramePr>");
    xml.push_str(&format!(
        "<a:graphicFrameLocks xmlns:a=\"{}\" noChangeAspect=\"1\"/>",
        DRAWING_MAIN_NS
    ));
    xml.push_str("</wp:cNvGraphicFramePr>");
    xml.push_str(&format!("<a:graphic xmlns:a=\"{}\">", DRAWING_MAIN_NS));
    xml.push_str(&format!(
        "<a:graphicData uri=\"{}\">",
        DRAWING_PIC_NS
    ));
    xml.push_str(&format!("<pic:pic xmlns:pic=\"{}\">", DRAWING_PIC_NS));
    xml.push_str("<pic:nvPicPr>");
    xml.push_str(&format!(
        "<pic:cNvPr id=\"1\" name=\"{}\"/>",
        escape_attr(name)
    ));
    xml.push_str("<pic:cNvPicPr/></pic:nvPicPr>");
    xml.push_str("<pic:blipFill><a:blip r:embed=\"rId1\"/><a:stretch><a:fillRect/></a:stretch></pic:blipFill>");
    xml.push_str("<pic:spPr><a:xfrm><a:off x=\"0\" y=\"0\"/>");
    xml.push_str(&format!("<a:ext cx=\"{}\" cy=\"{}\"/>", cx, cy));
    xml.push_str("</a:xfrm><a:prstGeom prst=\"rect\"><a:avLst/></a:prstGeom></pic:spPr>");
    xml.push_str("</pic:pic></a:graphicData></a:graphic>");
    xml.push_str("</wp:inline></w:drawing>");
}
