// ==========================================
// SEFG 401(K) 季报生成系统 - .docx 样板读取器
// ==========================================
// 职责: 读取样板文档的正文段落与字符样式 (In Brief / Fine Print)
// 红线: 只取正文顶层段落,表格内文字不在复制范围
// ==========================================

use crate::document::error::{DocumentError, DocumentResult};
use crate::document::model::{Highlight, Paragraph, RichRun, RunStyle, VertAlign};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::io::Read;
use std::path::Path;
use tracing::debug;
use zip::ZipArchive;

const DOCUMENT_PART: &str = "word/document.xml";

/// 读取样板文档的正文段落
///
/// 保留的字符属性: 加粗/斜体/下划线/删除线/上下标/字体/字号/颜色/荧光笔
/// 段落级属性 (样式、对齐、编号) 不保留
pub fn read_paragraphs(path: &Path) -> DocumentResult<Vec<Paragraph>> {
    if !path.exists() {
        return Err(DocumentError::FileNotFound(path.display().to_string()));
    }

    let file = std::fs::File::open(path)?;
    let mut archive = ZipArchive::new(file)?;
    let mut xml = String::new();
    {
        let mut part = match archive.by_name(DOCUMENT_PART) {
            Ok(part) => part,
            Err(zip::result::ZipError::FileNotFound) => {
                return Err(DocumentError::MissingPart {
                    file: path.display().to_string(),
                    part: DOCUMENT_PART.to_string(),
                })
            }
            Err(e) => return Err(e.into()),
        };
        part.read_to_string(&mut xml)?;
    }

    let paragraphs = parse_body_paragraphs(&xml)?;
    debug!(file = %path.display(), paragraphs = paragraphs.len(), "样板文档解析完成");
    Ok(paragraphs)
}

/// 解析 word/document.xml 的正文顶层段落
fn parse_body_paragraphs(xml: &str) -> DocumentResult<Vec<Paragraph>> {
    let mut reader = Reader::from_str(xml);
    let mut paragraphs: Vec<Paragraph> = Vec::new();
    let mut table_depth: usize = 0;
    let mut current_paragraph: Option<Paragraph> = None;
    let mut current_run: Option<(String, RunStyle)> = None;
    let mut in_run_properties = false;
    let mut in_text = false;

    loop {
        match reader.read_event() {
            Err(e) => return Err(DocumentError::Xml(e.to_string())),
            Ok(Event::Eof) => break,

            Ok(Event::Start(e)) => match e.name().as_ref() {
                b"w:tbl" => table_depth += 1,
                b"w:p" if table_depth == 0 => current_paragraph = Some(Paragraph::blank()),
                b"w:r" if current_paragraph.is_some() => {
                    current_run = Some((String::new(), RunStyle::default()));
                }
                b"w:rPr" if current_run.is_some() => in_run_properties = true,
                b"w:t" if current_run.is_some() && !in_run_properties => in_text = true,
                _ => {
                    if in_run_properties {
                        if let Some((_, style)) = current_run.as_mut() {
                            apply_run_property(&e, style)?;
                        }
                    }
                }
            },

            Ok(Event::Empty(e)) => match e.name().as_ref() {
                // 自闭合空段落
                b"w:p" if table_depth == 0 => paragraphs.push(Paragraph::blank()),
                b"w:br" | b"w:cr" if current_run.is_some() && !in_run_properties => {
                    if let Some((text, _)) = current_run.as_mut() {
                        text.push('\n');
                    }
                }
                b"w:tab" if current_run.is_some() && !in_run_properties => {
                    if let Some((text, _)) = current_run.as_mut() {
                        text.push('\t');
                    }
                }
                _ => {
                    if in_run_properties {
                        if let Some((_, style)) = current_run.as_mut() {
                            apply_run_property(&e, style)?;
                        }
                    }
                }
            },

            Ok(Event::Text(t)) if in_text => {
                let text = t
                    .unescape()
                    .map_err(|e| DocumentError::Xml(e.to_string()))?;
                if let Some((run_text, _)) = current_run.as_mut() {
                    run_text.push_str(&text);
                }
            }

            Ok(Event::End(e)) => match e.name().as_ref() {
                b"w:tbl" => table_depth = table_depth.saturating_sub(1),
                b"w:t" => in_text = false,
                b"w:rPr" => in_run_properties = false,
                b"w:r" => {
                    if let Some((text, style)) = current_run.take() {
                        if let Some(paragraph) = current_paragraph.as_mut() {
                            paragraph.runs.push(RichRun { text, style });
                        }
                    }
                }
                b"w:p" => {
                    if let Some(paragraph) = current_paragraph.take() {
                        paragraphs.push(paragraph);
                    }
                }
                _ => {}
            },

            Ok(_) => {}
        }
    }

    Ok(paragraphs)
}

fn apply_run_property(element: &BytesStart<'_>, style: &mut RunStyle) -> DocumentResult<()> {
    match element.name().as_ref() {
        b"w:b" => style.bold = Some(!is_off(attr_value(element, "w:val")?)),
        b"w:i" => style.italic = Some(!is_off(attr_value(element, "w:val")?)),
        b"w:strike" => style.strike = !is_off(attr_value(element, "w:val")?),
        b"w:u" => {
            style.underline = match attr_value(element, "w:val")? {
                None => Some("single".to_string()),
                Some(v) if v == "none" => None,
                Some(v) => Some(v),
            };
        }
        b"w:vertAlign" => {
            style.vert_align = attr_value(element, "w:val")?
                .as_deref()
                .and_then(VertAlign::from_docx_value);
        }
        b"w:sz" => {
            style.size_half_points = attr_value(element, "w:val")?.and_then(|v| v.parse().ok());
        }
        b"w:color" => {
            style.color = attr_value(element, "w:val")?.filter(|v| v != "auto");
        }
        b"w:rFonts" => {
            let font = match attr_value(element, "w:ascii")? {
                Some(font) => Some(font),
                None => attr_value(element, "w:hAnsi")?,
            };
            if font.is_some() {
                style.font = font;
            }
        }
        b"w:highlight" => {
            style.highlight = attr_value(element, "w:val")?
                .as_deref()
                .and_then(Highlight::from_docx_value);
        }
        _ => {}
    }
    Ok(())
}

fn attr_value(element: &BytesStart<'_>, name: &str) -> DocumentResult<Option<String>> {
    match element.try_get_attribute(name) {
        Ok(Some(attr)) => {
            // docx 部件固定 UTF-8,属性值解码后再去 XML 转义
            let raw = std::str::from_utf8(attr.value.as_ref())
                .map_err(|e| DocumentError::Xml(e.to_string()))?;
            let value = quick_xml::escape::unescape(raw)
                .map_err(|e| DocumentError::Xml(e.to_string()))?;
            Ok(Some(value.into_owned()))
        }
        Ok(None) => Ok(None),
        Err(e) => Err(DocumentError::Xml(e.to_string())),
    }
}

/// "0"/"false"/"none" 视为关闭
fn is_off(value: Option<String>) -> bool {
    matches!(value.as_deref(), Some("0") | Some("false") | Some("none"))
}
