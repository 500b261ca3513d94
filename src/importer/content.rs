// ==========================================
// SEFG 401(K) 季报生成系统 - 报告内容装载
// ==========================================
// 职责: 要求表 / 一般事项表 / 速览表的装载与归属解析
// 红线: 行序保持源文件顺序
// ==========================================

use crate::domain::{GlanceTable, OwnedRow, OwnedTable, Owner};
use crate::importer::error::ImportResult;
use crate::importer::file_parser::UniversalFileParser;
use crate::importer::{FIRST_NAME_COLUMN, GENERAL_ITEMS_COLUMN, LAST_NAME_COLUMN};
use std::path::Path;
use tracing::{debug, info};

/// 装载带归属标记的内容表 (要求表)
///
/// 归属在此处解析一次,后续选择只看 Owner 标记
pub fn load_owned_table(path: &Path) -> ImportResult<OwnedTable> {
    let table = UniversalFileParser.parse(path)?;
    let first_idx = table.require_column(FIRST_NAME_COLUMN)?;
    let last_idx = table.require_column(LAST_NAME_COLUMN)?;

    let mut rows = Vec::with_capacity(table.rows.len());
    for row in &table.rows {
        rows.push(OwnedRow {
            owner: Owner::parse(&row.cells[first_idx], &row.cells[last_idx]),
            cells: row.cells.clone(),
            row_number: row.number,
        });
    }

    let all_count = rows.iter().filter(|r| r.owner.is_all_clients()).count();
    debug!(
        total = rows.len(),
        all_clients = all_count,
        specific = rows.len() - all_count,
        file = %table.source,
        "内容表归属解析完成"
    );
    info!(rows = rows.len(), file = %table.source, "内容表装载完成");

    Ok(OwnedTable {
        headers: table.headers,
        rows,
    })
}

/// 装载一般事项表
///
/// 仅保留条目列,cells 固定为单元素 [条目文本]
pub fn load_general_items(path: &Path) -> ImportResult<OwnedTable> {
    let table = UniversalFileParser.parse(path)?;
    let first_idx = table.require_column(FIRST_NAME_COLUMN)?;
    let last_idx = table.require_column(LAST_NAME_COLUMN)?;
    let item_idx = table.require_column(GENERAL_ITEMS_COLUMN)?;

    let mut rows = Vec::with_capacity(table.rows.len());
    for row in &table.rows {
        rows.push(OwnedRow {
            owner: Owner::parse(&row.cells[first_idx], &row.cells[last_idx]),
            cells: vec![row.cells[item_idx].clone()],
            row_number: row.number,
        });
    }

    info!(rows = rows.len(), file = %table.source, "一般事项表装载完成");

    Ok(OwnedTable {
        headers: vec![GENERAL_ITEMS_COLUMN.to_string()],
        rows,
    })
}

/// 装载速览表
///
/// 数据单元格追加 "%" 后缀,表头原样保留
pub fn load_glance_table(path: &Path) -> ImportResult<GlanceTable> {
    let table = UniversalFileParser.parse(path)?;

    let rows: Vec<Vec<String>> = table
        .rows
        .iter()
        .map(|row| row.cells.iter().map(|c| format!("{}%", c)).collect())
        .collect();

    info!(rows = rows.len(), file = %table.source, "速览表装载完成");

    Ok(GlanceTable {
        headers: table.headers,
        rows,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn csv_file(lines: &[&str]) -> tempfile::NamedTempFile {
        let mut temp_file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        for line in lines {
            writeln!(temp_file, "{}", line).unwrap();
        }
        temp_file.flush().unwrap();
        temp_file
    }

    #[test]
    fn test_load_owned_table_parses_owner_once() {
        let temp_file = csv_file(&[
            "First Name,Last Name,Requirement,Due Date",
            "John,Smith,Rebalance,2024-06-30",
            "all,all,Annual Notice,2024-07-15",
            "ALL,,Fee Disclosure,2024-08-01",
        ]);

        let table = load_owned_table(temp_file.path()).unwrap();

        assert_eq!(table.rows.len(), 3);
        assert!(!table.rows[0].owner.is_all_clients());
        assert!(table.rows[1].owner.is_all_clients());
        assert!(table.rows[2].owner.is_all_clients());
        // 单元格保持完整列序
        assert_eq!(table.rows[0].cells[2], "Rebalance");
    }

    #[test]
    fn test_load_general_items_projects_item_column() {
        let temp_file = csv_file(&[
            "First Name,Last Name,General Items",
            "all,all,Review beneficiary designations",
            "John,Smith,Confirm deferral change",
        ]);

        let table = load_general_items(temp_file.path()).unwrap();

        assert_eq!(table.headers, vec!["General Items"]);
        assert_eq!(table.rows[0].cells, vec!["Review beneficiary designations"]);
        assert_eq!(table.rows[1].cells, vec!["Confirm deferral change"]);
    }

    #[test]
    fn test_load_general_items_missing_item_column() {
        let temp_file = csv_file(&["First Name,Last Name", "all,all"]);
        let result = load_general_items(temp_file.path());
        assert!(matches!(
            result,
            Err(crate::importer::ImportError::MissingColumn { .. })
        ));
    }

    #[test]
    fn test_load_glance_table_appends_percent() {
        let temp_file = csv_file(&["Fund,1 Yr,5 Yr", "Growth,12.3,8.1", "Income,4.0,3.2"]);

        let table = load_glance_table(temp_file.path()).unwrap();

        assert_eq!(table.headers, vec!["Fund", "1 Yr", "5 Yr"]);
        assert_eq!(table.rows[0], vec!["Growth%", "12.3%", "8.1%"]);
        assert_eq!(table.rows[1], vec!["Income%", "4.0%", "3.2%"]);
    }
}
