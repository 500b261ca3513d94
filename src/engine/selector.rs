// ==========================================
// SEFG 401(K) 季报生成系统 - 内容行选择器
// ==========================================
// 职责: 按客户筛选归属行,并给出缺项判定依据
// 红线: 筛选必须稳定,输出顺序 = 源文件行序
// ==========================================

use crate::domain::{ClientIdentity, OwnedRow, OwnedTable};

// ==========================================
// 行选择结果 (Row Selection)
// ==========================================
// rows 为命中行 (借用源表,保持源顺序)
// all_clients_count 为表中面向全体客户的行数,用于缺项判定
#[derive(Debug)]
pub struct RowSelection<'a> {
    pub rows: Vec<&'a OwnedRow>,
    all_clients_count: usize,
}

impl<'a> RowSelection<'a> {
    /// 命中行全部来自全体行,即该客户没有专属内容
    ///
    /// 归属在装载时解析,专属行与全体行不相交,
    /// 因此命中数等于全体行数时专属命中必为零
    pub fn no_individual_rows(&self) -> bool {
        self.rows.len() == self.all_clients_count
    }

    /// 表中不存在任何面向全体客户的行
    pub fn no_all_clients_rows(&self) -> bool {
        self.all_clients_count == 0
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// 为指定客户选择内容行
///
/// 命中条件: 行归属为该客户 (大小写不敏感) 或面向全体客户
pub fn select_rows<'a>(table: &'a OwnedTable, client: &ClientIdentity) -> RowSelection<'a> {
    let rows: Vec<&OwnedRow> = table
        .rows
        .iter()
        .filter(|row| row.owner.applies_to(client))
        .collect();
    let all_clients_count = table
        .rows
        .iter()
        .filter(|row| row.owner.is_all_clients())
        .count();

    RowSelection {
        rows,
        all_clients_count,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{OwnedRow, Owner};

    fn owned_row(first: &str, last: &str, payload: &str, number: usize) -> OwnedRow {
        OwnedRow {
            owner: Owner::parse(first, last),
            cells: vec![
                first.to_string(),
                last.to_string(),
                payload.to_string(),
            ],
            row_number: number,
        }
    }

    fn sample_table() -> OwnedTable {
        OwnedTable {
            headers: vec!["First Name".into(), "Last Name".into(), "Requirement".into()],
            rows: vec![
                owned_row("all", "all", "Annual Notice", 1),
                owned_row("John", "Smith", "Rebalance", 2),
                owned_row("Jane", "Doe", "Loan Review", 3),
                owned_row("ALL", "", "Fee Disclosure", 4),
                owned_row("john", "SMITH", "Deferral Change", 5),
            ],
        }
    }

    #[test]
    fn test_select_rows_keeps_source_order() {
        let table = sample_table();
        let client = ClientIdentity::new("John", "Smith");
        let selection = select_rows(&table, &client);

        let payloads: Vec<&str> = selection
            .rows
            .iter()
            .map(|r| r.cells[2].as_str())
            .collect();
        assert_eq!(
            payloads,
            vec!["Annual Notice", "Rebalance", "Fee Disclosure", "Deferral Change"]
        );
    }

    #[test]
    fn test_select_rows_case_insensitive_match() {
        let table = sample_table();
        let client = ClientIdentity::new("JANE", "doe");
        let selection = select_rows(&table, &client);

        assert_eq!(selection.rows.len(), 3); // 两条全体行 + 一条专属行
        assert!(!selection.no_individual_rows());
    }

    #[test]
    fn test_select_rows_idempotent() {
        let table = sample_table();
        let client = ClientIdentity::new("John", "Smith");
        let first_pass = select_rows(&table, &client);

        let narrowed = OwnedTable {
            headers: table.headers.clone(),
            rows: first_pass.rows.iter().map(|r| (*r).clone()).collect(),
        };
        let second_pass = select_rows(&narrowed, &client);

        assert_eq!(first_pass.rows, second_pass.rows);
        assert!(!second_pass.no_individual_rows());
    }

    #[test]
    fn test_selection_without_individual_rows() {
        let table = sample_table();
        let client = ClientIdentity::new("Amy", "Brown");
        let selection = select_rows(&table, &client);

        assert_eq!(selection.rows.len(), 2);
        assert!(selection.no_individual_rows());
        assert!(!selection.no_all_clients_rows());
    }

    #[test]
    fn test_selection_without_all_clients_rows() {
        let table = OwnedTable {
            headers: vec!["First Name".into(), "Last Name".into(), "Requirement".into()],
            rows: vec![owned_row("John", "Smith", "Rebalance", 1)],
        };
        let client = ClientIdentity::new("John", "Smith");
        let selection = select_rows(&table, &client);

        assert!(!selection.no_individual_rows());
        assert!(selection.no_all_clients_rows());

        let stranger = ClientIdentity::new("Amy", "Brown");
        let empty = select_rows(&table, &stranger);
        assert!(empty.is_empty());
        assert!(empty.no_individual_rows());
    }

    #[test]
    fn test_empty_table_selection() {
        let table = OwnedTable::default();
        let client = ClientIdentity::new("John", "Smith");
        let selection = select_rows(&table, &client);

        assert!(selection.is_empty());
        assert!(selection.no_individual_rows());
        assert!(selection.no_all_clients_rows());
    }
}
