// ==========================================
// SEFG 401(K) 季报生成系统 - 客户名单装载
// ==========================================
// 职责: 名单文件 -> 去重排序后的客户列表
// ==========================================

use crate::domain::ClientIdentity;
use crate::importer::error::ImportResult;
use crate::importer::file_parser::UniversalFileParser;
use crate::importer::{FIRST_NAME_COLUMN, LAST_NAME_COLUMN};
use std::collections::BTreeSet;
use std::path::Path;
use tracing::{info, warn};

/// 装载客户名单
///
/// 同名行去重,输出按 (姓, 名) 字典序排序,顺序即批次处理顺序
pub fn load_roster(path: &Path) -> ImportResult<Vec<ClientIdentity>> {
    let table = UniversalFileParser.parse(path)?;
    let first_idx = table.require_column(FIRST_NAME_COLUMN)?;
    let last_idx = table.require_column(LAST_NAME_COLUMN)?;

    let mut unique: BTreeSet<ClientIdentity> = BTreeSet::new();
    for row in &table.rows {
        let client = ClientIdentity::new(&row.cells[first_idx], &row.cells[last_idx]);
        if client.first.is_empty() && client.last.is_empty() {
            warn!(row = row.number, file = %table.source, "客户名单存在无名行,已跳过");
            continue;
        }
        unique.insert(client);
    }

    let clients: Vec<ClientIdentity> = unique.into_iter().collect();
    info!(count = clients.len(), file = %table.source, "客户名单装载完成");
    Ok(clients)
}
