// ==========================================
// SEFG 401(K) 季报生成系统 - 报告路径构造
// ==========================================
// 职责: 由客户与报告期拼装确定性的输出路径
// 红线: 同一输入必须得到同一路径,分隔符随路径风格切换
// ==========================================

use crate::domain::{ClientIdentity, PathStyle, ReportPeriod};

/// 报告文件名后缀 (客户可见,保持英文)
pub const REPORT_SUFFIX: &str = "401(K) Preliminary Report";

/// 报告文件扩展名
pub const REPORT_EXTENSION: &str = ".docx";

/// 客户子目录名: "Last, First"
pub fn client_folder(client: &ClientIdentity) -> String {
    client.last_first()
}

/// 报告文件名: "{年} Q{季} {Last}, {First} - 401(K) Preliminary Report.docx"
pub fn report_file_name(period: ReportPeriod, client: &ClientIdentity) -> String {
    format!(
        "{} {} - {}{}",
        period,
        client.last_first(),
        REPORT_SUFFIX,
        REPORT_EXTENSION
    )
}

/// 完整输出路径: "{根目录}{sep}{Last}, {First}{sep}{文件名}"
///
/// 分隔符由路径风格决定,不做平台探测
pub fn build_report_path(
    output_root: &str,
    style: PathStyle,
    period: ReportPeriod,
    client: &ClientIdentity,
) -> String {
    let sep = style.separator();
    format!(
        "{}{}{}{}{}",
        output_root,
        sep,
        client_folder(client),
        sep,
        report_file_name(period, client)
    )
}

/// 由输出路径反推文档标题: 末段文件名去掉 ".docx"
///
/// 按路径风格的分隔符切末段,两种风格都能得到纯文件名
pub fn report_title(path: &str, style: PathStyle) -> String {
    let last = path.rsplit(style.separator()).next().unwrap_or(path);
    last.strip_suffix(REPORT_EXTENSION).unwrap_or(last).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn period() -> ReportPeriod {
        ReportPeriod::new(2024, 3).unwrap()
    }

    #[test]
    fn test_report_file_name() {
        let client = ClientIdentity::new("John", "Smith");
        assert_eq!(
            report_file_name(period(), &client),
            "2024 Q3 Smith, John - 401(K) Preliminary Report.docx"
        );
    }

    #[test]
    fn test_build_report_path_windows() {
        let client = ClientIdentity::new("John", "Smith");
        let path = build_report_path("C:\\Reports", PathStyle::Windows, period(), &client);
        assert_eq!(
            path,
            "C:\\Reports\\Smith, John\\2024 Q3 Smith, John - 401(K) Preliminary Report.docx"
        );
    }

    #[test]
    fn test_build_report_path_mac() {
        let client = ClientIdentity::new("Jane", "Doe");
        let path = build_report_path("/Users/sefg/reports", PathStyle::Mac, period(), &client);
        assert_eq!(
            path,
            "/Users/sefg/reports/Doe, Jane/2024 Q3 Doe, Jane - 401(K) Preliminary Report.docx"
        );
    }

    #[test]
    fn test_same_input_same_path() {
        let client = ClientIdentity::new("John", "Smith");
        let a = build_report_path("out", PathStyle::Mac, period(), &client);
        let b = build_report_path("out", PathStyle::Mac, period(), &client);
        assert_eq!(a, b);
    }

    #[test]
    fn test_report_title_strips_folder_and_extension() {
        let client = ClientIdentity::new("John", "Smith");
        let win = build_report_path("C:\\Reports", PathStyle::Windows, period(), &client);
        let mac = build_report_path("/tmp/reports", PathStyle::Mac, period(), &client);

        let expected = "2024 Q3 Smith, John - 401(K) Preliminary Report";
        assert_eq!(report_title(&win, PathStyle::Windows), expected);
        assert_eq!(report_title(&mac, PathStyle::Mac), expected);
    }

    #[test]
    fn test_report_title_without_separator() {
        assert_eq!(
            report_title("standalone.docx", PathStyle::Mac),
            "standalone"
        );
        assert_eq!(report_title("no-extension", PathStyle::Windows), "no-extension");
    }
}
