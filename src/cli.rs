// ==========================================
// SEFG 401(K) 季报生成系统 - 命令行界面
// ==========================================
// 职责: 旗标定义与配置叠加,不做业务校验
// 叠加序: --config 文件在先,旗标覆写在后
// ==========================================

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::config::{ConfigResult, RunConfig};
use crate::domain::PathStyle;

#[derive(Parser, Debug)]
#[command(
    name = "sefg-report-writer",
    version,
    about = "SEFG 401(K) quarterly client report writer"
)]
pub struct Cli {
    #[arg(long, global = true, help = "Output machine-readable JSON")]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Write one report per distinct client in the clients list
    Run(RunArgs),
    /// Load and validate every input without writing reports
    Check(RunArgs),
}

#[derive(Args, Debug)]
pub struct RunArgs {
    /// JSON config file; the flags below override its values
    #[arg(long)]
    pub config: Option<PathBuf>,

    #[arg(long, help = "Report year (2000-2100)")]
    pub year: Option<u16>,

    #[arg(long, help = "Report quarter (1-4)")]
    pub quarter: Option<u8>,

    #[arg(long, help = "Folder to store the output files in")]
    pub output_root: Option<String>,

    #[arg(long, value_enum, help = "Separator convention for output paths")]
    pub path_style: Option<PathStyle>,

    #[arg(long, help = "Clients list table (xlsx or csv)")]
    pub clients: Option<PathBuf>,

    #[arg(long, help = "In Brief document (docx)")]
    pub in_brief: Option<PathBuf>,

    #[arg(long, help = "Requirements table (xlsx or csv)")]
    pub requirements: Option<PathBuf>,

    #[arg(long, help = "General Items table (xlsx or csv)")]
    pub general_items: Option<PathBuf>,

    #[arg(long, help = "At A Glance table (xlsx or csv)")]
    pub at_a_glance: Option<PathBuf>,

    #[arg(long, help = "At A Glance fine print document (docx)")]
    pub fine_print: Option<PathBuf>,

    #[arg(long, help = "Header image (png or jpg)")]
    pub header_image: Option<PathBuf>,

    #[arg(long, help = "Footer image (png or jpg)")]
    pub footer_image: Option<PathBuf>,
}

impl RunArgs {
    /// 旗标转成一份覆写层配置
    fn as_overlay(&self) -> RunConfig {
        RunConfig {
            year: self.year,
            quarter: self.quarter,
            output_root: self.output_root.clone(),
            path_style: self.path_style,
            clients_file: self.clients.clone(),
            in_brief_file: self.in_brief.clone(),
            requirements_file: self.requirements.clone(),
            general_items_file: self.general_items.clone(),
            at_a_glance_file: self.at_a_glance.clone(),
            fine_print_file: self.fine_print.clone(),
            header_image: self.header_image.clone(),
            footer_image: self.footer_image.clone(),
        }
    }

    /// 解析最终配置: 配置文件打底,旗标覆写
    pub fn resolve(&self) -> ConfigResult<RunConfig> {
        let base = match &self.config {
            Some(path) => RunConfig::from_json_file(path)?,
            None => RunConfig::default(),
        };
        Ok(base.overlay(self.as_overlay()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_flags_override_config_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"year": 2023, "quarter": 1, "output_root": "from_file"}}"#
        )
        .unwrap();

        let cli = Cli::parse_from([
            "sefg-report-writer",
            "run",
            "--config",
            &file.path().display().to_string(),
            "--year",
            "2024",
        ]);
        let Commands::Run(args) = cli.command else {
            panic!("应解析为 run 子命令");
        };

        let config = args.resolve().unwrap();
        assert_eq!(config.year, Some(2024));
        assert_eq!(config.quarter, Some(1));
        assert_eq!(config.output_root.as_deref(), Some("from_file"));
    }

    #[test]
    fn test_path_style_value_enum() {
        let cli = Cli::parse_from(["sefg-report-writer", "run", "--path-style", "mac"]);
        let Commands::Run(args) = cli.command else {
            panic!("应解析为 run 子命令");
        };
        assert_eq!(args.path_style, Some(PathStyle::Mac));
    }

    #[test]
    fn test_check_subcommand_shares_flags() {
        let cli = Cli::parse_from([
            "sefg-report-writer",
            "check",
            "--clients",
            "clients.xlsx",
            "--json",
        ]);
        assert!(cli.json);
        let Commands::Check(args) = cli.command else {
            panic!("应解析为 check 子命令");
        };
        assert_eq!(args.clients.as_deref(), Some(std::path::Path::new("clients.xlsx")));
    }

    #[test]
    fn test_resolve_without_config_file() {
        let cli = Cli::parse_from(["sefg-report-writer", "run", "--quarter", "3"]);
        let Commands::Run(args) = cli.command else {
            panic!("应解析为 run 子命令");
        };
        let config = args.resolve().unwrap();
        assert_eq!(config.quarter, Some(3));
        assert_eq!(config.year, None);
    }
}
