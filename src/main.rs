// ==========================================
// SEFG 401(K) 季报生成系统 - 命令行主入口
// ==========================================
// 退出码: 0 成功, 1 运行失败, 2 配置缺失或非法
// ==========================================

use std::process::ExitCode;

use clap::Parser;
use serde::Serialize;

use sefg_report_writer::app::{ReportRunner, RunError};
use sefg_report_writer::cli::{Cli, Commands, RunArgs};
use sefg_report_writer::config::ConfigError;
use sefg_report_writer::logging;

#[derive(Serialize)]
struct JsonOut<T: Serialize> {
    ok: bool,
    data: T,
}

#[derive(Serialize)]
struct JsonErr {
    ok: bool,
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    missing: Option<Vec<String>>,
}

fn main() -> ExitCode {
    logging::init();
    let cli = Cli::parse();

    let outcome = match &cli.command {
        Commands::Run(args) => run(args, cli.json),
        Commands::Check(args) => check(args, cli.json),
    };

    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            report_failure(&err, cli.json);
            exit_code_for(&err)
        }
    }
}

fn run(args: &RunArgs, json: bool) -> Result<(), RunError> {
    let config = args.resolve()?.validate()?;
    let report = ReportRunner::new(config).run()?;

    if json {
        print_json(&JsonOut {
            ok: true,
            data: &report,
        });
    } else {
        println!(
            "401(K) Report Writing Completed! Your files have been written to the {} folder.",
            report.output_root
        );
        println!("Clients: {}", report.clients);
        for file in &report.files {
            println!("- {file}");
        }
    }
    Ok(())
}

fn check(args: &RunArgs, json: bool) -> Result<(), RunError> {
    let config = args.resolve()?.validate()?;
    let report = ReportRunner::new(config).check()?;

    if json {
        print_json(&JsonOut {
            ok: true,
            data: &report,
        });
    } else {
        println!("All required inputs are present and readable.");
        println!("Period: {}", report.period);
        println!("Clients: {}", report.clients);
        println!("Requirement rows: {}", report.requirement_rows);
        println!("General item rows: {}", report.general_item_rows);
        println!("At A Glance rows: {}", report.glance_rows);
    }
    Ok(())
}

fn report_failure(err: &RunError, json: bool) {
    let missing = match err {
        RunError::Config(ConfigError::MissingFields(fields)) => Some(fields.clone()),
        _ => None,
    };

    if json {
        print_json(&JsonErr {
            ok: false,
            error: err.to_string(),
            missing,
        });
        return;
    }

    match missing {
        Some(fields) => {
            eprintln!("Please provide all required fields. Missing:");
            for field in fields {
                eprintln!("- {field}");
            }
        }
        None => eprintln!("An error occurred: {err}"),
    }
}

fn exit_code_for(err: &RunError) -> ExitCode {
    match err {
        RunError::Config(_) => ExitCode::from(2),
        _ => ExitCode::from(1),
    }
}

/// 序列化自身类型不应失败,失败时降级为错误输出而不恐慌
fn print_json<T: Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(text) => println!("{text}"),
        Err(e) => eprintln!("JSON 序列化失败: {e}"),
    }
}
