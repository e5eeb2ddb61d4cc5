// ==========================================
// 线索分配系统 - 命令行入口
// ==========================================
// 用法:
//   lead-dispatch upload <file> [uploaded_by]   上传名单并分配，输出 JSON
//   lead-dispatch lists                         按坐席分组输出全部分配记录
// 数据库: LEAD_DISPATCH_DB_PATH 或用户数据目录
// ==========================================

use lead_dispatch::api::ApiError;
use lead_dispatch::app::{get_default_db_path, AppState};
use lead_dispatch::logging;
use std::process::ExitCode;

const USAGE: &str = "用法: lead-dispatch upload <file> [uploaded_by] | lead-dispatch lists";

#[tokio::main]
async fn main() -> ExitCode {
    logging::init();

    tracing::info!("线索分配系统 v{}", lead_dispatch::VERSION);

    let args: Vec<String> = std::env::args().skip(1).collect();
    let command = match args.first() {
        Some(c) => c.as_str(),
        None => {
            eprintln!("{}", USAGE);
            return ExitCode::from(2);
        }
    };

    let db_path = get_default_db_path();
    tracing::info!("使用数据库: {}", db_path);

    let state = match AppState::new(db_path) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("初始化失败: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let output = match command {
        "upload" => {
            let file = match args.get(1) {
                Some(f) => f,
                None => {
                    eprintln!("{}", USAGE);
                    return ExitCode::from(2);
                }
            };
            let uploaded_by = args.get(2).map(String::as_str).unwrap_or("cli");
            state
                .upload_api
                .upload_list_from_path(file, uploaded_by)
                .await
                .and_then(|r| serde_json::to_string_pretty(&r).map_err(json_error))
        }
        "lists" => state
            .upload_api
            .get_distributed_lists()
            .await
            .and_then(|r| serde_json::to_string_pretty(&r).map_err(json_error)),
        other => {
            eprintln!("未知命令: {}\n{}", other, USAGE);
            return ExitCode::from(2);
        }
    };

    match output {
        Ok(json) => {
            println!("{}", json);
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!(error = %e, "命令执行失败");
            eprintln!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn json_error(err: serde_json::Error) -> ApiError {
    ApiError::Other(anyhow::Error::from(err))
}
