// ==========================================
// 按需印刷商城 - 批量导入命令行入口
// ==========================================
// 用法:
//   pod-catalog-import <feed.csv> <owner_id> [db_path]
//
// db_path 缺省时使用 POD_CATALOG_DB_PATH 或用户数据目录
// ==========================================

use pod_catalog_import::api::{ApiError, ImportApi};
use pod_catalog_import::db::default_db_path;
use pod_catalog_import::i18n::{self, t, t_with_args};
use pod_catalog_import::{logging, APP_NAME, VERSION};
use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    logging::init();
    i18n::init_locale();

    let mut args = std::env::args().skip(1);
    let (feed_path, owner_id) = match (args.next(), args.next()) {
        (Some(feed), Some(owner)) => (feed, owner),
        _ => {
            eprintln!("{}", t("cli.usage"));
            return ExitCode::from(2);
        }
    };
    let db_path = args
        .next()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(default_db_path);

    tracing::info!("{} v{}", APP_NAME, VERSION);
    tracing::info!(db_path = %db_path, feed_path = %feed_path, "开始导入");

    let api = ImportApi::new(db_path);
    match api.import_catalog_file(&feed_path, Some(owner_id.as_str())).await {
        Ok(response) => {
            println!("{}", response.summary);
            for warning in &response.warnings {
                let line = warning.line.to_string();
                let kind = format!("{:?}", warning.kind);
                println!(
                    "  {}",
                    t_with_args(
                        "cli.warning_line",
                        &[
                            ("line", line.as_str()),
                            ("kind", kind.as_str()),
                            ("message", warning.message.as_str()),
                        ],
                    )
                );
            }
            if !response.assigned_ids.is_empty() {
                let ids: Vec<String> = response.assigned_ids.iter().map(i64::to_string).collect();
                println!("{}", t_with_args("cli.assigned_ids", &[("ids", ids.join(", ").as_str())]));
            }

            if response.failed > 0 {
                ExitCode::from(1)
            } else {
                ExitCode::SUCCESS
            }
        }
        Err(ApiError::Unauthorized(_)) => {
            eprintln!("{}", t("import.auth_required"));
            ExitCode::from(2)
        }
        Err(ApiError::NotFound(_)) => {
            eprintln!("{}", t_with_args("import.file_not_found", &[("path", feed_path.as_str())]));
            ExitCode::from(2)
        }
        Err(e) => {
            tracing::error!(error = %e, "导入失败");
            eprintln!("{}", e);
            ExitCode::from(1)
        }
    }
}
