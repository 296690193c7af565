// ==========================================
// 推文审核系统 - 运维命令行入口
// ==========================================
// 用法:
//   tweet-review-admin status
//   tweet-review-admin migrate
//   tweet-review-admin backup [dest]
//   tweet-review-admin import-scraped <csv> <execution_id> <source_url>
//
// 数据库路径见 StoreConfig::from_env（TWEET_REVIEW_DB_PATH / DATABASE_URL）
// ==========================================

use std::path::Path;

use anyhow::{anyhow, bail, Context, Result};
use tweet_review_store::{logging, AppState, StoreConfig};

const USAGE: &str = "usage: tweet-review-admin <status | migrate | backup [dest] | import-scraped <csv> <execution_id> <source_url>>";

fn main() -> Result<()> {
    logging::init();

    let mut args = std::env::args().skip(1);
    let command = args.next().ok_or_else(|| anyhow!(USAGE))?;

    tracing::info!("{} v{}", tweet_review_store::SYSTEM_NAME, tweet_review_store::VERSION);

    let config = StoreConfig::from_env();
    let state = AppState::new(config).map_err(|e| anyhow!(e))?;

    match command.as_str() {
        "status" => {
            let status = state.admin_api.database_status();
            println!("{}", serde_json::to_string_pretty(&status)?);
        }
        "migrate" => {
            let outcome = state
                .admin_api
                .force_migration()
                .context("schema 迁移失败")?;
            println!(
                "schema version {} -> {} (applied steps: {:?})",
                outcome.from_version, outcome.to_version, outcome.applied_steps
            );
        }
        "backup" => {
            let dest = args.next();
            let path = state
                .admin_api
                .backup(dest.as_deref().map(Path::new))
                .context("数据库备份失败")?;
            println!("Database backed up to {}", path.display());
        }
        "import-scraped" => {
            let (Some(csv_path), Some(execution_id), Some(source_url)) =
                (args.next(), args.next(), args.next())
            else {
                bail!(USAGE);
            };

            let summary = state
                .scraped_api
                .import_csv(Path::new(&csv_path), &execution_id, &source_url)
                .context("CSV 导入失败")?;
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
        other => bail!("unknown command '{}'\n{}", other, USAGE),
    }

    Ok(())
}
