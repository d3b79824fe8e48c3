use anyhow::{Context, Result, anyhow};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

use chroma_effect::core::models::SourceFile;
use chroma_effect::services::DownloadOutcome;
use chroma_effect::{AppConfig, ConsoleSink, WorkflowController, logger};

fn usage() -> String {
    "用法: chroma_effect <图片路径> [config.toml]".to_string()
}

#[tokio::main]
async fn main() -> Result<()> {
    logger::init();

    let mut args = std::env::args().skip(1);
    let image_path = PathBuf::from(args.next().ok_or_else(|| anyhow!(usage()))?);
    let config_path = args.next().map(PathBuf::from);

    let app_config = AppConfig::load(config_path.as_deref())?;
    info!("🚀 开始特效生成流程...");
    info!("🎨 特效: {} ({})", app_config.effect_id, app_config.model);
    info!("{}", "=".repeat(60));

    let file = SourceFile::from_path(&image_path)
        .await
        .with_context(|| format!("读取图片失败: {}", image_path.display()))?;

    let mut controller = WorkflowController::from_config(&app_config, Arc::new(ConsoleSink));

    controller.select_file(file).await?;
    let result_url = controller.generate().await?;

    match controller.download().await {
        Some(DownloadOutcome::Saved(path)) | Some(DownloadOutcome::Reencoded(path)) => {
            info!("🎉 处理完成! 文件已保存到: {}", path.display());
        }
        Some(DownloadOutcome::OpenedExternally) | None => {
            info!("🎉 处理完成! 结果地址: {}", result_url);
        }
    }

    Ok(())
}
