//! # 截图导出编排
//!
//! ## 设计思路
//!
//! 处理链路固定为：截图 → 按平台分支。截图结果原样交给下游，不解析也不校验。
//! - Web：Data URL 绑定固定文件名，触发下载。同步完成，无需清理。
//! - 原生：展示加载指示器 → 写入缓存文件 → 调起分享 → 删除缓存文件 → 关闭指示器。
//!
//! 两条分支严格互斥：Web 分支不触碰缓存、分享与指示器，原生分支不触发下载。
//!
//! ## 实现思路
//!
//! - 写入成功后才创建 `CacheFileGuard`，写入失败时既不分享也无文件可删。
//! - 分享结束（完成、取消或失败）后一定执行删除；两者都失败时返回分享错误，删除错误记日志。
//! - 指示器由 `ProgressGuard` 在函数退出时关闭，晚于删除。
//! - 记录 `rasterize/deliver/total` 阶段耗时。

use std::sync::Arc;
use std::time::Instant;

use serde::Serialize;

use crate::capability::{
    CacheFileStore, DownloadTrigger, ProgressIndicator, Rasterizer, ShareOutcome, ShareSheet,
};
use crate::config::ExportSettings;
use crate::platform::PlatformContext;
use crate::workflow::WorkflowError;
use crate::workflow::flight::SingleFlight;

use super::artifact::ExportArtifact;
use super::guard::{CacheFileGuard, ProgressGuard};

/// 一次导出的结局。
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum ExportOutcome {
    Downloaded { filename: String },
    Shared { filename: String },
    ShareCancelled { filename: String },
}

/// 原生分支使用的能力集合。
pub struct ShareCapabilities {
    pub store: Arc<dyn CacheFileStore>,
    pub share: Arc<dyn ShareSheet>,
    pub progress: Arc<dyn ProgressIndicator>,
}

pub struct CaptureExportPipeline {
    platform: PlatformContext,
    rasterizer: Arc<dyn Rasterizer>,
    download: Arc<dyn DownloadTrigger>,
    native: ShareCapabilities,
    settings: ExportSettings,
    flight: SingleFlight,
}

impl CaptureExportPipeline {
    pub fn new(
        platform: PlatformContext,
        rasterizer: Arc<dyn Rasterizer>,
        download: Arc<dyn DownloadTrigger>,
        native: ShareCapabilities,
        settings: ExportSettings,
    ) -> Self {
        Self {
            platform,
            rasterizer,
            download,
            native,
            settings,
            flight: SingleFlight::new("导出"),
        }
    }

    pub fn settings(&self) -> &ExportSettings {
        &self.settings
    }

    /// 截取指定元素并导出。
    pub async fn capture_and_export(&self, element_id: &str) -> Result<ExportOutcome, WorkflowError> {
        let _flight = self.flight.try_acquire()?;
        let total_start = Instant::now();

        let rasterize_start = Instant::now();
        let raster = self.rasterizer.rasterize(element_id).await?;
        let artifact = ExportArtifact::new(raster, self.settings.filename.as_str());
        let payload_len = artifact.image_data().len();
        let rasterize_elapsed = rasterize_start.elapsed();

        let deliver_start = Instant::now();
        let outcome = if self.platform.is_native_capable() {
            self.share_artifact(&artifact).await?
        } else {
            self.download_artifact(&artifact)?
        };
        let deliver_elapsed = deliver_start.elapsed();

        log::info!(
            "✅ 导出完成 - element={} outcome={:?} size={}KB rasterize={}ms deliver={}ms total={}ms",
            element_id,
            outcome,
            payload_len / 1024,
            rasterize_elapsed.as_millis(),
            deliver_elapsed.as_millis(),
            total_start.elapsed().as_millis()
        );
        Ok(outcome)
    }

    fn download_artifact(&self, artifact: &ExportArtifact) -> Result<ExportOutcome, WorkflowError> {
        self.download
            .download(artifact.image_data(), artifact.filename())?;
        Ok(ExportOutcome::Downloaded {
            filename: artifact.filename().to_string(),
        })
    }

    async fn share_artifact(&self, artifact: &ExportArtifact) -> Result<ExportOutcome, WorkflowError> {
        let _progress = ProgressGuard::present(self.native.progress.as_ref()).await?;

        let locator = self
            .native
            .store
            .write(artifact.filename(), artifact.image_data())
            .await?;
        let cache_file = CacheFileGuard::new(Arc::clone(&self.native.store), artifact.filename());
        log::debug!("📦 缓存文件已写入 - {}", locator);

        let shared = self.native.share.share(&locator).await;
        let cleaned = cache_file.release().await;

        let filename = artifact.filename().to_string();
        match (shared, cleaned) {
            (Ok(ShareOutcome::Completed), Ok(())) => Ok(ExportOutcome::Shared { filename }),
            (Ok(ShareOutcome::Cancelled), Ok(())) => {
                log::info!("↩️ 用户取消分享");
                Ok(ExportOutcome::ShareCancelled { filename })
            }
            (Ok(_), Err(cleanup_err)) => Err(cleanup_err),
            (Err(share_err), Ok(())) => Err(share_err),
            (Err(share_err), Err(cleanup_err)) => {
                log::warn!("分享失败后清理缓存文件也失败：{}", cleanup_err);
                Err(share_err)
            }
        }
    }
}
