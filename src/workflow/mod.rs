//! # 工作流门面（可注入状态）
//!
//! ## 设计思路
//!
//! `ScanWorkflow` 把平台上下文、共享结果槽与四个组件装配在一起，
//! 作为 Tauri 托管状态注入命令层；测试中则用内存假能力装配独立实例。
//!
//! 组件之间除结果槽与平台上下文外互不依赖：
//!
//! ```text
//! 用户操作
//!    ├─ ScanSessionController ──┐
//!    └─ ImageDecodeAdapter ─────┴─→ ResultSlot ─→ ResultActionDispatcher
//!                                                CaptureExportPipeline（读取页面元素）
//! ```

mod error;
pub(crate) mod flight;

use std::sync::Arc;

pub use error::{ErrorKind, WorkflowError};

use crate::capability::{
    CacheFileStore, CapabilityProbe, Clipboard, ConfirmationPrompt, DownloadTrigger,
    ExternalBrowser, ImageDecoder, ImagePicker, Notifier, ProgressIndicator, Rasterizer,
    ScanSurface, ShareSheet,
};
use crate::config::{ConfigError, WorkflowConfig};
use crate::dispatch::{OpenOutcome, ResultActionDispatcher};
use crate::export::{CaptureExportPipeline, ExportOutcome, ShareCapabilities};
use crate::platform::PlatformContext;
use crate::scan::{
    ImageDecodeAdapter, ImportOutcome, ResultSlot, ScanAvailability, ScanOutcome, ScanResult,
    ScanSessionController,
};

/// 宿主注入的全部平台能力。
pub struct Capabilities {
    pub probe: Arc<dyn CapabilityProbe>,
    pub surface: Arc<dyn ScanSurface>,
    pub picker: Arc<dyn ImagePicker>,
    pub decoder: Arc<dyn ImageDecoder>,
    pub rasterizer: Arc<dyn Rasterizer>,
    pub download: Arc<dyn DownloadTrigger>,
    pub cache_store: Arc<dyn CacheFileStore>,
    pub share: Arc<dyn ShareSheet>,
    pub progress: Arc<dyn ProgressIndicator>,
    pub clipboard: Arc<dyn Clipboard>,
    pub prompt: Arc<dyn ConfirmationPrompt>,
    pub notifier: Arc<dyn Notifier>,
    pub browser: Arc<dyn ExternalBrowser>,
}

pub struct ScanWorkflow {
    platform: PlatformContext,
    config: WorkflowConfig,
    slot: ResultSlot,
    scanner: ScanSessionController,
    importer: ImageDecodeAdapter,
    exporter: CaptureExportPipeline,
    dispatcher: ResultActionDispatcher,
}

impl ScanWorkflow {
    /// 按配置中的平台策略装配工作流。
    pub fn new(config: WorkflowConfig, capabilities: Capabilities) -> Result<Self, ConfigError> {
        let platform = PlatformContext::resolve(config.platform);
        Self::with_platform(platform, config, capabilities)
    }

    pub fn with_platform(
        platform: PlatformContext,
        config: WorkflowConfig,
        capabilities: Capabilities,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let slot = ResultSlot::new();

        let scanner = ScanSessionController::new(
            platform,
            capabilities.probe,
            capabilities.surface,
            slot.clone(),
            config.scan.surface_config(),
        );
        let importer = ImageDecodeAdapter::new(
            capabilities.picker,
            capabilities.decoder,
            slot.clone(),
            config.scan.formats.clone(),
        );
        let exporter = CaptureExportPipeline::new(
            platform,
            capabilities.rasterizer,
            capabilities.download,
            ShareCapabilities {
                store: capabilities.cache_store,
                share: capabilities.share,
                progress: capabilities.progress,
            },
            config.export.clone(),
        );
        let dispatcher = ResultActionDispatcher::new(
            slot.clone(),
            capabilities.clipboard,
            capabilities.notifier,
            capabilities.prompt,
            capabilities.browser,
            config.feedback.clone(),
            config.browser.clone(),
        );

        log::info!(
            "⚙️ 工作流已装配 - native={} export={}",
            platform.is_native_capable(),
            config.export.filename
        );

        Ok(Self {
            platform,
            config,
            slot,
            scanner,
            importer,
            exporter,
            dispatcher,
        })
    }

    pub fn platform(&self) -> PlatformContext {
        self.platform
    }

    pub fn config(&self) -> &WorkflowConfig {
        &self.config
    }

    pub fn result_slot(&self) -> &ResultSlot {
        &self.slot
    }

    pub fn scanner(&self) -> &ScanSessionController {
        &self.scanner
    }

    pub fn importer(&self) -> &ImageDecodeAdapter {
        &self.importer
    }

    pub fn exporter(&self) -> &CaptureExportPipeline {
        &self.exporter
    }

    pub fn dispatcher(&self) -> &ResultActionDispatcher {
        &self.dispatcher
    }

    pub async fn initialize(&self) -> Result<Option<ScanAvailability>, WorkflowError> {
        self.scanner.initialize().await
    }

    pub async fn start_scan(&self) -> Result<ScanOutcome, WorkflowError> {
        self.scanner.start_scan().await
    }

    pub async fn read_from_image(&self) -> Result<ImportOutcome, WorkflowError> {
        self.importer.read_from_image().await
    }

    /// 导出指定元素；未指定时使用配置中的默认元素。
    pub async fn capture_and_export(
        &self,
        element_id: Option<&str>,
    ) -> Result<ExportOutcome, WorkflowError> {
        let element_id = element_id.unwrap_or(self.config.export.element_id.as_str());
        self.exporter.capture_and_export(element_id).await
    }

    pub async fn copy_to_clipboard(&self) -> Result<(), WorkflowError> {
        self.dispatcher.copy_to_clipboard().await
    }

    pub fn is_url(&self) -> Result<bool, WorkflowError> {
        self.dispatcher.is_url()
    }

    pub async fn open_as_url(&self) -> Result<OpenOutcome, WorkflowError> {
        self.dispatcher.open_as_url().await
    }

    pub fn current_result(&self) -> Result<Option<ScanResult>, WorkflowError> {
        self.slot.current()
    }

    pub fn clear_result(&self) -> Result<(), WorkflowError> {
        self.slot.clear()
    }
}
