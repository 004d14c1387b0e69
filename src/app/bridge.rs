//! # 前端桥接
//!
//! ## 设计思路
//!
//! 扫码界面、截图、图片识别、下载链接、加载指示器、通知与分享面板都运行在 webview 中。
//! `WebviewBridge` 以 Tauri 事件向前端发出请求，前端处理完毕后调用
//! `resolve_bridge_request` 命令回传结果，二者通过 `requestId` 配对。
//!
//! ## 实现思路
//!
//! - 待响应请求登记在 [`PendingReplies`] 中；等待端被丢弃（超时、调用方放弃、事件发送失败）时自动注销。
//! - 能力探测、图片识别与截图有回复时限；扫码界面与分享面板由用户操作决定时长，不设时限。
//! - 前端回传 `error` 字段时映射为对应能力的 `WorkflowError` 分支。
//! - 下载、指示器、通知为即发即忘事件，不登记等待。

use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tauri::{AppHandle, Emitter, Wry};

use crate::capability::{
    BarcodeFormat, CapabilityProbe, DownloadTrigger, ImageDecoder, Notifier, PermissionState,
    PickedFile, ProgressIndicator, RasterImage, Rasterizer, ResourceLocator, ScanSurface,
    ScanSurfaceConfig, ScannedCode, ShareOutcome, ShareSheet, Toast,
};
use crate::error::AppError;
use crate::pending::PendingReplies;
use crate::workflow::WorkflowError;

pub const EVENT_IS_SUPPORTED: &str = "scanner:is-supported";
pub const EVENT_CHECK_PERMISSION: &str = "scanner:check-permission";
pub const EVENT_REQUEST_PERMISSION: &str = "scanner:request-permission";
pub const EVENT_CLEAR_LISTENERS: &str = "scanner:clear-listeners";
pub const EVENT_PRESENT_SURFACE: &str = "scanner:present";
pub const EVENT_DECODE_IMAGE: &str = "scanner:decode-image";
pub const EVENT_RASTERIZE: &str = "capture:rasterize";
pub const EVENT_DOWNLOAD: &str = "capture:download";
pub const EVENT_SHARE: &str = "share:open";
pub const EVENT_PROGRESS_PRESENT: &str = "progress:present";
pub const EVENT_PROGRESS_DISMISS: &str = "progress:dismiss";
pub const EVENT_TOAST: &str = "toast:show";

/// 非交互请求等待前端回复的时限。
pub const REPLY_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct BridgeRequest<P> {
    request_id: String,
    payload: P,
}

/// 前端对桥接请求的回复。
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BridgeReply {
    pub request_id: String,
    #[serde(default)]
    pub value: serde_json::Value,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct DecodePayload<'a> {
    file: &'a PickedFile,
    formats: &'a [BarcodeFormat],
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct RasterizePayload<'a> {
    element_id: &'a str,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct DownloadPayload<'a> {
    data_url: &'a str,
    filename: &'a str,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct SharePayload<'a> {
    url: &'a str,
}

pub struct WebviewBridge {
    app: AppHandle<Wry>,
    pending: PendingReplies<BridgeReply>,
}

impl WebviewBridge {
    pub fn new(app: AppHandle<Wry>) -> Self {
        Self {
            app,
            pending: PendingReplies::new(),
        }
    }

    /// 把前端回复交给等待中的请求。未知或已过期的 `requestId` 返回 `false`。
    pub fn resolve(&self, reply: BridgeReply) -> Result<bool, AppError> {
        let request_id = reply.request_id.clone();
        self.pending
            .resolve(&request_id, reply)
            .map_err(|e| AppError::Bridge(e.to_string()))
    }

    async fn request<P, T>(
        &self,
        event: &'static str,
        payload: P,
        timeout: Option<Duration>,
    ) -> Result<T, String>
    where
        P: Serialize + Clone + Send,
        T: DeserializeOwned,
    {
        let pending = self.pending.register(event).map_err(|e| e.to_string())?;
        let request = BridgeRequest {
            request_id: pending.id().to_string(),
            payload,
        };
        self.app
            .emit(event, request)
            .map_err(|e| format!("发送前端事件 {} 失败：{}", event, e))?;

        let reply = pending.wait(timeout).await.map_err(|e| e.to_string())?;
        if let Some(error) = reply.error {
            return Err(error);
        }
        serde_json::from_value(reply.value).map_err(|e| format!("前端响应格式错误：{}", e))
    }

    fn notify<P: Serialize + Clone>(&self, event: &'static str, payload: P) -> Result<(), String> {
        self.app
            .emit(event, payload)
            .map_err(|e| format!("发送前端事件 {} 失败：{}", event, e))
    }
}

#[async_trait]
impl CapabilityProbe for WebviewBridge {
    async fn is_supported(&self) -> Result<bool, WorkflowError> {
        self.request(EVENT_IS_SUPPORTED, (), Some(REPLY_TIMEOUT))
            .await
            .map_err(WorkflowError::Unavailable)
    }

    async fn check_permission(&self) -> Result<PermissionState, WorkflowError> {
        self.request(EVENT_CHECK_PERMISSION, (), Some(REPLY_TIMEOUT))
            .await
            .map_err(WorkflowError::Unavailable)
    }

    async fn request_permission(&self) -> Result<PermissionState, WorkflowError> {
        self.request(EVENT_REQUEST_PERMISSION, (), Some(REPLY_TIMEOUT))
            .await
            .map_err(WorkflowError::Unavailable)
    }

    async fn clear_listeners(&self) -> Result<(), WorkflowError> {
        self.request(EVENT_CLEAR_LISTENERS, (), Some(REPLY_TIMEOUT))
            .await
            .map_err(WorkflowError::Unavailable)
    }
}

#[async_trait]
impl ScanSurface for WebviewBridge {
    async fn present(&self, config: ScanSurfaceConfig) -> Result<Option<ScannedCode>, WorkflowError> {
        self.request(EVENT_PRESENT_SURFACE, config, None)
            .await
            .map_err(WorkflowError::Presentation)
    }
}

#[async_trait]
impl ImageDecoder for WebviewBridge {
    async fn decode(
        &self,
        file: &PickedFile,
        formats: &[BarcodeFormat],
    ) -> Result<Vec<ScannedCode>, WorkflowError> {
        self.request(EVENT_DECODE_IMAGE, DecodePayload { file, formats }, Some(REPLY_TIMEOUT))
            .await
            .map_err(WorkflowError::Decoder)
    }
}

#[async_trait]
impl Rasterizer for WebviewBridge {
    async fn rasterize(&self, element_id: &str) -> Result<RasterImage, WorkflowError> {
        self.request(EVENT_RASTERIZE, RasterizePayload { element_id }, Some(REPLY_TIMEOUT))
            .await
            .map_err(WorkflowError::Rasterize)
    }
}

#[async_trait]
impl ShareSheet for WebviewBridge {
    async fn share(&self, locator: &ResourceLocator) -> Result<ShareOutcome, WorkflowError> {
        self.request(EVENT_SHARE, SharePayload { url: locator.as_str() }, None)
            .await
            .map_err(WorkflowError::Share)
    }
}

impl DownloadTrigger for WebviewBridge {
    fn download(&self, data_url: &str, filename: &str) -> Result<(), WorkflowError> {
        self.notify(EVENT_DOWNLOAD, DownloadPayload { data_url, filename })
            .map_err(WorkflowError::Download)
    }
}

#[async_trait]
impl ProgressIndicator for WebviewBridge {
    async fn present(&self) -> Result<(), WorkflowError> {
        self.notify(EVENT_PROGRESS_PRESENT, ())
            .map_err(WorkflowError::Presentation)
    }

    fn dismiss(&self) {
        if let Err(err) = self.notify(EVENT_PROGRESS_DISMISS, ()) {
            log::warn!("关闭加载指示器失败：{}", err);
        }
    }
}

impl Notifier for WebviewBridge {
    fn show(&self, toast: Toast) {
        if let Err(err) = self.notify(EVENT_TOAST, toast) {
            log::warn!("发送通知失败：{}", err);
        }
    }
}
