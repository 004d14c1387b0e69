//! # 平台能力接口
//!
//! ## 设计思路
//!
//! 相机、扫码界面、图片选择、条码识别、截图、缓存文件、分享、剪贴板、
//! 确认对话框、通知、外部浏览器都属于外部协作方。工作流只通过这里定义的
//! trait 调用它们，具体实现由宿主注入（Tauri 外壳见 `app` 模块，测试使用内存假实现）。
//!
//! ## 实现思路
//!
//! - 异步能力使用 `async_trait`，以便以 `Arc<dyn Trait>` 形式注入并作为 Tauri 托管状态。
//! - 能力调用失败直接返回对应的 [`WorkflowError`] 分支，工作流不再二次包装。
//! - `ProgressIndicator::dismiss`、`Notifier::show`、`DownloadTrigger::download`
//!   为同步调用：前两者是"即发即忘"，且 `dismiss` 需要能在 `Drop` 中执行。

use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::workflow::WorkflowError;

/// 相机权限状态。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PermissionState {
    Granted,
    Limited,
    Denied,
    Prompt,
    PromptWithRationale,
}

impl PermissionState {
    /// 是否允许打开相机。
    pub fn is_granted(self) -> bool {
        matches!(self, Self::Granted | Self::Limited)
    }

    /// 是否还可以向用户申请权限。
    pub fn needs_request(self) -> bool {
        matches!(self, Self::Prompt | Self::PromptWithRationale)
    }
}

impl fmt::Display for PermissionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::Granted => "granted",
            Self::Limited => "limited",
            Self::Denied => "denied",
            Self::Prompt => "prompt",
            Self::PromptWithRationale => "prompt-with-rationale",
        };
        f.write_str(text)
    }
}

/// 条码制式。允许列表为空表示接受全部支持的制式。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BarcodeFormat {
    Aztec,
    Codabar,
    Code39,
    Code93,
    Code128,
    DataMatrix,
    Ean8,
    Ean13,
    Itf,
    Pdf417,
    QrCode,
    UpcA,
    UpcE,
}

/// 摄像头朝向。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LensFacing {
    Front,
    #[default]
    Back,
}

/// 扫码界面展示参数。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanSurfaceConfig {
    pub formats: Vec<BarcodeFormat>,
    pub facing: LensFacing,
}

/// 识别出的单个条码。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScannedCode {
    pub display_value: String,
    #[serde(default)]
    pub format: Option<BarcodeFormat>,
}

impl ScannedCode {
    pub fn new(display_value: impl Into<String>) -> Self {
        Self {
            display_value: display_value.into(),
            format: None,
        }
    }
}

/// 图片选择器返回的文件引用。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PickedFile {
    /// 本地路径或平台 URI。
    pub path: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub mime_type: Option<String>,
}

impl PickedFile {
    pub fn from_path(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            name: None,
            mime_type: None,
        }
    }
}

/// 截图结果：浏览器原生图片表示（Data URL）。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RasterImage {
    pub data_url: String,
}

/// 缓存文件写入后得到的资源定位符（`file://` URI 等）。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResourceLocator(String);

impl ResourceLocator {
    pub fn new(uri: impl Into<String>) -> Self {
        Self(uri.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ResourceLocator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// 分享面板的结束方式。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ShareOutcome {
    Completed,
    Cancelled,
}

/// 二选一确认对话框的内容。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfirmRequest {
    pub header: String,
    pub message: String,
    pub confirm_label: String,
    pub cancel_label: String,
}

/// 用户在确认对话框中点击的按钮。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PromptChoice {
    Confirm,
    Cancel,
}

/// 通知配色。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToastStyle {
    Primary,
    Secondary,
    #[default]
    Tertiary,
    Success,
    Warning,
    Danger,
}

/// 自动消失的短通知。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Toast {
    pub message: String,
    pub duration_ms: u64,
    pub style: ToastStyle,
    #[serde(default)]
    pub icon: Option<String>,
}

/// 扫码硬件与权限探测。
#[async_trait]
pub trait CapabilityProbe: Send + Sync {
    async fn is_supported(&self) -> Result<bool, WorkflowError>;

    async fn check_permission(&self) -> Result<PermissionState, WorkflowError>;

    /// 向用户申请相机权限。默认实现只重新查询一次。
    async fn request_permission(&self) -> Result<PermissionState, WorkflowError> {
        self.check_permission().await
    }

    /// 清理残留的结果监听器。没有监听器时也必须成功。
    async fn clear_listeners(&self) -> Result<(), WorkflowError>;
}

/// 实时扫码界面。`present` 一直挂起到界面关闭；关闭时未携带结果返回 `None`。
#[async_trait]
pub trait ScanSurface: Send + Sync {
    async fn present(&self, config: ScanSurfaceConfig) -> Result<Option<ScannedCode>, WorkflowError>;
}

/// 单选图片选择器。用户取消返回 `None`。
#[async_trait]
pub trait ImagePicker: Send + Sync {
    async fn pick_single_image(&self) -> Result<Option<PickedFile>, WorkflowError>;
}

/// 静态图片条码识别。未识别到时返回空序列。
#[async_trait]
pub trait ImageDecoder: Send + Sync {
    async fn decode(
        &self,
        file: &PickedFile,
        formats: &[BarcodeFormat],
    ) -> Result<Vec<ScannedCode>, WorkflowError>;
}

/// 将页面元素截图为图片。
#[async_trait]
pub trait Rasterizer: Send + Sync {
    async fn rasterize(&self, element_id: &str) -> Result<RasterImage, WorkflowError>;
}

/// 易失性缓存目录中的文件读写。
#[async_trait]
pub trait CacheFileStore: Send + Sync {
    async fn write(&self, name: &str, data: &str) -> Result<ResourceLocator, WorkflowError>;

    async fn delete(&self, name: &str) -> Result<(), WorkflowError>;
}

/// 系统分享面板。
#[async_trait]
pub trait ShareSheet: Send + Sync {
    async fn share(&self, locator: &ResourceLocator) -> Result<ShareOutcome, WorkflowError>;
}

/// Web 端下载：把 Data URL 绑定到带固定文件名的链接并触发点击。
pub trait DownloadTrigger: Send + Sync {
    fn download(&self, data_url: &str, filename: &str) -> Result<(), WorkflowError>;
}

/// 阻塞式加载指示器。
#[async_trait]
pub trait ProgressIndicator: Send + Sync {
    async fn present(&self) -> Result<(), WorkflowError>;

    fn dismiss(&self);
}

#[async_trait]
pub trait Clipboard: Send + Sync {
    async fn write(&self, text: &str) -> Result<(), WorkflowError>;
}

#[async_trait]
pub trait ConfirmationPrompt: Send + Sync {
    async fn ask(&self, request: &ConfirmRequest) -> Result<PromptChoice, WorkflowError>;
}

/// 即发即忘的通知。
pub trait Notifier: Send + Sync {
    fn show(&self, toast: Toast);
}

#[async_trait]
pub trait ExternalBrowser: Send + Sync {
    async fn open(&self, url: &str) -> Result<(), WorkflowError>;
}
