//! # 工作流错误模型
//!
//! ## 设计思路
//!
//! 扫码 / 识图 / 导出 / 结果操作四条链路共用一个错误枚举，能力层（相机、文件、
//! 分享、剪贴板、浏览器）直接产出对应分支，工作流原样向上透传，不做重试。
//!
//! 用户主动取消（未选图片、关闭扫码界面、取消分享、拒绝打开浏览器）**不是错误**，
//! 由各链路的 `*Outcome` 枚举表达，这里不出现。
//!
//! 错误按 [`ErrorKind`] 归类：能力不可用 / 解码失败 / I/O 失败。
//! 三类均不致命，失败后上一次的扫码结果保持不变，用户可直接重试。

use crate::capability::PermissionState;

/// 工作流错误分类。
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ErrorKind {
    /// 硬件不支持、权限被拒或同类操作正在进行，对应功能暂不可用。
    CapabilityUnavailable,
    /// 图片中没有可识别的条码。
    DecodeFailure,
    /// 文件、分享、剪贴板、对话框、浏览器等能力调用失败。
    Io,
}

impl ErrorKind {
    /// 工作流内不存在致命错误。
    pub fn is_fatal(self) -> bool {
        false
    }
}

/// 工作流统一错误类型。
///
/// 在命令层被上转为 `AppError`，最终透传给前端。
#[derive(Debug, thiserror::Error)]
pub enum WorkflowError {
    #[error("扫码能力不可用：{0}")]
    Unavailable(String),

    #[error("相机权限未授予（当前状态：{0}）")]
    PermissionDenied(PermissionState),

    #[error("{0} 正在进行中，请稍后再试")]
    Busy(&'static str),

    #[error("扫码界面展示失败：{0}")]
    Presentation(String),

    #[error("图片选择失败：{0}")]
    Picker(String),

    #[error("图片识别失败：{0}")]
    Decoder(String),

    #[error("图片中未识别到条码")]
    NoCodeFound,

    #[error("元素截图失败：{0}")]
    Rasterize(String),

    #[error("导出内容无效：{0}")]
    InvalidArtifact(String),

    #[error("文件错误：{0}")]
    FileSystem(String),

    #[error("分享失败：{0}")]
    Share(String),

    #[error("下载失败：{0}")]
    Download(String),

    #[error("剪贴板错误：{0}")]
    Clipboard(String),

    #[error("确认对话框错误：{0}")]
    Prompt(String),

    #[error("打开浏览器失败：{0}")]
    Browser(String),

    #[error("状态锁已中毒：{0}")]
    StatePoisoned(&'static str),
}

impl WorkflowError {
    /// 所属错误分类。
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Unavailable(_) | Self::PermissionDenied(_) | Self::Busy(_) => {
                ErrorKind::CapabilityUnavailable
            }
            Self::NoCodeFound => ErrorKind::DecodeFailure,
            _ => ErrorKind::Io,
        }
    }

    /// 稳定错误码，供前端分支处理与埋点。
    pub fn code(&self) -> &'static str {
        match self {
            Self::Unavailable(_) => "scanner_unavailable",
            Self::PermissionDenied(_) => "permission_denied",
            Self::Busy(_) => "busy",
            Self::Presentation(_) => "presentation_failed",
            Self::Picker(_) => "picker_failed",
            Self::Decoder(_) => "decoder_failed",
            Self::NoCodeFound => "no_code_found",
            Self::Rasterize(_) => "rasterize_failed",
            Self::InvalidArtifact(_) => "invalid_artifact",
            Self::FileSystem(_) => "file_system",
            Self::Share(_) => "share_failed",
            Self::Download(_) => "download_failed",
            Self::Clipboard(_) => "clipboard_failed",
            Self::Prompt(_) => "prompt_failed",
            Self::Browser(_) => "browser_failed",
            Self::StatePoisoned(_) => "state_poisoned",
        }
    }
}
