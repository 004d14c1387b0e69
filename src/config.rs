//! # 工作流配置
//!
//! ## 设计思路
//!
//! 把所有"可调策略"集中到 `WorkflowConfig`：平台判定、扫码参数、导出文件名、
//! 复制提示、打开浏览器的确认文案与协议补全策略。`Default` 即生产可用配置。
//!
//! ## 实现思路
//!
//! - JSON 持久化（camelCase），缺省字段回落默认值，未知字段忽略。
//! - `validate` 在构造工作流前执行，拒绝明显错误的取值。
//! - 文件不存在视为使用默认配置。

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::capability::{BarcodeFormat, ConfirmRequest, LensFacing, ScanSurfaceConfig, Toast, ToastStyle};
use crate::dispatch::SchemeCheck;
use crate::platform::PlatformMode;

pub const DEFAULT_EXPORT_FILENAME: &str = "qrCode.png";
pub const DEFAULT_CAPTURE_ELEMENT_ID: &str = "qrImage";

const MIN_TOAST_DURATION_MS: u64 = 200;
const MAX_TOAST_DURATION_MS: u64 = 10_000;
const MIN_ARTIFACT_BYTES: u64 = 1024;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("配置值无效：{0}")]
    Invalid(String),

    #[error("解析配置失败：{0}")]
    Parse(#[from] serde_json::Error),

    #[error("读写配置文件失败：{0}")]
    Io(#[from] std::io::Error),
}

/// 工作流完整配置。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct WorkflowConfig {
    pub platform: PlatformMode,
    pub scan: ScanSettings,
    pub export: ExportSettings,
    pub feedback: FeedbackSettings,
    pub browser: BrowserSettings,
}

/// 扫码界面与识图参数。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ScanSettings {
    /// 空列表表示接受全部制式。
    pub formats: Vec<BarcodeFormat>,
    pub facing: LensFacing,
}

impl ScanSettings {
    pub fn surface_config(&self) -> ScanSurfaceConfig {
        ScanSurfaceConfig {
            formats: self.formats.clone(),
            facing: self.facing,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ExportSettings {
    /// 默认截图的页面元素。
    pub element_id: String,
    /// 下载与缓存使用的固定文件名。
    pub filename: String,
    /// 原生端写入缓存文件时，解码后的体积上限（字节）。
    pub max_artifact_bytes: u64,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            element_id: DEFAULT_CAPTURE_ELEMENT_ID.to_string(),
            filename: DEFAULT_EXPORT_FILENAME.to_string(),
            max_artifact_bytes: 16 * 1024 * 1024,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FeedbackSettings {
    pub copied_message: String,
    pub toast_duration_ms: u64,
    pub toast_style: ToastStyle,
    pub toast_icon: Option<String>,
}

impl Default for FeedbackSettings {
    fn default() -> Self {
        Self {
            copied_message: "已复制到剪贴板".to_string(),
            toast_duration_ms: 1000,
            toast_style: ToastStyle::Tertiary,
            toast_icon: Some("clipboard-outline".to_string()),
        }
    }
}

impl FeedbackSettings {
    pub fn copied_toast(&self) -> Toast {
        Toast {
            message: self.copied_message.clone(),
            duration_ms: self.toast_duration_ms,
            style: self.toast_style,
            icon: self.toast_icon.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BrowserSettings {
    pub scheme_check: SchemeCheck,
    pub confirm_header: String,
    pub confirm_message: String,
    pub confirm_label: String,
    pub cancel_label: String,
}

impl Default for BrowserSettings {
    fn default() -> Self {
        Self {
            scheme_check: SchemeCheck::Prefix,
            confirm_header: "确认".to_string(),
            confirm_message: "是否在浏览器中打开？".to_string(),
            confirm_label: "是".to_string(),
            cancel_label: "否".to_string(),
        }
    }
}

impl BrowserSettings {
    pub fn confirm_request(&self) -> ConfirmRequest {
        ConfirmRequest {
            header: self.confirm_header.clone(),
            message: self.confirm_message.clone(),
            confirm_label: self.confirm_label.clone(),
            cancel_label: self.cancel_label.clone(),
        }
    }
}

impl WorkflowConfig {
    pub fn from_json_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// 读取配置文件；文件不存在时返回默认配置。
    pub fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            log::info!("⚙️ 未找到工作流配置 {}，使用默认值", path.display());
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    pub fn save_to_path(&self, path: &Path) -> Result<(), ConfigError> {
        self.validate()?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let filename = self.export.filename.trim();
        if filename.is_empty() {
            return Err(ConfigError::Invalid("export.filename 不能为空".to_string()));
        }
        if filename.contains(['/', '\\']) || filename == "." || filename == ".." {
            return Err(ConfigError::Invalid(format!(
                "export.filename 不能包含路径：{}",
                filename
            )));
        }
        if self.export.element_id.trim().is_empty() {
            return Err(ConfigError::Invalid("export.elementId 不能为空".to_string()));
        }
        if self.export.max_artifact_bytes < MIN_ARTIFACT_BYTES {
            return Err(ConfigError::Invalid(format!(
                "export.maxArtifactBytes 不能小于 {} 字节",
                MIN_ARTIFACT_BYTES
            )));
        }
        if !(MIN_TOAST_DURATION_MS..=MAX_TOAST_DURATION_MS).contains(&self.feedback.toast_duration_ms) {
            return Err(ConfigError::Invalid(format!(
                "feedback.toastDurationMs 必须在 {}~{} 毫秒之间",
                MIN_TOAST_DURATION_MS, MAX_TOAST_DURATION_MS
            )));
        }
        Ok(())
    }
}
