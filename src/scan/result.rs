//! # 扫码结果与共享结果槽
//!
//! 工作流中唯一的共享可变状态。扫码与识图写入，结果操作与前端读取。
//! 只做整体替换（后写者胜），从不局部修改；槽为空表示"尚未扫码"。

use std::sync::{Arc, RwLock};

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

use crate::capability::{BarcodeFormat, ScannedCode};
use crate::workflow::WorkflowError;

/// 结果来源。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScanSource {
    Camera,
    Image,
}

/// 一次成功识别的结果。
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanResult {
    pub text: String,
    pub source: ScanSource,
    pub format: Option<BarcodeFormat>,
    pub scanned_at: DateTime<Local>,
}

impl ScanResult {
    pub fn new(text: impl Into<String>, source: ScanSource) -> Self {
        Self {
            text: text.into(),
            source,
            format: None,
            scanned_at: Local::now(),
        }
    }

    pub fn from_code(code: ScannedCode, source: ScanSource) -> Self {
        Self {
            text: code.display_value,
            source,
            format: code.format,
            scanned_at: Local::now(),
        }
    }
}

/// 当前扫码结果槽。克隆后共享同一份状态。
#[derive(Debug, Clone, Default)]
pub struct ResultSlot {
    inner: Arc<RwLock<Option<ScanResult>>>,
}

impl ResultSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// 用新结果整体替换旧结果。
    pub fn publish(&self, result: ScanResult) -> Result<(), WorkflowError> {
        let mut slot = self
            .inner
            .write()
            .map_err(|_| WorkflowError::StatePoisoned("扫码结果写入锁"))?;
        log::debug!(
            "📝 更新扫码结果 - 来源={:?} 长度={}",
            result.source,
            result.text.chars().count()
        );
        *slot = Some(result);
        Ok(())
    }

    pub fn current(&self) -> Result<Option<ScanResult>, WorkflowError> {
        self.inner
            .read()
            .map(|slot| slot.clone())
            .map_err(|_| WorkflowError::StatePoisoned("扫码结果读取锁"))
    }

    /// 当前文本；尚未扫码时为空串。
    pub fn text(&self) -> Result<String, WorkflowError> {
        Ok(self.current()?.map(|result| result.text).unwrap_or_default())
    }

    pub fn clear(&self) -> Result<(), WorkflowError> {
        let mut slot = self
            .inner
            .write()
            .map_err(|_| WorkflowError::StatePoisoned("扫码结果写入锁"))?;
        *slot = None;
        Ok(())
    }
}
