//! # 从图片识别条码
//!
//! 实时扫码的兜底路径：单选一张图片 → 交给识别能力（不限制制式）→
//! 取第一个候选写入结果槽。
//!
//! - 用户取消选择（无文件或路径为空）是正常结局，不改动任何状态。
//! - 识别结果为空返回 [`WorkflowError::NoCodeFound`]，与取消严格区分。
//! - 多个候选时稳定地取第一个，不做排序。

use std::sync::Arc;

use serde::Serialize;

use crate::capability::{BarcodeFormat, ImageDecoder, ImagePicker};
use crate::workflow::WorkflowError;
use crate::workflow::flight::SingleFlight;

use super::result::{ResultSlot, ScanResult, ScanSource};

/// 一次识图操作的结局。
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", content = "result", rename_all = "camelCase")]
pub enum ImportOutcome {
    Decoded(ScanResult),
    NoSelection,
}

pub struct ImageDecodeAdapter {
    picker: Arc<dyn ImagePicker>,
    decoder: Arc<dyn ImageDecoder>,
    slot: ResultSlot,
    formats: Vec<BarcodeFormat>,
    flight: SingleFlight,
}

impl ImageDecodeAdapter {
    pub fn new(
        picker: Arc<dyn ImagePicker>,
        decoder: Arc<dyn ImageDecoder>,
        slot: ResultSlot,
        formats: Vec<BarcodeFormat>,
    ) -> Self {
        Self {
            picker,
            decoder,
            slot,
            formats,
            flight: SingleFlight::new("图片识别"),
        }
    }

    pub async fn read_from_image(&self) -> Result<ImportOutcome, WorkflowError> {
        let _flight = self.flight.try_acquire()?;

        let file = match self.picker.pick_single_image().await? {
            Some(file) if !file.path.trim().is_empty() => file,
            _ => {
                log::debug!("用户未选择图片，结束识图");
                return Ok(ImportOutcome::NoSelection);
            }
        };

        log::info!("🖼️ 开始识别图片中的条码 - {}", file.name.as_deref().unwrap_or(&file.path));
        let candidates = self.decoder.decode(&file, &self.formats).await?;
        let candidate_count = candidates.len();
        let first = candidates
            .into_iter()
            .next()
            .ok_or(WorkflowError::NoCodeFound)?;

        let result = ScanResult::from_code(first, ScanSource::Image);
        self.slot.publish(result.clone())?;
        log::info!(
            "✅ 图片识别成功 - 候选数={} 长度={}",
            candidate_count,
            result.text.chars().count()
        );
        Ok(ImportOutcome::Decoded(result))
    }
}
