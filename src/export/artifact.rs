//! # 导出产物
//!
//! 截图得到的 Data URL 与固定文件名组成一次性的导出产物，只在单次导出调用内存在。
//! 导出流程原样透传 Data URL，不做解析或校验。
//!
//! 只有需要二进制内容的缓存存储才调用 [`decode_base64_payload`]。

use base64::{Engine as _, engine::general_purpose};

use crate::capability::RasterImage;
use crate::workflow::WorkflowError;

const DATA_URL_PREFIX: &str = "data:";
const BASE64_MARKER: &str = ";base64,";

/// 单次导出的产物。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportArtifact {
    image_data: String,
    filename: String,
}

impl ExportArtifact {
    pub fn new(raster: RasterImage, filename: impl Into<String>) -> Self {
        Self {
            image_data: raster.data_url,
            filename: filename.into(),
        }
    }

    /// Data URL 文本。
    pub fn image_data(&self) -> &str {
        &self.image_data
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }
}

/// 取出 `data:<mediatype>;base64,` 或纯 Base64 载荷并解码，解码前按体积上限拦截。
pub fn decode_base64_payload(data: &str, max_bytes: u64) -> Result<Vec<u8>, WorkflowError> {
    let normalized = data.trim();
    let base64_data = if normalized.starts_with(DATA_URL_PREFIX) {
        let start = normalized.find(BASE64_MARKER).ok_or_else(|| {
            WorkflowError::InvalidArtifact("Data URL 不是 base64 编码，无法写入文件".to_string())
        })?;
        &normalized[start + BASE64_MARKER.len()..]
    } else {
        normalized
    };

    let estimated = estimate_decoded_upper_bound(base64_data);
    if estimated > max_bytes {
        return Err(WorkflowError::InvalidArtifact(format!(
            "预计解码体积过大：{:.2} MB（限制：{:.2} MB）",
            estimated as f64 / 1024.0 / 1024.0,
            max_bytes as f64 / 1024.0 / 1024.0
        )));
    }

    general_purpose::STANDARD
        .decode(base64_data)
        .map_err(|e| WorkflowError::InvalidArtifact(format!("Base64 解码失败：{}", e)))
}

/// 按文件签名识别 MIME 类型，仅用于日志。
pub fn sniff_mime_type(bytes: &[u8]) -> &'static str {
    infer::get(bytes)
        .map(|kind| kind.mime_type())
        .unwrap_or("application/octet-stream")
}

fn estimate_decoded_upper_bound(base64_data: &str) -> u64 {
    let len = base64_data.len() as u64;
    len.saturating_add(3) / 4 * 3
}
