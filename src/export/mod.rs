//! 截图导出：Web 下载，或原生端写缓存 → 分享 → 删除。

mod artifact;
mod fs_store;
mod guard;
mod pipeline;

pub use artifact::{ExportArtifact, decode_base64_payload, sniff_mime_type};
pub use fs_store::FsCacheStore;
pub use pipeline::{CaptureExportPipeline, ExportOutcome, ShareCapabilities};
