//! 码值获取：实时扫码会话、图片识别兜底，以及二者共同写入的结果槽。

mod image_decode;
mod result;
mod session;

pub use image_decode::{ImageDecodeAdapter, ImportOutcome};
pub use result::{ResultSlot, ScanResult, ScanSource};
pub use session::{ScanAvailability, ScanOutcome, ScanSessionController, SessionState};
