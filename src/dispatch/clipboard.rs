//! 系统剪贴板（arboard）
//!
//! 与操作系统剪贴板交互放在阻塞线程中执行，避免阻塞 async 运行时。

use async_trait::async_trait;

use crate::capability::Clipboard;
use crate::workflow::WorkflowError;

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClipboard;

#[async_trait]
impl Clipboard for SystemClipboard {
    async fn write(&self, text: &str) -> Result<(), WorkflowError> {
        let text = text.to_owned();
        tokio::task::spawn_blocking(move || {
            let mut clipboard =
                arboard::Clipboard::new().map_err(|e| WorkflowError::Clipboard(e.to_string()))?;
            clipboard
                .set_text(text)
                .map_err(|e| WorkflowError::Clipboard(e.to_string()))
        })
        .await
        .map_err(|e| WorkflowError::Clipboard(format!("剪贴板写入线程异常：{}", e)))?
    }
}
