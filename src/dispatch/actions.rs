//! # 扫码结果操作
//!
//! 基于当前结果槽提供三种操作：
//! - 复制：原样写入剪贴板（空文本也照常写入），成功后弹出一条短通知。
//! - URL 判断：常见顶级域后缀的提示性匹配。
//! - 打开：补全协议后弹出确认框，仅在用户明确确认时调用外部浏览器。

use std::sync::Arc;

use serde::Serialize;

use crate::capability::{Clipboard, ConfirmationPrompt, ExternalBrowser, Notifier, PromptChoice};
use crate::config::{BrowserSettings, FeedbackSettings};
use crate::scan::ResultSlot;
use crate::workflow::WorkflowError;

use super::url::{looks_like_url, with_secure_scheme};

/// 打开链接操作的结局。
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum OpenOutcome {
    Opened { url: String },
    Declined,
}

pub struct ResultActionDispatcher {
    slot: ResultSlot,
    clipboard: Arc<dyn Clipboard>,
    notifier: Arc<dyn Notifier>,
    prompt: Arc<dyn ConfirmationPrompt>,
    browser: Arc<dyn ExternalBrowser>,
    feedback: FeedbackSettings,
    browser_settings: BrowserSettings,
}

impl ResultActionDispatcher {
    pub fn new(
        slot: ResultSlot,
        clipboard: Arc<dyn Clipboard>,
        notifier: Arc<dyn Notifier>,
        prompt: Arc<dyn ConfirmationPrompt>,
        browser: Arc<dyn ExternalBrowser>,
        feedback: FeedbackSettings,
        browser_settings: BrowserSettings,
    ) -> Self {
        Self {
            slot,
            clipboard,
            notifier,
            prompt,
            browser,
            feedback,
            browser_settings,
        }
    }

    pub async fn copy_to_clipboard(&self) -> Result<(), WorkflowError> {
        let text = self.slot.text()?;
        self.clipboard.write(&text).await?;
        log::info!("📋 已复制扫码结果 - 长度={}", text.chars().count());
        self.notifier.show(self.feedback.copied_toast());
        Ok(())
    }

    pub fn is_url(&self) -> Result<bool, WorkflowError> {
        Ok(looks_like_url(&self.slot.text()?))
    }

    /// 需要用户确认后才会真正打开浏览器。
    pub async fn open_as_url(&self) -> Result<OpenOutcome, WorkflowError> {
        let text = self.slot.text()?;
        let url = with_secure_scheme(&text, self.browser_settings.scheme_check);

        let choice = self
            .prompt
            .ask(&self.browser_settings.confirm_request())
            .await?;

        match choice {
            PromptChoice::Confirm => {
                self.browser.open(&url).await?;
                log::info!("🌐 已在外部浏览器打开扫码结果");
                Ok(OpenOutcome::Opened { url })
            }
            PromptChoice::Cancel => {
                log::debug!("用户取消打开浏览器");
                Ok(OpenOutcome::Declined)
            }
        }
    }
}
