//! 由 Tauri 插件直接提供的能力：确认对话框、图片选择器、外部浏览器。

use async_trait::async_trait;
use tauri::{AppHandle, Wry};
use tauri_plugin_dialog::{DialogExt, MessageDialogButtons, MessageDialogKind};
use tauri_plugin_shell::ShellExt;
use tokio::sync::oneshot;

use crate::capability::{
    ConfirmRequest, ConfirmationPrompt, ExternalBrowser, ImagePicker, PickedFile, PromptChoice,
};
use crate::workflow::WorkflowError;

const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "webp", "bmp"];

pub struct DialogPrompt {
    app: AppHandle<Wry>,
}

impl DialogPrompt {
    pub fn new(app: AppHandle<Wry>) -> Self {
        Self { app }
    }
}

#[async_trait]
impl ConfirmationPrompt for DialogPrompt {
    async fn ask(&self, request: &ConfirmRequest) -> Result<PromptChoice, WorkflowError> {
        let (tx, rx) = oneshot::channel();
        self.app
            .dialog()
            .message(request.message.clone())
            .title(request.header.clone())
            .kind(MessageDialogKind::Info)
            .buttons(MessageDialogButtons::OkCancelCustom(
                request.confirm_label.clone(),
                request.cancel_label.clone(),
            ))
            .show(move |confirmed| {
                let _ = tx.send(confirmed);
            });

        let confirmed = rx
            .await
            .map_err(|_| WorkflowError::Prompt("确认对话框未返回结果".to_string()))?;
        Ok(if confirmed {
            PromptChoice::Confirm
        } else {
            PromptChoice::Cancel
        })
    }
}

pub struct DialogImagePicker {
    app: AppHandle<Wry>,
}

impl DialogImagePicker {
    pub fn new(app: AppHandle<Wry>) -> Self {
        Self { app }
    }
}

#[async_trait]
impl ImagePicker for DialogImagePicker {
    async fn pick_single_image(&self) -> Result<Option<PickedFile>, WorkflowError> {
        let (tx, rx) = oneshot::channel();
        self.app
            .dialog()
            .file()
            .add_filter("图片", IMAGE_EXTENSIONS)
            .pick_file(move |file| {
                let _ = tx.send(file);
            });

        let picked = rx
            .await
            .map_err(|_| WorkflowError::Picker("图片选择器未返回结果".to_string()))?;
        Ok(picked.map(|file| PickedFile::from_path(file.to_string())))
    }
}

pub struct ShellBrowser {
    app: AppHandle<Wry>,
}

impl ShellBrowser {
    pub fn new(app: AppHandle<Wry>) -> Self {
        Self { app }
    }
}

#[async_trait]
impl ExternalBrowser for ShellBrowser {
    // tauri-plugin-shell 的 open 已标记弃用，但仍是 shell 插件内打开链接的入口
    #[allow(deprecated)]
    async fn open(&self, url: &str) -> Result<(), WorkflowError> {
        log::info!("🌐 打开外部浏览器: {}", url);
        self.app
            .shell()
            .open(url, None)
            .map_err(|e| WorkflowError::Browser(e.to_string()))
    }
}
