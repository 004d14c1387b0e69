//! # Tauri 外壳
//!
//! 仅在启用 `app` feature 时编译。负责把核心工作流装配成 Tauri 托管状态，
//! 并向前端暴露命令。
//!
//! | 子模块 | 职责 |
//! |--------|------|
//! | [`bridge`] | 通过事件 + `requestId` 把 webview 内的能力接入工作流 |
//! | [`adapters`] | 对话框、图片选择器、外部浏览器（Tauri 插件） |
//! | [`commands`] | 前端可调用的命令 |
//! | [`config_store`] | `workflow.json` 的读取与保存 |

pub mod adapters;
pub mod bridge;
pub mod commands;
pub mod config_store;

use std::sync::Arc;

use tauri::{AppHandle, Manager};

use crate::dispatch::SystemClipboard;
use crate::export::FsCacheStore;
use crate::workflow::{Capabilities, ScanWorkflow};

use adapters::{DialogImagePicker, DialogPrompt, ShellBrowser};
use bridge::WebviewBridge;

/// 装配工作流并注册为托管状态。
pub fn manage_workflow(handle: &AppHandle) -> Result<(), Box<dyn std::error::Error>> {
    let config = config_store::load_or_default(handle);
    log::info!("setup: workflow config loaded");

    let cache_dir = handle.path().app_cache_dir()?;
    let cache_store = FsCacheStore::new(cache_dir).with_max_file_bytes(config.export.max_artifact_bytes);
    let bridge = Arc::new(WebviewBridge::new(handle.clone()));

    let capabilities = Capabilities {
        probe: bridge.clone(),
        surface: bridge.clone(),
        picker: Arc::new(DialogImagePicker::new(handle.clone())),
        decoder: bridge.clone(),
        rasterizer: bridge.clone(),
        download: bridge.clone(),
        cache_store: Arc::new(cache_store),
        share: bridge.clone(),
        progress: bridge.clone(),
        clipboard: Arc::new(SystemClipboard),
        prompt: Arc::new(DialogPrompt::new(handle.clone())),
        notifier: bridge.clone(),
        browser: Arc::new(ShellBrowser::new(handle.clone())),
    };

    let workflow = ScanWorkflow::new(config, capabilities)?;
    handle.manage(workflow);
    handle.manage(bridge);
    log::info!("setup: workflow state managed");
    Ok(())
}
