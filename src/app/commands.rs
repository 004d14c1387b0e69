//! 前端可调用的 Tauri 命令，均委托给托管的 [`ScanWorkflow`]。

use std::sync::Arc;

use tauri::State;

use super::bridge::{BridgeReply, WebviewBridge};
use crate::dispatch::OpenOutcome;
use crate::error::{AppError, CommandError};
use crate::export::ExportOutcome;
use crate::platform::PlatformContext;
use crate::scan::{ImportOutcome, ScanAvailability, ScanOutcome, ScanResult};
use crate::workflow::ScanWorkflow;

type CommandResult<T> = Result<T, CommandError>;

#[tauri::command]
pub fn get_platform(workflow: State<'_, ScanWorkflow>) -> PlatformContext {
    workflow.platform()
}

#[tauri::command]
pub async fn initialize_scanner(
    workflow: State<'_, ScanWorkflow>,
) -> CommandResult<Option<ScanAvailability>> {
    Ok(workflow.initialize().await?)
}

#[tauri::command]
pub async fn start_scan(workflow: State<'_, ScanWorkflow>) -> CommandResult<ScanOutcome> {
    Ok(workflow.start_scan().await?)
}

#[tauri::command]
pub async fn read_from_image(workflow: State<'_, ScanWorkflow>) -> CommandResult<ImportOutcome> {
    Ok(workflow.read_from_image().await?)
}

#[tauri::command]
pub async fn capture_and_export(
    workflow: State<'_, ScanWorkflow>,
    element_id: Option<String>,
) -> CommandResult<ExportOutcome> {
    Ok(workflow.capture_and_export(element_id.as_deref()).await?)
}

#[tauri::command]
pub async fn copy_scan_result(workflow: State<'_, ScanWorkflow>) -> CommandResult<()> {
    Ok(workflow.copy_to_clipboard().await?)
}

#[tauri::command]
pub fn is_scan_result_url(workflow: State<'_, ScanWorkflow>) -> CommandResult<bool> {
    Ok(workflow.is_url()?)
}

#[tauri::command]
pub async fn open_scan_result(workflow: State<'_, ScanWorkflow>) -> CommandResult<OpenOutcome> {
    Ok(workflow.open_as_url().await?)
}

#[tauri::command]
pub fn get_scan_result(workflow: State<'_, ScanWorkflow>) -> CommandResult<Option<ScanResult>> {
    Ok(workflow.current_result()?)
}

#[tauri::command]
pub fn clear_scan_result(workflow: State<'_, ScanWorkflow>) -> CommandResult<()> {
    Ok(workflow.clear_result()?)
}

/// 前端完成桥接请求后回传结果。
#[tauri::command]
pub fn resolve_bridge_request(
    bridge: State<'_, Arc<WebviewBridge>>,
    reply: BridgeReply,
) -> Result<bool, AppError> {
    bridge.resolve(reply)
}
