//! 工作流配置的读写命令。
//!
//! 配置文件位于应用配置目录下的 `workflow.json`，修改在下次启动时生效。

use std::fs;
use std::path::PathBuf;

use tauri::{AppHandle, Manager};

use crate::config::WorkflowConfig;
use crate::error::AppError;

const CONFIG_FILE_NAME: &str = "workflow.json";

fn config_file_path(app: &AppHandle) -> Result<PathBuf, AppError> {
    let config_dir = app
        .path()
        .app_config_dir()
        .map_err(|e| AppError::Storage(format!("获取应用配置目录失败: {}", e)))?;

    fs::create_dir_all(&config_dir)
        .map_err(|e| AppError::Storage(format!("创建应用配置目录失败: {}", e)))?;

    Ok(config_dir.join(CONFIG_FILE_NAME))
}

/// 启动时读取配置；任何失败都回退到默认配置并记录日志。
pub fn load_or_default(app: &AppHandle) -> WorkflowConfig {
    let loaded = config_file_path(app)
        .and_then(|path| WorkflowConfig::load_from_path(&path).map_err(AppError::from));

    match loaded {
        Ok(config) => config,
        Err(err) => {
            log::error!("读取工作流配置失败，使用默认配置: {err}");
            WorkflowConfig::default()
        }
    }
}

#[tauri::command]
pub fn get_workflow_config(app: AppHandle) -> Result<WorkflowConfig, AppError> {
    let path = config_file_path(&app)?;
    Ok(WorkflowConfig::load_from_path(&path)?)
}

#[tauri::command]
pub fn set_workflow_config(app: AppHandle, config: WorkflowConfig) -> Result<(), AppError> {
    config.validate()?;
    let path = config_file_path(&app)?;
    config.save_to_path(&path)?;
    log::info!("💾 工作流配置已保存，重启后生效: {}", path.display());
    Ok(())
}
