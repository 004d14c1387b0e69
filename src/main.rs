// 防止在 Windows 发布版本中显示额外的控制台窗口，不要删除！
#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

//! # 扫码分享工具 — 应用入口
//!
//! 本文件仅负责应用初始化与插件/命令注册。
//! 业务逻辑分布在各子模块中，详见 `lib.rs` 架构文档。

use scan_share::app::{commands, config_store, manage_workflow};

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    tauri::Builder::default()
        // 插件初始化
        .plugin(tauri_plugin_shell::init())
        .plugin(tauri_plugin_dialog::init())
        .setup(|app| {
            log::info!("setup: begin");
            let handle = app.handle().clone();
            manage_workflow(&handle)?;
            log::info!("setup: complete");
            Ok(())
        })
        // 注册所有 Tauri 命令
        .invoke_handler(tauri::generate_handler![
            // 扫码与识图
            commands::get_platform,
            commands::initialize_scanner,
            commands::start_scan,
            commands::read_from_image,
            // 导出
            commands::capture_and_export,
            // 结果操作
            commands::copy_scan_result,
            commands::is_scan_result_url,
            commands::open_scan_result,
            commands::get_scan_result,
            commands::clear_scan_result,
            // 前端桥接回执
            commands::resolve_bridge_request,
            // 工作流配置
            config_store::get_workflow_config,
            config_store::set_workflow_config,
        ])
        .run(tauri::generate_context!())
        .expect("运行 Tauri 应用时出错");
}
