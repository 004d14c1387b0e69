//! # 扫码分享工具 — 库入口
//!
//! ## 架构总览
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                  前端 (webview)                          │
//! │                                                          │
//! │  扫码界面 ── 截图 ── 图片识别 ── 分享面板 ── Toast       │
//! │       ↕  事件 + resolve_bridge_request (requestId)       │
//! └───────┼──────────────────────────────────────────────────┘
//!         ↕ Tauri IPC (Result<T, CommandError>)
//! ┌───────┼──────────────────────────────────────────────────┐
//! │       ↕            后端 (Rust)                           │
//! │                                                          │
//! │  ┌─ app ──────── 命令 / 桥接 / 插件适配 (feature = app)  │
//! │  │                                                       │
//! │  ├─ workflow ─── ScanWorkflow 门面 + WorkflowError       │
//! │  │   ├─ scan       扫码会话 · 图片识别 · 结果槽          │
//! │  │   ├─ export     截图导出 · 缓存文件 RAII              │
//! │  │   └─ dispatch   复制 · URL 判断 · 确认后打开          │
//! │  │                                                       │
//! │  ├─ capability     平台能力 trait (可注入)               │
//! │  ├─ pending        桥接请求的回复等待表                  │
//! │  ├─ platform       原生 / Web 判定                       │
//! │  └─ config         workflow.json 配置与校验              │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! ## 模块职责
//!
//! | 模块 | 职责 |
//! |------|------|
//! | [`error`] | 应用级错误 `AppError` 与命令层结构化错误 `CommandError` |
//! | [`capability`] | 扫码、选图、识别、截图、分享、剪贴板、对话框等能力接口 |
//! | [`platform`] | `PlatformContext`：当前宿主是否具备原生能力 |
//! | [`config`] | 扫码格式、导出文件名、提示文案、scheme 判定策略等配置 |
//! | [`scan`] | `ScanSessionController`、`ImageDecodeAdapter`、共享结果槽 |
//! | [`export`] | `CaptureExportPipeline` 与本地缓存存储 |
//! | [`dispatch`] | `ResultActionDispatcher` 与 URL 规则 |
//! | [`workflow`] | 组件装配与统一错误分类 |
//! | [`pending`] | 按请求 ID 配对回复的等待表，支持超时与放弃 |

pub mod capability;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod export;
pub mod pending;
pub mod platform;
pub mod scan;
pub mod workflow;

#[cfg(feature = "app")]
pub mod app;
