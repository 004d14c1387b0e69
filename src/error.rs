//! 统一错误类型模块
//!
//! # 设计思路
//!
//! 定义全局统一的 `AppError` 枚举，工作流、配置、存储目录与前端桥接的错误
//! 都汇聚到这里，再由 `CommandError` 转为前端可分支处理的结构化对象。
//!
//! # 实现思路
//!
//! - 使用 `thiserror` 派生可读错误消息。
//! - 为 `WorkflowError`、`ConfigError` 提供 `From` 转换，无需手动 map。
//! - 实现 `Serialize` 将错误序列化为字符串，满足 Tauri IPC 要求。

use serde::Serialize;

use crate::config::ConfigError;
use crate::workflow::{ErrorKind, WorkflowError};

/// 应用级统一错误类型
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// 扫码 / 识图 / 导出 / 结果操作失败
    #[error("{0}")]
    Workflow(#[from] WorkflowError),

    /// 配置读取、解析或校验失败
    #[error("{0}")]
    Config(#[from] ConfigError),

    /// 应用目录不可用
    #[error("存储目录不可用: {0}")]
    Storage(String),

    /// 前端桥接请求失败
    #[error("前端桥接失败: {0}")]
    Bridge(String),
}

impl AppError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::Workflow(err) => err.code(),
            Self::Config(_) => "config_invalid",
            Self::Storage(_) => "storage_unavailable",
            Self::Bridge(_) => "bridge_failed",
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Workflow(err) => err.kind(),
            _ => ErrorKind::Io,
        }
    }
}

/// Tauri IPC 要求返回值实现 `Serialize`。
/// 将错误序列化为人类可读的字符串。
impl Serialize for AppError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

/// 命令层返回给前端的结构化错误。
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandError {
    pub code: &'static str,
    pub kind: ErrorKind,
    pub message: String,
}

impl From<AppError> for CommandError {
    fn from(error: AppError) -> Self {
        Self {
            code: error.code(),
            kind: error.kind(),
            message: error.to_string(),
        }
    }
}

impl From<WorkflowError> for CommandError {
    fn from(error: WorkflowError) -> Self {
        AppError::from(error).into()
    }
}
