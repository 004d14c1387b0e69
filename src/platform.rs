//! 运行平台上下文
//!
//! 启动时构造一次、之后只读。导出链路据此选择"下载"或"写缓存→分享→删除"，
//! 扫码链路据此决定是否执行硬件/权限检查。

use serde::{Deserialize, Serialize};

/// 平台选择策略（配置项）。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlatformMode {
    /// 按编译目标自动判断。
    #[default]
    Auto,
    Native,
    Web,
}

/// 不可变平台上下文。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlatformContext {
    is_native_capable: bool,
}

impl PlatformContext {
    /// 具备原生能力（文件系统、分享面板、相机权限）的环境。
    pub const fn native() -> Self {
        Self {
            is_native_capable: true,
        }
    }

    /// 普通 Web 环境。
    pub const fn web() -> Self {
        Self {
            is_native_capable: false,
        }
    }

    /// 移动端目标视为原生环境，桌面与其他目标按 Web 处理。
    pub fn detect() -> Self {
        if cfg!(any(target_os = "android", target_os = "ios")) {
            Self::native()
        } else {
            Self::web()
        }
    }

    pub fn resolve(mode: PlatformMode) -> Self {
        match mode {
            PlatformMode::Auto => Self::detect(),
            PlatformMode::Native => Self::native(),
            PlatformMode::Web => Self::web(),
        }
    }

    pub fn is_native_capable(self) -> bool {
        self.is_native_capable
    }
}
