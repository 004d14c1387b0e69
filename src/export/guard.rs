//! # 导出链路的作用域守卫
//!
//! - `ProgressGuard`：展示加载指示器后创建，`Drop` 时关闭，任何提前返回都会执行。
//! - `CacheFileGuard`：缓存文件写入成功后创建。正常路径显式 `release().await` 删除；
//!   若导出 future 在分享或删除途中被丢弃，`Drop` 把删除投递到当前 tokio 运行时。

use std::sync::Arc;

use crate::capability::{CacheFileStore, ProgressIndicator};
use crate::workflow::WorkflowError;

pub(crate) struct ProgressGuard<'a> {
    indicator: &'a dyn ProgressIndicator,
}

impl<'a> ProgressGuard<'a> {
    /// 展示指示器；展示失败时没有需要关闭的东西，直接返回错误。
    pub(crate) async fn present(indicator: &'a dyn ProgressIndicator) -> Result<Self, WorkflowError> {
        indicator.present().await?;
        Ok(Self { indicator })
    }
}

impl Drop for ProgressGuard<'_> {
    fn drop(&mut self) {
        self.indicator.dismiss();
    }
}

pub(crate) struct CacheFileGuard {
    store: Arc<dyn CacheFileStore>,
    name: String,
    armed: bool,
}

impl CacheFileGuard {
    pub(crate) fn new(store: Arc<dyn CacheFileStore>, name: impl Into<String>) -> Self {
        Self {
            store,
            name: name.into(),
            armed: true,
        }
    }

    /// 删除缓存文件，删除调用返回后才解除守卫。
    pub(crate) async fn release(mut self) -> Result<(), WorkflowError> {
        let result = self.store.delete(&self.name).await;
        self.armed = false;
        result
    }
}

impl Drop for CacheFileGuard {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }

        let store = Arc::clone(&self.store);
        let name = std::mem::take(&mut self.name);
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                log::warn!("导出被中断，后台清理缓存文件 {}", name);
                handle.spawn(async move {
                    if let Err(err) = store.delete(&name).await {
                        log::warn!("后台清理缓存文件 {} 失败：{}", name, err);
                    }
                });
            }
            Err(_) => {
                log::error!("导出被中断且无可用运行时，缓存文件 {} 未清理", name);
            }
        }
    }
}
