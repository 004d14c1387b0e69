//! # 文件系统缓存存储
//!
//! `CacheFileStore` 的本地实现：把 Base64 Data URL 解码成二进制写入缓存目录，
//! 返回 `file://` 定位符。先写入同目录下的 `.<name>.partial` 暂存文件再改名，
//! 任何一步失败都会删掉暂存文件，目录里不会留下半截文件。目录不存在时自动创建；删除不存在的文件视为成功。
//! 文件名只允许单层名称，拒绝任何路径成分。

use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;

use crate::capability::{CacheFileStore, ResourceLocator};
use crate::workflow::WorkflowError;

use super::artifact::{decode_base64_payload, sniff_mime_type};

const DEFAULT_MAX_FILE_BYTES: u64 = 16 * 1024 * 1024;

#[derive(Debug, Clone)]
pub struct FsCacheStore {
    dir: PathBuf,
    max_file_bytes: u64,
}

impl FsCacheStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            max_file_bytes: DEFAULT_MAX_FILE_BYTES,
        }
    }

    pub fn with_max_file_bytes(mut self, max_file_bytes: u64) -> Self {
        self.max_file_bytes = max_file_bytes;
        self
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// 解析缓存文件的完整路径。
    pub fn path_for(&self, name: &str) -> Result<PathBuf, WorkflowError> {
        let mut components = Path::new(name).components();
        match (components.next(), components.next()) {
            (Some(Component::Normal(_)), None) => Ok(self.dir.join(name)),
            _ => Err(WorkflowError::FileSystem(format!(
                "缓存文件名不合法：{}",
                name
            ))),
        }
    }
}

fn file_uri(path: &Path) -> String {
    let display = path.to_string_lossy().replace('\\', "/");
    if display.starts_with('/') {
        format!("file://{}", display)
    } else {
        format!("file:///{}", display)
    }
}

fn staging_name(name: &str) -> String {
    format!(".{}.partial", name)
}

async fn stage_and_rename(staging: &Path, path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    tokio::fs::write(staging, bytes).await?;
    tokio::fs::rename(staging, path).await
}

#[async_trait]
impl CacheFileStore for FsCacheStore {
    async fn write(&self, name: &str, data: &str) -> Result<ResourceLocator, WorkflowError> {
        let path = self.path_for(name)?;
        let bytes = decode_base64_payload(data, self.max_file_bytes)?;

        tokio::fs::create_dir_all(&self.dir).await.map_err(|e| {
            WorkflowError::FileSystem(format!("创建缓存目录 '{}' 失败：{}", self.dir.display(), e))
        })?;

        let staging = self.dir.join(staging_name(name));
        if let Err(e) = stage_and_rename(&staging, &path, &bytes).await {
            match tokio::fs::remove_file(&staging).await {
                Ok(()) => {}
                Err(cleanup) if cleanup.kind() == ErrorKind::NotFound => {}
                Err(cleanup) => {
                    log::warn!("清理暂存文件 '{}' 失败：{}", staging.display(), cleanup)
                }
            }
            return Err(WorkflowError::FileSystem(format!(
                "写入缓存文件 '{}' 失败：{}",
                path.display(),
                e
            )));
        }

        log::debug!(
            "💾 写入缓存文件 {}（{} 字节，{}）",
            path.display(),
            bytes.len(),
            sniff_mime_type(&bytes)
        );
        Ok(ResourceLocator::new(file_uri(&path)))
    }

    async fn delete(&self, name: &str) -> Result<(), WorkflowError> {
        let path = self.path_for(name)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => {
                log::debug!("🗑️ 已删除缓存文件 {}", path.display());
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(WorkflowError::FileSystem(format!(
                "删除缓存文件 '{}' 失败：{}",
                path.display(),
                e
            ))),
        }
    }
}
