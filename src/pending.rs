//! # 待回复请求表
//!
//! 向外发出请求后，按请求 ID 登记一个 `oneshot` 发送端，回复到达时取出并投递。
//! [`PendingReply`] 在被丢弃时注销自己，等待超时或调用方放弃都不会留下表项。

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use thiserror::Error;
use tokio::sync::oneshot;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ReplyError {
    #[error("待回复请求表锁已中毒")]
    Poisoned,

    #[error("请求 {0} 的回复通道已关闭")]
    Closed(String),

    #[error("请求 {id} 在 {after:?} 内未收到回复")]
    TimedOut { id: String, after: Duration },
}

pub struct PendingReplies<R> {
    slots: Mutex<HashMap<String, oneshot::Sender<R>>>,
    next_id: AtomicU64,
}

impl<R> Default for PendingReplies<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R> PendingReplies<R> {
    pub fn new() -> Self {
        Self {
            slots: Mutex::new(HashMap::new()),
            next_id: AtomicU64::new(1),
        }
    }

    /// 登记一个新请求，ID 形如 `<prefix>#<序号>`。
    pub fn register(&self, prefix: &str) -> Result<PendingReply<'_, R>, ReplyError> {
        let id = format!("{}#{}", prefix, self.next_id.fetch_add(1, Ordering::Relaxed));
        let (tx, rx) = oneshot::channel();
        self.slots()?.insert(id.clone(), tx);
        Ok(PendingReply {
            table: self,
            id,
            rx,
        })
    }

    /// 投递回复。未知、已超时或已放弃的 ID 返回 `false`。
    pub fn resolve(&self, id: &str, reply: R) -> Result<bool, ReplyError> {
        let sender = self.slots()?.remove(id);
        match sender {
            Some(sender) => Ok(sender.send(reply).is_ok()),
            None => {
                log::warn!("收到未知请求的回复：{}", id);
                Ok(false)
            }
        }
    }

    pub fn len(&self) -> usize {
        self.slots().map(|slots| slots.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn forget(&self, id: &str) {
        if let Ok(mut slots) = self.slots() {
            slots.remove(id);
        }
    }

    fn slots(&self) -> Result<MutexGuard<'_, HashMap<String, oneshot::Sender<R>>>, ReplyError> {
        self.slots.lock().map_err(|_| ReplyError::Poisoned)
    }
}

/// 一次登记的等待端。
pub struct PendingReply<'a, R> {
    table: &'a PendingReplies<R>,
    id: String,
    rx: oneshot::Receiver<R>,
}

impl<R> PendingReply<'_, R> {
    pub fn id(&self) -> &str {
        &self.id
    }

    /// 等待回复；`timeout` 为 `None` 时一直等。
    pub async fn wait(mut self, timeout: Option<Duration>) -> Result<R, ReplyError> {
        let received = match timeout {
            Some(after) => match tokio::time::timeout(after, &mut self.rx).await {
                Ok(received) => received,
                Err(_) => {
                    log::warn!("⏱️ 请求 {} 超时（{:?}）", self.id, after);
                    return Err(ReplyError::TimedOut {
                        id: self.id.clone(),
                        after,
                    });
                }
            },
            None => (&mut self.rx).await,
        };
        received.map_err(|_| ReplyError::Closed(self.id.clone()))
    }
}

impl<R> Drop for PendingReply<'_, R> {
    fn drop(&mut self) {
        self.table.forget(&self.id);
    }
}
