//! 单飞守卫
//!
//! 同一类操作（扫码、识图、导出）同一时刻只允许一个在途。
//! `AtomicBool` + `SeqCst` 抢占标志，`FlightGuard` 在 `Drop` 时释放，
//! 任意提前返回或 panic 都不会让标志残留。

use std::sync::atomic::{AtomicBool, Ordering};

use super::WorkflowError;

#[derive(Debug)]
pub(crate) struct SingleFlight {
    busy: AtomicBool,
    action: &'static str,
}

impl SingleFlight {
    pub(crate) const fn new(action: &'static str) -> Self {
        Self {
            busy: AtomicBool::new(false),
            action,
        }
    }

    /// 抢占执行权；已有在途操作时立即返回 `Busy`。
    pub(crate) fn try_acquire(&self) -> Result<FlightGuard<'_>, WorkflowError> {
        if self
            .busy
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            log::debug!("⏳ {} 已在进行中，拒绝重复触发", self.action);
            return Err(WorkflowError::Busy(self.action));
        }
        Ok(FlightGuard { flight: self })
    }

    #[cfg(test)]
    fn is_busy(&self) -> bool {
        self.busy.load(Ordering::SeqCst)
    }
}

pub(crate) struct FlightGuard<'a> {
    flight: &'a SingleFlight,
}

impl Drop for FlightGuard<'_> {
    fn drop(&mut self) {
        self.flight.busy.store(false, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_acquire_fails_while_first_is_held() {
        let flight = SingleFlight::new("导出");
        let guard = flight.try_acquire().expect("first acquire");
        assert!(flight.is_busy());
        assert!(matches!(flight.try_acquire(), Err(WorkflowError::Busy("导出"))));
        drop(guard);
        assert!(!flight.is_busy());
        assert!(flight.try_acquire().is_ok());
    }
}
