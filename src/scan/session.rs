//! # 实时扫码会话
//!
//! ## 设计思路
//!
//! 状态机：`Idle → CapabilityCheck → SessionPresented → {Resolved | Cancelled} → Idle`。
//! 扫码界面的"展示→等待关闭"被建模为一次挂起调用 [`ScanSurface::present`]，
//! 关闭时携带结果即 `Resolved`，否则 `Cancelled`，不再需要事件监听与清理仪式。
//!
//! ## 实现思路
//!
//! - 原生环境：展示前检查硬件支持与相机权限；权限处于可申请状态时申请一次。
//! - Web 环境：不做能力检查，直接展示扫码界面。
//! - 取消不是错误，且不触碰结果槽。
//! - 同一时刻只允许一个会话在途。

use std::sync::{Arc, Mutex, PoisonError};

use serde::Serialize;

use crate::capability::{CapabilityProbe, PermissionState, ScanSurface, ScanSurfaceConfig};
use crate::platform::PlatformContext;
use crate::workflow::WorkflowError;
use crate::workflow::flight::SingleFlight;

use super::result::{ResultSlot, ScanResult, ScanSource};

/// 会话所处阶段。`Resolved` / `Cancelled` 是瞬时结局，以 [`ScanOutcome`] 返回。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum SessionState {
    Idle,
    CapabilityCheck,
    SessionPresented,
}

/// 一次扫码会话的结局。
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", content = "result", rename_all = "camelCase")]
pub enum ScanOutcome {
    Resolved(ScanResult),
    Cancelled,
}

/// 最近一次能力探测的快照。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanAvailability {
    pub supported: bool,
    pub permission: PermissionState,
}

pub struct ScanSessionController {
    platform: PlatformContext,
    probe: Arc<dyn CapabilityProbe>,
    surface: Arc<dyn ScanSurface>,
    slot: ResultSlot,
    surface_config: ScanSurfaceConfig,
    state: Mutex<SessionState>,
    availability: Mutex<Option<ScanAvailability>>,
    flight: SingleFlight,
}

impl ScanSessionController {
    pub fn new(
        platform: PlatformContext,
        probe: Arc<dyn CapabilityProbe>,
        surface: Arc<dyn ScanSurface>,
        slot: ResultSlot,
        surface_config: ScanSurfaceConfig,
    ) -> Self {
        Self {
            platform,
            probe,
            surface,
            slot,
            surface_config,
            state: Mutex::new(SessionState::Idle),
            availability: Mutex::new(None),
            flight: SingleFlight::new("扫码"),
        }
    }

    /// 启动时调用：原生环境下探测硬件与权限，并清理残留监听器。
    ///
    /// Web 环境不做任何探测，返回 `None`。
    pub async fn initialize(&self) -> Result<Option<ScanAvailability>, WorkflowError> {
        if !self.platform.is_native_capable() {
            log::debug!("Web 环境，跳过扫码能力探测");
            return Ok(None);
        }

        let supported = self.probe.is_supported().await?;
        let permission = self.probe.check_permission().await?;
        if let Err(err) = self.probe.clear_listeners().await {
            log::warn!("清理扫码监听器失败（忽略）：{}", err);
        }

        let availability = ScanAvailability {
            supported,
            permission,
        };
        self.remember(availability);
        log::info!(
            "📷 扫码能力探测完成 - supported={} permission={}",
            supported,
            permission
        );
        Ok(Some(availability))
    }

    /// 展示扫码界面并等待关闭。
    ///
    /// 调用方丢弃返回的 future 时，状态同样回到 `Idle`。
    pub async fn start_scan(&self) -> Result<ScanOutcome, WorkflowError> {
        let _flight = self.flight.try_acquire()?;
        let _idle = IdleOnDrop(&self.state);
        self.run_session().await
    }

    pub fn state(&self) -> SessionState {
        *self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn availability(&self) -> Option<ScanAvailability> {
        *self.availability.lock().unwrap_or_else(PoisonError::into_inner)
    }

    async fn run_session(&self) -> Result<ScanOutcome, WorkflowError> {
        if self.platform.is_native_capable() {
            self.set_state(SessionState::CapabilityCheck);
            self.ensure_capability().await?;
        }

        self.set_state(SessionState::SessionPresented);
        log::info!("📷 展示扫码界面 - facing={:?}", self.surface_config.facing);

        match self.surface.present(self.surface_config.clone()).await? {
            Some(code) => {
                let result = ScanResult::from_code(code, ScanSource::Camera);
                self.slot.publish(result.clone())?;
                log::info!("✅ 扫码成功 - 长度={}", result.text.chars().count());
                Ok(ScanOutcome::Resolved(result))
            }
            None => {
                log::info!("↩️ 用户关闭扫码界面，未获取结果");
                Ok(ScanOutcome::Cancelled)
            }
        }
    }

    async fn ensure_capability(&self) -> Result<(), WorkflowError> {
        let supported = self.probe.is_supported().await?;
        if !supported {
            return Err(WorkflowError::Unavailable("当前设备不支持条码扫描".to_string()));
        }

        let mut permission = self.probe.check_permission().await?;
        if permission.needs_request() {
            log::debug!("相机权限状态为 {}，发起申请", permission);
            permission = self.probe.request_permission().await?;
        }
        self.remember(ScanAvailability {
            supported,
            permission,
        });

        if !permission.is_granted() {
            return Err(WorkflowError::PermissionDenied(permission));
        }
        Ok(())
    }

    fn set_state(&self, next: SessionState) {
        transition(&self.state, next);
    }

    fn remember(&self, availability: ScanAvailability) {
        *self.availability.lock().unwrap_or_else(PoisonError::into_inner) = Some(availability);
    }
}

fn transition(state: &Mutex<SessionState>, next: SessionState) {
    let mut state = state.lock().unwrap_or_else(PoisonError::into_inner);
    if *state != next {
        log::debug!("扫码会话状态 {:?} → {:?}", *state, next);
    }
    *state = next;
}

/// 会话结束（含 future 被丢弃）时把状态复位为 `Idle`。
struct IdleOnDrop<'a>(&'a Mutex<SessionState>);

impl Drop for IdleOnDrop<'_> {
    fn drop(&mut self) {
        transition(self.0, SessionState::Idle);
    }
}
