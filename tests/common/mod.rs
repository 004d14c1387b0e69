// 集成测试共享的内存假能力与装配工具
#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use scan_share::capability::{
    BarcodeFormat, CacheFileStore, CapabilityProbe, Clipboard, ConfirmRequest, ConfirmationPrompt,
    DownloadTrigger, ExternalBrowser, ImageDecoder, ImagePicker, Notifier, PermissionState,
    PickedFile, ProgressIndicator, PromptChoice, RasterImage, Rasterizer, ResourceLocator,
    ScanSurface, ScanSurfaceConfig, ScannedCode, ShareOutcome, ShareSheet, Toast,
};
use scan_share::config::WorkflowConfig;
use scan_share::platform::PlatformContext;
use scan_share::workflow::{Capabilities, ScanWorkflow, WorkflowError};
use tokio::sync::Notify;

// 1x1 透明 PNG
pub const PNG_1X1_BASE64: &str = "iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAYAAAAfFcSJAAAADUlEQVR42mNkYPhfDwAChwGA60e6kgAAAABJRU5ErkJggg==";

pub fn png_data_url() -> String {
    format!("data:image/png;base64,{}", PNG_1X1_BASE64)
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().expect("fake state lock poisoned")
}

/// 按调用顺序记录所有假能力的调用。
#[derive(Clone, Default)]
pub struct CallLog(Arc<Mutex<Vec<String>>>);

impl CallLog {
    pub fn record(&self, entry: impl Into<String>) {
        lock(&self.0).push(entry.into());
    }

    pub fn entries(&self) -> Vec<String> {
        lock(&self.0).clone()
    }

    pub fn count(&self, entry: &str) -> usize {
        lock(&self.0).iter().filter(|e| e.as_str() == entry).count()
    }

    pub fn contains(&self, entry: &str) -> bool {
        self.count(entry) > 0
    }

    pub fn any_with_prefix(&self, prefix: &str) -> bool {
        lock(&self.0).iter().any(|e| e.starts_with(prefix))
    }

    pub fn index_of(&self, entry: &str) -> Option<usize> {
        lock(&self.0).iter().position(|e| e.as_str() == entry)
    }
}

/// 让假能力挂起在调用中，直到测试放行。
#[derive(Clone, Default)]
pub struct Gate {
    entered: Arc<Notify>,
    release: Arc<Notify>,
}

impl Gate {
    async fn pass(&self) {
        self.entered.notify_one();
        self.release.notified().await;
    }

    /// 等待被挂起的调用进入。
    pub async fn entered(&self) {
        self.entered.notified().await;
    }

    pub fn open(&self) {
        self.release.notify_one();
    }
}

pub struct FakeProbe {
    log: CallLog,
    supported: Mutex<bool>,
    permission: Mutex<PermissionState>,
    requested: Mutex<PermissionState>,
    clear_fails: Mutex<bool>,
}

impl FakeProbe {
    fn new(log: CallLog) -> Self {
        Self {
            log,
            supported: Mutex::new(true),
            permission: Mutex::new(PermissionState::Granted),
            requested: Mutex::new(PermissionState::Granted),
            clear_fails: Mutex::new(false),
        }
    }

    pub fn set_supported(&self, supported: bool) {
        *lock(&self.supported) = supported;
    }

    /// `check` 为查询结果，`requested` 为申请后的结果。
    pub fn set_permission(&self, check: PermissionState, requested: PermissionState) {
        *lock(&self.permission) = check;
        *lock(&self.requested) = requested;
    }

    pub fn fail_clear_listeners(&self) {
        *lock(&self.clear_fails) = true;
    }
}

#[async_trait]
impl CapabilityProbe for FakeProbe {
    async fn is_supported(&self) -> Result<bool, WorkflowError> {
        self.log.record("probe.is_supported");
        Ok(*lock(&self.supported))
    }

    async fn check_permission(&self) -> Result<PermissionState, WorkflowError> {
        self.log.record("probe.check_permission");
        Ok(*lock(&self.permission))
    }

    async fn request_permission(&self) -> Result<PermissionState, WorkflowError> {
        self.log.record("probe.request_permission");
        Ok(*lock(&self.requested))
    }

    async fn clear_listeners(&self) -> Result<(), WorkflowError> {
        self.log.record("probe.clear_listeners");
        if *lock(&self.clear_fails) {
            return Err(WorkflowError::Unavailable("listener registry gone".to_string()));
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub enum SurfaceScript {
    Scan(ScannedCode),
    Dismiss,
    Fail(String),
}

pub struct FakeSurface {
    log: CallLog,
    script: Mutex<SurfaceScript>,
    gate: Mutex<Option<Gate>>,
    configs: Mutex<Vec<ScanSurfaceConfig>>,
}

impl FakeSurface {
    fn new(log: CallLog) -> Self {
        Self {
            log,
            script: Mutex::new(SurfaceScript::Dismiss),
            gate: Mutex::new(None),
            configs: Mutex::new(Vec::new()),
        }
    }

    pub fn scan(&self, text: &str) {
        *lock(&self.script) = SurfaceScript::Scan(ScannedCode::new(text));
    }

    pub fn dismiss(&self) {
        *lock(&self.script) = SurfaceScript::Dismiss;
    }

    pub fn fail(&self, message: &str) {
        *lock(&self.script) = SurfaceScript::Fail(message.to_string());
    }

    pub fn gate(&self) -> Gate {
        let gate = Gate::default();
        *lock(&self.gate) = Some(gate.clone());
        gate
    }

    pub fn ungate(&self) {
        *lock(&self.gate) = None;
    }

    pub fn configs(&self) -> Vec<ScanSurfaceConfig> {
        lock(&self.configs).clone()
    }
}

#[async_trait]
impl ScanSurface for FakeSurface {
    async fn present(&self, config: ScanSurfaceConfig) -> Result<Option<ScannedCode>, WorkflowError> {
        self.log.record("surface.present");
        lock(&self.configs).push(config);

        let gate = lock(&self.gate).clone();
        if let Some(gate) = gate {
            gate.pass().await;
        }

        let script = lock(&self.script).clone();
        match script {
            SurfaceScript::Scan(code) => Ok(Some(code)),
            SurfaceScript::Dismiss => Ok(None),
            SurfaceScript::Fail(message) => Err(WorkflowError::Presentation(message)),
        }
    }
}

pub struct FakePicker {
    log: CallLog,
    file: Mutex<Option<PickedFile>>,
    failure: Mutex<Option<String>>,
}

impl FakePicker {
    fn new(log: CallLog) -> Self {
        Self {
            log,
            file: Mutex::new(Some(PickedFile::from_path("/photos/code.png"))),
            failure: Mutex::new(None),
        }
    }

    pub fn select(&self, file: Option<PickedFile>) {
        *lock(&self.file) = file;
    }

    pub fn fail(&self, message: &str) {
        *lock(&self.failure) = Some(message.to_string());
    }
}

#[async_trait]
impl ImagePicker for FakePicker {
    async fn pick_single_image(&self) -> Result<Option<PickedFile>, WorkflowError> {
        self.log.record("picker.pick");
        if let Some(message) = lock(&self.failure).clone() {
            return Err(WorkflowError::Picker(message));
        }
        Ok(lock(&self.file).clone())
    }
}

pub struct FakeDecoder {
    log: CallLog,
    codes: Mutex<Vec<ScannedCode>>,
    failure: Mutex<Option<String>>,
    requests: Mutex<Vec<(PickedFile, Vec<BarcodeFormat>)>>,
}

impl FakeDecoder {
    fn new(log: CallLog) -> Self {
        Self {
            log,
            codes: Mutex::new(Vec::new()),
            failure: Mutex::new(None),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn yield_texts(&self, texts: &[&str]) {
        *lock(&self.codes) = texts.iter().map(|text| ScannedCode::new(*text)).collect();
    }

    pub fn fail(&self, message: &str) {
        *lock(&self.failure) = Some(message.to_string());
    }

    pub fn requests(&self) -> Vec<(PickedFile, Vec<BarcodeFormat>)> {
        lock(&self.requests).clone()
    }
}

#[async_trait]
impl ImageDecoder for FakeDecoder {
    async fn decode(
        &self,
        file: &PickedFile,
        formats: &[BarcodeFormat],
    ) -> Result<Vec<ScannedCode>, WorkflowError> {
        self.log.record("decoder.decode");
        lock(&self.requests).push((file.clone(), formats.to_vec()));
        if let Some(message) = lock(&self.failure).clone() {
            return Err(WorkflowError::Decoder(message));
        }
        Ok(lock(&self.codes).clone())
    }
}

pub struct FakeRasterizer {
    log: CallLog,
    data_url: Mutex<String>,
    failure: Mutex<Option<String>>,
    gate: Mutex<Option<Gate>>,
    elements: Mutex<Vec<String>>,
}

impl FakeRasterizer {
    fn new(log: CallLog) -> Self {
        Self {
            log,
            data_url: Mutex::new(png_data_url()),
            failure: Mutex::new(None),
            gate: Mutex::new(None),
            elements: Mutex::new(Vec::new()),
        }
    }

    pub fn produce(&self, data_url: &str) {
        *lock(&self.data_url) = data_url.to_string();
    }

    pub fn fail(&self, message: &str) {
        *lock(&self.failure) = Some(message.to_string());
    }

    pub fn gate(&self) -> Gate {
        let gate = Gate::default();
        *lock(&self.gate) = Some(gate.clone());
        gate
    }

    pub fn elements(&self) -> Vec<String> {
        lock(&self.elements).clone()
    }
}

#[async_trait]
impl Rasterizer for FakeRasterizer {
    async fn rasterize(&self, element_id: &str) -> Result<RasterImage, WorkflowError> {
        self.log.record("rasterizer.rasterize");
        lock(&self.elements).push(element_id.to_string());

        let gate = lock(&self.gate).clone();
        if let Some(gate) = gate {
            gate.pass().await;
        }

        if let Some(message) = lock(&self.failure).clone() {
            return Err(WorkflowError::Rasterize(message));
        }
        Ok(RasterImage {
            data_url: lock(&self.data_url).clone(),
        })
    }
}

pub struct RecordingDownload {
    log: CallLog,
    downloads: Mutex<Vec<(String, String)>>,
    failure: Mutex<Option<String>>,
}

impl RecordingDownload {
    fn new(log: CallLog) -> Self {
        Self {
            log,
            downloads: Mutex::new(Vec::new()),
            failure: Mutex::new(None),
        }
    }

    pub fn fail(&self, message: &str) {
        *lock(&self.failure) = Some(message.to_string());
    }

    /// `(data_url, filename)` 列表。
    pub fn downloads(&self) -> Vec<(String, String)> {
        lock(&self.downloads).clone()
    }
}

impl DownloadTrigger for RecordingDownload {
    fn download(&self, data_url: &str, filename: &str) -> Result<(), WorkflowError> {
        self.log.record("download.trigger");
        if let Some(message) = lock(&self.failure).clone() {
            return Err(WorkflowError::Download(message));
        }
        lock(&self.downloads).push((data_url.to_string(), filename.to_string()));
        Ok(())
    }
}

pub struct MemoryCacheStore {
    log: CallLog,
    files: Mutex<HashMap<String, String>>,
    written: Mutex<Vec<(String, String)>>,
    write_failure: Mutex<Option<String>>,
    delete_failure: Mutex<Option<String>>,
}

impl MemoryCacheStore {
    fn new(log: CallLog) -> Self {
        Self {
            log,
            files: Mutex::new(HashMap::new()),
            written: Mutex::new(Vec::new()),
            write_failure: Mutex::new(None),
            delete_failure: Mutex::new(None),
        }
    }

    pub fn fail_write(&self, message: &str) {
        *lock(&self.write_failure) = Some(message.to_string());
    }

    pub fn fail_delete(&self, message: &str) {
        *lock(&self.delete_failure) = Some(message.to_string());
    }

    pub fn file_names(&self) -> Vec<String> {
        lock(&self.files).keys().cloned().collect()
    }

    /// 每次成功写入的 `(name, data)`。
    pub fn written(&self) -> Vec<(String, String)> {
        lock(&self.written).clone()
    }
}

#[async_trait]
impl CacheFileStore for MemoryCacheStore {
    async fn write(&self, name: &str, data: &str) -> Result<ResourceLocator, WorkflowError> {
        self.log.record("store.write");
        if let Some(message) = lock(&self.write_failure).clone() {
            return Err(WorkflowError::FileSystem(message));
        }
        lock(&self.files).insert(name.to_string(), data.to_string());
        lock(&self.written).push((name.to_string(), data.to_string()));
        Ok(ResourceLocator::new(format!("memory://cache/{}", name)))
    }

    async fn delete(&self, name: &str) -> Result<(), WorkflowError> {
        self.log.record("store.delete");
        if let Some(message) = lock(&self.delete_failure).clone() {
            return Err(WorkflowError::FileSystem(message));
        }
        lock(&self.files).remove(name);
        Ok(())
    }
}

pub struct FakeShare {
    log: CallLog,
    outcome: Mutex<ShareOutcome>,
    failure: Mutex<Option<String>>,
    hang: Mutex<bool>,
    shared: Mutex<Vec<String>>,
}

impl FakeShare {
    fn new(log: CallLog) -> Self {
        Self {
            log,
            outcome: Mutex::new(ShareOutcome::Completed),
            failure: Mutex::new(None),
            hang: Mutex::new(false),
            shared: Mutex::new(Vec::new()),
        }
    }

    pub fn finish_with(&self, outcome: ShareOutcome) {
        *lock(&self.outcome) = outcome;
    }

    pub fn fail(&self, message: &str) {
        *lock(&self.failure) = Some(message.to_string());
    }

    /// 分享面板永不返回。
    pub fn hang(&self) {
        *lock(&self.hang) = true;
    }

    pub fn shared(&self) -> Vec<String> {
        lock(&self.shared).clone()
    }
}

#[async_trait]
impl ShareSheet for FakeShare {
    async fn share(&self, locator: &ResourceLocator) -> Result<ShareOutcome, WorkflowError> {
        self.log.record("share.open");
        lock(&self.shared).push(locator.to_string());
        if *lock(&self.hang) {
            std::future::pending::<()>().await;
        }
        if let Some(message) = lock(&self.failure).clone() {
            return Err(WorkflowError::Share(message));
        }
        Ok(*lock(&self.outcome))
    }
}

pub struct FakeProgress {
    log: CallLog,
    failure: Mutex<Option<String>>,
}

impl FakeProgress {
    fn new(log: CallLog) -> Self {
        Self {
            log,
            failure: Mutex::new(None),
        }
    }

    pub fn fail(&self, message: &str) {
        *lock(&self.failure) = Some(message.to_string());
    }
}

#[async_trait]
impl ProgressIndicator for FakeProgress {
    async fn present(&self) -> Result<(), WorkflowError> {
        self.log.record("progress.present");
        if let Some(message) = lock(&self.failure).clone() {
            return Err(WorkflowError::Presentation(message));
        }
        Ok(())
    }

    fn dismiss(&self) {
        self.log.record("progress.dismiss");
    }
}

pub struct RecordingClipboard {
    log: CallLog,
    texts: Mutex<Vec<String>>,
    failure: Mutex<Option<String>>,
}

impl RecordingClipboard {
    fn new(log: CallLog) -> Self {
        Self {
            log,
            texts: Mutex::new(Vec::new()),
            failure: Mutex::new(None),
        }
    }

    pub fn fail(&self, message: &str) {
        *lock(&self.failure) = Some(message.to_string());
    }

    pub fn texts(&self) -> Vec<String> {
        lock(&self.texts).clone()
    }
}

#[async_trait]
impl Clipboard for RecordingClipboard {
    async fn write(&self, text: &str) -> Result<(), WorkflowError> {
        self.log.record("clipboard.write");
        if let Some(message) = lock(&self.failure).clone() {
            return Err(WorkflowError::Clipboard(message));
        }
        lock(&self.texts).push(text.to_string());
        Ok(())
    }
}

pub struct FakePrompt {
    log: CallLog,
    choice: Mutex<PromptChoice>,
    requests: Mutex<Vec<ConfirmRequest>>,
}

impl FakePrompt {
    fn new(log: CallLog) -> Self {
        Self {
            log,
            choice: Mutex::new(PromptChoice::Confirm),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn answer(&self, choice: PromptChoice) {
        *lock(&self.choice) = choice;
    }

    pub fn requests(&self) -> Vec<ConfirmRequest> {
        lock(&self.requests).clone()
    }
}

#[async_trait]
impl ConfirmationPrompt for FakePrompt {
    async fn ask(&self, request: &ConfirmRequest) -> Result<PromptChoice, WorkflowError> {
        self.log.record("prompt.ask");
        lock(&self.requests).push(request.clone());
        Ok(*lock(&self.choice))
    }
}

pub struct RecordingNotifier {
    log: CallLog,
    toasts: Mutex<Vec<Toast>>,
}

impl RecordingNotifier {
    fn new(log: CallLog) -> Self {
        Self {
            log,
            toasts: Mutex::new(Vec::new()),
        }
    }

    pub fn toasts(&self) -> Vec<Toast> {
        lock(&self.toasts).clone()
    }
}

impl Notifier for RecordingNotifier {
    fn show(&self, toast: Toast) {
        self.log.record("notifier.show");
        lock(&self.toasts).push(toast);
    }
}

pub struct RecordingBrowser {
    log: CallLog,
    opened: Mutex<Vec<String>>,
    failure: Mutex<Option<String>>,
}

impl RecordingBrowser {
    fn new(log: CallLog) -> Self {
        Self {
            log,
            opened: Mutex::new(Vec::new()),
            failure: Mutex::new(None),
        }
    }

    pub fn fail(&self, message: &str) {
        *lock(&self.failure) = Some(message.to_string());
    }

    pub fn opened(&self) -> Vec<String> {
        lock(&self.opened).clone()
    }
}

#[async_trait]
impl ExternalBrowser for RecordingBrowser {
    async fn open(&self, url: &str) -> Result<(), WorkflowError> {
        self.log.record("browser.open");
        if let Some(message) = lock(&self.failure).clone() {
            return Err(WorkflowError::Browser(message));
        }
        lock(&self.opened).push(url.to_string());
        Ok(())
    }
}

/// 一组共享同一调用日志的假能力。工作流构建后仍可通过字段调整行为。
pub struct Harness {
    pub log: CallLog,
    pub probe: Arc<FakeProbe>,
    pub surface: Arc<FakeSurface>,
    pub picker: Arc<FakePicker>,
    pub decoder: Arc<FakeDecoder>,
    pub rasterizer: Arc<FakeRasterizer>,
    pub download: Arc<RecordingDownload>,
    pub store: Arc<MemoryCacheStore>,
    pub share: Arc<FakeShare>,
    pub progress: Arc<FakeProgress>,
    pub clipboard: Arc<RecordingClipboard>,
    pub prompt: Arc<FakePrompt>,
    pub notifier: Arc<RecordingNotifier>,
    pub browser: Arc<RecordingBrowser>,
}

impl Harness {
    pub fn new() -> Self {
        let log = CallLog::default();
        Self {
            probe: Arc::new(FakeProbe::new(log.clone())),
            surface: Arc::new(FakeSurface::new(log.clone())),
            picker: Arc::new(FakePicker::new(log.clone())),
            decoder: Arc::new(FakeDecoder::new(log.clone())),
            rasterizer: Arc::new(FakeRasterizer::new(log.clone())),
            download: Arc::new(RecordingDownload::new(log.clone())),
            store: Arc::new(MemoryCacheStore::new(log.clone())),
            share: Arc::new(FakeShare::new(log.clone())),
            progress: Arc::new(FakeProgress::new(log.clone())),
            clipboard: Arc::new(RecordingClipboard::new(log.clone())),
            prompt: Arc::new(FakePrompt::new(log.clone())),
            notifier: Arc::new(RecordingNotifier::new(log.clone())),
            browser: Arc::new(RecordingBrowser::new(log.clone())),
            log,
        }
    }

    pub fn capabilities(&self) -> Capabilities {
        Capabilities {
            probe: self.probe.clone(),
            surface: self.surface.clone(),
            picker: self.picker.clone(),
            decoder: self.decoder.clone(),
            rasterizer: self.rasterizer.clone(),
            download: self.download.clone(),
            cache_store: self.store.clone(),
            share: self.share.clone(),
            progress: self.progress.clone(),
            clipboard: self.clipboard.clone(),
            prompt: self.prompt.clone(),
            notifier: self.notifier.clone(),
            browser: self.browser.clone(),
        }
    }

    pub fn workflow(&self, platform: PlatformContext) -> ScanWorkflow {
        self.workflow_with(platform, WorkflowConfig::default())
    }

    pub fn workflow_with(&self, platform: PlatformContext, config: WorkflowConfig) -> ScanWorkflow {
        ScanWorkflow::with_platform(platform, config, self.capabilities())
            .expect("test config should be valid")
    }
}

pub fn native_workflow() -> (Harness, ScanWorkflow) {
    let harness = Harness::new();
    let workflow = harness.workflow(PlatformContext::native());
    (harness, workflow)
}

pub fn web_workflow() -> (Harness, ScanWorkflow) {
    let harness = Harness::new();
    let workflow = harness.workflow(PlatformContext::web());
    (harness, workflow)
}
