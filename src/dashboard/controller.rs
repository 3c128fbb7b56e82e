//! Dashboard workflow controller
//!
//! Owns the page being displayed, the add-vehicle dialog and its draft,
//! and the status line. Two orthogonal state machines live here:
//!
//! - loading: `InitialLoading -> Idle <-> PageLoading`
//! - dialog:  `Closed <-> Open <-> Submitting`
//!
//! Network work is split into `begin_*` / `finish_*` halves so a UI loop
//! can run the request on another task and feed the result back. Page
//! requests carry a generation number; only the latest generation is
//! applied, so a slow response for a page the user already left is
//! dropped instead of overwriting newer data. The `async` helpers
//! (`bootstrap`, `change_page`, `submit`) run both halves in sequence.

use crate::api::{InventoryApi, PaginatedVehicles, Vehicle, VehicleCreate};
use crate::dashboard::form::{Field, FormDraft};
use crate::error::{DashboardError, Result};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Grace period between a successful create and the dialog closing
pub const AUTO_CLOSE_DELAY: Duration = Duration::from_millis(1500);

/// Message shown after a vehicle is created
pub const CREATED_MESSAGE: &str = "Vehicle added successfully!";

/// Page loading state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadState {
    /// First page not fetched yet
    InitialLoading,
    Idle,
    /// A page change is in flight
    PageLoading,
}

/// Add-vehicle dialog state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogState {
    Closed,
    Open,
    /// Create request in flight
    Submitting,
}

/// Status line tone
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Success,
    Error,
}

/// User-visible status line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage {
    pub text: String,
    pub tone: Tone,
}

impl StatusMessage {
    pub fn success(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            tone: Tone::Success,
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            tone: Tone::Error,
        }
    }
}

/// Options for a page change
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PageChangeOptions {
    /// Clear the status line before fetching
    pub reset_status: bool,
    /// Do not report a failure on the status line
    pub silent: bool,
}

/// Why a page was requested
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageRequestKind {
    /// First fetch on startup; failures are only logged
    Bootstrap,
    /// User or refresh driven page change
    Change { silent: bool },
}

/// A page fetch issued by the controller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: usize,
    pub page_size: usize,
    pub kind: PageRequestKind,
    generation: u64,
}

impl PageRequest {
    /// Sequence number of this request
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// Why a submit attempt did not produce a request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitRejected {
    /// A field failed validation; all fields are now touched
    Invalid,
    /// A create request is already in flight
    Busy,
    /// The dialog is not open
    DialogClosed,
}

/// Result of [`DashboardController::submit`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    Rejected(SubmitRejected),
    /// Created; `None` when the service answered without a body
    Created(Option<Vehicle>),
    /// The service refused or the request failed; message is on the status line
    Failed(String),
}

/// Client-side state holder for the vehicle dashboard
pub struct DashboardController {
    api: Arc<dyn InventoryApi>,
    page_size: usize,
    page: PaginatedVehicles,
    load_state: LoadState,
    bootstrapped: bool,
    generation: u64,
    dialog: DialogState,
    draft: FormDraft,
    status: Option<StatusMessage>,
    auto_close_at: Option<Instant>,
    health: Option<String>,
}

impl DashboardController {
    /// Create a controller showing an empty page
    pub fn new(api: Arc<dyn InventoryApi>, page_size: usize) -> Self {
        Self {
            api,
            page_size,
            page: PaginatedVehicles::empty(page_size),
            load_state: LoadState::InitialLoading,
            bootstrapped: false,
            generation: 0,
            dialog: DialogState::Closed,
            draft: FormDraft::new(),
            status: None,
            auto_close_at: None,
            health: None,
        }
    }

    /// Page being displayed
    pub fn page(&self) -> &PaginatedVehicles {
        &self.page
    }

    /// Configured page size
    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn load_state(&self) -> LoadState {
        self.load_state
    }

    pub fn dialog(&self) -> DialogState {
        self.dialog
    }

    pub fn is_dialog_open(&self) -> bool {
        self.dialog != DialogState::Closed
    }

    pub fn draft(&self) -> &FormDraft {
        &self.draft
    }

    pub fn status(&self) -> Option<&StatusMessage> {
        self.status.as_ref()
    }

    /// Last health status reported by the service
    pub fn health(&self) -> Option<&str> {
        self.health.as_deref()
    }

    /// When the dialog will close on its own, if scheduled
    pub fn auto_close_at(&self) -> Option<Instant> {
        self.auto_close_at
    }

    // ---------------------------------------------------------------
    // Paging
    // ---------------------------------------------------------------

    /// Issue the one-time first page fetch; `None` once bootstrapped
    pub fn begin_bootstrap(&mut self) -> Option<PageRequest> {
        if self.bootstrapped {
            return None;
        }
        self.bootstrapped = true;
        Some(self.next_request(1, PageRequestKind::Bootstrap))
    }

    /// Issue a fetch for `page`; `None` when the page does not exist
    pub fn begin_page_load(
        &mut self,
        page: usize,
        options: PageChangeOptions,
    ) -> Option<PageRequest> {
        if !self.page.contains_page(page) {
            debug!(page, total_pages = self.page.page_count(), "ignoring out of range page");
            return None;
        }
        if options.reset_status {
            self.status = None;
        }
        self.load_state = LoadState::PageLoading;
        Some(self.next_request(page, PageRequestKind::Change { silent: options.silent }))
    }

    fn next_request(&mut self, page: usize, kind: PageRequestKind) -> PageRequest {
        self.generation += 1;
        PageRequest {
            page,
            page_size: self.page_size,
            kind,
            generation: self.generation,
        }
    }

    /// Apply the result of a page fetch.
    ///
    /// Returns `false` when the request was superseded and its result
    /// dropped.
    pub fn finish_page_load(
        &mut self,
        request: PageRequest,
        result: Result<PaginatedVehicles>,
    ) -> bool {
        if request.generation != self.generation {
            debug!(
                page = request.page,
                generation = request.generation,
                latest = self.generation,
                "discarding stale page response"
            );
            return false;
        }

        match (result, request.kind) {
            (Ok(page), _) => {
                debug!(
                    page = page.page,
                    items = page.items.len(),
                    total = page.total,
                    "page loaded"
                );
                self.page = page;
            }
            (Err(err), PageRequestKind::Bootstrap) => {
                warn!(error = %err, "Failed to fetch vehicles");
            }
            (Err(err), PageRequestKind::Change { silent }) => {
                warn!(page = request.page, error = %err, "page change failed");
                if !silent {
                    self.status = Some(StatusMessage::error(err.to_string()));
                }
            }
        }

        self.load_state = LoadState::Idle;
        true
    }

    /// Fetch page 1 once; later calls do nothing
    pub async fn bootstrap(&mut self) {
        if let Some(request) = self.begin_bootstrap() {
            let result = self.api.list_vehicles(request.page, request.page_size).await;
            self.finish_page_load(request, result);
        }
    }

    /// Move to `page`; returns `false` without a request when out of range
    pub async fn change_page(&mut self, page: usize, options: PageChangeOptions) -> bool {
        let Some(request) = self.begin_page_load(page, options) else {
            return false;
        };
        let result = self.api.list_vehicles(request.page, request.page_size).await;
        self.finish_page_load(request, result);
        true
    }

    /// Query the service health
    pub async fn load_health(&mut self) {
        let result = self.api.health().await.map(|h| h.status);
        self.set_health(result);
    }

    /// Record a health probe result; failures are only logged
    pub fn set_health(&mut self, result: Result<String>) {
        match result {
            Ok(status) => self.health = Some(status),
            Err(err) => warn!(error = %err, "Health check failed"),
        }
    }

    // ---------------------------------------------------------------
    // Dialog and draft
    // ---------------------------------------------------------------

    /// Open the add-vehicle dialog with a fresh draft
    pub fn open_dialog(&mut self) {
        self.draft = FormDraft::new();
        self.status = None;
        self.auto_close_at = None;
        self.dialog = DialogState::Open;
    }

    /// User closed the dialog: discard draft, status and pending auto-close
    pub fn close_dialog(&mut self) {
        self.dialog = DialogState::Closed;
        self.draft = FormDraft::new();
        self.status = None;
        self.auto_close_at = None;
    }

    /// Replace a draft field
    pub fn set_field(&mut self, field: Field, value: impl Into<String>) {
        self.draft.set(field, value);
    }

    /// Type a character into a draft field
    pub fn push_char(&mut self, field: Field, c: char) {
        self.draft.push_char(field, c);
    }

    /// Delete the last character of a draft field
    pub fn pop_char(&mut self, field: Field) {
        self.draft.pop_char(field);
    }

    /// A draft field lost focus
    pub fn blur_field(&mut self, field: Field) {
        self.draft.blur(field);
    }

    /// Start a submission.
    ///
    /// Marks every field touched; when the draft is valid the dialog moves
    /// to `Submitting` and the payload to send is returned.
    pub fn begin_submit(&mut self) -> std::result::Result<VehicleCreate, SubmitRejected> {
        match self.dialog {
            DialogState::Closed => return Err(SubmitRejected::DialogClosed),
            DialogState::Submitting => return Err(SubmitRejected::Busy),
            DialogState::Open => {}
        }

        self.draft.touch_all();
        if !self.draft.is_valid() {
            return Err(SubmitRejected::Invalid);
        }

        self.status = None;
        self.dialog = DialogState::Submitting;
        Ok(self.draft.to_payload())
    }

    /// The create request succeeded.
    ///
    /// Clears the draft, shows the success message and schedules the
    /// auto-close. Ignored for the dialog if the user closed or reopened
    /// it while the request was in flight.
    pub fn submit_succeeded(&mut self, now: Instant) {
        if self.dialog != DialogState::Submitting {
            debug!("create finished after the dialog was closed");
            return;
        }
        self.draft = FormDraft::new();
        self.status = Some(StatusMessage::success(CREATED_MESSAGE));
        self.auto_close_at = Some(now + AUTO_CLOSE_DELAY);
        self.dialog = DialogState::Open;
    }

    /// The create request failed; the draft stays intact
    pub fn submit_failed(&mut self, err: &DashboardError) {
        warn!(error = %err, "create vehicle failed");
        if self.dialog != DialogState::Submitting {
            return;
        }
        self.status = Some(StatusMessage::error(err.to_string()));
        self.dialog = DialogState::Open;
    }

    /// Submit the draft, refreshing page 1 on success
    pub async fn submit(&mut self) -> SubmitOutcome {
        let payload = match self.begin_submit() {
            Ok(payload) => payload,
            Err(rejected) => return SubmitOutcome::Rejected(rejected),
        };

        match self.api.create_vehicle(&payload).await {
            Ok(created) => {
                info!(vin = %payload.vin, "vehicle created");
                self.change_page(1, PageChangeOptions::default()).await;
                self.submit_succeeded(Instant::now());
                SubmitOutcome::Created(created)
            }
            Err(err) => {
                self.submit_failed(&err);
                SubmitOutcome::Failed(err.to_string())
            }
        }
    }

    /// Advance timers; returns `true` when the dialog auto-closed
    pub fn tick(&mut self, now: Instant) -> bool {
        match self.auto_close_at {
            Some(deadline) if now >= deadline => {
                self.auto_close_at = None;
                self.dialog = DialogState::Closed;
                self.status = None;
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{HealthResponse, PaginatedResponse, VehicleListItem};
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    #[derive(Debug, Clone, PartialEq, Eq)]
    enum Call {
        List(usize, usize),
        Create(String),
    }

    #[derive(Default)]
    struct FakeApi {
        total: usize,
        calls: Mutex<Vec<Call>>,
        list_failures: Mutex<VecDeque<DashboardError>>,
        create_failure: Mutex<Option<DashboardError>>,
    }

    impl FakeApi {
        fn with_total(total: usize) -> Arc<Self> {
            Arc::new(Self {
                total,
                ..Default::default()
            })
        }

        fn calls(&self) -> Vec<Call> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl InventoryApi for FakeApi {
        async fn health(&self) -> Result<HealthResponse> {
            Ok(HealthResponse { status: "ok".into() })
        }

        async fn list_vehicles(&self, page: usize, page_size: usize) -> Result<PaginatedVehicles> {
            self.calls.lock().unwrap().push(Call::List(page, page_size));
            if let Some(err) = self.list_failures.lock().unwrap().pop_front() {
                return Err(err);
            }
            let all: Vec<VehicleListItem> = (0..self.total)
                .map(|i| VehicleListItem {
                    vin: format!("VIN{:05}", i),
                    make: "Ford".into(),
                    model: "Focus".into(),
                    created_at: None,
                })
                .collect();
            Ok(PaginatedResponse::from_unpaginated(&all, page, page_size))
        }

        async fn get_vehicle(&self, vin: &str) -> Result<Vehicle> {
            Err(DashboardError::NotFound(vin.to_string()))
        }

        async fn create_vehicle(&self, payload: &VehicleCreate) -> Result<Option<Vehicle>> {
            self.calls.lock().unwrap().push(Call::Create(payload.vin.clone()));
            match self.create_failure.lock().unwrap().take() {
                Some(err) => Err(err),
                None => Ok(None),
            }
        }
    }

    fn fill_valid(controller: &mut DashboardController) {
        controller.set_field(Field::Vin, "1HGCM82633A004352");
        controller.set_field(Field::Make, "Honda");
        controller.set_field(Field::Model, "Accord");
        controller.set_field(Field::Description, "Clean title, one owner");
        controller.set_field(Field::ImageUrls, "a.jpg, b.jpg");
    }

    #[tokio::test]
    async fn test_bootstrap_fetches_first_page_once() {
        let api = FakeApi::with_total(25);
        let mut controller = DashboardController::new(api.clone(), 10);
        assert_eq!(controller.load_state(), LoadState::InitialLoading);

        controller.bootstrap().await;
        controller.bootstrap().await;

        assert_eq!(api.calls(), vec![Call::List(1, 10)]);
        assert_eq!(controller.load_state(), LoadState::Idle);
        assert_eq!(controller.page().total, 25);
        assert_eq!(controller.page().page_count(), 3);
    }

    #[tokio::test]
    async fn test_bootstrap_failure_is_quiet() {
        let api = FakeApi::with_total(5);
        api.list_failures
            .lock()
            .unwrap()
            .push_back(DashboardError::http(503, "Service Unavailable"));
        let mut controller = DashboardController::new(api.clone(), 10);

        controller.bootstrap().await;

        assert_eq!(controller.load_state(), LoadState::Idle);
        assert!(controller.status().is_none());
        assert_eq!(controller.page(), &PaginatedVehicles::empty(10));
    }

    #[tokio::test]
    async fn test_change_page_out_of_range_is_noop() {
        let api = FakeApi::with_total(25);
        let mut controller = DashboardController::new(api.clone(), 10);
        controller.bootstrap().await;
        let before = controller.page().clone();

        assert!(!controller.change_page(0, PageChangeOptions::default()).await);
        assert!(!controller.change_page(4, PageChangeOptions::default()).await);

        assert_eq!(api.calls(), vec![Call::List(1, 10)]);
        assert_eq!(controller.page(), &before);
        assert_eq!(controller.load_state(), LoadState::Idle);
    }

    #[tokio::test]
    async fn test_change_page_replaces_data() {
        let api = FakeApi::with_total(25);
        let mut controller = DashboardController::new(api.clone(), 10);
        controller.bootstrap().await;

        assert!(controller.change_page(3, PageChangeOptions::default()).await);

        assert_eq!(controller.page().page, 3);
        assert_eq!(controller.page().items.len(), 5);
        assert_eq!(controller.page().items[0].vin, "VIN00020");
        assert_eq!(controller.load_state(), LoadState::Idle);
    }

    #[tokio::test]
    async fn test_change_page_failure_sets_status_unless_silent() {
        let api = FakeApi::with_total(25);
        let mut controller = DashboardController::new(api.clone(), 10);
        controller.bootstrap().await;

        api.list_failures
            .lock()
            .unwrap()
            .push_back(DashboardError::http(500, "Internal Server Error"));
        controller.change_page(2, PageChangeOptions { silent: true, ..Default::default() }).await;
        assert!(controller.status().is_none());
        assert_eq!(controller.page().page, 1);

        api.list_failures
            .lock()
            .unwrap()
            .push_back(DashboardError::http(500, "Internal Server Error"));
        controller.change_page(2, PageChangeOptions::default()).await;
        let status = controller.status().unwrap();
        assert_eq!(status.tone, Tone::Error);
        assert_eq!(status.text, "Request failed (500): Internal Server Error");
        assert_eq!(controller.load_state(), LoadState::Idle);

        let options = PageChangeOptions {
            reset_status: true,
            ..Default::default()
        };
        controller.change_page(2, options).await;
        assert!(controller.status().is_none());
        assert_eq!(controller.page().page, 2);
    }

    #[tokio::test]
    async fn test_stale_page_response_is_discarded() {
        let api = FakeApi::with_total(40);
        let mut controller = DashboardController::new(api.clone(), 10);
        controller.bootstrap().await;

        let slow = controller.begin_page_load(2, PageChangeOptions::default()).unwrap();
        let fast = controller.begin_page_load(3, PageChangeOptions::default()).unwrap();
        assert!(fast.generation() > slow.generation());

        let fast_page = api.list_vehicles(3, 10).await;
        assert!(controller.finish_page_load(fast, fast_page));
        assert_eq!(controller.page().page, 3);

        let slow_page = api.list_vehicles(2, 10).await;
        assert!(!controller.finish_page_load(slow, slow_page));
        assert_eq!(controller.page().page, 3);
        assert_eq!(controller.load_state(), LoadState::Idle);
    }

    #[tokio::test]
    async fn test_invalid_submit_issues_no_request() {
        let api = FakeApi::with_total(0);
        let mut controller = DashboardController::new(api.clone(), 10);
        controller.open_dialog();
        controller.set_field(Field::Vin, "AB");

        let outcome = controller.submit().await;

        assert_eq!(outcome, SubmitOutcome::Rejected(SubmitRejected::Invalid));
        assert!(api.calls().is_empty());
        for field in Field::VALIDATED {
            assert!(controller.draft().is_touched(field));
        }
        assert_eq!(
            controller.draft().visible_error(Field::Vin),
            Some("VIN must be at least 5 characters")
        );
        assert_eq!(controller.dialog(), DialogState::Open);
    }

    #[tokio::test]
    async fn test_successful_submit_refreshes_and_auto_closes() {
        let api = FakeApi::with_total(3);
        let mut controller = DashboardController::new(api.clone(), 10);
        controller.bootstrap().await;
        controller.open_dialog();
        fill_valid(&mut controller);

        let before = Instant::now();
        let outcome = controller.submit().await;

        assert_eq!(outcome, SubmitOutcome::Created(None));
        assert_eq!(
            api.calls(),
            vec![
                Call::List(1, 10),
                Call::Create("1HGCM82633A004352".into()),
                Call::List(1, 10),
            ]
        );
        assert_eq!(controller.draft(), &FormDraft::new());
        assert_eq!(controller.status(), Some(&StatusMessage::success(CREATED_MESSAGE)));
        assert_eq!(controller.dialog(), DialogState::Open);

        let deadline = controller.auto_close_at().unwrap();
        assert!(deadline >= before + AUTO_CLOSE_DELAY);
        assert!(!controller.tick(deadline - Duration::from_millis(1)));
        assert!(controller.is_dialog_open());
        assert!(controller.tick(deadline));
        assert_eq!(controller.dialog(), DialogState::Closed);
        assert!(controller.status().is_none());
    }

    #[tokio::test]
    async fn test_failed_submit_keeps_draft() {
        let api = FakeApi::with_total(0);
        *api.create_failure.lock().unwrap() =
            Some(DashboardError::http(409, "Vehicle with this VIN already exists"));
        let mut controller = DashboardController::new(api.clone(), 10);
        controller.open_dialog();
        fill_valid(&mut controller);
        let draft = controller.draft().clone();

        let outcome = controller.submit().await;

        assert!(matches!(outcome, SubmitOutcome::Failed(_)));
        assert_eq!(controller.dialog(), DialogState::Open);
        assert_eq!(controller.draft().value(Field::Vin), draft.value(Field::Vin));
        let status = controller.status().unwrap();
        assert_eq!(status.tone, Tone::Error);
        assert_eq!(status.text, "Request failed (409): Vehicle with this VIN already exists");
        assert!(controller.auto_close_at().is_none());
        assert_eq!(api.calls(), vec![Call::Create("1HGCM82633A004352".into())]);
    }

    #[test]
    fn test_submit_while_submitting_is_busy() {
        let mut controller = DashboardController::new(FakeApi::with_total(0), 10);
        assert_eq!(controller.begin_submit(), Err(SubmitRejected::DialogClosed));

        controller.open_dialog();
        fill_valid(&mut controller);
        assert!(controller.begin_submit().is_ok());
        assert_eq!(controller.dialog(), DialogState::Submitting);
        assert_eq!(controller.begin_submit(), Err(SubmitRejected::Busy));
    }

    #[test]
    fn test_close_dialog_discards_draft_and_auto_close() {
        let mut controller = DashboardController::new(FakeApi::with_total(0), 10);
        controller.open_dialog();
        fill_valid(&mut controller);
        controller.begin_submit().unwrap();
        let now = Instant::now();
        controller.submit_succeeded(now);
        assert!(controller.auto_close_at().is_some());

        controller.close_dialog();
        assert_eq!(controller.dialog(), DialogState::Closed);
        assert!(controller.status().is_none());
        assert!(controller.auto_close_at().is_none());

        controller.open_dialog();
        controller.set_field(Field::Make, "Kia");
        assert!(!controller.tick(now + AUTO_CLOSE_DELAY * 2));
        assert!(controller.is_dialog_open());
        assert_eq!(controller.draft().value(Field::Make), "Kia");
    }

    #[test]
    fn test_result_after_user_closed_dialog_is_ignored() {
        let mut controller = DashboardController::new(FakeApi::with_total(0), 10);
        controller.open_dialog();
        fill_valid(&mut controller);
        controller.begin_submit().unwrap();
        controller.close_dialog();

        controller.submit_failed(&DashboardError::http(500, "boom"));
        assert!(controller.status().is_none());
        controller.submit_succeeded(Instant::now());
        assert_eq!(controller.dialog(), DialogState::Closed);
        assert!(controller.auto_close_at().is_none());
    }

    #[tokio::test]
    async fn test_load_health() {
        let mut controller = DashboardController::new(FakeApi::with_total(0), 10);
        assert!(controller.health().is_none());
        controller.load_health().await;
        assert_eq!(controller.health(), Some("ok"));

        controller.set_health(Err(DashboardError::http(502, "Bad Gateway")));
        assert_eq!(controller.health(), Some("ok"));
    }
}
