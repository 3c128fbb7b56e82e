//! Interactive dashboard state
//!
//! [`App`] turns key presses and finished requests into state changes and
//! [`Effect`]s. It never touches the network itself; the event loop runs
//! each effect on a task and reports back with an [`AppEvent`].

use crate::api::{InventoryApi, PaginatedVehicles, Vehicle, VehicleCreate};
use crate::dashboard::{
    should_render_grid, DashboardController, DetailOutcome, DetailRequest, DetailState,
    DetailView, Field, LightboxKey, LoadState, PageChangeOptions, PageRequest, SubmitRejected,
};
use crate::error::Result;
use crate::ui::theme::ThemeStore;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

/// Network work requested by the UI
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    FetchHealth,
    FetchPage(PageRequest),
    Create(VehicleCreate),
    FetchDetail(DetailRequest),
}

/// Completed network work
#[derive(Debug)]
pub enum AppEvent {
    Health(Result<String>),
    PageLoaded(PageRequest, Result<PaginatedVehicles>),
    Created(Result<Option<Vehicle>>),
    DetailLoaded(DetailRequest, DetailOutcome),
}

/// Which screen has the keyboard
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    List,
    Dialog,
    Detail,
    Lightbox,
}

/// Dashboard application state
pub struct App {
    controller: DashboardController,
    detail: DetailView,
    theme: ThemeStore,
    selected: usize,
    focus: Field,
    frame_count: usize,
    should_quit: bool,
}

impl App {
    pub fn new(api: Arc<dyn InventoryApi>, page_size: usize) -> Self {
        Self {
            controller: DashboardController::new(api, page_size),
            detail: DetailView::new(),
            theme: ThemeStore::default(),
            selected: 0,
            focus: Field::Vin,
            frame_count: 0,
            should_quit: false,
        }
    }

    pub fn controller(&self) -> &DashboardController {
        &self.controller
    }

    pub fn detail(&self) -> &DetailView {
        &self.detail
    }

    pub fn theme(&self) -> &ThemeStore {
        &self.theme
    }

    /// Highlighted table row
    pub fn selected(&self) -> usize {
        self.selected
    }

    /// Focused dialog field
    pub fn focus(&self) -> Field {
        self.focus
    }

    /// Animation frame counter for spinners
    pub fn frame_count(&self) -> usize {
        self.frame_count
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// Screen receiving input
    pub fn screen(&self) -> Screen {
        match self.detail.state() {
            Some(DetailState::Loaded { lightbox, .. }) if lightbox.is_open() => Screen::Lightbox,
            Some(_) => Screen::Detail,
            None if self.controller.is_dialog_open() => Screen::Dialog,
            None => Screen::List,
        }
    }

    /// Initial requests: first page and health
    pub fn start(&mut self) -> Vec<Effect> {
        let mut effects = vec![Effect::FetchHealth];
        effects.extend(self.controller.begin_bootstrap().map(Effect::FetchPage));
        effects
    }

    /// Periodic tick: spinner frames and the dialog auto-close
    pub fn on_tick(&mut self, now: Instant) {
        self.frame_count = self.frame_count.wrapping_add(1);
        if self.controller.tick(now) {
            self.focus = Field::Vin;
        }
    }

    /// Apply a finished request
    pub fn on_event(&mut self, event: AppEvent, now: Instant) -> Vec<Effect> {
        match event {
            AppEvent::Health(result) => self.controller.set_health(result),
            AppEvent::PageLoaded(request, result) => {
                if self.controller.finish_page_load(request, result) {
                    self.clamp_selection();
                }
            }
            AppEvent::Created(Ok(_)) => {
                info!("vehicle created, refreshing first page");
                let refresh = self.controller.begin_page_load(1, PageChangeOptions::default());
                self.controller.submit_succeeded(now);
                self.focus = Field::Vin;
                return refresh.map(Effect::FetchPage).into_iter().collect();
            }
            AppEvent::Created(Err(err)) => self.controller.submit_failed(&err),
            AppEvent::DetailLoaded(request, outcome) => {
                self.detail.finish(request, outcome);
            }
        }
        Vec::new()
    }

    /// Handle a key press
    pub fn on_key(&mut self, key: KeyEvent) -> Vec<Effect> {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return Vec::new();
        }

        match self.screen() {
            Screen::List => self.on_list_key(key),
            Screen::Dialog => self.on_dialog_key(key),
            Screen::Detail => self.on_detail_key(key),
            Screen::Lightbox => {
                self.on_lightbox_key(key);
                Vec::new()
            }
        }
    }

    fn on_list_key(&mut self, key: KeyEvent) -> Vec<Effect> {
        let page = self.controller.page().page;
        let effect = match key.code {
            KeyCode::Char('q') | KeyCode::Esc => {
                self.should_quit = true;
                None
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.selected = self.selected.saturating_sub(1);
                None
            }
            KeyCode::Down | KeyCode::Char('j') => {
                let rows = self.controller.page().items.len();
                if self.selected + 1 < rows {
                    self.selected += 1;
                }
                None
            }
            KeyCode::Left | KeyCode::Char('p') if page > 1 => self.change_page(page - 1),
            KeyCode::Right | KeyCode::Char('n') => self.change_page(page + 1),
            // The first page is still on its way
            KeyCode::Char('r') if self.controller.load_state() == LoadState::InitialLoading => None,
            KeyCode::Char('r') => self.change_page(page),
            KeyCode::Char('a') => {
                self.controller.open_dialog();
                self.focus = Field::Vin;
                None
            }
            KeyCode::Char('t') => {
                let theme = self.theme.toggle();
                debug!(?theme, "theme toggled");
                None
            }
            KeyCode::Enter => {
                return match self.controller.page().items.get(self.selected) {
                    Some(item) => vec![Effect::FetchDetail(self.detail.begin(item.vin.clone()))],
                    None => Vec::new(),
                };
            }
            _ => None,
        };
        effect.map(Effect::FetchPage).into_iter().collect()
    }

    fn change_page(&mut self, page: usize) -> Option<PageRequest> {
        self.controller.begin_page_load(
            page,
            PageChangeOptions {
                reset_status: true,
                silent: false,
            },
        )
    }

    fn clamp_selection(&mut self) {
        let rows = self.controller.page().items.len();
        if self.selected >= rows {
            self.selected = rows.saturating_sub(1);
        }
    }

    fn on_dialog_key(&mut self, key: KeyEvent) -> Vec<Effect> {
        match key.code {
            KeyCode::Esc => {
                self.controller.close_dialog();
                self.focus = Field::Vin;
            }
            KeyCode::Tab => self.move_focus(self.focus.next()),
            KeyCode::BackTab => self.move_focus(self.focus.previous()),
            KeyCode::Enter
                if self.focus == Field::ImageUrls && key.modifiers.contains(KeyModifiers::ALT) =>
            {
                self.controller.push_char(self.focus, '\n');
            }
            KeyCode::Enter => {
                self.controller.blur_field(self.focus);
                return match self.controller.begin_submit() {
                    Ok(payload) => vec![Effect::Create(payload)],
                    Err(SubmitRejected::Invalid) => {
                        if let Some(first) = Field::VALIDATED
                            .into_iter()
                            .find(|f| self.controller.draft().visible_error(*f).is_some())
                        {
                            self.focus = first;
                        }
                        Vec::new()
                    }
                    Err(_) => Vec::new(),
                };
            }
            KeyCode::Backspace => self.controller.pop_char(self.focus),
            KeyCode::Char(c) => self.controller.push_char(self.focus, c),
            _ => {}
        }
        Vec::new()
    }

    fn move_focus(&mut self, next: Field) {
        self.controller.blur_field(self.focus);
        self.focus = next;
    }

    fn on_detail_key(&mut self, key: KeyEvent) -> Vec<Effect> {
        match key.code {
            KeyCode::Esc | KeyCode::Backspace | KeyCode::Char('q') => self.detail.dismiss(),
            KeyCode::Enter | KeyCode::Char('g') => {
                if let Some(lightbox) = self.detail.lightbox_mut() {
                    // No gallery is shown for a single image
                    if should_render_grid(lightbox.len()) {
                        lightbox.open(0);
                    }
                }
            }
            _ => {}
        }
        Vec::new()
    }

    fn on_lightbox_key(&mut self, key: KeyEvent) {
        let key = match key.code {
            KeyCode::Left => LightboxKey::Left,
            KeyCode::Right => LightboxKey::Right,
            KeyCode::Esc | KeyCode::Char('q') => LightboxKey::Escape,
            _ => return,
        };
        if let Some(lightbox) = self.detail.lightbox_mut() {
            lightbox.handle_key(key);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{HealthResponse, PaginatedResponse, VehicleListItem};
    use crate::dashboard::{DialogState, VehicleDetail};
    use crate::error::DashboardError;
    use async_trait::async_trait;

    struct StaticApi;

    #[async_trait]
    impl InventoryApi for StaticApi {
        async fn health(&self) -> Result<HealthResponse> {
            Ok(HealthResponse { status: "ok".into() })
        }

        async fn list_vehicles(&self, page: usize, page_size: usize) -> Result<PaginatedVehicles> {
            Ok(PaginatedResponse::from_unpaginated(&rows(25), page, page_size))
        }

        async fn get_vehicle(&self, vin: &str) -> Result<Vehicle> {
            Err(DashboardError::NotFound(vin.to_string()))
        }

        async fn create_vehicle(&self, _payload: &VehicleCreate) -> Result<Option<Vehicle>> {
            Ok(None)
        }
    }

    fn rows(n: usize) -> Vec<VehicleListItem> {
        (0..n)
            .map(|i| VehicleListItem {
                vin: format!("VIN{:05}", i),
                make: "Mazda".into(),
                model: "3".into(),
                created_at: None,
            })
            .collect()
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            app.on_key(key(KeyCode::Char(c)));
        }
    }

    fn loaded_app() -> App {
        let mut app = App::new(Arc::new(StaticApi), 10);
        let effects = app.start();
        assert_eq!(effects[0], Effect::FetchHealth);
        let Effect::FetchPage(request) = effects[1].clone() else {
            panic!("expected page fetch");
        };
        let page = PaginatedResponse::from_unpaginated(&rows(25), 1, 10);
        app.on_event(AppEvent::PageLoaded(request, Ok(page)), Instant::now());
        app
    }

    #[test]
    fn test_start_bootstraps_once() {
        let mut app = App::new(Arc::new(StaticApi), 10);
        assert_eq!(app.start().len(), 2);
        assert_eq!(app.start(), vec![Effect::FetchHealth]);
    }

    #[test]
    fn test_paging_keys() {
        let mut app = loaded_app();
        assert!(app.on_key(key(KeyCode::Left)).is_empty());

        let effects = app.on_key(key(KeyCode::Right));
        assert!(matches!(&effects[..], [Effect::FetchPage(r)] if r.page == 2));

        app.on_key(key(KeyCode::Down));
        app.on_key(key(KeyCode::Down));
        assert_eq!(app.selected(), 2);
    }

    #[test]
    fn test_past_last_page_requests_nothing() {
        let mut app = loaded_app();
        for expected in [2, 3] {
            let effects = app.on_key(key(KeyCode::Right));
            let [Effect::FetchPage(request)] = &effects[..] else {
                panic!("expected page fetch");
            };
            assert_eq!(request.page, expected);
            let page = PaginatedResponse::from_unpaginated(&rows(25), request.page, 10);
            app.on_event(AppEvent::PageLoaded(*request, Ok(page)), Instant::now());
        }
        assert_eq!(app.controller().page().page, 3);
        assert!(app.on_key(key(KeyCode::Right)).is_empty());
    }

    #[test]
    fn test_dialog_flow() {
        let mut app = loaded_app();
        app.on_key(key(KeyCode::Char('a')));
        assert_eq!(app.screen(), Screen::Dialog);

        assert!(app.on_key(key(KeyCode::Enter)).is_empty());
        assert!(app.controller().draft().is_touched(Field::Description));

        type_text(&mut app, "1HGCM82633A004352");
        app.on_key(key(KeyCode::Tab));
        type_text(&mut app, "Honda");
        app.on_key(key(KeyCode::Tab));
        type_text(&mut app, "Accord");
        app.on_key(key(KeyCode::Tab));
        type_text(&mut app, "Clean title, one owner");
        app.on_key(key(KeyCode::Tab));
        type_text(&mut app, "a.jpg,b.jpg");

        let effects = app.on_key(key(KeyCode::Enter));
        let [Effect::Create(payload)] = &effects[..] else {
            panic!("expected create effect, got {:?}", effects);
        };
        assert_eq!(payload.make, "Honda");
        assert_eq!(payload.image_urls, vec!["a.jpg", "b.jpg"]);
        assert_eq!(app.controller().dialog(), DialogState::Submitting);

        let now = Instant::now();
        let effects = app.on_event(AppEvent::Created(Ok(None)), now);
        assert!(matches!(&effects[..], [Effect::FetchPage(r)] if r.page == 1));
        assert_eq!(app.controller().dialog(), DialogState::Open);

        app.on_tick(now + crate::dashboard::AUTO_CLOSE_DELAY);
        assert_eq!(app.screen(), Screen::List);
    }

    #[test]
    fn test_escape_closes_dialog() {
        let mut app = loaded_app();
        app.on_key(key(KeyCode::Char('a')));
        type_text(&mut app, "ABC");
        app.on_key(key(KeyCode::Esc));
        assert_eq!(app.screen(), Screen::List);
        assert!(app.controller().draft().vin.is_empty());
        assert!(!app.should_quit());
    }

    #[test]
    fn test_detail_and_lightbox_navigation() {
        let mut app = loaded_app();
        let effects = app.on_key(key(KeyCode::Enter));
        let [Effect::FetchDetail(request)] = &effects[..] else {
            panic!("expected detail fetch");
        };
        assert_eq!(request.vin, "VIN00000");
        assert_eq!(app.screen(), Screen::Detail);

        let vehicle = Vehicle {
            vin: "VIN00000".into(),
            make: "Mazda".into(),
            model: "3".into(),
            description: "Compact hatchback".into(),
            image_urls: vec!["a".into(), "b".into(), "c".into()],
            created_at: None,
        };
        app.on_event(
            AppEvent::DetailLoaded(
                request.clone(),
                DetailOutcome::Found(Box::new(VehicleDetail::new(vehicle))),
            ),
            Instant::now(),
        );

        app.on_key(key(KeyCode::Enter));
        assert_eq!(app.screen(), Screen::Lightbox);
        app.on_key(key(KeyCode::Left));
        let Some(DetailState::Loaded { lightbox, .. }) = app.detail().state() else {
            panic!("detail not loaded");
        };
        assert_eq!(lightbox.selected(), Some(2));

        app.on_key(key(KeyCode::Esc));
        assert_eq!(app.screen(), Screen::Detail);
        app.on_key(key(KeyCode::Esc));
        assert_eq!(app.screen(), Screen::List);
    }

    fn open_detail_with_images(app: &mut App, image_urls: &[&str]) {
        let effects = app.on_key(key(KeyCode::Enter));
        let [Effect::FetchDetail(request)] = &effects[..] else {
            panic!("expected detail fetch");
        };
        let vehicle = Vehicle {
            vin: request.vin.clone(),
            make: "Mazda".into(),
            model: "3".into(),
            description: "Compact hatchback".into(),
            image_urls: image_urls.iter().map(|s| s.to_string()).collect(),
            created_at: None,
        };
        let outcome = DetailOutcome::Found(Box::new(VehicleDetail::new(vehicle)));
        app.on_event(AppEvent::DetailLoaded(request.clone(), outcome), Instant::now());
    }

    #[test]
    fn test_single_image_has_no_lightbox() {
        let mut app = loaded_app();
        open_detail_with_images(&mut app, &["only.jpg"]);

        app.on_key(key(KeyCode::Enter));
        assert_eq!(app.screen(), Screen::Detail);
        app.on_key(key(KeyCode::Char('g')));
        assert_eq!(app.screen(), Screen::Detail);

        app.on_key(key(KeyCode::Esc));
        open_detail_with_images(&mut app, &["a.jpg", "b.jpg"]);
        app.on_key(key(KeyCode::Char('g')));
        assert_eq!(app.screen(), Screen::Lightbox);
    }

    #[test]
    fn test_refresh_waits_for_first_page() {
        let mut app = App::new(Arc::new(StaticApi), 10);
        let effects = app.start();
        assert!(app.on_key(key(KeyCode::Char('r'))).is_empty());
        assert_eq!(app.controller().load_state(), LoadState::InitialLoading);

        let Effect::FetchPage(request) = effects[1].clone() else {
            panic!("expected page fetch");
        };
        let page = PaginatedResponse::from_unpaginated(&rows(25), 1, 10);
        app.on_event(AppEvent::PageLoaded(request, Ok(page)), Instant::now());

        let effects = app.on_key(key(KeyCode::Char('r')));
        assert!(matches!(&effects[..], [Effect::FetchPage(r)] if r.page == 1));
    }

    #[test]
    fn test_paging_while_loading_keeps_latest_page() {
        let mut app = loaded_app();
        let first = app.on_key(key(KeyCode::Right));
        let [Effect::FetchPage(to_two)] = &first[..] else {
            panic!("expected page fetch");
        };
        assert_eq!(app.controller().load_state(), LoadState::PageLoading);

        // Back to page 1 before page 2 arrived
        let second = app.on_key(key(KeyCode::Char('r')));
        let [Effect::FetchPage(to_one)] = &second[..] else {
            panic!("expected page fetch");
        };
        assert_eq!(to_one.page, 1);

        let page_two = PaginatedResponse::from_unpaginated(&rows(25), 2, 10);
        app.on_event(AppEvent::PageLoaded(*to_two, Ok(page_two)), Instant::now());
        assert_eq!(app.controller().load_state(), LoadState::PageLoading);

        let page_one = PaginatedResponse::from_unpaginated(&rows(25), 1, 10);
        app.on_event(AppEvent::PageLoaded(*to_one, Ok(page_one)), Instant::now());
        assert_eq!(app.controller().page().page, 1);
        assert_eq!(app.controller().load_state(), LoadState::Idle);
    }

    #[test]
    fn test_theme_toggle_and_quit() {
        let mut app = loaded_app();
        let before = app.theme().get().resolve();
        app.on_key(key(KeyCode::Char('t')));
        assert_ne!(app.theme().get().resolve(), before);

        app.on_key(key(KeyCode::Char('q')));
        assert!(app.should_quit());
    }
}
