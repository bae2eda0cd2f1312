use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

use anyhow::Result;
use chrono::Utc;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tokio::sync::mpsc;
use tui::{backend::Backend as TuiBackend, Frame};

use crate::auth::{validate_login, Session};
use crate::config::Config;
use crate::db::{subscribe_projects, Backend, StoreError, Store};
use crate::documents::{DocumentGenerator, GeneratedDocument, TemplateError};
use crate::models::{LegalTemplate, Message, SettingKey, StudioSettings};
use crate::notice::{NoticeBoard, Notifier};
use crate::summarizer::{GeminiClient, Summarizer};
use crate::sync::{log_message, log_payment, DashboardData, DashboardFeed, Loader};
use crate::ui::{
    client_memory::{self, ClientMemoryAction, ClientMemoryState},
    clients::{self, ClientAction, ClientsState},
    dashboard::{self, DashboardAction, DashboardState},
    finance::{self, FinanceAction, FinanceState},
    landing::{self, LandingAction},
    layout,
    login::{self, LoginAction, LoginState},
    marketing::{self, MarketingAction, MarketingState},
    route::Route,
    services,
    settings::{self, SettingsAction, SettingsState},
    templates::{self, TemplateAction, TemplatesState},
};

pub const DEMO_OPERATOR_EMAIL: &str = "operator@canti.os";
pub const DEMO_OPERATOR_PASSWORD: &str = "studio";

/// Results of background work that only the UI loop may apply.
pub enum UiEvent {
    MessagesLoaded {
        client_id: String,
        result: Result<Vec<Message>, StoreError>,
    },
    ConversationSummary {
        client_id: String,
        text: String,
    },
    ProjectStatus {
        client_id: String,
        text: String,
    },
    DocumentFinished {
        title: String,
        result: Result<GeneratedDocument, TemplateError>,
    },
}

// Main application state
pub struct AppState {
    store: Arc<Backend>,
    loader: Loader<Backend>,
    feed: Option<DashboardFeed<Backend>>,
    data: DashboardData,
    notifier: Notifier,
    notices: NoticeBoard,
    session: Option<Session>,
    route: Route,
    home: Route,
    settings: StudioSettings,
    ai_enabled: Arc<AtomicBool>,
    auto_sync: Arc<AtomicBool>,
    summarizer: Arc<GeminiClient>,
    documents_dir: PathBuf,
    demo: bool,
    ui_tx: mpsc::UnboundedSender<UiEvent>,
    ui_rx: mpsc::UnboundedReceiver<UiEvent>,
    login_state: LoginState,
    dashboard_state: DashboardState,
    clients_state: ClientsState,
    client_memory_state: Option<ClientMemoryState>,
    finance_state: FinanceState,
    marketing_state: MarketingState,
    templates_state: TemplatesState,
    settings_state: SettingsState,
}

fn login_hint(demo: bool) -> Option<String> {
    demo.then(|| format!("Demo operator: {DEMO_OPERATOR_EMAIL} / {DEMO_OPERATOR_PASSWORD}"))
}

impl AppState {
    pub fn new(store: Backend, config: &Config, demo: bool) -> Result<Self> {
        let store = Arc::new(store);
        let settings = StudioSettings::default();
        let ai_enabled = Arc::new(AtomicBool::new(settings.ai_enabled));
        let auto_sync = Arc::new(AtomicBool::new(settings.auto_sync));
        let summarizer = Arc::new(GeminiClient::new(config, ai_enabled.clone())?);
        let (notifier, notices) = NoticeBoard::channel();
        let (ui_tx, ui_rx) = mpsc::unbounded_channel();

        Ok(Self {
            loader: Loader::new(store.clone()),
            store,
            feed: None,
            data: DashboardData::default(),
            notifier,
            notices,
            session: None,
            route: Route::Landing,
            home: Route::Dashboard,
            settings,
            ai_enabled,
            auto_sync,
            summarizer,
            documents_dir: PathBuf::from(&config.studio_output_dir),
            demo,
            ui_tx,
            ui_rx,
            login_state: LoginState::new(login_hint(demo)),
            dashboard_state: DashboardState::new(),
            clients_state: ClientsState::new(),
            client_memory_state: None,
            finance_state: FinanceState::new(),
            marketing_state: MarketingState::new(&config.studio_whatsapp_number),
            templates_state: TemplatesState::new(),
            settings_state: SettingsState::new(),
        })
    }

    /// Where sign-in lands, still subject to the session gate.
    pub fn with_home(mut self, home: Route) -> Self {
        self.home = home;
        self
    }

    /// Apply everything background tasks have produced since the last tick.
    pub fn pump(&mut self) {
        if let Some(feed) = self.feed.as_mut() {
            feed.drain_into(&mut self.data);
        }
        while let Ok(event) = self.ui_rx.try_recv() {
            self.apply_ui_event(event);
        }
        self.notices.poll(Instant::now());
    }

    pub fn draw<B: TuiBackend>(&mut self, frame: &mut Frame<B>) {
        match &self.route {
            Route::Landing => landing::render_landing(frame),
            Route::Login => login::render_login(frame, &self.login_state),
            route => {
                let chrome = layout::chrome(frame.size());
                let operator = self.session.as_ref().map(|s| s.email.as_str()).unwrap_or_default();
                layout::render_nav(frame, chrome.header, route, operator, &self.data);

                let buttons = match route {
                    Route::Dashboard => {
                        dashboard::render_dashboard(frame, chrome.body, &mut self.dashboard_state, &self.data);
                        dashboard::buttons()
                    }
                    Route::Clients => {
                        clients::render_clients(frame, chrome.body, &mut self.clients_state, &self.data);
                        clients::buttons()
                    }
                    Route::ClientMemory(_) => match self.client_memory_state.as_mut() {
                        Some(state) => {
                            client_memory::render_client_memory(frame, chrome.body, state, &self.data);
                            client_memory::buttons(state)
                        }
                        None => "<Esc> Back",
                    },
                    Route::Finance => {
                        finance::render_finance(frame, chrome.body, &self.finance_state, &self.data);
                        finance::buttons(&self.finance_state)
                    }
                    Route::Services => {
                        services::render_services(frame, chrome.body);
                        services::buttons()
                    }
                    Route::Marketing => {
                        marketing::render_marketing(frame, chrome.body, &mut self.marketing_state, &self.data);
                        marketing::buttons(&self.marketing_state)
                    }
                    Route::Templates => {
                        templates::render_templates(frame, chrome.body, &mut self.templates_state, &self.data);
                        templates::buttons()
                    }
                    Route::Settings => {
                        settings::render_settings(frame, chrome.body, &mut self.settings_state, &self.settings);
                        settings::buttons()
                    }
                    Route::Landing | Route::Login => "",
                };
                layout::render_buttons(frame, chrome.footer, buttons);
            }
        }

        layout::render_notice(frame, self.notices.current());
    }

    /// Whether the current screen has a text field taking keystrokes.
    fn is_editing(&self) -> bool {
        match &self.route {
            Route::Login => self.login_state.is_editing(),
            Route::ClientMemory(_) => self
                .client_memory_state
                .as_ref()
                .is_some_and(|s| s.is_editing()),
            Route::Finance => self.finance_state.is_editing(),
            Route::Marketing => self.marketing_state.is_editing(),
            _ => false,
        }
    }

    /// Handle one key press. Returns whether the app should quit.
    pub async fn handle_key(&mut self, key: KeyEvent) -> Result<bool> {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return Ok(true);
        }

        if self.route.is_protected() && !self.is_editing() {
            match key.code {
                KeyCode::Char('q') => return Ok(true),
                KeyCode::Char('x') => {
                    self.sign_out();
                    return Ok(false);
                }
                KeyCode::Char(c) if c.is_ascii_digit() => {
                    if let Some(route) = Route::from_nav_key(c) {
                        self.navigate(route);
                    }
                    return Ok(false);
                }
                _ => {}
            }
        }

        match self.route.clone() {
            Route::Landing => return Ok(self.handle_landing_key(key)),
            Route::Login => self.handle_login_key(key).await,
            Route::Dashboard => self.handle_dashboard_key(key),
            Route::Clients => self.handle_clients_key(key),
            Route::ClientMemory(_) => self.handle_client_memory_key(key),
            Route::Finance => self.handle_finance_key(key),
            Route::Services => {}
            Route::Marketing => self.handle_marketing_key(key),
            Route::Templates => self.handle_templates_key(key),
            Route::Settings => self.handle_settings_key(key),
        }

        Ok(false)
    }

    /// Move to `route`, or wherever the session gate sends it.
    pub fn navigate(&mut self, route: Route) {
        let route = route.gate(self.session.as_ref());
        tracing::debug!(path = %route.path(), "navigate");

        if let Route::ClientMemory(client_id) = &route {
            let reopened = self
                .client_memory_state
                .as_ref()
                .is_some_and(|s| s.client_id() == client_id);
            if !reopened {
                self.open_client_memory(client_id);
            }
        }
        self.route = route;
    }

    fn open_client_memory(&mut self, client_id: &str) {
        self.client_memory_state = Some(ClientMemoryState::new(client_id));

        let store = self.store.clone();
        let tx = self.ui_tx.clone();
        let client_id = client_id.to_string();
        tokio::spawn(async move {
            let result = store.fetch_messages(&client_id).await;
            let _ = tx.send(UiEvent::MessagesLoaded { client_id, result });
        });
    }

    async fn sign_in(&mut self, email: String, password: String) {
        if let Err(e) = validate_login(&email, &password) {
            self.login_state.fail(e.to_string());
            return;
        }

        match self.store.sign_in(&email, &password).await {
            Ok(session) => {
                tracing::info!(operator = %session.email, "signed in");
                self.session = Some(session);
                self.login_state = LoginState::new(login_hint(self.demo));
                self.mount_feed();
                self.navigate(self.home.clone());
            }
            Err(e) => {
                tracing::warn!(error = %e, email = %email, "sign-in failed");
                self.login_state.fail(e.to_string());
            }
        }
    }

    /// Mount a fresh feed. The Postgres change subscription connects on the
    /// feed's listener task, not here.
    fn mount_feed(&mut self) {
        let store = self.store.clone();
        let changes = async move {
            let Backend::Postgres(db) = store.as_ref() else {
                return None;
            };
            match subscribe_projects(db).await {
                Ok(changes) => Some(changes),
                Err(e) => {
                    tracing::warn!(error = %e, "live project updates unavailable");
                    None
                }
            }
        };

        self.data = DashboardData::default();
        self.feed = Some(DashboardFeed::mount(self.loader.clone(), changes, self.auto_sync.clone()));
    }

    fn sign_out(&mut self) {
        if let Some(session) = self.session.take() {
            tracing::info!(operator = %session.email, "signed out");
        }
        self.feed = None;
        self.data = DashboardData::default();
        self.client_memory_state = None;
        self.notifier.info("Session Terminated");
        self.navigate(Route::Landing);
    }

    fn request_conversation_summary(&self, client_id: &str, messages: Vec<Message>) {
        let summarizer = self.summarizer.clone();
        let tx = self.ui_tx.clone();
        let client_id = client_id.to_string();
        tokio::spawn(async move {
            let text = summarizer.summarize_conversation(&messages).await;
            let _ = tx.send(UiEvent::ConversationSummary { client_id, text });
        });
    }

    fn apply_ui_event(&mut self, event: UiEvent) {
        match event {
            UiEvent::MessagesLoaded { client_id, result } => {
                let embedded = self
                    .data
                    .find_client(&client_id)
                    .map(|c| c.conversations)
                    .unwrap_or_default();
                let stored = result.unwrap_or_else(|e| {
                    tracing::warn!(error = %e, client_id = %client_id, "message read failed");
                    Vec::new()
                });

                let Some(state) = self.current_client_memory(&client_id) else {
                    return;
                };
                if state.set_messages(stored, &embedded) {
                    let messages = state.messages().to_vec();
                    self.request_conversation_summary(&client_id, messages);
                }
            }
            UiEvent::ConversationSummary { client_id, text } => {
                if let Some(state) = self.current_client_memory(&client_id) {
                    state.set_summary(text);
                }
            }
            UiEvent::ProjectStatus { client_id, text } => {
                if let Some(state) = self.current_client_memory(&client_id) {
                    state.set_project_status(text);
                }
            }
            UiEvent::DocumentFinished { title, result } => match result {
                Ok(document) => {
                    tracing::info!(
                        markdown = %document.markdown.display(),
                        pdf = document.pdf.is_some(),
                        "document generated"
                    );
                    self.notifier.success(format!("{title} Generated"));
                }
                Err(e) => {
                    tracing::warn!(error = %e, template = %title, "document generation failed");
                    self.notifier.error(e.to_string());
                }
            },
        }
    }

    /// The open client memory state, if it is still showing `client_id`.
    fn current_client_memory(&mut self, client_id: &str) -> Option<&mut ClientMemoryState> {
        self.client_memory_state
            .as_mut()
            .filter(|s| s.client_id() == client_id)
    }

    fn handle_landing_key(&mut self, key: KeyEvent) -> bool {
        match landing::handle_key(key) {
            Some(LandingAction::Enter) => {
                let next = if self.session.is_some() { Route::Dashboard } else { Route::Login };
                self.navigate(next);
                false
            }
            Some(LandingAction::Exit) => true,
            None => false,
        }
    }

    async fn handle_login_key(&mut self, key: KeyEvent) {
        match login::handle_key(&mut self.login_state, key) {
            Some(LoginAction::Submit { email, password }) => self.sign_in(email, password).await,
            Some(LoginAction::Back) => self.navigate(Route::Landing),
            None => {}
        }
    }

    fn handle_dashboard_key(&mut self, key: KeyEvent) {
        match dashboard::handle_key(&mut self.dashboard_state, key, &self.data) {
            Some(DashboardAction::OpenClient(client_id)) => self.navigate(Route::ClientMemory(client_id)),
            Some(DashboardAction::Refresh) => {
                if let Some(feed) = &self.feed {
                    feed.refresh();
                }
            }
            None => {}
        }
    }

    fn handle_clients_key(&mut self, key: KeyEvent) {
        if let Some(ClientAction::OpenClient(client_id)) = clients::handle_key(&mut self.clients_state, key, &self.data) {
            self.navigate(Route::ClientMemory(client_id));
        }
    }

    fn handle_client_memory_key(&mut self, key: KeyEvent) {
        let Some(state) = self.client_memory_state.as_mut() else {
            if key.code == KeyCode::Esc {
                self.navigate(Route::Clients);
            }
            return;
        };

        match client_memory::handle_key(state, key, &self.data) {
            Some(ClientMemoryAction::Back) => self.navigate(Route::Clients),
            Some(ClientMemoryAction::SendMessage(text)) => {
                let client_id = state.client_id().to_string();
                match log_message(self.store.clone(), &self.notifier, &client_id, &text) {
                    Ok(pending) => {
                        state.push_message(pending.entry);
                        let messages = state.messages().to_vec();
                        self.request_conversation_summary(&client_id, messages);
                    }
                    Err(e) => self.notifier.warning(e.to_string()),
                }
            }
            Some(ClientMemoryAction::ChecklistToggled) => self.notifier.success("Progress Updated"),
            Some(ClientMemoryAction::RequestProjectStatus { title, checklist }) => {
                let summarizer = self.summarizer.clone();
                let tx = self.ui_tx.clone();
                let client_id = state.client_id().to_string();
                tokio::spawn(async move {
                    let text = summarizer.summarize_project(&title, &checklist).await;
                    let _ = tx.send(UiEvent::ProjectStatus { client_id, text });
                });
            }
            None => {}
        }
    }

    fn handle_finance_key(&mut self, key: KeyEvent) {
        let Some(FinanceAction::LogPayment {
            project_id,
            amount,
            description,
        }) = finance::handle_key(&mut self.finance_state, key, &self.data)
        else {
            return;
        };

        match log_payment(self.store.clone(), &self.notifier, &project_id, amount, &description) {
            Ok(pending) => self.data.record_local_payment(pending.entry),
            Err(e) => self.finance_state.error = Some(e.to_string()),
        }
    }

    fn handle_marketing_key(&mut self, key: KeyEvent) {
        if let Some(MarketingAction::Converted(name)) = marketing::handle_key(&mut self.marketing_state, key, &self.data) {
            tracing::info!(lead = %name, "lead converted");
            self.notifier.success(format!("Lead {name} Converted to Record"));
        }
    }

    fn handle_templates_key(&mut self, key: KeyEvent) {
        if let Some(TemplateAction::Generate { template, project_id }) =
            templates::handle_key(&mut self.templates_state, key, &self.data)
        {
            self.generate_document(template, &project_id);
        }
    }

    /// Write the document on a blocking thread; the outcome comes back as a
    /// [`UiEvent::DocumentFinished`].
    fn generate_document(&self, template: LegalTemplate, project_id: &str) {
        let Some(project) = self.data.projects().into_iter().find(|p| p.id == project_id) else {
            self.notifier.error("Project not found");
            return;
        };
        let Some(client) = self.data.find_client(&project.client_id) else {
            self.notifier.error("Client record not found");
            return;
        };

        self.notifier.info(format!("Processing {}...", template.title));

        let dir = self.documents_dir.clone();
        let tx = self.ui_tx.clone();
        tokio::task::spawn_blocking(move || {
            let result = DocumentGenerator::new(&dir)
                .and_then(|generator| generator.generate(&template, &client, &project, Utc::now().date_naive()));
            let _ = tx.send(UiEvent::DocumentFinished {
                title: template.title,
                result,
            });
        });
    }

    fn handle_settings_key(&mut self, key: KeyEvent) {
        if let Some(SettingsAction::Toggle(setting)) = settings::handle_key(&mut self.settings_state, key) {
            self.toggle_setting(setting);
        }
    }

    fn toggle_setting(&mut self, key: SettingKey) {
        let value = self.settings.toggle(key);
        match key {
            SettingKey::AiEnabled => self.ai_enabled.store(value, Ordering::Relaxed),
            SettingKey::AutoSync => self.auto_sync.store(value, Ordering::Relaxed),
            _ => {}
        }
        tracing::info!(setting = %key, value, "setting changed");
        self.notifier.success(settings::updated_notice(key));
    }
}
