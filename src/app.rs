//! Root application component
//!
//! The App struct implements the Component trait, acting as the root component
//! that delegates event handling and rendering to the screen of the current
//! route and to the modal on top of the stack. API calls run on the
//! [`ApiRunner`]; their [`Effect`]s are applied on every tick.

use crate::action::Action;
use crate::api::{ApiClient, ApiError, HttpTransport, Navigator, Session, SystemClock};
use crate::component::{Component, Screen};
use crate::components::shell::{
    render_header, render_help_bar, render_menu, render_status_bar, ShellContext,
};
use crate::components::{
    calculate_main_layout, AddDatasetComponent, AdminComponent, AlertDialog, BidsWizardComponent,
    ConfirmRemoveDialog, DatasetPreviewComponent, DatasetsComponent, EditDatasetDialog,
    FileBrowserDialog, HelpDialog, LoginComponent, MedicalFolderWizardComponent,
    NodeConfigComponent, PasswordChangeComponent, QuitDialog,
};
use crate::config::Config;
use crate::model::modal::{BrowseTarget, Modal, ModalStack};
use crate::model::repository::RepoPath;
use crate::model::route::{Route, Router};
use crate::services::datasets::DATA_NOT_FOUND_MESSAGE;
use crate::services::{self, ApiRunner, ChannelNavigator, Effect};
use crate::store::{
    AdminAction, AuthAction, DatasetsAction, MedicalFolderAction, Store, StoreAction,
};
use crate::wizard;
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{layout::Rect, Frame};
use std::future::Future;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// How long a status-bar notice stays up
const NOTICE_TTL: Duration = Duration::from_secs(5);

// ═══════════════════════════════════════════════════════════════════════════════
// App Struct
// ═══════════════════════════════════════════════════════════════════════════════

pub struct App {
    // ─────────────────────────────────────────────────────────────────────────
    // Core State
    // ─────────────────────────────────────────────────────────────────────────
    pub should_quit: bool,
    pub config: Config,
    config_dir: PathBuf,
    pub router: Router,
    pub modals: ModalStack,
    pub store: Store,
    notice: Option<(String, Instant)>,
    tick: u64,

    // ─────────────────────────────────────────────────────────────────────────
    // Node API
    // ─────────────────────────────────────────────────────────────────────────
    runner: ApiRunner,
    session: Arc<Session>,
    navigator: Arc<dyn Navigator>,
    /// Mirrors "current route is the login page" for the navigator
    on_login_page: Arc<AtomicBool>,
    /// `None` until a valid node address is known
    api: Option<ApiClient>,

    // ─────────────────────────────────────────────────────────────────────────
    // Screens
    // ─────────────────────────────────────────────────────────────────────────
    login: LoginComponent,
    datasets: DatasetsComponent,
    preview: DatasetPreviewComponent,
    add_dataset: AddDatasetComponent,
    medical_folder: MedicalFolderWizardComponent,
    bids: BidsWizardComponent,
    node_config: NodeConfigComponent,
    password: PasswordChangeComponent,
    admin: AdminComponent,

    // ─────────────────────────────────────────────────────────────────────────
    // Dialogs
    // ─────────────────────────────────────────────────────────────────────────
    quit_dialog: QuitDialog,
    help_dialog: HelpDialog,
    file_browser: FileBrowserDialog,
    edit_dataset: EditDatasetDialog,
}

// ═══════════════════════════════════════════════════════════════════════════════
// App Implementation
// ═══════════════════════════════════════════════════════════════════════════════

impl App {
    /// Build the app on the login page; `config_dir` receives the saved config
    pub fn new(config: Config, config_dir: PathBuf) -> Result<Self> {
        let runner = ApiRunner::new()?;
        let on_login_page = Arc::new(AtomicBool::new(true));
        let navigator: Arc<dyn Navigator> =
            Arc::new(ChannelNavigator::new(runner.sender(), on_login_page.clone()));
        let session = Arc::new(Session::new(Arc::new(SystemClock)));
        let login = LoginComponent::new(&config.server_url, config.last_email.as_deref());

        let mut app = Self {
            should_quit: false,
            config,
            config_dir,
            router: Router::new(Route::Login),
            modals: ModalStack::new(),
            store: Store::new(),
            notice: None,
            tick: 0,
            runner,
            session,
            navigator,
            on_login_page,
            api: None,
            login,
            datasets: DatasetsComponent::default(),
            preview: DatasetPreviewComponent::default(),
            add_dataset: AddDatasetComponent::default(),
            medical_folder: MedicalFolderWizardComponent::default(),
            bids: BidsWizardComponent::default(),
            node_config: NodeConfigComponent::default(),
            password: PasswordChangeComponent::default(),
            admin: AdminComponent::default(),
            quit_dialog: QuitDialog::default(),
            help_dialog: HelpDialog::default(),
            file_browser: FileBrowserDialog::default(),
            edit_dataset: EditDatasetDialog::default(),
        };

        let server_url = app.config.server_url.clone();
        if let Err(err) = app.connect(&server_url) {
            tracing::warn!(server = %server_url, error = %err, "configured node address is not usable");
        }
        app.sync_screens();
        Ok(app)
    }

    /// Point the API client at `server_url`, keeping the session and navigator
    fn connect(&mut self, server_url: &str) -> Result<(), ApiError> {
        let transport = HttpTransport::new(server_url, self.config.timeout())?;
        self.api = Some(ApiClient::new(
            Arc::new(transport),
            self.session.clone(),
            self.navigator.clone(),
        ));
        self.config.server_url = server_url.to_string();
        tracing::info!(server = %server_url, "node address set");
        Ok(())
    }

    /// Run an API job in the background
    fn spawn<F, Fut>(&mut self, label: &'static str, job: F)
    where
        F: FnOnce(ApiClient) -> Fut,
        Fut: Future<Output = Vec<Effect>> + Send + 'static,
    {
        let Some(api) = self.api.clone() else {
            self.alert(format!("Node address `{}` is not valid", self.config.server_url));
            return;
        };
        self.runner.spawn(label, job(api));
    }

    fn alert(&mut self, message: String) {
        self.modals.push(Modal::Alert {
            title: "Error".to_string(),
            message,
        });
    }

    fn dispatch(&mut self, action: StoreAction) {
        if let StoreAction::Auth(AuthAction::LoggedIn { email }) = &action {
            self.remember_login(email.clone());
        }
        self.store.dispatch(action);
        self.sync_screens();
    }

    /// Prefill the next login with this node and email.
    ///
    /// Only these two fields are written back; other command-line
    /// overrides stay out of the file.
    fn remember_login(&mut self, email: String) {
        self.config.last_email = Some(email.clone());
        let mut saved = Config::load_from(&self.config_dir).unwrap_or_default();
        saved.server_url = self.config.server_url.clone();
        saved.last_email = Some(email);
        if let Err(err) = saved.save_to(&self.config_dir) {
            tracing::warn!(error = %err, "failed to save config");
        }
    }

    fn sync_screens(&mut self) {
        let store = &self.store;
        self.login.sync(store);
        self.datasets.sync(store);
        self.preview.sync(store);
        self.add_dataset.sync(store);
        self.medical_folder.sync(store);
        self.bids.sync(store);
        self.node_config.sync(store);
        self.password.sync(store);
        self.admin.sync(store);
        self.file_browser.sync(&store.repository);
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Navigation
    // ─────────────────────────────────────────────────────────────────────────

    fn navigate(&mut self, route: Route) {
        if route.requires_login() && !self.store.auth.logged_in {
            tracing::debug!(%route, "ignoring navigation while logged out");
            return;
        }
        self.router.navigate(route);
        self.enter_route();
    }

    fn back(&mut self) {
        self.router.back();
        self.enter_route();
    }

    /// Drop the history and start over at `route` with fresh forms
    fn restart(&mut self, route: Route) {
        self.router.reset(route);
        self.add_dataset = AddDatasetComponent::default();
        if *self.router.current() == Route::Login {
            self.login =
                LoginComponent::new(&self.config.server_url, self.config.last_email.as_deref());
            self.password = PasswordChangeComponent::default();
        }
        self.sync_screens();
        self.enter_route();
    }

    /// Load whatever the new current screen shows
    fn enter_route(&mut self) {
        let route = self.router.current().clone();
        self.on_login_page
            .store(route == Route::Login, Ordering::SeqCst);
        tracing::debug!(%route, depth = self.router.depth(), "route");
        self.screen_mut().on_enter();

        match route {
            Route::Datasets => self.load_datasets(),
            Route::DatasetPreview { dataset_id } => {
                self.preview.open(&dataset_id);
                self.preview.sync(&self.store);
                self.spawn("preview dataset", |api| {
                    services::datasets::preview(api, dataset_id)
                });
            }
            Route::MedicalFolderWizard if self.store.medical_folder.default_modality_names.is_empty() => {
                self.spawn("default modalities", services::medical_folder::default_modalities)
            }
            Route::NodeConfig => self.spawn("node environ", services::node::environ),
            Route::Admin => self.load_admin(),
            _ => {}
        }
    }

    fn load_datasets(&mut self) {
        self.dispatch(StoreAction::Datasets(DatasetsAction::Loading));
        self.spawn("list datasets", services::datasets::list);
    }

    fn load_admin(&mut self) {
        self.dispatch(StoreAction::Admin(AdminAction::Loading));
        self.spawn("list users", services::admin::load);
    }

    fn screen(&self) -> &dyn Screen {
        match self.router.current() {
            Route::Login => &self.login,
            Route::Datasets => &self.datasets,
            Route::DatasetPreview { .. } => &self.preview,
            Route::AddDataset => &self.add_dataset,
            Route::MedicalFolderWizard => &self.medical_folder,
            Route::BidsWizard => &self.bids,
            Route::NodeConfig => &self.node_config,
            Route::PasswordChange => &self.password,
            Route::Admin => &self.admin,
        }
    }

    fn screen_mut(&mut self) -> &mut dyn Screen {
        match self.router.current() {
            Route::Login => &mut self.login,
            Route::Datasets => &mut self.datasets,
            Route::DatasetPreview { .. } => &mut self.preview,
            Route::AddDataset => &mut self.add_dataset,
            Route::MedicalFolderWizard => &mut self.medical_folder,
            Route::BidsWizard => &mut self.bids,
            Route::NodeConfig => &mut self.node_config,
            Route::PasswordChange => &mut self.password,
            Route::Admin => &mut self.admin,
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Effects
    // ─────────────────────────────────────────────────────────────────────────

    fn apply_effect(&mut self, effect: Effect) {
        match effect {
            Effect::Dispatch(action) => self.dispatch(action),
            Effect::Alert(message) => self.alert(message),
            Effect::Notice(message) => self.notice = Some((message, Instant::now())),
            Effect::Navigate(route) => self.navigate(route),
            Effect::Restart(route) => self.restart(route),
            Effect::Back => self.back(),
            Effect::SessionExpired(message) => {
                tracing::info!(%message, "session expired");
                self.modals.clear();
                self.dispatch(StoreAction::Auth(AuthAction::SessionExpired {
                    message: message.clone(),
                }));
                self.restart(Route::Login);
                self.alert(message);
            }
            Effect::PasswordUpdated(result) => self.password.password_updated(result),
        }
    }

    fn logout(&mut self) {
        let effects = match &self.api {
            Some(api) => services::auth::logout(api),
            None => {
                self.session.clear();
                vec![
                    Effect::Dispatch(StoreAction::Auth(AuthAction::LoggedOut)),
                    Effect::Restart(Route::Login),
                ]
            }
        };
        self.modals.clear();
        effects.into_iter().for_each(|e| self.apply_effect(e));
    }

    /// A path was picked in the file browser
    fn browse_selected(&mut self, target: BrowseTarget, path: RepoPath) {
        self.modals.remove_file_browser();
        match target {
            BrowseTarget::DatasetPath => self.add_dataset.set_path(path),
            BrowseTarget::MedicalFolderRoot => self.spawn("validate medical folder root", |api| {
                services::medical_folder::validate_root(api, path)
            }),
            BrowseTarget::MedicalFolderReferenceCsv => self.spawn("medical folder reference", |api| {
                services::medical_folder::load_reference_csv(api, path)
            }),
            BrowseTarget::BidsRoot => self.spawn("validate bids root", |api| {
                services::bids::validate_root(api, path)
            }),
            BrowseTarget::BidsReferenceCsv => self.spawn("bids reference", |api| {
                services::bids::load_reference_csv(api, path)
            }),
        }
    }

    fn open_edit_dialog(&mut self, dataset_id: String) {
        let datasets = &self.store.datasets;
        let dataset = datasets.find(&dataset_id).cloned().or_else(|| {
            datasets
                .preview
                .as_ref()
                .filter(|p| p.dataset.dataset_id == dataset_id)
                .map(|p| p.dataset.clone())
        });
        match dataset {
            Some(dataset) => {
                self.edit_dataset.open(&dataset);
                self.modals.push(Modal::EditDataset { dataset_id });
            }
            None => self.alert(DATA_NOT_FOUND_MESSAGE.to_string()),
        }
    }

    fn handle_global_key(&self, key: KeyEvent) -> Option<Action> {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Char('c') if ctrl => Some(Action::OpenQuitDialog),
            KeyCode::F(1) => Some(Action::OpenHelp),
            KeyCode::F(n @ 2..=8) if self.store.auth.logged_in => Route::menu()
                .into_iter()
                .nth(usize::from(n) - 2)
                .map(Action::Navigate),
            KeyCode::Char('l') if ctrl && self.store.auth.logged_in => Some(Action::Logout),
            _ => None,
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Component Implementation
// ═══════════════════════════════════════════════════════════════════════════════

impl Component for App {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        if let Some(modal) = self.modals.top().cloned() {
            let is_quit = key.code == KeyCode::Char('c')
                && key.modifiers.contains(KeyModifiers::CONTROL);
            if is_quit && modal != Modal::QuitConfirm {
                return Ok(Some(Action::OpenQuitDialog));
            }
            return self.handle_modal_key_event(&modal, key);
        }

        if let Some(action) = self.handle_global_key(key) {
            return Ok(Some(action));
        }
        self.screen_mut().handle_key_event(key)
    }

    fn update(&mut self, action: Action) -> Result<Option<Action>> {
        if !matches!(action, Action::Tick) {
            tracing::debug!(%action, "update");
        }

        match action {
            // ─────────────────────────────────────────────────────────────────
            // App Lifecycle
            // ─────────────────────────────────────────────────────────────────
            Action::Tick => {
                self.tick = self.tick.wrapping_add(1);
                for effect in self.runner.poll() {
                    self.apply_effect(effect);
                }
                let now = Instant::now();
                if self
                    .notice
                    .as_ref()
                    .is_some_and(|(_, shown_at)| now.duration_since(*shown_at) >= NOTICE_TTL)
                {
                    self.notice = None;
                }
                self.password.expire_notice(now);
                self.quit_dialog.busy = self.runner.is_busy();
            }
            Action::Resize(_, _) => {}
            Action::ForceQuit => self.should_quit = true,

            // ─────────────────────────────────────────────────────────────────
            // Navigation
            // ─────────────────────────────────────────────────────────────────
            Action::Navigate(route) => self.navigate(route),
            Action::Back => self.back(),

            // ─────────────────────────────────────────────────────────────────
            // Modals
            // ─────────────────────────────────────────────────────────────────
            Action::OpenQuitDialog => {
                if self.modals.top() != Some(&Modal::QuitConfirm) {
                    self.quit_dialog.busy = self.runner.is_busy();
                    self.modals.push(Modal::QuitConfirm);
                }
            }
            Action::OpenHelp => {
                self.help_dialog.scroll_offset = 0;
                self.modals.push(Modal::Help);
            }
            Action::CloseModal => {
                self.modals.pop();
            }
            Action::OpenFileBrowser(target) => {
                let list = self.file_browser.open(target);
                self.modals.push(Modal::FileBrowser { target });
                return Ok(Some(list));
            }
            Action::ListRepository { path, refresh } => self.spawn("list repository", |api| {
                services::repository::list(api, path, refresh)
            }),
            Action::BrowseSelected { target, path } => self.browse_selected(target, path),

            // ─────────────────────────────────────────────────────────────────
            // Session
            // ─────────────────────────────────────────────────────────────────
            Action::Login {
                server_url,
                email,
                password,
            } => {
                if self.api.is_none() || server_url != self.config.server_url {
                    if let Err(err) = self.connect(&server_url) {
                        self.dispatch(StoreAction::Auth(AuthAction::LoginFailed {
                            message: err.to_string(),
                        }));
                        return Ok(None);
                    }
                }
                self.dispatch(StoreAction::Auth(AuthAction::LoginStarted));
                self.spawn("login", |api| services::auth::login(api, email, password));
            }
            Action::Logout => self.logout(),
            Action::ChangePassword(change) => self.spawn("update password", |api| {
                services::auth::update_password(api, change)
            }),

            // ─────────────────────────────────────────────────────────────────
            // Datasets
            // ─────────────────────────────────────────────────────────────────
            Action::RefreshDatasets => self.load_datasets(),
            Action::PreviewDataset(dataset_id) => {
                let route = Route::DatasetPreview { dataset_id };
                if *self.router.current() == route {
                    self.enter_route();
                } else {
                    self.navigate(route);
                }
            }
            Action::ConfirmRemoveDataset { dataset_id, name } => {
                self.modals.push(Modal::ConfirmRemove { dataset_id, name })
            }
            Action::RemoveDataset(dataset_id) => {
                self.modals.pop();
                if matches!(self.router.current(), Route::DatasetPreview { .. }) {
                    self.back();
                }
                self.spawn("remove dataset", |api| {
                    services::datasets::remove(api, dataset_id)
                });
            }
            Action::EditDataset(dataset_id) => self.open_edit_dialog(dataset_id),
            Action::UpdateDataset(edit) => {
                self.modals.pop();
                self.spawn("update dataset", |api| services::datasets::update(api, edit));
            }
            Action::AddDataset(dataset) => {
                self.spawn("add dataset", |api| services::datasets::add(api, dataset))
            }
            Action::AddDefaultDataset => {
                self.spawn("add default dataset", services::datasets::add_default)
            }

            // ─────────────────────────────────────────────────────────────────
            // Wizards
            // ─────────────────────────────────────────────────────────────────
            Action::Dispatch(action) => self.dispatch(action),
            Action::UseExistingDlp(on) => {
                self.dispatch(StoreAction::MedicalFolder(
                    MedicalFolderAction::SetUsePreexistingDlp(on),
                ));
                if on {
                    self.spawn("list dlps", services::medical_folder::list_dlps);
                }
            }
            Action::ValidateMedicalFolderReference(column) => {
                let body = column.index.and_then(|index| {
                    wizard::medical_folder::reference_column_request(
                        &self.store.medical_folder,
                        index,
                    )
                });
                match body {
                    Some(body) => self.spawn("validate medical folder reference", |api| {
                        services::medical_folder::validate_reference_column(api, body, column)
                    }),
                    None => self.alert("Please select the data path and the reference CSV first".to_string()),
                }
            }
            Action::SubmitMedicalFolder => {
                let draft = &self.store.medical_folder;
                let block_id = wizard::medical_folder::new_loading_block_id();
                match wizard::medical_folder::add_request(draft, &block_id) {
                    Some(body) => self.spawn("add medical folder dataset", |api| {
                        services::medical_folder::add(api, body)
                    }),
                    None if draft.use_new_dlp && draft.modalities_to_folders.is_none() => self
                        .alert("Please save the folder-to-modality association first".to_string()),
                    None => self.alert("Please complete all the steps before adding the dataset".to_string()),
                }
            }
            Action::ValidateBidsReference(column) => {
                let body = column.index.and_then(|index| {
                    wizard::bids::reference_column_request(&self.store.bids, index)
                });
                match body {
                    Some(body) => self.spawn("validate bids reference", |api| {
                        services::bids::validate_reference_column(api, body, column)
                    }),
                    None => self.alert("Please select the data path and the reference CSV first".to_string()),
                }
            }
            Action::SubmitBids => match wizard::bids::add_request(&self.store.bids) {
                Some(body) => self.spawn("add bids dataset", |api| services::bids::add(api, body)),
                None => self.alert("Please complete all the steps before adding the dataset".to_string()),
            },

            // ─────────────────────────────────────────────────────────────────
            // Node
            // ─────────────────────────────────────────────────────────────────
            Action::LoadNodeEnviron => self.spawn("node environ", services::node::environ),

            // ─────────────────────────────────────────────────────────────────
            // User Management
            // ─────────────────────────────────────────────────────────────────
            Action::LoadAdmin => self.load_admin(),
            Action::CreateUser(user) => {
                self.dispatch(StoreAction::Admin(AdminAction::CreateStarted));
                self.spawn("create user", |api| services::admin::create_user(api, user));
            }
            Action::ApproveRequest(request_id) => self.spawn("approve request", |api| {
                services::admin::approve(api, request_id)
            }),
            Action::RejectRequest(request_id) => self.spawn("reject request", |api| {
                services::admin::reject(api, request_id)
            }),
        }
        Ok(None)
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect) -> Result<()> {
        let route = self.router.current().clone();
        let layout = calculate_main_layout(area, route != Route::Login);

        let ctx = ShellContext {
            route: &route,
            server_url: &self.config.server_url,
            user_email: self.store.auth.user_email.as_deref(),
            busy: self.runner.is_busy(),
            notice: self.notice.as_ref().map(|(message, _)| message.as_str()),
            tick: self.tick,
        };
        render_header(frame, layout.header, &ctx);
        if let Some(menu) = layout.menu {
            render_menu(frame, menu, &route);
        }
        render_status_bar(frame, layout.status, &ctx);
        render_help_bar(frame, layout.help, &self.screen().hints());

        self.screen_mut().draw(frame, layout.content)?;

        if let Some(modal) = self.modals.top().cloned() {
            self.draw_modal(frame, area, &modal)?;
        }
        Ok(())
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Helper Methods
// ═══════════════════════════════════════════════════════════════════════════════

impl App {
    fn handle_modal_key_event(&mut self, modal: &Modal, key: KeyEvent) -> Result<Option<Action>> {
        match modal {
            Modal::Alert { title, message } => AlertDialog::new(title, message).handle_key_event(key),
            Modal::QuitConfirm => self.quit_dialog.handle_key_event(key),
            Modal::FileBrowser { .. } => self.file_browser.handle_key_event(key),
            Modal::ConfirmRemove { dataset_id, name } => {
                ConfirmRemoveDialog { dataset_id, name }.handle_key_event(key)
            }
            Modal::EditDataset { .. } => self.edit_dataset.handle_key_event(key),
            Modal::Help => self.help_dialog.handle_key_event(key),
        }
    }

    fn draw_modal(&mut self, frame: &mut Frame, area: Rect, modal: &Modal) -> Result<()> {
        match modal {
            Modal::Alert { title, message } => AlertDialog::new(title, message).draw(frame, area),
            Modal::QuitConfirm => self.quit_dialog.draw(frame, area),
            Modal::FileBrowser { .. } => self.file_browser.draw(frame, area),
            Modal::ConfirmRemove { dataset_id, name } => {
                ConfirmRemoveDialog { dataset_id, name }.draw(frame, area)
            }
            Modal::EditDataset { .. } => self.edit_dataset.draw(frame, area),
            Modal::Help => self.help_dialog.draw(frame, area),
        }
    }
}
