use std::time::Instant;

use tokio::sync::mpsc;

use crate::api::{create_client, ConfigApi};
use crate::config::AppConfig;
use crate::event::KeyAction;
use crate::model::calendar::{GlobalCalendarIntegration, TeamCalendarSettings};
use crate::model::form::{validate, IntegrationFormData, IntegrationFormErrors};
use crate::model::integration::{
    GlobalIntegrations, IntegrationKind, Integrations, TeamIntegrations,
};
use crate::model::table::{move_row, table_rows, IntegrationRow};
use crate::store::SnapshotStore;

#[derive(Debug, Clone)]
pub enum Action {
    Key(KeyAction),
    Tick,
    Loaded(Integrations, CalendarInfo),
    FetchError(String),
    Quit,
}

// Credentials org-wide, webhook and policy toggles per team.
#[derive(Debug, Clone)]
pub enum CalendarInfo {
    Global(Option<Vec<GlobalCalendarIntegration>>),
    Team(Option<TeamCalendarSettings>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewMode {
    Table,
    Form,
    Calendar,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Url,
    Username,
    Email,
    ApiToken,
    ProjectKey,
    GroupId,
    Vuln,
}

impl FormField {
    pub fn label(&self) -> &'static str {
        match self {
            FormField::Url => "URL",
            FormField::Username => "Username",
            FormField::Email => "Email",
            FormField::ApiToken => "API token",
            FormField::ProjectKey => "Project key",
            FormField::GroupId => "Group ID",
            FormField::Vuln => "Vulnerability tickets",
        }
    }
}

pub fn form_fields(kind: IntegrationKind) -> &'static [FormField] {
    match kind {
        IntegrationKind::Jira => &[
            FormField::Url,
            FormField::Username,
            FormField::ApiToken,
            FormField::ProjectKey,
            FormField::Vuln,
        ],
        IntegrationKind::Zendesk => &[
            FormField::Url,
            FormField::Email,
            FormField::ApiToken,
            FormField::GroupId,
            FormField::Vuln,
        ],
    }
}

pub struct FormState {
    pub data: IntegrationFormData,
    pub errors: IntegrationFormErrors,
    pub focus: usize,
    // Original index of the entry being edited; None when adding.
    pub target: Option<usize>,
    // Errors only show once the user has tried to submit.
    attempted: bool,
}

impl FormState {
    fn new(data: IntegrationFormData, target: Option<usize>) -> Self {
        FormState {
            data,
            errors: IntegrationFormErrors::default(),
            focus: 0,
            target,
            attempted: false,
        }
    }

    pub fn focused_field(&self) -> FormField {
        form_fields(self.data.kind)[self.focus]
    }

    fn revalidate(&mut self) {
        if self.attempted {
            self.errors = validate(&self.data);
        }
    }

    fn field_mut(&mut self) -> Option<&mut String> {
        match self.focused_field() {
            FormField::Url => Some(&mut self.data.url),
            FormField::Username => Some(&mut self.data.username),
            FormField::Email => Some(&mut self.data.email),
            FormField::ApiToken => Some(&mut self.data.api_token),
            FormField::ProjectKey => Some(&mut self.data.project_key),
            FormField::GroupId => Some(&mut self.data.group_id),
            FormField::Vuln => None,
        }
    }
}

pub struct App {
    pub integrations: Integrations,
    pub calendar: CalendarInfo,
    pub rows: Vec<IntegrationRow>,
    pub selected: usize,
    pub view_mode: ViewMode,
    pub form: Option<FormState>,
    // Local edits not yet applied to the server.
    pub dirty: bool,
    pub loading: bool,
    pub flash_message: Option<(String, Instant)>,
    pub should_quit: bool,
    pub action_tx: mpsc::UnboundedSender<Action>,
    pub team: Option<u64>,
    client: Option<Box<dyn ConfigApi>>,
    store: SnapshotStore,
}

impl App {
    pub fn new(
        config: &AppConfig,
        store: SnapshotStore,
        action_tx: mpsc::UnboundedSender<Action>,
    ) -> Self {
        let client = config.server.as_ref().map(create_client);
        let team = config.server.as_ref().and_then(|s| s.team);

        // Paint from the snapshot while the first fetch is in flight.
        // The snapshot holds org-wide data, so team scope starts empty
        // and waits for its own fetch.
        let (integrations, calendar) = match team {
            Some(_) => (Integrations::default(), CalendarInfo::Team(None)),
            None => {
                let snapshot = store.integrations().clone();
                (
                    snapshot.integrations,
                    CalendarInfo::Global(snapshot.google_calendar),
                )
            }
        };
        let rows = table_rows(&integrations);

        Self {
            integrations,
            calendar,
            rows,
            selected: 0,
            view_mode: ViewMode::Table,
            form: None,
            dirty: false,
            loading: client.is_some(),
            flash_message: None,
            should_quit: false,
            action_tx,
            team,
            client,
            store,
        }
    }

    fn flash(&mut self, msg: impl Into<String>) {
        self.flash_message = Some((msg.into(), Instant::now()));
    }

    fn rebuild_rows(&mut self) {
        self.rows = table_rows(&self.integrations);
        if self.selected >= self.rows.len() && !self.rows.is_empty() {
            self.selected = self.rows.len() - 1;
        }
    }

    pub async fn update(&mut self, action: Action) {
        // Clear flash message after 3 seconds
        if let Some((_, t)) = &self.flash_message {
            if t.elapsed().as_secs() >= 3 {
                self.flash_message = None;
            }
        }

        match action {
            Action::Key(key) => self.handle_key(key).await,
            Action::Tick => {}
            Action::Loaded(integrations, calendar) => {
                if self.dirty {
                    // Don't clobber unapplied edits with a background fetch
                    self.loading = false;
                    return;
                }
                self.integrations = integrations;
                self.calendar = calendar;
                self.loading = false;
                self.rebuild_rows();
            }
            Action::FetchError(msg) => {
                self.loading = false;
                self.flash(format!("Fetch error: {msg}"));
            }
            Action::Quit => {
                self.should_quit = true;
            }
        }
    }

    async fn handle_key(&mut self, key: KeyAction) {
        match self.view_mode {
            ViewMode::Table => self.handle_table_key(key).await,
            ViewMode::Form => self.handle_form_key(key),
            ViewMode::Calendar => self.handle_calendar_key(key),
        }
    }

    async fn handle_table_key(&mut self, key: KeyAction) {
        match key {
            KeyAction::Up => {
                if self.selected > 0 {
                    self.selected -= 1;
                }
            }
            KeyAction::Down => {
                if !self.rows.is_empty() && self.selected < self.rows.len() - 1 {
                    self.selected += 1;
                }
            }
            KeyAction::Char('q') => self.should_quit = true,
            KeyAction::Char('a') => self.open_form(IntegrationKind::Jira),
            KeyAction::Char('z') => self.open_form(IntegrationKind::Zendesk),
            KeyAction::Char('e') => self.open_edit_form(),
            KeyAction::Char('x') => self.delete_selected(),
            KeyAction::Char('J') => self.move_selected(1),
            KeyAction::Char('K') => self.move_selected(-1),
            KeyAction::Char('r') => self.refresh().await,
            KeyAction::Char('s') => self.apply().await,
            KeyAction::Char('c') => self.view_mode = ViewMode::Calendar,
            _ => {}
        }
    }

    fn handle_calendar_key(&mut self, key: KeyAction) {
        match key {
            KeyAction::Escape | KeyAction::Char('c') => self.view_mode = ViewMode::Table,
            KeyAction::Char('q') => self.should_quit = true,
            _ => {}
        }
    }

    fn handle_form_key(&mut self, key: KeyAction) {
        let Some(form) = self.form.as_mut() else {
            self.view_mode = ViewMode::Table;
            return;
        };
        let field_count = form_fields(form.data.kind).len();

        match key {
            KeyAction::Escape => {
                self.form = None;
                self.view_mode = ViewMode::Table;
            }
            KeyAction::Tab | KeyAction::Down => {
                form.focus = (form.focus + 1) % field_count;
            }
            KeyAction::BackTab | KeyAction::Up => {
                form.focus = (form.focus + field_count - 1) % field_count;
            }
            KeyAction::Char(' ') if form.focused_field() == FormField::Vuln => {
                form.data.enable_software_vulnerabilities =
                    !form.data.enable_software_vulnerabilities;
            }
            KeyAction::Char(c) => {
                if let Some(field) = form.field_mut() {
                    field.push(c);
                    form.revalidate();
                }
            }
            KeyAction::Backspace => {
                if let Some(field) = form.field_mut() {
                    field.pop();
                    form.revalidate();
                }
            }
            KeyAction::Select => self.submit_form(),
        }
    }

    fn open_form(&mut self, kind: IntegrationKind) {
        self.form = Some(FormState::new(IntegrationFormData::new(kind), None));
        self.view_mode = ViewMode::Form;
    }

    fn open_edit_form(&mut self) {
        let Some(row) = self.rows.get(self.selected) else {
            return;
        };
        self.form = Some(FormState::new(
            IntegrationFormData::from_row(row),
            Some(row.original_index),
        ));
        self.view_mode = ViewMode::Form;
    }

    fn submit_form(&mut self) {
        let Some(form) = self.form.as_mut() else {
            return;
        };
        form.attempted = true;
        form.errors = validate(&form.data);
        if !form.errors.is_clean() {
            return;
        }

        let Some(form) = self.form.take() else {
            return;
        };
        let kind = form.data.kind;
        let entry = form.data.into_entry();
        let ok = match form.target {
            Some(original_index) => self.integrations.replace(original_index, entry),
            None => {
                self.integrations.push(entry);
                true
            }
        };

        if ok {
            self.dirty = true;
            self.flash(format!(
                "{} integration staged — press s to apply",
                kind.display_name()
            ));
        } else {
            self.flash("Entry no longer exists".to_string());
        }
        self.view_mode = ViewMode::Table;
        self.rebuild_rows();
    }

    fn delete_selected(&mut self) {
        let Some(row) = self.rows.get(self.selected) else {
            return;
        };
        let (kind, original_index) = (row.kind, row.original_index);
        if self.integrations.remove(kind, original_index).is_some() {
            self.dirty = true;
            self.flash(format!(
                "{} integration removed — press s to apply",
                kind.display_name()
            ));
            self.rebuild_rows();
        }
    }

    // A pure reorder; original indices are untouched, so apply still
    // writes the same lists.
    fn move_selected(&mut self, delta: isize) {
        let from = self.selected;
        let to = from as isize + delta;
        if to < 0 || to as usize >= self.rows.len() {
            return;
        }
        move_row(&mut self.rows, from, to as usize);
        self.selected = to as usize;
    }

    pub async fn refresh(&mut self) {
        let Some(client) = &self.client else {
            self.flash("No server configured (~/.syncdesk/config.toml)");
            return;
        };
        self.loading = true;
        let tx = self.action_tx.clone();

        match self.team {
            Some(team_id) => match client.fetch_team(team_id).await {
                Ok(team) => {
                    let _ = tx.send(Action::Loaded(
                        team.integrations,
                        CalendarInfo::Team(team.google_calendar),
                    ));
                }
                Err(e) => {
                    let _ = tx.send(Action::FetchError(e.to_string()));
                }
            },
            None => match client.fetch_global().await {
                Ok(global) => {
                    let _ = self.store.update(global.clone());
                    let _ = tx.send(Action::Loaded(
                        global.integrations,
                        CalendarInfo::Global(global.google_calendar),
                    ));
                }
                Err(e) => {
                    let _ = tx.send(Action::FetchError(e.to_string()));
                }
            },
        }
    }

    pub async fn apply(&mut self) {
        if !self.dirty {
            self.flash("Nothing to apply");
            return;
        }
        let Some(client) = &self.client else {
            self.flash("No server configured (~/.syncdesk/config.toml)");
            return;
        };

        let result = match self.team {
            Some(team_id) => {
                let team = TeamIntegrations {
                    integrations: self.integrations.clone(),
                    google_calendar: match &self.calendar {
                        CalendarInfo::Team(settings) => settings.clone(),
                        CalendarInfo::Global(_) => None,
                    },
                };
                client.apply_team(team_id, &team).await
            }
            None => {
                let global = GlobalIntegrations {
                    integrations: self.integrations.clone(),
                    google_calendar: match &self.calendar {
                        CalendarInfo::Global(calendars) => calendars.clone(),
                        CalendarInfo::Team(_) => None,
                    },
                };
                let result = client.apply_global(&global).await;
                if result.is_ok() {
                    let _ = self.store.update(global);
                }
                result
            }
        };

        match result {
            Ok(()) => {
                self.dirty = false;
                self.flash("Applied to server");
            }
            Err(e) => self.flash(format!("Apply failed: {e}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ServerConfig;
    use crate::model::integration::JiraIntegration;

    fn test_app() -> (App, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let store = SnapshotStore::at(dir.path().join("integrations.json")).unwrap();
        let (tx, _rx) = mpsc::unbounded_channel();
        let app = App::new(&AppConfig::default(), store, tx);
        (app, dir)
    }

    async fn keys(app: &mut App, actions: &[KeyAction]) {
        for key in actions {
            app.update(Action::Key(key.clone())).await;
        }
    }

    fn type_str(s: &str) -> Vec<KeyAction> {
        s.chars().map(KeyAction::Char).collect()
    }

    async fn add_jira(app: &mut App, url: &str, user: &str, token: &str, project: &str) {
        keys(app, &[KeyAction::Char('a')]).await;
        keys(app, &type_str(url)).await;
        keys(app, &[KeyAction::Tab]).await;
        keys(app, &type_str(user)).await;
        keys(app, &[KeyAction::Tab]).await;
        keys(app, &type_str(token)).await;
        keys(app, &[KeyAction::Tab]).await;
        keys(app, &type_str(project)).await;
        keys(app, &[KeyAction::Select]).await;
    }

    #[tokio::test]
    async fn team_scope_starts_empty_until_first_fetch() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = SnapshotStore::at(dir.path().join("integrations.json")).unwrap();
        store
            .update(GlobalIntegrations {
                integrations: Integrations {
                    jira: vec![JiraIntegration {
                        url: "https://org.atlassian.net".into(),
                        username: "ops@org.com".into(),
                        api_token: "tok".into(),
                        project_key: "ORG".into(),
                        enable_failing_policies: None,
                        enable_software_vulnerabilities: None,
                    }],
                    zendesk: vec![],
                },
                google_calendar: None,
            })
            .unwrap();

        let config = AppConfig {
            server: Some(ServerConfig {
                url: "https://server.example.com".into(),
                token: "tok".into(),
                team: Some(4),
            }),
        };
        let (tx, _rx) = mpsc::unbounded_channel();
        let app = App::new(&config, store, tx);

        // The org-wide snapshot must not seed a team view.
        assert!(app.integrations.is_empty());
        assert!(app.rows.is_empty());
        assert!(matches!(app.calendar, CalendarInfo::Team(None)));
    }

    #[tokio::test]
    async fn add_form_flow_stages_an_entry() {
        let (mut app, _dir) = test_app();
        add_jira(
            &mut app,
            "https://acme.atlassian.net",
            "ops@acme.com",
            "tok",
            "ENG",
        )
        .await;

        assert_eq!(app.view_mode, ViewMode::Table);
        assert!(app.dirty);
        assert_eq!(app.integrations.jira.len(), 1);
        assert_eq!(app.integrations.jira[0].project_key, "ENG");
        assert_eq!(app.rows.len(), 1);
    }

    #[tokio::test]
    async fn invalid_form_stays_open_with_errors() {
        let (mut app, _dir) = test_app();
        keys(&mut app, &[KeyAction::Char('a'), KeyAction::Select]).await;

        assert_eq!(app.view_mode, ViewMode::Form);
        let form = app.form.as_ref().unwrap();
        assert!(!form.errors.is_clean());
        assert!(form.errors.url.is_some());
        assert!(!app.dirty);
    }

    #[tokio::test]
    async fn escape_cancels_form_without_staging() {
        let (mut app, _dir) = test_app();
        keys(&mut app, &[KeyAction::Char('z')]).await;
        keys(&mut app, &type_str("https://x.zendesk.com")).await;
        keys(&mut app, &[KeyAction::Escape]).await;

        assert_eq!(app.view_mode, ViewMode::Table);
        assert!(app.form.is_none());
        assert!(!app.dirty);
        assert!(app.integrations.is_empty());
    }

    #[tokio::test]
    async fn delete_removes_selected_row() {
        let (mut app, _dir) = test_app();
        add_jira(&mut app, "https://a.atlassian.net", "a@a.com", "t", "ENG").await;
        add_jira(&mut app, "https://b.atlassian.net", "b@b.com", "t", "OPS").await;

        app.selected = 0;
        keys(&mut app, &[KeyAction::Char('x')]).await;

        assert_eq!(app.integrations.jira.len(), 1);
        assert_eq!(app.integrations.jira[0].project_key, "OPS");
    }

    #[tokio::test]
    async fn reorder_keys_keep_original_indices() {
        let (mut app, _dir) = test_app();
        add_jira(&mut app, "https://a.atlassian.net", "a@a.com", "t", "ENG").await;
        add_jira(&mut app, "https://b.atlassian.net", "b@b.com", "t", "OPS").await;

        app.selected = 0;
        keys(&mut app, &[KeyAction::Char('J')]).await;

        // Display order flipped, identities stable, source list untouched
        assert_eq!(app.rows[0].original_index, 1);
        assert_eq!(app.rows[1].original_index, 0);
        assert_eq!(app.selected, 1);
        assert_eq!(app.integrations.jira[0].project_key, "ENG");
    }

    #[tokio::test]
    async fn edit_rewrites_entry_in_place() {
        let (mut app, _dir) = test_app();
        add_jira(&mut app, "https://a.atlassian.net", "a@a.com", "t", "ENG").await;

        keys(&mut app, &[KeyAction::Char('e')]).await;
        // Focus starts on URL; move to project key and change it
        keys(&mut app, &[KeyAction::Tab, KeyAction::Tab, KeyAction::Tab]).await;
        keys(
            &mut app,
            &[KeyAction::Backspace, KeyAction::Backspace, KeyAction::Backspace],
        )
        .await;
        keys(&mut app, &type_str("SEC")).await;
        keys(&mut app, &[KeyAction::Select]).await;

        assert_eq!(app.integrations.jira.len(), 1);
        assert_eq!(app.integrations.jira[0].project_key, "SEC");
    }

    #[tokio::test]
    async fn vuln_toggle_with_space() {
        let (mut app, _dir) = test_app();
        keys(&mut app, &[KeyAction::Char('a')]).await;
        // Last field is the toggle
        keys(
            &mut app,
            &[KeyAction::Tab, KeyAction::Tab, KeyAction::Tab, KeyAction::Tab],
        )
        .await;
        keys(&mut app, &[KeyAction::Char(' ')]).await;
        assert!(app.form.as_ref().unwrap().data.enable_software_vulnerabilities);
        keys(&mut app, &[KeyAction::Char(' ')]).await;
        assert!(!app.form.as_ref().unwrap().data.enable_software_vulnerabilities);
    }

    #[tokio::test]
    async fn background_load_never_clobbers_dirty_state() {
        let (mut app, _dir) = test_app();
        add_jira(&mut app, "https://a.atlassian.net", "a@a.com", "t", "ENG").await;
        assert!(app.dirty);

        app.update(Action::Loaded(
            Integrations::default(),
            CalendarInfo::Global(None),
        ))
        .await;
        assert_eq!(app.integrations.jira.len(), 1);
    }

    #[tokio::test]
    async fn quit_keys() {
        let (mut app, _dir) = test_app();
        keys(&mut app, &[KeyAction::Char('q')]).await;
        assert!(app.should_quit);

        let (mut app, _dir) = test_app();
        app.update(Action::Quit).await;
        assert!(app.should_quit);
    }

    #[tokio::test]
    async fn calendar_view_round_trip() {
        let (mut app, _dir) = test_app();
        keys(&mut app, &[KeyAction::Char('c')]).await;
        assert_eq!(app.view_mode, ViewMode::Calendar);
        keys(&mut app, &[KeyAction::Escape]).await;
        assert_eq!(app.view_mode, ViewMode::Table);
    }

    #[tokio::test]
    async fn form_field_order_matches_variant() {
        let jira = form_fields(IntegrationKind::Jira);
        assert_eq!(jira[1], FormField::Username);
        assert_eq!(jira[3], FormField::ProjectKey);

        let zendesk = form_fields(IntegrationKind::Zendesk);
        assert_eq!(zendesk[1], FormField::Email);
        assert_eq!(zendesk[3], FormField::GroupId);
    }
}
