use std::io;
use std::path::Path;
use std::time::Duration;

use crossterm::event::{self, Event, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use regex::Regex;

use crate::io::config_io;
use crate::io::kv::{DirStore, KeyValueStore};
use crate::model::project::{ProjectDraft, format_tag_list, parse_tag_list};
use crate::model::theme::ThemePreference;
use crate::ops::image;
use crate::ops::query::{ALL_FACET, Query};
use crate::ops::session::Session;
use crate::util::unicode::{next_grapheme_boundary, prev_grapheme_boundary};
use crate::view::{self, ActionBinding, CardAction, Grid};

use super::input;
use super::render;
use super::theme::Theme;

pub type AppSession = Session<Box<dyn KeyValueStore>>;

/// Current interaction mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Navigate,
    Search,
    Detail,
    Form,
    Confirm,
    Prompt,
}

/// Single-line text buffer with a byte-offset cursor on grapheme boundaries.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextInput {
    pub text: String,
    pub cursor: usize,
}

impl TextInput {
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        let cursor = text.len();
        TextInput { text, cursor }
    }

    pub fn insert(&mut self, c: char) {
        self.text.insert(self.cursor, c);
        self.cursor += c.len_utf8();
    }

    pub fn backspace(&mut self) {
        if let Some(prev) = prev_grapheme_boundary(&self.text, self.cursor) {
            self.text.replace_range(prev..self.cursor, "");
            self.cursor = prev;
        }
    }

    pub fn delete(&mut self) {
        if let Some(next) = next_grapheme_boundary(&self.text, self.cursor) {
            self.text.replace_range(self.cursor..next, "");
        }
    }

    pub fn left(&mut self) {
        if let Some(prev) = prev_grapheme_boundary(&self.text, self.cursor) {
            self.cursor = prev;
        }
    }

    pub fn right(&mut self) {
        if let Some(next) = next_grapheme_boundary(&self.text, self.cursor) {
            self.cursor = next;
        }
    }

    pub fn home(&mut self) {
        self.cursor = 0;
    }

    pub fn end(&mut self) {
        self.cursor = self.text.len();
    }

    pub fn clear(&mut self) {
        self.text.clear();
        self.cursor = 0;
    }
}

/// Fields of the add/edit dialog, in tab order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Title,
    Description,
    Tags,
    Github,
    Demo,
    Image,
}

impl FormField {
    pub const ALL: [FormField; 6] = [
        FormField::Title,
        FormField::Description,
        FormField::Tags,
        FormField::Github,
        FormField::Demo,
        FormField::Image,
    ];

    pub fn label(self) -> &'static str {
        match self {
            FormField::Title => "Title",
            FormField::Description => "Description",
            FormField::Tags => "Tags",
            FormField::Github => "Code URL",
            FormField::Demo => "Live URL",
            FormField::Image => "Image file",
        }
    }

    fn index(self) -> usize {
        FormField::ALL.iter().position(|f| *f == self).unwrap_or(0)
    }

    pub fn next(self) -> Self {
        FormField::ALL[(self.index() + 1) % FormField::ALL.len()]
    }

    pub fn prev(self) -> Self {
        let n = FormField::ALL.len();
        FormField::ALL[(self.index() + n - 1) % n]
    }
}

/// State of the add/edit dialog. Nothing reaches the store until submit.
#[derive(Debug, Clone)]
pub struct FormState {
    /// Id being edited; None for a new project
    pub editing: Option<String>,
    pub fields: [TextInput; 6],
    pub focus: FormField,
    /// Image already attached to the record being edited
    pub current_image: Option<String>,
    /// Validation or image error shown inside the dialog
    pub error: Option<String>,
}

impl FormState {
    pub fn new_project() -> Self {
        FormState {
            editing: None,
            fields: Default::default(),
            focus: FormField::Title,
            current_image: None,
            error: None,
        }
    }

    pub fn edit(id: &str, draft: &ProjectDraft) -> Self {
        FormState {
            editing: Some(id.to_string()),
            fields: [
                TextInput::new(draft.title.clone()),
                TextInput::new(draft.description.clone()),
                TextInput::new(format_tag_list(&draft.tags)),
                TextInput::new(draft.github.clone()),
                TextInput::new(draft.demo.clone()),
                TextInput::default(),
            ],
            focus: FormField::Title,
            current_image: draft.img.clone(),
            error: None,
        }
    }

    pub fn field(&self, field: FormField) -> &TextInput {
        &self.fields[field.index()]
    }

    pub fn focused_mut(&mut self) -> &mut TextInput {
        &mut self.fields[self.focus.index()]
    }

    /// Turn the dialog into a draft. An image path is read and encoded here;
    /// `-` removes the current image and an empty path keeps it.
    pub fn to_draft(&self) -> Result<ProjectDraft, image::ImageError> {
        let path = self.field(FormField::Image).text.trim();
        let img = match path {
            "" => self.current_image.clone(),
            "-" => None,
            p => Some(image::encode_file(Path::new(p))?),
        };
        Ok(ProjectDraft {
            title: self.field(FormField::Title).text.clone(),
            description: self.field(FormField::Description).text.clone(),
            tags: parse_tag_list(&self.field(FormField::Tags).text),
            github: self.field(FormField::Github).text.clone(),
            demo: self.field(FormField::Demo).text.clone(),
            img,
        })
    }
}

/// Destructive action awaiting y/n
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfirmAction {
    Delete { id: String, title: String },
    Reset,
}

impl ConfirmAction {
    pub fn message(&self) -> String {
        match self {
            ConfirmAction::Delete { title, .. } => format!("Delete \"{}\"?", title),
            ConfirmAction::Reset => "Reset to the sample projects? Current projects are discarded.".into(),
        }
    }
}

/// Path prompt shown in the status row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptKind {
    Import,
    Export,
}

impl PromptKind {
    pub fn label(self) -> &'static str {
        match self {
            PromptKind::Import => "Import from",
            PromptKind::Export => "Export to",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub text: String,
    pub is_error: bool,
}

/// Main application state
pub struct App {
    pub session: AppSession,
    pub query: Query,
    /// `"all"` plus every distinct tag of the full list
    pub facets: Vec<String>,
    pub grid: Grid,
    /// Controls of the cards currently on screen
    pub bindings: Vec<ActionBinding>,
    pub cursor: usize,
    pub scroll_offset: usize,
    pub mode: Mode,
    pub should_quit: bool,
    pub theme_pref: ThemePreference,
    pub theme: Theme,
    /// Search text before `/` was pressed, restored on Esc
    pub search_backup: String,
    pub detail_id: Option<String>,
    pub form: Option<FormState>,
    pub confirm: Option<ConfirmAction>,
    pub prompt: Option<(PromptKind, TextInput)>,
    pub message: Option<Message>,
}

impl App {
    pub fn new(session: AppSession) -> Self {
        let theme_pref = session.theme().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "could not read theme preference");
            ThemePreference::default()
        });
        let theme = Theme::from_config(theme_pref, &session.config().ui);
        let query = session.default_query();
        let mut app = App {
            session,
            query,
            facets: Vec::new(),
            grid: Grid::default(),
            bindings: Vec::new(),
            cursor: 0,
            scroll_offset: 0,
            mode: Mode::Navigate,
            should_quit: false,
            theme_pref,
            theme,
            search_backup: String::new(),
            detail_id: None,
            form: None,
            confirm: None,
            prompt: None,
            message: None,
        };
        app.refresh();
        app
    }

    /// Re-derive facets, grid and bindings from the in-memory list.
    pub fn refresh(&mut self) {
        self.facets = self.session.tag_facets();
        let results = self.session.query(&self.query);
        self.grid = view::project_grid(&results, self.session.config().ui.excerpt_width);
        self.bindings = view::bindings(&self.grid);
        self.cursor = self.cursor.min(self.grid.cards.len().saturating_sub(1));
    }

    pub fn selected_id(&self) -> Option<&str> {
        self.grid.cards.get(self.cursor).map(|c| c.id.as_str())
    }

    /// The binding for `action` on the selected card.
    pub fn binding(&self, action: CardAction) -> Option<&ActionBinding> {
        let id = self.selected_id()?;
        self.bindings
            .iter()
            .find(|b| b.action == action && b.id == id)
    }

    fn select_id(&mut self, id: &str) {
        if let Some(i) = self.grid.cards.iter().position(|c| c.id == id) {
            self.cursor = i;
        }
    }

    pub fn info(&mut self, text: impl Into<String>) {
        self.message = Some(Message {
            text: text.into(),
            is_error: false,
        });
    }

    pub fn error(&mut self, text: impl Into<String>) {
        self.message = Some(Message {
            text: text.into(),
            is_error: true,
        });
    }

    /// Case-insensitive literal pattern for the active search text.
    pub fn search_re(&self) -> Option<Regex> {
        if self.query.text.is_empty() {
            return None;
        }
        Regex::new(&format!("(?i){}", regex::escape(&self.query.text))).ok()
    }

    // -----------------------------------------------------------------------
    // Query controls
    // -----------------------------------------------------------------------

    pub fn move_cursor(&mut self, delta: isize) {
        let len = self.grid.cards.len();
        if len == 0 {
            return;
        }
        let next = self.cursor as isize + delta;
        self.cursor = next.clamp(0, len as isize - 1) as usize;
    }

    pub fn cycle_sort(&mut self) {
        self.query.sort = self.query.sort.next();
        self.refresh();
    }

    pub fn toggle_favorites(&mut self) {
        self.query.favorites_only = !self.query.favorites_only;
        self.cursor = 0;
        self.refresh();
    }

    /// Index into `facets` of the chip currently in effect.
    pub fn active_facet_index(&self) -> usize {
        let mode = self.session.config().ui.facet_mode;
        self.query
            .active_facet(mode)
            .and_then(|f| self.facets.iter().position(|x| x == f))
            .unwrap_or(0)
    }

    pub fn cycle_facet(&mut self, forward: bool) {
        let n = self.facets.len();
        if n == 0 {
            return;
        }
        let i = self.active_facet_index();
        let next = if forward { (i + 1) % n } else { (i + n - 1) % n };
        let facet = self.facets.get(next).cloned().unwrap_or_else(|| ALL_FACET.to_string());
        self.query
            .select_facet(&facet, self.session.config().ui.facet_mode);
        self.cursor = 0;
        self.refresh();
    }

    pub fn toggle_theme(&mut self) {
        let next = self.theme_pref.toggled();
        if let Err(e) = self.session.set_theme(next) {
            self.error(e.to_string());
            return;
        }
        self.theme_pref = next;
        self.theme = Theme::from_config(next, &self.session.config().ui);
        self.info(format!("{} theme", next));
    }

    // -----------------------------------------------------------------------
    // Card actions
    // -----------------------------------------------------------------------

    pub fn open_detail(&mut self) {
        if let Some(b) = self.binding(CardAction::View) {
            self.detail_id = Some(b.id.clone());
            self.mode = Mode::Detail;
        }
    }

    pub fn open_add_form(&mut self) {
        self.form = Some(FormState::new_project());
        self.mode = Mode::Form;
    }

    pub fn open_edit_form(&mut self) {
        let Some(id) = self.binding(CardAction::Edit).map(|b| b.id.clone()) else {
            return;
        };
        if let Some(project) = self.session.find(&id) {
            let draft = ProjectDraft::from_project(project);
            self.form = Some(FormState::edit(&id, &draft));
            self.mode = Mode::Form;
        }
    }

    pub fn submit_form(&mut self) {
        let Some(form) = self.form.as_mut() else {
            return;
        };
        let draft = match form.to_draft() {
            Ok(d) => d,
            Err(e) => {
                form.error = Some(e.to_string());
                return;
            }
        };
        let editing = form.editing.clone();
        let result = match &editing {
            Some(id) => self.session.edit(id, draft).map(|p| p.id.clone()),
            None => self.session.add(draft).map(|p| p.id.clone()),
        };
        match result {
            Ok(id) => {
                self.form = None;
                self.mode = Mode::Navigate;
                self.refresh();
                self.select_id(&id);
                self.info(if editing.is_some() { "saved" } else { "added" });
            }
            Err(e) => {
                if let Some(form) = self.form.as_mut() {
                    form.error = Some(e.to_string());
                }
            }
        }
    }

    pub fn cancel_form(&mut self) {
        self.form = None;
        self.mode = Mode::Navigate;
    }

    pub fn request_delete(&mut self) {
        let Some(id) = self.binding(CardAction::Delete).map(|b| b.id.clone()) else {
            return;
        };
        let title = self
            .session
            .find(&id)
            .map(|p| p.title.clone())
            .unwrap_or_default();
        self.confirm = Some(ConfirmAction::Delete { id, title });
        self.mode = Mode::Confirm;
    }

    pub fn request_reset(&mut self) {
        self.confirm = Some(ConfirmAction::Reset);
        self.mode = Mode::Confirm;
    }

    pub fn confirm_yes(&mut self) {
        let Some(action) = self.confirm.take() else {
            self.mode = Mode::Navigate;
            return;
        };
        self.mode = Mode::Navigate;
        let result = match &action {
            ConfirmAction::Delete { id, .. } => self.session.delete(id).map(|_| "deleted".to_string()),
            ConfirmAction::Reset => self
                .session
                .reset()
                .map(|_| "reset to sample projects".to_string()),
        };
        match result {
            Ok(msg) => self.info(msg),
            Err(e) => self.error(e.to_string()),
        }
        self.refresh();
    }

    pub fn confirm_no(&mut self) {
        self.confirm = None;
        self.mode = Mode::Navigate;
    }

    pub fn toggle_star(&mut self) {
        let Some(id) = self.binding(CardAction::ToggleStar).map(|b| b.id.clone()) else {
            return;
        };
        match self.session.toggle_star(&id) {
            Ok(_) => {
                self.refresh();
                self.select_id(&id);
            }
            Err(e) => self.error(e.to_string()),
        }
    }

    // -----------------------------------------------------------------------
    // Import / export prompts
    // -----------------------------------------------------------------------

    pub fn open_prompt(&mut self, kind: PromptKind) {
        let initial = match kind {
            PromptKind::Import => TextInput::default(),
            PromptKind::Export => TextInput::new("projects.json"),
        };
        self.prompt = Some((kind, initial));
        self.mode = Mode::Prompt;
    }

    pub fn cancel_prompt(&mut self) {
        self.prompt = None;
        self.mode = Mode::Navigate;
    }

    pub fn submit_prompt(&mut self) {
        let Some((kind, input)) = self.prompt.take() else {
            return;
        };
        self.mode = Mode::Navigate;
        let path = input.text.trim().to_string();
        if path.is_empty() {
            return;
        }
        match kind {
            PromptKind::Import => self.import_file(Path::new(&path)),
            PromptKind::Export => self.export_file(Path::new(&path)),
        }
    }

    fn import_file(&mut self, path: &Path) {
        let text = match std::fs::read_to_string(path) {
            Ok(t) => t,
            Err(e) => {
                self.error(format!("could not read {}: {}", path.display(), e));
                return;
            }
        };
        match self.session.import_json(&text) {
            Ok(report) => {
                self.cursor = 0;
                self.refresh();
                self.info(format!("imported {} projects", report.imported));
            }
            Err(e) => self.error(e.to_string()),
        }
    }

    fn export_file(&mut self, path: &Path) {
        let result = self
            .session
            .export_json()
            .map_err(|e| e.to_string())
            .and_then(|text| std::fs::write(path, text).map_err(|e| e.to_string()));
        match result {
            Ok(()) => self.info(format!("exported to {}", path.display())),
            Err(e) => self.error(e),
        }
    }
}

/// Run the TUI application against the resolved data directory
pub fn run(data_dir: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    let data_dir = config_io::resolve_data_dir(data_dir);
    let config = config_io::read_config(&data_dir)?;
    let backend: Box<dyn KeyValueStore> = Box::new(DirStore::new(&data_dir));
    let session = Session::open(backend, config)?;
    let mut app = App::new(session);

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    // Restore the terminal on panic
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(panic_info);
    }));

    let result = run_event_loop(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        terminal.draw(|frame| render::render(frame, app))?;

        if event::poll(Duration::from_millis(250))?
            && let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
        {
            input::handle_key(app, key);
        }

        if app.should_quit {
            break;
        }
    }
    Ok(())
}
