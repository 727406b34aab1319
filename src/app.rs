use ratatui::layout::Rect;
use ratatui::widgets::ListState;
use rehearsal_room::{FeedbackSource, ReplyRequest, ReplyScheduler, Session, Tone};
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Editing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusPane {
    Scenarios,
    Chat,
    Input,
}

impl FocusPane {
    pub fn next(self) -> Self {
        match self {
            FocusPane::Scenarios => FocusPane::Chat,
            FocusPane::Chat => FocusPane::Input,
            FocusPane::Input => FocusPane::Scenarios,
        }
    }
}

/// Field of the "add custom scenario" form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormField {
    #[default]
    Title,
    Description,
    Script,
}

impl FormField {
    pub fn next(self) -> Self {
        match self {
            FormField::Title => FormField::Description,
            FormField::Description => FormField::Script,
            FormField::Script => FormField::Title,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            FormField::Title => "Title",
            FormField::Description => "Short description",
            FormField::Script => "Suggested script (optional)",
        }
    }
}

pub struct App {
    // Core state
    pub should_quit: bool,
    pub input_mode: InputMode,
    pub focus: FocusPane,

    // Rehearsal state
    pub session: Session,
    pub scheduler: ReplyScheduler,
    pub feedback_source: Box<dyn FeedbackSource + Send>,

    // Draft input cursor (in characters)
    pub draft_cursor: usize,

    // Scenario list highlight (selection happens on Enter)
    pub scenario_state: ListState,

    // Transcript scrolling. `chat_lines` is the wrapped row count from the
    // last render; while `chat_follow` is set the renderer pins the view to
    // the bottom.
    pub chat_scroll: u16,
    pub chat_height: u16,
    pub chat_lines: u16,
    pub chat_follow: bool,

    // Custom scenario form
    pub show_scenario_form: bool,
    pub form_field: FormField,

    // Mood picker
    pub show_mood_picker: bool,
    pub mood_picker_state: ListState,

    // Animation state
    pub animation_frame: u8,

    // Panel areas for mouse hit-testing (updated during render)
    pub scenarios_area: Option<Rect>,
    pub chat_area: Option<Rect>,
    pub input_area: Option<Rect>,
}

impl App {
    pub fn new(
        session: Session,
        scheduler: ReplyScheduler,
        feedback_source: Box<dyn FeedbackSource + Send>,
    ) -> Self {
        let mut scenario_state = ListState::default();
        scenario_state.select(Some(session.active_index()));

        Self {
            should_quit: false,
            input_mode: InputMode::Normal,
            focus: FocusPane::Input,

            session,
            scheduler,
            feedback_source,

            draft_cursor: 0,

            scenario_state,

            chat_scroll: 0,
            chat_height: 0,
            chat_lines: 0,
            chat_follow: true,

            show_scenario_form: false,
            form_field: FormField::default(),

            show_mood_picker: false,
            mood_picker_state: ListState::default(),

            animation_frame: 0,

            scenarios_area: None,
            chat_area: None,
            input_area: None,
        }
    }

    // Scenario list
    pub fn scenario_nav_down(&mut self) {
        let len = self.session.scenarios().len();
        if len > 0 {
            let i = self.scenario_state.selected().unwrap_or(0);
            self.scenario_state.select(Some((i + 1).min(len - 1)));
        }
    }

    pub fn scenario_nav_up(&mut self) {
        let i = self.scenario_state.selected().unwrap_or(0);
        self.scenario_state.select(Some(i.saturating_sub(1)));
    }

    /// Make the highlighted scenario active
    pub fn select_highlighted_scenario(&mut self) {
        let id = self
            .scenario_state
            .selected()
            .and_then(|i| self.session.scenarios().get(i))
            .map(|s| s.id.clone());

        if let Some(id) = id {
            self.session.select_scenario(&id);
            self.after_reset();
        }
    }

    fn after_reset(&mut self) {
        let cancelled = self.scheduler.on_reset();
        if cancelled > 0 {
            info!(cancelled, "Discarded pending replies");
        }
        self.chat_scroll = 0;
        self.chat_follow = true;
        self.scenario_state.select(Some(self.session.active_index()));
    }

    // Custom scenario form
    pub fn open_scenario_form(&mut self) {
        self.form_field = FormField::Title;
        self.show_scenario_form = true;
    }

    pub fn close_scenario_form(&mut self) {
        self.show_scenario_form = false;
    }

    pub fn form_field_mut(&mut self) -> &mut String {
        let draft = &mut self.session.scenario_draft;
        match self.form_field {
            FormField::Title => &mut draft.title,
            FormField::Description => &mut draft.description,
            FormField::Script => &mut draft.script,
        }
    }

    pub fn form_field_value(&self, field: FormField) -> &str {
        let draft = &self.session.scenario_draft;
        match field {
            FormField::Title => &draft.title,
            FormField::Description => &draft.description,
            FormField::Script => &draft.script,
        }
    }

    /// Submit the form. It stays open when the title is blank.
    pub fn submit_scenario_form(&mut self) {
        if self.session.submit_scenario_draft().is_some() {
            self.after_reset();
            self.show_scenario_form = false;
        }
    }

    // Messaging
    pub fn send_draft(&mut self) {
        if let Some(request) = self.session.send_draft() {
            self.scheduler.schedule(request);
            self.draft_cursor = 0;
            self.scroll_chat_to_bottom();
        }
    }

    pub fn deliver_reply(&mut self, request: ReplyRequest) {
        self.scheduler.complete(request.turn);
        if self
            .session
            .deliver_reply(&request, self.feedback_source.as_mut())
        {
            self.scroll_chat_to_bottom();
        }
    }

    pub fn use_script(&mut self) {
        self.session.use_script();
        self.draft_cursor = self.session.draft.chars().count();
    }

    pub fn replies_pending(&self) -> bool {
        self.scheduler.pending() > 0
    }

    // Mood picker
    pub fn open_mood_picker(&mut self) {
        let current_idx = Tone::all()
            .iter()
            .position(|t| *t == self.session.mood)
            .unwrap_or(0);
        self.mood_picker_state.select(Some(current_idx));
        self.show_mood_picker = true;
    }

    pub fn mood_picker_nav_down(&mut self) {
        let len = Tone::all().len();
        let i = self.mood_picker_state.selected().unwrap_or(0);
        self.mood_picker_state.select(Some((i + 1).min(len - 1)));
    }

    pub fn mood_picker_nav_up(&mut self) {
        let i = self.mood_picker_state.selected().unwrap_or(0);
        self.mood_picker_state.select(Some(i.saturating_sub(1)));
    }

    pub fn select_mood(&mut self) {
        if let Some(tone) = self
            .mood_picker_state
            .selected()
            .and_then(|i| Tone::all().get(i).copied())
        {
            info!(mood = %tone, "Mood changed");
            self.session.set_mood(tone);
        }
        self.show_mood_picker = false;
    }

    /// Tick animation frame (called by Tick event)
    pub fn tick_animation(&mut self) {
        if self.replies_pending() {
            self.animation_frame = (self.animation_frame + 1) % 3;
        }
    }

    // Transcript scrolling
    pub fn scroll_chat_down(&mut self) {
        let max = self.chat_lines.saturating_sub(self.chat_height);
        self.chat_scroll = self.chat_scroll.saturating_add(1).min(max);
        self.chat_follow = self.chat_scroll >= max;
    }

    pub fn scroll_chat_up(&mut self) {
        self.chat_scroll = self.chat_scroll.saturating_sub(1);
        self.chat_follow = false;
    }

    /// Keep the newest turn (and the typing indicator) in view. The scroll
    /// offset itself is settled at render time, once the wrapped height of
    /// the transcript is known.
    pub fn scroll_chat_to_bottom(&mut self) {
        self.chat_follow = true;
    }
}
