use crate::events::Event;
use crate::handlers::{AsteroidsView, PictureView};
use crate::range::DateRange;
use chrono::{Days, NaiveDate};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

const DATE_INPUT: &str = "%Y-%m-%d";

#[derive(Debug, PartialEq, Clone, Copy, Default)]
pub enum ViewMode {
    #[default]
    Home,
    Asteroids,
    Picture,
}

impl ViewMode {
    pub const ALL: [ViewMode; 3] = [ViewMode::Home, ViewMode::Asteroids, ViewMode::Picture];

    pub fn title(self) -> &'static str {
        match self {
            ViewMode::Home => "Home",
            ViewMode::Asteroids => "Asteroids",
            ViewMode::Picture => "Picture of the Day",
        }
    }

    fn next(self) -> Self {
        match self {
            ViewMode::Home => ViewMode::Asteroids,
            ViewMode::Asteroids => ViewMode::Picture,
            ViewMode::Picture => ViewMode::Home,
        }
    }
}

/// A user action that needs the network. Dates are passed through as typed;
/// the handlers normalize them.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Request {
    Asteroids { start: Option<NaiveDate>, end: Option<NaiveDate> },
    Export { start: Option<NaiveDate>, end: Option<NaiveDate> },
    Picture { date: Option<NaiveDate> },
}

#[derive(Default)]
pub struct App {
    pub view_mode: ViewMode,
    pub asteroids: Option<AsteroidsView>,
    pub picture: Option<PictureView>,
    pub selected_index: usize,
    pub tick_count: usize,
    pub should_quit: bool,

    /// Request currently in flight; new ones are refused until it reports back.
    pub pending: Option<Request>,
    /// One-shot notice, cleared on the next key press.
    pub flash: Option<String>,
    /// Date prompt buffer while the user is typing.
    pub input: Option<String>,
}

impl App {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_tick(&mut self) {
        self.tick_count = self.tick_count.wrapping_add(1);
    }

    /// Applies a finished request. May return a follow-up request, which is
    /// how a failed export sends the user back to the list.
    pub fn apply(&mut self, event: Event) -> Option<Request> {
        match event {
            Event::Tick => self.on_tick(),
            Event::Input(key) => return self.handle_key(key),
            Event::AsteroidsLoaded(view) => {
                self.pending = None;
                self.selected_index = 0;
                self.asteroids = Some(view);
                return self.load_shown_view();
            }
            Event::PictureLoaded(view) => {
                self.pending = None;
                self.picture = Some(view);
                return self.load_shown_view();
            }
            Event::ExportFinished { range, result } => {
                self.pending = None;
                match result {
                    Ok(path) => {
                        self.flash = Some(format!("Exported {}", path.display()));
                        return self.load_shown_view();
                    }
                    Err(message) => {
                        self.flash = Some(message);
                        self.view_mode = ViewMode::Asteroids;
                        return self.request(Request::Asteroids {
                            start: Some(range.start),
                            end: Some(range.end),
                        });
                    }
                }
            }
        }
        None
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Option<Request> {
        if self.input.is_some() {
            return self.handle_prompt_key(key);
        }
        self.flash = None;

        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return None;
        }

        match key.code {
            KeyCode::Char('q') => {
                self.should_quit = true;
                None
            }
            KeyCode::Tab => self.switch_to(self.view_mode.next()),
            KeyCode::Char('1') => self.switch_to(ViewMode::Home),
            KeyCode::Char('2') => self.switch_to(ViewMode::Asteroids),
            KeyCode::Char('3') => self.switch_to(ViewMode::Picture),
            KeyCode::Char('/') if self.view_mode != ViewMode::Home => {
                self.input = Some(String::new());
                None
            }
            _ => match self.view_mode {
                ViewMode::Home => None,
                ViewMode::Asteroids => self.handle_asteroids_key(key),
                ViewMode::Picture => self.handle_picture_key(key),
            },
        }
    }

    fn switch_to(&mut self, mode: ViewMode) -> Option<Request> {
        self.view_mode = mode;
        self.load_shown_view()
    }

    /// First load for the current view if it has no data yet. A tab switched
    /// to while another request was running gets its load here once that
    /// request reports back.
    fn load_shown_view(&mut self) -> Option<Request> {
        match self.view_mode {
            ViewMode::Asteroids if self.asteroids.is_none() => {
                self.request(Request::Asteroids { start: None, end: None })
            }
            ViewMode::Picture if self.picture.is_none() => self.request(Request::Picture { date: None }),
            _ => None,
        }
    }

    fn handle_asteroids_key(&mut self, key: KeyEvent) -> Option<Request> {
        let range = self.asteroids.as_ref().map(|v| v.range);
        let bounds = |r: Option<DateRange>| (r.map(|r| r.start), r.map(|r| r.end));

        match key.code {
            KeyCode::Down | KeyCode::Char('j') => {
                let len = self.asteroid_count();
                if len > 0 {
                    self.selected_index = (self.selected_index + 1) % len;
                }
                None
            }
            KeyCode::Up | KeyCode::Char('k') => {
                let len = self.asteroid_count();
                if len > 0 {
                    self.selected_index = self.selected_index.checked_sub(1).unwrap_or(len - 1);
                }
                None
            }
            KeyCode::Char('r') => {
                let (start, end) = bounds(range);
                self.request(Request::Asteroids { start, end })
            }
            KeyCode::Char('e') => {
                let (start, end) = bounds(range);
                self.request(Request::Export { start, end })
            }
            KeyCode::Char('[') | KeyCode::Char(']') => {
                let weeks = if key.code == KeyCode::Char('[') { -1 } else { 1 };
                let (start, end) = bounds(range.map(|r| r.shifted_weeks(weeks)));
                self.request(Request::Asteroids { start, end })
            }
            _ => None,
        }
    }

    fn handle_picture_key(&mut self, key: KeyEvent) -> Option<Request> {
        let shown = self.picture.as_ref().map(|v| v.date);

        match key.code {
            KeyCode::Left | KeyCode::Char('h') => {
                let date = shown.and_then(|d| d.checked_sub_days(Days::new(1)));
                self.request(Request::Picture { date })
            }
            KeyCode::Right | KeyCode::Char('l') => {
                let date = shown.and_then(|d| d.checked_add_days(Days::new(1)));
                self.request(Request::Picture { date })
            }
            KeyCode::Char('t') => self.request(Request::Picture { date: None }),
            KeyCode::Char('r') => self.request(Request::Picture { date: shown }),
            _ => None,
        }
    }

    fn handle_prompt_key(&mut self, key: KeyEvent) -> Option<Request> {
        let buffer = self.input.get_or_insert_with(String::new);
        match key.code {
            KeyCode::Char(c) if c.is_ascii_digit() || c == '-' || c == ' ' => {
                buffer.push(c);
                None
            }
            KeyCode::Backspace => {
                buffer.pop();
                None
            }
            KeyCode::Esc => {
                self.input = None;
                None
            }
            KeyCode::Enter => {
                let typed = self.input.take().unwrap_or_default();
                self.submit_prompt(&typed)
            }
            _ => None,
        }
    }

    fn submit_prompt(&mut self, typed: &str) -> Option<Request> {
        let mut parts = typed.split_whitespace().map(parse_date_arg);
        let first = parts.next().unwrap_or(Ok(None));
        let second = parts.next().unwrap_or(Ok(None));

        let request = match (self.view_mode, first, second) {
            (ViewMode::Asteroids, Ok(start), Ok(end)) => Request::Asteroids { start, end },
            (ViewMode::Picture, Ok(date), _) => Request::Picture { date },
            (_, Err(message), _) | (_, _, Err(message)) => {
                self.flash = Some(message);
                return None;
            }
            _ => return None,
        };
        self.request(request)
    }

    /// Marks `request` as in flight and hands it back for dispatch, unless
    /// another one is still running.
    pub fn request(&mut self, request: Request) -> Option<Request> {
        if self.pending.is_some() {
            return None;
        }
        self.pending = Some(request);
        Some(request)
    }

    pub fn is_loading(&self) -> bool {
        self.pending.is_some()
    }

    fn asteroid_count(&self) -> usize {
        self.asteroids.as_ref().map_or(0, |v| v.observations.len())
    }
}

/// Parses one prompt token. `-` stands for "not given".
pub fn parse_date_arg(token: &str) -> Result<Option<NaiveDate>, String> {
    if token == "-" {
        return Ok(None);
    }
    NaiveDate::parse_from_str(token, DATE_INPUT)
        .map(Some)
        .map_err(|_| format!("Invalid date '{}', expected YYYY-MM-DD", token))
}
