//! TUI block editor demo
//!
//! A terminal host for `block-engine` built with crossterm and ratatui. Each
//! block renders as one line whose text is an editable surface; the gutter on
//! the left is the block's drag handle.
//!
//! # Usage
//!
//! ```bash
//! cargo run -p tui-blocks -- [document.json]
//! ```
//!
//! The document is a JSON array of blocks (the engine's snapshot shape). A
//! missing file starts an empty document; Ctrl+S writes it back.
//!
//! # Keys
//!
//! - Typing/Backspace/Left/Right: edit the focused block's text
//! - Enter: new block of the same kind below (Shift+Enter is ignored)
//! - Backspace on an empty block: remove it, focus the previous block
//! - Up/Down: move focus between blocks
//! - Ctrl+S: save, Ctrl+X: quit
//! - Mouse on the gutter: drag to reorder, click to open the block menu
//! - Menu: t = turn into, c = color, d = duplicate, l = copy link,
//!   x = delete, Esc = close; in submenus Up/Down + Enter select, and the
//!   turn-into panel filters as you type

use block_engine::{
    Block, BlockColor, BlockId, BlockKind, EditableSurface, EditorSession, MenuState,
    PointerPoint, SurfaceBinding, SurfaceRegistry,
};
use crossterm::{
    event::{
        self, DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste,
        EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton,
        MouseEvent, MouseEventKind,
    },
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block as UiBlock, Borders, Clear, Paragraph},
};
use std::collections::HashMap;
use std::io::{self, stdout};
use std::path::PathBuf;
use std::time::Instant;
use std::{env, fs, process};
use unicode_width::UnicodeWidthStr;

/// Width of the drag-handle gutter in cells.
const GUTTER_WIDTH: u16 = 3;

/// One rendered block line: the editable surface for that block.
struct LineState {
    id: BlockId,
    text: String,
    caret: usize,
    wants_focus: bool,
}

impl EditableSurface for LineState {
    fn text_len(&self) -> usize {
        self.text.chars().count()
    }

    fn focus_at(&mut self, offset: usize) {
        self.caret = offset.min(self.text_len());
        self.wants_focus = true;
    }
}

/// Id → line lookup rebuilt from the current render, handed to the engine's
/// focus manager after each draw.
struct LineRegistry<'a> {
    lines: &'a mut [LineState],
    positions: HashMap<BlockId, usize>,
}

impl<'a> LineRegistry<'a> {
    fn new(lines: &'a mut [LineState]) -> Self {
        let positions = lines
            .iter()
            .enumerate()
            .map(|(i, line)| (line.id.clone(), i))
            .collect();
        LineRegistry { lines, positions }
    }
}

impl SurfaceRegistry for LineRegistry<'_> {
    fn resolve(&mut self, id: &BlockId) -> Option<&mut dyn EditableSurface> {
        let index = *self.positions.get(id)?;
        self.lines
            .get_mut(index)
            .map(|line| line as &mut dyn EditableSurface)
    }
}

struct App {
    session: EditorSession,
    lines: Vec<LineState>,
    /// Index of the focused block line.
    focused: usize,
    /// Selection cursor inside the open menu panel.
    menu_cursor: usize,
    file_path: Option<PathBuf>,
    status_message: String,
    should_quit: bool,
    started: Instant,
    /// Screen row of the first block line in the last draw.
    list_top: u16,
    /// Row the pointer is currently over during a drag.
    hover_row: Option<usize>,
}

impl App {
    fn new(file_path: Option<PathBuf>) -> io::Result<Self> {
        let blocks: Vec<Block> = match &file_path {
            Some(path) if path.exists() => {
                let raw = fs::read_to_string(path)?;
                serde_json::from_str(&raw).map_err(io::Error::other)?
            }
            _ => Vec::new(),
        };

        let session = EditorSession::load(blocks).map_err(io::Error::other)?;

        let mut app = App {
            session,
            lines: Vec::new(),
            focused: 0,
            menu_cursor: 0,
            file_path,
            status_message: String::from("Ctrl+S save | Ctrl+X quit | mouse gutter: drag/click"),
            should_quit: false,
            started: Instant::now(),
            list_top: 0,
            hover_row: None,
        };
        app.reconcile_lines();
        if let Some(first) = app.lines.first() {
            let id = first.id.clone();
            app.session.begin_editing(&id);
        }
        Ok(app)
    }

    fn now_ms(&self) -> u64 {
        self.started.elapsed().as_millis() as u64
    }

    /// Rebuild line states from the model, keeping the caret of lines whose
    /// block survived.
    fn reconcile_lines(&mut self) {
        let carets: HashMap<BlockId, usize> = self
            .lines
            .iter()
            .map(|l| (l.id.clone(), l.caret))
            .collect();
        self.lines = self
            .session
            .blocks()
            .iter()
            .map(|block| {
                let caret = carets
                    .get(&block.id)
                    .copied()
                    .unwrap_or(0)
                    .min(block.content.plain.chars().count());
                LineState {
                    id: block.id.clone(),
                    text: block.content.plain.clone(),
                    caret,
                    wants_focus: false,
                }
            })
            .collect();
        if self.focused >= self.lines.len() {
            self.focused = self.lines.len().saturating_sub(1);
        }
    }

    fn focus_line(&mut self, index: usize) {
        if index >= self.lines.len() {
            return;
        }
        self.focused = index;
        let id = self.lines[index].id.clone();
        self.session.begin_editing(&id);
    }

    /// Push the focused line's text into the model.
    fn commit_focused(&mut self) {
        let text = self.lines[self.focused].text.clone();
        if self.session.commit_input(&text) {
            // Structure didn't change; only this line's model text did.
            self.status_message.clear();
        }
    }

    fn save(&mut self) {
        let path = self
            .file_path
            .clone()
            .unwrap_or_else(|| PathBuf::from("document.json"));
        match serde_json::to_string_pretty(self.session.blocks()) {
            Ok(json) => match fs::write(&path, json) {
                Ok(()) => {
                    self.status_message = format!("Saved {}", path.display());
                    self.file_path = Some(path);
                }
                Err(err) => self.status_message = format!("Save failed: {err}"),
            },
            Err(err) => self.status_message = format!("Serialize failed: {err}"),
        }
    }

    // ---- key handling -----------------------------------------------------

    fn handle_key_event(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }
        if self.session.menu().is_open() {
            self.handle_menu_key(key);
            return;
        }

        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Char('x') if ctrl => self.should_quit = true,
            KeyCode::Char('s') if ctrl => self.save(),
            KeyCode::Char(c) if !ctrl => {
                let line = &mut self.lines[self.focused];
                let byte = byte_offset(&line.text, line.caret);
                line.text.insert(byte, c);
                line.caret += 1;
                self.commit_focused();
            }
            KeyCode::Backspace => {
                if self.lines[self.focused].text.is_empty() {
                    if self.session.handle_backspace(self.focused) {
                        self.reconcile_lines();
                    }
                } else {
                    let line = &mut self.lines[self.focused];
                    if line.caret > 0 {
                        let start = byte_offset(&line.text, line.caret - 1);
                        let end = byte_offset(&line.text, line.caret);
                        line.text.replace_range(start..end, "");
                        line.caret -= 1;
                        self.commit_focused();
                    }
                }
            }
            KeyCode::Enter => {
                let shift = key.modifiers.contains(KeyModifiers::SHIFT);
                if self.session.handle_line_break(self.focused, shift) {
                    self.reconcile_lines();
                }
            }
            KeyCode::Left => {
                let line = &mut self.lines[self.focused];
                line.caret = line.caret.saturating_sub(1);
            }
            KeyCode::Right => {
                let line = &mut self.lines[self.focused];
                line.caret = (line.caret + 1).min(line.text.chars().count());
            }
            KeyCode::Up => {
                if self.focused > 0 {
                    self.focus_line(self.focused - 1);
                }
            }
            KeyCode::Down => {
                if self.focused + 1 < self.lines.len() {
                    self.focus_line(self.focused + 1);
                }
            }
            KeyCode::Home => self.lines[self.focused].caret = 0,
            KeyCode::End => {
                let line = &mut self.lines[self.focused];
                line.caret = line.text.chars().count();
            }
            _ => {}
        }
    }

    fn handle_menu_key(&mut self, key: KeyEvent) {
        match self.session.menu().state() {
            MenuState::Root => match key.code {
                KeyCode::Esc => self.session.menu_mut().close(),
                KeyCode::Char('t') => {
                    self.session.menu_mut().open_turn_into();
                    self.menu_cursor = 0;
                }
                KeyCode::Char('c') => {
                    self.session.menu_mut().open_color();
                    self.menu_cursor = 0;
                }
                KeyCode::Char('d') => {
                    if let Some(command) = self.session.menu_mut().choose_duplicate() {
                        self.session.execute(command);
                        self.reconcile_lines();
                    }
                }
                KeyCode::Char('x') => {
                    if let Some(command) = self.session.menu_mut().choose_delete() {
                        self.session.execute(command);
                        self.reconcile_lines();
                    }
                }
                KeyCode::Char('l') => {
                    let target = self.session.menu().target();
                    if let Some(id) = target.and_then(|i| {
                        self.session.blocks().get(i).map(|b| b.id.clone())
                    }) && let Some(link) = self.session.menu_mut().choose_copy_link(&id)
                    {
                        // A desktop host would put this on the clipboard.
                        self.status_message = format!("Link: {link}");
                    }
                }
                _ => {}
            },
            MenuState::TurnInto => match key.code {
                KeyCode::Esc => self.session.menu_mut().close(),
                KeyCode::Up => self.menu_cursor = self.menu_cursor.saturating_sub(1),
                KeyCode::Down => {
                    let count = self.session.menu().filtered_kinds().len();
                    if self.menu_cursor + 1 < count {
                        self.menu_cursor += 1;
                    }
                }
                KeyCode::Enter => {
                    let kinds = self.session.menu().filtered_kinds();
                    if let Some(kind) = kinds.get(self.menu_cursor).copied()
                        && let Some(command) = self.session.menu_mut().choose_kind(kind)
                    {
                        self.session.execute(command);
                        self.reconcile_lines();
                    }
                }
                KeyCode::Backspace => {
                    let mut query = self.session.menu().query().to_string();
                    query.pop();
                    self.session.menu_mut().set_query(query);
                    self.menu_cursor = 0;
                }
                KeyCode::Char(c) => {
                    let query = format!("{}{c}", self.session.menu().query());
                    self.session.menu_mut().set_query(query);
                    self.menu_cursor = 0;
                }
                _ => {}
            },
            MenuState::Color => match key.code {
                KeyCode::Esc => self.session.menu_mut().close(),
                KeyCode::Up => self.menu_cursor = self.menu_cursor.saturating_sub(1),
                KeyCode::Down => {
                    if self.menu_cursor + 1 < BlockColor::ALL.len() {
                        self.menu_cursor += 1;
                    }
                }
                KeyCode::Enter => {
                    if let Some(color) = BlockColor::ALL.get(self.menu_cursor).copied()
                        && let Some(command) = self.session.menu_mut().choose_color(color)
                    {
                        self.session.execute(command);
                        self.reconcile_lines();
                    }
                }
                _ => {}
            },
            MenuState::Closed => {}
        }
    }

    fn handle_paste(&mut self, pasted: String) {
        if self.session.menu().is_open() {
            return;
        }
        let line = &mut self.lines[self.focused];
        let outcome = SurfaceBinding::paste(&line.text, line.caret, &pasted);
        line.text = outcome.text;
        line.caret = outcome.caret;
        self.commit_focused();
    }

    // ---- mouse handling ---------------------------------------------------

    fn row_to_block(&self, row: u16) -> Option<usize> {
        let index = row.checked_sub(self.list_top)? as usize;
        (index < self.lines.len()).then_some(index)
    }

    fn handle_mouse_event(&mut self, mouse: MouseEvent) {
        let at = PointerPoint::new(mouse.column as i32, mouse.row as i32);
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                if let Some(index) = self.row_to_block(mouse.row) {
                    if mouse.column < GUTTER_WIDTH {
                        let time = self.now_ms();
                        self.session.pointer_down(index, at, time);
                        self.hover_row = Some(index);
                    } else {
                        self.focus_line(index);
                    }
                }
            }
            MouseEventKind::Drag(MouseButton::Left) => {
                self.session.pointer_move(at);
                self.hover_row = self.row_to_block(mouse.row);
            }
            MouseEventKind::Up(MouseButton::Left) => {
                let target = self.row_to_block(mouse.row);
                let time = self.now_ms();
                let outcome = self.session.pointer_up(target, time);
                if matches!(outcome, block_engine::GestureOutcome::Move { .. }) {
                    self.reconcile_lines();
                }
                self.hover_row = None;
                self.menu_cursor = 0;
            }
            _ => {}
        }
    }

    // ---- rendering --------------------------------------------------------

    fn render(&mut self, frame: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(1), Constraint::Length(1)])
            .split(frame.area());

        self.list_top = chunks[0].y;
        let mut rows: Vec<Line> = Vec::with_capacity(self.lines.len());
        for (i, block) in self.session.blocks().iter().enumerate() {
            rows.push(self.render_block_line(i, block));
        }
        frame.render_widget(Paragraph::new(rows), chunks[0]);

        let status = Line::from(vec![
            Span::styled(
                format!(" v{} ", self.session.version()),
                Style::default().fg(Color::Cyan),
            ),
            Span::raw(self.status_message.clone()),
        ]);
        frame.render_widget(Paragraph::new(status), chunks[1]);

        if self.session.menu().is_open() {
            self.render_menu(frame);
        }

        // Terminal caret on the focused line.
        if !self.session.menu().is_open()
            && let Some(line) = self.lines.get(self.focused)
        {
            let prefix = kind_prefix(self.session.blocks()[self.focused].kind);
            let before = &line.text[..byte_offset(&line.text, line.caret)];
            let x = chunks[0].x
                + GUTTER_WIDTH
                + prefix.width() as u16
                + before.width() as u16;
            let y = self.list_top + self.focused as u16;
            if y < chunks[0].bottom() {
                frame.set_cursor_position((x.min(chunks[0].right().saturating_sub(1)), y));
            }
        }
    }

    fn render_block_line(&self, index: usize, block: &Block) -> Line<'static> {
        let dragging = self.session.is_dragging();
        let is_source = dragging && Some(index) == self.hover_row;
        let gutter_style = if is_source {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        let mut spans = vec![Span::styled(" ⠿ ", gutter_style)];

        let prefix = kind_prefix(block.kind);
        if !prefix.is_empty() {
            spans.push(Span::styled(
                prefix.to_string(),
                Style::default().fg(Color::DarkGray),
            ));
        }

        let style = block_style(block).patch(if index == self.focused {
            Style::default().add_modifier(Modifier::UNDERLINED)
        } else {
            Style::default()
        });
        if block.content.plain.is_empty() {
            spans.push(Span::styled(
                block.kind.placeholder().to_string(),
                Style::default().fg(Color::DarkGray).add_modifier(Modifier::DIM),
            ));
        } else {
            spans.push(Span::styled(block.content.plain.clone(), style));
        }
        Line::from(spans)
    }

    fn render_menu(&self, frame: &mut Frame) {
        let area = frame.area();
        let width = 28u16.min(area.width);
        let target_row = self
            .session
            .menu()
            .target()
            .map(|i| self.list_top + i as u16)
            .unwrap_or(0);

        let (title, items): (&str, Vec<String>) = match self.session.menu().state() {
            MenuState::Root => (
                "Block",
                vec![
                    "t  Turn into".to_string(),
                    "c  Color".to_string(),
                    "d  Duplicate".to_string(),
                    "l  Copy link".to_string(),
                    "x  Delete".to_string(),
                ],
            ),
            MenuState::TurnInto => {
                let mut items = vec![format!("find: {}", self.session.menu().query())];
                items.extend(
                    self.session
                        .menu()
                        .filtered_kinds()
                        .iter()
                        .enumerate()
                        .map(|(i, kind)| {
                            let marker = if i == self.menu_cursor { ">" } else { " " };
                            format!("{marker} {}", kind.display_name())
                        }),
                );
                ("Turn into", items)
            }
            MenuState::Color => (
                "Color",
                BlockColor::ALL
                    .iter()
                    .enumerate()
                    .map(|(i, color)| {
                        let marker = if i == self.menu_cursor { ">" } else { " " };
                        format!("{marker} {}", color.display_name())
                    })
                    .collect(),
            ),
            MenuState::Closed => return,
        };

        let height = (items.len() as u16 + 2).min(area.height);
        let x = area.width.saturating_sub(width);
        let y = target_row.min(area.height.saturating_sub(height));
        let popup = Rect::new(x, y, width, height);

        frame.render_widget(Clear, popup);
        let text: Vec<Line> = items.into_iter().map(Line::from).collect();
        frame.render_widget(
            Paragraph::new(text).block(UiBlock::default().borders(Borders::ALL).title(title)),
            popup,
        );
    }
}

/// Byte offset of the char at `caret` (or the end of the string).
fn byte_offset(text: &str, caret: usize) -> usize {
    text.char_indices()
        .nth(caret)
        .map(|(b, _)| b)
        .unwrap_or(text.len())
}

fn kind_prefix(kind: BlockKind) -> &'static str {
    match kind {
        BlockKind::Paragraph => "",
        BlockKind::Heading1 => "# ",
        BlockKind::Heading2 => "## ",
        BlockKind::Heading3 => "### ",
        BlockKind::Toggle => "▸ ",
        BlockKind::Quote => "▍ ",
        BlockKind::Page => "⇒ ",
        BlockKind::Image => "[img] ",
        BlockKind::Video => "[vid] ",
    }
}

fn block_style(block: &Block) -> Style {
    let mut style = match block.kind {
        BlockKind::Heading1 => Style::default().add_modifier(Modifier::BOLD),
        BlockKind::Heading2 | BlockKind::Heading3 => {
            Style::default().add_modifier(Modifier::BOLD | Modifier::DIM)
        }
        BlockKind::Quote => Style::default().add_modifier(Modifier::ITALIC),
        _ => Style::default(),
    };
    style = style.fg(match block.color {
        BlockColor::Default => Color::Reset,
        BlockColor::Gray => Color::Gray,
        BlockColor::Brown => Color::Rgb(150, 110, 80),
        BlockColor::Orange => Color::Rgb(220, 130, 40),
        BlockColor::Yellow => Color::Yellow,
        BlockColor::Green => Color::Green,
        BlockColor::Blue => Color::Blue,
        BlockColor::Purple => Color::Magenta,
        BlockColor::Pink => Color::Rgb(230, 120, 180),
        BlockColor::Red => Color::Red,
    });
    style
}

fn main() -> io::Result<()> {
    let args: Vec<String> = env::args().collect();
    let file_path = args.get(1).map(PathBuf::from);

    let mut app = match App::new(file_path) {
        Ok(app) => app,
        Err(err) => {
            eprintln!("Failed to load document: {err}");
            process::exit(1);
        }
    };

    enable_raw_mode()?;
    let mut out = stdout();
    execute!(out, EnterAlternateScreen, EnableMouseCapture, EnableBracketedPaste)?;
    let backend = CrosstermBackend::new(out);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        DisableBracketedPaste,
        DisableMouseCapture,
        LeaveAlternateScreen
    )?;
    terminal.show_cursor()?;

    if let Err(err) = result {
        eprintln!("Error: {err}");
    }
    Ok(())
}

fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
) -> io::Result<()> {
    loop {
        terminal.draw(|frame| app.render(frame))?;

        // Deferred focus runs after the draw, once the target line exists.
        if app.session.focus_mut().has_pending() {
            let focused = {
                let mut registry = LineRegistry::new(&mut app.lines);
                app.session.focus_mut().flush(&mut registry);
                app.lines.iter().position(|line| line.wants_focus)
            };
            if let Some(index) = focused {
                app.lines[index].wants_focus = false;
                app.focus_line(index);
            }
        }

        if app.should_quit {
            break;
        }

        if event::poll(std::time::Duration::from_millis(100))? {
            match event::read()? {
                Event::Key(key) => app.handle_key_event(key),
                Event::Mouse(mouse) => app.handle_mouse_event(mouse),
                Event::Paste(text) => app.handle_paste(text),
                Event::Resize(_, _) => {}
                _ => {}
            }
        }
    }
    Ok(())
}
