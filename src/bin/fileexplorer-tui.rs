use anyhow::Context;
use clap::Parser;
use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyModifiers,
    MouseButton, MouseEvent, MouseEventKind,
};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen};
use fileexplorer::config::{init_logging, Args};
use fileexplorer::loader::TreeSource;
use fileexplorer::render_tree::RenderRow;
use fileexplorer::{
    ActionKind, Browser, HitTarget, NodeKind, Notification, NotificationLevel, PointerEvent,
};
use ratatui::backend::CrosstermBackend;
use ratatui::buffer::Buffer;
use ratatui::layout::{Constraint, Layout, Rect as UiRect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Widget};
use ratatui::{Frame, Terminal};
use std::io::{self, stdout};
use std::time::Duration;

const MENU_WIDTH: u16 = 12;
const MENU_HEIGHT: u16 = ActionKind::ALL.len() as u16 + 2;
const INDENT: usize = 2;

#[derive(Default, Clone, Copy)]
struct UiLayoutState {
    tree_inner_area: Option<UiRect>,
    menu_area: Option<UiRect>,
}

struct App {
    browser: Browser,
    source: TreeSource,
    rows: Vec<RenderRow>,
    scroll: usize,
    status: String,
    status_is_error: bool,
    ui_layout: UiLayoutState,
    should_quit: bool,
}

impl App {
    fn new(browser: Browser, source: TreeSource) -> Self {
        let status = format!("Loaded {}", source.describe());
        Self {
            browser,
            source,
            rows: Vec::new(),
            scroll: 0,
            status,
            status_is_error: false,
            ui_layout: UiLayoutState::default(),
            should_quit: false,
        }
    }

    fn reload(&mut self) {
        match self.source.load() {
            Ok(root) => {
                self.browser.replace_root(root);
                self.scroll = 0;
                self.set_status(format!("Reloaded {}", self.source.describe()), false);
            }
            Err(err) => {
                log::error!("reload failed: {}", err);
                self.set_status(format!("Reload failed: {}", err), true);
            }
        }
    }

    fn set_status(&mut self, status: String, is_error: bool) {
        self.status = status;
        self.status_is_error = is_error;
    }

    fn refresh_rows(&mut self) {
        self.rows = self.browser.rows();
        self.scroll = self.scroll.min(self.rows.len().saturating_sub(1));
    }

    fn on_key(&mut self, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL) && matches!(key.code, KeyCode::Char('c')) {
            self.should_quit = true;
            return;
        }

        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('r') => self.reload(),
            KeyCode::Esc => self.browser.dismiss_menu(),
            KeyCode::Down => self.scroll_by(1),
            KeyCode::Up => self.scroll_by(-1),
            _ => {}
        }
    }

    fn on_mouse(&mut self, event: MouseEvent) {
        let (x, y) = (event.column, event.row);
        let mut pointer = match event.kind {
            MouseEventKind::Down(MouseButton::Left) => PointerEvent::primary(x as f32, y as f32),
            MouseEventKind::Down(MouseButton::Right) => PointerEvent::secondary(x as f32, y as f32),
            MouseEventKind::ScrollDown => return self.scroll_by(1),
            MouseEventKind::ScrollUp => return self.scroll_by(-1),
            _ => return,
        };

        let Some(target) = self.hit_test(x, y) else {
            return;
        };
        self.browser.dispatch(&target, &mut pointer);

        for note in self.browser.drain_notifications() {
            self.show_notification(note);
        }
    }

    fn show_notification(&mut self, note: Notification) {
        let is_error = note.level == NotificationLevel::Error;
        self.set_status(note.message, is_error);
    }

    fn scroll_by(&mut self, delta: isize) {
        let max = self.rows.len().saturating_sub(1);
        self.scroll = self.scroll.saturating_add_signed(delta).min(max);
    }

    /// Topmost element under the cursor: the open menu, then a row, then
    /// the tree background. Clicks outside the tree area hit nothing.
    fn hit_test(&self, x: u16, y: u16) -> Option<HitTarget> {
        if self.browser.context_menu().visible {
            if let Some(menu) = self.ui_layout.menu_area {
                if point_in_rect(menu, x, y) {
                    let inner = inset(menu);
                    if point_in_rect(inner, x, y) {
                        let index = (y - inner.y) as usize;
                        if let Some(action) = ActionKind::ALL.get(index) {
                            return Some(HitTarget::MenuItem(*action));
                        }
                    }
                    return Some(HitTarget::Background);
                }
            }
        }

        let area = self.ui_layout.tree_inner_area?;
        if !point_in_rect(area, x, y) {
            return None;
        }

        let index = self.scroll + (y - area.y) as usize;
        match self.rows.get(index) {
            Some(row) => Some(HitTarget::Row(row.path.clone())),
            None => Some(HitTarget::Background),
        }
    }
}

fn point_in_rect(rect: UiRect, x: u16, y: u16) -> bool {
    x >= rect.x
        && x < rect.x.saturating_add(rect.width)
        && y >= rect.y
        && y < rect.y.saturating_add(rect.height)
}

fn inset(rect: UiRect) -> UiRect {
    UiRect::new(
        rect.x.saturating_add(1),
        rect.y.saturating_add(1),
        rect.width.saturating_sub(2),
        rect.height.saturating_sub(2),
    )
}

/// Place the menu with its corner at the cursor, pulled back inside `bounds`.
fn menu_rect(x: f32, y: f32, bounds: UiRect) -> UiRect {
    let width = MENU_WIDTH.min(bounds.width);
    let height = MENU_HEIGHT.min(bounds.height);
    let max_x = bounds.x.saturating_add(bounds.width.saturating_sub(width));
    let max_y = bounds.y.saturating_add(bounds.height.saturating_sub(height));
    let x = (x.max(0.0) as u16).clamp(bounds.x, max_x);
    let y = (y.max(0.0) as u16).clamp(bounds.y, max_y);
    UiRect::new(x, y, width, height)
}

fn row_label(row: &RenderRow) -> String {
    let marker = match row.kind {
        NodeKind::Folder if row.expanded => "▾ ",
        NodeKind::Folder => "▸ ",
        NodeKind::File => "  ",
    };
    format!("{}{}{}", " ".repeat(row.depth as usize * INDENT), marker, row.name)
}

struct TreeWidget<'a> {
    rows: &'a [RenderRow],
    scroll: usize,
}

impl<'a> TreeWidget<'a> {
    fn new(rows: &'a [RenderRow], scroll: usize) -> Self {
        Self { rows, scroll }
    }
}

impl Widget for TreeWidget<'_> {
    fn render(self, area: UiRect, buf: &mut Buffer) {
        if area.width == 0 || area.height == 0 {
            return;
        }

        let visible = self.rows.iter().skip(self.scroll).take(area.height as usize);
        for (offset, row) in visible.enumerate() {
            let y = area.y.saturating_add(offset as u16);
            let style = match row.kind {
                NodeKind::Folder => Style::default()
                    .fg(Color::Rgb(120, 170, 230))
                    .add_modifier(Modifier::BOLD),
                NodeKind::File if row.selected => Style::default()
                    .fg(Color::Black)
                    .bg(Color::Rgb(246, 211, 101)),
                NodeKind::File => Style::default().fg(Color::Rgb(224, 224, 224)),
            };

            if row.selected {
                buf.set_style(UiRect::new(area.x, y, area.width, 1), style);
            }
            buf.set_stringn(area.x, y, row_label(row), area.width as usize, style);
        }
    }
}

fn draw_menu(frame: &mut Frame, area: UiRect) {
    let lines: Vec<Line> = ActionKind::ALL
        .iter()
        .map(|action| Line::from(format!(" {}", action.label())))
        .collect();

    frame.render_widget(Clear, area);
    frame.render_widget(
        Paragraph::new(lines)
            .style(Style::default().fg(Color::White).bg(Color::Rgb(40, 40, 46)))
            .block(Block::default().borders(Borders::ALL)),
        area,
    );
}

fn draw_ui(frame: &mut Frame, app: &mut App) {
    let root = frame.area();
    let split = Layout::horizontal([Constraint::Length(36), Constraint::Min(30)]).split(root);
    let left = split[0];
    let right = split[1];

    let left_block = Block::default()
        .title(" File Explorer ")
        .borders(Borders::ALL);
    let left_inner = left_block.inner(left);
    frame.render_widget(left_block, left);

    let left_rows = Layout::vertical([
        Constraint::Length(5),
        Constraint::Min(6),
        Constraint::Length(6),
    ])
    .split(left_inner);

    let status_style = if app.status_is_error {
        Style::default().fg(Color::Red)
    } else {
        Style::default().fg(Color::White)
    };
    frame.render_widget(
        Paragraph::new(app.status.as_str())
            .style(status_style)
            .block(Block::default().title(" Status ").borders(Borders::ALL)),
        left_rows[0],
    );

    let (folders, files) = app.browser.root().count();
    let selection_lines = vec![
        Line::from(vec![
            Span::styled("Source: ", Style::default().fg(Color::Gray)),
            Span::raw(app.source.describe()),
        ]),
        Line::from(vec![
            Span::styled("Selected: ", Style::default().fg(Color::Gray)),
            Span::raw(app.browser.selected().unwrap_or("(none)").to_string()),
        ]),
        Line::from(format!("{} folders, {} files", folders, files)),
    ];
    frame.render_widget(
        Paragraph::new(selection_lines)
            .block(Block::default().title(" Selection ").borders(Borders::ALL)),
        left_rows[1],
    );

    let help_lines = vec![
        Line::from("Left click: open folder / select"),
        Line::from("Right click file: actions"),
        Line::from("Wheel/arrows: scroll  Esc: close"),
        Line::from("r: reload   q: quit"),
    ];
    frame.render_widget(
        Paragraph::new(help_lines).block(Block::default().title(" Controls ").borders(Borders::ALL)),
        left_rows[2],
    );

    let tree_block = Block::default().title(" Tree ").borders(Borders::ALL);
    let tree_inner = tree_block.inner(right);
    frame.render_widget(tree_block, right);
    app.ui_layout.tree_inner_area = Some(tree_inner);

    app.refresh_rows();
    frame.render_widget(TreeWidget::new(&app.rows, app.scroll), tree_inner);

    let menu = app.browser.context_menu();
    app.ui_layout.menu_area = if menu.visible {
        let area = menu_rect(menu.x, menu.y, root);
        draw_menu(frame, area);
        Some(area)
    } else {
        None
    };
}

fn run_app(terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>, app: &mut App) -> io::Result<()> {
    loop {
        terminal.draw(|frame| {
            draw_ui(frame, app);
        })?;

        if app.should_quit {
            break;
        }

        if event::poll(Duration::from_millis(50))? {
            match event::read()? {
                Event::Key(key) => app.on_key(key),
                Event::Mouse(mouse) => app.on_mouse(mouse),
                Event::Resize(_, _) => {}
                Event::FocusGained | Event::FocusLost | Event::Paste(_) => {}
            }
        }
    }

    Ok(())
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    // The terminal belongs to the UI, so logs only go to an explicit file.
    if let Some(path) = args.log_file.as_deref() {
        init_logging(Some(path))?;
    }

    let source = args.source();
    let root = source
        .load()
        .with_context(|| format!("loading {}", source.describe()))?;
    let mut app = App::new(Browser::with_log_sink(root), source);

    enable_raw_mode()?;
    crossterm::execute!(stdout(), EnterAlternateScreen, EnableMouseCapture)?;

    let backend = CrosstermBackend::new(stdout());
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    let app_result = run_app(&mut terminal, &mut app);

    disable_raw_mode()?;
    crossterm::execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    Ok(app_result?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use fileexplorer::{Node, NodePath};

    fn app() -> App {
        let root = Node::folder(
            "root",
            vec![Node::folder("src", vec![Node::file("main.rs")]), Node::file("readme.md")],
        );
        let mut app = App::new(Browser::with_log_sink(root), TreeSource::Sample);
        app.ui_layout.tree_inner_area = Some(UiRect::new(40, 1, 40, 20));
        app.refresh_rows();
        app
    }

    fn click(app: &mut App, kind: MouseEventKind, column: u16, row: u16) {
        app.on_mouse(MouseEvent {
            kind,
            column,
            row,
            modifiers: KeyModifiers::NONE,
        });
        app.refresh_rows();
    }

    #[test]
    fn test_hit_test_rows_and_background() {
        let mut app = app();
        assert_eq!(app.hit_test(45, 1), Some(HitTarget::Row(NodePath::root("root"))));
        assert_eq!(app.hit_test(45, 5), Some(HitTarget::Background));
        assert_eq!(app.hit_test(2, 2), None);

        click(&mut app, MouseEventKind::Down(MouseButton::Left), 45, 1);
        assert_eq!(app.rows.len(), 3);
        assert_eq!(app.hit_test(45, 3), Some(HitTarget::Row(NodePath::root("root").join("readme.md"))));
    }

    #[test]
    fn test_right_click_then_menu_action() {
        let mut app = app();
        click(&mut app, MouseEventKind::Down(MouseButton::Left), 45, 1);
        click(&mut app, MouseEventKind::Down(MouseButton::Right), 50, 3);

        let menu = app.browser.context_menu().clone();
        assert!(menu.visible);
        assert_eq!((menu.x, menu.y), (50.0, 3.0));
        assert_eq!(menu.target.as_deref(), Some("readme.md"));

        let area = menu_rect(menu.x, menu.y, UiRect::new(0, 0, 100, 40));
        app.ui_layout.menu_area = Some(area);
        assert_eq!(app.hit_test(area.x + 2, area.y + 2), Some(HitTarget::MenuItem(ActionKind::Delete)));

        click(&mut app, MouseEventKind::Down(MouseButton::Left), area.x + 2, area.y + 2);
        assert!(!app.browser.context_menu().visible);
        assert_eq!(app.status, "delete on readme.md");
    }

    #[test]
    fn test_menu_rect_clamped_to_bounds() {
        let bounds = UiRect::new(0, 0, 80, 24);
        let rect = menu_rect(79.0, 23.0, bounds);
        assert_eq!(rect, UiRect::new(80 - MENU_WIDTH, 24 - MENU_HEIGHT, MENU_WIDTH, MENU_HEIGHT));
    }

    #[test]
    fn test_row_label() {
        let app = app();
        assert_eq!(row_label(&app.rows[0]), "▸ root");
    }
}
