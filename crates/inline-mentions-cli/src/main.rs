mod candidates;

use anyhow::Result;
use candidates::CandidateFilter;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use inline_mentions_config::Config;
use inline_mentions_engine::{
    Cmd, Document, EditorSession, EditorState, GridLayout, GridMetrics, OverlayOptions, QueryMode,
    without_trigger,
};
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph},
};
use std::{env, fs::File, io::stdout, path::PathBuf, process};

const MIN_OVERLAY_WIDTH: u16 = 14;

struct App {
    session: EditorSession,
    layout: GridLayout,
    filter: CandidateFilter,
}

impl App {
    fn new(config: &Config) -> Result<Self> {
        let options = OverlayOptions {
            trigger: config.trigger,
            query_mode: QueryMode::from_until_cursor(config.query_until_cursor),
        };
        let layout = GridLayout::new(GridMetrics::cells(0, 0, 80));

        let mut session = EditorSession::new(Document::new(), options);
        session.apply(Cmd::Focus, &layout)?;

        Ok(Self {
            session,
            layout,
            filter: CandidateFilter::new(config.candidates.clone(), config.trigger),
        })
    }

    fn apply(&mut self, cmd: Cmd) {
        match self.session.apply(cmd, &self.layout) {
            Ok(patch) => log::debug!(
                "v{} changed {:?}",
                patch.version,
                patch.changed_blocks
            ),
            Err(e) => log::warn!("command rejected: {e}"),
        }
        self.refresh_candidates();
    }

    /// Track the editor area; a moved or resized area re-measures the overlay.
    fn set_editor_area(&mut self, area: Rect) {
        let layout = GridLayout::new(GridMetrics::cells(area.x, area.y, area.width));
        if layout != self.layout {
            self.layout = layout;
            self.session.relayout(&self.layout);
        }
    }

    fn refresh_candidates(&mut self) {
        let overlay = self.session.overlay();
        if overlay.is_visible() {
            self.filter.update(&overlay.query);
        } else {
            self.filter.reset();
        }
    }

    /// Block text broken into rows the way [`GridLayout`] places it.
    fn editor_lines(&self) -> Vec<Line<'static>> {
        let metrics = self.layout.metrics;
        let columns = metrics.columns.max(1);
        let mut lines = Vec::new();

        for block in self.session.document().blocks() {
            let chars: Vec<char> = block.text().chars().collect();
            for row in 0..metrics.rows_for(chars.len()) {
                let start = (row * columns).min(chars.len());
                let end = (start + columns).min(chars.len());
                lines.push(Line::from(chars[start..end].iter().collect::<String>()));
            }
        }

        lines
    }

    fn cursor_cell(&self) -> Option<(usize, usize)> {
        let document = self.session.document();
        let selection = document.selection();
        if !selection.has_focus {
            return None;
        }
        let index = document
            .blocks()
            .iter()
            .position(|block| block.key() == &selection.focus_key)?;
        Some(self.layout.cell_of(document, index, selection.focus_offset))
    }
}

fn main() -> Result<()> {
    // Config path from CLI args, falling back to the default location
    let args: Vec<String> = env::args().collect();

    let (config_path, loaded) = match args.len() {
        1 => (Config::config_path(), Config::load()),
        2 => {
            let path = PathBuf::from(&args[1]);
            let loaded = Config::load_from_path(&path);
            (path, loaded)
        }
        _ => {
            eprintln!("Usage: {} [config-path]", args[0]);
            process::exit(1);
        }
    };

    let config = match loaded {
        Ok(Some(config)) => config,
        Ok(None) => Config::default(),
        Err(e) => {
            eprintln!("Error: Failed to load config file: {e}");
            eprintln!("Usage: {} [config-path]", args[0]);
            process::exit(1);
        }
    };

    // The terminal belongs to the UI, so logs go to a file
    let log_path = config.log_path();
    let log_file = File::create(&log_path)?;
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .target(env_logger::Target::Pipe(Box::new(log_file)))
        .init();
    log::info!(
        "starting with config from {} (trigger {:?}, query until cursor: {})",
        config_path.display(),
        config.trigger,
        config.query_until_cursor
    );

    let mut app = App::new(&config)?;

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        log::error!("{err:?}");
        println!("{err:?}");
    }

    Ok(())
}

fn run_app<B: ratatui::backend::Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<()>
where
    B::Error: Send + Sync + 'static,
{
    loop {
        terminal.draw(|f| ui(f, app))?;

        if let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
        {
            match key.code {
                KeyCode::Esc => return Ok(()),
                KeyCode::Char(c) => app.apply(Cmd::insert(c.to_string())),
                KeyCode::Backspace => app.apply(Cmd::DeleteBackward),
                KeyCode::Left => app.apply(Cmd::MoveLeft),
                KeyCode::Right => app.apply(Cmd::MoveRight),
                KeyCode::Enter => app.apply(Cmd::SplitBlock),
                _ => {}
            }
        }
    }
}

fn ui(f: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([Constraint::Min(3), Constraint::Length(1)].as_ref())
        .split(f.area());

    let editor_block = Block::default().borders(Borders::ALL).title("Editor");
    let inner = editor_block.inner(chunks[0]);
    app.set_editor_area(inner);

    f.render_widget(Paragraph::new(app.editor_lines()).block(editor_block), chunks[0]);

    if let Some((row, col)) = app.cursor_cell() {
        let x = inner.x.saturating_add(col as u16);
        let y = inner.y.saturating_add(row as u16);
        if y < inner.bottom() {
            f.set_cursor_position((x, y));
        }
    }

    let trigger = app.session.trigger();
    let help_text = Line::from(vec![
        Span::raw("Esc: Quit | "),
        Span::raw(format!("type {trigger} to mention | ")),
        Span::raw("←/→: Move | Enter: New block"),
    ]);
    f.render_widget(Paragraph::new(vec![help_text]), chunks[1]);

    render_overlay(f, app);
}

fn render_overlay(f: &mut Frame, app: &App) {
    let overlay = app.session.overlay();
    if !overlay.is_visible() {
        return;
    }

    let items: Vec<ListItem> = if app.filter.is_empty() {
        let hint = if without_trigger(&overlay.query, app.session.trigger()).is_empty() {
            "type to search"
        } else {
            "no matches"
        };
        vec![ListItem::new(Span::styled(
            hint,
            Style::default().fg(Color::DarkGray),
        ))]
    } else {
        app.filter
            .matches()
            .map(|name| ListItem::new(Line::from(name.to_string())))
            .collect()
    };

    let widest = app
        .filter
        .matches()
        .map(|name| name.chars().count() as u16)
        .max()
        .unwrap_or(0);
    let frame = f.area();
    let x = (overlay.left.max(0.0) as u16).min(frame.right().saturating_sub(1));
    let y = (overlay.top.max(0.0) as u16).min(frame.bottom().saturating_sub(1));
    let area = Rect {
        x,
        y,
        width: (widest + 2).max(MIN_OVERLAY_WIDTH),
        height: items.len() as u16 + 2,
    }
    .intersection(frame);

    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .title(overlay.query.clone())
            .style(Style::default().bg(Color::Black).fg(Color::Yellow)),
    );

    f.render_widget(Clear, area);
    f.render_widget(list, area);
}
