use std::io::{Stdout, stdout};
use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
};

use crate::app::{App, InputMode};
use crate::domain::todo::{Filter, Priority, Todo};

pub fn run(mut app: App, tick_rate: Duration) -> Result<()> {
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut last_tick = Instant::now();
    let res = loop {
        terminal.draw(|f| draw(f, &app))?;

        let timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or_else(|| Duration::from_secs(0));

        if event::poll(timeout)?
            && let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
            && handle_key(&mut app, key.code)
        {
            break Ok(());
        }

        if last_tick.elapsed() >= tick_rate {
            last_tick = Instant::now();
        }
    };

    cleanup_terminal(&mut terminal)?;
    res
}

fn handle_key(app: &mut App, code: KeyCode) -> bool {
    match app.mode {
        InputMode::Normal => match code {
            KeyCode::Char('q') => return true,
            KeyCode::Char('j') | KeyCode::Down => app.select_next(),
            KeyCode::Char('k') | KeyCode::Up => app.select_previous(),
            KeyCode::Char('a') | KeyCode::Char('n') => app.begin_add(),
            KeyCode::Char('e') => app.begin_edit_selected(),
            KeyCode::Enter | KeyCode::Char(' ') => app.toggle_selected(),
            KeyCode::Char('d') | KeyCode::Delete => app.delete_selected(),
            KeyCode::Char('c') => app.clear_completed(),
            KeyCode::Char('A') => app.toggle_all(),
            KeyCode::Char('f') => app.cycle_filter(),
            KeyCode::Char('1') => app.set_filter(Filter::All),
            KeyCode::Char('2') => app.set_filter(Filter::Active),
            KeyCode::Char('3') => app.set_filter(Filter::Completed),
            _ => {}
        },
        InputMode::Adding | InputMode::Editing(_) => match code {
            KeyCode::Esc => app.cancel_input(),
            KeyCode::Enter => app.submit_input(),
            KeyCode::Tab if app.mode == InputMode::Adding => app.cycle_pending_priority(),
            KeyCode::Backspace => {
                app.input.pop();
            }
            KeyCode::Char(c) => app.input.push(c),
            _ => {}
        },
    }

    false
}

fn draw(f: &mut ratatui::Frame, app: &App) {
    let size = f.area();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(3),
        ])
        .split(size);

    let header = render_header(app);
    f.render_widget(header, chunks[0]);

    let visible = app.store.visible();
    let mut list_state = ListState::default();
    if !visible.is_empty() {
        list_state.select(Some(app.selected));
    }

    let list = render_list(&visible, app.selected);
    f.render_stateful_widget(list, chunks[1], &mut list_state);

    let footer = render_footer(app);
    f.render_widget(footer, chunks[2]);
}

fn render_header(app: &App) -> Paragraph<'static> {
    let stats = app.store.stats();
    let summary = format!(
        "Open: {} / Done: {} / All: {}",
        stats.active, stats.completed, stats.total
    );
    let line = Line::from(vec![
        Span::styled("tsugi - todo", Style::default().fg(Color::Cyan)),
        Span::raw("  |  "),
        Span::styled(summary, Style::default().fg(Color::Yellow)),
        Span::raw("  |  "),
        Span::styled(
            format!("view: {}", app.store.filter().label()),
            Style::default().fg(Color::Magenta),
        ),
    ]);
    Paragraph::new(line)
        .block(Block::default().title("Overview").borders(Borders::ALL))
        .wrap(Wrap { trim: true })
}

fn priority_style(priority: Priority) -> Style {
    match priority {
        Priority::High => Style::default().fg(Color::Red),
        Priority::Medium => Style::default().fg(Color::Yellow),
        Priority::Low => Style::default().fg(Color::Blue),
    }
}

fn render_list<'a>(todos: &[&'a Todo], selected: usize) -> List<'a> {
    let items: Vec<ListItem> = todos
        .iter()
        .enumerate()
        .map(|(idx, todo)| {
            let symbol = if todo.completed { "✔" } else { "•" };
            let line = vec![
                Span::raw(format!(" {symbol} ")),
                Span::styled(
                    format!("[{}]", todo.priority.label()),
                    priority_style(todo.priority),
                ),
                Span::raw(format!(" {}", todo.text)),
            ];

            let style = if idx == selected {
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD | Modifier::REVERSED)
            } else if todo.completed {
                Style::default()
                    .fg(Color::DarkGray)
                    .add_modifier(Modifier::CROSSED_OUT)
            } else {
                Style::default()
            };

            ListItem::new(Line::from(line)).style(style)
        })
        .collect();

    List::new(items)
        .block(
            Block::default()
                .title("Todos (j/k move ; a add ; e edit ; Space toggle ; d delete ; c clear done ; A toggle all ; f filter)")
                .borders(Borders::ALL),
        )
        .highlight_symbol("➤ ")
}

fn render_footer(app: &App) -> Paragraph<'_> {
    match app.mode {
        InputMode::Normal => {
            let msg = app
                .status
                .as_deref()
                .unwrap_or("q quit ; a add ; e edit ; c clear done ; 1/2/3 filter");
            Paragraph::new(msg).block(Block::default().title("Normal").borders(Borders::ALL))
        }
        InputMode::Adding => {
            let line = Line::from(vec![
                Span::raw("New task: "),
                Span::styled(&app.input, Style::default().fg(Color::Yellow)),
                Span::raw("█  "),
                Span::styled(
                    format!("[{}]", app.pending_priority.label()),
                    priority_style(app.pending_priority),
                ),
            ]);
            Paragraph::new(line).block(
                Block::default()
                    .title("Input (Enter to add / Tab priority / Esc to cancel)")
                    .borders(Borders::ALL),
            )
        }
        InputMode::Editing(_) => {
            let line = Line::from(vec![
                Span::raw("Edit task: "),
                Span::styled(&app.input, Style::default().fg(Color::Yellow)),
                Span::raw("█"),
            ]);
            Paragraph::new(line).block(
                Block::default()
                    .title("Input (Enter to save / Esc to cancel)")
                    .borders(Borders::ALL),
            )
        }
    }
}

fn cleanup_terminal(terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}
