//! Draws wizard views with ratatui and feeds key presses back into the wizard.

use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame, Terminal,
};
use std::io;

use crate::config::UserConfiguration;
use crate::wizard::select::ChoiceOption;
use crate::wizard::view::{Body, View};
use crate::wizard::{Input, Status, Wizard};

/// Run the wizard in the alternate screen until it finishes or is cancelled.
pub fn run(mut wizard: Wizard) -> Result<Option<UserConfiguration>> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let outcome = event_loop(&mut terminal, &mut wizard);

    // Restore terminal even if the loop failed
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    outcome
}

fn event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    wizard: &mut Wizard,
) -> Result<Option<UserConfiguration>> {
    loop {
        let view = wizard.view();
        let platform = wizard.platform().map(str::to_string);
        terminal.draw(|frame| render(frame, &view, platform.as_deref()))?;

        // Blocks until the next key; nothing else runs meanwhile
        let Event::Key(key) = event::read()? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }

        if is_interrupt(&key) {
            return Ok(None);
        }

        let Some(input) = map_key(key.code) else {
            continue;
        };

        match wizard.handle(input) {
            Status::Running => {}
            Status::Finished(config) => return Ok(Some(config)),
            Status::Cancelled => return Ok(None),
        }
    }
}

fn is_interrupt(key: &KeyEvent) -> bool {
    key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c')
}

fn map_key(code: KeyCode) -> Option<Input> {
    let input = match code {
        KeyCode::Up => Input::Up,
        KeyCode::Down => Input::Down,
        KeyCode::Left => Input::Left,
        KeyCode::Right => Input::Right,
        KeyCode::Enter => Input::Enter,
        KeyCode::Esc => Input::Back,
        KeyCode::Backspace => Input::Backspace,
        KeyCode::Char(c) => Input::Char(c),
        _ => return None,
    };
    Some(input)
}

fn render(frame: &mut Frame, view: &View, platform: Option<&str>) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(3), // Title
            Constraint::Length(3), // Question
            Constraint::Min(6),    // Body
            Constraint::Length(1), // Help
        ])
        .split(frame.area());

    let mut header = vec![Span::styled(
        format!("rigup • {} ", view.title),
        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
    )];
    header.push(Span::styled(
        format!("({}/{})", view.step_number, view.step_count),
        Style::default().fg(Color::DarkGray),
    ));
    if let Some(platform) = platform {
        header.push(Span::styled(
            format!("  {}", platform),
            Style::default().fg(Color::DarkGray),
        ));
    }
    frame.render_widget(
        Paragraph::new(Line::from(header)).block(Block::default().borders(Borders::BOTTOM)),
        chunks[0],
    );

    frame.render_widget(
        Paragraph::new(view.question.as_str()).style(Style::default().add_modifier(Modifier::BOLD)),
        chunks[1],
    );

    render_body(frame, &view.body, chunks[2]);

    frame.render_widget(
        Paragraph::new(view.help).style(Style::default().fg(Color::DarkGray)),
        chunks[3],
    );
}

fn render_body(frame: &mut Frame, body: &Body, area: Rect) {
    match body {
        Body::Single { options, cursor } => {
            let items = options
                .iter()
                .enumerate()
                .map(|(i, opt)| option_item(opt, i == *cursor, None))
                .collect::<Vec<_>>();
            render_list(frame, items, *cursor, area);
        }
        Body::Multi {
            options,
            checked,
            cursor,
        } => {
            let items = options
                .iter()
                .zip(checked)
                .enumerate()
                .map(|(i, (opt, on))| option_item(opt, i == *cursor, Some(*on)))
                .collect::<Vec<_>>();
            render_list(frame, items, *cursor, area);
        }
        Body::Text {
            value,
            cursor,
            placeholder,
        } => {
            let line = if value.is_empty() {
                Line::from(Span::styled(
                    placeholder.as_str(),
                    Style::default().fg(Color::DarkGray),
                ))
            } else {
                Line::from(value.as_str())
            };
            let input = Paragraph::new(line).block(Block::default().borders(Borders::ALL).title("Path"));
            frame.render_widget(input, area);
            let x = area.x + 1 + (*cursor).min(area.width.saturating_sub(3) as usize) as u16;
            frame.set_cursor_position((x, area.y + 1));
        }
        Body::Toggles(toggles) => {
            let lines = toggles
                .iter()
                .map(|t| {
                    let mark = if t.enabled { "[✓]" } else { "[ ]" };
                    let style = if t.enabled {
                        Style::default().fg(Color::Green)
                    } else {
                        Style::default()
                    };
                    Line::from(vec![
                        Span::styled(format!("{} ", t.key), Style::default().fg(Color::Yellow)),
                        Span::styled(mark, style),
                        Span::raw(format!(" {}", t.label)),
                    ])
                })
                .collect::<Vec<_>>();
            frame.render_widget(
                Paragraph::new(lines).block(Block::default().borders(Borders::ALL)),
                area,
            );
        }
        Body::Summary(rows) => {
            let lines = rows
                .iter()
                .map(|(label, value)| {
                    Line::from(vec![
                        Span::styled(format!("{:<18}", label), Style::default().fg(Color::Gray)),
                        Span::styled(value.as_str(), Style::default().fg(Color::Green)),
                    ])
                })
                .collect::<Vec<_>>();
            frame.render_widget(
                Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title("Summary")),
                area,
            );
        }
        Body::Done => {}
    }
}

fn option_item(option: &ChoiceOption, highlighted: bool, checked: Option<bool>) -> ListItem<'static> {
    let style = if highlighted {
        Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
    } else {
        Style::default()
    };
    let prefix = if highlighted { "▶ " } else { "  " };

    let mut spans = vec![Span::raw(prefix)];
    if let Some(on) = checked {
        spans.push(Span::styled(if on { "[✓] " } else { "[ ] " }, style));
    }
    spans.push(Span::styled(option.id.clone(), style));
    spans.push(Span::styled(
        format!("  {}", option.description),
        Style::default().fg(Color::DarkGray),
    ));

    ListItem::new(Line::from(spans))
}

fn render_list(frame: &mut Frame, items: Vec<ListItem<'static>>, cursor: usize, area: Rect) {
    let mut state = ListState::default();
    state.select(Some(cursor));

    let list = List::new(items).block(Block::default().borders(Borders::ALL));
    frame.render_stateful_widget(list, area, &mut state);
}
