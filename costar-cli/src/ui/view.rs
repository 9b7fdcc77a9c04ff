use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Position, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState, Wrap},
};

use costar_core::model::PickerId;
use costar_core::state::{AppState, Focus, PickerState};

use super::styles;

const SPINNER: [&str; 8] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧"];

fn fit_title(s: &str, width: u16) -> String {
    // width includes borders; keep safe margin
    let max = width.saturating_sub(4) as usize;
    if max == 0 {
        return "".into();
    }
    let chars: Vec<char> = s.chars().collect();
    if chars.len() <= max {
        return s.to_string();
    }
    if max <= 1 {
        return "…".into();
    }
    let mut out: String = chars.into_iter().take(max - 1).collect();
    out.push('…');
    out
}

pub fn draw(frame: &mut Frame, state: &AppState, base_url: &str, tick: u64) {
    let outer = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(8),
            Constraint::Percentage(40),
            Constraint::Length(1),
        ])
        .split(frame.area());

    draw_title(frame, outer[0], state, base_url);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(outer[1]);
    for picker in PickerId::ALL {
        draw_picker(frame, columns[picker.index()], state, picker);
    }

    draw_results(frame, outer[2], state, tick);
    draw_footer(frame, outer[3]);
}

fn draw_title(frame: &mut Frame, area: Rect, state: &AppState, base_url: &str) {
    let line = Line::from(vec![
        Span::styled(" costar ", styles::accent_bold()),
        Span::styled(base_url.to_string(), styles::text_muted()),
        Span::raw("  "),
        Span::styled(
            format!("[{}]", state.phase.label()),
            styles::phase(state.phase),
        ),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}

fn draw_picker(frame: &mut Frame, area: Rect, state: &AppState, picker: PickerId) {
    let p = state.picker(picker);
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(3)])
        .split(area);

    let query_focused = state.focus == Focus::Query(picker);
    let label = match picker {
        PickerId::First => " First actor ",
        PickerId::Second => " Second actor ",
    };
    let input = Paragraph::new(p.query.as_str()).style(styles::text()).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(styles::border(query_focused))
            .title(fit_title(label, rows[0].width)),
    );
    frame.render_widget(input, rows[0]);
    if query_focused {
        let x = rows[0].x + 1 + p.query.chars().count() as u16;
        let x = x.min(rows[0].right().saturating_sub(2));
        frame.set_cursor_position(Position::new(x, rows[0].y + 1));
    }

    draw_table(frame, rows[1], p, state, picker);
}

fn draw_table(frame: &mut Frame, area: Rect, p: &PickerState, state: &AppState, picker: PickerId) {
    let focused = state.focus == Focus::Table(picker);
    let chosen = state
        .selections
        .get(picker)
        .map(|id| format!(" selected: {} ", id))
        .unwrap_or_default();

    let rows: Vec<Row> = p
        .table
        .rows()
        .iter()
        .enumerate()
        .map(|(idx, row)| {
            let style = if p.table.active() == Some(idx) {
                styles::selection()
            } else if row.locked {
                styles::locked()
            } else {
                styles::text()
            };
            Row::new(vec![
                Cell::from(row.id.clone()),
                Cell::from(row.display_name.clone()),
                Cell::from(row.birth_year.clone()),
            ])
            .style(style)
        })
        .collect();

    let header = Row::new(vec!["ID", "Name", "Born"]).style(styles::header());
    let title = if p.table.is_empty() && !p.query.trim().is_empty() {
        " No matches ".to_string()
    } else {
        format!(" Results ({}) ", p.table.len())
    };

    let table = Table::new(
        rows,
        [
            Constraint::Length(12),
            Constraint::Min(10),
            Constraint::Length(6),
        ],
    )
    .header(header)
    .row_highlight_style(styles::cursor())
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(styles::border(focused))
            .title(fit_title(&title, area.width))
            .title_bottom(Line::from(Span::styled(chosen, styles::text_muted()))),
    );

    let mut table_state = TableState::default();
    if focused && !p.table.is_empty() {
        table_state.select(Some(p.cursor));
    }
    frame.render_stateful_widget(table, area, &mut table_state);
}

fn draw_results(frame: &mut Frame, area: Rect, state: &AppState, tick: u64) {
    let panel = &state.panel;
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border(state.focus == Focus::Results));

    if panel.loading {
        let spinner = SPINNER[(tick as usize) % SPINNER.len()];
        let body = Paragraph::new(Line::from(vec![
            Span::styled(format!("{} ", spinner), styles::warn()),
            Span::styled("Finding the shortest path…", styles::text()),
        ]))
        .block(block.title(" Searching "));
        frame.render_widget(body, area);
        return;
    }

    if panel.error_visible {
        if let Some((kind, message)) = &panel.error {
            let body = Paragraph::new(Line::from(vec![
                Span::styled(format!("{} ", styles::error_icon(*kind)), styles::error()),
                Span::styled(message.clone(), styles::error()),
            ]))
            .wrap(Wrap { trim: true })
            .block(block.title(" Error "));
            frame.render_widget(body, area);
            return;
        }
    }

    if panel.results_visible {
        let lines: Vec<Line> = panel
            .path
            .lines
            .iter()
            .enumerate()
            .map(|(i, text)| {
                Line::from(vec![
                    Span::styled(format!("{:>3}. ", i + 1), styles::text_muted()),
                    Span::styled(text.clone(), styles::text()),
                ])
            })
            .collect();
        let body = Paragraph::new(lines)
            .wrap(Wrap { trim: false })
            .scroll((panel.scroll as u16, 0))
            .block(block.title(fit_title(&format!(" {} ", panel.path.header), area.width)));
        frame.render_widget(body, area);
        return;
    }

    let hint = Paragraph::new(Line::from(Span::styled(
        "Pick an actor in each table, then press Ctrl-S to find how they are connected.",
        styles::text_muted(),
    )))
    .wrap(Wrap { trim: true })
    .block(block.title(" Path "));
    frame.render_widget(hint, area);
}

fn draw_footer(frame: &mut Frame, area: Rect) {
    let hints = [
        ("Tab", "focus"),
        ("↑↓", "move"),
        ("Enter", "select"),
        ("Ctrl-S", "find path"),
        ("Esc", "quit"),
    ];
    let mut spans = Vec::new();
    for (key, what) in hints {
        spans.push(Span::styled(format!(" {} ", key), styles::key_hint()));
        spans.push(Span::styled(format!("{} ", what), styles::text_muted()));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}
