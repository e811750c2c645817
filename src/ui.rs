use std::io;

use crossterm::event::{self, Event, KeyEventKind};
use ratatui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout, Position, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame, Terminal,
};

use crate::app::{App, FormField, Mode, TaskForm};
use crate::render::{BoardView, Card, Emphasis};
use crate::store::TaskStore;
use crate::task::Status;

/// Border, description, due date, delete control, border.
pub const CARD_HEIGHT: u16 = 5;
const DELETE_LABEL: &str = "[ Delete ]";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaneArea {
    pub status: Status,
    pub area: Rect,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardArea {
    pub id: String,
    pub lane: usize,
    pub area: Rect,
    pub delete: Rect,
}

/// Screen geometry of the last drawn board, used for mouse hit-testing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BoardLayout {
    pub header: Rect,
    pub footer: Rect,
    pub lanes: Vec<LaneArea>,
    pub cards: Vec<CardArea>,
}

impl BoardLayout {
    pub fn lane_at(&self, pos: Position) -> Option<usize> {
        self.lanes.iter().position(|lane| lane.area.contains(pos))
    }

    pub fn card_at(&self, pos: Position) -> Option<&CardArea> {
        self.cards.iter().find(|card| card.area.contains(pos))
    }

    pub fn delete_at(&self, pos: Position) -> Option<&CardArea> {
        self.cards.iter().find(|card| card.delete.contains(pos))
    }

    pub fn card_area(&self, id: &str) -> Option<Rect> {
        self.cards.iter().find(|card| card.id == id).map(|card| card.area)
    }
}

fn split_screen(area: Rect) -> (Rect, Rect, Rect) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(area);
    (rows[0], rows[1], rows[2])
}

/// Places lanes side by side and stacks cards inside each lane, scrolled so
/// the selected card stays visible.
pub fn layout_board(area: Rect, view: &BoardView, selected: &[usize; 3]) -> BoardLayout {
    let (header, board, footer) = split_screen(area);
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(vec![
            Constraint::Percentage(33),
            Constraint::Percentage(33),
            Constraint::Percentage(34),
        ])
        .split(board);

    let mut layout = BoardLayout {
        header,
        footer,
        ..BoardLayout::default()
    };

    for (idx, (lane, column)) in view.lanes.iter().zip(columns.iter()).enumerate() {
        layout.lanes.push(LaneArea {
            status: lane.status.clone(),
            area: *column,
        });

        let inner = Block::default().borders(Borders::ALL).inner(*column);
        let visible = (inner.height / CARD_HEIGHT) as usize;
        if visible == 0 || inner.width < 3 {
            continue;
        }
        let offset = (selected[idx] + 1).saturating_sub(visible);

        for (slot, card) in lane.cards.iter().skip(offset).take(visible).enumerate() {
            let area = Rect::new(
                inner.x,
                inner.y + slot as u16 * CARD_HEIGHT,
                inner.width,
                CARD_HEIGHT,
            );
            let delete = Rect::new(
                area.x + 1,
                area.y + 3,
                (DELETE_LABEL.len() as u16).min(area.width - 2),
                1,
            );
            layout.cards.push(CardArea {
                id: card.id.clone(),
                lane: idx,
                area,
                delete,
            });
        }
    }

    layout
}

fn card_style(emphasis: Emphasis) -> Style {
    match emphasis {
        Emphasis::DueToday => Style::default().bg(Color::Yellow).fg(Color::White),
        Emphasis::Overdue => Style::default().bg(Color::Red).fg(Color::White),
        Emphasis::None => Style::default(),
    }
}

fn delete_style(emphasis: Emphasis) -> Style {
    match emphasis {
        // Lighter control on red cards.
        Emphasis::Overdue => Style::default()
            .fg(Color::White)
            .bg(Color::LightRed)
            .add_modifier(Modifier::BOLD),
        _ => Style::default().fg(Color::White).bg(Color::Red),
    }
}

fn draw_card(frame: &mut Frame, card: &Card, area: Rect, selected: bool, ghost: bool) {
    let base = card_style(card.emphasis);
    let mut border = if selected {
        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
    } else {
        base
    };
    let mut body = base;
    if ghost {
        border = border.add_modifier(Modifier::DIM);
        body = body.add_modifier(Modifier::DIM);
    }

    let block = Block::default()
        .title(Span::styled(
            card.title.clone(),
            body.add_modifier(Modifier::BOLD),
        ))
        .borders(Borders::ALL)
        .border_style(border)
        .style(body);

    let due = if card.due_date.is_empty() {
        String::new()
    } else {
        match card.emphasis.label() {
            Some(label) => format!("Due: {} ({label})", card.due_date),
            None => format!("Due: {}", card.due_date),
        }
    };

    let lines = vec![
        Line::from(card.description.clone()),
        Line::from(due),
        Line::from(Span::styled(DELETE_LABEL, delete_style(card.emphasis))),
    ];

    if ghost {
        frame.render_widget(Clear, area);
    }
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn draw_form(frame: &mut Frame, form: &TaskForm, area: Rect) {
    let width = area.width.min(60);
    let height = 9u16.min(area.height);
    let popup = Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    );

    let field = |label: &str, value: &str, which: FormField| {
        let style = if form.field == which {
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        };
        let cursor = if form.field == which { "_" } else { "" };
        Line::from(vec![
            Span::styled(format!("{label:<13}"), style),
            Span::raw(format!("{value}{cursor}")),
        ])
    };

    let lines = vec![
        field("Title", &form.title, FormField::Title),
        field("Description", &form.description, FormField::Description),
        field("Due date", &form.due_date, FormField::DueDate),
        Line::from(""),
        Line::from(Span::styled(
            "Due date as DD/MM/YYYY",
            Style::default().fg(Color::DarkGray),
        )),
        Line::from(Span::styled(
            "Tab next field   Enter save   Esc cancel",
            Style::default().fg(Color::DarkGray),
        )),
    ];

    frame.render_widget(Clear, popup);
    frame.render_widget(
        Paragraph::new(lines).block(
            Block::default()
                .title(" New task ")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan)),
        ),
        popup,
    );
}

pub fn draw<S: TaskStore>(frame: &mut Frame, app: &mut App<S>) {
    let area = frame.area();
    app.relayout(area);
    let layout = app.layout().clone();
    let view = app.view();

    frame.render_widget(
        Paragraph::new(Line::from(vec![
            Span::styled(" Task Board ", Style::default().add_modifier(Modifier::BOLD)),
            Span::styled(
                " a add  d delete  h/l lane  j/k card  H/L move  drag to move  q quit",
                Style::default().fg(Color::DarkGray),
            ),
        ])),
        layout.header,
    );

    for (idx, (lane_area, lane)) in layout.lanes.iter().zip(view.lanes.iter()).enumerate() {
        let border_style = if app.active_lane() == idx {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default()
        };
        frame.render_widget(
            Block::default()
                .title(format!(" {} ({}) ", lane.status.display_name(), lane.cards.len()))
                .borders(Borders::ALL)
                .border_style(border_style),
            lane_area.area,
        );
    }

    let selected_id = app.selected_card().map(|c| c.id.clone());
    for hit in &layout.cards {
        if let Some(card) = view.lanes[hit.lane].cards.iter().find(|c| c.id == hit.id) {
            let selected = selected_id.as_deref() == Some(card.id.as_str());
            draw_card(frame, card, hit.area, selected, false);
        }
    }

    if let Some(drag) = app.drag() {
        if let Some((_, card)) = view.card(&drag.task_id) {
            draw_card(frame, card, drag.ghost(area), false, true);
        }
    }

    let footer = match app.status_message() {
        Some(message) => Line::from(Span::styled(
            message.to_string(),
            Style::default().fg(Color::Red),
        )),
        None => Line::from(Span::styled(
            format!("{} tasks", view.card_count()),
            Style::default().fg(Color::DarkGray),
        )),
    };
    frame.render_widget(Paragraph::new(footer), layout.footer);

    if let Mode::AddForm(form) = app.mode() {
        draw_form(frame, form, area);
    }
}

pub fn run_app<B: Backend, S: TaskStore>(
    terminal: &mut Terminal<B>,
    app: &mut App<S>,
) -> io::Result<()> {
    loop {
        terminal.draw(|f| draw(f, app))?;
        if app.should_quit() {
            return Ok(());
        }

        match event::read()? {
            Event::Key(key) if key.kind == KeyEventKind::Press => app.handle_key(key),
            Event::Mouse(mouse) => app.handle_mouse(mouse),
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kanban_board::KanbanBoard;
    use crate::render::render;
    use crate::store::MemoryStore;
    use crate::task::{NewTask, Task};
    use chrono::NaiveDate;
    use ratatui::backend::TestBackend;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 15).unwrap()
    }

    fn tasks(n: usize, status: Status) -> Vec<Task> {
        (0..n)
            .map(|i| {
                let mut t = NewTask::new(format!("T{i}"), "", "").into_task();
                t.status = status.clone();
                t
            })
            .collect()
    }

    fn screen_text(terminal: &Terminal<TestBackend>) -> String {
        let buffer = terminal.backend().buffer();
        let mut text = String::new();
        for y in 0..buffer.area.height {
            for x in 0..buffer.area.width {
                text.push_str(buffer[(x, y)].symbol());
            }
            text.push('\n');
        }
        text
    }

    #[test]
    fn lanes_fill_the_board_below_header() {
        let view = render(&[], today());
        let layout = layout_board(Rect::new(0, 0, 90, 30), &view, &[0; 3]);
        assert_eq!(layout.lanes.len(), 3);
        assert_eq!(layout.header, Rect::new(0, 0, 90, 1));
        assert_eq!(layout.lanes[0].area.y, 1);
        assert_eq!(layout.lanes[0].status, Status::Todo);
        assert_eq!(layout.lanes[2].status, Status::Done);
        assert_eq!(layout.lane_at(Position::new(89, 10)), Some(2));
        assert_eq!(layout.lane_at(Position::new(10, 0)), None);
    }

    #[test]
    fn cards_stack_inside_their_lane() {
        let view = render(&tasks(2, Status::InProgress), today());
        let layout = layout_board(Rect::new(0, 0, 90, 30), &view, &[0; 3]);
        assert_eq!(layout.cards.len(), 2);
        let lane = layout.lanes[1].area;
        let first = layout.cards[0].area;
        let second = layout.cards[1].area;
        assert_eq!(layout.cards[0].lane, 1);
        assert_eq!(first.x, lane.x + 1);
        assert_eq!(first.y, lane.y + 1);
        assert_eq!(second.y, first.y + CARD_HEIGHT);
        assert!(first.contains(Position::new(layout.cards[0].delete.x, layout.cards[0].delete.y)));
    }

    #[test]
    fn selection_scrolls_overflowing_lane() {
        let view = render(&tasks(10, Status::Todo), today());
        // 28 board rows, 26 inside borders: five cards fit.
        let layout = layout_board(Rect::new(0, 0, 90, 30), &view, &[7, 0, 0]);
        assert_eq!(layout.cards.len(), 5);
        assert_eq!(layout.cards[0].id, view.lanes[0].cards[3].id);
        assert_eq!(layout.cards[4].id, view.lanes[0].cards[7].id);
    }

    #[test]
    fn draws_cards_with_title_and_due_label() {
        let store = MemoryStore::new();
        let mut board = KanbanBoard::with_clock(store, today);
        board.add(NewTask::new("Pay rent", "monthly", "10/06/2024"));
        let mut app = App::new(board);

        let mut terminal = Terminal::new(TestBackend::new(120, 30)).unwrap();
        terminal.draw(|f| draw(f, &mut app)).unwrap();
        let text = screen_text(&terminal);

        assert!(text.contains("To Do (1)"));
        assert!(text.contains("In Progress (0)"));
        assert!(text.contains("Pay rent"));
        assert!(text.contains("monthly"));
        assert!(text.contains("(overdue)"));
        assert!(text.contains(DELETE_LABEL));
    }

    #[test]
    fn overdue_card_is_painted_red() {
        let mut board = KanbanBoard::with_clock(MemoryStore::new(), today);
        board.add(NewTask::new("Late", "", "01/06/2024"));
        let mut app = App::new(board);

        let mut terminal = Terminal::new(TestBackend::new(90, 30)).unwrap();
        terminal.draw(|f| draw(f, &mut app)).unwrap();
        let card = app.layout().cards[0].area;
        let buffer = terminal.backend().buffer();
        assert_eq!(buffer[(card.x + 2, card.y + 2)].bg, Color::Red);
    }
}
