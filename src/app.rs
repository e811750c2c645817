use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::{Position, Rect};
use tracing::{debug, warn};

use crate::kanban_board::{DropPayload, KanbanBoard};
use crate::render::{BoardView, Card};
use crate::store::TaskStore;
use crate::task::{NewTask, Status};
use crate::ui::{layout_board, BoardLayout};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Title,
    Description,
    DueDate,
}

impl FormField {
    fn next(self) -> Self {
        match self {
            FormField::Title => FormField::Description,
            FormField::Description => FormField::DueDate,
            FormField::DueDate => FormField::Title,
        }
    }

    fn prev(self) -> Self {
        match self {
            FormField::Title => FormField::DueDate,
            FormField::Description => FormField::Title,
            FormField::DueDate => FormField::Description,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskForm {
    pub title: String,
    pub description: String,
    pub due_date: String,
    pub field: FormField,
}

impl Default for TaskForm {
    fn default() -> Self {
        Self {
            title: String::new(),
            description: String::new(),
            due_date: String::new(),
            field: FormField::Title,
        }
    }
}

impl TaskForm {
    fn input_mut(&mut self) -> &mut String {
        match self.field {
            FormField::Title => &mut self.title,
            FormField::Description => &mut self.description,
            FormField::DueDate => &mut self.due_date,
        }
    }
}

/// What the app is currently doing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    /// Board navigation, dragging
    Normal,
    /// Filling in a new task
    AddForm(TaskForm),
}

/// A card being dragged with the mouse. The stored task is untouched until
/// the button is released over a lane.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Drag {
    pub task_id: String,
    /// Where the card sits on the board; the ghost copies its size.
    pub origin: Rect,
    /// Pointer offset inside the card at grab time.
    pub grab: (u16, u16),
    pub pointer: (u16, u16),
}

impl Drag {
    /// Ghost rectangle following the pointer, clamped into `bounds`.
    pub fn ghost(&self, bounds: Rect) -> Rect {
        let width = self.origin.width.min(bounds.width);
        let height = self.origin.height.min(bounds.height);
        let max_x = bounds.right().saturating_sub(width);
        let max_y = bounds.bottom().saturating_sub(height);
        let x = self.pointer.0.saturating_sub(self.grab.0).clamp(bounds.x, max_x.max(bounds.x));
        let y = self.pointer.1.saturating_sub(self.grab.1).clamp(bounds.y, max_y.max(bounds.y));
        Rect::new(x, y, width, height)
    }
}

pub struct App<S: TaskStore> {
    board: KanbanBoard<S>,
    mode: Mode,
    active_lane: usize,
    selected: [usize; 3],
    drag: Option<Drag>,
    layout: BoardLayout,
    status_message: Option<String>,
    should_quit: bool,
}

impl<S: TaskStore> App<S> {
    pub fn new(board: KanbanBoard<S>) -> Self {
        Self {
            board,
            mode: Mode::Normal,
            active_lane: 0,
            selected: [0; 3],
            drag: None,
            layout: BoardLayout::default(),
            status_message: None,
            should_quit: false,
        }
    }

    pub fn board(&self) -> &KanbanBoard<S> {
        &self.board
    }

    pub fn view(&self) -> &BoardView {
        self.board.view()
    }

    pub fn mode(&self) -> &Mode {
        &self.mode
    }

    pub fn active_lane(&self) -> usize {
        self.active_lane
    }

    pub fn selected(&self) -> &[usize; 3] {
        &self.selected
    }

    pub fn drag(&self) -> Option<&Drag> {
        self.drag.as_ref()
    }

    pub fn status_message(&self) -> Option<&str> {
        self.status_message.as_deref()
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub fn layout(&self) -> &BoardLayout {
        &self.layout
    }

    /// Recomputes card and lane geometry for `area`. Called on every draw.
    pub fn relayout(&mut self, area: Rect) {
        self.layout = layout_board(area, self.board.view(), &self.selected);
    }

    pub fn selected_card(&self) -> Option<&Card> {
        let lane = self.board.view().lanes.get(self.active_lane)?;
        lane.cards.get(self.selected[self.active_lane])
    }

    fn select_card(&mut self, id: &str) {
        for (idx, lane) in self.board.view().lanes.iter().enumerate() {
            if let Some(pos) = lane.cards.iter().position(|c| c.id == id) {
                self.active_lane = idx;
                self.selected[idx] = pos;
                return;
            }
        }
    }

    fn clamp_selection(&mut self) {
        for (idx, lane) in self.board.view().lanes.iter().enumerate() {
            self.selected[idx] = self.selected[idx].min(lane.cards.len().saturating_sub(1));
        }
    }

    fn after_dispatch(&mut self) {
        self.clamp_selection();
        self.status_message = self.board.last_error().map(str::to_string);
    }

    fn delete_task(&mut self, id: String) {
        self.board.delete(id);
        self.after_dispatch();
    }

    fn drop_onto(&mut self, task_id: String, lane_id: &str) {
        match DropPayload::new(task_id.clone(), lane_id) {
            Ok(payload) => {
                self.board.drop_task(payload);
                self.after_dispatch();
                self.select_card(&task_id);
            }
            Err(err) => {
                warn!(error = %err, "ignoring drop");
                self.status_message = Some(err.to_string());
            }
        }
    }

    /// Keyboard equivalent of dragging the selected card one lane over.
    fn shift_selected(&mut self, step: isize) {
        let Some(card) = self.selected_card() else {
            return;
        };
        let id = card.id.clone();
        let target = (self.active_lane as isize + step)
            .clamp(0, Status::LANES.len() as isize - 1) as usize;
        if target == self.active_lane {
            return;
        }
        self.drop_onto(id, Status::LANES[target].as_str());
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return;
        }
        match self.mode {
            Mode::Normal => self.handle_normal_key(key),
            Mode::AddForm(_) => self.handle_form_key(key),
        }
    }

    fn handle_normal_key(&mut self, key: KeyEvent) {
        self.status_message = None;
        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('a') => {
                self.drag = None;
                self.mode = Mode::AddForm(TaskForm::default());
            }
            KeyCode::Char('h') | KeyCode::Left => {
                self.active_lane = self.active_lane.saturating_sub(1);
            }
            KeyCode::Char('l') | KeyCode::Right => {
                if self.active_lane + 1 < Status::LANES.len() {
                    self.active_lane += 1;
                }
            }
            KeyCode::Char('j') | KeyCode::Down => {
                let len = self.board.view().lanes[self.active_lane].cards.len();
                let current = &mut self.selected[self.active_lane];
                if *current + 1 < len {
                    *current += 1;
                }
            }
            KeyCode::Char('k') | KeyCode::Up => {
                let current = &mut self.selected[self.active_lane];
                *current = current.saturating_sub(1);
            }
            KeyCode::Char('H') | KeyCode::Char('<') => self.shift_selected(-1),
            KeyCode::Char('L') | KeyCode::Char('>') => self.shift_selected(1),
            KeyCode::Char('d') | KeyCode::Delete => {
                if let Some(id) = self.selected_card().map(|c| c.id.clone()) {
                    self.delete_task(id);
                }
            }
            KeyCode::Esc => self.drag = None,
            _ => {}
        }
    }

    fn handle_form_key(&mut self, key: KeyEvent) {
        let Mode::AddForm(form) = &mut self.mode else {
            return;
        };
        match key.code {
            KeyCode::Esc => {
                self.drag = None;
                self.mode = Mode::Normal;
            }
            KeyCode::Tab | KeyCode::Down => form.field = form.field.next(),
            KeyCode::BackTab | KeyCode::Up => form.field = form.field.prev(),
            KeyCode::Backspace => {
                form.input_mut().pop();
            }
            KeyCode::Char(c)
                if !key
                    .modifiers
                    .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) =>
            {
                form.input_mut().push(c)
            }
            KeyCode::Enter => {
                let form = std::mem::take(form);
                self.drag = None;
                self.mode = Mode::Normal;
                let id = self
                    .board
                    .add(NewTask::new(form.title, form.description, form.due_date));
                self.after_dispatch();
                self.select_card(&id);
            }
            _ => {}
        }
    }

    pub fn handle_mouse(&mut self, mouse: MouseEvent) {
        if self.mode != Mode::Normal {
            return;
        }
        let pos = Position::new(mouse.column, mouse.row);
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                // Any drag whose release was never seen ends here.
                self.drag = None;
                if let Some(hit) = self.layout.delete_at(pos) {
                    let id = hit.id.clone();
                    self.delete_task(id);
                } else if let Some(hit) = self.layout.card_at(pos) {
                    let (id, area) = (hit.id.clone(), hit.area);
                    self.select_card(&id);
                    debug!(task_id = %id, "drag start");
                    self.drag = Some(Drag {
                        task_id: id,
                        origin: area,
                        grab: (pos.x - area.x, pos.y - area.y),
                        pointer: (pos.x, pos.y),
                    });
                } else if let Some(idx) = self.layout.lane_at(pos) {
                    self.active_lane = idx;
                }
            }
            MouseEventKind::Drag(MouseButton::Left) => {
                if let Some(drag) = &mut self.drag {
                    drag.pointer = (pos.x, pos.y);
                }
            }
            MouseEventKind::Up(MouseButton::Left) => {
                let Some(drag) = self.drag.take() else {
                    return;
                };
                // Released outside every lane: nothing changes.
                if let Some(idx) = self.layout.lane_at(pos) {
                    let lane_id = self.layout.lanes[idx].status.as_str().to_string();
                    self.drop_onto(drag.task_id, &lane_id);
                }
            }
            _ => {}
        }
    }
}
