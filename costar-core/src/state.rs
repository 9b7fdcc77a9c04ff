use crate::model::PickerId;
use crate::render::RenderedPath;
use crate::selection::{SelectionState, SelectionTable};
use crate::submission::{ErrorKind, SubmissionPhase};

/// Query text, results table and search bookkeeping for one picker
#[derive(Clone, Debug, Default)]
pub struct PickerState {
    pub query: String,
    pub table: SelectionTable,
    /// Cursor row in the table (not the same as the active row)
    pub cursor: usize,
    /// Generation of the most recent search issued for this picker
    pub issued_generation: u64,
    /// Generation of the results currently shown in the table
    pub applied_generation: u64,
}

impl PickerState {
    pub fn cursor_up(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn cursor_down(&mut self) {
        if self.cursor + 1 < self.table.len() {
            self.cursor += 1;
        }
    }
}

/// Loading indicator, results list and error message below the pickers
#[derive(Clone, Debug, Default)]
pub struct ResultsPanel {
    pub loading: bool,
    pub results_visible: bool,
    pub path: RenderedPath,
    pub error_visible: bool,
    pub error: Option<(ErrorKind, String)>,
    pub scroll: usize,
    /// Bring the results into view once the next frame has been laid out
    pub scroll_pending: bool,
}

impl ResultsPanel {
    pub fn scroll_up(&mut self, lines: usize) {
        self.scroll = self.scroll.saturating_sub(lines);
    }

    pub fn scroll_down(&mut self, lines: usize) {
        let max = self.path.len().saturating_sub(1);
        self.scroll = (self.scroll + lines).min(max);
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Focus {
    Query(PickerId),
    Table(PickerId),
    Results,
}

impl Default for Focus {
    fn default() -> Self {
        Focus::Query(PickerId::First)
    }
}

impl Focus {
    pub fn next(self) -> Self {
        match self {
            Focus::Query(PickerId::First) => Focus::Table(PickerId::First),
            Focus::Table(PickerId::First) => Focus::Query(PickerId::Second),
            Focus::Query(PickerId::Second) => Focus::Table(PickerId::Second),
            Focus::Table(PickerId::Second) => Focus::Results,
            Focus::Results => Focus::Query(PickerId::First),
        }
    }

    pub fn prev(self) -> Self {
        match self {
            Focus::Query(PickerId::First) => Focus::Results,
            Focus::Table(PickerId::First) => Focus::Query(PickerId::First),
            Focus::Query(PickerId::Second) => Focus::Table(PickerId::First),
            Focus::Table(PickerId::Second) => Focus::Query(PickerId::Second),
            Focus::Results => Focus::Table(PickerId::Second),
        }
    }

    pub fn picker(self) -> Option<PickerId> {
        match self {
            Focus::Query(p) | Focus::Table(p) => Some(p),
            Focus::Results => None,
        }
    }
}

#[derive(Debug, Default)]
pub struct AppState {
    pub pickers: [PickerState; 2],
    pub selections: SelectionState,
    pub panel: ResultsPanel,
    pub phase: SubmissionPhase,
    pub focus: Focus,
    pub last_event_id: u64,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn picker(&self, id: PickerId) -> &PickerState {
        &self.pickers[id.index()]
    }

    pub fn picker_mut(&mut self, id: PickerId) -> &mut PickerState {
        &mut self.pickers[id.index()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_focus_cycle_round_trips() {
        let mut focus = Focus::default();
        for _ in 0..5 {
            focus = focus.next();
        }
        assert_eq!(focus, Focus::default());
        assert_eq!(Focus::Results.prev(), Focus::Table(PickerId::Second));
        assert_eq!(Focus::Results.picker(), None);
    }

    #[test]
    fn test_results_scroll_clamps() {
        let mut panel = ResultsPanel {
            path: RenderedPath {
                header: String::new(),
                lines: vec!["a".into(), "b".into(), "c".into()],
            },
            ..Default::default()
        };
        panel.scroll_down(10);
        assert_eq!(panel.scroll, 2);
        panel.scroll_up(5);
        assert_eq!(panel.scroll, 0);
    }
}
