use crate::model::{ActorId, Candidate, PickerId};
use crate::text::capitalize_words;

/// The chosen actor id for each picker
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SelectionState {
    chosen: [Option<ActorId>; 2],
}

impl SelectionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, picker: PickerId) -> Option<&str> {
        self.chosen[picker.index()].as_deref()
    }

    pub fn set(&mut self, picker: PickerId, id: ActorId) {
        self.chosen[picker.index()] = Some(id);
    }

    /// Both ids, or the pickers that still have nothing selected
    pub fn pair(&self) -> Result<(ActorId, ActorId), Vec<PickerId>> {
        match (self.get(PickerId::First), self.get(PickerId::Second)) {
            (Some(a), Some(b)) => Ok((a.to_string(), b.to_string())),
            _ => Err(PickerId::ALL
                .into_iter()
                .filter(|p| self.get(*p).is_none())
                .collect()),
        }
    }
}

/// A rendered search result row
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TableRow {
    pub id: ActorId,
    pub display_name: String,
    pub birth_year: String,
    /// Set once the row has been selected in the current render pass
    pub locked: bool,
}

impl From<&Candidate> for TableRow {
    fn from(c: &Candidate) -> Self {
        Self {
            id: c.id.clone(),
            display_name: capitalize_words(&c.full_name),
            birth_year: c.birth_year.map(|y| y.to_string()).unwrap_or_default(),
            locked: false,
        }
    }
}

/// Search results for one picker.
///
/// Rows are replaced wholesale on every render. A row may be selected once
/// per render pass; selecting it again before the next render does nothing.
#[derive(Clone, Debug, Default)]
pub struct SelectionTable {
    rows: Vec<TableRow>,
    active: Option<usize>,
}

impl SelectionTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn render(&mut self, candidates: &[Candidate]) {
        self.rows = candidates.iter().map(TableRow::from).collect();
        self.active = None;
    }

    pub fn clear(&mut self) {
        self.render(&[]);
    }

    pub fn rows(&self) -> &[TableRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn active(&self) -> Option<usize> {
        self.active
    }

    /// Select row `index`, moving the active mark and recording its id.
    ///
    /// Returns the id written into `selections`, or `None` if the row does
    /// not exist or is locked for this render pass.
    pub fn select(
        &mut self,
        index: usize,
        picker: PickerId,
        selections: &mut SelectionState,
    ) -> Option<ActorId> {
        let row = self.rows.get_mut(index)?;
        if row.locked {
            return None;
        }
        row.locked = true;
        let id = row.id.clone();

        self.active = Some(index);
        selections.set(picker, id.clone());
        Some(id)
    }
}
