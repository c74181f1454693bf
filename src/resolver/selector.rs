use tracing::debug;

use super::tabular::TabularRow;

#[derive(Debug, Clone, PartialEq, Eq)]
enum SelectionState<K> {
    NoSelection,
    Selected(K),
}

/// What a call to [`Selector::select`] did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition<K> {
    Opened(K),
    Switched { from: K, to: K },
    Closed(K),
}

/// Proof that a decode was started for a particular selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodeTicket<K> {
    key: K,
    generation: u64,
}

/// Single-expansion selection with toggle semantics.
///
/// Every transition bumps a generation counter and drops decoded rows, so
/// a decode that finishes after the user moved on is recognised as stale.
#[derive(Debug, Clone)]
pub struct Selector<K> {
    state: SelectionState<K>,
    generation: u64,
    rows: Vec<TabularRow>,
}

impl<K> Default for Selector<K> {
    fn default() -> Self {
        Self {
            state: SelectionState::NoSelection,
            generation: 0,
            rows: Vec::new(),
        }
    }
}

impl<K: Clone + PartialEq + std::fmt::Debug> Selector<K> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selected(&self) -> Option<&K> {
        match &self.state {
            SelectionState::Selected(k) => Some(k),
            SelectionState::NoSelection => None,
        }
    }

    /// Decoded rows for the current selection (empty while pending).
    pub fn rows(&self) -> &[TabularRow] {
        &self.rows
    }

    pub fn select(&mut self, key: K) -> Transition<K> {
        self.invalidate();
        let previous = std::mem::replace(&mut self.state, SelectionState::NoSelection);
        let transition = match previous {
            SelectionState::Selected(current) if current == key => Transition::Closed(current),
            SelectionState::Selected(current) => {
                self.state = SelectionState::Selected(key.clone());
                Transition::Switched { from: current, to: key }
            }
            SelectionState::NoSelection => {
                self.state = SelectionState::Selected(key.clone());
                Transition::Opened(key)
            }
        };
        debug!(?transition, generation = self.generation, "selection changed");
        transition
    }

    pub fn reset(&mut self) {
        self.invalidate();
        self.state = SelectionState::NoSelection;
    }

    /// Start a decode for whatever is selected right now.
    pub fn begin_decode(&self) -> Option<DecodeTicket<K>> {
        self.selected().map(|key| DecodeTicket {
            key: key.clone(),
            generation: self.generation,
        })
    }

    /// Store decoded rows if `ticket` still describes the live selection.
    /// Returns `false` (and drops the rows) for a stale ticket.
    pub fn finish_decode(&mut self, ticket: DecodeTicket<K>, rows: Vec<TabularRow>) -> bool {
        let live = ticket.generation == self.generation && self.selected() == Some(&ticket.key);
        if live {
            self.rows = rows;
        } else {
            debug!(
                key = ?ticket.key,
                ticket_generation = ticket.generation,
                generation = self.generation,
                "discarding stale decode result"
            );
        }
        live
    }

    fn invalidate(&mut self) {
        self.generation = self.generation.wrapping_add(1);
        self.rows.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolver::tabular::decode_rows;

    #[test]
    fn test_toggle_off() {
        let mut sel = Selector::new();
        assert_eq!(sel.select("x"), Transition::Opened("x"));
        assert_eq!(sel.select("x"), Transition::Closed("x"));
        assert_eq!(sel.selected(), None);
    }

    #[test]
    fn test_switch_clears_rows() {
        let mut sel = Selector::new();
        sel.select("x");
        let ticket = sel.begin_decode().unwrap();
        assert!(sel.finish_decode(ticket, decode_rows("a\n1")));
        assert_eq!(sel.rows().len(), 1);

        assert_eq!(sel.select("y"), Transition::Switched { from: "x", to: "y" });
        assert_eq!(sel.selected(), Some(&"y"));
        assert!(sel.rows().is_empty());
    }

    #[test]
    fn test_reset() {
        let mut sel = Selector::new();
        sel.select(3usize);
        sel.reset();
        assert_eq!(sel.selected(), None);
        assert!(sel.begin_decode().is_none());
    }

    #[test]
    fn test_stale_decode_after_switch_discarded() {
        let mut sel = Selector::new();
        sel.select("x");
        let stale = sel.begin_decode().unwrap();
        sel.select("y");
        assert!(!sel.finish_decode(stale, decode_rows("a\n1")));
        assert!(sel.rows().is_empty());
    }

    #[test]
    fn test_stale_decode_after_reselect_same_key_discarded() {
        // x -> off -> x again: the first ticket belongs to an earlier opening.
        let mut sel = Selector::new();
        sel.select("x");
        let stale = sel.begin_decode().unwrap();
        sel.select("x");
        sel.select("x");
        let fresh = sel.begin_decode().unwrap();
        assert!(!sel.finish_decode(stale, decode_rows("a\n1")));
        assert!(sel.finish_decode(fresh, decode_rows("a\n2\n3")));
        assert_eq!(sel.rows().len(), 2);
    }

    #[test]
    fn test_stale_decode_after_reset_discarded() {
        let mut sel = Selector::new();
        sel.select("x");
        let ticket = sel.begin_decode().unwrap();
        sel.reset();
        assert!(!sel.finish_decode(ticket, decode_rows("a\n1")));
    }
}
