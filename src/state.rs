use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

use crate::error::Result;
use crate::layout::Layout;
use crate::model::{Fluid, Tube};

/// A single pour, by 0-based tube index.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct MoveAction {
    pub from_container: usize,
    pub to_container: usize,
}

impl MoveAction {
    pub fn new(from_container: usize, to_container: usize) -> Self {
        Self {
            from_container,
            to_container,
        }
    }

    /// The 1-based `(from, to)` pair used in the output.
    pub fn one_based(&self) -> (usize, usize) {
        (self.from_container + 1, self.to_container + 1)
    }
}

impl fmt::Display for MoveAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (from, to) = self.one_based();
        write!(f, "{from:>3} -> {to:>3}")
    }
}

/// Index-independent fingerprint of a [`State`]: the sorted multiset of
/// `(capacity, contents)` per tube.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CanonicalKey(Vec<(usize, Vec<Fluid>)>);

/// Immutable puzzle snapshot plus the moves that led to it.
///
/// Tubes are shared with the parent state whenever a pour did not touch
/// them, so no tube reachable from a `State` is ever mutated.
#[derive(Clone, Debug)]
pub struct State {
    tubes: Vec<Rc<Tube>>,
    path: Vec<MoveAction>,
}

impl State {
    /// Root state from a validated layout.
    pub fn from_layout(layout: &Layout) -> Result<Self> {
        layout.validate()?;
        let tubes = layout
            .tubes()
            .iter()
            .map(|t| Tube::new_filled(t.contents.clone(), t.capacity))
            .collect();
        Ok(Self::new(tubes))
    }

    /// Root state from tubes the caller already trusts.
    pub fn new(tubes: Vec<Tube>) -> Self {
        Self {
            tubes: tubes.into_iter().map(Rc::new).collect(),
            path: Vec::new(),
        }
    }

    pub fn tubes(&self) -> impl ExactSizeIterator<Item = &Tube> {
        self.tubes.iter().map(|t| &**t)
    }

    pub fn tube(&self, index: usize) -> Option<&Tube> {
        self.tubes.get(index).map(|t| &**t)
    }

    pub fn path(&self) -> &[MoveAction] {
        &self.path
    }

    pub fn is_win(&self) -> bool {
        self.tubes
            .iter()
            .all(|t| t.is_pure() && (t.is_empty() || t.is_full()))
    }

    /// Every legal child, ordered by `from` then `to` ascending.
    pub fn next_states(&self) -> Vec<State> {
        let n = self.tubes.len();
        let mut states = Vec::new();
        for from in 0..n {
            for to in 0..n {
                if from == to {
                    continue;
                }
                if let Some(state) = self.pour(MoveAction::new(from, to)) {
                    states.push(state);
                }
            }
        }
        states
    }

    /// Apply one move; None for self-pours, unknown indices or illegal pours.
    pub fn apply_move(&self, action: &MoveAction) -> Option<State> {
        let n = self.tubes.len();
        if action.from_container == action.to_container
            || action.from_container >= n
            || action.to_container >= n
        {
            return None;
        }
        self.pour(*action)
    }

    /// Apply a whole move sequence, stopping at the first illegal move.
    pub fn replay(&self, moves: &[MoveAction]) -> Option<State> {
        moves
            .iter()
            .try_fold(self.clone(), |state, action| state.apply_move(action))
    }

    fn pour(&self, action: MoveAction) -> Option<State> {
        let (from, to) = (action.from_container, action.to_container);
        let (new_from, new_to) = Tube::pour(&self.tubes[from], &self.tubes[to]).ok()?;
        let mut tubes = self.tubes.clone();
        tubes[from] = Rc::new(new_from);
        tubes[to] = Rc::new(new_to);
        let mut path = Vec::with_capacity(self.path.len() + 1);
        path.extend_from_slice(&self.path);
        path.push(action);
        Some(State { tubes, path })
    }

    pub fn canonical_key(&self) -> CanonicalKey {
        let mut rendered: Vec<(usize, Vec<Fluid>)> = self
            .tubes
            .iter()
            .map(|t| (t.get_capacity(), t.get_packets().to_vec()))
            .collect();
        rendered.sort_unstable();
        CanonicalKey(rendered)
    }

    pub fn color_counts(&self) -> BTreeMap<Fluid, usize> {
        let mut counts = BTreeMap::new();
        for fluid in self.tubes.iter().flat_map(|t| t.get_packets()) {
            *counts.entry(*fluid).or_insert(0) += 1;
        }
        counts
    }

    /// True when the two states hold the very same tube allocation at
    /// `index`, as opposed to an equal copy.
    pub fn shares_tube_with(&self, other: &State, index: usize) -> bool {
        match (self.tubes.get(index), other.tubes.get(index)) {
            (Some(a), Some(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for tube in &self.tubes {
            writeln!(f, "{}", tube.get_text_representation())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state(capacity: usize, tubes: Vec<Vec<usize>>) -> State {
        State::from_layout(&Layout::uniform(capacity, tubes)).unwrap()
    }

    /// Skips color-count validation.
    fn raw(capacity: usize, tubes: Vec<Vec<usize>>) -> State {
        State::new(
            tubes
                .into_iter()
                .map(|ids| Tube::new_filled(ids.into_iter().map(Fluid::new).collect(), capacity))
                .collect(),
        )
    }

    #[test]
    fn win_requires_pure_and_empty_or_full() {
        assert!(state(2, vec![vec![0, 0], vec![], vec![1, 1]]).is_win());
        // Pure but half full.
        assert!(!State::new(vec![Tube::new_filled(vec![Fluid::new(0)], 2)]).is_win());
        // Full but mixed.
        assert!(!state(2, vec![vec![0, 1], vec![1, 0]]).is_win());
    }

    #[test]
    fn next_states_are_ordered_by_from_then_to() {
        let root = state(2, vec![vec![0], vec![0], vec![]]);
        let moves: Vec<(usize, usize)> = root
            .next_states()
            .iter()
            .map(|s| s.path()[0].one_based())
            .collect();
        assert_eq!(moves, vec![(1, 2), (1, 3), (2, 1), (2, 3)]);
    }

    #[test]
    fn next_states_bound() {
        let root = state(4, vec![vec![], vec![], vec![], vec![0, 0, 0, 0]]);
        assert!(root.next_states().len() <= 4 * 3);
        assert_eq!(root.next_states().len(), 3);
    }

    #[test]
    fn untouched_tubes_are_shared() {
        let root = state(2, vec![vec![0], vec![0], vec![1, 1]]);
        let child = root.apply_move(&MoveAction::new(0, 1)).unwrap();
        assert!(child.shares_tube_with(&root, 2));
        assert!(!child.shares_tube_with(&root, 0));
        assert!(!child.shares_tube_with(&root, 1));
        // The parent still holds its original tubes.
        assert_eq!(root.tube(0).unwrap().get_filled_amount(), 1);
    }

    #[test]
    fn apply_move_rejects_bad_moves() {
        let root = state(1, vec![vec![0], vec![1], vec![]]);
        assert!(root.apply_move(&MoveAction::new(0, 0)).is_none());
        assert!(root.apply_move(&MoveAction::new(0, 7)).is_none());
        assert!(root.apply_move(&MoveAction::new(0, 1)).is_none());
        assert!(root.apply_move(&MoveAction::new(0, 2)).is_some());
    }

    #[test]
    fn path_grows_by_one_per_pour() {
        let root = state(2, vec![vec![0, 1], vec![1, 0], vec![], vec![]]);
        let end = root
            .replay(&[MoveAction::new(0, 2), MoveAction::new(1, 3)])
            .unwrap();
        assert_eq!(
            end.path(),
            &[MoveAction::new(0, 2), MoveAction::new(1, 3)][..]
        );
        assert!(root.path().is_empty());
    }

    #[test]
    fn canonical_key_ignores_tube_order_but_not_capacity() {
        let a = raw(3, vec![vec![0, 1], vec![], vec![1, 0]]);
        let b = raw(3, vec![vec![], vec![1, 0], vec![0, 1]]);
        assert_eq!(a.canonical_key(), b.canonical_key());

        let c = State::new(vec![Tube::new(2), Tube::new(3)]);
        let d = State::new(vec![Tube::new(3), Tube::new(3)]);
        assert_ne!(c.canonical_key(), d.canonical_key());
    }

    #[test]
    fn display_renders_one_tube_per_line() {
        let s = raw(3, vec![vec![0, 1], vec![]]);
        assert_eq!(s.to_string(), "AB.\n...\n");
    }

    #[test]
    fn move_display_is_one_based() {
        assert_eq!(MoveAction::new(0, 4).to_string(), "  1 ->   5");
    }
}
