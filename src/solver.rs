//! Breadth-first search over puzzle states.
//!
//! The frontier is a strict FIFO queue and every pour costs one move, so
//! states leave the queue in non-decreasing move count and the first win
//! dequeued carries a shortest path. Ties go to the candidate generated
//! first by [`State::next_states`]. Replacing the queue with anything that
//! reorders it gives up that guarantee.

use std::collections::{HashSet, VecDeque};
use std::fmt;

use tracing::{debug, info, trace, warn};

use crate::error::Result;
use crate::layout::Layout;
use crate::state::{CanonicalKey, MoveAction, State};

/// Optional bounds on the search. The default searches until the state
/// space is exhausted.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct SolverConfig {
    /// Longest path, in moves, that will be explored.
    pub max_depth: Option<usize>,
    /// Number of states that may be expanded.
    pub max_states: Option<usize>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Solution {
    moves: Vec<MoveAction>,
}

impl Solution {
    pub fn new(moves: Vec<MoveAction>) -> Self {
        Self { moves }
    }

    pub fn moves(&self) -> &[MoveAction] {
        &self.moves
    }

    pub fn len(&self) -> usize {
        self.moves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }

    pub fn one_based(&self) -> Vec<(usize, usize)> {
        self.moves.iter().map(MoveAction::one_based).collect()
    }
}

impl fmt::Display for Solution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for action in &self.moves {
            writeln!(f, "{action}")?;
        }
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SolveOutcome {
    Solved(Solution),
    /// Every reachable state was expanded without finding a win.
    Unsolvable,
    /// A configured bound stopped the search. Says nothing about whether a
    /// solution exists.
    LimitReached { depth: usize, explored: usize },
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct SolveStats {
    pub expanded: usize,
    pub visited: usize,
    pub max_frontier: usize,
}

pub struct Solver {
    config: SolverConfig,
    frontier: VecDeque<State>,
    visited: HashSet<CanonicalKey>,
    stats: SolveStats,
    depth_pruned: bool,
}

impl Solver {
    pub fn new(starting_state: State, config: SolverConfig) -> Solver {
        let mut visited = HashSet::new();
        visited.insert(starting_state.canonical_key());
        Solver {
            config,
            frontier: VecDeque::from([starting_state]),
            visited,
            stats: SolveStats {
                expanded: 0,
                visited: 1,
                max_frontier: 1,
            },
            depth_pruned: false,
        }
    }

    pub fn from_layout(layout: &Layout, config: SolverConfig) -> Result<Solver> {
        Ok(Self::new(State::from_layout(layout)?, config))
    }

    pub fn stats(&self) -> SolveStats {
        self.stats
    }

    /// Run the search. A second call resumes from the remaining frontier.
    pub fn solve(&mut self) -> SolveOutcome {
        debug!(config = ?self.config, "starting breadth-first search");
        while let Some(state) = self.frontier.pop_front() {
            if state.is_win() {
                info!(
                    moves = state.path().len(),
                    expanded = self.stats.expanded,
                    visited = self.stats.visited,
                    "found solution"
                );
                return SolveOutcome::Solved(Solution::new(state.path().to_vec()));
            }
            if let Some(max_states) = self.config.max_states
                && self.stats.expanded >= max_states
            {
                warn!(max_states, "state limit reached");
                let depth = state.path().len();
                // Keep the state so a resumed search does not lose it.
                self.frontier.push_front(state);
                return SolveOutcome::LimitReached {
                    depth,
                    explored: self.stats.expanded,
                };
            }
            self.expand(&state);
        }

        if self.depth_pruned {
            let depth = self.config.max_depth.unwrap_or_default();
            warn!(depth, "depth limit reached without a solution");
            return SolveOutcome::LimitReached {
                depth,
                explored: self.stats.expanded,
            };
        }
        info!(
            expanded = self.stats.expanded,
            visited = self.stats.visited,
            "state space exhausted, no solution"
        );
        SolveOutcome::Unsolvable
    }

    fn expand(&mut self, state: &State) {
        self.stats.expanded += 1;
        trace!(depth = state.path().len(), "expanding\n{state}");
        for next_state in state.next_states() {
            let key = next_state.canonical_key();
            if let Some(max_depth) = self.config.max_depth
                && next_state.path().len() > max_depth
            {
                // Already-seen states lose nothing by being cut off.
                if !self.visited.contains(&key) {
                    self.depth_pruned = true;
                }
                continue;
            }
            if self.visited.insert(key) {
                self.frontier.push_back(next_state);
            }
        }
        self.stats.visited = self.visited.len();
        self.stats.max_frontier = self.stats.max_frontier.max(self.frontier.len());
    }
}

/// Validate `layout`, build the root state and search it.
pub fn solve(layout: &Layout, config: SolverConfig) -> Result<SolveOutcome> {
    Ok(Solver::from_layout(layout, config)?.solve())
}
