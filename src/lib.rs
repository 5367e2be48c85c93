//! Shortest-solution solver for the water sort puzzle.
//!
//! A [`Layout`] describes the tubes, [`State::from_layout`] validates it and
//! builds the root state, and [`Solver`] runs a breadth-first search whose
//! first win is a minimum-move solution.
//!
//! ```
//! use water_sort_solver::{Layout, SolveOutcome, SolverConfig, solve};
//!
//! let layout = Layout::uniform(2, vec![vec![0, 0], vec![]]);
//! let outcome = solve(&layout, SolverConfig::default()).unwrap();
//! assert_eq!(outcome, SolveOutcome::Solved(Default::default()));
//! ```

pub mod error;
pub mod feasibility;
pub mod generate;
pub mod layout;
pub mod model;
pub mod solver;
pub mod state;

pub use error::{NotPourable, PuzzleError};
pub use generate::generate;
pub use layout::{Layout, Orientation, TubeLayout};
pub use model::{Fluid, Tube};
pub use solver::{Solution, SolveOutcome, SolveStats, Solver, SolverConfig, solve};
pub use state::{CanonicalKey, MoveAction, State};
