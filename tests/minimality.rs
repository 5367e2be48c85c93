//! Cross-check the solver against an independent brute-force search that
//! works on raw vectors, keeps tube positions significant and shares no code
//! with the library beyond reading the layout.

use std::collections::{HashSet, VecDeque};

use rand::SeedableRng;
use rand::rngs::StdRng;
use water_sort_solver::{Layout, SolveOutcome, SolverConfig, generate, solve};

type Tubes = Vec<Vec<usize>>;

fn raw_tubes(layout: &Layout) -> (Tubes, Vec<usize>) {
    let tubes = layout
        .tubes()
        .iter()
        .map(|t| t.contents.iter().map(|f| f.get_color_id()).collect())
        .collect();
    let capacities = layout.tubes().iter().map(|t| t.capacity).collect();
    (tubes, capacities)
}

fn is_sorted(tubes: &Tubes, capacities: &[usize]) -> bool {
    tubes.iter().zip(capacities).all(|(tube, &capacity)| {
        (tube.is_empty() || tube.len() == capacity) && tube.iter().all(|c| *c == tube[0])
    })
}

fn brute_force_pour(tubes: &Tubes, capacities: &[usize], from: usize, to: usize) -> Option<Tubes> {
    let &color = tubes[from].last()?;
    if let Some(&top) = tubes[to].last()
        && top != color
    {
        return None;
    }
    let run = tubes[from].iter().rev().take_while(|c| **c == color).count();
    let space = capacities[to] - tubes[to].len();
    let amount = run.min(space);
    if amount == 0 {
        return None;
    }
    let mut next = tubes.clone();
    let keep = next[from].len() - amount;
    next[from].truncate(keep);
    next[to].extend(std::iter::repeat_n(color, amount));
    Some(next)
}

/// Shortest move count, or None when no sorted state is reachable.
fn brute_force_distance(layout: &Layout) -> Option<usize> {
    let (root, capacities) = raw_tubes(layout);
    let mut seen: HashSet<Tubes> = HashSet::from([root.clone()]);
    let mut queue = VecDeque::from([(root, 0)]);
    while let Some((tubes, distance)) = queue.pop_front() {
        if is_sorted(&tubes, &capacities) {
            return Some(distance);
        }
        for from in 0..tubes.len() {
            for to in 0..tubes.len() {
                if from == to {
                    continue;
                }
                if let Some(next) = brute_force_pour(&tubes, &capacities, from, to)
                    && seen.insert(next.clone())
                {
                    queue.push_back((next, distance + 1));
                }
            }
        }
    }
    None
}

#[test]
fn solver_matches_brute_force_on_small_puzzles() {
    for colors in 2..=3 {
        for capacity in 2..=3 {
            for empty in 1..=2 {
                for seed in 0..5 {
                    let layout = generate(colors, empty, capacity, &mut StdRng::seed_from_u64(seed));
                    let expected = brute_force_distance(&layout);
                    let outcome = solve(&layout, SolverConfig::default()).unwrap();
                    match (outcome, expected) {
                        (SolveOutcome::Solved(solution), Some(distance)) => {
                            assert_eq!(solution.len(), distance, "layout {layout:?}");
                        }
                        (SolveOutcome::Unsolvable, None) => {}
                        (outcome, expected) => {
                            panic!("layout {layout:?}: solver {outcome:?}, brute force {expected:?}")
                        }
                    }
                }
            }
        }
    }
}

#[test]
fn known_puzzle_distances() {
    let cases = [
        (Layout::uniform(2, vec![vec![0, 1], vec![1, 0], vec![]]), 3),
        (Layout::uniform(4, vec![vec![0, 1, 0, 1], vec![1, 0, 1, 0], vec![]]), 7),
        (
            Layout::uniform(3, vec![vec![0, 1, 2], vec![2, 0, 1], vec![1, 2, 0], vec![], vec![]]),
            7,
        ),
    ];
    for (layout, distance) in cases {
        assert_eq!(brute_force_distance(&layout), Some(distance));
        match solve(&layout, SolverConfig::default()).unwrap() {
            SolveOutcome::Solved(solution) => assert_eq!(solution.len(), distance),
            other => panic!("expected a solution, got {other:?}"),
        }
    }
}
