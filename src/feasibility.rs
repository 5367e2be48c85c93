//! Color-count consistency: a win needs every color to exactly fill some set
//! of tubes, and no tube can be shared between colors.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::atomic::{AtomicBool, Ordering};

use rayon::prelude::*;
use tracing::debug;

use crate::model::Fluid;

/// Tube capacity -> number of tubes of that capacity used.
type Way = Vec<(usize, usize)>;

/// Ok if some disjoint choice of tubes can hold every color exactly.
/// Otherwise the offending color and its count; when only the joint
/// assignment fails, that is the color with the largest count.
pub fn check(capacities: &[usize], counts: &BTreeMap<Fluid, usize>) -> Result<(), (Fluid, usize)> {
    let unique_sizes: BTreeSet<usize> = capacities.iter().copied().collect();
    if unique_sizes.len() == 1 {
        // Tubes are interchangeable, so divisibility is enough; conservation
        // already bounds the number of tubes needed.
        let capacity = capacities[0];
        return match counts.iter().find(|(_, count)| *count % capacity != 0) {
            Some((fluid, count)) => Err((*fluid, *count)),
            None => Ok(()),
        };
    }

    let mut container_size_to_count_map: HashMap<usize, usize> = HashMap::new();
    for &c in capacities {
        *container_size_to_count_map.entry(c).or_insert(0) += 1;
    }
    let mut container_size_and_count_vec: Vec<(usize, usize)> =
        container_size_to_count_map.iter().map(|(s, c)| (*s, *c)).collect();
    container_size_and_count_vec.sort_by(|a, b| b.0.cmp(&a.0));

    let targets: BTreeSet<usize> = counts.values().copied().collect();
    let max_size = targets.iter().max().copied().unwrap_or(0);
    let mut ways_to_get_liquids: HashMap<usize, Vec<Way>> = HashMap::new();
    enumerate_subsets_to_target_size(
        &container_size_and_count_vec,
        0,
        &mut Vec::new(),
        0,
        &targets,
        max_size,
        &mut ways_to_get_liquids,
    );
    debug!(
        sizes = ?container_size_and_count_vec,
        targets = ?targets,
        "enumerated tube subsets per color count"
    );

    for (fluid, count) in counts {
        if ways_to_get_liquids.get(count).is_none_or(Vec::is_empty) {
            return Err((*fluid, *count));
        }
    }

    // Most constrained colors first keeps the search shallow.
    let mut liquid_sizes: Vec<usize> = counts.values().copied().collect();
    liquid_sizes.sort_by_key(|size| (ways_to_get_liquids[size].len(), usize::MAX - size));

    let found = AtomicBool::new(false);
    if recursive_is_solvable(
        &ways_to_get_liquids,
        container_size_to_count_map,
        &liquid_sizes,
        &found,
    ) {
        return Ok(());
    }
    let (fluid, count) = counts
        .iter()
        .max_by_key(|(fluid, count)| (**count, std::cmp::Reverse(**fluid)))
        .map(|(fluid, count)| (*fluid, *count))
        .unwrap_or((Fluid::new(0), 0));
    Err((fluid, count))
}

fn enumerate_subsets_to_target_size(
    sizes: &[(usize, usize)],
    index: usize,
    chosen_so_far: &mut Way,
    sum_so_far: usize,
    target_sizes: &BTreeSet<usize>,
    max_size: usize,
    ways: &mut HashMap<usize, Vec<Way>>,
) {
    if index == sizes.len() {
        if sum_so_far > 0 && target_sizes.contains(&sum_so_far) {
            ways.entry(sum_so_far).or_default().push(chosen_so_far.clone());
        }
        return;
    }
    let (value, count) = sizes[index];
    for k in 0..=count {
        let new_sum = sum_so_far + value * k;
        if new_sum > max_size {
            return;
        }
        if k > 0 {
            chosen_so_far.push((value, k));
        }
        enumerate_subsets_to_target_size(
            sizes,
            index + 1,
            chosen_so_far,
            new_sum,
            target_sizes,
            max_size,
            ways,
        );
        if k > 0 {
            chosen_so_far.pop();
        }
    }
}

fn recursive_is_solvable(
    ways_to_get_liquids: &HashMap<usize, Vec<Way>>,
    remaining_container_sizes: HashMap<usize, usize>,
    liquid_sizes: &[usize],
    found: &AtomicBool,
) -> bool {
    // Another branch already succeeded.
    if found.load(Ordering::Relaxed) {
        return true;
    }
    let Some((&current_liquid, rest)) = liquid_sizes.split_first() else {
        found.store(true, Ordering::Relaxed);
        return true;
    };
    let Some(ways) = ways_to_get_liquids.get(&current_liquid) else {
        return false;
    };

    ways.par_iter().any(|way| {
        if found.load(Ordering::Relaxed) {
            return true;
        }
        let mut remaining = remaining_container_sizes.clone();
        for (size, count) in way {
            let entry = remaining.entry(*size).or_insert(0);
            if *entry < *count {
                return false;
            }
            *entry -= *count;
        }
        recursive_is_solvable(ways_to_get_liquids, remaining, rest, found)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn counts(pairs: &[(usize, usize)]) -> BTreeMap<Fluid, usize> {
        pairs.iter().map(|(id, n)| (Fluid::new(*id), *n)).collect()
    }

    #[test]
    fn uniform_capacity_needs_multiples() {
        assert_eq!(check(&[4, 4, 4], &counts(&[(0, 4), (1, 8)])), Ok(()));
        assert_eq!(
            check(&[4, 4, 4], &counts(&[(0, 4), (1, 6)])),
            Err((Fluid::new(1), 6))
        );
    }

    #[test]
    fn mixed_capacities_find_an_assignment() {
        assert_eq!(check(&[3, 2, 1], &counts(&[(0, 3), (1, 3)])), Ok(()));
        assert_eq!(check(&[3, 2, 1, 4], &counts(&[(0, 4), (1, 2)])), Ok(()));
    }

    #[test]
    fn mixed_capacities_reject_unreachable_counts() {
        assert_eq!(
            check(&[3, 2], &counts(&[(0, 4)])),
            Err((Fluid::new(0), 4))
        );
    }

    #[test]
    fn mixed_capacities_reject_competing_colors() {
        // Each color alone fits in the 3-tube, but not both at once.
        assert_eq!(
            check(&[3, 1], &counts(&[(0, 3), (1, 3)])),
            Err((Fluid::new(0), 3))
        );
    }

    #[test]
    fn no_colors_is_consistent() {
        assert_eq!(check(&[2, 3], &BTreeMap::new()), Ok(()));
    }
}
