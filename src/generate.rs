use rand::Rng;
use rand::seq::SliceRandom;
use tracing::debug;

use crate::layout::Layout;

/// A shuffled puzzle: `colors` full tubes holding exactly `capacity` units of
/// each color, followed by `empty_tubes` empty tubes.
///
/// The result always passes [`Layout::validate`] as long as `capacity > 0`.
/// It may still be unsolvable, which only a search can tell.
pub fn generate<R: Rng + ?Sized>(
    colors: usize,
    empty_tubes: usize,
    capacity: usize,
    rng: &mut R,
) -> Layout {
    let mut units: Vec<usize> = (0..colors)
        .flat_map(|color| std::iter::repeat_n(color, capacity))
        .collect();
    units.shuffle(rng);

    let mut tubes: Vec<Vec<usize>> = units
        .chunks(capacity.max(1))
        .map(<[usize]>::to_vec)
        .collect();
    tubes.extend(std::iter::repeat_n(Vec::new(), empty_tubes));
    debug!(colors, empty_tubes, capacity, "generated puzzle");
    Layout::uniform(capacity, tubes)
}
