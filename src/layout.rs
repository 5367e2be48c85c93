//! Puzzle input: per-tube capacity and contents, as handed over by whatever
//! produced the puzzle (a screenshot reader, a text file, a generator).

use std::collections::BTreeMap;

use tracing::debug;

use crate::error::{PuzzleError, Result};
use crate::feasibility;
use crate::model::Fluid;

/// Order in which the producer lists the units of a tube.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum Orientation {
    #[default]
    BottomToTop,
    TopToBottom,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TubeLayout {
    pub capacity: usize,
    /// Bottom first.
    pub contents: Vec<Fluid>,
}

/// Unvalidated description of a puzzle. Nothing here is trusted until
/// [`Layout::validate`] has passed.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Layout {
    tubes: Vec<TubeLayout>,
}

impl Layout {
    pub fn new(tubes: Vec<TubeLayout>) -> Self {
        Self { tubes }
    }

    /// One capacity for every tube, contents given as color ids bottom to top.
    pub fn uniform(capacity: usize, tubes: Vec<Vec<usize>>) -> Self {
        Self::new(
            tubes
                .into_iter()
                .map(|ids| TubeLayout {
                    capacity,
                    contents: ids.into_iter().map(Fluid::new).collect(),
                })
                .collect(),
        )
    }

    /// Parse the text format: one tube per line, letters for units and `.`
    /// for free slots, comma separated when labels are longer than a letter.
    /// The token count of a line is that tube's capacity. `#` starts a
    /// comment.
    pub fn new_from_repr(repr: &str, orientation: Orientation) -> Result<Self> {
        let mut tubes = Vec::new();
        for line in repr.lines() {
            let line = match line.split_once('#') {
                Some((content, _)) => content.trim(),
                None => line.trim(),
            };
            if line.is_empty() {
                continue;
            }
            tubes.push(Self::parse_tube(tubes.len(), line, orientation)?);
        }
        debug!(tubes = tubes.len(), "parsed puzzle layout");
        Ok(Self { tubes })
    }

    fn parse_tube(index: usize, line: &str, orientation: Orientation) -> Result<TubeLayout> {
        let tokens: Vec<String> = if line.contains(',') {
            line.split(',').map(|t| t.trim().to_string()).collect()
        } else {
            line.chars()
                .filter(|ch| !ch.is_whitespace())
                .map(|ch| ch.to_string())
                .collect()
        };

        let mut slots = Vec::with_capacity(tokens.len());
        for token in &tokens {
            if token == "." {
                slots.push(None);
                continue;
            }
            match Fluid::new_from_repr(token) {
                Some(fluid) => slots.push(Some(fluid)),
                None => {
                    return Err(PuzzleError::InvalidToken {
                        tube: index + 1,
                        token: token.clone(),
                    });
                }
            }
        }
        if orientation == Orientation::TopToBottom {
            slots.reverse();
        }

        let filled = slots.iter().take_while(|slot| slot.is_some()).count();
        if slots[filled..].iter().any(Option::is_some) {
            return Err(PuzzleError::Gap { tube: index + 1 });
        }
        Ok(TubeLayout {
            capacity: slots.len(),
            contents: slots.into_iter().flatten().collect(),
        })
    }

    pub fn tubes(&self) -> &[TubeLayout] {
        &self.tubes
    }

    pub fn color_counts(&self) -> BTreeMap<Fluid, usize> {
        let mut counts = BTreeMap::new();
        for fluid in self.tubes.iter().flat_map(|t| &t.contents) {
            *counts.entry(*fluid).or_insert(0) += 1;
        }
        counts
    }

    /// Reject anything that could not be a solvable-looking puzzle: no
    /// tubes, zero capacity, overfilled tubes, and color counts that cannot
    /// exactly fill a set of tubes.
    pub fn validate(&self) -> Result<()> {
        if self.tubes.is_empty() {
            return Err(PuzzleError::NoTubes);
        }
        for (index, tube) in self.tubes.iter().enumerate() {
            if tube.capacity == 0 {
                return Err(PuzzleError::ZeroCapacity { tube: index + 1 });
            }
            if tube.contents.len() > tube.capacity {
                return Err(PuzzleError::Overfilled {
                    tube: index + 1,
                    size: tube.contents.len(),
                    capacity: tube.capacity,
                });
            }
        }

        let capacities: Vec<usize> = self.tubes.iter().map(|t| t.capacity).collect();
        let counts = self.color_counts();
        if let Err((fluid, count)) = feasibility::check(&capacities, &counts) {
            return Err(PuzzleError::InconsistentColors {
                color: fluid.get_letter_representation(),
                count,
            });
        }
        Ok(())
    }
}
