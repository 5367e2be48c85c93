use std::fmt;

use crate::error::NotPourable;

/// One unit of colored liquid. Only equality matters to the puzzle; the
/// ordering is used for building canonical keys.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct Fluid {
    color_id: usize,
}

impl Fluid {
    pub fn new(color_id: usize) -> Self {
        Fluid { color_id }
    }

    /// Parse a label like "A", "Z", "AA". Returns None for anything that is
    /// not a non-empty run of ASCII letters.
    pub fn new_from_repr(repr: &str) -> Option<Self> {
        Self::letters_to_color_id(repr.trim()).map(Fluid::new)
    }

    /// Convert a single letter (A-Z) into a 0-based id.
    pub fn letter_to_color_id(ch: char) -> Option<usize> {
        if !ch.is_ascii_alphabetic() {
            return None;
        }
        let up = ch.to_ascii_uppercase();
        Some((up as u8 - b'A') as usize)
    }

    /// Excel-style base-26 numbering: A=0, B=1, ..., Z=25, AA=26, AB=27, ...
    fn letters_to_color_id(s: &str) -> Option<usize> {
        let mut acc: usize = 0;
        let mut saw_any = false;

        for ch in s.chars() {
            let digit = Self::letter_to_color_id(ch)?;
            acc = acc.checked_mul(26)?.checked_add(digit + 1)?;
            saw_any = true;
        }

        if !saw_any {
            return None;
        }
        acc.checked_sub(1)
    }

    pub fn get_color_id(&self) -> usize {
        self.color_id
    }

    pub fn get_letter_representation(&self) -> String {
        let mut chars = Vec::new();
        // Widened so the 1-based id cannot overflow for usize::MAX.
        let mut id = self.color_id as u128 + 1;
        while id > 0 {
            let rem = (id - 1) % 26;
            chars.push((b'A' + rem as u8) as char);
            id = (id - 1) / 26;
        }
        chars.iter().rev().collect()
    }
}

impl fmt::Display for Fluid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.get_letter_representation())
    }
}

/// A bounded stack of fluid, bottom first. Free slots are implied by
/// `packets.len() < capacity` and never stored.
///
/// Once a tube is shared by a published [`crate::state::State`] it must not
/// be mutated; pours work on clones.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Tube {
    packets: Vec<Fluid>,
    capacity: usize,
}

impl Tube {
    pub fn new(capacity: usize) -> Self {
        Self::new_filled(Vec::new(), capacity)
    }

    /// Panics if `capacity` is zero or `packets` does not fit. Untrusted
    /// input goes through [`crate::layout::Layout::validate`] first.
    pub fn new_filled(packets: Vec<Fluid>, capacity: usize) -> Self {
        assert!(capacity > 0, "tube capacity must be positive");
        assert!(
            packets.len() <= capacity,
            "tube holds {} units but capacity is {capacity}",
            packets.len()
        );
        Self { packets, capacity }
    }

    pub fn is_empty(&self) -> bool {
        self.packets.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.packets.len() == self.capacity
    }

    /// Empty, or every unit matches the bottom one.
    pub fn is_pure(&self) -> bool {
        match self.packets.first() {
            None => true,
            Some(bottom) => self.packets.iter().all(|p| p == bottom),
        }
    }

    pub fn top(&self) -> Fluid {
        match self.packets.last() {
            Some(packet) => *packet,
            None => panic!("top() on empty tube {self}"),
        }
    }

    pub fn pop(&mut self) -> Fluid {
        match self.packets.pop() {
            Some(packet) => packet,
            None => panic!("pop() on empty tube {self}"),
        }
    }

    pub fn push(&mut self, packet: Fluid) {
        assert!(!self.is_full(), "push({packet}) on full tube {self}");
        self.packets.push(packet);
    }

    pub fn get_capacity(&self) -> usize {
        self.capacity
    }

    pub fn get_filled_amount(&self) -> usize {
        self.packets.len()
    }

    pub fn get_empty_space(&self) -> usize {
        self.capacity - self.packets.len()
    }

    /// Length of the contiguous same-colored run at the top.
    pub fn get_top_fluid_depth(&self) -> usize {
        let Some(top) = self.packets.last() else {
            return 0;
        };
        self.packets.iter().rev().take_while(|p| *p == top).count()
    }

    pub fn get_packets(&self) -> &[Fluid] {
        &self.packets
    }

    pub fn can_pour(from: &Tube, to: &Tube) -> bool {
        if from.is_empty() {
            return false;
        }
        if to.is_empty() {
            return true;
        }
        !to.is_full() && from.top() == to.top()
    }

    /// Pour the maximal run of top-colored units that fits. The inputs are
    /// left untouched; the resulting tubes are returned as new values.
    pub fn pour(from: &Tube, to: &Tube) -> Result<(Tube, Tube), NotPourable> {
        if !Self::can_pour(from, to) {
            return Err(NotPourable);
        }
        let transfer_amount = from.get_top_fluid_depth().min(to.get_empty_space());
        let mut new_from = from.clone();
        let mut new_to = to.clone();
        for _ in 0..transfer_amount {
            let packet = new_from.pop();
            new_to.push(packet);
        }
        Ok((new_from, new_to))
    }

    /// Labels bottom to top, then `.` per free slot. Comma separated when a
    /// label needs more than one letter.
    pub fn get_text_representation(&self) -> String {
        let mut repr: Vec<String> = self
            .packets
            .iter()
            .map(Fluid::get_letter_representation)
            .collect();
        repr.extend((0..self.get_empty_space()).map(|_| ".".to_string()));
        let has_multi_char = repr.iter().any(|s| s.len() > 1);
        let separator = if has_multi_char { "," } else { "" };
        repr.join(separator)
    }
}

impl fmt::Display for Tube {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.get_text_representation())
    }
}
