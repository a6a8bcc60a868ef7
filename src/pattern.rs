use std::fmt;
use std::ops::Index;

use serde::{Deserialize, Serialize};

use crate::instance::Instance;

/// One way of cutting a board: `counts[i]` pieces of width `widths[i]`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Pattern {
    counts: Vec<u32>,
}

impl Pattern {
    pub fn new(counts: Vec<u32>) -> Self {
        Pattern { counts }
    }

    /// A pattern cutting `count` pieces of item `item` and nothing else.
    pub fn singleton(n_items: usize, item: usize, count: u32) -> Self {
        let mut counts = vec![0; n_items];
        counts[item] = count;
        Pattern { counts }
    }

    pub fn counts(&self) -> &[u32] {
        &self.counts
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Width of the board used by the pieces of this pattern.
    pub fn used_width(&self, widths: &[f64]) -> f64 {
        self.counts
            .iter()
            .zip(widths)
            .map(|(&c, w)| c as f64 * w)
            .sum()
    }

    /// Width of the board left over after cutting this pattern.
    pub fn waste(&self, instance: &Instance) -> f64 {
        instance.stock_width() - self.used_width(instance.widths())
    }

    /// Whether the pattern has one entry per item and fits on a board.
    pub fn fits(&self, instance: &Instance, tolerance: f64) -> bool {
        self.len() == instance.n_items()
            && self.used_width(instance.widths()) <= instance.stock_width() + tolerance
    }
}

impl Index<usize> for Pattern {
    type Output = u32;

    fn index(&self, item: usize) -> &u32 {
        &self.counts[item]
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.counts)
    }
}

impl From<Vec<u32>> for Pattern {
    fn from(counts: Vec<u32>) -> Self {
        Pattern::new(counts)
    }
}

/// The growing, append-only set of patterns known to column generation.
///
/// A pattern is identified by its position; duplicates are kept as they are.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PatternPool {
    patterns: Vec<Pattern>,
}

impl PatternPool {
    pub fn new() -> Self {
        PatternPool::default()
    }

    pub fn push(&mut self, pattern: Pattern) {
        self.patterns.push(pattern);
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Pattern> {
        self.patterns.iter()
    }

    pub fn patterns(&self) -> &[Pattern] {
        &self.patterns
    }
}

impl Index<usize> for PatternPool {
    type Output = Pattern;

    fn index(&self, index: usize) -> &Pattern {
        &self.patterns[index]
    }
}

impl<'a> IntoIterator for &'a PatternPool {
    type Item = &'a Pattern;
    type IntoIter = std::slice::Iter<'a, Pattern>;

    fn into_iter(self) -> Self::IntoIter {
        self.patterns.iter()
    }
}

impl FromIterator<Pattern> for PatternPool {
    fn from_iter<I: IntoIterator<Item = Pattern>>(iter: I) -> Self {
        PatternPool {
            patterns: iter.into_iter().collect(),
        }
    }
}

/// Maximum number of pieces of width `width` that fit on a board of width `stock_width`.
///
/// Saturates at `u32::MAX`, which [`Instance::new`] rules out for valid instances.
pub fn max_copies(stock_width: f64, width: f64, tolerance: f64) -> u32 {
    let mut count = ((stock_width + tolerance) / width).floor().min(u32::MAX as f64) as u32;
    while count > 0 && count as f64 * width > stock_width + tolerance {
        count -= 1;
    }
    count
}

/// Starting pool: pattern `i` cuts as many pieces of width `i` as fit on a board, and nothing else.
pub fn initial_patterns(instance: &Instance, tolerance: f64) -> PatternPool {
    let n_items = instance.n_items();
    let stock_width = instance.stock_width();
    instance
        .widths()
        .iter()
        .enumerate()
        .map(|(i, &w)| Pattern::singleton(n_items, i, max_copies(stock_width, w, tolerance)))
        .collect()
}
