//! Counting and averaging primitives used by the statistics groups.
//!
//! Every accumulator remembers the order in which keys were first seen, so
//! ties are always broken in favour of the value encountered first in
//! table-scan order.

use std::collections::HashMap;
use std::hash::Hash;

// ── FrequencyTable ────────────────────────────────────────────────────────────

/// Occurrence counts keyed by value, in first-encountered order.
#[derive(Debug, Clone)]
pub struct FrequencyTable<K> {
    positions: HashMap<K, usize>,
    entries: Vec<(K, u64)>,
}

impl<K> Default for FrequencyTable<K> {
    fn default() -> Self {
        Self {
            positions: HashMap::new(),
            entries: Vec::new(),
        }
    }
}

impl<K: Eq + Hash + Clone> FrequencyTable<K> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, key: K) {
        match self.positions.get(&key) {
            Some(&i) => self.entries[i].1 += 1,
            None => {
                self.positions.insert(key.clone(), self.entries.len());
                self.entries.push((key, 1));
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of distinct keys.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Highest count; first-encountered key wins a tie.
    pub fn mode(&self) -> Option<(&K, u64)> {
        self.entries
            .iter()
            .fold(None, |best: Option<&(K, u64)>, entry| match best {
                Some(b) if b.1 >= entry.1 => Some(b),
                _ => Some(entry),
            })
            .map(|(k, c)| (k, *c))
    }

    /// Lowest count; first-encountered key wins a tie.
    pub fn least(&self) -> Option<(&K, u64)> {
        self.entries
            .iter()
            .fold(None, |best: Option<&(K, u64)>, entry| match best {
                Some(b) if b.1 <= entry.1 => Some(b),
                _ => Some(entry),
            })
            .map(|(k, c)| (k, *c))
    }

    /// All keys by descending count; equal counts keep first-encountered order.
    pub fn sorted_desc(&self) -> Vec<(K, u64)> {
        let mut out = self.entries.clone();
        out.sort_by(|a, b| b.1.cmp(&a.1));
        out
    }
}

impl<K: Eq + Hash + Clone> FromIterator<K> for FrequencyTable<K> {
    fn from_iter<I: IntoIterator<Item = K>>(iter: I) -> Self {
        let mut table = FrequencyTable::new();
        for key in iter {
            table.add(key);
        }
        table
    }
}

// ── GroupMeans ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default)]
struct Accum {
    sum: f64,
    count: u64,
}

/// Running mean of a value per key, in first-encountered key order.
#[derive(Debug, Clone)]
pub struct GroupMeans<K> {
    positions: HashMap<K, usize>,
    groups: Vec<(K, Accum)>,
}

impl<K> Default for GroupMeans<K> {
    fn default() -> Self {
        Self {
            positions: HashMap::new(),
            groups: Vec::new(),
        }
    }
}

impl<K: Eq + Hash + Clone> GroupMeans<K> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, key: K, value: f64) {
        let i = match self.positions.get(&key) {
            Some(&i) => i,
            None => {
                self.positions.insert(key.clone(), self.groups.len());
                self.groups.push((key, Accum::default()));
                self.groups.len() - 1
            }
        };
        let acc = &mut self.groups[i].1;
        acc.sum += value;
        acc.count += 1;
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// `(key, mean)` in first-encountered order.
    pub fn means(&self) -> Vec<(K, f64)> {
        self.groups
            .iter()
            .map(|(k, acc)| (k.clone(), acc.sum / acc.count as f64))
            .collect()
    }

    /// Means by descending value; equal means keep first-encountered order.
    pub fn sorted_desc(&self) -> Vec<(K, f64)> {
        let mut out = self.means();
        out.sort_by(|a, b| b.1.total_cmp(&a.1));
        out
    }

    /// The `n` groups with the largest means.
    pub fn top(&self, n: usize) -> Vec<(K, f64)> {
        let mut out = self.sorted_desc();
        out.truncate(n);
        out
    }
}

// ── Scalar helpers ────────────────────────────────────────────────────────────

/// Arithmetic mean, `None` for an empty slice.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Pearson correlation coefficient of paired samples.
///
/// Undefined (and `None`) with fewer than two pairs, mismatched lengths or
/// zero variance in either series. Symmetric in its arguments and clamped
/// to `[-1, 1]`.
pub fn pearson(xs: &[f64], ys: &[f64]) -> Option<f64> {
    if xs.len() != ys.len() || xs.len() < 2 {
        return None;
    }
    let mx = mean(xs)?;
    let my = mean(ys)?;

    let mut sxy = 0.0;
    let mut sxx = 0.0;
    let mut syy = 0.0;
    for (x, y) in xs.iter().zip(ys) {
        let dx = x - mx;
        let dy = y - my;
        sxy += dx * dy;
        sxx += dx * dx;
        syy += dy * dy;
    }

    let denom = (sxx * syy).sqrt();
    if denom == 0.0 || !denom.is_finite() {
        return None;
    }
    Some((sxy / denom).clamp(-1.0, 1.0))
}

// ── Tests ─────────────────────────────────────────────────────────────────────
