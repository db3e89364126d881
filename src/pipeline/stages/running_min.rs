//! Cumulative-minimum scan over an ordered partition.
//!
//! Every record evaluation in the audit is the same computation at a
//! different scope: split the rows into partitions, order each partition,
//! keep a best-so-far accumulator of eligible values, and flag a row when its
//! own value equals the accumulator as of its ordering position.
//!
//! Rows sharing the same ordering key are peers: all of them are folded into
//! the accumulator before any of them is compared. A row is therefore
//! measured against everything up to and including its own position, and
//! equal values at different positions are all flagged.

use rayon::prelude::*;
use std::collections::BTreeMap;

/// Scope definition for one scan: how rows are partitioned, ordered, valued
/// and which values may enter the accumulator.
pub struct RunningMinimum<P, O, V, E> {
    pub partition: P,
    pub order: O,
    pub value: V,
    pub eligible: E,
}

impl<P, O, V, E> RunningMinimum<P, O, V, E> {
    /// Flags aligned with `rows`: `true` where the row holds the running
    /// minimum of its partition.
    pub fn flag<T, PK, OK>(&self, rows: &[T], parallel: bool) -> Vec<bool>
    where
        T: Sync,
        P: Fn(&T) -> PK + Sync,
        O: Fn(&T) -> OK + Sync,
        V: Fn(&T) -> Option<i64> + Sync,
        E: Fn(&T, i64) -> bool + Sync,
        PK: Ord,
        OK: Ord,
    {
        let mut partitions: BTreeMap<PK, Vec<usize>> = BTreeMap::new();
        for (index, row) in rows.iter().enumerate() {
            partitions.entry((self.partition)(row)).or_default().push(index);
        }
        let partitions: Vec<Vec<usize>> = partitions.into_values().collect();

        let flagged: Vec<usize> = if parallel {
            partitions
                .par_iter()
                .flat_map_iter(|members| self.scan_partition(rows, members))
                .collect()
        } else {
            partitions
                .iter()
                .flat_map(|members| self.scan_partition(rows, members))
                .collect()
        };

        let mut flags = vec![false; rows.len()];
        for index in flagged {
            flags[index] = true;
        }
        flags
    }

    fn scan_partition<T, OK>(&self, rows: &[T], members: &[usize]) -> Vec<usize>
    where
        O: Fn(&T) -> OK,
        V: Fn(&T) -> Option<i64>,
        E: Fn(&T, i64) -> bool,
        OK: Ord,
    {
        let mut ordered: Vec<(OK, usize)> = members
            .iter()
            .map(|&index| ((self.order)(&rows[index]), index))
            .collect();
        ordered.sort_by(|a, b| a.0.cmp(&b.0).then(a.1.cmp(&b.1)));

        let mut best: Option<i64> = None;
        let mut flagged = Vec::new();
        let mut start = 0;
        while start < ordered.len() {
            let end = start
                + ordered[start..]
                    .iter()
                    .take_while(|(key, _)| *key == ordered[start].0)
                    .count();
            let peers = &ordered[start..end];

            for &(_, index) in peers {
                let row = &rows[index];
                if let Some(value) = (self.value)(row).filter(|v| (self.eligible)(row, *v)) {
                    best = Some(best.map_or(value, |b| b.min(value)));
                }
            }
            for &(_, index) in peers {
                if best.is_some() && (self.value)(&rows[index]) == best {
                    flagged.push(index);
                }
            }
            start = end;
        }
        flagged
    }
}

/// Eligibility against a frozen baseline: a value may set a record when it
/// does not exceed the previous best, or when there is no previous best.
pub fn within_baseline(value: i64, baseline: Option<i64>) -> bool {
    baseline.is_none_or(|limit| value <= limit)
}
