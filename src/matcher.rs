//! Nearest-match resolution within one ident group

use crate::config::DiffConfig;
use crate::row::Row;
use crate::snapshot::Snapshot;
use serde::Serialize;

/// Result of a nearest-neighbor search for one needle row.
///
/// The chosen candidate is always the first one encountered at the minimum
/// distance, so the outcome is reproducible for a given input ordering.
#[derive(Debug)]
pub enum MatchOutcome<'s> {
    /// Ident group absent, empty, or every candidate beyond `max_dist`
    NoMatch,
    /// Exactly one candidate at the minimum distance
    Unique { index: usize, row: &'s Row },
    /// Several candidates tied at the minimum distance. `identical` is true
    /// when the tied candidates are mutually equal (harmless duplicates);
    /// otherwise this is a genuine ambiguity.
    Ambiguous {
        index: usize,
        row: &'s Row,
        candidates: Vec<&'s Row>,
        identical: bool,
    },
}

impl<'s> MatchOutcome<'s> {
    /// The candidate this outcome settles on, if any
    pub fn chosen(&self) -> Option<&'s Row> {
        match self {
            MatchOutcome::NoMatch => None,
            MatchOutcome::Unique { row, .. } => Some(*row),
            MatchOutcome::Ambiguous { row, .. } => Some(*row),
        }
    }
}

/// Finds the nearest row to a needle inside the needle's ident group
#[derive(Debug)]
pub struct Matcher<'cfg> {
    config: &'cfg DiffConfig,
}

impl<'cfg> Matcher<'cfg> {
    pub fn new(config: &'cfg DiffConfig) -> Self {
        Self { config }
    }

    /// Search a whole snapshot: looks up the needle's ident group first
    pub fn find_nearest<'s>(&self, needle: &Row, haystack: &'s Snapshot) -> MatchOutcome<'s> {
        match haystack.group(&needle.ident) {
            Some(candidates) => self.find_nearest_in(needle, candidates),
            None => MatchOutcome::NoMatch,
        }
    }

    /// Search an explicit candidate list (all sharing the needle's ident)
    pub fn find_nearest_in<'s>(&self, needle: &Row, candidates: &'s [Row]) -> MatchOutcome<'s> {
        let max_dist = self.config.max_dist;
        let mut min_dist = usize::MAX;
        let mut best: Vec<usize> = Vec::new();

        for (i, candidate) in candidates.iter().enumerate() {
            let d = needle.distance_clipped(candidate, max_dist, &self.config.strict_columns);
            if d < min_dist {
                min_dist = d;
                best.clear();
                best.push(i);
            } else if d == min_dist {
                best.push(i);
            }
        }

        if min_dist > max_dist {
            return MatchOutcome::NoMatch;
        }

        let index = best[0];
        if best.len() == 1 {
            return MatchOutcome::Unique {
                index,
                row: &candidates[index],
            };
        }

        let tied: Vec<&Row> = best.iter().map(|&i| &candidates[i]).collect();
        let identical = tied[1..]
            .iter()
            .all(|c| tied[0].distance(c, &self.config.strict_columns) == 0);
        MatchOutcome::Ambiguous {
            index,
            row: &candidates[index],
            candidates: tied,
            identical,
        }
    }
}

/// A pair of near-duplicate rows found within one ident group
#[derive(Debug, Clone, Serialize)]
pub struct DuplicatePair {
    pub first: Row,
    pub second: Row,
    pub distance: usize,
}

/// All-pairs duplicate scan over one snapshot: every pair of rows in the
/// same ident group at distance <= max_dist. O(group size squared) per
/// group; key groups are assumed small.
pub fn find_duplicates(snapshot: &Snapshot, config: &DiffConfig) -> Vec<DuplicatePair> {
    let mut pairs = Vec::new();
    for (_, rows) in snapshot.iter_groups() {
        if rows.len() < 2 {
            continue;
        }
        for i in 1..rows.len() {
            for j in 0..i {
                let d = rows[i].distance(&rows[j], &config.strict_columns);
                if d <= config.max_dist {
                    pairs.push(DuplicatePair {
                        first: rows[j].clone(),
                        second: rows[i].clone(),
                        distance: d,
                    });
                }
            }
        }
    }
    pairs
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Value;
    use std::sync::Arc;

    fn columns() -> Arc<[String]> {
        vec!["a".to_string(), "b".to_string()].into()
    }

    fn row(ident: &str, a: i64, b: &str) -> Row {
        Row::new(ident, vec![Value::Integer(a), Value::Text(b.into())])
    }

    fn config(max_dist: usize) -> DiffConfig {
        DiffConfig {
            max_dist,
            ..DiffConfig::default()
        }
    }

    #[test]
    fn test_absent_ident_is_no_match() {
        let cfg = config(3);
        let matcher = Matcher::new(&cfg);
        let haystack = Snapshot::from_rows(columns(), vec![row("p2", 1, "x")]);
        let needle = row("p1", 1, "x");
        assert!(matches!(
            matcher.find_nearest(&needle, &haystack),
            MatchOutcome::NoMatch
        ));
    }

    #[test]
    fn test_unique_match() {
        let cfg = config(1);
        let matcher = Matcher::new(&cfg);
        let haystack = Snapshot::from_rows(
            columns(),
            vec![row("p1", 1, "y"), row("p1", 9, "z")],
        );
        let needle = row("p1", 1, "x");
        match matcher.find_nearest(&needle, &haystack) {
            MatchOutcome::Unique { index, row } => {
                assert_eq!(index, 0);
                assert_eq!(row.values[1], Value::Text("y".into()));
            }
            other => panic!("expected unique match, got {:?}", other),
        }
    }

    #[test]
    fn test_threshold_boundary() {
        let matcher_cfg = config(1);
        let matcher = Matcher::new(&matcher_cfg);
        let haystack = Snapshot::from_rows(columns(), vec![row("p1", 2, "y")]);

        // Distance exactly max_dist matches
        let at_threshold = row("p1", 2, "x");
        assert!(matcher.find_nearest(&at_threshold, &haystack).chosen().is_some());

        // Distance max_dist + 1 does not
        let beyond = row("p1", 1, "x");
        assert!(matcher.find_nearest(&beyond, &haystack).chosen().is_none());
    }

    #[test]
    fn test_ambiguous_distinct_candidates() {
        let cfg = config(1);
        let matcher = Matcher::new(&cfg);
        let haystack = Snapshot::from_rows(
            columns(),
            vec![row("p1", 1, "b"), row("p1", 1, "c")],
        );
        let needle = row("p1", 1, "a");
        match matcher.find_nearest(&needle, &haystack) {
            MatchOutcome::Ambiguous {
                index,
                candidates,
                identical,
                ..
            } => {
                // First encountered wins
                assert_eq!(index, 0);
                assert_eq!(candidates.len(), 2);
                assert!(!identical);
            }
            other => panic!("expected ambiguous match, got {:?}", other),
        }
    }

    #[test]
    fn test_ambiguous_identical_duplicates() {
        let cfg = config(1);
        let matcher = Matcher::new(&cfg);
        let haystack = Snapshot::from_rows(
            columns(),
            vec![row("p1", 1, "b"), row("p1", 1, "b")],
        );
        let needle = row("p1", 1, "a");
        match matcher.find_nearest(&needle, &haystack) {
            MatchOutcome::Ambiguous { identical, .. } => assert!(identical),
            other => panic!("expected ambiguous match, got {:?}", other),
        }
    }

    #[test]
    fn test_closer_candidate_beats_earlier_tie() {
        let cfg = config(3);
        let matcher = Matcher::new(&cfg);
        let haystack = Snapshot::from_rows(
            columns(),
            vec![row("p1", 9, "a"), row("p1", 1, "a")],
        );
        let needle = row("p1", 1, "a");
        match matcher.find_nearest(&needle, &haystack) {
            MatchOutcome::Unique { index, .. } => assert_eq!(index, 1),
            other => panic!("expected unique match, got {:?}", other),
        }
    }

    #[test]
    fn test_find_duplicates() {
        let cfg = config(1);
        let snapshot = Snapshot::from_rows(
            columns(),
            vec![
                row("p1", 1, "x"),
                row("p1", 1, "y"),
                row("p1", 9, "z"),
                row("p2", 1, "x"),
            ],
        );
        let pairs = find_duplicates(&snapshot, &cfg);
        // Only the (1,"x")/(1,"y") pair is within distance 1; the p2 row
        // lives in a different group
        assert_eq!(pairs.len(), 1);
        assert_eq!(pairs[0].distance, 1);
        assert_eq!(pairs[0].first.ident, "p1");
    }
}
