//! Per-scope source line tracking
//!
//! Each scoped block gets an opaque handle; lines touched while traversing
//! the block accumulate in that handle's set. When the block's descriptor is
//! emitted the set is coalesced into a comma-separated list of inclusive
//! ranges.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt::Write;

/// Line sets keyed by scope handle
#[derive(Debug, Default)]
pub struct LineMap {
    next_handle: u32,
    lines: BTreeMap<u32, BTreeSet<u32>>,
}

impl LineMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate a fresh handle (handles are >= 1)
    pub fn create_handle(&mut self) -> u32 {
        self.next_handle += 1;
        self.next_handle
    }

    /// Record every line in `[first, last]` against `handle`
    pub fn track(&mut self, handle: u32, first: u32, last: u32) {
        let set = self.lines.entry(handle).or_default();
        for line in first..=last {
            set.insert(line);
        }
    }

    /// Coalesce a handle's line set into `"a"`, `"a-b"`, `"r1,r2,..."` form
    ///
    /// An empty or unknown handle yields the empty string.
    pub fn lines_cov(&self, handle: u32) -> String {
        let mut out = String::new();
        let Some(lines) = self.lines.get(&handle) else {
            return out;
        };
        let mut run: Option<(u32, u32)> = None;
        for &line in lines {
            run = match run {
                None => Some((line, line)),
                Some((first, last)) if line == last + 1 => Some((first, line)),
                Some((first, last)) => {
                    push_range(&mut out, first, last);
                    Some((line, line))
                }
            };
        }
        if let Some((first, last)) = run {
            push_range(&mut out, first, last);
        }
        out
    }
}

fn push_range(out: &mut String, first: u32, last: u32) {
    if !out.is_empty() {
        out.push(',');
    }
    if first == last {
        let _ = write!(out, "{}", first);
    } else {
        let _ = write!(out, "{}-{}", first, last);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coalesce_runs() {
        let mut map = LineMap::new();
        let h = map.create_handle();
        for line in [3, 4, 5, 7, 9, 10] {
            map.track(h, line, line);
        }
        assert_eq!(map.lines_cov(h), "3-5,7,9-10");
    }

    #[test]
    fn test_single_line() {
        let mut map = LineMap::new();
        let h = map.create_handle();
        map.track(h, 8, 8);
        assert_eq!(map.lines_cov(h), "8");
    }

    #[test]
    fn test_empty() {
        let mut map = LineMap::new();
        let h = map.create_handle();
        assert_eq!(map.lines_cov(h), "");
        assert_eq!(map.lines_cov(999), "");
    }

    #[test]
    fn test_range_insert_and_dedup() {
        let mut map = LineMap::new();
        let h = map.create_handle();
        map.track(h, 10, 12);
        map.track(h, 11, 14);
        assert_eq!(map.lines_cov(h), "10-14");
    }

    #[test]
    fn test_handles_distinct() {
        let mut map = LineMap::new();
        let a = map.create_handle();
        let b = map.create_handle();
        assert_ne!(a, b);
        assert_eq!(a, 1);
    }
}
