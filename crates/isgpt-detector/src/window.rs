//! Overlapping context windows over a token sequence
//!
//! A language model can only attend to a bounded number of positions, so long
//! sequences are scored in windows of `size` tokens whose starts advance by
//! `stride`. Consecutive windows overlap by `size - stride` tokens. The overlap
//! supplies left context, and a window only scores tokens past the first one
//! it adds beyond its predecessor's end.

use isgpt_core::{Error, Result};
use std::iter::FusedIterator;
use std::ops::Range;

/// A contiguous slice `[begin, end)` of a token sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    /// First token index (inclusive)
    pub begin: usize,

    /// Last token index (exclusive)
    pub end: usize,

    /// Offset inside the window of the first token not already covered by the
    /// previous window. Always 0 for the first window.
    pub target_start: usize,
}

impl Window {
    /// Number of tokens in the window
    pub fn len(&self) -> usize {
        self.end - self.begin
    }

    /// Whether the window holds no tokens
    pub fn is_empty(&self) -> bool {
        self.begin == self.end
    }

    /// Window offsets of the tokens this window predicts.
    ///
    /// Logits rows `[target_start, len - 1)` are scored, and row `i` predicts
    /// the token at offset `i + 1`, so the targets are
    /// `target_start + 1..len`. The first newly covered token of a later
    /// window is never a target.
    pub fn targets(&self) -> Range<usize> {
        self.target_start + 1..self.len()
    }

    /// Token range covered, in sequence coordinates
    pub fn range(&self) -> Range<usize> {
        self.begin..self.end
    }
}

/// Window size and stride for a sequence of known length
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowPlan {
    total: usize,
    size: usize,
    stride: usize,
}

impl WindowPlan {
    /// Create a plan for `total` tokens.
    ///
    /// `size` must be positive and `stride` must lie in `1..=size`.
    pub fn new(total: usize, size: usize, stride: usize) -> Result<Self> {
        if size == 0 {
            return Err(Error::config("window size must be at least 1"));
        }
        if stride == 0 || stride > size {
            return Err(Error::config(format!(
                "stride must be between 1 and the window size ({}), got {}",
                size, stride
            )));
        }

        Ok(Self { total, size, stride })
    }

    /// Total number of tokens in the sequence
    pub fn total(&self) -> usize {
        self.total
    }

    /// Maximum window length
    pub fn size(&self) -> usize {
        self.size
    }

    /// Distance between consecutive window starts
    pub fn stride(&self) -> usize {
        self.stride
    }

    /// Iterate over the windows. Each call starts again from the beginning.
    pub fn windows(&self) -> Windows {
        Windows {
            plan: *self,
            begin: 0,
            prev_end: 0,
            finished: self.total == 0,
        }
    }
}

/// Iterator over the windows of a [`WindowPlan`]
#[derive(Debug, Clone)]
pub struct Windows {
    plan: WindowPlan,
    begin: usize,
    prev_end: usize,
    finished: bool,
}

impl Iterator for Windows {
    type Item = Window;

    fn next(&mut self) -> Option<Window> {
        if self.finished {
            return None;
        }

        let begin = self.begin;
        let end = (begin + self.plan.size).min(self.plan.total);
        let len = end - begin;
        let target_start = if begin == 0 {
            0
        } else {
            len - (end - self.prev_end)
        };

        self.prev_end = end;
        self.begin += self.plan.stride;
        // The window reaching the end of the sequence is the last one.
        self.finished = end == self.plan.total;

        Some(Window {
            begin,
            end,
            target_start,
        })
    }
}

impl FusedIterator for Windows {}

#[cfg(test)]
mod tests {
    use super::*;

    fn collect(total: usize, size: usize, stride: usize) -> Vec<Window> {
        WindowPlan::new(total, size, stride).unwrap().windows().collect()
    }

    #[test]
    fn test_short_sequence_single_window() {
        let windows = collect(10, 1024, 512);

        assert_eq!(
            windows,
            vec![Window {
                begin: 0,
                end: 10,
                target_start: 0
            }]
        );
    }

    #[test]
    fn test_exact_fit_single_window() {
        let windows = collect(8, 8, 4);
        assert_eq!(windows.len(), 1);
        assert_eq!(windows[0].range(), 0..8);
    }

    #[test]
    fn test_overlapping_windows() {
        let windows = collect(10, 4, 2);

        let ranges: Vec<_> = windows.iter().map(|w| w.range()).collect();
        assert_eq!(ranges, vec![0..4, 2..6, 4..8, 6..10]);

        // Each later window only adds the two tokens past its predecessor.
        assert_eq!(windows[0].target_start, 0);
        for w in &windows[1..] {
            assert_eq!(w.target_start, 2);
        }
    }

    #[test]
    fn test_short_final_window() {
        let windows = collect(7, 4, 2);

        let ranges: Vec<_> = windows.iter().map(|w| w.range()).collect();
        assert_eq!(ranges, vec![0..4, 2..6, 4..7]);
        // Final window [4, 7) newly covers token 6 and scores nothing.
        assert_eq!(windows[2].target_start, 2);
        assert!(windows[2].targets().is_empty());
        assert_eq!(windows[1].targets(), 3..4);
    }

    #[test]
    fn test_targets_skip_first_new_token() {
        // [0, 4) scores 1, 2, 3; each later window scores only its last token.
        let targets: Vec<usize> = collect(10, 4, 2)
            .iter()
            .flat_map(|w| w.targets().map(move |t| w.begin + t))
            .collect();

        assert_eq!(targets, vec![1, 2, 3, 5, 7, 9]);
    }

    #[test]
    fn test_targets_never_repeat() {
        for (total, size, stride) in [(1, 4, 2), (9, 4, 2), (9, 4, 3), (13, 5, 4), (100, 16, 1)] {
            let mut seen = vec![0usize; total];
            for w in collect(total, size, stride) {
                for offset in w.targets() {
                    seen[w.begin + offset] += 1;
                }
            }

            assert_eq!(seen[0], 0, "first token is never a target");
            assert!(seen.iter().all(|&c| c <= 1), "{:?}", seen);
        }
    }

    #[test]
    fn test_disjoint_windows_skip_leading_tokens() {
        // Without overlap a chunk's first token has no left context to be
        // predicted from.
        let windows = collect(10, 5, 5);

        assert_eq!(windows.len(), 2);
        assert_eq!(windows[1].target_start, 0);
        assert_eq!(windows[1].targets(), 1..5);
    }

    #[test]
    fn test_windows_restartable() {
        let plan = WindowPlan::new(20, 8, 4).unwrap();
        let first: Vec<_> = plan.windows().collect();
        let second: Vec<_> = plan.windows().collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_empty_sequence_has_no_windows() {
        assert!(collect(0, 4, 2).is_empty());
    }

    #[test]
    fn test_invalid_plans() {
        assert!(WindowPlan::new(10, 0, 1).is_err());
        assert!(WindowPlan::new(10, 4, 0).is_err());
        assert!(WindowPlan::new(10, 4, 5).is_err());
    }
}
