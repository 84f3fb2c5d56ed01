//! Cyclic walk over a loaded batch of builds.

use serde::{Deserialize, Serialize};

use super::Build;

/// Position within a loaded batch.
///
/// "Generate again" walks to the next build of the batch already
/// fetched; requesting a new batch replaces the cursor entirely and
/// starts back at the first build. The walk is cyclic: advancing past
/// the last build wraps around.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BuildCursor {
    builds: Vec<Build>,
    index: usize,
}

impl BuildCursor {
    /// Wrap a freshly loaded batch, starting at the first build.
    pub fn new(builds: Vec<Build>) -> Self {
        Self { builds, index: 0 }
    }

    /// The build currently shown, or `None` for an empty batch.
    pub fn current(&self) -> Option<&Build> {
        self.builds.get(self.index)
    }

    /// Advance to the next build, wrapping at the end.
    ///
    /// A batch of zero or one builds is left unchanged.
    pub fn advance(&mut self) -> Option<&Build> {
        if self.builds.len() > 1 {
            self.index = (self.index + 1) % self.builds.len();
        }
        self.current()
    }

    /// Zero-based position of the current build.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Number of builds in the batch.
    pub fn len(&self) -> usize {
        self.builds.len()
    }

    /// True when the batch holds no builds.
    pub fn is_empty(&self) -> bool {
        self.builds.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn batch(n: usize) -> Vec<Build> {
        (0..n)
            .map(|i| Build {
                total_price: i as f64,
                ..Build::default()
            })
            .collect()
    }

    #[test]
    fn test_advancing_through_the_batch_wraps_to_start() {
        let mut cursor = BuildCursor::new(batch(3));
        assert_eq!(cursor.index(), 0);

        for _ in 0..3 {
            cursor.advance();
        }
        assert_eq!(cursor.index(), 0);
    }

    #[test]
    fn test_empty_batch_has_no_current_build() {
        let mut cursor = BuildCursor::new(Vec::new());
        assert!(cursor.current().is_none());
        assert!(cursor.advance().is_none());
        assert_eq!(cursor.index(), 0);
    }

    #[test]
    fn test_single_build_batch_never_moves() {
        let mut cursor = BuildCursor::new(batch(1));
        let before = cursor.current().map(|b| b.total_price);
        let after = cursor.advance().map(|b| b.total_price);
        assert_eq!(before, after);
        assert_eq!(cursor.index(), 0);
    }

    #[test]
    fn test_advance_returns_the_new_current_build() {
        let mut cursor = BuildCursor::new(batch(2));
        assert_eq!(cursor.advance().map(|b| b.total_price), Some(1.0));
        assert_eq!(cursor.advance().map(|b| b.total_price), Some(0.0));
    }
}
