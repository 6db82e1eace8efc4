use std::fmt;

/// A closed, ordered set of wizard steps.
///
/// Step numbers are 1-based positions in [`Step::ALL`]. `next`/`prev` form the
/// transition table used by the wizard controller.
pub trait Step: Copy + Eq + fmt::Debug + 'static {
    const ALL: &'static [Self];

    fn label(self) -> &'static str;

    fn number(self) -> usize {
        Self::ALL
            .iter()
            .position(|s| *s == self)
            .map_or(1, |i| i + 1)
    }

    fn from_number(n: usize) -> Option<Self> {
        n.checked_sub(1).and_then(|i| Self::ALL.get(i)).copied()
    }

    fn first() -> Self {
        Self::ALL[0]
    }

    fn last() -> Self {
        Self::ALL[Self::ALL.len() - 1]
    }

    fn next(self) -> Option<Self> {
        Self::from_number(self.number() + 1)
    }

    fn prev(self) -> Option<Self> {
        Self::from_number(self.number() - 1)
    }

    fn is_last(self) -> bool {
        self == Self::last()
    }
}
