/// Three-valued verdict of a filter.
///
/// `Reject` absorbs everything, `Accept` beats `Neutral`, and `Neutral` is the
/// identity of [`combine`](ComparatorResult::combine).
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
pub enum ComparatorResult {
    Accept,
    #[default]
    Neutral,
    Reject,
}

impl ComparatorResult {
    pub fn combine(self, other: ComparatorResult) -> ComparatorResult {
        match (self, other) {
            (ComparatorResult::Reject, _) | (_, ComparatorResult::Reject) => {
                ComparatorResult::Reject
            }
            (ComparatorResult::Accept, _) | (_, ComparatorResult::Accept) => {
                ComparatorResult::Accept
            }
            _ => ComparatorResult::Neutral,
        }
    }

    /// Left fold of `combine` seeded with `Neutral`. Consumes the whole iterator.
    pub fn combine_all<I>(results: I) -> ComparatorResult
    where
        I: IntoIterator<Item = ComparatorResult>,
    {
        results
            .into_iter()
            .fold(ComparatorResult::Neutral, ComparatorResult::combine)
    }

    /// `Accept` when `matched`, `Reject` otherwise.
    pub fn from_match(matched: bool) -> ComparatorResult {
        if matched {
            ComparatorResult::Accept
        } else {
            ComparatorResult::Reject
        }
    }

    pub fn is_accept(self) -> bool {
        self == ComparatorResult::Accept
    }

    pub fn is_reject(self) -> bool {
        self == ComparatorResult::Reject
    }
}
