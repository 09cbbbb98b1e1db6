//! Results of walking a paginated collection.

use crate::Error;

/// How a collection walk ended.
#[derive(Debug, Default)]
pub enum Completion {
    /// Every page was fetched.
    #[default]
    Exhausted,
    /// The walk stopped early; items fetched before the failure are kept.
    Truncated(Error),
}

/// Items gathered from a collection together with how the walk ended.
///
/// A truncated listing is a partial result, not a failure: callers keep
/// the items and decide whether the missing tail matters.
#[derive(Debug)]
pub struct Listing<T> {
    /// Items in server order.
    pub items: Vec<T>,
    /// Whether the collection was read to the end.
    pub completion: Completion,
}

impl<T> Listing<T> {
    /// Creates a listing that covers the whole collection.
    pub fn exhausted(items: Vec<T>) -> Self {
        Self {
            items,
            completion: Completion::Exhausted,
        }
    }

    /// Creates a listing that stopped early because of `error`.
    pub fn truncated(items: Vec<T>, error: Error) -> Self {
        Self {
            items,
            completion: Completion::Truncated(error),
        }
    }

    /// Returns `true` if the collection was read to the end.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        matches!(self.completion, Completion::Exhausted)
    }

    /// Returns the error that cut the walk short, if any.
    #[must_use]
    pub fn error(&self) -> Option<&Error> {
        match &self.completion {
            Completion::Exhausted => None,
            Completion::Truncated(error) => Some(error),
        }
    }

    /// Converts every item, keeping the completion state.
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Listing<U> {
        Listing {
            items: self.items.into_iter().map(f).collect(),
            completion: self.completion,
        }
    }

    /// Splits the listing into its items and completion state.
    pub fn into_parts(self) -> (Vec<T>, Completion) {
        (self.items, self.completion)
    }

    /// Converts the listing into a `Result`, discarding partial items on failure.
    pub fn into_result(self) -> crate::Result<Vec<T>> {
        match self.completion {
            Completion::Exhausted => Ok(self.items),
            Completion::Truncated(error) => Err(error),
        }
    }
}
