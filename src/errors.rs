use crate::lib::*;

/// An error that is returned when constructing a rate limiter that
/// could never let a single cell through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum InvalidConfiguration {
    /// The window has zero length, so no cell could ever be
    /// accounted for.
    #[error("window length must be greater than zero")]
    ZeroWindow,

    /// The limit is zero, so no cell would ever be admitted.
    #[error("limit must allow at least one cell per window")]
    ZeroLimit,
}

/// Gives additional information about the negative outcome of a batch
/// cell decision.
///
/// Since batch queries can be made for batch sizes bigger than the
/// rate limiter parameter could accomodate, there are two possible
/// negative outcomes:
///
///   * `BatchNonConforming` - the query is valid but the rate limiter
///     can not accomodate the cells right now.
///
///   * `InsufficientCapacity` - the query was invalid as the rate
///     limiter's limit can never accomodate the number of cells
///     queried for.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NegativeMultiDecision<E: fmt::Display> {
    /// A batch of cells (the first argument) is non-conforming and
    /// can not be let through at this time. The second argument gives
    /// information about when that batch of cells might be let
    /// through again (not accounting for thundering herds and other,
    /// simultaneous decisions).
    #[error("{0} cells: {1}")]
    BatchNonConforming(u32, E),

    /// The number of cells tested (the first argument) is larger than
    /// the limit, which means the decision can never have a
    /// conforming result.
    #[error("limit does not have enough capacity to accomodate {0} cells")]
    InsufficientCapacity(u32),
}
