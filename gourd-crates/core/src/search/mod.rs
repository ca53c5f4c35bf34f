//! A thin search layer on top of the engine: a [`DepthFirstSearch`] which makes the decisions of a
//! [`Brancher`](crate::branching::Brancher) until every variable is fixed, a contradiction cannot
//! be resolved, or a [`SearchLimit`] is reached.
mod depth_first_search;
mod limit;

pub use depth_first_search::DepthFirstSearch;
pub use depth_first_search::SearchResult;
pub use limit::SearchBudget;
pub use limit::SearchLimit;
