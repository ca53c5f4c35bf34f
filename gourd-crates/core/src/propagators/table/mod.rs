//! Extensional constraints: the allowed (or forbidden) combinations of values are given as a
//! relation, and the propagators enforce (generalized) arc consistency on it.
//!
//! All algorithms compute the same fixed point; they differ in how they find the support of a
//! value. [`AcAlgorithm`] selects the algorithm of the binary propagator, [`GacAlgorithm`] the one
//! of the n-ary propagator.
mod binary_table;
mod nary_table;
mod relation;

pub use binary_table::*;
pub use nary_table::*;
pub use relation::*;

use crate::create_statistics_struct;

/// The arc consistency algorithm of a [`BinaryTablePropagator`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum AcAlgorithm {
    /// Scan the other domain for every value.
    Ac3,
    /// Remember the last support of every value; the scan resumes after it. The last supports are
    /// backtrackable.
    Ac2001,
    /// Remember the last support of every value as a residue which is checked first.
    #[default]
    Ac3rm,
    /// Residues, with the supports of a value taken from the rows of the bit matrix.
    Ac3rmBitSet,
}

/// The generalized arc consistency algorithm of a [`TablePropagator`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum GacAlgorithm {
    /// Walk the list of allowed tuples of every value from the last support found. Only for
    /// relations of allowed tuples.
    Gac2001,
    /// Residual supports; works for allowed as well as forbidden tuples.
    #[default]
    Gac3rm,
}

create_statistics_struct!(TableStatistics {
    num_calls: u64,
    num_support_checks: u64,
    num_prunings: u64,
});
