use std::ops::RangeInclusive;

use fixedbitset::FixedBitSet;

use crate::basic_types::ModelError;
use crate::containers::HashMap;
use crate::containers::HashSet;

/// A relation between two variables as a matrix of bits: row `x` holds the values of `y` which
/// are compatible with `x`. Pairs outside the ranges of the relation are incompatible.
#[derive(Clone, Debug)]
pub struct BinaryRelation {
    x_offset: i32,
    y_offset: i32,
    rows: Vec<FixedBitSet>,
    columns: Vec<FixedBitSet>,
}

impl BinaryRelation {
    /// Create the relation over `x_values` and `y_values` from a list of pairs. If `feasible` the
    /// listed pairs are the compatible ones; otherwise they are the incompatible ones and every
    /// other pair of the ranges is compatible.
    pub fn from_tuples(
        x_values: RangeInclusive<i32>,
        y_values: RangeInclusive<i32>,
        tuples: &[(i32, i32)],
        feasible: bool,
    ) -> Result<BinaryRelation, ModelError> {
        let mut relation = BinaryRelation::filled(x_values, y_values, !feasible)?;

        for &(x, y) in tuples {
            let (Some(row), Some(column)) = (relation.row_index(x), relation.column_index(y))
            else {
                return Err(ModelError::MalformedRelation(format!(
                    "the pair ({x}, {y}) lies outside of the ranges of the relation"
                )));
            };
            relation.rows[row].set(column, feasible);
            relation.columns[column].set(row, feasible);
        }

        Ok(relation)
    }

    /// Create the relation from a matrix where `matrix[i][j]` states whether the pair
    /// `(x_lower_bound + i, y_lower_bound + j)` is listed; `feasible` is interpreted as in
    /// [`BinaryRelation::from_tuples`].
    pub fn from_matrix(
        x_lower_bound: i32,
        y_lower_bound: i32,
        matrix: &[Vec<bool>],
        feasible: bool,
    ) -> Result<BinaryRelation, ModelError> {
        let num_columns = matrix.first().map_or(0, Vec::len);
        if let Some(row) = matrix.iter().find(|row| row.len() != num_columns) {
            return Err(ModelError::MismatchedLengths {
                what: "row of the relation matrix",
                expected: num_columns,
                actual: row.len(),
            });
        }

        let x_values = x_lower_bound..=x_lower_bound + matrix.len() as i32 - 1;
        let y_values = y_lower_bound..=y_lower_bound + num_columns as i32 - 1;
        let tuples: Vec<(i32, i32)> = matrix
            .iter()
            .enumerate()
            .flat_map(|(i, row)| {
                row.iter()
                    .enumerate()
                    .filter(|&(_, &listed)| listed)
                    .map(move |(j, _)| (x_lower_bound + i as i32, y_lower_bound + j as i32))
            })
            .collect();

        BinaryRelation::from_tuples(x_values, y_values, &tuples, feasible)
    }

    fn filled(
        x_values: RangeInclusive<i32>,
        y_values: RangeInclusive<i32>,
        compatible: bool,
    ) -> Result<BinaryRelation, ModelError> {
        if x_values.is_empty() || y_values.is_empty() {
            return Err(ModelError::MalformedRelation(
                "the relation has an empty range".to_owned(),
            ));
        }

        let num_rows = (*x_values.end() as i64 - *x_values.start() as i64 + 1) as usize;
        let num_columns = (*y_values.end() as i64 - *y_values.start() as i64 + 1) as usize;
        let bits = |len: usize| {
            let mut bits = FixedBitSet::with_capacity(len);
            if compatible {
                bits.insert_range(..);
            }
            bits
        };

        Ok(BinaryRelation {
            x_offset: *x_values.start(),
            y_offset: *y_values.start(),
            rows: (0..num_rows).map(|_| bits(num_columns)).collect(),
            columns: (0..num_columns).map(|_| bits(num_rows)).collect(),
        })
    }

    fn row_index(&self, x: i32) -> Option<usize> {
        let index = x as i64 - self.x_offset as i64;
        (0..self.rows.len() as i64)
            .contains(&index)
            .then_some(index as usize)
    }

    fn column_index(&self, y: i32) -> Option<usize> {
        let index = y as i64 - self.y_offset as i64;
        (0..self.columns.len() as i64)
            .contains(&index)
            .then_some(index as usize)
    }

    /// The number of values in the ranges of `x` and of `y`.
    pub fn widths(&self) -> [usize; 2] {
        [self.rows.len(), self.columns.len()]
    }

    /// The smallest values of the ranges of `x` and of `y`.
    pub fn offsets(&self) -> [i32; 2] {
        [self.x_offset, self.y_offset]
    }

    /// Whether the pair `(x, y)` is compatible.
    pub fn is_consistent(&self, x: i32, y: i32) -> bool {
        match (self.row_index(x), self.column_index(y)) {
            (Some(row), Some(column)) => self.rows[row].contains(column),
            _ => false,
        }
    }

    /// The values of `y` compatible with `x`, in increasing order.
    pub fn supports_of_x(&self, x: i32) -> impl Iterator<Item = i32> + '_ {
        let y_offset = self.y_offset;
        self.row_index(x)
            .into_iter()
            .flat_map(move |row| self.rows[row].ones())
            .map(move |column| y_offset + column as i32)
    }

    /// The values of `x` compatible with `y`, in increasing order.
    pub fn supports_of_y(&self, y: i32) -> impl Iterator<Item = i32> + '_ {
        let x_offset = self.x_offset;
        self.column_index(y)
            .into_iter()
            .flat_map(move |column| self.columns[column].ones())
            .map(move |row| x_offset + row as i32)
    }
}

/// A relation between any number of variables as a list of tuples, which are either the allowed
/// tuples (a positive table) or the forbidden ones (a negative table).
#[derive(Clone, Debug)]
pub struct TupleRelation {
    arity: usize,
    feasible: bool,
    tuples: Vec<Box<[i32]>>,
    lookup: HashSet<Box<[i32]>>,
    /// For every position, the indices of the listed tuples with a given value at that position.
    occurrences: Vec<HashMap<i32, Vec<usize>>>,
}

impl TupleRelation {
    pub fn new(
        arity: usize,
        tuples: impl IntoIterator<Item = Vec<i32>>,
        feasible: bool,
    ) -> Result<TupleRelation, ModelError> {
        if arity == 0 {
            return Err(ModelError::MalformedRelation(
                "a relation needs at least one variable".to_owned(),
            ));
        }

        let mut relation = TupleRelation {
            arity,
            feasible,
            tuples: vec![],
            lookup: HashSet::default(),
            occurrences: vec![HashMap::default(); arity],
        };

        for tuple in tuples {
            if tuple.len() != arity {
                return Err(ModelError::MismatchedLengths {
                    what: "tuple of the relation",
                    expected: arity,
                    actual: tuple.len(),
                });
            }

            let tuple = tuple.into_boxed_slice();
            if !relation.lookup.insert(tuple.clone()) {
                continue;
            }

            let index = relation.tuples.len();
            for (position, &value) in tuple.iter().enumerate() {
                relation.occurrences[position]
                    .entry(value)
                    .or_default()
                    .push(index);
            }
            relation.tuples.push(tuple);
        }

        Ok(relation)
    }

    pub fn arity(&self) -> usize {
        self.arity
    }

    /// Whether the listed tuples are the allowed ones.
    pub fn is_feasible(&self) -> bool {
        self.feasible
    }

    pub fn num_tuples(&self) -> usize {
        self.tuples.len()
    }

    /// Whether `tuple` is allowed by the relation.
    pub fn is_consistent(&self, tuple: &[i32]) -> bool {
        self.lookup.contains(tuple) == self.feasible
    }

    pub(crate) fn tuple(&self, index: usize) -> &[i32] {
        &self.tuples[index]
    }

    /// The indices of the listed tuples which have `value` at `position`.
    pub(crate) fn occurrences(&self, position: usize, value: i32) -> &[usize] {
        self.occurrences[position]
            .get(&value)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// The values which occur at `position` in some listed tuple.
    pub(crate) fn values_at(&self, position: usize) -> impl Iterator<Item = i32> + '_ {
        self.occurrences[position].keys().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn negative_binary_relation_allows_the_rest_of_the_ranges() {
        let relation = BinaryRelation::from_tuples(1..=3, 1..=3, &[(2, 2)], false).unwrap();

        assert!(!relation.is_consistent(2, 2));
        assert!(relation.is_consistent(2, 3));
        assert!(!relation.is_consistent(0, 1));
        assert_eq!(vec![1, 3], relation.supports_of_x(2).collect::<Vec<_>>());
        assert_eq!(vec![1, 2, 3], relation.supports_of_y(1).collect::<Vec<_>>());
    }

    #[test]
    fn matrix_and_tuples_give_the_same_relation() {
        let from_matrix = BinaryRelation::from_matrix(
            0,
            5,
            &[vec![true, false], vec![false, true], vec![true, true]],
            true,
        )
        .unwrap();

        for x in 0..3 {
            for y in 5..7 {
                let expected = matches!((x, y), (0, 5) | (1, 6) | (2, 5) | (2, 6));
                assert_eq!(expected, from_matrix.is_consistent(x, y), "({x}, {y})");
            }
        }
    }

    #[test]
    fn pairs_outside_the_ranges_are_malformed() {
        let result = BinaryRelation::from_tuples(0..=2, 0..=2, &[(0, 3)], true);

        assert!(matches!(result, Err(ModelError::MalformedRelation(_))));
    }

    #[test]
    fn tuples_of_the_wrong_arity_are_rejected() {
        let result = TupleRelation::new(3, [vec![1, 2, 3], vec![1, 2]], true);

        assert_eq!(
            Err(ModelError::MismatchedLengths {
                what: "tuple of the relation",
                expected: 3,
                actual: 2
            }),
            result.map(|_| ())
        );
    }

    #[test]
    fn tuple_relation_indexes_occurrences() {
        let relation =
            TupleRelation::new(2, [vec![1, 2], vec![1, 3], vec![2, 3], vec![1, 2]], true)
                .unwrap();

        assert_eq!(3, relation.num_tuples());
        assert_eq!(&[0, 1], relation.occurrences(0, 1));
        assert_eq!(&[1, 2], relation.occurrences(1, 3));
        assert!(relation.occurrences(1, 7).is_empty());
        assert!(relation.is_consistent(&[2, 3]));
        assert!(!relation.is_consistent(&[3, 2]));
    }
}
