use super::Environment;

const WORD_BITS: usize = 64;

/// Handle to a backtrackable bitset of fixed length. Bits are trailed per 64-bit word.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct StoredBitSet {
    pub(super) first_word: usize,
    pub(super) num_words: usize,
    pub(super) num_bits: usize,
}

impl StoredBitSet {
    pub fn len(self) -> usize {
        self.num_bits
    }

    pub fn is_empty(self) -> bool {
        self.num_bits == 0
    }

    pub fn contains(self, environment: &Environment, bit: usize) -> bool {
        if bit >= self.num_bits {
            return false;
        }
        let word = environment.read_word(self.first_word + bit / WORD_BITS);
        word & (1 << (bit % WORD_BITS)) != 0
    }

    pub fn insert(self, environment: &mut Environment, bit: usize) {
        assert!(bit < self.num_bits, "bit {bit} out of bounds");
        let index = self.first_word + bit / WORD_BITS;
        let word = environment.read_word(index);
        environment.write_word(index, word | (1 << (bit % WORD_BITS)));
    }

    pub fn remove(self, environment: &mut Environment, bit: usize) {
        assert!(bit < self.num_bits, "bit {bit} out of bounds");
        let index = self.first_word + bit / WORD_BITS;
        let word = environment.read_word(index);
        environment.write_word(index, word & !(1 << (bit % WORD_BITS)));
    }

    pub fn count_ones(self, environment: &Environment) -> usize {
        (0..self.num_words)
            .map(|offset| environment.read_word(self.first_word + offset).count_ones() as usize)
            .sum()
    }

    /// The smallest set bit which is at least `from`.
    pub fn next_set_bit(self, environment: &Environment, from: usize) -> Option<usize> {
        if from >= self.num_bits {
            return None;
        }

        let mut word_offset = from / WORD_BITS;
        let mut word =
            environment.read_word(self.first_word + word_offset) & (u64::MAX << (from % WORD_BITS));
        loop {
            if word != 0 {
                let bit = word_offset * WORD_BITS + word.trailing_zeros() as usize;
                return (bit < self.num_bits).then_some(bit);
            }
            word_offset += 1;
            if word_offset >= self.num_words {
                return None;
            }
            word = environment.read_word(self.first_word + word_offset);
        }
    }

    /// The largest set bit which is at most `from`.
    pub fn previous_set_bit(self, environment: &Environment, from: usize) -> Option<usize> {
        if self.num_bits == 0 {
            return None;
        }
        let from = from.min(self.num_bits - 1);

        let mut word_offset = from / WORD_BITS;
        let shift = WORD_BITS - 1 - from % WORD_BITS;
        let mut word = environment.read_word(self.first_word + word_offset) & (u64::MAX >> shift);
        loop {
            if word != 0 {
                return Some(word_offset * WORD_BITS + WORD_BITS - 1 - word.leading_zeros() as usize);
            }
            if word_offset == 0 {
                return None;
            }
            word_offset -= 1;
            word = environment.read_word(self.first_word + word_offset);
        }
    }

    pub fn ones(self, environment: &Environment) -> impl Iterator<Item = usize> + '_ {
        let mut next = self.next_set_bit(environment, 0);
        std::iter::from_fn(move || {
            let current = next?;
            next = self.next_set_bit(environment, current + 1);
            Some(current)
        })
    }
}
