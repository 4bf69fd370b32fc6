//! Fixed-capacity bit set of cell indices.
//!
//! Used for the cells of a Karnaugh region and for the canonical terms covered by an
//! implicant. Every set that takes part in one covering problem is created with the
//! same capacity, so equality and hashing compare the underlying words directly.

/// A set of indices in `0..capacity`, backed by a vector of u64 words.
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub struct CellSet {
    /// Storage: each u64 holds 64 cells
    words: Vec<u64>,
    /// Number of cells in the universe
    capacity: usize,
    /// Number of set bits (cached for O(1) len())
    count: usize,
}

impl CellSet {
    const BITS_PER_WORD: usize = 64;

    /// Creates an empty set over the universe `0..capacity`.
    pub fn new(capacity: usize) -> Self {
        let num_words = (capacity + Self::BITS_PER_WORD - 1) / Self::BITS_PER_WORD;
        Self {
            words: vec![0; num_words],
            capacity,
            count: 0,
        }
    }

    /// Creates the full set `0..capacity`.
    pub fn full(capacity: usize) -> Self {
        let mut set = Self::new(capacity);
        set.extend(0..capacity);
        set
    }

    pub fn from_indices(capacity: usize, indices: impl IntoIterator<Item = usize>) -> Self {
        let mut set = Self::new(capacity);
        set.extend(indices);
        set
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.count
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    #[inline]
    fn word_and_bit(index: usize) -> (usize, usize) {
        (index / Self::BITS_PER_WORD, index % Self::BITS_PER_WORD)
    }

    #[inline]
    pub fn contains(&self, index: usize) -> bool {
        if index >= self.capacity {
            return false;
        }
        let (word_idx, bit_idx) = Self::word_and_bit(index);
        (self.words[word_idx] >> bit_idx) & 1 == 1
    }

    /// Adds a cell. Returns true if it was not present.
    ///
    /// # Panics
    ///
    /// Panics if `index >= capacity`.
    #[inline]
    pub fn insert(&mut self, index: usize) -> bool {
        assert!(
            index < self.capacity,
            "Cell {} out of range for capacity {}",
            index,
            self.capacity
        );
        let (word_idx, bit_idx) = Self::word_and_bit(index);
        let mask = 1u64 << bit_idx;
        let was_clear = (self.words[word_idx] & mask) == 0;
        if was_clear {
            self.words[word_idx] |= mask;
            self.count += 1;
        }
        was_clear
    }

    pub fn extend(&mut self, iter: impl IntoIterator<Item = usize>) {
        for index in iter {
            self.insert(index);
        }
    }

    /// Adds every cell of `other`.
    pub fn union_with(&mut self, other: &CellSet) {
        debug_assert_eq!(self.capacity, other.capacity);
        let mut count = 0;
        for (word, &rhs) in self.words.iter_mut().zip(&other.words) {
            *word |= rhs;
            count += word.count_ones() as usize;
        }
        self.count = count;
    }

    pub fn is_subset(&self, other: &CellSet) -> bool {
        debug_assert_eq!(self.capacity, other.capacity);
        self.words.iter().zip(&other.words).all(|(&a, &b)| a & !b == 0)
    }

    /// Number of cells present in both sets.
    pub fn intersection_len(&self, other: &CellSet) -> usize {
        debug_assert_eq!(self.capacity, other.capacity);
        self.words
            .iter()
            .zip(&other.words)
            .map(|(&a, &b)| (a & b).count_ones() as usize)
            .sum()
    }

    /// Cells of `self` missing from `other`.
    pub fn difference(&self, other: &CellSet) -> CellSet {
        debug_assert_eq!(self.capacity, other.capacity);
        let words: Vec<u64> = self.words.iter().zip(&other.words).map(|(&a, &b)| a & !b).collect();
        let count = words.iter().map(|w| w.count_ones() as usize).sum();
        CellSet {
            words,
            capacity: self.capacity,
            count,
        }
    }

    /// Iterates over the cells in increasing order.
    pub fn iter(&self) -> CellSetIter<'_> {
        CellSetIter {
            set: self,
            word_idx: 0,
            current_word: self.words.first().copied().unwrap_or(0),
        }
    }
}

/// Iterator over the cells of a [`CellSet`].
pub struct CellSetIter<'a> {
    set: &'a CellSet,
    word_idx: usize,
    current_word: u64,
}

impl Iterator for CellSetIter<'_> {
    type Item = usize;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if self.current_word != 0 {
                let bit_idx = self.current_word.trailing_zeros() as usize;
                self.current_word &= self.current_word - 1; // Clear lowest set bit
                return Some(self.word_idx * CellSet::BITS_PER_WORD + bit_idx);
            }

            self.word_idx += 1;
            if self.word_idx >= self.set.words.len() {
                return None;
            }
            self.current_word = self.set.words[self.word_idx];
        }
    }
}
