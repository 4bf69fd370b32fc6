//! Selection of a small set of implicants covering every target cell.
//!
//! Both minimizers reduce to the same covering problem: a universe of target cells
//! (Karnaugh cells, or canonical terms) and candidates each covering some of them.
//! [`CoverageMap::select`] picks
//!
//! 1. every *essential* candidate, the only one covering some target;
//! 2. greedily, the candidate covering the most still-uncovered targets, ties going
//!    to the lower rank, then to the earlier candidate;
//! 3. and finally drops every non-essential pick whose targets the others already
//!    cover, trying higher ranks first.
//!
//! The rank is the literal count of the implicant, so ties favour larger regions.

use log::debug;

use crate::cellset::CellSet;
use crate::error::{Error, Result};

/// An implicant seen only through the cells it covers.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Candidate {
    covers: CellSet,
    rank: usize,
}

impl Candidate {
    pub fn covers(&self) -> &CellSet {
        &self.covers
    }

    pub fn rank(&self) -> usize {
        self.rank
    }
}

/// Indices into the candidates of a [`CoverageMap`], each list sorted.
#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct Selection {
    pub essential: Vec<usize>,
    pub greedy: Vec<usize>,
    /// Picks dropped by the redundancy pass.
    pub removed: Vec<usize>,
    /// The final cover.
    pub chosen: Vec<usize>,
}

/// Target cells and the candidates covering them.
///
/// # Invariants
///
/// - Every candidate set has the capacity of `targets`.
#[derive(Debug, Clone)]
pub struct CoverageMap {
    targets: CellSet,
    candidates: Vec<Candidate>,
}

impl CoverageMap {
    pub fn new(targets: CellSet) -> Self {
        CoverageMap {
            targets,
            candidates: Vec::new(),
        }
    }

    /// Registers a candidate and returns its index. Cells outside the targets are ignored.
    ///
    /// # Panics
    ///
    /// Panics if `covers` has a different capacity than the targets.
    pub fn add(&mut self, covers: CellSet, rank: usize) -> usize {
        assert_eq!(
            covers.capacity(),
            self.targets.capacity(),
            "Candidate capacity {} does not match target capacity {}",
            covers.capacity(),
            self.targets.capacity()
        );
        let covers = CellSet::from_indices(covers.capacity(), covers.iter().filter(|&c| self.targets.contains(c)));
        self.candidates.push(Candidate { covers, rank });
        self.candidates.len() - 1
    }

    pub fn targets(&self) -> &CellSet {
        &self.targets
    }

    pub fn candidates(&self) -> &[Candidate] {
        &self.candidates
    }

    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    /// Candidates covering `cell`, in index order.
    pub fn coverers(&self, cell: usize) -> Vec<usize> {
        self.candidates
            .iter()
            .enumerate()
            .filter(|(_, candidate)| candidate.covers.contains(cell))
            .map(|(index, _)| index)
            .collect()
    }

    /// Candidates that are the sole cover of at least one target, sorted.
    pub fn essentials(&self) -> Vec<usize> {
        let mut essential: Vec<usize> = self
            .targets
            .iter()
            .filter_map(|cell| match self.coverers(cell).as_slice() {
                &[only] => Some(only),
                _ => None,
            })
            .collect();
        essential.sort_unstable();
        essential.dedup();
        essential
    }

    fn union_of(&self, indices: impl IntoIterator<Item = usize>) -> CellSet {
        let mut union = CellSet::new(self.targets.capacity());
        for index in indices {
            union.union_with(&self.candidates[index].covers);
        }
        union
    }

    /// Computes the cover.
    ///
    /// An empty target set gives an empty selection. Targets that no candidate covers
    /// fail with [`Error::EmptyCoverage`].
    pub fn select(&self) -> Result<Selection> {
        if self.targets.is_empty() {
            return Ok(Selection::default());
        }
        if !self.targets.is_subset(&self.union_of(0..self.candidates.len())) {
            return Err(Error::EmptyCoverage);
        }

        let essential = self.essentials();
        let mut covered = self.union_of(essential.iter().copied());
        let mut picked = vec![false; self.candidates.len()];
        for &index in &essential {
            picked[index] = true;
        }
        debug!("select: essential {:?} cover {}/{}", essential, covered.len(), self.targets.len());

        let mut greedy = Vec::new();
        while !self.targets.is_subset(&covered) {
            let uncovered = self.targets.difference(&covered);
            let best = self
                .candidates
                .iter()
                .enumerate()
                .filter(|&(index, _)| !picked[index])
                .map(|(index, candidate)| (candidate.covers.intersection_len(&uncovered), candidate.rank, index))
                .filter(|&(gain, _, _)| gain > 0)
                .max_by(|a, b| a.0.cmp(&b.0).then(b.1.cmp(&a.1)).then(b.2.cmp(&a.2)));
            let Some((gain, _, index)) = best else {
                return Err(Error::EmptyCoverage);
            };
            debug!("select: greedy pick {} covering {} new target(s)", index, gain);
            picked[index] = true;
            covered.union_with(&self.candidates[index].covers);
            greedy.push(index);
        }

        // Redundancy pass over the greedy picks, most literals first.
        let mut chosen: Vec<usize> = essential.iter().chain(&greedy).copied().collect();
        let mut order = greedy.clone();
        order.sort_by(|&a, &b| self.candidates[b].rank.cmp(&self.candidates[a].rank).then(b.cmp(&a)));
        let mut removed = Vec::new();
        for index in order {
            let rest = chosen.iter().copied().filter(|&other| other != index);
            if self.targets.is_subset(&self.union_of(rest)) {
                debug!("select: dropping redundant pick {}", index);
                chosen.retain(|&other| other != index);
                removed.push(index);
            }
        }

        greedy.sort_unstable();
        removed.sort_unstable();
        chosen.sort_unstable();
        Ok(Selection {
            essential,
            greedy,
            removed,
            chosen,
        })
    }
}
