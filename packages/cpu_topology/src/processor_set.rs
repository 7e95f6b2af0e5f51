use std::fmt::{self, Display};

use foldhash::HashSet;
use itertools::Itertools;
use nonempty::NonEmpty;

use crate::{Processor, ProcessorId};

/// One or more processors available to the current process, in a meaningful order.
///
/// The order is significant: when work is assigned to processors by position, earlier entries
/// are preferred. Sets produced by [`SystemTopology::discover()`][1] are ordered so that
/// consecutive entries spread across physical cores before reusing a core.
///
/// A processor set is never empty, never contains the same processor twice and never changes
/// after it has been created.
///
/// [1]: crate::SystemTopology::discover
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ProcessorSet {
    processors: NonEmpty<Processor>,
}

impl ProcessorSet {
    /// Creates a processor set from processors in the desired order.
    ///
    /// If a processor ID occurs more than once, only the first occurrence is kept.
    ///
    /// Returns `None` if no processors were provided.
    ///
    /// # Example
    ///
    /// ```
    /// use cpu_topology::{Processor, ProcessorSet};
    ///
    /// let set = ProcessorSet::from_processors([0, 2, 2, 1].map(Processor::new)).unwrap();
    ///
    /// assert_eq!(set.ids().collect::<Vec<_>>(), vec![0, 2, 1]);
    /// ```
    #[must_use]
    pub fn from_processors(processors: impl IntoIterator<Item = Processor>) -> Option<Self> {
        let mut seen = HashSet::default();

        let unique = processors
            .into_iter()
            .filter(|processor| seen.insert(processor.id()))
            .collect::<Vec<_>>();

        NonEmpty::from_vec(unique).map(|processors| Self { processors })
    }

    /// Returns a subset of this processor set containing only processors that satisfy the given
    /// predicate, preserving order.
    ///
    /// Returns `None` if no processors in the set satisfy the predicate.
    #[must_use]
    pub fn filter(&self, predicate: impl Fn(&Processor) -> bool) -> Option<Self> {
        NonEmpty::from_vec(
            self.processors
                .iter()
                .filter(|processor| predicate(processor))
                .copied()
                .collect(),
        )
        .map(|processors| Self { processors })
    }

    /// Returns the number of processors in the set. A processor set is never empty.
    #[must_use]
    #[inline]
    #[expect(clippy::len_without_is_empty, reason = "never empty by definition")]
    pub fn len(&self) -> usize {
        self.processors.len()
    }

    /// Returns an iterator over references to the processors in the set, in order.
    #[must_use]
    #[inline]
    pub fn iter(&self) -> nonempty::Iter<'_, Processor> {
        self.processors.iter()
    }

    /// Returns an iterator over the IDs of the processors in the set, in order.
    pub fn ids(&self) -> impl Iterator<Item = ProcessorId> + '_ {
        self.processors.iter().map(Processor::id)
    }

    /// Returns a reference to a collection containing all the processors in the set.
    #[must_use]
    #[inline]
    pub fn processors(&self) -> &NonEmpty<Processor> {
        &self.processors
    }
}

impl Display for ProcessorSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({} processors)", self.ids().join(","), self.len())
    }
}

impl IntoIterator for ProcessorSet {
    type IntoIter = <NonEmpty<Processor> as IntoIterator>::IntoIter;
    type Item = Processor;

    /// Consumes the processor set and returns an iterator over the processors.
    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.processors.into_iter()
    }
}

impl<'a> IntoIterator for &'a ProcessorSet {
    type IntoIter = nonempty::Iter<'a, Processor>;
    type Item = &'a Processor;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
