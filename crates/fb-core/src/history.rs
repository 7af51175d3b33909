use std::fmt;

use crate::snapshot::Snapshot;
use crate::transition::TransitionId;

/// Handle to a moment in a session's [`History`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MomentId(usize);

impl fmt::Display for MomentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "@{}", self.0)
    }
}

/// An immutable snapshot of every factor at one point of the timeline.
#[derive(Debug, Clone)]
pub struct Moment {
    values: Snapshot,
    cause: Option<TransitionId>,
    past: Option<MomentId>,
    future: Option<MomentId>,
}

impl Moment {
    /// Factor values at this moment.
    pub fn values(&self) -> &Snapshot {
        &self.values
    }

    /// The transition that produced this moment; `None` for the root.
    pub fn cause(&self) -> Option<TransitionId> {
        self.cause
    }

    /// The moment this one was applied from; `None` for the root.
    pub fn past(&self) -> Option<MomentId> {
        self.past
    }

    /// The moment most recently applied from this one, if it is still recorded.
    pub fn future(&self) -> Option<MomentId> {
        self.future
    }
}

/// Arena of moments linked into a timeline with a single redo branch.
///
/// Every moment has at most one past and one future. Applying from a moment
/// that already has a future replaces that future: the old branch is removed
/// from the arena right away and its IDs become stale. Slots are never
/// reused, so a stale ID can not alias a newer moment.
///
/// Collected slots stay behind as empty entries for the life of the history.
/// [`History::len`] counts live moments only, while the backing storage grows
/// by one slot per moment ever created, discarded branches included.
#[derive(Debug, Clone)]
pub struct History {
    moments: Vec<Option<Moment>>,
    live: usize,
}

impl History {
    /// Start a history whose root moment holds `root`.
    pub fn new(root: Snapshot) -> Self {
        Self {
            moments: vec![Some(Moment {
                values: root,
                cause: None,
                past: None,
                future: None,
            })],
            live: 1,
        }
    }

    /// The root moment's ID.
    pub fn root(&self) -> MomentId {
        MomentId(0)
    }

    /// Look up a live moment.
    pub fn get(&self, id: MomentId) -> Option<&Moment> {
        self.moments.get(id.0).and_then(Option::as_ref)
    }

    /// Whether `id` refers to a live moment.
    pub fn contains(&self, id: MomentId) -> bool {
        self.get(id).is_some()
    }

    /// Number of live moments.
    pub fn len(&self) -> usize {
        self.live
    }

    /// Always false: the root moment is never collected.
    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    /// Append a moment after `from`, replacing (and collecting) any existing
    /// future branch. Returns the new moment's ID.
    pub(crate) fn push_after(
        &mut self,
        from: MomentId,
        values: Snapshot,
        cause: TransitionId,
    ) -> MomentId {
        let id = MomentId(self.moments.len());

        let old_future = self
            .moments
            .get_mut(from.0)
            .and_then(Option::as_mut)
            .and_then(|m| m.future.replace(id));
        if let Some(branch) = old_future {
            let collected = self.collect_branch(branch);
            tracing::trace!(from = %from, collected, "discarded redo branch");
        }

        self.moments.push(Some(Moment {
            values,
            cause: Some(cause),
            past: Some(from),
            future: None,
        }));
        self.live += 1;
        id
    }

    /// Remove `start` and every moment after it. Returns how many were removed.
    fn collect_branch(&mut self, start: MomentId) -> usize {
        let mut next = Some(start);
        let mut collected = 0;
        while let Some(id) = next {
            next = self
                .moments
                .get_mut(id.0)
                .and_then(Option::take)
                .and_then(|m| m.future);
            collected += 1;
        }
        self.live -= collected;
        collected
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Value;

    fn snap(v: &str) -> Snapshot {
        Snapshot::new(vec![Value::new(v)])
    }

    #[test]
    fn root_has_no_links() {
        let history = History::new(snap("a"));
        let root = history.get(history.root()).unwrap();
        assert!(root.past().is_none());
        assert!(root.future().is_none());
        assert!(root.cause().is_none());
        assert_eq!(history.len(), 1);
    }

    #[test]
    fn push_links_both_directions() {
        let mut history = History::new(snap("a"));
        let m0 = history.root();
        let m1 = history.push_after(m0, snap("b"), TransitionId(0));

        assert_eq!(history.get(m0).unwrap().future(), Some(m1));
        assert_eq!(history.get(m1).unwrap().past(), Some(m0));
        assert_eq!(history.get(m1).unwrap().cause(), Some(TransitionId(0)));
        assert_eq!(history.len(), 2);
    }

    #[test]
    fn pushing_from_the_past_collects_the_old_branch() {
        let mut history = History::new(snap("a"));
        let m0 = history.root();
        let m1 = history.push_after(m0, snap("b"), TransitionId(0));
        let m2 = history.push_after(m1, snap("c"), TransitionId(1));

        let m3 = history.push_after(m0, snap("d"), TransitionId(2));

        assert_eq!(history.get(m0).unwrap().future(), Some(m3));
        assert!(!history.contains(m1));
        assert!(!history.contains(m2));
        assert_eq!(history.len(), 2);
    }

    #[test]
    fn stale_ids_are_never_reused() {
        let mut history = History::new(snap("a"));
        let m0 = history.root();
        let m1 = history.push_after(m0, snap("b"), TransitionId(0));
        let m2 = history.push_after(m0, snap("c"), TransitionId(1));
        assert_ne!(m1, m2);
        assert!(history.get(m1).is_none());
    }

    #[test]
    fn collected_slots_stay_allocated() {
        let mut history = History::new(snap("a"));
        let m0 = history.root();
        let mut last = m0;
        for turn in 0..5 {
            let next = history.push_after(m0, snap("b"), TransitionId(turn));
            assert!(next > last);
            last = next;
        }

        assert_eq!(history.len(), 2);
        assert_eq!(history.moments.len(), 6);
        assert_eq!(history.moments.iter().filter(|m| m.is_some()).count(), 2);
    }
}
