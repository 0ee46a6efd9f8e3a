use crate::GameState;

/// Snapshots taken before each committed move, most recent last.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct History {
    snapshots: Vec<GameState>,
}

impl History {
    pub fn new() -> History {
        History {
            snapshots: Vec::new(),
        }
    }

    /// Record the state as it was before a move.
    #[inline]
    pub fn push(&mut self, state: GameState) {
        self.snapshots.push(state);
    }

    /// Take back the most recent snapshot.
    #[inline]
    pub fn pop(&mut self) -> Option<GameState> {
        self.snapshots.pop()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Move, Pos};

    #[test]
    fn test_push_pop_lifo() {
        let first = GameState::new();
        let mut second = first;
        second.apply(Move::Place { to: Pos(12) });

        let mut history = History::new();
        assert!(history.is_empty());
        history.push(first);
        history.push(second);
        assert_eq!(history.len(), 2);

        assert_eq!(history.pop(), Some(second));
        assert_eq!(history.pop(), Some(first));
        assert_eq!(history.pop(), None);
    }
}
