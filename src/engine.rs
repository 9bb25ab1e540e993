use crate::models::{JobCard, SwipeAction, SwipeDecision};

/// Commit thresholds for gesture resolution, collected in one place so the
/// host and the tests agree on the exact boundary values. Units are whatever
/// the host measures drag offsets in: the TUI feeds terminal cells, pointer
/// hosts would feed pixels.
#[derive(Debug, Clone, Copy)]
pub struct SwipeConfig {
    /// Horizontal offset past which a release commits.
    pub distance: f32,
    /// Horizontal release velocity (units/second) past which a flick commits.
    pub velocity: f32,
    /// Upward offset past which a committed release upgrades to superlike.
    pub vertical: f32,
}

impl Default for SwipeConfig {
    fn default() -> Self {
        Self {
            distance: 150.0,
            velocity: 500.0,
            vertical: 120.0,
        }
    }
}

impl SwipeConfig {
    /// Thresholds scaled for terminal cells rather than pixels.
    pub fn terminal() -> Self {
        Self {
            distance: 8.0,
            velocity: 25.0,
            vertical: 3.0,
        }
    }
}

/// A drag gesture at the moment of release: offsets from the drag start and
/// the horizontal release velocity.
#[derive(Debug, Clone, Copy)]
pub struct GestureRelease {
    pub dx: f32,
    pub dy: f32,
    pub vx: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    /// Card at rest, fully interactive.
    Idle,
    /// A decision is made and the exit animation is in flight; input locked.
    Committing,
    /// No more cards in the batch.
    Exhausted,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionStats {
    pub liked: usize,
    pub passed: usize,
    pub superliked: usize,
}

impl SessionStats {
    pub fn total(&self) -> usize {
        self.liked + self.passed + self.superliked
    }
}

/// The swipe interaction state machine: one current card, a lookahead
/// preview, and a LIFO decision history for undo.
///
/// The `Committing` lock guarantees at most one decision per card: every
/// input path checks the state before recording anything, and the host must
/// call [`SwipeEngine::finish_commit`] (after its animation delay) before the
/// next card accepts input.
pub struct SwipeEngine {
    cards: Vec<JobCard>,
    index: usize,
    history: Vec<SwipeDecision>,
    state: EngineState,
    config: SwipeConfig,
    stats: SessionStats,
}

impl SwipeEngine {
    pub fn new(cards: Vec<JobCard>, config: SwipeConfig) -> Self {
        let state = if cards.is_empty() {
            EngineState::Exhausted
        } else {
            EngineState::Idle
        };
        Self {
            cards,
            index: 0,
            history: Vec::new(),
            state,
            config,
            stats: SessionStats::default(),
        }
    }

    pub fn state(&self) -> EngineState {
        self.state
    }

    pub fn stats(&self) -> SessionStats {
        self.stats
    }

    /// The card currently facing the user, if any.
    pub fn current(&self) -> Option<&JobCard> {
        if self.state == EngineState::Exhausted {
            return None;
        }
        self.cards.get(self.index)
    }

    /// The card rendered underneath the current one, preview only.
    pub fn peek_next(&self) -> Option<&JobCard> {
        self.cards.get(self.index + 1)
    }

    pub fn position(&self) -> (usize, usize) {
        (self.index.min(self.cards.len()), self.cards.len())
    }

    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    pub fn last_decision(&self) -> Option<&SwipeDecision> {
        self.history.last()
    }

    /// Resolve a released drag gesture into a decision, or snap back.
    ///
    /// The horizontal gate comes first: a release below both the distance
    /// and velocity thresholds is no decision regardless of `dy`. Past the
    /// gate, an upward offset beyond the vertical threshold upgrades the
    /// decision to superlike; otherwise the sign of `dx` picks like or pass.
    pub fn resolve_release(&mut self, gesture: GestureRelease) -> Option<SwipeAction> {
        if self.state != EngineState::Idle {
            return None;
        }
        if gesture.dx.abs() < self.config.distance && gesture.vx.abs() < self.config.velocity {
            return None; // snap back to center
        }
        let action = if gesture.dy < 0.0 && -gesture.dy > self.config.vertical {
            SwipeAction::Superlike
        } else if gesture.dx > 0.0 {
            SwipeAction::Like
        } else {
            SwipeAction::Pass
        };
        self.swipe(action)
    }

    /// Explicit programmatic commit, used by the on-screen buttons. Ignored
    /// unless the engine is `Idle` with a card on deck; returns the action
    /// it recorded, if any.
    pub fn swipe(&mut self, action: SwipeAction) -> Option<SwipeAction> {
        if self.state != EngineState::Idle {
            return None;
        }
        let card = self.cards.get(self.index)?.clone();
        tracing::debug!(id = %card.id, action = action.label(), "swipe committed");

        match action {
            SwipeAction::Like => self.stats.liked += 1,
            SwipeAction::Pass => self.stats.passed += 1,
            SwipeAction::Superlike => self.stats.superliked += 1,
        }
        self.history.push(SwipeDecision { card, action });
        self.state = EngineState::Committing;
        Some(action)
    }

    /// Called by the host once the exit animation delay has elapsed.
    /// Advances to the next card, or to `Exhausted` when none remains.
    pub fn finish_commit(&mut self) {
        if self.state != EngineState::Committing {
            return;
        }
        self.index += 1;
        self.state = if self.index < self.cards.len() {
            EngineState::Idle
        } else {
            EngineState::Exhausted
        };
    }

    /// Pop the last decision and bring its card back as current. A no-op on
    /// empty history. Deliberately does not retract a favorite saved by the
    /// undone like: a bookmark should survive the user re-judging the card.
    pub fn undo(&mut self) -> Option<SwipeDecision> {
        if self.state == EngineState::Committing {
            return None;
        }
        let decision = self.history.pop()?;
        match decision.action {
            SwipeAction::Like => self.stats.liked -= 1,
            SwipeAction::Pass => self.stats.passed -= 1,
            SwipeAction::Superlike => self.stats.superliked -= 1,
        }
        self.index = self.index.saturating_sub(1);
        self.state = EngineState::Idle;
        Some(decision)
    }

    /// Extend the deck with a freshly fetched batch, re-entering `Idle` from
    /// `Exhausted`. Decision history and stats carry over.
    pub fn refill(&mut self, batch: Vec<JobCard>) {
        if batch.is_empty() {
            return;
        }
        self.cards.extend(batch);
        if self.state == EngineState::Exhausted && self.index < self.cards.len() {
            self.state = EngineState::Idle;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn card(id: &str) -> JobCard {
        JobCard {
            id: id.to_string(),
            title: format!("Job {}", id),
            company: "TestCorp".to_string(),
            location: "Zurich".to_string(),
            description: "desc".to_string(),
            external_url: format!("https://example.com/{}", id),
            salary: None,
            kind: None,
        }
    }

    fn config() -> SwipeConfig {
        SwipeConfig {
            distance: 100.0,
            velocity: 500.0,
            vertical: 80.0,
        }
    }

    fn engine(ids: &[&str]) -> SwipeEngine {
        SwipeEngine::new(ids.iter().map(|id| card(id)).collect(), config())
    }

    #[test]
    fn test_empty_batch_starts_exhausted() {
        let e = SwipeEngine::new(vec![], config());
        assert_eq!(e.state(), EngineState::Exhausted);
        assert!(e.current().is_none());
    }

    #[test]
    fn test_release_below_thresholds_snaps_back() {
        let mut e = engine(&["a"]);
        let action = e.resolve_release(GestureRelease {
            dx: 40.0,
            dy: 0.0,
            vx: 100.0,
        });
        assert!(action.is_none());
        assert_eq!(e.state(), EngineState::Idle);
        assert_eq!(e.current().unwrap().id, "a");
        assert_eq!(e.history_len(), 0);
    }

    #[test]
    fn test_distance_past_threshold_commits_like() {
        let mut e = engine(&["a", "b"]);
        let action = e.resolve_release(GestureRelease {
            dx: 140.0,
            dy: 10.0,
            vx: 0.0,
        });
        assert_eq!(action, Some(SwipeAction::Like));
        assert_eq!(e.state(), EngineState::Committing);
    }

    #[test]
    fn test_leftward_release_commits_pass() {
        let mut e = engine(&["a"]);
        let action = e.resolve_release(GestureRelease {
            dx: -140.0,
            dy: 0.0,
            vx: 0.0,
        });
        assert_eq!(action, Some(SwipeAction::Pass));
    }

    #[test]
    fn test_velocity_alone_commits() {
        // Short flick: little distance, high speed.
        let mut e = engine(&["a"]);
        let action = e.resolve_release(GestureRelease {
            dx: 30.0,
            dy: 0.0,
            vx: 650.0,
        });
        assert_eq!(action, Some(SwipeAction::Like));
    }

    #[test]
    fn test_upward_offset_upgrades_to_superlike() {
        let mut e = engine(&["a"]);
        let action = e.resolve_release(GestureRelease {
            dx: 120.0,
            dy: -90.0,
            vx: 0.0,
        });
        assert_eq!(action, Some(SwipeAction::Superlike));
    }

    #[test]
    fn test_downward_offset_does_not_superlike() {
        let mut e = engine(&["a"]);
        let action = e.resolve_release(GestureRelease {
            dx: 120.0,
            dy: 90.0,
            vx: 0.0,
        });
        assert_eq!(action, Some(SwipeAction::Like));
    }

    #[test]
    fn test_input_ignored_while_committing() {
        let mut e = engine(&["a", "b"]);
        assert!(e.swipe(SwipeAction::Like).is_some());
        // Locked until finish_commit: neither buttons nor gestures land.
        assert!(e.swipe(SwipeAction::Pass).is_none());
        assert!(
            e.resolve_release(GestureRelease {
                dx: 200.0,
                dy: 0.0,
                vx: 900.0,
            })
            .is_none()
        );
        assert_eq!(e.history_len(), 1);

        e.finish_commit();
        assert_eq!(e.state(), EngineState::Idle);
        assert_eq!(e.current().unwrap().id, "b");
    }

    #[test]
    fn test_decisions_never_exceed_cards() {
        let mut e = engine(&["a", "b"]);
        for _ in 0..10 {
            e.swipe(SwipeAction::Pass);
            e.finish_commit();
        }
        assert_eq!(e.history_len(), 2);
        assert_eq!(e.state(), EngineState::Exhausted);
    }

    #[test]
    fn test_three_card_scenario_exhausts() {
        let mut e = engine(&["a", "b", "c"]);
        for action in [SwipeAction::Like, SwipeAction::Pass, SwipeAction::Superlike] {
            assert_eq!(e.swipe(action), Some(action));
            e.finish_commit();
        }
        assert_eq!(e.state(), EngineState::Exhausted);
        assert!(e.current().is_none());
        let stats = e.stats();
        assert_eq!(stats.liked, 1);
        assert_eq!(stats.passed, 1);
        assert_eq!(stats.superliked, 1);
        assert_eq!(stats.total(), 3);
    }

    #[test]
    fn test_undo_restores_card_and_stats() {
        let mut e = engine(&["a", "b"]);
        e.swipe(SwipeAction::Like);
        e.finish_commit();
        assert_eq!(e.current().unwrap().id, "b");

        let undone = e.undo().unwrap();
        assert_eq!(undone.card.id, "a");
        assert_eq!(undone.action, SwipeAction::Like);
        assert_eq!(e.state(), EngineState::Idle);
        assert_eq!(e.current().unwrap().id, "a");
        assert_eq!(e.stats().liked, 0);
    }

    #[test]
    fn test_undo_on_empty_history_is_noop() {
        let mut e = engine(&["a"]);
        assert!(e.undo().is_none());
        assert!(e.undo().is_none());
        assert_eq!(e.state(), EngineState::Idle);
        assert_eq!(e.current().unwrap().id, "a");
    }

    #[test]
    fn test_undo_from_exhausted_reopens_deck() {
        let mut e = engine(&["a"]);
        e.swipe(SwipeAction::Pass);
        e.finish_commit();
        assert_eq!(e.state(), EngineState::Exhausted);

        e.undo().unwrap();
        assert_eq!(e.state(), EngineState::Idle);
        assert_eq!(e.current().unwrap().id, "a");
    }

    #[test]
    fn test_refill_reenters_idle() {
        let mut e = engine(&["a"]);
        e.swipe(SwipeAction::Pass);
        e.finish_commit();
        assert_eq!(e.state(), EngineState::Exhausted);

        e.refill(vec![card("b"), card("c")]);
        assert_eq!(e.state(), EngineState::Idle);
        assert_eq!(e.current().unwrap().id, "b");
        assert_eq!(e.position(), (1, 3));
        // History from the first batch carries over.
        assert_eq!(e.history_len(), 1);
    }

    #[test]
    fn test_refill_with_empty_batch_stays_exhausted() {
        let mut e = engine(&["a"]);
        e.swipe(SwipeAction::Pass);
        e.finish_commit();
        e.refill(vec![]);
        assert_eq!(e.state(), EngineState::Exhausted);
    }

    #[test]
    fn test_peek_next_previews_without_advancing() {
        let e = engine(&["a", "b"]);
        assert_eq!(e.peek_next().unwrap().id, "b");
        assert_eq!(e.current().unwrap().id, "a");
    }
}
