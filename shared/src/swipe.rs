//! Swipe-to-delete state machine, one per list row.
//!
//! The horizontal offset is the only continuous variable. Offsets are
//! logical units, negative to the left; rows never move right of rest.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::config::CoreConfig;
use crate::model::NotificationId;

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum SwipePhase {
    #[default]
    Resting,
    Dragging,
    Revealed,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SwipeGeometry {
    pub threshold: f64,
    pub slop: f64,
}

impl SwipeGeometry {
    #[must_use]
    pub fn from_config(config: &CoreConfig) -> Self {
        Self {
            threshold: config.swipe_threshold,
            slop: config.drag_slop,
        }
    }

    fn clamp(self, dx: f64) -> f64 {
        dx.clamp(self.threshold, 0.0)
    }
}

impl Default for SwipeGeometry {
    fn default() -> Self {
        Self::from_config(&CoreConfig::default())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct SwipeState {
    phase: SwipePhase,
    offset: f64,
}

impl SwipeState {
    #[must_use]
    pub fn phase(&self) -> SwipePhase {
        self.phase
    }

    #[must_use]
    pub fn offset(&self) -> f64 {
        self.offset
    }

    /// Where the row should settle once any animation finishes.
    #[must_use]
    pub fn target_offset(&self, geometry: SwipeGeometry) -> f64 {
        match self.phase {
            SwipePhase::Resting => 0.0,
            SwipePhase::Dragging => self.offset,
            SwipePhase::Revealed => geometry.threshold,
        }
    }

    /// Feeds the cumulative horizontal delta of the current gesture.
    /// Returns false while the movement is still inside the slop and the
    /// gesture belongs to vertical scrolling.
    pub fn drag(&mut self, dx: f64, geometry: SwipeGeometry) -> bool {
        if self.phase != SwipePhase::Dragging && dx.abs() <= geometry.slop {
            return false;
        }
        self.phase = SwipePhase::Dragging;
        self.offset = geometry.clamp(dx);
        true
    }

    /// Ends the gesture and picks the resting point.
    pub fn release(&mut self, dx: f64, geometry: SwipeGeometry) -> SwipePhase {
        if self.phase != SwipePhase::Dragging && dx.abs() <= geometry.slop {
            return self.phase;
        }
        if dx < geometry.threshold / 2.0 && dx < 0.0 {
            self.phase = SwipePhase::Revealed;
            self.offset = geometry.threshold;
        } else {
            self.close();
        }
        self.phase
    }

    pub fn close(&mut self) {
        self.phase = SwipePhase::Resting;
        self.offset = 0.0;
    }
}

/// Swipe state for every row that has been touched. Rows absent from the
/// map are resting.
#[derive(Debug, Default)]
pub struct SwipeBoard {
    rows: HashMap<NotificationId, SwipeState>,
}

impl SwipeBoard {
    pub fn drag(&mut self, id: &NotificationId, dx: f64, geometry: SwipeGeometry) -> bool {
        let mut state = self.state(id);
        let captured = state.drag(dx, geometry);
        if captured {
            self.rows.insert(id.clone(), state);
        }
        captured
    }

    pub fn release(&mut self, id: &NotificationId, dx: f64, geometry: SwipeGeometry) -> SwipePhase {
        let mut state = self.state(id);
        let phase = state.release(dx, geometry);
        if phase == SwipePhase::Resting {
            self.rows.remove(id);
        } else {
            self.rows.insert(id.clone(), state);
        }
        phase
    }

    #[must_use]
    pub fn state(&self, id: &NotificationId) -> SwipeState {
        self.rows.get(id).copied().unwrap_or_default()
    }

    #[must_use]
    pub fn is_revealed(&self, id: &NotificationId) -> bool {
        self.state(id).phase == SwipePhase::Revealed
    }

    pub fn close(&mut self, id: &NotificationId) {
        self.rows.remove(id);
    }

    pub fn remove(&mut self, id: &NotificationId) {
        self.rows.remove(id);
    }

    pub fn clear(&mut self) {
        self.rows.clear();
    }
}

/// Damped spring for shells without a native spring animation. Stepping is
/// independent of the state machine, so input is never blocked on it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Spring {
    pub position: f64,
    pub velocity: f64,
    pub target: f64,
    pub stiffness: f64,
    pub damping: f64,
}

const SETTLE_EPSILON: f64 = 0.5;

impl Spring {
    #[must_use]
    pub fn new(position: f64, target: f64) -> Self {
        Self {
            position,
            velocity: 0.0,
            target,
            stiffness: 180.0,
            damping: 22.0,
        }
    }

    pub fn retarget(&mut self, target: f64) {
        self.target = target;
    }

    /// Advances by `dt` seconds (semi-implicit Euler) and returns the new position.
    pub fn step(&mut self, dt: f64) -> f64 {
        if self.is_settled() {
            self.position = self.target;
            self.velocity = 0.0;
            return self.position;
        }
        let force = -self.stiffness * (self.position - self.target) - self.damping * self.velocity;
        self.velocity += force * dt;
        self.position += self.velocity * dt;
        self.position
    }

    #[must_use]
    pub fn is_settled(&self) -> bool {
        (self.position - self.target).abs() < SETTLE_EPSILON && self.velocity.abs() < SETTLE_EPSILON
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn geometry() -> SwipeGeometry {
        SwipeGeometry::default()
    }

    #[test]
    fn release_past_half_threshold_reveals() {
        let mut state = SwipeState::default();
        assert!(state.drag(-50.0, geometry()));
        assert_eq!(state.offset(), -50.0);
        assert_eq!(state.release(-50.0, geometry()), SwipePhase::Revealed);
        assert_eq!(state.offset(), -80.0);
        assert_eq!(state.target_offset(geometry()), -80.0);
    }

    #[test]
    fn short_release_snaps_back() {
        let mut state = SwipeState::default();
        assert!(state.drag(-10.0, geometry()));
        assert_eq!(state.release(-10.0, geometry()), SwipePhase::Resting);
        assert_eq!(state.offset(), 0.0);
    }

    #[test]
    fn exactly_half_threshold_does_not_reveal() {
        let mut state = SwipeState::default();
        state.drag(-40.0, geometry());
        assert_eq!(state.release(-40.0, geometry()), SwipePhase::Resting);
    }

    #[test]
    fn movement_inside_slop_is_ignored() {
        let mut state = SwipeState::default();
        assert!(!state.drag(-5.0, geometry()));
        assert_eq!(state.phase(), SwipePhase::Resting);
        assert!(!state.drag(4.0, geometry()));
        assert!(state.drag(-5.5, geometry()));
        assert_eq!(state.phase(), SwipePhase::Dragging);
    }

    #[test]
    fn once_dragging_small_deltas_track() {
        let mut state = SwipeState::default();
        state.drag(-30.0, geometry());
        assert!(state.drag(-2.0, geometry()));
        assert_eq!(state.offset(), -2.0);
    }

    #[test]
    fn right_swipe_is_clamped_to_rest() {
        let mut state = SwipeState::default();
        assert!(state.drag(60.0, geometry()));
        assert_eq!(state.offset(), 0.0);
        assert_eq!(state.release(60.0, geometry()), SwipePhase::Resting);
    }

    #[test]
    fn far_left_is_clamped_to_threshold() {
        let mut state = SwipeState::default();
        state.drag(-300.0, geometry());
        assert_eq!(state.offset(), -80.0);
    }

    #[test]
    fn right_swipe_closes_revealed_row() {
        let mut state = SwipeState::default();
        state.drag(-70.0, geometry());
        state.release(-70.0, geometry());
        assert!(state.drag(30.0, geometry()));
        assert_eq!(state.release(30.0, geometry()), SwipePhase::Resting);
    }

    #[test]
    fn board_tracks_rows_independently() {
        let mut board = SwipeBoard::default();
        let a = NotificationId::new("a");
        let b = NotificationId::new("b");
        board.drag(&a, -60.0, geometry());
        board.release(&a, -60.0, geometry());
        board.drag(&b, -20.0, geometry());

        assert!(board.is_revealed(&a));
        assert_eq!(board.state(&b).phase(), SwipePhase::Dragging);

        board.release(&b, -20.0, geometry());
        assert_eq!(board.state(&b), SwipeState::default());
        assert!(board.is_revealed(&a));
    }

    #[test]
    fn spring_settles_on_target() {
        let mut spring = Spring::new(-50.0, -80.0);
        for _ in 0..600 {
            spring.step(1.0 / 60.0);
        }
        assert!(spring.is_settled());
        assert_eq!(spring.step(1.0 / 60.0), -80.0);
    }

    #[test]
    fn spring_can_be_retargeted_midway() {
        let mut spring = Spring::new(0.0, -80.0);
        for _ in 0..5 {
            spring.step(1.0 / 60.0);
        }
        spring.retarget(0.0);
        for _ in 0..600 {
            spring.step(1.0 / 60.0);
        }
        assert_eq!(spring.step(1.0 / 60.0), 0.0);
    }

    proptest! {
        #[test]
        fn offset_stays_within_bounds(deltas in proptest::collection::vec(-500.0f64..500.0, 1..20)) {
            let mut state = SwipeState::default();
            for dx in &deltas {
                state.drag(*dx, geometry());
                prop_assert!(state.offset() <= 0.0);
                prop_assert!(state.offset() >= -80.0);
            }
            let last = *deltas.last().unwrap();
            let phase = state.release(last, geometry());
            prop_assert!(phase != SwipePhase::Dragging);
            prop_assert!(state.offset() == 0.0 || state.offset() == -80.0);
        }
    }
}
