//! Turn-scoped mine placement protocol: one team at a time places a fixed
//! quota of mines on its own half, then the batch is concealed and the turn
//! ends. The orchestrator polls [`PlacementProtocol::is_finished`] as its
//! completion signal.

use bevy::prelude::Vec2;

use minerink_shared::team::Team;

use super::geometry;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlacementOutcome {
    /// Point accepted; `finished` marks the quota-exhausting placement,
    /// after which the batch must be concealed.
    Accepted { finished: bool },
    OutsideField,
    WrongHalf,
    /// No placement turn is running; input is not consumed.
    Inactive,
}

#[derive(Debug, Clone)]
pub struct PlacementProtocol {
    quota: u32,
    team: Option<Team>,
    remaining: u32,
}

impl PlacementProtocol {
    pub fn new(quota: u32) -> Self {
        Self {
            quota,
            team: None,
            remaining: 0,
        }
    }

    pub fn begin(&mut self, team: Team) {
        self.team = Some(team);
        self.remaining = self.quota;
    }

    pub fn team(&self) -> Option<Team> {
        self.team
    }

    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    pub fn is_finished(&self) -> bool {
        self.team.is_none()
    }

    /// Validate a candidate point for the current turn. Acceptance decrements
    /// the quota; the final acceptance ends the turn.
    pub fn try_place(&mut self, point: Vec2) -> PlacementOutcome {
        let Some(team) = self.team else {
            return PlacementOutcome::Inactive;
        };
        if !geometry::field_contains(point) {
            return PlacementOutcome::OutsideField;
        }
        if geometry::half_owner(point) != team {
            return PlacementOutcome::WrongHalf;
        }

        self.remaining -= 1;
        let finished = self.remaining == 0;
        if finished {
            self.team = None;
        }
        PlacementOutcome::Accepted { finished }
    }
}
