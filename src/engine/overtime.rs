//! Overtime decision rule: any touchdown or safety wins outright, otherwise
//! the game ends once both teams have had the ball and the score is not level.

use crate::engine::state::{GameState, Side};
use crate::engine::types::{ScoreKind, ScoringPlay};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct OvertimeTracker {
    completed: [bool; 2],
}

impl OvertimeTracker {
    fn slot(side: Side) -> usize {
        match side {
            Side::Home => 0,
            Side::Away => 1,
        }
    }

    /// `side` finished an offensive possession
    pub(crate) fn record_possession(&mut self, side: Side) {
        self.completed[Self::slot(side)] = true;
    }

    pub(crate) fn both_possessed(&self) -> bool {
        self.completed.iter().all(|done| *done)
    }

    /// Whether the play just run ends the game. `possession_ended` must be
    /// recorded on the tracker before asking.
    pub(crate) fn decides_game(
        &self,
        scoring: Option<&ScoringPlay>,
        possession_ended: bool,
        state: &GameState,
    ) -> bool {
        if let Some(score) = scoring {
            if score.kind.is_touchdown() || score.kind == ScoreKind::Safety {
                return true;
            }
        }
        possession_ended && self.both_possessed() && state.home_score != state.away_score
    }
}
