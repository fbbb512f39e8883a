//! Play calls, coverages and route concepts as closed enumerations, with
//! the weighted concept tables and the concept-versus-coverage modifiers.

use crate::fairness::WeightedOption;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Offensive scrimmage call
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum PlayCall {
    InsideRun,
    OutsideRun,
    QbSneak,
    QuickPass,
    ShortPass,
    MediumPass,
    DeepPass,
    Screen,
    PlayActionShort,
    PlayActionDeep,
}

impl PlayCall {
    pub const ALL: [PlayCall; 10] = [
        PlayCall::InsideRun,
        PlayCall::OutsideRun,
        PlayCall::QbSneak,
        PlayCall::QuickPass,
        PlayCall::ShortPass,
        PlayCall::MediumPass,
        PlayCall::DeepPass,
        PlayCall::Screen,
        PlayCall::PlayActionShort,
        PlayCall::PlayActionDeep,
    ];

    pub fn is_pass(&self) -> bool {
        !self.is_run()
    }

    pub fn is_run(&self) -> bool {
        matches!(self, PlayCall::InsideRun | PlayCall::OutsideRun | PlayCall::QbSneak)
    }

    /// Weighted concept table for this call against a pre-snap shell read.
    /// Runs have none.
    pub fn concept_table(&self, shell: Shell) -> Option<&'static [WeightedOption<RouteConcept>]> {
        use RouteConcept::*;
        use Shell::*;

        const fn w(concept: RouteConcept, weight: u32) -> WeightedOption<RouteConcept> {
            WeightedOption::new(concept, weight)
        }

        const QUICK_OPEN: [WeightedOption<RouteConcept>; 5] =
            [w(Hitch, 30), w(Stick, 25), w(QuickOut, 20), w(Bubble, 15), w(Slant, 10)];
        const QUICK_CLOSED: [WeightedOption<RouteConcept>; 5] =
            [w(Slant, 35), w(QuickOut, 20), w(Stick, 15), w(Hitch, 15), w(Bubble, 15)];
        const SHORT_OPEN: [WeightedOption<RouteConcept>; 5] =
            [w(Curl, 25), w(Snag, 25), w(Shallow, 20), w(Mesh, 15), w(Drive, 15)];
        const SHORT_CLOSED: [WeightedOption<RouteConcept>; 5] =
            [w(Mesh, 35), w(Shallow, 25), w(Drive, 20), w(Snag, 10), w(Curl, 10)];
        const MEDIUM_OPEN: [WeightedOption<RouteConcept>; 5] =
            [w(Smash, 30), w(Levels, 25), w(Dagger, 20), w(Flood, 15), w(Curl, 10)];
        const MEDIUM_CLOSED: [WeightedOption<RouteConcept>; 5] =
            [w(Flood, 25), w(Dagger, 25), w(Mills, 20), w(Levels, 15), w(Drive, 15)];
        const DEEP_OPEN: [WeightedOption<RouteConcept>; 4] =
            [w(Mills, 30), w(Verticals, 25), w(Yankee, 25), w(PostWheel, 20)];
        const DEEP_CLOSED: [WeightedOption<RouteConcept>; 4] =
            [w(Verticals, 30), w(PostWheel, 30), w(Yankee, 20), w(Dagger, 20)];
        const SCREEN_OPEN: [WeightedOption<RouteConcept>; 3] =
            [w(Bubble, 40), w(Tunnel, 30), w(Slip, 30)];
        const SCREEN_CLOSED: [WeightedOption<RouteConcept>; 3] =
            [w(Slip, 40), w(Tunnel, 35), w(Bubble, 25)];
        const PA_SHORT_OPEN: [WeightedOption<RouteConcept>; 3] =
            [w(Boot, 45), w(Drive, 30), w(Curl, 25)];
        const PA_SHORT_CLOSED: [WeightedOption<RouteConcept>; 3] =
            [w(Boot, 35), w(Drive, 35), w(Slant, 30)];
        const PA_DEEP_OPEN: [WeightedOption<RouteConcept>; 3] =
            [w(Yankee, 40), w(PostWheel, 35), w(Leak, 25)];
        const PA_DEEP_CLOSED: [WeightedOption<RouteConcept>; 3] =
            [w(Leak, 35), w(PostWheel, 35), w(Yankee, 30)];

        let table: &'static [WeightedOption<RouteConcept>] = match (self, shell) {
            (PlayCall::InsideRun | PlayCall::OutsideRun | PlayCall::QbSneak, _) => return None,
            (PlayCall::QuickPass, FieldOpen) => &QUICK_OPEN,
            (PlayCall::QuickPass, FieldClosed) => &QUICK_CLOSED,
            (PlayCall::ShortPass, FieldOpen) => &SHORT_OPEN,
            (PlayCall::ShortPass, FieldClosed) => &SHORT_CLOSED,
            (PlayCall::MediumPass, FieldOpen) => &MEDIUM_OPEN,
            (PlayCall::MediumPass, FieldClosed) => &MEDIUM_CLOSED,
            (PlayCall::DeepPass, FieldOpen) => &DEEP_OPEN,
            (PlayCall::DeepPass, FieldClosed) => &DEEP_CLOSED,
            (PlayCall::Screen, FieldOpen) => &SCREEN_OPEN,
            (PlayCall::Screen, FieldClosed) => &SCREEN_CLOSED,
            (PlayCall::PlayActionShort, FieldOpen) => &PA_SHORT_OPEN,
            (PlayCall::PlayActionShort, FieldClosed) => &PA_SHORT_CLOSED,
            (PlayCall::PlayActionDeep, FieldOpen) => &PA_DEEP_OPEN,
            (PlayCall::PlayActionDeep, FieldClosed) => &PA_DEEP_CLOSED,
        };
        Some(table)
    }

    /// Base completion adjustment and typical air yards for a pass call
    pub(crate) fn pass_profile(&self) -> PassProfile {
        let (completion, air_yards, interception_factor, sack_adjust) = match self {
            PlayCall::QuickPass => (0.10, 5.0, 0.7, -0.03),
            PlayCall::ShortPass => (0.05, 7.5, 0.9, 0.0),
            PlayCall::MediumPass => (-0.03, 13.0, 1.2, 0.01),
            PlayCall::DeepPass => (-0.22, 26.0, 1.8, 0.025),
            PlayCall::Screen => (0.16, 1.0, 0.4, -0.04),
            PlayCall::PlayActionShort => (0.06, 9.0, 0.8, 0.005),
            PlayCall::PlayActionDeep => (-0.17, 28.0, 1.5, 0.02),
            PlayCall::InsideRun | PlayCall::OutsideRun | PlayCall::QbSneak => (0.0, 0.0, 0.0, 0.0),
        };
        PassProfile {
            completion,
            air_yards,
            interception_factor,
            sack_adjust,
        }
    }
}

impl fmt::Display for PlayCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            PlayCall::InsideRun => "inside run",
            PlayCall::OutsideRun => "outside run",
            PlayCall::QbSneak => "QB sneak",
            PlayCall::QuickPass => "quick pass",
            PlayCall::ShortPass => "short pass",
            PlayCall::MediumPass => "intermediate pass",
            PlayCall::DeepPass => "deep pass",
            PlayCall::Screen => "screen",
            PlayCall::PlayActionShort => "play-action pass",
            PlayCall::PlayActionDeep => "play-action shot",
        };
        write!(f, "{}", label)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct PassProfile {
    pub completion: f64,
    pub air_yards: f64,
    pub interception_factor: f64,
    pub sack_adjust: f64,
}

/// Pre-snap safety shell
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Shell {
    /// Two deep safeties (MOFO)
    FieldOpen,
    /// One-high or zero-high (MOFC)
    FieldClosed,
}

/// Defensive coverage
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Coverage {
    Cover0,
    Cover1,
    Cover2,
    Cover2Man,
    Tampa2,
    Cover3,
    Cover4,
    Cover6,
}

impl Coverage {
    pub const ALL: [Coverage; 8] = [
        Coverage::Cover0,
        Coverage::Cover1,
        Coverage::Cover2,
        Coverage::Cover2Man,
        Coverage::Tampa2,
        Coverage::Cover3,
        Coverage::Cover4,
        Coverage::Cover6,
    ];

    pub fn shell(&self) -> Shell {
        match self {
            Coverage::Cover2
            | Coverage::Cover2Man
            | Coverage::Tampa2
            | Coverage::Cover4
            | Coverage::Cover6 => Shell::FieldOpen,
            Coverage::Cover0 | Coverage::Cover1 | Coverage::Cover3 => Shell::FieldClosed,
        }
    }

    pub fn is_man(&self) -> bool {
        matches!(self, Coverage::Cover0 | Coverage::Cover1 | Coverage::Cover2Man)
    }
}

impl fmt::Display for Coverage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Coverage::Cover0 => "Cover 0",
            Coverage::Cover1 => "Cover 1",
            Coverage::Cover2 => "Cover 2",
            Coverage::Cover2Man => "2-Man",
            Coverage::Tampa2 => "Tampa 2",
            Coverage::Cover3 => "Cover 3",
            Coverage::Cover4 => "Quarters",
            Coverage::Cover6 => "Cover 6",
        };
        write!(f, "{}", label)
    }
}

/// Defensive personnel grouping
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum DefensiveFront {
    Base,
    Nickel,
    Dime,
    GoalLine,
}

impl DefensiveFront {
    /// Expected run yards added against this front
    pub(crate) fn run_yards_adjust(&self) -> f64 {
        match self {
            DefensiveFront::GoalLine => -1.2,
            DefensiveFront::Base => -0.5,
            DefensiveFront::Nickel => 0.2,
            DefensiveFront::Dime => 1.4,
        }
    }

    /// Completion probability added against this front
    pub(crate) fn completion_adjust(&self) -> f64 {
        match self {
            DefensiveFront::GoalLine => 0.04,
            DefensiveFront::Base => 0.02,
            DefensiveFront::Nickel => 0.0,
            DefensiveFront::Dime => -0.03,
        }
    }
}

/// Everything the defense decides before the snap
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct DefensiveCall {
    pub front: DefensiveFront,
    pub coverage: Coverage,
    pub blitz: bool,
}

/// Named passing pattern
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum RouteConcept {
    Slant,
    QuickOut,
    Hitch,
    Stick,
    Snag,
    Mesh,
    Shallow,
    Drive,
    Curl,
    Smash,
    Flood,
    Dagger,
    Levels,
    Mills,
    Verticals,
    PostWheel,
    Yankee,
    Bubble,
    Tunnel,
    Slip,
    Boot,
    Leak,
}

impl RouteConcept {
    /// Concepts that finish at the sideline and let the receiver step out
    pub fn is_sideline(&self) -> bool {
        matches!(
            self,
            RouteConcept::QuickOut
                | RouteConcept::Smash
                | RouteConcept::Flood
                | RouteConcept::Levels
                | RouteConcept::Boot
                | RouteConcept::PostWheel
        )
    }
}

impl fmt::Display for RouteConcept {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            RouteConcept::Slant => "Slant",
            RouteConcept::QuickOut => "Quick Out",
            RouteConcept::Hitch => "Hitch",
            RouteConcept::Stick => "Stick",
            RouteConcept::Snag => "Snag",
            RouteConcept::Mesh => "Mesh",
            RouteConcept::Shallow => "Shallow Cross",
            RouteConcept::Drive => "Drive",
            RouteConcept::Curl => "Curl-Flat",
            RouteConcept::Smash => "Smash",
            RouteConcept::Flood => "Flood",
            RouteConcept::Dagger => "Dagger",
            RouteConcept::Levels => "Levels",
            RouteConcept::Mills => "Mills",
            RouteConcept::Verticals => "Four Verticals",
            RouteConcept::PostWheel => "Post-Wheel",
            RouteConcept::Yankee => "Yankee",
            RouteConcept::Bubble => "Bubble Screen",
            RouteConcept::Tunnel => "Tunnel Screen",
            RouteConcept::Slip => "Slip Screen",
            RouteConcept::Boot => "Boot",
            RouteConcept::Leak => "Leak",
        };
        write!(f, "{}", label)
    }
}

/// Additive adjustment to the engine's completion probability and yardage
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct ConceptModifier {
    pub completion_bonus: f64,
    pub yards_bonus: f64,
}

impl ConceptModifier {
    pub const NONE: ConceptModifier = ConceptModifier {
        completion_bonus: 0.0,
        yards_bonus: 0.0,
    };

    const fn of(completion_bonus: f64, yards_bonus: f64) -> Self {
        Self {
            completion_bonus,
            yards_bonus,
        }
    }
}

/// Sparse concept-versus-coverage table. Pairs without an entry are neutral.
pub fn concept_modifier(concept: RouteConcept, coverage: Coverage) -> ConceptModifier {
    use Coverage::*;
    use RouteConcept::*;

    match (concept, coverage) {
        (Slant, Cover0) => ConceptModifier::of(0.08, 2.0),
        (Slant, Cover1) => ConceptModifier::of(0.06, 1.0),
        (Slant, Cover3) => ConceptModifier::of(0.03, 0.5),
        (Slant, Tampa2) => ConceptModifier::of(-0.06, -1.0),

        (QuickOut, Cover3) => ConceptModifier::of(0.05, 0.5),
        (QuickOut, Cover2) => ConceptModifier::of(-0.08, -1.5),

        (Hitch, Cover3) => ConceptModifier::of(0.06, 0.5),
        (Hitch, Cover4) => ConceptModifier::of(0.05, 0.0),
        (Hitch, Cover1) => ConceptModifier::of(-0.05, 0.0),

        (Stick, Cover3) => ConceptModifier::of(0.05, 0.5),
        (Stick, Cover4) => ConceptModifier::of(0.04, 0.0),
        (Stick, Cover1) => ConceptModifier::of(-0.03, 0.0),

        (Snag, Cover2) => ConceptModifier::of(0.05, 1.0),
        (Snag, Cover3) => ConceptModifier::of(0.04, 0.5),

        (Mesh, Cover0) => ConceptModifier::of(0.10, 3.0),
        (Mesh, Cover1) => ConceptModifier::of(0.08, 2.0),
        (Mesh, Cover2Man) => ConceptModifier::of(0.05, 1.5),
        (Mesh, Cover3) => ConceptModifier::of(-0.02, 0.0),
        (Mesh, Cover4) => ConceptModifier::of(-0.04, -1.0),

        (Shallow, Cover1) => ConceptModifier::of(0.05, 1.5),
        (Shallow, Tampa2) => ConceptModifier::of(-0.05, -1.0),

        (Drive, Cover1) => ConceptModifier::of(0.04, 1.0),
        (Drive, Cover3) => ConceptModifier::of(0.03, 0.5),

        (Curl, Cover2) => ConceptModifier::of(0.04, 1.0),
        (Curl, Cover1) => ConceptModifier::of(-0.04, 0.0),

        (Smash, Cover2) => ConceptModifier::of(0.07, 3.0),
        (Smash, Cover2Man) => ConceptModifier::of(-0.05, -1.0),
        (Smash, Cover4) => ConceptModifier::of(-0.03, -1.0),

        (Flood, Cover3) => ConceptModifier::of(0.07, 2.5),
        (Flood, Cover6) => ConceptModifier::of(0.03, 1.0),
        (Flood, Cover1) => ConceptModifier::of(-0.04, -1.0),

        (Dagger, Cover3) => ConceptModifier::of(0.05, 3.0),
        (Dagger, Cover4) => ConceptModifier::of(-0.05, -2.0),

        (Levels, Cover4) => ConceptModifier::of(0.04, 1.5),
        (Levels, Cover2) => ConceptModifier::of(0.03, 1.0),

        (Mills, Cover4) => ConceptModifier::of(0.08, 5.0),
        (Mills, Cover1) => ConceptModifier::of(-0.04, -2.0),

        (Verticals, Cover3) => ConceptModifier::of(0.06, 6.0),
        (Verticals, Cover2) => ConceptModifier::of(0.04, 5.0),
        (Verticals, Tampa2) => ConceptModifier::of(-0.03, -1.0),
        (Verticals, Cover4) => ConceptModifier::of(-0.08, -4.0),

        (PostWheel, Cover1) => ConceptModifier::of(0.06, 7.0),
        (PostWheel, Cover3) => ConceptModifier::of(0.03, 4.0),
        (PostWheel, Cover6) => ConceptModifier::of(-0.05, -3.0),

        (Yankee, Cover3) => ConceptModifier::of(0.06, 8.0),
        (Yankee, Cover1) => ConceptModifier::of(0.04, 5.0),
        (Yankee, Cover4) => ConceptModifier::of(-0.04, -3.0),

        (Bubble, Cover0) => ConceptModifier::of(0.05, 3.0),
        (Bubble, Cover2) => ConceptModifier::of(-0.04, -1.0),

        (Tunnel, Cover0) => ConceptModifier::of(0.08, 4.0),
        (Tunnel, Cover1) => ConceptModifier::of(0.05, 2.0),

        (Slip, Cover0) => ConceptModifier::of(0.10, 5.0),
        (Slip, Cover1) => ConceptModifier::of(0.04, 2.0),
        (Slip, Cover4) => ConceptModifier::of(-0.05, -1.5),

        (Boot, Cover1) => ConceptModifier::of(0.05, 2.0),
        (Boot, Cover3) => ConceptModifier::of(0.04, 1.5),
        (Boot, Cover2) => ConceptModifier::of(-0.02, 0.0),

        (Leak, Cover3) => ConceptModifier::of(0.07, 6.0),
        (Leak, Cover1) => ConceptModifier::of(0.05, 5.0),
        (Leak, Cover6) => ConceptModifier::of(-0.05, -3.0),

        _ => ConceptModifier::NONE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shell_partition() {
        let open: Vec<_> = Coverage::ALL
            .iter()
            .filter(|c| c.shell() == Shell::FieldOpen)
            .collect();
        assert_eq!(open.len(), 5);
        assert_eq!(Coverage::Cover3.shell(), Shell::FieldClosed);
        assert_eq!(Coverage::Cover4.shell(), Shell::FieldOpen);
    }

    #[test]
    fn test_every_pass_call_has_both_tables() {
        for call in PlayCall::ALL.iter().filter(|c| c.is_pass()) {
            for shell in [Shell::FieldOpen, Shell::FieldClosed] {
                let table = call.concept_table(shell).expect("pass calls have tables");
                assert!(!table.is_empty());
                assert!(table.iter().all(|o| o.weight > 0));
            }
        }
    }

    #[test]
    fn test_runs_have_no_table() {
        assert!(PlayCall::InsideRun.concept_table(Shell::FieldOpen).is_none());
        assert!(PlayCall::QbSneak.concept_table(Shell::FieldClosed).is_none());
    }

    #[test]
    fn test_favorable_and_unfavorable_modifiers() {
        let good = concept_modifier(RouteConcept::Mesh, Coverage::Cover1);
        assert!(good.completion_bonus > 0.0 && good.yards_bonus > 0.0);

        let bad = concept_modifier(RouteConcept::Verticals, Coverage::Cover4);
        assert!(bad.completion_bonus < 0.0 && bad.yards_bonus < 0.0);
    }

    #[test]
    fn test_absent_pair_is_neutral() {
        assert_eq!(
            concept_modifier(RouteConcept::Hitch, Coverage::Cover2Man),
            ConceptModifier::NONE
        );
    }

    #[test]
    fn test_serde_names() {
        let json = serde_json::to_string(&RouteConcept::PostWheel).unwrap();
        assert_eq!(json, "\"post_wheel\"");
        let coverage: Coverage = serde_json::from_str("\"cover2_man\"").unwrap();
        assert_eq!(coverage, Coverage::Cover2Man);
    }
}
