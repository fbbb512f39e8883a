//! Situational play calling.
//!
//! Fourth-down, clock-management and conversion decisions are pure
//! functions of the situation. Play calls, coverages and route concepts
//! are weighted draws from the game stream.

use crate::engine::state::Period;
use crate::fairness::{RandomStream, WeightedOption};
use crate::playbook::concepts::{
    concept_modifier, ConceptModifier, Coverage, DefensiveCall, DefensiveFront, PlayCall,
    RouteConcept,
};
use crate::teams::PlayStyle;

/// Minimum make probability before a field goal is worth trying
const FIELD_GOAL_THRESHOLD: f64 = 0.45;

/// Seconds a kneel-down keeps off the clock when nobody stops it
const KNEEL_SECONDS: u32 = 40;

/// What the offense sees before the snap
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlayContext {
    pub down: u8,
    pub yards_to_go: u8,
    pub ball_position: u8,
    pub clock: u32,
    pub period: Period,
    /// Offense's points minus the defense's
    pub score_margin: i32,
    pub two_minute_drill: bool,
    pub offense_timeouts: u8,
    pub defense_timeouts: u8,
    /// Clock did not stop after the previous play
    pub clock_running: bool,
    pub play_style: PlayStyle,
    /// Make probability of a field goal from the current spot
    pub field_goal_probability: f64,
}

impl PlayContext {
    /// Final five minutes of regulation, or overtime
    pub fn is_late(&self) -> bool {
        match self.period {
            Period::Quarter(4) => self.clock <= 300,
            Period::Overtime(_) => true,
            Period::Quarter(_) => false,
        }
    }

    fn second_half(&self) -> bool {
        !matches!(self.period, Period::Quarter(1) | Period::Quarter(2))
    }

    fn in_field_goal_range(&self) -> bool {
        self.field_goal_probability >= FIELD_GOAL_THRESHOLD
    }

    fn short_yardage(&self) -> bool {
        self.yards_to_go <= 1 && (self.down >= 3 || self.ball_position >= 97)
    }

    fn passing_down(&self) -> bool {
        self.down >= 3 && self.yards_to_go >= 7
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapDecision {
    Play,
    Punt,
    FieldGoal,
    Kneel,
    Spike,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConversionChoice {
    ExtraPoint,
    TwoPoint,
}

/// Decide what kind of snap the offense runs. Consumes no draws.
pub fn decide_snap(ctx: &PlayContext) -> SnapDecision {
    if should_kneel(ctx) {
        return SnapDecision::Kneel;
    }

    if ctx.two_minute_drill
        && ctx.clock_running
        && ctx.offense_timeouts == 0
        && (ctx.score_margin <= 0 || ctx.period == Period::Quarter(2))
        && (5..=60).contains(&ctx.clock)
        && ctx.down <= 2
    {
        return SnapDecision::Spike;
    }

    if ctx.clock <= 8 && ctx.period.ends_half() && ctx.in_field_goal_range() {
        let worth_it = match ctx.period {
            Period::Quarter(2) => true,
            _ => (-3..=0).contains(&ctx.score_margin),
        };
        if worth_it {
            return SnapDecision::FieldGoal;
        }
    }

    if ctx.down < 4 {
        return SnapDecision::Play;
    }
    fourth_down(ctx)
}

fn should_kneel(ctx: &PlayContext) -> bool {
    match ctx.period {
        Period::Quarter(4) if ctx.score_margin > 0 && ctx.down < 4 => {
            let snaps = (5 - ctx.down as u32).saturating_sub(ctx.defense_timeouts as u32);
            ctx.clock <= snaps * KNEEL_SECONDS
        }
        Period::Quarter(2) => ctx.clock <= 20 && ctx.ball_position <= 40 && ctx.down < 4,
        _ => false,
    }
}

fn fourth_down(ctx: &PlayContext) -> SnapDecision {
    let desperate = ctx.score_margin < 0
        && (ctx.period.is_overtime() || (ctx.period == Period::Quarter(4) && ctx.clock <= 180));
    if desperate {
        if ctx.score_margin >= -3 && ctx.in_field_goal_range() {
            return SnapDecision::FieldGoal;
        }
        return SnapDecision::Play;
    }

    let mut threshold: i32 = match ctx.ball_position {
        60..=99 => 2,
        40..=59 => 1,
        _ => 0,
    };
    match ctx.play_style {
        PlayStyle::Aggressive => threshold += 1,
        PlayStyle::Conservative => threshold -= 1,
        _ => {}
    }
    if ctx.second_half() && ctx.score_margin <= -9 {
        threshold += 1;
    }

    if (ctx.yards_to_go as i32) <= threshold {
        return SnapDecision::Play;
    }
    if ctx.in_field_goal_range() {
        return SnapDecision::FieldGoal;
    }
    if ctx.ball_position >= 65 && ctx.yards_to_go <= 4 {
        return SnapDecision::Play;
    }
    SnapDecision::Punt
}

fn scale<T: PartialEq>(weights: &mut [(T, f64)], keys: &[T], factor: f64) {
    for (key, weight) in weights.iter_mut() {
        if keys.contains(key) {
            *weight *= factor;
        }
    }
}

/// Weighted offensive call for the situation. One draw.
pub fn call_offense(ctx: &PlayContext, stream: &mut RandomStream) -> PlayCall {
    use PlayCall::*;

    let mut weights: [(PlayCall, f64); 10] = [
        (InsideRun, 22.0),
        (OutsideRun, 14.0),
        (QbSneak, 0.0),
        (QuickPass, 12.0),
        (ShortPass, 14.0),
        (MediumPass, 12.0),
        (DeepPass, 6.0),
        (Screen, 6.0),
        (PlayActionShort, 8.0),
        (PlayActionDeep, 4.0),
    ];

    let runs = [InsideRun, OutsideRun];
    let passes = [
        QuickPass,
        ShortPass,
        MediumPass,
        DeepPass,
        Screen,
        PlayActionShort,
        PlayActionDeep,
    ];

    match ctx.play_style {
        PlayStyle::PassHeavy => {
            scale(&mut weights, &runs, 0.7);
            scale(&mut weights, &passes, 1.25);
        }
        PlayStyle::RunHeavy => {
            scale(&mut weights, &runs, 1.4);
            scale(&mut weights, &passes, 0.8);
            scale(&mut weights, &[PlayActionShort, PlayActionDeep], 1.3);
        }
        PlayStyle::Aggressive => {
            scale(&mut weights, &[DeepPass], 1.8);
            scale(&mut weights, &[PlayActionDeep], 1.5);
        }
        PlayStyle::Conservative => {
            scale(&mut weights, &runs, 1.1);
            scale(&mut weights, &[QuickPass, ShortPass], 1.3);
            scale(&mut weights, &[DeepPass, PlayActionDeep], 0.5);
        }
        PlayStyle::Balanced => {}
    }

    if ctx.short_yardage() {
        if let Some((_, weight)) = weights.iter_mut().find(|(call, _)| *call == QbSneak) {
            *weight = 25.0;
        }
        scale(&mut weights, &[InsideRun], 1.5);
        scale(&mut weights, &[DeepPass, PlayActionDeep], 0.5);
    } else if ctx.yards_to_go >= 8 && ctx.down >= 2 {
        scale(&mut weights, &runs, 0.5);
        scale(&mut weights, &[MediumPass], 1.5);
        scale(&mut weights, &[DeepPass], 1.4);
        scale(&mut weights, &[Screen], 1.2);
    }
    if ctx.down == 3 && ctx.yards_to_go >= 4 {
        scale(&mut weights, &runs, 0.4);
        scale(&mut weights, &[MediumPass], 1.4);
    }
    if ctx.ball_position >= 90 {
        scale(&mut weights, &[DeepPass, PlayActionDeep], 0.1);
        scale(&mut weights, &[PlayActionShort], 1.4);
        scale(&mut weights, &[InsideRun], 1.3);
    }

    if ctx.two_minute_drill && ctx.score_margin <= 0 {
        scale(&mut weights, &runs, 0.2);
        scale(&mut weights, &[QuickPass, MediumPass], 1.5);
        scale(&mut weights, &[DeepPass], 1.3);
    } else if ctx.is_late() && ctx.score_margin > 0 && !ctx.period.is_overtime() {
        scale(&mut weights, &runs, 1.8);
        scale(&mut weights, &[DeepPass, PlayActionDeep], 0.4);
    } else if ctx.second_half() && ctx.score_margin <= -14 {
        scale(&mut weights, &passes, 1.3);
        scale(&mut weights, &[DeepPass], 1.4);
    }

    let options: Vec<WeightedOption<PlayCall>> = weights
        .iter()
        .map(|(call, weight)| WeightedOption::new(*call, (weight * 10.0).round() as u32))
        .collect();
    stream.weighted_choice(&options).unwrap_or(InsideRun)
}

/// Defensive front from personnel and situation. Consumes no draws.
pub fn defensive_front(ctx: &PlayContext) -> DefensiveFront {
    if ctx.ball_position >= 95 || ctx.short_yardage() {
        DefensiveFront::GoalLine
    } else if ctx.passing_down() || (ctx.two_minute_drill && ctx.score_margin < 0) {
        DefensiveFront::Dime
    } else if ctx.yards_to_go <= 3 {
        DefensiveFront::Base
    } else {
        DefensiveFront::Nickel
    }
}

/// Front, then a coverage draw and a blitz draw. Two draws.
pub fn call_defense(ctx: &PlayContext, stream: &mut RandomStream) -> DefensiveCall {
    use Coverage::*;

    let front = defensive_front(ctx);
    let mut weights: [(Coverage, f64); 8] = [
        (Cover0, 3.0),
        (Cover1, 14.0),
        (Cover2, 12.0),
        (Cover2Man, 6.0),
        (Tampa2, 8.0),
        (Cover3, 26.0),
        (Cover4, 15.0),
        (Cover6, 10.0),
    ];

    // Defense protecting a late lead plays soft
    let prevent = ctx.score_margin < 0 && (ctx.is_late() || ctx.two_minute_drill);
    let mut blitz_chance: f64 = 0.22;

    if prevent {
        scale(&mut weights, &[Cover4, Cover6], 2.0);
        scale(&mut weights, &[Cover2], 1.5);
        scale(&mut weights, &[Cover0], 0.2);
        scale(&mut weights, &[Cover1], 0.5);
        blitz_chance -= 0.15;
    } else if ctx.passing_down() {
        scale(&mut weights, &[Cover0], 2.0);
        scale(&mut weights, &[Cover1], 1.5);
        scale(&mut weights, &[Cover4], 1.3);
        blitz_chance += 0.12;
    }
    if front == DefensiveFront::GoalLine {
        scale(&mut weights, &[Cover0, Cover1], 2.0);
        scale(&mut weights, &[Cover4], 0.5);
    }

    let options: Vec<WeightedOption<Coverage>> = weights
        .iter()
        .map(|(coverage, weight)| WeightedOption::new(*coverage, (weight * 10.0).round() as u32))
        .collect();
    let coverage = stream.weighted_choice(&options).unwrap_or(Cover3);
    if coverage.is_man() {
        blitz_chance += 0.05;
    }

    let pressure = stream.chance(blitz_chance.clamp(0.02, 0.6));
    DefensiveCall {
        front,
        coverage,
        blitz: coverage == Cover0 || pressure,
    }
}

/// Route concept for a pass call against the actual coverage. One draw for
/// pass calls, none for runs.
pub fn select_concept(
    call: PlayCall,
    coverage: Coverage,
    stream: &mut RandomStream,
) -> Option<(RouteConcept, ConceptModifier)> {
    let table = call.concept_table(coverage.shell())?;
    let concept = stream.weighted_choice(table)?;
    Some((concept, concept_modifier(concept, coverage)))
}

/// Kick or go for two after a touchdown. `margin` is the scoring team's
/// lead including the six points just scored.
pub fn conversion_choice(margin: i32, period: Period, clock: u32) -> ConversionChoice {
    let second_half = matches!(period, Period::Quarter(3) | Period::Quarter(4));
    let late = period == Period::Quarter(4) && clock <= 300;
    if second_half && matches!(margin, -2 | -5 | -10) {
        return ConversionChoice::TwoPoint;
    }
    if late && matches!(margin, 1 | 5) {
        return ConversionChoice::TwoPoint;
    }
    ConversionChoice::ExtraPoint
}

#[cfg(test)]
mod tests {
    use super::*;

    fn context() -> PlayContext {
        PlayContext {
            down: 1,
            yards_to_go: 10,
            ball_position: 25,
            clock: 600,
            period: Period::Quarter(1),
            score_margin: 0,
            two_minute_drill: false,
            offense_timeouts: 3,
            defense_timeouts: 3,
            clock_running: false,
            play_style: PlayStyle::Balanced,
            field_goal_probability: 0.0,
        }
    }

    fn stream(client: &str) -> RandomStream {
        RandomStream::new("5e".repeat(32), client)
    }

    #[test]
    fn test_first_down_runs_a_play() {
        assert_eq!(decide_snap(&context()), SnapDecision::Play);
    }

    #[test]
    fn test_fourth_and_long_deep_in_own_territory_punts() {
        let ctx = PlayContext {
            down: 4,
            yards_to_go: 9,
            ..context()
        };
        assert_eq!(decide_snap(&ctx), SnapDecision::Punt);
    }

    #[test]
    fn test_fourth_and_one_in_opponent_territory_goes() {
        let ctx = PlayContext {
            down: 4,
            yards_to_go: 1,
            ball_position: 70,
            field_goal_probability: 0.9,
            ..context()
        };
        assert_eq!(decide_snap(&ctx), SnapDecision::Play);
    }

    #[test]
    fn test_fourth_and_long_in_range_kicks() {
        let ctx = PlayContext {
            down: 4,
            yards_to_go: 8,
            ball_position: 78,
            field_goal_probability: 0.85,
            ..context()
        };
        assert_eq!(decide_snap(&ctx), SnapDecision::FieldGoal);
    }

    #[test]
    fn test_conservative_team_punts_fourth_and_one_midfield() {
        let ctx = PlayContext {
            down: 4,
            yards_to_go: 1,
            ball_position: 50,
            play_style: PlayStyle::Conservative,
            ..context()
        };
        assert_eq!(decide_snap(&ctx), SnapDecision::Punt);
        let aggressive = PlayContext {
            play_style: PlayStyle::Aggressive,
            ..ctx
        };
        assert_eq!(decide_snap(&aggressive), SnapDecision::Play);
    }

    #[test]
    fn test_trailing_late_goes_for_it() {
        let ctx = PlayContext {
            down: 4,
            yards_to_go: 12,
            ball_position: 30,
            period: Period::Quarter(4),
            clock: 90,
            score_margin: -7,
            ..context()
        };
        assert_eq!(decide_snap(&ctx), SnapDecision::Play);
    }

    #[test]
    fn test_leader_kneels_out_the_clock() {
        let ctx = PlayContext {
            period: Period::Quarter(4),
            clock: 100,
            score_margin: 4,
            defense_timeouts: 1,
            ..context()
        };
        // Three unstoppable kneels cover 120 seconds
        assert_eq!(decide_snap(&ctx), SnapDecision::Kneel);
        let too_early = PlayContext { clock: 200, ..ctx };
        assert_eq!(decide_snap(&too_early), SnapDecision::Play);
    }

    #[test]
    fn test_leader_on_fourth_down_does_not_kneel() {
        let ctx = PlayContext {
            down: 4,
            yards_to_go: 6,
            ball_position: 35,
            clock: 30,
            period: Period::Quarter(4),
            score_margin: 7,
            defense_timeouts: 0,
            clock_running: false,
            ..context()
        };
        let snap = decide_snap(&ctx);
        assert_ne!(snap, SnapDecision::Kneel);
        assert_eq!(snap, SnapDecision::Punt);
    }

    #[test]
    fn test_spike_without_timeouts() {
        let ctx = PlayContext {
            period: Period::Quarter(4),
            clock: 40,
            score_margin: -3,
            two_minute_drill: true,
            offense_timeouts: 0,
            clock_running: true,
            ball_position: 55,
            ..context()
        };
        assert_eq!(decide_snap(&ctx), SnapDecision::Spike);
        let stopped = PlayContext {
            clock_running: false,
            ..ctx
        };
        assert_eq!(decide_snap(&stopped), SnapDecision::Play);
    }

    #[test]
    fn test_last_second_field_goal_before_half() {
        let ctx = PlayContext {
            period: Period::Quarter(2),
            clock: 5,
            ball_position: 72,
            field_goal_probability: 0.8,
            ..context()
        };
        assert_eq!(decide_snap(&ctx), SnapDecision::FieldGoal);
    }

    #[test]
    fn test_call_offense_consumes_one_draw() {
        let mut s = stream("offense");
        call_offense(&context(), &mut s);
        assert_eq!(s.nonce(), 1);
    }

    #[test]
    fn test_short_yardage_can_sneak() {
        let ctx = PlayContext {
            down: 3,
            yards_to_go: 1,
            ball_position: 45,
            ..context()
        };
        let mut s = stream("sneak");
        let sneaks = (0..300)
            .filter(|_| call_offense(&ctx, &mut s) == PlayCall::QbSneak)
            .count();
        assert!(sneaks > 0);
        let mut s = stream("no-sneak");
        assert!((0..300).all(|_| call_offense(&context(), &mut s) != PlayCall::QbSneak));
    }

    #[test]
    fn test_two_minute_drill_mostly_passes() {
        let ctx = PlayContext {
            period: Period::Quarter(4),
            clock: 90,
            score_margin: -4,
            two_minute_drill: true,
            ..context()
        };
        let mut s = stream("drill");
        let passes = (0..400).filter(|_| call_offense(&ctx, &mut s).is_pass()).count();
        assert!(passes > 320);
    }

    #[test]
    fn test_call_defense_consumes_two_draws() {
        let mut s = stream("defense");
        let call = call_defense(&context(), &mut s);
        assert_eq!(s.nonce(), 2);
        if call.coverage == Coverage::Cover0 {
            assert!(call.blitz);
        }
    }

    #[test]
    fn test_cover_zero_always_blitzes() {
        let ctx = PlayContext {
            down: 3,
            yards_to_go: 12,
            ..context()
        };
        let mut s = stream("zero");
        for _ in 0..300 {
            let call = call_defense(&ctx, &mut s);
            if call.coverage == Coverage::Cover0 {
                assert!(call.blitz);
            }
        }
    }

    #[test]
    fn test_defensive_fronts() {
        let goal_line = PlayContext {
            ball_position: 97,
            yards_to_go: 3,
            ..context()
        };
        assert_eq!(defensive_front(&goal_line), DefensiveFront::GoalLine);
        let third_long = PlayContext {
            down: 3,
            yards_to_go: 9,
            ..context()
        };
        assert_eq!(defensive_front(&third_long), DefensiveFront::Dime);
        assert_eq!(defensive_front(&context()), DefensiveFront::Nickel);
    }

    #[test]
    fn test_select_concept_for_runs_draws_nothing() {
        let mut s = stream("concept");
        assert!(select_concept(PlayCall::InsideRun, Coverage::Cover3, &mut s).is_none());
        assert_eq!(s.nonce(), 0);
    }

    #[test]
    fn test_select_concept_uses_shell_table() {
        let mut s = stream("concept");
        for _ in 0..50 {
            let (concept, modifier) =
                select_concept(PlayCall::Screen, Coverage::Cover1, &mut s).unwrap();
            let table = PlayCall::Screen
                .concept_table(Coverage::Cover1.shell())
                .unwrap();
            assert!(table.iter().any(|option| option.value == concept));
            assert_eq!(modifier, concept_modifier(concept, Coverage::Cover1));
        }
        assert_eq!(s.nonce(), 50);
    }

    #[test]
    fn test_conversion_chart() {
        let q4 = Period::Quarter(4);
        assert_eq!(conversion_choice(-2, q4, 600), ConversionChoice::TwoPoint);
        assert_eq!(conversion_choice(-5, Period::Quarter(3), 600), ConversionChoice::TwoPoint);
        assert_eq!(conversion_choice(-2, Period::Quarter(1), 600), ConversionChoice::ExtraPoint);
        assert_eq!(conversion_choice(1, q4, 200), ConversionChoice::TwoPoint);
        assert_eq!(conversion_choice(1, q4, 600), ConversionChoice::ExtraPoint);
        assert_eq!(conversion_choice(6, q4, 100), ConversionChoice::ExtraPoint);
    }
}
