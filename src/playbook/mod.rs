//! Play calling, defensive calls and route concepts

pub mod concepts;
pub mod selector;

pub use concepts::{
    concept_modifier, ConceptModifier, Coverage, DefensiveCall, DefensiveFront, PlayCall,
    RouteConcept, Shell,
};
pub use selector::{
    call_defense, call_offense, conversion_choice, decide_snap, defensive_front, select_concept,
    ConversionChoice, PlayContext, SnapDecision,
};
