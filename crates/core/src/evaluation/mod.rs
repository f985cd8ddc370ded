pub mod domain;
pub mod match_evaluator;
