//! Static catalogs
//!
//! Seed data for rules, shop items and vocabulary, plus the fixed
//! badge definitions, e-book library and quiz question banks.

pub mod badges;
pub mod books;
pub mod quizzes;
pub mod rules;
pub mod shop;
pub mod words;

pub use badges::{BadgeCondition, BadgeDefinition, BADGES};
pub use books::{Book, BOOKS};
pub use quizzes::{QuizDifficulty, QuizQuestion};
