//! Services module
//!
//! Business logic services that coordinate between the HTTP routes and the
//! repository. Every balance change goes through `LedgerService`.

pub mod activity;
pub mod backup;
pub mod badges;
pub mod ebooks;
pub mod goals;
pub mod learning;
pub mod ledger;
pub mod quiz;
pub mod rules;
pub mod scheduler;
pub mod settings;
pub mod shop;
pub mod statistics;

pub use activity::{ActivityEvent, ActivityHub};
pub use backup::BackupService;
pub use badges::BadgesService;
pub use ebooks::EbooksService;
pub use goals::GoalsService;
pub use learning::LearningService;
pub use ledger::LedgerService;
pub use quiz::QuizService;
pub use rules::RulesService;
pub use scheduler::SchedulerService;
pub use settings::SettingsService;
pub use shop::ShopService;
pub use statistics::StatisticsService;
