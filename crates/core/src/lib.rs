pub mod catalog;
pub mod config;
pub mod domain;
pub mod errors;
pub mod matching;

pub use catalog::{AreaRule, CategoryCatalog, CompiledCategory};
pub use domain::area::Area;
pub use domain::case::{Case, CaseId, EthnicBackground, SkinTone, SkinType, SunResponse};
pub use domain::category::{Category, CategoryId};
pub use domain::group::{MatchedCase, TreatmentGroup};
pub use domain::selection::{AgeRange, UserSelection};
pub use errors::{ApplicationError, DomainError};
pub use matching::engine::MatchEngine;
pub use matching::extract::ConcernExtractor;
pub use matching::pattern::KeywordPattern;
pub use matching::scoring::ScoreBreakdown;
