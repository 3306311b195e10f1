pub mod caregiver;
pub mod catalog;
pub mod fallback;
pub mod intent;
pub mod query;
pub mod scoring;
pub mod search;

pub use caregiver::{CaregiverRepository, SupabaseCaregiverRepository};
pub use intent::{IntentExtractor, OpenAiIntentExtractor};
pub use search::CaregiverSearchService;
