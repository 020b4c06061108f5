//! Eligibility filter implementations.
//!
//! Each filter checks one hard constraint and is a no-op when the criteria
//! do not supply that constraint.

pub mod education;
pub mod experience;
pub mod location;
pub mod required_items;

// Re-export for convenience
pub use education::EducationFilter;
pub use experience::ExperienceFilter;
pub use location::LocationFilter;
pub use required_items::RequiredItemsFilter;
