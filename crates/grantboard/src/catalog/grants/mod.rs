mod domain;
mod export;
mod listing;
mod normalizer;

pub use domain::{Grant, GrantStatus};
pub use export::write_listing_csv;
pub use listing::{format_grant_for_display, GrantDisplay, DEADLINE_FALLBACK};
pub use normalizer::normalize_grant;
