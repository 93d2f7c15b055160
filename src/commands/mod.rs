// Sync and its dry-run preview
pub mod sync;

// Offline helpers
pub mod demo;
pub mod urls;
pub mod validate;
