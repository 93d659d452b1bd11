//! Validation trait definition

/// Self-check for a configuration section
///
/// Errors are plain messages; [`crate::config::Config::validate`] prefixes
/// them with the section name.
pub trait Validate {
    fn validate(&self) -> Result<(), String>;
}
