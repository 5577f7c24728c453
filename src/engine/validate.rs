use url::Url;

use crate::args::HttpMethod;
use crate::error::ValidationError;

use super::RunSettings;

/// Outcome of checking run input before anything is dispatched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Validation {
    pub valid: bool,
    pub errors: Vec<String>,
}

impl Validation {
    const fn from_errors(errors: Vec<String>) -> Self {
        Self {
            valid: errors.is_empty(),
            errors,
        }
    }

    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidRun`] carrying every message when invalid.
    pub fn into_result(self) -> Result<(), ValidationError> {
        if self.valid {
            Ok(())
        } else {
            Err(ValidationError::InvalidRun {
                errors: self.errors,
            })
        }
    }
}

/// Checks that `url` is an absolute http(s) URL and `verb` a supported method.
#[must_use]
pub fn validate(url: &str, verb: &str) -> Validation {
    let mut errors = Vec::new();
    if let Some(error) = url_error(url) {
        errors.push(error);
    }
    if let Err(err) = verb.parse::<HttpMethod>() {
        errors.push(err.to_string());
    }
    Validation::from_errors(errors)
}

/// [`validate`] plus the checks that only make sense on full settings.
#[must_use]
pub fn validate_settings(settings: &RunSettings) -> Validation {
    let mut validation = validate(&settings.url, settings.verb.as_str());
    if settings.iterations == 0 {
        validation.errors.push("Iterations must be >= 1.".to_owned());
        validation.valid = false;
    }
    validation
}

fn url_error(url: &str) -> Option<String> {
    let trimmed = url.trim();
    if trimmed.is_empty() {
        return Some("URL must not be empty.".to_owned());
    }
    let parsed = match Url::parse(trimmed) {
        Ok(parsed) => parsed,
        Err(err) => return Some(format!("Invalid URL '{}': {}", url, err)),
    };
    if !matches!(parsed.scheme(), "http" | "https") {
        return Some(format!(
            "Unsupported URL scheme '{}'. Use http or https.",
            parsed.scheme()
        ));
    }
    if parsed.host_str().is_none_or(str::is_empty) {
        return Some(format!("URL '{}' is missing a host.", url));
    }
    None
}
