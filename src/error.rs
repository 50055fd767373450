//! Error types for rs-tagscrape.
//!
//! Malformed markup never surfaces here: the scanner and iterator recover from
//! unterminated tags and unmatched closes on their own. These variants cover
//! the precondition and context failures callers have to handle.

/// Error type for scraping operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The entry point was handed empty text.
    #[error("No data: input text is empty")]
    EmptyInput,

    /// A form tag appeared outside the context it needs
    /// (an `input` with no open form, an `option` with no open select).
    #[error("<{tag}> found outside of any {context}")]
    OrphanTag {
        /// Lower-cased tag name.
        tag: String,
        /// The missing enclosing element (`form` or `select`).
        context: &'static str,
    },

    /// The form scanner matched a tag name the state machine does not handle.
    #[error("Unexpected tag: {0}")]
    UnexpectedTag(String),

    /// `Form::submit` was asked for an action the form does not offer.
    #[error("Action not available: {action}, in form {form}: choose from {available:?}")]
    UnknownAction {
        /// Requested action name.
        action: String,
        /// Name of the form.
        form: String,
        /// Names of the form's submit inputs.
        available: Vec<String>,
    },

    /// A caller-supplied name pattern failed to compile.
    #[error("Invalid name pattern: {0}")]
    InvalidPattern(#[from] regex::Error),
}

/// Result type alias for scraping operations.
pub type Result<T> = std::result::Result<T, Error>;
