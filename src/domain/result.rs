//! Result type alias for Fauna

use super::errors::FaunaError;

/// Result type alias for Fauna operations
///
/// # Examples
///
/// ```
/// use fauna::domain::result::Result;
/// use fauna::domain::errors::FaunaError;
///
/// fn failing_function() -> Result<()> {
///     Err(FaunaError::Configuration("Invalid input".to_string()))
/// }
/// ```
pub type Result<T> = std::result::Result<T, FaunaError>;
