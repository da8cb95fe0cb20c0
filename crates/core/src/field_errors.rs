//! Flattening of `validator` errors into a single human-readable message.

use validator::ValidationErrors;

/// Render field-level validation failures as `field: message; field: message`.
///
/// Fields are sorted by name so the message is stable across runs.
pub fn describe(errors: &ValidationErrors) -> String {
    let mut parts: Vec<String> = errors
        .field_errors()
        .into_iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |e| {
                let detail = match &e.message {
                    Some(message) => message.to_string(),
                    None => format!("failed '{}' check", e.code),
                };
                format!("{field}: {detail}")
            })
        })
        .collect();
    parts.sort();
    parts.join("; ")
}
