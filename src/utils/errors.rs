use std::error::Error;

/// Flatten an error and its sources into one line for logging
///
/// `"failed to download 'raw/x.json': Not found: raw/x.json"`
pub fn error_chain(err: &dyn Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let text = cause.to_string();
        // thiserror messages often already embed their source
        if !message.contains(&text) {
            message.push_str(": ");
            message.push_str(&text);
        }
        source = cause.source();
    }
    message
}
