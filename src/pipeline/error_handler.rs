use anyhow::Result;
use std::any::Any;

/// Best-effort text of a panic payload (`&str` or `String`, else a placeholder).
pub fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

/// Check joined stage results: log every failed stage, return the first failure.
/// Call after every stage thread was joined.
pub fn check_for_failed_stages(failures: Vec<(String, String)>) -> Result<()> {
    for (name, msg) in &failures {
        log::warn!("Stage '{}' panicked: {}", name, msg);
    }
    match failures.into_iter().next() {
        Some((name, msg)) => Err(anyhow::anyhow!("stage '{}' panicked: {}", name, msg)),
        None => Ok(()),
    }
}
