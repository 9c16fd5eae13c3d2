use chrono::Utc;
use rand::{distributions::Alphanumeric, Rng};

/// Builds an identifier of the form `<prefix>_<unix-millis>_<7 random chars>`.
pub(crate) fn timestamped_id(prefix: &str) -> String {
    let suffix: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(7)
        .map(char::from)
        .collect();
    format!(
        "{}_{}_{}",
        prefix,
        Utc::now().timestamp_millis(),
        suffix.to_lowercase()
    )
}
