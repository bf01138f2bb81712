// Session identifiers: `session_<unix millis>_<9 base36 chars>`

use chrono::Utc;

const SUFFIX_LEN: usize = 9;
const ALPHABET: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Collision-resistant, not globally unique
pub fn generate_session_id() -> String {
    format!(
        "session_{}_{}",
        Utc::now().timestamp_millis(),
        random_suffix()
    )
}

fn random_suffix() -> String {
    let mut n = uuid::Uuid::new_v4().as_u128();
    let mut suffix = String::with_capacity(SUFFIX_LEN);
    for _ in 0..SUFFIX_LEN {
        suffix.push(ALPHABET[(n % 36) as usize] as char);
        n /= 36;
    }
    suffix
}
