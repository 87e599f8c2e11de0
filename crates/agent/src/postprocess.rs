//! Response post-processing
//!
//! Links the generated text back to the catalog entries it talks about and
//! stamps a stable message identifier.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use chrono::Utc;

use car_advisor_retrieval::RetrievalCandidate;

/// Upper bound on referenced listings per reply
const MAX_REFERENCED: usize = 5;

/// Ids of the candidates whose make AND model both appear
/// (case-insensitively) in the generated text. Candidate order is
/// preserved; the result is a subset of what the model was shown.
pub fn extract_referenced_ids(text: &str, candidates: &[RetrievalCandidate]) -> Vec<i64> {
    let lower = text.to_lowercase();
    let mut ids = Vec::new();
    for candidate in candidates {
        let entry = &candidate.entry;
        if lower.contains(&entry.make.to_lowercase()) && lower.contains(&entry.model.to_lowercase())
        {
            if !ids.contains(&entry.id) {
                ids.push(entry.id);
            }
            if ids.len() == MAX_REFERENCED {
                break;
            }
        }
    }
    ids
}

/// `msg_<unix-millis>_<8-hex text hash>`. Unique enough for chat message
/// ids; the hash makes ids from the same instant distinguishable.
pub fn build_message_id(text: &str) -> String {
    let mut hasher = DefaultHasher::new();
    text.hash(&mut hasher);
    let short_hash = (hasher.finish() & 0xffff_ffff) as u32;
    format!("msg_{}_{:08x}", Utc::now().timestamp_millis(), short_hash)
}
