//! Query text analysis
//!
//! Pure text heuristics that run ahead of retrieval:
//! - Tokenization/normalization (Latin and Arabic scripts)
//! - Locale and currency detection
//! - Intent classification over a closed tag set
//! - Numeric hint extraction (price ceiling, model year)
//!
//! Everything here is synchronous and side-effect free; the three analysis
//! passes share no state and can run in any order.

pub mod hints;
pub mod intent;
pub mod locale;
pub mod tokenize;

pub use hints::{extract_hints, QueryHints};
pub use intent::{classify_intent, QueryIntent};
pub use locale::{detect_region, RegionHint};
pub use tokenize::{is_stop_word, tokenize};
