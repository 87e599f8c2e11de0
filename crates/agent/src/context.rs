//! Context assembly
//!
//! Renders retrieved candidates, regional price guidance and the history
//! window into the instruction block and turn list handed to the model.
//! Rendering is deterministic: identical inputs produce identical bytes.

use car_advisor_config::price_guidance;
use car_advisor_core::{Turn, TurnRole};
use car_advisor_llm::ChatMessage;
use car_advisor_retrieval::RetrievalCandidate;
use car_advisor_text::QueryIntent;

const SYSTEM_PREAMBLE: &str = "You are a knowledgeable car-marketplace advisor. \
Ground every recommendation in the listings below when they are relevant, \
refer to cars by make and model, quote prices with their currency, and keep \
answers concise and honest about trade-offs.";

pub struct ContextAssembler {
    max_entries: usize,
    history_window: usize,
}

impl ContextAssembler {
    pub fn new(max_entries: usize, history_window: usize) -> Self {
        Self {
            max_entries,
            history_window,
        }
    }

    /// Build the instruction/context block: preamble, intent, at most
    /// `max_entries` candidate lines, regional price guidance.
    pub fn build_context(
        &self,
        candidates: &[RetrievalCandidate],
        currency: &str,
        intent: QueryIntent,
    ) -> String {
        let mut out = String::from(SYSTEM_PREAMBLE);
        out.push_str(&format!("\n\nDetected intent: {intent}\n"));

        if candidates.is_empty() {
            out.push_str(
                "\nNo matching listings were found in the catalog. Answer from \
                 general automotive knowledge and say clearly that you are not \
                 quoting live listings.\n",
            );
        } else {
            out.push_str("\n## Matching listings\n");
            for (position, candidate) in candidates.iter().take(self.max_entries).enumerate() {
                out.push_str(&format!("{}. {}\n", position + 1, render_candidate(candidate)));
            }
        }

        out.push_str(&render_price_guidance(currency));
        out
    }

    /// Map the trailing history window onto model turns (oldest first) and
    /// append the current query as the final user turn.
    pub fn build_turns(&self, history: &[Turn], query: &str) -> Vec<ChatMessage> {
        let start = history.len().saturating_sub(self.history_window);
        let mut turns: Vec<ChatMessage> = history[start..]
            .iter()
            .map(|turn| match turn.role {
                TurnRole::User => ChatMessage::user(&turn.content),
                _ => ChatMessage::assistant(&turn.content),
            })
            .collect();
        turns.push(ChatMessage::user(query));
        turns
    }
}

/// One listing line. Optional fields are skipped entirely, never rendered
/// as empty placeholders.
fn render_candidate(candidate: &RetrievalCandidate) -> String {
    let entry = &candidate.entry;
    let mut line = entry.label();

    match entry.price {
        Some(price) => line.push_str(&format!(" - {} {}", format_amount(price), entry.currency)),
        None => line.push_str(" - price on request"),
    }
    if entry.rating > 0.0 {
        line.push_str(&format!(
            " | rated {:.1} ({} reviews)",
            entry.rating, entry.reviews
        ));
    }
    if let Some(body_style) = &entry.specs.body_style {
        line.push_str(&format!(" | {body_style}"));
    }
    if let Some(horsepower) = entry.specs.horsepower {
        if horsepower > 0 {
            line.push_str(&format!(" | {horsepower} hp"));
        }
    }
    if let Some(engine) = &entry.specs.engine {
        line.push_str(&format!(" | {engine}"));
    }
    if let Some(fuel_economy) = &entry.specs.fuel_economy {
        line.push_str(&format!(" | {fuel_economy}"));
    }
    line
}

fn render_price_guidance(currency: &str) -> String {
    let (code, bands) = price_guidance(currency);
    let mut out = format!("\n## Price guide ({code})\n");
    for band in bands {
        let range = match band.max {
            Some(max) if band.min > 0.0 => {
                format!("{}-{} {}", format_amount(band.min), format_amount(max), code)
            }
            Some(max) => format!("under {} {}", format_amount(max), code),
            None => format!("above {} {}", format_amount(band.min), code),
        };
        out.push_str(&format!("- {}: {} ({})\n", band.label, range, band.description));
    }
    out
}

/// Whole amounts render without a fractional part.
fn format_amount(amount: f64) -> String {
    if amount.fract() == 0.0 {
        format!("{amount:.0}")
    } else {
        format!("{amount:.2}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use car_advisor_core::{CatalogEntry, VehicleSpecs};
    use car_advisor_retrieval::RetrievalStrategy;

    fn candidate(entry: CatalogEntry) -> RetrievalCandidate {
        RetrievalCandidate::new(entry, 0.9, RetrievalStrategy::Keyword)
    }

    #[test]
    fn test_zero_rating_omitted() {
        let entry = CatalogEntry::new(1, "Kia", "Rio", 2019).with_price(30_000.0, "AED");
        let line = render_candidate(&candidate(entry));
        assert!(!line.contains("rated"));
        assert!(!line.contains("reviews"));
    }

    #[test]
    fn test_rating_rendered_with_reviews() {
        let entry = CatalogEntry::new(1, "Toyota", "Camry", 2022)
            .with_price(85_000.0, "AED")
            .with_rating(4.5, 12);
        let line = render_candidate(&candidate(entry));
        assert!(line.contains("4.5"));
        assert!(line.contains("12"));
    }

    #[test]
    fn test_optional_specs_skipped_not_blank() {
        let specs = VehicleSpecs {
            body_style: Some("SUV".to_string()),
            horsepower: None,
            engine: None,
            fuel_economy: Some("8.9L/100km".to_string()),
            extra: Default::default(),
        };
        let entry = CatalogEntry::new(1, "Nissan", "Patrol", 2023)
            .with_price(250_000.0, "AED")
            .with_specs(specs);
        let line = render_candidate(&candidate(entry));
        assert!(line.contains("SUV"));
        assert!(line.contains("8.9L/100km"));
        assert!(!line.contains("hp"));
        assert!(!line.contains("| |"));
    }

    #[test]
    fn test_missing_price() {
        let entry = CatalogEntry::new(1, "Kia", "Rio", 2019);
        let line = render_candidate(&candidate(entry));
        assert!(line.contains("price on request"));
    }

    #[test]
    fn test_entry_cap_enforced() {
        let assembler = ContextAssembler::new(2, 10);
        let candidates: Vec<RetrievalCandidate> = (0..5)
            .map(|id| {
                candidate(
                    CatalogEntry::new(id, "Make", format!("Model{id}"), 2020)
                        .with_price(10_000.0, "AED"),
                )
            })
            .collect();

        let context = assembler.build_context(&candidates, "AED", QueryIntent::General);
        assert!(context.contains("Model0"));
        assert!(context.contains("Model1"));
        assert!(!context.contains("Model2"));
    }

    #[test]
    fn test_empty_candidates_caveated() {
        let assembler = ContextAssembler::new(20, 10);
        let context = assembler.build_context(&[], "AED", QueryIntent::General);
        assert!(context.contains("No matching listings"));
        // Price guidance is still rendered.
        assert!(context.contains("Price guide (AED)"));
    }

    #[test]
    fn test_unknown_currency_falls_back() {
        let assembler = ContextAssembler::new(20, 10);
        let context = assembler.build_context(&[], "XXX", QueryIntent::General);
        assert!(context.contains("Price guide (AED)"));
    }

    #[test]
    fn test_history_window_keeps_most_recent() {
        let assembler = ContextAssembler::new(20, 3);
        let history: Vec<Turn> = (0..6)
            .map(|i| {
                if i % 2 == 0 {
                    Turn::user(format!("question {i}"))
                } else {
                    Turn::assistant(format!("answer {i}"))
                }
            })
            .collect();

        let turns = assembler.build_turns(&history, "latest question");
        // 3 history turns plus the current query.
        assert_eq!(turns.len(), 4);
        assert_eq!(turns[0].content, "answer 3");
        assert_eq!(turns[3].content, "latest question");
    }

    #[test]
    fn test_roles_mapped() {
        let assembler = ContextAssembler::new(20, 10);
        let history = vec![Turn::user("q"), Turn::assistant("a")];
        let turns = assembler.build_turns(&history, "next");
        assert_eq!(turns[0].role, car_advisor_llm::ChatRole::User);
        assert_eq!(turns[1].role, car_advisor_llm::ChatRole::Assistant);
        assert_eq!(turns[2].role, car_advisor_llm::ChatRole::User);
    }

    #[test]
    fn test_deterministic_rendering() {
        let assembler = ContextAssembler::new(20, 10);
        let entries = vec![candidate(
            CatalogEntry::new(1, "Toyota", "Camry", 2022)
                .with_price(85_000.0, "AED")
                .with_rating(4.2, 12),
        )];
        let first = assembler.build_context(&entries, "AED", QueryIntent::Comparing);
        let second = assembler.build_context(&entries, "AED", QueryIntent::Comparing);
        assert_eq!(first, second);
    }
}
