use serde::Serialize;

use vkmig_core::{DetailedExtraction, EventAnalysis, Signal};

use super::ConfigOverrides;

#[derive(Debug, Clone)]
pub struct AnalyzeInput {
    pub text: String,
    /// Print serde JSON instead of the human-readable block
    pub json: bool,
    pub overrides: ConfigOverrides,
}

#[derive(Debug, Serialize)]
struct AnalyzeOutput {
    extraction: DetailedExtraction,
    event: EventAnalysis,
}

/// Strategy for running the enrichment on a single text.
///
/// Useful for checking a gazetteer or classifier override before a full
/// migration.
#[derive(Debug, Clone, Copy)]
pub struct AnalyzeStrategy;

impl super::CommandStrategy for AnalyzeStrategy {
    type Input = AnalyzeInput;

    async fn execute(&self, input: Self::Input) -> anyhow::Result<()> {
        let config = input.overrides.load_config()?;
        let enricher = super::build_enricher(&config)?;

        let output = AnalyzeOutput {
            extraction: enricher.extractor().analyze_detailed(&input.text),
            event: enricher.get_event_analysis(&input.text),
        };

        if input.json {
            println!("{}", serde_json::to_string_pretty(&output)?);
        } else {
            print_output(&output);
        }
        Ok(())
    }
}

fn join<'a>(items: impl IntoIterator<Item = &'a String>, separator: &str) -> String {
    let joined = items
        .into_iter()
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(separator);
    if joined.is_empty() {
        "-".to_string()
    } else {
        joined
    }
}

fn print_output(output: &AnalyzeOutput) {
    let extraction = &output.extraction;
    println!("=== Extraction ===");
    println!(
        "Text length: {} ({} after cleaning)",
        extraction.text_length, extraction.cleaned_text_length
    );
    println!("Cities: {}", join(&extraction.cities, ", "));
    println!("Addresses: {}", join(&extraction.addresses, "; "));
    println!();

    let event = &output.event;
    println!("=== Event analysis ===");
    println!("Event invitation: {}", if event.is_event { "yes" } else { "no" });
    for signal in Signal::ALL {
        let mark = if event.signals.get(signal) { "+" } else { " " };
        println!("  [{mark}] {signal}");
    }
    println!("Matched rules: {}", join(&event.matched_rules, ", "));
    println!("Matched keywords: {}", join(&event.matched_keywords, ", "));
    if event.has_service_keywords {
        println!("Service vocabulary present");
    }
}
