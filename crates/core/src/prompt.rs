//! Composite-portrait prompt compiler.
//!
//! Turns an [`AttributeRecord`] plus optional [`FeatureMetadata`] into a
//! single tiered prompt. Locked features come first, then high-confidence
//! features, then everything else, so the most load-bearing description sits
//! at the top of the prompt.
//!
//! The compiler is a pure function: identical inputs give byte-identical
//! output.

use serde::Serialize;

use crate::attributes::AttributeRecord;
use crate::features::{self, FeatureDef, NONE_SENTINEL};
use crate::metadata::{ConfidenceBand, FeatureMetadata};

// ---------------------------------------------------------------------------
// Fixed prompt text
// ---------------------------------------------------------------------------

pub const PREAMBLE: &str = "Create a realistic police sketch portrait of a person.";

pub const LOCKED_HEADER: &str =
    "CRITICAL FIXED FEATURES (These must be rendered EXACTLY as specified, no variation allowed):";

pub const HIGH_CONFIDENCE_HEADER: &str =
    "HIGH CONFIDENCE FEATURES (Render these closely as specified, minimal variation):";

pub const VARIABLE_HEADER: &str = "OTHER FEATURES (Can have natural variation within reason):";

pub const CLOSING_DIRECTIVE: &str = "The image should be a front-facing portrait suitable for suspect identification, with neutral background, \n\
professional police composite sketch style, detailed facial features, photorealistic rendering.\n\
High quality, detailed facial features, natural lighting, neutral expression.";

// ---------------------------------------------------------------------------
// Tiers
// ---------------------------------------------------------------------------

/// How strictly a feature's value should be followed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FeatureTier {
    Locked,
    HighConfidence,
    Variable,
}

/// A present feature after tier classification, with its rendered line.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PromptLine {
    pub key: features::FeatureKey,
    pub tier: FeatureTier,
    pub text: String,
}

/// Classify a feature: lock wins, then the confidence band.
pub fn classify(locked: bool, band: ConfidenceBand) -> FeatureTier {
    if locked {
        FeatureTier::Locked
    } else if band == ConfidenceBand::High {
        FeatureTier::HighConfidence
    } else {
        FeatureTier::Variable
    }
}

fn render_line(label: &str, value: &str, locked: bool, band: ConfidenceBand) -> String {
    if locked {
        return format!("{label}: exactly {value} (LOCKED - must not change)");
    }
    match band {
        ConfidenceBand::High => format!("{label}: strongly {value}"),
        ConfidenceBand::Low => format!("{label}: approximately {value} (can vary)"),
        ConfidenceBand::Medium => format!("{label}: {value}"),
    }
}

/// Whether the feature is suppressed by a `"None"` sentinel on itself or on
/// the feature that gates it.
fn is_suppressed(def: &FeatureDef, attributes: &AttributeRecord) -> bool {
    let own_sentinel = def.none_sentinel
        && attributes.text(def.key).as_deref() == Some(NONE_SENTINEL);
    let gate_closed = def.gated_by.is_some_and(|gate| {
        match attributes.text(gate) {
            Some(value) => gate.def().none_sentinel && value == NONE_SENTINEL,
            None => true,
        }
    });
    own_sentinel || gate_closed
}

/// Classify and render every present, non-suppressed prompt feature in
/// canonical order.
pub fn prompt_lines(
    attributes: &AttributeRecord,
    metadata: Option<&FeatureMetadata>,
) -> Vec<PromptLine> {
    let defaults = FeatureMetadata::new();
    let metadata = metadata.unwrap_or(&defaults);

    features::prompt_features()
        .filter(|def| !is_suppressed(def, attributes))
        .filter_map(|def| {
            let label = def.prompt_label?;
            let value = attributes.text(def.key)?;
            let meta = metadata.get(def.key);
            let band = meta.band();
            Some(PromptLine {
                key: def.key,
                tier: classify(meta.locked, band),
                text: render_line(label, &value, meta.locked, band),
            })
        })
        .collect()
}

/// A compiled prompt and whether any line made it into the locked block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledPrompt {
    pub text: String,
    /// Selects the per-variation note. Lock flags on absent or suppressed
    /// features do not count.
    pub any_locked: bool,
}

/// Compile the full generation prompt.
///
/// Layout: preamble, locked block, high-confidence block, variable block,
/// closing directive. Empty blocks are omitted.
pub fn compile(attributes: &AttributeRecord, metadata: Option<&FeatureMetadata>) -> CompiledPrompt {
    let lines = prompt_lines(attributes, metadata);

    let mut prompt = String::with_capacity(1024);
    prompt.push_str(PREAMBLE);
    prompt.push_str("\n\n");

    for (tier, header) in [
        (FeatureTier::Locked, LOCKED_HEADER),
        (FeatureTier::HighConfidence, HIGH_CONFIDENCE_HEADER),
        (FeatureTier::Variable, VARIABLE_HEADER),
    ] {
        let block: Vec<&str> = lines
            .iter()
            .filter(|line| line.tier == tier)
            .map(|line| line.text.as_str())
            .collect();
        if block.is_empty() {
            continue;
        }
        prompt.push_str(header);
        prompt.push('\n');
        prompt.push_str(&block.join("\n"));
        prompt.push_str("\n\n");
    }

    prompt.push_str(CLOSING_DIRECTIVE);
    CompiledPrompt {
        text: prompt,
        any_locked: lines.iter().any(|line| line.tier == FeatureTier::Locked),
    }
}

/// Prompt text only. See [`compile`].
pub fn compile_prompt(attributes: &AttributeRecord, metadata: Option<&FeatureMetadata>) -> String {
    compile(attributes, metadata).text
}

/// Per-call note distinguishing variation `index` (1-based) of `count`.
pub fn variation_note(index: usize, count: usize, any_locked: bool) -> String {
    if any_locked {
        format!("Variation {index}: Keep ALL locked features identical. Only vary unlocked features slightly.")
    } else {
        format!("Variation {index} of {count} - slight variation in angle or expression.")
    }
}

/// The content sent for one variation: the compiled prompt plus its note.
pub fn variation_prompt(prompt: &str, index: usize, count: usize, any_locked: bool) -> String {
    format!("{prompt}\n\n{}", variation_note(index, count, any_locked))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
