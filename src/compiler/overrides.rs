//! Tiers 2 and 3: phrase rules that override token accumulation.
//!
//! Each [`OverrideRule`] is a named predicate and builder over the raw query
//! text and its tokens. Rules run in declared order and the last rule whose
//! predicate matches decides the expression; the buffer built by the token
//! rules survives only when no rule matches.
//!
//! Standard order ([`OVERRIDE_RULES`]):
//!
//! 1. `phrase-decomposition` - query contains `of`: `"name of address"` →
//!    `.name.address`
//! 2. `second-ordinal` - query contains `second`: `.[] | .[1]`
//! 3. `third-ordinal` - query contains `third`: `.[] | .[2]`
//!
//! So `third` beats `second`, and both beat `of`.
//!
//! All predicates are substring tests on the lowercased query, not token
//! tests: `"profile"` contains `of` and `"seconds"` contains `second`.

/// Inputs every override rule sees.
#[derive(Debug, Clone)]
pub struct PhraseContext<'a> {
    /// The query, lowercased
    pub lowered: String,
    /// Tokens from the tokenizer
    pub tokens: &'a [String],
}

impl<'a> PhraseContext<'a> {
    pub fn new(query: &str, tokens: &'a [String]) -> Self {
        PhraseContext {
            lowered: query.to_lowercase(),
            tokens,
        }
    }
}

/// A named predicate-plus-builder pair.
#[derive(Debug, Clone, Copy)]
pub struct OverrideRule {
    pub name: &'static str,
    pub matches: fn(&PhraseContext<'_>) -> bool,
    pub build: fn(&PhraseContext<'_>) -> String,
}

pub const PHRASE_DECOMPOSITION: OverrideRule = OverrideRule {
    name: "phrase-decomposition",
    matches: |ctx| ctx.lowered.contains("of"),
    build: decompose_phrase,
};

pub const SECOND_ORDINAL: OverrideRule = OverrideRule {
    name: "second-ordinal",
    matches: |ctx| ctx.lowered.contains("second"),
    build: |_| ".[] | .[1]".to_string(),
};

pub const THIRD_ORDINAL: OverrideRule = OverrideRule {
    name: "third-ordinal",
    matches: |ctx| ctx.lowered.contains("third"),
    build: |_| ".[] | .[2]".to_string(),
};

/// Lowest priority first.
pub const OVERRIDE_RULES: &[OverrideRule] = &[PHRASE_DECOMPOSITION, SECOND_ORDINAL, THIRD_ORDINAL];

/// Splits on every `of`, trims each piece and joins them into a dotted path.
///
/// Empty pieces are kept, so `"name of"` becomes `.name.`.
fn decompose_phrase(ctx: &PhraseContext<'_>) -> String {
    let segments: Vec<&str> = ctx.lowered.split("of").map(str::trim).collect();
    format!(".{}", segments.join("."))
}

/// Runs `rules` in order over `base`.
///
/// Returns the final expression and the name of the rule that produced it,
/// or `base` unchanged and `None` when nothing matched.
pub fn apply(
    rules: &[OverrideRule],
    ctx: &PhraseContext<'_>,
    base: String,
) -> (String, Option<&'static str>) {
    rules
        .iter()
        .filter(|rule| (rule.matches)(ctx))
        .last()
        .map(|rule| ((rule.build)(ctx), Some(rule.name)))
        .unwrap_or((base, None))
}
