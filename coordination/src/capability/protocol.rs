//! Capability-call protocol: turn markers embedded in model output into
//! capability invocations and splice the results back into the text.
//!
//! Two passes, always in this order:
//!
//! 1. **Marker pass**: every `[CAPABILITY_CALL: <name>] <arg> [/CAPABILITY_CALL]`
//!    (keyword case-insensitive, legacy `TOOL_CALL` accepted) is replaced, left
//!    to right, by `[Tool Result from <name>]: <result>`,
//!    `[Tool Error from <name>]: <message>`, or `[Tool Error]: Unknown tool '<name>'`.
//! 2. **Narration pass**: for each bound capability, a loose
//!    `[using] <name> [with] <rest of line up to '.' or newline>` pattern is
//!    matched against the already-substituted text. Only the `using` and `with`
//!    keywords ignore case. A match never crosses a line break. Spans that
//!    overlap an annotation inserted during this call, or that themselves
//!    contain a marker or annotation token, are skipped.
//!
//! The narration pass is a heuristic for models that describe tool use in
//! prose. It can fire on ordinary prose that happens to name a capability and
//! it misses phrasing it does not anticipate.
//!
//! Invocations run sequentially so substitution order is deterministic, and a
//! failing invocation never stops the remaining ones.

use std::ops::Range;
use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, info, warn};

use super::CapabilityDescriptor;

/// `[CAPABILITY_CALL: name] argument [/CAPABILITY_CALL]`.
static CALL_MARKER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\[(?:CAPABILITY|TOOL)_CALL:([^\]]*)\]([^\[]*)\[/(?:CAPABILITY|TOOL)_CALL\]")
        .expect("CALL_MARKER regex should compile")
});

/// Tokens whose presence in a narrated span shields it from resolution.
const SHIELD_TOKENS: &[&str] = &["[tool result", "[tool error", "capability_call", "tool_call"];

/// Persona suffix that teaches the model the call syntax.
pub fn capability_instructions(capabilities: &[CapabilityDescriptor]) -> String {
    let manifest = capabilities
        .iter()
        .map(CapabilityDescriptor::manifest_line)
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "You have access to the following tools:\n{manifest}\n\n\
         To use a tool you MUST write the call in exactly this form, on its own:\n\
         [CAPABILITY_CALL: tool_name] argument [/CAPABILITY_CALL]\n\
         Each call is replaced by the tool's output before your answer is shown. \
         If you need information a tool can provide and you do not emit this marker, \
         the tool is never run and that information will be missing from your answer."
    )
}

/// Resolve every capability call in `text` against the bound capability set.
pub async fn resolve_capability_calls(text: &str, capabilities: &[CapabilityDescriptor]) -> String {
    let (text, protected) = resolve_markers(text, capabilities).await;
    resolve_narrated_calls(text, protected, capabilities).await
}

/// One pending substitution in the current text.
struct Replacement {
    range: Range<usize>,
    text: String,
}

async fn resolve_markers(
    text: &str,
    capabilities: &[CapabilityDescriptor],
) -> (String, Vec<Range<usize>>) {
    // Collect first: invocations await, and must only ever see the original spans.
    let calls: Vec<(Range<usize>, String, String)> = CALL_MARKER
        .captures_iter(text)
        .filter_map(|caps| {
            let span = caps.get(0)?;
            let name = caps.get(1).map_or("", |m| m.as_str()).trim().to_string();
            let argument = caps.get(2).map_or("", |m| m.as_str()).trim().to_string();
            Some((span.range(), name, argument))
        })
        .collect();

    if calls.is_empty() {
        return (text.to_string(), Vec::new());
    }
    debug!(calls = calls.len(), "resolving capability markers");

    let mut replacements = Vec::with_capacity(calls.len());
    for (range, name, argument) in calls {
        let rendered = invoke_rendered(&name, &argument, capabilities).await;
        replacements.push(Replacement {
            range,
            text: rendered,
        });
    }

    apply_replacements(text, &[], replacements)
}

async fn resolve_narrated_calls(
    mut text: String,
    mut protected: Vec<Range<usize>>,
    capabilities: &[CapabilityDescriptor],
) -> String {
    for capability in capabilities {
        let pattern = format!(
            r"(?:\b(?i:using)[^\S\n]+)?\b{}\b(?:[^\S\n]+(?i:with))?[^\S\n]+([^.\n]+)",
            regex::escape(&capability.name)
        );
        let re = match Regex::new(&pattern) {
            Ok(re) => re,
            Err(e) => {
                warn!(capability = %capability.name, error = %e, "skipping narration pattern");
                continue;
            }
        };

        let candidates: Vec<(Range<usize>, String)> = re
            .captures_iter(&text)
            .filter_map(|caps| {
                let span = caps.get(0)?;
                let argument = caps.get(1)?.as_str().trim().to_string();
                Some((span.range(), argument))
            })
            .filter(|(range, argument)| {
                !argument.is_empty()
                    && !overlaps_any(range, &protected)
                    && !span_is_shielded(&text[range.clone()])
            })
            .collect();

        if candidates.is_empty() {
            continue;
        }
        debug!(
            capability = %capability.name,
            matches = candidates.len(),
            "resolving narrated capability use"
        );

        let mut replacements = Vec::with_capacity(candidates.len());
        for (range, argument) in candidates {
            let rendered = invoke_rendered(&capability.name, &argument, capabilities).await;
            replacements.push(Replacement {
                range,
                text: rendered,
            });
        }

        let (next, next_protected) = apply_replacements(&text, &protected, replacements);
        text = next;
        protected = next_protected;
    }
    text
}

/// Invoke `name` from the bound set and render the outcome as an inline block.
async fn invoke_rendered(name: &str, argument: &str, capabilities: &[CapabilityDescriptor]) -> String {
    let Some(capability) = capabilities.iter().find(|c| c.name == name) else {
        warn!(capability = %name, "unknown capability requested");
        return format!("[Tool Error]: Unknown tool '{}'", name);
    };

    match capability.invoke(argument).await {
        Ok(result) => {
            info!(capability = %name, bytes = result.len(), "capability call succeeded");
            format!("[Tool Result from {}]: {}", name, result)
        }
        Err(e) => {
            warn!(capability = %name, error = %e, "capability call failed");
            format!("[Tool Error from {}]: {}", name, e)
        }
    }
}

/// Splice non-overlapping, left-to-right `replacements` into `text`.
///
/// Returns the new text and the protected ranges re-based onto it, including
/// the ranges of the freshly inserted annotations.
fn apply_replacements(
    text: &str,
    protected: &[Range<usize>],
    replacements: Vec<Replacement>,
) -> (String, Vec<Range<usize>>) {
    let mut out = String::with_capacity(text.len());
    let mut ranges = Vec::with_capacity(protected.len() + replacements.len());
    let mut last = 0;

    for rep in &replacements {
        out.push_str(&text[last..rep.range.start]);
        let start = out.len();
        out.push_str(&rep.text);
        ranges.push(start..out.len());
        last = rep.range.end;
    }
    out.push_str(&text[last..]);

    for range in protected {
        let delta: isize = replacements
            .iter()
            .filter(|rep| rep.range.end <= range.start)
            .map(|rep| rep.text.len() as isize - rep.range.len() as isize)
            .sum();
        let start = (range.start as isize + delta) as usize;
        ranges.push(start..start + range.len());
    }
    ranges.sort_by_key(|r| r.start);

    (out, ranges)
}

fn overlaps_any(range: &Range<usize>, protected: &[Range<usize>]) -> bool {
    protected
        .iter()
        .any(|p| range.start < p.end && p.start < range.end)
}

fn span_is_shielded(span: &str) -> bool {
    let span = span.to_lowercase();
    SHIELD_TOKENS.iter().any(|token| span.contains(token))
}
