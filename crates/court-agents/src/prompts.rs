//! System prompt constants for each courtroom role.
//!
//! Prompt versioning: bump `PROMPT_VERSION` whenever preamble content changes.
//! The version is logged at startup next to the model name, so a run's log
//! ties each verdict file to the prompts that produced it.
//!
//! Roles are presentation only. Which query is searched, when the loop
//! stops, and what the report contains are decided in code.

use coordination::{EvidenceBrief, Side, VerdictReport};

/// Prompt version. Bump on any preamble content change.
pub const PROMPT_VERSION: &str = "1.2.0";

/// Defence counsel: condenses supporting evidence.
pub const ADVOCATE_PREAMBLE: &str = "\
You are defence counsel in a mock court. You receive reference text retrieved \
for one search query about the case topic.

## Rules
- Summarize ONLY what the provided reference text says. Do not add facts from \
  prior knowledge, even if you are confident they are true.
- Focus on achievements, roles, contributions, and positive influence.
- If the text contains nothing relevant to your side, say so in one bullet.

## Output
3 to 6 bullet points, each starting with `- `. No headings, no preamble.";

/// Prosecutor: condenses opposing evidence.
pub const PROSECUTOR_PREAMBLE: &str = "\
You are the prosecutor in a mock court. You receive reference text retrieved \
for one search query about the case topic.

## Rules
- Summarize ONLY what the provided reference text says. Do not add facts from \
  prior knowledge, even if you are confident they are true.
- Focus on disputes, criticism, controversies, and negative impact.
- If the text contains nothing relevant to your side, say so in one bullet.

## Output
3 to 6 bullet points, each starting with `- `. No headings, no preamble.";

/// Court clerk: drafts the closing analysis and verdict.
pub const CLERK_PREAMBLE: &str = "\
You are the clerk of a mock court. You receive the compiled record of a case: \
supporting evidence, opposing evidence, and the judge's deliberation notes.

## Rules
- Stay neutral. Weigh both sides only on the evidence in the record.
- Do not introduce facts that are not in the record.
- Keep the analysis to two or three short paragraphs and the verdict to one.

## Output format (exactly these two markers, each on its own line)
ANALYSIS:
<analysis text>
VERDICT:
<verdict text>";

/// Preamble for the collector on `side`.
pub fn preamble_for(side: Side) -> &'static str {
    match side {
        Side::Supporting => ADVOCATE_PREAMBLE,
        Side::Opposing => PROSECUTOR_PREAMBLE,
    }
}

/// User prompt for one evidence brief.
pub fn evidence_prompt(brief: &EvidenceBrief) -> String {
    format!(
        "**Case:** {}\n**Search query:** {}\n\n## Reference text\n\n{}",
        brief.topic, brief.query, brief.source_text
    )
}

/// User prompt asking the clerk for an opinion on `report`.
pub fn clerk_prompt(report: &VerdictReport) -> String {
    let list = |entries: &[String]| {
        if entries.is_empty() {
            "(none)".to_string()
        } else {
            entries.join("\n")
        }
    };
    format!(
        "**Case:** {}\n\n## Supporting evidence\n{}\n\n## Opposing evidence\n{}\n\n\
         ## Deliberation notes\n{}",
        report.topic,
        list(&report.supporting),
        list(&report.opposing),
        report.deliberation
    )
}
