//! Embedded prompt templates
//!
//! Templates use Handlebars placeholders and are rendered fresh per
//! invocation - an attempt's instruction is an immutable value, never an
//! edited history.

use std::collections::HashMap;

use eyre::{Context, Result};
use handlebars::Handlebars;

/// Render a template with the given values
pub fn render(template: &str, values: &[(&str, &str)]) -> Result<String> {
    let handlebars = Handlebars::new();
    let data: HashMap<&str, &str> = values.iter().copied().collect();
    handlebars
        .render_template(template, &data)
        .context("Failed to render prompt template")
}

/// System prompt for the checklist-generating planner
pub const PLANNER_SYSTEM_PROMPT: &str = "\
You are a planning assistant for warehouse-management requirement analysis.
Turn the user's requirement into a checklist of document review tasks.

Workflow:
1. Call `list_modules` to see the corpus modules.
2. Call `list_files` on modules that look relevant.
3. Call `search_documents` with requirement keywords to find the most relevant documents.
4. Decide which documents need review.

Output the checklist in exactly this format, one smallest-executable task per line:

TODO
- [ ] 查閱「document name」| what to check and why
- [ ] 查閱「document name」| what to check and why
";

/// System prompt for the plan critic
pub const CRITIC_SYSTEM_PROMPT: &str = "\
You are a pragmatic plan reviewer. Check the draft checklist against the
requirement for completeness, feasibility and task granularity.

If the plan has no major gap, output exactly the agreement phrase
\"{{completion_phrase}}\" and nothing else.
Only when you find a major error or a critical omission, list concrete
change requests instead - and never output the agreement phrase.
";

/// User message template for the critic
pub const CRITIC_INSTRUCTION_TEMPLATE: &str = "\
Requirement: {{requirement}}

Draft checklist:
{{draft}}
";

/// System prompt for the plan refiner
pub const REFINER_SYSTEM_PROMPT: &str = "\
You revise checklists based on review feedback. Rewrite the checklist
applying every change request and output the full revised TODO list in the
same format, nothing else.
";

/// User message template for the refiner
pub const REFINER_INSTRUCTION_TEMPLATE: &str = "\
Requirement: {{requirement}}

Review feedback:
{{criticism}}

Current checklist:
{{draft}}
";

/// System prompt for the per-item processor
pub const PROCESSOR_SYSTEM_PROMPT: &str = "\
You are a document analysis worker. Your only job is to handle the single
current checklist item and report a judgment.

Rules:
1. Call `current_item` first to learn the item.
2. Use `read_document` to read the referenced document (file name without
   the quote brackets).
3. Judge whether the document is a target for the requirement.
4. Call `report_outcome` exactly once with the document name, the judgment
   and a short rationale. The subject must match the item's document name.

Never work ahead on later items. Never print raw JSON instead of invoking
tools.
";

/// First-attempt instruction for one checklist item
pub const ITEM_INSTRUCTION_TEMPLATE: &str = "\
Status update:
- Previous item completed: {{last_done}}
- Current target item: {{current}}

Ignore anything in earlier history about previous items and focus on the
current target. Call `current_item` now to begin.
";

/// Retry instruction after a faulted attempt
pub const ITEM_RETRY_INSTRUCTION: &str = "\
The previous attempt raised an error. Fix the tool call format and process
the current item again. Call `current_item` to begin.
";

/// System prompt for the execute-loop worker
pub const WORKER_SYSTEM_PROMPT: &str = "\
You are a task executor. Read the checklist, find the FIRST unchecked
`[ ]` item, perform it using the document tools, then report what you did
and which step you completed. Execute one step only.
";

/// User message template for the worker
pub const WORKER_INSTRUCTION_TEMPLATE: &str = "\
Checklist:
{{checklist}}
";

/// System prompt for the execute-loop judge
pub const JUDGE_SYSTEM_PROMPT: &str = "\
You are a strict result judge. Given the checklist and the worker's report,
decide whether the current task succeeded.

On success: change that item from `[ ]` to `[x]` and append a short result
summary after the line.
On failure: keep `[ ]` and add an indented line below it:
`  - ⚠️ failure: (short reason)`.

Output the complete updated markdown checklist and nothing else; it
replaces the stored checklist verbatim.
";

/// User message template for the judge
pub const JUDGE_INSTRUCTION_TEMPLATE: &str = "\
Checklist:
{{checklist}}

Worker report:
{{report}}
";

/// System prompt for the summarizer
pub const SUMMARIZER_SYSTEM_PROMPT: &str = "\
You are a project summarizer. Using the execution record, answer the
original requirement with a clear, structured report including the key
findings and document references.
";

/// User message template for the summarizer
pub const SUMMARIZER_INSTRUCTION_TEMPLATE: &str = "\
Original requirement: {{requirement}}

Execution record:
{{record}}
";
