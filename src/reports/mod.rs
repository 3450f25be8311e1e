mod executive_summary;
mod narrative;
mod text_report;

pub use executive_summary::{ExecutiveSummarizer, LLM_API_KEY_ENV, build_prompt};
pub use narrative::{NarrativeInputs, summarize};
pub use text_report::generate as generate_text;
