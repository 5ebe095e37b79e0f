// Step 1–2 of the wizard: social links, PDF text, and LLM extraction of CV data.

pub mod extractor;
pub mod handlers;
pub mod links;
pub mod models;
pub mod pdf;
pub mod prompts;
pub mod years;
