// Step 3 of the wizard: job postings from pasted text or a scraped URL.
// The scraper never calls the LLM; parsing goes through llm_client.

pub mod handlers;
pub mod models;
pub mod parser;
pub mod prompts;
pub mod scraper;
