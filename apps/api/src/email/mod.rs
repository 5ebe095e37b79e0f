// Steps 4 and 5 of the wizard: email generation, exports and outreach tracking.
// Sending is left to the user's mail client; "mark as sent" only records it.

pub mod export;
pub mod generator;
pub mod handlers;
pub mod models;
pub mod prompts;
pub mod tracker;
