pub mod controller;
pub mod insight_service;
pub mod ledger_service;
pub mod prompt_templates;
pub mod reputation_service;
pub mod view_state;
