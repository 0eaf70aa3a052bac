// medchat: domain-gated chat front end for a fine-tuned medical model
//
// This is the library root. The content gate and the response orchestrator
// are the core; everything else is configuration and host surfaces.

pub mod config;
pub mod dataset;
pub mod error;
pub mod gate;
pub mod generation;
pub mod orchestrator;
pub mod output;
pub mod prompt;
pub mod status;

#[cfg(feature = "web")]
pub mod web;
