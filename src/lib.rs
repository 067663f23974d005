//! Scout -- ReAct Research Agent
//!
//! A CLI agent that loops between free-text reasoning and web search,
//! driving a Groq completion endpoint until it produces an `Answer:`.

pub mod agent;
pub mod config;
pub mod groq;
pub mod tavily;
pub mod types;
