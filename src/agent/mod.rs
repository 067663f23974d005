//! Agent Module
//!
//! The core ReAct conversation loop, the embedded system prompt, and the
//! action-directive parser used by the optional dispatch mode.

pub mod agent_loop;
pub mod dispatch;
pub mod system_prompt;
