//! Conversation agent: bounded memory and the interactive session loop

mod memory;
mod session;

pub use memory::{Exchange, Memory};
pub use session::{
    EXIT_KEYWORDS, FAREWELL, GREETING, Session, SessionSettings, is_exit_keyword,
};
