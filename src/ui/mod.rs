pub mod presenter;
pub mod prompts;

pub use presenter::TerminalPresenter;
