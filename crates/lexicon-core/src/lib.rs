pub mod error;
pub mod graph;
pub mod grouping;
pub mod lexicon;
pub mod normalize;
pub mod quiz;
pub mod route;
pub mod session;
pub mod status;
pub mod suggestion;
pub mod validation;
pub mod vocabulary;

pub use error::{CoreError, CoreResult};
pub use lexicon::Lexicon;
