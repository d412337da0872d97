// Funções utilitárias
pub mod error;

pub use error::*;
