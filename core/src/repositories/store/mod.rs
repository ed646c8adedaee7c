pub mod r#trait {
    pub use super::trait_::*;
}
#[path = "trait.rs"]
mod trait_;
pub mod mock;

pub use mock::MockColumnStore;
pub use r#trait::{Column, ColumnStore, RowKey};

#[cfg(test)]
mod tests;
