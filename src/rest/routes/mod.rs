pub mod health;
pub mod memos;
