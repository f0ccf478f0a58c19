pub mod bulletins;
pub mod chat;
pub mod fallback;
pub mod health;
pub mod predict;
