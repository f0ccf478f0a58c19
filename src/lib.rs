pub mod bulletin;
pub mod chat;
pub mod core;
pub mod embedding;
pub mod knowledge;
pub mod rag;
pub mod server;
pub mod state;
pub mod vector_math;
pub mod weather;
