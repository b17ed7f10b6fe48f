pub mod audio;
pub mod chat;
