/// longest accepted chat message or inquiry, in bytes
pub const MESSAGE_MAX_LEN: usize = 4096;
