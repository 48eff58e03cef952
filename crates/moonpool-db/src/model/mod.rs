pub mod operation;
pub mod share_link;
pub mod sync;
pub mod user;
