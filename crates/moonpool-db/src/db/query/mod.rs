pub mod operation;
pub mod share_link;
pub mod user;

/// Outcome of an owner-scoped read or write.
///
/// `Forbidden` means the row exists but belongs to someone else; callers map
/// it to a 403 instead of leaking the distinction through a bare miss.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteOutcome<T> {
    Done(T),
    NotFound,
    Forbidden,
}
