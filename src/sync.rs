//! The lock behind [`crate::LanguageCache`] and the mock call logs.
//!
//! Each critical section is one `HashMap` lookup or insert (or one `Vec`
//! push in [`crate::MockLabeler`]); no classifier or labeler ever runs while
//! a lock is held. With the `fast-lock` feature the lock is
//! `parking_lot::Mutex`, otherwise `std::sync::Mutex`.

#[cfg(feature = "fast-lock")]
pub use parking_lot::{Mutex, MutexGuard};

#[cfg(not(feature = "fast-lock"))]
pub use std::sync::{Mutex, MutexGuard};

/// Acquire `mutex`.
///
/// A poisoned `std` lock still yields its data.
///
/// ```rust
/// use polyspan::sync::{lock, Mutex};
/// use std::collections::HashMap;
///
/// let memo = Mutex::new(HashMap::new());
/// lock(&memo).insert("bonjour tout le monde", Some("fr"));
/// assert_eq!(lock(&memo).get("bonjour tout le monde"), Some(&Some("fr")));
/// ```
pub fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    #[cfg(feature = "fast-lock")]
    {
        mutex.lock()
    }
    #[cfg(not(feature = "fast-lock"))]
    {
        mutex.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}
