//! Extension traits over span and token collections.
//!
//! | Trait | Extends | Purpose |
//! |-------|---------|---------|
//! | [`EntitySpanSliceExt`] | `[EntitySpan]` | Filter, sort, group spans |
//! | [`AnnotatedTokenSliceExt`] | `[AnnotatedToken]` | Filter tokens, language/entity/emoji/emoji-category counts |

mod ext;

pub use ext::{AnnotatedTokenSliceExt, EntitySpanSliceExt};

/// Compile-time checks on data-model sizes and thread safety.
#[doc(hidden)]
pub mod static_checks {
    const fn assert_send_sync<T: Send + Sync>() {}

    const _: () = assert_send_sync::<crate::EntitySpan>();
    const _: () = assert_send_sync::<crate::AnnotatedToken>();
    const _: () = assert_send_sync::<crate::LanguageCache>();

    // SpanSource is a plain tag
    const _: () = assert!(std::mem::size_of::<crate::SpanSource>() == 1);
}
