//! Utility helpers shared across the namespace

/// Wrap a zero-argument action so it runs at most once.
///
/// The first call runs `action` and returns `Some` of its result; every
/// later call is a silent no-op returning `None`. Used for one-time hook
/// installation anywhere at-most-once activation is required.
pub fn once<F, R>(mut action: F) -> impl FnMut() -> Option<R>
where
    F: FnMut() -> R,
{
    let mut fired = false;
    move || {
        if fired {
            return None;
        }
        fired = true;
        Some(action())
    }
}
