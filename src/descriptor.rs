//! Property-exposure descriptors
//!
//! Pure constructors mapping a member payload (stored value or getter) to a
//! descriptor with independent `enumerable`, `writable` and `configurable`
//! axes. Embedders use these to publish namespace members into a script
//! engine with the minimum privilege each member needs.

/// How a published member is accessed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access<T> {
    /// Member holds a stored value
    Value(T),
    /// Member is computed through a getter on each access
    Getter(fn() -> T),
}

/// Exposure specification for one published member
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Descriptor<T> {
    pub access: Access<T>,
    pub enumerable: bool,
    pub writable: bool,
    pub configurable: bool,
}

/// Enumerable, reassignable member
pub fn writable<T>(value: T) -> Descriptor<T> {
    Descriptor {
        access: Access::Value(value),
        enumerable: true,
        writable: true,
        configurable: true,
    }
}

/// Bare stored value, all exposure axes off
pub fn value<T>(value: T) -> Descriptor<T> {
    Descriptor {
        access: Access::Value(value),
        enumerable: false,
        writable: false,
        configurable: false,
    }
}

/// Reassignable member hidden from enumeration
pub fn non_enumerable<T>(value: T) -> Descriptor<T> {
    Descriptor {
        access: Access::Value(value),
        enumerable: false,
        writable: true,
        configurable: true,
    }
}

/// Enumerable member that cannot be reassigned
pub fn read_only<T>(value: T) -> Descriptor<T> {
    Descriptor {
        access: Access::Value(value),
        enumerable: true,
        writable: false,
        configurable: true,
    }
}

/// Enumerable member computed through a getter
pub fn getter_only<T>(getter: fn() -> T) -> Descriptor<T> {
    Descriptor {
        access: Access::Getter(getter),
        enumerable: true,
        writable: false,
        configurable: true,
    }
}
