//! # Component System
//!
//! Components are pure data containers with no behavior. Each component kind
//! owns one bit of the [`ComponentMask`](super::ComponentMask), fixed at
//! compile time through [`Component::ID`].

/// Marker trait for ECS components.
///
/// Components must be:
/// - `Send + Sync`: the world can be shared behind a lock
/// - `'static`: stores are keyed by `TypeId`
///
/// # Example
///
/// ```rust
/// use tessera_core::Component;
///
/// #[derive(Clone, Copy, Debug, Default, PartialEq)]
/// struct Health {
///     current: u32,
///     max: u32,
/// }
///
/// impl Component for Health {
///     const ID: u8 = 0;
/// }
/// ```
pub trait Component: Send + Sync + 'static {
    /// Bit position of this component kind in entity masks (0-63).
    ///
    /// Two kinds declared on the same registry must not share a bit.
    const ID: u8;

    /// Human-readable name used in errors and logs.
    #[must_use]
    fn kind_name() -> &'static str {
        std::any::type_name::<Self>()
    }
}
