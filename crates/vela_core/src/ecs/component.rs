//! # Component Trait
//!
//! Components are plain data attached to entities. Each component type
//! claims a unique ID in `0..64` which doubles as its bit position in
//! the entity mask.

/// Trait for component types stored in the world.
///
/// Components are `Copy + Default` so storage can be pre-allocated as a
/// dense slab and slots reset by overwrite. Unlike raw byte-pool
/// designs there is no `Pod` bound: flight components carry enums and
/// bools, and only the math primitives inside them need a stable
/// byte layout.
///
/// # Implementing
///
/// ```rust
/// use vela_core::Component;
///
/// #[derive(Clone, Copy, Default)]
/// struct Health {
///     current: f32,
///     max: f32,
/// }
///
/// impl Component for Health {
///     const ID: u8 = 7;
///     const NAME: &'static str = "health";
/// }
/// ```
pub trait Component: Copy + Default + Send + Sync + 'static {
    /// Unique component type ID, `0..64`. Doubles as the bit position
    /// in the entity component mask, so two registered component types
    /// must never share an ID.
    const ID: u8;

    /// Human-readable name for errors and logs.
    const NAME: &'static str;

    /// The entity-mask bit for this component type.
    #[must_use]
    fn mask() -> u64 {
        1 << Self::ID
    }
}
