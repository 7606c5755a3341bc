//! Non-owning handles into a [`Fusion`](crate::Fusion) container.
//!
//! The container owns every node; the rest of the IR refers to nodes through
//! these `u32` indices. A handle is only meaningful for the container that
//! issued it.

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident, $prefix:literal) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Debug, derive_more::Display)]
        #[debug("{}{}", $prefix, _0)]
        #[display("{}{}", $prefix, _0)]
        pub struct $name(u32);

        impl $name {
            pub(crate) fn new(idx: usize) -> Self {
                debug_assert!(idx <= u32::MAX as usize, "handle space exhausted");
                Self(idx as u32)
            }

            /// Position of the node in its container.
            pub fn index(self) -> usize {
                self.0 as usize
            }
        }
    };
}

define_id!(
    /// Handle to a value node.
    ValId,
    "v"
);

define_id!(
    /// Handle to an expression node.
    ExprId,
    "e"
);
