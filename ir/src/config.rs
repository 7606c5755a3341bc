//! Diagnostics configuration of a [`Fusion`](crate::Fusion).

use bon::bon;

/// Environment variable holding a comma-separated list of dump options.
pub const DUMP_ENV: &str = "FUSER_DUMP";

/// Options controlling what a fusion reports while it is being built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FusionOptions {
    /// Report every split/merge/swizzle/reorder at `info` level instead of
    /// `debug`.
    pub dump_transforms: bool,
    /// Report every expression registration.
    pub dump_exprs: bool,
}

#[bon]
impl FusionOptions {
    /// Create options with builder pattern.
    #[builder]
    pub fn new(
        #[builder(default = false)] dump_transforms: bool,
        #[builder(default = false)] dump_exprs: bool,
    ) -> Self {
        Self { dump_transforms, dump_exprs }
    }

    /// Create options from environment variables.
    ///
    /// # Environment Variables
    ///
    /// * `FUSER_DUMP` - comma-separated list of `transforms`, `exprs`
    ///   (unknown entries are ignored)
    pub fn from_env() -> Self {
        std::env::var(DUMP_ENV).map(|list| Self::from_dump_list(&list)).unwrap_or_default()
    }

    /// Parse a dump list such as `"transforms,exprs"`.
    pub fn from_dump_list(list: &str) -> Self {
        list.split(',').map(str::trim).fold(Self::default(), |mut options, entry| {
            match entry {
                "transforms" => options.dump_transforms = true,
                "exprs" => options.dump_exprs = true,
                "" => {}
                other => tracing::warn!(option = other, "unknown {DUMP_ENV} entry"),
            }
            options
        })
    }
}
