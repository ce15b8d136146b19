//! Merge and freeze for configuration entities.
//!
//! Every entity exists in two forms. The mutable form (a builder with public
//! fields) is filled in from config files and merged with its defaults. The
//! frozen form is produced by [`Configurable::freeze`], which consumes the
//! builder; it has private fields and no setters, so a frozen entity can be
//! shared across threads without locks.
//!
//! ```compile_fail
//! use courier_config::Configurable;
//! use courier_config::uploader::{SshKind, SshUploaderBuilder};
//!
//! let mut frozen = SshUploaderBuilder::new(SshKind::Sftp, "mirror").freeze();
//! frozen.host = Some("other.example.com".to_owned());
//! ```

use std::collections::BTreeMap;

use crate::context::ReleaseContext;
use crate::error::ConfigResult;
use crate::props::PropertyBag;

/// Marker emitted by `as_map` for a secret that has a value.
pub const HIDE: &str = "************";

/// Marker emitted by `as_map` for a secret with no value.
pub const UNSET: &str = "**unset**";

/// Mask a resolved secret for display.
#[must_use]
pub fn mask(resolved: &str) -> &'static str {
    if resolved.trim().is_empty() {
        UNSET
    } else {
        HIDE
    }
}

/// The mutable form of a configuration entity.
pub trait Configurable: Sized {
    /// The immutable form produced by [`freeze`](Self::freeze).
    type Frozen;

    /// Fill every unset field of `self` from `other`.
    ///
    /// Fields already set on `self` are never overwritten. Nested entities
    /// merge recursively.
    fn merge(&mut self, other: &Self);

    /// Finalize into the immutable form, applying type defaults.
    fn freeze(self) -> Self::Frozen;

    /// Builder-style [`merge`](Self::merge).
    #[must_use]
    fn merged(mut self, other: &Self) -> Self {
        self.merge(other);
        self
    }
}

/// Masked introspection of a frozen entity.
pub trait AsMap {
    /// Produce a property bag describing the effective configuration.
    ///
    /// Secret values are replaced by [`HIDE`] or [`UNSET`]. With `full` unset
    /// a disabled entity yields an empty bag.
    ///
    /// # Errors
    ///
    /// Returns an error if a displayed field fails to resolve.
    fn as_map(&self, full: bool, ctx: &ReleaseContext) -> ConfigResult<PropertyBag>;
}

/// Fill-down for a single field.
pub trait FillDown {
    /// Replace `self` with `other` only when `self` is unset.
    fn fill_down(&mut self, other: &Self);
}

impl FillDown for Option<String> {
    fn fill_down(&mut self, other: &Self) {
        let unset = self.as_deref().is_none_or(|s| s.trim().is_empty());
        if unset && other.is_some() {
            self.clone_from(other);
        }
    }
}

macro_rules! fill_down_copy {
    ($($ty:ty),* $(,)?) => {
        $(
            impl FillDown for Option<$ty> {
                fn fill_down(&mut self, other: &Self) {
                    if self.is_none() {
                        *self = *other;
                    }
                }
            }
        )*
    };
}

fill_down_copy!(bool, u16, u32, crate::uploader::Active);

impl FillDown for String {
    fn fill_down(&mut self, other: &Self) {
        if self.trim().is_empty() {
            self.clone_from(other);
        }
    }
}

/// Maps fill down per key: keys already present are kept.
impl FillDown for BTreeMap<String, String> {
    fn fill_down(&mut self, other: &Self) {
        for (key, value) in other {
            self.entry(key.clone()).or_insert_with(|| value.clone());
        }
    }
}
