//! Static page props generation for airkit sites.
//!
//! Loads a dataset snapshot, resolves the site's customer for every
//! supported locale and writes the props each statically generated page is
//! rendered from.

pub mod builder;
pub mod paths;
pub mod props;

pub use builder::{BuildConfig, BuildError, BuildResult, StaticBuilder};
pub use paths::{resolve_locale, static_paths, PathParams, StaticPath, StaticPaths};
pub use props::PageProps;
