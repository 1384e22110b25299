//! Site metadata for mdoc.
//!
//! Every site directory carries a small YAML file describing the banner name,
//! the style bundle used to render its pages, and the links and menus shown in
//! the banner:
//!
//! ```yaml
//! name: Team Docs
//! style: base
//! links:
//!   - name: Owners
//!     url: https://example.com/owners
//! menus:
//!   - name: Guides
//!     items:
//!       - name: Setup
//!         link: guides/setup.mdoc
//! ```
//!
//! [`MetaData::from_yaml`] decodes and validates such a file.

mod data;
mod error;

pub use data::{Link, Menu, MenuItem, MetaData};
pub use error::MetaError;
