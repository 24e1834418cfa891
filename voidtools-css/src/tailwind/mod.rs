//! # CSS → Tailwind stages
//!
//! The synchronous stages around the converter call:
//!
//! - **preprocess** — design-tool paste cleanup, bare declarations get a wrapper rule
//! - **converter** — the [`Converter`] seam and the built-in [`RuleConverter`]
//! - **cleaner** — converter output flattened into a plain class list
//! - **coverage** — which source declarations no class in the output addresses
//!
//! ## Usage
//! ```ignore
//! let css = voidtools_css::tailwind::fix_figma_css("display: flex;\ncursor: grab;");
//! let raw = RuleConverter::new().convert_blocking(&css)?;
//! let classes = voidtools_css::tailwind::clean_up_output(&raw);
//! let warnings = voidtools_css::tailwind::check_unsupported(&css, &classes);
//! ```

pub mod cleaner;
pub mod converter;
pub mod coverage;
pub mod preprocess;

pub use cleaner::clean_up_output;
pub use converter::{Converter, FnConverter, RuleConverter};
pub use coverage::{check_unsupported, classify, covered_properties, Declaration};
pub use preprocess::{fix_figma_css, fix_figma_css_with};
