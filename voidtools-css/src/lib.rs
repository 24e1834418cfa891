//! # Void Tools CSS → Tailwind converter
//!
//! Turns pasted CSS (often straight out of a design tool) into a Tailwind
//! class list, and reports which source declarations the class list does not
//! cover.
//!
//! ## Pipeline
//! 1. **Preprocess** — drop default declarations, add `px` to bare numbers,
//!    wrap bare declarations in a rule
//! 2. **Convert** — any [`Converter`]; [`RuleConverter`] is built in
//! 3. **Clean** — strip the wrapper, leftover raw declarations and default-value classes
//! 4. **Analyze** — list source lines whose property no output class covers
//!
//! ## Example — one-shot
//! ```ignore
//! let result = voidtools_css::convert_css("display: flex;\ncursor: grab;").await;
//! assert_eq!(result.output, "flex cursor-grab");
//! ```
//!
//! ## Example — live session
//! ```ignore
//! use voidtools_css::{ConversionSession, PipelineConfig, RuleConverter};
//!
//! let session = ConversionSession::new(RuleConverter::new(), PipelineConfig::default());
//! session.set_input("padding: 16;");
//! let state = session.wait_settled().await;
//! ```

pub mod config;
pub mod error;
pub mod pipeline;
pub mod session;
pub mod tailwind;

pub use config::PipelineConfig;
pub use error::{ConvertError, ConvertResult};
pub use pipeline::{run_pipeline, ConversionResult, Status};
pub use session::{ConversionSession, SessionState};
pub use tailwind::{Converter, FnConverter, RuleConverter};

/// Converts `css` with the built-in [`RuleConverter`] and default settings.
pub async fn convert_css(css: &str) -> ConversionResult {
    run_pipeline(&RuleConverter::new(), css, &PipelineConfig::default()).await
}
