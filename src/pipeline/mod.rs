//! Pipeline stages for PDF summarisation.
//!
//! Each submodule implements exactly one step of a request.
//!
//! ## Data Flow
//!
//! ```text
//! validate ──▶ input ──▶ extract ──▶ generate
//! (form)       (fetch)   (lopdf)     (LLM)
//! ```
//!
//! 1. [`validate`] — check the raw form; nothing expensive runs on bad input
//! 2. [`input`]    — resolve the upload or download the URL, bounded by a
//!    timeout and the upload size limit
//! 3. [`extract`]  — parse the PDF and assemble page texts; runs in
//!    `spawn_blocking` because parsing is CPU-bound
//! 4. [`generate`] — one model call with the instruction from
//!    [`crate::prompts`]; the only stage besides `input` with network I/O

pub mod extract;
pub mod generate;
pub mod input;
pub mod validate;
