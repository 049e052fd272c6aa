#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Report analysis
//!
//! A long-running poller discovers stored reports without analysis and
//! drives the summarizer collaborator to fill them in, at most once per
//! report under normal operation. The summarizer itself is an opaque
//! text-in/text-out collaborator behind the [`Summarizer`] trait.

mod poller;
mod summarizer;

pub use poller::{build_prompt, AnalysisPoller};
pub use summarizer::{ChatSummarizer, Summarizer, SummarizerConfig};
