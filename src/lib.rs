//! # Sigolyze
//!
//! A signature-based content classifier. Signatures are named bundles of
//! literal and regex patterns with tags and metadata; the engine reports
//! which signatures match a given byte or text input.
//!
//! Each signature compiles its literal patterns into a single Aho-Corasick
//! [`Automaton`] and its regex patterns into a [`RegexBank`]. A signature
//! matches when any literal occurs in the input or any regex matches it.
//! The [`Registry`] keeps a tag index so matching can be scoped to the
//! signatures carrying given tags.
//!
//! ## Quick Start
//!
//! ```rust
//! use sigolyze::SignatureEngine;
//!
//! let mut engine = SignatureEngine::new();
//! engine.load_str(r#"{
//!     "name": "Example Signature",
//!     "patterns": [
//!         {"name": "Pattern 1", "value": "Value", "is_regex": false},
//!         {"name": "Pattern 2", "value": "regex[0-9]", "is_regex": true}
//!     ],
//!     "tags": ["tag1", "tag2"],
//!     "meta": [{"name": "Meta1", "info": ["detail1", "detail2"]}]
//! }"#)?;
//!
//! let matched = engine.match_all("found regex7 here");
//! assert_eq!(matched[0].name(), "Example Signature");
//! assert_eq!(matched[0].meta()[0].info, ["detail1", "detail2"]);
//! # Ok::<(), sigolyze::SigolyzeError>(())
//! ```
//!
//! ### Loading From Files
//!
//! ```rust,no_run
//! use sigolyze::{EngineConfig, SignatureEngine};
//!
//! let mut engine = SignatureEngine::with_config(EngineConfig::high_performance());
//! engine.load_from_dir("signatures/")?;
//! engine.load_from_path("extra/web.yaml")?;
//!
//! for signature in engine.match_by_tags(b"GET /admin HTTP/1.1", &["web"]) {
//!     println!("{} {:?}", signature.name(), signature.tags());
//! }
//! # Ok::<(), sigolyze::SigolyzeError>(())
//! ```

pub mod automaton;
pub mod config;
pub mod engine;
pub mod error;
pub mod loader;
pub mod registry;
pub mod signature;

// Primary engine interface
pub use engine::SignatureEngine;

// Registry and configuration
pub use config::{EngineConfig, ParallelConfig, RegexConfig};
pub use loader::SourceFormat;
pub use registry::{Registry, SignatureId};

// Core types and errors
pub use error::{Result, SigolyzeError};
pub use signature::{
    CompiledRegex, MetaInfo, Pattern, PatternSet, RegexBank, Signature, SignatureDefinition,
};

// Matching automaton
pub use automaton::{Automaton, AutomatonBuilder, AutomatonStats, PatternId, StateId};
