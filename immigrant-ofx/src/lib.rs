//! immigrant-ofx: render a parsed statement as an OFX 2 (XML) document.

pub mod emitter;
pub mod xml;

pub use emitter::OfxEmitter;
