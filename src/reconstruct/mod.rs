/// Reconstruct module — original source + comment entities → converted source.
mod rewriter;

pub use rewriter::rewrite;
