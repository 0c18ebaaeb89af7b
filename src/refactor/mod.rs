/// Refactor module — comment text rewriting.
///
/// `normalizer` turns THtml comment bodies into Doxygen text; `macros`
/// writes the ROOT macros embedded in them out to disk.
pub mod macros;
pub mod normalizer;

pub use macros::MacroMaterializer;
pub use normalizer::Normalizer;
