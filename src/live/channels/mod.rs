//! Output channel implementations

pub mod braille;
pub mod speech;

pub use braille::BrailleChannel;
pub use speech::SpeechChannel;
