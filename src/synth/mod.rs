// Purpose: voice pool, render engine, and the queue between input and audio threads

#[cfg(feature = "rtrb")]
pub mod handle;
pub mod message;
pub mod poly;
pub mod pool;
pub mod voice;

#[cfg(feature = "rtrb")]
pub use handle::SynthHandle;
pub use message::{MessageReceiver, SynthMessage};
pub use poly::{PolySynth, PoolSnapshot, VoiceSnapshot};
pub use pool::{NoteOnOutcome, VoicePool};
pub use voice::{Voice, VoiceState};
