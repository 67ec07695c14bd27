//! Activity Sources
//!
//! Each source turns one stream of raw host activity into protocol
//! commands for the bridge:
//!
//! - **pointer**: jitter-filtered, throttled `M` on movement
//! - **keys**: `K`/`B`/`S` per key press
//! - **audio**: one `A,<level>` per captured block
//! - **keepalive**: periodic `M` so the strip never idles out
//!
//! Native callbacks (the Win32 hook thread, the cpal driver thread) never
//! touch the serial path directly; they push into bounded channels and a
//! consumer task per source applies the gating and filtering before
//! submitting to the bridge. A slow or absent serial link therefore never
//! backs up into the OS event hooks.

pub mod audio;
pub mod input;
pub mod keepalive;
pub mod keys;
pub mod pointer;

pub use audio::{run_audio_source, AudioCapture, AudioGate, AUDIO_BLOCK_SIZE, AUDIO_SAMPLE_RATE};
pub use input::{spawn_router, CaptureError, InputSource, KeyPress, RawInputEvent};
pub use keepalive::{run_keep_alive, DEVICE_IDLE_TIMEOUT, KEEP_ALIVE_PERIOD};
pub use keys::{classify, run_key_source};
pub use pointer::{run_pointer_source, PointerFilter, JITTER_THRESHOLD_PX, MOVE_THROTTLE};
