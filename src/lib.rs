//! Synthesizes a read/writeable FAT16 volume from per-file callbacks — no
//! backing filesystem, no persisted directory state. A host block device
//! (real or emulated) issues `host_read`/`host_write` at arbitrary byte
//! offsets; the core synthesizes the boot sector, FAT and root directory on
//! demand and routes data-region accesses to whichever file's callbacks own
//! that range. See [`emulator::Emulator`] for the entry point.

// Mark the crate as no_std if the feature is enabled (and only)
#![cfg_attr(all(feature = "no_std", not(test)), no_std)]

#[allow(unused_extern_crates)]
extern crate core; // makes rls actually look into the standard library (hack)

// Gotta do this since we're a staticlib:
// (it'd be nicer to be able to use `panic_halt` or its ilk, but alas)

#[cfg_attr(target_os = "none", panic_handler)]
#[cfg(target_os = "none")]
fn panic(_info: &core::panic::PanicInfo) -> ! {
    loop {}
}

macro_rules! using_std { ($($i:item)*) => ($(#[cfg(not(feature = "no_std"))]$i)*) }
pub(crate) use using_std;

pub mod callback;
pub mod emulator;
pub mod error;
pub mod layout;
pub mod registry;

pub(crate) mod fat;

pub mod mutex;

#[cfg(feature = "bindings")]
pub mod bindings;

pub use callback::{FileReader, FileWriter, NewFileObserver};
pub use emulator::Emulator;
pub use error::Error;
pub use layout::Geometry;
