//! C bindings: a single process-wide `Emulator` instance guarded by
//! [`crate::mutex::Mutex`], exposing registration, block I/O and reset as
//! `extern "C"` functions. Where the original C++ class was a stack object a
//! host constructed once (`original_source/EmuFATFS/main.cpp`), a C caller
//! has no constructors to lean on, so callers must invoke
//! [`emufatfs_init`] exactly once before any other binding — the crate's
//! single-threaded, non-reentrant contract (`spec.md` §5) already requires
//! callers to serialize access, so this adds no new requirement.

use crate::callback::{FileReader, FileWriter, NewFileObserver};
use crate::emulator::Emulator;
use crate::mutex::Mutex;

/// Fixed sizing for the FFI singleton. Native Rust callers that need a
/// different budget should use [`crate::emulator::Emulator`] directly.
const MAX_FILES: usize = 32;
const ARENA_BYTES: usize = 4096;

type RawReadFn = extern "C" fn(file_offset: u32, buf: *mut u8, len: u32, name: *const u8) -> i32;
type RawWriteFn = extern "C" fn(file_offset: i32, buf: *const u8, len: u32, name: *const u8) -> i32;
type RawNewFileFn = extern "C" fn(name: *const u8, ext: *const u8, file_size: u32, cluster: u32);

/// Scratch buffer a name is copied into before being handed to a raw C
/// callback as a NUL-terminated string.
fn with_cstr_scratch<R>(name: &str, f: impl FnOnce(*const u8) -> R) -> R {
    let mut scratch = [0u8; 256];
    let n = name.len().min(scratch.len() - 1);
    scratch[..n].copy_from_slice(&name.as_bytes()[..n]);
    scratch[n] = 0;
    f(scratch.as_ptr())
}

#[derive(Clone, Copy)]
struct RawReader(RawReadFn);

impl FileReader for RawReader {
    fn read(&mut self, file_offset: u32, buf: &mut [u8], name: &str) -> i32 {
        with_cstr_scratch(name, |name_ptr| (self.0)(file_offset, buf.as_mut_ptr(), buf.len() as u32, name_ptr))
    }
}

#[derive(Clone, Copy)]
struct RawWriter(RawWriteFn);

impl FileWriter for RawWriter {
    fn write(&mut self, file_offset: i32, buf: &[u8], name: &str) -> i32 {
        with_cstr_scratch(name, |name_ptr| (self.0)(file_offset, buf.as_ptr(), buf.len() as u32, name_ptr))
    }
}

#[derive(Clone, Copy)]
struct RawNewFileObserver(RawNewFileFn);

impl NewFileObserver for RawNewFileObserver {
    fn on_new_file(&mut self, name: &str, ext: &[u8; 3], file_size: u32, cluster: u32) {
        with_cstr_scratch(name, |name_ptr| (self.0)(name_ptr, ext.as_ptr(), file_size, cluster));
    }
}

struct GlobalState {
    emulator: Emulator<'static, MAX_FILES, ARENA_BYTES>,
    readers: [Option<RawReader>; MAX_FILES],
    writers: [Option<RawWriter>; MAX_FILES],
    observer: Option<RawNewFileObserver>,
}

impl GlobalState {
    fn new(bytes_per_sector: u32) -> Self {
        Self {
            emulator: Emulator::new(bytes_per_sector, None),
            readers: [None; MAX_FILES],
            writers: [None; MAX_FILES],
            observer: None,
        }
    }

    fn reset(&mut self) {
        self.emulator.reset();
        self.readers = [None; MAX_FILES];
        self.writers = [None; MAX_FILES];
        self.observer = None;
    }
}

// Constructed once via `emufatfs_init`; every other binding assumes it is
// already populated and is a caller error (not a memory-safety issue) to
// invoke otherwise, same as calling any method on a not-yet-constructed
// C++ object would be.
static mut GLOBAL: Option<Mutex<GlobalState>> = None;

fn with_global<R>(f: impl FnOnce(&mut GlobalState) -> R) -> Option<R> {
    // SAFETY: `GLOBAL` is only ever written once, by `emufatfs_init`, before
    // any other binding runs; every binding here only reads the `Option`
    // and then defers to the `Mutex` for exclusion over the contents.
    let global = unsafe { GLOBAL.as_ref() }?;
    Some(global.cs(f))
}

/// Must be called exactly once, before any other `emufatfs_*` function.
#[no_mangle]
pub extern "C" fn emufatfs_init(bytes_per_sector: u32) {
    // SAFETY: see `GLOBAL`'s doc comment; single-threaded-at-init-time,
    // matching the crate's overall non-reentrant contract.
    unsafe {
        GLOBAL = Some(Mutex::new(GlobalState::new(bytes_per_sector)));
    }
}

#[no_mangle]
pub extern "C" fn emufatfs_reset() {
    with_global(|g| g.reset());
}

/// Returns 0 on success, a negative [`crate::error::Error`]-derived code on
/// failure. `read_cb` must not be null (`MissingCallback`); `write_cb` may
/// be null for a read-only registration.
#[no_mangle]
pub extern "C" fn emufatfs_add_file(
    name: *const u8,
    name_len: u32,
    ext: *const u8,
    file_size: u32,
    read_cb: Option<RawReadFn>,
    write_cb: Option<RawWriteFn>,
) -> i32 {
    let Some(read_cb) = read_cb else {
        return error_code(crate::error::Error::MissingCallback);
    };
    let name = unsafe { core::slice::from_raw_parts(name, name_len as usize) };
    let Ok(name) = core::str::from_utf8(name) else {
        return error_code(crate::error::Error::NoRoom);
    };
    let ext = if ext.is_null() {
        None
    } else {
        let bytes = unsafe { core::slice::from_raw_parts(ext, 3) };
        core::str::from_utf8(bytes).ok()
    };

    with_global(|g| {
        let slot = g.emulator.used_files;
        if slot >= MAX_FILES {
            return error_code(crate::error::Error::NoRoom);
        }
        g.readers[slot] = Some(RawReader(read_cb));
        g.writers[slot] = write_cb.map(RawWriter);

        // SAFETY: `readers`/`writers` live inside the same `'static`
        // `GlobalState` as `emulator`; the state is never moved or
        // deallocated once constructed by `emufatfs_init`.
        let reader_ref: &'static mut dyn FileReader = unsafe { &mut *(g.readers[slot].as_mut().unwrap() as *mut RawReader) };
        let writer_ref: Option<&'static mut dyn FileWriter> = g.writers[slot]
            .as_mut()
            .map(|w| unsafe { &mut *(w as *mut RawWriter) } as &'static mut dyn FileWriter);

        match g.emulator.add_file(name, ext, file_size, reader_ref, writer_ref) {
            Ok(()) => 0,
            Err(e) => error_code(e),
        }
    })
    .unwrap_or_else(|| error_code(crate::error::Error::Closed))
}

#[no_mangle]
pub extern "C" fn emufatfs_register_new_file_callback(cb: RawNewFileFn) {
    with_global(|g| {
        g.observer = Some(RawNewFileObserver(cb));
        let observer_ref: &'static mut dyn NewFileObserver =
            unsafe { &mut *(g.observer.as_mut().unwrap() as *mut RawNewFileObserver) };
        g.emulator.register_new_file_callback(observer_ref);
    });
}

#[no_mangle]
pub extern "C" fn emufatfs_host_read(offset: u32, buf: *mut u8, len: u32) -> i32 {
    let buf = unsafe { core::slice::from_raw_parts_mut(buf, len as usize) };
    with_global(|g| g.emulator.host_read(offset, buf)).unwrap_or(0)
}

#[no_mangle]
pub extern "C" fn emufatfs_host_write(offset: u32, buf: *const u8, len: u32) -> i32 {
    let buf = unsafe { core::slice::from_raw_parts(buf, len as usize) };
    with_global(|g| g.emulator.host_write(offset, buf)).unwrap_or(0)
}

fn error_code(e: crate::error::Error) -> i32 {
    use crate::error::Error::*;
    -(match e {
        Alignment => 1,
        NoRoom => 2,
        OutOfClusters => 3,
        MissingCallback => 4,
        Closed => 5,
    })
}
