//! File-entry table and filename arena (`spec.md` §3, §4.6).

use crate::callback::{FileReader, FileWriter, NewFileObserver};
use crate::emulator::Emulator;
use crate::error::Error;
use crate::layout::{CLUSTER_LIMIT, FIRST_DATA_CLUSTER};

/// One registered file. Borrows its callbacks for the registry's lifetime
/// rather than owning them, matching the teacher's preference for borrowing
/// over boxing where a `'static` bound isn't otherwise required.
pub(crate) struct FileEntry<'cb> {
    pub(crate) read_cb: &'cb mut dyn FileReader,
    pub(crate) write_cb: Option<&'cb mut dyn FileWriter>,
    pub(crate) name_start: usize,
    pub(crate) name_len: usize,
    pub(crate) file_size: u32,
    pub(crate) start_cluster: u16,
    pub(crate) is_dynamic: bool,
}

impl<'cb> FileEntry<'cb> {
    pub(crate) fn cluster_count(&self, bytes_per_cluster: u32) -> u32 {
        cluster_count_for(self.file_size, bytes_per_cluster)
    }
}

/// `max(1, ceil(file_size / bytes_per_cluster))` — every file, even an empty
/// one, reserves at least one cluster's worth of address space.
pub(crate) fn cluster_count_for(file_size: u32, bytes_per_cluster: u32) -> u32 {
    let n = (file_size + bytes_per_cluster - 1) / bytes_per_cluster;
    if n == 0 {
        1
    } else {
        n
    }
}

const RESERVED_CHARS: [u8; 9] = [b'*', b'?', b'<', b'>', b'|', b'"', b'\\', b'/', b':'];

fn sanitize_byte(b: u8) -> u8 {
    if RESERVED_CHARS.contains(&b) {
        b'_'
    } else {
        b
    }
}

/// Fixed-capacity byte arena storing filenames as
/// `[base][0x00][ext 3 bytes][0x00]`, indexed by `(start, len)` pairs held
/// in the owning [`FileEntry`] rather than raw pointers (Design Note 4).
pub(crate) struct FilenameArena<const N: usize> {
    bytes: [u8; N],
    used: usize,
}

impl<const N: usize> FilenameArena<N> {
    pub(crate) const fn new() -> Self {
        Self {
            bytes: [0; N],
            used: 0,
        }
    }

    pub(crate) fn reset(&mut self) {
        self.used = 0;
    }

    /// Appends `name` (sanitized) and `ext` (space-padded to 3 bytes),
    /// returning `(start_index, len_no_suffix)`.
    pub(crate) fn push(&mut self, name: &str, ext: Option<&str>) -> Result<(usize, usize), Error> {
        let name_len = name.len();
        let needed = name_len + 1 + 3 + 1;
        if self.used + needed > N {
            return Err(Error::NoRoom);
        }

        let start = self.used;
        for (i, b) in name.bytes().enumerate() {
            self.bytes[start + i] = sanitize_byte(b);
        }
        self.bytes[start + name_len] = 0;

        let mut ext_bytes = [b' '; 3];
        if let Some(e) = ext {
            for (i, b) in e.bytes().take(3).enumerate() {
                ext_bytes[i] = b;
            }
        }
        self.bytes[start + name_len + 1..start + name_len + 4].copy_from_slice(&ext_bytes);
        self.bytes[start + name_len + 4] = 0;

        self.used += needed;
        Ok((start, name_len))
    }

    pub(crate) fn name(&self, start: usize, len: usize) -> &str {
        core::str::from_utf8(&self.bytes[start..start + len]).unwrap_or("")
    }

    pub(crate) fn ext(&self, start: usize, len: usize) -> [u8; 3] {
        let e = start + len + 1;
        [self.bytes[e], self.bytes[e + 1], self.bytes[e + 2]]
    }
}

impl<'cb, const MAX_FILES: usize, const ARENA_BYTES: usize> Emulator<'cb, MAX_FILES, ARENA_BYTES> {
    /// Registers a static file at the next free cluster (`spec.md` §4.6,
    /// steps 1-4).
    pub fn add_file(
        &mut self,
        name: &str,
        ext: Option<&str>,
        file_size: u32,
        read_cb: &'cb mut dyn FileReader,
        write_cb: Option<&'cb mut dyn FileWriter>,
    ) -> Result<(), Error> {
        self.add_file_impl(name, ext, file_size, None, false, read_cb, write_cb)
    }

    /// Registers a file whose cluster/size the root directory may later
    /// mutate out from under us (`spec.md` §4.6 step 5). Passing a nonzero
    /// `start_cluster` pins the placement directly and closes the registry
    /// to further static registrations; passing zero defers placement to the
    /// first intercepted write, exactly like `add_file`.
    pub fn add_file_dynamic(
        &mut self,
        name: &str,
        ext: Option<&str>,
        file_size: u32,
        start_cluster: u16,
        read_cb: &'cb mut dyn FileReader,
        write_cb: Option<&'cb mut dyn FileWriter>,
    ) -> Result<(), Error> {
        let pinned = if start_cluster == 0 {
            None
        } else {
            Some(start_cluster)
        };
        self.add_file_impl(name, ext, file_size, pinned, true, read_cb, write_cb)
    }

    fn add_file_impl(
        &mut self,
        name: &str,
        ext: Option<&str>,
        file_size: u32,
        pinned_cluster: Option<u16>,
        is_dynamic: bool,
        read_cb: &'cb mut dyn FileReader,
        write_cb: Option<&'cb mut dyn FileWriter>,
    ) -> Result<(), Error> {
        if self.used_files >= MAX_FILES {
            return Err(Error::NoRoom);
        }
        if pinned_cluster.is_none() && self.next_free_cluster == 0 {
            return Err(Error::Closed);
        }

        let bytes_per_cluster = self.geometry.bytes_per_cluster();
        let needed_clusters = cluster_count_for(file_size, bytes_per_cluster);

        if pinned_cluster.is_none() {
            let end = self.next_free_cluster as u32 + needed_clusters;
            if end >= CLUSTER_LIMIT {
                return Err(Error::OutOfClusters);
            }
        }

        let (start, len) = self.arena.push(name, ext)?;

        let start_cluster = match pinned_cluster {
            Some(c) => c,
            None => {
                if file_size > 0 {
                    self.next_free_cluster
                } else {
                    0
                }
            }
        };

        self.files[self.used_files] = Some(FileEntry {
            read_cb,
            write_cb,
            name_start: start,
            name_len: len,
            file_size,
            start_cluster,
            is_dynamic,
        });
        self.used_files += 1;

        match pinned_cluster {
            Some(_) => self.next_free_cluster = 0,
            None => self.next_free_cluster += needed_clusters as u16,
        }

        Ok(())
    }

    /// Drops every registration and rewinds the cluster allocator, as if the
    /// `Emulator` had just been constructed.
    pub fn reset(&mut self) {
        self.used_files = 0;
        self.arena.reset();
        self.next_free_cluster = FIRST_DATA_CLUSTER;
        for f in self.files.iter_mut() {
            *f = None;
        }
    }

    pub fn register_new_file_callback(&mut self, cb: &'cb mut dyn NewFileObserver) {
        self.new_file_cb = Some(cb);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arena_round_trips_name_and_extension() {
        let mut arena: FilenameArena<64> = FilenameArena::new();
        let (start, len) = arena.push("HELLO", Some("TXT")).unwrap();
        assert_eq!(arena.name(start, len), "HELLO");
        assert_eq!(arena.ext(start, len), *b"TXT");
    }

    #[test]
    fn arena_pads_missing_extension_with_spaces() {
        let mut arena: FilenameArena<64> = FilenameArena::new();
        let (start, len) = arena.push("README", None).unwrap();
        assert_eq!(arena.ext(start, len), *b"   ");
    }

    #[test]
    fn arena_sanitizes_reserved_characters() {
        let mut arena: FilenameArena<64> = FilenameArena::new();
        let (start, len) = arena.push("A*B?C", None).unwrap();
        assert_eq!(arena.name(start, len), "A_B_C");
    }

    #[test]
    fn arena_reports_no_room() {
        let mut arena: FilenameArena<4> = FilenameArena::new();
        assert!(matches!(arena.push("TOOLONG", None), Err(Error::NoRoom)));
    }

    #[test]
    fn cluster_count_reserves_at_least_one_cluster() {
        assert_eq!(cluster_count_for(0, 1024), 1);
        assert_eq!(cluster_count_for(1, 1024), 1);
        assert_eq!(cluster_count_for(1024, 1024), 1);
        assert_eq!(cluster_count_for(1025, 1024), 2);
    }
}
