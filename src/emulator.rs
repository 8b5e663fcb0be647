//! Ties the layout, boot-sector/FAT/directory synthesizers, the directory
//! write interceptor and the data-region router together into the single
//! `host_read`/`host_write` surface a block-device host actually calls.

use crate::callback::NewFileObserver;
use crate::fat::{boot_sector, data, dir, intercept, table};
use crate::layout::{Geometry, FIRST_DATA_CLUSTER};
use crate::registry::FileEntry;

const DEFAULT_VOLUME_LABEL: &[u8; 11] = b"EMUFATFS16 ";

/// The synthesis engine itself. `MAX_FILES` bounds the file-entry table;
/// `ARENA_BYTES` bounds the filename arena. Both are fixed at construction,
/// matching the original C++ class's non-type template parameters
/// (`EmuFATFS<TMPL_max_Files, TMPL_filenames_storage_size>`).
pub struct Emulator<'cb, const MAX_FILES: usize, const ARENA_BYTES: usize> {
    pub(crate) files: [Option<FileEntry<'cb>>; MAX_FILES],
    pub(crate) used_files: usize,
    pub(crate) arena: crate::registry::FilenameArena<ARENA_BYTES>,
    pub(crate) volume_label: [u8; 11],
    /// Next cluster a static `add_file` will hand out. Zero means "closed":
    /// a fixed-cluster `add_file_dynamic` pinned an entry directly and no
    /// further static registrations are accepted.
    pub(crate) next_free_cluster: u16,
    pub(crate) geometry: Geometry,
    pub(crate) new_file_cb: Option<&'cb mut dyn NewFileObserver>,
}

impl<'cb, const MAX_FILES: usize, const ARENA_BYTES: usize> Emulator<'cb, MAX_FILES, ARENA_BYTES> {
    /// Builds an empty registry over a volume with the given sector size.
    /// `volume_label` is upper-cased and space-padded to 11 bytes; `None`
    /// uses the default `EMUFATFS16` label.
    pub fn new(bytes_per_sector: u32, volume_label: Option<&str>) -> Self {
        let mut label = *DEFAULT_VOLUME_LABEL;
        if let Some(l) = volume_label {
            label = [b' '; 11];
            for (i, b) in l.bytes().take(11).enumerate() {
                label[i] = b.to_ascii_uppercase();
            }
        }

        Self {
            files: core::array::from_fn(|_| None),
            used_files: 0,
            arena: crate::registry::FilenameArena::new(),
            volume_label: label,
            next_free_cluster: FIRST_DATA_CLUSTER,
            geometry: Geometry::new(bytes_per_sector),
            new_file_cb: None,
        }
    }

    pub fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    pub fn bytes_per_sector(&self) -> u32 {
        self.geometry.bytes_per_sector
    }

    pub fn total_sectors(&self) -> u32 {
        self.geometry.total_sectors
    }

    /// Synthesizes `buf.len()` bytes starting at absolute byte `offset` into
    /// the emulated volume. Always returns a non-negative byte count; errors
    /// inside a region synthesizer are logged and turned into a zero-fill
    /// rather than surfaced (`spec.md` §7).
    pub fn host_read(&mut self, offset: u32, buf: &mut [u8]) -> i32 {
        if buf.is_empty() {
            return 0;
        }
        let g = self.geometry;
        let sector = offset / g.bytes_per_sector;

        if sector == g.boot_start {
            let local = offset % g.bytes_per_sector;
            let remainder = g.bytes_per_sector - local;
            let n = (buf.len() as u32).min(remainder) as usize;
            let produced = boot_sector::read(local, &mut buf[..n], &g, &self.volume_label);
            return produced as i32;
        }

        if sector >= g.fat1_start && sector < g.fat1_start + g.sectors_per_fat {
            let rel = offset - g.fat1_start * g.bytes_per_sector;
            return self.read_fat(rel, buf);
        }
        if sector >= g.fat2_start && sector < g.fat2_start + g.sectors_per_fat {
            let rel = offset - g.fat2_start * g.bytes_per_sector;
            return self.read_fat(rel, buf);
        }
        if sector >= g.root_start && sector < g.data_start {
            let rel = offset - g.root_start * g.bytes_per_sector;
            return match dir::read(&self.files[..self.used_files], &self.arena, &self.volume_label, rel, buf) {
                Ok(n) => n as i32,
                Err(e) => {
                    log::warn!("root directory read at {}: {}", offset, e);
                    buf.fill(0);
                    buf.len() as i32
                }
            };
        }
        if sector >= g.data_start && sector < g.total_sectors {
            let rel = offset - g.data_start * g.bytes_per_sector;
            let max_out = (buf.len() as u32).min(g.bytes_per_cluster()) as usize;
            return data::route_read(&mut self.files[..self.used_files], &self.arena, rel, &mut buf[..max_out], &g)
                as i32;
        }

        let n = (buf.len() as u32).min(g.bytes_per_sector) as usize;
        buf[..n].fill(0);
        n as i32
    }

    /// Intercepts a host write at absolute byte `offset`. Root-directory
    /// writes are decoded for deletions, dynamic-file mutation and new-file
    /// detection; data-region writes are routed to the owning file's
    /// `write_cb`. Boot-sector and FAT writes are accepted but discarded
    /// (neither region is ever mutated by this emulator). Always reports
    /// `buf.len()` consumed.
    pub fn host_write(&mut self, offset: u32, buf: &[u8]) -> i32 {
        let g = self.geometry;
        let sector = offset / g.bytes_per_sector;

        if sector >= g.root_start && sector < g.data_start {
            let rel = offset - g.root_start * g.bytes_per_sector;
            intercept::intercept(
                &mut self.files[..self.used_files],
                &self.arena,
                &mut self.new_file_cb,
                &g,
                rel,
                buf,
            );
        } else if sector >= g.data_start && sector < g.total_sectors {
            let rel = offset - g.data_start * g.bytes_per_sector;
            data::route_write(&mut self.files[..self.used_files], &self.arena, rel, buf, &g);
        }

        buf.len() as i32
    }

    fn read_fat(&self, rel_offset: u32, buf: &mut [u8]) -> i32 {
        match table::read(rel_offset, buf, &self.files[..self.used_files], &self.geometry) {
            Ok(n) => n as i32,
            Err(e) => {
                log::warn!("FAT read at {}: {}", rel_offset, e);
                buf.fill(0);
                buf.len() as i32
            }
        }
    }
}
