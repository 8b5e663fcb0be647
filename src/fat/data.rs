//! Data-region router (`spec.md` §4.5): maps a `(offset, size)` window onto
//! the file that owns it by cluster-range arithmetic, and promotes a
//! dynamic placeholder's `start_cluster` on its first write.

use crate::layout::{Geometry, FIRST_DATA_CLUSTER};
use crate::registry::FileEntry;

fn file_start_cluster0(fe: &FileEntry) -> u32 {
    fe.start_cluster as u32 - FIRST_DATA_CLUSTER as u32
}

/// Fills `buf` (already clamped by the caller to `min(size, bytes_per_cluster)`)
/// from the file whose cluster range contains the requested offset, zero
/// filling whatever the file's `read_cb` didn't produce. Always reports
/// `buf.len()` bytes read.
pub(crate) fn route_read<const A: usize>(
    files: &mut [Option<FileEntry>],
    arena: &crate::registry::FilenameArena<A>,
    rel_offset: u32,
    buf: &mut [u8],
    geometry: &Geometry,
) -> u32 {
    let bytes_per_cluster = geometry.bytes_per_cluster();
    let c = rel_offset / bytes_per_cluster;
    let max_out = buf.len();

    for entry in files.iter_mut() {
        let fe = match entry {
            Some(f) if f.start_cluster != 0 => f,
            _ => continue,
        };
        let start = file_start_cluster0(fe);
        let span = fe.cluster_count(bytes_per_cluster);
        if c < start || c >= start + span {
            continue;
        }

        let file_offset = rel_offset - start * bytes_per_cluster;
        let mut produced = 0usize;
        if file_offset < fe.file_size {
            let name = arena.name(fe.name_start, fe.name_len);
            let r = fe.read_cb.read(file_offset, buf, name);
            produced = if r < 0 { 0 } else { (r as usize).min(max_out) };
        }
        buf[produced..].fill(0);
        return max_out as u32;
    }

    buf.fill(0);
    max_out as u32
}

/// Same routing as [`route_read`], plus: if no established file claims the
/// cluster, the first still-unplaced dynamic file (`is_dynamic` and
/// `start_cluster == 0`) is promoted to own it.
pub(crate) fn route_write<const A: usize>(
    files: &mut [Option<FileEntry>],
    arena: &crate::registry::FilenameArena<A>,
    rel_offset: u32,
    buf: &[u8],
    geometry: &Geometry,
) -> u32 {
    let bytes_per_cluster = geometry.bytes_per_cluster();
    let c = rel_offset / bytes_per_cluster;
    let max_in = buf.len();

    for entry in files.iter_mut() {
        let fe = match entry {
            Some(f) if f.start_cluster != 0 => f,
            _ => continue,
        };
        let start = file_start_cluster0(fe);
        let span = fe.cluster_count(bytes_per_cluster);
        if c < start || c >= start + span {
            continue;
        }

        let file_offset = rel_offset - start * bytes_per_cluster;
        if let Some(w) = fe.write_cb.as_mut() {
            let name = arena.name(fe.name_start, fe.name_len);
            w.write(file_offset as i32, &buf[..max_in], name);
        }
        return max_in as u32;
    }

    for entry in files.iter_mut() {
        let fe = match entry {
            Some(f) if f.is_dynamic && f.start_cluster == 0 => f,
            _ => continue,
        };
        fe.start_cluster = (c + FIRST_DATA_CLUSTER as u32) as u16;

        let file_offset = rel_offset - c * bytes_per_cluster;
        if let Some(w) = fe.write_cb.as_mut() {
            let name = arena.name(fe.name_start, fe.name_len);
            w.write(file_offset as i32, &buf[..max_in], name);
        }
        return max_in as u32;
    }

    max_in as u32
}
