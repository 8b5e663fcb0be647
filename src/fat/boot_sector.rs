//! Boot sector synthesizer (`spec.md` §4.1): a fixed 62-byte DOS 2.0/3.31/4.0
//! BIOS Parameter Block followed by zero padding out to `bytes_per_sector`,
//! terminated by the `0xAA55` signature at byte 510.
//!
//! Field layout follows `original_source/EmuFATFS/fatfs.h`'s packed
//! `FAT_Bootsector_t` exactly; see DESIGN.md for the byte-offset mapping.

use crate::layout::{Geometry, SECTORS_PER_CLUSTER};

const STRUCT_SIZE: usize = 62;
const SIGNATURE_OFFSET: usize = 510;

fn synthesize(geometry: &Geometry, volume_label: &[u8; 11], out: &mut [u8; 512]) {
    out.fill(0);

    // 3-byte x86 jump instruction, then the 8-byte OEM name.
    out[0..3].copy_from_slice(&[0xEB, 0x3C, 0x90]);
    out[3..11].copy_from_slice(b"EmuFATFS");

    // DOS 2.0 BPB.
    out[11..13].copy_from_slice(&(geometry.bytes_per_sector as u16).to_le_bytes());
    out[13] = SECTORS_PER_CLUSTER as u8;
    out[14..16].copy_from_slice(&1u16.to_le_bytes()); // reserved sectors
    out[16] = 2; // number of FATs
    let root_entries = (geometry.sectors_per_root_dir * geometry.bytes_per_sector) / 32;
    out[17..19].copy_from_slice(&(root_entries as u16).to_le_bytes());
    out[19..21].copy_from_slice(&0u16.to_le_bytes()); // total sectors (16-bit, unused: we're past it)
    out[21] = 0xF8; // media descriptor: fixed disk
    out[22..24].copy_from_slice(&(geometry.sectors_per_fat as u16).to_le_bytes());

    // DOS 3.31 extension.
    out[24..26].copy_from_slice(&1u16.to_le_bytes()); // sectors per track
    out[26..28].copy_from_slice(&1u16.to_le_bytes()); // number of heads
    out[28..32].copy_from_slice(&0u32.to_le_bytes()); // hidden sectors
    out[32..36].copy_from_slice(&geometry.total_sectors.to_le_bytes());

    // DOS 4.0 extension.
    out[36] = 0; // physical drive number
    out[37] = 0; // reserved/flags
    out[38] = 0x29; // extended boot signature
    out[39..43].copy_from_slice(&0x6D68_6974u32.to_le_bytes()); // volume serial number
    out[43..54].copy_from_slice(volume_label);
    out[54..62].copy_from_slice(b"FAT16   ");

    out[SIGNATURE_OFFSET..SIGNATURE_OFFSET + 2].copy_from_slice(&0xAA55u16.to_le_bytes());

    debug_assert!(STRUCT_SIZE <= SIGNATURE_OFFSET);
}

/// Produces `buf.len()` bytes of the boot sector starting at `local_offset`
/// bytes into sector 0. The caller has already clamped `buf` to not run past
/// `bytes_per_sector`.
pub(crate) fn read(local_offset: u32, buf: &mut [u8], geometry: &Geometry, volume_label: &[u8; 11]) -> u32 {
    let mut sector = [0u8; 512];
    synthesize(geometry, volume_label, &mut sector);

    let off = local_offset as usize;
    for (i, b) in buf.iter_mut().enumerate() {
        let src = off + i;
        *b = if src < sector.len() { sector[src] } else { 0 };
    }
    buf.len() as u32
}
