//! End-to-end scenarios (`spec.md` §8) driven entirely through `host_read`/
//! `host_write`, the same surface a block-device host would use.

use emufatfs::Emulator;

const SECTOR: u32 = 1024;

#[test]
fn s1_empty_volume() {
    let mut emu: Emulator<4, 256> = Emulator::new(SECTOR, None);

    let mut boot = [0u8; 512];
    emu.host_read(0, &mut boot);
    assert_eq!(&boot[0..3], &[0xEB, 0x3C, 0x90]);
    assert_eq!(&boot[3..11], b"EmuFATFS");
    assert_eq!(boot[21], 0xF8);
    assert_eq!(&boot[510..512], &[0x55, 0xAA]);

    let root_start = emu.geometry().root_start * SECTOR;
    let mut dir = [0u8; 32];
    emu.host_read(root_start, &mut dir);
    assert_eq!(&dir[0..11], b"EMUFATFS16 ");
    assert_eq!(dir[11], 0x08);
    assert_eq!(&dir[12..32], &[0u8; 20]);
}

#[test]
fn s2_one_short_named_file() {
    let mut emu: Emulator<4, 256> = Emulator::new(SECTOR, None);
    let mut reader = |_o: u32, _b: &mut [u8], _n: &str| 0;
    emu.add_file("INFO", Some("TXT"), 0x100, &mut reader, None).unwrap();

    let bytes_per_cluster = emu.geometry().bytes_per_cluster();
    let fat1_start = emu.geometry().fat1_start * SECTOR;
    let mut fat = [0u8; 8];
    emu.host_read(fat1_start, &mut fat);
    assert_eq!(u16::from_le_bytes([fat[0], fat[1]]), 0xFFF8);
    assert_eq!(u16::from_le_bytes([fat[2], fat[3]]), 0x8000);
    assert_eq!(u16::from_le_bytes([fat[4], fat[5]]), 0xFFFF);
    assert_eq!(u16::from_le_bytes([fat[6], fat[7]]), 0x0000);
    assert!(bytes_per_cluster > 0);

    let root_start = emu.geometry().root_start * SECTOR;
    let mut entries = [0u8; 64]; // label slot already consumed one 32-byte run before this
    emu.host_read(root_start + 32, &mut entries);

    let lfn = &entries[0..32];
    assert_eq!(lfn[0], 0x01 | 0x40);
    assert_eq!(lfn[11], 0x0F);

    let short = &entries[32..64];
    assert_eq!(&short[0..8], b"INFO    ");
    assert_eq!(&short[8..11], b"TXT");
    assert_eq!(short[11], 0x05); // SYSTEM | READONLY, no write_cb
    assert_eq!(u32::from_le_bytes(short[28..32].try_into().unwrap()), 0x100);
}

#[test]
fn s3_long_filename() {
    let mut emu: Emulator<4, 256> = Emulator::new(SECTOR, None);
    let mut reader = |_o: u32, _b: &mut [u8], _n: &str| 0;
    emu.add_file("hello world", Some("txt"), 0x5000, &mut reader, None).unwrap();

    let root_start = emu.geometry().root_start * SECTOR;
    let mut entries = [0u8; 128];
    emu.host_read(root_start + 32, &mut entries);

    let lfn1 = &entries[0..32];
    let lfn2 = &entries[32..64];
    let short = &entries[64..96];

    assert_eq!(lfn1[0], 0x02 | 0x40);
    assert_eq!(lfn2[0], 0x01);
    assert_eq!(&short[0..8], b"HELLO \x7e1");
    assert_eq!(&short[8..11], b"TXT");
}

#[test]
fn s4_data_read() {
    let mut emu: Emulator<4, 256> = Emulator::new(SECTOR, None);
    let mut calls = 0u32;
    let mut reader = |file_offset: u32, buf: &mut [u8], name: &str| {
        calls += 1;
        assert_eq!(file_offset, 0);
        assert_eq!(name, "INFO");
        buf.fill(0x7A);
        buf.len() as i32
    };
    emu.add_file("INFO", Some("TXT"), 0x100, &mut reader, None).unwrap();

    let data_start = emu.geometry().data_start * SECTOR;
    let mut buf = [0u8; 0x40];
    emu.host_read(data_start, &mut buf);

    assert_eq!(calls, 1);
    assert_eq!(&buf[..], &[0x7Au8; 0x40][..]);
}

#[test]
fn s5_host_deletion() {
    let mut emu: Emulator<4, 256> = Emulator::new(SECTOR, None);
    let mut reader = |_o: u32, _b: &mut [u8], _n: &str| 0;
    let mut write_calls = 0u32;
    let mut writer = |offset: i32, buf: &[u8], name: &str| {
        write_calls += 1;
        assert_eq!(offset, -1);
        assert!(buf.is_empty());
        assert_eq!(name, "INFO");
        0
    };
    emu.add_file("INFO", Some("TXT"), 0x100, &mut reader, Some(&mut writer)).unwrap();

    // Slot 0 is the volume label, slot 1 is INFO's single LFN entry, slot 2
    // is its 8.3 entry -- the one the interceptor inspects for deletions.
    let root_start = emu.geometry().root_start * SECTOR;
    let mut slot = [0u8; 32];
    slot[0] = 0xE5;
    emu.host_write(root_start + 64, &slot);

    assert_eq!(write_calls, 1);

    let mut readback = [0u8; 8];
    let fat1_start = emu.geometry().fat1_start * SECTOR;
    emu.host_read(fat1_start, &mut readback);
    assert_eq!(u16::from_le_bytes([readback[4], readback[5]]), 0x0000);
}

#[test]
fn s6_dynamic_promotion() {
    let mut emu: Emulator<4, 256> = Emulator::new(SECTOR, None);
    let mut reader = |_o: u32, _b: &mut [u8], _n: &str| 0;
    let mut write_calls = 0u32;
    let mut writer = |file_offset: i32, _buf: &[u8], name: &str| {
        write_calls += 1;
        assert_eq!(file_offset, 0);
        assert_eq!(name, "data");
        0
    };
    emu.add_file_dynamic("data", Some("bin"), 0x10000, 0, &mut reader, Some(&mut writer))
        .unwrap();

    let data_start = emu.geometry().data_start * SECTOR;
    let buf = [0u8; 16];
    emu.host_write(data_start, &buf);

    assert_eq!(write_calls, 1);

    let fat1_start = emu.geometry().fat1_start * SECTOR;
    let mut fat = [0u8; 8];
    emu.host_read(fat1_start, &mut fat);
    assert_eq!(u16::from_le_bytes([fat[4], fat[5]]), 0xFFFF); // single-cluster file -> end of chain
}

#[test]
fn reset_restores_a_fresh_state() {
    let mut emu: Emulator<4, 256> = Emulator::new(SECTOR, None);
    let mut reader = |_o: u32, _b: &mut [u8], _n: &str| 0;
    emu.add_file("INFO", Some("TXT"), 0x100, &mut reader, None).unwrap();
    emu.reset();

    let root_start = emu.geometry().root_start * SECTOR;
    let mut dir = [0u8; 32];
    emu.host_read(root_start, &mut dir);
    assert_eq!(&dir[0..11], b"EMUFATFS16 ");
    assert_eq!(dir[11], 0x08);
}
