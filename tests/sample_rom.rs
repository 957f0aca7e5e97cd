use std::io::Write;
use std::sync::Arc;

use rompler_dsp::rom::{header_len, RomError, RomStorage, SampleRom, SampleSource, SliceIndex};
use rompler_dsp::{BufferStatus, Params, Voice};

fn slices() -> Vec<Vec<i16>> {
    vec![
        (0..256).map(|i| (i * 100) as i16).collect(),
        (0..2000).map(|i| (i as i16).wrapping_mul(7)).collect(),
        vec![-1234; 500],
    ]
}

fn write_rom(bytes: &[u8]) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(bytes).unwrap();
    file.flush().unwrap();
    file
}

#[test]
fn file_backed_rom_matches_memory_rom() {
    let memory = SampleRom::from_slices(slices()).unwrap();
    let file = write_rom(&memory.to_bytes().unwrap());

    let on_disk = SampleRom::open(file.path()).unwrap();

    assert_eq!(on_disk.slice_count(), 3);
    assert_eq!(on_disk.first_sample_slice(), Some(1));
    for id in 0..3 {
        assert_eq!(on_disk.slice_info(id), memory.slice_info(id));

        let len = memory.slice_len(id);
        let mut a = vec![0i16; len];
        let mut b = vec![0i16; len];
        memory.read_slice(&mut a, id, 0);
        on_disk.read_slice(&mut b, id, 0);
        assert_eq!(a, b);
    }
}

#[test]
fn file_backed_partial_read_keeps_tail() {
    let memory = SampleRom::from_slices(slices()).unwrap();
    let file = write_rom(&memory.to_bytes().unwrap());
    let on_disk = SampleRom::open(file.path()).unwrap();

    let mut dst = [99i16; 10];
    on_disk.read_slice(&mut dst, 2, 495);

    assert_eq!(&dst[..5], &[-1234; 5]);
    assert_eq!(&dst[5..], &[99; 5]);
}

#[test]
fn mirrored_file_rom_serves_same_samples() {
    let memory = SampleRom::from_slices(slices()).unwrap();
    let file = write_rom(&memory.to_bytes().unwrap());
    let mut on_disk = SampleRom::open(file.path()).unwrap();

    let mut before = [0i16; 300];
    on_disk.read_slice(&mut before, 1, 1000);

    assert_eq!(on_disk.mirror_in_ram(1 << 20).unwrap(), 3);

    // the file is gone; every read now comes from RAM
    drop(file);
    let mut after = [0i16; 300];
    on_disk.read_slice(&mut after, 1, 1000);
    assert_eq!(before, after);
}

#[test]
fn truncated_file_is_rejected() {
    let bytes = SampleRom::from_slices(slices()).unwrap().to_bytes().unwrap();
    let file = write_rom(&bytes[..header_len(3) + 100]);

    assert!(matches!(
        SampleRom::open(file.path()),
        Err(RomError::TruncatedData { .. })
    ));
}

#[test]
fn bad_magic_is_rejected() {
    let mut bytes = SampleRom::from_slices(slices()).unwrap().to_bytes().unwrap();
    bytes[3] = 0;

    assert!(matches!(
        SampleRom::from_bytes(&bytes),
        Err(RomError::BadMagic(_))
    ));
}

#[test]
fn voice_plays_from_file_backed_rom() {
    let memory = SampleRom::from_slices(slices()).unwrap();
    let file = write_rom(&memory.to_bytes().unwrap());
    let rom = Arc::new(SampleRom::open(file.path()).unwrap());

    let mut voice = Voice::new(rom, 48_000.0);
    let params = Params {
        slice: 2,
        gate: true,
        ..Params::default()
    };

    let mut out = [0.0f32; 128];
    voice.process(&params, &mut out);

    assert_eq!(voice.status().buffer_status, BufferStatus::Running);
    assert!(out[64] < 0.0);
}

struct UnavailableStorage {
    word_len: usize,
}

impl RomStorage for UnavailableStorage {
    fn read_words(&self, _dst: &mut [i16], _word_offset: usize) -> Result<(), RomError> {
        Err(RomError::StorageBusy)
    }

    fn word_len(&self) -> usize {
        self.word_len
    }
}

#[test]
fn unavailable_storage_keeps_voice_running_and_counts_failures() {
    let index = SliceIndex::from_lengths([10]).unwrap();
    let rom = Arc::new(SampleRom::new(index, Box::new(UnavailableStorage { word_len: 10 })).unwrap());

    // a two-sample ping-pong section turns on every sample: one read per sample
    let mut voice = Voice::new(rom.clone(), 48_000.0);
    let params = Params {
        gate: true,
        looping: true,
        ping_pong: true,
        loop_marker: 0.8,
        ..Params::default()
    };

    let mut out = [1.0f32; 128];
    for _ in 0..4 {
        voice.process(&params, &mut out);
    }

    assert_eq!(voice.status().buffer_status, BufferStatus::Running);
    assert!(out.iter().all(|s| s.is_finite() && *s == 0.0));
    assert!(rom.take_read_failures() >= 128);
    assert_eq!(rom.take_read_failures(), 0);
}
