//! `PgmCodec` against real files.

use std::fs;
use std::path::PathBuf;

use proptest::prelude::*;
use relax_core::{CodecError, ImageCodec};
use relax_pgm::PgmCodec;

/// A path in the system temp directory unique to this process and `name`.
fn scratch(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("relax-pgm-{}-{name}.pgm", std::process::id()))
}

#[test]
fn dimensions_read_only_the_header() {
    let path = scratch("dims");
    // Raster is deliberately short: dimensions must not care.
    fs::write(&path, b"P5\n# comment\n640 480\n255\n\x00").unwrap();
    assert_eq!(PgmCodec.dimensions(&path).unwrap(), (640, 480));
    assert!(matches!(
        PgmCodec.decode(&path),
        Err(CodecError::Truncated { .. })
    ));
    fs::remove_file(&path).unwrap();
}

#[test]
fn missing_file_is_an_io_error() {
    let path = scratch("does-not-exist");
    assert!(matches!(PgmCodec.decode(&path), Err(CodecError::Io(_))));
    assert!(matches!(PgmCodec.dimensions(&path), Err(CodecError::Io(_))));
}

#[test]
fn failed_encode_leaves_no_file() {
    let path = scratch("rejected");
    let _ = fs::remove_file(&path);
    assert!(PgmCodec.encode(&path, &[1.0; 3], 2, 2).is_err());
    assert!(!path.exists());
}

#[test]
fn unwritable_destination_is_an_io_error() {
    let path = scratch("no-such-dir").join("out.pgm");
    assert!(matches!(
        PgmCodec.encode(&path, &[1.0], 1, 1),
        Err(CodecError::Io(_))
    ));
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    #[test]
    fn byte_valued_images_survive_a_file_round_trip(
        w in 1usize..9,
        h in 1usize..9,
        seed in prop::collection::vec(any::<u8>(), 64),
    ) {
        let path = scratch(&format!("rt-{w}x{h}"));
        let samples: Vec<f32> = (0..w * h).map(|k| f32::from(seed[k])).collect();
        PgmCodec.encode(&path, &samples, w, h).unwrap();
        prop_assert_eq!(PgmCodec.dimensions(&path).unwrap(), (w, h));
        prop_assert_eq!(PgmCodec.decode(&path).unwrap(), samples);
        fs::remove_file(&path).unwrap();
    }
}
