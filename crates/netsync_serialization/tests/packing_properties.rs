//! # Packing Property Tests
//!
//! Sweeps every integer width and packable type through the public API and
//! checks the wire-level guarantees: exact round trips, predicted sizes,
//! width-class boundaries, identical bytes on the typed and object paths,
//! and buffer invariants under long operation sequences.

use netsync_serialization::arithmetic::zigzag_encode;
use netsync_serialization::{
    bit_packed_size, impl_packable_enum, packed_size_u64, read_bit_packed, read_bit_packed_signed,
    read_object_packed, read_packed, read_value_bit_packed, write_bit_packed,
    write_bit_packed_signed, write_object_packed, write_packed, write_value_bit_packed,
    BitPackable, BufferConfig, BufferReader, BufferWriter, Packable, PackedEnum, PackedValue,
    SerializationError, SerializationResult, WidthClass,
};
use netsync_shared::{Color, Color32, Quaternion, Ray, Ray2D, Vec2, Vec3, Vec4};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

const SEED: u64 = 0x5EED_CAFE;

/// Every value with zero, one or two bits set, as a bit pattern.
fn sparse_patterns() -> Vec<u64> {
    let mut patterns = vec![0u64];
    for i in 0..64 {
        patterns.push(1 << i);
        for j in (i + 1)..64 {
            patterns.push((1 << i) | (1 << j));
        }
    }
    patterns
}

fn assert_round_trip<T: Packable + PartialEq + std::fmt::Debug>(value: T) {
    let mut writer = BufferWriter::growable(16, 64);
    write_packed(&mut writer, &value).unwrap();
    let mut reader = writer.reader();
    assert_eq!(read_packed::<T>(&mut reader).unwrap(), value);
    assert!(reader.is_exhausted(), "trailing bytes after {value:?}");
}

/// Test: Every width round-trips its extremes and sparse bit patterns.
#[test]
fn test_integer_round_trip_all_widths() {
    for pattern in sparse_patterns() {
        assert_round_trip(pattern);
        assert_round_trip(pattern as i64);
        assert_round_trip(pattern as u32);
        assert_round_trip(pattern as i32);
        assert_round_trip(pattern as u16);
        assert_round_trip(pattern as i16);
        assert_round_trip(pattern as u8);
        assert_round_trip(pattern as i8);
        assert_round_trip((pattern as i64).wrapping_neg());
    }

    assert_round_trip(u64::MAX);
    assert_round_trip(i64::MIN);
    assert_round_trip(i64::MAX);
    assert_round_trip(i32::MIN);
    assert_round_trip(i16::MIN);
    assert_round_trip(i8::MIN);
    assert_round_trip(u8::MAX);
}

/// Test: The encoded size always matches the predicted size.
#[test]
fn test_value_packed_size_prediction() {
    for pattern in sparse_patterns() {
        let mut writer = BufferWriter::new(16);
        write_packed(&mut writer, &pattern).unwrap();
        assert_eq!(writer.len(), packed_size_u64(pattern), "size of {pattern:#x}");
    }
}

/// Test: Small magnitudes of either sign stay in one byte.
#[test]
fn test_signed_small_values_are_one_byte() {
    for v in -120i64..=120 {
        let mut writer = BufferWriter::new(16);
        write_packed(&mut writer, &v).unwrap();
        assert_eq!(writer.len(), 1, "{v} should be a single byte");
    }

    let mut writer = BufferWriter::new(16);
    write_packed(&mut writer, &-121i64).unwrap();
    assert_eq!(writer.len(), 2);
}

/// Test: Each width class accepts exactly its bit budget.
#[test]
fn test_bit_packed_class_limits() {
    for class in [WidthClass::Bits61, WidthClass::Bits30, WidthClass::Bits15] {
        let max = (1u64 << class.max_bits()) - 1;

        let mut writer = BufferWriter::new(16);
        write_bit_packed(&mut writer, max, class).unwrap();
        assert_eq!(writer.len(), class.max_bytes());
        assert_eq!(bit_packed_size(max, class), Some(class.max_bytes()));

        let err = write_bit_packed(&mut writer, max + 1, class).unwrap_err();
        assert_eq!(
            err,
            SerializationError::DomainOverflow {
                bits: class.max_bits() + 1,
                max_bits: class.max_bits()
            }
        );
        assert_eq!(writer.len(), class.max_bytes(), "overflow must not write");
        assert_eq!(bit_packed_size(max + 1, class), None);

        let mut reader = writer.reader();
        assert_eq!(read_bit_packed(&mut reader, class).unwrap(), max);
    }
}

/// Test: The low tag bits of the first byte equal byte count minus one.
#[test]
fn test_bit_packed_tag_encodes_length() {
    for class in [WidthClass::Bits61, WidthClass::Bits30, WidthClass::Bits15] {
        let tag_mask = (1u8 << class.tag_bits()) - 1;
        for bits in 0..=class.max_bits() {
            let value = if bits == 0 { 0 } else { 1u64 << (bits - 1) };
            let mut writer = BufferWriter::new(16);
            write_bit_packed(&mut writer, value, class).unwrap();

            let bytes = writer.to_slice();
            assert_eq!(usize::from(bytes[0] & tag_mask) + 1, bytes.len());
            assert_eq!(Some(bytes.len()), bit_packed_size(value, class));

            let mut reader = BufferReader::new(bytes);
            assert_eq!(read_bit_packed(&mut reader, class).unwrap(), value);
        }
    }
}

/// Test: Byte counts step up exactly at the documented bit-length thresholds.
#[test]
fn test_bit_packed_thresholds() {
    let cases: [(WidthClass, &[u32]); 3] = [
        (WidthClass::Bits61, &[5, 13, 21, 29, 37, 45, 53, 61]),
        (WidthClass::Bits30, &[6, 14, 22, 30]),
        (WidthClass::Bits15, &[7, 15]),
    ];
    for (class, thresholds) in cases {
        for (index, &bits) in thresholds.iter().enumerate() {
            let widest = (1u64 << bits) - 1;
            let mut writer = BufferWriter::new(16);
            write_bit_packed(&mut writer, widest, class).unwrap();
            assert_eq!(writer.len(), index + 1, "{class:?} at {bits} bits");

            if bits < class.max_bits() {
                writer.reset();
                write_bit_packed(&mut writer, 1u64 << bits, class).unwrap();
                assert_eq!(writer.len(), index + 2, "{class:?} past {bits} bits");
            }
        }
    }
}

/// Test: Signed ranges follow from zigzag against the unsigned budget.
#[test]
fn test_bit_packed_signed_ranges() {
    let cases = [
        (WidthClass::Bits61, 1i64 << 60),
        (WidthClass::Bits30, 1i64 << 29),
        (WidthClass::Bits15, 1i64 << 14),
    ];
    for (class, half) in cases {
        assert_eq!(class.max_signed_bits(), class.max_bits() - 1);

        let mut writer = BufferWriter::new(32);
        for value in [-half, half - 1, -1, 0, 1] {
            write_bit_packed_signed(&mut writer, value, class).unwrap();
        }
        assert!(write_bit_packed_signed(&mut writer, half, class).is_err());
        assert!(write_bit_packed_signed(&mut writer, -half - 1, class).is_err());

        let mut reader = writer.reader();
        for value in [-half, half - 1, -1, 0, 1] {
            assert_eq!(read_bit_packed_signed(&mut reader, class).unwrap(), value);
        }
        assert!(reader.is_exhausted());
    }
}

/// Test: Sparse signed patterns of both signs round-trip with the byte count
/// and tag of their zigzag form.
#[test]
fn test_bit_packed_signed_sweep() {
    for class in [WidthClass::Bits61, WidthClass::Bits30, WidthClass::Bits15] {
        let tag_mask = (1u8 << class.tag_bits()) - 1;
        let limit = class.max_signed_bits();
        for i in 0..limit {
            for j in i..limit {
                let magnitude = (1i64 << i) | (1i64 << j);
                for value in [magnitude, -magnitude] {
                    let mut writer = BufferWriter::new(16);
                    write_bit_packed_signed(&mut writer, value, class).unwrap();

                    let bytes = writer.to_slice();
                    let expected = bit_packed_size(zigzag_encode(value), class);
                    assert_eq!(Some(bytes.len()), expected, "{class:?} {value}");
                    assert_eq!(usize::from(bytes[0] & tag_mask) + 1, bytes.len());

                    let mut reader = BufferReader::new(bytes);
                    assert_eq!(read_bit_packed_signed(&mut reader, class).unwrap(), value);
                    assert!(reader.is_exhausted());
                }
            }
        }
    }
}

/// Test: Typed bit-packing picks the class from the type.
#[test]
fn test_typed_bit_packing() {
    assert_eq!(<u64 as BitPackable>::WIDTH_CLASS, WidthClass::Bits61);
    assert_eq!(<i32 as BitPackable>::WIDTH_CLASS, WidthClass::Bits30);
    assert_eq!(<u16 as BitPackable>::WIDTH_CLASS, WidthClass::Bits15);

    let mut writer = BufferWriter::new(32);
    write_value_bit_packed(&mut writer, (1u64 << 61) - 1).unwrap();
    write_value_bit_packed(&mut writer, -(1i32 << 29)).unwrap();
    write_value_bit_packed(&mut writer, 0x7FFFu16).unwrap();
    assert!(write_value_bit_packed(&mut writer, 0x8000u16).is_err());

    let mut reader = writer.reader();
    assert_eq!(read_value_bit_packed::<u64>(&mut reader).unwrap(), (1u64 << 61) - 1);
    assert_eq!(read_value_bit_packed::<i32>(&mut reader).unwrap(), -(1i32 << 29));
    assert_eq!(read_value_bit_packed::<u16>(&mut reader).unwrap(), 0x7FFF);
    assert!(reader.is_exhausted());
}

/// Test: Floats and float composites survive bit-exactly.
#[test]
fn test_float_composites_are_bit_exact() {
    let mut rng = ChaCha8Rng::seed_from_u64(SEED);

    for _ in 0..256 {
        let v4 = Vec4::new(
            rng.gen_range(-1.0e6..1.0e6),
            rng.gen_range(-1.0e6..1.0e6),
            f32::from_bits(rng.gen()),
            rng.gen(),
        );
        let mut writer = BufferWriter::new(64);
        write_packed(&mut writer, &v4).unwrap();
        assert_eq!(writer.to_slice(), bytemuck::bytes_of(&v4));

        let decoded: Vec4 = read_packed(&mut writer.reader()).unwrap();
        assert_eq!(bytemuck::bytes_of(&decoded), bytemuck::bytes_of(&v4));

        let q = Quaternion::new(rng.gen(), rng.gen(), rng.gen(), rng.gen());
        let c = Color::new(rng.gen(), rng.gen(), rng.gen(), rng.gen());
        let d: f64 = rng.gen_range(-1.0e12..1.0e12);
        assert_round_trip(q);
        assert_round_trip(c);
        assert_round_trip(Vec2::new(rng.gen(), rng.gen()));
        assert_round_trip(Vec3::new(rng.gen(), rng.gen(), rng.gen()));

        let mut writer = BufferWriter::new(16);
        write_packed(&mut writer, &d).unwrap();
        let decoded: f64 = read_packed(&mut writer.reader()).unwrap();
        assert_eq!(decoded.to_bits(), d.to_bits());
    }
}

/// Test: NaN payloads and signed zero are preserved.
#[test]
fn test_special_floats() {
    for value in [f32::NAN, -0.0, f32::INFINITY, f32::MIN_POSITIVE] {
        let mut writer = BufferWriter::new(8);
        write_packed(&mut writer, &value).unwrap();
        let decoded: f32 = read_packed(&mut writer.reader()).unwrap();
        assert_eq!(decoded.to_bits(), value.to_bits());
    }
}

/// Test: Color32 channels are value-packed, not raw.
#[test]
fn test_color32_channels() {
    let mut rng = ChaCha8Rng::seed_from_u64(SEED);
    for _ in 0..256 {
        let color = Color32::new(rng.gen(), rng.gen(), rng.gen(), rng.gen());
        let mut writer = BufferWriter::new(16);
        write_packed(&mut writer, &color).unwrap();

        let expected: usize = [color.r, color.g, color.b, color.a]
            .iter()
            .map(|&channel| packed_size_u64(u64::from(channel)))
            .sum();
        assert_eq!(writer.len(), expected);
        assert_round_trip(color);
    }
}

/// Test: Rays come back with a unit direction close to the written one.
#[test]
fn test_rays_within_tolerance() {
    let mut rng = ChaCha8Rng::seed_from_u64(SEED);
    for _ in 0..256 {
        let origin = Vec3::new(
            rng.gen_range(-500.0..500.0),
            rng.gen_range(-500.0..500.0),
            rng.gen_range(-500.0..500.0),
        );
        let dir = Vec3::new(
            rng.gen_range(0.1..1.0),
            rng.gen_range(-1.0..1.0),
            rng.gen_range(-1.0..1.0),
        );
        let ray = Ray::new(origin, dir);

        let mut writer = BufferWriter::new(32);
        write_packed(&mut writer, &ray).unwrap();
        let decoded: Ray = read_packed(&mut writer.reader()).unwrap();

        assert_eq!(decoded.origin, ray.origin);
        assert!((decoded.direction - ray.direction).length() < 1e-5);
        assert!((decoded.direction.length() - 1.0).abs() < 1e-5);

        let ray2d = Ray2D::new(Vec2::new(origin.x, origin.y), Vec2::new(dir.x, dir.y));
        let mut writer = BufferWriter::new(32);
        write_packed(&mut writer, &ray2d).unwrap();
        let decoded: Ray2D = read_packed(&mut writer.reader()).unwrap();
        assert_eq!(decoded.origin, ray2d.origin);
        assert!((decoded.direction.x - ray2d.direction.x).abs() < 1e-5);
        assert!((decoded.direction.y - ray2d.direction.y).abs() < 1e-5);
    }
}

/// Test: A mixed message written through the object path decodes through
/// the typed path and produces identical bytes.
#[test]
fn test_object_and_typed_paths_agree() {
    let mut rng = ChaCha8Rng::seed_from_u64(SEED);
    let values = [
        PackedValue::from(rng.gen::<u64>()),
        PackedValue::from(rng.gen::<i32>()),
        PackedValue::from(rng.gen::<i8>()),
        PackedValue::from(true),
        PackedValue::from('Ω'),
        PackedValue::from(rng.gen::<f32>()),
        PackedValue::from(Vec3::new(rng.gen(), rng.gen(), rng.gen())),
        PackedValue::from(Color32::new(rng.gen(), rng.gen(), rng.gen(), rng.gen())),
    ];

    let mut object = BufferWriter::growable(8, 256);
    for value in &values {
        write_object_packed(&mut object, value, value.type_tag()).unwrap();
    }

    let mut typed = BufferWriter::growable(8, 256);
    let mut reader = object.reader();
    for value in &values {
        match *value {
            PackedValue::U64(v) => {
                assert_eq!(read_packed::<u64>(&mut reader).unwrap(), v);
                write_packed(&mut typed, &v).unwrap();
            }
            PackedValue::I32(v) => {
                assert_eq!(read_packed::<i32>(&mut reader).unwrap(), v);
                write_packed(&mut typed, &v).unwrap();
            }
            PackedValue::I8(v) => {
                assert_eq!(read_packed::<i8>(&mut reader).unwrap(), v);
                write_packed(&mut typed, &v).unwrap();
            }
            PackedValue::Bool(v) => {
                assert_eq!(read_packed::<bool>(&mut reader).unwrap(), v);
                write_packed(&mut typed, &v).unwrap();
            }
            PackedValue::Char(v) => {
                assert_eq!(read_packed::<char>(&mut reader).unwrap(), v);
                write_packed(&mut typed, &v).unwrap();
            }
            PackedValue::F32(v) => {
                assert_eq!(read_packed::<f32>(&mut reader).unwrap().to_bits(), v.to_bits());
                write_packed(&mut typed, &v).unwrap();
            }
            PackedValue::Vec3(v) => {
                assert_eq!(read_packed::<Vec3>(&mut reader).unwrap(), v);
                write_packed(&mut typed, &v).unwrap();
            }
            PackedValue::Color32(v) => {
                assert_eq!(read_packed::<Color32>(&mut reader).unwrap(), v);
                write_packed(&mut typed, &v).unwrap();
            }
            other => panic!("unexpected value {other:?}"),
        }
    }
    assert!(reader.is_exhausted());
    assert_eq!(object.to_slice(), typed.to_slice());

    let mut reader = typed.reader();
    for value in &values {
        assert_eq!(read_object_packed(&mut reader, value.type_tag()).unwrap(), *value);
    }
}

macro_rules! extreme_enum {
    ($($name:ident => $repr:ty),+ $(,)?) => {$(
        /// Variants at the bottom, near the bottom and top of the backing range.
        #[derive(Clone, Copy, Debug, PartialEq, Eq)]
        enum $name {
            Min,
            One,
            Max,
        }

        impl PackedEnum for $name {
            type Repr = $repr;

            fn to_repr(self) -> $repr {
                match self {
                    Self::Min => <$repr>::MIN,
                    Self::One => 1,
                    Self::Max => <$repr>::MAX,
                }
            }

            fn from_repr(repr: $repr) -> Option<Self> {
                if repr == <$repr>::MIN {
                    Some(Self::Min)
                } else if repr == 1 {
                    Some(Self::One)
                } else if repr == <$repr>::MAX {
                    Some(Self::Max)
                } else {
                    None
                }
            }
        }

        impl_packable_enum!($name);
    )+};
}

extreme_enum! {
    ByteKind => u8,
    SignedByteKind => i8,
    ShortKind => u16,
    SignedShortKind => i16,
    WordKind => u32,
    SignedWordKind => i32,
    WideKind => u64,
    SignedWideKind => i64,
}

fn typed_bytes<T: Packable>(value: &T) -> Vec<u8> {
    let mut writer = BufferWriter::new(32);
    write_packed(&mut writer, value).unwrap();
    writer.to_vec()
}

fn object_bytes(value: &PackedValue) -> Vec<u8> {
    let mut writer = BufferWriter::new(32);
    write_object_packed(&mut writer, value, value.type_tag()).unwrap();
    writer.to_vec()
}

fn assert_enum_paths_agree<E: PackedEnum + Packable + PartialEq + std::fmt::Debug>(value: E) {
    let object = PackedValue::from_enum(value);
    assert_eq!(object.type_tag(), E::TYPE_TAG);

    let bytes = typed_bytes(&value);
    assert_eq!(object_bytes(&object), bytes, "{value:?}");

    let mut reader = BufferReader::new(&bytes);
    let decoded = read_object_packed(&mut reader, E::TYPE_TAG).unwrap();
    assert!(reader.is_exhausted());
    assert_eq!(decoded, object);
    assert_eq!(decoded.into_enum::<E>(), Ok(value));

    let mut reader = BufferReader::new(&bytes);
    assert_eq!(read_packed::<E>(&mut reader), Ok(value));
}

fn assert_object_path_agrees<T>(value: T)
where
    T: Packable + Copy + PartialEq + std::fmt::Debug + Into<PackedValue>,
    T: TryFrom<PackedValue, Error = SerializationError>,
{
    let object: PackedValue = value.into();
    assert_eq!(object.type_tag(), T::TYPE_TAG);

    let bytes = typed_bytes(&value);
    assert_eq!(object_bytes(&object), bytes, "{value:?}");

    let mut reader = BufferReader::new(&bytes);
    let typed = read_packed::<T>(&mut reader).unwrap();
    let mut reader = BufferReader::new(&bytes);
    let decoded: SerializationResult<T> = read_object_packed(&mut reader, T::TYPE_TAG)
        .and_then(<T as TryFrom<PackedValue>>::try_from);
    assert_eq!(decoded, Ok(typed));
    assert!(reader.is_exhausted());
}

/// Test: Every enum backing at its extremes writes the same bytes on both
/// paths and decodes back to the same variant.
#[test]
fn test_enum_backings_at_extremes() {
    for value in [ByteKind::Min, ByteKind::One, ByteKind::Max] {
        assert_enum_paths_agree(value);
    }
    for value in [SignedByteKind::Min, SignedByteKind::One, SignedByteKind::Max] {
        assert_enum_paths_agree(value);
    }
    for value in [ShortKind::Min, ShortKind::One, ShortKind::Max] {
        assert_enum_paths_agree(value);
    }
    for value in [SignedShortKind::Min, SignedShortKind::One, SignedShortKind::Max] {
        assert_enum_paths_agree(value);
    }
    for value in [WordKind::Min, WordKind::One, WordKind::Max] {
        assert_enum_paths_agree(value);
    }
    for value in [SignedWordKind::Min, SignedWordKind::One, SignedWordKind::Max] {
        assert_enum_paths_agree(value);
    }
    for value in [WideKind::Min, WideKind::One, WideKind::Max] {
        assert_enum_paths_agree(value);
    }
    for value in [SignedWideKind::Min, SignedWideKind::One, SignedWideKind::Max] {
        assert_enum_paths_agree(value);
    }

    // zigzag(i64::MIN) = u64::MAX
    assert_eq!(typed_bytes(&SignedWideKind::Min), [255; 9]);
    assert_eq!(typed_bytes(&WideKind::Max), [255; 9]);
}

/// Test: Every non-enum type writes the same bytes on both paths.
#[test]
fn test_object_path_for_every_type() {
    assert_object_path_agrees(u8::MAX);
    assert_object_path_agrees(i8::MIN);
    assert_object_path_agrees(u16::MAX);
    assert_object_path_agrees(i16::MIN);
    assert_object_path_agrees(u32::MAX);
    assert_object_path_agrees(i32::MIN);
    assert_object_path_agrees(u64::MAX);
    assert_object_path_agrees(i64::MIN);
    assert_object_path_agrees(false);
    assert_object_path_agrees('\u{FFFD}');
    assert_object_path_agrees(f32::MIN);
    assert_object_path_agrees(f64::MIN);
    assert_object_path_agrees(f64::MAX);
    assert_object_path_agrees(Vec2::new(-3.5, 8.0));
    assert_object_path_agrees(Vec3::new(1.0, -2.0, 1.0e-7));
    assert_object_path_agrees(Vec4::new(0.0, -0.0, f32::MAX, f32::MIN_POSITIVE));
    assert_object_path_agrees(Quaternion::IDENTITY);
    assert_object_path_agrees(Color::new(0.25, 0.5, 0.75, 1.0));
    assert_object_path_agrees(Color32::new(0, 240, 241, 255));
    assert_object_path_agrees(Ray::new(Vec3::new(4.0, 5.0, 6.0), Vec3::new(0.0, 3.0, 4.0)));
    assert_object_path_agrees(Ray::new(Vec3::ZERO, Vec3::ZERO));
    assert_object_path_agrees(Ray2D::new(Vec2::new(-1.0, 2.0), Vec2::new(3.0, -4.0)));
}

/// Test: Every BMP scalar value round-trips as one code unit.
#[test]
fn test_every_bmp_char() {
    let mut writer = BufferWriter::new(2);
    for c in (0..=0xFFFFu32).filter_map(char::from_u32) {
        writer.reset();
        write_packed(&mut writer, &c).unwrap();
        assert_eq!(writer.to_slice(), (u32::from(c) as u16).to_le_bytes());
        assert_eq!(read_packed::<char>(&mut writer.reader()), Ok(c));
    }
}

/// Test: Truncating any valid message anywhere yields an error, never a panic.
#[test]
fn test_truncated_messages_fail_cleanly() {
    let mut writer = BufferWriter::growable(8, 256);
    write_packed(&mut writer, &u64::MAX).unwrap();
    write_packed(&mut writer, &-300i32).unwrap();
    write_packed(&mut writer, &Vec2::new(1.0, 2.0)).unwrap();
    write_bit_packed(&mut writer, 1 << 40, WidthClass::Bits61).unwrap();
    let bytes = writer.to_vec();

    for cut in 0..bytes.len() {
        let mut reader = BufferReader::new(&bytes[..cut]);
        let result = (|| -> Result<(), SerializationError> {
            read_packed::<u64>(&mut reader)?;
            read_packed::<i32>(&mut reader)?;
            read_packed::<Vec2>(&mut reader)?;
            read_bit_packed(&mut reader, WidthClass::Bits61)?;
            Ok(())
        })();
        assert!(
            matches!(result, Err(SerializationError::OutOfBounds { .. })),
            "cut at {cut}: {result:?}"
        );
        assert!(reader.position() <= cut);
    }
}

/// Writes may only fail because the buffer hit its maximum capacity.
fn assert_fits_or_full(result: SerializationResult<()>, step: usize) {
    match result {
        Ok(()) | Err(SerializationError::CapacityExceeded { .. }) => {}
        Err(other) => panic!("step {step}: unexpected write error {other:?}"),
    }
}

/// Test: position <= length <= capacity <= max capacity across random
/// writes, seeks, rewinds and truncations.
#[test]
fn test_buffer_invariants_under_random_operations() {
    let mut rng = ChaCha8Rng::seed_from_u64(SEED);
    let config = BufferConfig::growable(4, 512);
    let mut writer = BufferWriter::from_config(&config).unwrap();
    let mut mark = writer.mark();

    for step in 0..5_000 {
        match rng.gen_range(0..6) {
            0 => assert_fits_or_full(write_packed(&mut writer, &rng.gen::<u64>()), step),
            1 => assert_fits_or_full(
                write_bit_packed(&mut writer, rng.gen_range(0..1 << 30), WidthClass::Bits30),
                step,
            ),
            2 => {
                let target = rng.gen_range(0..=writer.len() + 4);
                let before = writer.position();
                if writer.seek(target).is_err() {
                    assert!(target > writer.len());
                    assert_eq!(writer.position(), before);
                }
            }
            3 => mark = writer.mark(),
            4 => match writer.rewind(mark) {
                Ok(()) => assert_eq!(writer.len(), mark.position(), "step {step}"),
                Err(SerializationError::SeekOutOfRange { position, length }) => {
                    assert!(position > length, "step {step}");
                }
                Err(other) => panic!("step {step}: unexpected rewind error {other:?}"),
            },
            _ => {
                if rng.gen_bool(0.1) {
                    writer.truncate();
                }
            }
        }

        assert!(writer.position() <= writer.len(), "step {step}");
        assert!(writer.len() <= writer.capacity(), "step {step}");
        assert!(writer.capacity() <= writer.max_capacity(), "step {step}");
        assert_eq!(writer.to_slice().len(), writer.len());
    }
}

/// Test: A fixed buffer refuses writes past its capacity without partial output.
#[test]
fn test_fixed_buffer_rejects_whole_values() {
    let mut writer = BufferWriter::new(4);
    write_packed(&mut writer, &1u8).unwrap();
    write_packed(&mut writer, &1000u16).unwrap();

    let err = write_packed(&mut writer, &u32::MAX).unwrap_err();
    assert_eq!(
        err,
        SerializationError::CapacityExceeded {
            requested: 5,
            available: 1
        }
    );
    assert_eq!(writer.len(), 3);

    write_packed(&mut writer, &7u8).unwrap();
    assert_eq!(writer.remaining(), 0);
}
