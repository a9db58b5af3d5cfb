//! Wire layout, round-trip and malformed-input matrix for generated types.

mod common;

use common::*;
use messgen::{
    Arena, ByteView, Bytes, CodecError, Decimal64, Decode, DecodeIn, Encode, ListView, MapRef,
    Type, MAX_ZERO_SIZE_COUNT,
};

fn roundtrip<T>(value: &T)
where
    T: Encode + for<'de> Decode<'de> + PartialEq + std::fmt::Debug,
{
    let wire = value.to_vec().unwrap();
    assert_eq!(wire.len(), value.serialized_size());
    let (decoded, used) = T::deserialize(&wire).unwrap();
    assert_eq!(used, wire.len());
    assert_eq!(&decoded, value);
}

fn roundtrip_in<T>(value: &T)
where
    T: Encode + for<'a> DecodeIn<'a> + PartialEq + std::fmt::Debug,
{
    let wire = value.to_vec().unwrap();
    let arena = Arena::with_capacity(1024);
    let (decoded, used) = T::deserialize_in(&wire, &arena).unwrap();
    assert_eq!(used, wire.len());
    assert_eq!(&decoded, value);
}

// ---------------------------------------------------------------------------
// Layout
// ---------------------------------------------------------------------------

#[test]
fn layout_tiny_struct_bytes() {
    let tiny = TinyStruct {
        f0: 255,
        vec: vec![45.787],
    };
    let wire = tiny.to_vec().unwrap();
    assert_eq!(wire.len(), 13);
    assert_eq!(wire[0], 255);
    assert_eq!(&wire[1..5], &[1, 0, 0, 0]);
    assert_eq!(&wire[5..], &45.787f64.to_le_bytes());
}

#[test]
fn layout_fixed_sizes() {
    assert_eq!(<SimpleStruct as Type>::FIXED_SIZE, Some(44));
    assert_eq!(<FlatStruct as Type>::FIXED_SIZE, Some(40));
    assert_eq!(<StructWithEnum as Type>::FIXED_SIZE, Some(17));
    assert_eq!(<EmptyStruct as Type>::FIXED_SIZE, Some(0));
    assert_eq!(<VarSizeStruct as Type>::FIXED_SIZE, None);
    assert_eq!(<Quote as Type>::FIXED_SIZE, Some(20));
    assert_eq!(simple_struct().serialized_size(), 44);
}

#[test]
fn layout_min_sizes() {
    assert_eq!(<SimpleStruct as Type>::MIN_SIZE, 44);
    assert_eq!(<EmptyStruct as Type>::MIN_SIZE, 0);
    assert_eq!(<String as Type>::MIN_SIZE, 4);
    assert_eq!(<VarSizeStruct as Type>::MIN_SIZE, 8 + 4 + 4);
    assert_eq!(<[Vec<i16>; 4] as Type>::MIN_SIZE, 16);
    assert_eq!(<[Vec<i16>; 0] as Type>::MIN_SIZE, 0);
    assert_eq!(<VarSizeView<'_> as Type>::MIN_SIZE, 16);
}

#[test]
fn layout_flatness() {
    assert_eq!(<FlatStruct as Type>::IS_FLAT, cfg!(target_endian = "little"));
    // f1_pad forces padding in memory
    assert!(!<SimpleStruct as Type>::IS_FLAT);
    assert!(!<VarSizeStruct as Type>::IS_FLAT);
}

#[test]
fn layout_flat_struct_matches_memory() {
    if !<FlatStruct as Type>::IS_FLAT {
        return;
    }
    let s = FlatStruct {
        f0: 0x0102_0304_0506_0708,
        f1: -2,
        f2: 3.5,
        f3: 4,
        f4: -5,
        f5: 6.25,
        f6: 7,
        f7: 8,
        f8: -9,
    };
    let wire = s.to_vec().unwrap();
    let memory = unsafe {
        std::slice::from_raw_parts(
            &s as *const FlatStruct as *const u8,
            std::mem::size_of::<FlatStruct>(),
        )
    };
    assert_eq!(wire, memory);
}

#[test]
fn layout_enum_and_bitset_fields() {
    let s = StructWithEnum {
        f0: 1,
        f1: -1,
        e0: SimpleEnum::AnotherValue,
    };
    let wire = s.to_vec().unwrap();
    assert_eq!(wire[16], 1);

    let simple = simple_struct();
    let wire = simple.to_vec().unwrap();
    assert_eq!(wire[42], 1);
    assert_eq!(wire[43], 0b101);
}

// ---------------------------------------------------------------------------
// Round-trips
// ---------------------------------------------------------------------------

#[test]
fn roundtrip_owned_structs() {
    roundtrip(&simple_struct());
    roundtrip(&SimpleStruct::default());
    roundtrip(&var_size_struct(0));
    roundtrip(&var_size_struct(9));
    roundtrip(&EmptyStruct {});
    roundtrip(&complex_struct());
    roundtrip(&ComplexStruct::default());
    roundtrip(&Quote {
        price: "101.25".parse().unwrap(),
        qty: -3,
        side: WideEnum::Large,
    });
}

#[test]
fn roundtrip_owned_structs_in_arena() {
    roundtrip_in(&simple_struct());
    roundtrip_in(&var_size_struct(4));
    roundtrip_in(&complex_struct());
}

#[test]
fn roundtrip_empty_struct_is_zero_bytes() {
    let wire = EmptyStruct {}.to_vec().unwrap();
    assert!(wire.is_empty());
    assert_eq!(EmptyStruct::deserialize(&[]).unwrap(), (EmptyStruct {}, 0));
}

#[test]
fn roundtrip_decimal_specials() {
    for price in [Decimal64::INFINITY, Decimal64::NEG_INFINITY, Decimal64::ZERO] {
        let q = Quote {
            price,
            qty: 0,
            side: WideEnum::Negative,
        };
        roundtrip(&q);
    }
    let nan = Quote {
        price: Decimal64::NAN,
        ..Quote::default()
    };
    let wire = nan.to_vec().unwrap();
    assert!(Quote::deserialize(&wire).unwrap().0.price.is_nan());
}

// ---------------------------------------------------------------------------
// View and arena modes
// ---------------------------------------------------------------------------

#[test]
fn view_decodes_owned_wire() {
    let owned = var_size_struct(4);
    let wire = owned.to_vec().unwrap();
    let (view, used) = VarSizeView::deserialize(&wire).unwrap();
    assert_eq!(used, wire.len());
    assert_eq!(view.f0, 4);
    assert_eq!(view.f1_vec.iter().collect::<Vec<_>>(), owned.f1_vec);
    assert_eq!(view.f1_vec.get(3), Some(-9));
    assert_eq!(view.str, "str-4");
    assert_eq!(view.to_vec().unwrap(), wire);
}

#[test]
fn view_aliases_input_buffer() {
    let wire = var_size_struct(2).to_vec().unwrap();
    let (view, _) = VarSizeView::deserialize(&wire).unwrap();
    let range = wire.as_ptr_range();
    assert!(range.contains(&view.str.as_ptr()));
    assert!(range.contains(&view.f1_vec.as_bytes().as_ptr()));
}

#[test]
fn arena_decode_outlives_input() {
    let arena = Arena::with_capacity(256);
    let decoded = {
        let wire = var_size_struct(3).to_vec().unwrap();
        VarSizeArena::deserialize_in(&wire, &arena).unwrap().0
    };
    assert_eq!(decoded.f0, 3);
    assert_eq!(decoded.f1_vec, &[0, -3, -6]);
    assert_eq!(decoded.str, "str-3");
    assert!(arena.used() >= 24 + 5);
}

#[test]
fn arena_exhaustion_is_an_error() {
    let wire = var_size_struct(4).to_vec().unwrap();
    let arena = Arena::with_capacity(16);
    let err = VarSizeArena::deserialize_in(&wire, &arena).unwrap_err();
    assert!(matches!(err, CodecError::AllocationExhausted(_)));
}

#[test]
fn arena_reset_allows_reuse() {
    let wire = var_size_struct(4).to_vec().unwrap();
    let mut arena = Arena::with_capacity(64);
    for _ in 0..3 {
        let (decoded, _) = VarSizeArena::deserialize_in(&wire, &arena).unwrap();
        assert_eq!(decoded.f1_vec.len(), 4);
        arena.reset();
        assert_eq!(arena.used(), 0);
    }
}

#[test]
fn blob_view_and_arena_agree() {
    let tags = [(1, "one"), (2, "two")];
    let source = BlobArena {
        id: 9,
        payload: ByteView::from("raw"),
        tags: MapRef::new(&tags),
    };
    let wire = source.to_vec().unwrap();

    let (view, _) = BlobView::deserialize(&wire).unwrap();
    assert_eq!(view.id, 9);
    assert_eq!(view.payload.as_slice(), b"raw");
    assert_eq!(view.tags.get(&2), Some("two"));
    assert_eq!(view.tags.len(), 2);

    let arena = Arena::with_capacity(128);
    let (copy, _) = BlobArena::deserialize_in(&wire, &arena).unwrap();
    assert_eq!(copy, source);
    assert_eq!(copy.tags.get(&1), Some(&"one"));
}

#[test]
fn deferred_bytes_embed_inner_message() {
    let inner = var_size_struct(5);
    let wrapped = Wrapped {
        seq: 77,
        inner: Bytes::deferred(&inner),
    };
    let wire = wrapped.to_vec().unwrap();
    assert_eq!(wire.len(), 4 + 4 + inner.serialized_size());

    let (decoded, _) = Wrapped::deserialize(&wire).unwrap();
    assert_eq!(decoded.seq, 77);
    assert!(matches!(decoded.inner, Bytes::Direct(_)));
    assert_eq!(decoded, wrapped);
    let bytes = decoded.inner.materialize().unwrap();
    assert_eq!(VarSizeStruct::deserialize(&bytes).unwrap().0, inner);
}

#[test]
fn list_view_of_structs() {
    let items = vec![var_size_struct(1), var_size_struct(2), var_size_struct(3)];
    let wire = items.to_vec().unwrap();
    let (view, _) = ListView::<VarSizeView<'_>>::deserialize(&wire).unwrap();
    assert_eq!(view.len(), 3);
    assert_eq!(view.get(2).map(|v| v.str), Some("str-3"));
    assert_eq!(view.get(3), None);
}

// ---------------------------------------------------------------------------
// Malformed input
// ---------------------------------------------------------------------------

#[test]
fn malformed_every_truncation_fails() {
    let wire = complex_struct().to_vec().unwrap();
    for len in 0..wire.len() {
        assert!(
            ComplexStruct::deserialize(&wire[..len]).is_err(),
            "prefix of {len} bytes decoded"
        );
    }
    let arena = Arena::with_capacity(4096);
    for len in 0..wire.len() {
        assert!(ComplexStruct::deserialize_in(&wire[..len], &arena).is_err());
    }
}

#[test]
fn malformed_view_truncation_fails() {
    let wire = var_size_struct(4).to_vec().unwrap();
    for len in 0..wire.len() {
        assert!(VarSizeView::deserialize(&wire[..len]).is_err());
    }
}

#[test]
fn malformed_enum_value() {
    let mut wire = StructWithEnum::default().to_vec().unwrap();
    wire[16] = 7;
    assert_eq!(
        StructWithEnum::deserialize(&wire),
        Err(CodecError::InvalidEnumValue {
            name: "simple_enum",
            value: 7
        })
    );
}

#[test]
fn malformed_utf8() {
    let s = VarSizeStruct {
        f0: 0,
        f1_vec: vec![],
        str: "ab".to_string(),
    };
    let mut wire = s.to_vec().unwrap();
    let last = wire.len() - 1;
    wire[last] = 0xff;
    assert_eq!(VarSizeStruct::deserialize(&wire), Err(CodecError::InvalidUtf8));
    assert_eq!(VarSizeView::deserialize(&wire), Err(CodecError::InvalidUtf8));
}

#[test]
fn malformed_huge_count_is_rejected_before_allocation() {
    let mut wire = var_size_struct(0).to_vec().unwrap();
    wire[8..12].copy_from_slice(&0x7fff_ffffu32.to_le_bytes());
    assert!(matches!(
        VarSizeStruct::deserialize(&wire),
        Err(CodecError::BufferTooShort { .. })
    ));
    let arena = Arena::with_capacity(64);
    assert!(matches!(
        VarSizeArena::deserialize_in(&wire, &arena),
        Err(CodecError::BufferTooShort { .. })
    ));
    assert_eq!(arena.used(), 0);
}

#[test]
fn serialize_reports_short_output() {
    let s = simple_struct();
    let mut buf = [0u8; 43];
    assert_eq!(
        s.serialize(&mut buf),
        Err(CodecError::BufferTooShort {
            needed: 44,
            remaining: 43
        })
    );
}

#[test]
fn malformed_huge_count_same_error_in_every_mode() {
    let wire = 0x7fff_ffffu32.to_le_bytes();
    assert!(matches!(
        Vec::<String>::deserialize(&wire),
        Err(CodecError::BufferTooShort { .. })
    ));
    assert!(matches!(
        ListView::<&str>::deserialize(&wire),
        Err(CodecError::BufferTooShort { .. })
    ));
    let arena = Arena::with_capacity(1 << 20);
    assert!(matches!(
        <&[&str]>::deserialize_in(&wire, &arena),
        Err(CodecError::BufferTooShort { .. })
    ));
    assert!(matches!(
        Vec::<VarSizeStruct>::deserialize_in(&wire, &arena),
        Err(CodecError::BufferTooShort { .. })
    ));
    assert_eq!(arena.used(), 0);
}

#[test]
fn zero_size_elements_roundtrip() {
    let items = vec![EmptyStruct {}; 3];
    let wire = items.to_vec().unwrap();
    assert_eq!(wire, [3, 0, 0, 0]);
    assert_eq!(Vec::<EmptyStruct>::deserialize(&wire).unwrap(), (items, 4));
    let (view, _) = ListView::<EmptyStruct>::deserialize(&wire).unwrap();
    assert_eq!(view.len(), 3);
}

#[test]
fn malformed_zero_size_count_is_capped() {
    let wire = u32::MAX.to_le_bytes();
    let capped = |err: CodecError| {
        err == CodecError::CountTooLarge {
            count: u32::MAX as usize,
            limit: MAX_ZERO_SIZE_COUNT,
        }
    };
    assert!(capped(Vec::<EmptyStruct>::deserialize(&wire).unwrap_err()));
    assert!(capped(Vec::<[u64; 0]>::deserialize(&wire).unwrap_err()));
    assert!(capped(ListView::<EmptyStruct>::deserialize(&wire).unwrap_err()));
    let arena = Arena::with_capacity(64);
    assert!(capped(<&[EmptyStruct]>::deserialize_in(&wire, &arena).unwrap_err()));
    assert_eq!(arena.used(), 0);

    let at_limit = (MAX_ZERO_SIZE_COUNT as u32).to_le_bytes();
    let (items, used) = Vec::<EmptyStruct>::deserialize(&at_limit).unwrap();
    assert_eq!((items.len(), used), (MAX_ZERO_SIZE_COUNT, 4));
}
