//! Schema types shared by the integration matrices.

#![allow(dead_code)]

use std::collections::{BTreeMap, HashMap};

use messgen::{
    messgen_bitset, messgen_enum, messgen_protocol, messgen_struct, ByteView, Bytes, Decimal64,
    ListView, MapRef, MapView,
};

messgen_enum! {
    #[messgen(name = "simple_enum", schema = "mynamespace/types")]
    pub enum SimpleEnum: u8 {
        OneValue = 0 => "one_value",
        AnotherValue = 1 => "another_value",
    }
}

messgen_enum! {
    #[messgen(name = "wide_enum")]
    pub enum WideEnum: i32 {
        Negative = -5 => "negative",
        Large = 100_000 => "large",
    }
}

messgen_bitset! {
    #[messgen(name = "simple_bitset")]
    pub struct SimpleBitset: SimpleBitsetFlag(u8) {
        One = 0 => "one",
        Two = 1 => "two",
        Error = 2 => "error",
    }
}

messgen_struct! {
    #[messgen(name = "simple_struct")]
    pub struct SimpleStruct {
        pub f0: u64,
        pub f1: i64,
        pub f1_pad: u8,
        pub f2: f64,
        pub f3: u32,
        pub f4: i32,
        pub f5: f32,
        pub f6: u16,
        pub f7: u8,
        pub f8: i8,
        pub f9: bool,
        pub e0: SimpleEnum,
        pub b0: SimpleBitset,
    }
}

messgen_struct! {
    #[messgen(name = "flat_struct")]
    pub struct FlatStruct {
        pub f0: u64,
        pub f1: i64,
        pub f2: f64,
        pub f3: u32,
        pub f4: i32,
        pub f5: f32,
        pub f6: u16,
        pub f7: u8,
        pub f8: i8,
    }
}

messgen_struct! {
    #[messgen(name = "var_size_struct")]
    pub struct VarSizeStruct {
        pub f0: u64,
        pub f1_vec: Vec<i64>,
        pub str: String,
    }
}

messgen_struct! {
    #[messgen(name = "struct_with_enum")]
    pub struct StructWithEnum {
        pub f0: u64,
        pub f1: i64,
        pub e0: SimpleEnum,
    }
}

messgen_struct! {
    #[messgen(name = "empty_struct")]
    pub struct EmptyStruct {}
}

messgen_struct! {
    #[messgen(name = "tiny_struct")]
    pub struct TinyStruct {
        pub f0: u8,
        pub vec: Vec<f64>,
    }
}

messgen_struct! {
    #[messgen(name = "quote")]
    pub struct Quote {
        pub price: Decimal64,
        pub qty: i64,
        pub side: WideEnum,
    }
}

messgen_struct! {
    #[messgen(name = "complex_struct")]
    pub struct ComplexStruct {
        pub f0: u64,
        pub f1: u32,
        pub f2: u64,
        pub s_arr: [SimpleStruct; 2],
        pub f1_arr: [i64; 4],
        pub v_arr: [VarSizeStruct; 2],
        pub f2_vec: Vec<f64>,
        pub e_vec: Vec<SimpleEnum>,
        pub s_vec: Vec<SimpleStruct>,
        pub v_vec0: Vec<Vec<VarSizeStruct>>,
        pub v_vec1: [Vec<VarSizeStruct>; 4],
        pub v_vec2: Vec<[Vec<i16>; 4]>,
        pub str: String,
        pub str_vec: Vec<String>,
        pub map_str_by_int: BTreeMap<i32, String>,
        pub map_vec_by_str: HashMap<String, Vec<i32>>,
    }
}

messgen_struct! {
    #[messgen(name = "var_size_struct", decode = view)]
    pub struct VarSizeView<'a> {
        pub f0: u64,
        pub f1_vec: ListView<'a, i64>,
        pub str: &'a str,
    }
}

messgen_struct! {
    #[messgen(name = "var_size_struct", decode = arena)]
    pub struct VarSizeArena<'a> {
        pub f0: u64,
        pub f1_vec: &'a [i64],
        pub str: &'a str,
    }
}

messgen_struct! {
    #[messgen(name = "blob", decode = view)]
    pub struct BlobView<'a> {
        pub id: u32,
        pub payload: ByteView<'a>,
        pub tags: MapView<'a, i32, &'a str>,
    }
}

messgen_struct! {
    #[messgen(name = "blob", decode = arena)]
    pub struct BlobArena<'a> {
        pub id: u32,
        pub payload: ByteView<'a>,
        pub tags: MapRef<'a, i32, &'a str>,
    }
}

messgen_struct! {
    #[messgen(name = "envelope_struct", decode = view)]
    pub struct Wrapped<'a> {
        pub seq: u32,
        pub inner: Bytes<'a>,
    }
}

messgen_protocol! {
    #[messgen(proto_id = 1, name = "test_proto")]
    pub enum TestProto {
        0 => simple_struct_msg: SimpleStructMsg(SimpleStruct),
        1 => complex_struct_msg: ComplexStructMsg(ComplexStruct),
        2 => var_size_struct_msg: VarSizeStructMsg(VarSizeStruct),
        3 => struct_with_enum_msg: StructWithEnumMsg(StructWithEnum),
        4 => empty_struct_msg: EmptyStructMsg(EmptyStruct),
        5 => flat_struct_msg: FlatStructMsg(FlatStruct),
    }
}

messgen_protocol! {
    #[messgen(proto_id = 2, name = "another_proto")]
    pub enum AnotherProto {
        0 => quote_msg: QuoteMsg(Quote),
        7 => tiny_msg: TinyMsg(TinyStruct),
    }
}

messgen_protocol! {
    #[messgen(proto_id = 3, name = "view_proto", decode = view)]
    pub enum ViewProto<'a> {
        0 => var_size_msg: VarSize(VarSizeView<'a>),
        1 => blob_msg: Blob(BlobView<'a>),
    }
}

messgen_protocol! {
    #[messgen(proto_id = 3, name = "view_proto", decode = arena)]
    pub enum ArenaProto<'a> {
        0 => var_size_msg: VarSize(VarSizeArena<'a>),
        1 => blob_msg: Blob(BlobArena<'a>),
    }
}

pub fn simple_struct() -> SimpleStruct {
    SimpleStruct {
        f0: 1,
        f1: 2,
        f1_pad: 3,
        f2: 4.5,
        f3: 5,
        f4: -6,
        f5: 7.25,
        f6: 8,
        f7: 9,
        f8: -10,
        f9: true,
        e0: SimpleEnum::AnotherValue,
        b0: SimpleBitset::from(SimpleBitsetFlag::One).with(SimpleBitsetFlag::Error),
    }
}

pub fn var_size_struct(seed: u64) -> VarSizeStruct {
    VarSizeStruct {
        f0: seed,
        f1_vec: (0..seed as i64 % 5).map(|i| i * -3).collect(),
        str: format!("str-{seed}"),
    }
}

pub fn complex_struct() -> ComplexStruct {
    let mut map_vec_by_str = HashMap::new();
    map_vec_by_str.insert("a".to_string(), vec![1, 2]);
    map_vec_by_str.insert("b".to_string(), vec![]);
    ComplexStruct {
        f0: u64::MAX,
        f1: 0xdead_beef,
        f2: 17,
        s_arr: [simple_struct(), SimpleStruct::default()],
        f1_arr: [1, -2, 3, i64::MIN],
        v_arr: [var_size_struct(1), var_size_struct(2)],
        f2_vec: vec![0.5, -0.25],
        e_vec: vec![SimpleEnum::AnotherValue, SimpleEnum::OneValue],
        s_vec: vec![simple_struct()],
        v_vec0: vec![vec![], vec![var_size_struct(3)]],
        v_vec1: [vec![var_size_struct(4)], vec![], vec![], vec![var_size_struct(7)]],
        v_vec2: vec![[vec![1], vec![], vec![-2, 3], vec![]]],
        str: "complex".to_string(),
        str_vec: vec!["x".to_string(), String::new()],
        map_str_by_int: [(1, "one".to_string()), (-1, "minus".to_string())]
            .into_iter()
            .collect(),
        map_vec_by_str,
    }
}
