use ledger_xdr::{
    Error, FixedOpaque, Limits, UnsignedInt64, VarArray, VarOpaque, XdrString, from_base64,
    from_bytes, from_bytes_partial, from_bytes_with_limits, from_reader, to_base64, to_bytes,
    to_writer,
};
use serde::{Deserialize, Serialize};

#[test]
fn test_bool_true() {
    let bytes = to_bytes(&true).unwrap();
    assert_eq!(bytes, [0, 0, 0, 1]);
    assert!(from_bytes::<bool>(&bytes).unwrap());
}

#[test]
fn test_bool_false() {
    let bytes = to_bytes(&false).unwrap();
    assert_eq!(bytes, [0, 0, 0, 0]);
    assert!(!from_bytes::<bool>(&bytes).unwrap());
}

#[test]
fn test_i32_min_max() {
    for v in [i32::MIN, -1, 0, 1, i32::MAX] {
        assert_eq!(v, from_bytes::<i32>(&to_bytes(&v).unwrap()).unwrap());
    }
}

#[test]
fn test_negative_i32_twos_complement() {
    assert_eq!(to_bytes(&-2i32).unwrap(), [0xFF, 0xFF, 0xFF, 0xFE]);
}

#[test]
fn test_u32_big_endian() {
    let bytes = to_bytes(&0xDEADBEEFu32).unwrap();
    assert_eq!(bytes, [0xDE, 0xAD, 0xBE, 0xEF]);
}

#[test]
fn test_i64_hyper() {
    let v: i64 = -9_000_000_000;
    assert_eq!(v, from_bytes::<i64>(&to_bytes(&v).unwrap()).unwrap());
}

#[test]
fn test_u64_unsigned_hyper() {
    let bytes = to_bytes(&0x0102030405060708u64).unwrap();
    assert_eq!(bytes, [1, 2, 3, 4, 5, 6, 7, 8]);
}

#[test]
fn test_f32_roundtrip() {
    for v in [std::f32::consts::PI, f32::INFINITY, f32::NAN, 0.0_f32, -0.0_f32] {
        let decoded: f32 = from_bytes(&to_bytes(&v).unwrap()).unwrap();
        assert_eq!(v.to_bits(), decoded.to_bits());
    }
}

#[test]
fn test_f64_roundtrip() {
    let v = std::f64::consts::E;
    let decoded: f64 = from_bytes(&to_bytes(&v).unwrap()).unwrap();
    assert_eq!(v.to_bits(), decoded.to_bits());
}

#[test]
fn test_string_padding() {
    for (s, total) in [("", 4usize), ("A", 8), ("AB", 8), ("ABC", 8), ("ABCD", 8), ("ABCDE", 12)] {
        let bytes = to_bytes(&s.to_string()).unwrap();
        assert_eq!(bytes.len(), total, "string {:?}", s);
        assert!(bytes[4 + s.len()..].iter().all(|b| *b == 0), "non-zero pad for {:?}", s);
        assert_eq!(s.to_string(), from_bytes::<String>(&bytes).unwrap());
    }
}

#[test]
fn test_option_none_some() {
    assert_eq!(to_bytes(&Option::<u32>::None).unwrap(), [0, 0, 0, 0]);
    let bytes = to_bytes(&Some(42u32)).unwrap();
    assert_eq!(bytes, [0, 0, 0, 1, 0, 0, 0, 42]);
    assert_eq!(Some(42u32), from_bytes::<Option<u32>>(&bytes).unwrap());
}

#[test]
fn test_option_flag_must_be_zero_or_one() {
    let result = from_bytes::<Option<u32>>(&[0, 0, 0, 2, 0, 0, 0, 42]);
    assert_eq!(result, Err(Error::InvalidOptionFlag(2)));
}

#[derive(Debug, PartialEq, Serialize, Deserialize)]
struct LedgerHeaderStub {
    ledger_seq: u32,
    close_time: u64,
    base_fee: u32,
}

#[test]
fn test_struct_fields_back_to_back() {
    let header = LedgerHeaderStub { ledger_seq: 7, close_time: 0x0102030405060708, base_fee: 100 };
    let bytes = to_bytes(&header).unwrap();
    assert_eq!(bytes.len(), 16);
    assert_eq!(&bytes[..4], [0, 0, 0, 7]);
    assert_eq!(header, from_bytes(&bytes).unwrap());
}

#[derive(Debug, PartialEq, Serialize, Deserialize)]
enum OperationBody {
    Inflation,
    BumpSequence(i64),
    ManageData(String),
    SetTrust { limit: i64, flags: u32 },
}

#[test]
fn test_unit_enum() {
    let bytes = to_bytes(&OperationBody::Inflation).unwrap();
    assert_eq!(bytes, [0, 0, 0, 0]);
    assert_eq!(OperationBody::Inflation, from_bytes(&bytes).unwrap());
}

#[test]
fn test_newtype_enum_variant() {
    let v = OperationBody::BumpSequence(42);
    let bytes = to_bytes(&v).unwrap();
    assert_eq!(bytes, [0, 0, 0, 1, 0, 0, 0, 0, 0, 0, 0, 42]);
    assert_eq!(v, from_bytes(&bytes).unwrap());
}

#[test]
fn test_string_enum_variant() {
    let v = OperationBody::ManageData("config".to_string());
    let bytes = to_bytes(&v).unwrap();
    assert_eq!(&bytes[..4], [0, 0, 0, 2]);
    assert_eq!(v, from_bytes(&bytes).unwrap());
}

#[test]
fn test_struct_enum_variant() {
    let v = OperationBody::SetTrust { limit: 8, flags: 1 };
    let bytes = to_bytes(&v).unwrap();
    assert_eq!(bytes, [0, 0, 0, 3, 0, 0, 0, 0, 0, 0, 0, 8, 0, 0, 0, 1]);
    assert_eq!(v, from_bytes(&bytes).unwrap());
}

#[test]
fn test_undeclared_enum_arm_is_rejected() {
    assert_eq!(
        from_bytes::<OperationBody>(&[0, 0, 0, 4]),
        Err(Error::UnknownDiscriminant(4))
    );
    assert_eq!(
        from_bytes::<OperationBody>(&[0xFF, 0xFF, 0xFF, 0xFF]),
        Err(Error::UnknownDiscriminant(-1))
    );
}

#[test]
fn test_vec_u32() {
    let v: Vec<u32> = vec![1, 2, 3, 4, 5];
    let bytes = to_bytes(&v).unwrap();
    assert_eq!(&bytes[..4], [0, 0, 0, 5]);
    assert_eq!(bytes.len(), 24);
    assert_eq!(v, from_bytes::<Vec<u32>>(&bytes).unwrap());
}

#[test]
fn test_tuple_no_count_prefix() {
    let v: (u32, u32, u32) = (1, 2, 3);
    let bytes = to_bytes(&v).unwrap();
    assert_eq!(bytes, [0, 0, 0, 1, 0, 0, 0, 2, 0, 0, 0, 3]);
    assert_eq!(v, from_bytes(&bytes).unwrap());
}

#[test]
fn test_unit_void() {
    assert_eq!(to_bytes(&()).unwrap().len(), 0);
    from_bytes::<()>(&[]).unwrap();
}

#[test]
fn test_error_unexpected_eof() {
    assert_eq!(from_bytes::<u32>(&[0, 0, 0]), Err(Error::UnexpectedEof));
}

#[test]
fn test_error_invalid_bool() {
    assert_eq!(from_bytes::<bool>(&[0, 0, 0, 2]), Err(Error::InvalidBool(2)));
}

#[test]
fn test_trailing_bytes_rejected() {
    assert_eq!(from_bytes::<u32>(&[0, 0, 0, 1, 0]), Err(Error::TrailingBytes(1)));
}

#[test]
fn test_partial_deserialization() {
    let mut buf = to_bytes(&42u32).unwrap();
    buf.extend(to_bytes(&99u32).unwrap());
    buf.extend([0xFF, 0xFF]);
    let (first, rest) = from_bytes_partial::<u32>(&buf).unwrap();
    assert_eq!(first, 42);
    let (second, remaining) = from_bytes_partial::<u32>(rest).unwrap();
    assert_eq!(second, 99);
    assert_eq!(remaining, [0xFF, 0xFF]);
}

#[test]
fn test_to_writer_matches_to_bytes() {
    #[derive(Serialize, Deserialize, Debug, PartialEq)]
    struct Msg {
        id: u32,
        name: String,
        value: i64,
    }

    let msg = Msg { id: 7, name: "hello".into(), value: -9999 };
    let bytes = to_bytes(&msg).unwrap();
    let mut written = Vec::new();
    to_writer(&mut written, &msg).unwrap();
    assert_eq!(bytes, written);
}

#[test]
fn test_from_reader_struct() {
    let header = LedgerHeaderStub { ledger_seq: 99, close_time: 3, base_fee: 0 };
    let bytes = to_bytes(&header).unwrap();
    let decoded: LedgerHeaderStub = from_reader(std::io::Cursor::new(bytes)).unwrap();
    assert_eq!(header, decoded);
}

#[test]
fn test_from_reader_leaves_tail_unread() {
    let mut cursor = std::io::Cursor::new(vec![0u8, 0, 0, 5, 0xAA, 0xBB]);
    let v: u32 = from_reader(&mut cursor).unwrap();
    assert_eq!(v, 5);
    assert_eq!(cursor.position(), 4);
}

#[test]
fn test_reader_eof_error() {
    let result = from_reader::<_, u32>(std::io::Cursor::new([0u8, 0, 0]));
    assert_eq!(result, Err(Error::UnexpectedEof));
}

#[test]
fn test_base64_roundtrip() {
    let v = OperationBody::BumpSequence(1);
    let text = to_base64(&v).unwrap();
    assert_eq!(text, "AAAAAQAAAAAAAAAB");
    assert_eq!(v, from_base64::<OperationBody>(&text).unwrap());
}

// ── Fixed opaque ───────────────────────────────────────────────────────────

#[derive(Debug, PartialEq, Serialize, Deserialize)]
struct SignatureHint {
    key_index: u32,
    #[serde(with = "ledger_xdr::fixed_opaque")]
    hint: [u8; 12],
}

#[test]
fn test_fixed_opaque_no_length_prefix() {
    let id = SignatureHint { key_index: 7, hint: [1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12] };
    let bytes = to_bytes(&id).unwrap();
    assert_eq!(bytes.len(), 16);
    assert_eq!(&bytes[..4], [0, 0, 0, 7]);
    assert_eq!(&bytes[4..], [1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12]);
    assert_eq!(id, from_bytes(&bytes).unwrap());
}

/// Without the fixed-opaque mapping, `[u8; 12]` is twelve 4-byte unsigned ints.
#[test]
fn test_fixed_opaque_vs_default_size() {
    #[derive(Serialize, Deserialize)]
    struct DefaultArray {
        arr: [u8; 12],
    }

    let default_bytes = to_bytes(&DefaultArray { arr: [0u8; 12] }).unwrap();
    assert_eq!(default_bytes.len(), 48);

    let fixed_bytes = to_bytes(&SignatureHint { key_index: 0, hint: [0u8; 12] }).unwrap();
    assert_eq!(fixed_bytes.len(), 16);
}

#[derive(Debug, PartialEq, Serialize, Deserialize)]
struct PaddedRecord {
    #[serde(with = "ledger_xdr::fixed_opaque")]
    prefix: [u8; 8],
    version: u32,
    #[serde(with = "ledger_xdr::fixed_opaque")]
    code: [u8; 5],
    flags: u32,
}

#[test]
fn test_fixed_opaque_with_padding() {
    let rec = PaddedRecord { prefix: [0xAA; 8], version: 3, code: [1, 2, 3, 4, 5], flags: 0 };
    let bytes = to_bytes(&rec).unwrap();
    assert_eq!(bytes.len(), 24);
    assert_eq!(&bytes[..8], [0xAA; 8]);
    assert_eq!(&bytes[8..12], [0, 0, 0, 3]);
    assert_eq!(&bytes[12..17], [1, 2, 3, 4, 5]);
    assert_eq!(&bytes[17..20], [0, 0, 0]);
    assert_eq!(&bytes[20..24], [0, 0, 0, 0]);
    assert_eq!(rec, from_bytes(&bytes).unwrap());
}

#[test]
fn test_fixed_opaque_nonzero_padding_rejected() {
    let mut bytes = to_bytes(&PaddedRecord {
        prefix: [0; 8],
        version: 0,
        code: [9; 5],
        flags: 0,
    })
    .unwrap();
    bytes[18] = 1;
    assert_eq!(from_bytes::<PaddedRecord>(&bytes), Err(Error::MalformedPadding));
}

#[test]
fn test_fixed_opaque_zero_bytes() {
    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Empty {
        x: u32,
        #[serde(with = "ledger_xdr::fixed_opaque")]
        zero: [u8; 0],
    }
    let v = Empty { x: 1, zero: [] };
    let bytes = to_bytes(&v).unwrap();
    assert_eq!(bytes.len(), 4);
    assert_eq!(v, from_bytes(&bytes).unwrap());
}

#[test]
fn test_fixed_opaque_sizes_1_through_8() {
    macro_rules! check_size {
        ($n:expr) => {{
            #[derive(Serialize, Deserialize, Debug, PartialEq)]
            struct W {
                #[serde(with = "ledger_xdr::fixed_opaque")]
                data: [u8; $n],
            }
            let w = W { data: [0xABu8; $n] };
            let bytes = to_bytes(&w).unwrap();
            assert_eq!(bytes.len(), ($n + 3) / 4 * 4, "size {}", $n);
            assert_eq!(&bytes[..$n], &[0xABu8; $n][..]);
            assert!(bytes[$n..].iter().all(|b| *b == 0), "non-zero pad for size {}", $n);
            assert_eq!(w, from_bytes::<W>(&bytes).unwrap(), "roundtrip size {}", $n);
        }};
    }
    check_size!(1);
    check_size!(2);
    check_size!(3);
    check_size!(4);
    check_size!(5);
    check_size!(6);
    check_size!(7);
    check_size!(8);
}

#[test]
fn test_fixed_opaque_wrapper_type() {
    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Hashed {
        hash: FixedOpaque<32>,
        seq: u32,
    }
    let v = Hashed { hash: FixedOpaque::new([0x11; 32]), seq: 2 };
    let bytes = to_bytes(&v).unwrap();
    assert_eq!(bytes.len(), 36);
    assert_eq!(v, from_bytes(&bytes).unwrap());
}

// ── Bounded shapes through serde ───────────────────────────────────────────

#[derive(Debug, PartialEq, Serialize, Deserialize)]
struct DataEntry {
    name: XdrString<64>,
    value: Option<VarOpaque<64>>,
    signers: VarArray<UnsignedInt64, 3>,
}

#[test]
fn test_bounded_shapes_roundtrip() {
    let entry = DataEntry {
        name: XdrString::try_from("home_domain").unwrap(),
        value: Some(VarOpaque::new(b"example.org".to_vec()).unwrap()),
        signers: VarArray::new(vec![UnsignedInt64::from(1u64), UnsignedInt64::from(u64::MAX)]).unwrap(),
    };
    let bytes = to_bytes(&entry).unwrap();
    // 4 + 11 + 1 | 4 + 4 + 11 + 1 | 4 + 8 + 8
    assert_eq!(bytes.len(), 16 + 20 + 20);
    assert_eq!(&bytes[36..40], [0, 0, 0, 2]);
    assert_eq!(entry, from_bytes(&bytes).unwrap());
}

#[test]
fn test_bounded_string_over_max_rejected_on_decode() {
    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Short {
        code: XdrString<4>,
    }
    let bytes = [0, 0, 0, 5, b'a', b'b', b'c', b'd', b'e', 0, 0, 0];
    assert_eq!(
        from_bytes::<Short>(&bytes),
        Err(Error::LengthExceedsBound { len: 5, max: 4 })
    );
}

#[test]
fn test_bounded_array_over_max_rejected_on_decode() {
    let bytes = [0, 0, 0, 4, 0, 0, 0, 1, 0, 0, 0, 2, 0, 0, 0, 3, 0, 0, 0, 4];
    assert_eq!(
        from_bytes::<VarArray<u32, 3>>(&bytes),
        Err(Error::LengthExceedsBound { len: 4, max: 3 })
    );
}

#[test]
fn test_bound_on_element_does_not_leak_to_next_field() {
    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Pair {
        small: VarOpaque<1>,
        big: Vec<u8>,
    }
    let v = Pair { small: VarOpaque::new(vec![7u8]).unwrap(), big: vec![1, 2, 3] };
    let bytes = to_bytes(&v).unwrap();
    assert_eq!(v, from_bytes(&bytes).unwrap());
}

#[test]
fn test_nested_structs_respect_default_depth() {
    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Chain {
        next: Option<Box<Chain>>,
    }
    // 300 links, each `Some`, then a final `None`.
    let mut bytes = Vec::new();
    for _ in 0..300 {
        bytes.extend([0, 0, 0, 1]);
    }
    bytes.extend([0, 0, 0, 0]);
    assert_eq!(from_bytes::<Chain>(&bytes), Err(Error::DepthLimitExceeded));
}

#[test]
fn test_nested_tuple_structs_respect_default_depth() {
    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Pair(u32, Option<Box<Pair>>);
    let mut bytes = Vec::new();
    for _ in 0..300 {
        bytes.extend([0u8, 0, 0, 7, 0, 0, 0, 1]);
    }
    bytes.extend([0u8, 0, 0, 7, 0, 0, 0, 0]);
    assert_eq!(from_bytes::<Pair>(&bytes), Err(Error::DepthLimitExceeded));

    let shallow = Pair(1, Some(Box::new(Pair(2, None))));
    let bytes = to_bytes(&shallow).unwrap();
    assert_eq!(from_bytes::<Pair>(&bytes).unwrap(), shallow);
}

#[test]
fn test_nested_newtype_structs_respect_default_depth() {
    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Link(Option<Box<Link>>);
    let mut bytes = Vec::new();
    for _ in 0..300 {
        bytes.extend([0u8, 0, 0, 1]);
    }
    bytes.extend([0u8, 0, 0, 0]);
    assert_eq!(from_bytes::<Link>(&bytes), Err(Error::DepthLimitExceeded));

    let shallow = Link(Some(Box::new(Link(None))));
    assert_eq!(from_bytes::<Link>(&[0u8, 0, 0, 1, 0, 0, 0, 0]).unwrap(), shallow);
}

#[test]
fn test_from_bytes_with_limits_depth() {
    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Chain {
        next: Option<Box<Chain>>,
    }
    let mut bytes = Vec::new();
    for _ in 0..10 {
        bytes.extend([0u8, 0, 0, 1]);
    }
    bytes.extend([0u8, 0, 0, 0]);
    assert!(from_bytes::<Chain>(&bytes).is_ok());
    assert_eq!(
        from_bytes_with_limits::<Chain>(&bytes, Limits::default().with_depth(5)),
        Err(Error::DepthLimitExceeded)
    );
    assert_eq!(
        from_bytes_with_limits::<u32>(&[0u8, 0, 0, 9, 0], Limits::default()),
        Err(Error::TrailingBytes(1))
    );
}
