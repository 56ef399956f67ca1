//! Integration tests for type-layout and global resolution through
//! [`Target`].
//!
//! Covers:
//! - id/name equivalence of type lookups
//! - field preservation (size-only, fields-only, typed fields)
//! - direct globals read at every scalar width
//! - indirect globals on 32- and 64-bit architectures
//! - clean failures for unknown types and globals
//! - eager construction validation

use datacontract_reader::{
    Architecture, DataType, ErrorCategory, FieldInfo, ReadError, SnapshotMemory, Target,
    TargetConfig, TargetNInt, TargetNUInt, TargetPointer, TypeInfo,
};

// ══════════════════════════════════════════════════════════════════════════════
// Helpers
// ══════════════════════════════════════════════════════════════════════════════

const SLOT_VALUE: u64 = 0x1234_5678_9abc_def0;

fn thread_layout() -> TypeInfo {
    TypeInfo::sized(0x58)
        .with_field("Id", FieldInfo::typed(0x08, DataType::UInt32))
        .with_field("LinkNext", FieldInfo::typed(0x10, DataType::Pointer))
        .with_field("State", FieldInfo::named(0x18, "ThreadState"))
        .with_field("AllocContext", FieldInfo::new(0x20))
}

fn config(arch: Architecture) -> TargetConfig {
    TargetConfig::new(arch)
        .with_type(DataType::Thread, thread_layout())
        .with_type(DataType::GCHandle, TypeInfo::sized(8))
        .with_type(
            DataType::ThreadStore,
            TypeInfo::new().with_field("FirstThread", FieldInfo::typed(0, DataType::Pointer)),
        )
        .with_named_type("ObjectHeader", TypeInfo::sized(16))
        .with_global("Untyped", None, 0xfedc_ba98_7654_3210)
        .with_global("Short", Some("int16"), 0x1234)
        .with_global("Negative", Some("int32"), (-2_i64) as u64)
        .with_indirect_global("ThreadStore", Some("pointer"), 0)
        .with_indirect_global("Untyped Slot", None, 1)
        .with_indirection_table(vec![SLOT_VALUE, 0xffff_ffff_0000_0010])
        .with_contract("Thread")
        .with_contract("ThreadStore")
}

fn target(arch: Architecture) -> Target {
    Target::new(config(arch), SnapshotMemory::new()).expect("valid config must construct")
}

// ══════════════════════════════════════════════════════════════════════════════
// Layout catalog
// ══════════════════════════════════════════════════════════════════════════════

#[test]
fn type_info_by_id_equals_by_name() {
    let t = target(Architecture::LE64);
    for id in [DataType::Thread, DataType::GCHandle, DataType::ThreadStore] {
        let by_id = t.get_type_info(id).unwrap();
        let by_name = t.get_type_info(id.to_string().as_str()).unwrap();
        assert_eq!(by_id, by_name, "id and name views differ for {id}");
    }
}

#[test]
fn fields_are_returned_as_registered() {
    let t = target(Architecture::LE64);
    let info = t.get_type_info(DataType::Thread).unwrap();
    assert_eq!(info, &thread_layout());
    assert_eq!(info.size, Some(0x58));

    let id = info.field("Id").unwrap();
    assert_eq!(id.offset, 0x08);
    assert_eq!(id.data_type, Some(DataType::UInt32));
    assert_eq!(id.type_name.as_deref(), Some("uint32"));

    let state = info.field("State").unwrap();
    assert_eq!(state.data_type, None);
    assert_eq!(state.type_name.as_deref(), Some("ThreadState"));

    let alloc = info.field("AllocContext").unwrap();
    assert_eq!(alloc.offset, 0x20);
    assert_eq!(alloc.data_type, None);
    assert_eq!(alloc.type_name, None);
}

#[test]
fn size_only_type_has_no_fields() {
    let t = target(Architecture::LE64);
    let handle = t.get_type_info(DataType::GCHandle).unwrap();
    assert_eq!(handle.size, Some(8));
    assert!(handle.fields.is_empty());
}

#[test]
fn fields_only_type_has_no_size() {
    let t = target(Architecture::LE64);
    let store = t.get_type_info("ThreadStore").unwrap();
    assert_eq!(store.size, None);
    assert_eq!(store.fields.len(), 1);
}

#[test]
fn name_only_type_is_reachable_by_name() {
    let t = target(Architecture::LE32);
    assert_eq!(t.get_type_info("ObjectHeader").unwrap().size, Some(16));
}

#[test]
fn unknown_type_fails_cleanly() {
    let t = target(Architecture::LE64);
    let err = t.get_type_info("DoesNotExist").unwrap_err();
    assert!(matches!(&err, ReadError::TypeNotFound(name) if name == "DoesNotExist"));
    assert_eq!(err.category(), ErrorCategory::NotFound);

    assert!(matches!(
        t.get_type_info(DataType::ExceptionInfo),
        Err(ReadError::TypeNotFound(name)) if name == "ExceptionInfo"
    ));
}

// ══════════════════════════════════════════════════════════════════════════════
// Direct globals
// ══════════════════════════════════════════════════════════════════════════════

#[test]
fn untyped_direct_global_reads_at_every_width() {
    let v: u64 = 0xfedc_ba98_7654_3210;
    for arch in [Architecture::LE32, Architecture::LE64] {
        let t = target(arch);

        assert_eq!(t.read_global::<u8>("Untyped").unwrap(), (v as u8, None));
        assert_eq!(t.read_global::<i8>("Untyped").unwrap(), (v as i8, None));
        assert_eq!(t.read_global::<u16>("Untyped").unwrap(), (v as u16, None));
        assert_eq!(t.read_global::<i16>("Untyped").unwrap(), (v as i16, None));
        assert_eq!(t.read_global::<u32>("Untyped").unwrap(), (v as u32, None));
        assert_eq!(t.read_global::<i32>("Untyped").unwrap(), (v as i32, None));
        assert_eq!(t.read_global::<u64>("Untyped").unwrap(), (v, None));
        assert_eq!(t.read_global::<i64>("Untyped").unwrap(), (v as i64, None));

        let native = arch.pointer_width.truncate(v);
        assert_eq!(
            t.read_global::<TargetNUInt>("Untyped").unwrap(),
            (TargetNUInt(native), None)
        );
        assert_eq!(
            t.read_global_pointer("Untyped").unwrap(),
            (TargetPointer::new(native), None)
        );
    }
}

#[test]
fn typed_direct_global_reports_declared_type() {
    let t = target(Architecture::LE64);
    let (value, declared) = t.read_global::<i16>("Short").unwrap();
    assert_eq!(value, 0x1234);
    assert_eq!(declared, Some("int16"));
}

#[test]
fn declared_type_is_advisory() {
    let t = target(Architecture::LE64);
    // int16 global read as uint8: narrowed, not rejected
    assert_eq!(t.read_global::<u8>("Short").unwrap(), (0x34, Some("int16")));
}

#[test]
fn sign_extended_direct_global() {
    let t = target(Architecture::LE32);
    assert_eq!(t.read_global::<i32>("Negative").unwrap(), (-2, Some("int32")));
    assert_eq!(t.read_global::<i64>("Negative").unwrap().0, -2);
    assert_eq!(t.read_global::<TargetNInt>("Negative").unwrap().0, TargetNInt(-2));
}

// ══════════════════════════════════════════════════════════════════════════════
// Indirect globals
// ══════════════════════════════════════════════════════════════════════════════

#[test]
fn indirect_pointer_on_64_bit() {
    let t = target(Architecture::LE64);
    let (ptr, declared) = t.read_global_pointer("ThreadStore").unwrap();
    assert_eq!(ptr, TargetPointer::new(0x1234_5678_9abc_def0));
    assert_eq!(declared, Some("pointer"));
}

#[test]
fn indirect_pointer_on_32_bit_is_truncated() {
    let t = target(Architecture::LE32);
    let (ptr, declared) = t.read_global_pointer("ThreadStore").unwrap();
    assert_eq!(ptr, TargetPointer::new(0x9abc_def0));
    assert_eq!(declared, Some("pointer"));
}

#[test]
fn indirect_truncation_applies_before_narrowing() {
    // Slot 1 holds 0xffff_ffff_0000_0010; a 32-bit target only sees 0x10.
    let t32 = target(Architecture::LE32);
    assert_eq!(t32.read_global::<u64>("Untyped Slot").unwrap(), (0x10, None));
    let t64 = target(Architecture::LE64);
    assert_eq!(
        t64.read_global::<u64>("Untyped Slot").unwrap(),
        (0xffff_ffff_0000_0010, None)
    );
}

#[test]
fn unknown_global_fails_cleanly() {
    let t = target(Architecture::LE64);
    let err = t.read_global::<i32>("missing").unwrap_err();
    assert!(matches!(&err, ReadError::UnknownGlobal(name) if name == "missing"));
    assert_eq!(err.category(), ErrorCategory::NotFound);
    assert!(matches!(
        t.read_global_pointer("missing"),
        Err(ReadError::UnknownGlobal(_))
    ));
}

// ══════════════════════════════════════════════════════════════════════════════
// Strict reads
// ══════════════════════════════════════════════════════════════════════════════

#[test]
fn strict_read_accepts_matching_and_untyped() {
    let t = target(Architecture::LE64);
    assert_eq!(t.read_global_strict::<i16>("Short").unwrap(), 0x1234);
    assert_eq!(
        t.read_global_strict::<TargetPointer>("ThreadStore").unwrap(),
        TargetPointer::new(SLOT_VALUE)
    );
    assert_eq!(t.read_global_strict::<u8>("Untyped").unwrap(), 0x10);
}

#[test]
fn strict_read_rejects_mismatch() {
    let t = target(Architecture::LE64);
    let err = t.read_global_strict::<u16>("Short").unwrap_err();
    assert_eq!(err.category(), ErrorCategory::Contract);
    // nuint and pointer are distinct declarations
    assert!(matches!(
        t.read_global_strict::<TargetNUInt>("ThreadStore"),
        Err(ReadError::TypeMismatch { .. })
    ));
}

// ══════════════════════════════════════════════════════════════════════════════
// Construction
// ══════════════════════════════════════════════════════════════════════════════

#[test]
fn out_of_range_indirect_index_fails_construction() {
    let config = TargetConfig::new(Architecture::LE64)
        .with_indirect_global("ThreadStore", Some("pointer"), 3)
        .with_indirection_table(vec![1, 2, 3]);
    let err = Target::new(config, SnapshotMemory::new()).unwrap_err();
    assert!(matches!(err, ReadError::CorruptContract(_)));
}

#[test]
fn id_and_name_registration_collide() {
    let config = TargetConfig::new(Architecture::LE64)
        .with_type(DataType::Thread, TypeInfo::sized(8))
        .with_named_type("Thread", TypeInfo::sized(16));
    assert!(matches!(
        Target::new(config, SnapshotMemory::new()),
        Err(ReadError::CorruptContract(_))
    ));
}

#[test]
fn empty_config_constructs() {
    let t = Target::new(TargetConfig::new(Architecture::BE32), SnapshotMemory::new()).unwrap();
    assert!(t.layouts().is_empty());
    assert!(t.globals().is_empty());
    assert_eq!(t.contracts().count(), 0);
    assert_eq!(t.pointer_size(), 4);
}

#[test]
fn contracts_are_passed_through() {
    let t = target(Architecture::LE64);
    assert_eq!(t.contracts().collect::<Vec<_>>(), vec!["Thread", "ThreadStore"]);
    assert!(t.supports_contract("Thread"));
    assert!(!t.supports_contract("Exception"));
}

#[test]
fn config_loaded_from_json() {
    let json = r#"{
        "architecture": { "pointer_width": 4 },
        "types": [ { "name": "GCHandle", "size": 4 } ],
        "globals": [ { "name": "ThreadStore", "type_name": "pointer", "storage": { "indirect": 0 } } ],
        "indirection_table": [1311768467463790320],
        "contracts": ["ThreadStore"]
    }"#;
    let config = TargetConfig::from_json(json).unwrap();
    let t = Target::new(config, SnapshotMemory::new()).unwrap();
    assert_eq!(
        t.read_global_pointer("ThreadStore").unwrap().0,
        TargetPointer::new(0x9abc_def0)
    );
    assert_eq!(t.get_type_info(DataType::GCHandle).unwrap().size, Some(4));
}

#[test]
fn json_field_types_match_builder() {
    let built = TargetConfig::new(Architecture::LE64).with_type(
        DataType::Thread,
        TypeInfo::new()
            .with_field("Id", FieldInfo::named(4, "uint32"))
            .with_field("Handle", FieldInfo::named(8, "ObjectHandle")),
    );
    let json = r#"{
        "architecture": { "pointer_width": 8 },
        "types": [ { "name": "Thread", "fields": {
            "Id": { "offset": 4, "type_name": "uint32" },
            "Handle": { "offset": 8, "type_name": "ObjectHandle" }
        } } ]
    }"#;
    let built = Target::new(built, SnapshotMemory::new()).unwrap();
    let loaded = Target::new(TargetConfig::from_json(json).unwrap(), SnapshotMemory::new()).unwrap();
    for field in ["Id", "Handle"] {
        assert_eq!(
            built.get_field_info(DataType::Thread, field).unwrap(),
            loaded.get_field_info(DataType::Thread, field).unwrap(),
        );
    }
    assert_eq!(
        loaded.get_field_info(DataType::Thread, "Id").unwrap().data_type,
        Some(DataType::UInt32)
    );
}

#[test]
fn target_is_shareable_across_threads() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Target>();

    let t = std::sync::Arc::new(target(Architecture::LE64));
    let handles: Vec<_> = (0..4)
        .map(|_| {
            let t = std::sync::Arc::clone(&t);
            std::thread::spawn(move || t.read_global_pointer("ThreadStore").unwrap().0)
        })
        .collect();
    for h in handles {
        assert_eq!(h.join().unwrap(), TargetPointer::new(SLOT_VALUE));
    }
}
