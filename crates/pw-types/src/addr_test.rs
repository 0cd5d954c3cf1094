use super::*;

#[test]
fn new_and_as_u64_roundtrip() {
    let v = Vaddr::new(0x1234);
    assert_eq!(v.as_u64(), 0x1234);
}

#[test]
fn null_is_null() {
    assert!(Vaddr::null().is_null());
    assert!(!Vaddr::new(1).is_null());
}

#[test]
fn add_and_sub() {
    let v = Vaddr::new(100);
    assert_eq!(v.add(10), Vaddr::new(110));
    assert_eq!(v.sub(10), Vaddr::new(90));
    assert_eq!(v + 10, Vaddr::new(110));
    assert_eq!(v - 10, Vaddr::new(90));
}

#[test]
fn diff_is_signed() {
    let a = Vaddr::new(100);
    let b = Vaddr::new(40);
    assert_eq!(a.diff(b), 60);
    assert_eq!(b.diff(a), -60);
}

#[test]
fn align_up_down() {
    let v = Vaddr::new(13);
    assert_eq!(v.align_up(8), Vaddr::new(16));
    assert_eq!(v.align_down(8), Vaddr::new(8));
    assert!(Vaddr::new(16).is_aligned(8));
    assert!(!v.is_aligned(8));
}

#[test]
fn addr_type_from_top_nibble() {
    assert_eq!(Vaddr::new(0x0000_0000_0000_0001).addr_type(), AddrType::Meta);
    assert_eq!(
        Vaddr::new(0x1000_0000_0000_0000).addr_type(),
        AddrType::Value08
    );
    assert_eq!(
        Vaddr::new(0xF000_0000_0000_0001).addr_type(),
        AddrType::Program
    );
}

#[test]
fn size_class_boundaries() {
    assert_eq!(SizeClass::for_len(255), AddrType::Value08);
    assert_eq!(SizeClass::for_len(256), AddrType::Value16);
    assert_eq!(SizeClass::for_len(65535), AddrType::Value16);
    assert_eq!(SizeClass::for_len(65536), AddrType::Value24);
}
