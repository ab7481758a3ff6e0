use xmega_core::{
    map::adc::Resolution,
    reg::{Field, FieldArray, FieldVal, Reg},
    sim::{self, Access},
    FieldValue,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, FieldValue)]
#[repr(u8)]
enum Speed {
    Slow = 0,
    Fast = 1,
    Turbo = 3,
}

fn reg8(address: usize) -> Reg<u8> {
    unsafe { Reg::at(address) }
}

fn reg16(address: usize) -> Reg<u16> {
    unsafe { Reg::at(address) }
}

#[test]
fn reg_is_address_sized() {
    assert_eq!(core::mem::size_of::<Reg<u8>>(), core::mem::size_of::<usize>());
    assert_eq!(reg8(0x1234).address(), 0x1234);
}

#[test]
fn write_then_read() {
    sim::reset();
    let reg = reg8(0x2000);
    reg.write(0xA5);
    assert_eq!(reg.read(), 0xA5);
    assert_eq!(sim::peek(0x2000), 0xA5);
}

#[test]
fn set_and_clear_bits() {
    sim::reset();
    let reg = reg8(0x2000);
    reg.write(0b0000_1111);
    reg.set_bits(0b1100_0000);
    assert_eq!(reg.read(), 0b1100_1111);
    reg.clear_bits(0b0000_0011);
    assert_eq!(reg.read(), 0b1100_1100);
}

#[test]
fn update_with_closure() {
    sim::reset();
    let reg = reg8(0x2000);
    reg.write(0x0F);
    reg.update(|value| value.rotate_left(4));
    assert_eq!(reg.read(), 0xF0);
}

#[test]
fn store_clears_untouched_bits() {
    sim::reset();
    let reg = reg8(0x2000);
    reg.write(0xFF);
    let high = Field::<u8>::new(reg, 4, 7);
    reg.store(high.shift(0b1010));
    assert_eq!(reg.read(), 0b1010_0000);
}

#[test]
fn modify_is_one_read_and_one_write() {
    sim::reset();
    let reg = reg8(0x2000);
    reg.write(0b1000_0001);
    sim::clear_journal();
    let low = Field::<u8>::new(reg, 0, 1);
    let mid = Field::<u8>::new(reg, 3, 5);
    reg.modify(low.shift(0b10) | mid.shift(0b111));
    assert_eq!(
        sim::journal(),
        [
            Access::Read { address: 0x2000, value: 0b1000_0001 },
            Access::Write { address: 0x2000, old: 0b1000_0001, value: 0b1011_1010 },
        ]
    );
}

#[test]
fn field_val_combines_masks() {
    let a = FieldVal::new(0b0000_0001_u8, 0b0000_0011);
    let b = FieldVal::new(0b0100_0000_u8, 0b1100_0000);
    let both = a | b;
    assert_eq!(both.value(), 0b0100_0001);
    assert_eq!(both.mask(), 0b1100_0011);
    assert_eq!(a.combine(b), both);
}

#[test]
fn field_geometry() {
    let field = Field::<u8>::new(reg8(0x2000), 2, 4);
    assert_eq!(field.start(), 2);
    assert_eq!(field.stop(), 4);
    assert_eq!(field.width(), 3);
    assert_eq!(field.mask(), 0b0001_1100);
    assert_eq!(field.reg(), reg8(0x2000));
}

#[test]
fn field_write_truncates_to_width() {
    sim::reset();
    let reg = reg8(0x2000);
    let field = Field::<u8>::new(reg, 2, 3);
    field.write(0xFF);
    assert_eq!(reg.read(), 0b0000_1100);
    assert_eq!(field.read(), 0b11);
}

#[test]
fn field_write_bits_preserves_neighbours() {
    sim::reset();
    let reg = reg8(0x2000);
    reg.write(0b1110_0011);
    let field = Field::<u8>::new(reg, 2, 4);
    field.write_bits(0b010);
    assert_eq!(reg.read(), 0b1110_1011);
    assert_eq!(field.read_bits(), 0b010);
}

#[test]
fn bool_field() {
    sim::reset();
    let reg = reg8(0x2000);
    let flag = Field::<u8, bool>::new(reg, 6, 6);
    assert!(flag.is_clear());
    flag.set();
    assert!(flag.is_set());
    assert_eq!(reg.read(), 0b0100_0000);
    flag.clear();
    assert!(!flag.read());
    assert!(flag.get(0xFF));
}

#[test]
fn enum_field_rejects_reserved_encoding() {
    sim::reset();
    let reg = reg8(0x2000);
    let speed = Field::<u8, Speed>::new(reg, 1, 2);
    speed.write(Speed::Turbo);
    assert_eq!(reg.read(), 0b0000_0110);
    assert_eq!(speed.read(), Some(Speed::Turbo));
    speed.write_bits(0b10);
    assert_eq!(speed.read(), None);
    assert_eq!(speed.get(0b0000_0010), Some(Speed::Fast));
    assert_eq!(speed.get(0), Some(Speed::Slow));
}

#[test]
fn reserved_resolution_reads_none() {
    sim::reset();
    let reg = reg8(0x2000);
    let resolution = Field::<u8, Resolution>::new(reg, 1, 2);
    reg.write(0b0000_0010);
    assert_eq!(resolution.read(), None);
    resolution.write(Resolution::Bits8);
    assert_eq!(resolution.read(), Some(Resolution::Bits8));
}

#[test]
fn field_array_indexing() {
    sim::reset();
    let reg = reg8(0x2000);
    let levels = FieldArray::<u8, u8, 3>::new(reg, 0, 2);
    assert_eq!(levels.len(), 3);
    assert!(!levels.is_empty());
    assert_eq!(levels.mask(), 0b0011_1111);
    let second = levels.get::<1>();
    assert_eq!(second.start(), 2);
    assert_eq!(second.stop(), 3);
    second.write(0b10);
    assert_eq!(reg.read(), 0b0000_1000);
}

#[test]
fn field_array_packed_write_and_unpack() {
    sim::reset();
    let reg = reg8(0x2000);
    reg.write(0b1100_0000);
    let levels = FieldArray::<u8, u8, 3>::new(reg, 0, 2);
    levels.write(0b01_10_11);
    assert_eq!(reg.read(), 0b1101_1011);
    assert_eq!(levels.read(), 0b01_10_11);
    assert_eq!(levels.unpack(), [0b11, 0b10, 0b01]);
    levels.write_all(0b10);
    assert_eq!(reg.read(), 0b1110_1010);
}

#[test]
fn bool_field_array() {
    sim::reset();
    let reg = reg8(0x2000);
    let flags = FieldArray::<u8, bool, 4>::new(reg, 2, 1);
    flags.get::<3>().set();
    flags.get::<0>().set();
    assert_eq!(reg.read(), 0b0010_0100);
    assert_eq!(flags.unpack(), [true, false, false, true]);
    assert_eq!(flags.shift_all(true), FieldVal::new(0b0011_1100, 0b0011_1100));
}

#[test]
fn wide_register_low_byte_first() {
    sim::reset();
    let reg = reg16(0x2010);
    reg.write(0xBEEF);
    assert_eq!(sim::writes_to(0x2010), [0xEF]);
    assert_eq!(sim::writes_to(0x2011), [0xBE]);
    let journal = sim::journal();
    assert!(journal[0].is_write_to(0x2010));
    assert!(journal[1].is_write_to(0x2011));

    sim::clear_journal();
    assert_eq!(reg.read(), 0xBEEF);
    let journal = sim::journal();
    assert!(journal[0].is_read_of(0x2010));
    assert!(journal[1].is_read_of(0x2011));
}

#[test]
fn wide_field_spans_bytes() {
    sim::reset();
    let reg = reg16(0x2010);
    let field = Field::<u16>::new(reg, 4, 11);
    field.write(0xAB);
    assert_eq!(sim::peek_u16(0x2010), 0x0AB0);
    assert_eq!(field.read(), 0xAB);
}
