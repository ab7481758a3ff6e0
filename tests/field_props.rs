use proptest::prelude::*;
use xmega_core::{
    reg::{bit_range, Field, FieldArray, Reg},
    sim,
};

fn reg8() -> Reg<u8> {
    unsafe { Reg::at(0x2000) }
}

macro_rules! field_props {
    ($mod:ident, $ty:ty, $address:expr) => {
        mod $mod {
            use super::*;

            fn reg() -> Reg<$ty> {
                unsafe { Reg::at($address) }
            }

            fn span() -> impl Strategy<Value = (u8, u8)> {
                const WIDTH: u8 = <$ty>::BITS as u8;
                (0_u8..WIDTH).prop_flat_map(|start| (Just(start), start..WIDTH))
            }

            proptest! {
                #[test]
                fn mask_covers_exactly_the_span((start, stop) in span()) {
                    let field = Field::<$ty>::new(reg(), start, stop);
                    let mask = field.mask();
                    prop_assert_eq!(u32::from(mask), bit_range(start, stop));
                    prop_assert_eq!(mask.count_ones(), u32::from(stop - start + 1));
                    prop_assert_eq!(mask.trailing_zeros(), u32::from(start));
                }

                #[test]
                fn write_touches_only_the_field((start, stop) in span(), initial: $ty, value: $ty) {
                    sim::reset();
                    let reg = reg();
                    reg.write(initial);
                    let field = Field::<$ty>::new(reg, start, stop);
                    field.write(value);
                    let mask = field.mask();
                    let after = reg.read();
                    prop_assert_eq!(after & !mask, initial & !mask);
                    prop_assert_eq!(field.read(), value & (mask >> start));
                }

                #[test]
                fn get_matches_read((start, stop) in span(), initial: $ty) {
                    sim::reset();
                    let reg = reg();
                    reg.write(initial);
                    let field = Field::<$ty>::new(reg, start, stop);
                    prop_assert_eq!(field.get(initial), field.read());
                }
            }
        }
    };
}

field_props!(width8, u8, 0x2000);
field_props!(width16, u16, 0x2010);
field_props!(width32, u32, 0x2020);

proptest! {
    #[test]
    fn array_slot_writes_are_isolated(initial: u8, slot in 0_u8..4) {
        sim::reset();
        let reg = reg8();
        reg.write(initial);
        let levels = FieldArray::<u8, u8, 4>::new(reg, 0, 2);
        match slot {
            0 => levels.get::<0>().write(0b11),
            1 => levels.get::<1>().write(0b11),
            2 => levels.get::<2>().write(0b11),
            _ => levels.get::<3>().write(0b11),
        }
        let slot_mask = 0b11_u8 << (slot * 2);
        prop_assert_eq!(reg.read() & !slot_mask, initial & !slot_mask);
        prop_assert_eq!(levels.unpack()[usize::from(slot)], 0b11);
    }

    #[test]
    fn packed_array_write_matches_read(initial: u8, packed in 0_u8..64) {
        sim::reset();
        let reg = reg8();
        reg.write(initial);
        let levels = FieldArray::<u8, u8, 3>::new(reg, 2, 2);
        levels.write(packed);
        prop_assert_eq!(levels.read(), packed);
        prop_assert_eq!(reg.read() & 0b0000_0011, initial & 0b0000_0011);
    }
}
