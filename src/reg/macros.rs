/// Defines a peripheral register block.
///
/// The block is a zero-sized type generic over its base address. Each
/// register gets an accessor method on the block and its own newtype over
/// [`Reg`](crate::reg::Reg) carrying the field accessors:
///
/// * `name: bit(n)` - a boolean field at bit `n`,
/// * `name: bits(a..=b)` - a raw integer field,
/// * `name: bit(n) => T` / `name: bits(a..=b) => T` - a field holding `T`,
/// * `name: array(start, width, count) => T` - a
///   [`FieldArray`](crate::reg::FieldArray).
///
/// Field bounds are checked at compile time.
macro_rules! periph {
    (@field [$(#[$attr:meta])*] $field:ident, $raw:ty, bit($bit:literal)) => {
        periph!(@field [$(#[$attr])*] $field, $raw, bits($bit..=$bit) => bool);
    };
    (@field [$(#[$attr:meta])*] $field:ident, $raw:ty, bit($bit:literal) => $value:ty) => {
        periph!(@field [$(#[$attr])*] $field, $raw, bits($bit..=$bit) => $value);
    };
    (@field [$(#[$attr:meta])*] $field:ident, $raw:ty, bits($start:literal..=$stop:literal)) => {
        periph!(@field [$(#[$attr])*] $field, $raw, bits($start..=$stop) => $raw);
    };
    (@field [$(#[$attr:meta])*] $field:ident, $raw:ty, bits($start:literal..=$stop:literal) => $value:ty) => {
        $(#[$attr])*
        #[inline(always)]
        pub const fn $field(&self) -> $crate::reg::Field<$raw, $value> {
            const {
                assert!(
                    $start <= $stop && $stop < <$raw as $crate::reg::Bits>::WIDTH,
                    "field outside of register"
                )
            };
            $crate::reg::Field::new(self.0, $start, $stop)
        }
    };
    (@field [$(#[$attr:meta])*] $field:ident, $raw:ty, array($start:literal, $width:literal, $count:literal) => $value:ty) => {
        $(#[$attr])*
        #[inline(always)]
        pub const fn $field(&self) -> $crate::reg::FieldArray<$raw, $value, $count> {
            const {
                assert!(
                    $start + $width * $count <= <$raw as $crate::reg::Bits>::WIDTH,
                    "field array outside of register"
                )
            };
            $crate::reg::FieldArray::new(self.0, $start, $width)
        }
    };
    (
        $(#[$attr:meta])*
        $vis:vis struct $block:ident<$(const $param:ident: $param_ty:ty),+> @ $base:expr;
        $(
            $(#[$reg_attr:meta])*
            $reg:ident: $reg_ty:ident($raw:ty) @ $offset:literal
            $({
                $(
                    $(#[$field_attr:meta])*
                    $field:ident: $kind:ident($($args:tt)*) $(=> $value:ty)?;
                )*
            })?
            $(;)?
        )*
    ) => {
        $(#[$attr])*
        $vis struct $block<$(const $param: $param_ty),+> {
            _priv: (),
        }

        impl<$(const $param: $param_ty),+> $block<$($param),+> {
            /// Address of the first register of the block.
            pub const ADDRESS: usize = $base;

            #[allow(dead_code)]
            #[inline(always)]
            pub(crate) const unsafe fn steal() -> Self {
                Self { _priv: () }
            }

            $(
                $(#[$reg_attr])*
                #[inline(always)]
                pub const fn $reg(&self) -> $reg_ty {
                    $reg_ty(unsafe { $crate::reg::Reg::at(Self::ADDRESS + $offset) })
                }
            )*
        }

        $(
            $(#[$reg_attr])*
            #[derive(Clone, Copy, Debug, PartialEq, Eq)]
            pub struct $reg_ty($crate::reg::Reg<$raw>);

            impl ::core::ops::Deref for $reg_ty {
                type Target = $crate::reg::Reg<$raw>;

                #[inline(always)]
                fn deref(&self) -> &Self::Target {
                    &self.0
                }
            }

            #[allow(dead_code)]
            impl $reg_ty {
                /// Offset of the register from the block base.
                pub const OFFSET: usize = $offset;

                #[inline(always)]
                pub(crate) const unsafe fn at(address: usize) -> Self {
                    Self(unsafe { $crate::reg::Reg::at(address) })
                }

                $($(
                    periph!(
                        @field [$(#[$field_attr])*] $field, $raw, $kind($($args)*) $(=> $value)?
                    );
                )*)?
            }
        )*
    };
}
